//! Naming and comment formatting helpers used by the converters

use heck::{ToLowerCamelCase, ToSnakeCase};

/// `JobHistory` -> `jobHistory`
pub fn camel_case(name: &str) -> String {
    name.to_lower_camel_case()
}

/// `JobHistory` -> `job_history`
pub fn snake_case(name: &str) -> String {
    name.to_snake_case()
}

pub fn lower_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn upper_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// First character upper-cased, the rest lower-cased: `minLength` -> `Minlength`
pub fn capitalize(value: &str) -> String {
    upper_first(&value.to_lowercase())
}

/// Normalize a Javadoc-style comment body.
///
/// Accepts the text between `/**` and `*/` (delimiters are also stripped if
/// still present), removes the leading `*` gutter of each line and joins the
/// remaining lines with `\n`. Blank leading and trailing lines are dropped.
pub fn format_comment(comment: &str) -> Option<String> {
    let body = comment.trim();
    let body = body.strip_prefix("/**").unwrap_or(body);
    let body = body.strip_suffix("*/").unwrap_or(body);

    let lines: Vec<&str> = body
        .lines()
        .map(|line| {
            let line = line.trim();
            line.strip_prefix('*').map(str::trim).unwrap_or(line)
        })
        .collect();

    let start = lines.iter().position(|l| !l.is_empty())?;
    let end = lines.iter().rposition(|l| !l.is_empty())?;
    Some(lines[start..=end].join("\n"))
}
