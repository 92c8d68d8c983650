//! JDL tokenizer

use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Identifiers and bare words; may contain `.` and `-` (`com.acme`, `infinite-scroll`)
    Ident(String),
    Str(String),
    /// Numeric literal kept as written (`42`, `-1`, `10.5`)
    Num(String),
    /// `/regex/` literal, delimiters stripped
    Regex(String),
    /// `/** ... */` comment body
    DocComment(String),

    LBrace,   // {
    RBrace,   // }
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    Comma,    // ,
    Star,     // *
    At,       // @
    Colon,    // :
    Eq,       // =

    Eof,
}

/// A token and the line it starts on
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub line: usize,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LexError {
    #[error("line {line}: unexpected character '{ch}'")]
    UnexpectedChar { ch: char, line: usize },
    #[error("line {line}: unterminated string")]
    UnterminatedString { line: usize },
    #[error("line {line}: unterminated comment")]
    UnterminatedComment { line: usize },
    #[error("line {line}: unterminated regular expression")]
    UnterminatedRegex { line: usize },
}

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn read_ident(&mut self, first: char) -> String {
        let mut s = String::from(first);
        while let Some(&c) = self.chars.peek() {
            if c.is_alphanumeric() || matches!(c, '_' | '.' | '-' | '$') {
                s.push(c);
                self.bump();
            } else {
                break;
            }
        }
        s
    }

    fn read_number(&mut self, first: char) -> String {
        let mut s = String::from(first);
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() || c == '.' {
                s.push(c);
                self.bump();
            } else {
                break;
            }
        }
        s
    }

    fn read_string(&mut self, quote: char) -> Result<String, LexError> {
        let line = self.line;
        let mut s = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(s),
                Some('\\') => {
                    if let Some(c) = self.bump() {
                        match c {
                            'n' => s.push('\n'),
                            't' => s.push('\t'),
                            _ => s.push(c),
                        }
                    }
                }
                Some(c) => s.push(c),
                None => return Err(LexError::UnterminatedString { line }),
            }
        }
    }

    /// Called after `/*`; returns the body up to `*/`
    fn read_block_comment(&mut self, line: usize) -> Result<String, LexError> {
        let mut s = String::new();
        loop {
            match self.bump() {
                Some('*') if self.chars.peek() == Some(&'/') => {
                    self.bump();
                    return Ok(s);
                }
                Some(c) => s.push(c),
                None => return Err(LexError::UnterminatedComment { line }),
            }
        }
    }

    /// Called after the opening `/`; escaped slashes are kept verbatim
    fn read_regex(&mut self, line: usize) -> Result<String, LexError> {
        let mut s = String::new();
        loop {
            match self.bump() {
                Some('/') => return Ok(s),
                Some('\\') => {
                    s.push('\\');
                    match self.bump() {
                        Some(c) => s.push(c),
                        None => return Err(LexError::UnterminatedRegex { line }),
                    }
                }
                Some('\n') | None => return Err(LexError::UnterminatedRegex { line }),
                Some(c) => s.push(c),
            }
        }
    }

    /// Next significant token; `//` and plain `/* */` comments are skipped
    pub fn next_token(&mut self) -> Result<Spanned, LexError> {
        loop {
            self.skip_whitespace();
            let line = self.line;

            let c = match self.bump() {
                Some(c) => c,
                None => {
                    return Ok(Spanned {
                        token: Token::Eof,
                        line,
                    });
                }
            };

            let token = match c {
                '{' => Token::LBrace,
                '}' => Token::RBrace,
                '(' => Token::LParen,
                ')' => Token::RParen,
                '[' => Token::LBracket,
                ']' => Token::RBracket,
                ',' => Token::Comma,
                '*' => Token::Star,
                '@' => Token::At,
                ':' => Token::Colon,
                '=' => Token::Eq,
                '/' => match self.chars.peek().copied() {
                    Some('/') => {
                        while let Some(&c) = self.chars.peek() {
                            if c == '\n' {
                                break;
                            }
                            self.bump();
                        }
                        continue;
                    }
                    Some('*') => {
                        self.bump();
                        let is_doc = self.chars.peek() == Some(&'*');
                        let body = self.read_block_comment(line)?;
                        match body.strip_prefix('*') {
                            Some(doc) if is_doc && !doc.trim().is_empty() => {
                                Token::DocComment(doc.to_string())
                            }
                            _ => continue,
                        }
                    }
                    _ => Token::Regex(self.read_regex(line)?),
                },
                '"' | '\'' => Token::Str(self.read_string(c)?),
                '-' if self.chars.peek().is_some_and(|n| n.is_ascii_digit()) => {
                    Token::Num(self.read_number(c))
                }
                c if c.is_ascii_digit() => Token::Num(self.read_number(c)),
                c if c.is_alphabetic() || c == '_' || c == '$' => Token::Ident(self.read_ident(c)),
                ch => return Err(LexError::UnexpectedChar { ch, line }),
            };

            return Ok(Spanned { token, line });
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Spanned>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let spanned = self.next_token()?;
            let done = spanned.token == Token::Eof;
            tokens.push(spanned);
            if done {
                break;
            }
        }
        Ok(tokens)
    }
}
