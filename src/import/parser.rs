//! Recursive-descent JDL parser
//!
//! Supported declarations: `entity`, `enum`, `relationship`, `application`,
//! numeric constants (`MAX = 42`), and unary/binary entity options
//! (`skipClient *`, `dto * with mapstruct except Job`). Entities, fields and
//! relationship sides accept `@annotation(value)` prefixes.

use super::lexer::{LexError, Lexer, Spanned, Token};
use crate::models::{
    EntityOption, EntitySelection, JPA_DERIVED_IDENTIFIER, JdlApplication, JdlEntity, JdlEnum,
    JdlEnumValue, JdlField, JdlObject, JdlOption, JdlRelationship, JdlValidation,
    RelationshipType, ValidationKind,
};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Lex error: {0}")]
    Lex(#[from] LexError),
    #[error("line {line}: unexpected {found}, expected {expected}")]
    Unexpected {
        found: String,
        expected: &'static str,
        line: usize,
    },
    #[error("line {line}: {message}")]
    Invalid { message: String, line: usize },
}

type Annotation = (String, Option<Value>);

pub struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    constants: HashMap<String, Value>,
}

fn describe(token: &Token) -> String {
    match token {
        Token::Ident(s) => format!("'{}'", s),
        Token::Str(s) => format!("string \"{}\"", s),
        Token::Num(n) => format!("number {}", n),
        Token::Regex(r) => format!("pattern /{}/", r),
        Token::DocComment(_) => "comment".to_string(),
        Token::Eof => "end of input".to_string(),
        other => format!("{:?}", other),
    }
}

fn number_value(raw: &str) -> Option<Value> {
    if let Ok(int) = raw.parse::<i64>() {
        return Some(Value::from(int));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
}

impl Parser {
    pub fn new(input: &str) -> Result<Self, ParseError> {
        let tokens = Lexer::new(input).tokenize()?;
        Ok(Self {
            tokens,
            pos: 0,
            constants: HashMap::new(),
        })
    }

    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> &Token {
        self.tokens
            .get(self.pos + offset)
            .map(|s| &s.token)
            .unwrap_or(&Token::Eof)
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|s| s.line)
            .unwrap_or(1)
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        ParseError::Unexpected {
            found: describe(self.peek()),
            expected,
            line: self.line(),
        }
    }

    fn invalid(&self, message: impl Into<String>) -> ParseError {
        ParseError::Invalid {
            message: message.into(),
            line: self.line(),
        }
    }

    fn expect(&mut self, expected: Token, what: &'static str) -> Result<(), ParseError> {
        if *self.peek() == expected {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(what))
        }
    }

    fn expect_ident(&mut self, what: &'static str) -> Result<String, ParseError> {
        match self.peek() {
            Token::Ident(s) => {
                let s = s.clone();
                self.advance();
                Ok(s)
            }
            _ => Err(self.unexpected(what)),
        }
    }

    fn expect_keyword(&mut self, keyword: &'static str) -> Result<(), ParseError> {
        if self.check_ident(keyword) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(keyword))
        }
    }

    fn check_ident(&self, name: &str) -> bool {
        matches!(self.peek(), Token::Ident(s) if s == name)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == token {
            self.advance();
            true
        } else {
            false
        }
    }

    fn take_doc(&mut self) -> Option<String> {
        let mut doc = None;
        while let Token::DocComment(body) = self.peek() {
            doc = Some(body.clone());
            self.advance();
        }
        doc
    }

    pub fn parse(&mut self) -> Result<JdlObject, ParseError> {
        let mut jdl = JdlObject::new();

        loop {
            let doc = self.take_doc();
            let annotations = self.parse_annotations()?;

            let keyword = match self.peek() {
                Token::Eof if annotations.is_empty() => break,
                Token::Ident(s) => s.clone(),
                _ => return Err(self.unexpected("a declaration")),
            };

            if !annotations.is_empty() && keyword != "entity" {
                return Err(self.invalid("annotations are only allowed on entities here"));
            }

            match keyword.as_str() {
                "entity" => {
                    self.advance();
                    let entity = self.parse_entity(doc)?;
                    for (name, value) in annotations {
                        let option = self.annotation_to_option(&name, value)?;
                        jdl.add_option(JdlOption::new(
                            option,
                            EntitySelection::named([entity.name.clone()]),
                        ));
                    }
                    jdl.add_entity(entity);
                }
                "enum" => {
                    self.advance();
                    jdl.add_enum(self.parse_enum(doc)?);
                }
                "relationship" => {
                    self.advance();
                    for relationship in self.parse_relationship_block()? {
                        jdl.add_relationship(relationship);
                    }
                }
                "application" => {
                    self.advance();
                    jdl.add_application(self.parse_application()?);
                }
                k if EntityOption::is_unary_keyword(k) || EntityOption::is_binary_keyword(k) => {
                    self.advance();
                    jdl.add_option(self.parse_option(&keyword)?);
                }
                _ if *self.peek_at(1) == Token::Eq => self.parse_constant()?,
                _ => return Err(self.unexpected("a declaration")),
            }
        }

        Ok(jdl)
    }

    /// `NAME = 42`
    fn parse_constant(&mut self) -> Result<(), ParseError> {
        let name = self.expect_ident("constant name")?;
        self.expect(Token::Eq, "'='")?;
        let value = match self.advance() {
            Token::Num(raw) => number_value(&raw),
            _ => None,
        }
        .ok_or_else(|| self.invalid(format!("constant {} must be a number", name)))?;
        self.constants.insert(name, value);
        Ok(())
    }

    fn parse_annotations(&mut self) -> Result<Vec<Annotation>, ParseError> {
        let mut annotations = Vec::new();
        while self.eat(&Token::At) {
            let name = self.expect_ident("annotation name")?;
            let value = if self.eat(&Token::LParen) {
                let value = match self.advance() {
                    Token::Ident(s) | Token::Str(s) => Value::String(s),
                    Token::Num(raw) => number_value(&raw)
                        .ok_or_else(|| self.invalid(format!("invalid number {}", raw)))?,
                    _ => return Err(self.unexpected("annotation value")),
                };
                self.expect(Token::RParen, "')'")?;
                Some(value)
            } else {
                None
            };
            annotations.push((name, value));
        }
        Ok(annotations)
    }

    fn annotation_to_option(
        &self,
        name: &str,
        value: Option<Value>,
    ) -> Result<EntityOption, ParseError> {
        match value {
            None => EntityOption::unary(name)
                .ok_or_else(|| self.invalid(format!("unknown entity annotation @{}", name))),
            Some(value) => {
                let text = match &value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                EntityOption::binary(name, &text).map_err(|message| self.invalid(message))
            }
        }
    }

    fn parse_entity(&mut self, doc: Option<String>) -> Result<JdlEntity, ParseError> {
        let name = self.expect_ident("entity name")?;
        let mut entity = JdlEntity::new(name);
        entity.comment = doc;

        if self.eat(&Token::LParen) {
            entity.table_name = Some(self.expect_ident("table name")?);
            self.expect(Token::RParen, "')'")?;
        }

        if self.eat(&Token::LBrace) {
            loop {
                let doc = self.take_doc();
                if self.eat(&Token::RBrace) {
                    break;
                }
                let mut field = self.parse_field(doc)?;
                self.eat(&Token::Comma);
                // `title String, /** Title */` documents the field when it has no leading comment
                if let Some(trailing) = self.take_trailing_doc() {
                    field.comment.get_or_insert(trailing);
                }
                entity.fields.push(field);
            }
        }

        Ok(entity)
    }

    fn parse_field(&mut self, doc: Option<String>) -> Result<JdlField, ParseError> {
        let annotations = self.parse_annotations()?;
        let name = self.expect_ident("field name")?;
        let field_type = self.expect_ident("field type")?;
        let mut field = JdlField::new(name, field_type);

        while let Some(validation) = self.parse_validation()? {
            field.validations.push(validation);
        }

        for (key, value) in annotations {
            field.options.insert(key, value.unwrap_or(Value::Bool(true)));
        }
        field.comment = doc;

        Ok(field)
    }

    /// `unique Boolean` on a new line declares a field named unique
    fn starts_field_declaration(&self) -> bool {
        let line_at = |index: usize| self.tokens.get(index).map(|s| s.line);
        let on_new_line = match self.pos.checked_sub(1) {
            Some(previous) => line_at(self.pos) > line_at(previous),
            None => true,
        };
        on_new_line
            && matches!(self.peek_at(1), Token::Ident(next) if ValidationKind::from_name(next).is_none())
    }

    /// A doc comment on the same line as the previous token
    fn take_trailing_doc(&mut self) -> Option<String> {
        let previous_line = self.pos.checked_sub(1).and_then(|i| self.tokens.get(i))?.line;
        match self.tokens.get(self.pos) {
            Some(Spanned {
                token: Token::DocComment(body),
                line,
            }) if *line == previous_line => {
                let body = body.clone();
                self.advance();
                Some(body)
            }
            _ => None,
        }
    }

    fn parse_validation(&mut self) -> Result<Option<JdlValidation>, ParseError> {
        let kind = match self.peek() {
            Token::Ident(s) => match ValidationKind::from_name(s) {
                Some(kind) => kind,
                None => return Ok(None),
            },
            _ => return Ok(None),
        };

        if !kind.takes_value() {
            if self.starts_field_declaration() {
                return Ok(None);
            }
            self.advance();
            return Ok(Some(JdlValidation::new(kind)));
        }
        // `min Integer` is a field named min, not a validation
        if *self.peek_at(1) != Token::LParen {
            return Ok(None);
        }
        self.advance();
        self.advance();

        let value = match self.advance() {
            Token::Regex(pattern) | Token::Str(pattern) if kind == ValidationKind::Pattern => {
                Value::String(pattern)
            }
            Token::Num(raw) if kind != ValidationKind::Pattern => number_value(&raw)
                .ok_or_else(|| self.invalid(format!("invalid number {}", raw)))?,
            Token::Ident(constant) if kind != ValidationKind::Pattern => self
                .constants
                .get(&constant)
                .cloned()
                .ok_or_else(|| self.invalid(format!("unknown constant {}", constant)))?,
            _ => return Err(self.invalid(format!("invalid value for {}", kind.name()))),
        };
        self.expect(Token::RParen, "')'")?;

        Ok(Some(JdlValidation::with_value(kind, value)))
    }

    fn parse_enum(&mut self, doc: Option<String>) -> Result<JdlEnum, ParseError> {
        let name = self.expect_ident("enum name")?;
        let mut jdl_enum = JdlEnum::new(name, Vec::<String>::new());
        jdl_enum.comment = doc;

        self.expect(Token::LBrace, "'{'")?;
        loop {
            let doc = self.take_doc();
            if self.eat(&Token::RBrace) {
                break;
            }
            let mut value = JdlEnumValue::new(self.expect_ident("enum value")?);
            if self.eat(&Token::LParen) {
                value.custom_value = Some(match self.advance() {
                    Token::Ident(s) | Token::Str(s) | Token::Num(s) => s,
                    _ => return Err(self.unexpected("custom enum value")),
                });
                self.expect(Token::RParen, "')'")?;
            }
            value.comment = doc;
            jdl_enum.values.push(value);
            self.eat(&Token::Comma);
        }

        Ok(jdl_enum)
    }

    fn parse_relationship_block(&mut self) -> Result<Vec<JdlRelationship>, ParseError> {
        let type_name = self.expect_ident("relationship type")?;
        let relationship_type: RelationshipType = type_name
            .parse()
            .map_err(|message: String| self.invalid(message))?;

        self.expect(Token::LBrace, "'{'")?;
        let mut relationships = Vec::new();
        loop {
            let doc = self.take_doc();
            if self.eat(&Token::RBrace) {
                if doc.is_some() {
                    return Err(self.invalid("dangling comment in relationship block"));
                }
                break;
            }
            relationships.push(self.parse_relationship(relationship_type, doc)?);
            self.eat(&Token::Comma);
        }
        Ok(relationships)
    }

    fn parse_relationship(
        &mut self,
        relationship_type: RelationshipType,
        comment_in_from: Option<String>,
    ) -> Result<JdlRelationship, ParseError> {
        let from_annotations = self.parse_annotations()?;
        let (from, injected_from, from_required) = self.parse_relationship_side()?;
        self.expect_keyword("to")?;
        let comment_in_to = self.take_doc();
        let to_annotations = self.parse_annotations()?;
        let (to, injected_to, to_required) = self.parse_relationship_side()?;

        let mut relationship = JdlRelationship::new(from, to, relationship_type);
        relationship.injected_field_in_from = injected_from;
        relationship.injected_field_in_to = injected_to;
        relationship.is_injected_field_in_from_required = from_required;
        relationship.is_injected_field_in_to_required = to_required;
        relationship.comment_in_from = comment_in_from;
        relationship.comment_in_to = comment_in_to;

        for (key, value) in from_annotations.into_iter().chain(to_annotations) {
            relationship
                .options
                .insert(key, value.unwrap_or(Value::Bool(true)));
        }

        if self.check_ident("with") {
            self.advance();
            let option = self.expect_ident("relationship option")?;
            if option != JPA_DERIVED_IDENTIFIER && option != "builtInEntity" {
                return Err(self.invalid(format!("unknown relationship option {}", option)));
            }
            relationship.options.insert(option, Value::Bool(true));
        }

        Ok(relationship)
    }

    /// `Entity`, `Entity{field}`, `Entity{field(display) required}`
    fn parse_relationship_side(&mut self) -> Result<(String, Option<String>, bool), ParseError> {
        let entity = self.expect_ident("entity name")?;
        if !self.eat(&Token::LBrace) {
            return Ok((entity, None, false));
        }

        let mut injected = self.expect_ident("injected field")?;
        if self.eat(&Token::LParen) {
            let display = self.expect_ident("display field")?;
            self.expect(Token::RParen, "')'")?;
            injected = format!("{}({})", injected, display);
        }
        let required = if self.check_ident("required") {
            self.advance();
            true
        } else {
            false
        };
        self.expect(Token::RBrace, "'}'")?;

        Ok((entity, Some(injected), required))
    }

    fn parse_entity_list(&mut self) -> Result<EntitySelection, ParseError> {
        if self.eat(&Token::Star) {
            return Ok(EntitySelection::All);
        }
        if self.check_ident("all") {
            self.advance();
            return Ok(EntitySelection::All);
        }

        let mut names = vec![self.expect_ident("entity name")?];
        while self.eat(&Token::Comma) {
            names.push(self.expect_ident("entity name")?);
        }
        Ok(EntitySelection::Named(names))
    }

    fn parse_exclusions(&mut self) -> Result<Vec<String>, ParseError> {
        if !self.check_ident("except") {
            return Ok(Vec::new());
        }
        self.advance();
        match self.parse_entity_list()? {
            EntitySelection::Named(names) => Ok(names),
            EntitySelection::All => Err(self.invalid("cannot exclude every entity")),
        }
    }

    fn parse_option(&mut self, keyword: &str) -> Result<JdlOption, ParseError> {
        let selection = self.parse_entity_list()?;

        let option = if EntityOption::is_binary_keyword(keyword) {
            self.expect_keyword("with")?;
            let value = match self.advance() {
                Token::Ident(s) | Token::Str(s) => s,
                _ => return Err(self.unexpected("option value")),
            };
            EntityOption::binary(keyword, &value).map_err(|message| self.invalid(message))?
        } else {
            EntityOption::unary(keyword)
                .ok_or_else(|| self.invalid(format!("unknown option {}", keyword)))?
        };

        let excluded = self.parse_exclusions()?;
        Ok(JdlOption::new(option, selection).excluding(excluded))
    }

    fn parse_application(&mut self) -> Result<JdlApplication, ParseError> {
        self.expect(Token::LBrace, "'{'")?;
        let mut config = None;
        let mut selection = EntitySelection::Named(Vec::new());
        let mut excluded = Vec::new();

        loop {
            if self.eat(&Token::RBrace) {
                break;
            }
            if self.check_ident("config") {
                self.advance();
                config = Some(self.parse_application_config()?);
            } else if self.check_ident("entities") {
                self.advance();
                selection = self.parse_entity_list()?;
                excluded = self.parse_exclusions()?;
            } else {
                return Err(self.unexpected("'config', 'entities' or '}'"));
            }
        }

        let config = config.ok_or_else(|| self.invalid("application without config block"))?;
        let base_name = config
            .get("baseName")
            .and_then(Value::as_str)
            .ok_or_else(|| self.invalid("application config must declare baseName"))?
            .to_string();

        let mut application = JdlApplication::new(base_name);
        application.config.extend(config);
        application.entity_names = selection;
        application.excluded_names = excluded;
        Ok(application)
    }

    fn parse_application_config(&mut self) -> Result<HashMap<String, Value>, ParseError> {
        self.expect(Token::LBrace, "'{'")?;
        let mut config = HashMap::new();
        loop {
            self.take_doc();
            if self.eat(&Token::RBrace) {
                break;
            }
            let key = self.expect_ident("config key")?;
            let value = self.parse_config_value()?;
            config.insert(key, value);
        }
        Ok(config)
    }

    fn parse_config_value(&mut self) -> Result<Value, ParseError> {
        if self.eat(&Token::LBracket) {
            let mut values = Vec::new();
            loop {
                if self.eat(&Token::RBracket) {
                    break;
                }
                values.push(self.parse_config_value()?);
                self.eat(&Token::Comma);
            }
            return Ok(Value::Array(values));
        }

        match self.advance() {
            Token::Ident(s) if s == "true" => Ok(Value::Bool(true)),
            Token::Ident(s) if s == "false" => Ok(Value::Bool(false)),
            Token::Ident(s) | Token::Str(s) => Ok(Value::String(s)),
            Token::Num(raw) => {
                number_value(&raw).ok_or_else(|| self.invalid(format!("invalid number {}", raw)))
            }
            _ => Err(self.invalid("invalid config value")),
        }
    }
}
