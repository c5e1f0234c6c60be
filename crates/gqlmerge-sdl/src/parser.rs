use std::collections::HashSet;

use gqlmerge_core::types::{
    Argument, Definition, Description, DescriptionStyle, Directive, DirectiveDefinition,
    DirectiveLocation, EnumType, EnumValueDefinition, FieldDefinition, InputObjectType,
    InputValueDefinition, Name, ObjectType, OperationType, RootOperation, ScalarType,
    SchemaDefinition, TypeRef, UnionType, Value,
};

use crate::error::{SdlError, Span};
use crate::lexer::{tokenize, SpannedToken};
use crate::strings::{block_string_value, unescape};
use crate::token::Token;

/// Keywords that may start a top-level type-system definition.
const DEFINITION_KEYWORDS: &[&str] = &[
    "schema",
    "scalar",
    "type",
    "interface",
    "union",
    "enum",
    "input",
    "directive",
    "extend",
];

/// Keywords that start an executable definition.
const OPERATION_KEYWORDS: &[&str] = &["query", "mutation", "subscription", "fragment"];

/// Deepest nesting of list types, list values and object values.
const MAX_NESTING: usize = 256;

/// Recursive descent parser for type-system SDL.
///
/// Consumes the flat token list produced by the lexer and produces the
/// document's definitions in source order.
struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
    source_len: usize,
    seen_schema: bool,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<SpannedToken>, source_len: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            source_len,
            seen_schema: false,
            depth: 0,
        }
    }

    // -- Cursor helpers --

    fn peek(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.pos)
    }

    fn peek_token(&self) -> Option<&Token> {
        self.peek().map(|st| &st.token)
    }

    fn at(&self, token: &Token) -> bool {
        self.peek_token() == Some(token)
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.peek()
            .is_some_and(|st| st.token == Token::Name && st.text == keyword)
    }

    fn advance(&mut self) -> Option<SpannedToken> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    /// Consumes the next token if it is `token`.
    fn eat(&mut self, token: &Token) -> bool {
        if self.at(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<SpannedToken, SdlError> {
        match self.advance() {
            Some(st) if st.token == *expected => Ok(st),
            Some(st) => Err(unexpected(expected.description(), &st)),
            None => Err(self.end_of_input(expected.description())),
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<SpannedToken, SdlError> {
        match self.advance() {
            Some(st) if st.token == Token::Name && st.text == keyword => Ok(st),
            Some(st) => Err(unexpected(&format!("'{keyword}'"), &st)),
            None => Err(self.end_of_input(&format!("'{keyword}'"))),
        }
    }

    fn expect_name(&mut self, context: &str) -> Result<(Name, Span), SdlError> {
        match self.advance() {
            Some(st) if st.token == Token::Name => {
                let name = Name::new(&st.text).map_err(|_| unexpected(context, &st))?;
                Ok((name, st.span))
            }
            Some(st) => Err(unexpected(context, &st)),
            None => Err(self.end_of_input(context)),
        }
    }

    /// Runs `f` one nesting level deeper, failing past `MAX_NESTING`.
    fn nested<T>(
        &mut self,
        span: Span,
        f: impl FnOnce(&mut Self) -> Result<T, SdlError>,
    ) -> Result<T, SdlError> {
        if self.depth >= MAX_NESTING {
            return Err(SdlError::NestingTooDeep {
                limit: MAX_NESTING,
                span,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn end_of_input(&self, expected: &str) -> SdlError {
        SdlError::UnexpectedEndOfInput {
            expected: expected.to_string(),
            span: Span::new(self.source_len, self.source_len),
        }
    }

    // -- Grammar productions --

    /// document = definition*
    fn parse_document(&mut self) -> Result<Vec<Definition>, Vec<SdlError>> {
        let mut definitions = Vec::new();
        let mut errors = Vec::new();

        while self.peek().is_some() {
            let start = self.pos;
            match self.parse_definition() {
                Ok(definition) => definitions.push(definition),
                Err(e) => {
                    errors.push(e);
                    let open_braces = self.open_braces_since(start);
                    self.recover_to_next_definition(open_braces);
                    if self.pos == start {
                        self.advance();
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(definitions)
        } else {
            Err(errors)
        }
    }

    /// Braces opened and not yet closed by the tokens consumed since `start`.
    fn open_braces_since(&self, start: usize) -> i32 {
        let consumed = self.tokens.get(start..self.pos).unwrap_or_default();
        let depth = consumed.iter().fold(0i32, |depth, st| match st.token {
            Token::LBrace => depth + 1,
            Token::RBrace => depth - 1,
            _ => depth,
        });
        depth.max(0)
    }

    /// Skip tokens until the next definition keyword at top level.
    ///
    /// `brace_depth` is the number of braces the failed definition left open.
    fn recover_to_next_definition(&mut self, mut brace_depth: i32) {
        while let Some(st) = self.peek() {
            match st.token {
                Token::LBrace => {
                    brace_depth += 1;
                    self.advance();
                }
                Token::RBrace => {
                    brace_depth -= 1;
                    self.advance();
                    if brace_depth <= 0 {
                        return;
                    }
                }
                Token::Name
                    if brace_depth == 0
                        && (DEFINITION_KEYWORDS.contains(&st.text.as_str())
                            || OPERATION_KEYWORDS.contains(&st.text.as_str())) =>
                {
                    return
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// definition = description? (schema | scalar | type | interface | union
    ///            | enum | input | directive) | extension
    fn parse_definition(&mut self) -> Result<Definition, SdlError> {
        let description_token = self.peek().cloned();
        let description = self.parse_description()?;

        let st = match self.peek() {
            Some(st) => st.clone(),
            None => return Err(self.end_of_input("definition")),
        };
        if st.token == Token::LBrace {
            return Err(SdlError::UnsupportedOperation {
                keyword: "{".to_string(),
                span: st.span,
            });
        }
        if st.token != Token::Name {
            return Err(unexpected("definition", &st));
        }

        let keyword = st.text.as_str();
        if OPERATION_KEYWORDS.contains(&keyword) {
            self.advance();
            return Err(SdlError::UnsupportedOperation {
                keyword: st.text.clone(),
                span: st.span,
            });
        }
        if !DEFINITION_KEYWORDS.contains(&keyword) {
            return Err(unexpected("definition keyword", &st));
        }
        // Extensions take no description; `#` comments above them are fine.
        let described = description
            .as_ref()
            .is_some_and(|d| d.style != DescriptionStyle::Comment);
        if keyword == "extend" && described {
            if let Some(token) = &description_token {
                return Err(unexpected("extension without a description", token));
            }
        }
        self.advance();

        match keyword {
            "extend" => self.parse_extension(),
            "schema" => {
                let schema = self.parse_schema(description)?;
                if std::mem::replace(&mut self.seen_schema, true) {
                    return Err(SdlError::DuplicateSchema { span: st.span });
                }
                Ok(Definition::Schema(schema))
            }
            "directive" => self
                .parse_directive_definition(description)
                .map(Definition::Directive),
            other => self.parse_type_definition(other, description),
        }
    }

    /// Parses the body following a type keyword that may also be extended.
    fn parse_type_definition(
        &mut self,
        keyword: &str,
        description: Option<Description>,
    ) -> Result<Definition, SdlError> {
        match keyword {
            "scalar" => self.parse_scalar(description).map(Definition::Scalar),
            "type" => self.parse_object("type", description).map(Definition::Object),
            "interface" => self
                .parse_object("interface", description)
                .map(Definition::Interface),
            "union" => self.parse_union(description).map(Definition::Union),
            "enum" => self.parse_enum(description).map(Definition::Enum),
            "input" => self.parse_input_object(description).map(Definition::InputObject),
            _ => Err(SdlError::UnexpectedToken {
                expected: "definition keyword".to_string(),
                found: format!("'{keyword}'"),
                span: self.tokens[self.pos.saturating_sub(1)].span,
            }),
        }
    }

    /// extension = "extend" (schema | scalar | type | interface | union | enum | input)
    fn parse_extension(&mut self) -> Result<Definition, SdlError> {
        let st = match self.advance() {
            Some(st) => st,
            None => return Err(self.end_of_input("extendable definition")),
        };
        let body = match (st.token == Token::Name).then_some(st.text.as_str()) {
            Some("schema") => Definition::Schema(self.parse_schema(None)?),
            Some(
                keyword @ ("scalar" | "type" | "interface" | "union" | "enum" | "input"),
            ) => self.parse_type_definition(keyword, None)?,
            _ => return Err(unexpected("extendable definition keyword", &st)),
        };
        Ok(Definition::Extension(Box::new(body)))
    }

    /// description = string | block_string | (the `#` comments on the next token)
    fn parse_description(&mut self) -> Result<Option<Description>, SdlError> {
        match self.peek_token() {
            Some(Token::StringValue | Token::BlockStringValue) => {
                let Some(st) = self.advance() else {
                    return Ok(None);
                };
                let text = string_value(&st)?;
                Ok(Some(if st.token == Token::BlockStringValue {
                    Description::block(text)
                } else {
                    Description::quoted(text)
                }))
            }
            Some(_) => Ok(self
                .peek()
                .filter(|st| !st.comments.is_empty())
                .map(|st| Description::comment(st.comments.join("\n")))),
            None => Ok(None),
        }
    }

    /// schema = "schema" directives? ("{" (operation ":" name)* "}")?
    fn parse_schema(
        &mut self,
        description: Option<Description>,
    ) -> Result<SchemaDefinition, SdlError> {
        let directives = self.parse_directives()?;
        let mut root_operations: Vec<RootOperation> = Vec::new();

        if self.eat(&Token::LBrace) {
            while !self.at(&Token::RBrace) {
                let st = match self.advance() {
                    Some(st) => st,
                    None => return Err(self.end_of_input("'}'")),
                };
                let operation = (st.token == Token::Name)
                    .then(|| OperationType::from_keyword(&st.text))
                    .flatten()
                    .ok_or_else(|| unexpected("'query', 'mutation' or 'subscription'", &st))?;
                if root_operations.iter().any(|r| r.operation == operation) {
                    return Err(SdlError::DuplicateMember {
                        member: "root operation",
                        name: operation.to_string(),
                        owner: "schema".to_string(),
                        span: st.span,
                    });
                }
                self.expect(&Token::Colon)?;
                let (named_type, _) = self.expect_name("root operation type")?;
                root_operations.push(RootOperation {
                    operation,
                    named_type,
                });
            }
            self.expect(&Token::RBrace)?;
        }

        Ok(SchemaDefinition {
            description,
            directives,
            root_operations,
        })
    }

    /// scalar = "scalar" name directives?
    fn parse_scalar(&mut self, description: Option<Description>) -> Result<ScalarType, SdlError> {
        let (name, _) = self.expect_name("scalar name")?;
        let directives = self.parse_directives()?;
        Ok(ScalarType {
            description,
            name,
            directives,
        })
    }

    /// object = ("type" | "interface") name implements? directives? fields?
    fn parse_object(
        &mut self,
        keyword: &str,
        description: Option<Description>,
    ) -> Result<ObjectType, SdlError> {
        let (name, _) = self.expect_name(&format!("{keyword} name"))?;
        let owner = format!("{keyword} {name}");

        let mut interfaces: Vec<Name> = Vec::new();
        if self.at_keyword("implements") {
            self.advance();
            self.eat(&Token::Amp);
            loop {
                let (interface, span) = self.expect_name("interface name")?;
                if interfaces.contains(&interface) {
                    return Err(duplicate("interface", &interface, &owner, span));
                }
                interfaces.push(interface);
                if !self.eat(&Token::Amp) {
                    break;
                }
            }
        }

        let directives = self.parse_directives()?;

        let mut fields = Vec::new();
        if self.eat(&Token::LBrace) {
            let mut seen = HashSet::new();
            while !self.at(&Token::RBrace) && self.peek().is_some() {
                let (field, span) = self.parse_field(&owner)?;
                if !seen.insert(field.name.clone()) {
                    return Err(duplicate("field", &field.name, &owner, span));
                }
                fields.push(field);
            }
            self.expect(&Token::RBrace)?;
        }

        Ok(ObjectType {
            description,
            name,
            interfaces,
            directives,
            fields,
        })
    }

    /// field = description? name arguments? ":" type directives?
    fn parse_field(&mut self, owner: &str) -> Result<(FieldDefinition, Span), SdlError> {
        let description = self.parse_description()?;
        let (name, span) = self.expect_name("field name")?;
        let arguments = if self.at(&Token::LParen) {
            self.parse_arguments_definition(&format!("{owner}.{name}"))?
        } else {
            Vec::new()
        };
        self.expect(&Token::Colon)?;
        let ty = self.parse_type()?;
        let directives = self.parse_directives()?;

        Ok((
            FieldDefinition {
                description,
                name,
                arguments,
                ty,
                directives,
            },
            span,
        ))
    }

    /// arguments_definition = "(" input_value* ")"
    fn parse_arguments_definition(
        &mut self,
        owner: &str,
    ) -> Result<Vec<InputValueDefinition>, SdlError> {
        self.expect(&Token::LParen)?;
        let mut arguments: Vec<InputValueDefinition> = Vec::new();
        while !self.at(&Token::RParen) && self.peek().is_some() {
            let (argument, span) = self.parse_input_value()?;
            if arguments.iter().any(|a| a.name == argument.name) {
                return Err(duplicate("argument", &argument.name, owner, span));
            }
            arguments.push(argument);
        }
        self.expect(&Token::RParen)?;
        Ok(arguments)
    }

    /// input_value = description? name ":" type ("=" value)? directives?
    fn parse_input_value(&mut self) -> Result<(InputValueDefinition, Span), SdlError> {
        let description = self.parse_description()?;
        let (name, span) = self.expect_name("argument name")?;
        self.expect(&Token::Colon)?;
        let ty = self.parse_type()?;
        let default_value = if self.eat(&Token::Equals) {
            Some(self.parse_value()?)
        } else {
            None
        };
        let directives = self.parse_directives()?;

        Ok((
            InputValueDefinition {
                description,
                name,
                ty,
                default_value,
                directives,
            },
            span,
        ))
    }

    /// type = name | "[" type "]" followed by an optional "!"
    fn parse_type(&mut self) -> Result<TypeRef, SdlError> {
        let open = self
            .peek()
            .filter(|st| st.token == Token::LBracket)
            .map(|st| st.span);
        let base = if let Some(open) = open {
            self.pos += 1;
            let inner = self.nested(open, Self::parse_type)?;
            self.expect(&Token::RBracket)?;
            TypeRef::list(inner)
        } else {
            TypeRef::named(self.expect_name("type")?.0)
        };

        if self.eat(&Token::Bang) {
            Ok(TypeRef::non_null(base))
        } else {
            Ok(base)
        }
    }

    /// union = "union" name directives? ("=" "|"? name ("|" name)*)?
    fn parse_union(&mut self, description: Option<Description>) -> Result<UnionType, SdlError> {
        let (name, _) = self.expect_name("union name")?;
        let owner = format!("union {name}");
        let directives = self.parse_directives()?;

        let mut members: Vec<Name> = Vec::new();
        if self.eat(&Token::Equals) {
            self.eat(&Token::Pipe);
            loop {
                let (member, span) = self.expect_name("union member")?;
                if members.contains(&member) {
                    return Err(duplicate("union member", &member, &owner, span));
                }
                members.push(member);
                if !self.eat(&Token::Pipe) {
                    break;
                }
            }
        }

        Ok(UnionType {
            description,
            name,
            directives,
            members,
        })
    }

    /// enum = "enum" name directives? ("{" enum_value* "}")?
    fn parse_enum(&mut self, description: Option<Description>) -> Result<EnumType, SdlError> {
        let (name, _) = self.expect_name("enum name")?;
        let owner = format!("enum {name}");
        let directives = self.parse_directives()?;

        let mut values: Vec<EnumValueDefinition> = Vec::new();
        if self.eat(&Token::LBrace) {
            while !self.at(&Token::RBrace) && self.peek().is_some() {
                let value_description = self.parse_description()?;
                let (value_name, span) = self.expect_name("enum value")?;
                if matches!(value_name.as_str(), "true" | "false" | "null") {
                    return Err(SdlError::ReservedEnumValue {
                        name: value_name.to_string(),
                        span,
                    });
                }
                if values.iter().any(|v| v.name == value_name) {
                    return Err(duplicate("enum value", &value_name, &owner, span));
                }
                let value_directives = self.parse_directives()?;
                values.push(EnumValueDefinition {
                    description: value_description,
                    name: value_name,
                    directives: value_directives,
                });
            }
            self.expect(&Token::RBrace)?;
        }

        Ok(EnumType {
            description,
            name,
            directives,
            values,
        })
    }

    /// input = "input" name directives? ("{" input_value* "}")?
    fn parse_input_object(
        &mut self,
        description: Option<Description>,
    ) -> Result<InputObjectType, SdlError> {
        let (name, _) = self.expect_name("input name")?;
        let owner = format!("input {name}");
        let directives = self.parse_directives()?;

        let mut fields: Vec<InputValueDefinition> = Vec::new();
        if self.eat(&Token::LBrace) {
            while !self.at(&Token::RBrace) && self.peek().is_some() {
                let (field, span) = self.parse_input_value()?;
                if fields.iter().any(|f| f.name == field.name) {
                    return Err(duplicate("input field", &field.name, &owner, span));
                }
                fields.push(field);
            }
            self.expect(&Token::RBrace)?;
        }

        Ok(InputObjectType {
            description,
            name,
            directives,
            fields,
        })
    }

    /// directive_definition = "directive" "@" name arguments? "repeatable"?
    ///                        "on" "|"? location ("|" location)*
    fn parse_directive_definition(
        &mut self,
        description: Option<Description>,
    ) -> Result<DirectiveDefinition, SdlError> {
        self.expect(&Token::At)?;
        let (name, _) = self.expect_name("directive name")?;
        let owner = format!("directive @{name}");
        let arguments = if self.at(&Token::LParen) {
            self.parse_arguments_definition(&owner)?
        } else {
            Vec::new()
        };

        let repeatable = self.at_keyword("repeatable");
        if repeatable {
            self.advance();
        }

        self.expect_keyword("on")?;
        self.eat(&Token::Pipe);
        let mut locations: Vec<DirectiveLocation> = Vec::new();
        loop {
            let (location_name, span) = self.expect_name("directive location")?;
            let location = location_name.as_str().parse::<DirectiveLocation>().map_err(|_| {
                SdlError::UnknownDirectiveLocation {
                    name: location_name.to_string(),
                    span,
                }
            })?;
            if locations.contains(&location) {
                return Err(duplicate("directive location", &location_name, &owner, span));
            }
            locations.push(location);
            if !self.eat(&Token::Pipe) {
                break;
            }
        }

        Ok(DirectiveDefinition {
            description,
            name,
            arguments,
            repeatable,
            locations,
        })
    }

    /// directives = ("@" name ("(" (name ":" value)* ")")?)*
    fn parse_directives(&mut self) -> Result<Vec<Directive>, SdlError> {
        let mut directives = Vec::new();
        while self.eat(&Token::At) {
            let (name, _) = self.expect_name("directive name")?;
            let mut arguments = Vec::new();
            if self.eat(&Token::LParen) {
                while !self.at(&Token::RParen) && self.peek().is_some() {
                    let (arg_name, _) = self.expect_name("argument name")?;
                    self.expect(&Token::Colon)?;
                    let value = self.parse_value()?;
                    arguments.push(Argument {
                        name: arg_name,
                        value,
                    });
                }
                self.expect(&Token::RParen)?;
            }
            directives.push(Directive::with_arguments(name, arguments));
        }
        Ok(directives)
    }

    /// value = int | float | string | boolean | null | enum | list | object
    ///
    /// Only constant values are accepted; variables are rejected.
    fn parse_value(&mut self) -> Result<Value, SdlError> {
        let st = match self.advance() {
            Some(st) => st,
            None => return Err(self.end_of_input("value")),
        };

        match st.token {
            Token::IntValue => Ok(Value::Int(st.text)),
            Token::FloatValue => Ok(Value::Float(st.text)),
            Token::StringValue | Token::BlockStringValue => Ok(Value::String(string_value(&st)?)),
            Token::Name => match st.text.as_str() {
                "true" => Ok(Value::Boolean(true)),
                "false" => Ok(Value::Boolean(false)),
                "null" => Ok(Value::Null),
                _ => Name::new(&st.text)
                    .map(Value::Enum)
                    .map_err(|_| unexpected("value", &st)),
            },
            Token::LBracket => self.nested(st.span, |p| {
                let mut items = Vec::new();
                while !p.at(&Token::RBracket) && p.peek().is_some() {
                    items.push(p.parse_value()?);
                }
                p.expect(&Token::RBracket)?;
                Ok(Value::List(items))
            }),
            Token::LBrace => self.nested(st.span, |p| {
                let mut fields = Vec::new();
                while !p.at(&Token::RBrace) && p.peek().is_some() {
                    let (field, _) = p.expect_name("object field name")?;
                    p.expect(&Token::Colon)?;
                    fields.push((field, p.parse_value()?));
                }
                p.expect(&Token::RBrace)?;
                Ok(Value::Object(fields))
            }),
            _ => Err(unexpected("constant value", &st)),
        }
    }
}

fn unexpected(expected: &str, st: &SpannedToken) -> SdlError {
    SdlError::UnexpectedToken {
        expected: expected.to_string(),
        found: format!("{} ('{}')", st.token.description(), st.text),
        span: st.span,
    }
}

fn duplicate(member: &'static str, name: &Name, owner: &str, span: Span) -> SdlError {
    SdlError::DuplicateMember {
        member,
        name: name.to_string(),
        owner: owner.to_string(),
        span,
    }
}

/// Decodes a string or block string token into its value.
fn string_value(st: &SpannedToken) -> Result<String, SdlError> {
    let text = st.text.as_str();
    match st.token {
        Token::BlockStringValue => {
            let inner = text.get(3..text.len().saturating_sub(3)).unwrap_or("");
            Ok(block_string_value(inner))
        }
        _ => {
            let inner = text.get(1..text.len().saturating_sub(1)).unwrap_or("");
            unescape(inner, st.span)
        }
    }
}

/// Parses SDL source text into its type-system definitions.
///
/// All syntax errors in the document are collected and returned together.
///
/// # Errors
///
/// Returns a list of `SdlError` values describing every lexing or parsing
/// error encountered.
pub fn parse(source: &str) -> Result<Vec<Definition>, Vec<SdlError>> {
    let tokens = tokenize(source)?;
    let mut parser = Parser::new(tokens, source.len());
    let definitions = parser.parse_document()?;
    tracing::debug!(definitions = definitions.len(), "parsed document");
    Ok(definitions)
}
