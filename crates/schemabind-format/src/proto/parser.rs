//! Recursive-descent parser for proto2/proto3 definitions.

use std::collections::HashSet;

use super::descriptor::{
    Constant, Enum, EnumValue, Extend, Field, FieldType, Import, ImportKind, Label, Message,
    Method, NumberRange, Oneof, OptionEntry, ProtoFile, Reserved, Service, Syntax,
    MAX_FIELD_NUMBER, RESERVED_FIELD_NUMBERS,
};
use super::lexer::{tokenize, Token, TokenKind};
use super::ParseError;

type PResult<T> = Result<T, ParseError>;

const MAP_KEY_TYPES: [&str; 12] = [
    "int32", "int64", "uint32", "uint64", "sint32", "sint64", "fixed32", "fixed64", "sfixed32",
    "sfixed64", "bool", "string",
];

/// Parse definition text into a descriptor tree.
pub fn parse_proto(text: &str) -> PResult<ProtoFile> {
    let tokens = tokenize(text)?;
    Parser::new(tokens).file()
}

#[derive(Clone, Copy)]
enum RangeContext {
    Fields,
    EnumValues,
}

impl RangeContext {
    fn max(self) -> i64 {
        match self {
            RangeContext::Fields => MAX_FIELD_NUMBER,
            RangeContext::EnumValues => i64::from(i32::MAX),
        }
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    syntax: Syntax,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            syntax: Syntax::Proto2,
        }
    }

    // Token helpers.

    fn peek(&self) -> &Token {
        // The lexer always terminates the stream with an Eof token.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind_at(&self, offset: usize) -> &TokenKind {
        let index = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[index].kind
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn error_at(token: &Token, message: impl Into<String>) -> ParseError {
        ParseError::new(token.line, token.column, message)
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.peek();
        let found = match &token.kind {
            TokenKind::Ident(ident) => format!("'{ident}'"),
            TokenKind::Int(text) | TokenKind::Float(text) => format!("number {text}"),
            TokenKind::Str(text) => format!("string {text:?}"),
            TokenKind::Symbol(c) => format!("'{c}'"),
            TokenKind::Eof => "end of input".to_string(),
        };
        Self::error_at(token, format!("expected {expected}, found {found}"))
    }

    fn is_symbol(&self, symbol: char) -> bool {
        self.peek().kind == TokenKind::Symbol(symbol)
    }

    fn eat_symbol(&mut self, symbol: char) -> bool {
        if self.is_symbol(symbol) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_symbol(&mut self, symbol: char) -> PResult<()> {
        if self.eat_symbol(symbol) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{symbol}'")))
        }
    }

    fn is_keyword(&self, keyword: &str) -> bool {
        matches!(&self.peek().kind, TokenKind::Ident(ident) if ident == keyword)
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.is_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> PResult<()> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{keyword}'")))
        }
    }

    fn ident(&mut self) -> PResult<String> {
        match &self.peek().kind {
            TokenKind::Ident(ident) => {
                let ident = ident.clone();
                self.advance();
                Ok(ident)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn full_ident(&mut self) -> PResult<String> {
        let mut name = self.ident()?;
        while self.is_symbol('.') {
            self.advance();
            name.push('.');
            name.push_str(&self.ident()?);
        }
        Ok(name)
    }

    /// Message or enum reference, optionally fully qualified with a leading dot.
    fn type_name(&mut self) -> PResult<String> {
        if self.eat_symbol('.') {
            Ok(format!(".{}", self.full_ident()?))
        } else {
            self.full_ident()
        }
    }

    fn string_literal(&mut self) -> PResult<String> {
        let mut out = match &self.peek().kind {
            TokenKind::Str(text) => text.clone(),
            _ => return Err(self.unexpected("string literal")),
        };
        self.advance();
        // Adjacent literals concatenate.
        while let TokenKind::Str(text) = &self.peek().kind {
            out.push_str(text);
            self.advance();
        }
        Ok(out)
    }

    fn signed_int(&mut self) -> PResult<(i128, Token)> {
        let negative = self.eat_symbol('-');
        if !negative {
            self.eat_symbol('+');
        }
        let token = self.peek().clone();
        let TokenKind::Int(text) = &token.kind else {
            return Err(self.unexpected("integer"));
        };
        let value = parse_int(text).ok_or_else(|| {
            Self::error_at(&token, format!("integer literal out of range: {text}"))
        })?;
        self.advance();
        Ok((if negative { -value } else { value }, token))
    }

    // Grammar.

    fn file(mut self) -> PResult<ProtoFile> {
        if self.is_keyword("syntax") || self.is_keyword("edition") {
            self.syntax_statement()?;
        }

        let mut file = ProtoFile {
            syntax: self.syntax.clone(),
            package: None,
            imports: Vec::new(),
            options: Vec::new(),
            messages: Vec::new(),
            enums: Vec::new(),
            services: Vec::new(),
            extends: Vec::new(),
        };
        let mut names = HashSet::new();

        loop {
            let token = self.peek().clone();
            match &token.kind {
                TokenKind::Eof => break,
                TokenKind::Symbol(';') => {
                    self.advance();
                }
                TokenKind::Ident(keyword) => match keyword.as_str() {
                    "package" => {
                        if file.package.is_some() {
                            return Err(Self::error_at(&token, "multiple package declarations"));
                        }
                        self.advance();
                        file.package = Some(self.full_ident()?);
                        self.expect_symbol(';')?;
                    }
                    "import" => file.imports.push(self.import()?),
                    "option" => file.options.push(self.option_statement()?),
                    "message" => {
                        let message = self.message()?;
                        declare(&mut names, &message.name, &token)?;
                        file.messages.push(message);
                    }
                    "enum" => {
                        let e = self.enum_type()?;
                        declare(&mut names, &e.name, &token)?;
                        file.enums.push(e);
                    }
                    "service" => {
                        let service = self.service()?;
                        declare(&mut names, &service.name, &token)?;
                        file.services.push(service);
                    }
                    "extend" => file.extends.push(self.extend()?),
                    "syntax" | "edition" => {
                        return Err(Self::error_at(
                            &token,
                            "syntax must be the first statement of the file",
                        ))
                    }
                    _ => return Err(self.unexpected("top-level declaration")),
                },
                _ => return Err(self.unexpected("top-level declaration")),
            }
        }

        Ok(file)
    }

    fn syntax_statement(&mut self) -> PResult<()> {
        let keyword = self.ident()?;
        self.expect_symbol('=')?;
        let token = self.peek().clone();
        let value = self.string_literal()?;
        self.expect_symbol(';')?;

        self.syntax = match (keyword.as_str(), value.as_str()) {
            ("syntax", "proto2") => Syntax::Proto2,
            ("syntax", "proto3") => Syntax::Proto3,
            ("edition", _) if !value.is_empty() => Syntax::Edition(value),
            _ => {
                return Err(Self::error_at(
                    &token,
                    format!("unsupported {keyword} {value:?}"),
                ))
            }
        };
        Ok(())
    }

    fn import(&mut self) -> PResult<Import> {
        self.expect_keyword("import")?;
        let kind = if self.eat_keyword("weak") {
            ImportKind::Weak
        } else if self.eat_keyword("public") {
            ImportKind::Public
        } else {
            ImportKind::Default
        };
        let path = self.string_literal()?;
        self.expect_symbol(';')?;
        Ok(Import { path, kind })
    }

    fn option_statement(&mut self) -> PResult<OptionEntry> {
        self.expect_keyword("option")?;
        let option = self.option_entry()?;
        self.expect_symbol(';')?;
        Ok(option)
    }

    /// `name = constant`, shared by statements and bracketed field options.
    fn option_entry(&mut self) -> PResult<OptionEntry> {
        let name = self.option_name()?;
        self.expect_symbol('=')?;
        let value = self.constant()?;
        Ok(OptionEntry { name, value })
    }

    fn option_name(&mut self) -> PResult<String> {
        let mut name = String::new();
        loop {
            if self.eat_symbol('(') {
                name.push('(');
                if self.eat_symbol('.') {
                    name.push('.');
                }
                name.push_str(&self.full_ident()?);
                self.expect_symbol(')')?;
                name.push(')');
            } else {
                name.push_str(&self.ident()?);
            }
            if !self.eat_symbol('.') {
                return Ok(name);
            }
            name.push('.');
        }
    }

    fn constant(&mut self) -> PResult<Constant> {
        let token = self.peek().clone();
        match &token.kind {
            TokenKind::Str(_) => Ok(Constant::Str(self.string_literal()?)),
            TokenKind::Symbol('{') => self.aggregate(),
            TokenKind::Symbol('-' | '+') => {
                let sign = if self.eat_symbol('-') { "-" } else { "" };
                self.eat_symbol('+');
                self.number_constant(sign)
            }
            TokenKind::Int(_) | TokenKind::Float(_) => self.number_constant(""),
            TokenKind::Ident(ident) => match ident.as_str() {
                "true" => {
                    self.advance();
                    Ok(Constant::Bool(true))
                }
                "false" => {
                    self.advance();
                    Ok(Constant::Bool(false))
                }
                "inf" | "nan" => self.number_constant(""),
                _ => Ok(Constant::Ident(self.full_ident()?)),
            },
            _ => Err(self.unexpected("constant")),
        }
    }

    fn number_constant(&mut self, sign: &str) -> PResult<Constant> {
        let token = self.advance();
        match &token.kind {
            TokenKind::Int(text) => {
                let value = parse_int(text).ok_or_else(|| {
                    Self::error_at(&token, format!("integer literal out of range: {text}"))
                })?;
                Ok(Constant::Int(if sign == "-" { -value } else { value }))
            }
            TokenKind::Float(text) => Ok(Constant::Float(format!("{sign}{text}"))),
            TokenKind::Ident(ident) if ident == "inf" || ident == "nan" => {
                Ok(Constant::Float(format!("{sign}{ident}")))
            }
            _ => Err(Self::error_at(&token, "expected numeric constant")),
        }
    }

    fn aggregate(&mut self) -> PResult<Constant> {
        let open = self.peek().clone();
        self.expect_symbol('{')?;
        let mut depth = 1usize;
        let mut parts = Vec::new();
        loop {
            let token = self.advance();
            match &token.kind {
                TokenKind::Eof => {
                    return Err(Self::error_at(&open, "unterminated aggregate option value"))
                }
                TokenKind::Symbol('{') => depth += 1,
                TokenKind::Symbol('}') => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(Constant::Aggregate(parts.join(" ")));
                    }
                }
                _ => {}
            }
            parts.push(match &token.kind {
                TokenKind::Ident(text) | TokenKind::Int(text) | TokenKind::Float(text) => {
                    text.clone()
                }
                TokenKind::Str(text) => format!("{text:?}"),
                TokenKind::Symbol(c) => c.to_string(),
                TokenKind::Eof => String::new(),
            });
        }
    }

    fn field_options(&mut self) -> PResult<Vec<OptionEntry>> {
        let mut options = Vec::new();
        if self.eat_symbol('[') {
            loop {
                options.push(self.option_entry()?);
                if !self.eat_symbol(',') {
                    break;
                }
            }
            self.expect_symbol(']')?;
        }
        Ok(options)
    }

    fn message(&mut self) -> PResult<Message> {
        let keyword = self.peek().clone();
        self.expect_keyword("message")?;
        let mut message = Message::named(self.ident()?);
        self.expect_symbol('{')?;
        self.message_body(&mut message)?;
        check_message(&message, &keyword)?;
        Ok(message)
    }

    fn message_body(&mut self, message: &mut Message) -> PResult<()> {
        let mut names = HashSet::new();
        loop {
            let token = self.peek().clone();
            let keyword = match &token.kind {
                TokenKind::Symbol('}') => {
                    self.advance();
                    return Ok(());
                }
                TokenKind::Symbol(';') => {
                    self.advance();
                    continue;
                }
                TokenKind::Eof => {
                    return Err(self.unexpected(&format!("'}}' closing message {}", message.name)))
                }
                TokenKind::Ident(ident) => ident.clone(),
                _ => return Err(self.unexpected("message element")),
            };

            match keyword.as_str() {
                "message" => {
                    let nested = self.message()?;
                    declare(&mut names, &nested.name, &token)?;
                    message.messages.push(nested);
                }
                "enum" => {
                    let nested = self.enum_type()?;
                    declare(&mut names, &nested.name, &token)?;
                    message.enums.push(nested);
                }
                "extend" => message.extends.push(self.extend()?),
                "option" => message.options.push(self.option_statement()?),
                "oneof" => {
                    let oneof = self.oneof(message)?;
                    message.oneofs.push(oneof);
                }
                "reserved" => message.reserved.push(self.reserved(RangeContext::Fields)?),
                "extensions" => {
                    self.advance();
                    message.extensions.extend(self.ranges(RangeContext::Fields)?);
                    self.field_options()?;
                    self.expect_symbol(';')?;
                }
                "map" if self.peek_kind_at(1) == &TokenKind::Symbol('<') => {
                    let field = self.map_field()?;
                    message.fields.push(field);
                }
                _ => {
                    let field = self.labelled_field(Some(&mut *message))?;
                    message.fields.push(field);
                }
            }
        }
    }

    /// A field with optional label. Proto2 groups also add their nested message.
    fn labelled_field(&mut self, parent: Option<&mut Message>) -> PResult<Field> {
        let token = self.peek().clone();
        let label = if self.eat_keyword("optional") {
            Some(Label::Optional)
        } else if self.eat_keyword("required") {
            Some(Label::Required)
        } else if self.eat_keyword("repeated") {
            Some(Label::Repeated)
        } else {
            None
        };
        if label == Some(Label::Required) && self.syntax == Syntax::Proto3 {
            return Err(Self::error_at(
                &token,
                "required fields are not allowed in proto3",
            ));
        }

        if self.is_keyword("group") && matches!(self.peek_kind_at(1), TokenKind::Ident(_)) {
            return self.group(label, parent);
        }
        self.field_rest(label)
    }

    fn field_rest(&mut self, label: Option<Label>) -> PResult<Field> {
        let field_type = FieldType::Named(self.type_name()?);
        let name = self.ident()?;
        self.expect_symbol('=')?;
        let number = self.field_number()?;
        let options = self.field_options()?;
        self.expect_symbol(';')?;
        Ok(Field {
            name,
            label,
            field_type,
            number,
            options,
        })
    }

    fn group(&mut self, label: Option<Label>, parent: Option<&mut Message>) -> PResult<Field> {
        let token = self.peek().clone();
        if self.syntax == Syntax::Proto3 {
            return Err(Self::error_at(&token, "groups are not allowed in proto3"));
        }
        self.expect_keyword("group")?;
        let type_name = self.ident()?;
        self.expect_symbol('=')?;
        let number = self.field_number()?;
        let options = self.field_options()?;
        self.expect_symbol('{')?;
        let mut nested = Message::named(type_name.clone());
        self.message_body(&mut nested)?;
        check_message(&nested, &token)?;

        match parent {
            Some(parent) => parent.messages.push(nested),
            None => return Err(Self::error_at(&token, "group declared outside a message")),
        }
        Ok(Field {
            name: type_name.to_ascii_lowercase(),
            label,
            field_type: FieldType::Named(type_name),
            number,
            options,
        })
    }

    fn map_field(&mut self) -> PResult<Field> {
        self.expect_keyword("map")?;
        self.expect_symbol('<')?;
        let key_token = self.peek().clone();
        let key = self.ident()?;
        if !MAP_KEY_TYPES.contains(&key.as_str()) {
            return Err(Self::error_at(&key_token, format!("invalid map key type {key}")));
        }
        self.expect_symbol(',')?;
        let value = self.type_name()?;
        self.expect_symbol('>')?;
        let name = self.ident()?;
        self.expect_symbol('=')?;
        let number = self.field_number()?;
        let options = self.field_options()?;
        self.expect_symbol(';')?;
        Ok(Field {
            name,
            label: None,
            field_type: FieldType::Map { key, value },
            number,
            options,
        })
    }

    fn field_number(&mut self) -> PResult<i64> {
        let (value, token) = self.signed_int()?;
        let number = i64::try_from(value)
            .ok()
            .filter(|n| (1..=MAX_FIELD_NUMBER).contains(n))
            .ok_or_else(|| {
                Self::error_at(
                    &token,
                    format!("field number {value} outside 1..={MAX_FIELD_NUMBER}"),
                )
            })?;
        if RESERVED_FIELD_NUMBERS.contains(&number) {
            return Err(Self::error_at(
                &token,
                format!("field number {number} is reserved for the protobuf implementation"),
            ));
        }
        Ok(number)
    }

    fn oneof(&mut self, parent: &mut Message) -> PResult<Oneof> {
        self.expect_keyword("oneof")?;
        let mut oneof = Oneof {
            name: self.ident()?,
            fields: Vec::new(),
            options: Vec::new(),
        };
        self.expect_symbol('{')?;
        loop {
            if self.eat_symbol('}') {
                return Ok(oneof);
            }
            if self.eat_symbol(';') {
                continue;
            }
            if self.is_keyword("option") {
                oneof.options.push(self.option_statement()?);
            } else if self.is_keyword("group") {
                let field = self.group(None, Some(&mut *parent))?;
                oneof.fields.push(field);
            } else if matches!(self.peek().kind, TokenKind::Eof) {
                return Err(self.unexpected(&format!("'}}' closing oneof {}", oneof.name)));
            } else {
                oneof.fields.push(self.field_rest(None)?);
            }
        }
    }

    fn reserved(&mut self, context: RangeContext) -> PResult<Reserved> {
        self.expect_keyword("reserved")?;
        let reserved = match &self.peek().kind {
            TokenKind::Str(_) => {
                let mut names = vec![self.string_literal()?];
                while self.eat_symbol(',') {
                    names.push(self.string_literal()?);
                }
                Reserved::Names(names)
            }
            // Editions spell reserved names as bare identifiers.
            TokenKind::Ident(_) => {
                let mut names = vec![self.ident()?];
                while self.eat_symbol(',') {
                    names.push(self.ident()?);
                }
                Reserved::Names(names)
            }
            _ => Reserved::Ranges(self.ranges(context)?),
        };
        self.expect_symbol(';')?;
        Ok(reserved)
    }

    fn ranges(&mut self, context: RangeContext) -> PResult<Vec<NumberRange>> {
        let mut ranges = vec![self.range(context)?];
        while self.eat_symbol(',') {
            ranges.push(self.range(context)?);
        }
        Ok(ranges)
    }

    fn range(&mut self, context: RangeContext) -> PResult<NumberRange> {
        let (start, token) = self.signed_int()?;
        let end = if self.eat_keyword("to") {
            if self.eat_keyword("max") {
                i128::from(context.max())
            } else {
                self.signed_int()?.0
            }
        } else {
            start
        };

        let out_of_bounds = |value: i128| match context {
            RangeContext::Fields => !(1..=i128::from(MAX_FIELD_NUMBER)).contains(&value),
            RangeContext::EnumValues => i32::try_from(value).is_err(),
        };
        if out_of_bounds(start) || out_of_bounds(end) || end < start {
            return Err(Self::error_at(
                &token,
                format!("invalid range {start} to {end}"),
            ));
        }
        Ok(NumberRange {
            start: start as i64,
            end: end as i64,
        })
    }

    fn enum_type(&mut self) -> PResult<Enum> {
        let keyword = self.peek().clone();
        self.expect_keyword("enum")?;
        let mut e = Enum {
            name: self.ident()?,
            values: Vec::new(),
            reserved: Vec::new(),
            options: Vec::new(),
        };
        self.expect_symbol('{')?;
        loop {
            if self.eat_symbol('}') {
                break;
            }
            if self.eat_symbol(';') {
                continue;
            }
            if self.is_keyword("option") {
                e.options.push(self.option_statement()?);
            } else if self.is_keyword("reserved") {
                e.reserved.push(self.reserved(RangeContext::EnumValues)?);
            } else if matches!(self.peek().kind, TokenKind::Eof) {
                return Err(self.unexpected(&format!("'}}' closing enum {}", e.name)));
            } else {
                let name = self.ident()?;
                self.expect_symbol('=')?;
                let (value, token) = self.signed_int()?;
                let number = i32::try_from(value).map(i64::from).map_err(|_| {
                    Self::error_at(&token, format!("enum value {value} out of int32 range"))
                })?;
                let options = self.field_options()?;
                self.expect_symbol(';')?;
                e.values.push(EnumValue {
                    name,
                    number,
                    options,
                });
            }
        }

        match e.values.first() {
            None => {
                return Err(Self::error_at(
                    &keyword,
                    format!("enum {} must declare at least one value", e.name),
                ))
            }
            Some(first) if self.syntax == Syntax::Proto3 && first.number != 0 => {
                return Err(Self::error_at(
                    &keyword,
                    format!("first value of proto3 enum {} must be zero", e.name),
                ))
            }
            Some(_) => {}
        }
        let mut names = HashSet::new();
        for value in &e.values {
            declare(&mut names, &value.name, &keyword)?;
        }
        Ok(e)
    }

    fn service(&mut self) -> PResult<Service> {
        self.expect_keyword("service")?;
        let mut service = Service {
            name: self.ident()?,
            methods: Vec::new(),
            options: Vec::new(),
        };
        self.expect_symbol('{')?;
        let mut names = HashSet::new();
        loop {
            if self.eat_symbol('}') {
                return Ok(service);
            }
            if self.eat_symbol(';') {
                continue;
            }
            let token = self.peek().clone();
            if self.is_keyword("option") {
                service.options.push(self.option_statement()?);
            } else if self.is_keyword("rpc") {
                let method = self.method()?;
                declare(&mut names, &method.name, &token)?;
                service.methods.push(method);
            } else {
                return Err(self.unexpected(&format!("rpc or '}}' in service {}", service.name)));
            }
        }
    }

    fn method(&mut self) -> PResult<Method> {
        self.expect_keyword("rpc")?;
        let name = self.ident()?;
        let (client_streaming, input) = self.method_type()?;
        self.expect_keyword("returns")?;
        let (server_streaming, output) = self.method_type()?;

        let mut options = Vec::new();
        if self.eat_symbol('{') {
            loop {
                if self.eat_symbol('}') {
                    break;
                }
                if self.eat_symbol(';') {
                    continue;
                }
                options.push(self.option_statement()?);
            }
            self.eat_symbol(';');
        } else {
            self.expect_symbol(';')?;
        }

        Ok(Method {
            name,
            input,
            client_streaming,
            output,
            server_streaming,
            options,
        })
    }

    fn method_type(&mut self) -> PResult<(bool, String)> {
        self.expect_symbol('(')?;
        // `stream` is only a modifier when another type name follows it.
        let streaming = self.is_keyword("stream")
            && !matches!(self.peek_kind_at(1), TokenKind::Symbol(')' | '.'));
        if streaming {
            self.advance();
        }
        let name = self.type_name()?;
        self.expect_symbol(')')?;
        Ok((streaming, name))
    }

    fn extend(&mut self) -> PResult<Extend> {
        self.expect_keyword("extend")?;
        let extendee = self.type_name()?;
        self.expect_symbol('{')?;
        let mut fields = Vec::new();
        loop {
            if self.eat_symbol('}') {
                return Ok(Extend { extendee, fields });
            }
            if self.eat_symbol(';') {
                continue;
            }
            if matches!(self.peek().kind, TokenKind::Eof) {
                return Err(self.unexpected(&format!("'}}' closing extend {extendee}")));
            }
            fields.push(self.labelled_field(None)?);
        }
    }
}

fn parse_int(text: &str) -> Option<i128> {
    let value = if let Some(hex) = text.strip_prefix("0x") {
        i128::from_str_radix(hex, 16).ok()
    } else if text.len() > 1 && text.starts_with('0') {
        i128::from_str_radix(&text[1..], 8).ok()
    } else {
        text.parse().ok()
    };
    value.filter(|value| *value <= i128::from(u64::MAX))
}

fn declare(names: &mut HashSet<String>, name: &str, token: &Token) -> PResult<()> {
    if names.insert(name.to_string()) {
        Ok(())
    } else {
        Err(Parser::error_at(token, format!("duplicate definition of {name}")))
    }
}

/// Field numbers and names must be unique and avoid reserved entries.
fn check_message(message: &Message, token: &Token) -> PResult<()> {
    let fail = |detail: String| -> PResult<()> {
        Err(Parser::error_at(
            token,
            format!("message {}: {detail}", message.name),
        ))
    };

    let mut numbers = HashSet::new();
    let mut names = HashSet::new();
    for field in message.all_fields() {
        if !numbers.insert(field.number) {
            return fail(format!("duplicate field number {}", field.number));
        }
        if !names.insert(field.name.as_str()) {
            return fail(format!("duplicate field name {}", field.name));
        }
        for reserved in &message.reserved {
            let clash = match reserved {
                Reserved::Ranges(ranges) => ranges.iter().any(|r| r.contains(field.number)),
                Reserved::Names(reserved_names) => reserved_names.contains(&field.name),
            };
            if clash {
                return fail(format!("field {} uses a reserved name or number", field.name));
            }
        }
    }
    Ok(())
}
