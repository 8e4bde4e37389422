//! Descriptor tree produced by the `.proto` parser.
//!
//! Every node renders to a canonical text form through `Display`. Two nodes
//! compare equal exactly when their canonical text is identical: comments,
//! whitespace and literal spelling of the source do not participate.

use std::fmt;

/// Largest valid field number.
pub const MAX_FIELD_NUMBER: i64 = 536_870_911;

/// Field numbers reserved for the protobuf implementation.
pub const RESERVED_FIELD_NUMBERS: std::ops::RangeInclusive<i64> = 19_000..=19_999;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Syntax {
    Proto2,
    Proto3,
    Edition(String),
}

/// One parsed `.proto` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtoFile {
    pub syntax: Syntax,
    pub package: Option<String>,
    pub imports: Vec<Import>,
    pub options: Vec<OptionEntry>,
    pub messages: Vec<Message>,
    pub enums: Vec<Enum>,
    pub services: Vec<Service>,
    pub extends: Vec<Extend>,
}

impl ProtoFile {
    /// Top-level message by simple name.
    pub fn message(&self, name: &str) -> Option<&Message> {
        self.messages.iter().find(|message| message.name == name)
    }

    /// Top-level enum by simple name.
    pub fn enum_type(&self, name: &str) -> Option<&Enum> {
        self.enums.iter().find(|e| e.name == name)
    }

    pub fn service(&self, name: &str) -> Option<&Service> {
        self.services.iter().find(|service| service.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Default,
    Weak,
    Public,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub path: String,
    pub kind: ImportKind,
}

/// Option value as written, normalized to a canonical spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constant {
    Ident(String),
    Int(i128),
    Float(String),
    Str(String),
    Bool(bool),
    /// Text-format aggregate (`{ a: 1 }`), tokens joined by single spaces.
    Aggregate(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionEntry {
    pub name: String,
    pub value: Constant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Optional,
    Required,
    Repeated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// Scalar or message/enum reference, as written (`int32`, `.pkg.Msg`).
    Named(String),
    Map { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub label: Option<Label>,
    pub field_type: FieldType,
    pub number: i64,
    pub options: Vec<OptionEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Oneof {
    pub name: String,
    pub fields: Vec<Field>,
    pub options: Vec<OptionEntry>,
}

/// Inclusive number range; `end == start` for single numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberRange {
    pub start: i64,
    pub end: i64,
}

impl NumberRange {
    pub fn contains(&self, number: i64) -> bool {
        (self.start..=self.end).contains(&number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reserved {
    Ranges(Vec<NumberRange>),
    Names(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub name: String,
    pub fields: Vec<Field>,
    pub oneofs: Vec<Oneof>,
    pub messages: Vec<Message>,
    pub enums: Vec<Enum>,
    pub extends: Vec<Extend>,
    pub reserved: Vec<Reserved>,
    pub extensions: Vec<NumberRange>,
    pub options: Vec<OptionEntry>,
}

impl Message {
    pub(crate) fn named(name: String) -> Self {
        Self {
            name,
            fields: Vec::new(),
            oneofs: Vec::new(),
            messages: Vec::new(),
            enums: Vec::new(),
            extends: Vec::new(),
            reserved: Vec::new(),
            extensions: Vec::new(),
            options: Vec::new(),
        }
    }

    /// Field by name, including fields declared inside a `oneof`.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.all_fields().find(|field| field.name == name)
    }

    /// Direct fields followed by oneof members.
    pub fn all_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields
            .iter()
            .chain(self.oneofs.iter().flat_map(|oneof| oneof.fields.iter()))
    }

    /// Nested message by simple name.
    pub fn message(&self, name: &str) -> Option<&Message> {
        self.messages.iter().find(|message| message.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub number: i64,
    pub options: Vec<OptionEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enum {
    pub name: String,
    pub values: Vec<EnumValue>,
    pub reserved: Vec<Reserved>,
    pub options: Vec<OptionEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub input: String,
    pub client_streaming: bool,
    pub output: String,
    pub server_streaming: bool,
    pub options: Vec<OptionEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub name: String,
    pub methods: Vec<Method>,
    pub options: Vec<OptionEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extend {
    pub extendee: String,
    pub fields: Vec<Field>,
}

const INDENT: &str = "  ";

struct Indented<'a, T> {
    node: &'a T,
    depth: usize,
}

fn pad(f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        f.write_str(INDENT)?;
    }
    Ok(())
}

fn write_inline_options(f: &mut fmt::Formatter<'_>, options: &[OptionEntry]) -> fmt::Result {
    if options.is_empty() {
        return Ok(());
    }
    let rendered: Vec<String> = options
        .iter()
        .map(|option| format!("{} = {}", option.name, option.value))
        .collect();
    write!(f, " [{}]", rendered.join(", "))
}

fn write_option_statements(
    f: &mut fmt::Formatter<'_>,
    options: &[OptionEntry],
    depth: usize,
) -> fmt::Result {
    for option in options {
        pad(f, depth)?;
        writeln!(f, "option {option};")?;
    }
    Ok(())
}

fn write_ranges(f: &mut fmt::Formatter<'_>, ranges: &[NumberRange]) -> fmt::Result {
    let rendered: Vec<String> = ranges.iter().map(ToString::to_string).collect();
    f.write_str(&rendered.join(", "))
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Ident(ident) => f.write_str(ident),
            Constant::Int(value) => write!(f, "{value}"),
            Constant::Float(text) => f.write_str(text),
            Constant::Str(text) => write!(f, "{text:?}"),
            Constant::Bool(value) => write!(f, "{value}"),
            Constant::Aggregate(text) => write!(f, "{{ {text} }}"),
        }
    }
}

impl fmt::Display for OptionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.value)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Label::Optional => "optional",
            Label::Required => "required",
            Label::Repeated => "repeated",
        })
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Named(name) => f.write_str(name),
            FieldType::Map { key, value } => write!(f, "map<{key}, {value}>"),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(label) = self.label {
            write!(f, "{label} ")?;
        }
        write!(f, "{} {} = {}", self.field_type, self.name, self.number)?;
        write_inline_options(f, &self.options)?;
        f.write_str(";")
    }
}

impl fmt::Display for NumberRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{} to {}", self.start, self.end)
        }
    }
}

impl fmt::Display for Reserved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("reserved ")?;
        match self {
            Reserved::Ranges(ranges) => write_ranges(f, ranges)?,
            Reserved::Names(names) => {
                let quoted: Vec<String> = names.iter().map(|name| format!("{name:?}")).collect();
                f.write_str(&quoted.join(", "))?;
            }
        }
        f.write_str(";")
    }
}

impl fmt::Display for Indented<'_, Message> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = self.node;
        let inner = self.depth + 1;

        pad(f, self.depth)?;
        writeln!(f, "message {} {{", message.name)?;
        write_option_statements(f, &message.options, inner)?;
        for field in &message.fields {
            pad(f, inner)?;
            writeln!(f, "{field}")?;
        }
        for oneof in &message.oneofs {
            pad(f, inner)?;
            writeln!(f, "oneof {} {{", oneof.name)?;
            write_option_statements(f, &oneof.options, inner + 1)?;
            for field in &oneof.fields {
                pad(f, inner + 1)?;
                writeln!(f, "{field}")?;
            }
            pad(f, inner)?;
            writeln!(f, "}}")?;
        }
        for reserved in &message.reserved {
            pad(f, inner)?;
            writeln!(f, "{reserved}")?;
        }
        if !message.extensions.is_empty() {
            pad(f, inner)?;
            f.write_str("extensions ")?;
            write_ranges(f, &message.extensions)?;
            writeln!(f, ";")?;
        }
        for nested in &message.messages {
            write!(f, "{}", Indented { node: nested, depth: inner })?;
        }
        for nested in &message.enums {
            write!(f, "{}", Indented { node: nested, depth: inner })?;
        }
        for extend in &message.extends {
            write!(f, "{}", Indented { node: extend, depth: inner })?;
        }
        pad(f, self.depth)?;
        writeln!(f, "}}")
    }
}

impl fmt::Display for Indented<'_, Enum> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.depth + 1;
        pad(f, self.depth)?;
        writeln!(f, "enum {} {{", self.node.name)?;
        write_option_statements(f, &self.node.options, inner)?;
        for value in &self.node.values {
            pad(f, inner)?;
            write!(f, "{} = {}", value.name, value.number)?;
            write_inline_options(f, &value.options)?;
            writeln!(f, ";")?;
        }
        for reserved in &self.node.reserved {
            pad(f, inner)?;
            writeln!(f, "{reserved}")?;
        }
        pad(f, self.depth)?;
        writeln!(f, "}}")
    }
}

impl fmt::Display for Indented<'_, Extend> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        pad(f, self.depth)?;
        writeln!(f, "extend {} {{", self.node.extendee)?;
        for field in &self.node.fields {
            pad(f, self.depth + 1)?;
            writeln!(f, "{field}")?;
        }
        pad(f, self.depth)?;
        writeln!(f, "}}")
    }
}

impl fmt::Display for Indented<'_, Service> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.depth + 1;
        pad(f, self.depth)?;
        writeln!(f, "service {} {{", self.node.name)?;
        write_option_statements(f, &self.node.options, inner)?;
        for method in &self.node.methods {
            pad(f, inner)?;
            write!(
                f,
                "rpc {}({}{}) returns ({}{})",
                method.name,
                if method.client_streaming { "stream " } else { "" },
                method.input,
                if method.server_streaming { "stream " } else { "" },
                method.output,
            )?;
            if method.options.is_empty() {
                writeln!(f, ";")?;
            } else {
                writeln!(f, " {{")?;
                write_option_statements(f, &method.options, inner + 1)?;
                pad(f, inner)?;
                writeln!(f, "}}")?;
            }
        }
        pad(f, self.depth)?;
        writeln!(f, "}}")
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Indented { node: self, depth: 0 })
    }
}

impl fmt::Display for Enum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Indented { node: self, depth: 0 })
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Indented { node: self, depth: 0 })
    }
}

impl fmt::Display for ProtoFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.syntax {
            Syntax::Proto2 => writeln!(f, "syntax = \"proto2\";")?,
            Syntax::Proto3 => writeln!(f, "syntax = \"proto3\";")?,
            Syntax::Edition(edition) => writeln!(f, "edition = {edition:?};")?,
        }
        if let Some(package) = &self.package {
            writeln!(f, "package {package};")?;
        }
        for import in &self.imports {
            let modifier = match import.kind {
                ImportKind::Default => "",
                ImportKind::Weak => "weak ",
                ImportKind::Public => "public ",
            };
            writeln!(f, "import {modifier}{:?};", import.path)?;
        }
        write_option_statements(f, &self.options, 0)?;
        for message in &self.messages {
            write!(f, "{message}")?;
        }
        for e in &self.enums {
            write!(f, "{e}")?;
        }
        for service in &self.services {
            write!(f, "{service}")?;
        }
        for extend in &self.extends {
            write!(f, "{}", Indented { node: extend, depth: 0 })?;
        }
        Ok(())
    }
}
