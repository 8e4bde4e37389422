use std::collections::BTreeSet;
use std::fmt;

/// One way an instance fails to conform to its schema.
///
/// Two violations are the same only when location, constraint and message
/// all match, so identical messages at different locations stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValidationViolation {
    instance_path: String,
    schema_path: String,
    message: String,
}

impl ValidationViolation {
    /// A violation with no location information.
    pub fn new(message: impl Into<String>) -> Self {
        Self::at("", "", message)
    }

    /// A violation of the constraint at `schema_path`, found at `instance_path`.
    /// Both are JSON Pointers; empty means the root.
    pub fn at(
        instance_path: impl Into<String>,
        schema_path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            instance_path: instance_path.into(),
            schema_path: schema_path.into(),
            message: message.into(),
        }
    }

    /// Human-readable description of the violated constraint.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Location of the offending value within the instance.
    pub fn instance_path(&self) -> &str {
        &self.instance_path
    }

    /// Location of the violated keyword within the schema.
    pub fn schema_path(&self) -> &str {
        &self.schema_path
    }
}

impl fmt::Display for ValidationViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// Violations found for one instance. Empty means the instance conforms.
pub type Violations = BTreeSet<ValidationViolation>;

/// Join violations, one per line.
pub fn join_messages(violations: &Violations) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
