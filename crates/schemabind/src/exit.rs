use std::fmt;
use std::io;

use schemabind_format::FormatError;
use schemabind_manager::SchemaError;

pub const SUCCESS: i32 = 0;
/// Generic failure, also "not equivalent" for `equiv`.
pub const FAILURE: i32 = 1;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(USAGE, message)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => FAILURE,
        io::ErrorKind::InvalidData => DATA_INVALID,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn format_error(context: &str, err: FormatError) -> CliError {
    let code = match err {
        FormatError::Parse { .. } => DATA_INVALID,
        FormatError::UnknownFormat(_) => USAGE,
        FormatError::ValidationUnsupported(_) => USAGE,
        FormatError::FormatMismatch { .. } => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn schema_error(context: &str, err: SchemaError) -> CliError {
    match err {
        SchemaError::Format(err) => format_error(context, err),
        SchemaError::MalformedPayload(_)
        | SchemaError::ValidationFailed { .. }
        | SchemaError::Conversion { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        SchemaError::SchemaNotFound { .. }
        | SchemaError::RegistrationFailed { .. }
        | SchemaError::LoadFailed(_) => CliError::new(FAILURE, format!("{context}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use schemabind_format::FormatIdentifier;
    use schemabind_manager::TypeIdentity;

    use super::*;

    #[test]
    fn schema_errors_map_to_exit_codes() {
        let not_found = SchemaError::SchemaNotFound {
            type_id: TypeIdentity::new("demo.User"),
            detail: "missing".to_string(),
        };
        assert_eq!(schema_error("check", not_found).code, FAILURE);

        let unknown = SchemaError::Format(FormatError::UnknownFormat(FormatIdentifier::new("avro")));
        assert_eq!(schema_error("check", unknown).code, USAGE);

        let parse = FormatError::Parse {
            format: FormatIdentifier::JSON,
            message: "bad".to_string(),
        };
        let err = format_error("lint", parse);
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.to_string().starts_with("lint: "));
    }

    #[test]
    fn io_errors_map_to_exit_codes() {
        let missing = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert_eq!(io_error("read", missing).code, FAILURE);
        let other = io::Error::new(io::ErrorKind::Other, "boom");
        assert_eq!(io_error("read", other).code, INTERNAL);
    }
}
