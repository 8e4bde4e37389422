use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

use schemabind_format::FormatIdentifier;

use crate::exit::{io_error, CliError, CliResult};
use crate::output::OutputFormat;

pub mod check;
pub mod describe;
pub mod equiv;
pub mod lint;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that a schema definition parses.
    Lint(LintArgs),
    /// Decide whether two schema definitions are equivalent.
    Equiv(EquivArgs),
    /// Validate a JSON payload against a schema.
    Check(CheckArgs),
    /// Print the canonical form of a Protobuf definition.
    Describe(DescribeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Lint(args) => lint::run(args, format),
        Command::Equiv(args) => equiv::run(args, format),
        Command::Check(args) => check::run(args, format),
        Command::Describe(args) => describe::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct LintArgs {
    /// Schema definition files.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
    /// Schema format. Default: inferred from each file name.
    #[arg(long, value_name = "FORMAT")]
    pub schema_format: Option<String>,
    /// Compile JSON object schemas with additionalProperties: false.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct EquivArgs {
    /// Reference definition.
    pub source: PathBuf,
    /// Candidate definition compared against the reference.
    pub candidate: PathBuf,
    /// Schema format. Default: inferred from the file names.
    #[arg(long, value_name = "FORMAT")]
    pub schema_format: Option<String>,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// JSON payload file.
    pub payload: PathBuf,
    /// JSON Schema file to validate against.
    #[arg(long, conflicts_with_all = ["subject", "version"])]
    pub schema: Option<PathBuf>,
    /// Directory laid out as <subject>/v<version>.<format>.
    #[arg(long, value_name = "DIR", env = "SCHEMABIND_SCHEMA_DIR")]
    pub registry: Option<PathBuf>,
    /// Registry subject.
    #[arg(long)]
    pub subject: Option<String>,
    /// Registry version.
    #[arg(long, value_name = "N")]
    pub version: Option<u32>,
    /// Reject object properties the schema does not declare.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Protobuf definition file.
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Read a definition file, mapping I/O failures to exit codes.
pub(crate) fn read_text(path: &Path) -> CliResult<String> {
    std::fs::read_to_string(path).map_err(|err| io_error(&path.display().to_string(), err))
}

/// Explicit format, or the one implied by the file name.
pub(crate) fn resolve_format(explicit: Option<&str>, path: &Path) -> CliResult<FormatIdentifier> {
    if let Some(tag) = explicit {
        return Ok(FormatIdentifier::new(tag));
    }
    path.file_name()
        .and_then(|name| FormatIdentifier::from_file_name(&name.to_string_lossy()))
        .ok_or_else(|| {
            CliError::usage(format!(
                "cannot infer schema format of {}; pass --schema-format",
                path.display()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit::USAGE;

    #[test]
    fn format_is_inferred_from_file_name() {
        assert_eq!(
            resolve_format(None, Path::new("dir/user.schema.json")).unwrap(),
            FormatIdentifier::JSON
        );
        assert_eq!(
            resolve_format(Some("PROTO"), Path::new("user.txt")).unwrap(),
            FormatIdentifier::PROTO
        );
        assert_eq!(
            resolve_format(None, Path::new("user.txt")).unwrap_err().code,
            USAGE
        );
    }
}
