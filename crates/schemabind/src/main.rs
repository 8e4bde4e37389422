mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "schemabind", version, about = "Schema linting, equivalence and payload checks")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr). SCHEMABIND_LOG directives take precedence.
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_check_with_registry_reference() {
        let cli = Cli::try_parse_from([
            "schemabind",
            "check",
            "payload.json",
            "--registry",
            "/tmp/schemas",
            "--subject",
            "user",
            "--version",
            "2",
        ])
        .expect("check args should parse");

        match cli.command {
            Command::Check(args) => {
                assert_eq!(args.subject.as_deref(), Some("user"));
                assert_eq!(args.version, Some(2));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_schema_with_subject() {
        let err = Cli::try_parse_from([
            "schemabind",
            "check",
            "payload.json",
            "--schema",
            "user.schema.json",
            "--subject",
            "user",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn parses_equiv_with_explicit_format() {
        let cli = Cli::try_parse_from([
            "schemabind",
            "--format",
            "json",
            "equiv",
            "a.txt",
            "b.txt",
            "--schema-format",
            "proto",
        ])
        .expect("equiv args should parse");
        assert!(matches!(cli.command, Command::Equiv(_)));
    }
}
