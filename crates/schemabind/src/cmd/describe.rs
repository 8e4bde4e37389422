use serde::Serialize;

use schemabind_format::proto::{parse_proto, ProtoFile};
use schemabind_format::FormatError;

use crate::cmd::{read_text, DescribeArgs};
use crate::exit::{format_error, CliResult, SUCCESS};
use crate::output::{print_json, print_raw, print_table, OutputFormat};

#[derive(Debug, Serialize)]
struct DescribeOutput<'a> {
    file: String,
    package: Option<&'a str>,
    messages: Vec<&'a str>,
    enums: Vec<&'a str>,
    services: Vec<&'a str>,
    canonical: String,
}

pub fn run(args: DescribeArgs, format: OutputFormat) -> CliResult<i32> {
    let text = read_text(&args.file)?;
    let file = parse_proto(&text)
        .map_err(|err| format_error(&args.file.display().to_string(), FormatError::from(err)))?;

    match format {
        OutputFormat::Json => print_json(&summary(&args.file.display().to_string(), &file)),
        OutputFormat::Table => print_table(&["KIND", "NAME", "MEMBERS"], rows(&file)),
        OutputFormat::Pretty | OutputFormat::Raw => print_raw(&file.to_string()),
    }

    Ok(SUCCESS)
}

fn summary<'a>(path: &str, file: &'a ProtoFile) -> DescribeOutput<'a> {
    DescribeOutput {
        file: path.to_string(),
        package: file.package.as_deref(),
        messages: file.messages.iter().map(|m| m.name.as_str()).collect(),
        enums: file.enums.iter().map(|e| e.name.as_str()).collect(),
        services: file.services.iter().map(|s| s.name.as_str()).collect(),
        canonical: file.to_string(),
    }
}

fn rows(file: &ProtoFile) -> Vec<Vec<String>> {
    let messages = file
        .messages
        .iter()
        .map(|m| ("message", &m.name, m.fields.len()));
    let enums = file
        .enums
        .iter()
        .map(|e| ("enum", &e.name, e.values.len()));
    let services = file
        .services
        .iter()
        .map(|s| ("service", &s.name, s.methods.len()));

    messages
        .chain(enums)
        .chain(services)
        .map(|(kind, name, members)| vec![kind.to_string(), name.clone(), members.to_string()])
        .collect()
}
