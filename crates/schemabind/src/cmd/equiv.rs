use serde::Serialize;

use schemabind_format::SchemaFormats;

use crate::cmd::{read_text, resolve_format, EquivArgs};
use crate::exit::{format_error, CliError, CliResult, FAILURE, SUCCESS};
use crate::output::{print_json, print_table, OutputFormat};

#[derive(Debug, Serialize)]
struct EquivOutput {
    source: String,
    candidate: String,
    format: String,
    equivalent: bool,
}

pub fn run(args: EquivArgs, format: OutputFormat) -> CliResult<i32> {
    let explicit = args.schema_format.as_deref();
    let id = resolve_format(explicit, &args.source)?;
    if explicit.is_none() {
        let candidate_id = resolve_format(None, &args.candidate)?;
        if candidate_id != id {
            return Err(CliError::usage(format!(
                "definitions have different formats ({id} and {candidate_id})"
            )));
        }
    }

    let formats = SchemaFormats::with_defaults();
    let schema_format = formats
        .get(&id)
        .map_err(|err| format_error("equiv", err))?;

    let source = read_text(&args.source)?;
    let candidate = read_text(&args.candidate)?;
    for (path, text) in [(&args.source, &source), (&args.candidate, &candidate)] {
        schema_format
            .parse(text)
            .map_err(|err| format_error(&path.display().to_string(), err))?;
    }

    let output = EquivOutput {
        source: args.source.display().to_string(),
        candidate: args.candidate.display().to_string(),
        format: id.to_string(),
        equivalent: schema_format.is_equivalent(&source, &candidate),
    };

    match format {
        OutputFormat::Json => print_json(&output),
        OutputFormat::Table => print_table(
            &["SOURCE", "CANDIDATE", "FORMAT", "EQUIVALENT"],
            vec![vec![
                output.source.clone(),
                output.candidate.clone(),
                output.format.clone(),
                output.equivalent.to_string(),
            ]],
        ),
        OutputFormat::Pretty | OutputFormat::Raw => {
            let verdict = if output.equivalent {
                "equivalent"
            } else {
                "not equivalent"
            };
            println!("{} vs {}: {verdict}", output.source, output.candidate);
        }
    }

    if output.equivalent {
        Ok(SUCCESS)
    } else {
        Ok(FAILURE)
    }
}
