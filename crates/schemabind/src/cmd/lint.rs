use serde::Serialize;

use schemabind_format::{JsonFormat, SchemaFormats};

use crate::cmd::{read_text, resolve_format, LintArgs};
use crate::exit::{format_error, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_json, print_table, OutputFormat};

#[derive(Debug, Serialize)]
struct LintResult {
    file: String,
    format: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn run(args: LintArgs, format: OutputFormat) -> CliResult<i32> {
    let formats = SchemaFormats::with_json(JsonFormat::with_strict_mode(args.strict));

    let mut results = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let id = resolve_format(args.schema_format.as_deref(), path)?;
        let schema_format = formats
            .get(&id)
            .map_err(|err| format_error(&path.display().to_string(), err))?;
        let text = read_text(path)?;

        let error = schema_format.parse(&text).err().map(|err| err.to_string());
        tracing::debug!(file = %path.display(), format = %id, valid = error.is_none(), "linted");
        results.push(LintResult {
            file: path.display().to_string(),
            format: id.to_string(),
            valid: error.is_none(),
            error,
        });
    }

    print_results(&results, format);

    if results.iter().all(|result| result.valid) {
        Ok(SUCCESS)
    } else {
        Ok(DATA_INVALID)
    }
}

fn print_results(results: &[LintResult], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&results),
        OutputFormat::Table => print_table(
            &["FILE", "FORMAT", "STATUS", "ERROR"],
            results
                .iter()
                .map(|result| {
                    vec![
                        result.file.clone(),
                        result.format.clone(),
                        status(result).to_string(),
                        result.error.clone().unwrap_or_default(),
                    ]
                })
                .collect(),
        ),
        OutputFormat::Pretty | OutputFormat::Raw => {
            for result in results {
                match &result.error {
                    Some(error) => println!("{}: {} ({error})", result.file, status(result)),
                    None => println!("{}: {}", result.file, status(result)),
                }
            }
        }
    }
}

fn status(result: &LintResult) -> &'static str {
    if result.valid {
        "ok"
    } else {
        "invalid"
    }
}
