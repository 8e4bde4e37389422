use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use schemabind_format::FormatIdentifier;
use schemabind_manager::{ManagerConfig, SchemaError, SchemaManager, TypeIdentity};
use schemabind_registry::{DirectoryRegistryClient, InMemoryRegistryClient, SchemaReference};

use crate::cmd::{resolve_format, CheckArgs};
use crate::exit::{io_error, schema_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_json, print_table, OutputFormat};

#[derive(Debug, Serialize)]
struct CheckOutput {
    payload: String,
    schema: String,
    valid: bool,
    violations: Vec<String>,
}

pub fn run(args: CheckArgs, format: OutputFormat) -> CliResult<i32> {
    let config = ManagerConfig {
        strict_mode: args.strict,
        ..ManagerConfig::default()
    };
    let (manager, type_id, schema_label) = bind_schema(&args, config)?;

    let payload = std::fs::read(&args.payload)
        .map_err(|err| io_error(&args.payload.display().to_string(), err))?;

    let violations = match manager.read_data_as::<Value>(&type_id, &payload) {
        Ok(_) => Vec::new(),
        Err(SchemaError::ValidationFailed { violations, .. }) => violations
            .iter()
            .map(|violation| violation.to_string())
            .collect(),
        Err(err) => return Err(schema_error("check", err)),
    };

    let output = CheckOutput {
        payload: args.payload.display().to_string(),
        schema: schema_label,
        valid: violations.is_empty(),
        violations,
    };
    print_output(&output, format);

    if output.valid {
        Ok(SUCCESS)
    } else {
        Ok(DATA_INVALID)
    }
}

fn bind_schema(
    args: &CheckArgs,
    config: ManagerConfig,
) -> CliResult<(SchemaManager, TypeIdentity, String)> {
    if let Some(path) = &args.schema {
        let manager = SchemaManager::with_config(Arc::new(InMemoryRegistryClient::new()), config);
        let type_id = TypeIdentity::new(schema_stem(path));
        let id = resolve_format(None, path)?;
        let text = std::fs::read_to_string(path)
            .map_err(|err| io_error(&path.display().to_string(), err))?;
        manager
            .register_text(&type_id, &id, &text)
            .map_err(|err| schema_error(&path.display().to_string(), err))?;
        return Ok((manager, type_id, path.display().to_string()));
    }

    let (Some(root), Some(subject), Some(version)) = (&args.registry, &args.subject, args.version)
    else {
        return Err(CliError::usage(
            "pass --schema, or --registry (or SCHEMABIND_SCHEMA_DIR) with --subject and --version",
        ));
    };

    let client = DirectoryRegistryClient::new(root);
    let reference = SchemaReference::new(subject.as_str(), version, FormatIdentifier::JSON);
    let manager = SchemaManager::with_config(Arc::new(client), config);
    let type_id = TypeIdentity::new(subject);
    manager
        .register_by_reference(&type_id, &reference)
        .map_err(|err| schema_error("register", err))?;
    Ok((manager, type_id, reference.to_string()))
}

fn schema_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.strip_suffix(".schema.json")
        .or_else(|| name.strip_suffix(".json"))
        .unwrap_or(&name)
        .to_string()
}

fn print_output(output: &CheckOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(output),
        OutputFormat::Table => {
            if output.valid {
                print_table(
                    &["PAYLOAD", "SCHEMA", "STATUS"],
                    vec![vec![
                        output.payload.clone(),
                        output.schema.clone(),
                        "valid".to_string(),
                    ]],
                );
            } else {
                print_table(
                    &["VIOLATION"],
                    output
                        .violations
                        .iter()
                        .map(|violation| vec![violation.clone()])
                        .collect(),
                );
            }
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            if output.valid {
                println!("{}: valid against {}", output.payload, output.schema);
            } else {
                println!("{}: invalid against {}", output.payload, output.schema);
                for violation in &output.violations {
                    println!("  - {violation}");
                }
            }
        }
    }
}
