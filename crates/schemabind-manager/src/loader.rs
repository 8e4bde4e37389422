use std::io::Read;
use std::path::Path;

use schemabind_format::FormatIdentifier;

use crate::config::ManagerConfig;
use crate::error::{Result, SchemaError};
use crate::identity::TypeIdentity;

const JSON_SUFFIX: &str = ".schema.json";
const PROTO_SUFFIX: &str = ".proto";

/// One schema definition read from disk.
#[derive(Debug)]
pub(crate) struct SchemaFile {
    pub(crate) type_id: TypeIdentity,
    pub(crate) format: FormatIdentifier,
    pub(crate) text: String,
}

/// Read every recognized schema file in `path`, sorted by type identity.
///
/// Symlinked schema files are refused. Other files and subdirectories are
/// skipped.
pub(crate) fn read_schema_directory(path: &Path, config: &ManagerConfig) -> Result<Vec<SchemaFile>> {
    let entries = std::fs::read_dir(path)
        .map_err(|err| SchemaError::LoadFailed(format!("{}: {err}", path.display())))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| SchemaError::LoadFailed(err.to_string()))?;
        let file_name = entry.file_name();
        let file_name = file_name.to_string_lossy();
        let recognized = classify(&file_name);
        let entry_path = entry.path();
        let path_metadata = std::fs::symlink_metadata(&entry_path)
            .map_err(|err| SchemaError::LoadFailed(err.to_string()))?;
        let file_type = path_metadata.file_type();

        if file_type.is_symlink() {
            if recognized.is_some() {
                return Err(SchemaError::LoadFailed(format!(
                    "refusing to load schema symlink: {file_name}"
                )));
            }
            continue;
        }
        if !file_type.is_file() {
            continue;
        }

        let Some((stem, format)) = recognized else {
            continue;
        };
        if stem.is_empty() {
            return Err(SchemaError::LoadFailed(format!(
                "unrecognized schema filename: {file_name}"
            )));
        }

        if files.len() >= config.max_schemas_from_directory {
            return Err(SchemaError::LoadFailed(format!(
                "schema count exceeds configured max ({}): {}",
                config.max_schemas_from_directory,
                files.len().saturating_add(1)
            )));
        }

        let text = read_limited(&entry_path, &path_metadata, &file_name, config)?;
        tracing::trace!(file = %file_name, %format, "schema file read");
        files.push(SchemaFile {
            type_id: TypeIdentity::new(stem),
            format,
            text,
        });
    }

    files.sort_by(|a, b| a.type_id.cmp(&b.type_id));
    Ok(files)
}

fn classify(file_name: &str) -> Option<(&str, FormatIdentifier)> {
    if let Some(stem) = file_name.strip_suffix(JSON_SUFFIX) {
        Some((stem, FormatIdentifier::JSON))
    } else {
        file_name
            .strip_suffix(PROTO_SUFFIX)
            .map(|stem| (stem, FormatIdentifier::PROTO))
    }
}

fn read_limited(
    path: &Path,
    path_metadata: &std::fs::Metadata,
    file_name: &str,
    config: &ManagerConfig,
) -> Result<String> {
    let file = std::fs::File::open(path).map_err(|err| {
        SchemaError::LoadFailed(format!("failed opening schema {}: {err}", path.display()))
    })?;
    let opened_metadata = file
        .metadata()
        .map_err(|err| SchemaError::LoadFailed(err.to_string()))?;

    #[cfg(unix)]
    {
        if !same_file_identity(path_metadata, &opened_metadata) {
            return Err(SchemaError::LoadFailed(format!(
                "schema file changed during load: {file_name}"
            )));
        }
    }
    #[cfg(not(unix))]
    let _ = path_metadata;

    let max_bytes = config.max_schema_file_size;
    if opened_metadata.len() > max_bytes as u64 {
        return Err(SchemaError::LoadFailed(format!(
            "schema file too large ({} bytes): {file_name}",
            opened_metadata.len()
        )));
    }

    let read_limit = u64::try_from(max_bytes.saturating_add(1)).unwrap_or(u64::MAX);
    let mut text = String::new();
    file.take(read_limit)
        .read_to_string(&mut text)
        .map_err(|err| {
            SchemaError::LoadFailed(format!("failed reading schema {}: {err}", path.display()))
        })?;
    if text.len() > max_bytes {
        return Err(SchemaError::LoadFailed(format!(
            "schema file too large while reading: {file_name}"
        )));
    }
    Ok(text)
}

#[cfg(unix)]
fn same_file_identity(
    path_metadata: &std::fs::Metadata,
    opened_metadata: &std::fs::Metadata,
) -> bool {
    use std::os::unix::fs::MetadataExt;
    path_metadata.dev() == opened_metadata.dev() && path_metadata.ino() == opened_metadata.ino()
}

#[cfg(test)]
pub(crate) mod tests {
    use std::path::PathBuf;

    use super::*;

    pub(crate) const OBJECT_SCHEMA: &str = r#"{"type":"object"}"#;

    pub(crate) fn make_temp_schema_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "schemabind-{tag}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    pub(crate) fn write_schema(dir: &Path, file_name: &str, contents: &str) {
        std::fs::write(dir.join(file_name), contents.as_bytes()).unwrap();
    }

    #[test]
    fn recognized_files_are_read_sorted() {
        let dir = make_temp_schema_dir("loader-sorted");
        write_schema(&dir, "b.Order.schema.json", OBJECT_SCHEMA);
        write_schema(&dir, "a.Person.proto", "syntax = \"proto3\";");
        write_schema(&dir, "notes.json", OBJECT_SCHEMA);
        write_schema(&dir, "README.md", "docs");
        std::fs::create_dir_all(dir.join("nested.schema.json")).unwrap();

        let files = read_schema_directory(&dir, &ManagerConfig::default()).unwrap();
        let summary: Vec<(&str, &FormatIdentifier)> = files
            .iter()
            .map(|file| (file.type_id.as_str(), &file.format))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("a.Person", &FormatIdentifier::PROTO),
                ("b.Order", &FormatIdentifier::JSON),
            ]
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_directory_fails() {
        let dir = make_temp_schema_dir("loader-missing").join("absent");
        assert!(matches!(
            read_schema_directory(&dir, &ManagerConfig::default()),
            Err(SchemaError::LoadFailed(_))
        ));
    }

    #[test]
    fn empty_stem_is_rejected() {
        let dir = make_temp_schema_dir("loader-empty-stem");
        write_schema(&dir, ".schema.json", OBJECT_SCHEMA);

        assert!(matches!(
            read_schema_directory(&dir, &ManagerConfig::default()),
            Err(SchemaError::LoadFailed(_))
        ));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_schema_is_rejected() {
        let dir = make_temp_schema_dir("loader-symlink");
        let target = dir.join("target.json");
        std::fs::write(&target, OBJECT_SCHEMA.as_bytes()).unwrap();
        std::os::unix::fs::symlink(&target, dir.join("User.schema.json")).unwrap();

        assert!(matches!(
            read_schema_directory(&dir, &ManagerConfig::default()),
            Err(SchemaError::LoadFailed(_))
        ));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn schema_count_limit_is_enforced() {
        let dir = make_temp_schema_dir("loader-count-limit");
        write_schema(&dir, "One.schema.json", OBJECT_SCHEMA);
        write_schema(&dir, "Two.schema.json", OBJECT_SCHEMA);

        let config = ManagerConfig {
            max_schemas_from_directory: 1,
            ..ManagerConfig::default()
        };
        assert!(matches!(
            read_schema_directory(&dir, &config),
            Err(SchemaError::LoadFailed(_))
        ));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn schema_file_size_limit_is_enforced() {
        let dir = make_temp_schema_dir("loader-size-limit");
        write_schema(&dir, "One.schema.json", OBJECT_SCHEMA);

        let config = ManagerConfig {
            max_schema_file_size: 8,
            ..ManagerConfig::default()
        };
        assert!(matches!(
            read_schema_directory(&dir, &config),
            Err(SchemaError::LoadFailed(_))
        ));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[cfg(unix)]
    #[test]
    fn same_file_identity_distinguishes_files() {
        let dir = make_temp_schema_dir("loader-identity");
        let first = dir.join("first.json");
        let second = dir.join("second.json");
        std::fs::write(&first, OBJECT_SCHEMA).unwrap();
        std::fs::write(&second, OBJECT_SCHEMA).unwrap();

        let first_meta = std::fs::symlink_metadata(&first).unwrap();
        let opened_first = std::fs::File::open(&first).unwrap().metadata().unwrap();
        let opened_second = std::fs::File::open(&second).unwrap().metadata().unwrap();

        assert!(same_file_identity(&first_meta, &opened_first));
        assert!(!same_file_identity(&first_meta, &opened_second));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
