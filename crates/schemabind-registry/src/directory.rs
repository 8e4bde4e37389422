use std::path::{Component, Path, PathBuf};

use crate::client::RegistryClient;
use crate::error::{FetchError, Result};
use crate::reference::SchemaReference;

/// Registry client reading `<root>/<subject>/v<version>.<format>` files.
#[derive(Debug, Clone)]
pub struct DirectoryRegistryClient {
    root: PathBuf,
}

impl DirectoryRegistryClient {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path that backs a reference.
    pub fn path_for(&self, reference: &SchemaReference) -> Result<PathBuf> {
        let subject = Path::new(reference.subject());
        let is_plain = subject.components().count() == 1
            && matches!(subject.components().next(), Some(Component::Normal(_)));
        if !is_plain {
            return Err(FetchError::Rejected(format!(
                "invalid subject name: {}",
                reference.subject()
            )));
        }

        let format = reference.format().as_str();
        if !is_plain_tag(format) {
            return Err(FetchError::Rejected(format!("invalid format tag: {format}")));
        }

        Ok(self
            .root
            .join(subject)
            .join(format!("v{}.{format}", reference.version())))
    }
}

fn is_plain_tag(tag: &str) -> bool {
    !tag.is_empty()
        && tag
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
}

impl RegistryClient for DirectoryRegistryClient {
    fn fetch(&self, reference: &SchemaReference) -> Result<String> {
        let path = self.path_for(reference)?;
        tracing::debug!(path = %path.display(), "fetching schema from directory registry");

        std::fs::read_to_string(&path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => FetchError::NotFound {
                reference: reference.clone(),
            },
            _ => FetchError::Io(err),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_temp_registry_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "schemabind-registry-{tag}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn fetches_versioned_file() {
        let dir = make_temp_registry_dir("fetch");
        std::fs::create_dir_all(dir.join("user")).unwrap();
        std::fs::write(dir.join("user").join("v3.json"), r#"{"type":"object"}"#).unwrap();

        let client = DirectoryRegistryClient::new(&dir);
        let text = client
            .fetch(&SchemaReference::new("user", 3, "json"))
            .unwrap();
        assert_eq!(text, r#"{"type":"object"}"#);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = make_temp_registry_dir("missing");
        let client = DirectoryRegistryClient::new(&dir);

        let err = client
            .fetch(&SchemaReference::new("user", 1, "proto"))
            .unwrap_err();
        assert!(err.is_not_found());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn rejects_subjects_escaping_root() {
        let client = DirectoryRegistryClient::new("/tmp/unused");
        for subject in ["../etc", "a/b", "/abs", ""] {
            let err = client
                .fetch(&SchemaReference::new(subject, 1, "json"))
                .unwrap_err();
            assert!(matches!(err, FetchError::Rejected(_)), "subject {subject:?}");
        }
    }

    #[test]
    fn rejects_format_tags_escaping_root() {
        let client = DirectoryRegistryClient::new("/srv/schemas");
        for format in ["x/../../../etc/passwd", "..", "json/x", "a.b", " "] {
            let err = client
                .path_for(&SchemaReference::new("user", 1, format))
                .unwrap_err();
            assert!(matches!(err, FetchError::Rejected(_)), "format {format:?}");
        }

        let path = client
            .path_for(&SchemaReference::new("user", 1, "json-v2_x"))
            .unwrap();
        assert_eq!(path, PathBuf::from("/srv/schemas/user/v1.json-v2_x"));
    }

    #[test]
    fn path_layout() {
        let client = DirectoryRegistryClient::new("/srv/schemas");
        let path = client
            .path_for(&SchemaReference::new("orders", 12, "proto"))
            .unwrap();
        assert_eq!(path, PathBuf::from("/srv/schemas/orders/v12.proto"));
    }
}
