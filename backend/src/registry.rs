//! Static registry of upstream calendar feeds.
//!
//! The registry is loaded once at startup from a TOML file and never mutated
//! afterwards, so handlers share it behind an `Arc` without locking.

use serde::Deserialize;
use shared::CalendarInfo;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One configured upstream calendar feed.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct CalendarSource {
    pub id: String,
    pub name: String,
    /// Secret feed url. Never serialized to clients.
    pub url: String,
    pub color: String,
}

impl CalendarSource {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        url: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: url.into(),
            color: color.into(),
        }
    }

    /// Client-visible metadata, without the url.
    pub fn info(&self) -> CalendarInfo {
        CalendarInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            color: self.color.clone(),
        }
    }
}

// Keeps feed urls out of logs.
impl fmt::Debug for CalendarSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarSource")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("url", &"<redacted>")
            .field("color", &self.color)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Failed to read calendar config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid calendar config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Calendar entry {index} has an empty id")]
    EmptyId { index: usize },

    #[error("Calendar '{id}' has an empty url")]
    EmptyUrl { id: String },

    #[error("Duplicate calendar id '{id}'")]
    DuplicateId { id: String },
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    calendars: Vec<CalendarSource>,
}

/// Ordered, immutable set of calendar sources.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    sources: Vec<CalendarSource>,
}

impl SourceRegistry {
    /// Build a registry, rejecting empty fields and duplicate ids.
    pub fn new(sources: Vec<CalendarSource>) -> Result<Self, RegistryError> {
        validate(&sources)?;
        Ok(Self { sources })
    }

    /// Load `[[calendars]]` entries from a TOML file.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path).map_err(|source| RegistryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, RegistryError> {
        let file: RegistryFile = toml::from_str(content).map_err(|source| RegistryError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(file.calendars)
    }

    pub fn all(&self) -> &[CalendarSource] {
        &self.sources
    }

    pub fn find(&self, id: &str) -> Option<&CalendarSource> {
        self.sources.iter().find(|source| source.id == id)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Display names joined for log output.
    pub fn names(&self) -> String {
        self.sources
            .iter()
            .map(|source| source.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn validate(sources: &[CalendarSource]) -> Result<(), RegistryError> {
    let mut seen = HashSet::with_capacity(sources.len());
    for (index, source) in sources.iter().enumerate() {
        if source.id.trim().is_empty() {
            return Err(RegistryError::EmptyId { index });
        }
        if source.url.trim().is_empty() {
            return Err(RegistryError::EmptyUrl {
                id: source.id.clone(),
            });
        }
        if !seen.insert(source.id.as_str()) {
            return Err(RegistryError::DuplicateId {
                id: source.id.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"
[[calendars]]
id = "j26"
name = "J26"
url = "https://feeds.example.com/j26.ics"
color = "#3788d8"

[[calendars]]
id = "s24"
name = "S24"
url = "https://feeds.example.com/s24.ics"
color = "#28a745"
"##;

    fn parse(content: &str) -> Result<SourceRegistry, RegistryError> {
        SourceRegistry::parse(content, Path::new("calendars.toml"))
    }

    #[test]
    fn test_parses_sources_in_file_order() {
        let registry = parse(SAMPLE).expect("should parse");
        let ids: Vec<_> = registry.all().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["j26", "s24"]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), "J26, S24");
    }

    #[test]
    fn test_find_known_and_unknown() {
        let registry = parse(SAMPLE).expect("should parse");
        assert_eq!(registry.find("s24").map(|s| s.color.as_str()), Some("#28a745"));
        assert!(registry.find("j27").is_none());
        assert!(registry.find("").is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = SourceRegistry::new(vec![
            CalendarSource::new("a", "A", "https://one.example.com", "#000"),
            CalendarSource::new("a", "A again", "https://two.example.com", "#fff"),
        ]);
        assert!(matches!(result, Err(RegistryError::DuplicateId { id }) if id == "a"));
    }

    #[test]
    fn test_empty_id_and_url_rejected() {
        let empty_id = SourceRegistry::new(vec![CalendarSource::new(
            " ",
            "Blank",
            "https://one.example.com",
            "#000",
        )]);
        assert!(matches!(empty_id, Err(RegistryError::EmptyId { index: 0 })));

        let empty_url = SourceRegistry::new(vec![CalendarSource::new("a", "A", "", "#000")]);
        assert!(matches!(empty_url, Err(RegistryError::EmptyUrl { .. })));
    }

    #[test]
    fn test_empty_file_is_empty_registry() {
        let registry = parse("").expect("should parse");
        assert!(registry.is_empty());
    }

    #[test]
    fn test_missing_field_is_parse_error() {
        let result = parse("[[calendars]]\nid = \"a\"\n");
        assert!(matches!(result, Err(RegistryError::Parse { .. })));
    }

    #[test]
    fn test_load_from_disk() {
        let path = std::env::temp_dir().join(format!(
            "calendar-proxy-registry-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, SAMPLE).expect("should write sample");

        let registry = SourceRegistry::load(&path).expect("should load");
        assert_eq!(registry.len(), 2);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_missing_file_fails() {
        let path = std::env::temp_dir().join("calendar-proxy-does-not-exist.toml");
        assert!(matches!(
            SourceRegistry::load(&path),
            Err(RegistryError::Read { .. })
        ));
    }

    #[test]
    fn test_debug_redacts_url() {
        let source = CalendarSource::new("a", "A", "https://secret.example.com/token", "#000");
        let debug = format!("{:?}", source);
        assert!(!debug.contains("secret.example.com"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_info_drops_url() {
        let source = CalendarSource::new("a", "A", "https://secret.example.com/token", "#000");
        let info = source.info();
        assert_eq!(info.id, "a");
        assert_eq!(info.name, "A");
        assert_eq!(info.color, "#000");
    }
}
