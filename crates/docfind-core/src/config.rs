//! Widget configuration management.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Main configuration structure for docfind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Index and query settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// Page markup contract.
    #[serde(default)]
    pub widget: WidgetConfig,
}

/// Document fields that can be indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    /// Page title.
    Title,
    /// Page body text.
    Content,
}

impl SearchField {
    /// Name used in schemas and `field:term` query clauses.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Content => "content",
        }
    }

    /// Parse a field name as written in a query.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "title" => Some(Self::Title),
            "content" => Some(Self::Content),
            _ => None,
        }
    }
}

/// How typed tokens are turned into query clauses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// Tokens are passed through unchanged.
    #[default]
    Exact,
    /// Each token is wrapped as `*token*`.
    Wildcard,
}

/// Search configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Fields to include in the index.
    #[serde(default = "default_fields")]
    pub fields: Vec<SearchField>,

    /// Token transformation applied before querying.
    #[serde(default)]
    pub mode: QueryMode,

    /// Maximum number of rendered results; unlimited when unset.
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Element ids and classes the widget expects in the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Id of the search text input.
    #[serde(default = "default_input_id")]
    pub input_id: String,

    /// Id of the results container.
    #[serde(default = "default_dropdown_id")]
    pub dropdown_id: String,

    /// Prefix of the positional id given to each result entry.
    #[serde(default = "default_entry_prefix")]
    pub entry_prefix: String,

    /// Class toggled on the results container while it is visible.
    #[serde(default = "default_show_class")]
    pub show_class: String,
}

// Default value functions
fn default_fields() -> Vec<SearchField> {
    vec![SearchField::Content]
}

fn default_input_id() -> String {
    "search-bar".to_string()
}

fn default_dropdown_id() -> String {
    "search-dropdown-content".to_string()
}

fn default_entry_prefix() -> String {
    "result-".to_string()
}

fn default_show_class() -> String {
    "show".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fields: default_fields(),
            mode: QueryMode::default(),
            limit: None,
        }
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            input_id: default_input_id(),
            dropdown_id: default_dropdown_id(),
            entry_prefix: default_entry_prefix(),
            show_class: default_show_class(),
        }
    }
}

impl WidgetConfig {
    /// Positional element id of the result entry at `index`.
    pub fn entry_id(&self, index: usize) -> String {
        format!("{}{index}", self.entry_prefix)
    }
}

impl Config {
    /// Parse configuration from a TOML string, e.g. one embedded in the binary.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| CoreError::config_with_source("Failed to parse config", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration using the config crate, with `DOCFIND__*` overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("DOCFIND").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.search.fields.is_empty() {
            return Err(CoreError::config("search.fields cannot be empty"));
        }

        if self.search.limit == Some(0) {
            return Err(CoreError::config("search.limit must be greater than zero"));
        }

        let ids = [
            ("widget.input_id", &self.widget.input_id),
            ("widget.dropdown_id", &self.widget.dropdown_id),
            ("widget.entry_prefix", &self.widget.entry_prefix),
            ("widget.show_class", &self.widget.show_class),
        ];
        for (name, value) in ids {
            if value.trim().is_empty() {
                return Err(CoreError::config(format!("{name} cannot be empty")));
            }
        }

        if self.search.mode == QueryMode::Wildcard {
            tracing::debug!("search.mode = wildcard, tokens will be wrapped in '*'");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn create_test_config() -> String {
        r#"
[search]
fields = ["title", "content"]
mode = "wildcard"
limit = 8

[widget]
input_id = "docs-search"
dropdown_id = "docs-results"
entry_prefix = "hit-"
show_class = "open"
"#
        .to_string()
    }

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("docfind.toml");
        let mut file = std::fs::File::create(&config_path).expect("create file");
        file.write_all(create_test_config().as_bytes())
            .expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(
            config.search.fields,
            vec![SearchField::Title, SearchField::Content]
        );
        assert_eq!(config.search.mode, QueryMode::Wildcard);
        assert_eq!(config.search.limit, Some(8));
        assert_eq!(config.widget.input_id, "docs-search");
        assert_eq!(config.widget.dropdown_id, "docs-results");
        assert_eq!(config.widget.entry_id(3), "hit-3");
        assert_eq!(config.widget.show_class, "open");
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_toml_str("").expect("empty config");

        assert_eq!(config, Config::default());
        assert_eq!(config.search.fields, vec![SearchField::Content]);
        assert_eq!(config.search.mode, QueryMode::Exact);
        assert_eq!(config.search.limit, None);
        assert_eq!(config.widget.input_id, "search-bar");
        assert_eq!(config.widget.dropdown_id, "search-dropdown-content");
        assert_eq!(config.widget.entry_id(0), "result-0");
        assert_eq!(config.widget.show_class, "show");
    }

    #[test]
    fn test_load_with_env_reads_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("docfind.toml");
        std::fs::write(&config_path, create_test_config()).expect("write");

        let config = Config::load_with_env(&config_path).expect("load config");
        assert_eq!(config.search.mode, QueryMode::Wildcard);
        assert_eq!(config.widget.input_id, "docs-search");
    }

    /// Set in the child process spawned by `test_load_with_env_overrides`.
    const ENV_CHILD_CONFIG: &str = "DOCFIND_TEST_ENV_CONFIG";

    #[test]
    fn test_load_with_env_overrides() {
        // Child: the overrides are in this process's environment
        if let Ok(path) = std::env::var(ENV_CHILD_CONFIG) {
            let config = Config::load_with_env(Path::new(&path)).expect("load config");
            assert_eq!(config.search.mode, QueryMode::Wildcard);
            assert_eq!(config.search.limit, Some(3));
            assert_eq!(config.widget.input_id, "q");
            assert_eq!(config.widget.dropdown_id, "docs-results");
            return;
        }

        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("docfind.toml");
        let base = create_test_config().replace("mode = \"wildcard\"", "mode = \"exact\"");
        std::fs::write(&config_path, base).expect("write");

        let exe = std::env::current_exe().expect("test binary");
        let status = std::process::Command::new(exe)
            .args([
                "--exact",
                "config::tests::test_load_with_env_overrides",
                "--test-threads=1",
            ])
            .env(ENV_CHILD_CONFIG, &config_path)
            .env("DOCFIND__SEARCH__LIMIT", "3")
            .env("DOCFIND__SEARCH__MODE", "wildcard")
            .env("DOCFIND__WIDGET__INPUT_ID", "q")
            .status()
            .expect("run child test");
        assert!(status.success());

        // Without the overrides the file wins
        let config = Config::load_with_env(&config_path).expect("load config");
        assert_eq!(config.search.mode, QueryMode::Exact);
        assert_eq!(config.search.limit, Some(8));
    }

    #[test]
    fn test_config_validation_empty_fields() {
        let result = Config::from_toml_str("[search]\nfields = []\n");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("search.fields cannot be empty")
        );
    }

    #[test]
    fn test_config_validation_empty_id() {
        let result = Config::from_toml_str("[widget]\ninput_id = \" \"\n");
        assert!(result.unwrap_err().to_string().contains("widget.input_id"));
    }

    #[test]
    fn test_config_validation_zero_limit() {
        assert!(Config::from_toml_str("[search]\nlimit = 0\n").is_err());
    }

    #[test]
    fn test_config_unknown_mode() {
        assert!(Config::from_toml_str("[search]\nmode = \"fuzzy\"\n").is_err());
    }

    #[test]
    fn test_config_not_found() {
        let result = Config::load(Path::new("/nonexistent/docfind.toml"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_search_field_names() {
        assert_eq!(SearchField::from_name("title"), Some(SearchField::Title));
        assert_eq!(SearchField::from_name("content"), Some(SearchField::Content));
        assert_eq!(SearchField::from_name("body"), None);
        assert_eq!(SearchField::Content.as_str(), "content");
    }
}
