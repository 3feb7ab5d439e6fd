//! Configuration types for thesaur.
//!
//! [`Config::load`] layers the embedded defaults, an optional TOML file and
//! `THESAUR__SECTION__KEY` environment variables. [`Config::defaults`]
//! returns the embedded defaults without touching the filesystem or the
//! environment (useful in tests).

use anyhow::Context;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::dialect::{Dialect, DEFAULT_TEXT_INDEX_MAX_RESULTS};
use crate::prefix::PrefixTable;
use crate::types::{GraphRef, GraphTarget, Vocabulary};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[endpoint]
url          = "http://localhost:3030/skosmos/sparql"
timeout_secs = 20
dialect      = "generic"

[search]
text_index_max_results = 100000
default_limit          = 50
unknown_vocabulary     = "unknown"
collation              = false
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration, loaded from `~/.config/thesaur/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub search: SearchConfig,
    /// Extra prefix → namespace pairs on top of the built-in table.
    #[serde(default)]
    pub prefixes: BTreeMap<String, String>,
    #[serde(default)]
    pub vocabularies: Vec<VocabularyConfig>,
}

/// `[endpoint]` section. The dialect here also applies to federated
/// searches across every configured vocabulary.
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_dialect")]
    pub dialect: String,
}

fn default_url() -> String { "http://localhost:3030/skosmos/sparql".to_string() }
fn default_timeout_secs() -> u64 { 20 }
fn default_dialect() -> String { "generic".to_string() }

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
            dialect: default_dialect(),
        }
    }
}

/// `[search]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Hits requested from a text index. Text indexes truncate silently
    /// beyond this.
    #[serde(default = "default_text_index_max_results")]
    pub text_index_max_results: usize,
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_unknown_vocabulary")]
    pub unknown_vocabulary: String,
    #[serde(default)]
    pub collation: bool,
}

fn default_text_index_max_results() -> usize { DEFAULT_TEXT_INDEX_MAX_RESULTS }
fn default_limit() -> usize { 50 }
fn default_unknown_vocabulary() -> String { crate::mapper::DEFAULT_UNKNOWN_VOCABULARY.to_string() }

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            text_index_max_results: default_text_index_max_results(),
            default_limit: default_limit(),
            unknown_vocabulary: default_unknown_vocabulary(),
            collation: false,
        }
    }
}

/// One `[[vocabularies]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct VocabularyConfig {
    pub id: String,
    /// `"?"` for federated mode; omitted for the endpoint's default graph.
    #[serde(default)]
    pub graph: Option<String>,
    /// Overrides `[endpoint] url`.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub uri_space: Option<String>,
    /// Overrides `[endpoint] dialect`.
    #[serde(default)]
    pub dialect: Option<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub default_language: Option<String>,
    #[serde(default)]
    pub search_by_notation: bool,
    #[serde(default)]
    pub array_class: Option<String>,
    #[serde(default)]
    pub group_class: Option<String>,
    #[serde(default = "default_hierarchy_properties")]
    pub hierarchy_properties: Vec<String>,
    #[serde(default)]
    pub alphabetical_qualifier: Option<String>,
}

fn default_hierarchy_properties() -> Vec<String> { vec!["skos:broader".to_string()] }

impl VocabularyConfig {
    pub fn graph_ref(&self, endpoint: &EndpointConfig) -> GraphRef {
        GraphRef::new(
            self.endpoint.clone().unwrap_or_else(|| endpoint.url.clone()),
            GraphTarget::parse(self.graph.as_deref()),
        )
    }

    pub fn vocabulary(&self, endpoint: &EndpointConfig) -> Vocabulary {
        let mut vocab = Vocabulary::new(self.id.clone(), self.graph_ref(endpoint));
        vocab.uri_space = self.uri_space.clone();
        vocab.search_by_notation = self.search_by_notation;
        vocab
    }

    /// Language used when a label is missing in the requested one.
    pub fn fallback_language(&self) -> Option<&str> {
        self.default_language
            .as_deref()
            .or_else(|| self.languages.first().map(String::as_str))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load configuration layered on top of the built-in defaults. An
    /// explicit `path` must exist; otherwise `~/.config/thesaur/config.toml`
    /// is created with the defaults on first use.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => {
                let path = config_path();
                if !path.exists() {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
                }
                (path, false)
            }
        };

        let cfg: Self = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path.as_path()).required(required))
            .add_source(config::Environment::with_prefix("THESAUR").separator("__"))
            .build()
            .with_context(|| format!("reading {}", path.display()))?
            .try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// Reject unknown dialect names and duplicate vocabulary ids up front.
    fn validate(&self) -> anyhow::Result<()> {
        self.dialect_named(&self.endpoint.dialect)?;
        let mut seen = std::collections::HashSet::new();
        for vocab in &self.vocabularies {
            if !seen.insert(vocab.id.as_str()) {
                anyhow::bail!("vocabulary {:?} is configured twice", vocab.id);
            }
            self.dialect_for(vocab)?;
        }
        Ok(())
    }

    pub fn vocabulary(&self, id: &str) -> Option<&VocabularyConfig> {
        self.vocabularies.iter().find(|v| v.id == id)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.endpoint.timeout_secs)
    }

    pub fn prefix_table(&self) -> PrefixTable {
        PrefixTable::with_extra(self.prefixes.clone())
    }

    pub fn dialect_for(&self, vocab: &VocabularyConfig) -> anyhow::Result<Dialect> {
        self.dialect_named(vocab.dialect.as_deref().unwrap_or(&self.endpoint.dialect))
    }

    /// Dialect used for searches spanning every vocabulary.
    pub fn federated_dialect(&self) -> anyhow::Result<Dialect> {
        self.dialect_named(&self.endpoint.dialect)
    }

    /// Graph reference of the federated pseudo-vocabulary: the configured
    /// endpoint with the graph left unbound.
    pub fn federated_graph(&self) -> GraphRef {
        GraphRef::new(self.endpoint.url.clone(), GraphTarget::Wildcard)
    }

    /// Every configured vocabulary as a search candidate.
    pub fn all_vocabularies(&self) -> Vec<Vocabulary> {
        self.vocabularies
            .iter()
            .map(|v| v.vocabulary(&self.endpoint))
            .collect()
    }

    fn dialect_named(&self, name: &str) -> anyhow::Result<Dialect> {
        Dialect::parse(name, self.search.text_index_max_results, self.search.collation)
            .with_context(|| format!("unknown SPARQL dialect {name:?}"))
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("thesaur")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::DialectStrategy;
    use std::io::Write;

    #[test]
    fn defaults_load() {
        let cfg = Config::defaults();
        assert_eq!(cfg.endpoint.timeout_secs, 20);
        assert_eq!(cfg.search.text_index_max_results, 100_000);
        assert_eq!(cfg.search.unknown_vocabulary, "unknown");
        assert!(cfg.vocabularies.is_empty());
        assert_eq!(cfg.federated_dialect().unwrap().name(), "generic");
    }

    #[test]
    fn file_layers_over_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
[endpoint]
url = "http://store.example/sparql"

[prefixes]
yso = "http://www.yso.fi/onto/yso/"

[[vocabularies]]
id = "yso"
graph = "http://www.yso.fi/onto/yso/"
uri_space = "http://www.yso.fi/onto/yso/"
dialect = "jena-text"
languages = ["fi", "sv", "en"]

[[vocabularies]]
id = "all"
graph = "?"
"#
        )
        .unwrap();

        let cfg = Config::load(Some(file.path())).unwrap();
        assert_eq!(cfg.endpoint.timeout_secs, 20);
        let yso = cfg.vocabulary("yso").unwrap();
        assert_eq!(yso.fallback_language(), Some("fi"));
        assert_eq!(yso.hierarchy_properties, vec!["skos:broader".to_string()]);
        assert_eq!(cfg.dialect_for(yso).unwrap().name(), "jena-text");

        let vocab = yso.vocabulary(&cfg.endpoint);
        assert_eq!(vocab.graph.endpoint, "http://store.example/sparql");
        assert_eq!(vocab.local_name("http://www.yso.fi/onto/yso/p123"), "p123");

        let all = cfg.vocabulary("all").unwrap();
        assert!(all.graph_ref(&cfg.endpoint).graph.is_wildcard());
        assert_eq!(cfg.prefix_table().namespace("yso"), Some("http://www.yso.fi/onto/yso/"));
    }

    #[test]
    fn unknown_dialect_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "[[vocabularies]]\nid = \"x\"\ndialect = \"sesame\"\n").unwrap();
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("sesame"));
    }

    #[test]
    fn duplicate_vocabulary_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "[[vocabularies]]\nid = \"x\"\n\n[[vocabularies]]\nid = \"x\"\n").unwrap();
        assert!(Config::load(Some(file.path())).is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("nope.toml"))).is_err());
    }
}
