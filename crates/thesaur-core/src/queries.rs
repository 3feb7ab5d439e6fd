//! Per-vocabulary query facade.
//!
//! [`VocabularyQueries`] runs build → execute → map for every operation of
//! one vocabulary (or of the federated pseudo-vocabulary spanning all of
//! them). It holds only immutable settings, so one instance can serve any
//! number of concurrent calls.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;

use crate::config::{Config, VocabularyConfig};
use crate::dialect::Dialect;
use crate::endpoint::SparqlEndpoint;
use crate::error::Result;
use crate::mapper::ResultMapper;
use crate::prefix::PrefixTable;
use crate::query::QueryBuilder;
use crate::results::{RdfGraph, Solutions};
use crate::types::{
    AlphabeticalEntry, AlphabeticalRequest, ChangedConcept, ChildConcept, ConceptGroup, ConceptHit,
    ConceptRecord, GroupMember, HierarchyNode, IndexLetter, LangCounts, Lookup, PropertyMap,
    SchemeSummary, SearchSpec, TopConcept, TransitiveResult, TypeCount, TypeInfo, Vocabulary,
};

/// Group class assumed when a vocabulary does not configure one.
pub const DEFAULT_GROUP_CLASS: &str = "skos:Collection";

/// Vocabulary-level settings that shape queries beyond the graph and
/// dialect.
#[derive(Debug, Clone)]
pub struct VocabularySettings {
    /// Label language tried after the requested one.
    pub fallback_language: Option<String>,
    pub array_class: Option<String>,
    pub group_class: Option<String>,
    /// Properties pointing from a concept to its parents.
    pub hierarchy_properties: Vec<String>,
    pub alphabetical_qualifier: Option<String>,
}

impl Default for VocabularySettings {
    fn default() -> Self {
        Self {
            fallback_language: None,
            array_class: None,
            group_class: None,
            hierarchy_properties: vec!["skos:broader".to_string()],
            alphabetical_qualifier: None,
        }
    }
}

impl From<&VocabularyConfig> for VocabularySettings {
    fn from(cfg: &VocabularyConfig) -> Self {
        Self {
            fallback_language: cfg.fallback_language().map(str::to_string),
            array_class: cfg.array_class.clone(),
            group_class: cfg.group_class.clone(),
            hierarchy_properties: cfg.hierarchy_properties.clone(),
            alphabetical_qualifier: cfg.alphabetical_qualifier.clone(),
        }
    }
}

pub struct VocabularyQueries<E> {
    vocabulary: Vocabulary,
    /// Vocabularies hits and concept records are attributed to.
    candidates: Vec<Vocabulary>,
    builder: QueryBuilder,
    mapper: ResultMapper,
    settings: VocabularySettings,
    endpoint: E,
}

impl<E: SparqlEndpoint> VocabularyQueries<E> {
    pub fn new(vocabulary: Vocabulary, dialect: Dialect, prefixes: Arc<PrefixTable>, endpoint: E) -> Self {
        Self {
            candidates: vec![vocabulary.clone()],
            builder: QueryBuilder::new(vocabulary.graph.clone(), dialect, Arc::clone(&prefixes)),
            mapper: ResultMapper::new(prefixes),
            settings: VocabularySettings::default(),
            vocabulary,
            endpoint,
        }
    }

    pub fn with_settings(mut self, settings: VocabularySettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_candidates(mut self, candidates: Vec<Vocabulary>) -> Self {
        self.candidates = candidates;
        self
    }

    pub fn with_unknown_vocabulary(mut self, marker: impl Into<String>) -> Self {
        self.mapper = self.mapper.with_unknown_vocabulary(marker);
        self
    }

    /// Facade for the configured vocabulary `id`.
    pub fn from_config(cfg: &Config, id: &str, endpoint: E) -> anyhow::Result<Self> {
        let vocab_cfg = cfg
            .vocabulary(id)
            .with_context(|| format!("no vocabulary {id:?} in configuration"))?;
        Ok(Self::new(
            vocab_cfg.vocabulary(&cfg.endpoint),
            cfg.dialect_for(vocab_cfg)?,
            Arc::new(cfg.prefix_table()),
            endpoint,
        )
        .with_settings(VocabularySettings::from(vocab_cfg))
        .with_unknown_vocabulary(cfg.search.unknown_vocabulary.clone()))
    }

    /// Facade spanning every configured vocabulary through the endpoint's
    /// default graph, with the graph of each hit captured.
    pub fn federated(cfg: &Config, endpoint: E) -> anyhow::Result<Self> {
        let vocabulary = Vocabulary::new("", cfg.federated_graph());
        Ok(Self::new(
            vocabulary,
            cfg.federated_dialect()?,
            Arc::new(cfg.prefix_table()),
            endpoint,
        )
        .with_candidates(cfg.all_vocabularies())
        .with_unknown_vocabulary(cfg.search.unknown_vocabulary.clone()))
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn builder(&self) -> &QueryBuilder {
        &self.builder
    }

    pub fn settings(&self) -> &VocabularySettings {
        &self.settings
    }

    fn fallback(&self) -> Option<&str> {
        self.settings.fallback_language.as_deref()
    }

    // -----------------------------------------------------------------------
    // Execution
    // -----------------------------------------------------------------------

    async fn select(&self, op: &'static str, query: String) -> Result<Solutions> {
        tracing::debug!(op, vocab = %self.vocabulary.id, query = %query, "sparql select");
        let started = Instant::now();
        let solutions = self
            .endpoint
            .select(&query)
            .await
            .inspect_err(|e| tracing::warn!(op, vocab = %self.vocabulary.id, error = %e, "query failed"))?;
        tracing::info!(
            op,
            vocab = %self.vocabulary.id,
            graph = ?self.vocabulary.graph.graph,
            elapsed_ms = started.elapsed().as_millis() as u64,
            rows = solutions.len(),
            "query finished"
        );
        Ok(solutions)
    }

    async fn construct(&self, op: &'static str, query: String) -> Result<RdfGraph> {
        tracing::debug!(op, vocab = %self.vocabulary.id, query = %query, "sparql construct");
        let started = Instant::now();
        let graph = self
            .endpoint
            .construct(&query)
            .await
            .inspect_err(|e| tracing::warn!(op, vocab = %self.vocabulary.id, error = %e, "query failed"))?;
        tracing::info!(
            op,
            vocab = %self.vocabulary.id,
            graph = ?self.vocabulary.graph.graph,
            elapsed_ms = started.elapsed().as_millis() as u64,
            triples = graph.len(),
            "query finished"
        );
        Ok(graph)
    }

    // -----------------------------------------------------------------------
    // Search and index
    // -----------------------------------------------------------------------

    /// Concept search. A spec without vocabularies searches this facade's
    /// candidates.
    pub async fn search(&self, spec: &SearchSpec) -> Result<Vec<ConceptHit>> {
        let mut spec = spec.clone();
        if spec.vocabularies.is_empty() {
            spec.vocabularies = self.candidates.clone();
        }
        let solutions = self.select("search", self.builder.search(&spec)).await?;
        Ok(self.mapper.search_hits(&solutions, &spec))
    }

    pub async fn alphabetical(&self, req: &AlphabeticalRequest) -> Result<Vec<AlphabeticalEntry>> {
        if matches!(&req.letter, IndexLetter::Letter(l) if l.trim().is_empty()) {
            return Ok(Vec::new());
        }
        let mut req = req.clone();
        if req.qualifier.is_none() {
            req.qualifier = self.settings.alphabetical_qualifier.clone();
        }
        let solutions = self.select("alphabetical", self.builder.alphabetical(&req)).await?;
        Ok(self.mapper.alphabetical(&solutions))
    }

    pub async fn first_characters(&self, lang: &str, classes: &[String]) -> Result<Vec<String>> {
        let solutions = self
            .select("first_characters", self.builder.first_characters(lang, classes))
            .await?;
        Ok(self.mapper.first_characters(&solutions))
    }

    // -----------------------------------------------------------------------
    // Labels
    // -----------------------------------------------------------------------

    pub async fn label(&self, uri: &str, lang: &str) -> Result<Lookup<BTreeMap<String, String>>> {
        let solutions = self.select("label", self.builder.label(uri, lang)).await?;
        Ok(self.mapper.label(&solutions))
    }

    pub async fn all_labels(&self, uri: &str, lang: &str) -> Result<Lookup<BTreeMap<String, Vec<String>>>> {
        let solutions = self.select("all_labels", self.builder.all_labels(uri, lang)).await?;
        Ok(self.mapper.all_labels(&solutions))
    }

    pub async fn notation(&self, uri: &str) -> Result<Option<String>> {
        let solutions = self.select("notation", self.builder.notation(uri)).await?;
        Ok(self.mapper.notation(&solutions))
    }

    pub async fn super_properties(&self, uri: &str) -> Result<Option<Vec<String>>> {
        let solutions = self
            .select("super_properties", self.builder.super_properties(uri))
            .await?;
        Ok(self.mapper.super_properties(&solutions))
    }

    // -----------------------------------------------------------------------
    // Hierarchy
    // -----------------------------------------------------------------------

    pub async fn property(&self, uri: &str, prop: &str, lang: &str, any_lang: bool) -> Result<Lookup<PropertyMap>> {
        let solutions = self
            .select("property", self.builder.property(uri, prop, lang, any_lang))
            .await?;
        Ok(self.mapper.property(&solutions, lang))
    }

    /// Transitive closure along `props`, or along the vocabulary's
    /// hierarchy properties when `props` is empty.
    pub async fn transitive(
        &self,
        uri: &str,
        props: &[String],
        lang: &str,
        limit: usize,
        any_lang: bool,
    ) -> Result<Lookup<TransitiveResult>> {
        let props = if props.is_empty() {
            &self.settings.hierarchy_properties[..]
        } else {
            props
        };
        let query = self
            .builder
            .transitive(uri, props, lang, self.fallback(), limit, any_lang);
        let solutions = self.select("transitive", query).await?;
        let result = self.mapper.transitive(&solutions, lang, limit);
        if result.as_found().is_some_and(|r| r.truncated) {
            tracing::debug!(uri, limit, "transitive lookup truncated");
        }
        Ok(result)
    }

    pub async fn children(&self, uri: &str, lang: &str) -> Result<Lookup<Vec<ChildConcept>>> {
        let query = self
            .builder
            .children(uri, lang, self.fallback(), &self.settings.hierarchy_properties);
        let solutions = self.select("children", query).await?;
        Ok(self.mapper.children(&solutions, lang, self.fallback()))
    }

    pub async fn top_concepts(&self, schemes: &[String], lang: &str) -> Result<Vec<TopConcept>> {
        let solutions = self
            .select("top_concepts", self.builder.top_concepts(schemes, lang, self.fallback()))
            .await?;
        Ok(self.mapper.top_concepts(&solutions, lang, self.fallback()))
    }

    pub async fn parent_list(&self, uri: &str, lang: &str) -> Result<Lookup<BTreeMap<String, HierarchyNode>>> {
        let query = self
            .builder
            .parent_list(uri, lang, self.fallback(), &self.settings.hierarchy_properties);
        let solutions = self.select("parent_list", query).await?;
        Ok(self.mapper.parent_list(&solutions, lang))
    }

    // -----------------------------------------------------------------------
    // Groups
    // -----------------------------------------------------------------------

    fn group_class(&self) -> &str {
        self.settings.group_class.as_deref().unwrap_or(DEFAULT_GROUP_CLASS)
    }

    pub async fn groups(&self, lang: &str) -> Result<Vec<ConceptGroup>> {
        let solutions = self
            .select("groups", self.builder.groups(self.group_class(), lang))
            .await?;
        Ok(self.mapper.groups(&solutions))
    }

    pub async fn group_contents(&self, group: &str, lang: &str, include_deprecated: bool) -> Result<Vec<GroupMember>> {
        let query = self
            .builder
            .group_contents(self.group_class(), group, lang, include_deprecated);
        let solutions = self.select("group_contents", query).await?;
        Ok(self.mapper.group_contents(&solutions, lang))
    }

    // -----------------------------------------------------------------------
    // Statistics
    // -----------------------------------------------------------------------

    pub async fn count_concepts(&self, lang: &str) -> Result<Vec<TypeCount>> {
        let query = self.builder.count_concepts(
            self.settings.array_class.as_deref(),
            self.settings.group_class.as_deref(),
        );
        let solutions = self.select("count_concepts", query).await?;
        Ok(self.mapper.count_concepts(&solutions, lang))
    }

    pub async fn count_lang_concepts(&self, langs: &[String], classes: &[String]) -> Result<LangCounts> {
        let solutions = self
            .select("count_lang_concepts", self.builder.count_lang_concepts(langs, classes))
            .await?;
        Ok(self.mapper.count_lang_concepts(&solutions, langs))
    }

    // -----------------------------------------------------------------------
    // Concepts and schemes
    // -----------------------------------------------------------------------

    /// The raw concept-info graph for `uris`.
    pub async fn concept_info_graph(&self, uris: &[String]) -> Result<RdfGraph> {
        let query = self
            .builder
            .concept_info(uris, self.settings.array_class.as_deref(), &self.candidates);
        self.construct("concept_info", query).await
    }

    /// Typed records for `uris`; URIs that do not exist are left out.
    pub async fn concept_info(&self, uris: &[String]) -> Result<Vec<ConceptRecord>> {
        if uris.is_empty() {
            return Ok(Vec::new());
        }
        let graph = self.concept_info_graph(uris).await?;
        Ok(self.mapper.concept_records(&graph, uris, &self.candidates))
    }

    pub async fn types(&self, lang: &str) -> Result<BTreeMap<String, TypeInfo>> {
        let solutions = self.select("types", self.builder.types(lang)).await?;
        Ok(self.mapper.types(&solutions))
    }

    pub async fn concept_scheme(&self, scheme: &str) -> Result<RdfGraph> {
        self.construct("concept_scheme", self.builder.concept_scheme(scheme))
            .await
    }

    pub async fn concept_schemes(&self, lang: &str) -> Result<BTreeMap<String, SchemeSummary>> {
        let solutions = self
            .select("concept_schemes", self.builder.concept_schemes(lang))
            .await?;
        Ok(self.mapper.concept_schemes(&solutions, lang))
    }

    pub async fn change_list(&self, lang: &str, offset: usize, prop: &str) -> Result<Vec<ChangedConcept>> {
        let solutions = self
            .select("change_list", self.builder.change_list(lang, offset, prop))
            .await?;
        Ok(self.mapper.change_list(&solutions))
    }
}
