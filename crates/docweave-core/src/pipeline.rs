//! Analysis pipeline
//!
//! Runs synthesis and graph building for a document set. Each run claims a
//! generation number; a run that finds a newer generation claimed when it
//! resumes reports [`AnalysisRun::Superseded`] instead of a result, and
//! [`GraphController::apply_outcome`](crate::domain::interaction::GraphController::apply_outcome)
//! refuses outcomes older than the one it already shows.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::Config;
use crate::domain::document::DocumentSet;
use crate::domain::graph::{GraphBuilder, KnowledgeGraph};
use crate::domain::synthesis::{SynthesisResult, Synthesizer};
use crate::error::{Error, Result};

/// Document count from which runs yield between phases
pub const DEFAULT_YIELD_THRESHOLD: usize = 50;

/// Opaque analysis call that produces documents
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Human-readable name for logs
    fn name(&self) -> String;

    async fn fetch_documents(&self) -> Result<DocumentSet>;
}

/// Documents read from a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DocumentSource for JsonFileSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_documents(&self) -> Result<DocumentSet> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            Error::DocumentSource(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        DocumentSet::from_json_str(&contents)
    }
}

/// Documents already in memory
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    documents: DocumentSet,
}

impl StaticSource {
    pub fn new(documents: DocumentSet) -> Self {
        Self { documents }
    }
}

#[async_trait]
impl DocumentSource for StaticSource {
    fn name(&self) -> String {
        "static".to_string()
    }

    async fn fetch_documents(&self) -> Result<DocumentSet> {
        Ok(self.documents.clone())
    }
}

/// Result of one completed run
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub generation: u64,
    pub documents: DocumentSet,
    pub synthesis: SynthesisResult,
    pub graph: KnowledgeGraph,
}

/// How a run ended
#[derive(Debug, Clone)]
pub enum AnalysisRun {
    Completed(AnalysisOutcome),
    /// A newer run was started before this one finished
    Superseded { generation: u64, latest: u64 },
}

impl AnalysisRun {
    pub fn into_outcome(self) -> Option<AnalysisOutcome> {
        match self {
            Self::Completed(outcome) => Some(outcome),
            Self::Superseded { .. } => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded { .. })
    }
}

/// Generation-counted synthesis + graph build
#[derive(Debug, Clone)]
pub struct AnalysisPipeline {
    synthesizer: Synthesizer,
    builder: GraphBuilder,
    generation: Arc<AtomicU64>,
    yield_threshold: usize,
}

impl Default for AnalysisPipeline {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl AnalysisPipeline {
    pub fn new(config: &Config) -> Self {
        Self::with_parts(
            Synthesizer::new(config.synthesis.clone()),
            GraphBuilder::from_config(config),
        )
    }

    pub fn with_parts(synthesizer: Synthesizer, builder: GraphBuilder) -> Self {
        Self {
            synthesizer,
            builder,
            generation: Arc::new(AtomicU64::new(0)),
            yield_threshold: DEFAULT_YIELD_THRESHOLD,
        }
    }

    /// Yield between phases for sets of at least `threshold` documents
    pub fn with_yield_threshold(mut self, threshold: usize) -> Self {
        self.yield_threshold = threshold;
        self
    }

    pub fn synthesizer(&self) -> &Synthesizer {
        &self.synthesizer
    }

    pub fn builder(&self) -> &GraphBuilder {
        &self.builder
    }

    /// Latest generation claimed so far
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn claim_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn superseded(&self, generation: u64) -> Option<AnalysisRun> {
        let latest = self.current_generation();
        if latest != generation {
            debug!(generation, latest, "Analysis superseded");
            return Some(AnalysisRun::Superseded { generation, latest });
        }
        None
    }

    fn run_sync(&self, generation: u64, documents: DocumentSet) -> AnalysisOutcome {
        let synthesis = self.synthesizer.synthesize(&documents);
        let graph = self.builder.build(&documents, &synthesis);
        AnalysisOutcome {
            generation,
            documents,
            synthesis,
            graph,
        }
    }

    /// Analyze without yielding
    pub fn analyze_now(&self, documents: DocumentSet) -> AnalysisOutcome {
        let generation = self.claim_generation();
        self.run_sync(generation, documents)
    }

    /// Analyze cooperatively; newer calls supersede older ones
    pub async fn analyze(&self, documents: DocumentSet) -> AnalysisRun {
        let generation = self.claim_generation();
        let cooperative = documents.len() >= self.yield_threshold;
        debug!(generation, document_count = documents.len(), cooperative, "Analysis started");

        if cooperative {
            tokio::task::yield_now().await;
            if let Some(run) = self.superseded(generation) {
                return run;
            }
        }

        let synthesis = self.synthesizer.synthesize(&documents);

        if cooperative {
            tokio::task::yield_now().await;
            if let Some(run) = self.superseded(generation) {
                return run;
            }
        }

        let graph = self.builder.build(&documents, &synthesis);
        if let Some(run) = self.superseded(generation) {
            return run;
        }

        info!(
            generation,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Analysis complete"
        );
        AnalysisRun::Completed(AnalysisOutcome {
            generation,
            documents,
            synthesis,
            graph,
        })
    }

    /// Fetch from a source, then analyze
    pub async fn analyze_source(&self, source: &dyn DocumentSource) -> Result<AnalysisRun> {
        let documents = source.fetch_documents().await?;
        debug!(source = %source.name(), document_count = documents.len(), "Documents fetched");
        Ok(self.analyze(documents).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::Document;

    fn documents(count: u64) -> DocumentSet {
        (1..=count)
            .map(|i| Document::new(i, format!("Doc {}", i), "Finance"))
            .collect()
    }

    #[test]
    fn test_generations_increase() {
        let pipeline = AnalysisPipeline::default();
        assert_eq!(pipeline.current_generation(), 0);
        let first = pipeline.analyze_now(documents(2));
        let second = pipeline.analyze_now(documents(3));
        assert_eq!(first.generation, 1);
        assert_eq!(second.generation, 2);
    }

    #[test]
    fn test_clones_share_counter() {
        let pipeline = AnalysisPipeline::default();
        let clone = pipeline.clone();
        clone.analyze_now(documents(1));
        assert_eq!(pipeline.current_generation(), 1);
    }

    #[tokio::test]
    async fn test_newer_run_supersedes_older() {
        let pipeline = AnalysisPipeline::default().with_yield_threshold(1);
        let (old, new) = tokio::join!(pipeline.analyze(documents(2)), pipeline.analyze(documents(3)));

        assert!(old.is_superseded());
        let outcome = new.into_outcome().unwrap();
        assert_eq!(outcome.generation, 2);
        assert_eq!(outcome.documents.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_set_completes_empty() {
        let run = AnalysisPipeline::default().analyze(DocumentSet::default()).await;
        let outcome = run.into_outcome().unwrap();
        assert!(outcome.graph.is_empty());
        assert!(outcome.synthesis.is_empty());
    }

    #[tokio::test]
    async fn test_json_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs.json");
        std::fs::write(&path, r#"[{"id": 1, "name": "A", "category": "Finance"}]"#).unwrap();

        let documents = JsonFileSource::new(&path).fetch_documents().await.unwrap();
        assert_eq!(documents.len(), 1);

        let missing = JsonFileSource::new(dir.path().join("missing.json"))
            .fetch_documents()
            .await
            .unwrap_err();
        assert_eq!(missing.code(), "E200");
    }

    #[tokio::test]
    async fn test_static_source() {
        let source = StaticSource::new(documents(4));
        let run = AnalysisPipeline::default().analyze_source(&source).await.unwrap();
        assert_eq!(run.into_outcome().unwrap().graph.nodes_of(crate::domain::graph::NodeKind::Document).count(), 4);
    }
}
