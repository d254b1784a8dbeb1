use super::{Metric, ScoringTarget};
use crate::ingestion::domain::MetricKind;
use crate::ports::outbound::{SourceHost, TreeEntry};
use crate::shared::Result;
use async_trait::async_trait;
use std::sync::Arc;

const DOC_EXTENSIONS: [&str; 5] = ["md", "markdown", "rst", "txt", "adoc"];

const CODE_EXTENSIONS: [&str; 15] = [
    "js", "mjs", "cjs", "ts", "tsx", "jsx", "py", "java", "c", "cpp", "cs", "rb", "php", "go", "rs",
];

/// A doc/code byte ratio of 1:4 or better earns the full score
const RATIO_SCALE: f64 = 4.0;

/// RampUp: how much documentation there is relative to code
pub struct RampUpMetric {
    host: Arc<dyn SourceHost>,
}

impl RampUpMetric {
    pub fn new(host: Arc<dyn SourceHost>) -> Self {
        Self { host }
    }

    pub fn score(tree: &[TreeEntry]) -> f64 {
        let mut doc_bytes = 0u64;
        let mut code_bytes = 0u64;
        for entry in tree {
            if Self::is_documentation(&entry.path) {
                doc_bytes += entry.size;
            } else if Self::is_code(&entry.path) {
                code_bytes += entry.size;
            }
        }

        match (doc_bytes, code_bytes) {
            (0, 0) => 0.0,
            (_, 0) => 1.0,
            (docs, code) => (RATIO_SCALE * docs as f64 / code as f64).min(1.0),
        }
    }

    fn extension(path: &str) -> Option<String> {
        let file_name = path.rsplit('/').next()?;
        let (_, ext) = file_name.rsplit_once('.')?;
        Some(ext.to_ascii_lowercase())
    }

    fn is_documentation(path: &str) -> bool {
        let in_doc_dir = path
            .split('/')
            .rev()
            .skip(1)
            .any(|dir| dir.eq_ignore_ascii_case("doc") || dir.eq_ignore_ascii_case("docs"));
        in_doc_dir
            || Self::extension(path).is_some_and(|ext| DOC_EXTENSIONS.contains(&ext.as_str()))
    }

    fn is_code(path: &str) -> bool {
        Self::extension(path).is_some_and(|ext| CODE_EXTENSIONS.contains(&ext.as_str()))
    }
}

#[async_trait]
impl Metric for RampUpMetric {
    fn kind(&self) -> MetricKind {
        MetricKind::RampUp
    }

    async fn compute(&self, target: &ScoringTarget) -> Result<Option<f64>> {
        let tree = self.host.repository_tree(target.repo()).await?;
        Ok(Some(Self::score(&tree)))
    }
}
