mod debloat_processor;
mod manifest_extractor;
mod net_score_calculator;
mod quality_gate;
mod source_classifier;
mod tarball_converter;

pub use debloat_processor::{DebloatProcessor, DebloatStats};
pub use manifest_extractor::{ExtractionError, ManifestExtractor};
pub use net_score_calculator::NetScoreCalculator;
pub use quality_gate::{GateDecision, QualityGate, ACCEPTANCE_THRESHOLD};
pub use source_classifier::{SourceClassifier, SourceKind};
pub use tarball_converter::TarballConverter;
