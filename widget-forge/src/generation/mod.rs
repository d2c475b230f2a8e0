//! Widget generation pipeline.
//!
//! Turns a free-text feature request into a validated, persisted set of
//! source-code artifacts plus declarative registry update plans for the host
//! dashboard. The pipeline runs in stages: request analysis, implementation
//! planning, per-file code synthesis, content validation, artifact storage,
//! and registry planning. Analysis and planning failures are fatal to the
//! run; synthesis and validation failures are local to one file and are
//! collected into the run report.

pub mod analyzer;
pub mod artifact_store;
pub mod cli;
pub mod error;
pub mod json;
pub mod planner;
pub mod registry;
pub mod synthesizer;
pub mod types;
pub mod validator;
pub mod workflow;

// Re-export commonly used types
pub use analyzer::RequestAnalyzer;
pub use artifact_store::ArtifactStore;
pub use error::GenerationError;
pub use planner::PlanGenerator;
pub use registry::RegistryPlanner;
pub use synthesizer::{CodeSynthesizer, FileRole};
pub use types::{
    CompanyContext, Complexity, FileError, GeneratedFile, GeneratedWidget, GenerationRequest,
    ImplementationPlan, ManifestEntry, PlanStep, RegistryUpdatePlan, RegistryUpdatePlans,
    StoredArtifact, UpdateChange, ValidationResult, WidgetAnalysis, WriteReport,
};
pub use validator::validate;
pub use workflow::{GenerationPipeline, GenerationReport};
