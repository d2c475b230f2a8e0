//! Data structures for the generation pipeline.
//!
//! The model-facing shapes ([`WidgetAnalysis`], [`ImplementationPlan`]) use
//! the host project's JSON casing and reject unknown fields, so a response
//! that drifts from the documented schema fails parsing instead of being
//! silently accepted.

use serde::{Deserialize, Serialize};

/// Company context attached to a generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyContext {
    pub symbol: String,
    pub name: String,
    pub industry: String,
}

/// Immutable input to a single pipeline run
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Free-text feature request; must be non-empty
    pub user_prompt: String,
    pub company_context: Option<CompanyContext>,
}

impl GenerationRequest {
    pub fn new(user_prompt: impl Into<String>) -> Self {
        Self {
            user_prompt: user_prompt.into(),
            company_context: None,
        }
    }

    pub fn with_company(mut self, context: CompanyContext) -> Self {
        self.company_context = Some(context);
        self
    }
}

/// Estimated implementation complexity of the requested widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Complexity {
    Simple,
    Moderate,
    Complex,
}

/// Structured analysis of a feature request, produced once per run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WidgetAnalysis {
    pub complexity: Complexity,
    pub estimated_time: String,
    #[serde(rename = "requiredAPIs")]
    pub required_apis: Vec<String>,
    pub components: Vec<String>,
    pub risks: Vec<String>,
    /// Kebab-case identifier, e.g. `moving-average-chart`
    pub widget_type: String,
    /// Human-readable label, e.g. `Moving Average Chart`
    pub widget_title: String,
    pub description: String,
}

/// One ordered unit of an implementation plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanStep {
    /// 1-based, sequential, no gaps
    pub step: u32,
    pub description: String,
    /// Relative project paths, non-empty
    pub files: Vec<String>,
    pub estimated_duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Ordered implementation plan derived from a [`WidgetAnalysis`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ImplementationPlan {
    pub steps: Vec<PlanStep>,
    /// Must equal `steps.len()`
    pub total_steps: usize,
}

impl ImplementationPlan {
    /// All file paths named across all steps, in step order
    pub fn all_files(&self) -> Vec<&str> {
        self.steps
            .iter()
            .flat_map(|step| step.files.iter().map(String::as_str))
            .collect()
    }
}

/// One synthesized source file; `path` is the join key back to the plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// Terminal artifact of a successful run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedWidget {
    pub widget_type: String,
    pub title: String,
    pub description: String,
    pub files: Vec<GeneratedFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<String>>,
}

/// Outcome of validating one file; consumed synchronously, never persisted
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub valid: bool,
    pub reason: Option<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
        }
    }
}

/// Manifest index entry; the manifest is the authoritative index of the
/// artifact store, keyed by `path` with last-write-wins upserts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub path: String,
    /// ISO-8601 timestamp of the write
    pub timestamp: String,
    /// Byte length of the stored content
    pub size: usize,
}

/// A per-file failure collected into a run report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileError {
    pub path: String,
    pub reason: String,
}

/// Result of persisting a batch of generated files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteReport {
    /// True iff at least one file was written and zero files errored
    pub success: bool,
    pub written_files: Vec<String>,
    pub errors: Vec<FileError>,
}

/// One artifact re-enumerated from the manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredArtifact {
    pub path: String,
    pub content: String,
    pub timestamp: String,
}

/// A single edit intent inside a registry update plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UpdateChange {
    /// Add an import line to the container
    AddImport { import: String },
    /// Add a dispatch case to the container's widget switch
    AddDispatchCase { case: String },
    /// Extend the widget type union with a new literal
    AddUnionMember { literal: String },
    /// Add an entry to the widget library catalog
    AddLibraryEntry {
        widget_type: String,
        title: String,
        category: String,
        icon: String,
    },
}

/// Declarative description of edits the host project should make to one
/// file; an edit intent, never an edit result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryUpdatePlan {
    pub file: String,
    pub changes: Vec<UpdateChange>,
}

/// The three update plans recorded for one widget registration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryUpdatePlans {
    /// Container wiring: import + dispatch case
    pub widget: RegistryUpdatePlan,
    /// Type-union extension
    pub types: RegistryUpdatePlan,
    /// Library catalog entry
    pub library: RegistryUpdatePlan,
}
