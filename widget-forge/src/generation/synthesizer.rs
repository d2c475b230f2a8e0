//! Stage 3: Per-file code synthesis
//!
//! Classifies each planned file by directory convention into a role (widget
//! component, data service, or generic) and sends one role-specific
//! completion request per file. Upstream failures are wrapped as
//! [`GenerationError::CodeGenerationFailed`] for that file only; sibling
//! files in the same run are unaffected.

use std::fmt;
use std::sync::Arc;

use anthropic_client::CompletionClient;

use crate::generation::error::GenerationError;
use crate::generation::json::strip_code_fence;
use crate::generation::types::{GenerationRequest, PlanStep, WidgetAnalysis};
use crate::generation::validator::has_dir_segment;

const CODE_MAX_OUTPUT_TOKENS: u32 = 8192;

const SYNTHESIZER_SYSTEM_PROMPT: &str = "You are a senior TypeScript engineer generating production files for a financial dashboard. \
Output only the file content, with no explanation before or after.";

/// Role of a planned file, decided by directory convention. Selects the
/// synthesis prompt template and the validation rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    /// React widget component under a `widgets/` directory
    Widget,
    /// Data-access module under a `services/` directory
    Service,
    /// Anything else (types, utilities, styles)
    Generic,
}

impl FileRole {
    pub fn classify(path: &str) -> Self {
        if has_dir_segment(path, "widgets") {
            FileRole::Widget
        } else if has_dir_segment(path, "services") {
            FileRole::Service
        } else {
            FileRole::Generic
        }
    }
}

impl fmt::Display for FileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileRole::Widget => write!(f, "widget"),
            FileRole::Service => write!(f, "service"),
            FileRole::Generic => write!(f, "generic"),
        }
    }
}

/// Synthesizes source file content, one completion request per file
pub struct CodeSynthesizer {
    client: Arc<CompletionClient>,
}

impl CodeSynthesizer {
    pub fn new(client: Arc<CompletionClient>) -> Self {
        Self { client }
    }

    /// Generate the content of one planned file
    pub async fn synthesize(
        &self,
        path: &str,
        analysis: &WidgetAnalysis,
        request: &GenerationRequest,
        step: &PlanStep,
    ) -> Result<String, GenerationError> {
        let role = FileRole::classify(path);
        let prompt = build_synthesis_prompt(path, role, analysis, request, step);

        let text = self
            .client
            .complete(&prompt, CODE_MAX_OUTPUT_TOKENS, Some(SYNTHESIZER_SYSTEM_PROMPT))
            .await
            .map_err(|e| GenerationError::CodeGenerationFailed {
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        Ok(strip_code_fence(&text))
    }
}

fn build_synthesis_prompt(
    path: &str,
    role: FileRole,
    analysis: &WidgetAnalysis,
    request: &GenerationRequest,
    step: &PlanStep,
) -> String {
    let contract = match role {
        FileRole::Widget => widget_contract(analysis),
        FileRole::Service => service_contract(),
        FileRole::Generic => generic_contract(),
    };

    format!(
        r#"Generate the complete content of the file `{}`.

# Widget
{}: {}

# Original Request
{}

# Current Plan Step
{}

# Structural Contract
{}

Output the full file content and nothing else."#,
        path,
        analysis.widget_title,
        analysis.description,
        request.user_prompt,
        step.description,
        contract
    )
}

fn widget_contract(analysis: &WidgetAnalysis) -> String {
    format!(
        r#"- Export a React functional component named after the file.
- The component must conform to the host widget-prop contract:
  import {{ WidgetProps }} from '../../types/widget' and type the component
  as React.FC<WidgetProps> (or declare an equivalent props interface).
- Import React explicitly.
- Fetch data through the service layer, never fetch() directly.
- Handle loading and error states with LoadingSkeleton / ErrorState.
- Relevant data APIs for this widget: {}."#,
        analysis.required_apis.join(", ")
    )
}

fn service_contract() -> String {
    r#"- Export typed async functions with explicit error handling: check
  response.ok and throw an Error carrying the status on failure.
- Define and export the TypeScript interfaces for the returned data.
- Plain TypeScript only: no JSX, no React imports."#
        .to_string()
}

fn generic_contract() -> String {
    r#"- Export every declaration that other files will import.
- Keep the file self-contained and typed; no implicit any."#
        .to_string()
}
