//! Stage 2: Implementation planning
//!
//! Turns a [`WidgetAnalysis`] into an ordered [`ImplementationPlan`]. The
//! prompt asks for dependency order (services before components, components
//! before integration) but the generator does not verify that ordering; it
//! trusts the model and validates structural shape only.

use std::sync::Arc;

use anthropic_client::CompletionClient;

use crate::generation::error::GenerationError;
use crate::generation::json::extract_and_parse;
use crate::generation::types::{GenerationRequest, ImplementationPlan, WidgetAnalysis};

const PLAN_MAX_OUTPUT_TOKENS: u32 = 4096;

const PLANNER_SYSTEM_PROMPT: &str = "You are an implementation planner for a financial dashboard codebase. \
You respond with a single JSON object, no markdown fences and no commentary.";

/// Generates ordered implementation plans from widget analyses
pub struct PlanGenerator {
    client: Arc<CompletionClient>,
}

impl PlanGenerator {
    pub fn new(client: Arc<CompletionClient>) -> Self {
        Self { client }
    }

    /// Produce an implementation plan for the analyzed widget
    pub async fn plan(
        &self,
        analysis: &WidgetAnalysis,
        request: &GenerationRequest,
    ) -> Result<ImplementationPlan, GenerationError> {
        let prompt = build_plan_prompt(analysis, request);

        let text = self
            .client
            .complete(&prompt, PLAN_MAX_OUTPUT_TOKENS, Some(PLANNER_SYSTEM_PROMPT))
            .await?;

        let plan: ImplementationPlan = extract_and_parse(&text, "implementation plan")?;
        validate_plan(&plan)?;
        Ok(plan)
    }
}

fn build_plan_prompt(analysis: &WidgetAnalysis, request: &GenerationRequest) -> String {
    // Analysis serialization cannot fail: the type has no non-string keys
    let analysis_json =
        serde_json::to_string_pretty(analysis).unwrap_or_else(|_| "{}".to_string());

    format!(
        r#"Create a step-by-step implementation plan for this widget.

# Original Request
{}

# Widget Analysis
{}

# Planning Rules
- Order steps by dependency: data/service files first, then components, then integration.
- Each step names the concrete files it creates under src/services/, src/components/widgets/ or src/types/.
- Keep the plan minimal: typically one service file and one widget component.

Respond with ONLY a JSON object of this exact shape:
{{
  "steps": [
    {{
      "step": 1,
      "description": "what this step accomplishes",
      "files": ["src/services/exampleService.ts"],
      "estimated_duration": "30 minutes"
    }}
  ],
  "totalSteps": 1
}}

Step numbers start at 1 and increase without gaps. "totalSteps" must equal
the number of steps. Do not add fields beyond the ones listed."#,
        request.user_prompt, analysis_json
    )
}

/// Structural shape validation: non-empty steps and files, gap-free 1-based
/// numbering, consistent step count
fn validate_plan(plan: &ImplementationPlan) -> Result<(), GenerationError> {
    if plan.steps.is_empty() {
        return Err(GenerationError::MalformedModelOutput {
            expected: "implementation plan",
            detail: "plan contains no steps".to_string(),
        });
    }
    if plan.total_steps != plan.steps.len() {
        return Err(GenerationError::MalformedModelOutput {
            expected: "implementation plan",
            detail: format!(
                "totalSteps is {} but {} steps were provided",
                plan.total_steps,
                plan.steps.len()
            ),
        });
    }
    for (index, step) in plan.steps.iter().enumerate() {
        let expected_number = (index + 1) as u32;
        if step.step != expected_number {
            return Err(GenerationError::MalformedModelOutput {
                expected: "implementation plan",
                detail: format!(
                    "step {} is numbered {}, expected {}",
                    index + 1,
                    step.step,
                    expected_number
                ),
            });
        }
        if step.files.is_empty() {
            return Err(GenerationError::MalformedModelOutput {
                expected: "implementation plan",
                detail: format!("step {} names no files", step.step),
            });
        }
        if step.files.iter().any(|path| path.trim().is_empty()) {
            return Err(GenerationError::MalformedModelOutput {
                expected: "implementation plan",
                detail: format!("step {} contains an empty file path", step.step),
            });
        }
    }
    Ok(())
}
