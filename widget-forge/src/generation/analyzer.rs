//! Stage 1: Request analysis
//!
//! Turns a free-text feature request (plus optional company context) into a
//! structured [`WidgetAnalysis`]. The prompt embeds a fixed description of
//! the platform's available data APIs and UI primitives so the model scopes
//! its answer to what is actually buildable. A response without a valid
//! analysis object is a terminal failure of the run; there is no retry at
//! this layer.

use std::sync::Arc;

use anthropic_client::CompletionClient;

use crate::generation::error::GenerationError;
use crate::generation::json::extract_and_parse;
use crate::generation::types::{GenerationRequest, WidgetAnalysis};

const ANALYSIS_MAX_OUTPUT_TOKENS: u32 = 2048;

const ANALYZER_SYSTEM_PROMPT: &str = "You are a senior frontend architect for a financial dashboard platform. \
You analyze widget feature requests and respond with a single JSON object, no markdown fences and no commentary.";

/// Fixed catalog of platform capabilities embedded in every analysis
/// prompt. Descriptive only: the pipeline never calls these APIs.
const PLATFORM_CAPABILITIES: &str = r#"# Available Data APIs (already implemented, import and use)
- searchSymbols(query): symbol/company search
- getCompanyProfile(symbol): company name, industry, description, market cap
- getQuote(symbol): latest price, change, volume
- getRealTimeSnapshot(symbols[]): aggregated real-time quotes for multiple symbols
- getHistoricalPrices(symbol, range): OHLCV series for charting
- getAnalystRatings(symbol): buy/hold/sell ratings and price targets

# Available UI Primitives
- Card, CardHeader, CardContent: dashboard card layout
- ChartContainer: responsive wrapper around the charting library (recharts)
- MetricTile: single labeled numeric value with trend arrow
- AlertList: scrollable list of alert rows
- LoadingSkeleton, ErrorState: async state placeholders

# Widget Contract
Every widget is a React component receiving WidgetProps:
  { symbol?: string; config: Record<string, unknown>; onRemove: () => void }
Widgets live under src/components/widgets/, data access lives under
src/services/, shared types live under src/types/."#;

/// Analyzes feature requests into structured widget analyses
pub struct RequestAnalyzer {
    client: Arc<CompletionClient>,
}

impl RequestAnalyzer {
    pub fn new(client: Arc<CompletionClient>) -> Self {
        Self { client }
    }

    /// Analyze a generation request into a [`WidgetAnalysis`]
    pub async fn analyze(
        &self,
        request: &GenerationRequest,
    ) -> Result<WidgetAnalysis, GenerationError> {
        let prompt = build_analysis_prompt(request);

        let text = self
            .client
            .complete(&prompt, ANALYSIS_MAX_OUTPUT_TOKENS, Some(ANALYZER_SYSTEM_PROMPT))
            .await?;

        let analysis: WidgetAnalysis = extract_and_parse(&text, "widget analysis")?;
        validate_analysis(&analysis)?;
        Ok(analysis)
    }
}

fn build_analysis_prompt(request: &GenerationRequest) -> String {
    let company_block = match &request.company_context {
        Some(ctx) => format!(
            "\n# Company Context\nThe user is currently viewing {} ({}), industry: {}.\nScope the widget to this company where it makes sense.\n",
            ctx.name, ctx.symbol, ctx.industry
        ),
        None => String::new(),
    };

    format!(
        r#"Analyze the following widget feature request for our financial dashboard.

# Feature Request
{}
{}
{}

# Your Task
Assess what it would take to build this widget on the platform described above.

Respond with ONLY a JSON object of this exact shape:
{{
  "complexity": "Simple" | "Moderate" | "Complex",
  "estimatedTime": "human estimate, e.g. '2-3 hours'",
  "requiredAPIs": ["names of the data APIs the widget needs"],
  "components": ["UI primitives and new components involved"],
  "risks": ["implementation risks worth flagging"],
  "widgetType": "kebab-case identifier, e.g. 'moving-average-chart'",
  "widgetTitle": "Human Readable Title",
  "description": "one-paragraph summary of what the widget does"
}}

Do not add fields beyond the ones listed. Do not wrap the JSON in markdown fences."#,
        request.user_prompt, company_block, PLATFORM_CAPABILITIES
    )
}

/// Shape checks beyond what serde enforces
fn validate_analysis(analysis: &WidgetAnalysis) -> Result<(), GenerationError> {
    if analysis.widget_type.trim().is_empty() {
        return Err(GenerationError::MalformedModelOutput {
            expected: "widget analysis",
            detail: "widgetType is empty".to_string(),
        });
    }
    if analysis.widget_title.trim().is_empty() {
        return Err(GenerationError::MalformedModelOutput {
            expected: "widget analysis",
            detail: "widgetTitle is empty".to_string(),
        });
    }
    Ok(())
}
