//! CLI argument parsing for the generation pipeline

use clap::Parser;

use crate::generation::types::{CompanyContext, GenerationRequest};

/// Arguments for one generation run
#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    /// Free-text feature request describing the widget to build
    #[arg(short, long)]
    pub prompt: String,

    /// Ticker symbol providing company context for the analysis
    #[arg(long)]
    pub symbol: Option<String>,

    /// Company name (used together with --symbol)
    #[arg(long)]
    pub company: Option<String>,

    /// Company industry (used together with --symbol)
    #[arg(long)]
    pub industry: Option<String>,

    /// Number of files to synthesize in parallel (1 = sequential)
    #[arg(long, default_value = "1")]
    pub concurrency: usize,
}

impl GenerateArgs {
    /// Build the pipeline request from the parsed arguments
    pub fn to_request(&self) -> GenerationRequest {
        let mut request = GenerationRequest::new(self.prompt.clone());
        if let Some(symbol) = &self.symbol {
            request = request.with_company(CompanyContext {
                symbol: symbol.clone(),
                name: self.company.clone().unwrap_or_else(|| symbol.clone()),
                industry: self.industry.clone().unwrap_or_default(),
            });
        }
        request
    }
}
