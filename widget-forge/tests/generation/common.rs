//! Common utilities for generation pipeline tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use anthropic_client::{
    ClientError, CompletionClient, CredentialStore, MessagesRequest, MessagesResponse,
    MessagesTransport,
};
use widget_forge::store::{KeyValueStore, MemoryStore};

/// Transport that replays a fixed script of responses and counts calls
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<String, ClientError>>>,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<&str>) -> Arc<Self> {
        Self::with_results(responses.into_iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn with_results(responses: Vec<Result<String, ClientError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessagesTransport for ScriptedTransport {
    async fn send(
        &self,
        _request: &MessagesRequest,
        _api_key: &str,
    ) -> Result<MessagesResponse, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .responses
            .lock()
            .expect("script lock poisoned")
            .pop_front();
        match next {
            Some(Ok(text)) => Ok(MessagesResponse::from_text(text)),
            Some(Err(e)) => Err(e),
            None => Err(ClientError::Upstream {
                status: 500,
                message: "scripted transport exhausted".to_string(),
            }),
        }
    }
}

/// Client with a configured key in front of the given transport
pub fn client_with_key(transport: Arc<ScriptedTransport>) -> Arc<CompletionClient> {
    let credentials = CredentialStore::new();
    credentials.set("sk-test");
    Arc::new(CompletionClient::new(credentials, transport))
}

/// Client with no key configured
pub fn client_without_key(transport: Arc<ScriptedTransport>) -> Arc<CompletionClient> {
    Arc::new(CompletionClient::new(CredentialStore::new(), transport))
}

pub fn memory_store() -> Arc<dyn KeyValueStore> {
    Arc::new(MemoryStore::new())
}

/// Analysis response for the moving-average-chart scenario, wrapped in
/// prose the way a model reply typically is
pub fn analysis_response() -> &'static str {
    r#"Here is my analysis of the request:

{
  "complexity": "Moderate",
  "estimatedTime": "2-3 hours",
  "requiredAPIs": ["getHistoricalPrices", "getQuote"],
  "components": ["ChartContainer", "MovingAverageChartWidget"],
  "risks": ["historical data gaps for thinly traded symbols"],
  "widgetType": "moving-average-chart",
  "widgetTitle": "Moving Average Chart",
  "description": "Plots closing price with configurable moving average overlays."
}"#
}

/// Two-step plan: service file first, widget component second
pub fn plan_response() -> &'static str {
    r#"{
  "steps": [
    {
      "step": 1,
      "description": "Create the moving average data service",
      "files": ["src/services/movingAverageService.ts"],
      "estimated_duration": "45 minutes"
    },
    {
      "step": 2,
      "description": "Create the widget component",
      "files": ["src/components/widgets/MovingAverageChartWidget.tsx"],
      "estimated_duration": "1 hour"
    }
  ],
  "totalSteps": 2
}"#
}

/// Valid service file content, fenced the way models return code
pub fn service_response() -> &'static str {
    r#"```ts
export interface MovingAveragePoint {
  date: string;
  close: number;
  sma20: number;
}

export async function fetchMovingAverages(symbol: string): Promise<MovingAveragePoint[]> {
  const response = await fetch(`/api/history/${symbol}?range=1y`);
  if (!response.ok) {
    throw new Error(`History request failed: ${response.status}`);
  }
  return response.json();
}
```"#
}

/// Valid widget component content
pub fn widget_response() -> &'static str {
    r#"```tsx
import React from 'react';
import { WidgetProps } from '../../types/widget';
import { fetchMovingAverages } from '../../services/movingAverageService';

export const MovingAverageChartWidget: React.FC<WidgetProps> = ({ symbol }) => {
  return <div>{symbol}</div>;
};
```"#
}
