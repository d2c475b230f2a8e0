//! End-to-end pipeline runs against a scripted completion transport

use widget_forge::generation::registry::WIDGET_PLAN_KEY_PREFIX;
use widget_forge::generation::{
    ArtifactStore, GenerationError, GenerationPipeline, GenerationRequest,
};
use widget_forge::store::KeyValueStore;
use widget_forge_sdk::RunStatus;

use super::common::{
    analysis_response, client_with_key, client_without_key, memory_store, plan_response,
    service_response, widget_response, ScriptedTransport,
};

#[tokio::test]
async fn test_moving_average_scenario_succeeds() {
    let transport = ScriptedTransport::new(vec![
        analysis_response(),
        plan_response(),
        service_response(),
        widget_response(),
    ]);
    let store = memory_store();
    let pipeline = GenerationPipeline::new(client_with_key(transport.clone()), store.clone());

    let request = GenerationRequest::new("show me a moving average chart");
    let report = pipeline.run(&request).await.unwrap();

    assert_eq!(report.status, RunStatus::Completed);
    assert_eq!(report.analysis.widget_type, "moving-average-chart");
    assert_eq!(report.plan.total_steps, 2);
    assert_eq!(report.written_files.len(), 2);
    assert!(report.errors.is_empty());
    assert_eq!(report.widget.files.len(), 2);
    // One completion per stage plus one per file
    assert_eq!(transport.calls(), 4);

    // Every generated file path appears in the plan
    let planned = report.plan.all_files();
    for file in &report.widget.files {
        assert!(planned.contains(&file.path.as_str()));
    }

    // Registry plans were recorded
    let key = format!("{}moving-average-chart", WIDGET_PLAN_KEY_PREFIX);
    assert!(store.get(&key).unwrap().is_some());
}

#[tokio::test]
async fn test_empty_synthesized_file_is_partial_failure() {
    // The widget file comes back as whitespace
    let transport = ScriptedTransport::new(vec![
        analysis_response(),
        plan_response(),
        service_response(),
        "   \n  ",
    ]);
    let pipeline = GenerationPipeline::new(client_with_key(transport), memory_store());

    let request = GenerationRequest::new("show me a moving average chart");
    let report = pipeline.run(&request).await.unwrap();

    assert_eq!(report.status, RunStatus::CompletedWithErrors);
    assert_eq!(report.written_files.len(), 1);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].reason.starts_with("Validation failed for"));
    assert!(report.errors[0].reason.contains("Empty file content"));
    // Registry planning still ran
    assert!(report.registry.is_some());
}

#[tokio::test]
async fn test_missing_credential_fails_before_any_network_call() {
    let transport = ScriptedTransport::new(vec![analysis_response()]);
    let pipeline = GenerationPipeline::new(client_without_key(transport.clone()), memory_store());

    let request = GenerationRequest::new("show me a moving average chart");
    let err = pipeline.run(&request).await.unwrap_err();

    assert!(matches!(err, GenerationError::CredentialMissing));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_malformed_analysis_aborts_before_synthesis() {
    let transport = ScriptedTransport::new(vec!["I could not produce JSON, sorry."]);
    let store = memory_store();
    let pipeline = GenerationPipeline::new(client_with_key(transport.clone()), store.clone());

    let request = GenerationRequest::new("show me a moving average chart");
    let err = pipeline.run(&request).await.unwrap_err();

    assert!(matches!(
        err,
        GenerationError::MalformedModelOutput { .. }
    ));
    // Fatal stage failure: exactly one call, no partial artifacts
    assert_eq!(transport.calls(), 1);
    assert!(ArtifactStore::new(store).list_all().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_plan_is_fatal() {
    // Plan with gapped step numbering fails structural validation
    let bad_plan = r#"{
        "steps": [
            {"step": 2, "description": "late", "files": ["src/services/a.ts"], "estimated_duration": "1h"}
        ],
        "totalSteps": 1
    }"#;
    let transport = ScriptedTransport::new(vec![analysis_response(), bad_plan]);
    let pipeline = GenerationPipeline::new(client_with_key(transport.clone()), memory_store());

    let request = GenerationRequest::new("show me a moving average chart");
    let err = pipeline.run(&request).await.unwrap_err();

    assert!(matches!(
        err,
        GenerationError::MalformedModelOutput {
            expected: "implementation plan",
            ..
        }
    ));
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn test_upstream_failure_for_one_file_spares_siblings() {
    let transport = ScriptedTransport::with_results(vec![
        Ok(analysis_response().to_string()),
        Ok(plan_response().to_string()),
        Ok(service_response().to_string()),
        Err(anthropic_client::ClientError::Upstream {
            status: 529,
            message: "overloaded".to_string(),
        }),
    ]);
    let pipeline = GenerationPipeline::new(client_with_key(transport), memory_store());

    let request = GenerationRequest::new("show me a moving average chart");
    let report = pipeline.run(&request).await.unwrap();

    assert_eq!(report.status, RunStatus::CompletedWithErrors);
    assert_eq!(report.written_files.len(), 1);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].reason.contains("Code generation failed"));
    assert!(report.errors[0].reason.contains("529"));
}

#[tokio::test]
async fn test_empty_prompt_is_rejected_without_calls() {
    let transport = ScriptedTransport::new(vec![]);
    let pipeline = GenerationPipeline::new(client_with_key(transport.clone()), memory_store());

    let err = pipeline
        .run(&GenerationRequest::new("   "))
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::InvalidRequest(_)));
    assert_eq!(transport.calls(), 0);
}
