//! Run orchestration for the generation pipeline.
//!
//! One run executes: Analyzing → Planning → Synthesizing (per file) →
//! Storing → Registry planning. Analysis and planning failures abort the
//! run before any file is synthesized; per-file synthesis, validation and
//! storage failures are collected and the run completes with a mixed
//! report. A run therefore always yields either a clear fatal failure or a
//! completion report separating `written_files` from `errors`.

use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;

use anthropic_client::CompletionClient;
use widget_forge_sdk::{
    log_file_complete, log_file_failed, log_file_start, log_registry_planned, log_stage_complete,
    log_stage_failed, log_stage_start, RunHandle, RunStatus,
};

use crate::generation::analyzer::RequestAnalyzer;
use crate::generation::artifact_store::ArtifactStore;
use crate::generation::error::GenerationError;
use crate::generation::planner::PlanGenerator;
use crate::generation::registry::RegistryPlanner;
use crate::generation::synthesizer::{CodeSynthesizer, FileRole};
use crate::generation::types::{
    FileError, GeneratedFile, GeneratedWidget, GenerationRequest, ImplementationPlan,
    RegistryUpdatePlans, WidgetAnalysis,
};
use crate::store::KeyValueStore;

const TOTAL_STAGES: usize = 5;

/// Final report of one generation run
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub run: RunHandle,
    pub status: RunStatus,
    pub analysis: WidgetAnalysis,
    pub plan: ImplementationPlan,
    pub widget: GeneratedWidget,
    /// Canonical paths of files accepted into the artifact store
    pub written_files: Vec<String>,
    /// Per-file synthesis, validation and storage failures
    pub errors: Vec<FileError>,
    pub registry: Option<RegistryUpdatePlans>,
}

/// The generation pipeline with explicitly injected collaborators
pub struct GenerationPipeline {
    analyzer: RequestAnalyzer,
    planner: PlanGenerator,
    synthesizer: CodeSynthesizer,
    artifacts: ArtifactStore,
    registry: RegistryPlanner,
    concurrency: usize,
}

impl GenerationPipeline {
    pub fn new(client: Arc<CompletionClient>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            analyzer: RequestAnalyzer::new(client.clone()),
            planner: PlanGenerator::new(client.clone()),
            synthesizer: CodeSynthesizer::new(client),
            artifacts: ArtifactStore::new(store.clone()),
            registry: RegistryPlanner::new(store),
            concurrency: 1,
        }
    }

    /// Number of files synthesized concurrently; 1 reproduces the
    /// sequential reference behavior
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    /// Execute one end-to-end run for a generation request
    pub async fn run(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationReport, GenerationError> {
        if request.user_prompt.trim().is_empty() {
            return Err(GenerationError::InvalidRequest(
                "user prompt is empty".to_string(),
            ));
        }
        let mut run = RunHandle::new();

        // Stage 1: Analyzing (fatal on failure)
        print_stage_banner(1, "Analyzing request");
        log_stage_start!(1, "Analyzing", TOTAL_STAGES);
        let analysis = match self.analyzer.analyze(request).await {
            Ok(analysis) => analysis,
            Err(e) => {
                log_stage_failed!(1, "Analyzing", e);
                return Err(e);
            }
        };
        log_stage_complete!(1, "Analyzing");
        run.widget_type = Some(analysis.widget_type.clone());
        println!(
            "Analysis: {} ({:?}, est. {})",
            analysis.widget_type, analysis.complexity, analysis.estimated_time
        );

        // Stage 2: Planning (fatal on failure)
        print_stage_banner(2, "Generating implementation plan");
        log_stage_start!(2, "Planning", TOTAL_STAGES);
        let plan = match self.planner.plan(&analysis, request).await {
            Ok(plan) => plan,
            Err(e) => {
                log_stage_failed!(2, "Planning", e);
                return Err(e);
            }
        };
        log_stage_complete!(2, "Planning");
        println!(
            "Plan: {} step(s), {} file(s)",
            plan.total_steps,
            plan.all_files().len()
        );

        // Stage 3: Synthesizing, one completion per file; failures are
        // local to their file
        print_stage_banner(3, "Synthesizing files");
        log_stage_start!(3, "Synthesizing", TOTAL_STAGES);
        let (generated_files, mut errors) = self.synthesize_all(&plan, &analysis, request).await;
        log_stage_complete!(3, "Synthesizing");

        // Stage 4: Storing (validation happens per file inside write_all)
        print_stage_banner(4, "Validating and storing artifacts");
        log_stage_start!(4, "Storing", TOTAL_STAGES);
        let write = self.artifacts.write_all(&generated_files);
        errors.extend(write.errors.iter().cloned());
        log_stage_complete!(4, "Storing");

        // Stage 5: Registry planning, independent of validation outcome
        print_stage_banner(5, "Recording registry update plans");
        log_stage_start!(5, "Registry", TOTAL_STAGES);
        let registry = match self
            .registry
            .plan_registration(&analysis.widget_type, &analysis.widget_title)
        {
            Ok(plans) => {
                log_registry_planned!(&analysis.widget_type);
                log_stage_complete!(5, "Registry");
                Some(plans)
            }
            Err(e) => {
                log_stage_failed!(5, "Registry", e);
                errors.push(FileError {
                    path: format!("registry:{}", analysis.widget_type),
                    reason: e.to_string(),
                });
                None
            }
        };

        let widget = GeneratedWidget {
            widget_type: analysis.widget_type.clone(),
            title: analysis.widget_title.clone(),
            description: analysis.description.clone(),
            files: generated_files,
            dependencies: None,
        };

        let status = if errors.is_empty() {
            RunStatus::Completed
        } else {
            RunStatus::CompletedWithErrors
        };

        Ok(GenerationReport {
            run,
            status,
            analysis,
            plan,
            widget,
            written_files: write.written_files,
            errors,
            registry,
        })
    }

    /// Synthesize every file named by the plan through a bounded set of
    /// concurrent completion requests. File generations share no mutable
    /// state, so the result partition is order-independent.
    async fn synthesize_all(
        &self,
        plan: &ImplementationPlan,
        analysis: &WidgetAnalysis,
        request: &GenerationRequest,
    ) -> (Vec<GeneratedFile>, Vec<FileError>) {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = FuturesUnordered::new();

        for step in &plan.steps {
            for path in &step.files {
                let semaphore = semaphore.clone();
                tasks.push(async move {
                    let _permit = match semaphore.acquire().await {
                        Ok(permit) => permit,
                        Err(_) => {
                            return (
                                path.clone(),
                                Err(GenerationError::Transport(
                                    "synthesis semaphore closed".to_string(),
                                )),
                            )
                        }
                    };

                    log_file_start!(path, FileRole::classify(path));
                    match self.synthesizer.synthesize(path, analysis, request, step).await {
                        Ok(content) => {
                            log_file_complete!(path, content.len());
                            (path.clone(), Ok(content))
                        }
                        Err(e) => {
                            log_file_failed!(path, e);
                            (path.clone(), Err(e))
                        }
                    }
                });
            }
        }

        let mut generated = Vec::new();
        let mut errors = Vec::new();
        while let Some((path, result)) = tasks.next().await {
            match result {
                Ok(content) => generated.push(GeneratedFile { path, content }),
                Err(e) => errors.push(FileError {
                    path,
                    reason: e.to_string(),
                }),
            }
        }
        (generated, errors)
    }
}

fn print_stage_banner(stage: usize, title: &str) {
    println!("\n{}", "=".repeat(80));
    println!("STAGE {}/{}: {}", stage, TOTAL_STAGES, title);
    println!("{}", "=".repeat(80));
}
