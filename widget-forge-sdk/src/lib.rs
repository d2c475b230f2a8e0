//! Shared types for widget-forge generation runs.
//!
//! Defines the run status enum, the structured [`PipelineLog`] events that
//! a generation run emits on stderr, and helper macros for emitting them.
//! Events are line-prefixed JSON so an outer supervisor (TUI, CI wrapper)
//! can parse pipeline progress out of the stderr stream.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of a generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunStatus {
    NotStarted,
    Running,
    /// All files written, registry plans recorded
    Completed,
    /// Run finished, but one or more files failed synthesis or validation
    CompletedWithErrors,
    /// Fatal stage failure (analysis or planning), no artifacts written
    Failed,
}

/// Handle identifying one generation run
#[derive(Debug, Clone)]
pub struct RunHandle {
    pub id: Uuid,
    pub widget_type: Option<String>,
}

impl RunHandle {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            widget_type: None,
        }
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }
}

impl Default for RunHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Structured logging events emitted by a generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineLog {
    /// Pipeline stage started
    StageStarted {
        stage: usize,
        name: String,
        total_stages: usize,
    },
    /// Pipeline stage completed
    StageCompleted {
        stage: usize,
        name: String,
    },
    /// Pipeline stage failed (fatal for the run)
    StageFailed {
        stage: usize,
        name: String,
        error: String,
    },
    /// Synthesis started for one file
    FileStarted {
        path: String,
        role: String,
    },
    /// Synthesis finished for one file
    FileCompleted {
        path: String,
        bytes: usize,
    },
    /// Synthesis or validation failed for one file (run continues)
    FileFailed {
        path: String,
        error: String,
    },
    /// An artifact was persisted to the store
    ArtifactStored {
        path: String,
        key: String,
    },
    /// Registry update plans were recorded for a widget
    RegistryPlanned {
        widget_type: String,
    },
}

impl PipelineLog {
    /// Emit this log event to stderr for supervisor parsing
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            use std::io::Write;
            eprintln!("__WF_EVENT__:{}", json);
            // Force flush stderr in async/concurrent contexts
            let _ = std::io::stderr().flush();
        }
    }
}

/// Helper macros for pipeline logging
#[macro_export]
macro_rules! log_stage_start {
    ($stage:expr, $name:expr, $total:expr) => {
        $crate::PipelineLog::StageStarted {
            stage: $stage,
            name: $name.to_string(),
            total_stages: $total,
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_stage_complete {
    ($stage:expr, $name:expr) => {
        $crate::PipelineLog::StageCompleted {
            stage: $stage,
            name: $name.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_stage_failed {
    ($stage:expr, $name:expr, $error:expr) => {
        $crate::PipelineLog::StageFailed {
            stage: $stage,
            name: $name.to_string(),
            error: $error.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_file_start {
    ($path:expr, $role:expr) => {
        $crate::PipelineLog::FileStarted {
            path: $path.to_string(),
            role: $role.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_file_complete {
    ($path:expr, $bytes:expr) => {
        $crate::PipelineLog::FileCompleted {
            path: $path.to_string(),
            bytes: $bytes,
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_file_failed {
    ($path:expr, $error:expr) => {
        $crate::PipelineLog::FileFailed {
            path: $path.to_string(),
            error: $error.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_artifact_stored {
    ($path:expr, $key:expr) => {
        $crate::PipelineLog::ArtifactStored {
            path: $path.to_string(),
            key: $key.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_registry_planned {
    ($widget_type:expr) => {
        $crate::PipelineLog::RegistryPlanned {
            widget_type: $widget_type.to_string(),
        }
        .emit();
    };
}
