//! Progress reporting for the cleaning pipeline.
//!
//! The pipeline emits one update before each rule runs and a final update on
//! completion or failure.
//!
//! # Example
//!
//! ```rust,ignore
//! use realestate_etl::Pipeline;
//!
//! let result = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{}/{}] {}", update.step, update.total_steps, update.message);
//!     })
//!     .build()?
//!     .process(df)?;
//! ```

use serde::{Deserialize, Serialize};

/// Phase of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Run is starting
    Initializing,
    /// A column rule is about to run
    ApplyingRule,
    /// All rules ran
    Complete,
    /// A rule returned an error or broke the row-count invariant
    Failed,
}

impl PipelineStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Initializing => "Initializing",
            Self::ApplyingRule => "Applying Rule",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }
}

/// A single progress event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub stage: PipelineStage,

    /// 1-based index of the rule being applied (0 before the first rule).
    pub step: usize,

    /// Number of rules in the pipeline.
    pub total_steps: usize,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    pub message: String,
}

impl ProgressUpdate {
    /// Update for the rule at `step` of `total_steps`.
    pub fn rule(step: usize, total_steps: usize, message: impl Into<String>) -> Self {
        let progress = if total_steps > 0 {
            step.saturating_sub(1) as f32 / total_steps as f32
        } else {
            0.0
        };
        Self {
            stage: PipelineStage::ApplyingRule,
            step,
            total_steps,
            progress: progress.clamp(0.0, 1.0),
            message: message.into(),
        }
    }

    /// Update emitted before any rule runs.
    pub fn started(total_steps: usize, message: impl Into<String>) -> Self {
        Self {
            stage: PipelineStage::Initializing,
            step: 0,
            total_steps,
            progress: 0.0,
            message: message.into(),
        }
    }

    /// Creates a completion progress update.
    pub fn complete(total_steps: usize, message: impl Into<String>) -> Self {
        Self {
            stage: PipelineStage::Complete,
            step: total_steps,
            total_steps,
            progress: 1.0,
            message: message.into(),
        }
    }

    /// Creates a failed progress update.
    pub fn failed(step: usize, total_steps: usize, message: impl Into<String>) -> Self {
        Self {
            stage: PipelineStage::Failed,
            step,
            total_steps,
            progress: 0.0,
            message: message.into(),
        }
    }
}

/// Receiver of progress updates.
///
/// Implementations must be `Send + Sync` so the pipeline can run on a
/// worker thread or inside a tokio task.
pub trait ProgressReporter: Send + Sync {
    /// Called once per update; keep it cheap.
    fn report(&self, update: ProgressUpdate);
}

/// [`ProgressReporter`] backed by a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_rule_update_progress() {
        let update = ProgressUpdate::rule(3, 9, "Applying currency");
        assert_eq!(update.stage, PipelineStage::ApplyingRule);
        assert_eq!(update.step, 3);
        assert!((update.progress - 2.0 / 9.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_complete_and_failed() {
        let done = ProgressUpdate::complete(9, "Done");
        assert_eq!(done.progress, 1.0);
        assert_eq!(done.step, 9);

        let failed = ProgressUpdate::failed(4, 9, "boom");
        assert_eq!(failed.stage, PipelineStage::Failed);
        assert_eq!(failed.progress, 0.0);
    }

    #[test]
    fn test_closure_progress_reporter() {
        let call_count = Arc::new(AtomicUsize::new(0));
        let call_count_clone = call_count.clone();

        let reporter = ClosureProgressReporter::new(move |_update| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        reporter.report(ProgressUpdate::started(9, "Start"));
        reporter.report(ProgressUpdate::complete(9, "Done"));

        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_progress_update_json_serialization() {
        let update = ProgressUpdate::rule(1, 9, "Applying headers");
        let json = serde_json::to_string(&update).expect("Should serialize");

        assert!(json.contains("\"stage\":\"applying_rule\""));
        assert!(json.contains("\"total_steps\":9"));

        let deserialized: ProgressUpdate = serde_json::from_str(&json).expect("Should deserialize");
        assert_eq!(deserialized.stage, PipelineStage::ApplyingRule);
        assert_eq!(deserialized.message, "Applying headers");
    }

    #[test]
    fn test_stage_display_name() {
        assert_eq!(PipelineStage::ApplyingRule.display_name(), "Applying Rule");
        assert_eq!(PipelineStage::Complete.display_name(), "Complete");
    }
}
