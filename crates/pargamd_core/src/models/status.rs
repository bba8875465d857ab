//! Job status and iteration progress pushed by the server.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Job identifier as sent by the scheduler (string or number).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobId {
    Number(i64),
    Text(String),
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobId::Number(n) => write!(f, "{}", n),
            JobId::Text(s) => f.write_str(s),
        }
    }
}

/// Raw payload of a `job_status_update` event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatusUpdate {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub cmd_job_id: Option<JobId>,
    #[serde(default)]
    pub we_job_id: Option<JobId>,
}

impl JobStatusUpdate {
    /// Interpret the raw status string.
    pub fn status(&self) -> JobStatus {
        match self.status.as_deref() {
            Some("idle") => JobStatus::Idle,
            Some("cmd_running") => JobStatus::CmdRunning {
                cmd_job_id: self.cmd_job_id.clone(),
            },
            Some("we_started") => JobStatus::WeStarted {
                we_job_id: self.we_job_id.clone(),
            },
            Some("we_running") => JobStatus::WeRunning {
                we_job_id: self.we_job_id.clone(),
            },
            Some("completed") => JobStatus::Completed,
            other => JobStatus::Unknown(other.map(str::to_string)),
        }
    }
}

/// Lifecycle of a remote experiment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Idle,
    /// cGaMD preparation job running.
    CmdRunning { cmd_job_id: Option<JobId> },
    /// cGaMD finished, WE job submitted.
    WeStarted { we_job_id: Option<JobId> },
    /// WE job running.
    WeRunning { we_job_id: Option<JobId> },
    Completed,
    /// Missing or unrecognized status string.
    Unknown(Option<String>),
}

impl JobStatus {
    /// Whether the WE phase is active (progress is meaningful).
    pub fn is_we_active(&self) -> bool {
        matches!(self, JobStatus::WeStarted { .. } | JobStatus::WeRunning { .. })
    }
}

/// Iteration counter of the WE run.
///
/// Counters are plain JSON numbers; `3.0` or a negative value is still
/// shown rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IterationProgress {
    pub current_iteration: f64,
    pub max_iterations: f64,
}

impl IterationProgress {
    /// Completion percentage, unclamped. Zero when no maximum is known.
    pub fn percentage(&self) -> f64 {
        if self.max_iterations == 0.0 {
            return 0.0;
        }
        (self.current_iteration * 100.0) / self.max_iterations
    }

    pub fn label(&self) -> String {
        format!(
            "Iteration {} / {}",
            self.current_iteration, self.max_iterations
        )
    }
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    error: String,
}

/// An event received on the push channel.
#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent {
    JobStatus(JobStatusUpdate),
    Iteration(IterationProgress),
    Error(String),
}

impl PushEvent {
    pub const JOB_STATUS_UPDATE: &'static str = "job_status_update";
    pub const ITERATION_UPDATE: &'static str = "iteration_update";
    pub const ERROR: &'static str = "error";

    /// Decode an event from its name and JSON data.
    ///
    /// Returns `Ok(None)` for event names the wizard does not subscribe to.
    pub fn from_parts(event: &str, data: &str) -> Result<Option<Self>, serde_json::Error> {
        let parsed = match event {
            Self::JOB_STATUS_UPDATE => PushEvent::JobStatus(serde_json::from_str(data)?),
            Self::ITERATION_UPDATE => PushEvent::Iteration(serde_json::from_str(data)?),
            Self::ERROR => {
                let payload: ErrorPayload = serde_json::from_str(data)?;
                PushEvent::Error(payload.error)
            }
            _ => return Ok(None),
        };
        Ok(Some(parsed))
    }

    pub fn name(&self) -> &'static str {
        match self {
            PushEvent::JobStatus(_) => Self::JOB_STATUS_UPDATE,
            PushEvent::Iteration(_) => Self::ITERATION_UPDATE,
            PushEvent::Error(_) => Self::ERROR,
        }
    }
}
