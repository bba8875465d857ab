//! Status panel and iteration progress bar driven by push events.

use crate::models::{IterationProgress, JobId, JobStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Info,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub tone: StatusTone,
    pub text: String,
}

impl StatusLine {
    fn info(text: impl Into<String>) -> Self {
        Self {
            tone: StatusTone::Info,
            text: text.into(),
        }
    }

    fn success(text: impl Into<String>) -> Self {
        Self {
            tone: StatusTone::Success,
            text: text.into(),
        }
    }
}

pub const READY: &str = "Ready to start experiment";
const CMD_COMPLETED: &str = "cGaMD completed successfully";

fn job_id(id: &Option<JobId>) -> String {
    id.as_ref()
        .map_or_else(|| "unknown".to_string(), JobId::to_string)
}

/// Lines shown in the job status panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPanel {
    pub lines: Vec<StatusLine>,
}

impl Default for StatusPanel {
    fn default() -> Self {
        Self::ready()
    }
}

impl StatusPanel {
    pub fn ready() -> Self {
        Self {
            lines: vec![StatusLine::info(READY)],
        }
    }

    /// Render the panel for a job status. Each call replaces all lines.
    pub fn render(status: &JobStatus) -> Self {
        let lines = match status {
            JobStatus::CmdRunning { cmd_job_id } => vec![StatusLine::info(format!(
                "cGaMD simulation running (Job ID: {})",
                job_id(cmd_job_id)
            ))],
            JobStatus::WeStarted { we_job_id } => vec![
                StatusLine::success(CMD_COMPLETED),
                StatusLine::info(format!(
                    "WE simulation started (Job ID: {})",
                    job_id(we_job_id)
                )),
            ],
            JobStatus::WeRunning { we_job_id } => vec![
                StatusLine::success(CMD_COMPLETED),
                StatusLine::info(format!(
                    "WE simulation running (Job ID: {})",
                    job_id(we_job_id)
                )),
            ],
            JobStatus::Completed => {
                vec![StatusLine::success("Experiment completed successfully!")]
            }
            JobStatus::Idle | JobStatus::Unknown(_) => return Self::ready(),
        };
        Self { lines }
    }

    pub fn text(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }
}

/// Progress bar state.
///
/// `percentage` keeps the raw ratio; the rendered width is clamped to
/// `0..=100`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressView {
    pub visible: bool,
    pub percentage: f64,
    pub value_now: f64,
    pub value_max: f64,
    pub text: String,
}

impl ProgressView {
    pub fn apply(&mut self, progress: &IterationProgress) {
        self.percentage = progress.percentage();
        self.value_now = progress.current_iteration;
        self.value_max = progress.max_iterations;
        self.text = progress.label();
    }

    /// CSS-style width, e.g. `"30%"` or `"33.33%"`.
    pub fn width(&self) -> String {
        let clamped = self.percentage.clamp(0.0, 100.0);
        let formatted = format!("{:.2}", clamped);
        let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
        format!("{}%", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_each_status() {
        let panel = StatusPanel::render(&JobStatus::CmdRunning {
            cmd_job_id: Some(JobId::Number(81234)),
        });
        assert_eq!(panel.text(), vec!["cGaMD simulation running (Job ID: 81234)"]);

        let panel = StatusPanel::render(&JobStatus::WeStarted {
            we_job_id: Some(JobId::Text("9001".into())),
        });
        assert_eq!(
            panel.text(),
            vec![CMD_COMPLETED, "WE simulation started (Job ID: 9001)"]
        );
        assert_eq!(panel.lines[0].tone, StatusTone::Success);

        let panel = StatusPanel::render(&JobStatus::Completed);
        assert_eq!(panel.text(), vec!["Experiment completed successfully!"]);
    }

    #[test]
    fn unknown_and_idle_render_ready() {
        assert_eq!(StatusPanel::render(&JobStatus::Idle), StatusPanel::ready());
        assert_eq!(
            StatusPanel::render(&JobStatus::Unknown(Some("queued".into()))),
            StatusPanel::ready()
        );
        assert_eq!(StatusPanel::default().text(), vec![READY]);
    }

    #[test]
    fn progress_width_and_text() {
        let mut view = ProgressView::default();
        view.apply(&IterationProgress {
            current_iteration: 3.0,
            max_iterations: 10.0,
        });
        assert_eq!(view.width(), "30%");
        assert_eq!(view.value_now, 3.0);
        assert_eq!(view.value_max, 10.0);
        assert_eq!(view.text, "Iteration 3 / 10");

        view.apply(&IterationProgress {
            current_iteration: 1.0,
            max_iterations: 3.0,
        });
        assert_eq!(view.width(), "33.33%");
    }

    #[test]
    fn progress_width_is_clamped() {
        let mut view = ProgressView::default();
        view.apply(&IterationProgress {
            current_iteration: 15.0,
            max_iterations: 10.0,
        });
        assert_eq!(view.percentage, 150.0);
        assert_eq!(view.width(), "100%");

        view.apply(&IterationProgress {
            current_iteration: 5.0,
            max_iterations: 0.0,
        });
        assert_eq!(view.width(), "0%");
    }
}
