use std::sync::{Arc, Mutex};
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use ioncache_engine::{Progress, ProgressReporter};

/// Renders pipeline progress events as indicatif bars on stderr.
///
/// Events arrive from scan probes and the generation aggregator, so bar
/// state sits behind a mutex.
pub struct ProgressUi {
    mp: MultiProgress,
    state: Mutex<BarState>,
}

#[derive(Default)]
struct BarState {
    active_bar: Option<ProgressBar>,
    base_message: String,
}

impl ProgressUi {
    /// Creates a UI drawing to stderr.
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr_with_hz(12))
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        Self {
            mp: MultiProgress::with_draw_target(target),
            state: Mutex::new(BarState::default()),
        }
    }

    /// A reporter feeding this UI.
    pub fn reporter(self: &Arc<Self>) -> ProgressReporter {
        let ui = Arc::clone(self);
        ProgressReporter::with_callback(Box::new(move |event| ui.handle(event)))
    }

    fn handle(&self, event: Progress) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        match event {
            Progress::PhaseStart { name } => {
                if let Some(bar) = state.active_bar.take() {
                    bar.finish_and_clear();
                }
                let bar = self.mp.add(ProgressBar::new_spinner());
                bar.enable_steady_tick(Duration::from_millis(80));
                bar.set_style(spinner_style());
                bar.set_message(name.clone());
                state.active_bar = Some(bar);
                state.base_message = name;
            }
            Progress::PhaseFinish => {
                if let Some(bar) = state.active_bar.take() {
                    bar.finish_and_clear();
                }
                let _ = self.mp.println(format!("✓ {}", state.base_message));
                state.base_message.clear();
            }
            Progress::TaskStart { total } => {
                if let Some(bar) = &state.active_bar {
                    bar.disable_steady_tick();
                    bar.set_style(bar_style());
                    bar.set_length(total);
                    bar.set_position(0);
                }
            }
            Progress::TaskIncrement { amount } => {
                if let Some(bar) = &state.active_bar {
                    bar.inc(amount);
                }
            }
            Progress::TaskFinish => {
                if let Some(bar) = &state.active_bar {
                    bar.finish();
                }
            }
            Progress::Status(text) => {
                if let Some(bar) = &state.active_bar {
                    bar.set_message(format!("{} ({text})", state.base_message));
                }
            }
            Progress::Message(msg) => {
                let _ = self.mp.println(format!("  {msg}"));
            }
        }
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg:<45} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━╸ ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hidden() -> ProgressUi {
        ProgressUi::with_target(ProgressDrawTarget::hidden())
    }

    #[test]
    fn phase_start_creates_bar() {
        let ui = hidden();
        ui.handle(Progress::PhaseStart {
            name: "Scanning cache (charge +1)".into(),
        });
        let state = ui.state.lock().unwrap();
        let bar = state.active_bar.as_ref().unwrap();
        assert_eq!(bar.message(), "Scanning cache (charge +1)");
        assert_eq!(state.base_message, "Scanning cache (charge +1)");
    }

    #[test]
    fn task_events_drive_position() {
        let ui = hidden();
        ui.handle(Progress::PhaseStart {
            name: "Generating".into(),
        });
        ui.handle(Progress::TaskStart { total: 10 });
        ui.handle(Progress::TaskIncrement { amount: 4 });
        ui.handle(Progress::TaskIncrement { amount: 3 });
        let state = ui.state.lock().unwrap();
        let bar = state.active_bar.as_ref().unwrap();
        assert_eq!(bar.length(), Some(10));
        assert_eq!(bar.position(), 7);
    }

    #[test]
    fn status_appends_to_phase_name() {
        let ui = hidden();
        ui.handle(Progress::PhaseStart {
            name: "Scanning".into(),
        });
        ui.handle(Progress::Status("checked 5/9".into()));
        let state = ui.state.lock().unwrap();
        assert_eq!(
            state.active_bar.as_ref().unwrap().message(),
            "Scanning (checked 5/9)"
        );
    }

    #[test]
    fn phase_finish_clears_bar() {
        let ui = hidden();
        ui.handle(Progress::PhaseStart {
            name: "Scanning".into(),
        });
        ui.handle(Progress::PhaseFinish);
        let state = ui.state.lock().unwrap();
        assert!(state.active_bar.is_none());
        assert!(state.base_message.is_empty());
    }

    #[test]
    fn events_without_phase_are_ignored() {
        let ui = hidden();
        ui.handle(Progress::TaskIncrement { amount: 1 });
        ui.handle(Progress::TaskFinish);
        assert!(ui.state.lock().unwrap().active_bar.is_none());
    }

    #[test]
    fn reporter_forwards_to_ui() {
        let ui = Arc::new(hidden());
        let reporter = ui.reporter();
        reporter.report(Progress::PhaseStart {
            name: "Generating".into(),
        });
        assert!(ui.state.lock().unwrap().active_bar.is_some());
    }
}
