//! Progress events emitted by the pipeline.
//!
//! The library never draws to the terminal. Front ends install a callback
//! and render events however they like.

/// One progress event.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    /// A named phase began.
    PhaseStart {
        /// Human-readable phase name.
        name: String,
    },
    /// The current phase ended.
    PhaseFinish,

    /// The current phase has `total` units of work.
    TaskStart {
        /// Number of units.
        total: u64,
    },
    /// `amount` more units completed.
    TaskIncrement {
        /// Completed units since the last increment.
        amount: u64,
    },
    /// All units of the current phase completed.
    TaskFinish,

    /// Short status text for the current phase.
    Status(String),
    /// A standalone line for the user.
    Message(String),
}

/// Callback receiving progress events. Called from worker threads.
pub type ProgressCallback = Box<dyn Fn(Progress) + Send + Sync>;

/// Dispatches progress events to an optional callback.
#[derive(Default)]
pub struct ProgressReporter {
    callback: Option<ProgressCallback>,
}

impl ProgressReporter {
    /// A reporter that discards events.
    pub fn new() -> Self {
        Self::default()
    }

    /// A reporter forwarding events to `callback`.
    pub fn with_callback(callback: ProgressCallback) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    /// Emits one event.
    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}

impl std::fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("callback", &self.callback.is_some())
            .finish()
    }
}
