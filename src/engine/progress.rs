//! Progress bar utilities for displaying stage status

use kdam::{Animation, Bar, BarExt};
use std::sync::{Arc, Mutex};

// Progress bar type alias
pub type ProgressBar = Arc<Mutex<Bar>>;

/// Configuration for creating a progress bar
pub struct ProgressBarConfig {
    pub total: usize,
    pub desc: &'static str,
    pub animation: Animation,
}

impl ProgressBarConfig {
    /// Create a new progress bar configuration
    pub fn new(total: usize, desc: &'static str, animation: Animation) -> Self {
        Self {
            total,
            desc,
            animation,
        }
    }
}

/// Create a progress bar with the given configuration
pub fn create_progress_bar(config: ProgressBarConfig) -> ProgressBar {
    Arc::new(Mutex::new(kdam::tqdm!(
        total = config.total,
        desc = config.desc,
        animation = config.animation,
        unit = " calls"
    )))
}

/// Bar for one stage, or None when progress output is off or there is nothing to do.
pub fn stage_bar(enabled: bool, total: usize, desc: &'static str) -> Option<ProgressBar> {
    (enabled && total > 0)
        .then(|| create_progress_bar(ProgressBarConfig::new(total, desc, Animation::Classic)))
}

/// Update progress bar if available
/// Uses try_lock so a contended bar never stalls the caller (it catches up on the next update)
pub fn update_progress_bar(pb: &ProgressBar, n: usize) {
    if let Ok(mut pb) = pb.try_lock() {
        let _ = pb.update(n);
    }
}

/// Close the bar line so following log output starts on a fresh line.
pub fn finish_bar(pb: Option<&ProgressBar>) {
    if let Some(pb) = pb
        && let Ok(mut bar) = pb.lock()
    {
        let _ = bar.refresh();
        eprintln!();
    }
}
