//! Progress reporting for long stage loops
//!
//! Every processed item is logged with a `[ i/total pct% ETA=...]` prefix and,
//! when attached to a terminal, drives an `indicatif` bar.

use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Format a duration as `HH:MM:SS`
fn format_eta(eta: Duration) -> String {
    let secs = eta.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Progress prefix with percentage and estimated time remaining
pub fn format_progress(elapsed: Duration, done: usize, total: usize) -> String {
    let width = total.to_string().len();
    if total == 0 || done == 0 {
        return format!("[{done:>width$}/{total}]");
    }
    let pct = done as f64 / total as f64 * 100.0;
    let remaining = total.saturating_sub(done) as f64;
    let eta = Duration::from_secs_f64(elapsed.as_secs_f64() / done as f64 * remaining);
    format!(
        "[{done:>width$}/{total} {pct:>3.0}% ETA={}]",
        format_eta(eta)
    )
}

/// Progress over the items of one stage
pub struct StageProgress {
    bar: ProgressBar,
    start: Instant,
    done: usize,
    total: usize,
}

impl StageProgress {
    /// Create a progress bar for `total` items
    ///
    /// The bar is hidden when stderr is not a terminal.
    pub fn new(total: usize, label: &str) -> Self {
        let bar = ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::stderr());
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.green} {prefix} [{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} ({eta})",
        ) {
            bar.set_style(style.progress_chars("█▓▒░  "));
        }
        bar.set_prefix(label.to_string());
        Self {
            bar,
            start: Instant::now(),
            done: 0,
            total,
        }
    }

    /// Progress without any terminal output
    pub fn hidden(total: usize) -> Self {
        Self {
            bar: ProgressBar::hidden(),
            start: Instant::now(),
            done: 0,
            total,
        }
    }

    /// Advance by one item and return the log prefix for it
    pub fn advance(&mut self) -> String {
        self.done += 1;
        self.bar.inc(1);
        format_progress(self.start.elapsed(), self.done, self.total)
    }

    /// Finish and clear the bar
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_progress() {
        assert_eq!(
            format_progress(Duration::from_secs(10), 1, 10),
            "[ 1/10  10% ETA=00:01:30]"
        );
        assert_eq!(
            format_progress(Duration::from_secs(3600), 50, 100),
            "[ 50/100  50% ETA=01:00:00]"
        );
        assert_eq!(
            format_progress(Duration::from_secs(5), 10, 10),
            "[10/10 100% ETA=00:00:00]"
        );
    }

    #[test]
    fn test_format_progress_before_start() {
        assert_eq!(format_progress(Duration::ZERO, 0, 5), "[0/5]");
        assert_eq!(format_progress(Duration::ZERO, 0, 0), "[0/0]");
    }

    #[test]
    fn test_stage_progress_advances() {
        let mut progress = StageProgress::hidden(2);
        assert!(progress.advance().starts_with("[1/2  50%"));
        assert!(progress.advance().starts_with("[2/2 100%"));
        progress.finish();
    }
}
