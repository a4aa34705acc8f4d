//! Rate-limited progress forwarding.
//!
//! Work is counted in pixel-angle steps across the whole run. The callback
//! receives a non-decreasing fraction in `[0, 1]` and fires at most once per
//! [`MIN_STEPS_BETWEEN_REPORTS`] steps; completion is always reported.
//! Progress is advisory and never influences the numerical result.

/// Minimum number of pixel-angle steps between two callback invocations.
pub const MIN_STEPS_BETWEEN_REPORTS: u64 = 150;

/// Host callback receiving the completed fraction.
pub type ProgressCallback = Box<dyn FnMut(f32) + Send>;

pub struct ProgressReporter {
    total: u64,
    done: u64,
    last_reported: u64,
    last_fraction: f32,
    callback: Option<ProgressCallback>,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ProgressReporter {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            done: 0,
            last_reported: 0,
            last_fraction: 0.0,
            callback: None,
        }
    }

    pub fn set_callback(&mut self, callback: ProgressCallback) {
        self.callback = Some(callback);
    }

    /// Restart counting for a new run of `total` steps. The callback is kept.
    pub fn reset(&mut self, total: u64) {
        self.total = total;
        self.done = 0;
        self.last_reported = 0;
        self.last_fraction = 0.0;
    }

    /// Completed fraction in `[0, 1]`.
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            (self.done as f64 / self.total as f64).min(1.0) as f32
        }
    }

    /// Record `steps` more units of work and notify the host if enough work
    /// happened since the previous notification.
    pub fn advance(&mut self, steps: u64) {
        self.done = self.done.saturating_add(steps).min(self.total);
        if self.done - self.last_reported >= MIN_STEPS_BETWEEN_REPORTS {
            self.emit();
        }
    }

    /// Report completion.
    pub fn complete(&mut self) {
        self.done = self.total;
        if self.last_fraction < 1.0 {
            self.emit();
        }
    }

    fn emit(&mut self) {
        let fraction = self.fraction().max(self.last_fraction);
        self.last_reported = self.done;
        self.last_fraction = fraction;
        if let Some(cb) = self.callback.as_mut() {
            cb(fraction);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording() -> (ProgressCallback, Arc<Mutex<Vec<f32>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let cb: ProgressCallback = Box::new(move |f| sink.lock().unwrap().push(f));
        (cb, seen)
    }

    #[test]
    fn reports_are_rate_limited_and_monotonic() {
        let (cb, seen) = recording();
        let mut progress = ProgressReporter::new(1000);
        progress.set_callback(cb);
        for _ in 0..1000 {
            progress.advance(1);
        }
        progress.complete();
        let seen = seen.lock().unwrap();
        assert!(seen.len() <= 1000 / MIN_STEPS_BETWEEN_REPORTS as usize + 1);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*seen.last().unwrap(), 1.0);
    }

    #[test]
    fn small_runs_still_report_completion_once() {
        let (cb, seen) = recording();
        let mut progress = ProgressReporter::new(10);
        progress.set_callback(cb);
        progress.advance(10);
        progress.complete();
        progress.complete();
        assert_eq!(*seen.lock().unwrap(), vec![1.0]);
    }
}
