//! Rolling frame statistics
//!
//! Tracks recent frame times and periodically reports the average rate
//! through tracing, so a slow lattice configuration shows up in the logs
//! instead of just feeling sluggish.

use std::collections::VecDeque;
use std::time::Duration;

const HISTORY_SIZE: usize = 120;

#[derive(Default)]
pub struct FrameStats {
    frame_times: VecDeque<Duration>,
    since_report: usize,
}

impl FrameStats {
    pub fn record(&mut self, frame_time: Duration) {
        self.frame_times.push_back(frame_time);
        if self.frame_times.len() > HISTORY_SIZE {
            self.frame_times.pop_front();
        }
        self.since_report += 1;
        if self.since_report >= HISTORY_SIZE {
            self.since_report = 0;
            tracing::debug!(
                fps = self.fps(),
                avg_ms = self.avg_frame_time().as_secs_f64() * 1000.0,
                "frame stats"
            );
        }
    }

    pub fn avg_frame_time(&self) -> Duration {
        if self.frame_times.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.frame_times.iter().sum();
        total / self.frame_times.len() as u32
    }

    pub fn fps(&self) -> f64 {
        let avg = self.avg_frame_time();
        if avg.as_secs_f64() > 0.0 {
            1.0 / avg.as_secs_f64()
        } else {
            0.0
        }
    }
}
