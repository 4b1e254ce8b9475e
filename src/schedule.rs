//! Fixed-period tick schedule driven by frame timestamps.
//!
//! `draw_web()` calls at ~60fps with variable delta. `TickSchedule` decides on
//! which frames the resource display should be refreshed. It only decides
//! *when*; the amount shown is always recomputed from the snapshot's
//! reception time, so skipped or late ticks never accumulate error.

pub struct TickSchedule {
    /// Milliseconds between ticks (e.g. 100ms = 10 ticks/sec)
    period_ms: f64,
    /// Timestamp at which the next tick becomes due, None before the first frame
    next_due: Option<f64>,
    /// Total ticks fired since creation
    pub total_ticks: u64,
}

impl TickSchedule {
    pub fn new(period_ms: u32) -> Self {
        Self {
            period_ms: period_ms.max(1) as f64,
            next_due: None,
            total_ticks: 0,
        }
    }

    /// Feed a frame timestamp (from `performance.now()` or similar).
    /// Returns true when a tick should run on this frame.
    ///
    /// At most one tick fires per frame: catching up on missed ticks would
    /// only redraw the same value several times.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.next_due {
            None => {
                // First frame ticks immediately.
                self.next_due = Some(now_ms + self.period_ms);
            }
            Some(due) if now_ms >= due => {
                // Stay on the period grid unless we fell a whole period behind
                // (backgrounded tab), then restart from now.
                let next = due + self.period_ms;
                self.next_due = Some(if next <= now_ms {
                    now_ms + self.period_ms
                } else {
                    next
                });
            }
            Some(_) => return false,
        }
        self.total_ticks += 1;
        true
    }
}
