use crate::clock::Clock;

/// `performance.now()` in seconds. Falls back to `Date.now()` when the
/// Performance API is unavailable.
pub struct PerformanceClock {
    performance: Option<web_sys::Performance>,
}

impl PerformanceClock {
    pub fn new() -> Self {
        Self {
            performance: web_sys::window().and_then(|w| w.performance()),
        }
    }

    /// Same reading in milliseconds, for frame scheduling.
    pub fn now_ms(&self) -> f64 {
        match &self.performance {
            Some(p) => p.now(),
            None => js_sys::Date::now(),
        }
    }
}

impl Clock for PerformanceClock {
    fn now(&self) -> f64 {
        self.now_ms() / 1000.0
    }
}
