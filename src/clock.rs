/// Turns wall-clock frame timestamps into bounded simulation deltas.
///
/// The first frame yields zero so the time since startup never lands in the
/// simulation, and long stalls (pause, terminal resize, debugger) are capped.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_frame_ms: Option<f64>,
    max_delta_ms: f64,
}

impl FrameClock {
    pub fn new(max_delta_ms: f64) -> Self {
        Self {
            last_frame_ms: None,
            max_delta_ms: max_delta_ms.max(0.0),
        }
    }

    /// Records `now_ms` and returns the clamped time since the previous frame
    pub fn advance(&mut self, now_ms: f64) -> f64 {
        if !now_ms.is_finite() {
            return 0.0;
        }
        let Some(previous) = self.last_frame_ms.replace(now_ms) else {
            return 0.0;
        };

        let delta = now_ms - previous;
        if delta <= 0.0 {
            return 0.0;
        }
        delta.min(self.max_delta_ms)
    }
}
