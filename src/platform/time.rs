//! Frame timing
//!
//! Converts the host's animation-frame timestamps into per-tick elapsed
//! milliseconds. The first frame after a (re)start yields zero so a run never
//! opens with a jump.

#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<f64>,
    max_delta_ms: f32,
}

impl FrameClock {
    pub fn new(max_delta_ms: f32) -> Self {
        Self {
            last: None,
            max_delta_ms,
        }
    }

    /// Elapsed ms since the previous frame, clamped to `[0, max_delta_ms]`
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let delta = match self.last {
            Some(last) => (now_ms - last).max(0.0),
            None => 0.0,
        };
        self.last = Some(now_ms);
        (delta as f32).min(self.max_delta_ms)
    }

    /// Forget the previous frame, e.g. after the tab was hidden
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_zero() {
        let mut clock = FrameClock::new(60.0);
        assert_eq!(clock.tick(1234.0), 0.0);
        assert_eq!(clock.tick(1250.0), 16.0);
    }

    #[test]
    fn test_stall_is_clamped() {
        let mut clock = FrameClock::new(60.0);
        clock.tick(0.0);
        assert_eq!(clock.tick(5_000.0), 60.0);
    }

    #[test]
    fn test_time_going_backwards_is_zero() {
        let mut clock = FrameClock::new(60.0);
        clock.tick(100.0);
        assert_eq!(clock.tick(90.0), 0.0);
        clock.reset();
        assert_eq!(clock.tick(500.0), 0.0);
    }
}
