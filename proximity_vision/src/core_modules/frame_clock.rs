use std::time::Instant;

/// Instantaneous frame rate from the gap between consecutive frames.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_tick: Option<Instant>,
    frames: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a frame at `now` and returns frames per second since the previous one.
    /// The first frame, and any frame that arrives with no measurable gap, reports 0.
    pub fn tick(&mut self, now: Instant) -> f64 {
        self.frames += 1;
        let fps = match self.last_tick {
            Some(previous) => {
                let dt = now.saturating_duration_since(previous).as_secs_f64();
                if dt > 0.0 { 1.0 / dt } else { 0.0 }
            }
            None => 0.0,
        };
        self.last_tick = Some(now);
        fps
    }

    /// Total number of frames ticked.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn first_frame_reports_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(Instant::now()), 0.0);
        assert_eq!(clock.frames(), 1);
    }

    #[test]
    fn rate_is_inverse_of_gap() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.tick(t0);
        assert_eq!(clock.tick(t0 + Duration::from_millis(40)), 25.0);
        assert_eq!(clock.tick(t0 + Duration::from_millis(50)), 100.0);
    }

    #[test]
    fn zero_gap_reports_zero() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.tick(t0);
        assert_eq!(clock.tick(t0), 0.0);
    }
}
