use std::time::Instant;

/// Frame clock for the interactive loop
#[derive(Debug)]
pub struct Clock {
    last_tick: Instant,
    max_delta: f32,
}

impl Clock {
    /// `max_delta` caps what a single tick can report, in seconds
    pub fn new(max_delta: f32) -> Self {
        Self {
            last_tick: Instant::now(),
            max_delta,
        }
    }

    /// Seconds since the previous tick, never more than `max_delta`.
    /// A stalled window (drag, minimise, breakpoint) yields one capped frame.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        delta.min(self.max_delta)
    }

    /// Restart timing, e.g. after a scene switch
    pub fn reset(&mut self) {
        self.last_tick = Instant::now();
    }

    pub fn max_delta(&self) -> f32 {
        self.max_delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn clock_measures_delta() {
        let mut clock = Clock::new(1.0);

        thread::sleep(Duration::from_millis(10));
        let delta = clock.tick();

        assert!(delta >= 0.009 && delta <= 0.5, "delta {}", delta);
    }

    #[test]
    fn clock_caps_long_frames() {
        let mut clock = Clock::new(0.005);

        thread::sleep(Duration::from_millis(20));
        assert_eq!(clock.tick(), 0.005);
    }

    #[test]
    fn clock_resets() {
        let mut clock = Clock::new(1.0);

        thread::sleep(Duration::from_millis(10));
        clock.reset();

        let delta = clock.tick();
        assert!(delta < 0.009);
    }
}
