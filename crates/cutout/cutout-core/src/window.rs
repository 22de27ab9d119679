//! Which discrete keyframes a single time step crossed.

/// The interval swept by one resolve, including a possible wrap across the
/// loop seam.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EventWindow {
    pub prev_time: f64,
    pub time: f64,
    pub elapsed: f64,
    /// The step ran past `min_time` (backward) or `max_time` (forward).
    pub wrapped: bool,
    pub min_time: f64,
    pub max_time: f64,
}

impl EventWindow {
    /// Whether a keyframe at time `k` fires for this step.
    ///
    /// Forward steps take `(prev_time, time]`, backward steps take
    /// `[time, prev_time)`. A wrapped step covers the two pieces on either
    /// side of the seam. A zero step fires nothing.
    pub fn contains(&self, k: f64) -> bool {
        let Self {
            prev_time,
            time,
            elapsed,
            wrapped,
            min_time,
            max_time,
        } = *self;
        if elapsed < 0.0 {
            if wrapped {
                (min_time <= k && k < prev_time) || (time <= k && k <= max_time)
            } else {
                time <= k && k < prev_time
            }
        } else if elapsed > 0.0 {
            if wrapped {
                (min_time <= k && k <= time) || (prev_time < k && k <= max_time)
            } else {
                prev_time < k && k <= time
            }
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forward(prev_time: f64, time: f64, wrapped: bool) -> EventWindow {
        EventWindow {
            prev_time,
            time,
            elapsed: 1.0,
            wrapped,
            min_time: 0.0,
            max_time: 1000.0,
        }
    }

    fn backward(prev_time: f64, time: f64, wrapped: bool) -> EventWindow {
        EventWindow {
            elapsed: -1.0,
            ..forward(prev_time, time, wrapped)
        }
    }

    #[test]
    fn forward_is_open_closed() {
        let w = forward(300.0, 600.0, false);
        assert!(!w.contains(300.0));
        assert!(w.contains(500.0));
        assert!(w.contains(600.0));
        assert!(!w.contains(601.0));
    }

    #[test]
    fn forward_wrap_covers_both_ends() {
        let w = forward(900.0, 200.0, true);
        assert!(w.contains(0.0));
        assert!(w.contains(200.0));
        assert!(w.contains(950.0));
        assert!(!w.contains(900.0));
        assert!(!w.contains(500.0));
    }

    #[test]
    fn backward_is_closed_open() {
        let w = backward(600.0, 300.0, false);
        assert!(w.contains(300.0));
        assert!(w.contains(500.0));
        assert!(!w.contains(600.0));
    }

    #[test]
    fn backward_wrap_covers_both_ends() {
        let w = backward(100.0, 800.0, true);
        assert!(w.contains(0.0));
        assert!(w.contains(50.0));
        assert!(!w.contains(100.0));
        assert!(w.contains(800.0));
        assert!(w.contains(1000.0));
        assert!(!w.contains(500.0));
    }

    #[test]
    fn zero_step_fires_nothing() {
        let w = EventWindow {
            elapsed: 0.0,
            ..forward(500.0, 500.0, false)
        };
        assert!(!w.contains(500.0));
    }
}
