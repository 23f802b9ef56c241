// THEORY:
// Raw centroids jitter from frame to frame as the mask edge flickers. The smoother adds
// a short memory to the tracker: it keeps the last few raw positions and reports their
// mean, trading a few frames of lag for a steady marker.
//
// The window is not cleared when the hand drops out of view. When it reappears the
// first smoothed positions are pulled toward where it was last seen, which reads on
// screen as the marker sliding in rather than teleporting. `clear` exists for callers
// that want a hard reset.

use crate::core_modules::contour::Point;
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_LENGTH: usize = 5;

/// A sliding-window mean over recent centroid positions.
#[derive(Debug, Clone)]
pub struct CentroidSmoother {
    /// The most recent raw centroids, oldest first.
    position_history: VecDeque<Point>,
    /// Maximum number of positions kept in the window.
    capacity: usize,
}

impl Default for CentroidSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LENGTH)
    }
}

impl CentroidSmoother {
    /// Creates a smoother over the last `capacity` positions. A zero capacity is
    /// treated as one, which disables smoothing.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            position_history: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Records a raw centroid and returns the smoothed position.
    pub fn push(&mut self, position: Point) -> Point {
        self.position_history.push_back(position);
        if self.position_history.len() > self.capacity {
            self.position_history.pop_front();
        }
        // Never empty after a push.
        self.average().unwrap_or(position)
    }

    /// Mean of the window, truncated toward zero. `None` before the first push.
    pub fn average(&self) -> Option<Point> {
        let n = self.position_history.len() as i64;
        if n == 0 {
            return None;
        }
        let (sum_x, sum_y) = self
            .position_history
            .iter()
            .fold((0i64, 0i64), |(sx, sy), p| (sx + p.x as i64, sy + p.y as i64));
        Some(Point::new((sum_x / n) as i32, (sum_y / n) as i32))
    }

    pub fn clear(&mut self) {
        self.position_history.clear();
    }

    pub fn len(&self) -> usize {
        self.position_history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.position_history.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_push_returns_the_point_itself() {
        let mut smoother = CentroidSmoother::default();
        assert_eq!(smoother.average(), None);
        assert_eq!(smoother.push(Point::new(10, 20)), Point::new(10, 20));
    }

    #[test]
    fn average_truncates() {
        let mut smoother = CentroidSmoother::new(5);
        smoother.push(Point::new(0, 0));
        assert_eq!(smoother.push(Point::new(3, 5)), Point::new(1, 2));
    }

    #[test]
    fn window_evicts_oldest() {
        let mut smoother = CentroidSmoother::new(3);
        for x in [100, 0, 0, 0] {
            smoother.push(Point::new(x, 0));
        }
        assert_eq!(smoother.len(), 3);
        assert_eq!(smoother.average(), Some(Point::new(0, 0)));
    }

    #[test]
    fn history_survives_until_cleared() {
        let mut smoother = CentroidSmoother::new(5);
        smoother.push(Point::new(100, 100));
        // A gap in detections does not touch the window.
        assert_eq!(smoother.push(Point::new(0, 0)), Point::new(50, 50));

        smoother.clear();
        assert!(smoother.is_empty());
        assert_eq!(smoother.push(Point::new(0, 0)), Point::new(0, 0));
    }

    #[test]
    fn zero_capacity_disables_smoothing() {
        let mut smoother = CentroidSmoother::new(0);
        assert_eq!(smoother.capacity(), 1);
        smoother.push(Point::new(5, 5));
        assert_eq!(smoother.push(Point::new(9, 1)), Point::new(9, 1));
    }
}
