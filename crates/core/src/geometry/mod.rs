use std::f64::consts::TAU;

/// Number of rotation steps between two adjacent points. Fewer steps make the
/// sweep look like static radii, more smear it into a solid disc.
const STEPS_PER_PERIOD: f64 = 100.0;

/// Coordinate in surface space (origin bottom-left, y pointing up).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Line between two of the points on the circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }
}

/// The circle every point is projected onto.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    pub const fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Largest circle centred on a `width` x `height` surface.
    pub fn inscribed(width: usize, height: usize) -> Self {
        let (width, height) = (width as f64, height as f64);
        Self {
            center: Point::new(width / 2.0, height / 2.0),
            radius: width.min(height) / 2.0,
        }
    }

    /// Projects the point at `index` after rotating the pattern by `rotation`.
    pub fn point(&self, index: usize, point_count: usize, rotation: f64) -> Point {
        project(
            point_angle(index, point_count),
            rotation,
            self.center,
            self.radius,
        )
    }
}

/// Base angle of the point at `index` before any rotation is applied.
pub fn point_angle(index: usize, point_count: usize) -> f64 {
    index as f64 * (TAU / point_count as f64)
}

/// Maps an angle onto the circle. Sine drives x and cosine drives y, so
/// index 0 sits at the top of the circle and indices advance clockwise.
pub fn project(theta: f64, rotation: f64, center: Point, radius: f64) -> Point {
    let angle = theta + rotation;
    Point {
        x: center.x + angle.sin() * radius,
        y: center.y + angle.cos() * radius,
    }
}

/// Angle the pattern advances by on every frame.
pub fn rotation_increment(point_count: usize) -> f64 {
    TAU / point_count as f64 / STEPS_PER_PERIOD
}

/// Exclusive upper bound of the rotation within one sweep.
///
/// A non-animated run stops after a single increment. An animated run covers
/// one period between adjacent points minus one increment; any further
/// rotation only repeats the pattern.
pub fn sweep_limit(point_count: usize, animate: bool) -> f64 {
    let increment = rotation_increment(point_count);
    if animate {
        TAU / point_count as f64 - increment
    } else {
        increment
    }
}

/// Rotation values visited during one sweep, starting at zero.
pub fn sweep_rotations(point_count: usize, animate: bool) -> SweepRotations {
    SweepRotations {
        increment: rotation_increment(point_count),
        limit: sweep_limit(point_count, animate),
        step: 0,
    }
}

/// Iterator returned by [`sweep_rotations`].
#[derive(Debug, Clone)]
pub struct SweepRotations {
    increment: f64,
    limit: f64,
    step: usize,
}

impl Iterator for SweepRotations {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        // Multiply instead of accumulating so long sweeps do not drift.
        let rotation = self.step as f64 * self.increment;
        if rotation < self.limit {
            self.step += 1;
            Some(rotation)
        } else {
            None
        }
    }
}

/// Lazily enumerates every unordered pair of point indices.
pub fn enumerate_segments(point_count: usize) -> SegmentPairs {
    SegmentPairs {
        point_count,
        i: 0,
        j: 1,
    }
}

/// Iterator over `(i, j)` index pairs with `i < j < point_count`.
#[derive(Debug, Clone)]
pub struct SegmentPairs {
    point_count: usize,
    i: usize,
    j: usize,
}

impl Iterator for SegmentPairs {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<(usize, usize)> {
        while self.i < self.point_count {
            if self.j < self.point_count {
                let pair = (self.i, self.j);
                self.j += 1;
                return Some(pair);
            }
            self.i += 1;
            self.j = self.i + 1;
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = remaining_pairs(self.point_count, self.i, self.j);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SegmentPairs {}

/// Number of segments a frame with `point_count` points contains.
pub fn segment_count(point_count: usize) -> usize {
    point_count * point_count.saturating_sub(1) / 2
}

fn remaining_pairs(n: usize, i: usize, j: usize) -> usize {
    if i >= n {
        return 0;
    }
    let current_row = n.saturating_sub(j);
    let later_rows = segment_count(n - i - 1);
    current_row + later_rows
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn enumerates_each_pair_once() {
        for n in 2..=12 {
            let pairs: Vec<_> = enumerate_segments(n).collect();
            assert_eq!(pairs.len(), n * (n - 1) / 2);

            let unique: HashSet<_> = pairs.iter().copied().collect();
            assert_eq!(unique.len(), pairs.len());
            assert!(pairs.iter().all(|(i, j)| i < j && *j < n));
        }
    }

    #[test]
    fn single_point_has_no_pairs() {
        assert_eq!(enumerate_segments(1).count(), 0);
        assert_eq!(segment_count(1), 0);
    }

    #[test]
    fn enumeration_is_restartable_and_sized() {
        let mut pairs = enumerate_segments(5);
        assert_eq!(pairs.len(), 10);
        pairs.next();
        pairs.next();
        assert_eq!(pairs.len(), 8);

        let again: Vec<_> = enumerate_segments(5).collect();
        assert_eq!(again.first(), Some(&(0, 1)));
        assert_eq!(again.last(), Some(&(3, 4)));
    }

    #[test]
    fn projected_points_lie_on_the_circle() {
        let center = Point::new(640.0, 400.0);
        let radius = 400.0;
        for n in [1, 2, 3, 4, 100] {
            for index in 0..n {
                let point = project(point_angle(index, n), 0.0, center, radius);
                assert!((point.distance(&center) - radius).abs() < EPSILON);
            }
        }
    }

    #[test]
    fn sine_drives_x_and_cosine_drives_y() {
        let center = Point::new(10.0, 20.0);
        let top = project(0.0, 0.0, center, 5.0);
        assert!((top.x - 10.0).abs() < EPSILON);
        assert!((top.y - 25.0).abs() < EPSILON);

        let quarter = project(TAU / 4.0, 0.0, center, 5.0);
        assert!((quarter.x - 15.0).abs() < EPSILON);
        assert!((quarter.y - 20.0).abs() < EPSILON);
    }

    #[test]
    fn rotating_one_period_shifts_points_by_one_index() {
        let circle = Circle::inscribed(800, 600);
        for n in [3, 4, 7, 100] {
            let period = TAU / n as f64;
            for index in 0..n {
                let rotated = circle.point(index, n, period);
                let shifted = circle.point((index + 1) % n, n, 0.0);
                assert!(rotated.distance(&shifted) < 1e-6);
            }
        }
    }

    #[test]
    fn inscribed_circle_uses_smaller_dimension() {
        let circle = Circle::inscribed(1920, 1080);
        assert_eq!(circle.center, Point::new(960.0, 540.0));
        assert_eq!(circle.radius, 540.0);
    }

    #[test]
    fn static_sweep_runs_exactly_one_step() {
        let rotations: Vec<_> = sweep_rotations(4, false).collect();
        assert_eq!(rotations, vec![0.0]);
    }

    #[test]
    fn animated_sweep_stops_short_of_a_full_period() {
        let n = 100;
        let increment = rotation_increment(n);
        assert!((increment - TAU / 100.0 / 100.0).abs() < EPSILON);
        assert!((sweep_limit(n, true) - (TAU / 100.0 - increment)).abs() < EPSILON);

        let rotations: Vec<_> = sweep_rotations(n, true).collect();
        assert!((99..=100).contains(&rotations.len()));
        assert!(rotations.iter().all(|r| *r < sweep_limit(n, true)));
        assert_eq!(rotations[0], 0.0);
    }

    #[test]
    fn single_point_sweep_still_steps() {
        assert_eq!(sweep_rotations(1, false).count(), 1);
        assert!(sweep_rotations(1, true).count() >= 99);
    }
}
