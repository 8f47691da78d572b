/// A closed range `[min, max]` on one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns the size of the interval (max - min).
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// True when min > max. A zero-width interval is not empty.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Closed-interval overlap. Touching endpoints count as overlapping, so a
    /// zero-width interval overlaps any interval that contains its value.
    /// An empty interval overlaps nothing.
    pub fn overlaps(&self, other: &Interval) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.min <= other.max && self.max >= other.min
    }

    /// Expands the interval by delta/2 on each side.
    pub fn expand(&self, delta: f32) -> Interval {
        let padding = delta / 2.0;
        Interval::new(self.min - padding, self.max + padding)
    }

    /// Creates an interval that surrounds two other intervals.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }

    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    /// A universe interval (contains everything).
    pub const UNIVERSE: Interval = Interval {
        min: f32::NEG_INFINITY,
        max: f32::INFINITY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_contains_is_inclusive() {
        let interval = Interval::new(0.0, 10.0);

        assert!(interval.contains(0.0));
        assert!(interval.contains(10.0));
        assert!(!interval.contains(-0.1));
        assert!(!interval.contains(10.1));
    }

    #[test]
    fn test_interval_overlaps() {
        let a = Interval::new(0.0, 1.0);

        assert!(a.overlaps(&Interval::new(0.5, 2.0)));
        assert!(a.overlaps(&Interval::new(1.0, 2.0)));
        assert!(!a.overlaps(&Interval::new(1.01, 2.0)));
    }

    #[test]
    fn test_zero_width_interval_overlaps() {
        let point = Interval::new(0.5, 0.5);

        assert!(!point.is_empty());
        assert!(point.overlaps(&Interval::new(0.0, 1.0)));
        assert!(Interval::new(0.0, 0.5).overlaps(&point));
        assert!(!point.overlaps(&Interval::new(0.6, 1.0)));
    }

    #[test]
    fn test_empty_interval_overlaps_nothing() {
        assert!(Interval::EMPTY.is_empty());
        assert!(!Interval::EMPTY.overlaps(&Interval::UNIVERSE));
        assert!(!Interval::UNIVERSE.overlaps(&Interval::EMPTY));
        assert!(!Interval::EMPTY.overlaps(&Interval::EMPTY));
    }

    #[test]
    fn test_interval_surrounding_and_expand() {
        let hull = Interval::surrounding(&Interval::new(-1.0, 0.0), &Interval::new(2.0, 3.0));
        assert_eq!(hull, Interval::new(-1.0, 3.0));

        let grown = Interval::new(1.0, 1.0).expand(0.5);
        assert_eq!(grown, Interval::new(0.75, 1.25));

        // Folding from EMPTY yields the other operand.
        assert_eq!(Interval::surrounding(&Interval::EMPTY, &hull), hull);
    }
}
