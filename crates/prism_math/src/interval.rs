use crate::EPSILON;

/// A closed range of ray parameters `[min, max]`.
///
/// Every ray query carries one of these: primary rays search
/// `[EPSILON, inf)`, shadow rays stop short of the light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// The range used for hits in front of a ray origin: `[EPSILON, inf)`.
    pub const fn forward() -> Self {
        Self::new(EPSILON, f32::INFINITY)
    }

    /// Same lower bound, new upper bound.
    pub fn with_max(self, max: f32) -> Self {
        Self::new(self.min, max)
    }

    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    pub fn is_empty(&self) -> bool {
        self.max <= self.min
    }

    /// Expands the interval by delta/2 on each side.
    pub fn expand(&self, delta: f32) -> Interval {
        let padding = delta / 2.0;
        Interval::new(self.min - padding, self.max + padding)
    }

    /// Smallest interval containing both `a` and `b`.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }

    /// Contains nothing (min > max).
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    /// Contains everything.
    pub const UNIVERSE: Interval = Interval {
        min: f32::NEG_INFINITY,
        max: f32::INFINITY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_starts_past_epsilon() {
        let forward = Interval::forward();
        assert!(!forward.surrounds(0.0));
        assert!(!forward.surrounds(EPSILON));
        assert!(forward.surrounds(1.0));
        assert!(forward.surrounds(1e30));
    }

    #[test]
    fn test_with_max_keeps_min() {
        let shadow = Interval::forward().with_max(5.0);
        assert_eq!(shadow.min, EPSILON);
        assert!(shadow.surrounds(4.999));
        assert!(!shadow.surrounds(5.0));
    }

    #[test]
    fn test_contains_vs_surrounds() {
        let interval = Interval::new(0.0, 10.0);

        assert!(interval.contains(0.0));
        assert!(interval.contains(10.0));
        assert!(!interval.surrounds(0.0));
        assert!(!interval.surrounds(10.0));
        assert!(interval.surrounds(5.0));
        assert!(!interval.contains(10.1));
    }

    #[test]
    fn test_expand_and_surrounding() {
        let expanded = Interval::new(0.0, 10.0).expand(4.0);
        assert_eq!(expanded, Interval::new(-2.0, 12.0));

        let merged = Interval::surrounding(&Interval::new(1.0, 2.0), &Interval::new(-3.0, 0.5));
        assert_eq!(merged, Interval::new(-3.0, 2.0));
    }

    #[test]
    fn test_empty_and_universe() {
        assert!(Interval::EMPTY.is_empty());
        assert!(!Interval::EMPTY.contains(0.0));
        assert!(Interval::UNIVERSE.contains(-1e10));
        assert_eq!(Interval::UNIVERSE.size(), f32::INFINITY);

        // Surrounding with EMPTY is a no-op
        let a = Interval::new(1.0, 2.0);
        assert_eq!(Interval::surrounding(&Interval::EMPTY, &a), a);
    }
}
