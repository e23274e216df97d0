/// A closed range of scalar values, used for ray extents and box slabs.
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

    /// Interval symmetric around zero: `[-half_extent, half_extent]`.
    pub fn symmetric(half_extent: f32) -> Self {
        Self::new(-half_extent, half_extent)
    }

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
    fn test_interval_symmetric() {
        let interval = Interval::symmetric(3.0);
        assert_eq!(interval, Interval::new(-3.0, 3.0));
    }

    #[test]
    fn test_interval_universe() {
        assert_eq!(Interval::UNIVERSE.min, f32::NEG_INFINITY);
        assert_eq!(Interval::UNIVERSE.max, f32::INFINITY);
    }
}
