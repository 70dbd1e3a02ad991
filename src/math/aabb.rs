use glam::Vec3;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AABB {
    pub min: Vec3,
    pub max: Vec3,
}

impl AABB {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box enclosing a point set. None for an empty set.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut aabb = AABB::new(first, first);
        for p in iter {
            aabb.min = aabb.min.min(p);
            aabb.max = aabb.max.max(p);
        }
        Some(aabb)
    }

    pub fn union(&self, other: &AABB) -> AABB {
        AABB {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Per-axis extent.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Length of the box diagonal. All camera framing scales off this.
    pub fn diagonal(&self) -> f32 {
        self.size().length()
    }

    pub fn translated(&self, offset: Vec3) -> AABB {
        AABB {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_center() {
        let aabb = AABB::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(aabb.center(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_aabb_center_negative() {
        let aabb = AABB::new(Vec3::new(-2.0, -4.0, -6.0), Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(aabb.center(), Vec3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_aabb_size() {
        let aabb = AABB::new(Vec3::new(-1.0, 0.0, 2.0), Vec3::new(1.0, 3.0, 6.0));
        assert_eq!(aabb.size(), Vec3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_aabb_diagonal_unit_cube() {
        let aabb = AABB::new(Vec3::ZERO, Vec3::ONE);
        // Unit cube diagonal is sqrt(3)
        assert!((aabb.diagonal() - 3.0_f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_aabb_diagonal_scales_linearly() {
        let aabb = AABB::new(Vec3::ZERO, Vec3::new(1.0, 2.0, 2.0));
        let doubled = AABB::new(Vec3::ZERO, Vec3::new(2.0, 4.0, 4.0));
        assert!((doubled.diagonal() - 2.0 * aabb.diagonal()).abs() < 1e-5);
    }

    #[test]
    fn test_aabb_union_non_overlapping() {
        let a = AABB::new(Vec3::ZERO, Vec3::ONE);
        let b = AABB::new(Vec3::splat(2.0), Vec3::splat(3.0));
        let union = a.union(&b);
        assert_eq!(union.min, Vec3::ZERO);
        assert_eq!(union.max, Vec3::splat(3.0));
    }

    #[test]
    fn test_aabb_union_contained() {
        let outer = AABB::new(Vec3::ZERO, Vec3::splat(5.0));
        let inner = AABB::new(Vec3::ONE, Vec3::splat(2.0));
        let union = outer.union(&inner);
        assert_eq!(union.min, outer.min);
        assert_eq!(union.max, outer.max);
    }

    #[test]
    fn test_from_points() {
        let points = vec![
            Vec3::new(-1.0, -2.0, -3.0),
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(0.0, 0.0, 0.0),
        ];
        let aabb = AABB::from_points(points).unwrap();
        assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_from_points_empty() {
        assert!(AABB::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_translated() {
        let aabb = AABB::new(Vec3::ZERO, Vec3::ONE).translated(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(aabb.min, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(aabb.max, Vec3::new(2.0, 3.0, 4.0));
    }
}
