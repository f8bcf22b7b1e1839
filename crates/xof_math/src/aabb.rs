use crate::{Interval, Vec3};

/// Axis-aligned bounding box, one interval per axis.
///
/// Used to report mesh extents across the output boundary so a host can
/// place imported frames without walking every vertex again.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create an empty AABB (contains nothing).
    pub fn empty() -> Self {
        Self {
            x: Interval::EMPTY,
            y: Interval::EMPTY,
            z: Interval::EMPTY,
        }
    }

    /// Create an AABB from two corner points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            x: Interval::new(a.x.min(b.x), a.x.max(b.x)),
            y: Interval::new(a.y.min(b.y), a.y.max(b.y)),
            z: Interval::new(a.z.min(b.z), a.z.max(b.z)),
        }
    }

    /// Create the smallest AABB containing every point of the iterator.
    pub fn from_points_iter(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut aabb = Self::empty();
        for p in points {
            aabb.include(p);
        }
        aabb
    }

    /// Grow the AABB to include a point.
    pub fn include(&mut self, p: Vec3) {
        self.x.include(p.x);
        self.y.include(p.y);
        self.z.include(p.z);
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(a: &Aabb, b: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&a.x, &b.x),
            y: Interval::surrounding(&a.y, &b.y),
            z: Interval::surrounding(&a.z, &b.z),
        }
    }

    /// Returns true if no point was ever included.
    pub fn is_empty(&self) -> bool {
        self.x.min > self.x.max
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        Vec3::new(
            (self.x.min + self.x.max) * 0.5,
            (self.y.min + self.y.max) * 0.5,
            (self.z.min + self.z.max) * 0.5,
        )
    }

    /// Returns the per-axis extent of the box.
    pub fn extent(&self) -> Vec3 {
        Vec3::new(self.x.size(), self.y.size(), self.z.size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_from_points() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(10.0, 10.0, 10.0));
        assert_eq!(aabb.x.min, 0.0);
        assert_eq!(aabb.x.max, 10.0);
        assert_eq!(aabb.z.max, 10.0);
    }

    #[test]
    fn test_aabb_from_points_iter() {
        let aabb = Aabb::from_points_iter([
            Vec3::new(-1.0, 2.0, 0.0),
            Vec3::new(3.0, -4.0, 5.0),
            Vec3::new(0.0, 0.0, -2.0),
        ]);
        assert_eq!(aabb.x.min, -1.0);
        assert_eq!(aabb.x.max, 3.0);
        assert_eq!(aabb.y.min, -4.0);
        assert_eq!(aabb.z.max, 5.0);
    }

    #[test]
    fn test_aabb_surrounding() {
        let a = Aabb::from_points(Vec3::ZERO, Vec3::new(5.0, 5.0, 5.0));
        let b = Aabb::from_points(Vec3::new(3.0, 3.0, 3.0), Vec3::new(10.0, 10.0, 10.0));
        let surrounding = Aabb::surrounding(&a, &b);
        assert_eq!(surrounding.x.min, 0.0);
        assert_eq!(surrounding.x.max, 10.0);
    }

    #[test]
    fn test_aabb_centroid() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(10.0, 10.0, 10.0));
        assert_eq!(aabb.centroid(), Vec3::new(5.0, 5.0, 5.0));
    }

    #[test]
    fn test_aabb_empty() {
        let aabb = Aabb::empty();
        assert!(aabb.is_empty());
        let filled = Aabb::from_points_iter([Vec3::ONE]);
        assert!(!filled.is_empty());
    }
}
