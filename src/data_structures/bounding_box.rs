//! Axis-aligned bounding boxes.
//!
//! A [`BoundingBox`] starts out empty and grows by combining with points or
//! other boxes. The empty box is the neutral element of [`BoundingBox::combine`].

use cgmath::{Matrix4, Point3};

/// An axis-aligned bounding box in 3D space, possibly empty.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingBox {
    min: Point3<f32>,
    max: Point3<f32>,
}

impl BoundingBox {
    /// The empty box. Contains nothing, combines to the other operand.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    /// Creates a box from two opposite corners, in any order.
    pub fn new(a: Point3<f32>, b: Point3<f32>) -> Self {
        Self {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Smallest box enclosing all points. Empty for an empty slice.
    pub fn from_points(points: &[Point3<f32>]) -> Self {
        let mut bounds = Self::empty();
        for point in points {
            bounds.add_point(*point);
        }
        bounds
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Lower corner, or `None` for the empty box.
    pub fn min(&self) -> Option<Point3<f32>> {
        (!self.is_empty()).then_some(self.min)
    }

    /// Upper corner, or `None` for the empty box.
    pub fn max(&self) -> Option<Point3<f32>> {
        (!self.is_empty()).then_some(self.max)
    }

    pub fn center(&self) -> Option<Point3<f32>> {
        (!self.is_empty()).then(|| {
            Point3::new(
                (self.min.x + self.max.x) * 0.5,
                (self.min.y + self.max.y) * 0.5,
                (self.min.z + self.max.z) * 0.5,
            )
        })
    }

    pub fn add_point(&mut self, point: Point3<f32>) -> &mut Self {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
        self
    }

    /// Grows `self` to enclose `other`. Combining with an empty box is a no-op.
    pub fn combine(&mut self, other: &BoundingBox) -> &mut Self {
        if !other.is_empty() {
            self.add_point(other.min);
            self.add_point(other.max);
        }
        self
    }

    /// By-value variant of [`BoundingBox::combine`].
    pub fn union(mut self, other: &BoundingBox) -> Self {
        self.combine(other);
        self
    }

    pub fn contains(&self, point: Point3<f32>) -> bool {
        !self.is_empty()
            && point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Transforms the box by `matrix`.
    ///
    /// All eight corners are transformed and re-enclosed, so rotations yield
    /// the axis-aligned hull of the rotated box.
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        if self.is_empty() {
            return *self;
        }
        let (lo, hi) = (self.min, self.max);
        let corners = [
            Point3::new(lo.x, lo.y, lo.z),
            Point3::new(hi.x, lo.y, lo.z),
            Point3::new(lo.x, hi.y, lo.z),
            Point3::new(hi.x, hi.y, lo.z),
            Point3::new(lo.x, lo.y, hi.z),
            Point3::new(hi.x, lo.y, hi.z),
            Point3::new(lo.x, hi.y, hi.z),
            Point3::new(hi.x, hi.y, hi.z),
        ];
        let transformed = corners
            .iter()
            .map(|corner| Point3::from_homogeneous(matrix * corner.to_homogeneous()))
            .collect::<Vec<_>>();
        Self::from_points(&transformed)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, Vector3};

    #[test]
    fn empty_box_is_neutral_for_combine() {
        let unit = BoundingBox::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));

        let mut acc = BoundingBox::empty();
        acc.combine(&unit);
        assert_eq!(acc, unit);

        let mut acc = unit;
        acc.combine(&BoundingBox::empty());
        assert_eq!(acc, unit);
        assert!(BoundingBox::default().is_empty());
        assert_eq!(BoundingBox::empty().center(), None);
    }

    #[test]
    fn union_encloses_both_operands() {
        let a = BoundingBox::new(Point3::new(-1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 1.0));
        let b = BoundingBox::new(Point3::new(2.0, -3.0, 0.5), Point3::new(3.0, 0.0, 4.0));
        let u = a.union(&b);

        assert_eq!(u.min(), Some(Point3::new(-1.0, -3.0, 0.0)));
        assert_eq!(u.max(), Some(Point3::new(3.0, 1.0, 4.0)));
        assert!(u.contains(Point3::new(1.0, 0.0, 2.0)));
        assert!(!u.contains(Point3::new(5.0, 0.0, 0.0)));
    }

    #[test]
    fn transform_translates_and_rotates() {
        let unit = BoundingBox::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 2.0, 1.0));

        let moved = unit.transform(&Matrix4::from_translation(Vector3::new(10.0, 0.0, 0.0)));
        assert_eq!(moved.min(), Some(Point3::new(10.0, 0.0, 0.0)));
        assert_eq!(moved.max(), Some(Point3::new(11.0, 2.0, 1.0)));

        let turned = unit.transform(&Matrix4::from_angle_z(Deg(90.0)));
        let max = turned.max().unwrap();
        let min = turned.min().unwrap();
        assert!((min.x + 2.0).abs() < 1e-5);
        assert!((max.y - 1.0).abs() < 1e-5);

        assert!(BoundingBox::empty().transform(&Matrix4::from_scale(2.0)).is_empty());
    }
}
