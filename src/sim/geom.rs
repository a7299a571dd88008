//! Geometry kernel: segment and circle intersection primitives
//!
//! Pure functions over `glam::Vec2`. The only "failure" anywhere in this
//! module is "no intersection", signalled by `None` or an empty result
//! vector — never an error.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A directed line segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub a: Vec2,
    pub b: Vec2,
}

impl Line {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }

    /// Build a segment of the given length from an origin point and heading
    pub fn from_angle(origin: Vec2, angle: f32, length: f32) -> Self {
        Self {
            a: origin,
            b: origin + Vec2::new(angle.cos(), angle.sin()) * length,
        }
    }

    /// Heading of the segment in radians
    pub fn angle(&self) -> f32 {
        (self.b.y - self.a.y).atan2(self.b.x - self.a.x)
    }

    pub fn length(&self) -> f32 {
        self.a.distance(self.b)
    }
}

/// A circle, used for entity collision bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

/// Parametric segment/segment intersection.
///
/// Returns `None` when the segments are parallel or the crossing falls
/// outside either segment's [0, 1] parameter range.
pub fn segment_intersection(l1: &Line, l2: &Line) -> Option<Vec2> {
    let d1 = l1.b - l1.a;
    let d2 = l2.b - l2.a;

    let denom = d1.perp_dot(d2);
    if denom.abs() < f32::EPSILON {
        return None; // parallel
    }

    let origin_delta = l2.a - l1.a;
    let t = origin_delta.perp_dot(d2) / denom;
    let u = origin_delta.perp_dot(d1) / denom;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(l1.a + d1 * t)
    } else {
        None
    }
}

/// Points where a segment crosses a circle's boundary (0, 1, or 2).
///
/// With `bounded` set, only crossings on the segment itself are returned;
/// otherwise the segment's infinite extension is considered.
pub fn segment_circle_intersection(seg: &Line, circle: &Circle, bounded: bool) -> Vec<Vec2> {
    let d = seg.b - seg.a;
    let f = seg.a - circle.center;

    let a = d.length_squared();
    if a < f32::EPSILON {
        return Vec::new(); // degenerate segment
    }

    let b = 2.0 * f.dot(d);
    let c = f.length_squared() - circle.radius * circle.radius;

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Vec::new();
    }
    let root = disc.sqrt();

    let mut points = Vec::with_capacity(2);
    let t1 = (-b - root) / (2.0 * a);
    if !bounded || (0.0..=1.0).contains(&t1) {
        points.push(seg.a + d * t1);
    }
    if root > 0.0 {
        let t2 = (-b + root) / (2.0 * a);
        if !bounded || (0.0..=1.0).contains(&t2) {
            points.push(seg.a + d * t2);
        }
    }
    points
}

/// Horizontal leg of a pitched velocity: the adjacent side of the right
/// triangle whose hypotenuse is the full 3D speed.
#[inline]
pub fn adjacent_leg(pitch: f32, hypotenuse: f32) -> f32 {
    hypotenuse * pitch.cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    #[test]
    fn test_segment_intersection_crossing() {
        let l1 = Line::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0));
        let l2 = Line::new(Vec2::new(0.0, 2.0), Vec2::new(2.0, 0.0));

        let p = segment_intersection(&l1, &l2).unwrap();
        assert!((p.x - 1.0).abs() < 1e-5);
        assert!((p.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_segment_intersection_parallel() {
        let l1 = Line::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0));
        let l2 = Line::new(Vec2::new(0.0, 1.0), Vec2::new(2.0, 1.0));
        assert!(segment_intersection(&l1, &l2).is_none());
    }

    #[test]
    fn test_segment_intersection_out_of_range() {
        // The infinite lines cross at (3, 0), beyond the first segment's end
        let l1 = Line::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0));
        let l2 = Line::new(Vec2::new(3.0, -1.0), Vec2::new(3.0, 1.0));
        assert!(segment_intersection(&l1, &l2).is_none());
    }

    #[test]
    fn test_segment_intersection_at_endpoint() {
        let l1 = Line::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0));
        let l2 = Line::new(Vec2::new(2.0, -1.0), Vec2::new(2.0, 1.0));

        let p = segment_intersection(&l1, &l2).unwrap();
        assert!((p.x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_circle_secant_two_points() {
        let seg = Line::new(Vec2::new(-3.0, 0.0), Vec2::new(3.0, 0.0));
        let circle = Circle {
            center: Vec2::ZERO,
            radius: 1.0,
        };

        let points = segment_circle_intersection(&seg, &circle, true);
        assert_eq!(points.len(), 2);
        assert!((points[0].x + 1.0).abs() < 1e-5);
        assert!((points[1].x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_circle_miss() {
        let seg = Line::new(Vec2::new(-3.0, 2.0), Vec2::new(3.0, 2.0));
        let circle = Circle {
            center: Vec2::ZERO,
            radius: 1.0,
        };
        assert!(segment_circle_intersection(&seg, &circle, true).is_empty());
    }

    #[test]
    fn test_circle_bounded_excludes_extension() {
        // The segment stops before reaching the circle; its extension crosses
        let seg = Line::new(Vec2::new(-5.0, 0.0), Vec2::new(-2.0, 0.0));
        let circle = Circle {
            center: Vec2::ZERO,
            radius: 1.0,
        };

        assert!(segment_circle_intersection(&seg, &circle, true).is_empty());
        assert_eq!(segment_circle_intersection(&seg, &circle, false).len(), 2);
    }

    #[test]
    fn test_circle_segment_ending_inside() {
        // Segment enters the circle but ends inside: exactly one boundary crossing
        let seg = Line::new(Vec2::new(-3.0, 0.0), Vec2::new(0.0, 0.0));
        let circle = Circle {
            center: Vec2::ZERO,
            radius: 1.0,
        };

        let points = segment_circle_intersection(&seg, &circle, true);
        assert_eq!(points.len(), 1);
        assert!((points[0].x + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_line_from_angle() {
        let line = Line::from_angle(Vec2::new(1.0, 1.0), FRAC_PI_2, 2.0);
        assert!((line.b.x - 1.0).abs() < 1e-5);
        assert!((line.b.y - 3.0).abs() < 1e-5);
        assert!((line.length() - 2.0).abs() < 1e-5);
        assert!((line.angle() - FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_line_angle_negative_heading() {
        let line = Line::new(Vec2::new(2.0, 2.0), Vec2::new(1.0, 2.0));
        assert!((line.angle().abs() - PI).abs() < 1e-5);
    }

    #[test]
    fn test_adjacent_leg() {
        assert!((adjacent_leg(0.0, 5.0) - 5.0).abs() < 1e-5);
        let leg = adjacent_leg(FRAC_PI_4, 1.0);
        assert!((leg - FRAC_PI_4.cos()).abs() < 1e-5);
        // Straight up leaves no horizontal component
        assert!(adjacent_leg(FRAC_PI_2, 5.0).abs() < 1e-5);
    }
}
