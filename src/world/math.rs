//! Flat 2-D helpers shared by the world model and the rasterizer.
//!
//! Everything here is a pure function over `glam::Vec2`; none of it knows
//! about screens or cameras.

use std::cmp::Ordering;

use glam::Vec2;
use smallvec::SmallVec;

use super::geometry::Wall;

/// One wall's physical extent. Direction `a → b` decides which side is front.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub a: Vec2,
    pub b: Vec2,
}

impl Segment {
    pub const fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }
}

/// Half-line starting at `origin`. `dir` does not need to be normalised.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec2,
    pub dir: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub pos: Vec2,
    /// Euclidean distance from the ray origin.
    pub distance: f32,
}

/// Unit vector for `angle` (radians, 0 = +X, counter-clockwise positive).
#[inline]
pub fn direction_from_angle(angle: f32) -> Vec2 {
    let (s, c) = angle.sin_cos();
    Vec2::new(c, s)
}

#[inline]
pub fn angle_of(dir: Vec2) -> f32 {
    dir.y.atan2(dir.x)
}

/// Intersect a ray with a segment.
///
/// ```text
/// seg(t) = a + t·(b − a)     t ∈ (0, 1)   open at both ends
/// ray(u) = o + u·dir         u ∈ (0, ∞)   never backwards
/// ```
///
/// A zero determinant (parallel or zero-length) is reported as no hit.
pub fn intersect_ray_segment(ray: &Ray, seg: &Segment) -> Option<Hit> {
    let (x1, y1) = (seg.a.x, seg.a.y);
    let (x2, y2) = (seg.b.x, seg.b.y);
    let (x3, y3) = (ray.origin.x, ray.origin.y);
    let (x4, y4) = (ray.origin.x + ray.dir.x, ray.origin.y + ray.dir.y);

    let det = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
    if det == 0.0 {
        return None;
    }

    let t = ((x1 - x3) * (y3 - y4) - (y1 - y3) * (x3 - x4)) / det;
    let u = ((x1 - x3) * (y1 - y2) - (y1 - y3) * (x1 - x2)) / det;

    if t > 0.0 && t < 1.0 && u > 0.0 {
        let pos = seg.a + (seg.b - seg.a) * t;
        Some(Hit {
            pos,
            distance: ray.origin.distance(pos),
        })
    } else {
        None
    }
}

/// Twice the signed area of `(point, a, b)`.
///
/// `> 0` – point is left of `a → b`, `< 0` – right, `0` – on the line.
#[inline]
pub fn point_side(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    -((point.x - a.x) * (b.y - a.y) - (point.y - a.y) * (b.x - a.x))
}

/// Mean of the wall start points.
///
/// Points are summed in a canonical order so the result does not depend on
/// how the walls are currently arranged.
pub fn walls_centroid(walls: &[Wall]) -> Vec2 {
    if walls.is_empty() {
        return Vec2::ZERO;
    }
    let mut starts: SmallVec<[Vec2; 8]> = walls.iter().map(|w| w.segment.a).collect();
    starts.sort_by(cmp_xy);
    starts.iter().fold(Vec2::ZERO, |acc, p| acc + *p) / starts.len() as f32
}

/// Sort walls by the angle of their start point around the centroid.
///
/// Stable, and a second call on the output is a no-op.
pub fn order_walls_into_polygon(walls: &mut [Wall]) {
    let centre = walls_centroid(walls);
    walls.sort_by(|l, r| {
        angle_of(l.segment.a - centre).total_cmp(&angle_of(r.segment.a - centre))
    });
}

/// Distinct wall endpoints, ordered by angle around their centroid.
///
/// Walls are not required to be wound consistently, so the boundary is
/// rebuilt from the corner points rather than from `a → b` pairs.
pub fn polygon_ring(walls: &[Wall]) -> SmallVec<[Vec2; 8]> {
    let mut ring: SmallVec<[Vec2; 8]> = SmallVec::new();
    for w in walls {
        for p in [w.segment.a, w.segment.b] {
            if !ring.contains(&p) {
                ring.push(p);
            }
        }
    }
    if ring.is_empty() {
        return ring;
    }

    let mut canon = ring.clone();
    canon.sort_by(cmp_xy);
    let centre = canon.iter().fold(Vec2::ZERO, |acc, p| acc + *p) / canon.len() as f32;

    ring.sort_by(|l, r| angle_of(*l - centre).total_cmp(&angle_of(*r - centre)));
    ring
}

/// Even-odd test against the angularly ordered outline of `walls`.
pub fn point_in_polygon(point: Vec2, walls: &[Wall]) -> bool {
    let ring = polygon_ring(walls);
    if ring.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn cmp_xy(l: &Vec2, r: &Vec2) -> Ordering {
    l.x.total_cmp(&r.x).then(l.y.total_cmp(&r.y))
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
