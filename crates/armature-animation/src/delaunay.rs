//! Delaunay triangulation of 2D blend-space positions
//!
//! Incremental Bowyer-Watson in double precision. Output triangles index into
//! the input slice and are wound counter-clockwise.

use glam::{DVec2, Vec2};

/// Super-triangle size relative to the input's bounding box
const SUPER_SCALE: f64 = 1.0e3;
/// Points closer than this (squared) to an earlier point are skipped
const DUPLICATE_EPSILON: f64 = 1e-12;
/// Doubled area at or below this fraction of the longest edge squared marks a
/// triangle as degenerate
const DEGENERATE_RATIO: f64 = 1e-7;

/// Triangulate `points`.
///
/// Fewer than three distinct points, or all points collinear, yields an empty
/// list. Duplicate points are ignored; the first occurrence is used.
pub fn triangulate(points: &[Vec2]) -> Vec<[usize; 3]> {
    if points.len() < 3 {
        return Vec::new();
    }

    let n = points.len();
    let mut verts: Vec<DVec2> = points.iter().map(|p| p.as_dvec2()).collect();

    let (min, max) = verts
        .iter()
        .fold((DVec2::splat(f64::MAX), DVec2::splat(f64::MIN)), |(lo, hi), p| {
            (lo.min(*p), hi.max(*p))
        });
    let span = (max - min).max_element().max(1.0) * SUPER_SCALE;
    let mid = (min + max) * 0.5;
    verts.push(DVec2::new(mid.x - span, mid.y - span));
    verts.push(DVec2::new(mid.x + span, mid.y - span));
    verts.push(DVec2::new(mid.x, mid.y + span));

    let mut triangles: Vec<[usize; 3]> = vec![[n, n + 1, n + 2]];

    for i in 0..n {
        let p = verts[i];
        if verts[..i].iter().any(|q| q.distance_squared(p) < DUPLICATE_EPSILON) {
            log::trace!("Skipping duplicate blend position {}", i);
            continue;
        }

        let (bad, good): (Vec<[usize; 3]>, Vec<[usize; 3]>) = triangles
            .into_iter()
            .partition(|tri| in_circumcircle(&verts, *tri, p));

        // Cavity boundary: edges of bad triangles not shared with another bad one
        let mut boundary = Vec::new();
        for tri in &bad {
            for k in 0..3 {
                let (a, b) = (tri[k], tri[(k + 1) % 3]);
                let shared = bad
                    .iter()
                    .any(|other| other != tri && has_edge(*other, b, a));
                if !shared {
                    boundary.push((a, b));
                }
            }
        }

        triangles = good;
        for (a, b) in boundary {
            triangles.push(counter_clockwise(&verts, [a, b, i]));
        }
    }

    triangles.retain(|tri| {
        let [a, b, c] = *tri;
        tri.iter().all(|&v| v < n) && !is_degenerate(verts[a], verts[b], verts[c])
    });
    triangles
}

/// Whether the triangle `a`, `b`, `c` is too thin to blend over.
///
/// The cutoff scales with the triangle's size, so a blend space spanning
/// tiny coordinates keeps its triangles.
pub(crate) fn is_degenerate(a: DVec2, b: DVec2, c: DVec2) -> bool {
    let longest = (b - a)
        .length_squared()
        .max((c - b).length_squared())
        .max((a - c).length_squared());
    (b - a).perp_dot(c - a).abs() <= DEGENERATE_RATIO * longest
}

fn doubled_area(verts: &[DVec2], [a, b, c]: [usize; 3]) -> f64 {
    (verts[b] - verts[a]).perp_dot(verts[c] - verts[a])
}

fn counter_clockwise(verts: &[DVec2], tri: [usize; 3]) -> [usize; 3] {
    if doubled_area(verts, tri) < 0.0 {
        [tri[0], tri[2], tri[1]]
    } else {
        tri
    }
}

fn has_edge(tri: [usize; 3], a: usize, b: usize) -> bool {
    (0..3).any(|k| tri[k] == a && tri[(k + 1) % 3] == b)
}

/// Strict in-circle test for a counter-clockwise triangle
fn in_circumcircle(verts: &[DVec2], [a, b, c]: [usize; 3], p: DVec2) -> bool {
    let a = verts[a] - p;
    let b = verts[b] - p;
    let c = verts[c] - p;
    let det = a.length_squared() * b.perp_dot(c) - b.length_squared() * a.perp_dot(c)
        + c.length_squared() * a.perp_dot(b);
    det > 0.0
}
