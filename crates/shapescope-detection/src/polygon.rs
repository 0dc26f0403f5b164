use crate::contour::{distance, Point};

/// Closed-curve Douglas-Peucker simplification.
///
/// The curve is split at the point farthest from `points[0]`, each half is
/// simplified independently, and a final sweep drops vertices that sit
/// within `epsilon` of the line through their neighbors. The first input
/// point leads the result unless that sweep removes it.
pub fn approx_polygon(points: &[Point], epsilon: f64) -> Vec<Point> {
    let n = points.len();
    if n <= 2 {
        return points.to_vec();
    }

    let origin = points[0];
    let far = (1..n).fold(1, |best, k| {
        if distance(origin, points[k]) > distance(origin, points[best]) {
            k
        } else {
            best
        }
    });

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[far] = true;

    let front: Vec<usize> = (0..=far).collect();
    let back: Vec<usize> = (far..n).chain(std::iter::once(0)).collect();
    simplify(points, &front, epsilon, &mut keep);
    simplify(points, &back, epsilon, &mut keep);

    let vertices: Vec<Point> = (0..n).filter(|&k| keep[k]).map(|k| points[k]).collect();
    drop_flat_vertices(vertices, epsilon)
}

fn simplify(points: &[Point], chain: &[usize], epsilon: f64, keep: &mut [bool]) {
    if chain.len() < 3 {
        return;
    }
    let last = chain.len() - 1;
    let a = points[chain[0]];
    let b = points[chain[last]];

    let (split, dist) = (1..last)
        .map(|k| (k, line_distance(points[chain[k]], a, b)))
        .fold((0, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });

    if dist > epsilon {
        keep[chain[split]] = true;
        simplify(points, &chain[..=split], epsilon, keep);
        simplify(points, &chain[split..], epsilon, keep);
    }
}

fn drop_flat_vertices(mut polygon: Vec<Point>, epsilon: f64) -> Vec<Point> {
    let mut k = 0;
    while polygon.len() > 3 && k < polygon.len() {
        let n = polygon.len();
        let prev = polygon[(k + n - 1) % n];
        let next = polygon[(k + 1) % n];
        if line_distance(polygon[k], prev, next) <= epsilon {
            polygon.remove(k);
        } else {
            k += 1;
        }
    }
    polygon
}

/// Distance from `p` to the infinite line through `a` and `b`, or to `a`
/// when both ends coincide.
pub fn line_distance(p: Point, a: Point, b: Point) -> f64 {
    if a == b {
        return distance(p, a);
    }
    let (dx, dy) = ((b.0 - a.0) as f64, (b.1 - a.1) as f64);
    let cross = dx * (p.1 - a.1) as f64 - dy * (p.0 - a.0) as f64;
    cross.abs() / (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contour::closed_length;

    fn regular_polygon(sides: usize, radius: f64) -> Vec<Point> {
        (0..sides)
            .map(|k| {
                let theta = k as f64 * std::f64::consts::TAU / sides as f64;
                (
                    (200.0 + radius * theta.cos()).round() as i32,
                    (200.0 + radius * theta.sin()).round() as i32,
                )
            })
            .collect()
    }

    // Walks every integer step along the closed polygon.
    fn densify(corners: &[Point]) -> Vec<Point> {
        let mut out = Vec::new();
        for k in 0..corners.len() {
            let a = corners[k];
            let b = corners[(k + 1) % corners.len()];
            let steps = (b.0 - a.0).abs().max((b.1 - a.1).abs()).max(1);
            for s in 0..steps {
                let t = s as f64 / steps as f64;
                out.push((
                    (a.0 as f64 + t * (b.0 - a.0) as f64).round() as i32,
                    (a.1 as f64 + t * (b.1 - a.1) as f64).round() as i32,
                ));
            }
        }
        out
    }

    #[test]
    fn dense_square_reduces_to_its_corners() {
        let corners = vec![(10, 10), (10, 60), (60, 60), (60, 10)];
        let dense = densify(&corners);
        let eps = 0.02 * closed_length(&dense);
        assert_eq!(approx_polygon(&dense, eps), corners);
    }

    #[test]
    fn start_point_on_an_edge_is_swept_away() {
        let dense = densify(&[(30, 10), (10, 10), (10, 60), (60, 60), (60, 10)]);
        let eps = 0.02 * closed_length(&dense);
        let poly = approx_polygon(&dense, eps);
        assert_eq!(poly.len(), 4);
        assert!(!poly.contains(&(30, 10)));
    }

    #[test]
    fn regular_shapes_keep_their_vertex_count() {
        for sides in 3..=6 {
            let dense = densify(&regular_polygon(sides, 80.0));
            let eps = 0.02 * closed_length(&dense);
            assert_eq!(approx_polygon(&dense, eps).len(), sides, "{sides} sides");
        }
    }

    #[test]
    fn smooth_circle_keeps_more_than_six_vertices() {
        let circle = regular_polygon(24, 100.0);
        let eps = 0.02 * closed_length(&circle);
        let poly = approx_polygon(&circle, eps);
        assert!(poly.len() > 6, "got {}", poly.len());
    }

    #[test]
    fn approximation_is_deterministic() {
        let dense = densify(&regular_polygon(5, 70.0));
        let eps = 0.02 * closed_length(&dense);
        assert_eq!(approx_polygon(&dense, eps), approx_polygon(&dense, eps));
    }

    #[test]
    fn short_chains_pass_through() {
        assert_eq!(approx_polygon(&[(1, 1), (4, 4)], 1.0), vec![(1, 1), (4, 4)]);
        assert!(approx_polygon(&[], 1.0).is_empty());
    }

    #[test]
    fn line_distance_handles_degenerate_segment() {
        assert_eq!(line_distance((3, 4), (0, 0), (0, 0)), 5.0);
        assert_eq!(line_distance((5, 3), (0, 0), (10, 0)), 3.0);
    }
}
