use ndarray::{Array2, ArrayView2};

/// Image point as `(x, y)`.
pub type Point = (i32, i32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BorderKind {
    Outer,
    Hole,
}

#[derive(Clone, Debug)]
pub struct Contour {
    pub points: Vec<Point>,
    pub kind: BorderKind,
    /// Index of the enclosing border in the same result, `None` for top level.
    pub parent: Option<usize>,
}

impl Contour {
    pub fn area(&self) -> f64 {
        polygon_area(&self.points)
    }

    pub fn perimeter(&self) -> f64 {
        closed_length(&self.points)
    }
}

// Neighbor offsets as (dy, dx), counterclockwise on screen starting east.
const NEIGHBORS: [(isize, isize); 8] = [
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
];

type Cell = (usize, usize);

fn step(p: Cell, dir: usize) -> Cell {
    let (dy, dx) = NEIGHBORS[dir];
    (
        (p.0 as isize + dy) as usize,
        (p.1 as isize + dx) as usize,
    )
}

fn direction(from: Cell, to: Cell) -> usize {
    let d = (
        to.0 as isize - from.0 as isize,
        to.1 as isize - from.1 as isize,
    );
    NEIGHBORS.iter().position(|&n| n == d).unwrap_or(0)
}

/// Finds every outer and hole border of a binary mask (Suzuki-Abe border
/// following), keeping the full nesting. Runs of points heading the same
/// way are compressed to their end points.
pub fn find_contours(mask: ArrayView2<u8>) -> Vec<Contour> {
    let (height, width) = mask.dim();

    // One pixel of zero padding so neighbor lookups never leave the grid.
    let mut labels = Array2::<i32>::zeros((height + 2, width + 2));
    for ((y, x), &px) in mask.indexed_iter() {
        if px != 0 {
            labels[(y + 1, x + 1)] = 1;
        }
    }

    let mut contours: Vec<Contour> = Vec::new();
    // Label 1 is the image frame; border n is stored at contours[n - 2].
    let mut nbd: i32 = 1;

    for i in 1..=height {
        let mut lnbd: i32 = 1;
        for j in 1..=width {
            let value = labels[(i, j)];

            let start = if value == 1 && labels[(i, j - 1)] == 0 {
                Some((BorderKind::Outer, (i, j - 1)))
            } else if value >= 1 && labels[(i, j + 1)] == 0 {
                if value > 1 {
                    lnbd = value;
                }
                Some((BorderKind::Hole, (i, j + 1)))
            } else {
                None
            };

            if let Some((kind, from)) = start {
                nbd += 1;
                let parent = parent_of(kind, lnbd, &contours);
                let cells = follow_border(&mut labels, (i, j), from, nbd);
                let points: Vec<Point> = cells
                    .iter()
                    .map(|&(y, x)| (x as i32 - 1, y as i32 - 1))
                    .collect();
                contours.push(Contour {
                    points: compress_chain(&points),
                    kind,
                    parent,
                });
            }

            let value = labels[(i, j)];
            if value != 0 && value != 1 {
                lnbd = value.abs();
            }
        }
    }

    tracing::trace!(count = contours.len(), "contours traced");
    contours
}

fn parent_of(kind: BorderKind, lnbd: i32, contours: &[Contour]) -> Option<usize> {
    if lnbd <= 1 {
        return None;
    }
    let index = (lnbd - 2) as usize;
    let last = contours.get(index)?;
    if last.kind == kind {
        last.parent
    } else {
        Some(index)
    }
}

fn follow_border(labels: &mut Array2<i32>, start: Cell, from: Cell, nbd: i32) -> Vec<Cell> {
    // Clockwise search for the pixel that closes the loop.
    let d0 = direction(start, from);
    let first = (0..8)
        .map(|k| step(start, (d0 + 8 - k) % 8))
        .find(|&p| labels[p] != 0);

    let Some(first) = first else {
        labels[start] = -nbd;
        return vec![start];
    };

    let mut cells = Vec::new();
    let mut prev = first;
    let mut curr = start;

    loop {
        cells.push(curr);

        let back = direction(curr, prev);
        let mut east_is_background = false;
        let mut next = prev;
        for k in 1..=8 {
            let dir = (back + k) % 8;
            let candidate = step(curr, dir);
            if labels[candidate] != 0 {
                next = candidate;
                break;
            }
            if dir == 0 {
                east_is_background = true;
            }
        }

        if east_is_background {
            labels[curr] = -nbd;
        } else if labels[curr] == 1 {
            labels[curr] = nbd;
        }

        if next == start && curr == first {
            break;
        }
        prev = curr;
        curr = next;
    }
    cells
}

/// Drops points lying inside a straight horizontal, vertical or diagonal
/// run of a closed chain.
pub fn compress_chain(points: &[Point]) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let kept: Vec<Point> = (0..n)
        .filter(|&k| {
            let prev = points[(k + n - 1) % n];
            let curr = points[k];
            let next = points[(k + 1) % n];
            (curr.0 - prev.0, curr.1 - prev.1) != (next.0 - curr.0, next.1 - curr.1)
        })
        .map(|k| points[k])
        .collect();

    if kept.is_empty() {
        vec![points[0]]
    } else {
        kept
    }
}

/// Shoelace area of a closed polygon, always non-negative.
pub fn polygon_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice: i64 = (0..n)
        .map(|k| {
            let (x0, y0) = points[k];
            let (x1, y1) = points[(k + 1) % n];
            x0 as i64 * y1 as i64 - x1 as i64 * y0 as i64
        })
        .sum();
    twice.abs() as f64 / 2.0
}

/// Length of a closed polyline, including the closing segment.
pub fn closed_length(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|k| distance(points[k], points[(k + 1) % n]))
        .sum()
}

pub fn distance(a: Point, b: Point) -> f64 {
    let dx = (b.0 - a.0) as f64;
    let dy = (b.1 - a.1) as f64;
    (dx * dx + dy * dy).sqrt()
}
