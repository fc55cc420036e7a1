//! Barnes–Hut quadtree for approximate many-body repulsion.
//!
//! The tree is rebuilt from current positions once per simulation step; its
//! cell storage is an arena `Vec` that keeps its capacity across rebuilds,
//! so steady-state stepping does not allocate. Mass and center-of-mass
//! aggregates are accumulated along the insertion path, so no separate
//! summarization pass is needed.
//!
//! A cell is accepted as a single far-field aggregate when
//! `width / distance < theta`; otherwise its children are opened. Lower
//! theta means more accuracy and more opened cells; `theta = 0` degenerates
//! to the exact pairwise sum (used by the tests as an oracle).

/// Splitting stops at this depth; coincident points merge into one
/// aggregate leaf instead of recursing forever.
const MAX_DEPTH: usize = 32;

const NO_CHILDREN: i32 = -1;

#[derive(Clone, Copy)]
struct Cell {
    /// Region center.
    cx: f32,
    cy: f32,
    /// Half extent of the square region.
    half: f32,
    /// Aggregate position sum and mass of all points in the region.
    sum_x: f32,
    sum_y: f32,
    mass: f32,
    /// Stored point while the cell is an unsplit leaf.
    px: f32,
    py: f32,
    /// Arena index of the first of four children, or `NO_CHILDREN`.
    children: i32,
}

impl Cell {
    fn new(cx: f32, cy: f32, half: f32) -> Self {
        Self {
            cx,
            cy,
            half,
            sum_x: 0.0,
            sum_y: 0.0,
            mass: 0.0,
            px: 0.0,
            py: 0.0,
            children: NO_CHILDREN,
        }
    }
}

/// Arena-backed Barnes–Hut quadtree over unit-mass points.
pub struct QuadTree {
    cells: Vec<Cell>,
    theta: f32,
}

impl QuadTree {
    /// Create an empty tree with the given opening threshold.
    pub fn new(theta: f32) -> Self {
        Self {
            cells: Vec::new(),
            theta,
        }
    }

    /// Rebuild the tree from the given positions, reusing the arena.
    pub fn rebuild(&mut self, xs: &[f32], ys: &[f32]) {
        self.cells.clear();
        if xs.is_empty() {
            return;
        }

        let mut min_x = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_y = f32::NEG_INFINITY;
        for (&x, &y) in xs.iter().zip(ys) {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }

        // Square root region, padded so boundary points land strictly inside.
        let cx = (min_x + max_x) * 0.5;
        let cy = (min_y + max_y) * 0.5;
        let half = ((max_x - min_x).max(max_y - min_y) * 0.5).max(1e-6) * 1.001;

        self.cells.push(Cell::new(cx, cy, half));
        for (&x, &y) in xs.iter().zip(ys) {
            self.insert(x, y);
        }
    }

    /// Number of cells currently in the arena.
    #[cfg(test)]
    fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn quadrant(cx: f32, cy: f32, x: f32, y: f32) -> usize {
        (usize::from(x > cx)) | (usize::from(y > cy) << 1)
    }

    /// Allocate four children for the cell and return the first index.
    fn alloc_children(&mut self, idx: usize) -> usize {
        let first = self.cells.len();
        let (cx, cy, half) = {
            let cell = &self.cells[idx];
            (cell.cx, cell.cy, cell.half)
        };
        let h = half * 0.5;
        for q in 0..4 {
            let ox = if q & 1 == 1 { h } else { -h };
            let oy = if q & 2 == 2 { h } else { -h };
            self.cells.push(Cell::new(cx + ox, cy + oy, h));
        }
        self.cells[idx].children = first as i32;
        first
    }

    fn insert(&mut self, x: f32, y: f32) {
        let mut idx = 0;
        let mut depth = 0;
        loop {
            let cell = &mut self.cells[idx];
            cell.sum_x += x;
            cell.sum_y += y;
            cell.mass += 1.0;

            if cell.children != NO_CHILDREN {
                idx = cell.children as usize + Self::quadrant(cell.cx, cell.cy, x, y);
                depth += 1;
                continue;
            }
            if cell.mass == 1.0 {
                // First point in this region.
                cell.px = x;
                cell.py = y;
                return;
            }
            if depth >= MAX_DEPTH {
                // Coincident cluster: keep as an aggregate leaf.
                return;
            }

            // Occupied leaf: split it and push the stored point down one
            // level, then keep descending with the new point.
            let (old_x, old_y, cx, cy) = {
                let cell = &self.cells[idx];
                (cell.px, cell.py, cell.cx, cell.cy)
            };
            let first = self.alloc_children(idx);

            let old_child = first + Self::quadrant(cx, cy, old_x, old_y);
            let child = &mut self.cells[old_child];
            child.sum_x += old_x;
            child.sum_y += old_y;
            child.mass += 1.0;
            child.px = old_x;
            child.py = old_y;

            idx = first + Self::quadrant(cx, cy, x, y);
            depth += 1;
        }
    }

    /// Accumulate the repulsive force on a query point.
    ///
    /// `kernel(dist, mass)` returns the force magnitude exerted by an
    /// aggregate of the given mass at the given distance; the resulting
    /// vector is directed away from the aggregate. Zero-distance aggregates
    /// (the query point's own leaf, or points coincident with it) are
    /// skipped, which keeps the sum free of NaN.
    pub fn accumulate<F>(&self, x: f32, y: f32, kernel: F) -> (f32, f32)
    where
        F: Fn(f32, f32) -> f32,
    {
        let mut fx = 0.0;
        let mut fy = 0.0;
        if self.cells.is_empty() {
            return (fx, fy);
        }

        let mut stack: Vec<usize> = Vec::with_capacity(64);
        stack.push(0);
        while let Some(idx) = stack.pop() {
            let cell = &self.cells[idx];
            if cell.mass == 0.0 {
                continue;
            }
            let dx = x - cell.sum_x / cell.mass;
            let dy = y - cell.sum_y / cell.mass;
            let dist = (dx * dx + dy * dy).sqrt();

            if cell.children != NO_CHILDREN && cell.half * 2.0 > self.theta * dist {
                let first = cell.children as usize;
                stack.extend([first, first + 1, first + 2, first + 3]);
                continue;
            }
            if dist <= f32::EPSILON {
                continue;
            }
            let f = kernel(dist, cell.mass);
            fx += f * dx / dist;
            fy += f * dy / dist;
        }
        (fx, fy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Inverse-square kernel used by the spring model's repulsion.
    fn inv_square(dist: f32, mass: f32) -> f32 {
        mass / (dist * dist)
    }

    /// Exact pairwise reference sum for the same kernel.
    fn brute_force(xs: &[f32], ys: &[f32], i: usize) -> (f32, f32) {
        let mut fx = 0.0;
        let mut fy = 0.0;
        for o in 0..xs.len() {
            if o == i {
                continue;
            }
            let dx = xs[i] - xs[o];
            let dy = ys[i] - ys[o];
            let dist = (dx * dx + dy * dy).sqrt();
            if dist <= f32::EPSILON {
                continue;
            }
            let f = inv_square(dist, 1.0);
            fx += f * dx / dist;
            fy += f * dy / dist;
        }
        (fx, fy)
    }

    /// Deterministic scattered test points.
    fn scatter(n: usize) -> (Vec<f32>, Vec<f32>) {
        let xs = (0..n).map(|i| ((i * 37 + 11) % 101) as f32 * 0.13).collect();
        let ys = (0..n).map(|i| ((i * 73 + 29) % 97) as f32 * 0.17).collect();
        (xs, ys)
    }

    #[test]
    fn test_empty_tree_zero_force() {
        let mut tree = QuadTree::new(0.5);
        tree.rebuild(&[], &[]);
        assert_eq!(tree.accumulate(1.0, 2.0, inv_square), (0.0, 0.0));
    }

    #[test]
    fn test_single_point_excludes_itself() {
        let mut tree = QuadTree::new(0.5);
        tree.rebuild(&[3.0], &[4.0]);
        assert_eq!(tree.accumulate(3.0, 4.0, inv_square), (0.0, 0.0));
    }

    #[test]
    fn test_two_points_repel_along_axis() {
        let mut tree = QuadTree::new(0.5);
        tree.rebuild(&[0.0, 2.0], &[0.0, 0.0]);

        let (fx, fy) = tree.accumulate(0.0, 0.0, inv_square);
        assert!(fx < 0.0, "force should point away from the other point");
        assert!(fy.abs() < 1e-6);

        let (fx, _) = tree.accumulate(2.0, 0.0, inv_square);
        assert!(fx > 0.0);
    }

    #[test]
    fn test_theta_zero_matches_brute_force() {
        let (xs, ys) = scatter(50);
        let mut tree = QuadTree::new(0.0);
        tree.rebuild(&xs, &ys);

        for i in 0..xs.len() {
            let (fx, fy) = tree.accumulate(xs[i], ys[i], inv_square);
            let (bx, by) = brute_force(&xs, &ys, i);
            assert!((fx - bx).abs() < 1e-3, "node {i}: {fx} vs {bx}");
            assert!((fy - by).abs() < 1e-3, "node {i}: {fy} vs {by}");
        }
    }

    #[test]
    fn test_approximation_close_to_exact() {
        let (xs, ys) = scatter(200);
        let mut tree = QuadTree::new(0.5);
        tree.rebuild(&xs, &ys);

        for i in (0..xs.len()).step_by(17) {
            let (fx, fy) = tree.accumulate(xs[i], ys[i], inv_square);
            let (bx, by) = brute_force(&xs, &ys, i);
            let exact = (bx * bx + by * by).sqrt().max(1e-6);
            let err = ((fx - bx).powi(2) + (fy - by).powi(2)).sqrt();
            assert!(
                err / exact < 0.1,
                "node {i}: relative error {} too large",
                err / exact
            );
        }
    }

    #[test]
    fn test_coincident_points_terminate_and_stay_finite() {
        let xs = vec![1.0; 20];
        let ys = vec![1.0; 20];
        let mut tree = QuadTree::new(0.5);
        tree.rebuild(&xs, &ys);

        let (fx, fy) = tree.accumulate(1.0, 1.0, inv_square);
        assert!(fx.is_finite() && fy.is_finite());

        // A distinct query point still feels the cluster's full mass.
        let (fx, _) = tree.accumulate(3.0, 1.0, inv_square);
        assert!((fx - 20.0 / 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_arena_reuse_across_rebuilds() {
        let (xs, ys) = scatter(64);
        let mut tree = QuadTree::new(0.5);
        tree.rebuild(&xs, &ys);
        let first = tree.cell_count();

        tree.rebuild(&xs, &ys);
        assert_eq!(tree.cell_count(), first);

        tree.rebuild(&xs[..8], &ys[..8]);
        assert!(tree.cell_count() < first);
    }
}
