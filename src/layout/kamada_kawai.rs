use tracing::debug;
use crate::graph::LabeledGraph;
use crate::layout::{circular, rescale, Layout, Point};

/// Kamada-Kawai spring embedding.
///
/// Every pair of nodes is joined by an ideal spring whose rest length is the
/// hop distance between them and whose stiffness falls off with the square of
/// that distance. Starting from a circle, the node with the largest energy
/// gradient is moved by Newton-Raphson steps until every gradient is below
/// `epsilon`.
#[derive(Debug, Clone)]
pub struct KamadaKawai {
    pub epsilon: f64,
    pub max_inner_iterations: usize,
    pub max_outer_iterations_per_node: usize,
}

impl Default for KamadaKawai {
    fn default() -> Self {
        Self {
            epsilon: 1e-4,
            max_inner_iterations: 50,
            max_outer_iterations_per_node: 100,
        }
    }
}

struct Springs {
    length: Vec<Vec<f64>>,
    strength: Vec<Vec<f64>>,
}

impl Springs {
    fn new(graph: &LabeledGraph) -> Self {
        let hops = graph.hop_distances();
        let longest = hops.iter().flatten().flatten().copied().max().unwrap_or(0);

        // Disconnected components sit just beyond the farthest reachable pair
        let unreachable = (longest + 1) as f64;

        let length: Vec<Vec<f64>> = hops
            .iter()
            .map(|row| row.iter().map(|d| d.map_or(unreachable, |d| d as f64)).collect())
            .collect();
        let strength = length
            .iter()
            .map(|row| row.iter().map(|&l| if l > 0.0 { 1.0 / (l * l) } else { 0.0 }).collect())
            .collect();

        Self { length, strength }
    }

    /// First derivatives of the energy with respect to node `m`.
    fn gradient(&self, pos: &[Point], m: usize) -> (f64, f64) {
        let (xm, ym) = pos[m];
        let mut ex = 0.0;
        let mut ey = 0.0;
        for (i, &(xi, yi)) in pos.iter().enumerate() {
            if i == m {
                continue;
            }
            let (dx, dy) = (xm - xi, ym - yi);
            let dist = (dx * dx + dy * dy).sqrt();
            if dist < 1e-9 {
                continue;
            }
            let k = self.strength[m][i];
            let l = self.length[m][i];
            ex += k * (dx - l * dx / dist);
            ey += k * (dy - l * dy / dist);
        }
        (ex, ey)
    }

    /// Second derivatives `(d2x, d2y, dxy)` of the energy with respect to node `m`.
    fn hessian(&self, pos: &[Point], m: usize) -> (f64, f64, f64) {
        let (xm, ym) = pos[m];
        let (mut d2x, mut d2y, mut dxy) = (0.0, 0.0, 0.0);
        for (i, &(xi, yi)) in pos.iter().enumerate() {
            if i == m {
                continue;
            }
            let (dx, dy) = (xm - xi, ym - yi);
            let dist = (dx * dx + dy * dy).sqrt();
            if dist < 1e-9 {
                continue;
            }
            let k = self.strength[m][i];
            let l = self.length[m][i];
            let cube = dist * dist * dist;
            d2x += k * (1.0 - l * dy * dy / cube);
            d2y += k * (1.0 - l * dx * dx / cube);
            dxy += k * (l * dx * dy / cube);
        }
        (d2x, d2y, dxy)
    }
}

fn magnitude((x, y): (f64, f64)) -> f64 {
    (x * x + y * y).sqrt()
}

impl Layout for KamadaKawai {
    fn positions(&self, graph: &LabeledGraph) -> Vec<Point> {
        let n = graph.node_count();
        if n <= 1 {
            return circular(n);
        }

        let springs = Springs::new(graph);
        let mut pos = circular(n);
        let max_outer = self.max_outer_iterations_per_node * n;

        let mut outer = 0;
        while outer < max_outer {
            let (m, delta) = (0..n)
                .map(|m| (m, magnitude(springs.gradient(&pos, m))))
                .fold((0, 0.0), |best, cur| if cur.1 > best.1 { cur } else { best });
            if delta < self.epsilon {
                break;
            }

            for _ in 0..self.max_inner_iterations {
                let (ex, ey) = springs.gradient(&pos, m);
                if magnitude((ex, ey)) < self.epsilon {
                    break;
                }
                let (d2x, d2y, dxy) = springs.hessian(&pos, m);
                let det = d2x * d2y - dxy * dxy;
                if det.abs() < 1e-12 {
                    break;
                }
                pos[m].0 += (-ex * d2y + ey * dxy) / det;
                pos[m].1 += (-ey * d2x + ex * dxy) / det;
            }
            outer += 1;
        }

        debug!(nodes = n, iterations = outer, "kamada-kawai layout done");
        rescale(&mut pos, 1.0);
        pos
    }
}

// -- Unit tests --

#[cfg(test)]
mod tests {
    use crate::graph::LabeledGraph;
    use crate::layout::{KamadaKawai, Layout};

    fn dist(a: (f64, f64), b: (f64, f64)) -> f64 {
        ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
    }

    #[test]
    fn test_path_is_stretched_out() {
        let edges = [("a", "b"), ("b", "c"), ("c", "d")];
        let graph = LabeledGraph::from_edges(&edges, None).unwrap();
        let pos = KamadaKawai::default().positions(&graph);

        // The ends of a path lie farther apart than any adjacent pair
        let ends = dist(pos[0], pos[3]);
        for i in 0..3 {
            assert!(ends > dist(pos[i], pos[i + 1]));
        }
    }

    #[test]
    fn test_disconnected_components() {
        let edges = [("a", "b"), ("c", "d")];
        let graph = LabeledGraph::from_edges(&edges, None).unwrap();
        let pos = KamadaKawai::default().positions(&graph);
        assert_eq!(pos.len(), 4);
        assert!(pos.iter().all(|p| p.0.is_finite() && p.1.is_finite()));
    }

    #[test]
    fn test_deterministic() {
        let edges = [("a", "b"), ("b", "c"), ("c", "a"), ("c", "d")];
        let graph = LabeledGraph::from_edges(&edges, None).unwrap();
        let layout = KamadaKawai::default();
        assert_eq!(layout.positions(&graph), layout.positions(&graph));
    }
}
