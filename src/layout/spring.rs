use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;
use crate::graph::LabeledGraph;
use crate::layout::{rescale, Layout, Point};

const MIN_DISTANCE: f64 = 0.01;

fn extent(values: impl Iterator<Item = f64> + Clone) -> f64 {
    let lo = values.clone().fold(f64::INFINITY, f64::min);
    let hi = values.fold(f64::NEG_INFINITY, f64::max);
    hi - lo
}

/// Fruchterman-Reingold force-directed layout.
#[derive(Debug, Clone)]
pub struct Spring {
    pub seed: Option<u64>,
    pub iterations: usize,
    pub threshold: f64,
}

impl Spring {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            seed,
            iterations: 50,
            threshold: 1e-4,
        }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl Layout for Spring {
    fn positions(&self, graph: &LabeledGraph) -> Vec<Point> {
        let n = graph.node_count();
        if n == 0 {
            return Vec::new();
        }
        if n == 1 {
            return vec![(0.0, 0.0)];
        }

        // Attraction acts along edges regardless of direction
        let mut adjacent = vec![vec![false; n]; n];
        for edge in graph.edges() {
            adjacent[edge.from][edge.to] = true;
            adjacent[edge.to][edge.from] = true;
        }

        let mut rng = self.rng();
        let mut pos: Vec<Point> = (0..n).map(|_| (rng.gen::<f64>(), rng.gen::<f64>())).collect();

        let k = (1.0 / n as f64).sqrt();
        let mut t = extent(pos.iter().map(|p| p.0)).max(extent(pos.iter().map(|p| p.1))) * 0.1;
        let dt = t / (self.iterations as f64 + 1.0);

        let mut done = 0;
        for _ in 0..self.iterations {
            let mut displacement = vec![(0.0, 0.0); n];
            for i in 0..n {
                for j in 0..n {
                    if i == j {
                        continue;
                    }
                    let dx = pos[i].0 - pos[j].0;
                    let dy = pos[i].1 - pos[j].1;
                    let d = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                    let mut force = k * k / (d * d);
                    if adjacent[i][j] {
                        force -= d / k;
                    }
                    displacement[i].0 += dx * force;
                    displacement[i].1 += dy * force;
                }
            }

            let mut moved = 0.0;
            for (p, (ddx, ddy)) in pos.iter_mut().zip(displacement) {
                let length = (ddx * ddx + ddy * ddy).sqrt().max(MIN_DISTANCE);
                let (sx, sy) = (ddx * t / length, ddy * t / length);
                p.0 += sx;
                p.1 += sy;
                moved += (sx * sx + sy * sy).sqrt();
            }

            t -= dt;
            done += 1;
            if moved / (n as f64) < self.threshold {
                break;
            }
        }

        debug!(nodes = n, iterations = done, "spring layout done");
        rescale(&mut pos, 1.0);
        pos
    }
}

// -- Unit tests --

#[cfg(test)]
mod tests {
    use crate::graph::LabeledGraph;
    use crate::layout::{Layout, Spring};

    fn triangle() -> LabeledGraph {
        let edges = [("a", "b"), ("b", "c"), ("c", "a")];
        LabeledGraph::from_edges(&edges, None).unwrap()
    }

    #[test]
    fn test_seeded_layout_is_reproducible() {
        let graph = triangle();
        let a = Spring::new(Some(42)).positions(&graph);
        let b = Spring::new(Some(42)).positions(&graph);
        assert_eq!(a, b);
    }

    #[test]
    fn test_nodes_do_not_collapse() {
        let graph = triangle();
        let pos = Spring::new(Some(1)).positions(&graph);
        for i in 0..pos.len() {
            for j in (i + 1)..pos.len() {
                let d = ((pos[i].0 - pos[j].0).powi(2) + (pos[i].1 - pos[j].1).powi(2)).sqrt();
                assert!(d > 0.05, "nodes {} and {} overlap", i, j);
            }
        }
    }
}
