pub mod kamada_kawai;
pub mod spring;

pub use kamada_kawai::KamadaKawai;
pub use spring::Spring;

use crate::graph::LabeledGraph;

/// A node position in layout space, before mapping onto a canvas.
pub type Point = (f64, f64);

/// Assigns a position to every node of a graph.
///
/// The returned vector is indexed in node order (see `LabeledGraph::node_names`)
/// and is rescaled so every coordinate lies in `[-1, 1]`.
pub trait Layout {
    fn positions(&self, graph: &LabeledGraph) -> Vec<Point>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LayoutKind {
    KamadaKawai,
    Spring,
}

impl LayoutKind {
    pub fn build(self, seed: Option<u64>) -> Box<dyn Layout> {
        match self {
            LayoutKind::KamadaKawai => Box::new(KamadaKawai::default()),
            LayoutKind::Spring => Box::new(Spring::new(seed)),
        }
    }
}

/// Nodes evenly spaced on the unit circle.
pub fn circular(n: usize) -> Vec<Point> {
    if n == 1 {
        return vec![(0.0, 0.0)];
    }
    (0..n)
        .map(|i| {
            let theta = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
            (theta.cos(), theta.sin())
        })
        .collect()
}

/// Center positions on the origin and scale them so the largest coordinate is `scale`.
pub fn rescale(pos: &mut [Point], scale: f64) {
    if pos.is_empty() {
        return;
    }

    let n = pos.len() as f64;
    let cx = pos.iter().map(|p| p.0).sum::<f64>() / n;
    let cy = pos.iter().map(|p| p.1).sum::<f64>() / n;
    for p in pos.iter_mut() {
        p.0 -= cx;
        p.1 -= cy;
    }

    let lim = pos
        .iter()
        .map(|p| p.0.abs().max(p.1.abs()))
        .fold(0.0_f64, f64::max);
    if lim > 0.0 {
        for p in pos.iter_mut() {
            p.0 *= scale / lim;
            p.1 *= scale / lim;
        }
    }
}

// -- Unit tests --
