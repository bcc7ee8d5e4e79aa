pub mod style;
pub mod text;

pub use style::GraphStyle;

use std::collections::HashSet;
use std::path::Path;
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::{debug, info};
use crate::graph::{EdgeView, GraphError, LabeledGraph};
use crate::layout::{LayoutKind, Point};
use crate::render::text::{draw_text_centered, text_size, TextStyle};

const MARGIN: i32 = 10;
const ARROW_LENGTH: f64 = 14.0;
const ARROW_HALF_WIDTH: f64 = 5.0;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub layout: LayoutKind,
    pub seed: Option<u64>,
    pub edge_labels: bool,
    pub style: GraphStyle,
}

impl RenderOptions {
    /// Large square canvas with Kamada-Kawai placement and edge labels.
    pub fn labeled() -> Self {
        Self {
            width: 1500,
            height: 1500,
            layout: LayoutKind::KamadaKawai,
            seed: None,
            edge_labels: true,
            style: GraphStyle::default(),
        }
    }

    /// Small canvas with spring placement and no edge labels.
    pub fn unlabeled() -> Self {
        Self {
            width: 800,
            height: 600,
            layout: LayoutKind::Spring,
            seed: None,
            edge_labels: false,
            style: GraphStyle::default(),
        }
    }
}

/// Build a directed graph from `edges` and save it as a PNG, drawing
/// `edge_labels` next to their edges when given.
pub fn build_and_save_graph_labeled<N: AsRef<str>, P: AsRef<Path>>(
    edges: &[(N, N)],
    edge_labels: Option<&[((N, N), &str)]>,
    output: P,
) -> Result<(), GraphError> {
    let graph = LabeledGraph::from_edges(edges, edge_labels)?;
    let mut options = RenderOptions::labeled();
    options.edge_labels = edge_labels.is_some();
    render(&graph, &options, output)
}

/// Build a directed graph from `edges` and save it as a PNG without edge labels.
pub fn build_and_save_graph<N: AsRef<str>, P: AsRef<Path>>(
    edges: &[(N, N)],
    output: P,
) -> Result<(), GraphError> {
    let graph = LabeledGraph::from_edges(edges, None)?;
    render(&graph, &RenderOptions::unlabeled(), output)
}

/// Maps layout space `[-1, 1]^2` onto the pixel canvas, y axis pointing up.
struct Canvas {
    margin: i32,
    width: i32,
    height: i32,
}

impl Canvas {
    fn new(width: u32, height: u32, node_radius: i32) -> Self {
        Self {
            margin: node_radius + MARGIN,
            width: width as i32,
            height: height as i32,
        }
    }

    fn to_pixel(&self, (x, y): Point) -> (f64, f64) {
        let usable_w = (self.width - 2 * self.margin).max(0) as f64;
        let usable_h = (self.height - 2 * self.margin).max(0) as f64;
        let px = self.margin as f64 + (x + 1.0) / 2.0 * usable_w;
        let py = self.margin as f64 + (1.0 - y) / 2.0 * usable_h;
        (px, py)
    }

    fn center(&self) -> (f64, f64) {
        (self.width as f64 / 2.0, self.height as f64 / 2.0)
    }
}

fn round((x, y): (f64, f64)) -> (i32, i32) {
    (x.round() as i32, y.round() as i32)
}

fn unit(dx: f64, dy: f64) -> Option<(f64, f64)> {
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1e-9 {
        None
    } else {
        Some((dx / len, dy / len))
    }
}

/// Lay out `graph` and draw it to a PNG at `output`.
///
/// Edges are drawn first, then nodes and their names, then edge labels on
/// top. An empty graph still produces a blank image.
pub fn render<P: AsRef<Path>>(
    graph: &LabeledGraph,
    options: &RenderOptions,
    output: P,
) -> Result<(), GraphError> {
    let (width, height) = (options.width, options.height);
    if width == 0 || height == 0 {
        return Err(GraphError::InvalidCanvas { width, height });
    }

    let style = &options.style;
    let radius = style.node_radius_px();
    let canvas = Canvas::new(width, height, radius);

    let positions = options.layout.build(options.seed).positions(graph);
    let pixels: Vec<(f64, f64)> = positions.iter().map(|&p| canvas.to_pixel(p)).collect();
    debug!(layout = ?options.layout, nodes = pixels.len(), "computed node positions");

    let output = output.as_ref();
    let root = BitMapBackend::new(output, (width, height)).into_drawing_area();
    root.fill(&style::WHITE)?;

    let edges = graph.edges();
    let pairs: HashSet<(usize, usize)> = edges.iter().map(|e| (e.from, e.to)).collect();

    for edge in &edges {
        if edge.from == edge.to {
            draw_self_loop(&root, &canvas, pixels[edge.from], radius, style)?;
        } else {
            draw_arrow(&root, pixels[edge.from], pixels[edge.to], radius, style)?;
        }
    }

    let name_style = TextStyle {
        color: style.font_color,
        scale: style.glyph_scale(style.font_size),
        bold: style.bold_names,
        background: None,
    };
    for (name, &center) in graph.node_names().iter().zip(&pixels) {
        root.draw(&Circle::new(round(center), radius, style.node_color.filled()))?;
        draw_text_centered(&root, name, round(center), &name_style)?;
    }

    if options.edge_labels {
        let label_style = TextStyle {
            color: style.edge_label_color,
            scale: style.glyph_scale(style.edge_font_size),
            bold: false,
            background: Some(style::WHITE),
        };
        for edge in &edges {
            if let Some(label) = &edge.label {
                let reverse = pairs.contains(&(edge.to, edge.from));
                let at =
                    label_position(&canvas, &pixels, edge, reverse, radius, &label_style, label);
                draw_text_centered(&root, label, round(at), &label_style)?;
            }
        }
    }

    root.present()?;
    info!(
        path = %output.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "graph saved"
    );
    Ok(())
}

fn draw_arrow<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    from: (f64, f64),
    to: (f64, f64),
    radius: i32,
    style: &GraphStyle,
) -> Result<(), GraphError> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let (ux, uy) = match unit(dx, dy) {
        Some(u) => u,
        None => return Ok(()),
    };
    let len = (dx * dx + dy * dy).sqrt();
    let r = radius as f64;

    // Overlapping nodes leave nothing visible to draw
    if len <= 2.0 * r {
        return Ok(());
    }

    let start = (from.0 + ux * r, from.1 + uy * r);
    let tip = (to.0 - ux * r, to.1 - uy * r);
    let base = (tip.0 - ux * ARROW_LENGTH, tip.1 - uy * ARROW_LENGTH);
    let (nx, ny) = (-uy * ARROW_HALF_WIDTH, ux * ARROW_HALF_WIDTH);

    let shaft = vec![round(start), round(base)];
    area.draw(&PathElement::new(shaft, style.edge_color.stroke_width(1)))?;
    let head = vec![
        round(tip),
        round((base.0 + nx, base.1 + ny)),
        round((base.0 - nx, base.1 - ny)),
    ];
    area.draw(&Polygon::new(head, style.edge_color.filled()))?;
    Ok(())
}

/// Outward direction from the canvas center, pointing up for a centred node.
fn outward(canvas: &Canvas, at: (f64, f64)) -> (f64, f64) {
    let (cx, cy) = canvas.center();
    unit(at.0 - cx, at.1 - cy).unwrap_or((0.0, -1.0))
}

fn draw_self_loop<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    canvas: &Canvas,
    at: (f64, f64),
    radius: i32,
    style: &GraphStyle,
) -> Result<(), GraphError> {
    let (ux, uy) = outward(canvas, at);
    let r = radius as f64;
    let loop_radius = (r * 0.6).round().max(1.0) as u32;
    let center = (at.0 + ux * r, at.1 + uy * r);
    area.draw(&Circle::new(round(center), loop_radius, style.edge_color.stroke_width(1)))?;
    Ok(())
}

fn label_position(
    canvas: &Canvas,
    pixels: &[(f64, f64)],
    edge: &EdgeView,
    reverse: bool,
    radius: i32,
    label_style: &TextStyle,
    label: &str,
) -> (f64, f64) {
    let from = pixels[edge.from];
    let to = pixels[edge.to];
    let (_, text_h) = text_size(label, label_style.scale);

    if edge.from == edge.to {
        let (ux, uy) = outward(canvas, from);
        let reach = radius as f64 * 1.6 + text_h as f64;
        return (from.0 + ux * reach, from.1 + uy * reach);
    }

    let mid = ((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0);
    if !reverse {
        return mid;
    }

    // Both directions share one line, so each label moves to its own side
    match unit(to.0 - from.0, to.1 - from.1) {
        Some((ux, uy)) => {
            let shift = text_h as f64;
            (mid.0 - uy * shift, mid.1 + ux * shift)
        }
        None => mid,
    }
}

// -- Unit tests --

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;
    use crate::conntrack::TransitionTable;
    use crate::graph::{GraphError, LabeledGraph};
    use crate::render::{build_and_save_graph, build_and_save_graph_labeled, render, RenderOptions};

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn assert_png(path: &Path) {
        let bytes = fs::read(path).unwrap();
        assert!(bytes.len() > PNG_SIGNATURE.len());
        assert_eq!(bytes[..8], PNG_SIGNATURE);
    }

    #[test]
    fn test_labeled_conntrack_graph() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("my_network.png");

        let (edges, labels) = TransitionTable::conntrack().edges_and_labels();
        build_and_save_graph_labeled(&edges, Some(&labels[..]), &path).unwrap();
        assert_png(&path);
    }

    #[test]
    fn test_unlabeled_path_same_edges() {
        let dir = tempdir().unwrap();
        let labeled = dir.path().join("labeled.png");
        let unlabeled = dir.path().join("graph.png");

        let (edges, _) = TransitionTable::conntrack().edges_and_labels();
        build_and_save_graph_labeled(&edges, None, &labeled).unwrap();
        build_and_save_graph(&edges, &unlabeled).unwrap();
        assert_png(&labeled);
        assert_png(&unlabeled);
    }

    #[test]
    fn test_empty_edge_list() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.png");

        let edges: Vec<(&str, &str)> = Vec::new();
        build_and_save_graph_labeled(&edges, None, &path).unwrap();
        assert_png(&path);

        let path = dir.path().join("empty_unlabeled.png");
        build_and_save_graph(&edges, &path).unwrap();
        assert_png(&path);
    }

    #[test]
    fn test_unwritable_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("graph.png");

        let err = build_and_save_graph(&[("a", "b")], &path).unwrap_err();
        assert!(matches!(err, GraphError::Draw(_)), "unexpected error: {}", err);
        assert!(!path.exists());
    }

    #[test]
    fn test_invalid_canvas() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("zero.png");

        let graph = LabeledGraph::from_edges(&[("a", "b")], None).unwrap();
        let mut options = RenderOptions::unlabeled();
        options.width = 0;

        let err = render(&graph, &options, &path).unwrap_err();
        assert!(matches!(err, GraphError::InvalidCanvas { width: 0, height: 600 }));
    }

    #[test]
    fn test_tiny_canvas_does_not_fail() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tiny.png");

        let graph = LabeledGraph::from_edges(&[("a", "b"), ("b", "a"), ("b", "b")], None).unwrap();
        let mut options = RenderOptions::labeled();
        options.width = 20;
        options.height = 20;

        render(&graph, &options, &path).unwrap();
        assert_png(&path);
    }
}
