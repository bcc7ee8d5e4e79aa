pub mod conntrack;
pub mod graph;
pub mod layout;
pub mod render;

// -- Re-export the entry points for more concise usage

pub use conntrack::{CtState, TransitionTable};
pub use graph::{GraphError, LabeledGraph};
pub use render::{build_and_save_graph, build_and_save_graph_labeled, render, RenderOptions};
