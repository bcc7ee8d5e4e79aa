//! Draw the netfilter TCP conntrack transition table as a PNG.
//!
//! Run without arguments to write `my_network.png` with labeled edges.

use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::Parser;
use conntrack_viz::layout::LayoutKind;
use conntrack_viz::{render, LabeledGraph, RenderOptions, TransitionTable};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "conntrack-viz")]
#[command(version, about = "Render the TCP conntrack state transition table as a graph")]
struct Cli {
    /// Output image path
    #[arg(short, long, default_value = "my_network.png")]
    output: PathBuf,

    /// Layout algorithm (default depends on whether labels are drawn)
    #[arg(long, value_enum)]
    layout: Option<LayoutKind>,

    /// Draw the unlabeled graph on the small canvas
    #[arg(long)]
    no_labels: bool,

    /// Seed for the spring layout
    #[arg(long)]
    seed: Option<u64>,

    /// Canvas width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Print the transition table and exit
    #[arg(long)]
    print_table: bool,
}

impl Cli {
    fn render_options(&self) -> RenderOptions {
        let mut options = if self.no_labels {
            RenderOptions::unlabeled()
        } else {
            RenderOptions::labeled()
        };
        if let Some(layout) = self.layout {
            options.layout = layout;
        }
        options.seed = self.seed;
        options.width = self.width.unwrap_or(options.width);
        options.height = self.height.unwrap_or(options.height);
        options
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_table(table: &TransitionTable) {
    for t in table.transitions() {
        println!(
            "{:<16} {:<4} -> {:<4} ({} -> {})",
            t.event.to_string(),
            t.from,
            t.to,
            t.from.long_name(),
            t.to.long_name()
        );
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let table = TransitionTable::conntrack();
    if cli.print_table {
        print_table(&table);
        return Ok(());
    }

    let (edges, labels) = table.edges_and_labels();
    let labels = if cli.no_labels { None } else { Some(&labels[..]) };
    let graph = LabeledGraph::from_edges(&edges, labels)
        .context("failed to build transition graph")?;
    info!(transitions = table.len(), nodes = graph.node_count(), "loaded conntrack table");

    let options = cli.render_options();
    render(&graph, &options, &cli.output)
        .with_context(|| format!("failed to render graph to {}", cli.output.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use conntrack_viz::layout::LayoutKind;
    use super::Cli;

    #[test]
    fn test_defaults_match_labeled_preset() {
        let cli = Cli::parse_from(["conntrack-viz"]);
        let options = cli.render_options();
        assert_eq!(cli.output.to_str(), Some("my_network.png"));
        assert_eq!(options.layout, LayoutKind::KamadaKawai);
        assert!(options.edge_labels);
        assert_eq!((options.width, options.height), (1500, 1500));
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "conntrack-viz",
            "--no-labels",
            "--layout",
            "kamada-kawai",
            "--seed",
            "3",
            "--width",
            "640",
            "-o",
            "out.png",
        ]);
        let options = cli.render_options();
        assert_eq!(options.layout, LayoutKind::KamadaKawai);
        assert!(!options.edge_labels);
        assert_eq!(options.seed, Some(3));
        assert_eq!((options.width, options.height), (640, 600));
        assert_eq!(cli.output.to_str(), Some("out.png"));
    }
}
