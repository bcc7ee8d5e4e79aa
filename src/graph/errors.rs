use std::io;
use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Drawing error: {0}")]
    Draw(String), // Backend or image encoder failure

    #[error("Invalid canvas size: {width}x{height}")]
    InvalidCanvas {
        width: u32,
        height: u32,
    },

    #[error("Label refers to missing edge: {from} -> {to}")]
    UnknownEdge {
        from: String,
        to: String,
    },
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for GraphError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        GraphError::Draw(err.to_string())
    }
}
