use thiserror::Error;

#[derive(Debug, PartialEq, Error)]
pub enum TableError {
    #[error("Unknown conntrack state: {0}")]
    UnknownState(String),
}
