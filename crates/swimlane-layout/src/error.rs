#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("spacing `{name}` must be a finite, non-negative number (got {value})")]
    InvalidSpacing { name: &'static str, value: f64 },

    #[error("invalid layout configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Graph(#[from] swimlane_graph::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
