use thiserror::Error;

/// Reasons a layout pass stops before producing a graph.
///
/// Empty loops, empty branches and missing chains are never errors; they lay
/// out as placeholders or as nothing at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("step '{name}' appears more than once in the flow")]
    DuplicateStep { name: String },

    #[error("step nesting exceeds the configured depth limit of {limit}")]
    DepthExceeded { limit: usize },

    #[error("layout cancelled")]
    Cancelled,
}
