use thiserror::Error;

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The analysis core recovers locally from expected conditions (unresolved invoke targets,
/// dangling superclass references) and never surfaces them as errors; the variants below cover
/// the remaining failure modes: structural misuse of the graph API and filesystem I/O at the
/// asset-writing boundary.
///
/// # Examples
///
/// ```rust,ignore
/// use dexscope::{Error, Result};
/// use dexscope::utils::graph::DirectedGraph;
///
/// fn connect(graph: &mut DirectedGraph<(), ()>) -> Result<()> {
///     let a = graph.add_node(());
///     let b = graph.add_node(());
///     graph.add_edge(a, b, ())?;
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A graph operation referenced a node or edge that does not exist.
    ///
    /// Returned by [`DirectedGraph`](crate::utils::graph::DirectedGraph) mutation methods when
    /// given an identifier that was not produced by the same graph instance.
    #[error("{0}")]
    GraphError(String),

    /// File I/O error.
    ///
    /// Wraps standard I/O errors raised while creating asset directories or files.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Generic error for miscellaneous failures.
    ///
    /// Used for errors that don't fit into other categories.
    #[error("{0}")]
    Error(String),
}
