use super::store::GraphStore;
use crate::error::GraphConversionError;

/// A trait for editor documents that can be loaded into a `GraphStore`.
///
/// This is the extension point for reading canvases saved in other formats. The
/// built-in implementation handles the canvas JSON in [`crate::ui::UiGraph`].
///
/// # Example
///
/// ```rust,no_run
/// use flowline::error::GraphConversionError;
/// use flowline::graph::{GraphStore, IntoGraph, Position};
///
/// struct Line { stations: usize }
///
/// impl IntoGraph for Line {
///     fn into_graph(self) -> Result<GraphStore, GraphConversionError> {
///         let mut store = GraphStore::new();
///         let mut previous = store.add_queue(Position::new(0.0, 0.0));
///         for i in 0..self.stations {
///             let x = (i as f64 + 1.0) * 200.0;
///             let machine = store.add_machine(Position::new(x, 0.0));
///             let next = store.add_queue(Position::new(x + 100.0, 0.0));
///             store
///                 .connect(previous.as_str(), machine.as_str())
///                 .map_err(|e| GraphConversionError::Validation(e.to_string()))?;
///             store
///                 .connect(machine.as_str(), next.as_str())
///                 .map_err(|e| GraphConversionError::Validation(e.to_string()))?;
///             previous = next;
///         }
///         Ok(store)
///     }
/// }
/// ```
pub trait IntoGraph {
    /// Consumes the document and converts it into a validated graph store.
    fn into_graph(self) -> Result<GraphStore, GraphConversionError>;
}

impl IntoGraph for GraphStore {
    fn into_graph(self) -> Result<GraphStore, GraphConversionError> {
        Ok(self)
    }
}
