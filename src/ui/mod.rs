/// UI layer: panel widgets, the histogram, and the results table.
///
/// Every widget mutates [`AppState`](crate::state::AppState) and the
/// pipeline is re-run synchronously after each interaction; nothing in
/// this module touches the prepared dataset directly.

pub mod chart;
pub mod panels;
pub mod table;
