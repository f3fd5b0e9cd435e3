use crate::ids::ViewSessionId;

/// The virtualized list that renders a full view's rows.
///
/// It pulls row text through the view's render callback and reports visible
/// range changes back; this port is the push direction.
pub trait VirtualListPort: Send + Sync {
    /// Publish the row count, with the overscan the list should render.
    fn set_total_count(&self, session: &ViewSessionId, total: usize, overscan: usize);

    /// New lines landed in the cache; rows should re-render.
    fn lines_changed(&self, session: &ViewSessionId, version: u64);

    /// The session was closed; forget everything kept for it.
    fn released(&self, session: &ViewSessionId);
}
