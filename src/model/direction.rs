use crate::model::Stop;

/// A travel direction on a route. For instance, the N-Judah has a
/// direction titled "Outbound to Ocean Beach".
#[derive(Debug, Clone)]
pub struct Direction {
    /// The canonical direction name used by the agency, e.g. "Inbound" or
    /// "Outbound". Absent on directions built from a predictions response.
    pub name: Option<String>,
    /// The direction's tag. Not for display, but uniquely identifies the
    /// direction within its route.
    pub tag: String,
    /// The direction's formal title.
    pub title: String,
    /// Whether the direction is currently active and should be shown in
    /// interfaces.
    pub active: bool,
    /// The direction's stops, in route order. Empty when the direction
    /// was built from a predictions response, which carries no stop
    /// ordering.
    pub ordered_stops: Vec<Stop>,
}
