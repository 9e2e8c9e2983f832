use serde::{Deserialize, Serialize};

/// A service alert. Typically displayed alongside predictions for a stop.
///
/// Alerts are values keyed by `(text, priority)`: collecting them into a
/// set collapses duplicates that agencies attach to several routes at
/// once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Alert {
    /// The text of the alert.
    pub text: String,
    /// The alert's priority. Only used by certain agencies.
    pub priority: AlertPriority,
}

/// An alert's priority. Low, normal, or high.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AlertPriority {
    Low,
    #[default]
    Normal,
    High,
}

impl AlertPriority {
    /// The priority for a feed priority string. Anything other than the
    /// two recognized markers, including absence, maps to `Normal`.
    pub fn from_feed(priority: Option<&str>) -> Self {
        match priority {
            Some("Low") => Self::Low,
            Some("High") => Self::High,
            _ => Self::Normal,
        }
    }
}
