use chrono::{DateTime, Utc};

use crate::model::{Direction, Route};

/// One entry of a predictions response: either a prediction, or a marker
/// that a route matched the query without any predicted arrivals.
#[derive(Debug, Clone)]
pub enum PredictionEntry {
    Prediction(Prediction),
    NoPrediction(NoPrediction),
}

impl PredictionEntry {
    /// The route this entry belongs to.
    pub fn route(&self) -> &Route {
        match self {
            Self::Prediction(prediction) => &prediction.route,
            Self::NoPrediction(no_prediction) => &no_prediction.route,
        }
    }
}

/// An estimate for when a vehicle will arrive at a stop.
#[derive(Debug, Clone)]
pub struct Prediction {
    /// The route associated with the prediction. Resolved against the
    /// agency's route cache when one is available, so every prediction for
    /// one route tag in a response shares a single route identity.
    pub route: Route,
    /// The predicted time.
    pub predicted_time: DateTime<Utc>,
    /// Whether the time given refers to when the vehicle will *depart*.
    pub departure: bool,
    /// The direction for the prediction.
    pub direction: Direction,
    /// The block number associated with the prediction. Given as a string.
    pub block: Option<String>,
    /// The trip tag. An identifier for a particular trip within a block
    /// assignment.
    pub trip_tag: Option<String>,
    /// Whether the prediction involves a layover (the vehicle has not left
    /// its departing terminal yet). If true, the prediction is less
    /// accurate.
    pub affected_by_layover: bool,
    /// Whether the prediction is purely based on the route schedule and
    /// doesn't take GPS data into account. Only used by certain agencies.
    /// If true, the prediction is less accurate.
    pub schedule_based: bool,
    /// Whether the vehicle is delayed because of traffic. Only used by
    /// certain agencies.
    pub delayed: bool,
    /// How many vehicles run as one consist for this prediction. At
    /// least 1.
    pub number_of_vehicles: u32,
}

/// A route that matched the query but has no current prediction.
#[derive(Debug, Clone)]
pub struct NoPrediction {
    /// The route.
    pub route: Route,
    /// The title of the direction. Not a full direction, because the feed
    /// does not supply enough detail in this response shape.
    pub direction_title: String,
}
