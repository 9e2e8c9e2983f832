//! The canned predictions response used for interface work without
//! network access.

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::{
    feed::FeedTransport,
    model::{Agency, Alert, AlertPriority, Direction, Prediction, PredictionEntry, Route},
};

pub(crate) fn predictions(
    transport: Arc<dyn FeedTransport>,
) -> (Vec<PredictionEntry>, Vec<Alert>) {
    let agency = Agency::new(
        "sf-muni".to_owned(),
        "San Francisco Municipal Railway".to_owned(),
        Some("SF Muni".to_owned()),
        "California-Northern".to_owned(),
        transport,
    );
    let route = Route::with_agency(&agency, "N".to_owned(), "N-Judah".to_owned(), None);
    let prediction = Prediction {
        route,
        predicted_time: Utc::now() + Duration::seconds(120),
        departure: false,
        direction: Direction {
            name: Some("Outbound".to_owned()),
            tag: "N_O_1".to_owned(),
            title: "Outbound to Ocean Beach".to_owned(),
            active: true,
            ordered_stops: Vec::new(),
        },
        block: Some("123".to_owned()),
        trip_tag: Some("NOO".to_owned()),
        affected_by_layover: false,
        schedule_based: false,
        delayed: false,
        number_of_vehicles: 2,
    };

    let alerts = vec![
        Alert {
            text: "This is a really long alert for OB svc to POWL. The text should split over a couple of lines because this alert is so long. It is a very very long alert. It's gonna take up many many lines because of how long it is.".to_owned(),
            priority: AlertPriority::Normal,
        },
        Alert {
            text: "This is also a really long alert. The text should split over a couple of lines because this alert is so long. It is a very very long alert. It's gonna take up many many lines because of how long it is.".to_owned(),
            priority: AlertPriority::Normal,
        },
    ];

    (vec![PredictionEntry::Prediction(prediction)], alerts)
}
