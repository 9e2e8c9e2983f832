//! Typed parsers from feed documents into domain values.
//!
//! A missing required element or attribute fails the whole parse; the one
//! deliberate skip is a direction's reference to a stop absent from the
//! same response.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use chrono::DateTime;
use roxmltree::{Document, Node};

use super::{DownloadError, Error, FeedTransport, ParseError};
use crate::model::{
    Agency, Alert, AlertPriority, Direction, Location, NoPrediction, Prediction, PredictionEntry,
    Route, RouteArea, RouteDetails, Stop,
};

/// Parses a fetched body into a document. A body that is not well-formed
/// markup counts as a download failure, not a parse failure.
pub(crate) fn document(body: &str) -> Result<Document<'_>, Error> {
    Document::parse(body).map_err(|error| DownloadError::Document(error).into())
}

/// Every agency served by the feed, in document order.
pub(crate) fn agency_list(
    document: &Document<'_>,
    transport: &Arc<dyn FeedTransport>,
) -> Result<Vec<Agency>, Error> {
    let body = body_element(document)?;
    let mut agencies = Vec::new();
    for node in children(body, "agency") {
        let tag = require(node, "agency", "tag")?;
        let title = require(node, "agency", "title")?;
        let region_title = require(node, "agency", "regionTitle")?;
        agencies.push(Agency::new(
            tag.to_owned(),
            title.to_owned(),
            node.attribute("shortTitle").map(str::to_owned),
            region_title.to_owned(),
            transport.clone(),
        ));
    }
    Ok(agencies)
}

/// The agency's routes, in document order, reconciled against the route
/// cache: a tag seen before keeps its cached identity (and with it the
/// shared details cache), with only the titles refreshed.
pub(crate) fn route_list(document: &Document<'_>, agency: &Agency) -> Result<Vec<Route>, Error> {
    let body = body_element(document)?;
    let mut routes = Vec::new();
    let mut caches = agency.inner.lock();
    for node in children(body, "route") {
        let tag = require(node, "route", "tag")?;
        let title = require(node, "route", "title")?;
        let short_title = node.attribute("shortTitle").map(str::to_owned);

        let route = match caches.routes.get(tag) {
            Some(known) => {
                let mut route = known.clone();
                route.title = title.to_owned();
                route.short_title = short_title;
                route
            }
            None => Route::with_agency(agency, tag.to_owned(), title.to_owned(), short_title),
        };
        caches.routes.insert(tag.to_owned(), route.clone());
        routes.push(route);
    }
    Ok(routes)
}

/// The details of a single route: color, bounds, and directions with their
/// ordered stops. Parsed stops and directions overwrite the agency's
/// caches when the route is bound to one.
pub(crate) fn route_config(document: &Document<'_>, route: &Route) -> Result<RouteDetails, Error> {
    let body = body_element(document)?;
    let node = children(body, "route")
        .next()
        .ok_or(ParseError::MissingElement("route"))?;

    let color = require(node, "route", "color")?;
    let opposite_color = require(node, "route", "oppositeColor")?;
    let bounds = RouteArea {
        lat_min: require_f64(node, "route", "latMin")?,
        lat_max: require_f64(node, "route", "latMax")?,
        lon_min: require_f64(node, "route", "lonMin")?,
        lon_max: require_f64(node, "route", "lonMax")?,
    };

    let agency = route.agency.upgrade();
    let mut caches = agency.as_ref().map(|inner| inner.lock());

    // Stops parsed from this response, keyed by tag, so directions can
    // resolve their ordered stop references.
    let mut stops = HashMap::new();
    for stop_node in children(node, "stop") {
        let tag = require(stop_node, "stop", "tag")?;
        let title = require(stop_node, "stop", "title")?;
        let stop_id = require(stop_node, "stop", "stopId")?;
        let location = Location {
            latitude: require_f64(stop_node, "stop", "lat")?,
            longitude: require_f64(stop_node, "stop", "lon")?,
        };
        let stop = Stop::from_parts(
            route.agency_tag.clone(),
            tag.to_owned(),
            title.to_owned(),
            stop_node.attribute("shortTitle").map(str::to_owned),
            location,
            Some(stop_id.to_owned()),
            route.agency.clone(),
            route.transport.clone(),
        );
        if let Some(caches) = caches.as_mut() {
            caches.stops.insert(tag.to_owned(), stop.clone());
        }
        stops.insert(tag.to_owned(), stop);
    }

    let mut directions = Vec::new();
    for direction_node in children(node, "direction") {
        let tag = require(direction_node, "direction", "tag")?;
        let name = require(direction_node, "direction", "name")?;
        let title = require(direction_node, "direction", "title")?;
        let active = require(direction_node, "direction", "useForUI")? == "true";

        // References to stops missing from this response are dropped, not
        // an error.
        let ordered_stops = children(direction_node, "stop")
            .filter_map(|reference| reference.attribute("tag"))
            .filter_map(|tag| stops.get(tag).cloned())
            .collect();

        let direction = Direction {
            name: Some(name.to_owned()),
            tag: tag.to_owned(),
            title: title.to_owned(),
            active,
            ordered_stops,
        };
        if let Some(caches) = caches.as_mut() {
            caches.directions.insert(tag.to_owned(), direction.clone());
        }
        directions.push(direction);
    }

    Ok(RouteDetails {
        color: color.to_owned(),
        opposite_color: opposite_color.to_owned(),
        bounds,
        directions,
    })
}

/// Predictions and no-prediction markers for a stop, in document order,
/// paired with the deduplicated service alerts found in the response.
pub(crate) fn predictions(
    document: &Document<'_>,
    stop: &Stop,
) -> Result<(Vec<PredictionEntry>, Vec<Alert>), Error> {
    let body = body_element(document)?;
    let agency = stop.agency.upgrade();

    let mut entries = Vec::new();
    let mut alerts = HashSet::new();
    for node in children(body, "predictions") {
        let route_tag = require(node, "predictions", "routeTag")?;
        let route_title = require(node, "predictions", "routeTitle")?;

        // A cache hit hands back the canonical route, so every entry for
        // this tag shares one identity and one details cache.
        let route = agency
            .as_ref()
            .and_then(|inner| inner.lock().routes.get(route_tag).cloned())
            .unwrap_or_else(|| {
                Route::from_parts(
                    stop.agency_tag.clone(),
                    route_tag.to_owned(),
                    route_title.to_owned(),
                    None,
                    stop.agency.clone(),
                    stop.transport.clone(),
                )
            });

        if let Some(direction_title) = node.attribute("dirTitleBecauseNoPredictions") {
            entries.push(PredictionEntry::NoPrediction(NoPrediction {
                route: route.clone(),
                direction_title: direction_title.to_owned(),
            }));
        }

        for direction_node in nested(node, "direction") {
            let direction_title = require(direction_node, "direction", "title")?;
            for prediction_node in nested(direction_node, "prediction") {
                let epoch_millis = require_f64(prediction_node, "prediction", "epochTime")?;
                let direction_tag = require(prediction_node, "prediction", "dirTag")?;
                let predicted_time = DateTime::from_timestamp_millis(epoch_millis as i64)
                    .ok_or_else(|| ParseError::InvalidAttribute {
                        element: "prediction",
                        attribute: "epochTime",
                        value: epoch_millis.to_string(),
                    })?;

                let number_of_vehicles: u32 =
                    match prediction_node.attribute("vehiclesInConsist") {
                        Some(count) => {
                            count.parse().map_err(|_| ParseError::InvalidAttribute {
                                element: "prediction",
                                attribute: "vehiclesInConsist",
                                value: count.to_owned(),
                            })?
                        }
                        None => 1,
                    };

                let direction = agency
                    .as_ref()
                    .and_then(|inner| inner.lock().directions.get(direction_tag).cloned())
                    .unwrap_or_else(|| Direction {
                        name: None,
                        tag: direction_tag.to_owned(),
                        title: direction_title.to_owned(),
                        active: true,
                        ordered_stops: Vec::new(),
                    });

                entries.push(PredictionEntry::Prediction(Prediction {
                    route: route.clone(),
                    predicted_time,
                    departure: flag(prediction_node, "isDeparture"),
                    direction,
                    block: prediction_node.attribute("block").map(str::to_owned),
                    trip_tag: prediction_node.attribute("tripTag").map(str::to_owned),
                    affected_by_layover: flag(prediction_node, "affectedByLayover"),
                    schedule_based: flag(prediction_node, "isScheduleBased"),
                    delayed: flag(prediction_node, "delayed"),
                    number_of_vehicles,
                }));
            }
        }

        for message_node in nested(node, "message") {
            let text = require(message_node, "message", "text")?;
            alerts.insert(Alert {
                text: text.to_owned(),
                priority: AlertPriority::from_feed(message_node.attribute("priority")),
            });
        }
    }

    Ok((entries, alerts.into_iter().collect()))
}

fn body_element<'a, 'input>(document: &'a Document<'input>) -> Result<Node<'a, 'input>, ParseError> {
    let root = document.root_element();
    if root.has_tag_name("body") {
        Ok(root)
    } else {
        Err(ParseError::MissingElement("body"))
    }
}

fn children<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| child.has_tag_name(name))
}

fn nested<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.descendants()
        .filter(move |descendant| descendant.has_tag_name(name))
}

fn require<'a>(
    node: Node<'a, '_>,
    element: &'static str,
    attribute: &'static str,
) -> Result<&'a str, ParseError> {
    node.attribute(attribute)
        .ok_or(ParseError::MissingAttribute { element, attribute })
}

fn require_f64(
    node: Node<'_, '_>,
    element: &'static str,
    attribute: &'static str,
) -> Result<f64, ParseError> {
    let value = require(node, element, attribute)?;
    value.parse().map_err(|_| ParseError::InvalidAttribute {
        element,
        attribute,
        value: value.to_owned(),
    })
}

/// Boolean attributes are true iff literally `"true"`; anything else,
/// including absence, is false.
fn flag(node: Node<'_, '_>, attribute: &str) -> bool {
    node.attribute(attribute) == Some("true")
}
