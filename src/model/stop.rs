use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::{Arc, Weak},
};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    feed::{Error, FeedTransport, parse, request},
    model::{Agency, Alert, PredictionEntry, Route, agency::AgencyInner, mock},
};

/// A geographic point, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Options for a predictions request.
#[derive(Debug, Clone, Copy, Default)]
pub struct PredictionOptions {
    /// Skip the network entirely and return a fixed canned response.
    /// Intended for interface work without network access.
    pub mocked_data: bool,
    /// Log the full request URL before the call.
    pub print_network_calls: bool,
}

/// A physical boarding location, identified by tag within an agency.
///
/// Identity is the `(agency tag, stop tag)` pair; equality and hashing
/// ignore titles and coordinates, so two views of the same stop compare
/// equal even when one carries less detail.
#[derive(Clone)]
pub struct Stop {
    /// A unique alphanumeric identifier for the stop.
    pub tag: String,
    /// The stop's title, e.g. `Fifth St. & Market St.`.
    pub title: String,
    /// A short title for constrained interfaces, e.g. `5th & Market`.
    pub short_title: Option<String>,
    /// The stop's location.
    pub location: Location,
    /// A numeric identifier for the stop. *Not unique*: some agencies
    /// share one stop id across multiple inbound/outbound stops.
    pub stop_id: Option<String>,
    pub(crate) agency_tag: String,
    pub(crate) agency: Weak<AgencyInner>,
    pub(crate) transport: Arc<dyn FeedTransport>,
}

impl Stop {
    /// Initializes a stop without an agency behind it. Predictions still
    /// work, but nothing is reconciled against an agency's caches.
    pub fn new(
        agency_tag: String,
        tag: String,
        title: String,
        short_title: Option<String>,
        location: Location,
        stop_id: Option<String>,
        transport: Arc<dyn FeedTransport>,
    ) -> Self {
        Self::from_parts(
            agency_tag,
            tag,
            title,
            short_title,
            location,
            stop_id,
            Weak::new(),
            transport,
        )
    }

    /// Initializes a stop bound to an agency, so predictions can resolve
    /// routes and directions through the agency's caches.
    pub fn with_agency(
        agency: &Agency,
        tag: String,
        title: String,
        short_title: Option<String>,
        location: Location,
        stop_id: Option<String>,
    ) -> Self {
        Self::from_parts(
            agency.tag.clone(),
            tag,
            title,
            short_title,
            location,
            stop_id,
            Arc::downgrade(&agency.inner),
            agency.inner.transport.clone(),
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        agency_tag: String,
        tag: String,
        title: String,
        short_title: Option<String>,
        location: Location,
        stop_id: Option<String>,
        agency: Weak<AgencyInner>,
        transport: Arc<dyn FeedTransport>,
    ) -> Self {
        Self {
            tag,
            title,
            short_title,
            location,
            stop_id,
            agency_tag,
            agency,
            transport,
        }
    }

    /// The tag of the agency this stop belongs to.
    pub fn agency_tag(&self) -> &str {
        &self.agency_tag
    }

    /// Predictions for the stop, paired with any service alerts attached
    /// to the response.
    ///
    /// `routes` limits the query to the given routes before the API call
    /// is made. A stop initialized without a `stop_id` can only be queried
    /// through route filters, so `routes` must be non-empty for such
    /// stops; otherwise the call fails with [`Error::Request`] before any
    /// network access.
    pub fn predictions(
        &self,
        routes: &[Route],
        options: PredictionOptions,
    ) -> Result<(Vec<PredictionEntry>, Vec<Alert>), Error> {
        if options.mocked_data {
            return Ok(mock::predictions(self.transport.clone()));
        }

        let route_tags: Vec<&str> = routes.iter().map(|route| route.tag.as_str()).collect();
        let request = request::predictions_request(
            &self.agency_tag,
            &self.tag,
            self.stop_id.as_deref(),
            route_tags,
        )?;
        let url = request.url();
        if options.print_network_calls {
            info!(%url, "calling feed api");
        }

        let body = self.transport.fetch(&url)?;
        let document = parse::document(&body)?;
        parse::predictions(&document, self)
    }
}

impl PartialEq for Stop {
    fn eq(&self, other: &Self) -> bool {
        self.agency_tag == other.agency_tag && self.tag == other.tag
    }
}

impl Eq for Stop {}

impl Hash for Stop {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.agency_tag.hash(state);
        self.tag.hash(state);
    }
}

impl fmt::Debug for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stop")
            .field("tag", &self.tag)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}
