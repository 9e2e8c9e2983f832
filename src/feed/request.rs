//! URL construction for the feed's commands. Pure string assembly against
//! the fixed feed root; the feed expects its parameters concatenated in
//! order, with `&r=` repeated once per route filter.

use super::Error;

/// The API root.
const API_ROOT: &str = "http://webservices.nextbus.com/service/publicXMLFeed?command=";

const AGENCY_LIST_COMMAND: &str = "agencyList";
const ROUTE_LIST_COMMAND: &str = "routeList";
const ROUTE_CONFIG_COMMAND: &str = "routeConfig";
const PREDICTIONS_COMMAND: &str = "predictions";

const AGENCY_PARAMETER: &str = "&a=";
const ROUTE_PARAMETER: &str = "&r=";
const STOP_ID_PARAMETER: &str = "&stopId=";
const STOP_TAG_PARAMETER: &str = "&s=";
const VERBOSE_PARAMETER: &str = "&verbose";

/// A single feed call, ready to be rendered as a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FeedRequest<'a> {
    AgencyList,
    RouteList {
        agency: &'a str,
    },
    RouteConfig {
        agency: &'a str,
        route: &'a str,
        verbose: bool,
    },
    PredictionsByStopId {
        agency: &'a str,
        stop_id: &'a str,
        routes: Vec<&'a str>,
    },
    PredictionsByStopTag {
        agency: &'a str,
        stop_tag: &'a str,
        routes: Vec<&'a str>,
    },
}

impl FeedRequest<'_> {
    pub(crate) fn url(&self) -> String {
        match self {
            Self::AgencyList => format!("{API_ROOT}{AGENCY_LIST_COMMAND}"),
            Self::RouteList { agency } => {
                format!("{API_ROOT}{ROUTE_LIST_COMMAND}{AGENCY_PARAMETER}{agency}")
            }
            Self::RouteConfig {
                agency,
                route,
                verbose,
            } => {
                let mut url = format!(
                    "{API_ROOT}{ROUTE_CONFIG_COMMAND}{AGENCY_PARAMETER}{agency}{ROUTE_PARAMETER}{route}"
                );
                if *verbose {
                    url.push_str(VERBOSE_PARAMETER);
                }
                url
            }
            Self::PredictionsByStopId {
                agency,
                stop_id,
                routes,
            } => {
                let mut url = format!(
                    "{API_ROOT}{PREDICTIONS_COMMAND}{AGENCY_PARAMETER}{agency}{STOP_ID_PARAMETER}{stop_id}"
                );
                append_routes(&mut url, routes);
                url
            }
            Self::PredictionsByStopTag {
                agency,
                stop_tag,
                routes,
            } => {
                let mut url = format!(
                    "{API_ROOT}{PREDICTIONS_COMMAND}{AGENCY_PARAMETER}{agency}{STOP_TAG_PARAMETER}{stop_tag}"
                );
                append_routes(&mut url, routes);
                url
            }
        }
    }
}

fn append_routes(url: &mut String, routes: &[&str]) {
    for route in routes {
        url.push_str(ROUTE_PARAMETER);
        url.push_str(route);
    }
}

/// Picks the predictions request shape for a stop. A stop without a numeric
/// id can only be disambiguated through route filters, so at least one
/// route is required in that case.
pub(crate) fn predictions_request<'a>(
    agency: &'a str,
    stop_tag: &'a str,
    stop_id: Option<&'a str>,
    routes: Vec<&'a str>,
) -> Result<FeedRequest<'a>, Error> {
    if let Some(stop_id) = stop_id {
        Ok(FeedRequest::PredictionsByStopId {
            agency,
            stop_id,
            routes,
        })
    } else if !routes.is_empty() {
        Ok(FeedRequest::PredictionsByStopTag {
            agency,
            stop_tag,
            routes,
        })
    } else {
        Err(Error::Request(
            "must specify routes for predictions if stopId isn't specified".to_owned(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agency_list_url() {
        assert_eq!(
            FeedRequest::AgencyList.url(),
            "http://webservices.nextbus.com/service/publicXMLFeed?command=agencyList"
        );
    }

    #[test]
    fn route_list_url() {
        let url = FeedRequest::RouteList { agency: "sf-muni" }.url();
        assert_eq!(
            url,
            "http://webservices.nextbus.com/service/publicXMLFeed?command=routeList&a=sf-muni"
        );
    }

    #[test]
    fn route_config_url() {
        let url = FeedRequest::RouteConfig {
            agency: "sf-muni",
            route: "N",
            verbose: false,
        }
        .url();
        assert_eq!(
            url,
            "http://webservices.nextbus.com/service/publicXMLFeed?command=routeConfig&a=sf-muni&r=N"
        );
    }

    #[test]
    fn route_config_url_verbose() {
        let url = FeedRequest::RouteConfig {
            agency: "sf-muni",
            route: "N",
            verbose: true,
        }
        .url();
        assert!(url.ends_with("&r=N&verbose"));
    }

    #[test]
    fn predictions_by_stop_id_url_repeats_route_parameter() {
        let url = FeedRequest::PredictionsByStopId {
            agency: "sf-muni",
            stop_id: "15184",
            routes: vec!["N", "J"],
        }
        .url();
        assert!(url.ends_with("command=predictions&a=sf-muni&stopId=15184&r=N&r=J"));
    }

    #[test]
    fn predictions_by_stop_tag_url() {
        let url = FeedRequest::PredictionsByStopTag {
            agency: "sf-muni",
            stop_tag: "5184",
            routes: vec!["N"],
        }
        .url();
        assert!(url.ends_with("command=predictions&a=sf-muni&s=5184&r=N"));
    }

    #[test]
    fn predictions_request_prefers_stop_id() {
        let request = predictions_request("sf-muni", "5184", Some("15184"), vec![]).unwrap();
        assert_eq!(
            request,
            FeedRequest::PredictionsByStopId {
                agency: "sf-muni",
                stop_id: "15184",
                routes: vec![],
            }
        );
    }

    #[test]
    fn predictions_request_falls_back_to_stop_tag() {
        let request = predictions_request("sf-muni", "5184", None, vec!["N"]).unwrap();
        assert_eq!(
            request,
            FeedRequest::PredictionsByStopTag {
                agency: "sf-muni",
                stop_tag: "5184",
                routes: vec!["N"],
            }
        );
    }

    #[test]
    fn predictions_request_rejects_underspecified_query() {
        let result = predictions_request("sf-muni", "5184", None, vec![]);
        assert!(matches!(result, Err(Error::Request(_))));
    }
}
