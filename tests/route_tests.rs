use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use nextbus::{Agency, Error, FeedTransport, ParseError, Route};

/// Hands out canned bodies in order and records every requested URL.
struct ScriptedTransport {
    responses: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    fn new(responses: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.iter().map(|body| (*body).to_owned()).collect()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl FeedTransport for ScriptedTransport {
    fn fetch(&self, url: &str) -> Result<String, Error> {
        self.calls.lock().unwrap().push(url.to_owned());
        match self.responses.lock().unwrap().pop_front() {
            Some(body) => Ok(body),
            None => panic!("unexpected fetch of {url}"),
        }
    }
}

fn sf_muni(transport: Arc<ScriptedTransport>) -> Agency {
    Agency::new(
        "sf-muni".into(),
        "San Francisco Municipal Railway".into(),
        Some("SF Muni".into()),
        "California-Northern".into(),
        transport,
    )
}

const ROUTE_LIST: &str = r#"<body>
    <route tag="J" title="J-Church"/>
    <route tag="N" title="N-Judah" shortTitle="N"/>
</body>"#;

const ROUTE_CONFIG: &str = r#"<body>
    <route tag="N" title="N-Judah" color="003399" oppositeColor="ffffff"
           latMin="37.76" latMax="37.79" lonMin="-122.51" lonMax="-122.38">
        <stop tag="5184" title="Market St &amp; Powell St" lat="37.7844" lon="-122.40784" stopId="15184"/>
        <direction tag="N__OB1" title="Outbound to Ocean Beach" name="Outbound" useForUI="true">
            <stop tag="5184"/>
        </direction>
    </route>
</body>"#;

const ROUTE_CONFIG_RECOLORED: &str = r#"<body>
    <route tag="N" title="N-Judah" color="ff0000" oppositeColor="000000"
           latMin="37.76" latMax="37.79" lonMin="-122.51" lonMax="-122.38"/>
</body>"#;

const ROUTE_CONFIG_MISSING_COLOR: &str = r#"<body>
    <route tag="N" title="N-Judah" oppositeColor="ffffff"
           latMin="37.76" latMax="37.79" lonMin="-122.51" lonMax="-122.38"/>
</body>"#;

#[test]
fn routes_download_once_and_reuse_the_cache() {
    let transport = ScriptedTransport::new(&[ROUTE_LIST]);
    let mut agency = sf_muni(transport.clone());

    let routes = agency.routes().unwrap();
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].tag, "J");
    assert_eq!(routes[1].tag, "N");
    assert_eq!(routes[1].short_title.as_deref(), Some("N"));

    let again = agency.routes().unwrap();
    assert_eq!(again.len(), 2);
    assert_eq!(transport.calls().len(), 1);
    assert!(
        transport.calls()[0].ends_with("command=routeList&a=sf-muni"),
        "unexpected url: {}",
        transport.calls()[0]
    );
}

#[test]
fn routes_refetch_after_refresh() {
    let transport = ScriptedTransport::new(&[ROUTE_LIST, ROUTE_LIST]);
    let mut agency = sf_muni(transport.clone());

    agency.routes().unwrap();
    agency.needs_refresh = true;
    agency.routes().unwrap();

    assert_eq!(transport.calls().len(), 2);
    assert!(!agency.needs_refresh);
}

#[test]
fn details_download_once_and_reuse_the_cache() {
    let transport = ScriptedTransport::new(&[ROUTE_LIST, ROUTE_CONFIG]);
    let mut agency = sf_muni(transport.clone());

    let mut route = agency
        .routes()
        .unwrap()
        .into_iter()
        .find(|route| route.tag == "N")
        .unwrap();
    let details = route.details(false).unwrap();
    assert_eq!(details.color, "003399");
    assert_eq!(details.directions.len(), 1);
    assert_eq!(details.directions[0].ordered_stops[0].tag, "5184");

    route.details(false).unwrap();
    assert_eq!(transport.calls().len(), 2);
    assert!(
        transport.calls()[1].ends_with("command=routeConfig&a=sf-muni&r=N"),
        "unexpected url: {}",
        transport.calls()[1]
    );

    // A fresh handle from the cached route list shares the details cache.
    let mut same_route = agency
        .routes()
        .unwrap()
        .into_iter()
        .find(|route| route.tag == "N")
        .unwrap();
    let cached = same_route.details(false).unwrap();
    assert_eq!(cached.color, "003399");
    assert_eq!(transport.calls().len(), 2);
}

#[test]
fn details_refresh_overwrites_the_cache() {
    let transport = ScriptedTransport::new(&[ROUTE_CONFIG, ROUTE_CONFIG_RECOLORED]);
    let mut route = Route::new(
        "sf-muni".into(),
        "N".into(),
        "N-Judah".into(),
        None,
        transport.clone(),
    );

    assert_eq!(route.details(false).unwrap().color, "003399");
    route.needs_refresh = true;
    assert_eq!(route.details(false).unwrap().color, "ff0000");
    assert!(!route.needs_refresh);

    // The overwritten snapshot is what later calls see.
    assert_eq!(route.details(false).unwrap().color, "ff0000");
    assert_eq!(transport.calls().len(), 2);
}

#[test]
fn details_requests_inactive_directions_when_asked() {
    let transport = ScriptedTransport::new(&[ROUTE_CONFIG]);
    let mut route = Route::new(
        "sf-muni".into(),
        "N".into(),
        "N-Judah".into(),
        None,
        transport.clone(),
    );

    route.details(true).unwrap();
    assert!(
        transport.calls()[0].ends_with("command=routeConfig&a=sf-muni&r=N&verbose"),
        "unexpected url: {}",
        transport.calls()[0]
    );
}

#[test]
fn details_parse_failure_caches_nothing() {
    let transport = ScriptedTransport::new(&[ROUTE_CONFIG_MISSING_COLOR, ROUTE_CONFIG]);
    let mut route = Route::new(
        "sf-muni".into(),
        "N".into(),
        "N-Judah".into(),
        None,
        transport.clone(),
    );

    let result = route.details(false);
    assert!(matches!(
        result,
        Err(Error::Parse(ParseError::MissingAttribute {
            element: "route",
            attribute: "color",
        }))
    ));

    // No refresh requested: a second call still fetches, because the
    // failed parse must not have produced a cached value.
    assert_eq!(route.details(false).unwrap().color, "003399");
    assert_eq!(transport.calls().len(), 2);
}
