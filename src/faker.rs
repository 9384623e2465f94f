//! Fake-object generator for TDEI payloads.
//!
//! Every function returns a payload that passes baseline server validation,
//! so happy-path suites are never blocked by fixture defects. Names carry a
//! short random suffix so repeated runs do not trip uniqueness constraints.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::geo::{Polygon, Position};
use crate::gtfs_flex::Service;
use crate::gtfs_pathways::Station;
use crate::organization::Organization;
use crate::project_group::ProjectGroup;
use crate::user_management::Register;

/// Password given to every generated user. Satisfies the gateway policy
/// (upper, lower, digit, symbol, ≥8 chars) and lets suites log in as seeded
/// users later.
pub const DEFAULT_PASSWORD: &str = "Tester01*";

/// Longitude range of generated polygons.
const LON_RANGE: std::ops::Range<f64> = 70.0..79.0;
/// Latitude range of generated polygons.
const LAT_RANGE: std::ops::Range<f64> = 12.0..15.0;

const FIRST_NAMES: &[&str] = &[
    "Avery", "Blake", "Casey", "Dana", "Emerson", "Finley", "Harper", "Jordan", "Kendall", "Logan",
    "Morgan", "Parker", "Quinn", "Reese", "Rowan", "Sawyer", "Skyler", "Taylor",
];
const LAST_NAMES: &[&str] = &[
    "Anderson", "Brooks", "Castillo", "Dubois", "Eriksen", "Fujita", "Garcia", "Haddad", "Ivanova",
    "Jensen", "Kowalski", "Larsen", "Moreau", "Nakamura", "Okafor", "Patel", "Rossi", "Silva",
];
const COMPANY_WORDS: &[&str] = &[
    "Summit", "Harbor", "Cascade", "Meridian", "Pioneer", "Evergreen", "Granite", "Lakeside",
    "Northwind", "Redwood", "Silverline", "Union",
];
const COMPANY_KINDS: &[&str] = &["Transit", "Mobility", "Logistics", "Shuttle", "Rail", "Transport"];
const COMPANY_SUFFIXES: &[&str] = &["LLC", "Inc", "Group", "and Sons", "Co"];
const STREETS: &[&str] = &[
    "Maple", "Oak", "Pine", "Cedar", "Elm", "Lake", "Hill", "Washington", "Park", "Main",
];
const STREET_KINDS: &[&str] = &["Street", "Avenue", "Road", "Lane", "Boulevard", "Way"];
const STATES: &[&str] = &["WA", "OR", "CA", "NY", "TX", "IL", "MA", "CO"];
const COUNTRIES: &[&str] = &["USA", "Canada", "India", "Germany", "Brazil", "Japan"];

fn pick(words: &[&'static str]) -> &'static str {
    words.choose(&mut rand::thread_rng()).copied().unwrap_or_default()
}

fn unique_suffix() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..6].to_string()
}

fn company_name() -> String {
    format!(
        "{} {} {} {}",
        pick(COMPANY_WORDS),
        pick(COMPANY_KINDS),
        pick(COMPANY_SUFFIXES),
        unique_suffix()
    )
}

fn phone() -> String {
    let mut rng = rand::thread_rng();
    format!(
        "{}-{:03}-{:04}",
        rng.gen_range(200..1000),
        rng.gen_range(0..1000),
        rng.gen_range(0..10000)
    )
}

fn url_for(name: &str) -> String {
    let slug: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    format!("https://{}.example.org", slug.trim_matches('-'))
}

fn address() -> String {
    let number = rand::thread_rng().gen_range(1..10000);
    format!(
        "{number} {} {}, {}, {}",
        pick(STREETS),
        pick(STREET_KINDS),
        pick(STATES),
        pick(COUNTRIES)
    )
}

/// Random organization payload (no id, valid polygon).
pub fn organization() -> Organization {
    let org_name = company_name();
    Organization {
        tdei_org_id: None,
        url: url_for(&org_name),
        org_name,
        phone: phone(),
        address: address(),
        polygon: Some(polygon()),
    }
}

/// Random project group payload (no id, valid polygon).
pub fn project_group() -> ProjectGroup {
    let project_group_name = company_name();
    ProjectGroup {
        tdei_project_group_id: None,
        url: url_for(&project_group_name),
        project_group_name,
        phone: phone(),
        address: address(),
        polygon: Some(polygon()),
    }
}

/// Random service owned by `owner_id`. The id is not validated here.
pub fn service(owner_id: &str) -> Service {
    Service {
        tdei_service_id: None,
        tdei_org_id: owner_id.to_string(),
        service_name: format!("{}_{}_Service", pick(FIRST_NAMES), unique_suffix()),
        polygon: Some(polygon()),
    }
}

/// Random station owned by `owner_id`. The id is not validated here.
pub fn station(owner_id: &str) -> Station {
    Station {
        tdei_station_id: None,
        tdei_org_id: owner_id.to_string(),
        station_name: format!("{}_{}_Station", pick(FIRST_NAMES), unique_suffix()),
        polygon: Some(polygon()),
    }
}

/// Random registration payload with [`DEFAULT_PASSWORD`].
pub fn user() -> Register {
    let first = pick(FIRST_NAMES);
    let last = pick(LAST_NAMES);
    Register {
        email: Some(format!(
            "{}.{}.{}@example.org",
            first.to_lowercase(),
            last.to_lowercase(),
            unique_suffix()
        )),
        password: Some(DEFAULT_PASSWORD.to_string()),
        first_name: Some(first.to_string()),
        last_name: Some(last.to_string()),
        phone: Some(phone()),
    }
}

fn coordinate(rng: &mut impl Rng) -> Position {
    vec![
        round6(rng.gen_range(LON_RANGE)),
        round6(rng.gen_range(LAT_RANGE)),
    ]
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

/// Closed ring of 5 positions: a random start, three random points, and the
/// start repeated.
pub fn polygon() -> Polygon {
    let mut rng = rand::thread_rng();
    let first = coordinate(&mut rng);
    let mut ring = Vec::with_capacity(5);
    ring.push(first.clone());
    for _ in 0..3 {
        ring.push(coordinate(&mut rng));
    }
    ring.push(first);
    Polygon::from_ring(ring)
}

/// Polygon the server must reject: an open ring of three points.
pub fn invalid_polygon() -> Polygon {
    let mut rng = rand::thread_rng();
    let ring = (0..3).map(|_| coordinate(&mut rng)).collect();
    Polygon::from_ring(ring)
}
