//! Pelias query parameters to Photon URLs.
//!
//! Search requests pick exactly one tag filter from an ordered rule table
//! (first match wins), then append the optional bounding box and focus
//! point. Reverse requests only carry the point and language.
//!
//! Every forwarded value is percent-encoded but otherwise untouched.
//! Photon decides whether coordinates are valid.

use std::collections::HashMap;

/// Decoded query string of an inbound request.
pub type QueryParams = HashMap<String, String>;

/// Language used when the caller does not ask for one.
pub const DEFAULT_LANG: &str = "en";

const VEHICLE_SHARING_FILTER: &str = "&osm_tag=amenity:car_sharing&osm_tag=amenity:bike_rental";

const TRANSIT_STOP_FILTER: &str = "&osm_tag=:bus_stop&osm_tag=:tram_stop&osm_tag=railway:station";

const GENERAL_FILTER: &str = concat!(
    "&osm_tag=!amenity:car_sharing&osm_tag=!amenity:bike_rental&osm_tag=!boundary",
    "&osm_tag=!railway:station&osm_tag=:!bus_stop&osm_tag=:!tram_stop",
    "&osm_tag=:!platform&osm_tag=!stop_position",
);

/// Errors caused by the caller's parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// Reverse geocoding without both coordinates
    #[error("point.lat and point.lon are required")]
    MissingPoint,

    /// Search without any text
    #[error("text is required")]
    MissingText,
}

/// Entity category a search is narrowed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    /// Bike rental and car sharing stations.
    VehicleSharing,
    /// Bus stops, tram stops and railway stations, optionally tagged with
    /// the GTFS dataset the caller asked for.
    TransitStops { dataset: String },
    /// Everything except sharing stations, boundaries and transit stops.
    General,
}

impl Category {
    /// Photon `osm_tag` filter for this category.
    pub fn filter_clause(&self) -> &'static str {
        match self {
            Category::VehicleSharing => VEHICLE_SHARING_FILTER,
            Category::TransitStops { .. } => TRANSIT_STOP_FILTER,
            Category::General => GENERAL_FILTER,
        }
    }

    /// GTFS dataset tag, if this is a transit stop search.
    pub fn dataset(&self) -> Option<&str> {
        match self {
            Category::TransitStops { dataset } => Some(dataset.as_str()),
            _ => None,
        }
    }
}

/// A rule inspects the parameters and claims the request, or passes.
type FilterRule = fn(&QueryParams) -> Option<Category>;

/// Filter rules in precedence order.
const FILTER_RULES: &[FilterRule] = &[vehicle_sharing_rule, transit_stop_rule, general_rule];

fn vehicle_sharing_rule(params: &QueryParams) -> Option<Category> {
    // Callers only know "bikestation"; widen it to every sharing station.
    param(params, "layers")
        .filter(|layers| layers.contains("bikestation"))
        .map(|_| Category::VehicleSharing)
}

fn transit_stop_rule(params: &QueryParams) -> Option<Category> {
    let sources = param(params, "sources")?;
    if sources.contains(',') {
        return None;
    }
    gtfs_dataset(sources).map(|dataset| Category::TransitStops { dataset })
}

fn general_rule(_params: &QueryParams) -> Option<Category> {
    Some(Category::General)
}

/// Extract the dataset tag from a `gtfs<tag>` source name.
///
/// The tag is the run of word characters (`[A-Za-z0-9_]`) right after the
/// prefix, so `gtfsHSL` yields `HSL` and a bare `gtfs` yields the empty tag.
pub fn gtfs_dataset(source: &str) -> Option<String> {
    let rest = source.strip_prefix("gtfs")?;
    Some(
        rest.chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect(),
    )
}

/// Pick the filter category for a search request.
pub fn select_category(params: &QueryParams) -> Category {
    FILTER_RULES
        .iter()
        .find_map(|rule| rule(params))
        .unwrap_or(Category::General)
}

/// A value counts as provided only when present and non-empty.
fn param<'a>(params: &'a QueryParams, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}

/// Provided value, percent-encoded for use inside a query string.
fn encoded_param(params: &QueryParams, key: &str) -> Option<String> {
    param(params, key).map(|value| urlencoding::encode(value).into_owned())
}

fn lang(params: &QueryParams) -> String {
    encoded_param(params, "lang").unwrap_or_else(|| DEFAULT_LANG.to_string())
}

/// `&bbox=min_lon,min_lat,max_lon,max_lat` when all four corners are given.
fn bbox_clause(params: &QueryParams) -> Option<String> {
    let min_lat = encoded_param(params, "boundary.rect.min_lat")?;
    let max_lat = encoded_param(params, "boundary.rect.max_lat")?;
    let min_lon = encoded_param(params, "boundary.rect.min_lon")?;
    let max_lon = encoded_param(params, "boundary.rect.max_lon")?;
    Some(format!("&bbox={min_lon},{min_lat},{max_lon},{max_lat}"))
}

/// `&lon=..&lat=..` when both focus coordinates are given.
fn focus_clause(params: &QueryParams) -> Option<String> {
    let lat = encoded_param(params, "focus.point.lat")?;
    let lon = encoded_param(params, "focus.point.lon")?;
    Some(format!("&lon={lon}&lat={lat}"))
}

/// A translated search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Complete Photon URL.
    pub url: String,
    /// GTFS dataset tag for the response translator.
    pub dataset: Option<String>,
}

/// Translate a Pelias `/v1/search` request into a Photon URL.
pub fn search_request(base_url: &str, params: &QueryParams) -> Result<SearchRequest, RequestError> {
    let text = params.get("text").ok_or(RequestError::MissingText)?;
    let category = select_category(params);

    let mut url = format!(
        "{base_url}/api/?q={}&lang={}",
        urlencoding::encode(text),
        lang(params)
    );
    if let Some(bbox) = bbox_clause(params) {
        url.push_str(&bbox);
    }
    if let Some(focus) = focus_clause(params) {
        url.push_str(&focus);
    }
    url.push_str(category.filter_clause());

    Ok(SearchRequest {
        url,
        dataset: category.dataset().map(str::to_string),
    })
}

/// Translate a Pelias `/v1/reverse` request into a Photon URL.
pub fn reverse_url(base_url: &str, params: &QueryParams) -> Result<String, RequestError> {
    let (Some(lat), Some(lon)) = (
        encoded_param(params, "point.lat"),
        encoded_param(params, "point.lon"),
    ) else {
        return Err(RequestError::MissingPoint);
    };
    Ok(format!(
        "{base_url}/reverse?lon={lon}&lat={lat}&lang={}",
        lang(params)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://photon";

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn plain_search() {
        let req = search_request(BASE, &params(&[("text", "Hauptbahnhof")])).unwrap();

        assert_eq!(
            req.url,
            format!("http://photon/api/?q=Hauptbahnhof&lang=en{GENERAL_FILTER}")
        );
        assert_eq!(req.dataset, None);
    }

    #[test]
    fn text_is_percent_encoded() {
        let req = search_request(BASE, &params(&[("text", "Marktplatz 1&2")])).unwrap();
        assert!(req.url.starts_with("http://photon/api/?q=Marktplatz%201%262&lang=en"));
    }

    #[test]
    fn missing_text_is_rejected() {
        let err = search_request(BASE, &params(&[("lang", "de")])).unwrap_err();
        assert_eq!(err, RequestError::MissingText);
        assert_eq!(err.to_string(), "text is required");
    }

    #[test]
    fn empty_text_is_forwarded() {
        let req = search_request(BASE, &params(&[("text", "")])).unwrap();
        assert!(req.url.starts_with("http://photon/api/?q=&lang=en&"));
    }

    #[test]
    fn lang_is_passed_through() {
        let req = search_request(BASE, &params(&[("text", "x"), ("lang", "de")])).unwrap();
        assert!(req.url.contains("&lang=de&"));
    }

    #[test]
    fn empty_lang_defaults() {
        let req = search_request(BASE, &params(&[("text", "x"), ("lang", "")])).unwrap();
        assert!(req.url.contains("&lang=en&"));
    }

    #[test]
    fn bikestation_layer_selects_vehicle_sharing() {
        let p = params(&[
            ("text", "x"),
            ("layers", "stop,bikestation"),
            ("sources", "gtfsHSL"),
        ]);
        let req = search_request(BASE, &p).unwrap();

        assert!(req.url.ends_with(VEHICLE_SHARING_FILTER));
        assert_eq!(req.dataset, None);
    }

    #[test]
    fn single_gtfs_source_selects_transit_stops() {
        let req = search_request(BASE, &params(&[("text", "x"), ("sources", "gtfsHSL")])).unwrap();

        assert!(req.url.ends_with(TRANSIT_STOP_FILTER));
        assert_eq!(req.dataset.as_deref(), Some("HSL"));
    }

    #[test]
    fn bare_gtfs_source_has_empty_dataset() {
        let req = search_request(BASE, &params(&[("text", "x"), ("sources", "gtfs")])).unwrap();

        assert!(req.url.ends_with(TRANSIT_STOP_FILTER));
        assert_eq!(req.dataset.as_deref(), Some(""));
    }

    #[test]
    fn multiple_sources_fall_back_to_general() {
        let req = search_request(
            BASE,
            &params(&[("text", "x"), ("sources", "gtfsHSL,osm")]),
        )
        .unwrap();

        assert!(req.url.ends_with(GENERAL_FILTER));
        assert_eq!(req.dataset, None);
    }

    #[test]
    fn non_gtfs_source_falls_back_to_general() {
        let req = search_request(BASE, &params(&[("text", "x"), ("sources", "osm")])).unwrap();
        assert!(req.url.ends_with(GENERAL_FILTER));
    }

    #[test]
    fn dataset_stops_at_non_word_character() {
        assert_eq!(gtfs_dataset("gtfsHSL-2024").as_deref(), Some("HSL"));
        assert_eq!(gtfs_dataset("gtfs_de_bw").as_deref(), Some("_de_bw"));
        assert_eq!(gtfs_dataset("osm"), None);
    }

    #[test]
    fn bbox_is_longitude_first() {
        let p = params(&[
            ("text", "x"),
            ("boundary.rect.min_lat", "1"),
            ("boundary.rect.max_lat", "2"),
            ("boundary.rect.min_lon", "3"),
            ("boundary.rect.max_lon", "4"),
        ]);
        let req = search_request(BASE, &p).unwrap();
        assert!(req.url.contains("&bbox=3,1,4,2&"));
    }

    #[test]
    fn partial_bbox_is_dropped() {
        let p = params(&[
            ("text", "x"),
            ("boundary.rect.min_lat", "1"),
            ("boundary.rect.max_lat", "2"),
            ("boundary.rect.min_lon", "3"),
        ]);
        let req = search_request(BASE, &p).unwrap();
        assert!(!req.url.contains("bbox"));
    }

    #[test]
    fn half_focus_point_is_dropped() {
        let req = search_request(BASE, &params(&[("text", "x"), ("focus.point.lat", "10")])).unwrap();
        assert!(!req.url.contains("&lat="));
        assert!(!req.url.contains("&lon="));

        let req = search_request(BASE, &params(&[("text", "x"), ("focus.point.lon", "20")])).unwrap();
        assert!(!req.url.contains("&lon="));
        assert_eq!(req.url, format!("http://photon/api/?q=x&lang=en{GENERAL_FILTER}"));
    }

    #[test]
    fn forwarded_values_cannot_alter_filter() {
        for lang in ["en#", "en&osm_tag=x"] {
            let p = params(&[("text", "x"), ("lang", lang), ("layers", "bikestation")]);
            let req = search_request(BASE, &p).unwrap();

            assert!(!req.url.contains('#'));
            assert!(req.url.ends_with(VEHICLE_SHARING_FILTER));
            assert_eq!(req.url.matches("osm_tag=").count(), 2);
        }

        let p = params(&[
            ("text", "x"),
            ("boundary.rect.min_lat", "1&osm_tag=y"),
            ("boundary.rect.max_lat", "2"),
            ("boundary.rect.min_lon", "3#"),
            ("boundary.rect.max_lon", "4"),
            ("focus.point.lat", "10&x=1"),
            ("focus.point.lon", "20"),
        ]);
        let req = search_request(BASE, &p).unwrap();
        assert!(req.url.contains("&bbox=3%23,1%26osm_tag%3Dy,4,2&lon=20&lat=10%26x%3D1&"));
        assert!(req.url.ends_with(GENERAL_FILTER));
    }

    #[test]
    fn reverse_values_are_encoded() {
        let url = reverse_url(
            BASE,
            &params(&[("point.lat", "1#"), ("point.lon", "-2.5"), ("lang", "de&q=x")]),
        )
        .unwrap();
        assert_eq!(url, "http://photon/reverse?lon=-2.5&lat=1%23&lang=de%26q%3Dx");
    }

    #[test]
    fn focus_is_longitude_first() {
        let p = params(&[
            ("text", "x"),
            ("focus.point.lat", "10"),
            ("focus.point.lon", "20"),
        ]);
        let req = search_request(BASE, &p).unwrap();
        assert!(req.url.contains("&lon=20&lat=10&"));
    }

    #[test]
    fn clause_order_is_bbox_focus_filter() {
        let p = params(&[
            ("text", "x"),
            ("lang", "fi"),
            ("boundary.rect.min_lat", "1"),
            ("boundary.rect.max_lat", "2"),
            ("boundary.rect.min_lon", "3"),
            ("boundary.rect.max_lon", "4"),
            ("focus.point.lat", "10"),
            ("focus.point.lon", "20"),
            ("layers", "bikestation"),
        ]);
        let req = search_request(BASE, &p).unwrap();

        assert_eq!(
            req.url,
            format!("http://photon/api/?q=x&lang=fi&bbox=3,1,4,2&lon=20&lat=10{VEHICLE_SHARING_FILTER}")
        );
    }

    #[test]
    fn malformed_coordinates_are_forwarded() {
        let p = params(&[
            ("text", "x"),
            ("focus.point.lat", "north"),
            ("focus.point.lon", "999"),
        ]);
        let req = search_request(BASE, &p).unwrap();
        assert!(req.url.contains("&lon=999&lat=north"));
    }

    #[test]
    fn reverse_url_layout() {
        let url = reverse_url(
            BASE,
            &params(&[("point.lat", "60.17"), ("point.lon", "24.94")]),
        )
        .unwrap();
        assert_eq!(url, "http://photon/reverse?lon=24.94&lat=60.17&lang=en");
    }

    #[test]
    fn reverse_ignores_search_parameters() {
        let url = reverse_url(
            BASE,
            &params(&[
                ("point.lat", "1"),
                ("point.lon", "2"),
                ("lang", "sv"),
                ("layers", "bikestation"),
                ("text", "ignored"),
            ]),
        )
        .unwrap();
        assert_eq!(url, "http://photon/reverse?lon=2&lat=1&lang=sv");
    }

    #[test]
    fn reverse_requires_both_coordinates() {
        let err = reverse_url(BASE, &params(&[("point.lat", "1")])).unwrap_err();
        assert_eq!(err.to_string(), "point.lat and point.lon are required");

        let err = reverse_url(BASE, &params(&[("point.lon", "1")])).unwrap_err();
        assert_eq!(err, RequestError::MissingPoint);

        let err = reverse_url(BASE, &params(&[("point.lat", ""), ("point.lon", "1")])).unwrap_err();
        assert_eq!(err, RequestError::MissingPoint);
    }
}
