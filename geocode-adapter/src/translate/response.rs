//! Photon feature collections to Pelias feature collections.
//!
//! Only feature `properties` are rewritten. Geometry, feature type and
//! every top-level key other than `features` pass through untouched.

use serde_json::{Map, Value};

/// Source name for results that come straight from OpenStreetMap.
const OSM_SOURCE: &str = "openstreetmap";

/// Photon property names and the Pelias names they are published under.
const PROPERTY_RENAMES: &[(&str, &str)] = &[
    ("name", "name"),
    ("housenumber", "housenumber"),
    ("street", "street"),
    ("postcode", "postalcode"),
    ("district", "neighbourhood"),
    ("city", "locality"),
    ("county", "county"),
    ("state", "region"),
    ("country", "country"),
    ("countrycode", "country_code"),
];

/// Errors from reshaping an upstream result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslateError {
    /// Upstream body had no `features` array
    #[error("no result from service")]
    NoFeatures,
}

/// Pelias layer a feature is published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Venue,
    Address,
    Street,
    Locality,
    Stop,
    Station,
    BikeStation,
}

impl Layer {
    /// Derive the layer from the OSM tag Photon reports.
    pub fn from_osm_tag(key: &str, value: &str, has_housenumber: bool) -> Self {
        match (key, value) {
            ("amenity", "bike_rental" | "car_sharing") => Layer::BikeStation,
            ("railway", "station" | "halt") | ("public_transport", "station") => Layer::Station,
            ("highway", "bus_stop" | "platform")
            | ("railway", "tram_stop" | "platform")
            | ("public_transport", "platform" | "stop_position") => Layer::Stop,
            _ if has_housenumber => Layer::Address,
            ("highway", _) => Layer::Street,
            ("place", "city" | "town" | "village" | "hamlet") => Layer::Locality,
            _ => Layer::Venue,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Layer::Venue => "venue",
            Layer::Address => "address",
            Layer::Street => "street",
            Layer::Locality => "locality",
            Layer::Stop => "stop",
            Layer::Station => "station",
            Layer::BikeStation => "bikestation",
        }
    }

    /// Stops and stations can belong to a GTFS dataset.
    pub fn is_transit(self) -> bool {
        matches!(self, Layer::Stop | Layer::Station)
    }
}

/// Reshape a Photon result into a Pelias result.
///
/// `dataset` is the GTFS dataset tag of a transit stop search. When set,
/// stop and station features are attributed to that dataset.
pub fn translate_results(mut upstream: Value, dataset: Option<&str>) -> Result<Value, TranslateError> {
    let features = upstream
        .get_mut("features")
        .and_then(Value::as_array_mut)
        .ok_or(TranslateError::NoFeatures)?;

    for feature in features.iter_mut() {
        translate_feature(feature, dataset);
    }

    Ok(upstream)
}

fn translate_feature(feature: &mut Value, dataset: Option<&str>) {
    let Some(feature) = feature.as_object_mut() else {
        return;
    };

    let mut properties = match feature.remove("properties") {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };

    if let Some(bbox) = properties.remove("extent").as_ref().and_then(extent_to_bbox) {
        feature.insert("bbox".to_string(), bbox);
    }

    feature.insert(
        "properties".to_string(),
        Value::Object(translate_properties(properties, dataset)),
    );
}

fn translate_properties(mut props: Map<String, Value>, dataset: Option<&str>) -> Map<String, Value> {
    let layer = Layer::from_osm_tag(
        str_prop(&props, "osm_key").unwrap_or_default(),
        str_prop(&props, "osm_value").unwrap_or_default(),
        props.contains_key("housenumber"),
    );
    let id = osm_id(&props);

    for (from, to) in PROPERTY_RENAMES {
        if let Some(value) = props.remove(*from) {
            props.insert((*to).to_string(), value);
        }
    }

    let source = match dataset {
        Some(dataset) if layer.is_transit() => {
            props.insert("gtfs_dataset".to_string(), Value::from(dataset));
            format!("gtfs{dataset}")
        }
        _ => OSM_SOURCE.to_string(),
    };

    if let Some(id) = id {
        props.insert(
            "gid".to_string(),
            Value::from(format!("{source}:{}:{id}", layer.as_str())),
        );
        props.insert("id".to_string(), Value::from(id));
    }
    if let Some(label) = label(&props) {
        props.insert("label".to_string(), Value::from(label));
    }
    props.insert("layer".to_string(), Value::from(layer.as_str()));
    props.insert("source".to_string(), Value::from(source));

    props
}

fn str_prop<'a>(props: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    props.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// `node/123` style identifier from Photon's `osm_type` and `osm_id`.
fn osm_id(props: &Map<String, Value>) -> Option<String> {
    let kind = match str_prop(props, "osm_type")? {
        "N" => "node",
        "W" => "way",
        "R" => "relation",
        _ => return None,
    };
    let id = match props.get("osm_id")? {
        Value::Number(n) => n.to_string(),
        Value::String(s) if !s.is_empty() => s.clone(),
        _ => return None,
    };
    Some(format!("{kind}/{id}"))
}

/// Human readable label from the (already renamed) Pelias properties.
fn label(props: &Map<String, Value>) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();

    let first = match (
        str_prop(props, "name"),
        str_prop(props, "street"),
        str_prop(props, "housenumber"),
    ) {
        (Some(name), _, _) => Some(name.to_string()),
        (None, Some(street), Some(number)) => Some(format!("{street} {number}")),
        (None, Some(street), None) => Some(street.to_string()),
        (None, None, _) => None,
    };
    parts.extend(first);

    if let Some(locality) = str_prop(props, "locality") {
        if !parts.iter().any(|p| p == locality) {
            parts.push(locality.to_string());
        }
    }

    (!parts.is_empty()).then(|| parts.join(", "))
}

/// Photon's `[min_lon, max_lat, max_lon, min_lat]` as a GeoJSON bbox.
fn extent_to_bbox(extent: &Value) -> Option<Value> {
    let corners = extent.as_array()?;
    if corners.len() != 4 || !corners.iter().all(Value::is_number) {
        return None;
    }
    Some(Value::Array(vec![
        corners[0].clone(),
        corners[3].clone(),
        corners[2].clone(),
        corners[1].clone(),
    ]))
}
