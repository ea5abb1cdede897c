//! Pelias ⇄ Photon translation.
//!
//! Both directions are pure functions of their inputs: [`request`] turns a
//! Pelias query string into a Photon URL, [`response`] turns a Photon
//! feature collection into a Pelias one.

pub mod request;
pub mod response;

pub use request::{
    Category, DEFAULT_LANG, QueryParams, RequestError, SearchRequest, gtfs_dataset, reverse_url,
    search_request, select_category,
};
pub use response::{Layer, TranslateError, translate_results};
