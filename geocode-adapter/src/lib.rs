//! Pelias-compatible geocoding adapter.
//!
//! Answers Pelias `/v1/search` and `/v1/reverse` requests by translating
//! them into Photon queries and reshaping Photon's results.

pub mod config;
pub mod photon;
pub mod translate;
pub mod web;
