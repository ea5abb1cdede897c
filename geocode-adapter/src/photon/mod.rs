//! Photon geocoder client.
//!
//! The adapter builds complete Photon URLs itself (see
//! [`crate::translate`]), so the client only has to fetch them, decode the
//! JSON body and classify what went wrong.

mod client;
mod error;

pub use client::PhotonClient;
pub use error::PhotonError;
