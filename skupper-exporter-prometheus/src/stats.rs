//! Service-controller stats data model.

use serde::Deserialize;

/// Top-level stats document served by the service controller.
///
/// Partial payloads may omit either key; both default to empty sequences
/// so the compiler never has to deal with absence.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ControllerStats {
    #[serde(default)]
    pub sites: Vec<Site>,

    #[serde(default)]
    pub services: Vec<Service>,
}

/// A network location participating in the overlay.
///
/// `(site_name, namespace)` identifies a site within one scrape. The
/// compiler does not deduplicate; duplicate pairs produce duplicate
/// metric series, which is a consumer-side concern.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Site {
    pub site_name: String,
    pub namespace: String,
    pub version: String,
    pub site_id: String,
    pub edge: bool,
    pub gateway: bool,
    pub url: String,

    /// Outgoing peer connections. Peer identifiers are opaque; only the
    /// count is exported.
    #[serde(default)]
    pub connected: Vec<serde_json::Value>,
}

/// An exposed network endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Service {
    pub address: String,
    pub protocol: String,
}

impl ControllerStats {
    /// Decode a raw controller payload.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}
