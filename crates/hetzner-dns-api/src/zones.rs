//! Zone operations
//!
//! A zone is a DNS domain under management, with its own nameserver set and
//! default TTL. The zone name is immutable; renaming requires replacing the
//! zone.

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::{read_json, Client};
use crate::errors::Error;

/// A DNS zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub ns: Vec<String>,
    pub ttl: u64,
}

/// Parameters for creating a new zone.
#[derive(Debug, Clone, Serialize)]
pub struct CreateZoneOpts {
    pub name: String,
    pub ttl: u64,
}

#[derive(Debug, Deserialize)]
struct ZoneResponse {
    zone: Zone,
}

#[derive(Debug, Deserialize)]
struct ZonesResponse {
    #[serde(default)]
    zones: Vec<Zone>,
}

impl Client {
    /// Lists all zones of the account.
    pub async fn get_zones(&self) -> Result<Vec<Zone>, Error> {
        let response = self.get("/api/v1/zones").await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                // Undocumented API behavior: 404 when the account has no zones.
                debug!("API returned 404 for the zone list, treating as empty");
                Ok(Vec::new())
            }
            StatusCode::OK => {
                let body: ZonesResponse = read_json(response).await?;
                Ok(body.zones)
            }
            status => Err(Error::UnhandledStatus(status.as_u16())),
        }
    }

    /// Reads a single zone. Returns `Ok(None)` if no zone with the given ID
    /// exists.
    pub async fn get_zone(&self, id: &str) -> Result<Option<Zone>, Error> {
        let response = self.get(&format!("/api/v1/zones/{id}")).await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            StatusCode::OK => {
                let body: ZoneResponse = read_json(response).await?;
                Ok(Some(body.zone))
            }
            status => Err(Error::UnhandledStatus(status.as_u16())),
        }
    }

    /// Looks a zone up by its exact name. Returns `Ok(None)` when no zone
    /// matches and [`Error::AmbiguousZoneName`] when more than one does.
    pub async fn get_zone_by_name(&self, name: &str) -> Result<Option<Zone>, Error> {
        let response = self
            .get(&format!("/api/v1/zones?name={}", urlencoding::encode(name)))
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            StatusCode::OK => {
                let body: ZonesResponse = read_json(response).await?;

                let mut matches: Vec<Zone> =
                    body.zones.into_iter().filter(|zone| zone.name == name).collect();

                match matches.len() {
                    0 => Ok(None),
                    1 => Ok(Some(matches.remove(0))),
                    _ => Err(Error::AmbiguousZoneName(name.to_string())),
                }
            }
            status => Err(Error::UnhandledStatus(status.as_u16())),
        }
    }

    /// Creates a new zone. The name is validated locally before any request
    /// is sent.
    pub async fn create_zone(&self, opts: CreateZoneOpts) -> Result<Zone, Error> {
        if !opts.name.contains('.') {
            return Err(Error::InvalidDomainName(opts.name));
        }

        let response = self.request(Method::POST, "/api/v1/zones", Some(&opts)).await?;

        match response.status() {
            StatusCode::OK => {
                let body: ZoneResponse = read_json(response).await?;
                Ok(body.zone)
            }
            status => Err(Error::UnhandledStatus(status.as_u16())),
        }
    }

    /// Replaces a zone with the passed state (full-replace, not a patch).
    pub async fn update_zone(&self, zone: &Zone) -> Result<Zone, Error> {
        let response = self
            .request(Method::PUT, &format!("/api/v1/zones/{}", zone.id), Some(zone))
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body: ZoneResponse = read_json(response).await?;
                Ok(body.zone)
            }
            status => Err(Error::UnhandledStatus(status.as_u16())),
        }
    }

    /// Deletes a zone and all of its records.
    pub async fn delete_zone(&self, id: &str) -> Result<(), Error> {
        let response = self
            .request::<()>(Method::DELETE, &format!("/api/v1/zones/{id}"), None)
            .await?;

        match response.status() {
            StatusCode::OK => Ok(()),
            status => Err(Error::UnhandledStatus(status.as_u16())),
        }
    }
}
