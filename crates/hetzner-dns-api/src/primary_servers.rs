//! Primary server operations
//!
//! A primary server is the upstream source of truth for a zone running in
//! secondary DNS mode. Its lifecycle is independent from the zone's
//! records.

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use crate::client::{read_json, Client};
use crate::errors::Error;

/// A primary server assigned to a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryServer {
    pub id: String,
    pub zone_id: String,
    pub address: String,
    pub port: u16,
}

/// Parameters for creating a new primary server.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePrimaryServerOpts {
    pub zone_id: String,
    pub address: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
struct PrimaryServerResponse {
    primary_server: PrimaryServer,
}

#[derive(Debug, Deserialize)]
struct PrimaryServersResponse {
    #[serde(default)]
    primary_servers: Vec<PrimaryServer>,
}

// Port 0 is not addressable; the API accepts 1-65535.
fn check_port(port: u16) -> Result<(), Error> {
    if port == 0 {
        return Err(Error::InvalidPort(port));
    }

    Ok(())
}

impl Client {
    /// Reads a single primary server. Returns `Ok(None)` if no primary
    /// server with the given ID exists.
    pub async fn get_primary_server(&self, id: &str) -> Result<Option<PrimaryServer>, Error> {
        let response = self.get(&format!("/api/v1/primary_servers/{id}")).await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            StatusCode::OK => {
                let body: PrimaryServerResponse = read_json(response).await?;
                Ok(Some(body.primary_server))
            }
            status => Err(Error::UnhandledStatus(status.as_u16())),
        }
    }

    /// Lists all primary servers of a zone.
    pub async fn get_primary_servers(&self, zone_id: &str) -> Result<Vec<PrimaryServer>, Error> {
        let response = self
            .get(&format!("/api/v1/primary_servers?zone_id={zone_id}"))
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body: PrimaryServersResponse = read_json(response).await?;
                Ok(body.primary_servers)
            }
            status => Err(Error::UnhandledStatus(status.as_u16())),
        }
    }

    /// Assigns a new primary server to a zone.
    pub async fn create_primary_server(
        &self,
        opts: CreatePrimaryServerOpts,
    ) -> Result<PrimaryServer, Error> {
        check_port(opts.port)?;

        let response = self
            .request(Method::POST, "/api/v1/primary_servers", Some(&opts))
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body: PrimaryServerResponse = read_json(response).await?;
                Ok(body.primary_server)
            }
            status => Err(Error::UnhandledStatus(status.as_u16())),
        }
    }

    /// Replaces a primary server with the passed state.
    pub async fn update_primary_server(&self, server: &PrimaryServer) -> Result<PrimaryServer, Error> {
        check_port(server.port)?;

        let response = self
            .request(
                Method::PUT,
                &format!("/api/v1/primary_servers/{}", server.id),
                Some(server),
            )
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body: PrimaryServerResponse = read_json(response).await?;
                Ok(body.primary_server)
            }
            status => Err(Error::UnhandledStatus(status.as_u16())),
        }
    }

    /// Removes a primary server from its zone.
    pub async fn delete_primary_server(&self, id: &str) -> Result<(), Error> {
        let response = self
            .request::<()>(Method::DELETE, &format!("/api/v1/primary_servers/{id}"), None)
            .await?;

        match response.status() {
            StatusCode::OK => Ok(()),
            status => Err(Error::UnhandledStatus(status.as_u16())),
        }
    }
}
