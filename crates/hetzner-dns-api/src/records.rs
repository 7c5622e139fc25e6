//! Record operations
//!
//! A record's TTL is optional: an absent TTL means "inherit the zone
//! default" and is distinct from a TTL of zero, so it is carried as
//! `Option<u64>` and never serialized when unset.
//!
//! When the TXT formatter is enabled (the default), long TXT values are
//! chunk-encoded on write and decoded back to their plain form on read, so
//! callers always see the plain value.

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use crate::client::{read_json, Client};
use crate::errors::Error;
use crate::txt::{plain_to_txt_value, txt_value_to_plain};

const TXT_TYPE: &str = "TXT";

/// A DNS record in a specific zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub zone_id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
}

impl Record {
    /// Returns true if the record has its own TTL instead of inheriting the
    /// zone default.
    pub fn has_ttl(&self) -> bool {
        self.ttl.is_some()
    }
}

/// Parameters for creating a new record.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRecordOpts {
    pub zone_id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RecordResponse {
    record: Record,
}

#[derive(Debug, Deserialize)]
struct RecordsResponse {
    #[serde(default)]
    records: Vec<Record>,
}

impl Client {
    /// Reads a single record. Returns `Ok(None)` if no record with the
    /// given ID exists.
    pub async fn get_record(&self, id: &str) -> Result<Option<Record>, Error> {
        let response = self.get(&format!("/api/v1/records/{id}")).await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            StatusCode::OK => {
                let body: RecordResponse = read_json(response).await?;
                Ok(Some(self.present_record(body.record)))
            }
            status => Err(Error::UnhandledStatus(status.as_u16())),
        }
    }

    /// Lists all records of a zone.
    pub async fn get_records(&self, zone_id: &str) -> Result<Vec<Record>, Error> {
        let response = self.get(&format!("/api/v1/records?zone_id={zone_id}")).await?;

        match response.status() {
            StatusCode::OK => {
                let body: RecordsResponse = read_json(response).await?;
                Ok(body.records.into_iter().map(|record| self.present_record(record)).collect())
            }
            status => Err(Error::UnhandledStatus(status.as_u16())),
        }
    }

    /// Creates a new record in a zone.
    pub async fn create_record(&self, mut opts: CreateRecordOpts) -> Result<Record, Error> {
        if self.txt_formatter && opts.record_type == TXT_TYPE {
            opts.value = plain_to_txt_value(&opts.value);
        }

        let response = self.request(Method::POST, "/api/v1/records", Some(&opts)).await?;

        match response.status() {
            StatusCode::OK => {
                let body: RecordResponse = read_json(response).await?;
                Ok(self.present_record(body.record))
            }
            status => Err(Error::UnhandledStatus(status.as_u16())),
        }
    }

    /// Replaces a record with the passed state (full-replace, not a patch).
    pub async fn update_record(&self, record: &Record) -> Result<Record, Error> {
        let mut body = record.clone();

        if self.txt_formatter && body.record_type == TXT_TYPE {
            body.value = plain_to_txt_value(&body.value);
        }

        let response = self
            .request(Method::PUT, &format!("/api/v1/records/{}", record.id), Some(&body))
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body: RecordResponse = read_json(response).await?;
                Ok(self.present_record(body.record))
            }
            status => Err(Error::UnhandledStatus(status.as_u16())),
        }
    }

    /// Deletes a record.
    pub async fn delete_record(&self, id: &str) -> Result<(), Error> {
        let response = self
            .request::<()>(Method::DELETE, &format!("/api/v1/records/{id}"), None)
            .await?;

        match response.status() {
            StatusCode::OK => Ok(()),
            status => Err(Error::UnhandledStatus(status.as_u16())),
        }
    }

    fn present_record(&self, mut record: Record) -> Record {
        if self.txt_formatter && record.record_type == TXT_TYPE {
            record.value = txt_value_to_plain(&record.value);
        }

        record
    }
}
