//! Client for the Hetzner DNS API
//!
//! This crate manages DNS zones, records and primary servers through the
//! JSON HTTP API at `https://dns.hetzner.com`. It is the network boundary
//! of a declarative reconciliation layer: every operation is a stateless
//! request/response mapping, and the caller owns all state.
//!
//! # Features
//!
//! - **Typed CRUD operations** for zones, records and primary servers
//! - **Automatic retries** with exponential backoff for transport failures
//!   and the API's transient 422 responses
//! - **Serialized writes**: the API breaks under concurrent mutations, so
//!   only one POST/PUT/DELETE is ever in flight per client
//! - **TXT chunking**: long TXT values are split into 255-byte quoted
//!   chunks on write and joined back on read
//!
//! # Usage
//!
//! ```ignore
//! use hetzner_dns_api::{Client, ClientConfig, CreateZoneOpts};
//!
//! let client = Client::new(ClientConfig::new(api_token))?;
//!
//! let zone = client
//!     .create_zone(CreateZoneOpts { name: "example.com".into(), ttl: 3600 })
//!     .await?;
//!
//! match client.get_zone(&zone.id).await? {
//!     Some(zone) => println!("zone {} has TTL {}", zone.name, zone.ttl),
//!     None => println!("zone is gone"),
//! }
//! ```
//!
//! Dropping a call's future cancels the in-flight attempt; pending retries
//! are abandoned and the write lock is released.

pub mod client;
pub mod errors;
pub mod nameservers;
pub mod primary_servers;
pub mod records;
mod retry;
pub mod txt;
pub mod zones;

// Re-export main types
pub use client::{Client, ClientConfig, DEFAULT_ENDPOINT, DEFAULT_MAX_RETRIES};
pub use errors::Error;
pub use nameservers::{
    authoritative_nameservers, konsoleh_nameservers, secondary_nameservers, Nameserver,
};
pub use primary_servers::{CreatePrimaryServerOpts, PrimaryServer};
pub use records::{CreateRecordOpts, Record};
pub use txt::{plain_to_txt_value, txt_value_to_plain};
pub use zones::{CreateZoneOpts, Zone};
