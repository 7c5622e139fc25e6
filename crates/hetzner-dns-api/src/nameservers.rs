//! Hetzner nameserver reference data
//!
//! The DNS API has no endpoint for its own nameservers, so the three groups
//! are hard-coded. Addresses are resolved through the system resolver, not
//! the DNS wire protocol.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::errors::Error;

/// All Hetzner DNS authoritative nameservers.
pub const AUTHORITATIVE_NAMESERVERS: [&str; 3] = [
    "helium.ns.hetzner.de.",
    "hydrogen.ns.hetzner.com.",
    "oxygen.ns.hetzner.com.",
];

/// All Hetzner DNS secondary nameservers.
pub const SECONDARY_NAMESERVERS: [&str; 3] = [
    "ns1.first-ns.de.",
    "robotns2.second-ns.de.",
    "robotns3.second-ns.com.",
];

/// All Hetzner DNS KonsoleH nameservers.
pub const KONSOLEH_NAMESERVERS: [&str; 3] = [
    "ns1.your-server.de.",
    "ns.second-ns.com.",
    "ns3.second-ns.de.",
];

/// A nameserver with its resolved addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nameserver {
    pub name: String,
    pub ipv4: Option<Ipv4Addr>,
    pub ipv6: Option<Ipv6Addr>,
}

/// Returns the authoritative nameservers with resolved addresses.
pub async fn authoritative_nameservers() -> Result<Vec<Nameserver>, Error> {
    resolve_group(&AUTHORITATIVE_NAMESERVERS).await
}

/// Returns the secondary nameservers with resolved addresses.
pub async fn secondary_nameservers() -> Result<Vec<Nameserver>, Error> {
    resolve_group(&SECONDARY_NAMESERVERS).await
}

/// Returns the KonsoleH nameservers with resolved addresses.
pub async fn konsoleh_nameservers() -> Result<Vec<Nameserver>, Error> {
    resolve_group(&KONSOLEH_NAMESERVERS).await
}

async fn resolve_group(names: &[&str]) -> Result<Vec<Nameserver>, Error> {
    let mut nameservers = Vec::with_capacity(names.len());

    for name in names {
        nameservers.push(resolve(name).await?);
    }

    Ok(nameservers)
}

async fn resolve(name: &str) -> Result<Nameserver, Error> {
    let host = name.trim_end_matches('.');

    let addrs = tokio::net::lookup_host((host, 53))
        .await
        .map_err(|source| Error::Resolve {
            name: name.to_string(),
            source,
        })?;

    let mut ipv4 = None;
    let mut ipv6 = None;

    for addr in addrs {
        match addr.ip() {
            IpAddr::V4(ip) => ipv4 = Some(ip),
            IpAddr::V6(ip) => ipv6 = Some(ip),
        }
    }

    Ok(Nameserver {
        name: name.to_string(),
        ipv4,
        ipv6,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nameserver_names_are_fully_qualified() {
        for name in AUTHORITATIVE_NAMESERVERS
            .iter()
            .chain(&SECONDARY_NAMESERVERS)
            .chain(&KONSOLEH_NAMESERVERS)
        {
            assert!(name.ends_with('.'), "{name} should end with a dot");
        }
    }

    #[tokio::test]
    async fn resolve_returns_an_address_for_localhost() {
        let nameserver = resolve("localhost").await.unwrap();

        assert_eq!(nameserver.name, "localhost");
        assert!(nameserver.ipv4.is_some() || nameserver.ipv6.is_some());
    }
}
