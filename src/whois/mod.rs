// WHOIS Bot - WHOIS Client
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

//! WHOIS lookups behind a small blocking trait so the command dispatcher can be
//! driven by the real IANA referral client or by a test double.

pub mod client;
pub mod error;
pub mod referral;
pub mod transport;

pub use client::IanaWhoisClient;
pub use error::{LookupError, LookupResult};

pub trait WhoisClient: Send + Sync {
    /// Forward lookup of a domain (`name.tld`) or a TLD (`.tld`)
    fn lookup(&self, target: &str) -> LookupResult<String>;

    /// Lookup keyed by an IPv4 or IPv6 literal
    fn reverse_lookup(&self, ip: &str) -> LookupResult<String>;
}
