// WHOIS Bot - IANA Referral Client
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::net::IpAddr;

use super::WhoisClient;
use super::error::{LookupError, LookupResult};
use super::referral::{IanaAnswer, parse_iana_answer};
use super::transport::Transport;
use crate::config::{WhoisConfig, format_query};
use crate::log_debug;

/// Client that asks IANA which registry is authoritative, then asks that registry
#[derive(Debug, Clone)]
pub struct IanaWhoisClient {
    config: WhoisConfig,
    transport: Transport,
}

impl Default for IanaWhoisClient {
    fn default() -> Self {
        Self::new(WhoisConfig::default())
    }
}

impl IanaWhoisClient {
    pub fn new(config: WhoisConfig) -> Self {
        let transport = Transport::new(config.port, config.timeout(), config.max_response_bytes);
        Self { config, transport }
    }

    fn ask_iana(&self, query: &str) -> LookupResult<(String, IanaAnswer)> {
        let response = self.transport.query(&self.config.iana_server, query)?;
        let answer = parse_iana_answer(&response);
        log_debug!("IANA answer for {}: {:?}", query, answer);
        Ok((response, answer))
    }

    /// Query the referred server, reusing the IANA response when IANA refers to itself
    fn follow(&self, server: &str, target: &str, iana_response: String) -> LookupResult<String> {
        if server.eq_ignore_ascii_case(&self.config.iana_server) {
            return Ok(iana_response);
        }
        self.transport.query(server, &format_query(server, target))
    }

    fn lookup_tld(&self, target: &str, tld: &str) -> LookupResult<String> {
        match self.ask_iana(tld)? {
            (_, IanaAnswer::NoObjects) => Err(LookupError::ServerNotFound(target.to_string())),
            (response, _) => Ok(response),
        }
    }
}

impl WhoisClient for IanaWhoisClient {
    fn lookup(&self, target: &str) -> LookupResult<String> {
        if let Some(tld) = target.strip_prefix('.') {
            return self.lookup_tld(target, tld);
        }

        let tld = target.rsplit('.').next().unwrap_or(target);
        if let Some(server) = self.config.server_for_tld(tld) {
            log_debug!("Using configured server {} for .{}", server, tld);
            return self.transport.query(server, &format_query(server, target));
        }

        match self.ask_iana(target)? {
            (response, IanaAnswer::Referral(server)) => self.follow(&server, target, response),
            (_, IanaAnswer::NoObjects) => Err(LookupError::ServerNotFound(target.to_string())),
            (_, IanaAnswer::Reserved | IanaAnswer::Unreferred) => {
                Err(LookupError::NoInterface(target.to_string()))
            }
        }
    }

    fn reverse_lookup(&self, ip: &str) -> LookupResult<String> {
        ip.parse::<IpAddr>()
            .map_err(|_| LookupError::InvalidAddress(ip.to_string()))?;

        match self.ask_iana(ip)? {
            (response, IanaAnswer::Referral(server)) => self.follow(&server, ip, response),
            (_, IanaAnswer::NoObjects) => Err(LookupError::ServerNotFound(ip.to_string())),
            (_, IanaAnswer::Reserved | IanaAnswer::Unreferred) => {
                Err(LookupError::AllocationUnknown(ip.to_string()))
            }
        }
    }
}
