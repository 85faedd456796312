// WHOIS Bot - Lookup Dispatcher
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Turns a classified command into a lookup and the lookup into a reply.
//!
//! Only the "nobody serves this" failures become chat replies. Everything
//! else is returned as a [`DispatchError`] for the chat adapter to log.

use std::net::IpAddr;

use thiserror::Error;
use url::Url;

use super::command::{Command, classify};
use crate::log_debug;
use crate::whois::{LookupError, WhoisClient};

/// What to send back to the channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Raw WHOIS record, sent unmodified
    Record(String),
    /// Fixed-format message for a target no server can answer
    NotFound(String),
    /// Nothing is sent
    Silent,
}

impl Reply {
    pub fn text(&self) -> Option<&str> {
        match self {
            Reply::Record(text) | Reply::NotFound(text) => Some(text.as_str()),
            Reply::Silent => None,
        }
    }

    fn not_found(target: &str) -> Self {
        Reply::NotFound(format!("Cannot find a WHOIS server for {}", target))
    }
}

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Invalid URL {input}: {source}")]
    InvalidUrl {
        input: String,
        source: url::ParseError,
    },

    #[error("URL {0} has no host")]
    MissingHost(String),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

pub struct Dispatcher<C> {
    client: C,
}

impl<C: WhoisClient> Dispatcher<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Handle one message's command text
    pub fn dispatch(&self, text: &str) -> Result<Reply, DispatchError> {
        let Some(command) = classify(text) else {
            log_debug!("No whois route matched: {:?}", text);
            return Ok(Reply::Silent);
        };
        log_debug!("Routed {:?} as {:?}", text, command.kind());

        match command {
            Command::Domain(target) | Command::Tld(target) => self.lookup(&target),
            Command::Url(input) => self.uri_lookup(&input),
            Command::Ip(candidate) => {
                if candidate.parse::<IpAddr>().is_ok() {
                    self.reverse_lookup(&candidate)
                } else {
                    log_debug!("Ignoring non-address whois argument {:?}", candidate);
                    Ok(Reply::Silent)
                }
            }
        }
    }

    fn lookup(&self, target: &str) -> Result<Reply, DispatchError> {
        match self.client.lookup(target) {
            Ok(record) => Ok(Reply::Record(record)),
            Err(LookupError::ServerNotFound(_)) => Ok(Reply::not_found(target)),
            Err(e) => Err(e.into()),
        }
    }

    /// Look up the host of a URL. The URL route accepts five-digit ports, but
    /// a port above 65535 fails to parse and is returned as
    /// [`DispatchError::InvalidUrl`] without a lookup.
    fn uri_lookup(&self, input: &str) -> Result<Reply, DispatchError> {
        let url = Url::parse(input).map_err(|source| DispatchError::InvalidUrl {
            input: input.to_string(),
            source,
        })?;
        let host = url
            .host_str()
            .ok_or_else(|| DispatchError::MissingHost(input.to_string()))?;
        self.lookup(host)
    }

    fn reverse_lookup(&self, ip: &str) -> Result<Reply, DispatchError> {
        match self.client.reverse_lookup(ip) {
            Ok(record) => Ok(Reply::Record(record)),
            Err(
                LookupError::ServerNotFound(_)
                | LookupError::AllocationUnknown(_)
                | LookupError::NoInterface(_),
            ) => Ok(Reply::not_found(ip)),
            Err(e) => Err(e.into()),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{Call, MockClient};
    use super::*;

    fn dispatcher(client: MockClient) -> Dispatcher<MockClient> {
        Dispatcher::new(client)
    }

    #[test]
    fn test_domain_record_is_relayed() {
        let d = dispatcher(MockClient::record("Domain: EXAMPLE.COM"));

        let reply = d.dispatch("whois example.com").unwrap();

        assert_eq!(reply, Reply::Record("Domain: EXAMPLE.COM".into()));
        assert_eq!(reply.text(), Some("Domain: EXAMPLE.COM"));
        assert_eq!(d.client().calls(), vec![Call::Lookup("example.com".into())]);
    }

    #[test]
    fn test_every_word_pair_is_looked_up_once() {
        for (a, b) in [("example", "com"), ("x", "io"), ("do_main", "dev"), ("123", "net")] {
            let d = dispatcher(MockClient::record("ok"));
            d.dispatch(&format!("whois {}.{}", a, b)).unwrap();
            assert_eq!(d.client().calls(), vec![Call::Lookup(format!("{}.{}", a, b))]);
        }
    }

    #[test]
    fn test_tld_keeps_single_leading_dot() {
        let d = dispatcher(MockClient::record("domain: IO"));
        d.dispatch("whois .io").unwrap();
        assert_eq!(d.client().calls(), vec![Call::Lookup(".io".into())]);
    }

    #[test]
    fn test_tld_server_not_found() {
        let d = dispatcher(MockClient::failing(LookupError::ServerNotFound));
        let reply = d.dispatch("whois .io").unwrap();
        assert_eq!(reply, Reply::NotFound("Cannot find a WHOIS server for .io".into()));
    }

    #[test]
    fn test_domain_server_not_found_names_target() {
        let d = dispatcher(MockClient::failing(LookupError::ServerNotFound));
        let reply = d.dispatch("whois example.zzz").unwrap();
        assert_eq!(reply.text(), Some("Cannot find a WHOIS server for example.zzz"));
    }

    #[test]
    fn test_forward_lookup_only_catches_server_not_found() {
        let d = dispatcher(MockClient::failing(LookupError::NoInterface));
        let err = d.dispatch("whois example.xx").unwrap_err();
        assert!(matches!(err, DispatchError::Lookup(LookupError::NoInterface(_))));

        let d = dispatcher(MockClient::failing(LookupError::EmptyResponse));
        assert!(d.dispatch("whois example.com").is_err());
    }

    #[test]
    fn test_url_uses_host_only() {
        let d = dispatcher(MockClient::record("Domain: GOOGLE.COM"));

        let reply = d
            .dispatch("whois https://www.google.com:8443/search?q=rust#top")
            .unwrap();

        assert_eq!(reply, Reply::Record("Domain: GOOGLE.COM".into()));
        assert_eq!(d.client().calls(), vec![Call::Lookup("www.google.com".into())]);
    }

    #[test]
    fn test_url_server_not_found_names_host() {
        let d = dispatcher(MockClient::failing(LookupError::ServerNotFound));
        let reply = d.dispatch("whois http://example.zzzz/").unwrap();
        assert_eq!(reply.text(), Some("Cannot find a WHOIS server for example.zzzz"));
    }

    #[test]
    fn test_url_with_invalid_port_propagates() {
        let d = dispatcher(MockClient::record("unused"));
        let err = d.dispatch("whois http://example.com:99999/").unwrap_err();
        assert!(matches!(err, DispatchError::InvalidUrl { .. }));
        assert!(d.client().calls().is_empty());
    }

    #[test]
    fn test_ip_record_is_relayed_verbatim() {
        let d = dispatcher(MockClient::record("NetRange: 8.8.8.0 - 8.8.8.255"));

        let reply = d.dispatch("whois 8.8.8.8").unwrap();

        assert_eq!(reply, Reply::Record("NetRange: 8.8.8.0 - 8.8.8.255".into()));
        assert_eq!(d.client().calls(), vec![Call::Reverse("8.8.8.8".into())]);
    }

    #[test]
    fn test_ipv6_literal_is_passed_unchanged() {
        let d = dispatcher(MockClient::record("inet6num: 2001:4860::/32"));
        d.dispatch("whois 2001:4860:4860:0000:0000:0000:0000:8888").unwrap();
        assert_eq!(
            d.client().calls(),
            vec![Call::Reverse("2001:4860:4860:0000:0000:0000:0000:8888".into())]
        );
    }

    #[test]
    fn test_reverse_lookup_friendly_failures() {
        let kinds: [fn(String) -> LookupError; 3] = [
            LookupError::ServerNotFound,
            LookupError::AllocationUnknown,
            LookupError::NoInterface,
        ];
        for make in kinds {
            let d = dispatcher(MockClient::failing(make));
            let reply = d.dispatch("whois 10.0.0.1").unwrap();
            assert_eq!(reply, Reply::NotFound("Cannot find a WHOIS server for 10.0.0.1".into()));
        }
    }

    #[test]
    fn test_reverse_lookup_transport_failure_propagates() {
        let d = dispatcher(MockClient::failing(LookupError::Timeout));
        let err = d.dispatch("whois 8.8.8.8").unwrap_err();
        assert!(matches!(err, DispatchError::Lookup(LookupError::Timeout(_))));
    }

    #[test]
    fn test_invalid_address_is_silent_without_lookup() {
        let d = dispatcher(MockClient::record("unused"));

        for text in ["whois not-an-ip", "whois 999.1.1.1", "whois 10.0.0.0/8", "whois a.b.c"] {
            assert_eq!(d.dispatch(text).unwrap(), Reply::Silent);
        }
        assert!(d.client().calls().is_empty());
    }

    #[test]
    fn test_unrouted_message_is_silent() {
        let d = dispatcher(MockClient::record("unused"));
        assert_eq!(d.dispatch("good morning").unwrap(), Reply::Silent);
        assert_eq!(Reply::Silent.text(), None);
        assert!(d.client().calls().is_empty());
    }
}
