// WHOIS Bot - Command Classification
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Ordered route table for `whois` chat commands.
//!
//! Routes are tried in declaration order and the first match wins, so a
//! message is only ever handled by one lookup strategy. Character classes are
//! the ASCII POSIX ones: `[[:word:]]` is `[0-9A-Za-z_]`.

use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    Domain,
    Url,
    Tld,
    Ip,
}

pub struct Route {
    pub kind: RouteKind,
    pub pattern: Regex,
    pub usage: &'static str,
    pub help: &'static str,
}

/// A classified command, carrying what its strategy needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `whois name.tld`, holding the joined `name.tld`
    Domain(String),
    /// `whois http(s)://...`, holding the URL text to parse
    Url(String),
    /// `whois .tld`, holding `.tld`
    Tld(String),
    /// Anything else after `whois `, not yet validated as an address
    Ip(String),
}

impl Command {
    pub fn kind(&self) -> RouteKind {
        match self {
            Command::Domain(_) => RouteKind::Domain,
            Command::Url(_) => RouteKind::Url,
            Command::Tld(_) => RouteKind::Tld,
            Command::Ip(_) => RouteKind::Ip,
        }
    }
}

fn route(kind: RouteKind, pattern: &str, usage: &'static str, help: &'static str) -> Route {
    Route {
        kind,
        pattern: Regex::new(pattern).expect("route pattern must compile"),
        usage,
        help,
    }
}

// Dots in the domain and TLD forms are literal. `whois abc` is not read as
// `a.c` and `whois -io` is not read as `.io`; both reach the address route.
pub static ROUTES: Lazy<Vec<Route>> = Lazy::new(|| {
    vec![
        route(
            RouteKind::Domain,
            r"^whois[[:space:]]([[:word:]]+)\.([[:word:]]+)$",
            "whois example.com",
            "Get the WHOIS info for a domain",
        ),
        route(
            RouteKind::Url,
            r"^whois[[:space:]](?:http|https)://[a-z0-9]+(?:[\-\.]{1}[a-z0-9]+)*\.[a-z]{2,5}(?:(?::[0-9]{1,5})?/[^[:space:]]*)?",
            "whois https://www.google.com",
            "Get the WHOIS for the host of a full URL",
        ),
        route(
            RouteKind::Tld,
            r"^whois[[:space:]]\.([[:word:]]+)$",
            "whois .io",
            "Get the WHOIS info for a TLD",
        ),
        route(
            RouteKind::Ip,
            r"^whois[[:space:]](.+)$",
            "whois 8.8.8.8",
            "Get the WHOIS info for an IPv4 or IPv6 address",
        ),
    ]
});

/// Match `text` against the route table; `None` when no route applies
pub fn classify(text: &str) -> Option<Command> {
    ROUTES.iter().find_map(|route| {
        let caps = route.pattern.captures(text)?;
        let command = match route.kind {
            RouteKind::Domain => Command::Domain(format!("{}.{}", &caps[1], &caps[2])),
            RouteKind::Url => Command::Url(caps[0].replace("whois ", "")),
            RouteKind::Tld => Command::Tld(format!(".{}", &caps[1])),
            RouteKind::Ip => Command::Ip(caps[1].to_string()),
        };
        Some(command)
    })
}
