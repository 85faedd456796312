// WHOIS Bot - IANA Referral Parsing
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

/// What whois.iana.org said about a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IanaAnswer {
    /// `refer:` or `whois:` named the authoritative server
    Referral(String),
    /// "This query returned 0 objects"
    NoObjects,
    /// The object exists but is marked RESERVED
    Reserved,
    /// The object exists but names no server
    Unreferred,
}

pub fn parse_iana_answer(response: &str) -> IanaAnswer {
    let mut refer = None;
    let mut whois = None;
    let mut reserved = false;
    let mut no_objects = false;

    for line in response.lines() {
        let line = line.trim();

        if line.starts_with('%') {
            if line.contains("returned 0 objects") {
                no_objects = true;
            }
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        match key.trim().to_ascii_lowercase().as_str() {
            "refer" if refer.is_none() => refer = Some(value.to_string()),
            "whois" if whois.is_none() => whois = Some(value.to_string()),
            "status" => reserved |= value.eq_ignore_ascii_case("reserved"),
            _ => {}
        }
    }

    match refer.or(whois) {
        Some(server) => IanaAnswer::Referral(server),
        None if no_objects => IanaAnswer::NoObjects,
        None if reserved => IanaAnswer::Reserved,
        None => IanaAnswer::Unreferred,
    }
}
