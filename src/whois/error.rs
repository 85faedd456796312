// WHOIS Bot - WHOIS Client Errors
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

use thiserror::Error;

/// Failure of a single WHOIS lookup
#[derive(Error, Debug)]
pub enum LookupError {
    /// No registry server is known for the target
    #[error("No WHOIS server found for {0}")]
    ServerNotFound(String),

    /// The address belongs to a block IANA has not delegated to a registry
    #[error("Allocation of {0} is unknown")]
    AllocationUnknown(String),

    /// The registry exists but publishes no port 43 interface
    #[error("No WHOIS interface available for {0}")]
    NoInterface(String),

    #[error("Invalid IP address: {0}")]
    InvalidAddress(String),

    #[error("Cannot connect to WHOIS server {server}: {source}")]
    Connect {
        server: String,
        source: std::io::Error,
    },

    #[error("WHOIS server {0} timed out")]
    Timeout(String),

    #[error("I/O error talking to WHOIS server {server}: {source}")]
    Io {
        server: String,
        source: std::io::Error,
    },

    #[error("Empty response from WHOIS server {0}")]
    EmptyResponse(String),
}

pub type LookupResult<T> = Result<T, LookupError>;

impl LookupError {
    /// Failures that mean "nobody can answer this", as opposed to a transport fault
    pub fn is_unresolvable(&self) -> bool {
        matches!(
            self,
            Self::ServerNotFound(_) | Self::AllocationUnknown(_) | Self::NoInterface(_)
        )
    }

    pub(crate) fn from_io(server: &str, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => {
                Self::Timeout(server.to_string())
            }
            _ => Self::Io {
                server: server.to_string(),
                source,
            },
        }
    }
}
