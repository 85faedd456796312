//! # WHOIS Bot Library
//!
//! Chat command handling for WHOIS lookups. A message such as
//! `whois example.com` is matched against an ordered route table and turned
//! into one of four lookups:
//!
//! - Domains: `whois example.com`
//! - URLs (the host is looked up): `whois https://www.google.com`
//! - TLDs: `whois .io`
//! - IPv4 and IPv6 addresses: `whois 8.8.8.8`
//!
//! Anything else after `whois ` that is not an IP literal is ignored.
//!
//! ## Quick Start
//!
//! ```no_run
//! use whois_bot::{Dispatcher, IanaWhoisClient};
//!
//! fn main() -> anyhow::Result<()> {
//!     let dispatcher = Dispatcher::new(IanaWhoisClient::default());
//!     if let Some(text) = dispatcher.dispatch("whois example.com")?.text() {
//!         println!("{}", text);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Lookups block on the network. The chat adapters in [`chat`] run them on
//! tokio's blocking pool.

pub mod chat;
pub mod config;
pub mod core;
pub mod whois;

pub use chat::Session;
pub use crate::core::{Command, DispatchError, Dispatcher, Reply, classify};
pub use whois::{IanaWhoisClient, LookupError, WhoisClient};

/// Handle one command with a default IANA client
///
/// # Examples
///
/// ```no_run
/// let reply = whois_bot::whois("whois .io")?;
/// println!("{:?}", reply.text());
/// # Ok::<(), whois_bot::DispatchError>(())
/// ```
pub fn whois(text: &str) -> Result<Reply, DispatchError> {
    Dispatcher::new(IanaWhoisClient::default()).dispatch(text)
}
