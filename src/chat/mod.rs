// WHOIS Bot - Chat Adapters
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Chat-facing surfaces: mention handling, the per-message session and the
//! console and TCP adapters that feed it.

pub mod console;
pub mod message;
pub mod server;
pub mod session;

pub use console::run_console;
pub use message::strip_mention;
pub use server::run_chat_server;
pub use session::{Session, generate_help_response};
