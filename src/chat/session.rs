// WHOIS Bot - Chat Session
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::message::strip_mention;
use crate::core::command::ROUTES;
use crate::core::dispatcher::{DispatchError, Dispatcher};
use crate::whois::WhoisClient;
use crate::{log_error, log_warn};

/// Glue between a chat adapter and the dispatcher
pub struct Session<C> {
    dispatcher: Dispatcher<C>,
    bot_name: String,
}

impl<C: WhoisClient> Session<C> {
    pub fn new(dispatcher: Dispatcher<C>, bot_name: impl Into<String>) -> Self {
        Self {
            dispatcher,
            bot_name: bot_name.into(),
        }
    }

    pub fn bot_name(&self) -> &str {
        &self.bot_name
    }

    /// Reply text for one message, or `None` when nothing should be sent
    pub fn handle(&self, message: &str) -> Result<Option<String>, DispatchError> {
        let text = strip_mention(message, &self.bot_name);

        if text.eq_ignore_ascii_case("help") || text.eq_ignore_ascii_case("help whois") {
            return Ok(Some(generate_help_response(&self.bot_name)));
        }

        Ok(self.dispatcher.dispatch(text)?.text().map(str::to_string))
    }

    /// Like [`Session::handle`], but unhandled errors are logged and produce no reply
    pub fn respond(&self, message: &str) -> Option<String> {
        match self.handle(message) {
            Ok(reply) => reply,
            Err(DispatchError::Lookup(e)) if e.is_unresolvable() => {
                log_warn!("Lookup for {:?} failed: {}", message, e);
                None
            }
            Err(e) => {
                log_error!("Unhandled error processing {:?}: {}", message, e);
                None
            }
        }
    }
}

/// Usage table built from the route table
pub fn generate_help_response(bot_name: &str) -> String {
    let width = ROUTES.iter().map(|r| r.usage.len()).max().unwrap_or(0);

    let mut output = String::new();
    output.push_str(&format!("{} - WHOIS commands\n", bot_name));
    output.push_str("-".repeat(40).as_str());
    output.push('\n');
    for route in ROUTES.iter() {
        output.push_str(&format!("{:<width$}  - {}\n", route.usage, route.help, width = width));
    }
    output.push('\n');
    output.push_str(&format!(
        "Commands work in any message, or addressed as \"{}: whois ...\"",
        bot_name
    ));
    output
}
