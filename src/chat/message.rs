// WHOIS Bot - Chat Messages
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

/// Reduce a channel message to its command text.
///
/// `whois-bot: whois example.com`, `whois-bot, whois example.com` and
/// `@whois-bot whois example.com` all become `whois example.com`. Only the
/// line ending is removed from other messages, so `whois example.com ` keeps
/// its trailing space and matches no anchored route.
pub fn strip_mention<'a>(message: &'a str, bot_name: &str) -> &'a str {
    let message = message.trim_end_matches(['\r', '\n']);
    if bot_name.is_empty() {
        return message;
    }

    let (rest, needs_separator) = match message.strip_prefix('@') {
        Some(rest) => (rest, false),
        None => (message, true),
    };

    let Some(head) = rest.get(..bot_name.len()) else {
        return message;
    };
    if !head.eq_ignore_ascii_case(bot_name) {
        return message;
    }

    let tail = &rest[bot_name.len()..];
    let body = match tail.chars().next() {
        Some(':' | ',') => &tail[1..],
        Some(c) if c.is_whitespace() && !needs_separator => tail,
        None if !needs_separator => tail,
        _ => return message,
    };

    body.trim_start()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colon_and_comma_mentions() {
        assert_eq!(strip_mention("whois-bot: whois example.com", "whois-bot"), "whois example.com");
        assert_eq!(strip_mention("Whois-Bot, whois .io", "whois-bot"), "whois .io");
    }

    #[test]
    fn test_at_mention() {
        assert_eq!(strip_mention("@whois-bot whois 8.8.8.8", "whois-bot"), "whois 8.8.8.8");
        assert_eq!(strip_mention("@whois-bot: help", "whois-bot"), "help");
        assert_eq!(strip_mention("whois-bot:   whois .io \n", "whois-bot"), "whois .io ");
    }

    #[test]
    fn test_unaddressed_message_is_unchanged() {
        assert_eq!(strip_mention("whois example.com\r\n", "whois-bot"), "whois example.com");
        assert_eq!(strip_mention("whois example.com ", "whois-bot"), "whois example.com ");
        assert_eq!(strip_mention(" whois example.com", "whois-bot"), " whois example.com");
        assert_eq!(strip_mention("whois-botty: hi", "whois-bot"), "whois-botty: hi");
        assert_eq!(strip_mention("whois-bot whois example.com", "whois-bot"), "whois-bot whois example.com");
        assert_eq!(strip_mention("@whois-botty hi", "whois-bot"), "@whois-botty hi");
    }

    #[test]
    fn test_non_ascii_prefix_does_not_panic() {
        assert_eq!(strip_mention("ü", "whois-bot"), "ü");
        assert_eq!(strip_mention("éééééééééé", "whois-bot"), "éééééééééé");
    }
}
