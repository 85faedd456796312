// WHOIS Bot - Console Adapter
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use super::session::Session;
use crate::whois::WhoisClient;

/// Read messages line by line from `input` and write replies to `output`.
/// A prompt is printed before each message when one is given.
pub fn run_console<C, R, W>(session: &Session<C>, input: R, mut output: W, prompt: Option<&str>) -> Result<()>
where
    C: WhoisClient,
    R: BufRead,
    W: Write,
{
    let mut lines = input.lines();
    loop {
        if let Some(prompt) = prompt {
            write!(output, "{}", prompt)?;
            output.flush()?;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read from console")?;
        if line.trim().is_empty() {
            continue;
        }

        if let Some(reply) = session.respond(&line) {
            writeln!(output, "{}", reply.trim_end())?;
            output.flush()?;
        }
    }

    Ok(())
}
