// WHOIS Bot
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use whois_bot::chat::{Session, run_chat_server, run_console};
use whois_bot::config::{Cli, Config};
use whois_bot::core::logger::{init_from_args, log_init_failed, log_init_start};
use whois_bot::{Dispatcher, IanaWhoisClient, log_debug};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_from_args(cli.debug, cli.journald)?;

    let config = match Config::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            log_init_failed("whois-bot", &e.to_string());
            return Err(e.into());
        }
    };
    log_debug!("Loaded configuration: {:?}", config);

    let client = IanaWhoisClient::new(config.whois.clone());
    let session = Arc::new(Session::new(Dispatcher::new(client), config.bot.name.clone()));

    if let Some(message) = cli.execute {
        let reply = tokio::task::spawn_blocking(move || session.handle(&message))
            .await
            .context("Lookup task panicked")??;
        if let Some(reply) = reply {
            println!("{}", reply.trim_end());
        }
        return Ok(());
    }

    if cli.serve || cli.listen.is_some() {
        log_init_start("chat listener");
        return run_chat_server(&config.server, session).await;
    }

    log_init_start("console");
    let prompt = atty::is(atty::Stream::Stdin).then(|| format!("{} > ", session.bot_name()));
    tokio::task::spawn_blocking(move || {
        let stdin = io::stdin();
        run_console(&session, stdin.lock(), io::stdout(), prompt.as_deref())
    })
    .await
    .context("Console task panicked")?
}
