// WHOIS Bot - TCP Chat Adapter
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Line-based chat over TCP. Each connection behaves like a channel: every
//! line is a message, every reply is written followed by an empty line.
//! Idle connections and over-long lines are dropped so they cannot hold a
//! connection slot.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;

use super::session::Session;
use crate::config::ServerConfig;
use crate::core::logger::log_init_ok_with_details;
use crate::whois::WhoisClient;
use crate::{log_debug, log_error, log_info, log_warn};

/// Per-connection read limits
#[derive(Debug, Clone, Copy)]
struct Limits {
    idle_timeout: Duration,
    max_line_bytes: usize,
}

pub async fn run_chat_server<C>(config: &ServerConfig, session: Arc<Session<C>>) -> Result<()>
where
    C: WhoisClient + 'static,
{
    let listener = TcpListener::bind(&config.listen)
        .await
        .context(format!("Failed to bind to {}", config.listen))?;
    log_init_ok_with_details("chat listener", &config.listen);

    serve(listener, config, session).await
}

/// Accept connections forever, at most `config.max_connections` at a time
pub async fn serve<C>(listener: TcpListener, config: &ServerConfig, session: Arc<Session<C>>) -> Result<()>
where
    C: WhoisClient + 'static,
{
    let permits = Arc::new(Semaphore::new(config.max_connections.max(1)));
    let limits = Limits {
        idle_timeout: config.idle_timeout(),
        max_line_bytes: config.max_line_bytes.max(1),
    };

    loop {
        let permit = Arc::clone(&permits)
            .acquire_owned()
            .await
            .context("Connection limiter closed")?;

        match listener.accept().await {
            Ok((stream, addr)) => {
                log_info!("Accepted connection from {}", addr);
                let session = Arc::clone(&session);

                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, addr, limits, session).await {
                        log_error!("Connection handling error for {}: {}", addr, e);
                    }
                    drop(permit);
                });
            }
            Err(e) => {
                log_error!("Failed to accept connection: {}", e);
            }
        }
    }
}

/// Read one line of at most `max_bytes` bytes, without its line ending.
/// `None` at end of stream.
async fn read_message<R>(reader: &mut R, max_bytes: usize) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut raw = Vec::new();
    let n = (&mut *reader)
        .take(max_bytes as u64 + 1)
        .read_until(b'\n', &mut raw)
        .await
        .context("Failed to read message")?;
    if n == 0 {
        return Ok(None);
    }

    if raw.last() == Some(&b'\n') {
        raw.pop();
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }
    } else if raw.len() > max_bytes {
        anyhow::bail!("Message exceeds {} bytes", max_bytes);
    }

    Ok(Some(String::from_utf8_lossy(&raw).into_owned()))
}

async fn handle_connection<C>(
    stream: TcpStream,
    addr: SocketAddr,
    limits: Limits,
    session: Arc<Session<C>>,
) -> Result<()>
where
    C: WhoisClient + 'static,
{
    if let Err(e) = stream.set_nodelay(true) {
        log_warn!("Failed to set TCP_NODELAY: {}", e);
    }

    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);

    loop {
        let read = tokio::time::timeout(limits.idle_timeout, read_message(&mut reader, limits.max_line_bytes));
        let Ok(message) = read.await else {
            log_info!("Closing idle connection from {}", addr);
            return Ok(());
        };
        let Some(line) = message? else {
            break;
        };

        if line.trim().is_empty() {
            continue;
        }
        log_debug!("Message from {}: {}", addr, line);

        // Lookups block on the network, so keep them off the async workers
        let worker = Arc::clone(&session);
        let reply = tokio::task::spawn_blocking(move || worker.respond(&line))
            .await
            .context("Lookup task panicked")?;

        if let Some(reply) = reply {
            writer.write_all(reply.trim_end().as_bytes()).await?;
            writer.write_all(b"\n\n").await?;
            writer.flush().await?;
        }
    }

    log_debug!("Connection from {} closed", addr);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dispatcher::Dispatcher;
    use crate::core::dispatcher::test_support::MockClient;
    use crate::whois::LookupError;

    fn server_config(max_connections: usize) -> ServerConfig {
        ServerConfig {
            max_connections,
            ..ServerConfig::default()
        }
    }

    async fn start(config: ServerConfig) -> (SocketAddr, tokio::task::JoinHandle<Result<()>>) {
        let session = Arc::new(Session::new(
            Dispatcher::new(MockClient::new(|target| Ok(format!("record for {}", target)))),
            "whois-bot",
        ));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move { serve(listener, &config, session).await });
        (addr, server)
    }

    async fn ask(addr: SocketAddr, message: &str) -> String {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (reader, mut writer) = stream.into_split();
        writer.write_all(message.as_bytes()).await.unwrap();
        let mut lines = BufReader::new(reader).lines();
        lines.next_line().await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_replies_are_framed_per_message() {
        let client = MockClient::new(|target| match target {
            ".io" => Err(LookupError::ServerNotFound(target.to_string())),
            _ => Ok(format!("record for {}\r\n", target)),
        });
        let session = Arc::new(Session::new(Dispatcher::new(client), "whois-bot"));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let config = server_config(4);
        let server = tokio::spawn(async move { serve(listener, &config, session).await });

        let stream = TcpStream::connect(addr).await.unwrap();
        let (reader, mut writer) = stream.into_split();
        let mut lines = BufReader::new(reader).lines();

        writer.write_all(b"whois-bot: whois example.com\n").await.unwrap();
        assert_eq!(lines.next_line().await.unwrap().unwrap(), "record for example.com");
        assert_eq!(lines.next_line().await.unwrap().unwrap(), "");

        writer.write_all(b"whois not-an-ip\nwhois .io\n").await.unwrap();
        assert_eq!(
            lines.next_line().await.unwrap().unwrap(),
            "Cannot find a WHOIS server for .io"
        );

        server.abort();
    }

    #[tokio::test]
    async fn test_over_long_line_releases_slot() {
        let (addr, server) = start(ServerConfig {
            max_line_bytes: 1024,
            ..server_config(1)
        })
        .await;

        let mut flood = TcpStream::connect(addr).await.unwrap();
        // The server may reset the connection while this is still writing
        let _ = flood.write_all(&vec![b'x'; 64 * 1024]).await;

        let reply = tokio::time::timeout(Duration::from_secs(5), ask(addr, "whois example.com\n"))
            .await
            .expect("second client was not served");
        assert_eq!(reply, "record for example.com");

        let mut buf = [0u8; 16];
        assert!(matches!(flood.read(&mut buf).await, Ok(0) | Err(_)));

        server.abort();
    }

    #[tokio::test]
    async fn test_idle_connection_releases_slot() {
        let (addr, server) = start(ServerConfig {
            idle_timeout_secs: 1,
            ..server_config(1)
        })
        .await;

        let _idle = TcpStream::connect(addr).await.unwrap();

        let reply = tokio::time::timeout(Duration::from_secs(5), ask(addr, "whois 8.8.8.8\n"))
            .await
            .expect("second client was not served");
        assert_eq!(reply, "record for 8.8.8.8");

        server.abort();
    }

    #[tokio::test]
    async fn test_read_message_limits() {
        let mut input = "whois .io\r\nwhois example.com \nlast".as_bytes();
        assert_eq!(read_message(&mut input, 64).await.unwrap(), Some("whois .io".into()));
        assert_eq!(read_message(&mut input, 64).await.unwrap(), Some("whois example.com ".into()));
        assert_eq!(read_message(&mut input, 64).await.unwrap(), Some("last".into()));
        assert_eq!(read_message(&mut input, 64).await.unwrap(), None);

        let mut exact = "abcd\nabcde".as_bytes();
        assert_eq!(read_message(&mut exact, 4).await.unwrap(), Some("abcd".into()));
        assert!(read_message(&mut exact, 4).await.is_err());
    }
}
