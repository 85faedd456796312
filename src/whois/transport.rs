// WHOIS Bot - WHOIS Transport
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Blocking RFC 3912 transport: one TCP connection per query, CRLF-terminated
//! request, response read until the server closes the connection.

use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use super::error::{LookupError, LookupResult};
use crate::{log_debug, log_warn};

#[derive(Debug, Clone)]
pub struct Transport {
    pub port: u16,
    pub timeout: Duration,
    pub max_response_bytes: usize,
}

impl Transport {
    pub fn new(port: u16, timeout: Duration, max_response_bytes: usize) -> Self {
        Self {
            port,
            timeout,
            max_response_bytes,
        }
    }

    fn connect(&self, server: &str) -> LookupResult<TcpStream> {
        let addrs = (server, self.port)
            .to_socket_addrs()
            .map_err(|source| LookupError::Connect {
                server: server.to_string(),
                source,
            })?;

        let mut last_error = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => {
                    log_debug!("Connection to {} ({}) failed: {}", server, addr, e);
                    last_error = Some(e);
                }
            }
        }

        let source = last_error.unwrap_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "no addresses resolved")
        });
        if source.kind() == std::io::ErrorKind::TimedOut {
            return Err(LookupError::Timeout(server.to_string()));
        }
        Err(LookupError::Connect {
            server: server.to_string(),
            source,
        })
    }

    /// Send `query` to `server` and return the full response text
    pub fn query(&self, server: &str, query: &str) -> LookupResult<String> {
        log_debug!("Querying WHOIS server {}:{} for {}", server, self.port, query);

        let mut stream = self.connect(server)?;
        let io_err = |e: std::io::Error| LookupError::from_io(server, e);

        stream.set_read_timeout(Some(self.timeout)).map_err(io_err)?;
        stream.set_write_timeout(Some(self.timeout)).map_err(io_err)?;
        if let Err(e) = stream.set_nodelay(true) {
            log_warn!("Failed to set TCP_NODELAY: {}", e);
        }

        stream
            .write_all(format!("{}\r\n", query).as_bytes())
            .and_then(|_| stream.flush())
            .map_err(io_err)?;

        let mut raw = Vec::new();
        let mut buffer = [0u8; 8192];
        loop {
            let n = stream.read(&mut buffer).map_err(io_err)?;
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buffer[..n]);
            if raw.len() >= self.max_response_bytes {
                log_debug!(
                    "Response from {} exceeded {} bytes, truncating",
                    server,
                    self.max_response_bytes
                );
                raw.truncate(self.max_response_bytes);
                break;
            }
        }

        log_debug!("Received {} bytes from {}", raw.len(), server);

        let response = String::from_utf8_lossy(&raw).into_owned();
        if response.trim().is_empty() {
            return Err(LookupError::EmptyResponse(server.to_string()));
        }
        Ok(response)
    }
}
