/*
 * connection.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Wirefetch, a minimal HTTP/1.1 client.
 *
 * Wirefetch is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Wirefetch is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Wirefetch.  If not, see <http://www.gnu.org/licenses/>.
 */

//! HTTP connection: one TCP or TLS stream, opened for a single request/response exchange.
//!
//! Every network step goes through the attempt's `Deadline`. The connection is consumed by
//! `exchange`, so the socket is closed on every return path, success or error.

use bytes::BytesMut;
use log::{debug, trace};
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadBuf};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream as TokioTlsStream;
use tokio_rustls::TlsConnector;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::net::{http_client_config, resolve_endpoint, server_name};
use crate::protocol::http::deadline::{Deadline, Step};
use crate::protocol::http::h1::{Progress, ResponseParser};
use crate::protocol::http::request::Request;
use crate::protocol::http::response::Response;
use crate::uri::{HttpUrl, Scheme};

const READ_CHUNK: usize = 8192;

/// Unified stream: plain TCP or TLS. Implements AsyncRead + AsyncWrite.
pub enum HttpStream {
    Plain(TcpStream),
    Tls(Box<TokioTlsStream<TcpStream>>),
}

impl AsyncRead for HttpStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match &mut *self {
            HttpStream::Plain(s) => Pin::new(s).poll_read(cx, buf),
            HttpStream::Tls(s) => Pin::new(s.as_mut()).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for HttpStream {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match &mut *self {
            HttpStream::Plain(s) => Pin::new(s).poll_write(cx, buf),
            HttpStream::Tls(s) => Pin::new(s.as_mut()).poll_write(cx, buf),
        }
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match &mut *self {
            HttpStream::Plain(s) => Pin::new(s).poll_flush(cx),
            HttpStream::Tls(s) => Pin::new(s.as_mut()).poll_flush(cx),
        }
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match &mut *self {
            HttpStream::Plain(s) => Pin::new(s).poll_shutdown(cx),
            HttpStream::Tls(s) => Pin::new(s.as_mut()).poll_shutdown(cx),
        }
    }
}

/// Open connection to one endpoint, plus the bytes read but not yet parsed.
pub struct HttpConnection {
    stream: HttpStream,
    read_buf: BytesMut,
}

impl HttpConnection {
    /// Resolve the host, connect, and for https run the TLS handshake with SNI. Resolution,
    /// TCP connect and handshake are all connect steps under the deadline.
    pub async fn open(url: &HttpUrl, config: &ClientConfig, deadline: &Deadline) -> Result<Self> {
        let addr = deadline
            .run(Step::Connect, resolve_endpoint(&url.host, url.port))
            .await?;
        debug!("connecting to {} ({})", url.authority(), addr);
        let tcp = deadline.run(Step::Connect, TcpStream::connect(addr)).await?;
        if let Err(e) = tcp.set_nodelay(true) {
            debug!("set_nodelay on {} failed: {}", addr, e);
        }

        let stream = match url.scheme {
            Scheme::Http => HttpStream::Plain(tcp),
            Scheme::Https => {
                let tls_config = http_client_config(config.verify_tls).map_err(Error::Connect)?;
                let name = server_name(&url.host).map_err(Error::Connect)?;
                let connector = TlsConnector::from(tls_config);
                let tls = deadline
                    .run(Step::Connect, async {
                        connector.connect(name, tcp).await.map_err(|e| {
                            io::Error::new(io::ErrorKind::ConnectionRefused, e)
                        })
                    })
                    .await?;
                trace!("TLS handshake with {} complete", url.host);
                HttpStream::Tls(Box::new(tls))
            }
        };
        Ok(Self {
            stream,
            read_buf: BytesMut::with_capacity(READ_CHUNK),
        })
    }

    /// Wrap an already-connected stream.
    pub fn from_stream(stream: HttpStream) -> Self {
        Self {
            stream,
            read_buf: BytesMut::with_capacity(READ_CHUNK),
        }
    }

    /// Send the request, then read until the parser completes. Consumes the connection.
    pub async fn exchange(
        mut self,
        request: &Request,
        mut parser: ResponseParser,
        deadline: &Deadline,
    ) -> Result<Response> {
        self.write_request(request, deadline).await?;
        loop {
            if parser.receive(&mut self.read_buf)? == Progress::Done {
                break;
            }
            let mut tmp = [0u8; READ_CHUNK];
            let n = deadline.run(Step::Read, self.stream.read(&mut tmp)).await?;
            trace!("read {} bytes", n);
            if n == 0 {
                parser.eof()?;
                break;
            }
            self.read_buf.extend_from_slice(&tmp[..n]);
        }
        parser.into_response().ok_or_else(|| {
            Error::Read(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "response incomplete",
            ))
        })
    }

    async fn write_request(&mut self, request: &Request, deadline: &Deadline) -> Result<()> {
        let bytes = request.to_bytes();
        trace!(
            "writing {} {} ({} bytes)",
            request.method().as_str(),
            request.target(),
            bytes.len()
        );
        let stream = &mut self.stream;
        deadline
            .run(Step::Write, async {
                stream.write_all(&bytes).await?;
                stream.flush().await
            })
            .await
    }
}
