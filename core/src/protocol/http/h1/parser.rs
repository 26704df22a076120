/*
 * parser.rs
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

//! HTTP/1.1 response push parser: status line, headers, body (Content-Length, chunked or
//! none), then gzip inflation.
//!
//! The parser never touches the transport. The connection feeds it whatever bytes it has;
//! `receive` consumes complete tokens and reports whether it needs more input. States only
//! move forward:
//!
//! `StatusLine → Headers → {FixedLength | ChunkSize ⇄ ChunkData → ChunkEnd} → Done`
//!
//! Framing is chosen when the blank line after the headers is seen; a 4xx/5xx status fails
//! there without reading any body. Inflation happens on the transition into `Done`.

use bytes::{Buf, Bytes, BytesMut};
use log::trace;
use std::io;

use crate::error::{Error, Result};
use crate::protocol::http::h1::decode::inflate_gzip;
use crate::protocol::http::headers::Headers;
use crate::protocol::http::response::Response;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    StatusLine,
    Headers,
    FixedLength,
    ChunkSize,
    ChunkData,
    /// Zero-size chunk seen; waiting for the CRLF that follows it.
    ChunkEnd,
    Done,
}

/// Result of feeding bytes to the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    NeedMore,
    Done,
}

/// Push parser for one HTTP/1.1 response.
pub struct ResponseParser {
    state: ParseState,
    /// HEAD responses never have a body, whatever the headers say.
    head_request: bool,
    max_head_bytes: usize,
    head_bytes: usize,
    /// Bytes still owed by the current chunk or by Content-Length.
    remaining: usize,
    response: Response,
    body: BytesMut,
}

impl ResponseParser {
    pub fn new(max_head_bytes: usize) -> Self {
        Self {
            state: ParseState::StatusLine,
            head_request: false,
            max_head_bytes,
            head_bytes: 0,
            remaining: 0,
            response: Response::default(),
            body: BytesMut::new(),
        }
    }

    /// Parser for the response to a HEAD request.
    pub fn for_head(max_head_bytes: usize) -> Self {
        Self {
            head_request: true,
            ..Self::new(max_head_bytes)
        }
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Find the next line in buf: returns (content length without terminator, bytes to consume).
    /// Accepts CRLF and bare LF.
    fn find_line(buf: &[u8]) -> Option<(usize, usize)> {
        let lf = buf.iter().position(|&b| b == b'\n')?;
        let end = if lf > 0 && buf[lf - 1] == b'\r' { lf - 1 } else { lf };
        Some((end, lf + 1))
    }

    /// Take one head line (status line or header) from buf, enforcing the head ceiling.
    fn take_head_line(&mut self, buf: &mut BytesMut) -> Result<Option<Bytes>> {
        match Self::find_line(buf) {
            Some((end, consume)) => {
                self.head_bytes += consume;
                if self.head_bytes > self.max_head_bytes {
                    return Err(Error::HeadTooLarge(self.max_head_bytes));
                }
                let mut line = buf.split_to(consume);
                line.truncate(end);
                Ok(Some(line.freeze()))
            }
            None => {
                if self.head_bytes + buf.len() > self.max_head_bytes {
                    return Err(Error::HeadTooLarge(self.max_head_bytes));
                }
                Ok(None)
            }
        }
    }

    /// Consume and parse as much as possible from buf. Unconsumed bytes stay in buf.
    pub fn receive(&mut self, buf: &mut BytesMut) -> Result<Progress> {
        loop {
            match self.state {
                ParseState::StatusLine => {
                    let line = match self.take_head_line(buf)? {
                        Some(line) => line,
                        None => return Ok(Progress::NeedMore),
                    };
                    self.parse_status_line(&line)?;
                    self.state = ParseState::Headers;
                }
                ParseState::Headers => {
                    let line = match self.take_head_line(buf)? {
                        Some(line) => line,
                        None => return Ok(Progress::NeedMore),
                    };
                    if line.is_empty() {
                        self.determine_framing()?;
                        continue;
                    }
                    let line = String::from_utf8_lossy(&line);
                    // Lines without a colon are ignored.
                    if let Some((name, value)) = line.split_once(':') {
                        self.response
                            .headers
                            .set(name.trim().to_ascii_lowercase(), value.trim());
                    }
                }
                ParseState::FixedLength => {
                    let take = self.remaining.min(buf.len());
                    self.body.extend_from_slice(&buf.split_to(take));
                    self.remaining -= take;
                    if self.remaining > 0 {
                        return Ok(Progress::NeedMore);
                    }
                    self.finish()?;
                }
                ParseState::ChunkSize => {
                    let (end, consume) = match Self::find_line(buf) {
                        Some(found) => found,
                        None => return Ok(Progress::NeedMore),
                    };
                    let size = parse_chunk_size(&buf[..end])?;
                    buf.advance(consume);
                    trace!("chunk of {} bytes", size);
                    if size == 0 {
                        self.state = ParseState::ChunkEnd;
                    } else {
                        self.remaining = size;
                        self.state = ParseState::ChunkData;
                    }
                }
                ParseState::ChunkData => {
                    // Chunk data plus its trailing CRLF.
                    let needed = self.remaining.saturating_add(2);
                    if buf.len() < needed {
                        return Ok(Progress::NeedMore);
                    }
                    self.body.extend_from_slice(&buf[..self.remaining]);
                    buf.advance(needed);
                    self.remaining = 0;
                    self.state = ParseState::ChunkSize;
                }
                ParseState::ChunkEnd => {
                    // Trailer section is not parsed.
                    if buf.len() < 2 {
                        return Ok(Progress::NeedMore);
                    }
                    buf.advance(2);
                    self.finish()?;
                }
                ParseState::Done => return Ok(Progress::Done),
            }
        }
    }

    /// The transport reached end of stream. Fine once Done. A close in the head is a read
    /// error; a close inside a framed body breaks the framing.
    pub fn eof(&self) -> Result<()> {
        let what = match self.state {
            ParseState::Done => return Ok(()),
            ParseState::StatusLine => "before status line",
            ParseState::Headers => "inside header block",
            ParseState::FixedLength => {
                return Err(Error::InvalidFraming(format!(
                    "connection closed with {} of {} body bytes",
                    self.body.len(),
                    self.body.len() + self.remaining
                )))
            }
            ParseState::ChunkSize | ParseState::ChunkData | ParseState::ChunkEnd => {
                return Err(Error::InvalidFraming(
                    "connection closed inside chunked body".to_string(),
                ))
            }
        };
        Err(Error::Read(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("connection closed {}", what),
        )))
    }

    /// The completed response. Only valid once `receive` has returned `Progress::Done`.
    pub fn into_response(self) -> Option<Response> {
        (self.state == ParseState::Done).then_some(self.response)
    }

    fn parse_status_line(&mut self, line: &[u8]) -> Result<()> {
        let line = std::str::from_utf8(line)
            .map_err(|_| Error::MalformedStatusLine(String::from_utf8_lossy(line).into_owned()))?
            .trim();
        let mut tokens = line.split(' ').filter(|t| !t.is_empty());
        let (protocol, code) = match (tokens.next(), tokens.next()) {
            (Some(p), Some(c)) => (p, c),
            _ => return Err(Error::MalformedStatusLine(line.to_string())),
        };
        if !protocol.starts_with("HTTP/") {
            return Err(Error::MalformedStatusLine(line.to_string()));
        }
        self.response.protocol = protocol.to_string();
        self.response.status_code = code.to_string();
        self.response.status_description = tokens.collect::<Vec<_>>().join(" ");
        Ok(())
    }

    fn determine_framing(&mut self) -> Result<()> {
        let code = self.response.status_code.as_str();
        if code.starts_with('4') || code.starts_with('5') {
            return Err(Error::HttpStatus {
                code: code.to_string(),
                description: self.response.status_description.clone(),
            });
        }
        let headers = &self.response.headers;
        if self.head_request || is_bodyless_status(code) {
            trace!("framing: none ({} {})", if self.head_request { "HEAD" } else { "status" }, code);
            return self.finish();
        }
        if is_chunked(headers) {
            trace!("framing: chunked");
            self.state = ParseState::ChunkSize;
            return Ok(());
        }
        match headers.get("content-length").filter(|v| !v.is_empty()) {
            Some(value) => {
                let length = value.trim().parse::<usize>().map_err(|_| {
                    Error::InvalidFraming(format!("content-length {:?}", value))
                })?;
                trace!("framing: content-length {}", length);
                self.remaining = length;
                self.body.reserve(length.min(1 << 20));
                self.state = ParseState::FixedLength;
                Ok(())
            }
            None => {
                trace!("framing: no body");
                self.finish()
            }
        }
    }

    /// Inflate if gzip-encoded, attach the body, enter Done.
    fn finish(&mut self) -> Result<()> {
        let body = std::mem::take(&mut self.body).freeze();
        let gzip = self
            .response
            .headers
            .get("content-encoding")
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("gzip"));
        self.response.body = if gzip && !body.is_empty() {
            inflate_gzip(&body)?
        } else {
            body
        };
        self.state = ParseState::Done;
        Ok(())
    }
}

/// 1xx, 204 and 304 never carry a body.
fn is_bodyless_status(code: &str) -> bool {
    code.starts_with('1') || code == "204" || code == "304"
}

/// `transfer-encoding` whose final coding is `chunked`.
fn is_chunked(headers: &Headers) -> bool {
    headers
        .get("transfer-encoding")
        .and_then(|v| v.rsplit(',').next())
        .is_some_and(|last| last.trim().eq_ignore_ascii_case("chunked"))
}

/// Hex chunk size; extensions after `;` are ignored.
fn parse_chunk_size(line: &[u8]) -> Result<usize> {
    let text = String::from_utf8_lossy(line);
    let hex = text.split(';').next().unwrap_or("").trim();
    usize::from_str_radix(hex, 16)
        .map_err(|_| Error::InvalidFraming(format!("chunk size {:?}", hex)))
}
