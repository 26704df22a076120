/*
 * response.rs
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

//! Completed HTTP response: status line, lowercased headers, body (de-chunked and inflated).

use std::borrow::Cow;

use bytes::{BufMut, Bytes, BytesMut};

use crate::protocol::http::headers::Headers;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub(crate) protocol: String,
    pub(crate) status_code: String,
    pub(crate) status_description: String,
    pub(crate) headers: Headers,
    pub(crate) body: Bytes,
}

impl Response {
    /// Protocol label from the status line, e.g. `HTTP/1.1`.
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// Status code exactly as received.
    pub fn status_code(&self) -> &str {
        &self.status_code
    }

    /// Status code as a number, if it is one.
    pub fn status(&self) -> Option<u16> {
        self.status_code.parse().ok()
    }

    pub fn status_description(&self) -> &str {
        &self.status_description
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Body as UTF-8, invalid sequences replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// 301 or 302.
    pub fn is_redirect(&self) -> bool {
        self.status_code == "301" || self.status_code == "302"
    }

    /// Re-serialise as `PROTOCOL SP CODE SP DESCRIPTION CRLF`, `name:value CRLF` per header,
    /// `CRLF`, body. The body is the decoded one, so framing headers may no longer match it.
    pub fn to_bytes(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(256 + self.body.len());
        out.put_slice(self.protocol.as_bytes());
        out.put_u8(b' ');
        out.put_slice(self.status_code.as_bytes());
        out.put_u8(b' ');
        out.put_slice(self.status_description.as_bytes());
        out.put_slice(b"\r\n");
        for (name, value) in self.headers.iter() {
            out.put_slice(name.as_bytes());
            out.put_u8(b':');
            out.put_slice(value.as_bytes());
            out.put_slice(b"\r\n");
        }
        out.put_slice(b"\r\n");
        out.put_slice(&self.body);
        out.freeze()
    }
}
