/*
 * request.rs
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

//! HTTP request: method, target, headers, body.
//!
//! Built once per attempt via RequestBuilder and serialised with `to_bytes`. Header values
//! are written exactly as supplied; nothing is escaped or validated.

use bytes::{BufMut, Bytes, BytesMut};

use crate::protocol::http::headers::Headers;

pub const HTTP_1_1: &str = "HTTP/1.1";

/// HTTP request method. Sent on the wire exactly as spelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Patch,
    Other(String),
}

impl Method {
    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Patch => "PATCH",
            Method::Other(s) => s,
        }
    }

    /// GET or HEAD in any case: the methods for which 301/302 are followed.
    pub fn follows_redirects(&self) -> bool {
        let m = self.as_str();
        m.eq_ignore_ascii_case("GET") || m.eq_ignore_ascii_case("HEAD")
    }

    /// HEAD in any case: responses never carry a body.
    pub fn is_head(&self) -> bool {
        self.as_str().eq_ignore_ascii_case("HEAD")
    }
}

impl From<&str> for Method {
    fn from(s: &str) -> Self {
        match s {
            "GET" => Method::Get,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "DELETE" => Method::Delete,
            "HEAD" => Method::Head,
            "OPTIONS" => Method::Options,
            "PATCH" => Method::Patch,
            other => Method::Other(other.to_string()),
        }
    }
}

impl From<String> for Method {
    fn from(s: String) -> Self {
        Method::from(s.as_str())
    }
}

/// Immutable request, owned by the attempt that built it.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    target: String,
    protocol: &'static str,
    headers: Headers,
    body: Bytes,
}

impl Request {
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request target as written on the request line (the full URL).
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn protocol(&self) -> &str {
        self.protocol
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// `METHOD SP TARGET SP PROTOCOL CRLF`, `Name:Value CRLF` per header, `CRLF`, body.
    pub fn to_bytes(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(256 + self.body.len());
        out.put_slice(self.method.as_str().as_bytes());
        out.put_u8(b' ');
        out.put_slice(self.target.as_bytes());
        out.put_u8(b' ');
        out.put_slice(self.protocol.as_bytes());
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

/// Assembles a Request: `Host` from the resolved authority, `Content-Length` for a
/// non-empty body, then the caller's headers on top (case-insensitive overwrite).
pub struct RequestBuilder {
    method: Method,
    target: String,
    host: String,
    headers: Option<Headers>,
    body: Bytes,
}

impl RequestBuilder {
    pub fn new(method: Method, target: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            method,
            target: target.into(),
            host: host.into(),
            headers: None,
            body: Bytes::new(),
        }
    }

    /// Caller headers; each entry overwrites a same-named header set by the builder.
    pub fn headers(mut self, headers: Option<&Headers>) -> Self {
        self.headers = headers.cloned();
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn build(self) -> Request {
        let mut headers = Headers::new();
        headers.set("Host", self.host);
        let caller_frames_body = self.headers.as_ref().is_some_and(|h| {
            h.contains("content-length") || h.contains("transfer-encoding")
        });
        if !self.body.is_empty() && !caller_frames_body {
            headers.set("Content-Length", self.body.len().to_string());
        }
        if let Some(extra) = &self.headers {
            headers.extend_from(extra);
        }
        Request {
            method: self.method,
            target: self.target,
            protocol: HTTP_1_1,
            headers,
            body: self.body,
        }
    }
}
