/*
 * uri.rs
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

//! http/https URL resolution: scheme, host and port (authority only; the path is never
//! interpreted, the full URL is sent as the request target).

use std::fmt;

use crate::error::{Error, Result};

/// Supported URL schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }

    pub fn is_secure(&self) -> bool {
        matches!(self, Scheme::Https)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scheme, host and port of an http or https URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpUrl {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
}

impl HttpUrl {
    /// `host` or `host:port` when the port is not the scheme default.
    pub fn authority(&self) -> String {
        if self.port == self.scheme.default_port() {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// `scheme://authority`, without trailing slash.
    pub fn origin(&self) -> String {
        format!("{}://{}", self.scheme, self.authority())
    }
}

/// Split an http/https URL into scheme, host and port.
///
/// The authority ends at the first `/`, `?` or `#` after `://`; without one the whole
/// remainder is the authority (path `/`). A `:` inside the authority separates an explicit
/// port; otherwise the scheme default applies.
pub fn parse_http_url(url: &str) -> Result<HttpUrl> {
    let url = url.trim();
    let (scheme_str, rest) = url
        .split_once("://")
        .ok_or_else(|| Error::InvalidUrl(url.to_string()))?;
    if scheme_str.is_empty()
        || !scheme_str
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'-' || b == b'.')
    {
        return Err(Error::InvalidUrl(url.to_string()));
    }
    let scheme = if scheme_str.eq_ignore_ascii_case("http") {
        Scheme::Http
    } else if scheme_str.eq_ignore_ascii_case("https") {
        Scheme::Https
    } else {
        return Err(Error::UnsupportedScheme(scheme_str.to_string()));
    };

    let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let authority = &rest[..authority_end];

    let (host, port) = match authority.find(':') {
        Some(colon) => {
            let port_str = &authority[colon + 1..];
            let port = port_str
                .parse::<u16>()
                .map_err(|_| Error::InvalidUrl(url.to_string()))?;
            (&authority[..colon], port)
        }
        None => (authority, scheme.default_port()),
    };
    if host.is_empty() {
        return Err(Error::InvalidUrl(url.to_string()));
    }

    Ok(HttpUrl {
        scheme,
        host: host.to_string(),
        port,
    })
}
