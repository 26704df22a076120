/*
 * redirect.rs
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

//! Redirect handling: which responses are followed and where they lead.

use crate::protocol::http::request::Method;
use crate::protocol::http::response::Response;
use crate::uri::HttpUrl;

/// A 301/302 answer to GET or HEAD (any case) is followed while `hop <= max_redirects`.
/// `hop` counts the redirects already followed, so at most `max_redirects + 1` are chased.
pub fn should_follow(method: &Method, response: &Response, hop: u32, max_redirects: u32) -> bool {
    hop <= max_redirects && response.is_redirect() && method.follows_redirects()
}

/// Absolute URL named by the `Location` header, or None if there is none.
///
/// Values with an http/https scheme are used as they are; `//host/path` takes the current
/// scheme; anything else is a path on the current origin.
pub fn redirect_target(current: &HttpUrl, response: &Response) -> Option<String> {
    let location = response.header("location")?.trim();
    if location.is_empty() {
        return None;
    }
    let lower = location.get(..8).unwrap_or(location).to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Some(location.to_string());
    }
    if location.starts_with("//") {
        return Some(format!("{}:{}", current.scheme, location));
    }
    if location.starts_with('/') {
        Some(format!("{}{}", current.origin(), location))
    } else {
        Some(format!("{}/{}", current.origin(), location))
    }
}
