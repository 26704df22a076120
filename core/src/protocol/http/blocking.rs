/*
 * blocking.rs
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

//! Blocking wrapper. Every hop of a redirect chain runs on its own current-thread runtime,
//! which is dropped together with that hop's connection before the next hop starts.

use bytes::Bytes;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::protocol::http::client::{log_hop, HttpClient};
use crate::protocol::http::headers::Headers;
use crate::protocol::http::request::Method;
use crate::protocol::http::response::Response;
use crate::uri::parse_http_url;

/// Same as `client::request`, for callers without an async runtime. Must not be called from
/// inside a tokio runtime.
pub fn request(
    url: &str,
    method: &str,
    headers: Option<&Headers>,
    body: Option<&[u8]>,
    timeout_seconds: u64,
    max_redirects: u32,
) -> Result<Response> {
    let config = ClientConfig::new()
        .timeout(Duration::from_secs(timeout_seconds))
        .max_redirects(max_redirects);
    request_with(&HttpClient::new(config), url, method, headers, body)
}

/// Blocking request with an explicit client configuration.
pub fn request_with(
    client: &HttpClient,
    url: &str,
    method: &str,
    headers: Option<&Headers>,
    body: Option<&[u8]>,
) -> Result<Response> {
    let method = Method::from(method);
    let body = body.map(Bytes::copy_from_slice).unwrap_or_default();
    let mut url = url.to_string();
    let mut hop = 0u32;
    loop {
        let target = parse_http_url(&url)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(Error::Connect)?;
        let response =
            runtime.block_on(client.send(&url, &target, &method, headers, body.clone()))?;
        drop(runtime);
        match client.next_hop(&method, &target, &response, hop) {
            Some(next) => {
                log_hop(hop, &response, &url, &next);
                url = next;
                hop += 1;
            }
            None => return Ok(response),
        }
    }
}
