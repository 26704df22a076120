/*
 * client.rs
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

//! HTTP client: resolve the URL, connect, send one request, parse the response, and chase
//! 301/302 redirects. Each hop is a fresh attempt with its own connection and deadline.

use std::time::Duration;

use bytes::Bytes;
use log::debug;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::protocol::http::connection::HttpConnection;
use crate::protocol::http::deadline::Deadline;
use crate::protocol::http::h1::ResponseParser;
use crate::protocol::http::headers::Headers;
use crate::protocol::http::redirect::{redirect_target, should_follow};
use crate::protocol::http::request::{Method, RequestBuilder};
use crate::protocol::http::response::Response;
use crate::uri::{parse_http_url, HttpUrl};

/// HTTP client. Holds configuration only; no connections are kept between requests, so one
/// client may serve any number of concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    config: ClientConfig,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Issue a request and follow redirects. The returned response is the last one in the
    /// chain; earlier redirect responses are discarded.
    pub async fn request(
        &self,
        url: &str,
        method: impl Into<Method>,
        headers: Option<&Headers>,
        body: impl Into<Bytes>,
    ) -> Result<Response> {
        let method = method.into();
        let body = body.into();
        let mut url = url.to_string();
        let mut hop = 0u32;
        loop {
            let target = parse_http_url(&url)?;
            let response = self
                .send(&url, &target, &method, headers, body.clone())
                .await?;
            match self.next_hop(&method, &target, &response, hop) {
                Some(next) => {
                    log_hop(hop, &response, &url, &next);
                    url = next;
                    hop += 1;
                }
                None => return Ok(response),
            }
        }
    }

    /// One request/response exchange on a new connection, no redirect handling.
    pub async fn attempt(
        &self,
        url: &str,
        method: &Method,
        headers: Option<&Headers>,
        body: Bytes,
    ) -> Result<Response> {
        let target = parse_http_url(url)?;
        self.send(url, &target, method, headers, body).await
    }

    /// URL to fetch next if `response`, received at redirect `hop`, is to be followed.
    pub fn next_hop(
        &self,
        method: &Method,
        current: &HttpUrl,
        response: &Response,
        hop: u32,
    ) -> Option<String> {
        if !should_follow(method, response, hop, self.config.max_redirects) {
            return None;
        }
        redirect_target(current, response)
    }

    pub(crate) async fn send(
        &self,
        url: &str,
        target: &HttpUrl,
        method: &Method,
        headers: Option<&Headers>,
        body: Bytes,
    ) -> Result<Response> {
        let deadline = Deadline::start(self.config.deadline_policy, self.config.timeout);
        let request = RequestBuilder::new(method.clone(), url, target.authority())
            .headers(headers)
            .body(body)
            .build();
        let parser = if method.is_head() {
            ResponseParser::for_head(self.config.max_head_bytes)
        } else {
            ResponseParser::new(self.config.max_head_bytes)
        };
        let connection = HttpConnection::open(target, &self.config, &deadline).await?;
        connection.exchange(&request, parser, &deadline).await
    }
}

pub(crate) fn log_hop(hop: u32, response: &Response, from: &str, to: &str) {
    debug!(
        "redirect {} ({}): {} -> {}",
        hop + 1,
        response.status_code(),
        from,
        to
    );
}

/// One-shot request with default settings apart from the timeout and redirect ceiling.
/// `timeout_seconds` bounds each connect, write and read step separately.
pub async fn request(
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
    let body = body.map(Bytes::copy_from_slice).unwrap_or_default();
    HttpClient::new(config)
        .request(url, method, headers, body)
        .await
}
