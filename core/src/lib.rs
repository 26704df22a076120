/*
 * lib.rs
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

//! Wirefetch core: a minimal HTTP/1.1 client.
//!
//! Given a URL, method, optional headers and body, it connects over TCP or TLS, sends one
//! HTTP/1.1 request and parses the reply into a [`Response`], handling chunked
//! transfer-encoding, gzip content-encoding and 301/302 redirects, with every network step
//! bounded by the configured timeout.
//!
//! ```no_run
//! # async fn demo() -> wirefetch_core::Result<()> {
//! let response = wirefetch_core::request("http://example.com/", "GET", None, None, 10, 5).await?;
//! println!("{} {}", response.status_code(), response.status_description());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod net;
pub mod protocol;
pub mod uri;

pub use config::{ClientConfig, DeadlinePolicy};
pub use error::{Error, ErrorKind, Result};
pub use protocol::http::client::request;
pub use protocol::http::{blocking, Headers, HttpClient, Method, Response};
