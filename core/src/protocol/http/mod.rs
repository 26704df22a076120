/*
 * mod.rs
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

//! HTTP client: HTTP/1.1 over plain TCP or TLS, one connection per request.
//!
//! Design:
//! - `request` builds the request message; `h1` parses the response with a push parser fed
//!   from a `bytes::BytesMut` read buffer.
//! - `connection` owns the socket and runs every connect/write/read step through `deadline`.
//! - `client` chains attempts to follow 301/302 redirects for GET and HEAD.
//! - Responses are all-or-nothing: a caller gets a complete response or an `Error`.

mod headers;
mod request;
mod response;

pub mod blocking;
pub mod client;
pub mod connection;
pub mod deadline;
pub mod h1;
pub mod redirect;

pub use client::HttpClient;
pub use connection::{HttpConnection, HttpStream};
pub use deadline::{Deadline, Step};
pub use headers::Headers;
pub use request::{Method, Request, RequestBuilder};
pub use response::Response;
