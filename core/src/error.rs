/*
 * error.rs
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

//! Request errors. Every variant is terminal for the attempt that raised it; the
//! connection owned by that attempt has already been dropped when the caller sees one.

use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors from URL resolution, transport, or response parsing.
#[derive(Debug, Error)]
pub enum Error {
    /// URL could not be split into scheme, host and port.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// URL has a scheme other than http or https.
    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("connect error: {0}")]
    Connect(#[source] io::Error),

    #[error("connect timeout")]
    ConnectTimeout,

    #[error("write error: {0}")]
    Write(#[source] io::Error),

    #[error("write timeout")]
    WriteTimeout,

    #[error("read error: {0}")]
    Read(#[source] io::Error),

    #[error("read timeout")]
    ReadTimeout,

    /// First line of the response is not `HTTP/x CODE [DESCRIPTION]`.
    #[error("malformed status line: {0:?}")]
    MalformedStatusLine(String),

    /// Server answered with a 4xx or 5xx status. The body is not read.
    #[error("HTTP error {code}: {description}")]
    HttpStatus { code: String, description: String },

    /// `content-encoding: gzip` body could not be inflated.
    #[error("gzip decompression failed: {0}")]
    Decompression(#[source] io::Error),

    /// Body framing is unusable: bad content-length, bad chunk size, or early close.
    #[error("invalid body framing: {0}")]
    InvalidFraming(String),

    /// Status line and header block exceeded the configured ceiling.
    #[error("response head exceeds {0} bytes")]
    HeadTooLarge(usize),
}

/// Fieldless mirror of [`Error`] for matching on the kind alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidUrl,
    UnsupportedScheme,
    ConnectError,
    ConnectTimeout,
    WriteError,
    WriteTimeout,
    ReadError,
    ReadTimeout,
    MalformedStatusLine,
    HttpStatusError,
    DecompressionError,
    InvalidFraming,
    HeadTooLarge,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidUrl(_) => ErrorKind::InvalidUrl,
            Error::UnsupportedScheme(_) => ErrorKind::UnsupportedScheme,
            Error::Connect(_) => ErrorKind::ConnectError,
            Error::ConnectTimeout => ErrorKind::ConnectTimeout,
            Error::Write(_) => ErrorKind::WriteError,
            Error::WriteTimeout => ErrorKind::WriteTimeout,
            Error::Read(_) => ErrorKind::ReadError,
            Error::ReadTimeout => ErrorKind::ReadTimeout,
            Error::MalformedStatusLine(_) => ErrorKind::MalformedStatusLine,
            Error::HttpStatus { .. } => ErrorKind::HttpStatusError,
            Error::Decompression(_) => ErrorKind::DecompressionError,
            Error::InvalidFraming(_) => ErrorKind::InvalidFraming,
            Error::HeadTooLarge(_) => ErrorKind::HeadTooLarge,
        }
    }

    /// True for the three deadline expiries.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Error::ConnectTimeout | Error::WriteTimeout | Error::ReadTimeout
        )
    }
}
