/*
 * decode.rs
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

//! Content-coding for response bodies. Only gzip is understood.

use std::io::Read;

use bytes::Bytes;
use flate2::read::MultiGzDecoder;

use crate::error::{Error, Result};

/// Inflate a complete gzip stream (concatenated members are joined).
pub fn inflate_gzip(data: &[u8]) -> Result<Bytes> {
    let mut out = Vec::with_capacity(data.len().saturating_mul(4));
    MultiGzDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(Error::Decompression)?;
    Ok(Bytes::from(out))
}
