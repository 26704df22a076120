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

//! HTTP/1.1 wire handling: response parser and body content-coding.

pub mod decode;
mod parser;

pub use parser::{ParseState, Progress, ResponseParser};
