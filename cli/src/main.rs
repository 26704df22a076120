/*
 * main.rs
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

//! wirefetch: request each URL in turn and write the serialised response of URL i to
//! `<output-dir>/<i>`. Failures are logged and do not stop the run; the exit status is
//! non-zero if any request failed.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{error, info, LevelFilter};
use wirefetch_core::{ClientConfig, DeadlinePolicy, Headers, HttpClient};

#[derive(Debug, Parser)]
#[command(name = "wirefetch", version, about = "Fetch URLs over HTTP/1.1 and save the responses")]
struct Args {
    /// URLs to fetch (http or https).
    #[arg(required = true)]
    urls: Vec<String>,

    /// Request method, sent as written.
    #[arg(short = 'X', long, default_value = "GET")]
    method: String,

    /// Extra request header, "Name: value". Repeatable.
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    /// Request body.
    #[arg(short = 'd', long)]
    data: Option<String>,

    /// Timeout in seconds for each connect, write and read step.
    #[arg(short, long, default_value_t = 30)]
    timeout: u64,

    /// Highest redirect hop that is still followed.
    #[arg(long, default_value_t = 5)]
    max_redirects: u32,

    /// Do not verify server certificates.
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Spend one timeout across the whole attempt instead of per step.
    #[arg(long)]
    shared_deadline: bool,

    /// Directory for response files.
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Log debug output (overrides RUST_LOG).
    #[arg(short, long)]
    verbose: bool,
}

fn init_logger(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    );
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn parse_header(raw: &str) -> Result<(String, String)> {
    match raw.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => bail!("header must look like \"Name: value\": {:?}", raw),
    }
}

fn client_config(args: &Args) -> ClientConfig {
    let mut config = ClientConfig::new()
        .timeout(Duration::from_secs(args.timeout))
        .max_redirects(args.max_redirects);
    if args.shared_deadline {
        config = config.deadline_policy(DeadlinePolicy::Shared);
    }
    if args.insecure {
        config = config.danger_accept_invalid_certs();
    }
    config
}

async fn fetch_one(
    client: &HttpClient,
    args: &Args,
    headers: &Headers,
    url: &str,
    out: &Path,
) -> Result<()> {
    let body = args.data.clone().unwrap_or_default().into_bytes();
    let headers = (!headers.is_empty()).then_some(headers);
    let response = client
        .request(url, args.method.as_str(), headers, body)
        .await
        .with_context(|| format!("request to {} failed", url))?;
    info!(
        "{} -> {} {} ({} bytes)",
        url,
        response.status_code(),
        response.status_description(),
        response.body().len()
    );
    fs::write(out, response.to_bytes())
        .with_context(|| format!("could not write {}", out.display()))?;
    Ok(())
}

async fn run(args: Args) -> Result<bool> {
    let headers = args
        .headers
        .iter()
        .map(|h| parse_header(h))
        .collect::<Result<Headers>>()?;
    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("could not create {}", args.output_dir.display()))?;
    let client = HttpClient::new(client_config(&args));

    let mut all_ok = true;
    for (i, url) in args.urls.iter().enumerate() {
        let out = args.output_dir.join(i.to_string());
        if let Err(e) = fetch_one(&client, &args, &headers, url, &out).await {
            error!("{:#}", e);
            all_ok = false;
        }
    }
    Ok(all_ok)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.verbose);
    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(2)
        }
    }
}
