/*
 * net.rs
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

//! Network helpers: endpoint resolution and rustls client configuration.
//!
//! Certificates are verified against the platform's native roots, with webpki-roots as the
//! fallback when none can be loaded. Verification can be switched off per client; the
//! handshake signatures are still checked in that mode, only the certificate chain and the
//! name match are skipped.

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, OnceLock};

use log::debug;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{verify_tls12_signature, verify_tls13_signature, CryptoProvider};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};
use tokio::net::lookup_host;

/// Resolve host:port to one socket address.
///
/// Among the DNS results the first whose port equals `port` is used. If resolution fails or
/// yields nothing usable, the host string itself is tried as a literal IP address.
pub async fn resolve_endpoint(host: &str, port: u16) -> io::Result<SocketAddr> {
    match lookup_host((host, port)).await {
        Ok(addrs) => {
            if let Some(addr) = addrs.into_iter().find(|a| a.port() == port) {
                return Ok(addr);
            }
            debug!("no usable address for {} in DNS answer", host);
        }
        Err(e) => debug!("resolving {} failed: {}", host, e),
    }
    host.parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, port))
        .map_err(|_| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("could not resolve host {}", host),
            )
        })
}

fn crypto_provider() -> Arc<CryptoProvider> {
    Arc::new(rustls::crypto::ring::default_provider())
}

/// Build a root certificate store: platform native certs first, then webpki-roots as fallback.
fn build_root_store() -> RootCertStore {
    let mut root_store = RootCertStore::empty();
    let native = rustls_native_certs::load_native_certs();
    for e in &native.errors {
        debug!("native root certificates: {}", e);
    }
    for cert in native.certs {
        let _ = root_store.add(cert);
    }
    if root_store.is_empty() {
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    }
    root_store
}

/// Accepts any server certificate. Handshake signatures are still verified.
#[derive(Debug)]
struct AcceptAnyCertificate {
    provider: Arc<CryptoProvider>,
}

impl ServerCertVerifier for AcceptAnyCertificate {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}

fn build_client_config(verify: bool) -> io::Result<Arc<ClientConfig>> {
    let provider = crypto_provider();
    let builder = ClientConfig::builder_with_provider(provider.clone())
        .with_safe_default_protocol_versions()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    let mut config = if verify {
        builder
            .with_root_certificates(build_root_store())
            .with_no_client_auth()
    } else {
        builder
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(AcceptAnyCertificate { provider }))
            .with_no_client_auth()
    };
    config.alpn_protocols = vec![b"http/1.1".to_vec()];
    Ok(Arc::new(config))
}

static VERIFYING_CONFIG: OnceLock<Arc<ClientConfig>> = OnceLock::new();
static NON_VERIFYING_CONFIG: OnceLock<Arc<ClientConfig>> = OnceLock::new();

/// TLS client config for HTTP/1.1 (ALPN `http/1.1`, SNI on). Built once per mode and shared;
/// it holds no per-connection state.
pub fn http_client_config(verify: bool) -> io::Result<Arc<ClientConfig>> {
    let cell = if verify {
        &VERIFYING_CONFIG
    } else {
        &NON_VERIFYING_CONFIG
    };
    if let Some(config) = cell.get() {
        return Ok(config.clone());
    }
    let config = build_client_config(verify)?;
    Ok(cell.get_or_init(|| config).clone())
}

/// SNI / certificate name for the host. IP literals are accepted.
pub fn server_name(host: &str) -> io::Result<ServerName<'static>> {
    ServerName::try_from(host.to_string())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "invalid host name"))
}
