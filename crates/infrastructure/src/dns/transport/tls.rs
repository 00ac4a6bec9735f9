//! TLS client configuration for DoH endpoints
//!
//! Built once per pool from [`TlsOptions`] and handed to the HTTP client:
//! - web PKI roots, plus an optional extra CA bundle
//! - optional client certificate (mutual TLS)
//! - optional server-name override: the peer certificate is verified against
//!   the configured name instead of the host in the URL, so an endpoint can be
//!   addressed by IP while presenting a certificate for an internal name.
//!
//! The override only affects verification. The SNI sent in the handshake is
//! still taken from the URL host, and none is sent when the URL host is an IP
//! address; an upstream that selects its certificate by SNI must be addressed
//! by that name in the URL.

use ferrous_doh_domain::{ConfigError, TlsOptions};
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::client::WebPkiServerVerifier;
use rustls::crypto::CryptoProvider;
use rustls::pki_types::{CertificateDer, PrivateKeyDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;

pub fn client_config(options: &TlsOptions) -> Result<ClientConfig, ConfigError> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());

    let mut root_store = RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
    };
    if let Some(ca_file) = &options.ca_file {
        for cert in load_certs(ca_file)? {
            root_store
                .add(cert)
                .map_err(|e| ConfigError::Tls(format!("Invalid CA in {}: {}", ca_file, e)))?;
        }
    }

    let builder = ClientConfig::builder_with_provider(Arc::clone(&provider))
        .with_safe_default_protocol_versions()
        .map_err(|e| ConfigError::Tls(format!("Failed to create TLS config: {}", e)))?;

    let builder = match &options.server_name {
        Some(name) => {
            let verifier = ServerNameOverride::new(name, root_store, provider)?;
            builder
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(verifier))
        }
        None => builder.with_root_certificates(root_store),
    };

    let mut config = match (&options.cert_file, &options.key_file) {
        (Some(cert_file), Some(key_file)) => {
            let certs = load_certs(cert_file)?;
            let key = load_private_key(key_file)?;
            builder
                .with_client_auth_cert(certs, key)
                .map_err(|e| ConfigError::Tls(format!("Invalid client certificate: {}", e)))?
        }
        _ => builder.with_no_client_auth(),
    };

    config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];
    Ok(config)
}

fn load_certs(path: &str) -> Result<Vec<CertificateDer<'static>>, ConfigError> {
    let file = File::open(path)
        .map_err(|e| ConfigError::Tls(format!("Failed to open {}: {}", path, e)))?;
    let certs = rustls_pemfile::certs(&mut BufReader::new(file))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ConfigError::Tls(format!("Failed to read certificates from {}: {}", path, e)))?;

    if certs.is_empty() {
        return Err(ConfigError::Tls(format!("No certificates found in {}", path)));
    }
    Ok(certs)
}

fn load_private_key(path: &str) -> Result<PrivateKeyDer<'static>, ConfigError> {
    let file = File::open(path)
        .map_err(|e| ConfigError::Tls(format!("Failed to open {}: {}", path, e)))?;
    rustls_pemfile::private_key(&mut BufReader::new(file))
        .map_err(|e| ConfigError::Tls(format!("Failed to read private key from {}: {}", path, e)))?
        .ok_or_else(|| ConfigError::Tls(format!("No private key found in {}", path)))
}

/// Web PKI verification pinned to a fixed server name.
#[derive(Debug)]
struct ServerNameOverride {
    inner: Arc<WebPkiServerVerifier>,
    server_name: ServerName<'static>,
}

impl ServerNameOverride {
    fn new(
        name: &str,
        roots: RootCertStore,
        provider: Arc<CryptoProvider>,
    ) -> Result<Self, ConfigError> {
        let server_name = ServerName::try_from(name.to_string())
            .map_err(|e| ConfigError::Tls(format!("Invalid TLS server name '{}': {}", name, e)))?;
        let inner = WebPkiServerVerifier::builder_with_provider(Arc::new(roots), provider)
            .build()
            .map_err(|e| ConfigError::Tls(format!("Failed to build certificate verifier: {}", e)))?;

        Ok(Self { inner, server_name })
    }
}

impl ServerCertVerifier for ServerNameOverride {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        ocsp_response: &[u8],
        now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        self.inner.verify_server_cert(
            end_entity,
            intermediates,
            &self.server_name,
            ocsp_response,
            now,
        )
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        self.inner.verify_tls12_signature(message, cert, dss)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        self.inner.verify_tls13_signature(message, cert, dss)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.inner.supported_verify_schemes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_build_config() {
        let config = client_config(&TlsOptions::default()).unwrap();
        assert_eq!(
            config.alpn_protocols,
            vec![b"h2".to_vec(), b"http/1.1".to_vec()]
        );
    }

    #[test]
    fn test_server_name_override_builds_config() {
        let options = TlsOptions {
            server_name: Some("internal.domain".into()),
            ..Default::default()
        };
        assert!(client_config(&options).is_ok());
    }

    #[test]
    fn test_invalid_server_name_is_rejected() {
        let options = TlsOptions {
            server_name: Some("not a hostname!".into()),
            ..Default::default()
        };
        assert!(matches!(client_config(&options), Err(ConfigError::Tls(_))));
    }

    #[test]
    fn test_missing_ca_file_is_rejected() {
        let options = TlsOptions {
            ca_file: Some("/nonexistent/ca.pem".into()),
            ..Default::default()
        };
        assert!(matches!(client_config(&options), Err(ConfigError::Tls(_))));
    }

    #[test]
    fn test_ca_file_without_certificates_is_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let options = TlsOptions {
            ca_file: Some(file.path().to_string_lossy().into_owned()),
            ..Default::default()
        };
        assert!(matches!(client_config(&options), Err(ConfigError::Tls(_))));
    }
}
