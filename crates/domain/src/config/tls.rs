use serde::{Deserialize, Serialize};

use super::errors::ConfigError;

/// TLS parameters shared by every endpoint of the pool.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct TlsOptions {
    /// Name the server certificate is verified against instead of the URL host.
    #[serde(default)]
    pub server_name: Option<String>,

    /// Additional PEM trust anchors, on top of the bundled web PKI roots.
    #[serde(default)]
    pub ca_file: Option<String>,

    /// PEM client certificate chain, for mutual TLS.
    #[serde(default)]
    pub cert_file: Option<String>,

    /// PEM private key matching `cert_file`.
    #[serde(default)]
    pub key_file: Option<String>,
}

impl TlsOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(name) = &self.server_name {
            if name.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "tls.server_name cannot be empty".to_string(),
                ));
            }
        }
        match (&self.cert_file, &self.key_file) {
            (Some(_), None) | (None, Some(_)) => Err(ConfigError::Validation(
                "tls.cert_file and tls.key_file must be set together".to_string(),
            )),
            _ => Ok(()),
        }
    }

    pub fn has_client_auth(&self) -> bool {
        self.cert_file.is_some() && self.key_file.is_some()
    }
}
