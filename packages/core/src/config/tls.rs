//! TLS configuration and credential path resolution

use std::path::PathBuf;

/// Compiled-in location of the server certificate-and-key PEM file.
pub const DEFAULT_CREDENTIAL_PATH: &str = "/etc/unisock/server.pem";

/// Environment variable overriding [`DEFAULT_CREDENTIAL_PATH`].
pub const CREDENTIAL_PATH_ENV: &str = "UNISOCK_TLS_CREDENTIALS";

/// TLS connection configuration
#[derive(Debug, Clone)]
pub struct TlsConfig {
    /// Explicit server credential file; takes precedence over the environment
    pub credential_path: Option<PathBuf>,
    /// Trust the platform certificate store for strict client verification
    pub use_native_certs: bool,
    /// Extra PEM files whose certificates are trusted as roots
    pub extra_roots: Vec<PathBuf>,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            credential_path: None,
            use_native_certs: true,
            extra_roots: Vec::new(),
        }
    }
}

impl TlsConfig {
    #[must_use]
    pub fn with_credential_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credential_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_native_certs(mut self, enabled: bool) -> Self {
        self.use_native_certs = enabled;
        self
    }

    #[must_use]
    pub fn with_extra_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.extra_roots.push(path.into());
        self
    }

    /// Path the server credential is loaded from: explicit setting, then
    /// `UNISOCK_TLS_CREDENTIALS`, then the compiled-in default.
    #[must_use]
    pub fn resolve_credential_path(&self) -> PathBuf {
        if let Some(path) = &self.credential_path {
            return path.clone();
        }
        match std::env::var_os(CREDENTIAL_PATH_ENV) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => PathBuf::from(DEFAULT_CREDENTIAL_PATH),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        let config = TlsConfig::default().with_credential_path("/tmp/explicit.pem");
        assert_eq!(
            config.resolve_credential_path(),
            PathBuf::from("/tmp/explicit.pem")
        );
    }

    #[test]
    fn test_extra_roots_accumulate() {
        let config = TlsConfig::default()
            .with_extra_root("/tmp/a.pem")
            .with_extra_root("/tmp/b.pem");
        assert_eq!(config.extra_roots.len(), 2);
    }
}
