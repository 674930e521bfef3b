//! rustls-backed [`TlsProvider`]
//!
//! Client and server configurations are built on first use and cached for
//! the life of the provider, so the server credential file is read once per
//! provider.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use rustls::crypto::CryptoProvider;
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, RootCertStore, ServerConfig, ServerConnection};
use socket2::Socket;

use super::credentials::{load_root_file, load_server_credential};
use super::session::RustlsSession;
use super::verifier::AcceptAnyCertificate;
use super::{CredentialError, TlsError, TlsProvider, TlsSession};
use crate::config::TlsConfig;

/// Name presented by unverified clients whose host is not a valid DNS name
/// or IP literal (Unix-domain paths).
const FALLBACK_SERVER_NAME: &str = "localhost";

#[derive(Debug)]
pub struct RustlsProvider {
    config: TlsConfig,
    crypto: Arc<CryptoProvider>,
    lax_client: OnceCell<Arc<ClientConfig>>,
    strict_client: OnceCell<Arc<ClientConfig>>,
    server: OnceCell<Arc<ServerConfig>>,
}

impl RustlsProvider {
    #[must_use]
    pub fn new(config: TlsConfig) -> Self {
        Self {
            config,
            crypto: Arc::new(rustls::crypto::ring::default_provider()),
            lax_client: OnceCell::new(),
            strict_client: OnceCell::new(),
            server: OnceCell::new(),
        }
    }

    fn client_config(&self, strict: bool) -> Result<Arc<ClientConfig>, TlsError> {
        let cell = if strict {
            &self.strict_client
        } else {
            &self.lax_client
        };
        cell.get_or_try_init(|| self.build_client_config(strict).map(Arc::new))
            .map(Arc::clone)
    }

    fn build_client_config(&self, strict: bool) -> Result<ClientConfig, TlsError> {
        let builder = ClientConfig::builder_with_provider(Arc::clone(&self.crypto))
            .with_safe_default_protocol_versions()?;
        let config = if strict {
            builder
                .with_root_certificates(self.root_store()?)
                .with_no_client_auth()
        } else {
            builder
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(AcceptAnyCertificate::new(
                    Arc::clone(&self.crypto),
                )))
                .with_no_client_auth()
        };
        Ok(config)
    }

    fn root_store(&self) -> Result<RootCertStore, TlsError> {
        let mut roots = RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        if self.config.use_native_certs {
            let native = rustls_native_certs::load_native_certs();
            for err in &native.errors {
                sock_warn!("native certificate store: {err}");
            }
            let (added, ignored) = roots.add_parsable_certificates(native.certs);
            sock_debug!("native roots: {added} added, {ignored} ignored");
        }

        for path in &self.config.extra_roots {
            for cert in load_root_file(path)? {
                roots.add(cert)?;
            }
        }
        Ok(roots)
    }

    fn server_config(&self) -> Result<Arc<ServerConfig>, TlsError> {
        self.server
            .get_or_try_init(|| self.build_server_config().map(Arc::new))
            .map(Arc::clone)
    }

    fn build_server_config(&self) -> Result<ServerConfig, TlsError> {
        let path = self.config.resolve_credential_path();
        let credential = load_server_credential(&path).map_err(|e| {
            sock_error!("server credential: {e}");
            e
        })?;
        let config = ServerConfig::builder_with_provider(Arc::clone(&self.crypto))
            .with_safe_default_protocol_versions()?
            .with_no_client_auth()
            .with_single_cert(credential.chain, credential.key);
        match config {
            Ok(config) => {
                sock_info!("TLS server credential loaded from {}", path.display());
                Ok(config)
            }
            Err(e @ rustls::Error::InconsistentKeys(_)) => {
                sock_error!("server credential {}: key does not match", path.display());
                Err(TlsError::Credential(CredentialError::Mismatch { path, source: e }))
            }
            Err(e) => Err(TlsError::Config(e)),
        }
    }

    fn server_name(host: &str, strict: bool) -> Result<ServerName<'static>, TlsError> {
        let literal = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);
        match ServerName::try_from(literal.to_string()) {
            Ok(name) => Ok(name),
            Err(_) if !strict => ServerName::try_from(FALLBACK_SERVER_NAME)
                .map_err(|_| TlsError::InvalidServerName(host.to_string())),
            Err(_) => Err(TlsError::InvalidServerName(host.to_string())),
        }
    }
}

impl Default for RustlsProvider {
    fn default() -> Self {
        Self::new(TlsConfig::default())
    }
}

impl TlsProvider for RustlsProvider {
    fn client(
        &self,
        socket: &Socket,
        server_name: &str,
        strict: bool,
    ) -> Result<Box<dyn TlsSession>, TlsError> {
        let config = self.client_config(strict)?;
        let name = Self::server_name(server_name, strict)?;
        let conn = ClientConnection::new(config, name)?;
        let session = RustlsSession::establish(conn, socket)?;
        sock_debug!("TLS client session established with {server_name}");
        Ok(Box::new(session))
    }

    fn server(&self, socket: &Socket) -> Result<Box<dyn TlsSession>, TlsError> {
        let config = self.server_config()?;
        let conn = ServerConnection::new(config)?;
        let session = RustlsSession::establish(conn, socket)?;
        sock_debug!("TLS server session established");
        Ok(Box::new(session))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::io::Write;
    use std::thread;

    use socket2::{Domain, Type};

    use super::*;

    fn credential_file(matching: bool) -> tempfile::NamedTempFile {
        let key_pair = rcgen::KeyPair::generate().expect("key pair");
        let params =
            rcgen::CertificateParams::new(vec!["localhost".to_string()]).expect("params");
        let cert = params.self_signed(&key_pair).expect("self-signed cert");
        let key_pem = if matching {
            key_pair.serialize_pem()
        } else {
            rcgen::KeyPair::generate().expect("other key").serialize_pem()
        };
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "{}\n{}", cert.pem(), key_pem).expect("write pem");
        file
    }

    fn provider(file: &tempfile::NamedTempFile) -> Arc<RustlsProvider> {
        let config = TlsConfig::default()
            .with_credential_path(file.path())
            .with_native_certs(false);
        Arc::new(RustlsProvider::new(config))
    }

    #[test]
    fn test_plain_tls_round_trip() {
        let file = credential_file(true);
        let provider = provider(&file);
        let (server_sock, client_sock) =
            Socket::pair(Domain::UNIX, Type::STREAM, None).expect("socket pair");

        let server_provider = Arc::clone(&provider);
        let server = thread::spawn(move || {
            let mut session = server_provider.server(&server_sock).expect("server handshake");
            let mut buf = [0u8; 16];
            let n = session.read(&server_sock, &mut buf).expect("server read");
            session.write(&server_sock, &buf[..n]).expect("server write");
            session.shutdown(&server_sock).expect("server shutdown");
        });

        let mut session = provider
            .client(&client_sock, "localhost", false)
            .expect("client handshake");
        session.write(&client_sock, b"ping").expect("client write");
        let mut buf = [0u8; 16];
        let n = session.read(&client_sock, &mut buf).expect("client read");
        assert_eq!(&buf[..n], b"ping");
        server.join().expect("server thread");
    }

    #[test]
    fn test_strict_client_rejects_self_signed_peer() {
        let file = credential_file(true);
        let provider = provider(&file);
        let (server_sock, client_sock) =
            Socket::pair(Domain::UNIX, Type::STREAM, None).expect("socket pair");

        let server_provider = Arc::clone(&provider);
        let server = thread::spawn(move || server_provider.server(&server_sock).is_err());

        let err = provider
            .client(&client_sock, "localhost", true)
            .expect_err("untrusted certificate");
        assert!(matches!(err, TlsError::Handshake(_)));
        drop(client_sock);
        assert!(server.join().expect("server thread"));
    }

    #[test]
    fn test_mismatched_key_is_reported() {
        let file = credential_file(false);
        let provider = provider(&file);
        let (server_sock, _client_sock) =
            Socket::pair(Domain::UNIX, Type::STREAM, None).expect("socket pair");
        let err = provider.server(&server_sock).expect_err("mismatched key");
        assert!(matches!(
            err,
            TlsError::Credential(CredentialError::Mismatch { .. })
        ));
    }

    #[test]
    fn test_missing_credential_is_a_credential_error() {
        let config = TlsConfig::default().with_credential_path("/nonexistent/unisock.pem");
        let provider = RustlsProvider::new(config);
        let (server_sock, _client_sock) =
            Socket::pair(Domain::UNIX, Type::STREAM, None).expect("socket pair");
        let err = provider.server(&server_sock).expect_err("missing credential");
        assert!(err.is_credential());
    }

    #[test]
    fn test_server_name_fallback_for_paths() {
        assert!(RustlsProvider::server_name("/tmp/unisock.sock", false).is_ok());
        assert!(matches!(
            RustlsProvider::server_name("/tmp/unisock.sock", true),
            Err(TlsError::InvalidServerName(_))
        ));
        assert!(RustlsProvider::server_name("[::1]", true).is_ok());
    }
}
