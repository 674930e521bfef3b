//! Server credential loading
//!
//! A credential file is a single PEM document holding the certificate chain
//! (leaf first) followed by the private key.

use std::fs;
use std::path::{Path, PathBuf};

use rustls::pki_types::{CertificateDer, PrivateKeyDer};

use super::errors::CredentialError;

/// Certificate chain and private key for the server role.
#[derive(Debug)]
pub struct ServerCredential {
    pub chain: Vec<CertificateDer<'static>>,
    pub key: PrivateKeyDer<'static>,
}

/// Load a PEM credential file.
///
/// Key/certificate agreement is checked when the server configuration is
/// built, see [`CredentialError::Mismatch`].
///
/// # Errors
///
/// `Inaccessible` when the file cannot be read, `Certificate` or `Key`
/// when the respective PEM section is missing or malformed.
pub fn load_server_credential(path: &Path) -> Result<ServerCredential, CredentialError> {
    let pem = fs::read(path).map_err(|source| CredentialError::Inaccessible {
        path: path.to_path_buf(),
        source,
    })?;

    let chain = load_certificates(path, &pem)?;
    let key = rustls_pemfile::private_key(&mut pem.as_slice())
        .map_err(|e| CredentialError::Key {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?
        .ok_or_else(|| CredentialError::Key {
            path: path.to_path_buf(),
            reason: "no PRIVATE KEY section".to_string(),
        })?;

    Ok(ServerCredential { chain, key })
}

/// Every certificate in a PEM document, in file order.
pub(crate) fn load_certificates(
    path: &Path,
    pem: &[u8],
) -> Result<Vec<CertificateDer<'static>>, CredentialError> {
    let invalid = |reason: String| CredentialError::Certificate {
        path: path.to_path_buf(),
        reason,
    };
    let chain = rustls_pemfile::certs(&mut &*pem)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| invalid(e.to_string()))?;
    if chain.is_empty() {
        return Err(invalid("no CERTIFICATE section".to_string()));
    }
    Ok(chain)
}

/// Read a root certificate file for strict verification.
pub(crate) fn load_root_file(path: &Path) -> Result<Vec<CertificateDer<'static>>, CredentialError> {
    let pem = fs::read(path).map_err(|source| CredentialError::Inaccessible {
        path: PathBuf::from(path),
        source,
    })?;
    load_certificates(path, &pem)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn self_signed() -> (String, String) {
        let key_pair = rcgen::KeyPair::generate().expect("key pair");
        let params =
            rcgen::CertificateParams::new(vec!["localhost".to_string()]).expect("params");
        let cert = params.self_signed(&key_pair).expect("self-signed cert");
        (cert.pem(), key_pair.serialize_pem())
    }

    fn write_pem(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write pem");
        file
    }

    #[test]
    fn test_loads_chain_and_key() {
        let (cert, key) = self_signed();
        let file = write_pem(&format!("{cert}\n{key}"));
        let credential = load_server_credential(file.path()).expect("credential loads");
        assert_eq!(credential.chain.len(), 1);
    }

    #[test]
    fn test_missing_file_is_inaccessible() {
        let err = load_server_credential(Path::new("/nonexistent/unisock/server.pem"))
            .expect_err("missing file");
        assert!(matches!(err, CredentialError::Inaccessible { .. }));
    }

    #[test]
    fn test_missing_key_is_reported() {
        let (cert, _) = self_signed();
        let file = write_pem(&cert);
        let err = load_server_credential(file.path()).expect_err("no key");
        assert!(matches!(err, CredentialError::Key { .. }));
    }

    #[test]
    fn test_missing_certificate_is_reported() {
        let (_, key) = self_signed();
        let file = write_pem(&key);
        let err = load_server_credential(file.path()).expect_err("no certificate");
        assert!(matches!(err, CredentialError::Certificate { .. }));
    }
}
