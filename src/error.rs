//! use rootca::error::IssuanceError;

use std::path::PathBuf;

use thiserror::Error;

use crate::bundle::CaBundle;

/// Represents errors that can occur while issuing a root CA.
///
/// Every variant names the pipeline step that failed. Only
/// [`IssuanceError::PersistenceError`] carries the bundle that was already
/// computed before the failure.
#[derive(Debug, Error)]
pub enum IssuanceError {
    /// The RSA key pair could not be generated.
    #[error("Failed to generate private key: {0}")]
    KeyGenerationError(String),

    /// The random source failed while drawing the serial number.
    #[error("Failed to generate serial number: {0}")]
    SerialNumberError(String),

    /// The certificate could not be built, DER-encoded or signed.
    #[error("Failed to create certificate: {0}")]
    CertificateEncodingError(String),

    /// The certificate or key could not be written as a PEM block.
    #[error("Failed to write {label} buffer: {message}")]
    TextEncodingError {
        label: &'static str,
        message: String,
    },

    /// Creating the output directory or writing a file failed.
    #[error("Failed to {operation} {}: {source}", .path.display())]
    PersistenceError {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
        bundle: Box<CaBundle>,
    },

    /// Input handed to one of the inspection helpers could not be decoded.
    #[error("Failed to decode data: {0}")]
    DecodingError(String),
}

impl IssuanceError {
    /// Returns the in-memory bundle attached to a persistence failure.
    pub fn bundle(&self) -> Option<&CaBundle> {
        match self {
            IssuanceError::PersistenceError { bundle, .. } => Some(bundle),
            _ => None,
        }
    }

    /// Consumes the error, returning the attached bundle if there is one.
    pub fn into_bundle(self) -> Option<CaBundle> {
        match self {
            IssuanceError::PersistenceError { bundle, .. } => Some(*bundle),
            _ => None,
        }
    }
}

impl From<der::Error> for IssuanceError {
    /// Converts a `der::Error` into an `IssuanceError`.
    fn from(err: der::Error) -> Self {
        IssuanceError::CertificateEncodingError(err.to_string())
    }
}

impl From<x509_cert::spki::Error> for IssuanceError {
    fn from(err: x509_cert::spki::Error) -> Self {
        IssuanceError::CertificateEncodingError(err.to_string())
    }
}

impl From<rsa::pkcs1::Error> for IssuanceError {
    fn from(err: rsa::pkcs1::Error) -> Self {
        IssuanceError::DecodingError(err.to_string())
    }
}

impl From<pem::PemError> for IssuanceError {
    fn from(err: pem::PemError) -> Self {
        IssuanceError::DecodingError(err.to_string())
    }
}
