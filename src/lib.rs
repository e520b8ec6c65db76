//! # rootca - Self-Signed Root CA Issuance
//!
//! rootca issues the private trust root for the Aurae runtime. One call
//! generates a fresh RSA key pair, self-signs an X.509 v3 CA certificate for a
//! domain name, and returns both as PEM text. It can also write them to disk.
//! Leaf certificates are issued elsewhere, from the returned material.
//!
//! Built entirely on rustcrypto libraries: `rsa`, `x509-cert`, `der`, `sha1`.
//!
//! ## What the certificate contains
//!
//! - **Subject/Issuer**: `C=IS, STREET=aurae, L=aurae, O=Aurae, OU=Runtime, CN=<domain>`
//! - **Serial number**: 128 random bits from the OS RNG
//! - **Validity**: now until now + 9999 days
//! - **Basic Constraints** (critical): `cA = true`
//! - **Key Usage** (critical): digitalSignature, keyCertSign, cRLSign
//! - **Subject Key Identifier** and **Authority Key Identifier**: both the
//!   SHA-1 digest of the RSA modulus
//! - **Subject Alternative Name**: the domain as the sole DNS name
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! # fn main() -> Result<(), rootca::error::IssuanceError> {
//! let bundle = rootca::issue(Some(Path::new("/etc/aurae/pki")), "example.aurae.io")?;
//! println!("{}", bundle.certificate);
//! # Ok(())
//! # }
//! ```
//!
//! Smaller keys or shorter validity are available through [`IssuerConfig`]:
//!
//! ```rust,no_run
//! use rootca::{IssuerConfig, issue_with_config};
//!
//! # fn main() -> Result<(), rootca::error::IssuanceError> {
//! let config = IssuerConfig::builder().key_bits(1024).validity_days(1).build();
//! let bundle = issue_with_config(&config, None, "test.aurae.io")?;
//! let cert = bundle.parse_certificate()?;
//! assert_eq!(cert.subject_key_identifier()?, cert.authority_key_identifier()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! A failed write still hands back the certificate and key:
//!
//! ```rust,no_run
//! use std::path::Path;
//! use rootca::error::IssuanceError;
//!
//! match rootca::issue(Some(Path::new("/proc/nope")), "example.aurae.io") {
//!     Ok(bundle) => println!("{}", bundle.certificate),
//!     Err(err @ IssuanceError::PersistenceError { .. }) => {
//!         eprintln!("{}", err);
//!         let bundle = err.into_bundle();
//!         assert!(bundle.is_some());
//!     }
//!     Err(err) => eprintln!("{}", err),
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`issuer`]: the issuance pipeline and serial number generation
//! - [`bundle`]: the PEM bundle and its persistence
//! - [`config`]: issuance settings and their defaults
//! - [`key`]: RSA key generation, signing and PKCS#1 encoding
//! - [`cert`]: certificate encoding, decoding and inspection
//! - [`tbs_certificate`]: low-level certificate structure manipulation
//! - [`pem_utils`]: PEM block helpers
//! - [`error`]: error types

pub mod bundle;
pub mod cert;
pub mod config;
pub mod error;
pub mod issuer;
pub mod key;
pub mod pem_utils;
pub mod tbs_certificate;

pub use bundle::CaBundle;
pub use config::IssuerConfig;
pub use error::IssuanceError;
pub use issuer::{issue, issue_with_config};
