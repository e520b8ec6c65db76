use std::path::Path;

use der::flagset::FlagSet;
use rand::TryRngCore;
use rand::rngs::OsRng;
use tracing::{debug, info, warn};

use crate::bundle::CaBundle;
use crate::cert::Certificate;
use crate::cert::SignatureAlgorithm;
use crate::cert::extensions::{
    AuthorityKeyIdentifier, BasicConstraints, KeyUsage, KeyUsages, SubjectAltName,
    SubjectKeyIdentifier,
};
use crate::cert::params::{CertificateTemplate, DistinguishedName, ExtensionParam, Validity};
use crate::config::IssuerConfig;
use crate::error::IssuanceError;
use crate::key::{KeyPair, PublicKey};
use crate::tbs_certificate::TbsCertificate;

/// Serial numbers are drawn uniformly from `[0, 2^128)`.
pub const SERIAL_NUMBER_BYTES: usize = 16;

/// Represents an entity capable of signing certificates.
pub trait Issuer {
    /// Returns the distinguished name of the issuer.
    fn issuer_name(&self) -> DistinguishedName;

    /// Returns the signing key of the issuer.
    fn signing_key(&self) -> &KeyPair;

    /// Key identifier placed in the Authority Key Identifier extension.
    fn authority_key_identifier(&self) -> Vec<u8> {
        self.signing_key().key_identifier()
    }

    /// Signs a certificate for `template` with the given serial number.
    ///
    /// The subject and authority key identifiers are always set explicitly;
    /// for a self-signed root they are bitwise identical.
    fn sign_certificate(
        &self,
        template: &CertificateTemplate,
        serial_number: Vec<u8>,
    ) -> Result<Certificate, IssuanceError> {
        let subject_key_id = template.subject_public_key.key_identifier();

        let mut extensions: Vec<ExtensionParam> = vec![
            ExtensionParam::from_extension(
                BasicConstraints {
                    is_ca: template.is_ca,
                    max_path_length: None,
                },
                true,
            )?,
            ExtensionParam::from_extension(SubjectKeyIdentifier(subject_key_id), false)?,
            ExtensionParam::from_extension(
                AuthorityKeyIdentifier {
                    key_identifier: self.authority_key_identifier(),
                },
                false,
            )?,
        ];

        if template.is_ca {
            let key_usage_flags: FlagSet<KeyUsages> =
                KeyUsages::DigitalSignature | KeyUsages::KeyCertSign | KeyUsages::CRLSign;
            extensions.push(ExtensionParam::from_extension(
                KeyUsage(key_usage_flags),
                true,
            )?);
        }

        if !template.dns_names.is_empty() {
            let san = SubjectAltName {
                names: template.dns_names.clone(),
            };
            extensions.push(ExtensionParam::from_extension(san, false)?);
        }

        let tbs_cert = TbsCertificate {
            serial_number,
            signature_algorithm: SignatureAlgorithm::Sha256WithRSA,
            issuer: self.issuer_name(),
            validity: template.validity.clone(),
            subject: template.subject.clone(),
            subject_public_key: template.subject_public_key.clone(),
            extensions,
        };

        Certificate::sign(&tbs_cert, self.signing_key())
    }
}

/// Issuer whose name is the subject of the certificate it signs.
pub struct SelfIssuer<'a> {
    pub name: DistinguishedName,
    pub key: &'a KeyPair,
}

impl Issuer for SelfIssuer<'_> {
    fn issuer_name(&self) -> DistinguishedName {
        self.name.clone()
    }

    fn signing_key(&self) -> &KeyPair {
        self.key
    }
}

/// Draws a random serial number from the OS RNG.
///
/// The result is the minimal positive DER integer encoding: leading zeros are
/// stripped and a zero byte is prepended when the high bit is set.
pub fn generate_serial_number() -> Result<Vec<u8>, IssuanceError> {
    let mut bytes = [0u8; SERIAL_NUMBER_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| IssuanceError::SerialNumberError(e.to_string()))?;
    Ok(positive_integer_bytes(&bytes))
}

fn positive_integer_bytes(bytes: &[u8]) -> Vec<u8> {
    let magnitude: Vec<u8> = bytes.iter().copied().skip_while(|b| *b == 0).collect();
    match magnitude.first() {
        None => vec![0],
        Some(first) if first & 0x80 != 0 => {
            let mut padded = Vec::with_capacity(magnitude.len() + 1);
            padded.push(0);
            padded.extend(magnitude);
            padded
        }
        Some(_) => magnitude,
    }
}

/// Issues a root CA for `domain_name` with the default [`IssuerConfig`].
///
/// See [`issue_with_config`].
pub fn issue(output_path: Option<&Path>, domain_name: &str) -> Result<CaBundle, IssuanceError> {
    issue_with_config(&IssuerConfig::default(), output_path, domain_name)
}

/// Issues a self-signed root CA.
///
/// `domain_name` becomes both the Common Name and the only DNS Subject
/// Alternative Name. It is not validated.
///
/// When `output_path` is given and non-empty, the certificate and key are also
/// written under it. If that fails, the returned
/// [`IssuanceError::PersistenceError`] still carries the bundle.
pub fn issue_with_config(
    config: &IssuerConfig,
    output_path: Option<&Path>,
    domain_name: &str,
) -> Result<CaBundle, IssuanceError> {
    info!(domain = domain_name, key_bits = config.key_bits, "issuing root CA");

    let validity = Validity::for_days(config.validity_days)?;
    let key = KeyPair::generate_rsa(config.key_bits)?;
    debug!("generated RSA key pair");

    let subject = config.subject(domain_name);
    let template = CertificateTemplate::builder()
        .subject(subject.clone())
        .subject_public_key(PublicKey::from_key_pair(&key))
        .dns_names(vec![domain_name.to_string()])
        .validity(validity)
        .is_ca(true)
        .build();

    let serial_number = generate_serial_number()?;
    debug!(serial = %hex::encode(&serial_number), "drew serial number");

    let self_issuer = SelfIssuer {
        name: subject,
        key: &key,
    };
    let certificate = self_issuer.sign_certificate(&template, serial_number)?;
    debug!("self-signed certificate");

    let bundle = CaBundle {
        certificate: certificate.to_pem()?,
        private_key: key.to_pkcs1_pem()?,
    };

    if let Some(path) = output_path.filter(|p| !p.as_os_str().is_empty()) {
        match bundle.write_to_dir(path, config) {
            Ok((crt_path, key_path)) => info!(
                cert = %crt_path.display(),
                key = %key_path.display(),
                "wrote root CA files"
            ),
            Err(err) => {
                warn!(error = %err, "failed to persist root CA");
                return Err(err);
            }
        }
    }

    info!(domain = domain_name, "issued root CA");
    Ok(bundle)
}
