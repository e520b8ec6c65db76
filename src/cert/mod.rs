pub mod extensions;
pub mod params;

use crate::error::IssuanceError;
pub type Result<T> = std::result::Result<T, IssuanceError>;
use der::{Decode, Encode};
use extensions::{
    AuthorityKeyIdentifier, BasicConstraints, KeyUsage, SubjectAltName, SubjectKeyIdentifier,
    ToAndFromX509Extension,
};
use params::{DistinguishedName, ExtensionParam, Validity};
use x509_cert::certificate::CertificateInner;

use crate::key::{KeyPair, PublicKey};
use crate::pem_utils::{CERTIFICATE_LABEL, der_to_pem};
use crate::tbs_certificate::{TbsCertificate, signature_bit_string};

/// Represents the supported signature algorithms for certificates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// SHA-256 with RSA encryption (PKCS#1 v1.5).
    Sha256WithRSA,
}

/// Represents an X.509 certificate.
///
/// This struct provides methods to encode the certificate into DER or PEM
/// formats and to read back the fields a root CA is expected to carry.
#[derive(Debug, Clone)]
pub struct Certificate {
    /// The inner representation of the certificate.
    pub inner: CertificateInner,
}

impl Certificate {
    /// Signs `tbs` with `key`, producing a complete certificate.
    pub fn sign(tbs: &TbsCertificate, key: &KeyPair) -> Result<Self> {
        let tbs_cert_inner = tbs.to_tbs_certificate_inner()?;
        let signature = key.sign_data(&tbs_cert_inner.to_der()?)?;

        let cert_inner = CertificateInner {
            tbs_certificate: tbs_cert_inner,
            signature_algorithm: tbs.signature_algorithm.algorithm_identifier()?,
            signature: signature_bit_string(&signature)?,
        };

        Ok(Certificate { inner: cert_inner })
    }

    /// Encodes the certificate into DER format.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.inner
            .to_der()
            .map_err(|e| IssuanceError::CertificateEncodingError(e.to_string()))
    }

    /// Encodes the certificate into PEM format with `\n` line endings.
    pub fn to_pem(&self) -> Result<String> {
        let der = self
            .inner
            .to_der()
            .map_err(|e| IssuanceError::TextEncodingError {
                label: "certificate",
                message: e.to_string(),
            })?;
        Ok(der_to_pem(&der, CERTIFICATE_LABEL))
    }

    pub fn from_der(der: &[u8]) -> Result<Self> {
        let inner = CertificateInner::from_der(der)
            .map_err(|e| IssuanceError::DecodingError(e.to_string()))?;
        Ok(Certificate { inner })
    }

    pub fn subject(&self) -> DistinguishedName {
        DistinguishedName::from_x509_name(&self.inner.tbs_certificate.subject)
    }

    pub fn issuer(&self) -> DistinguishedName {
        DistinguishedName::from_x509_name(&self.inner.tbs_certificate.issuer)
    }

    /// Serial number as big-endian magnitude bytes, without sign padding.
    pub fn serial_number(&self) -> Vec<u8> {
        self.inner
            .tbs_certificate
            .serial_number
            .as_bytes()
            .iter()
            .copied()
            .skip_while(|b| *b == 0)
            .collect()
    }

    pub fn validity(&self) -> Result<Validity> {
        Ok(self.tbs_certificate()?.validity)
    }

    pub fn public_key(&self) -> Result<PublicKey> {
        PublicKey::from_x509spki(&self.inner.tbs_certificate.subject_public_key_info)
    }

    /// Decoded view of the TBS portion.
    pub fn tbs_certificate(&self) -> Result<TbsCertificate> {
        TbsCertificate::from_tbs_certificate_inner(&self.inner.tbs_certificate)
    }

    pub fn extensions(&self) -> Vec<ExtensionParam> {
        self.inner
            .tbs_certificate
            .extensions
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|ext| ExtensionParam {
                oid: ext.extn_id,
                critical: ext.critical,
                value: ext.extn_value.as_bytes().to_vec(),
            })
            .collect()
    }

    /// Finds and decodes the extension `E`, if present.
    pub fn extension<E: ToAndFromX509Extension>(&self) -> Result<Option<E>> {
        self.extensions()
            .iter()
            .find(|ext| ext.oid == E::OID)
            .map(|ext| ext.to_extension::<E>())
            .transpose()
    }

    pub fn is_ca(&self) -> Result<bool> {
        Ok(self
            .extension::<BasicConstraints>()?
            .map(|bc| bc.is_ca)
            .unwrap_or(false))
    }

    pub fn dns_names(&self) -> Result<Vec<String>> {
        Ok(self
            .extension::<SubjectAltName>()?
            .map(|san| san.names)
            .unwrap_or_default())
    }

    pub fn key_usage(&self) -> Result<Option<KeyUsage>> {
        self.extension::<KeyUsage>()
    }

    pub fn subject_key_identifier(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.extension::<SubjectKeyIdentifier>()?.map(|ski| ski.0))
    }

    pub fn authority_key_identifier(&self) -> Result<Option<Vec<u8>>> {
        Ok(self
            .extension::<AuthorityKeyIdentifier>()?
            .map(|aki| aki.key_identifier))
    }

    /// Checks that issuer equals subject and that the signature verifies with
    /// the embedded public key.
    pub fn verify_self_signed(&self) -> Result<()> {
        let tbs = &self.inner.tbs_certificate;
        if tbs.issuer != tbs.subject {
            return Err(IssuanceError::DecodingError(
                "issuer and subject differ".to_string(),
            ));
        }
        if self.inner.signature_algorithm != tbs.signature {
            return Err(IssuanceError::DecodingError(
                "signature algorithm mismatch between certificate and TBS".to_string(),
            ));
        }
        let signature = self.inner.signature.as_bytes().ok_or_else(|| {
            IssuanceError::DecodingError("signature has unused bits".to_string())
        })?;
        self.public_key()?.verify(&tbs.to_der()?, signature)
    }
}
