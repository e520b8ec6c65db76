use std::time::SystemTime;

use der::Tag;
use der::asn1::{Any, BitString, GeneralizedTime, OctetString, UtcTime};
use time::OffsetDateTime;
use x509_cert::Version;
use x509_cert::certificate::TbsCertificateInner;
use x509_cert::serial_number::SerialNumber;
use x509_cert::spki::AlgorithmIdentifierOwned;

use crate::cert::SignatureAlgorithm;
use crate::cert::params::{DistinguishedName, ExtensionParam, Validity};
use crate::error::IssuanceError;
use crate::key::PublicKey;

/// Represents the "To Be Signed" (TBS) portion of an X.509 certificate.
///
/// # Fields
/// * `serial_number` - Big-endian unsigned serial number bytes.
/// * `signature_algorithm` - The algorithm used to sign the certificate.
/// * `issuer` - The distinguished name of the certificate issuer.
/// * `validity` - The certificate's validity period.
/// * `subject` - The distinguished name of the certificate subject.
/// * `subject_public_key` - The public key of the certificate subject.
/// * `extensions` - Additional X.509 extensions for the certificate.
#[derive(Clone, Debug)]
pub struct TbsCertificate {
    pub serial_number: Vec<u8>,
    pub signature_algorithm: SignatureAlgorithm,
    pub issuer: DistinguishedName,
    pub validity: Validity,
    pub subject: DistinguishedName,
    pub subject_public_key: PublicKey,
    pub extensions: Vec<ExtensionParam>,
}

impl TbsCertificate {
    /// Converts the `TbsCertificate` into a `TbsCertificateInner` for DER encoding.
    pub fn to_tbs_certificate_inner(&self) -> Result<TbsCertificateInner, IssuanceError> {
        let extensions = self
            .extensions
            .iter()
            .map(|ext| {
                Ok(x509_cert::ext::Extension {
                    extn_id: ext.oid,
                    critical: ext.critical,
                    extn_value: OctetString::new(ext.value.clone())?,
                })
            })
            .collect::<Result<Vec<_>, der::Error>>()?;

        let validity = x509_cert::time::Validity {
            not_before: to_x509_time(self.validity.not_before)?,
            not_after: to_x509_time(self.validity.not_after)?,
        };

        let subject_public_key_info =
            x509_cert::spki::SubjectPublicKeyInfoOwned::from_key(self.subject_public_key.0.clone())?;

        Ok(TbsCertificateInner {
            version: Version::V3,
            serial_number: SerialNumber::new(self.serial_number.as_slice())?,
            signature: self.signature_algorithm.algorithm_identifier()?,
            issuer: self.issuer.as_x509_name()?,
            validity,
            subject: self.subject.as_x509_name()?,
            subject_public_key_info,
            issuer_unique_id: None,
            subject_unique_id: None,
            extensions: Some(extensions),
        })
    }

    /// Creates a `TbsCertificate` from a `TbsCertificateInner`.
    pub fn from_tbs_certificate_inner(inner: &TbsCertificateInner) -> Result<Self, IssuanceError> {
        let extensions = inner
            .extensions
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|ext| ExtensionParam {
                oid: ext.extn_id,
                critical: ext.critical,
                value: ext.extn_value.as_bytes().to_vec(),
            })
            .collect::<Vec<_>>();

        let signature_algorithm = match inner.signature.oid {
            const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION => {
                SignatureAlgorithm::Sha256WithRSA
            }
            other => {
                return Err(IssuanceError::DecodingError(format!(
                    "Unsupported signature algorithm {}",
                    other
                )));
            }
        };

        Ok(Self {
            serial_number: inner.serial_number.as_bytes().to_vec(),
            signature_algorithm,
            issuer: DistinguishedName::from_x509_name(&inner.issuer),
            validity: Validity {
                not_before: from_x509_time(&inner.validity.not_before),
                not_after: from_x509_time(&inner.validity.not_after),
            },
            subject: DistinguishedName::from_x509_name(&inner.subject),
            subject_public_key: PublicKey::from_x509spki(&inner.subject_public_key_info)?,
            extensions,
        })
    }
}

/// Dates before 2050 are encoded as UTCTime, later ones as GeneralizedTime.
fn to_x509_time(time: OffsetDateTime) -> Result<x509_cert::time::Time, der::Error> {
    let system_time: SystemTime = time.into();
    if time.year() < 2050 {
        Ok(x509_cert::time::Time::UtcTime(UtcTime::from_system_time(
            system_time,
        )?))
    } else {
        Ok(x509_cert::time::Time::GeneralTime(
            GeneralizedTime::from_system_time(system_time)?,
        ))
    }
}

fn from_x509_time(time: &x509_cert::time::Time) -> OffsetDateTime {
    match time {
        x509_cert::time::Time::UtcTime(ut) => OffsetDateTime::from(ut.to_system_time()),
        x509_cert::time::Time::GeneralTime(gt) => OffsetDateTime::from(gt.to_system_time()),
    }
}

impl SignatureAlgorithm {
    /// The `AlgorithmIdentifier` written into both the TBS and the outer certificate.
    pub fn algorithm_identifier(&self) -> Result<AlgorithmIdentifierOwned, der::Error> {
        match self {
            SignatureAlgorithm::Sha256WithRSA => Ok(AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION,
                parameters: Some(Any::new(Tag::Null, Vec::<u8>::new())?),
            }),
        }
    }
}

/// Wraps a raw signature as the certificate's `signatureValue`.
pub(crate) fn signature_bit_string(signature: &[u8]) -> Result<BitString, der::Error> {
    BitString::from_bytes(signature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyPair;
    use time::Duration;

    fn sample(days: i64) -> TbsCertificate {
        let key = KeyPair::generate_rsa(1024).unwrap();
        let name = DistinguishedName::builder()
            .common_name("example.aurae.io".to_string())
            .build();
        TbsCertificate {
            serial_number: vec![0x00, 0x80, 0x01],
            signature_algorithm: SignatureAlgorithm::Sha256WithRSA,
            issuer: name.clone(),
            validity: Validity::for_days(days).unwrap(),
            subject: name,
            subject_public_key: key.public_key(),
            extensions: Vec::new(),
        }
    }

    #[test]
    fn test_far_future_uses_generalized_time() {
        let inner = sample(9999).to_tbs_certificate_inner().unwrap();
        assert!(matches!(
            inner.validity.not_before,
            x509_cert::time::Time::UtcTime(_)
        ));
        assert!(matches!(
            inner.validity.not_after,
            x509_cert::time::Time::GeneralTime(_)
        ));
    }

    #[test]
    fn test_inner_round_trip() {
        let tbs = sample(30);
        let inner = tbs.to_tbs_certificate_inner().unwrap();
        let decoded = TbsCertificate::from_tbs_certificate_inner(&inner).unwrap();
        assert_eq!(decoded.subject, tbs.subject);
        assert_eq!(decoded.subject_public_key, tbs.subject_public_key);
        // Sub-second precision is dropped by the DER time types.
        let drift = decoded.validity.not_before - tbs.validity.not_before;
        assert!(drift.abs() < Duration::seconds(1));
        let serial: Vec<u8> = decoded
            .serial_number
            .iter()
            .copied()
            .skip_while(|b| *b == 0)
            .collect();
        assert_eq!(serial, vec![0x80, 0x01]);
    }
}
