use std::str;

use bon::Builder;
use const_oid::ObjectIdentifier;
use der::Tag;
use der::asn1::{Any, SetOfVec};
use time::Duration;
use time::OffsetDateTime;
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::name::{RdnSequence, RelativeDistinguishedName};

use super::extensions::ToAndFromX509Extension;
use crate::error::IssuanceError;
use crate::key::PublicKey;

const COMMON_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.3");
const COUNTRY: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.6");
const LOCALITY: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.7");
const STATE: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.8");
const STREET_ADDRESS: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.9");
const ORGANIZATION: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.10");
const ORGANIZATION_UNIT: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.11");

const SECONDS_PER_DAY: i64 = 86_400;

/// Everything needed to build a certificate before serial, identifiers and
/// signature are attached.
///
/// # Fields
/// * `subject` - The distinguished name of the certificate subject.
/// * `subject_public_key` - The public key of the certificate subject.
/// * `dns_names` - DNS names bound as Subject Alternative Names.
/// * `validity` - The `notBefore`/`notAfter` window.
/// * `is_ca` - Indicates if the certificate is a CA.
#[derive(Clone, Debug, Builder)]
pub struct CertificateTemplate {
    pub subject: DistinguishedName,
    pub subject_public_key: PublicKey,
    #[builder(default)]
    pub dns_names: Vec<String>,
    pub validity: Validity,
    #[builder(default)]
    pub is_ca: bool,
}

/// Distinguished name parameters for building an X.509 certificate.
///
/// # Fields
/// * `common_name` - The common name (CN).
/// * `country` - The country (C).
/// * `state` - The state or province (ST).
/// * `locality` - The locality or city (L).
/// * `street_address` - The street address (STREET).
/// * `organization` - The organization (O).
/// * `organization_unit` - The organizational unit (OU).
#[derive(Clone, Debug, Builder, Default, PartialEq, Eq)]
pub struct DistinguishedName {
    pub common_name: String,
    pub country: Option<String>,
    pub state: Option<String>,
    pub locality: Option<String>,
    pub street_address: Option<String>,
    pub organization: Option<String>,
    pub organization_unit: Option<String>,
}

impl DistinguishedName {
    /// Converts the distinguished name to an X.509 name.
    ///
    /// Attributes are emitted as single-valued RDNs in the order C, ST, L,
    /// STREET, O, OU, CN. Unset attributes are left out. The common name is
    /// always present, even when empty.
    pub fn as_x509_name(&self) -> Result<x509_cert::name::DistinguishedName, IssuanceError> {
        let attributes = [
            (COUNTRY, Tag::PrintableString, self.country.as_deref()),
            (STATE, Tag::Utf8String, self.state.as_deref()),
            (LOCALITY, Tag::Utf8String, self.locality.as_deref()),
            (STREET_ADDRESS, Tag::Utf8String, self.street_address.as_deref()),
            (ORGANIZATION, Tag::Utf8String, self.organization.as_deref()),
            (ORGANIZATION_UNIT, Tag::Utf8String, self.organization_unit.as_deref()),
            (COMMON_NAME, Tag::Utf8String, Some(self.common_name.as_str())),
        ];

        let mut rdns = Vec::new();
        for (oid, tag, value) in attributes {
            let Some(value) = value else { continue };
            let atv = AttributeTypeAndValue {
                oid,
                value: Any::new(tag, value.as_bytes())?,
            };
            rdns.push(RelativeDistinguishedName(SetOfVec::try_from(vec![atv])?));
        }
        Ok(RdnSequence(rdns))
    }

    /// Creates a `DistinguishedName` from an X.509 name.
    ///
    /// Attributes that are not string-valued, or that this type does not
    /// model, are skipped.
    pub fn from_x509_name(x509dn: &x509_cert::name::DistinguishedName) -> Self {
        let mut dn = DistinguishedName::default();

        for rdn in x509dn.0.iter() {
            for attr in rdn.0.iter() {
                let Ok(value) = str::from_utf8(attr.value.value()) else {
                    continue;
                };
                let value = value.to_string();
                match attr.oid {
                    COMMON_NAME => dn.common_name = value,
                    COUNTRY => dn.country = Some(value),
                    STATE => dn.state = Some(value),
                    LOCALITY => dn.locality = Some(value),
                    STREET_ADDRESS => dn.street_address = Some(value),
                    ORGANIZATION => dn.organization = Some(value),
                    ORGANIZATION_UNIT => dn.organization_unit = Some(value),
                    _ => {}
                }
            }
        }

        dn
    }
}

/// Certificate validity period.
///
/// # Fields
/// * `not_before` - The start of the validity period.
/// * `not_after` - The end of the validity period.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validity {
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
}

impl Validity {
    /// Creates a validity period starting now for the given number of days.
    pub fn for_days(days: i64) -> Result<Self, IssuanceError> {
        Self::starting_at(OffsetDateTime::now_utc(), days)
    }

    /// Creates a validity period starting at `not_before` for the given number of days.
    ///
    /// `days` must be positive and the end of the window must be a
    /// representable date.
    pub fn starting_at(not_before: OffsetDateTime, days: i64) -> Result<Self, IssuanceError> {
        if days <= 0 {
            return Err(IssuanceError::CertificateEncodingError(format!(
                "validity must be at least one day, got {days}"
            )));
        }
        let not_after = days
            .checked_mul(SECONDS_PER_DAY)
            .map(Duration::seconds)
            .and_then(|span| not_before.checked_add(span))
            .ok_or_else(|| {
                IssuanceError::CertificateEncodingError(format!(
                    "validity of {days} days is out of range"
                ))
            })?;
        Ok(Self {
            not_before,
            not_after,
        })
    }
}

/// Represents an X.509 extension.
///
/// # Fields
/// * `oid` - The object identifier of the extension.
/// * `critical` - Indicates if the extension is critical.
/// * `value` - The DER-encoded value of the extension.
#[derive(Clone, Debug)]
pub struct ExtensionParam {
    pub oid: ObjectIdentifier,
    pub critical: bool,
    /// DER-encoded extension value
    pub value: Vec<u8>,
}

impl ExtensionParam {
    /// Creates an `ExtensionParam` from a specific extension.
    pub fn from_extension<E: ToAndFromX509Extension>(
        extension: E,
        critical: bool,
    ) -> Result<Self, IssuanceError> {
        Ok(Self {
            oid: E::OID,
            critical,
            value: extension.to_x509_extension_value()?,
        })
    }

    /// Decodes an `ExtensionParam` into a specific extension.
    pub fn to_extension<E: ToAndFromX509Extension>(&self) -> Result<E, IssuanceError> {
        E::from_x509_extension_value(&self.value)
    }
}
