use bon::Builder;

use crate::cert::params::DistinguishedName;

pub const DEFAULT_KEY_BITS: usize = 2048;
pub const DEFAULT_VALIDITY_DAYS: i64 = 9999;
pub const CA_CERT_FILE_NAME: &str = "ca.crt";
pub const CA_KEY_FILE_NAME: &str = "ca.key";

/// Settings for issuing a root CA.
///
/// The defaults produce the Aurae runtime root: a 2048-bit RSA key, a
/// 9999-day validity window and the fixed `O=Aurae, OU=Runtime` identity.
/// Tests can lower `key_bits` or `validity_days` to speed things up.
///
/// # Fields
/// * `key_bits` - RSA modulus size.
/// * `validity_days` - Days between `notBefore` and `notAfter`.
/// * `organization`, `organizational_unit`, `street_address`, `locality`,
///   `country` - Fixed subject attributes describing the issuing system.
/// * `directory_mode` - Unix mode for directories created for the output.
/// * `file_mode` - Unix mode for `ca.crt` and `ca.key`.
/// * `cert_file_name`, `key_file_name` - Output file names.
#[derive(Clone, Debug, Builder, PartialEq, Eq)]
pub struct IssuerConfig {
    #[builder(default = DEFAULT_KEY_BITS)]
    pub key_bits: usize,
    #[builder(default = DEFAULT_VALIDITY_DAYS)]
    pub validity_days: i64,
    #[builder(default = "Aurae".to_string())]
    pub organization: String,
    #[builder(default = "Runtime".to_string())]
    pub organizational_unit: String,
    #[builder(default = "aurae".to_string())]
    pub street_address: String,
    #[builder(default = "aurae".to_string())]
    pub locality: String,
    #[builder(default = "IS".to_string())]
    pub country: String,
    #[builder(default = 0o700)]
    pub directory_mode: u32,
    #[builder(default = 0o600)]
    pub file_mode: u32,
    #[builder(default = CA_CERT_FILE_NAME.to_string())]
    pub cert_file_name: String,
    #[builder(default = CA_KEY_FILE_NAME.to_string())]
    pub key_file_name: String,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl IssuerConfig {
    /// Subject (and issuer) name of the root for `domain_name`.
    pub fn subject(&self, domain_name: &str) -> DistinguishedName {
        DistinguishedName::builder()
            .common_name(domain_name.to_string())
            .organization(self.organization.clone())
            .organization_unit(self.organizational_unit.clone())
            .street_address(self.street_address.clone())
            .locality(self.locality.clone())
            .country(self.country.clone())
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = IssuerConfig::default();
        assert_eq!(config.key_bits, 2048);
        assert_eq!(config.validity_days, 9999);
        assert_eq!(config.file_mode, 0o600);
        assert_eq!(config.cert_file_name, "ca.crt");
        assert_eq!(config.key_file_name, "ca.key");
    }

    #[test]
    fn test_subject_uses_fixed_identity() {
        let subject = IssuerConfig::default().subject("example.aurae.io");
        assert_eq!(subject.common_name, "example.aurae.io");
        assert_eq!(subject.organization.as_deref(), Some("Aurae"));
        assert_eq!(subject.organization_unit.as_deref(), Some("Runtime"));
        assert_eq!(subject.country.as_deref(), Some("IS"));
    }

    #[test]
    fn test_builder_overrides() {
        let config = IssuerConfig::builder()
            .key_bits(1024)
            .validity_days(1)
            .build();
        assert_eq!(config.key_bits, 1024);
        assert_eq!(config.validity_days, 1);
        assert_eq!(config.organization, "Aurae");
    }
}
