use crate::error::IssuanceError;

pub const CERTIFICATE_LABEL: &str = "CERTIFICATE";
pub const RSA_PRIVATE_KEY_LABEL: &str = "RSA PRIVATE KEY";

/// Convert DER‑encoded data into a PEM‑encoded string with the provided label.
/// Lines are wrapped at 64 columns and terminated with `\n`.
pub fn der_to_pem(der: &[u8], label: &str) -> String {
    let pem = pem::Pem::new(label, der);
    pem::encode_config(
        &pem,
        pem::EncodeConfig::new().set_line_ending(pem::LineEnding::LF),
    )
}

/// Convert a PEM‑encoded string to DER‑encoded bytes, rejecting blocks whose
/// label differs from `expected_label`.
pub fn pem_to_der(pem_str: &str, expected_label: &str) -> Result<Vec<u8>, IssuanceError> {
    let pem = pem::parse(pem_str)?;
    if pem.tag() != expected_label {
        return Err(IssuanceError::DecodingError(format!(
            "expected PEM block `{}`, found `{}`",
            expected_label,
            pem.tag()
        )));
    }
    Ok(pem.contents().to_vec())
}
