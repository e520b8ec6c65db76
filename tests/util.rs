use rootca::IssuerConfig;

pub const DOMAIN: &str = "example.aurae.io";

/// 1024-bit keys keep the suite fast; nothing here depends on key size.
pub fn fast_config() -> IssuerConfig {
    IssuerConfig::builder().key_bits(1024).build()
}

/// Magnitude of a serial number with any sign padding removed.
pub fn serial_magnitude(serial: &[u8]) -> Vec<u8> {
    serial.iter().copied().skip_while(|b| *b == 0).collect()
}
