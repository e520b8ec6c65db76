use der::Encode;
use rsa::pkcs1::der::SecretDocument;
use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey};
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::DecodePublicKey;
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha1::{Digest, Sha1};
use sha2::Sha256;
use x509_cert::spki::SubjectPublicKeyInfoOwned;

use crate::error::IssuanceError;
use crate::pem_utils::{RSA_PRIVATE_KEY_LABEL, der_to_pem};

pub type Result<T> = std::result::Result<T, IssuanceError>;

/// An RSA key pair used to self-sign the root certificate.
#[derive(Clone, Debug)]
pub struct KeyPair {
    private: Box<RsaPrivateKey>,
    public: RsaPublicKey,
}

impl KeyPair {
    /// Generate an RSA key pair with the specified number of bits.
    pub fn generate_rsa(bits: usize) -> Result<Self> {
        let mut rng = rand_core::OsRng;
        let private = RsaPrivateKey::new(&mut rng, bits)
            .map_err(|e| IssuanceError::KeyGenerationError(e.to_string()))?;
        let public = RsaPublicKey::from(&private);
        Ok(KeyPair {
            private: Box::new(private),
            public,
        })
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.public.clone())
    }

    /// Big-endian bytes of the public modulus, without leading zeros.
    pub fn modulus_bytes(&self) -> Vec<u8> {
        self.public.n().to_bytes_be()
    }

    /// SHA-1 of the public modulus, used as both subject and authority key identifier.
    pub fn key_identifier(&self) -> Vec<u8> {
        self.public_key().key_identifier()
    }

    pub fn as_spki(&self) -> Result<SubjectPublicKeyInfoOwned> {
        Ok(SubjectPublicKeyInfoOwned::from_key(self.public.clone())?)
    }

    /// Signs `data` with RSASSA-PKCS1-v1_5 over SHA-256.
    pub fn sign_data(&self, data: &[u8]) -> Result<Vec<u8>> {
        let signing_key = SigningKey::<Sha256>::new((*self.private).clone());
        let signature = signing_key
            .try_sign(data)
            .map_err(|e| IssuanceError::CertificateEncodingError(e.to_string()))?;
        Ok(signature.to_vec())
    }

    /// PKCS#1 `RSAPrivateKey` DER encoding of the private key. The buffer is
    /// zeroized on drop.
    pub fn to_pkcs1_der(&self) -> Result<SecretDocument> {
        self.private
            .to_pkcs1_der()
            .map_err(|e| IssuanceError::TextEncodingError {
                label: "private key",
                message: e.to_string(),
            })
    }

    /// PEM encoding of the private key with the `RSA PRIVATE KEY` label.
    pub fn to_pkcs1_pem(&self) -> Result<String> {
        let der = self.to_pkcs1_der()?;
        Ok(der_to_pem(der.as_bytes(), RSA_PRIVATE_KEY_LABEL))
    }

    pub fn import_from_pkcs1_der(der: &[u8]) -> Result<Self> {
        let private = RsaPrivateKey::from_pkcs1_der(der)?;
        let public = RsaPublicKey::from(&private);
        Ok(KeyPair {
            private: Box::new(private),
            public,
        })
    }
}

/// The public half of a [`KeyPair`], or a key recovered from a certificate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey(pub RsaPublicKey);

impl PublicKey {
    pub fn from_key_pair(key_pair: &KeyPair) -> Self {
        key_pair.public_key()
    }

    /// Extracts an RSA public key from a `SubjectPublicKeyInfo`.
    pub fn from_x509spki(spki: &SubjectPublicKeyInfoOwned) -> Result<Self> {
        let der = spki.to_der()?;
        let public = RsaPublicKey::from_public_key_der(&der)
            .map_err(|e| IssuanceError::DecodingError(e.to_string()))?;
        Ok(PublicKey(public))
    }

    pub fn modulus_bytes(&self) -> Vec<u8> {
        self.0.n().to_bytes_be()
    }

    pub fn key_identifier(&self) -> Vec<u8> {
        Sha1::digest(self.modulus_bytes()).to_vec()
    }

    /// Verifies an RSASSA-PKCS1-v1_5 SHA-256 signature.
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> Result<()> {
        let verifying_key = VerifyingKey::<Sha256>::new(self.0.clone());
        let signature = Signature::try_from(signature)
            .map_err(|e| IssuanceError::DecodingError(e.to_string()))?;
        verifying_key
            .verify(data, &signature)
            .map_err(|e| IssuanceError::DecodingError(e.to_string()))
    }
}
