//! PKCE verifier/challenge generation.

use base64::prelude::*;
use ring::digest;
use ring::rand::{SecureRandom, SystemRandom};

use crate::error::AuthError;

/// Byte length of the random verifier material.
const VERIFIER_BYTES: usize = 32;

/// A PKCE code verifier and its derived challenge.
///
/// The challenge is `base64url(SHA256(verifier))` with no padding, the `S256`
/// method of RFC 7636.
#[derive(Debug, Clone)]
pub struct PkcePair {
    /// The locally-held secret, sent only to the token endpoint.
    pub verifier: String,
    /// The derived challenge, sent with the authorization request.
    pub challenge: String,
}

impl PkcePair {
    /// Generates a fresh pair from the system's secure random source.
    pub fn generate() -> Result<Self, AuthError> {
        let rng = SystemRandom::new();
        let mut bytes = [0u8; VERIFIER_BYTES];
        rng.fill(&mut bytes)
            .map_err(|_| AuthError::Crypto("secure random source unavailable".to_string()))?;

        let verifier = BASE64_URL_SAFE_NO_PAD.encode(bytes);
        let challenge = Self::challenge_for(&verifier);

        Ok(Self {
            verifier,
            challenge,
        })
    }

    fn challenge_for(verifier: &str) -> String {
        let digest = digest::digest(&digest::SHA256, verifier.as_bytes());
        BASE64_URL_SAFE_NO_PAD.encode(digest.as_ref())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_is_sha256_of_verifier() {
        let pair = PkcePair::generate().unwrap();

        let digest = digest::digest(&digest::SHA256, pair.verifier.as_bytes());
        let expected = BASE64_URL_SAFE_NO_PAD.encode(digest.as_ref());
        assert_eq!(pair.challenge, expected);
    }

    #[test]
    fn test_pairs_are_unique() {
        let a = PkcePair::generate().unwrap();
        let b = PkcePair::generate().unwrap();
        assert_ne!(a.verifier, b.verifier);
        assert_ne!(a.challenge, b.challenge);
    }

    #[test]
    fn test_url_safe_encoding() {
        let pair = PkcePair::generate().unwrap();
        assert!(!pair.verifier.contains('+'));
        assert!(!pair.verifier.contains('/'));
        assert!(!pair.verifier.contains('='));
        // 32 bytes of entropy encode to 43 characters.
        assert_eq!(pair.verifier.len(), 43);
        assert_eq!(pair.challenge.len(), 43);
    }
}
