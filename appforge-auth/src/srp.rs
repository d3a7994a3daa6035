//! SRP-6a client-side computation for the federated login.
//!
//! The federated identity pool authenticates with a Secure Remote Password
//! challenge–response: the client sends its public ephemeral `A`, receives
//! the server's `B`, a salt, and an opaque secret block, then proves
//! knowledge of the password by signing the secret block with a key derived
//! from the shared SRP secret. The password itself is never transmitted.
//!
//! The group is the 3072-bit MODP group of RFC 3526 with generator 2 and
//! SHA-256 as the hash.

use base64::prelude::*;
use chrono::{DateTime, Utc};
use num_bigint::BigUint;
use ring::rand::{SecureRandom, SystemRandom};
use ring::{digest, hkdf, hmac};
use std::sync::LazyLock;

use crate::error::AuthError;

/// Hex digits of the 3072-bit MODP prime (RFC 3526, group 15).
const N_HEX: &str = "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74\
020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F1437\
4FE1356D6D51C245E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED\
EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3DC2007CB8A163BF05\
98DA48361C55D39A69163FA8FD24CF5F83655D23DCA3AD961C62F356208552BB\
9ED529077096966D670C354E4ABC9804F1746C08CA18217C32905E462E36CE3B\
E39E772C180E86039B2783A2EC07A28FB5C55DF06F4C52C9DE2BCBF695581718\
3995497CEA956AE515D2261898FA051015728E5A8AAAC42DAD33170D04507A33\
A85521ABDF1CBA64ECFB850458DBEF0A8AEA71575D060C7DB3970F85A6E1E4C7\
ABF5AE8CDB0933D71E8C94E04A25619DCEE3D2261AD2EE6BF12FFA06D98A0864\
D87602733EC86A64521F2B18177B200CBBE117577A615D6C770988C0BAD946E2\
08E24FA074E5AB3143DB5BFCE0FD108E4B82D120A93AD2CAFFFFFFFFFFFFFFFF";

/// HKDF info label binding the derived signing key to this protocol.
const DERIVED_KEY_INFO: &[u8] = b"Derived Key";

/// Byte length of the derived signing key.
const DERIVED_KEY_LEN: usize = 16;

/// Byte length of the random ephemeral exponent.
const EPHEMERAL_BYTES: usize = 128;

static N: LazyLock<BigUint> = LazyLock::new(|| {
    BigUint::parse_bytes(N_HEX.as_bytes(), 16).expect("RFC 3526 prime is valid hex")
});

static G: LazyLock<BigUint> = LazyLock::new(|| BigUint::from(2u32));

// ============================================================================
// SRP Client
// ============================================================================

/// Client side of one SRP handshake.
///
/// A client is single-use: it owns one random ephemeral exponent, exposes
/// the matching public value for the challenge request, and computes the
/// password claim once the server's challenge arrives.
pub struct SrpClient {
    a: BigUint,
    big_a: BigUint,
}

impl SrpClient {
    /// Creates a client with a fresh random ephemeral.
    pub fn new() -> Result<Self, AuthError> {
        let rng = SystemRandom::new();

        loop {
            let mut bytes = [0u8; EPHEMERAL_BYTES];
            rng.fill(&mut bytes)
                .map_err(|_| AuthError::Crypto("secure random source unavailable".to_string()))?;

            let a = BigUint::from_bytes_be(&bytes) % &*N;
            let big_a = G.modpow(&a, &N);

            // A ≡ 0 (mod N) would let the server force a zero shared secret.
            if big_a != BigUint::from(0u8) {
                return Ok(Self { a, big_a });
            }
        }
    }

    /// Hex encoding of the public ephemeral `A`.
    pub fn public_a_hex(&self) -> String {
        self.big_a.to_str_radix(16)
    }

    /// Computes the base64 password claim signature for the server's
    /// challenge.
    ///
    /// `salt_hex` and `b_hex` come from the challenge response;
    /// `secret_block_b64` is echoed back alongside the signature; `timestamp`
    /// must be the same string sent in the verification request (see
    /// [`srp_timestamp`]).
    pub fn password_claim(
        &self,
        pool_id: &str,
        username: &str,
        password: &str,
        salt_hex: &str,
        b_hex: &str,
        secret_block_b64: &str,
        timestamp: &str,
    ) -> Result<String, AuthError> {
        let b = parse_hex(b_hex, "server public value")?;
        if &b % &*N == BigUint::from(0u8) {
            return Err(AuthError::Crypto(
                "server public value is zero mod N".to_string(),
            ));
        }
        let salt = parse_hex(salt_hex, "salt")?;

        let u = hash_to_uint(&[&padded_bytes(&self.big_a), &padded_bytes(&b)]);
        if u == BigUint::from(0u8) {
            return Err(AuthError::Crypto("scrambling parameter is zero".to_string()));
        }

        let k = hash_to_uint(&[&padded_bytes(&N), &padded_bytes(&G)]);

        // x = H(salt || H(poolId | username | ":" | password))
        let credentials = sha256(&[
            pool_id.as_bytes(),
            username.as_bytes(),
            b":",
            password.as_bytes(),
        ]);
        let x = BigUint::from_bytes_be(&sha256(&[&padded_bytes(&salt), &credentials]));

        // S = (B - k * g^x) ^ (a + u * x) mod N
        let g_x = G.modpow(&x, &N);
        let k_gx = (&k * &g_x) % &*N;
        let base = ((&b + &*N) - &k_gx) % &*N;
        let exponent = &self.a + &u * &x;
        let shared = base.modpow(&exponent, &N);

        let key = derive_signing_key(&padded_bytes(&u), &padded_bytes(&shared))?;

        let secret_block = BASE64_STANDARD
            .decode(secret_block_b64)
            .map_err(|e| AuthError::Crypto(format!("secret block is not base64: {e}")))?;

        let mac_key = hmac::Key::new(hmac::HMAC_SHA256, &key);
        let mut message =
            Vec::with_capacity(pool_id.len() + username.len() + secret_block.len() + timestamp.len());
        message.extend_from_slice(pool_id.as_bytes());
        message.extend_from_slice(username.as_bytes());
        message.extend_from_slice(&secret_block);
        message.extend_from_slice(timestamp.as_bytes());

        let tag = hmac::sign(&mac_key, &message);
        Ok(BASE64_STANDARD.encode(tag.as_ref()))
    }
}

/// Formats the timestamp the pool expects in the verification request.
pub fn srp_timestamp(now: DateTime<Utc>) -> String {
    now.format("%a %b %-d %H:%M:%S UTC %Y").to_string()
}

// ============================================================================
// Helpers
// ============================================================================

fn sha256(parts: &[&[u8]]) -> Vec<u8> {
    let mut ctx = digest::Context::new(&digest::SHA256);
    for part in parts {
        ctx.update(part);
    }
    ctx.finish().as_ref().to_vec()
}

fn hash_to_uint(parts: &[&[u8]]) -> BigUint {
    BigUint::from_bytes_be(&sha256(parts))
}

/// Big-endian bytes with a leading zero when the high bit is set, so the
/// value hashes identically to a signed big-integer encoding.
fn padded_bytes(n: &BigUint) -> Vec<u8> {
    let mut bytes = n.to_bytes_be();
    if bytes.first().is_some_and(|&b| b >= 0x80) {
        bytes.insert(0, 0);
    }
    bytes
}

fn parse_hex(hex: &str, what: &str) -> Result<BigUint, AuthError> {
    BigUint::parse_bytes(hex.as_bytes(), 16)
        .ok_or_else(|| AuthError::Crypto(format!("{what} is not valid hex")))
}

struct SigningKeyLen;

impl hkdf::KeyType for SigningKeyLen {
    fn len(&self) -> usize {
        DERIVED_KEY_LEN
    }
}

fn derive_signing_key(salt: &[u8], ikm: &[u8]) -> Result<[u8; DERIVED_KEY_LEN], AuthError> {
    let salt = hkdf::Salt::new(hkdf::HKDF_SHA256, salt);
    let prk = salt.extract(ikm);
    let okm = prk
        .expand(&[DERIVED_KEY_INFO], SigningKeyLen)
        .map_err(|_| AuthError::Crypto("key derivation failed".to_string()))?;

    let mut key = [0u8; DERIVED_KEY_LEN];
    okm.fill(&mut key)
        .map_err(|_| AuthError::Crypto("key derivation failed".to_string()))?;
    Ok(key)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SECRET_BLOCK: &str = "c2VjcmV0LWJsb2Nr";

    #[test]
    fn test_public_a_is_nonzero_hex() {
        let client = SrpClient::new().unwrap();
        let a_hex = client.public_a_hex();

        let parsed = BigUint::parse_bytes(a_hex.as_bytes(), 16).unwrap();
        assert_ne!(parsed, BigUint::from(0u8));
        assert!(parsed < *N);
    }

    #[test]
    fn test_padded_bytes_prepends_zero_for_high_bit() {
        let low = BigUint::from(0x7Fu8);
        assert_eq!(padded_bytes(&low), vec![0x7F]);

        let high = BigUint::from(0x80u8);
        assert_eq!(padded_bytes(&high), vec![0x00, 0x80]);
    }

    #[test]
    fn test_claim_is_deterministic_for_same_inputs() {
        let client = SrpClient::new().unwrap();

        let first = client
            .password_claim("pool-1", "dev", "hunter2", "ab12", "1f2e3d4c", SECRET_BLOCK, "ts")
            .unwrap();
        let second = client
            .password_claim("pool-1", "dev", "hunter2", "ab12", "1f2e3d4c", SECRET_BLOCK, "ts")
            .unwrap();

        assert_eq!(first, second);
        // HMAC-SHA256 tag encodes to 44 base64 characters.
        assert_eq!(first.len(), 44);
    }

    #[test]
    fn test_claim_depends_on_password() {
        let client = SrpClient::new().unwrap();

        let right = client
            .password_claim("pool-1", "dev", "hunter2", "ab12", "1f2e3d4c", SECRET_BLOCK, "ts")
            .unwrap();
        let wrong = client
            .password_claim("pool-1", "dev", "hunter3", "ab12", "1f2e3d4c", SECRET_BLOCK, "ts")
            .unwrap();

        assert_ne!(right, wrong);
    }

    #[test]
    fn test_invalid_challenge_inputs_rejected() {
        let client = SrpClient::new().unwrap();

        assert!(client
            .password_claim("p", "u", "pw", "not hex!", "1f", SECRET_BLOCK, "ts")
            .is_err());
        assert!(client
            .password_claim("p", "u", "pw", "ab", "zz", SECRET_BLOCK, "ts")
            .is_err());
        assert!(client
            .password_claim("p", "u", "pw", "ab", "1f", "not base64!!", "ts")
            .is_err());
    }

    #[test]
    fn test_zero_server_value_rejected() {
        let client = SrpClient::new().unwrap();
        assert!(client
            .password_claim("p", "u", "pw", "ab", "0", SECRET_BLOCK, "ts")
            .is_err());
    }

    #[test]
    fn test_timestamp_format() {
        let moment = Utc.with_ymd_and_hms(2026, 8, 6, 9, 5, 7).unwrap();
        assert_eq!(srp_timestamp(moment), "Thu Aug 6 09:05:07 UTC 2026");
    }
}
