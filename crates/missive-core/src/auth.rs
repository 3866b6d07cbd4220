//! Password hashing for staff accounts.
//!
//! Stored form: `sha256$<iterations>$<salt_hex>$<digest_hex>`. The digest is
//! an iterated salted SHA-256 chain. Verification re-derives with the
//! parameters embedded in the stored string, so iteration counts can change
//! without invalidating existing hashes.

use rand::RngCore;
use sha2::{Digest, Sha256};

const SCHEME: &str = "sha256";
const DEFAULT_ITERATIONS: u32 = 50_000;
const SALT_LEN: usize = 16;

/// Hash a password with a fresh random salt.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let mut salt = [0_u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    encode(password, &salt, DEFAULT_ITERATIONS)
}

/// Check `password` against a stored hash. Malformed stored values verify
/// as false rather than erroring; a corrupt row must not grant access.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(scheme), Some(iterations), Some(salt_hex), Some(digest_hex), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };

    if scheme != SCHEME {
        return false;
    }
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    let Some(salt) = decode_hex(salt_hex) else {
        return false;
    };

    let derived = derive_hex(password, &salt, iterations);
    constant_time_eq(derived.as_bytes(), digest_hex.as_bytes())
}

fn encode(password: &str, salt: &[u8], iterations: u32) -> String {
    let digest = derive_hex(password, salt, iterations);
    format!("{SCHEME}${iterations}${}${digest}", encode_hex(salt))
}

fn derive_hex(password: &str, salt: &[u8], iterations: u32) -> String {
    let mut state = {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(password.as_bytes());
        hasher.finalize()
    };

    for _ in 1..iterations.max(1) {
        let mut hasher = Sha256::new();
        hasher.update(state);
        hasher.update(salt);
        state = hasher.finalize();
    }

    encode_hex(&state)
}

fn encode_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

fn decode_hex(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 || !hex.is_ascii() {
        return None;
    }
    hex.as_bytes()
        .chunks(2)
        .map(|pair| {
            let pair = std::str::from_utf8(pair).ok()?;
            u8::from_str_radix(pair, 16).ok()
        })
        .collect()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0_u8;
    for (x, y) in a.iter().zip(b) {
        diff |= x ^ y;
    }
    diff == 0
}
