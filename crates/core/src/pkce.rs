//! PKCE (RFC 7636) helpers for the design API OAuth connect flow.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of generated code verifiers (RFC 7636 allows 43..=128).
pub const CODE_VERIFIER_LENGTH: usize = 64;

/// Length of the opaque OAuth `state` value.
pub const STATE_LENGTH: usize = 32;

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generate a fresh random code verifier.
pub fn generate_code_verifier() -> String {
    random_alphanumeric(CODE_VERIFIER_LENGTH)
}

/// Generate a random OAuth `state` value.
pub fn generate_state() -> String {
    random_alphanumeric(STATE_LENGTH)
}

/// `base64url(sha256(verifier))` without padding.
pub fn code_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}
