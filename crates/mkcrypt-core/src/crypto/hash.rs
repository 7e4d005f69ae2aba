//! Password hashing with a generated salt.

use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};

use crate::buffer::SensitiveBuffer;
use crate::error::{MkcryptError, Result};

use super::salt::{Salt, Scheme};

/// Encoded hash embedding scheme, parameters, salt and digest.
///
/// This is the one output of the tool and is not secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashResult(String);

impl HashResult {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for HashResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hash the password in `password` with `salt`.
///
/// The scheme is the one the salt was generated for. The password buffer is
/// cleared and the salt dropped (zeroizing it) before this returns, on
/// success and on failure alike.
pub fn hash(password: &mut SensitiveBuffer, salt: Salt) -> Result<HashResult> {
    let outcome = compute(password.as_bytes(), &salt);
    password.clear();
    drop(salt);
    outcome
}

fn compute(password: &[u8], salt: &Salt) -> Result<HashResult> {
    match salt.scheme() {
        Scheme::Sha512Crypt | Scheme::Sha256Crypt => {
            let setting = salt.crypt_setting();
            pwhash::unix::crypt(password, setting.as_str())
                .map(HashResult)
                .map_err(|e| MkcryptError::Hash(e.to_string()))
        }
        Scheme::Argon2id => {
            let salt_string = SaltString::from_b64(salt.encoded())
                .map_err(|e| MkcryptError::Hash(format!("Invalid salt: {}", e)))?;
            let params = argon2_params(salt.cost())?;
            Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
                .hash_password(password, &salt_string)
                .map(|hash| HashResult(hash.to_string()))
                .map_err(|e| MkcryptError::Hash(e.to_string()))
        }
    }
}

/// Argon2 parameters for an iteration count, 0 meaning the crate default.
pub(crate) fn argon2_params(cost: u32) -> Result<Params> {
    let t_cost = if cost == 0 {
        Params::DEFAULT_T_COST
    } else {
        cost
    };
    Params::new(
        Params::DEFAULT_M_COST,
        t_cost,
        Params::DEFAULT_P_COST,
        None,
    )
    .map_err(|e| MkcryptError::SaltGenerationFailed(format!("Invalid argument: {}", e)))
}

/// Check `password` against an encoded hash using the primitive's own
/// verification routine.
///
/// Unknown or malformed encodings never verify.
pub fn verify_hash(password: &[u8], encoded: &str) -> bool {
    match Scheme::from_prefix(encoded) {
        Some(Scheme::Argon2id) => PasswordHash::new(encoded)
            .and_then(|parsed| Argon2::default().verify_password(password, &parsed))
            .is_ok(),
        Some(Scheme::Sha512Crypt | Scheme::Sha256Crypt) => pwhash::unix::verify(password, encoded),
        None => false,
    }
}
