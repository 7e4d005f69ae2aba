//! Salt derivation.

use std::ops::RangeInclusive;

use argon2::password_hash::SaltString;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, NO_PAD};
use base64::Engine;
use zeroize::Zeroizing;

use crate::error::{MkcryptError, Result};

/// Default number of random bytes drawn for a salt.
pub const DEFAULT_SALT_LEN: usize = 16;

/// Random bytes accepted for a sha-crypt salt. Only the first 16 encoded
/// characters are used, so anything past 12 bytes adds nothing.
const CRYPT_SALT_LEN: RangeInclusive<usize> = 3..=64;

/// Random bytes accepted for an Argon2id salt: the `argon2` minimum up to
/// the 64 B64 characters a `SaltString` holds.
const ARGON2_SALT_LEN: RangeInclusive<usize> = argon2::MIN_SALT_LEN..=48;

/// Longest salt, in encoded characters, that sha-crypt reads.
const MAX_CRYPT_SALT_CHARS: usize = 16;

/// sha-crypt rounds bounds.
const CRYPT_ROUNDS_MIN: u32 = 1_000;
const CRYPT_ROUNDS_MAX: u32 = 999_999_999;

/// crypt(3) flavour of base64: `./0-9A-Za-z`, no padding.
const CRYPT_B64: GeneralPurpose = GeneralPurpose::new(&alphabet::CRYPT, NO_PAD);

/// Password hashing scheme, identified by its encoded prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    /// SHA-512 crypt, `$6$`
    #[default]
    Sha512Crypt,
    /// SHA-256 crypt, `$5$`
    Sha256Crypt,
    /// Argon2id in PHC string format, `$argon2id$`
    Argon2id,
}

impl Scheme {
    /// Prefix that selects this scheme in an encoded hash.
    pub fn prefix(self) -> &'static str {
        match self {
            Scheme::Sha512Crypt => "$6$",
            Scheme::Sha256Crypt => "$5$",
            Scheme::Argon2id => "$argon2id$",
        }
    }

    /// Scheme selected by an encoded hash or setting string.
    pub fn from_prefix(encoded: &str) -> Option<Self> {
        [Scheme::Sha512Crypt, Scheme::Sha256Crypt, Scheme::Argon2id]
            .into_iter()
            .find(|scheme| encoded.starts_with(scheme.prefix()))
    }
}

/// Parameters for one salt derivation.
///
/// A `cost` of zero selects the primitive's default: 5000 rounds for
/// sha-crypt, the `argon2` crate's default iteration count for Argon2id.
/// `random_source` is normally `None`, in which case the OS CSPRNG is used.
#[derive(Clone, Copy)]
pub struct SaltSpec<'a> {
    pub scheme: Scheme,
    pub cost: u32,
    pub random_source: Option<&'a [u8]>,
    pub salt_len: usize,
}

impl Default for SaltSpec<'_> {
    fn default() -> Self {
        Self {
            scheme: Scheme::default(),
            cost: 0,
            random_source: None,
            salt_len: DEFAULT_SALT_LEN,
        }
    }
}

impl std::fmt::Debug for SaltSpec<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaltSpec")
            .field("scheme", &self.scheme)
            .field("cost", &self.cost)
            .field("random_source", &self.random_source.map(|_| "[REDACTED]"))
            .field("salt_len", &self.salt_len)
            .finish()
    }
}

/// A generated salt, tied to the scheme and cost it was generated for.
///
/// The encoded text is zeroized when the salt is dropped.
pub struct Salt {
    scheme: Scheme,
    cost: u32,
    encoded: Zeroizing<String>,
}

impl Salt {
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Encoded salt characters, without prefix or parameters.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    /// crypt(3) setting string, e.g. `$6$rounds=10000$<salt>`.
    ///
    /// Only meaningful for the sha-crypt schemes.
    pub(crate) fn crypt_setting(&self) -> Zeroizing<String> {
        let mut setting = Zeroizing::new(String::from(self.scheme.prefix()));
        if self.cost != 0 {
            setting.push_str(&format!("rounds={}$", self.cost));
        }
        setting.push_str(&self.encoded);
        setting
    }
}

impl std::fmt::Debug for Salt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Salt")
            .field("scheme", &self.scheme)
            .field("cost", &self.cost)
            .field("encoded", &"[REDACTED]")
            .finish()
    }
}

/// Derive a fresh salt according to `spec`.
///
/// Fails with [`MkcryptError::SaltGenerationFailed`] when the entropy
/// source is unavailable, the caller-supplied bytes are too short, or the
/// length or cost is out of range for the scheme.
pub fn generate_salt(spec: &SaltSpec<'_>) -> Result<Salt> {
    let bounds = salt_len_bounds(spec.scheme);
    if !bounds.contains(&spec.salt_len) {
        return Err(MkcryptError::SaltGenerationFailed(format!(
            "Invalid argument: salt length must be between {} and {} bytes (got {})",
            bounds.start(),
            bounds.end(),
            spec.salt_len
        )));
    }
    validate_cost(spec.scheme, spec.cost)?;

    let bytes = random_bytes(spec)?;

    let encoded = match spec.scheme {
        Scheme::Sha512Crypt | Scheme::Sha256Crypt => {
            let mut encoded = Zeroizing::new(CRYPT_B64.encode(bytes.as_slice()));
            encoded.truncate(MAX_CRYPT_SALT_CHARS);
            encoded
        }
        Scheme::Argon2id => {
            let salt = SaltString::encode_b64(bytes.as_slice()).map_err(|e| {
                MkcryptError::SaltGenerationFailed(format!("Invalid argument: {}", e))
            })?;
            Zeroizing::new(salt.as_str().to_string())
        }
    };

    tracing::debug!(scheme = ?spec.scheme, cost = spec.cost, "Generated salt");

    Ok(Salt {
        scheme: spec.scheme,
        cost: spec.cost,
        encoded,
    })
}

fn salt_len_bounds(scheme: Scheme) -> RangeInclusive<usize> {
    match scheme {
        Scheme::Sha512Crypt | Scheme::Sha256Crypt => CRYPT_SALT_LEN,
        Scheme::Argon2id => ARGON2_SALT_LEN,
    }
}

fn validate_cost(scheme: Scheme, cost: u32) -> Result<()> {
    if cost == 0 {
        return Ok(());
    }
    match scheme {
        Scheme::Sha512Crypt | Scheme::Sha256Crypt => {
            if !(CRYPT_ROUNDS_MIN..=CRYPT_ROUNDS_MAX).contains(&cost) {
                return Err(MkcryptError::SaltGenerationFailed(format!(
                    "Invalid argument: rounds must be between {} and {} (got {})",
                    CRYPT_ROUNDS_MIN, CRYPT_ROUNDS_MAX, cost
                )));
            }
            Ok(())
        }
        Scheme::Argon2id => super::hash::argon2_params(cost).map(|_| ()),
    }
}

fn random_bytes(spec: &SaltSpec<'_>) -> Result<Zeroizing<Vec<u8>>> {
    let mut bytes = Zeroizing::new(vec![0u8; spec.salt_len]);
    match spec.random_source {
        Some(source) => {
            if source.len() < spec.salt_len {
                return Err(MkcryptError::SaltGenerationFailed(format!(
                    "Invalid argument: random source holds {} bytes, {} required",
                    source.len(),
                    spec.salt_len
                )));
            }
            bytes.copy_from_slice(&source[..spec.salt_len]);
        }
        None => {
            getrandom::getrandom(bytes.as_mut_slice()).map_err(|e| {
                MkcryptError::SaltGenerationFailed(format!("Failed to read random bytes: {}", e))
            })?;
        }
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_spec() {
        let spec = SaltSpec::default();
        assert_eq!(spec.scheme, Scheme::Sha512Crypt);
        assert_eq!(spec.cost, 0);
        assert!(spec.random_source.is_none());
        assert_eq!(spec.salt_len, DEFAULT_SALT_LEN);
    }

    #[test]
    fn test_scheme_prefix_round_trip() {
        for scheme in [Scheme::Sha512Crypt, Scheme::Sha256Crypt, Scheme::Argon2id] {
            assert_eq!(Scheme::from_prefix(scheme.prefix()), Some(scheme));
        }
        assert_eq!(Scheme::from_prefix("$1$abc"), None);
    }

    #[test]
    fn test_default_salt_is_sixteen_crypt_chars() {
        let salt = generate_salt(&SaltSpec::default()).unwrap();
        assert_eq!(salt.encoded().len(), MAX_CRYPT_SALT_CHARS);
        assert!(salt
            .encoded()
            .bytes()
            .all(|b| b == b'.' || b == b'/' || b.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_fresh_salts_differ() {
        let a = generate_salt(&SaltSpec::default()).unwrap();
        let b = generate_salt(&SaltSpec::default()).unwrap();
        assert_ne!(a.encoded(), b.encoded());
    }

    #[test]
    fn test_caller_random_source_is_deterministic() {
        let source = [7u8; 32];
        let spec = SaltSpec {
            random_source: Some(&source),
            ..SaltSpec::default()
        };
        let a = generate_salt(&spec).unwrap();
        let b = generate_salt(&spec).unwrap();
        assert_eq!(a.encoded(), b.encoded());
    }

    #[test]
    fn test_short_random_source_rejected() {
        let source = [1u8; 4];
        let spec = SaltSpec {
            random_source: Some(&source),
            ..SaltSpec::default()
        };
        let err = generate_salt(&spec).unwrap_err();
        assert!(matches!(err, MkcryptError::SaltGenerationFailed(_)));
        assert!(err.to_string().contains("random source"));
    }

    #[test]
    fn test_tiny_salt_len_rejected() {
        let spec = SaltSpec {
            salt_len: 2,
            ..SaltSpec::default()
        };
        assert!(matches!(
            generate_salt(&spec),
            Err(MkcryptError::SaltGenerationFailed(_))
        ));
    }

    #[test]
    fn test_huge_salt_len_rejected_without_allocating() {
        for scheme in [Scheme::Sha512Crypt, Scheme::Argon2id] {
            let spec = SaltSpec {
                scheme,
                salt_len: usize::MAX,
                ..SaltSpec::default()
            };
            let err = generate_salt(&spec).unwrap_err();
            assert!(matches!(err, MkcryptError::SaltGenerationFailed(_)));
            assert!(err.to_string().contains("salt length"));
        }
    }

    #[test]
    fn test_sha_crypt_salt_len_bounds() {
        for (salt_len, ok) in [(3, true), (64, true), (65, false)] {
            let spec = SaltSpec {
                salt_len,
                ..SaltSpec::default()
            };
            assert_eq!(generate_salt(&spec).is_ok(), ok, "salt_len {}", salt_len);
        }
    }

    #[test]
    fn test_argon2_salt_len_bounds() {
        for (salt_len, ok) in [(4, false), (7, false), (8, true), (48, true), (49, false)] {
            let spec = SaltSpec {
                scheme: Scheme::Argon2id,
                salt_len,
                ..SaltSpec::default()
            };
            assert_eq!(generate_salt(&spec).is_ok(), ok, "salt_len {}", salt_len);
        }
    }

    #[test]
    fn test_rounds_out_of_range_rejected() {
        let spec = SaltSpec {
            cost: 999,
            ..SaltSpec::default()
        };
        let err = generate_salt(&spec).unwrap_err();
        assert!(err.to_string().contains("rounds"));
    }

    #[test]
    fn test_setting_includes_rounds_only_when_set() {
        let default_salt = generate_salt(&SaltSpec::default()).unwrap();
        let setting = default_salt.crypt_setting();
        assert!(setting.starts_with("$6$"));
        assert!(!setting.contains("rounds="));

        let spec = SaltSpec {
            scheme: Scheme::Sha256Crypt,
            cost: 10_000,
            ..SaltSpec::default()
        };
        let salt = generate_salt(&spec).unwrap();
        assert!(salt.crypt_setting().starts_with("$5$rounds=10000$"));
    }

    #[test]
    fn test_argon2_salt_is_b64() {
        let spec = SaltSpec {
            scheme: Scheme::Argon2id,
            ..SaltSpec::default()
        };
        let salt = generate_salt(&spec).unwrap();
        assert!(SaltString::from_b64(salt.encoded()).is_ok());
    }

    #[test]
    fn test_debug_redacts() {
        let source = [0xabu8; 16];
        let spec = SaltSpec {
            random_source: Some(&source),
            ..SaltSpec::default()
        };
        let salt = generate_salt(&spec).unwrap();
        let debug_output = format!("{:?} {:?}", spec, salt);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains(salt.encoded()));
        assert!(!debug_output.contains(&hex::encode(&source[..4])));
    }
}
