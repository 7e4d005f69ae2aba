//! Double-entry confirmation and length policy.

use crate::buffer::SensitiveBuffer;
use crate::error::{MkcryptError, Result};

/// Minimum password length in bytes, measured after trimming.
pub const MIN_LEN: usize = 8;

/// Check that both entries match and the password is long enough.
///
/// The confirmation is always cleared before this returns: it is no longer
/// needed once compared, whatever the outcome. The length check runs only
/// after the entries matched, so an empty password surfaces as a policy
/// violation. On success the password stays live in its buffer for hashing.
pub fn verify(
    password: &SensitiveBuffer,
    confirmation: &mut SensitiveBuffer,
    min_len: usize,
) -> Result<()> {
    let matches = password.as_bytes() == confirmation.as_bytes();
    confirmation.clear();

    if !matches {
        return Err(MkcryptError::ConfirmationMismatch);
    }

    if password.len() < min_len {
        return Err(MkcryptError::PolicyViolation { min_len });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::buffer_from;

    fn trimmed(bytes: &[u8]) -> SensitiveBuffer {
        let mut buffer = buffer_from(bytes);
        buffer.trim();
        buffer
    }

    #[test]
    fn test_matching_long_enough_passes() {
        let password = trimmed(b"Str0ngPass!");
        let mut confirmation = trimmed(b"Str0ngPass!");
        assert!(verify(&password, &mut confirmation, MIN_LEN).is_ok());
        assert_eq!(password.as_bytes(), b"Str0ngPass!");
        assert!(confirmation.is_cleared());
    }

    #[test]
    fn test_mismatch_clears_confirmation() {
        let password = trimmed(b"password1");
        let mut confirmation = trimmed(b"password2");
        let result = verify(&password, &mut confirmation, MIN_LEN);
        assert!(matches!(result, Err(MkcryptError::ConfirmationMismatch)));
        assert!(confirmation.is_cleared());
    }

    #[test]
    fn test_mismatch_reported_before_length() {
        let password = trimmed(b"abc");
        let mut confirmation = trimmed(b"abd");
        let result = verify(&password, &mut confirmation, MIN_LEN);
        assert!(matches!(result, Err(MkcryptError::ConfirmationMismatch)));
    }

    #[test]
    fn test_short_password_violates_policy() {
        let password = trimmed(b"abc");
        let mut confirmation = trimmed(b"abc");
        let result = verify(&password, &mut confirmation, MIN_LEN);
        assert!(matches!(
            result,
            Err(MkcryptError::PolicyViolation { min_len: MIN_LEN })
        ));
        assert!(confirmation.is_cleared());
    }

    #[test]
    fn test_trimmed_length_is_what_counts() {
        let password = trimmed(b"  trimMe  ");
        let mut confirmation = trimmed(b"  trimMe  ");
        let result = verify(&password, &mut confirmation, MIN_LEN);
        assert!(matches!(result, Err(MkcryptError::PolicyViolation { .. })));
    }

    #[test]
    fn test_empty_entries_violate_policy() {
        let password = SensitiveBuffer::new();
        let mut confirmation = SensitiveBuffer::new();
        let result = verify(&password, &mut confirmation, MIN_LEN);
        assert!(matches!(result, Err(MkcryptError::PolicyViolation { .. })));
    }

    #[test]
    fn test_exactly_min_length_passes() {
        let password = trimmed(b"12345678");
        let mut confirmation = trimmed(b"12345678");
        assert!(verify(&password, &mut confirmation, MIN_LEN).is_ok());
    }

    #[test]
    fn test_policy_message_names_minimum() {
        let err = MkcryptError::PolicyViolation { min_len: MIN_LEN };
        assert_eq!(err.to_string(), "Password must be at least 8 characters long");
    }
}
