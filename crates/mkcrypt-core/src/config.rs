//! Fixed policy applied to every run.

use crate::crypto::SaltSpec;
use crate::verify::MIN_LEN;

/// Length policy and salt parameters for one invocation.
#[derive(Debug, Clone, Copy)]
pub struct Policy<'a> {
    /// Minimum password length after trimming.
    pub min_len: usize,
    /// Salt derivation parameters handed to the hasher.
    pub salt: SaltSpec<'a>,
}

impl Default for Policy<'_> {
    fn default() -> Self {
        Self {
            min_len: MIN_LEN,
            salt: SaltSpec::default(),
        }
    }
}
