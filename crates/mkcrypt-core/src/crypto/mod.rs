//! Salt generation and password hashing.
//!
//! This module drives well-audited primitives rather than implementing any
//! transform itself:
//! - **sha-crypt** (`$6$`, `$5$`): the crypt(3) schemes, via `pwhash`
//! - **Argon2id** (`$argon2id$`): memory-hard PHC scheme, via `argon2`
//!
//! ## Security Model
//!
//! - Salt bytes come from the OS CSPRNG unless the caller supplies its own
//! - The password buffer and salt text are zeroized once hashing finishes,
//!   whether or not it succeeded
//! - The encoded hash is the only value that leaves this module

pub mod hash;
pub mod salt;

pub use hash::{hash, verify_hash, HashResult};
pub use salt::{generate_salt, Salt, SaltSpec, Scheme, DEFAULT_SALT_LEN};
