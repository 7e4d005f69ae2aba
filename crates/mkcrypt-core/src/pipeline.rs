//! The read → confirm → verify → hash sequence.

use std::io::{BufRead, Write};

use crate::buffer::SensitiveBuffer;
use crate::config::Policy;
use crate::crypto::{generate_salt, hash, HashResult};
use crate::error::Result;
use crate::reader::read_line;
use crate::terminal::EchoControl;

/// Where a session is, or where it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    ReadingPassword,
    ReadingConfirmation,
    Verifying,
    Hashing,
    Done,
    Failed,
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Done | Stage::Failed)
    }
}

/// One password-hashing run and the buffers it owns.
///
/// Both buffers are cleared by the time [`Session::run`] returns, whatever
/// the outcome, and again when the session is dropped.
#[derive(Debug)]
pub struct Session {
    password: SensitiveBuffer,
    confirmation: SensitiveBuffer,
    stage: Stage,
    failed_at: Option<Stage>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            password: SensitiveBuffer::new(),
            confirmation: SensitiveBuffer::new(),
            stage: Stage::Start,
            failed_at: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The stage that was active when the session failed.
    pub fn failed_at(&self) -> Option<Stage> {
        self.failed_at
    }

    /// True when no secret material remains in either buffer.
    pub fn is_cleared(&self) -> bool {
        self.password.is_cleared() && self.confirmation.is_cleared()
    }

    /// Prompt twice, verify, hash, and write `Crypt: <hash>` to `output`.
    ///
    /// Prompts go to `output`; input is read from `input` with echo
    /// disabled through `term`. A session runs at most once.
    pub fn run<T, R, W>(
        &mut self,
        term: &mut T,
        input: &mut R,
        output: &mut W,
        policy: &Policy<'_>,
    ) -> Result<HashResult>
    where
        T: EchoControl,
        R: BufRead,
        W: Write,
    {
        debug_assert_eq!(self.stage, Stage::Start, "session already ran");

        match self.drive(term, input, output, policy) {
            Ok(result) => {
                self.stage = Stage::Done;
                tracing::debug!("Session finished");
                Ok(result)
            }
            Err(err) => {
                self.password.clear();
                self.confirmation.clear();
                self.failed_at = Some(self.stage);
                tracing::debug!(stage = ?self.stage, "Session failed: {err}");
                self.stage = Stage::Failed;
                Err(err)
            }
        }
    }

    fn drive<T, R, W>(
        &mut self,
        term: &mut T,
        input: &mut R,
        output: &mut W,
        policy: &Policy<'_>,
    ) -> Result<HashResult>
    where
        T: EchoControl,
        R: BufRead,
        W: Write,
    {
        self.enter(Stage::ReadingPassword);
        write!(output, "Password: ")?;
        output.flush()?;
        read_line(term, input, &mut self.password)?;

        self.enter(Stage::ReadingConfirmation);
        write!(output, "\nVerify password: ")?;
        output.flush()?;
        read_line(term, input, &mut self.confirmation)?;
        writeln!(output)?;

        self.enter(Stage::Verifying);
        crate::verify::verify(&self.password, &mut self.confirmation, policy.min_len)?;

        self.enter(Stage::Hashing);
        let salt = generate_salt(&policy.salt)?;
        let result = hash(&mut self.password, salt)?;

        writeln!(output, "Crypt: {}", result)?;
        output.flush()?;
        Ok(result)
    }

    fn enter(&mut self, stage: Stage) {
        tracing::debug!(from = ?self.stage, to = ?stage, "Stage transition");
        self.stage = stage;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Run a fresh [`Session`] to completion.
///
/// The session, and with it every sensitive buffer, is dropped before this
/// returns.
pub fn run<T, R, W>(
    term: &mut T,
    input: &mut R,
    output: &mut W,
    policy: &Policy<'_>,
) -> Result<HashResult>
where
    T: EchoControl,
    R: BufRead,
    W: Write,
{
    Session::new().run(term, input, output, policy)
}
