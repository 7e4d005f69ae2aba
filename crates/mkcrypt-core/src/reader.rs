//! Reading one secret line from the user.

use std::io::{self, BufRead};

use crate::buffer::SensitiveBuffer;
use crate::error::Result;
use crate::terminal::{EchoControl, EchoGuard};

/// How a read stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineEnd {
    Newline,
    Eof,
    Truncated,
}

/// Read one line into `buffer` with echo disabled, then normalize it.
///
/// At most `MAX_LEN - 1` bytes are kept. The line terminator is stripped and
/// surrounding whitespace trimmed in place. End of input and read errors
/// leave the buffer empty rather than failing; the caller validates the
/// (possibly empty) result. Bytes past the capacity are consumed up to the
/// end of the line and discarded, so they never spill into the next read.
///
/// The only error is failing to take control of the terminal, in which case
/// nothing was read and the terminal was left as it was.
pub fn read_line<T, R>(term: &mut T, input: &mut R, buffer: &mut SensitiveBuffer) -> Result<()>
where
    T: EchoControl,
    R: BufRead,
{
    buffer.clear();

    let outcome = {
        let _guard = EchoGuard::acquire(term)?;
        fill_line(input, buffer)
    };

    match outcome {
        Ok(LineEnd::Newline) => {
            if buffer.last() == Some(b'\r') {
                buffer.pop();
            }
        }
        Ok(LineEnd::Eof) => {}
        Ok(LineEnd::Truncated) => {
            tracing::warn!(
                "Input longer than {} bytes was truncated",
                SensitiveBuffer::max_content_len()
            );
            if let Err(err) = discard_line(input) {
                tracing::debug!("Failed to discard rest of line: {err}");
            }
        }
        Err(err) => {
            tracing::debug!("Read failed, treating input as empty: {err}");
            buffer.clear();
        }
    }

    buffer.trim();
    Ok(())
}

/// Copy bytes from `input` straight into `buffer` until a newline, end of
/// input, or a full buffer. The newline itself is consumed but not stored.
fn fill_line<R: BufRead>(input: &mut R, buffer: &mut SensitiveBuffer) -> io::Result<LineEnd> {
    loop {
        let available = match input.fill_buf() {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        if available.is_empty() {
            return Ok(LineEnd::Eof);
        }

        let mut consumed = 0;
        let mut end = None;
        for &byte in available {
            if byte == b'\n' {
                consumed += 1;
                end = Some(LineEnd::Newline);
                break;
            }
            if !buffer.push(byte) {
                end = Some(LineEnd::Truncated);
                break;
            }
            consumed += 1;
        }
        input.consume(consumed);

        if let Some(end) = end {
            return Ok(end);
        }
    }
}

/// Consume and drop everything up to and including the next newline.
fn discard_line<R: BufRead>(input: &mut R) -> io::Result<()> {
    loop {
        let available = match input.fill_buf() {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        if available.is_empty() {
            return Ok(());
        }
        match available.iter().position(|&b| b == b'\n') {
            Some(i) => {
                input.consume(i + 1);
                return Ok(());
            }
            None => {
                let len = available.len();
                input.consume(len);
            }
        }
    }
}
