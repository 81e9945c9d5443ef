//! Byte cursor for the Netpbm header and ASCII sample grammar.
//!
//! Tokens are runs of non-whitespace bytes. Whitespace and `#` comments
//! (to end of line) are skipped between tokens, never inside raw byte runs.
//! The cursor only moves forward.

use alloc::string::String;

use crate::PnmError;

pub(crate) struct Scanner<'a> {
    data: &'a [u8],
    pos: usize,
}

/// Netpbm whitespace: space, tab, CR, LF, VT, FF.
fn is_pnm_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n' | 0x0b | 0x0c)
}

pub(crate) fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Parse an unsigned decimal token. `None` on non-digits, empty input or overflow.
pub(crate) fn parse_decimal(token: &[u8]) -> Option<u32> {
    if token.is_empty() {
        return None;
    }
    token.iter().try_fold(0u32, |acc, &b| {
        if !b.is_ascii_digit() {
            return None;
        }
        acc.checked_mul(10)?.checked_add(u32::from(b - b'0'))
    })
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(&byte) = self.data.get(self.pos) {
            if byte == b'#' {
                while let Some(&b) = self.data.get(self.pos) {
                    self.pos += 1;
                    if b == b'\n' {
                        break;
                    }
                }
            } else if is_pnm_space(byte) {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// Next whitespace-delimited token, or `None` at end of input.
    ///
    /// The cursor is left on the byte directly after the token.
    pub(crate) fn next_token(&mut self) -> Option<&'a [u8]> {
        self.skip_whitespace_and_comments();
        let start = self.pos;
        while let Some(&byte) = self.data.get(self.pos) {
            if is_pnm_space(byte) || byte == b'#' {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            None
        } else {
            Some(&self.data[start..self.pos])
        }
    }

    /// Like [`Self::next_token`], failing with `UnexpectedEof` at end of input.
    pub(crate) fn expect_token(&mut self) -> Result<&'a [u8], PnmError> {
        self.next_token()
            .ok_or(PnmError::UnexpectedEof { offset: self.pos })
    }

    /// Read a header token as an unsigned decimal integer.
    pub(crate) fn next_u32(&mut self, field: &'static str) -> Result<u32, PnmError> {
        let token = self.expect_token()?;
        parse_decimal(token).ok_or_else(|| PnmError::InvalidHeaderValue {
            field,
            value: lossy(token),
        })
    }

    /// Next single non-whitespace byte with its offset. Plain PBM bits need
    /// not be separated, so `0110` is four samples.
    pub(crate) fn next_bit(&mut self) -> Option<(usize, u8)> {
        self.skip_whitespace_and_comments();
        let offset = self.pos;
        let byte = *self.data.get(offset)?;
        self.pos += 1;
        Some((offset, byte))
    }

    /// The remainder of the current line with surrounding blanks trimmed.
    /// The terminating newline is left in place.
    pub(crate) fn rest_of_line(&mut self) -> &'a [u8] {
        while let Some(&byte) = self.data.get(self.pos) {
            if byte == b'\n' || !is_pnm_space(byte) {
                break;
            }
            self.pos += 1;
        }
        let start = self.pos;
        while let Some(&byte) = self.data.get(self.pos) {
            if byte == b'\n' {
                break;
            }
            self.pos += 1;
        }
        let mut end = self.pos;
        while end > start && is_pnm_space(self.data[end - 1]) {
            end -= 1;
        }
        &self.data[start..end]
    }

    /// Consume the single whitespace byte that ends a header. A comment
    /// directly after the last token is skipped and its newline becomes the
    /// separator.
    pub(crate) fn consume_separator(&mut self) -> Result<(), PnmError> {
        match self.data.get(self.pos) {
            None => Err(PnmError::UnexpectedEof { offset: self.pos }),
            Some(b'#') => {
                let newline = self.data[self.pos..]
                    .iter()
                    .position(|&b| b == b'\n')
                    .ok_or(PnmError::UnexpectedEof {
                        offset: self.data.len(),
                    })?;
                self.pos += newline + 1;
                log::trace!("header separator after comment, data at byte {}", self.pos);
                Ok(())
            }
            Some(&byte) if is_pnm_space(byte) => {
                log::trace!("header separator {byte:#04x} at byte {}", self.pos);
                self.pos += 1;
                Ok(())
            }
            Some(&byte) => Err(PnmError::InvalidHeaderValue {
                field: "separator",
                value: lossy(&[byte]),
            }),
        }
    }

    /// Exactly `n` raw bytes, without any whitespace or comment handling.
    pub(crate) fn next_bytes(&mut self, n: usize) -> Result<&'a [u8], PnmError> {
        let available = self.remaining();
        if available < n {
            return Err(PnmError::TruncatedSampleData {
                expected_bytes: n,
                available_bytes: available,
            });
        }
        let run = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(run)
    }
}
