//! Sample section decoders: plain (ASCII), packed bits and raw binary.

use alloc::vec;
use alloc::vec::Vec;
use enough::Stop;

use super::scanner::{Scanner, lossy, parse_decimal};
use super::{Header, PnmFamily, PnmFormat, SampleEncoding};
use crate::PnmError;
use crate::decode::SamplePolicy;
use crate::raster::{Raster, buffer_len};

/// Decode the sample section that follows a parsed header.
pub(crate) fn decode_samples(
    scanner: &mut Scanner<'_>,
    header: &Header,
    format: PnmFormat,
    policy: SamplePolicy,
    stop: &dyn Stop,
) -> Result<Raster, PnmError> {
    let family = format.family();
    let len = buffer_len(header, family)?;

    let samples = match (family, format.encoding()) {
        (PnmFamily::Pbm, SampleEncoding::Ascii) => decode_plain_bits(scanner, header, len, stop)?,
        (PnmFamily::Pbm, SampleEncoding::Binary) => decode_packed_bits(scanner, header, len, stop)?,
        (_, SampleEncoding::Ascii) => decode_plain_samples(scanner, header, len, policy, stop)?,
        (_, SampleEncoding::Binary) => decode_raw_samples(scanner, header, len, policy, stop)?,
    };

    if format.encoding() == SampleEncoding::Binary && scanner.remaining() > 0 {
        log::warn!(
            "ignoring {} bytes after {format} sample data",
            scanner.remaining()
        );
    }

    Raster::from_parts(header, family, samples)
}

/// P1: one `0`/`1` character per pixel, `1` meaning black. Stored inverted
/// so that a set bit is white.
fn decode_plain_bits(
    scanner: &mut Scanner<'_>,
    header: &Header,
    len: usize,
    stop: &dyn Stop,
) -> Result<Vec<u8>, PnmError> {
    let w = header.width as usize;
    let h = header.height as usize;
    let expected = w * h;
    let stride = w.div_ceil(8);
    // Every pixel takes at least one input byte; count what is there
    // instead of allocating for a header that cannot be satisfied.
    if expected > scanner.remaining() {
        let actual = core::iter::from_fn(|| scanner.next_bit()).count();
        return Err(PnmError::SampleCountMismatch { expected, actual });
    }
    let mut out = vec![0u8; len];

    for y in 0..h {
        if y % 16 == 0 {
            stop.check()?;
        }
        let row = &mut out[y * stride..(y + 1) * stride];
        for x in 0..w {
            let (offset, byte) = scanner
                .next_bit()
                .ok_or(PnmError::SampleCountMismatch {
                    expected,
                    actual: y * w + x,
                })?;
            match byte {
                b'0' => row[x / 8] |= 0x80 >> (x % 8),
                b'1' => {}
                other => {
                    return Err(PnmError::InvalidSampleToken {
                        offset,
                        token: lossy(&[other]),
                    });
                }
            }
        }
    }

    let extra = core::iter::from_fn(|| scanner.next_bit()).count();
    if extra > 0 {
        return Err(PnmError::SampleCountMismatch {
            expected,
            actual: expected + extra,
        });
    }
    Ok(out)
}

/// P4: rows of packed bits, MSB first, `1` meaning black.
fn decode_packed_bits(
    scanner: &mut Scanner<'_>,
    header: &Header,
    len: usize,
    stop: &dyn Stop,
) -> Result<Vec<u8>, PnmError> {
    let stride = (header.width as usize).div_ceil(8);
    let packed = scanner.next_bytes(len)?;
    let pad = (8 - header.width % 8) % 8;
    let last_mask = 0xffu8 << pad;

    let mut out = Vec::with_capacity(len);
    for (row_idx, row) in packed.chunks_exact(stride).enumerate() {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        out.extend(row.iter().map(|&b| !b));
        if let Some(last) = out.last_mut() {
            *last &= last_mask;
        }
    }
    Ok(out)
}

/// P2/P3: whitespace-separated decimal samples.
fn decode_plain_samples(
    scanner: &mut Scanner<'_>,
    header: &Header,
    len: usize,
    policy: SamplePolicy,
    stop: &dyn Stop,
) -> Result<Vec<u8>, PnmError> {
    let sb = header.sample_bytes();
    let expected = len / sb;
    let row_samples = header.width as usize * header.depth as usize;
    let mut checker = RangeCheck::new(header.maxval, policy);
    let mut out = Vec::with_capacity(len.min(scanner.remaining().saturating_mul(sb)));

    for index in 0..expected {
        if row_samples > 0 && index % (row_samples * 16) == 0 {
            stop.check()?;
        }
        let token = scanner.next_token().ok_or(PnmError::SampleCountMismatch {
            expected,
            actual: index,
        })?;
        let value = parse_decimal(token).ok_or_else(|| PnmError::InvalidSampleToken {
            offset: scanner.position() - token.len(),
            token: lossy(token),
        })?;
        let value = checker.apply(index, value)?;
        if sb == 1 {
            out.push(value as u8);
        } else {
            out.extend_from_slice(&value.to_be_bytes());
        }
    }

    let extra = core::iter::from_fn(|| scanner.next_token()).count();
    if extra > 0 {
        return Err(PnmError::SampleCountMismatch {
            expected,
            actual: expected + extra,
        });
    }
    checker.finish();
    Ok(out)
}

/// P5/P6/P7: raw samples, one byte or two big-endian bytes each.
fn decode_raw_samples(
    scanner: &mut Scanner<'_>,
    header: &Header,
    len: usize,
    policy: SamplePolicy,
    stop: &dyn Stop,
) -> Result<Vec<u8>, PnmError> {
    let raw = scanner.next_bytes(len)?;
    stop.check()?;
    let mut out = raw.to_vec();

    // Raw samples always fit their width; only maxval needs checking.
    if policy == SamplePolicy::Accept {
        return Ok(out);
    }
    let mut checker = RangeCheck::new(header.maxval, policy);
    let sb = header.sample_bytes();
    for (index, sample) in out.chunks_exact_mut(sb).enumerate() {
        let value = if sb == 1 {
            u32::from(sample[0])
        } else {
            u32::from(u16::from_be_bytes([sample[0], sample[1]]))
        };
        let checked = checker.apply(index, value)?;
        if sb == 1 {
            sample[0] = checked as u8;
        } else {
            sample.copy_from_slice(&checked.to_be_bytes());
        }
    }
    checker.finish();
    Ok(out)
}

struct RangeCheck {
    maxval: u32,
    width_limit: u32,
    policy: SamplePolicy,
    clamped: usize,
}

impl RangeCheck {
    fn new(maxval: u32, policy: SamplePolicy) -> Self {
        Self {
            maxval,
            width_limit: if maxval > 255 { 65535 } else { 255 },
            policy,
            clamped: 0,
        }
    }

    fn apply(&mut self, index: usize, value: u32) -> Result<u16, PnmError> {
        if value <= self.maxval {
            return Ok(value as u16);
        }
        let out_of_range = PnmError::SampleOutOfRange {
            index,
            value,
            maxval: self.maxval,
        };
        match self.policy {
            SamplePolicy::Reject => Err(out_of_range),
            SamplePolicy::Clamp => {
                self.clamped += 1;
                Ok(self.maxval as u16)
            }
            SamplePolicy::Accept if value <= self.width_limit => Ok(value as u16),
            SamplePolicy::Accept => Err(out_of_range),
        }
    }

    fn finish(self) {
        if self.clamped > 0 {
            log::warn!(
                "clamped {} samples to maxval {}",
                self.clamped,
                self.maxval
            );
        }
    }
}
