//! PNM encoder for all seven magic numbers.

use alloc::format;
use alloc::vec::Vec;
use core::fmt::Write as _;
use enough::Stop;

use super::{Header, PnmFamily, PnmFormat, SampleEncoding};
use crate::PnmError;
use crate::raster::Raster;

/// Plain files keep lines at or under this many characters.
const PLAIN_LINE_LIMIT: usize = 70;

/// Encode `raster` as `format`, with `header` describing it.
pub(crate) fn encode_pnm(
    header: &Header,
    format: PnmFormat,
    raster: &Raster,
    stop: &dyn Stop,
) -> Result<Vec<u8>, PnmError> {
    header.validate(format)?;
    raster.check_matches(header, format)?;
    stop.check()?;

    let head = header_text(header, format);
    let body_hint = match format.encoding() {
        SampleEncoding::Binary => raster.samples().len(),
        // Rough: up to five characters and a separator per sample.
        SampleEncoding::Ascii => raster.samples().len().saturating_mul(4),
    };
    let mut out = Vec::with_capacity(head.len().saturating_add(body_hint));
    out.extend_from_slice(head.as_bytes());

    match (format.family(), format.encoding()) {
        (PnmFamily::Pbm, SampleEncoding::Ascii) => encode_plain_bits(&mut out, raster, stop)?,
        (PnmFamily::Pbm, SampleEncoding::Binary) => encode_packed_bits(&mut out, raster, stop)?,
        (_, SampleEncoding::Ascii) => encode_plain_samples(&mut out, raster, stop)?,
        (_, SampleEncoding::Binary) => out.extend_from_slice(raster.samples()),
    }

    log::debug!(
        "encoded {}x{} {format}: {} bytes",
        header.width,
        header.height,
        out.len()
    );
    Ok(out)
}

/// Header text including the trailing separator byte.
fn header_text(header: &Header, format: PnmFormat) -> alloc::string::String {
    let magic = format.magic();
    let (width, height, maxval) = (header.width, header.height, header.maxval);
    match format.family() {
        PnmFamily::Pbm => format!("{magic}\n{width} {height}\n"),
        PnmFamily::Pgm | PnmFamily::Ppm => format!("{magic}\n{width} {height} {maxval}\n"),
        PnmFamily::Pam => {
            let mut text = format!(
                "{magic}\nWIDTH {width}\nHEIGHT {height}\nDEPTH {}\nMAXVAL {maxval}\n",
                header.depth
            );
            if let Some(name) = header.tupltype.name() {
                let _ = writeln!(text, "TUPLTYPE {name}");
            }
            text.push_str("ENDHDR\n");
            text
        }
    }
}

/// P1: `1` for black, so stored bits are written complemented.
fn encode_plain_bits(out: &mut Vec<u8>, raster: &Raster, stop: &dyn Stop) -> Result<(), PnmError> {
    let w = raster.width() as usize;
    let stride = raster.common().row_bytes();
    for (y, row) in raster.samples().chunks_exact(stride).enumerate() {
        if y % 16 == 0 {
            stop.check()?;
        }
        for x in 0..w {
            if x > 0 && x % PLAIN_LINE_LIMIT == 0 {
                out.push(b'\n');
            }
            let white = (row[x / 8] >> (7 - x % 8)) & 1 == 1;
            out.push(if white { b'0' } else { b'1' });
        }
        out.push(b'\n');
    }
    Ok(())
}

/// P4: complement each byte and zero the row padding bits.
fn encode_packed_bits(out: &mut Vec<u8>, raster: &Raster, stop: &dyn Stop) -> Result<(), PnmError> {
    let stride = raster.common().row_bytes();
    let pad = (8 - raster.width() % 8) % 8;
    let last_mask = 0xffu8 << pad;
    for (y, row) in raster.samples().chunks_exact(stride).enumerate() {
        if y % 16 == 0 {
            stop.check()?;
        }
        out.extend(row.iter().map(|&b| !b));
        if let Some(last) = out.last_mut() {
            *last &= last_mask;
        }
    }
    Ok(())
}

/// P2/P3: decimal samples, one image row per line, wrapped at 70 columns.
fn encode_plain_samples(
    out: &mut Vec<u8>,
    raster: &Raster,
    stop: &dyn Stop,
) -> Result<(), PnmError> {
    let sb = raster.sample_bytes();
    let row_len = raster.common().row_bytes();
    let mut digits = [0u8; 5];
    for (y, row) in raster.samples().chunks_exact(row_len).enumerate() {
        if y % 16 == 0 {
            stop.check()?;
        }
        let mut line = 0usize;
        for sample in row.chunks_exact(sb) {
            let value = if sb == 1 {
                u16::from(sample[0])
            } else {
                u16::from_be_bytes([sample[0], sample[1]])
            };
            let text = format_u16(&mut digits, value);
            if line > 0 {
                if line + 1 + text.len() > PLAIN_LINE_LIMIT {
                    out.push(b'\n');
                    line = 0;
                } else {
                    out.push(b' ');
                    line += 1;
                }
            }
            out.extend_from_slice(text);
            line += text.len();
        }
        out.push(b'\n');
    }
    Ok(())
}

fn format_u16(buf: &mut [u8; 5], mut value: u16) -> &[u8] {
    let mut start = buf.len();
    loop {
        start -= 1;
        buf[start] = b'0' + (value % 10) as u8;
        value /= 10;
        if value == 0 {
            break;
        }
    }
    &buf[start..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pnm::TupleType;
    use alloc::vec;
    use enough::Unstoppable;

    #[test]
    fn decimal_formatting() {
        let mut buf = [0u8; 5];
        assert_eq!(format_u16(&mut buf, 0), b"0");
        assert_eq!(format_u16(&mut buf, 7), b"7");
        assert_eq!(format_u16(&mut buf, 65535), b"65535");
        assert_eq!(format_u16(&mut buf, 100), b"100");
    }

    #[test]
    fn plain_bitmap_output() {
        let header = Header::pbm(3, 2);
        let raster = Raster::new(&header, PnmFormat::PbmAscii, vec![0b1010_0000, 0b0100_0000]).unwrap();
        let out = encode_pnm(&header, PnmFormat::PbmAscii, &raster, &Unstoppable).unwrap();
        assert_eq!(out, b"P1\n3 2\n010\n101\n");
    }

    #[test]
    fn packed_bitmap_output() {
        let header = Header::pbm(3, 1);
        let raster = Raster::new(&header, PnmFormat::PbmBinary, vec![0b1010_0000]).unwrap();
        let out = encode_pnm(&header, PnmFormat::PbmBinary, &raster, &Unstoppable).unwrap();
        assert_eq!(out, b"P4\n3 1\n\x40");
    }

    #[test]
    fn plain_graymap_output() {
        let header = Header::pgm(3, 2, 1000);
        let raster = Raster::new(
            &header,
            PnmFormat::PgmAscii,
            vec![0, 0, 0, 9, 0x03, 0xe8, 0, 1, 0, 2, 0, 3],
        )
        .unwrap();
        let out = encode_pnm(&header, PnmFormat::PgmAscii, &raster, &Unstoppable).unwrap();
        assert_eq!(out, b"P2\n3 2 1000\n0 9 1000\n1 2 3\n");
    }

    #[test]
    fn plain_lines_wrap() {
        let header = Header::pgm(40, 1, 255);
        let raster = Raster::new(&header, PnmFormat::PgmAscii, vec![200; 40]).unwrap();
        let out = encode_pnm(&header, PnmFormat::PgmAscii, &raster, &Unstoppable).unwrap();
        let text = core::str::from_utf8(&out).unwrap();
        assert!(text.lines().all(|l| l.len() <= PLAIN_LINE_LIMIT));
        assert_eq!(text.split_ascii_whitespace().count(), 4 + 40);
    }

    #[test]
    fn pam_header_omits_unspecified_tupltype() {
        let header = Header::pam(1, 1, 2, 255, TupleType::Unspecified);
        let raster = Raster::blank(&header, PnmFormat::Pam).unwrap();
        let out = encode_pnm(&header, PnmFormat::Pam, &raster, &Unstoppable).unwrap();
        assert_eq!(
            out,
            b"P7\nWIDTH 1\nHEIGHT 1\nDEPTH 2\nMAXVAL 255\nENDHDR\n\x00\x00"
        );
    }

    #[test]
    fn mismatched_header_is_rejected() {
        let raster = Raster::blank(&Header::pgm(2, 2, 255), PnmFormat::PgmBinary).unwrap();
        let err = encode_pnm(&Header::pgm(2, 3, 255), PnmFormat::PgmBinary, &raster, &Unstoppable)
            .unwrap_err();
        assert!(matches!(err, PnmError::HeaderRasterMismatch(_)));
    }
}
