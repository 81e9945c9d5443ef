//! Header model and parser for all seven magic numbers.

use alloc::borrow::ToOwned;
use alloc::string::{String, ToString};

use super::scanner::{Scanner, lossy};
use super::{PnmFamily, PnmFormat, sample_bytes};
use crate::PnmError;

/// Largest maxval a Netpbm file may declare.
pub const MAX_MAXVAL: u32 = 65535;

/// Declared meaning of a PAM pixel's channels.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum TupleType {
    BlackAndWhite,
    BlackAndWhiteAlpha,
    Grayscale,
    GrayscaleAlpha,
    Rgb,
    RgbAlpha,
    /// Any tuple type Netpbm does not standardise.
    Custom(String),
    /// No `TUPLTYPE` line was present.
    Unspecified,
}

impl TupleType {
    pub fn from_name(name: &str) -> TupleType {
        match name {
            "" => TupleType::Unspecified,
            "BLACKANDWHITE" => TupleType::BlackAndWhite,
            "BLACKANDWHITE_ALPHA" => TupleType::BlackAndWhiteAlpha,
            "GRAYSCALE" => TupleType::Grayscale,
            "GRAYSCALE_ALPHA" => TupleType::GrayscaleAlpha,
            "RGB" => TupleType::Rgb,
            "RGB_ALPHA" => TupleType::RgbAlpha,
            other => TupleType::Custom(other.to_owned()),
        }
    }

    /// Name as written after `TUPLTYPE`; `None` for [`TupleType::Unspecified`].
    pub fn name(&self) -> Option<&str> {
        match self {
            TupleType::BlackAndWhite => Some("BLACKANDWHITE"),
            TupleType::BlackAndWhiteAlpha => Some("BLACKANDWHITE_ALPHA"),
            TupleType::Grayscale => Some("GRAYSCALE"),
            TupleType::GrayscaleAlpha => Some("GRAYSCALE_ALPHA"),
            TupleType::Rgb => Some("RGB"),
            TupleType::RgbAlpha => Some("RGB_ALPHA"),
            TupleType::Custom(name) => Some(name),
            TupleType::Unspecified => None,
        }
    }

    /// A `Custom` name must read back as itself: non-empty, a single line,
    /// no surrounding whitespace, and not one of the standard names.
    fn check_custom(&self) -> Result<(), PnmError> {
        let TupleType::Custom(name) = self else {
            return Ok(());
        };
        let bad_edge = |b: Option<&u8>| b.is_some_and(|&b| b.is_ascii_whitespace() || b == 0x0b);
        let readable = !name.is_empty()
            && !name.contains(['\r', '\n'])
            && !bad_edge(name.as_bytes().first())
            && !bad_edge(name.as_bytes().last())
            && !matches!(TupleType::from_name(name), TupleType::Custom(_));
        if readable {
            Ok(())
        } else {
            Err(PnmError::InvalidHeaderValue {
                field: "tupltype",
                value: name.clone(),
            })
        }
    }
}

/// Image header shared by every format.
///
/// For PBM, PGM and PPM the depth, maxval and tuple type are implied by the
/// magic number; [`Header::validate`] enforces that.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Header {
    pub width: u32,
    pub height: u32,
    /// Samples per pixel.
    pub depth: u32,
    /// Largest sample value, `1..=65535`.
    pub maxval: u32,
    pub tupltype: TupleType,
}

impl Header {
    pub fn pbm(width: u32, height: u32) -> Header {
        Header {
            width,
            height,
            depth: 1,
            maxval: 1,
            tupltype: TupleType::BlackAndWhite,
        }
    }

    pub fn pgm(width: u32, height: u32, maxval: u32) -> Header {
        Header {
            width,
            height,
            depth: 1,
            maxval,
            tupltype: TupleType::Grayscale,
        }
    }

    pub fn ppm(width: u32, height: u32, maxval: u32) -> Header {
        Header {
            width,
            height,
            depth: 3,
            maxval,
            tupltype: TupleType::Rgb,
        }
    }

    pub fn pam(width: u32, height: u32, depth: u32, maxval: u32, tupltype: TupleType) -> Header {
        Header {
            width,
            height,
            depth,
            maxval,
            tupltype,
        }
    }

    /// Bytes per stored sample: 1 when `maxval <= 255`, else 2 (big-endian).
    pub fn sample_bytes(&self) -> usize {
        sample_bytes(self.maxval)
    }

    /// Check the range invariants and the constraints `format` places on
    /// depth, maxval and tuple type.
    pub fn validate(&self, format: PnmFormat) -> Result<(), PnmError> {
        if self.width == 0 {
            return Err(invalid("width", self.width));
        }
        if self.height == 0 {
            return Err(invalid("height", self.height));
        }
        if self.maxval == 0 || self.maxval > MAX_MAXVAL {
            return Err(invalid("maxval", self.maxval));
        }
        if self.depth == 0 {
            return Err(invalid("depth", self.depth));
        }

        let (depth, tupltype) = match format.family() {
            PnmFamily::Pbm => {
                if self.maxval != 1 {
                    return Err(invalid("maxval", self.maxval));
                }
                (1, TupleType::BlackAndWhite)
            }
            PnmFamily::Pgm => (1, TupleType::Grayscale),
            PnmFamily::Ppm => (3, TupleType::Rgb),
            PnmFamily::Pam => return self.tupltype.check_custom(),
        };
        if self.depth != depth {
            return Err(invalid("depth", self.depth));
        }
        if self.tupltype != tupltype {
            return Err(PnmError::InvalidHeaderValue {
                field: "tupltype",
                value: self.tupltype.name().unwrap_or_default().to_string(),
            });
        }
        Ok(())
    }
}

fn invalid(field: &'static str, value: u32) -> PnmError {
    PnmError::InvalidHeaderValue {
        field,
        value: value.to_string(),
    }
}

/// Parse the header at the start of `data`.
///
/// Returns the header, the format and the byte offset at which sample data
/// begins (after the single separator byte).
pub fn parse(data: &[u8]) -> Result<(Header, PnmFormat, usize), PnmError> {
    let mut scanner = Scanner::new(data);
    let (header, format) = read_header(&mut scanner)?;
    Ok((header, format, scanner.position()))
}

pub(crate) fn read_header(scanner: &mut Scanner<'_>) -> Result<(Header, PnmFormat), PnmError> {
    let magic = scanner.expect_token()?;
    let format = PnmFormat::from_magic(magic).ok_or_else(|| PnmError::UnknownFormat {
        token: lossy(magic),
    })?;

    let header = match format.family() {
        PnmFamily::Pbm => {
            let width = scanner.next_u32("width")?;
            let height = scanner.next_u32("height")?;
            Header::pbm(width, height)
        }
        PnmFamily::Pgm => {
            let width = scanner.next_u32("width")?;
            let height = scanner.next_u32("height")?;
            let maxval = scanner.next_u32("maxval")?;
            Header::pgm(width, height, maxval)
        }
        PnmFamily::Ppm => {
            let width = scanner.next_u32("width")?;
            let height = scanner.next_u32("height")?;
            let maxval = scanner.next_u32("maxval")?;
            Header::ppm(width, height, maxval)
        }
        PnmFamily::Pam => read_pam_header(scanner)?,
    };

    header.validate(format)?;
    scanner.consume_separator()?;

    log::debug!(
        "{format} header: {}x{} depth {} maxval {} ({}-byte samples), data at byte {}",
        header.width,
        header.height,
        header.depth,
        header.maxval,
        header.sample_bytes(),
        scanner.position()
    );

    Ok((header, format))
}

fn read_pam_header(scanner: &mut Scanner<'_>) -> Result<Header, PnmError> {
    let mut width = None;
    let mut height = None;
    let mut depth = None;
    let mut maxval = None;
    let mut tupltype: Option<String> = None;

    loop {
        let keyword = scanner.expect_token()?;
        match keyword {
            b"WIDTH" => width = Some(scanner.next_u32("width")?),
            b"HEIGHT" => height = Some(scanner.next_u32("height")?),
            b"DEPTH" => depth = Some(scanner.next_u32("depth")?),
            b"MAXVAL" => maxval = Some(scanner.next_u32("maxval")?),
            b"TUPLTYPE" => {
                let value = lossy(scanner.rest_of_line());
                // Repeated TUPLTYPE lines concatenate; empty ones add nothing.
                match &mut tupltype {
                    Some(existing) if !value.is_empty() => {
                        if !existing.is_empty() {
                            existing.push(' ');
                        }
                        existing.push_str(&value);
                    }
                    Some(_) => {}
                    None => tupltype = Some(value),
                }
            }
            b"ENDHDR" => break,
            other => {
                log::warn!("ignoring unrecognised PAM header line `{}`", lossy(other));
                scanner.rest_of_line();
            }
        }
    }

    Ok(Header {
        width: width.ok_or(PnmError::MissingHeaderField { field: "WIDTH" })?,
        height: height.ok_or(PnmError::MissingHeaderField { field: "HEIGHT" })?,
        depth: depth.ok_or(PnmError::MissingHeaderField { field: "DEPTH" })?,
        maxval: maxval.ok_or(PnmError::MissingHeaderField { field: "MAXVAL" })?,
        tupltype: tupltype.map_or(TupleType::Unspecified, |t| TupleType::from_name(&t)),
    })
}
