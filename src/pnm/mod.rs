//! Netpbm family: PBM (P1/P4), PGM (P2/P5), PPM (P3/P6), PAM (P7).

pub(crate) mod decode;
pub(crate) mod encode;
pub(crate) mod header;
pub(crate) mod scanner;

pub use header::{Header, MAX_MAXVAL, TupleType};

/// How the sample section of a file is stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SampleEncoding {
    /// Whitespace-separated ASCII decimal integers ("plain" files).
    Ascii,
    /// Packed bits (PBM) or big-endian binary samples.
    Binary,
}

/// Format variant tag, one per magic number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PnmFormat {
    /// P1 — ASCII bitmap.
    PbmAscii,
    /// P2 — ASCII graymap.
    PgmAscii,
    /// P3 — ASCII pixmap.
    PpmAscii,
    /// P4 — packed binary bitmap.
    PbmBinary,
    /// P5 — binary graymap.
    PgmBinary,
    /// P6 — binary pixmap.
    PpmBinary,
    /// P7 — PAM, keyword header with binary samples.
    Pam,
}

/// Format family, ignoring the ASCII/binary split.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PnmFamily {
    Pbm,
    Pgm,
    Ppm,
    Pam,
}

impl PnmFormat {
    pub const ALL: [PnmFormat; 7] = [
        PnmFormat::PbmAscii,
        PnmFormat::PgmAscii,
        PnmFormat::PpmAscii,
        PnmFormat::PbmBinary,
        PnmFormat::PgmBinary,
        PnmFormat::PpmBinary,
        PnmFormat::Pam,
    ];

    /// The two-byte magic number, e.g. `P6`.
    pub fn magic(self) -> &'static str {
        match self {
            PnmFormat::PbmAscii => "P1",
            PnmFormat::PgmAscii => "P2",
            PnmFormat::PpmAscii => "P3",
            PnmFormat::PbmBinary => "P4",
            PnmFormat::PgmBinary => "P5",
            PnmFormat::PpmBinary => "P6",
            PnmFormat::Pam => "P7",
        }
    }

    /// Look up the format for a magic token.
    pub fn from_magic(token: &[u8]) -> Option<PnmFormat> {
        match token {
            b"P1" => Some(PnmFormat::PbmAscii),
            b"P2" => Some(PnmFormat::PgmAscii),
            b"P3" => Some(PnmFormat::PpmAscii),
            b"P4" => Some(PnmFormat::PbmBinary),
            b"P5" => Some(PnmFormat::PgmBinary),
            b"P6" => Some(PnmFormat::PpmBinary),
            b"P7" => Some(PnmFormat::Pam),
            _ => None,
        }
    }

    pub fn encoding(self) -> SampleEncoding {
        match self {
            PnmFormat::PbmAscii | PnmFormat::PgmAscii | PnmFormat::PpmAscii => {
                SampleEncoding::Ascii
            }
            PnmFormat::PbmBinary | PnmFormat::PgmBinary | PnmFormat::PpmBinary | PnmFormat::Pam => {
                SampleEncoding::Binary
            }
        }
    }

    pub fn family(self) -> PnmFamily {
        match self {
            PnmFormat::PbmAscii | PnmFormat::PbmBinary => PnmFamily::Pbm,
            PnmFormat::PgmAscii | PnmFormat::PgmBinary => PnmFamily::Pgm,
            PnmFormat::PpmAscii | PnmFormat::PpmBinary => PnmFamily::Ppm,
            PnmFormat::Pam => PnmFamily::Pam,
        }
    }
}

impl core::fmt::Display for PnmFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.magic())
    }
}

/// Bytes per stored sample for a given maxval: 1 up to 255, else 2.
pub(crate) fn sample_bytes(maxval: u32) -> usize {
    if maxval > 255 { 2 } else { 1 }
}
