//! # pnmkit
//!
//! Decoder and encoder for the Netpbm family: PBM, PGM, PPM and PAM, in both
//! plain (ASCII) and binary variants.
//!
//! ## Supported Formats
//!
//! - **P1** / **P4** (PBM) — bitmaps, plain digits or packed bits
//! - **P2** / **P5** (PGM) — grayscale, 8-bit and 16-bit
//! - **P3** / **P6** (PPM) — RGB, 8-bit and 16-bit
//! - **P7** (PAM) — arbitrary depth and tuple type, 8-bit and 16-bit
//!
//! PBM pixels are exposed as logical values (0 = black, 1 = white), the
//! opposite of the on-disk bits. Samples wider than 8 bits stay big-endian
//! in memory, exactly as stored on disk.
//!
//! ## Non-Goals
//!
//! - Image processing (filtering, color conversion, drawing)
//! - Compression beyond the native formats
//! - Streaming decode: the full input is examined before a raster is returned
//!
//! ## Logging
//!
//! Parsed headers and tolerated anomalies are reported through the [`log`]
//! facade. The crate never installs a logger.
//!
//! ## Usage
//!
//! ```
//! use pnmkit::{TupleType, Unstoppable};
//!
//! let data = b"P7\nWIDTH 1\nHEIGHT 1\nDEPTH 3\nMAXVAL 255\nTUPLTYPE RGB\nENDHDR\n\x0a\x14\x1e";
//!
//! // Probe without decoding
//! let info = pnmkit::probe(data)?;
//! assert_eq!(info.header.tupltype, TupleType::Rgb);
//!
//! let decoded = pnmkit::decode(data, Unstoppable)?;
//! assert_eq!(decoded.raster.pixel(0, 0), 0x1e140a);
//!
//! // Re-encode byte for byte
//! let encoded = pnmkit::encode(&decoded.header, decoded.format, &decoded.raster, Unstoppable)?;
//! assert_eq!(&encoded[..], &data[..]);
//! # Ok::<(), pnmkit::PnmError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod decode;
mod encode;
mod error;
mod limits;
mod raster;

pub mod pnm;

use alloc::vec::Vec;

// Re-exports
pub use decode::{DecodeOutput, DecodeRequest, ImageInfo, SamplePolicy};
#[cfg(feature = "std")]
pub use decode::decode_reader;
pub use encode::EncodeRequest;
pub use enough::{Stop, Unstoppable};
pub use error::{ErrorKind, IoError, PnmError};
pub use limits::Limits;
pub use pnm::{Header, PnmFamily, PnmFormat, SampleEncoding, TupleType};
pub use raster::{Common, PamRaster, Raster};

/// Decode any P1–P7 file with default settings.
pub fn decode(data: &[u8], stop: impl Stop) -> Result<DecodeOutput, PnmError> {
    DecodeRequest::new(data).decode(stop)
}

/// Encode `raster` as `format`.
pub fn encode(
    header: &Header,
    format: PnmFormat,
    raster: &Raster,
    stop: impl Stop,
) -> Result<Vec<u8>, PnmError> {
    EncodeRequest::new(format).encode(header, raster, stop)
}

/// Parse only the header.
pub fn probe(data: &[u8]) -> Result<ImageInfo, PnmError> {
    ImageInfo::from_bytes(data)
}
