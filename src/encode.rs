use alloc::vec::Vec;
use enough::Stop;

use crate::error::PnmError;
use crate::pnm::{self, Header, PnmFormat};
use crate::raster::Raster;

/// Encode request builder.
///
/// ```
/// use pnmkit::{EncodeRequest, Header, PnmFormat, Raster, Unstoppable};
///
/// let header = Header::pgm(2, 1, 255);
/// let raster = Raster::new(&header, PnmFormat::PgmAscii, vec![7, 200])?;
/// let bytes = EncodeRequest::new(PnmFormat::PgmAscii).encode(&header, &raster, Unstoppable)?;
/// assert_eq!(bytes, b"P2\n2 1 255\n7 200\n");
/// # Ok::<(), pnmkit::PnmError>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct EncodeRequest {
    format: PnmFormat,
}

impl EncodeRequest {
    pub fn new(format: PnmFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> PnmFormat {
        self.format
    }

    /// Encode to a new buffer. Fails with `HeaderRasterMismatch` if `raster`
    /// is not what `header` describes.
    pub fn encode(
        &self,
        header: &Header,
        raster: &Raster,
        stop: impl Stop,
    ) -> Result<Vec<u8>, PnmError> {
        pnm::encode::encode_pnm(header, self.format, raster, &stop)
    }

    /// Encode, then write the whole result to `writer`. Nothing is written
    /// if encoding fails.
    #[cfg(feature = "std")]
    pub fn encode_to<W: std::io::Write>(
        &self,
        header: &Header,
        raster: &Raster,
        mut writer: W,
        stop: impl Stop,
    ) -> Result<(), PnmError> {
        let bytes = self.encode(header, raster, stop)?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }
}
