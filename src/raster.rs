//! In-memory raster: one variant per format family over a shared sample
//! buffer.
//!
//! Buffer layout:
//! - PBM: one bit per pixel, MSB first, each row padded to a whole byte.
//!   Bits hold the logical value (0 = black, 1 = white).
//! - PGM/PPM/PAM: `depth` interleaved samples per pixel, one byte each when
//!   `maxval <= 255`, else two bytes big-endian.

use alloc::format;
use alloc::vec;
use alloc::vec::Vec;

#[cfg(feature = "rgb")]
use rgb::AsPixels as _;

use crate::PnmError;
use crate::pnm::{Header, PnmFamily, PnmFormat, TupleType};

/// Storage shared by every raster variant.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Common {
    width: u32,
    height: u32,
    bits_per_pixel: u32,
    samples: Vec<u8>,
}

impl Common {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bits_per_pixel(&self) -> u32 {
        self.bits_per_pixel
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Bytes per row, including PBM padding bits.
    pub fn row_bytes(&self) -> usize {
        (self.width as usize * self.bits_per_pixel as usize).div_ceil(8)
    }
}

/// PAM raster: the common storage plus the channel count and tuple type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PamRaster {
    common: Common,
    depth: u32,
    tupltype: TupleType,
}

/// A decoded image, or one built by the caller for encoding.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Raster {
    Pbm(Common),
    Pgm(Common),
    Ppm(Common),
    Pam(PamRaster),
}

/// Size in bytes of the sample buffer `header` describes for `family`.
pub(crate) fn buffer_len(header: &Header, family: PnmFamily) -> Result<usize, PnmError> {
    let too_large = PnmError::DimensionsTooLarge {
        width: header.width,
        height: header.height,
    };
    let w = header.width as usize;
    let h = header.height as usize;
    let len = match family {
        PnmFamily::Pbm => w.div_ceil(8).checked_mul(h),
        _ => w
            .checked_mul(h)
            .and_then(|wh| wh.checked_mul(header.depth as usize))
            .and_then(|whd| whd.checked_mul(header.sample_bytes())),
    };
    len.ok_or(too_large)
}

fn bits_per_pixel(header: &Header, family: PnmFamily) -> Result<u32, PnmError> {
    match family {
        PnmFamily::Pbm => Ok(1),
        _ => header
            .depth
            .checked_mul(header.sample_bytes() as u32 * 8)
            .ok_or_else(|| PnmError::InvalidHeaderValue {
                field: "depth",
                value: format!("{}", header.depth),
            }),
    }
}

impl Raster {
    /// Wrap a caller-supplied sample buffer laid out as described in the
    /// module docs. PBM row padding bits are cleared.
    pub fn new(header: &Header, format: PnmFormat, samples: Vec<u8>) -> Result<Raster, PnmError> {
        header.validate(format)?;
        let family = format.family();
        let expected = buffer_len(header, family)?;
        if samples.len() != expected {
            return Err(PnmError::HeaderRasterMismatch(format!(
                "sample buffer holds {} bytes, {}x{} {format} needs {expected}",
                samples.len(),
                header.width,
                header.height
            )));
        }
        let mut raster = Self::from_parts(header, family, samples)?;
        if let Raster::Pbm(common) = &mut raster {
            clear_pbm_padding(common);
        }
        Ok(raster)
    }

    /// A zero-filled raster (all black) matching `header`.
    pub fn blank(header: &Header, format: PnmFormat) -> Result<Raster, PnmError> {
        header.validate(format)?;
        let len = buffer_len(header, format.family())?;
        Self::from_parts(header, format.family(), vec![0; len])
    }

    /// Assemble a raster whose buffer length is already known to be right.
    pub(crate) fn from_parts(
        header: &Header,
        family: PnmFamily,
        samples: Vec<u8>,
    ) -> Result<Raster, PnmError> {
        let common = Common {
            width: header.width,
            height: header.height,
            bits_per_pixel: bits_per_pixel(header, family)?,
            samples,
        };
        Ok(match family {
            PnmFamily::Pbm => Raster::Pbm(common),
            PnmFamily::Pgm => Raster::Pgm(common),
            PnmFamily::Ppm => Raster::Ppm(common),
            PnmFamily::Pam => Raster::Pam(PamRaster {
                common,
                depth: header.depth,
                tupltype: header.tupltype.clone(),
            }),
        })
    }

    pub fn common(&self) -> &Common {
        match self {
            Raster::Pbm(c) | Raster::Pgm(c) | Raster::Ppm(c) => c,
            Raster::Pam(p) => &p.common,
        }
    }

    fn common_mut(&mut self) -> &mut Common {
        match self {
            Raster::Pbm(c) | Raster::Pgm(c) | Raster::Ppm(c) => c,
            Raster::Pam(p) => &mut p.common,
        }
    }

    pub fn family(&self) -> PnmFamily {
        match self {
            Raster::Pbm(_) => PnmFamily::Pbm,
            Raster::Pgm(_) => PnmFamily::Pgm,
            Raster::Ppm(_) => PnmFamily::Ppm,
            Raster::Pam(_) => PnmFamily::Pam,
        }
    }

    pub fn width(&self) -> u32 {
        self.common().width
    }

    pub fn height(&self) -> u32 {
        self.common().height
    }

    pub fn bits_per_pixel(&self) -> u32 {
        self.common().bits_per_pixel
    }

    /// Samples per pixel.
    pub fn depth(&self) -> u32 {
        match self {
            Raster::Pbm(_) | Raster::Pgm(_) => 1,
            Raster::Ppm(_) => 3,
            Raster::Pam(p) => p.depth,
        }
    }

    pub fn tupltype(&self) -> TupleType {
        match self {
            Raster::Pbm(_) => TupleType::BlackAndWhite,
            Raster::Pgm(_) => TupleType::Grayscale,
            Raster::Ppm(_) => TupleType::Rgb,
            Raster::Pam(p) => p.tupltype.clone(),
        }
    }

    /// Bytes per sample; PBM rasters report 0 since their samples are bits.
    pub fn sample_bytes(&self) -> usize {
        match self {
            Raster::Pbm(_) => 0,
            _ => (self.bits_per_pixel() / (8 * self.depth())) as usize,
        }
    }

    pub fn samples(&self) -> &[u8] {
        &self.common().samples
    }

    /// Mutable access to the raw buffer. The length is fixed.
    pub fn samples_mut(&mut self) -> &mut [u8] {
        &mut self.common_mut().samples
    }

    pub fn into_samples(self) -> Vec<u8> {
        match self {
            Raster::Pbm(c) | Raster::Pgm(c) | Raster::Ppm(c) => c.samples,
            Raster::Pam(p) => p.common.samples,
        }
    }

    /// Fail with `HeaderRasterMismatch` unless this raster is exactly what
    /// `header` describes for `format`.
    pub fn check_matches(&self, header: &Header, format: PnmFormat) -> Result<(), PnmError> {
        let family = format.family();
        if self.family() != family {
            return Err(PnmError::HeaderRasterMismatch(format!(
                "{:?} raster cannot be written as {format}",
                self.family()
            )));
        }
        if self.width() != header.width || self.height() != header.height {
            return Err(PnmError::HeaderRasterMismatch(format!(
                "raster is {}x{}, header declares {}x{}",
                self.width(),
                self.height(),
                header.width,
                header.height
            )));
        }
        if self.depth() != header.depth {
            return Err(PnmError::HeaderRasterMismatch(format!(
                "raster depth {}, header depth {}",
                self.depth(),
                header.depth
            )));
        }
        let bits = bits_per_pixel(header, family)?;
        if self.bits_per_pixel() != bits {
            return Err(PnmError::HeaderRasterMismatch(format!(
                "raster has {} bits per pixel, maxval {} implies {bits}",
                self.bits_per_pixel(),
                header.maxval
            )));
        }
        if let Raster::Pam(p) = self {
            if p.tupltype != header.tupltype {
                return Err(PnmError::HeaderRasterMismatch(format!(
                    "raster tuple type {:?}, header tuple type {:?}",
                    p.tupltype, header.tupltype
                )));
            }
        }
        let expected = buffer_len(header, family)?;
        if self.samples().len() != expected {
            return Err(PnmError::HeaderRasterMismatch(format!(
                "sample buffer holds {} bytes, header needs {expected}",
                self.samples().len()
            )));
        }
        Ok(())
    }

    /// `(x, y)` as in-bounds indices, or `None` off canvas.
    fn locate(&self, x: i64, y: i64) -> Option<(usize, usize)> {
        let in_x = usize::try_from(x).ok().filter(|&x| x < self.width() as usize)?;
        let in_y = usize::try_from(y).ok().filter(|&y| y < self.height() as usize)?;
        Some((in_x, in_y))
    }

    /// Sample value at `(x, y, channel)`. Off-canvas coordinates and
    /// channels past the depth read as 0.
    pub fn sample(&self, x: i64, y: i64, channel: u32) -> u16 {
        let Some((x, y)) = self.locate(x, y) else {
            return 0;
        };
        if channel >= self.depth() {
            return 0;
        }
        let common = self.common();
        let row = y * common.row_bytes();
        match self.sample_bytes() {
            0 => {
                let byte = common.samples[row + x / 8];
                u16::from((byte >> (7 - x % 8)) & 1)
            }
            sb => {
                let off = row + (x * self.depth() as usize + channel as usize) * sb;
                if sb == 1 {
                    u16::from(common.samples[off])
                } else {
                    u16::from_be_bytes([common.samples[off], common.samples[off + 1]])
                }
            }
        }
    }

    /// Store a sample. Returns `false` and changes nothing when the
    /// coordinates or channel are off canvas. Values wider than the sample
    /// saturate; any non-zero PBM value stores white.
    pub fn set_sample(&mut self, x: i64, y: i64, channel: u32, value: u16) -> bool {
        let Some((x, y)) = self.locate(x, y) else {
            return false;
        };
        if channel >= self.depth() {
            return false;
        }
        let depth = self.depth() as usize;
        let sb = self.sample_bytes();
        let common = self.common_mut();
        let row = y * common.row_bytes();
        match sb {
            0 => {
                let mask = 0x80u8 >> (x % 8);
                let byte = &mut common.samples[row + x / 8];
                if value != 0 {
                    *byte |= mask;
                } else {
                    *byte &= !mask;
                }
            }
            1 => common.samples[row + x * depth + channel as usize] = value.min(255) as u8,
            _ => {
                let off = row + (x * depth + channel as usize) * 2;
                common.samples[off..off + 2].copy_from_slice(&value.to_be_bytes());
            }
        }
        true
    }

    /// Up to four channels packed little-endian: `c0 | c1 << 8 | c2 << 16 | c3 << 24`.
    /// Two-byte samples contribute their high byte. Off canvas reads as 0.
    pub fn pixel(&self, x: i64, y: i64) -> u32 {
        let wide = self.sample_bytes() == 2;
        (0..self.depth().min(4)).fold(0u32, |acc, c| {
            let s = self.sample(x, y, c);
            let byte = if wide { s >> 8 } else { s & 0xff };
            acc | (u32::from(byte) << (8 * c))
        })
    }

    /// Inverse of [`Raster::pixel`]. Bytes are widened by 257 for two-byte
    /// samples. Returns `false` off canvas.
    pub fn set_pixel(&mut self, x: i64, y: i64, color: u32) -> bool {
        if self.locate(x, y).is_none() {
            return false;
        }
        let wide = self.sample_bytes() == 2;
        for c in 0..self.depth().min(4) {
            let byte = ((color >> (8 * c)) & 0xff) as u16;
            let value = if wide { byte * 257 } else { byte };
            self.set_sample(x, y, c, value);
        }
        true
    }

    /// View an 8-bit three-channel raster as RGB pixels.
    #[cfg(feature = "rgb")]
    pub fn as_rgb8(&self) -> Option<&[rgb::RGB8]> {
        (self.depth() == 3 && self.sample_bytes() == 1).then(|| self.samples().as_pixels())
    }

    /// View an 8-bit four-channel raster as RGBA pixels.
    #[cfg(feature = "rgb")]
    pub fn as_rgba8(&self) -> Option<&[rgb::RGBA8]> {
        (self.depth() == 4 && self.sample_bytes() == 1).then(|| self.samples().as_pixels())
    }

    /// Zero-copy 2-D view of an 8-bit RGB raster.
    #[cfg(feature = "imgref")]
    pub fn as_imgref_rgb8(&self) -> Option<imgref::ImgRef<'_, rgb::RGB8>> {
        let pixels = self.as_rgb8()?;
        Some(imgref::ImgRef::new(
            pixels,
            self.width() as usize,
            self.height() as usize,
        ))
    }
}

fn clear_pbm_padding(common: &mut Common) {
    let pad = (8 - common.width % 8) % 8;
    if pad == 0 {
        return;
    }
    let mask = 0xffu8 << pad;
    let stride = common.row_bytes();
    for row in common.samples.chunks_exact_mut(stride) {
        if let Some(last) = row.last_mut() {
            *last &= mask;
        }
    }
}
