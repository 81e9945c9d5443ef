use enough::Stop;

use crate::error::PnmError;
use crate::limits::Limits;
use crate::pnm::scanner::Scanner;
use crate::pnm::{self, Header, PnmFormat};
use crate::raster::Raster;

/// What to do with a sample larger than the header's maxval.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SamplePolicy {
    /// Keep the value as long as it fits the sample width.
    #[default]
    Accept,
    /// Replace the value with maxval.
    Clamp,
    /// Fail with [`PnmError::SampleOutOfRange`].
    Reject,
}

/// A decoded file: its header, magic number and pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeOutput {
    pub header: Header,
    pub format: PnmFormat,
    pub raster: Raster,
}

impl DecodeOutput {
    pub fn into_parts(self) -> (Header, PnmFormat, Raster) {
        (self.header, self.format, self.raster)
    }
}

/// Decode request builder.
///
/// ```
/// use pnmkit::{DecodeRequest, SamplePolicy, Unstoppable};
///
/// let decoded = DecodeRequest::new(b"P2\n2 1\n15\n3 20\n")
///     .with_sample_policy(SamplePolicy::Clamp)
///     .decode(Unstoppable)?;
/// assert_eq!(decoded.raster.samples(), &[3, 15]);
/// # Ok::<(), pnmkit::PnmError>(())
/// ```
#[derive(Clone, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
    policy: SamplePolicy,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            limits: None,
            policy: SamplePolicy::default(),
        }
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    pub fn with_sample_policy(mut self, policy: SamplePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Parse the header, then the sample section. All of the input is
    /// examined before anything is returned.
    pub fn decode(self, stop: impl Stop) -> Result<DecodeOutput, PnmError> {
        let mut scanner = Scanner::new(self.data);
        let (header, format) = pnm::header::read_header(&mut scanner)?;

        if let Some(limits) = self.limits {
            limits.check_header(&header, format.family())?;
        }
        stop.check()?;

        let raster = pnm::decode::decode_samples(&mut scanner, &header, format, self.policy, &stop)?;
        Ok(DecodeOutput {
            header,
            format,
            raster,
        })
    }
}

/// Header facts available without decoding samples.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    pub header: Header,
    pub format: PnmFormat,
    /// Offset of the first sample byte.
    pub data_offset: usize,
}

impl ImageInfo {
    /// Parse just the header.
    pub fn from_bytes(data: &[u8]) -> Result<ImageInfo, PnmError> {
        let (header, format, data_offset) = pnm::header::parse(data)?;
        Ok(ImageInfo {
            header,
            format,
            data_offset,
        })
    }
}

/// Read all of `reader` into memory, then decode it.
#[cfg(feature = "std")]
pub fn decode_reader<R: std::io::Read>(
    mut reader: R,
    stop: impl Stop,
) -> Result<DecodeOutput, PnmError> {
    let mut data = alloc::vec::Vec::new();
    reader.read_to_end(&mut data)?;
    DecodeRequest::new(&data).decode(stop)
}
