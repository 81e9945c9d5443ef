use crate::PnmError;
use crate::pnm::{Header, PnmFamily};
use crate::raster::buffer_len;

/// Resource limits applied once the header is parsed, before the sample
/// buffer is allocated.
///
/// All fields default to `None` (no limit).
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum size in bytes of the decoded sample buffer.
    pub max_memory_bytes: Option<u64>,
}

fn exceeded(what: &str, value: u64, limit: u64) -> PnmError {
    PnmError::LimitExceeded(alloc::format!("{what} {value} exceeds limit {limit}"))
}

impl Limits {
    /// Check a parsed header: its dimensions, then the size of the raster it
    /// would decode to.
    pub(crate) fn check_header(&self, header: &Header, family: PnmFamily) -> Result<(), PnmError> {
        let width = u64::from(header.width);
        let height = u64::from(header.height);
        let checks = [
            ("width", width, self.max_width),
            ("height", height, self.max_height),
            ("pixel count", width * height, self.max_pixels),
        ];
        for (what, value, limit) in checks {
            match limit {
                Some(limit) if value > limit => return Err(exceeded(what, value, limit)),
                _ => {}
            }
        }
        if let Some(max_mem) = self.max_memory_bytes {
            let bytes = buffer_len(header, family)? as u64;
            if bytes > max_mem {
                return Err(exceeded("sample buffer bytes", bytes, max_mem));
            }
        }
        Ok(())
    }
}
