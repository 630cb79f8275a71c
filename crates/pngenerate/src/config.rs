#![warn(missing_docs)]
//! Resolved generation settings.

use std::{num::NonZeroU32, path::PathBuf};

/// Raw pixel buffer size, in bytes, above which generation is refused unless
/// `--ignore-size-limit` is given.
pub const DEFAULT_SIZE_LIMIT: u64 = 500_000_000;

/// Number of bytes per RGBA pixel.
pub const BYTES_PER_PIXEL: u64 = 4;

/// How the value of a channel is chosen for every pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelPolicy {
    /// Every pixel uses this exact value.
    Fixed(u8),
    /// Every pixel draws a uniformly distributed byte.
    Random,
    /// Fully opaque. Only used for the alpha channel when neither a fixed nor
    /// a random alpha was requested.
    OpaqueDefault,
}

impl ChannelPolicy {
    /// Value used by [`ChannelPolicy::OpaqueDefault`].
    pub const OPAQUE: u8 = u8::MAX;

    /// Returns the fixed value of the policy, if it has one.
    pub const fn fixed_value(self) -> Option<u8> {
        match self {
            Self::Fixed(value) => Some(value),
            Self::OpaqueDefault => Some(Self::OPAQUE),
            Self::Random => None,
        }
    }
}

/// Upper bound on the raw pixel buffer size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeLimit {
    /// Refuse rasters larger than this many bytes.
    Bytes(u64),
    /// No limit, set with `--ignore-size-limit`.
    Unlimited,
}

impl SizeLimit {
    /// Returns `true` if a raster of `bytes` raw bytes is allowed.
    pub const fn permits(self, bytes: u64) -> bool {
        match self {
            Self::Bytes(limit) => bytes <= limit,
            Self::Unlimited => true,
        }
    }
}

impl Default for SizeLimit {
    fn default() -> Self {
        Self::Bytes(DEFAULT_SIZE_LIMIT)
    }
}

/// Everything needed to generate and write one image.
///
/// Built once by [`crate::cli::resolve`] and consumed by
/// [`crate::raster::generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Image width in pixels
    pub width:       NonZeroU32,
    /// Image height in pixels
    pub height:      NonZeroU32,
    /// Policy of the red channel
    pub red:         ChannelPolicy,
    /// Policy of the green channel
    pub green:       ChannelPolicy,
    /// Policy of the blue channel
    pub blue:        ChannelPolicy,
    /// Policy of the alpha channel
    pub alpha:       ChannelPolicy,
    /// Largest raw raster allowed
    pub size_limit:  SizeLimit,
    /// Print progress messages to stdout
    pub verbose:     bool,
    /// Where the PNG is written
    pub output_path: PathBuf,
}

impl GenerationConfig {
    /// Create a config for a `width` x `height` image written to
    /// `output_path`, with random colour channels and an opaque alpha
    /// channel.
    pub fn new(width: NonZeroU32, height: NonZeroU32, output_path: impl Into<PathBuf>) -> Self {
        Self {
            width,
            height,
            red: ChannelPolicy::Random,
            green: ChannelPolicy::Random,
            blue: ChannelPolicy::Random,
            alpha: ChannelPolicy::OpaqueDefault,
            size_limit: SizeLimit::default(),
            verbose: false,
            output_path: output_path.into(),
        }
    }

    /// Policies in pixel byte order, i.e. `[red, green, blue, alpha]`.
    pub const fn policies(&self) -> [ChannelPolicy; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }

    /// Returns `true` if `--ignore-size-limit` was given.
    pub const fn ignore_size_limit(&self) -> bool {
        matches!(self.size_limit, SizeLimit::Unlimited)
    }

    /// Number of pixels in the image.
    pub const fn pixel_count(&self) -> u64 {
        self.width.get() as u64 * self.height.get() as u64
    }

    /// Size of the raw RGBA raster in bytes, saturating at [`u64::MAX`].
    pub const fn raster_bytes(&self) -> u64 {
        self.pixel_count().saturating_mul(BYTES_PER_PIXEL)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn nz(value: u32) -> NonZeroU32 {
        NonZeroU32::new(value).unwrap()
    }

    #[test]
    fn new_uses_random_colour_and_opaque_alpha() {
        let config = GenerationConfig::new(nz(3), nz(2), "out.png");
        assert_eq!(
            config.policies(),
            [
                ChannelPolicy::Random,
                ChannelPolicy::Random,
                ChannelPolicy::Random,
                ChannelPolicy::OpaqueDefault
            ]
        );
        assert_eq!(config.size_limit, SizeLimit::Bytes(DEFAULT_SIZE_LIMIT));
        assert!(!config.ignore_size_limit());
        assert!(!config.verbose);
    }

    #[test]
    fn raster_bytes_does_not_overflow() {
        let config = GenerationConfig::new(nz(20_000), nz(20_000), "out.png");
        assert_eq!(config.raster_bytes(), 1_600_000_000);

        let config = GenerationConfig::new(nz(u32::MAX), nz(u32::MAX), "out.png");
        assert_eq!(config.raster_bytes(), u64::MAX);
    }

    #[test]
    fn size_limit_is_inclusive() {
        let limit = SizeLimit::Bytes(DEFAULT_SIZE_LIMIT);
        assert!(limit.permits(DEFAULT_SIZE_LIMIT));
        assert!(!limit.permits(DEFAULT_SIZE_LIMIT + 1));
        assert!(SizeLimit::Unlimited.permits(u64::MAX));
    }

    #[test]
    fn fixed_value() {
        assert_eq!(ChannelPolicy::Fixed(7).fixed_value(), Some(7));
        assert_eq!(ChannelPolicy::OpaqueDefault.fixed_value(), Some(255));
        assert_eq!(ChannelPolicy::Random.fixed_value(), None);
    }

    #[test]
    fn policies_are_in_pixel_byte_order() {
        let mut config = GenerationConfig::new(nz(1), nz(1), "out.png");
        config.green = ChannelPolicy::Fixed(9);
        config.alpha = ChannelPolicy::Fixed(1);
        assert_eq!(
            config.policies(),
            [
                ChannelPolicy::Random,
                ChannelPolicy::Fixed(9),
                ChannelPolicy::Random,
                ChannelPolicy::Fixed(1)
            ]
        );
    }
}
