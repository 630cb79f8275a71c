//! In-memory RGBA raster and the generator filling it according to the
//! [`ChannelPolicy`](crate::config::ChannelPolicy) of every channel.

use std::{collections::TryReserveError, num::NonZeroU32};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    config::{GenerationConfig, SizeLimit, BYTES_PER_PIXEL},
    progress,
};

/// Error type for [`generate`]
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The raw raster would be larger than the configured limit.
    #[error(
        "Size of png is larger than {}MB ({bytes} bytes requested, limit is {limit} bytes).",
        megabytes(.limit)
    )]
    SizeLimitExceeded {
        /// Raw size of the requested raster
        bytes: u64,
        /// Active limit
        limit: u64,
    },
    /// The raster buffer could not be allocated.
    #[error("Failed to allocate {bytes} bytes for the png.")]
    AllocationFailure {
        /// Raw size of the requested raster
        bytes:  u64,
        /// Allocator error, `None` if the size does not fit in the address
        /// space at all
        #[source]
        source: Option<TryReserveError>,
    },
}

const fn megabytes(bytes: &u64) -> u64 {
    *bytes / 1_000_000
}

/// Result type for [`generate`]
pub type Result<T> = std::result::Result<T, GenerationError>;

/// `width * height` RGBA pixels, row-major, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width:  NonZeroU32,
    height: NonZeroU32,
    bytes:  Vec<u8>,
}

impl Raster {
    /// Width in pixels
    pub const fn width(&self) -> u32 {
        self.width.get()
    }

    /// Height in pixels
    pub const fn height(&self) -> u32 {
        self.height.get()
    }

    /// Number of pixels
    pub fn pixel_count(&self) -> usize {
        self.bytes.len() / BYTES_PER_PIXEL as usize
    }

    /// Raw bytes, 4 per pixel in `[r, g, b, a]` order.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Take ownership of the raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Iterate over all pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.bytes
            .chunks_exact(BYTES_PER_PIXEL as usize)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// The pixel at column `x` of row `y`, or `None` if out of bounds.
    #[cfg(test)]
    fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let index = (y as usize * self.width() as usize + x as usize) * BYTES_PER_PIXEL as usize;
        self.bytes
            .get(index..index + BYTES_PER_PIXEL as usize)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }
}

/// Seed derived from the current time, used when no random source is given.
pub fn time_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |elapsed| {
            elapsed
                .as_secs()
                .wrapping_mul(1_000_000_000)
                .wrapping_add(u64::from(elapsed.subsec_nanos()))
        })
}

/// Generate the raster described by `config`, drawing random channel values
/// from a PRNG seeded with [`time_seed`].
///
/// # Errors
///
/// See [`generate_with_rng`].
pub fn generate(config: &GenerationConfig) -> Result<Raster> {
    let seed = time_seed();
    log::debug!("seeding PRNG with {seed}");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate_with_rng(config, &mut rng)
}

/// Generate the raster described by `config`, drawing random channel values
/// from `rng`.
///
/// Random channels are drawn in `r, g, b, a` order for every pixel, so the
/// same seeded `rng` always produces the same raster.
///
/// # Errors
///
/// Will return `Err` if:
/// 1. The raw raster is larger than `config.size_limit`
/// 2. The raster buffer cannot be allocated
pub fn generate_with_rng<R: Rng>(config: &GenerationConfig, rng: &mut R) -> Result<Raster> {
    let bytes = config.raster_bytes();
    if let SizeLimit::Bytes(limit) = config.size_limit {
        if !config.size_limit.permits(bytes) {
            return Err(GenerationError::SizeLimitExceeded { bytes, limit });
        }
    }

    progress::report(config.verbose, "Allocating memory to the png...");
    let mut buffer = allocate(bytes)?;
    log::debug!(
        "allocated {bytes} bytes for a {}x{} raster",
        config.width,
        config.height
    );

    progress::report(config.verbose, "Setting color values...");
    let policies = config.policies();
    for _ in 0..config.height.get() {
        for _ in 0..config.width.get() {
            for policy in policies {
                buffer.push(policy.fixed_value().unwrap_or_else(|| rng.gen()));
            }
        }
    }

    Ok(Raster {
        width:  config.width,
        height: config.height,
        bytes:  buffer,
    })
}

fn allocate(bytes: u64) -> Result<Vec<u8>> {
    let len = usize::try_from(bytes).map_err(|_| GenerationError::AllocationFailure {
        bytes,
        source: None,
    })?;
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|source| GenerationError::AllocationFailure {
            bytes,
            source: Some(source),
        })?;
    Ok(buffer)
}
