//! PNG encoding of a [`Raster`] and writing it to disk.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use image::{
    codecs::png::{CompressionType, FilterType, PngEncoder},
    ExtendedColorType, ImageEncoder,
};
use tempfile::NamedTempFile;

use crate::raster::Raster;

/// Error type for [`encode_and_write`]
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// The output file could not be created or put in place.
    #[error("File {} does not exist or cannot be opened.", .path.display())]
    FileOpen {
        /// Requested output path
        path:   PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
    /// The PNG encoder rejected the raster.
    #[error("Failed to encode png: {0}")]
    Encode(#[from] image::ImageError),
    /// The encoded bytes could not be written.
    #[error("Failed to write png file {}: {source}", .path.display())]
    Write {
        /// Requested output path, left untouched by the failure
        path:   PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

/// Result type for [`encode_and_write`]
pub type Result<T> = std::result::Result<T, OutputError>;

/// Encode `raster` as an 8-bit, non-interlaced RGBA PNG with default
/// compression and adaptive filtering.
///
/// # Errors
///
/// Will return `Err` if the encoder fails.
pub fn encode(raster: Raster) -> Result<Vec<u8>> {
    let (width, height) = (raster.width(), raster.height());
    let pixels = raster.into_bytes();
    let mut encoded = Vec::new();
    PngEncoder::new_with_quality(&mut encoded, CompressionType::Default, FilterType::Adaptive)
        .write_image(&pixels, width, height, ExtendedColorType::Rgba8)?;
    Ok(encoded)
}

/// Encode `raster` and write it to `path`, replacing any existing file.
///
/// The PNG is encoded in memory and written to a temporary file next to
/// `path`, which is then renamed over `path`. Whatever `path` named before
/// is only replaced once the whole file has been written, and never removed
/// on failure.
///
/// # Errors
///
/// Will return `Err` if:
/// 1. The encoder fails
/// 2. No file can be created in the directory of `path`
/// 3. Writing the encoded bytes fails
/// 4. The written file cannot be moved to `path`, e.g. because `path` is a
///    directory
pub fn encode_and_write<P: AsRef<Path>>(raster: Raster, path: P) -> Result<()> {
    let path = path.as_ref();
    let encoded = encode(raster)?;
    log::debug!("encoded png is {} bytes", encoded.len());

    let open_failed = |source: std::io::Error| OutputError::FileOpen {
        path: path.to_path_buf(),
        source,
    };

    let mut file = temporary_file_next_to(path).map_err(open_failed)?;
    write_encoded(&mut file, &encoded, path)?;
    file.persist(path).map_err(|err| open_failed(err.error))?;

    log::info!("wrote {} bytes to {}", encoded.len(), path.display());
    Ok(())
}

/// Create a temporary file in the directory `path` will end up in, so that
/// it can be renamed onto `path` without crossing file systems.
fn temporary_file_next_to(path: &Path) -> std::io::Result<NamedTempFile> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut builder = tempfile::Builder::new();
    builder.prefix(".pngenerate-").suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // same mode as `File::create`, the umask still applies
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

fn write_encoded<W: Write>(file: &mut W, encoded: &[u8], path: &Path) -> Result<()> {
    file.write_all(encoded)
        .and_then(|()| file.flush())
        .map_err(|source| OutputError::Write {
            path: path.to_path_buf(),
            source,
        })
}
