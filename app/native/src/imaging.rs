//! Image validation and resizing for catalog entries.
//!
//! Downloaded files are accepted only if they decode, cover the primary
//! screen, and (optionally) are in landscape orientation. Accepted files are
//! re-encoded in place, which normalizes the format and drops metadata.
//! Downscaled variants live in a width-named subdirectory next to the
//! original, so a flat listing of the catalog never picks them up.

use std::fs;
use std::io::{BufWriter, Seek, Write};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use natord::compare;

use crate::screen::ScreenSize;

/// Supported image file extensions.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp"];

/// JPEG quality used when re-encoding.
const JPEG_QUALITY: u8 = 95;

/// Prefix of in-progress encodes; hidden, so listings skip them.
const ENCODE_PREFIX: &str = ".encode-";

/// Errors that can occur during image processing.
#[derive(Debug)]
pub enum ImagingError {
    /// Failed to read or decode the source image.
    ImageRead(String),
    /// Failed to save the image.
    ImageSave(String),
    /// Failed to create the variant directory.
    VariantDirectory(String),
}

impl std::fmt::Display for ImagingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ImageRead(path) => write!(f, "Failed to read image: {path}"),
            Self::ImageSave(path) => write!(f, "Failed to save image: {path}"),
            Self::VariantDirectory(path) => {
                write!(f, "Failed to create variant directory: {path}")
            }
        }
    }
}

impl std::error::Error for ImagingError {}

/// Outcome of checking a downloaded image against the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The image was accepted and re-encoded in place.
    Accepted { width: u32, height: u32 },
    /// The image is narrower or shorter than the screen.
    TooSmall { width: u32, height: u32 },
    /// The image is taller than it is wide.
    Portrait { width: u32, height: u32 },
    /// The file is not a decodable image.
    Undecodable,
}

impl Verdict {
    #[must_use]
    pub const fn is_accepted(&self) -> bool { matches!(self, Self::Accepted { .. }) }
}

/// Checks if a file has a supported image extension.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Lists all supported, non-hidden image files directly inside a directory.
///
/// Hidden files are skipped so in-flight downloads never show up.
pub fn list_images_in_directory(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }

    let mut images = Vec::new();

    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            let hidden = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with('.'));

            if !hidden && path.is_file() && is_supported_image(&path) {
                images.push(path);
            }
        }
    }

    images.sort_by(|a, b| compare(a.to_string_lossy().as_ref(), b.to_string_lossy().as_ref()));
    images
}

/// Loads and decodes an image, sniffing the format from its contents.
fn decode(path: &Path) -> Result<DynamicImage, ImagingError> {
    ImageReader::open(path)
        .map_err(|_| ImagingError::ImageRead(path.display().to_string()))?
        .with_guessed_format()
        .map_err(|_| ImagingError::ImageRead(path.display().to_string()))?
        .decode()
        .map_err(|_| ImagingError::ImageRead(path.display().to_string()))
}

/// Returns whether the file is a recognizable image.
///
/// Only the header is parsed, so the cost does not grow with pixel count.
/// Files are fully decoded once, by [`verify`], before they enter the catalog.
pub fn is_valid(path: &Path) -> bool {
    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .is_ok_and(|reader| reader.into_dimensions().is_ok())
}

/// Checks a downloaded image against the screen and re-encodes it on acceptance.
///
/// Rejected files are left on disk; deleting them is the caller's decision.
///
/// # Errors
///
/// Returns an error only if an accepted image cannot be written back.
pub fn verify(
    path: &Path,
    screen: ScreenSize,
    reject_portrait: bool,
) -> Result<Verdict, ImagingError> {
    let Ok(img) = decode(path) else {
        return Ok(Verdict::Undecodable);
    };

    let (width, height) = img.dimensions();

    if width < screen.width || height < screen.height {
        return Ok(Verdict::TooSmall { width, height });
    }

    if reject_portrait && width < height {
        return Ok(Verdict::Portrait { width, height });
    }

    save(&img, path)?;
    Ok(Verdict::Accepted { width, height })
}

/// Returns where the variant of `source` for a given width is stored.
///
/// `/catalog/abc.jpg` at 1920 pixels becomes `/catalog/1920/abc.jpg`.
#[must_use]
pub fn variant_path(source: &Path, width: u32) -> PathBuf {
    let parent = source.parent().unwrap_or_else(|| Path::new("."));
    let file_name = source.file_name().unwrap_or_else(|| std::ffi::OsStr::new("wallpaper.jpg"));
    parent.join(width.to_string()).join(file_name)
}

/// Returns a copy of `source` resized to `width`, creating it if missing.
///
/// The height follows the source aspect ratio. An existing variant is
/// returned as-is, so repeated calls are cheap. Variants only appear under
/// their final name once fully written.
///
/// # Errors
///
/// Returns an error if the variant directory cannot be created, or the
/// source cannot be decoded, or the variant cannot be saved.
pub fn downscale(source: &Path, width: u32) -> Result<PathBuf, ImagingError> {
    let variant = variant_path(source, width);

    if variant.exists() {
        return Ok(variant);
    }

    if let Some(dir) = variant.parent() {
        fs::create_dir_all(dir)
            .map_err(|_| ImagingError::VariantDirectory(dir.display().to_string()))?;
    }

    let img = decode(source)?;
    let resized = resize_to_width(&img, width);
    save(&resized, &variant)?;

    tracing::debug!(
        source = %source.display(),
        variant = %variant.display(),
        "created downscaled variant"
    );

    Ok(variant)
}

/// Resizes proportionally so the result is exactly `width` pixels wide.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn resize_to_width(img: &DynamicImage, width: u32) -> DynamicImage {
    let (img_width, img_height) = img.dimensions();
    let ratio = f64::from(width) / f64::from(img_width);
    let height = (f64::from(img_height) * ratio).round().max(1.0) as u32;

    img.resize_exact(width, height, FilterType::CatmullRom)
}

/// Encodes `img` to `path`, choosing the format from the extension.
///
/// The bytes go to a hidden temporary file in the same directory, which is
/// synced and then renamed over `path`.
fn save(img: &DynamicImage, path: &Path) -> Result<(), ImagingError> {
    let failed = || ImagingError::ImageSave(path.display().to_string());

    let format = ImageFormat::from_path(path).map_err(|_| failed())?;
    let dir = path.parent().filter(|dir| !dir.as_os_str().is_empty()).unwrap_or(Path::new("."));

    let tmp = tempfile::Builder::new()
        .prefix(ENCODE_PREFIX)
        .tempfile_in(dir)
        .map_err(|_| failed())?;
    encode(img, format, tmp.as_file()).map_err(|_| failed())?;
    tmp.as_file().sync_all().map_err(|_| failed())?;
    tmp.persist(path).map_err(|_| failed())?;

    Ok(())
}

/// Writes `img` in `format` and flushes, so short writes are reported.
fn encode<W: Write + Seek>(
    img: &DynamicImage,
    format: ImageFormat,
    dest: W,
) -> image::ImageResult<()> {
    let mut writer = BufWriter::new(dest);

    if format == ImageFormat::Jpeg {
        let encoder = JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
        img.to_rgb8().write_with_encoder(encoder)?;
    } else {
        img.write_to(&mut writer, format)?;
    }

    writer.flush()?;
    Ok(())
}
