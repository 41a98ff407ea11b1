//! PNG input/output and file path generation

use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use log::{debug, warn};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::color::{PackedColor, Rgb};
use crate::grid::{Grid, GridError};

/// Error type for image I/O
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Image decoding or encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    /// Decoded image has an unusable shape
    #[error("Invalid image: {0}")]
    Grid(#[from] GridError),
    /// Grid is wider or taller than a PNG can be
    #[error("grid {width}x{height} exceeds the maximum image size")]
    TooLarge { width: usize, height: usize },
}

/// Load a PNG (or any format the `image` crate detects) as packed colors.
pub fn load_png(path: &Path) -> Result<Grid<PackedColor>, OutputError> {
    let image = image::open(path)?.to_rgba8();
    debug!("loaded {} ({}x{})", path.display(), image.width(), image.height());
    image_to_grid(&image)
}

/// Convert an RGBA image to packed colors. Alpha is discarded.
pub fn image_to_grid(image: &RgbaImage) -> Result<Grid<PackedColor>, OutputError> {
    let translucent = image.pixels().filter(|px| px[3] != 255).count();
    if translucent > 0 {
        warn!("discarding alpha channel ({} non-opaque pixels)", translucent);
    }
    let cells = image.pixels().map(|&px| Rgb::from(px).pack()).collect();
    Ok(Grid::new(image.width() as usize, image.height() as usize, cells)?)
}

/// Convert packed colors back to an opaque RGBA image.
pub fn grid_to_image(grid: &Grid<PackedColor>) -> Result<RgbaImage, OutputError> {
    let (width, height) = grid.dimensions();
    let too_large = || OutputError::TooLarge { width, height };
    let w = u32::try_from(width).map_err(|_| too_large())?;
    let h = u32::try_from(height).map_err(|_| too_large())?;

    let raw = grid
        .cells()
        .iter()
        .flat_map(|&c| {
            let Rgba(px) = Rgba::<u8>::from(c.to_rgb());
            px
        })
        .collect();
    RgbaImage::from_raw(w, h, raw).ok_or_else(too_large)
}

/// Save an RGBA image to a PNG file, creating parent directories.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image.save(path)?;
    debug!("wrote {} ({}x{})", path.display(), image.width(), image.height());
    Ok(())
}

/// Scale image by integer factor using nearest-neighbor interpolation.
///
/// Used for the unfiltered comparison output; a factor of 0 or 1 returns
/// the image unchanged.
pub fn scale_nearest(image: RgbaImage, factor: u32) -> RgbaImage {
    if factor <= 1 {
        return image;
    }
    let (w, h) = image.dimensions();
    image::imageops::resize(&image, w * factor, h * factor, FilterType::Nearest)
}

/// Generate the output path for a processed input.
///
/// | Scenario | Output |
/// |----------|--------|
/// | No `-o` | `{input_dir}/{stem}{suffix}.png` (or in `default_dir`) |
/// | `-o dir/` or an existing directory | `dir/{stem}{suffix}.png` |
/// | `-o out.png`, single input | `out.png` |
/// | `-o out.png`, multiple inputs | `out_{stem}.png` |
pub fn generate_output_path(
    input: &Path,
    output_arg: Option<&Path>,
    default_dir: Option<&Path>,
    suffix: &str,
    multiple: bool,
) -> PathBuf {
    let input_stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
    let default_name = format!("{}{}.png", input_stem, suffix);

    match output_arg {
        Some(output) => {
            let is_dir = output.as_os_str().to_string_lossy().ends_with('/') || output.is_dir();

            if is_dir {
                output.join(default_name)
            } else if !multiple {
                output.to_path_buf()
            } else {
                let stem = output.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
                join_parent(output, format!("{}_{}.png", stem, input_stem))
            }
        }
        None => match default_dir {
            Some(dir) => dir.join(default_name),
            None => join_parent(input, default_name),
        },
    }
}

/// `name` next to `path`, without a leading `./` for bare file names.
fn join_parent(path: &Path, name: String) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(name),
        _ => PathBuf::from(name),
    }
}
