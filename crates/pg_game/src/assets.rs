//! Startup asset loading: the background image and the game font.
//!
//! Each file is looked up in `assets/` next to the executable, then in
//! `assets/` under the working directory. Any failure is fatal to startup.

use std::fs;
use std::path::{Path, PathBuf};

pub const ASSET_DIR: &str = "assets";
pub const BACKGROUND_FILE: &str = "pg-background.jpg";
pub const FONT_FILE: &str = "Minercraftory.ttf";
/// Largest background edge kept after decoding. Every desktop adapter
/// supports 2D textures at least this wide.
pub const MAX_BACKGROUND_DIMENSION: u32 = 8192;

pub struct Assets {
    pub background: image::RgbaImage,
    pub font: Vec<u8>,
}

/// Candidate asset directories in lookup order.
pub fn asset_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        roots.push(exe_dir.join(ASSET_DIR));
    }
    roots.push(PathBuf::from(ASSET_DIR));
    roots
}

pub fn load_assets() -> Result<Assets, String> {
    load_assets_from(&asset_roots())
}

pub fn load_assets_from(roots: &[PathBuf]) -> Result<Assets, String> {
    let background_path = resolve_asset(roots, BACKGROUND_FILE)?;
    let font_path = resolve_asset(roots, FONT_FILE)?;
    let background = load_background(&background_path)?;
    let font = load_font(&font_path)?;
    log::info!(
        "Loaded background {} ({}x{}) and font {} ({} bytes)",
        background_path.display(),
        background.width(),
        background.height(),
        font_path.display(),
        font.len()
    );
    Ok(Assets { background, font })
}

fn resolve_asset(roots: &[PathBuf], file_name: &str) -> Result<PathBuf, String> {
    roots
        .iter()
        .map(|root| root.join(file_name))
        .find(|path| path.is_file())
        .ok_or_else(|| {
            let tried: Vec<String> = roots
                .iter()
                .map(|root| root.join(file_name).display().to_string())
                .collect();
            format!("Asset {file_name} not found (tried {})", tried.join(", "))
        })
}

fn load_background(path: &Path) -> Result<image::RgbaImage, String> {
    let bytes =
        fs::read(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let image = image::load_from_memory(&bytes)
        .map_err(|e| format!("Failed to decode {}: {e}", path.display()))?
        .to_rgba8();
    if image.width() == 0 || image.height() == 0 {
        return Err(format!("Background {} has no pixels", path.display()));
    }
    Ok(fit_within(image, MAX_BACKGROUND_DIMENSION))
}

/// Downscale so neither edge exceeds `max_dimension`, keeping the aspect ratio.
pub fn fit_within(image: image::RgbaImage, max_dimension: u32) -> image::RgbaImage {
    let (width, height) = image.dimensions();
    let max_dimension = max_dimension.max(1);
    if width <= max_dimension && height <= max_dimension {
        return image;
    }
    let scale = max_dimension as f64 / width.max(height) as f64;
    let new_width = ((width as f64 * scale).round() as u32).clamp(1, max_dimension);
    let new_height = ((height as f64 * scale).round() as u32).clamp(1, max_dimension);
    log::warn!(
        "Background {}x{} exceeds {} px, downscaling to {}x{}",
        width,
        height,
        max_dimension,
        new_width,
        new_height
    );
    image::imageops::resize(
        &image,
        new_width,
        new_height,
        image::imageops::FilterType::Triangle,
    )
}

fn load_font(path: &Path) -> Result<Vec<u8>, String> {
    let bytes =
        fs::read(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    validate_font(&bytes).map_err(|e| format!("Font {} rejected: {e}", path.display()))?;
    Ok(bytes)
}

/// Check the sfnt header tag so a truncated or mislabeled file fails here
/// instead of inside the text renderer.
fn validate_font(bytes: &[u8]) -> Result<(), String> {
    const TAGS: [[u8; 4]; 4] = [*b"\x00\x01\x00\x00", *b"OTTO", *b"true", *b"ttcf"];
    let header = bytes
        .get(..4)
        .ok_or_else(|| format!("file is only {} bytes", bytes.len()))?;
    if TAGS.iter().any(|tag| tag == header) {
        Ok(())
    } else {
        Err(format!("unrecognized header {header:02x?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "pg_assets_test_{}_{}_{}",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn write_background(dir: &Path) {
        image::RgbImage::from_pixel(4, 3, image::Rgb([10, 20, 30]))
            .save_with_format(dir.join(BACKGROUND_FILE), image::ImageFormat::Jpeg)
            .expect("write test jpeg");
    }

    fn write_font(dir: &Path, bytes: &[u8]) {
        fs::write(dir.join(FONT_FILE), bytes).expect("write test font");
    }

    #[test]
    fn loads_both_assets_from_first_matching_root() {
        let dir = temp_dir_path("ok");
        fs::create_dir_all(&dir).unwrap();
        write_background(&dir);
        write_font(&dir, b"\x00\x01\x00\x00rest-of-font");

        let missing = temp_dir_path("missing");
        let assets = load_assets_from(&[missing, dir.clone()]).expect("assets should load");
        assert_eq!(assets.background.dimensions(), (4, 3));
        assert_eq!(&assets.font[..4], b"\x00\x01\x00\x00");

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn missing_background_names_every_candidate() {
        let dir = temp_dir_path("no_bg");
        fs::create_dir_all(&dir).unwrap();
        write_font(&dir, b"OTTOxxxx");

        let err = load_assets_from(&[dir.clone()]).err().expect("should fail");
        assert!(err.contains(BACKGROUND_FILE));
        assert!(err.contains(&dir.display().to_string()));

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn undecodable_background_is_rejected() {
        let dir = temp_dir_path("bad_bg");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(BACKGROUND_FILE), b"not an image").unwrap();
        write_font(&dir, b"true....");

        let err = load_assets_from(&[dir.clone()]).err().expect("should fail");
        assert!(err.contains("Failed to decode"));

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn oversized_background_is_downscaled_on_load() {
        let dir = temp_dir_path("huge_bg");
        fs::create_dir_all(&dir).unwrap();
        image::RgbImage::from_pixel(MAX_BACKGROUND_DIMENSION + 8, 4, image::Rgb([0, 0, 0]))
            .save_with_format(dir.join(BACKGROUND_FILE), image::ImageFormat::Jpeg)
            .expect("write test jpeg");
        write_font(&dir, b"OTTOxxxx");

        let assets = load_assets_from(&[dir.clone()]).expect("assets should load");
        assert_eq!(assets.background.width(), MAX_BACKGROUND_DIMENSION);
        assert_eq!(assets.background.height(), 4);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn fit_within_keeps_aspect_and_small_images() {
        let small = image::RgbaImage::new(30, 20);
        assert_eq!(fit_within(small, 64).dimensions(), (30, 20));

        let tall = image::RgbaImage::new(100, 400);
        assert_eq!(fit_within(tall, 200).dimensions(), (50, 200));

        let sliver = image::RgbaImage::new(1000, 1);
        assert_eq!(fit_within(sliver, 10).dimensions(), (10, 1));
    }

    #[test]
    fn font_header_is_checked() {
        assert!(validate_font(b"ttcf0000").is_ok());
        assert!(validate_font(b"<htm").is_err());
        assert!(validate_font(b"\x00").is_err());
    }
}
