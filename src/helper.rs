use crate::qrcode::QrCode;

use image::error::{LimitError, LimitErrorKind};
use image::{ImageBuffer, ImageError, Luma};
use std::fs;
use std::path::Path;

/*---- Utilities ----*/

/// Renders the QR Code as an SVG 1.1 document with `border` light modules on
/// each side.
///
/// Each dark module is one unit square in a single path, so the view box is
/// measured in modules. Lines always end with `\n`.
pub fn to_svg_string(qr: &QrCode, border: i32) -> String {
	assert!(border >= 0, "Border must be non-negative");
	let dimension = qr.size() + border * 2;
	let squares: Vec<String> = (0 .. qr.size())
		.flat_map(|y| (0 .. qr.size()).map(move |x| (x, y)))
		.filter(|&(x, y)| qr.get_module(x, y))
		.map(|(x, y)| format!("M{},{}h1v1h-1z", x + border, y + border))
		.collect();

	let mut result = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
	result += "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n";
	result += &format!(
		"<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" viewBox=\"0 0 {0} {0}\" stroke=\"none\">\n", dimension);
	result += "\t<rect width=\"100%\" height=\"100%\" fill=\"#FFFFFF\"/>\n";
	result += &format!("\t<path d=\"{}\" fill=\"#000000\"/>\n", squares.join(" "));
	result += "</svg>\n";
	result
}

/// Renders the QR Code as text, packing two module rows into each line with
/// half-block characters.
///
/// Dark modules are drawn with the glyph (`▀`, `▄`, `█`) and light modules as
/// spaces; `invert` swaps the two for terminals with a dark background. A row
/// below the last quiet-zone row is treated as light.
///
/// # Example
///
/// ```rust
/// use qrtiny::helper::to_text_medium;
/// use qrtiny::qrcode::{Mask, QrCode, QrCodeEcc, BUFFER_LEN, SCRATCH_BUFFER_LEN};
/// use qrtiny::segment::QrSegmentMode;
///
/// let mut tempbuffer = [0u8; SCRATCH_BUFFER_LEN];
/// let mut outbuffer = [0u8; BUFFER_LEN];
/// let qr = QrCode::encode_text("123", QrSegmentMode::Numeric, &mut tempbuffer,
///     &mut outbuffer, QrCodeEcc::Low, Mask::Pattern0).unwrap();
/// let text = to_text_medium(&qr, 0, false);
/// assert_eq!(text.lines().count(), 11);
/// ```
pub fn to_text_medium(qr: &QrCode, quiet: i32, invert: bool) -> String {
	let end = qr.size() + quiet;
	let mut result = String::new();
	for y in (-quiet .. end).step_by(2) {
		for x in -quiet .. end {
			let upper = qr.get_module(x, y);
			let lower = y + 1 < end && qr.get_module(x, y + 1);
			let value = ((usize::from(lower) << 1) | usize::from(upper)) ^ if invert { 0x3 } else { 0x0 };
			result.push([' ', '\u{2580}', '\u{2584}', '\u{2588}'][value]);
		}
		result.push('\n');
	}
	result
}

/// Converts a QR Code to a grayscale image.
///
/// # Arguments
///
/// * `qr` - The QR Code to convert.
/// * `border` - Quiet zone width in modules.
/// * `scale` - Pixels per module, at least 1.
///
/// # Returns
///
/// An `ImageBuffer` with black dark modules on a white background.
///
/// # Errors
///
/// Returns an `image::ImageError` of the limits kind if the side length in
/// pixels does not fit an `i32`.
pub fn to_image_buffer(qr: &QrCode, border: u32, scale: u32)
		-> Result<ImageBuffer<Luma<u8>, Vec<u8>>, ImageError> {
	let scale = scale.max(1);
	let size = border.checked_mul(2)
		.and_then(|quiet| quiet.checked_add(qr.size() as u32))
		.and_then(|modules| modules.checked_mul(scale))
		.filter(|&size| i32::try_from(size).is_ok())
		.ok_or_else(|| ImageError::Limits(LimitError::from_kind(LimitErrorKind::DimensionError)))?;
	let mut img = ImageBuffer::new(size, size);

	for (x, y, pixel) in img.enumerate_pixels_mut() {
		let qr_x = (x / scale) as i32 - border as i32;
		let qr_y = (y / scale) as i32 - border as i32;
		*pixel = if qr.get_module(qr_x, qr_y) {
			Luma([0u8]) // Black
		} else {
			Luma([255u8]) // White
		};
	}

	Ok(img)
}

/// Renders a QR Code to an image and saves it to `path`.
///
/// The image format follows the file extension. Missing parent directories
/// are created.
///
/// # Errors
///
/// Returns an `image::ImageError` if the image would be too large, the
/// directory cannot be created, or the image cannot be written.
pub fn save_image(qr: &QrCode, path: &Path, border: u32, scale: u32) -> Result<(), ImageError> {
	if let Some(parent) = path.parent() {
		if !parent.as_os_str().is_empty() && !parent.exists() {
			fs::create_dir_all(parent)?;
		}
	}
	to_image_buffer(qr, border, scale)?.save(path)
}
