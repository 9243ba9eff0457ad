
use image::imageops::{self, FilterType};
use image::GrayImage;
use imageproc::contrast::equalize_histogram;

use crate::error::ConvertError;
use crate::mrc::Plane;


/// The full normalization sequence, in fixed order:
/// min-max stretch to 8 bits, downsample (skipped only when the factor
/// is exactly 1), then global histogram equalization.
pub fn normalize(plane: &Plane, reduction_factor: f64) -> Result<GrayImage, ConvertError> {
	let img = stretch_to_u8(plane);
	let img = reduce(img, reduction_factor)?;
	Ok(equalize_histogram(&img))
}


/// Linear min-max stretch: the plane's minimum maps to 0 and its maximum
/// to 255, then samples quantize to u8 by truncation (matching the
/// integer narrowing the classic numpy pipelines do, not rounding).
/// A constant plane has no range to stretch and maps to all zeros.
pub fn stretch_to_u8(plane: &Plane) -> GrayImage {

	let mut lo = f32::INFINITY;
	let mut hi = f32::NEG_INFINITY;
	for &v in &plane.samples {
		lo = lo.min(v);
		hi = hi.max(v);
	}

	let range = hi - lo;
	let data =
		if range > 0.0 {
			plane.samples.iter()
				.map(|&v| ((v - lo)*255.0/range).clamp(0.0, 255.0) as u8)
				.collect()
		} else {
			vec![0u8; plane.samples.len()]
		};

	GrayImage::from_raw(plane.width, plane.height, data)
		.expect("plane sample count matches its dimensions")
}


/// Downsample with a cubic (Catmull-Rom) kernel, which smooths the noisy
/// low-SNR micrographs better than nearest or linear resampling.
/// Target dimensions truncate: floor(height/factor) x floor(width/factor).
pub fn reduce(img: GrayImage, factor: f64) -> Result<GrayImage, ConvertError> {

	if factor == 1.0 {
		return Ok(img);
	}

	let (width, height) = img.dimensions();
	let reduced_w = ((width as f64)/factor).floor() as u32;
	let reduced_h = ((height as f64)/factor).floor() as u32;

	// a factor larger than the image would leave nothing: that means the
	// calibration or the override is wrong for this input, so fail the file
	// instead of clamping to a 1-pixel smear
	if reduced_w == 0 || reduced_h == 0 {
		return Err(ConvertError::DegenerateResize {
			factor,
			width,
			height
		});
	}

	Ok(imageops::resize(&img, reduced_w, reduced_h, FilterType::CatmullRom))
}
