
use tracing::info;

use crate::error::ConvertError;
use crate::scale::{sig4, PixelSizeUm};


/// Resolution the output images are matched to: the native pixel size of the
/// SRF reference data, in um/px.
pub const NATIVE_MODEL_RESOLUTION_UM: f64 = 0.00493;

/// Ratio between the native JEM-1400 SerialEM 8000x resolution
/// (0.001412 um/px) and the model resolution. Used when adaptive matching
/// is switched off.
pub const DEFAULT_REDUCTION_FACTOR: f64 = 3.5;


/// Decides how much to downsample a source image so that heterogeneous
/// inputs land on a common output resolution. The constants live here as
/// plain fields so alternate targets can be tested without rebuilding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolutionPolicy {
	pub target_um_per_px: f64,
	pub fixed_factor: f64
}

impl Default for ResolutionPolicy {
	fn default() -> Self {
		Self {
			target_um_per_px: NATIVE_MODEL_RESOLUTION_UM,
			fixed_factor: DEFAULT_REDUCTION_FACTOR
		}
	}
}

impl ResolutionPolicy {

	/// Downsampling factor needed to land `px_size` on the target resolution.
	/// Never less than 1: sources already coarser than the target keep their
	/// original size rather than getting upsampled.
	///
	/// With `use_fixed` the fixed factor is returned for any valid pixel
	/// size, regardless of the target; a fixed factor below 1, like a
	/// non-positive target, is rejected as a bad override.
	pub fn reduction_factor(&self, px_size: PixelSizeUm, use_fixed: bool) -> Result<f64, ConvertError> {

		let px = px_size.0;

		// also rejects NaN
		if !(px > 0.0 && px.is_finite()) {
			return Err(ConvertError::InvalidCalibration {
				um_per_px: px
			});
		}

		if use_fixed {
			// the fixed factor can come from the command line:
			// anything below 1 would upsample
			if !(self.fixed_factor >= 1.0 && self.fixed_factor.is_finite()) {
				return Err(ConvertError::InvalidReductionFactor {
					factor: self.fixed_factor
				});
			}
			return Ok(self.fixed_factor);
		}

		if !(self.target_um_per_px > 0.0 && self.target_um_per_px.is_finite()) {
			return Err(ConvertError::InvalidTarget {
				um_per_px: self.target_um_per_px
			});
		}

		if px > self.target_um_per_px {
			info!(
				"Pixel size {} um/px is already coarser than the target {} um/px: image will not be upsampled",
				sig4(px), sig4(self.target_um_per_px)
			);
			return Ok(1.0);
		}

		let factor = self.target_um_per_px/px;
		info!(
			"Pixel size will change from {} um/px to {} um/px",
			sig4(px), sig4(px*factor)
		);

		Ok(factor)
	}
}
