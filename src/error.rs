
use thiserror::Error;


/// Failure kinds scoped to a single input file.
/// Batch mode logs these and moves on to the next file.
#[derive(Debug, Error)]
pub enum ConvertError {

	#[error("not a readable MRC file: {reason}")]
	FileFormat {
		reason: String
	},

	#[error("invalid calibration: pixel size of {um_per_px} um/px is not usable")]
	InvalidCalibration {
		um_per_px: f64
	},

	#[error("invalid reduction factor {factor}: must be a finite value >= 1, images are never upsampled")]
	InvalidReductionFactor {
		factor: f64
	},

	#[error("invalid target resolution {um_per_px} um/px")]
	InvalidTarget {
		um_per_px: f64
	},

	#[error("reduction factor {factor} collapses a {width}x{height} image to zero size")]
	DegenerateResize {
		factor: f64,
		width: u32,
		height: u32
	}
}

impl ConvertError {

	pub fn format(reason: impl Into<String>) -> Self {
		Self::FileFormat {
			reason: reason.into()
		}
	}
}
