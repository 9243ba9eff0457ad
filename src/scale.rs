
/// Physical length represented by one pixel along an axis, in angstroms,
/// as stored in MRC cell metadata.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSizeA(pub f64);

pub const ANGSTROMS_PER_UM: f64 = 10_000.0;

impl PixelSizeA {

	pub fn to_um(self) -> PixelSizeUm {
		PixelSizeUm(self.0/ANGSTROMS_PER_UM)
	}
}


/// Pixel size in micrometers, the unit the resolution policy works in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSizeUm(pub f64);

impl PixelSizeUm {

	pub fn to_a(self) -> PixelSizeA {
		PixelSizeA(self.0*ANGSTROMS_PER_UM)
	}
}


/// Format a value with four significant digits for log messages,
/// eg 0.00493 rather than 0.0049 or 4.9300e-3.
pub fn sig4(v: f64) -> String {

	if v == 0.0 || !v.is_finite() {
		return format!("{}", v);
	}

	let exponent = v.abs().log10().floor() as i32;
	let decimals = (3 - exponent).max(0) as usize;
	let s = format!("{:.*}", decimals, v);

	// trim trailing zeros, but leave integers alone
	if s.contains('.') {
		s.trim_end_matches('0')
			.trim_end_matches('.')
			.to_string()
	} else {
		s
	}
}
