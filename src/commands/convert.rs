
use std::fs;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use display_error_chain::ErrorChainExt;
use tracing::{error, info};

use crate::mrc;
use crate::pipeline;
use crate::resolution::ResolutionPolicy;
use crate::scale::sig4;


/// Convert one file, or every `.mrc` file under a directory.
///
/// Each file is an independent unit: one bad file is logged and the rest of
/// the batch still runs. The run only fails up front when the input path
/// itself can't be enumerated, and at the end when any file failed.
pub fn run(input: &Path, out_dir: Option<&Path>, policy: &ResolutionPolicy, use_fixed: bool) -> Result<()> {

	let files = mrc::discover(input)?;
	if files.is_empty() {
		bail!("No .mrc files found under: {}", input.to_string_lossy());
	}

	if let Some(dir) = out_dir {
		fs::create_dir_all(dir)
			.context(format!("Failed to create output directory: {}", dir.to_string_lossy()))?;
	}

	let mut failures = 0;
	for file in &files {
		if let Err(e) = convert_file(file, out_dir, policy, use_fixed) {
			error!("{}: {}", file.to_string_lossy(), e.deref().chain());
			failures += 1;
		}
	}

	if failures > 0 {
		bail!("{} of {} files failed to convert", failures, files.len());
	}

	Ok(())
}


/// Convert a single MRC file to a normalized 8-bit PNG, written next to the
/// input (or into `out_dir`) with the same stem. Returns the output path.
pub fn convert_file(file: &Path, out_dir: Option<&Path>, policy: &ResolutionPolicy, use_fixed: bool) -> Result<PathBuf> {

	let stem = file.file_stem()
		.context("Input filename has no stem")?
		.to_string_lossy()
		.to_string();

	let mrc = mrc::read(file)
		.context(format!("Failed to read MRC file: {}", file.to_string_lossy()))?;
	let header = &mrc.header;

	info!(
		"Converting {}: shape {}x{}x{}, voxel size {} A/px",
		stem, header.nx, header.ny, header.nz, sig4(header.voxel_size.0)
	);

	// calibration is read once, up front; everything after this works on
	// the derived factor only
	let px_size = header.voxel_size.to_um();
	let factor = policy.reduction_factor(px_size, use_fixed)?;

	let img = pipeline::normalize(&mrc.plane, factor)?;

	let out_path = match out_dir {
		Some(dir) => dir.join(format!("{}.png", stem)),
		None => file.with_extension("png")
	};
	img.save(&out_path)
		.context(format!("Failed to save image to: {}", out_path.to_string_lossy()))?;
	info!("Saved image: {}", out_path.to_string_lossy());

	Ok(out_path)
}
