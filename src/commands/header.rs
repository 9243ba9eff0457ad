
use std::fs;
use std::ops::Deref;
use std::path::Path;

use anyhow::{bail, Context, Result};
use display_error_chain::ErrorChainExt;
use tracing::{error, info};

use crate::mrc;


const CSV_FILENAME: &str = "header_data.csv";


/// Calibration metadata for one file, flattened for tabulation.
/// Column meaning follows the long-standing summary format: `height` is the
/// header's nx and `width` is ny.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderRow {
	pub filename: String,
	pub px_size_um: f64,
	pub height: u32,
	pub width: u32
}

impl HeaderRow {

	fn csv_header() -> &'static str {
		"filename,px_size_x (um/px),height (px),width (px)"
	}

	fn to_csv(&self) -> String {
		format!("{},{},{},{}", self.filename, self.px_size_um, self.height, self.width)
	}
}


/// Look up the calibration metadata of a single MRC file.
/// Only reads the header, not the data block.
pub fn lookup(file: &Path) -> Result<HeaderRow> {

	let stem = file.file_stem()
		.context("Input filename has no stem")?
		.to_string_lossy()
		.to_string();

	let header = mrc::read_header(file)
		.context(format!("Failed to read MRC file: {}", file.to_string_lossy()))?;

	Ok(HeaderRow {
		filename: stem,
		px_size_um: header.voxel_size.to_um().0,
		height: header.nx,
		width: header.ny
	})
}


/// Print calibration metadata for one file, or tabulate a whole directory
/// into a `header_data.csv` written at the directory root.
pub fn run(input: &Path) -> Result<()> {

	if !input.is_dir() {
		let row = lookup(input)?;
		println!("{}", row.to_csv());
		return Ok(());
	}

	let files = mrc::discover(input)?;
	if files.is_empty() {
		bail!("No .mrc files found under: {}", input.to_string_lossy());
	}

	let mut rows = Vec::new();
	let mut failures = 0;
	for file in &files {
		match lookup(file) {
			Ok(row) => {
				println!("{}", row.to_csv());
				rows.push(row);
			}
			Err(e) => {
				error!("{}: {}", file.to_string_lossy(), e.deref().chain());
				failures += 1;
			}
		}
	}

	// the summary still gets written when some files failed:
	// it holds every row we could read
	let csv_path = input.join(CSV_FILENAME);
	let mut csv = String::from(HeaderRow::csv_header());
	csv.push('\n');
	for row in &rows {
		csv.push_str(&row.to_csv());
		csv.push('\n');
	}
	fs::write(&csv_path, csv)
		.context(format!("Failed to write CSV file: {}", csv_path.to_string_lossy()))?;
	info!("Wrote header data to: {}", csv_path.to_string_lossy());

	if failures > 0 {
		bail!("{} of {} files failed to read", failures, files.len());
	}

	Ok(())
}
