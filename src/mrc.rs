// MRC file (from the Medical Research Council, in the UK)
// https://en.wikipedia.org/wiki/MRC_(file_format)

// format specification:
// https://www.ccpem.ac.uk/mrc_format/mrc2014.php

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use byteorder::{ByteOrder, BE, LE};

use crate::error::ConvertError;
use crate::scale::PixelSizeA;


/// The header is 256 (4-byte) words, or 1024 bytes total.
const HEADER_SIZE: usize = 1024;

/// Sanity bound on image dimensions: anything larger is a parse gone wrong,
/// not a real micrograph.
const MAX_DIM: i32 = 100_000;

/// Sanity bound on the extended header size.
const MAX_NSYMBT: i32 = 64*1024*1024;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endian {
	Little,
	Big
}


/// Sample storage modes we can decode. All of them widen losslessly to f32.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
	Int8,
	Int16,
	Float32,
	Uint16
}

impl Mode {

	fn from_id(id: i32) -> Option<Mode> {
		match id {
			0 => Some(Mode::Int8),
			1 => Some(Mode::Int16),
			2 => Some(Mode::Float32),
			6 => Some(Mode::Uint16),
			_ => None
		}
	}

	fn bytes_per_sample(self) -> usize {
		match self {
			Mode::Int8 => 1,
			Mode::Int16 | Mode::Uint16 => 2,
			Mode::Float32 => 4
		}
	}
}


#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MrcHeader {
	pub nx: u32,
	pub ny: u32,
	pub nz: u32,
	pub mode: Mode,

	/// x-axis pixel size, cella/mx, or zero when the grid size is unset.
	/// The in-plane pixel size is assumed isotropic, so this value stands
	/// for both axes.
	pub voxel_size: PixelSizeA,

	/// size of the extended header, skipped before the data block
	nsymbt: u32,

	endian: Endian
}


/// One decoded z-plane: `height` (ny) rows of `width` (nx) samples.
#[derive(Debug, Clone)]
pub struct Plane {
	pub width: u32,
	pub height: u32,
	pub samples: Vec<f32>
}


#[derive(Debug, Clone)]
pub struct MrcFile {
	pub header: MrcHeader,
	pub plane: Plane
}


/// Read just the header of an MRC file.
pub fn read_header(path: impl AsRef<Path>) -> Result<MrcHeader> {

	let path = path.as_ref();

	let mut file = File::open(path)
		.context(format!("Failed to open file for reading: {}", path.to_string_lossy()))?;

	let mut buf = [0u8; HEADER_SIZE];
	file.read_exact(&mut buf)
		.map_err(|_| ConvertError::format("file is smaller than the 1024-byte MRC header"))?;

	Ok(parse_header(&buf)?)
}


/// Read the header and the first z-plane of an MRC file,
/// widening the samples to f32.
pub fn read(path: impl AsRef<Path>) -> Result<MrcFile> {

	let path = path.as_ref();

	let file = File::open(path)
		.context(format!("Failed to open file for reading: {}", path.to_string_lossy()))?;
	let mut reader = BufReader::new(file);

	let mut buf = [0u8; HEADER_SIZE];
	reader.read_exact(&mut buf)
		.map_err(|_| ConvertError::format("file is smaller than the 1024-byte MRC header"))?;
	let header = parse_header(&buf)?;

	// skip the extended header, if any
	if header.nsymbt > 0 {
		reader.seek(SeekFrom::Current(header.nsymbt as i64))
			.context("Failed to seek past the extended header")?;
	}

	// read the first plane of the data block: z(y(x)) order, so the
	// leading nx*ny samples are the z=0 plane
	let num_samples = (header.nx as usize)*(header.ny as usize);
	let mut raw = vec![0u8; num_samples*header.mode.bytes_per_sample()];
	reader.read_exact(&mut raw)
		.map_err(|_| ConvertError::format("data block is truncated"))?;

	let samples = decode_samples(&raw, header.mode, header.endian);

	Ok(MrcFile {
		header,
		plane: Plane {
			width: header.nx,
			height: header.ny,
			samples
		}
	})
}


fn parse_header(buf: &[u8; HEADER_SIZE]) -> Result<MrcHeader, ConvertError> {

	// the machine stamp (word 54) signals the byte order:
	// 0x44 0x44 (or 0x44 0x41) is little-endian, 0x11 0x11 is big-endian;
	// anything else gets the little-endian default most writers emit
	let endian = match (buf[212], buf[213]) {
		(0x11, 0x11) => Endian::Big,
		_ => Endian::Little
	};

	let i32_at = |word: usize| -> i32 {
		let bytes = &buf[(word - 1)*4 ..][.. 4];
		match endian {
			Endian::Little => LE::read_i32(bytes),
			Endian::Big => BE::read_i32(bytes)
		}
	};
	let f32_at = |word: usize| -> f32 {
		let bytes = &buf[(word - 1)*4 ..][.. 4];
		match endian {
			Endian::Little => LE::read_f32(bytes),
			Endian::Big => BE::read_f32(bytes)
		}
	};

	// dimensions (words 1-3)
	let nx = i32_at(1);
	let ny = i32_at(2);
	let nz = i32_at(3);
	for (name, n) in [("nx", nx), ("ny", ny), ("nz", nz)] {
		if n < 1 || n > MAX_DIM {
			return Err(ConvertError::format(format!("implausible dimension {}={}", name, n)));
		}
	}

	// sample mode (word 4)
	let mode_id = i32_at(4);
	let mode = Mode::from_id(mode_id)
		.ok_or_else(|| ConvertError::format(format!("unsupported sample mode {}", mode_id)))?;

	// grid size (words 8-10) and cell dimensions in angstroms (words 11-13)
	// give the voxel size: cella/m, per axis
	let mx = i32_at(8);
	let cella_x = f32_at(11);
	let voxel_size =
		if mx > 0 && cella_x.is_finite() {
			PixelSizeA((cella_x as f64)/(mx as f64))
		} else {
			PixelSizeA(0.0)
		};

	// extended header size (word 24)
	let nsymbt = i32_at(24);
	if nsymbt < 0 || nsymbt > MAX_NSYMBT {
		return Err(ConvertError::format(format!("implausible extended header size {}", nsymbt)));
	}

	Ok(MrcHeader {
		nx: nx as u32,
		ny: ny as u32,
		nz: nz as u32,
		mode,
		voxel_size,
		nsymbt: nsymbt as u32,
		endian
	})
}


fn decode_samples(raw: &[u8], mode: Mode, endian: Endian) -> Vec<f32> {
	match (mode, endian) {
		(Mode::Int8, _) =>
			raw.iter()
				.map(|&b| (b as i8) as f32)
				.collect(),
		(Mode::Int16, Endian::Little) =>
			raw.chunks_exact(2)
				.map(|c| LE::read_i16(c) as f32)
				.collect(),
		(Mode::Int16, Endian::Big) =>
			raw.chunks_exact(2)
				.map(|c| BE::read_i16(c) as f32)
				.collect(),
		(Mode::Uint16, Endian::Little) =>
			raw.chunks_exact(2)
				.map(|c| LE::read_u16(c) as f32)
				.collect(),
		(Mode::Uint16, Endian::Big) =>
			raw.chunks_exact(2)
				.map(|c| BE::read_u16(c) as f32)
				.collect(),
		(Mode::Float32, Endian::Little) =>
			raw.chunks_exact(4)
				.map(LE::read_f32)
				.collect(),
		(Mode::Float32, Endian::Big) =>
			raw.chunks_exact(4)
				.map(BE::read_f32)
				.collect()
	}
}


/// Expand an input path into the list of MRC files to process:
/// a single file is taken as-is, a directory is searched recursively
/// for `.mrc` files. The result is sorted for consistent ordering.
pub fn discover(path: impl AsRef<Path>) -> Result<Vec<PathBuf>> {

	let path = path.as_ref();

	let mut files = Vec::new();
	if path.is_dir() {
		collect_mrc_files(path, &mut files)?;
		files.sort();
	} else if path.is_file() {
		files.push(path.to_path_buf());
	} else {
		anyhow::bail!("Input path not found: {}", path.to_string_lossy());
	}

	Ok(files)
}


fn collect_mrc_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {

	let entries = std::fs::read_dir(dir)
		.context(format!("Failed to read directory: {}", dir.to_string_lossy()))?;

	for entry in entries {
		let entry = entry
			.context(format!("Failed to read entry in directory: {}", dir.to_string_lossy()))?;
		let path = entry.path();

		if path.is_dir() {
			collect_mrc_files(&path, files)?;
		} else if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
			if ext.eq_ignore_ascii_case("mrc") {
				files.push(path);
			}
		}
	}

	Ok(())
}
