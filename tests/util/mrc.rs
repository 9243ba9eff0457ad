// Minimal MRC2014 writer for test fixtures: one volume in any of the
// sample modes the reader understands, little- or big-endian.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{ByteOrder, WriteBytesExt, BE, LE};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleMode {
	I8,
	I16,
	F32,
	U16
}

impl SampleMode {

	fn id(self) -> u32 {
		match self {
			SampleMode::I8 => 0,
			SampleMode::I16 => 1,
			SampleMode::F32 => 2,
			SampleMode::U16 => 6
		}
	}
}


pub struct TestMrc {
	pub nx: u32,
	pub ny: u32,
	pub nz: u32,

	/// isotropic pixel size in angstrom/px; the cell dimensions are
	/// derived from it
	pub voxel_size_a: f32,

	/// nx*ny*nz samples, x fastest
	pub samples: Vec<f32>
}

impl TestMrc {

	/// a single plane where every sample has the same value
	pub fn flat(nx: u32, ny: u32, voxel_size_a: f32, value: f32) -> Self {
		Self {
			nx,
			ny,
			nz: 1,
			voxel_size_a,
			samples: vec![value; (nx as usize)*(ny as usize)]
		}
	}

	/// a single plane ramping from 0 at the first sample to n-1 at the last
	pub fn gradient(nx: u32, ny: u32, voxel_size_a: f32) -> Self {
		let n = (nx as usize)*(ny as usize);
		Self {
			nx,
			ny,
			nz: 1,
			voxel_size_a,
			samples: (0 .. n)
				.map(|i| i as f32)
				.collect()
		}
	}

	pub fn save(&self, path: impl AsRef<Path>) {
		self.save_as(path, SampleMode::F32)
	}

	pub fn save_as(&self, path: impl AsRef<Path>, mode: SampleMode) {
		// machine stamp for little-endian
		self.write::<LE>(path, mode, [0x44, 0x44, 0x00, 0x00])
	}

	pub fn save_big_endian(&self, path: impl AsRef<Path>, mode: SampleMode) {
		// machine stamp for big-endian
		self.write::<BE>(path, mode, [0x11, 0x11, 0x00, 0x00])
	}

	fn write<E: ByteOrder>(&self, path: impl AsRef<Path>, mode: SampleMode, machst: [u8; 4]) {

		let path = path.as_ref();
		let file = File::create(path)
			.expect(&format!("Failed to create fixture file: {}", path.to_string_lossy()));
		let mut writer = BufWriter::new(file);

		// the header is 256 (4-byte) words, or 1024 bytes total

		// dimensions (words 1-3) and sample mode (word 4)
		writer.write_u32::<E>(self.nx).unwrap();
		writer.write_u32::<E>(self.ny).unwrap();
		writer.write_u32::<E>(self.nz).unwrap();
		writer.write_u32::<E>(mode.id()).unwrap();

		// nxstart/nystart/nzstart (words 5-7)
		writer.write_all(&[0u8; 4*3]).unwrap();

		// grid size (words 8-10), same as the dimensions
		writer.write_u32::<E>(self.nx).unwrap();
		writer.write_u32::<E>(self.ny).unwrap();
		writer.write_u32::<E>(self.nz).unwrap();

		// cell dimensions in angstroms (words 11-13): voxel size times grid size
		writer.write_f32::<E>(self.voxel_size_a*(self.nx as f32)).unwrap();
		writer.write_f32::<E>(self.voxel_size_a*(self.ny as f32)).unwrap();
		writer.write_f32::<E>(self.voxel_size_a*(self.nz as f32)).unwrap();

		// cell angles (words 14-16)
		for _ in 0 .. 3 {
			writer.write_f32::<E>(90.0).unwrap();
		}

		// we're at word 17 now: skip to word 24 and zero out nsymbt
		writer.write_all(&[0u8; 4*(24 - 17)]).unwrap();
		writer.write_u32::<E>(0).unwrap();

		// we're at word 25 now: skip to word 53 and write the MAP magic
		writer.write_all(&[0u8; 4*(53 - 25)]).unwrap();
		writer.write_all(b"MAP ").unwrap();

		// machine stamp (word 54)
		writer.write_all(&machst).unwrap();

		// we're at word 55 now: skip to the end of the header (word 257)
		writer.write_all(&[0u8; 4*(257 - 55)]).unwrap();

		// the data block: z(y(x)) order
		for &v in &self.samples {
			match mode {
				SampleMode::I8 => writer.write_i8(v as i8).unwrap(),
				SampleMode::I16 => writer.write_i16::<E>(v as i16).unwrap(),
				SampleMode::F32 => writer.write_f32::<E>(v).unwrap(),
				SampleMode::U16 => writer.write_u16::<E>(v as u16).unwrap()
			}
		}

		writer.flush().unwrap();
	}
}
