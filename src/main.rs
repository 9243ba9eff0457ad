
use std::ops::Deref;
use std::path::PathBuf;
use std::process::ExitCode;

use display_error_chain::ErrorChainExt;
use gumdrop::Options;
use tracing::error;

use mrc2png::commands::{convert, header};
use mrc2png::logging;
use mrc2png::logging::ResultExt;
use mrc2png::resolution::ResolutionPolicy;


#[derive(Debug, Options)]
struct Args {

	/// print help message
	#[options()]
	help: bool,

	/// print version
	#[options()]
	version: bool,

	/// log filter, eg "mrc2png=debug"
	#[options(meta = "FILTER")]
	log: Option<String>,

	#[options(command)]
	cmd: Option<Command>
}


#[derive(Debug, Options)]
enum Command {

	/// convert MRC file(s) to normalized 8-bit PNGs
	Convert(ArgsConvert),

	/// tabulate calibration metadata from MRC header(s)
	Header(ArgsHeader)
}


#[derive(Debug, Options)]
struct ArgsConvert {

	/// print help message
	#[options()]
	help: bool,

	/// input .mrc file or directory
	#[options(free, required)]
	input: PathBuf,

	/// output directory, defaults to alongside each input
	#[options(meta = "DIR")]
	out: Option<PathBuf>,

	/// always apply the fixed reduction factor instead of matching the target resolution
	#[options()]
	fixed: bool,

	/// reduction factor used with --fixed
	#[options(meta = "FACTOR")]
	factor: Option<f64>,

	/// target resolution for adaptive matching, in um/px
	#[options(meta = "UM")]
	target: Option<f64>
}


#[derive(Debug, Options)]
struct ArgsHeader {

	/// print help message
	#[options()]
	help: bool,

	/// input .mrc file or directory
	#[options(free, required)]
	input: PathBuf
}


fn main() -> ExitCode {

	let args = Args::parse_args_default_or_exit();

	if args.version {
		println!("mrc2png version {}", env!("CARGO_PKG_VERSION"));
		return ExitCode::SUCCESS;
	}

	// init logging
	let log = args.log.as_deref()
		.unwrap_or("mrc2png=info");
	let Ok(_) = logging::init(log)
		.log_err()
		else { return ExitCode::FAILURE; };

	// handle the commands
	let result = match args.cmd {
		Some(Command::Convert(args)) => {
			let mut policy = ResolutionPolicy::default();
			if let Some(target) = args.target {
				policy.target_um_per_px = target;
			}
			if let Some(factor) = args.factor {
				policy.fixed_factor = factor;
			}
			convert::run(&args.input, args.out.as_deref(), &policy, args.fixed)
		}
		Some(Command::Header(args)) => header::run(&args.input),
		None => {
			println!("No command given");
			return ExitCode::FAILURE;
		}
	};

	match result {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			error!("{}", e.deref().chain());
			ExitCode::FAILURE
		}
	}
}
