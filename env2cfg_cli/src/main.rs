use std::path::Path;
use std::process;

use clap::Parser;
use env2cfg_cli::Env2CfgCli;
use env2cfg_core::OsPermissions;
use env2cfg_core::ProcessEnvironment;
use env2cfg_core::RunReport;
use env2cfg_core::ValidatedConfig;
use env2cfg_core::run;
use env2cfg_core::write_output;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

const WARNING_RULE: &str =
	"----------------------------------------------------------------------------";

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = Env2CfgCli::parse();

	// NO_COLOR and --no-color both disable color.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stderr).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	match run_cli(&args) {
		Ok(failed) => {
			if failed {
				process::exit(1);
			}
		}
		Err(e) => {
			// Try to render through miette for rich diagnostics with help text
			// and error codes.
			match e.downcast::<env2cfg_core::Env2CfgError>() {
				Ok(error) => {
					let report: miette::Report = (*error).into();
					eprintln!("{report:?}");
				}
				Err(e) => {
					eprintln!("{} {e}", colored!("error:", red));
				}
			}
			process::exit(2);
		}
	}
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.without_time()
		.init();
}

/// Run once and return whether the exit status should signal failure.
fn run_cli(args: &Env2CfgCli) -> Result<bool, Box<dyn std::error::Error>> {
	let config = args.run_config().validate()?;

	for notice in config.notices() {
		eprintln!("{} {notice}", colored!("warning:", yellow));
	}

	let report = run(&config, ProcessEnvironment, &OsPermissions)?;
	emit(&config, &report)?;

	tracing::debug!(
		destination = ?config.destination(),
		warnings = report.warnings.len(),
		"run finished"
	);

	let quiet = config.config().quiet;
	if !quiet && !report.warnings.is_empty() {
		print_warnings(&config.config().template, &report);
	}

	Ok(report.is_failure(quiet))
}

/// Send the document to its destination file, or to stdout when there is none.
fn emit(config: &ValidatedConfig, report: &RunReport) -> Result<(), Box<dyn std::error::Error>> {
	match config.destination() {
		Some(path) => {
			write_output(path, &report.document, config.file_mode(), &OsPermissions)?;
		}
		None => {
			print!("{}", report.document);
		}
	}

	Ok(())
}

fn print_warnings(template: &Path, report: &RunReport) {
	eprintln!("{WARNING_RULE}");
	eprintln!(
		"{}",
		colored!(
			format!(
				"The following variables were referenced in {} but not found in any environment \
				 input:",
				template.display()
			),
			bold
		)
	);

	for warning in report.warnings.drain() {
		eprintln!("{warning}");
	}
}
