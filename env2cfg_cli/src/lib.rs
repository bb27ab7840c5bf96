use std::path::PathBuf;

use clap::ArgAction;
use clap::Parser;
use clap::builder::OsStringValueParser;
use clap::builder::TypedValueParser;
use env2cfg_core::DEFAULT_DELIM_END;
use env2cfg_core::DEFAULT_DELIM_START;
use env2cfg_core::DEFAULT_PERMS;
use env2cfg_core::Delimiters;
use env2cfg_core::Overrides;
use env2cfg_core::RunConfig;
use env2cfg_core::split_override;

#[derive(Debug, Parser)]
#[command(
	name = "env2cfg",
	author,
	version,
	disable_version_flag = true,
	about = "env2cfg reads environment variables and produces a config file based on a template",
	long_about = "env2cfg reads environment variables and produces a config file based on a \
	              template.\n\nVariables are read from the system environment and/or the <dotenv> \
	              file and written to <output>. If <dotenv> is omitted, only the system \
	              environment (and -e overrides) is used. <output> defaults to stdout.\n\nWhen \
	              invoked with -G, env2cfg generates the <dotenv> file from the variables found in \
	              <template>. If <dotenv> is omitted, the result is written to stdout.\n\n<template> \
	              can be in any format and is parsed for variables using --delim-start and \
	              --delim-end. The default delimiters are \"${\" and \"}\".",
	after_long_help = "Example template:\n  mqtt:\n    broker: tcp://${MQTT_BROKER}:${MQTT_PORT}\n    \
	                   username: ${MQTT_USER}\n    password: ${MQTT_PASS}",
	override_usage = "env2cfg [FLAGS] <template> [<dotenv>] [<output>]\n       env2cfg -G <template> \
	                  [<dotenv>]\n       env2cfg -H"
)]
#[allow(clippy::struct_excessive_bools)]
pub struct Env2CfgCli {
	/// Template file containing placeholders.
	#[arg(value_name = "template")]
	pub template: Option<PathBuf>,

	/// Dotenv file with variables. With --gen, the file to generate.
	#[arg(value_name = "dotenv", value_parser = OsStringValueParser::new().map(PathBuf::from))]
	pub env_file: Option<PathBuf>,

	/// Where to write the rendered template. Defaults to stdout.
	#[arg(value_name = "output", value_parser = OsStringValueParser::new().map(PathBuf::from))]
	pub output: Option<PathBuf>,

	/// Don't write to output-file.
	#[arg(long, short = 'D', default_value_t = false)]
	pub dry_run: bool,

	/// Generate <dotenv> based on <template>.
	#[arg(long = "gen", short = 'G', default_value_t = false)]
	pub generate: bool,

	/// Favor envfile over environment.
	#[arg(long = "override", short = 'E', default_value_t = false)]
	pub env_override: bool,

	/// Add variables from command line.
	#[arg(
		long = "vars",
		short = 'e',
		value_name = "key=value",
		value_parser = split_override,
		action = ArgAction::Append
	)]
	pub vars: Vec<(String, String)>,

	/// Set <output> permissions.
	#[arg(long, short = 'p', value_name = "MODE", default_value = DEFAULT_PERMS)]
	pub perms: String,

	/// Don't check <envfile> file permissions.
	#[arg(long = "ignore-perm", short = 'I', default_value_t = false)]
	pub ignore_perm: bool,

	/// Don't display warnings.
	#[arg(long, short = 'q', default_value_t = false)]
	pub quiet: bool,

	/// Starting delimiter string.
	#[arg(long, value_name = "STRING", default_value = DEFAULT_DELIM_START)]
	pub delim_start: String,

	/// Ending delimiter string.
	#[arg(long, value_name = "STRING", default_value = DEFAULT_DELIM_END)]
	pub delim_end: String,

	/// Enable verbose output.
	#[arg(long, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, default_value_t = false)]
	pub no_color: bool,

	/// Show version.
	#[arg(long, short = 'v', action = ArgAction::Version, value_parser = clap::value_parser!(bool))]
	pub version: Option<bool>,

	/// Show detailed help and example.
	#[arg(
		long = "detailed",
		short = 'H',
		action = ArgAction::HelpLong,
		value_parser = clap::value_parser!(bool)
	)]
	pub detailed: Option<bool>,
}

impl Env2CfgCli {
	/// Command-line overrides, later assignments replacing earlier ones.
	pub fn overrides(&self) -> Overrides {
		self.vars.iter().cloned().collect()
	}

	pub fn run_config(&self) -> RunConfig {
		RunConfig {
			template: self.template.clone().unwrap_or_default(),
			env_file: non_empty(self.env_file.as_ref()),
			output: non_empty(self.output.as_ref()),
			generate: self.generate,
			env_override: self.env_override,
			overrides: self.overrides(),
			perms: self.perms.clone(),
			ignore_perms: self.ignore_perm,
			quiet: self.quiet,
			dry_run: self.dry_run,
			delimiters: Delimiters::new(&self.delim_start, &self.delim_end),
		}
	}
}

/// Positional paths can be skipped with an empty argument, e.g. to write an
/// output file without a dotenv file: `env2cfg config.tpl "" config.yml`.
fn non_empty(path: Option<&PathBuf>) -> Option<PathBuf> {
	path.filter(|path| !path.as_os_str().is_empty()).cloned()
}
