use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum Env2CfgError {
	#[error("must be in the form key=value")]
	#[diagnostic(
		code(env2cfg::malformed_override),
		help("pass each override as a single `KEY=value` pair, e.g. `-e PORT=8080`")
	)]
	MalformedOverride(String),

	#[error("<template> is required. Run env2cfg --help for more information")]
	#[diagnostic(code(env2cfg::missing_template))]
	MissingTemplate,

	#[error("<{first}> and <{second}> must differ")]
	#[diagnostic(
		code(env2cfg::same_path),
		help("choose a destination that is neither the template nor the dotenv file")
	)]
	SamePath {
		first: &'static str,
		second: &'static str,
	},

	#[error("{0} already exists: refusing to overwrite")]
	#[diagnostic(
		code(env2cfg::destination_exists),
		help("remove the file or pick another <dotenv> path")
	)]
	DestinationExists(PathBuf),

	#[error("{0} delimiter must not be empty")]
	#[diagnostic(code(env2cfg::empty_delimiter))]
	EmptyDelimiter(&'static str),

	#[error("{file} doesn't have {mode} permissions. Use -p or -P to change behavior")]
	#[diagnostic(
		code(env2cfg::permission_mismatch),
		help("run `chmod {mode} {file}` or pass --ignore-perm to skip this check")
	)]
	PermissionMismatch { file: String, mode: String },

	#[error("Error reading template file: {path}: {source}")]
	#[diagnostic(code(env2cfg::template_read))]
	TemplateRead {
		path: PathBuf,
		source: std::io::Error,
	},

	#[error("Error reading env file: {path}: {reason}")]
	#[diagnostic(code(env2cfg::env_file))]
	EnvFile { path: PathBuf, reason: String },

	#[error("failed to write {path}: {source}")]
	#[diagnostic(code(env2cfg::output_write))]
	OutputWrite {
		path: PathBuf,
		source: std::io::Error,
	},
}

pub type Env2CfgResult<T> = Result<T, Env2CfgError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
