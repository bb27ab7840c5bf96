use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::Env2CfgError;
use crate::Env2CfgResult;
use crate::config::FileMode;
use crate::config::RunMode;
use crate::config::ValidatedConfig;
use crate::dotenv::load_env_file;
use crate::engine::GeneratedKeys;
use crate::engine::Warnings;
use crate::engine::extract_keys;
use crate::engine::render_lines;
use crate::permissions::PermissionStore;
use crate::permissions::check_mode;
use crate::resolver::Environment;
use crate::resolver::VariableSources;

/// Everything a run produced. Nothing has been written yet.
#[derive(Debug, Clone)]
pub struct RunReport {
	pub mode: RunMode,
	/// The rendered template, or the dotenv skeleton when generating.
	pub document: String,
	/// Unresolved placeholders. Always empty when generating.
	pub warnings: Warnings,
	/// Placeholder names found in the template. Only filled when generating.
	pub keys: GeneratedKeys,
}

impl RunReport {
	/// Whether the run should end with a failing exit status. Warnings only
	/// count when they aren't silenced.
	pub fn is_failure(&self, quiet: bool) -> bool {
		!quiet && !self.warnings.is_empty()
	}
}

/// Read the template and process it in the configured direction.
///
/// When rendering with a dotenv file, its permission bits are checked first
/// (unless disabled) and the file is loaded once. Any failure to read an input
/// aborts the run before output is produced.
pub fn run<E, P>(config: &ValidatedConfig, environment: E, permissions: &P) -> Env2CfgResult<RunReport>
where
	E: Environment,
	P: PermissionStore + ?Sized,
{
	let settings = config.config();
	let template = std::fs::read_to_string(&settings.template).map_err(|source| {
		Env2CfgError::TemplateRead {
			path: settings.template.clone(),
			source,
		}
	})?;

	tracing::debug!(
		template = %settings.template.display(),
		mode = ?config.mode(),
		"processing template"
	);

	match config.mode() {
		RunMode::Render => {
			let file_vars = match &settings.env_file {
				Some(path) => {
					if !settings.ignore_perms {
						check_mode(permissions, path, config.file_mode())?;
					}
					load_env_file(path)?
				}
				None => HashMap::new(),
			};

			let sources = VariableSources::new(environment)
				.with_overrides(settings.overrides.clone())
				.with_file_vars(file_vars)
				.with_env_override(settings.env_override);
			let rendered = render_lines(template.lines(), &sources, &settings.delimiters);

			Ok(RunReport {
				mode: RunMode::Render,
				document: rendered.document(),
				warnings: rendered.warnings,
				keys: GeneratedKeys::new(),
			})
		}
		RunMode::Generate => {
			let keys = extract_keys(template.lines(), &settings.delimiters);

			Ok(RunReport {
				mode: RunMode::Generate,
				document: keys.to_env_skeleton(),
				warnings: Warnings::new(),
				keys,
			})
		}
	}
}

/// Write `contents` to `path`, creating it with `mode`.
///
/// The mode passed at creation is filtered by the process umask and is ignored
/// for files that already exist, so it is set again once the file is written.
pub fn write_output<P>(path: &Path, contents: &str, mode: FileMode, permissions: &P) -> Env2CfgResult<()>
where
	P: PermissionStore + ?Sized,
{
	let output_error = |source| {
		Env2CfgError::OutputWrite {
			path: path.to_path_buf(),
			source,
		}
	};

	let mut options = OpenOptions::new();
	options.write(true).create(true).truncate(true);

	#[cfg(unix)]
	{
		use std::os::unix::fs::OpenOptionsExt;
		options.mode(mode.bits());
	}

	let mut file = options.open(path).map_err(output_error)?;
	file.write_all(contents.as_bytes()).map_err(output_error)?;
	permissions.set_mode(path, mode).map_err(output_error)?;

	tracing::debug!(path = %path.display(), %mode, "wrote output");

	Ok(())
}
