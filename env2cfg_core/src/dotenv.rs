use std::collections::HashMap;
use std::path::Path;

use crate::Env2CfgError;
use crate::Env2CfgResult;

/// Read the variables of a dotenv file without touching the process
/// environment.
///
/// Entries with an empty value (`KEY=`) are placeholders left unfilled, as
/// produced by generate mode, and are skipped so that they count as undefined.
/// When a key appears twice the later line wins.
pub fn load_env_file(path: &Path) -> Env2CfgResult<HashMap<String, String>> {
	let entries = dotenvy::from_path_iter(path).map_err(|error| env_file_error(path, &error))?;
	let mut vars = HashMap::new();

	for entry in entries {
		let (key, value) = entry.map_err(|error| env_file_error(path, &error))?;

		if value.is_empty() {
			tracing::debug!(%key, "skipping unfilled dotenv entry");
			continue;
		}

		vars.insert(key, value);
	}

	tracing::debug!(path = %path.display(), count = vars.len(), "loaded dotenv file");

	Ok(vars)
}

/// Parse errors carry the offending line, which may hold a secret. Only its
/// position is reported.
fn env_file_error(path: &Path, error: &dotenvy::Error) -> Env2CfgError {
	let reason = match error {
		dotenvy::Error::LineParse(_, index) => format!("parse error at position {index}"),
		dotenvy::Error::Io(io_error) => io_error.to_string(),
		other => other.to_string(),
	};

	Env2CfgError::EnvFile {
		path: path.to_path_buf(),
		reason,
	}
}
