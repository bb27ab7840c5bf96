use std::io;
use std::path::Path;

use crate::Env2CfgError;
use crate::Env2CfgResult;
use crate::config::FileMode;

/// Access to file permission bits.
pub trait PermissionStore {
	/// Current permission bits of `path`. `None` when the platform has no
	/// notion of Unix modes.
	fn read_mode(&self, path: &Path) -> io::Result<Option<FileMode>>;

	/// Force the permission bits of `path` to `mode`.
	fn set_mode(&self, path: &Path, mode: FileMode) -> io::Result<()>;
}

/// Permissions of the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsPermissions;

#[cfg(unix)]
impl PermissionStore for OsPermissions {
	fn read_mode(&self, path: &Path) -> io::Result<Option<FileMode>> {
		use std::os::unix::fs::PermissionsExt;

		let metadata = std::fs::metadata(path)?;
		Ok(Some(FileMode::new(metadata.permissions().mode())))
	}

	fn set_mode(&self, path: &Path, mode: FileMode) -> io::Result<()> {
		use std::os::unix::fs::PermissionsExt;

		std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode.bits()))
	}
}

#[cfg(not(unix))]
impl PermissionStore for OsPermissions {
	fn read_mode(&self, path: &Path) -> io::Result<Option<FileMode>> {
		std::fs::metadata(path)?;
		Ok(None)
	}

	fn set_mode(&self, _path: &Path, _mode: FileMode) -> io::Result<()> {
		Ok(())
	}
}

/// Require the permission bits of `path` to be exactly `expected`.
pub fn check_mode<P>(store: &P, path: &Path, expected: FileMode) -> Env2CfgResult<()>
where
	P: PermissionStore + ?Sized,
{
	let actual = store.read_mode(path).map_err(|error| {
		Env2CfgError::EnvFile {
			path: path.to_path_buf(),
			reason: error.to_string(),
		}
	})?;

	match actual {
		Some(actual) if actual != expected => {
			tracing::debug!(path = %path.display(), %actual, %expected, "permission mismatch");
			Err(Env2CfgError::PermissionMismatch {
				file: path.display().to_string(),
				mode: expected.to_string(),
			})
		}
		_ => Ok(()),
	}
}
