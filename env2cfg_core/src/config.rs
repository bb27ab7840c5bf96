use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;

use crate::Env2CfgError;
use crate::Env2CfgResult;

/// Default opening delimiter for placeholders.
pub const DEFAULT_DELIM_START: &str = "${";

/// Default closing delimiter for placeholders.
pub const DEFAULT_DELIM_END: &str = "}";

/// Default permission text used for rendered output files and for the
/// expected mode of the dotenv source.
pub const DEFAULT_PERMS: &str = "0640";

/// Variables supplied on the command line. Keys are unique and the last
/// assignment for a key wins.
pub type Overrides = BTreeMap<String, String>;

/// The literal strings that open and close a placeholder.
///
/// ```text
/// broker: tcp://${MQTT_BROKER}:${MQTT_PORT}
///               ^^           ^
///             start         end
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
	pub start: String,
	pub end: String,
}

impl Delimiters {
	pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
		Self {
			start: start.into(),
			end: end.into(),
		}
	}

	/// Both delimiters must be non-empty, otherwise scanning could never make
	/// progress through a line.
	pub fn validate(&self) -> Env2CfgResult<()> {
		if self.start.is_empty() {
			return Err(Env2CfgError::EmptyDelimiter("start"));
		}

		if self.end.is_empty() {
			return Err(Env2CfgError::EmptyDelimiter("end"));
		}

		Ok(())
	}
}

impl Default for Delimiters {
	fn default() -> Self {
		Self::new(DEFAULT_DELIM_START, DEFAULT_DELIM_END)
	}
}

/// Unix permission bits: `rwx` for user, group and other, plus the setuid,
/// setgid and sticky bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileMode(u32);

impl FileMode {
	/// `0640`: owner read/write, group read.
	pub const DEFAULT: Self = Self(0o640);

	const MASK: u32 = 0o7777;

	/// Build a mode from raw bits. File type bits are dropped.
	pub const fn new(bits: u32) -> Self {
		Self(bits & Self::MASK)
	}

	pub const fn bits(self) -> u32 {
		self.0
	}

	/// Parse an octal permission string such as `0640`, `640` or `0o640`.
	/// Returns `None` for anything that isn't octal or doesn't fit in `0o7777`.
	pub fn parse(text: &str) -> Option<Self> {
		let digits = text.trim();
		let digits = digits.strip_prefix("0o").unwrap_or(digits);

		if digits.is_empty() || !digits.bytes().all(|byte| matches!(byte, b'0'..=b'7')) {
			return None;
		}

		u32::from_str_radix(digits, 8)
			.ok()
			.filter(|bits| *bits <= Self::MASK)
			.map(Self)
	}
}

impl Default for FileMode {
	fn default() -> Self {
		Self::DEFAULT
	}
}

impl fmt::Display for FileMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:04o}", self.0)
	}
}

/// Split a `key=value` override into its parts. Exactly one `=` is allowed.
pub fn split_override(arg: &str) -> Env2CfgResult<(String, String)> {
	let mut parts = arg.split('=');

	match (parts.next(), parts.next(), parts.next()) {
		(Some(key), Some(value), None) => Ok((key.to_string(), value.to_string())),
		_ => Err(Env2CfgError::MalformedOverride(arg.to_string())),
	}
}

/// Validate a `key=value` override and store it in `overrides`, replacing any
/// earlier value for the same key.
pub fn parse_override(arg: &str, overrides: &mut Overrides) -> Env2CfgResult<()> {
	let (key, value) = split_override(arg)?;
	overrides.insert(key, value);

	Ok(())
}

/// Which direction the template is processed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
	/// Substitute placeholders with resolved values.
	Render,
	/// Collect placeholder names into a dotenv skeleton.
	Generate,
}

/// Options for a single run, as collected from the command line.
#[derive(Debug, Clone)]
pub struct RunConfig {
	/// Template to read placeholders from.
	pub template: PathBuf,
	/// Dotenv file. Read as a variable source when rendering, written as the
	/// destination when generating.
	pub env_file: Option<PathBuf>,
	/// Destination of the rendered template. Standard output when absent.
	pub output: Option<PathBuf>,
	/// Run in reverse and generate a dotenv skeleton.
	pub generate: bool,
	/// Favor the dotenv file over the process environment.
	pub env_override: bool,
	/// Variables from the command line. These always win.
	pub overrides: Overrides,
	/// Permission bits as typed by the user, e.g. `0640`.
	pub perms: String,
	/// Skip the permission check on the dotenv file.
	pub ignore_perms: bool,
	/// Don't report warnings and don't fail because of them.
	pub quiet: bool,
	/// Print to standard output instead of writing any file.
	pub dry_run: bool,
	pub delimiters: Delimiters,
}

impl Default for RunConfig {
	fn default() -> Self {
		Self {
			template: PathBuf::new(),
			env_file: None,
			output: None,
			generate: false,
			env_override: false,
			overrides: Overrides::new(),
			perms: DEFAULT_PERMS.to_string(),
			ignore_perms: false,
			quiet: false,
			dry_run: false,
			delimiters: Delimiters::default(),
		}
	}
}

impl RunConfig {
	pub fn new(template: impl Into<PathBuf>) -> Self {
		Self {
			template: template.into(),
			..Self::default()
		}
	}

	pub fn mode(&self) -> RunMode {
		if self.generate {
			RunMode::Generate
		} else {
			RunMode::Render
		}
	}

	/// Check the options before any file is read.
	///
	/// Destinations may never clobber an input, and generating refuses to
	/// overwrite an existing dotenv file. An unreadable permission string is
	/// not fatal: the default mode is used and a notice is recorded.
	pub fn validate(self) -> Env2CfgResult<ValidatedConfig> {
		if self.template.as_os_str().is_empty() {
			return Err(Env2CfgError::MissingTemplate);
		}

		self.delimiters.validate()?;

		match self.mode() {
			RunMode::Render => {
				if let Some(output) = &self.output {
					if self.env_file.as_ref() == Some(output) {
						return Err(Env2CfgError::SamePath {
							first: "dotenv",
							second: "output",
						});
					}

					if *output == self.template {
						return Err(Env2CfgError::SamePath {
							first: "template",
							second: "output",
						});
					}
				}
			}
			RunMode::Generate => {
				if let Some(env_file) = &self.env_file {
					if *env_file == self.template {
						return Err(Env2CfgError::SamePath {
							first: "template",
							second: "dotenv",
						});
					}

					if !self.dry_run && env_file.exists() {
						return Err(Env2CfgError::DestinationExists(env_file.clone()));
					}
				}
			}
		}

		let mut notices = Vec::new();
		let file_mode = if let Some(mode) = FileMode::parse(&self.perms) {
			mode
		} else {
			let notice = format!(
				"could not convert {} to octal: using {}",
				self.perms,
				FileMode::DEFAULT
			);
			tracing::warn!("{notice}");
			notices.push(notice);
			FileMode::DEFAULT
		};

		Ok(ValidatedConfig {
			config: self,
			file_mode,
			notices,
		})
	}
}

/// A [`RunConfig`] that passed validation, with its permission string
/// converted to a [`FileMode`].
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
	config: RunConfig,
	file_mode: FileMode,
	notices: Vec<String>,
}

impl ValidatedConfig {
	pub fn config(&self) -> &RunConfig {
		&self.config
	}

	pub fn mode(&self) -> RunMode {
		self.config.mode()
	}

	/// Mode used for written files and expected on the dotenv source.
	pub fn file_mode(&self) -> FileMode {
		self.file_mode
	}

	/// Recoverable problems found during validation.
	pub fn notices(&self) -> &[String] {
		&self.notices
	}

	/// The file this run writes to, if any. Dry runs never write.
	pub fn destination(&self) -> Option<&Path> {
		if self.config.dry_run {
			return None;
		}

		match self.mode() {
			RunMode::Render => self.config.output.as_deref(),
			RunMode::Generate => self.config.env_file.as_deref(),
		}
	}
}
