use std::collections::BTreeMap;
use std::collections::HashMap;

use crate::config::Overrides;

/// A read-only view of process environment variables.
///
/// [`ProcessEnvironment`] reads the real environment. Maps implement the trait
/// too, so a run can be driven from a fixed set of variables.
pub trait Environment {
	fn lookup(&self, key: &str) -> Option<String>;
}

/// The environment of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
	fn lookup(&self, key: &str) -> Option<String> {
		// Keys that can't name a variable (empty, `=`, NUL) are never set, and
		// `std::env::var_os` panics on some of them.
		if key.is_empty() || key.contains(['=', '\0']) {
			return None;
		}

		std::env::var_os(key).and_then(|value| value.into_string().ok())
	}
}

impl<S: std::hash::BuildHasher> Environment for HashMap<String, String, S> {
	fn lookup(&self, key: &str) -> Option<String> {
		self.get(key).cloned()
	}
}

impl Environment for BTreeMap<String, String> {
	fn lookup(&self, key: &str) -> Option<String> {
		self.get(key).cloned()
	}
}

impl<E: Environment + ?Sized> Environment for &E {
	fn lookup(&self, key: &str) -> Option<String> {
		(**self).lookup(key)
	}
}

/// The three variable sources of a run, consulted in precedence order.
///
/// 1. Command-line overrides. Never overridden.
/// 2. The process environment.
/// 3. Variables loaded from the dotenv file.
///
/// With `env_override` set, the process environment is skipped: a key not set
/// on the command line is taken from the dotenv file or not at all.
#[derive(Debug, Clone)]
pub struct VariableSources<E> {
	overrides: Overrides,
	environment: E,
	file_vars: HashMap<String, String>,
	env_override: bool,
}

impl<E: Environment> VariableSources<E> {
	pub fn new(environment: E) -> Self {
		Self {
			overrides: Overrides::new(),
			environment,
			file_vars: HashMap::new(),
			env_override: false,
		}
	}

	#[must_use]
	pub fn with_overrides(mut self, overrides: Overrides) -> Self {
		self.overrides = overrides;
		self
	}

	#[must_use]
	pub fn with_file_vars(mut self, file_vars: HashMap<String, String>) -> Self {
		self.file_vars = file_vars;
		self
	}

	#[must_use]
	pub fn with_env_override(mut self, env_override: bool) -> Self {
		self.env_override = env_override;
		self
	}

	/// Look `name` up in precedence order. `None` means no source defines it.
	pub fn resolve(&self, name: &str) -> Option<String> {
		if let Some(value) = self.overrides.get(name) {
			tracing::trace!(name, "resolved from command line");
			return Some(value.clone());
		}

		if !self.env_override {
			if let Some(value) = self.environment.lookup(name) {
				tracing::trace!(name, "resolved from environment");
				return Some(value);
			}
		}

		self.file_vars.get(name).cloned().inspect(|_| {
			tracing::trace!(name, "resolved from dotenv file");
		})
	}
}
