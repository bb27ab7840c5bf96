use std::collections::HashSet;

use derive_more::Deref;

use crate::config::Delimiters;
use crate::resolver::Environment;
use crate::resolver::VariableSources;
use crate::scanner::scan_line;

/// Warnings collected during a run, in the order they were raised.
///
/// Append-only: warnings are never removed, reordered or deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
pub struct Warnings(Vec<String>);

impl Warnings {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add(&mut self, message: impl Into<String>) {
		self.0.push(message.into());
	}

	/// All warnings raised so far. Reading them doesn't clear the list, so the
	/// exit status can still be decided after they've been reported.
	pub fn drain(&self) -> &[String] {
		&self.0
	}
}

impl<'a> IntoIterator for &'a Warnings {
	type IntoIter = std::slice::Iter<'a, String>;
	type Item = &'a String;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

/// Distinct placeholder names in the order they were first seen.
#[derive(Debug, Clone, Default, Deref)]
pub struct GeneratedKeys {
	#[deref]
	keys: Vec<String>,
	seen: HashSet<String>,
}

impl GeneratedKeys {
	pub fn new() -> Self {
		Self::default()
	}

	/// Record `key` unless it was already seen. Returns `true` when added.
	pub fn insert(&mut self, key: &str) -> bool {
		if self.seen.contains(key) {
			return false;
		}

		self.seen.insert(key.to_string());
		self.keys.push(key.to_string());
		true
	}

	pub fn into_vec(self) -> Vec<String> {
		self.keys
	}

	/// Format the keys as an empty dotenv file, one `KEY=` line per key.
	///
	/// ```
	/// use env2cfg_core::GeneratedKeys;
	///
	/// let mut keys = GeneratedKeys::new();
	/// keys.insert("HOST");
	/// keys.insert("PORT");
	/// assert_eq!(keys.to_env_skeleton(), "HOST=\nPORT=\n");
	/// ```
	pub fn to_env_skeleton(&self) -> String {
		self.keys.iter().map(|key| format!("{key}=\n")).collect()
	}
}

impl PartialEq for GeneratedKeys {
	fn eq(&self, other: &Self) -> bool {
		self.keys == other.keys
	}
}

impl Eq for GeneratedKeys {}

/// Output of rendering a template.
#[derive(Debug, Clone, Default)]
pub struct Rendered {
	pub lines: Vec<String>,
	pub warnings: Warnings,
}

impl Rendered {
	pub fn document(&self) -> String {
		render_document(&self.lines)
	}
}

/// Render each line of a template, substituting every placeholder with its
/// value from `sources`.
///
/// Lines are independent. A line with any unresolved placeholder is kept
/// exactly as written and a `no matching key for <name>` warning is recorded
/// for each distinct name in that line that couldn't be resolved.
pub fn render_lines<I, S, E>(lines: I, sources: &VariableSources<E>, delimiters: &Delimiters) -> Rendered
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
	E: Environment,
{
	let mut rendered = Rendered::default();

	for line in lines {
		let line = line.as_ref();
		let result = scan_line(line, delimiters, |name| {
			sources.resolve(name).ok_or_else(|| name.to_string())
		});

		match result {
			Ok(substituted) => rendered.lines.push(substituted),
			Err(unresolved) => {
				let mut reported = HashSet::new();
				for name in unresolved {
					if reported.insert(name.clone()) {
						tracing::debug!(%name, "unresolved placeholder");
						rendered.warnings.add(format!("no matching key for {name}"));
					}
				}

				rendered.lines.push(line.to_string());
			}
		}
	}

	rendered
}

/// Collect the distinct placeholder names in a template without resolving
/// them.
pub fn extract_keys<I, S>(lines: I, delimiters: &Delimiters) -> GeneratedKeys
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut keys = GeneratedKeys::new();

	for line in lines {
		let _ = scan_line(line.as_ref(), delimiters, |name| {
			keys.insert(name);
			Ok::<_, std::convert::Infallible>(String::new())
		});
	}

	keys
}

/// Join rendered lines with `\n`, ending with a trailing newline.
pub fn render_document<S: AsRef<str>>(lines: &[S]) -> String {
	let mut document = String::new();

	for (index, line) in lines.iter().enumerate() {
		if index > 0 {
			document.push('\n');
		}
		document.push_str(line.as_ref());
	}

	document.push('\n');
	document
}
