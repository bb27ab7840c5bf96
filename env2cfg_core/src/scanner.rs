use crate::config::Delimiters;

/// Substitute every placeholder in `line` with the output of `on_token`.
///
/// The line is scanned left to right for `delimiters.start` followed by the
/// next `delimiters.end`. The text strictly between them is the placeholder
/// name and is passed to `on_token` exactly as written. Delimiters don't nest,
/// and a start delimiter without a matching end is copied as literal text.
///
/// When `on_token` fails for any placeholder no substituted line is returned.
/// Scanning still runs to the end of the line so that every failing
/// placeholder is reported, in order.
///
/// ```
/// use env2cfg_core::Delimiters;
/// use env2cfg_core::scanner::scan_line;
///
/// let line = scan_line("port: ${PORT}", &Delimiters::default(), |name| {
/// 	Ok::<_, ()>(format!("<{name}>"))
/// });
/// assert_eq!(line, Ok("port: <PORT>".to_string()));
/// ```
pub fn scan_line<E, F>(line: &str, delimiters: &Delimiters, mut on_token: F) -> Result<String, Vec<E>>
where
	F: FnMut(&str) -> Result<String, E>,
{
	let start = delimiters.start.as_str();
	let end = delimiters.end.as_str();
	let mut rendered = String::with_capacity(line.len());
	let mut errors = Vec::new();
	let mut rest = line;

	while let Some(open) = rest.find(start) {
		let after_open = &rest[open + start.len()..];
		let Some(close) = after_open.find(end) else {
			break;
		};

		rendered.push_str(&rest[..open]);

		match on_token(&after_open[..close]) {
			Ok(value) => rendered.push_str(&value),
			Err(error) => errors.push(error),
		}

		rest = &after_open[close + end.len()..];
	}

	if !errors.is_empty() {
		return Err(errors);
	}

	rendered.push_str(rest);

	Ok(rendered)
}

