//! Indentation primitives.
//!
//! Everything here is a total function over raw text: there is no failure
//! path, and no case ever converts between tabs and spaces. Indentation is
//! whatever run of `' '` and `'\t'` the template author typed.

/// Maximal trailing run of spaces and tabs in `text`, stopping at a newline
/// or at the start of the text.
///
/// This is the "current indentation" of whatever marker immediately follows
/// `text` in the template source.
pub(crate) fn trailing_indentation(text: &str) -> &str {
	let bytes = text.as_bytes();
	let mut start = bytes.len();
	while start > 0 && matches!(bytes[start - 1], b' ' | b'\t') {
		start -= 1;
	}
	&text[start..]
}

/// Removes one trailing `\n[ \t]*` run, if present.
///
/// Used on the text before a pipe-block marker (so the marker's own line
/// contributes no blank line to the output) and on the last text of each
/// clause of a pipe block (the newline "before `end`"). Text that does not
/// end on a blank tail is returned unchanged.
pub(crate) fn trim_trailing_boundary(text: &str) -> &str {
	let run = trailing_indentation(text).len();
	let cut = text.len() - run;
	if cut > 0 && text.as_bytes()[cut - 1] == b'\n' {
		&text[..cut - 1]
	} else {
		text
	}
}

/// Block baseline: the `[ \t]*` run following the first literal newline of
/// a block's rendered body.
///
/// Returns `None` when the body contains no newline at all, in which case
/// the block is passed through unchanged.
pub(crate) fn block_baseline(rendered: &str) -> Option<&str> {
	let after = &rendered[rendered.find('\n')? + 1..];
	let end = after
		.as_bytes()
		.iter()
		.position(|b| !matches!(b, b' ' | b'\t'))
		.unwrap_or(after.len());
	Some(&after[..end])
}

/// Shifts every line of `rendered` from `baseline` to `current`.
///
/// Line 0 is never touched (it sits on the block-open line). Lines prefixed
/// by the exact baseline have the prefix replaced; shallower lines and fully
/// empty lines survive verbatim. With an empty baseline, every non-empty
/// line gains the current indentation instead.
pub(crate) fn reindent(rendered: &str, baseline: &str, current: &str) -> String {
	if baseline == current {
		return rendered.to_string();
	}
	let mut lines = rendered.split('\n');
	let mut out = String::with_capacity(rendered.len());
	if let Some(first) = lines.next() {
		out.push_str(first);
	}
	for line in lines {
		out.push('\n');
		if baseline.is_empty() {
			if !line.is_empty() {
				out.push_str(current);
			}
			out.push_str(line);
		} else if let Some(rest) = line.strip_prefix(baseline) {
			out.push_str(current);
			out.push_str(rest);
		} else {
			out.push_str(line);
		}
	}
	out
}

/// Prefixes every line after the first with `indent`, leaving fully empty
/// lines unprefixed. This is the include-splice alignment: line 0 lands
/// where the include call sat, later lines are pushed under it.
pub(crate) fn indent_tail_lines(indent: &str, text: &str) -> String {
	if indent.is_empty() || !text.contains('\n') {
		return text.to_string();
	}
	let mut lines = text.split('\n');
	let mut out = String::with_capacity(text.len());
	if let Some(first) = lines.next() {
		out.push_str(first);
	}
	for line in lines {
		out.push('\n');
		if !line.is_empty() {
			out.push_str(indent);
		}
		out.push_str(line);
	}
	out
}
