//! Include rewriting.
//!
//! An `include(...)` call may sit anywhere inside an expression's code —
//! alone, as an argument to host code, inside a block head. The code itself
//! is opaque, so the rewrite is purely lexical: each call is replaced by a
//! synthetic binding name, and the call's raw argument source plus the
//! indentation context of the surrounding marker are kept aside. At render
//! time the driver resolves each call through the evaluator, aligns the
//! result to the recorded indentation, and supplies it to the expression as
//! an ordinary binding.
//!
//! The scan is quote-aware (calls inside host string literals are left
//! alone) and paren-balanced (nested call syntax inside the argument list is
//! captured whole). Only the parenthesized call form is recognized; see
//! DESIGN.md.

/// One rewritten `include(...)` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IncludeCall {
	/// Synthetic binding name the call was replaced with.
	pub var: String,
	/// Raw argument source between the parentheses, trimmed.
	pub args: String,
	/// Indentation context of the marker containing the call.
	pub indent: String,
}

/// Replaces every `include(...)` call in `code` with a synthetic binding
/// name, threading `counter` so names stay unique across the whole template.
pub(crate) fn rewrite(code: &str, indent: &str, counter: &mut usize) -> (String, Vec<IncludeCall>) {
	if !code.contains("include") {
		return (code.to_string(), Vec::new());
	}
	let mut out = String::with_capacity(code.len());
	let mut calls = Vec::new();
	let mut i = 0;
	while i < code.len() {
		let rest = &code[i..];
		let Some(c) = rest.chars().next() else { break };
		if c == '"' || c == '\'' {
			let end = skip_string(code, i);
			out.push_str(&code[i..end]);
			i = end;
			continue;
		}
		if rest.starts_with("include") && at_word_start(code, i) {
			let after = i + "include".len();
			let word_continues = code[after..].chars().next().is_some_and(is_ident_char);
			if !word_continues {
				let mut paren = after;
				while code[paren..].starts_with(' ') {
					paren += 1;
				}
				if code[paren..].starts_with('(') {
					if let Some(close) = matching_paren(code, paren) {
						let var = format!("__include_{}", *counter);
						*counter += 1;
						calls.push(IncludeCall {
							var: var.clone(),
							args: code[paren + 1..close].trim().to_string(),
							indent: indent.to_string(),
						});
						out.push_str(&var);
						i = close + 1;
						continue;
					}
				}
			}
			out.push_str("include");
			i = after;
			continue;
		}
		out.push(c);
		i += c.len_utf8();
	}
	(out, calls)
}

fn is_ident_char(c: char) -> bool {
	c.is_alphanumeric() || c == '_'
}

/// True when the byte at `i` starts a fresh word: not preceded by an
/// identifier character or a `.` (a qualified `Mod.include` belongs to the
/// host, not to us).
fn at_word_start(code: &str, i: usize) -> bool {
	code[..i]
		.chars()
		.next_back()
		.is_none_or(|c| !is_ident_char(c) && c != '.')
}

/// Index just past the closing quote of the string starting at `start`, or
/// the end of the code for an unterminated literal. Backslash escapes are
/// skipped.
fn skip_string(code: &str, start: usize) -> usize {
	let bytes = code.as_bytes();
	let quote = bytes[start];
	let mut i = start + 1;
	while i < bytes.len() {
		match bytes[i] {
			b'\\' => i += 2,
			b if b == quote => return i + 1,
			_ => i += 1,
		}
	}
	bytes.len()
}

/// Index of the `)` matching the `(` at `open`, skipping string literals.
fn matching_paren(code: &str, open: usize) -> Option<usize> {
	let bytes = code.as_bytes();
	let mut depth = 0usize;
	let mut i = open;
	while i < bytes.len() {
		match bytes[i] {
			b'"' | b'\'' => {
				i = skip_string(code, i);
				continue;
			}
			b'(' => depth += 1,
			b')' => {
				depth -= 1;
				if depth == 0 {
					return Some(i);
				}
			}
			_ => {}
		}
		i += 1;
	}
	None
}
