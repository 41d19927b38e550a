//! Tokenizer/segmenter: raw template source to flat segments.
//!
//! The scanner walks the source once, splitting it into literal [`Segment::Text`]
//! runs and [`Segment::Expr`] markers. Three delimiter pairs open an
//! expression — `<%=` (output), `<%` (silent), `<%|` (pipe) — all closed by
//! `%>`. The literal escape `<%% ... %>` emits `<% ... %>` verbatim and never
//! becomes an expression. Everything between markers is kept byte-for-byte,
//! newlines and trailing whitespace included.

use crate::error::{Error, Result};

/// How an expression marker was delimited, and therefore how its value
/// contributes to the rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
	/// `<%= code %>` — evaluate, stringify, emit.
	Output,
	/// `<% code %>` — evaluate for control flow only; emits nothing itself.
	Silent,
	/// `<%| code %>` — like silent, but the block body's rendered text is
	/// realigned to the marker's indentation context.
	Pipe,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
	Text(String),
	Expr {
		kind: MarkerKind,
		code: String,
		line: usize,
	},
}

/// Splits `source` into alternating text and expression segments.
///
/// Lines are 1-based and refer to the line the marker *opens* on; they are
/// preserved on every expression for diagnostics.
pub(crate) fn segment(source: &str) -> Result<Vec<Segment>> {
	let mut segments = Vec::new();
	let mut text = String::new();
	let mut line = 1usize;
	let mut rest = source;

	while let Some(open) = rest.find("<%") {
		let before = &rest[..open];
		line += newlines(before);
		text.push_str(before);
		let after = &rest[open + 2..];

		// Literal escape: `<%% ... %>` renders as `<% ... %>`.
		if let Some(body) = after.strip_prefix('%') {
			let close = body
				.find("%>")
				.ok_or(Error::UnterminatedMarker { line })?;
			text.push_str("<%");
			text.push_str(&body[..close]);
			text.push_str("%>");
			line += newlines(&body[..close]);
			rest = &body[close + 2..];
			continue;
		}

		let (kind, body) = if let Some(body) = after.strip_prefix('=') {
			(MarkerKind::Output, body)
		} else if let Some(body) = after.strip_prefix('|') {
			(MarkerKind::Pipe, body)
		} else {
			(MarkerKind::Silent, after)
		};
		let close = body
			.find("%>")
			.ok_or(Error::UnterminatedMarker { line })?;
		let raw = &body[..close];

		if !text.is_empty() {
			segments.push(Segment::Text(std::mem::take(&mut text)));
		}
		segments.push(Segment::Expr {
			kind,
			code: trim_marker_spacing(raw).to_string(),
			line,
		});
		line += newlines(raw);
		rest = &body[close + 2..];
	}

	text.push_str(rest);
	if !text.is_empty() {
		segments.push(Segment::Text(text));
	}
	Ok(segments)
}

/// Strips the idiomatic single space adjacent to each delimiter
/// (`<%= expr %>` captures `expr`). Anything further in is kept verbatim.
fn trim_marker_spacing(code: &str) -> &str {
	let code = code.strip_prefix(' ').unwrap_or(code);
	code.strip_suffix(' ').unwrap_or(code)
}

fn newlines(text: &str) -> usize {
	text.bytes().filter(|b| *b == b'\n').count()
}
