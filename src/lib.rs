//! # Weft
//!
//! An indentation-normalizing template engine. Template source is written in
//! a visually nested, readable style; the rendered output's indentation
//! follows the *surrounding context* instead of the nesting depth of the
//! source.
//!
//! ## Markers
//!
//! - Output: `<%= code %>` — evaluate, stringify, emit
//! - Silent: `<% code %>` — evaluate for control flow only
//! - Pipe: `<%| code %>` — like silent, but the block's rendered body is
//!   realigned from its authored indentation to the marker's context
//! - Literal escape: `<%% ... %>` emits `<% ... %>`
//!
//! The embedded expression language is opaque to this crate: a host
//! [`Evaluator`] supplies evaluation, block control flow, and named
//! sub-template rendering, and a [`Syntax`] capability answers whether a
//! given code fragment opens, continues, or closes a block.
//!
//! ## Example
//!
//! With a host grammar in the `if ... do` / `end` family:
//!
//! ```rust,ignore
//! use weft::{Bindings, Template};
//!
//! let template = Template::parse(
//!     "before\n  <%| if greet do %>\n    hello <%= name %>\n  <% end %>\nafter\n",
//!     &host,
//! )?;
//!
//! let mut scope = Bindings::new();
//! scope.set("greet", true);
//! scope.set("name", "World");
//!
//! // The body was authored one level deeper than the marker, yet renders
//! // at the marker's own indentation:
//! assert_eq!(template.render(&host, &scope)?, "before\n  hello World\nafter\n");
//! ```
//!
//! `include(...)` calls anywhere in an expression splice a named
//! sub-template's render into the output, reindented line-by-line to the
//! call site.

mod error;
mod eval;
mod include;
mod indent;
mod parse;
mod render;
mod segment;

pub use error::{BlockError, Error, EvalError, Result};
pub use eval::{Bindings, Evaluator, Syntax, Value};
pub use render::BlockBody;
pub use segment::MarkerKind;

use parse::Node;

/// A parsed template: an ordered sequence of literal text and expression
/// segments, immutable once parsed.
///
/// Parsing needs only the host's [`Syntax`] capability; rendering is a pure
/// function of the template, an [`Evaluator`], and a [`Bindings`] scope, so
/// one `Template` may be rendered from many threads concurrently.
#[derive(Debug, Clone)]
pub struct Template {
	nodes: Vec<Node>,
}

impl Template {
	/// Parses template source against the host's block grammar.
	///
	/// # Errors
	///
	/// [`Error::UnterminatedMarker`] when an opening delimiter never
	/// closes, [`Error::UnclosedBlock`] / [`Error::UnexpectedBlockClose`]
	/// when block markers do not pair up.
	pub fn parse(source: &str, syntax: &dyn Syntax) -> Result<Self> {
		Ok(Self {
			nodes: parse::build(source, syntax)?,
		})
	}

	/// Renders the template with the given evaluator and binding scope.
	///
	/// Evaluation errors abort the render immediately; there is no partial
	/// output.
	pub fn render(&self, evaluator: &dyn Evaluator, bindings: &Bindings) -> Result<String> {
		render::render_nodes(&self.nodes, evaluator, bindings)
	}
}

/// Parses and renders in one step, for callers that do not reuse the
/// template.
pub fn render_str(source: &str, evaluator: &dyn Evaluator, bindings: &Bindings) -> Result<String> {
	Template::parse(source, evaluator)?.render(evaluator, bindings)
}
