//! Collaborator interface: binding scopes and the host-evaluator capabilities.
//!
//! The core never understands the embedded expression language. Everything
//! semantic — evaluating code, deciding whether code opens a block, running
//! a loop, resolving include arguments — is delegated through the [`Syntax`]
//! and [`Evaluator`] traits. The core owns only the text bookkeeping around
//! those calls.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{BlockError, EvalError};
use crate::render::BlockBody;

pub use serde_json::Value;

/// Name → value scope available to expression evaluation during a render.
///
/// The core never mutates a scope it was handed; includes and loop variables
/// operate on merged copies.
///
/// # Examples
///
/// ```
/// use weft::Bindings;
///
/// let mut scope = Bindings::new();
/// scope.set("name", "World");
/// assert_eq!(scope.lookup("name").and_then(|v| v.as_str()), Some("World"));
/// assert!(scope.lookup("missing").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bindings(HashMap<String, Value>);

impl Bindings {
	pub fn new() -> Self {
		Self(HashMap::new())
	}

	/// Inserts or replaces a binding.
	pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
		self.0.insert(name.into(), value.into());
	}

	/// Resolves a name, or `None` when it is unbound. Evaluators report the
	/// miss as [`EvalError::MissingBinding`].
	pub fn lookup(&self, name: &str) -> Option<&Value> {
		self.0.get(name)
	}

	/// Returns a new scope with `overrides` applied on top of `self` —
	/// later keys win. This is the scope an include delegates with.
	///
	/// # Examples
	///
	/// ```
	/// use weft::Bindings;
	///
	/// let mut outer = Bindings::new();
	/// outer.set("a", 1);
	/// outer.set("b", 1);
	/// let mut inner = Bindings::new();
	/// inner.set("b", 2);
	///
	/// let merged = outer.merged(&inner);
	/// assert_eq!(merged.lookup("a"), Some(&1.into()));
	/// assert_eq!(merged.lookup("b"), Some(&2.into()));
	/// ```
	pub fn merged(&self, overrides: &Bindings) -> Bindings {
		let mut merged = self.clone();
		for (name, value) in &overrides.0 {
			merged.0.insert(name.clone(), value.clone());
		}
		merged
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.0.iter().map(|(name, value)| (name.as_str(), value))
	}
}

impl FromIterator<(String, Value)> for Bindings {
	fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

/// The host grammar's block-structure knowledge.
///
/// The parser asks these questions for every expression marker; it never
/// inspects the code itself. An implementation that cannot classify its own
/// grammar statically is a configuration error in the embedding, not
/// something this crate can recover from.
pub trait Syntax {
	/// Does this code open a block that a later close marker must end
	/// (`if ... do`, `for ... do`, a match head)?
	fn is_block_opening(&self, code: &str) -> bool;

	/// Does this code continue the innermost open block with a new clause
	/// (`else`, a match arm)? Defaults to a grammar with no continuations.
	fn is_block_continuation(&self, _code: &str) -> bool {
		false
	}

	/// Is this code the block-closing token (`end` in the reference
	/// grammar)?
	fn is_block_closing(&self, code: &str) -> bool;
}

/// Host evaluation capabilities the render driver delegates to.
pub trait Evaluator: Syntax {
	/// Evaluates an expression in `scope` and stringifies the result.
	fn evaluate(&self, code: &str, scope: &Bindings) -> Result<String, EvalError>;

	/// Evaluates a block-opening expression. The evaluator drives control
	/// flow: it may render any clause of `body` any number of times with
	/// any scope (zero times for a false condition, once per element for a
	/// loop) and returns the block's rendered text — for a silent block,
	/// exactly the concatenated clause renders.
	fn evaluate_block(
		&self,
		code: &str,
		scope: &Bindings,
		body: &BlockBody<'_>,
	) -> Result<String, BlockError>;

	/// Evaluates the raw argument source of an `include(...)` call into the
	/// named template and the explicit binding overrides. The core merges
	/// the overrides over the current scope and calls
	/// [`render_named_template`](Evaluator::render_named_template).
	fn evaluate_include_args(
		&self,
		args: &str,
		scope: &Bindings,
	) -> Result<(String, Bindings), EvalError>;

	/// Renders the named sub-template with the given scope, or
	/// [`EvalError::UnknownTemplate`] when no such template exists.
	fn render_named_template(&self, name: &str, scope: &Bindings)
	-> Result<String, EvalError>;
}
