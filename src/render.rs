//! Render driver.
//!
//! Walks the node tree in source order, delegating every expression to the
//! host evaluator and applying the render-time half of the indentation
//! algorithm: include results are aligned to their call site before the
//! expression sees them, and pipe-block output is realigned from its
//! authored baseline to the marker's indentation context. Nested pipe
//! blocks resolve innermost-first for free — a clause body renders fully
//! (its own blocks already realigned) before the enclosing block looks at
//! the text.
//!
//! A render is a pure function of the template and the bindings; nothing
//! here holds state between calls.

use std::borrow::Cow;

use crate::error::{Error, Result};
use crate::eval::{Bindings, Evaluator, Value};
use crate::include::IncludeCall;
use crate::indent;
use crate::parse::{BlockNode, Clause, Node};
use crate::segment::MarkerKind;

/// Handle through which an evaluator renders the clause bodies of a block.
///
/// Handed to [`Evaluator::evaluate_block`]; the evaluator decides how often
/// and with which scope each clause runs, the core keeps ownership of the
/// rendered text boundaries.
pub struct BlockBody<'a> {
	clauses: &'a [Clause],
	evaluator: &'a dyn Evaluator,
	line: usize,
}

impl BlockBody<'_> {
	pub fn clause_count(&self) -> usize {
		self.clauses.len()
	}

	/// Continuation code that introduced the clause (`else`, a match arm),
	/// or `None` for clause 0 and out-of-range indices.
	pub fn control(&self, clause: usize) -> Option<&str> {
		self.clauses.get(clause).and_then(|c| c.control.as_deref())
	}

	/// Renders one clause body with the given scope.
	pub fn render(&self, clause: usize, scope: &Bindings) -> Result<String> {
		let Some(clause) = self.clauses.get(clause) else {
			return Err(Error::Eval {
				line: self.line,
				message: "block clause index out of range".to_string(),
			});
		};
		render_nodes(&clause.body, self.evaluator, scope)
	}
}

pub(crate) fn render_nodes(
	nodes: &[Node],
	evaluator: &dyn Evaluator,
	scope: &Bindings,
) -> Result<String> {
	let mut out = String::new();
	for node in nodes {
		match node {
			Node::Text(text) => out.push_str(text),
			Node::Expr(expr) => {
				let scope = splice_includes(&expr.includes, evaluator, scope, expr.line)?;
				let value = evaluator
					.evaluate(&expr.code, scope.as_ref())
					.map_err(|err| Error::from_eval(err, expr.line))?;
				if expr.kind != MarkerKind::Silent {
					out.push_str(&value);
				}
			}
			Node::Block(block) => out.push_str(&render_block(block, evaluator, scope)?),
		}
	}
	Ok(out)
}

fn render_block(
	block: &BlockNode,
	evaluator: &dyn Evaluator,
	scope: &Bindings,
) -> Result<String> {
	let scope = splice_includes(&block.includes, evaluator, scope, block.line)?;
	let body = BlockBody {
		clauses: &block.clauses,
		evaluator,
		line: block.line,
	};
	let rendered = evaluator
		.evaluate_block(&block.code, scope.as_ref(), &body)
		.map_err(|err| Error::from_block(err, block.line))?;
	if block.kind == MarkerKind::Pipe {
		Ok(resolve_pipe(block, rendered))
	} else {
		Ok(rendered)
	}
}

/// Render-time half of the pipe resolution: shift the rendered body from
/// its baseline to the block's indentation context. A body with no newline
/// (a single inline expression) passes through unchanged.
fn resolve_pipe(block: &BlockNode, rendered: String) -> String {
	let shift = match indent::block_baseline(&rendered) {
		Some(baseline) if baseline != block.indent => Some(baseline.to_string()),
		_ => None,
	};
	let mut resolved = match shift {
		Some(baseline) => {
			tracing::debug!(
				line = block.line,
				baseline = ?baseline,
				context = ?block.indent,
				"realigning pipe block"
			);
			indent::reindent(&rendered, &baseline, &block.indent)
		}
		None => rendered,
	};
	if block.leading && resolved.starts_with('\n') {
		resolved.remove(0);
	}
	resolved
}

/// Resolves every rewritten `include(...)` call of an expression and binds
/// the aligned results under their synthetic names.
fn splice_includes<'a>(
	includes: &[IncludeCall],
	evaluator: &dyn Evaluator,
	scope: &'a Bindings,
	line: usize,
) -> Result<Cow<'a, Bindings>> {
	if includes.is_empty() {
		return Ok(Cow::Borrowed(scope));
	}
	let mut spliced = scope.clone();
	for call in includes {
		let (name, overrides) = evaluator
			.evaluate_include_args(&call.args, scope)
			.map_err(|err| Error::from_eval(err, line))?;
		let merged = scope.merged(&overrides);
		let rendered = evaluator
			.render_named_template(&name, &merged)
			.map_err(|err| Error::from_eval(err, line))?;
		spliced.set(
			call.var.clone(),
			Value::String(indent::indent_tail_lines(&call.indent, &rendered)),
		);
	}
	Ok(Cow::Owned(spliced))
}
