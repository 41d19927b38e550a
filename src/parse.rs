//! Tree builder: flat segments to block-structured nodes.
//!
//! Block structure belongs to the host grammar, so the builder never looks
//! at expression code itself — it asks the [`Syntax`] capability whether a
//! marker opens, continues, or closes a block, and keeps an explicit stack
//! of open frames. The builder is also where everything statically knowable
//! about indentation happens: the indentation context of each marker is
//! captured from its preceding text sibling, and the pipe-block boundary
//! trims are applied to the source text once, so a loop body is trimmed
//! once rather than once per iteration.

use crate::error::{Error, Result};
use crate::eval::Syntax;
use crate::include::{self, IncludeCall};
use crate::indent;
use crate::segment::{self, MarkerKind, Segment};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
	Text(String),
	Expr(ExprNode),
	Block(BlockNode),
}

/// A non-block expression marker.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ExprNode {
	pub kind: MarkerKind,
	pub code: String,
	pub line: usize,
	/// Indentation context: trailing whitespace of the preceding text
	/// sibling. Empty when the preceding sibling is an expression — the
	/// context cannot be known statically then, and the reference behavior
	/// is to treat it as empty rather than infer from runtime values.
	pub indent: String,
	pub includes: Vec<IncludeCall>,
}

/// A block marker together with its clause bodies, up to the matching close.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BlockNode {
	pub kind: MarkerKind,
	pub code: String,
	pub line: usize,
	pub indent: String,
	/// Set when this block is the very first segment of the whole template;
	/// the render drops one leading newline so the output does not start
	/// with a stray blank line.
	pub leading: bool,
	pub includes: Vec<IncludeCall>,
	pub clauses: Vec<Clause>,
}

/// One clause of a block. Clause 0 runs under the block-open code itself;
/// later clauses carry the continuation marker that introduced them
/// (`else`, a match arm, ...).
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Clause {
	pub control: Option<String>,
	pub body: Vec<Node>,
}

/// Parses `source` into a node tree using the host's block grammar.
pub(crate) fn build(source: &str, syntax: &dyn Syntax) -> Result<Vec<Node>> {
	let segments = segment::segment(source)?;
	let mut builder = Builder {
		root: Vec::new(),
		stack: Vec::new(),
		next_include: 0,
	};
	for seg in segments {
		builder.push(seg, syntax)?;
	}
	let nodes = builder.finish()?;
	tracing::trace!(nodes = nodes.len(), "parsed template");
	Ok(nodes)
}

struct OpenBlock {
	node: BlockNode,
	/// Continuation code of the clause currently accumulating, `None` for
	/// clause 0.
	pending: Option<String>,
	current: Vec<Node>,
}

struct Builder {
	root: Vec<Node>,
	stack: Vec<OpenBlock>,
	/// Monotonic counter for synthetic include binding names, threaded
	/// through the whole template.
	next_include: usize,
}

impl Builder {
	fn push(&mut self, seg: Segment, syntax: &dyn Syntax) -> Result<()> {
		match seg {
			Segment::Text(text) => self.target().push(Node::Text(text)),
			Segment::Expr { kind, code, line } => {
				if syntax.is_block_closing(&code) {
					self.close_block(line)?;
				} else if !self.stack.is_empty() && syntax.is_block_continuation(&code) {
					self.continue_block(code);
				} else if syntax.is_block_opening(&code) {
					self.open_block(kind, code, line);
				} else {
					let indent = indent_of(self.target_ref());
					let (code, includes) =
						include::rewrite(&code, &indent, &mut self.next_include);
					self.target().push(Node::Expr(ExprNode {
						kind,
						code,
						line,
						indent,
						includes,
					}));
				}
			}
		}
		Ok(())
	}

	fn open_block(&mut self, kind: MarkerKind, code: String, line: usize) {
		let indent = indent_of(self.target_ref());
		let leading = self.stack.is_empty() && self.root.is_empty();
		if kind == MarkerKind::Pipe {
			// The pipe-open line contributes no blank line to the output.
			trim_boundary(self.target());
		}
		let (code, includes) = include::rewrite(&code, &indent, &mut self.next_include);
		self.stack.push(OpenBlock {
			node: BlockNode {
				kind,
				code,
				line,
				indent,
				leading,
				includes,
				clauses: Vec::new(),
			},
			pending: None,
			current: Vec::new(),
		});
	}

	/// Caller guarantees the stack is non-empty.
	fn continue_block(&mut self, code: String) {
		let Some(open) = self.stack.last_mut() else {
			return;
		};
		if open.node.kind == MarkerKind::Pipe {
			trim_boundary(&mut open.current);
		}
		let body = std::mem::take(&mut open.current);
		open.node.clauses.push(Clause {
			control: open.pending.take(),
			body,
		});
		open.pending = Some(code);
	}

	fn close_block(&mut self, line: usize) -> Result<()> {
		let Some(mut open) = self.stack.pop() else {
			return Err(Error::UnexpectedBlockClose { line });
		};
		if open.node.kind == MarkerKind::Pipe {
			// The newline that would appear "before end" is dropped.
			trim_boundary(&mut open.current);
		}
		open.node.clauses.push(Clause {
			control: open.pending.take(),
			body: open.current,
		});
		self.target().push(Node::Block(open.node));
		Ok(())
	}

	fn finish(self) -> Result<Vec<Node>> {
		if let Some(open) = self.stack.first() {
			return Err(Error::UnclosedBlock {
				line: open.node.line,
			});
		}
		Ok(self.root)
	}

	fn target(&mut self) -> &mut Vec<Node> {
		match self.stack.last_mut() {
			Some(open) => &mut open.current,
			None => &mut self.root,
		}
	}

	fn target_ref(&self) -> &[Node] {
		match self.stack.last() {
			Some(open) => &open.current,
			None => &self.root,
		}
	}
}

fn indent_of(nodes: &[Node]) -> String {
	match nodes.last() {
		Some(Node::Text(text)) => indent::trailing_indentation(text).to_string(),
		_ => String::new(),
	}
}

/// Removes one trailing `\n[ \t]*` run from the last text node, dropping the
/// node entirely when nothing remains.
fn trim_boundary(nodes: &mut Vec<Node>) {
	if let Some(Node::Text(text)) = nodes.last_mut() {
		let len = indent::trim_trailing_boundary(text).len();
		if len == 0 {
			nodes.pop();
		} else {
			text.truncate(len);
		}
	}
}
