//! Error taxonomy for template parsing and rendering.
//!
//! Parse failures are structural (a marker or block that never closes) and
//! carry the 1-based source line of the offending marker. Render failures
//! come from the host evaluator; the driver attaches the source line of the
//! expression that was being evaluated before surfacing them.

use thiserror::Error;

/// Errors surfaced by [`Template::parse`](crate::Template::parse) and
/// [`Template::render`](crate::Template::render).
///
/// The first error aborts the operation; there is no partial-output
/// recovery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
	/// An opening delimiter has no matching `%>` before end of input.
	#[error("unterminated expression marker starting on line {line}")]
	UnterminatedMarker { line: usize },

	/// A block-closing marker appeared with no block open.
	#[error("block close on line {line} has no matching open block")]
	UnexpectedBlockClose { line: usize },

	/// A block was still open at end of input.
	#[error("block opened on line {line} is never closed")]
	UnclosedBlock { line: usize },

	/// The evaluator failed; the message is surfaced verbatim.
	#[error("evaluation failed on line {line}: {message}")]
	Eval { line: usize, message: String },

	/// A name could not be resolved in the binding scope.
	#[error("undefined binding `{name}` on line {line}")]
	MissingBinding { line: usize, name: String },

	/// An include named a template the evaluator does not know.
	#[error("unknown template `{name}` on line {line}")]
	UnknownTemplate { line: usize, name: String },
}

/// Failures returned by [`Evaluator`](crate::Evaluator) methods.
///
/// These carry no source position; the render driver knows which expression
/// it delegated and maps each variant onto the line-carrying [`Error`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
	/// Opaque evaluator failure, surfaced verbatim.
	#[error("{0}")]
	Message(String),

	/// A binding lookup failed.
	#[error("undefined binding `{name}`")]
	MissingBinding { name: String },

	/// A named sub-template does not exist.
	#[error("unknown template `{name}`")]
	UnknownTemplate { name: String },
}

/// Failure inside [`Evaluator::evaluate_block`](crate::Evaluator::evaluate_block).
///
/// A block evaluation can fail in the evaluator itself or inside one of the
/// clause bodies it asked the core to render; the latter already carries its
/// own source line and passes through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
	#[error(transparent)]
	Eval(#[from] EvalError),
	#[error(transparent)]
	Render(#[from] Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl EvalError {
	/// Convenience constructor for opaque failures.
	pub fn message(message: impl Into<String>) -> Self {
		EvalError::Message(message.into())
	}
}

impl Error {
	pub(crate) fn from_eval(err: EvalError, line: usize) -> Self {
		match err {
			EvalError::Message(message) => Error::Eval { line, message },
			EvalError::MissingBinding { name } => Error::MissingBinding { line, name },
			EvalError::UnknownTemplate { name } => Error::UnknownTemplate { line, name },
		}
	}

	pub(crate) fn from_block(err: BlockError, line: usize) -> Self {
		match err {
			BlockError::Eval(err) => Error::from_eval(err, line),
			BlockError::Render(err) => err,
		}
	}
}
