//! A miniature host language for exercising the engine end to end.
//!
//! The grammar is the smallest thing that covers the collaborator surface:
//! bare identifiers resolve against the scope, `"..."` and integer literals
//! evaluate to themselves, `if <cond> do` / `else` / `end` and
//! `for <var> <- [items] do` / `end` drive block control flow, and include
//! arguments take the `:name, key: value` form.

#![allow(dead_code)]

use std::collections::HashMap;

use weft::{
	Bindings, BlockBody, BlockError, EvalError, Evaluator, Syntax, Template, Value,
};

#[derive(Default)]
pub struct MiniLang {
	templates: HashMap<String, String>,
}

impl MiniLang {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a named sub-template for `include(...)` to find.
	pub fn add_template(&mut self, name: &str, source: &str) {
		self.templates.insert(name.to_string(), source.to_string());
	}

	pub fn render(&self, source: &str, scope: &Bindings) -> weft::Result<String> {
		weft::render_str(source, self, scope)
	}

	fn value(&self, token: &str, scope: &Bindings) -> Result<Value, EvalError> {
		let token = token.trim();
		if let Some(inner) = token.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
			return Ok(Value::String(inner.to_string()));
		}
		if let Ok(number) = token.parse::<i64>() {
			return Ok(Value::from(number));
		}
		match token {
			"true" => Ok(Value::Bool(true)),
			"false" => Ok(Value::Bool(false)),
			name => scope
				.lookup(name)
				.cloned()
				.ok_or_else(|| EvalError::MissingBinding {
					name: name.to_string(),
				}),
		}
	}

	fn stringify(value: &Value) -> String {
		match value {
			Value::String(s) => s.clone(),
			other => other.to_string(),
		}
	}

	fn truthy(value: &Value) -> bool {
		!matches!(value, Value::Bool(false) | Value::Null)
	}
}

impl Syntax for MiniLang {
	fn is_block_opening(&self, code: &str) -> bool {
		code.trim_end().ends_with(" do")
	}

	fn is_block_continuation(&self, code: &str) -> bool {
		code.trim() == "else"
	}

	fn is_block_closing(&self, code: &str) -> bool {
		code.trim() == "end"
	}
}

impl Evaluator for MiniLang {
	fn evaluate(&self, code: &str, scope: &Bindings) -> Result<String, EvalError> {
		Ok(Self::stringify(&self.value(code, scope)?))
	}

	fn evaluate_block(
		&self,
		code: &str,
		scope: &Bindings,
		body: &BlockBody<'_>,
	) -> Result<String, BlockError> {
		let head = code.trim();
		let head = head.strip_suffix("do").unwrap_or(head).trim();

		if let Some(cond) = head.strip_prefix("if ") {
			let value = self.value(cond, scope)?;
			if Self::truthy(&value) {
				return Ok(body.render(0, scope)?);
			}
			if body.clause_count() > 1 && body.control(1) == Some("else") {
				return Ok(body.render(1, scope)?);
			}
			return Ok(String::new());
		}

		if let Some(rest) = head.strip_prefix("for ") {
			let (var, list) = rest
				.split_once("<-")
				.ok_or_else(|| EvalError::message(format!("malformed for: `{rest}`")))?;
			let (var, list) = (var.trim(), list.trim());
			let items = self.list(list, scope)?;
			let mut out = String::new();
			for item in items {
				let mut scope = scope.clone();
				scope.set(var, item);
				out.push_str(&body.render(0, &scope)?);
			}
			return Ok(out);
		}

		Err(EvalError::message(format!("unsupported block: `{code}`")).into())
	}

	fn evaluate_include_args(
		&self,
		args: &str,
		scope: &Bindings,
	) -> Result<(String, Bindings), EvalError> {
		let mut parts = args.splitn(2, ',');
		let name = parts.next().unwrap_or("").trim();
		let name = name.strip_prefix(':').unwrap_or(name).to_string();
		let mut overrides = Bindings::new();
		if let Some(rest) = parts.next() {
			for pair in rest.split(',') {
				let (key, value) = pair.split_once(':').ok_or_else(|| {
					EvalError::message(format!("malformed include argument: `{pair}`"))
				})?;
				overrides.set(key.trim(), self.value(value, scope)?);
			}
		}
		Ok((name, overrides))
	}

	fn render_named_template(
		&self,
		name: &str,
		scope: &Bindings,
	) -> Result<String, EvalError> {
		let source = self
			.templates
			.get(name)
			.ok_or_else(|| EvalError::UnknownTemplate {
				name: name.to_string(),
			})?;
		let template =
			Template::parse(source, self).map_err(|err| EvalError::message(err.to_string()))?;
		template
			.render(self, scope)
			.map_err(|err| EvalError::message(err.to_string()))
	}
}

impl MiniLang {
	/// `[a, b, c]` literals or a scope binding holding an array.
	fn list(&self, list: &str, scope: &Bindings) -> Result<Vec<Value>, EvalError> {
		if let Some(inner) = list.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
			return inner
				.split(',')
				.filter(|item| !item.trim().is_empty())
				.map(|item| self.value(item, scope))
				.collect();
		}
		match self.value(list, scope)? {
			Value::Array(items) => Ok(items),
			other => Err(EvalError::message(format!("not iterable: {other}"))),
		}
	}
}
