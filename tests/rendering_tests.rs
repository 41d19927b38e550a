//! End-to-end rendering tests: marker kinds, block control flow, and the
//! error surface.

mod common;

use common::MiniLang;
use weft::{Bindings, Error, Template, Value};

fn scope(pairs: &[(&str, Value)]) -> Bindings {
	let mut scope = Bindings::new();
	for (name, value) in pairs {
		scope.set(*name, value.clone());
	}
	scope
}

#[test]
fn test_output_marker() {
	let host = MiniLang::new();
	let out = host
		.render("Hello <%= name %>!", &scope(&[("name", "World".into())]))
		.unwrap();
	assert_eq!(out, "Hello World!");
}

#[test]
fn test_silent_marker_emits_nothing() {
	let host = MiniLang::new();
	let out = host
		.render("a<% flag %>b", &scope(&[("flag", true.into())]))
		.unwrap();
	assert_eq!(out, "ab");
}

#[test]
fn test_pipe_without_block_behaves_as_output() {
	let host = MiniLang::new();
	let out = host
		.render("<%| name %>", &scope(&[("name", "World".into())]))
		.unwrap();
	assert_eq!(out, "World");
}

#[test]
fn test_numbers_are_stringified() {
	let host = MiniLang::new();
	let out = host.render("n = <%= n %>", &scope(&[("n", 42.into())])).unwrap();
	assert_eq!(out, "n = 42");
}

#[test]
fn test_if_block_true() {
	let host = MiniLang::new();
	let out = host
		.render("<% if flag do %>yes<% end %>", &scope(&[("flag", true.into())]))
		.unwrap();
	assert_eq!(out, "yes");
}

#[test]
fn test_if_block_false_without_else() {
	let host = MiniLang::new();
	let out = host
		.render("<% if flag do %>yes<% end %>", &scope(&[("flag", false.into())]))
		.unwrap();
	assert_eq!(out, "");
}

#[test]
fn test_if_else_block() {
	let host = MiniLang::new();
	let source = "<% if flag do %>yes<% else %>no<% end %>";
	assert_eq!(
		host.render(source, &scope(&[("flag", true.into())])).unwrap(),
		"yes"
	);
	assert_eq!(
		host.render(source, &scope(&[("flag", false.into())])).unwrap(),
		"no"
	);
}

#[test]
fn test_for_block() {
	let host = MiniLang::new();
	let out = host
		.render("<% for i <- [1, 2, 3] do %><%= i %>,<% end %>", &Bindings::new())
		.unwrap();
	assert_eq!(out, "1,2,3,");
}

#[test]
fn test_for_over_bound_array() {
	let host = MiniLang::new();
	let items = Value::Array(vec!["a".into(), "b".into()]);
	let out = host
		.render(
			"<% for item <- items do %>[<%= item %>]<% end %>",
			&scope(&[("items", items)]),
		)
		.unwrap();
	assert_eq!(out, "[a][b]");
}

#[test]
fn test_literal_escape() {
	let host = MiniLang::new();
	let out = host.render("use <%%= name %> here", &Bindings::new()).unwrap();
	assert_eq!(out, "use <%= name %> here");
}

#[test]
fn test_missing_binding_carries_line() {
	let host = MiniLang::new();
	let err = host.render("line1\n<%= nope %>", &Bindings::new()).unwrap_err();
	assert_eq!(
		err,
		Error::MissingBinding {
			line: 2,
			name: "nope".to_string()
		}
	);
}

#[test]
fn test_evaluator_message_surfaces_verbatim() {
	let host = MiniLang::new();
	let err = host
		.render("<% case x do %>y<% end %>", &Bindings::new())
		.unwrap_err();
	match err {
		Error::Eval { line, message } => {
			assert_eq!(line, 1);
			assert!(message.contains("unsupported block"), "{message}");
		}
		other => panic!("expected Eval error, got {other:?}"),
	}
}

#[test]
fn test_unterminated_marker() {
	let host = MiniLang::new();
	let err = host.render("ok\nok\n<%= broken", &Bindings::new()).unwrap_err();
	assert_eq!(err, Error::UnterminatedMarker { line: 3 });
}

#[test]
fn test_unexpected_block_close() {
	let host = MiniLang::new();
	let err = host.render("text\n<% end %>", &Bindings::new()).unwrap_err();
	assert_eq!(err, Error::UnexpectedBlockClose { line: 2 });
}

#[test]
fn test_unclosed_block() {
	let host = MiniLang::new();
	let err = host
		.render("<% if flag do %>\nbody", &scope(&[("flag", true.into())]))
		.unwrap_err();
	assert_eq!(err, Error::UnclosedBlock { line: 1 });
}

#[test]
fn test_error_aborts_without_partial_output() {
	let host = MiniLang::new();
	// The text before the failing expression must not leak out.
	let result = host.render("prefix <%= nope %>", &Bindings::new());
	assert!(result.is_err());
}

#[test]
fn test_parsed_template_renders_concurrently() {
	let host = MiniLang::new();
	let template = Template::parse(
		"<% for i <- [1, 2] do %><%= i %><% end %>",
		&host,
	)
	.unwrap();

	std::thread::scope(|s| {
		let handles: Vec<_> = (0..4)
			.map(|_| {
				let template = &template;
				let host = &host;
				s.spawn(move || template.render(host, &Bindings::new()).unwrap())
			})
			.collect();
		for handle in handles {
			assert_eq!(handle.join().unwrap(), "12");
		}
	});
}

#[test]
fn test_template_is_reusable() {
	let host = MiniLang::new();
	let template = Template::parse("hi <%= name %>", &host).unwrap();
	assert_eq!(
		template
			.render(&host, &scope(&[("name", "a".into())]))
			.unwrap(),
		"hi a"
	);
	assert_eq!(
		template
			.render(&host, &scope(&[("name", "b".into())]))
			.unwrap(),
		"hi b"
	);
}
