use proptest::prelude::*;
use gqlmerge_sdl::{merge, parse, print_all};

/// Strategy for generating type names.
fn type_name() -> impl Strategy<Value = String> {
    "[A-Z][a-zA-Z0-9]{0,11}"
}

/// Strategy for generating field and argument names.
fn field_name() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9_]{0,11}".prop_filter("not a keyword", |s| {
        !matches!(
            s.as_str(),
            "type"
                | "scalar"
                | "interface"
                | "union"
                | "enum"
                | "input"
                | "directive"
                | "schema"
                | "extend"
                | "implements"
                | "repeatable"
                | "on"
                | "true"
                | "false"
                | "null"
                | "query"
                | "mutation"
                | "subscription"
                | "fragment"
        )
    })
}

/// Strategy for generating a type reference such as `[Int!]!`.
fn type_ref() -> impl Strategy<Value = String> {
    let named = prop_oneof![
        Just("Int".to_string()),
        Just("String".to_string()),
        Just("Boolean".to_string()),
        Just("ID".to_string()),
        type_name(),
    ];
    (named, any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(name, list, inner, outer)| {
        let inner = if inner { format!("{name}!") } else { name };
        let wrapped = if list { format!("[{inner}]") } else { inner };
        if outer {
            format!("{wrapped}!")
        } else {
            wrapped
        }
    })
}

/// Strategy for generating a description-free object type with distinct fields.
fn object_type() -> impl Strategy<Value = String> {
    (
        type_name(),
        prop::collection::vec((field_name(), type_ref()), 1..6),
    )
        .prop_map(|(name, fields)| {
            let body: Vec<String> = fields
                .iter()
                .enumerate()
                .map(|(i, (field, ty))| format!("{field}{i}: {ty}"))
                .collect();
            format!("type {name} {{ {} }}", body.join(" "))
        })
}

proptest! {
    /// A generated object type always parses to one definition.
    #[test]
    fn valid_object_type_always_parses(source in object_type()) {
        let result = parse(&source);
        prop_assert!(result.is_ok(), "Failed to parse: {source}");
        prop_assert_eq!(result.unwrap().len(), 1);
    }

    /// Lexer and parser never panic on arbitrary input.
    #[test]
    fn parser_never_panics(input in "\\PC{0,200}") {
        let _ = parse(&input);
    }

    /// Merging never panics on arbitrary pairs of inputs.
    #[test]
    fn merge_never_panics(a in "\\PC{0,120}", b in "\\PC{0,120}") {
        let _ = merge("\n", &[("a", a.as_str()), ("b", b.as_str())]);
    }

    /// Parse, print, parse yields the same definitions.
    #[test]
    fn round_trip_property(source in object_type(), description in "[a-zA-Z ]{0,30}") {
        let source = format!("\"{description}\"\n{source}");
        let first = parse(&source).unwrap();
        let printed = print_all(&first);
        let second = parse(&printed);
        prop_assert!(second.is_ok(), "Re-parse failed for:\n{printed}");
        prop_assert_eq!(first, second.unwrap());
    }

    /// Merging a document with itself yields the document.
    #[test]
    fn self_merge_is_identity(source in object_type()) {
        let once = merge("\n", &[("a", source.as_str())]).unwrap();
        let twice = merge("\n", &[("a", source.as_str()), ("b", source.as_str())]).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// Enum values from two documents are all present once each.
    #[test]
    fn enum_union_contains_every_value(
        left in prop::collection::btree_set("[A-Z][A-Z_]{0,6}", 1..5),
        right in prop::collection::btree_set("[A-Z][A-Z_]{0,6}", 1..5),
    ) {
        let a = format!("enum E {{ {} }}", left.iter().cloned().collect::<Vec<_>>().join(" "));
        let b = format!("enum E {{ {} }}", right.iter().cloned().collect::<Vec<_>>().join(" "));
        let merged = merge("\n", &[("a", a.as_str()), ("b", b.as_str())]).unwrap();
        let definitions = parse(&merged).unwrap();
        let gqlmerge_core::Definition::Enum(e) = &definitions[0] else {
            panic!("expected enum, got {merged}");
        };
        let values: Vec<&str> = e.values.iter().map(|v| v.name.as_str()).collect();
        let expected: std::collections::BTreeSet<&str> =
            left.iter().chain(right.iter()).map(String::as_str).collect();
        prop_assert_eq!(values.len(), expected.len());
        for value in values {
            prop_assert!(expected.contains(value));
        }
    }
}
