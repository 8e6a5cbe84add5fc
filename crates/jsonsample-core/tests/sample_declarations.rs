use jsonsample_core::{
    DeclarationOrigin, Error, FieldSlot, Position, ScalarKind, TypeRef, extract_declarations,
    name_fields,
};

const SAMPLE: &str = include_str!("../../jsonsample-cli/assets/sample.go");

#[test]
fn reads_sample_declarations() {
    let mut set = extract_declarations(SAMPLE).expect("parse sample");
    assert_eq!(set.names().collect::<Vec<_>>(), ["Example", "CustomStruct"]);

    let example = set.get("Example").expect("Example");
    assert_eq!(example.position, Position::new(3, 6));
    assert_eq!(example.fields.len(), 8);
    assert_eq!(
        example.fields[4].type_ref,
        TypeRef::Scalar(ScalarKind::Int)
    );
    assert_eq!(
        example.fields[6].type_ref,
        TypeRef::Array(Box::new(TypeRef::Named("CustomStruct".to_string())))
    );

    let names = name_fields(&mut set).expect("name fields");
    assert_eq!(
        names.keys("Example").collect::<Vec<_>>(),
        [
            "name",
            "address",
            "phone",
            "email",
            "field_1",
            "string_field",
            "custom",
            "embedded"
        ]
    );
    assert_eq!(
        names.keys("CustomStruct").collect::<Vec<_>>(),
        ["truthy", "list_string"]
    );

    let inline = set.get("Example.CustomEmbedded").expect("inline record");
    assert_eq!(
        inline.origin,
        DeclarationOrigin::Inline {
            parent: "Example".to_string()
        }
    );
    assert_eq!(names.keys("Example.CustomEmbedded").collect::<Vec<_>>(), ["first"]);
    assert_eq!(
        set.top_level().map(|decl| decl.name.as_str()).collect::<Vec<_>>(),
        ["Example", "CustomStruct"]
    );
}

#[test]
fn grouped_and_non_record_declarations_are_skipped() {
    let source = r#"
package models

import (
	"time"
)

const limit = 10

type (
	A struct { X int }
	B struct { Y int }
)

type Alias = string

type ID int

func (p *Page) Len() int { return len(p.Items) }

type Page struct {
	Items []string
	When  time.Time
	total int
}
"#;
    let mut set = extract_declarations(source).expect("parse");
    assert_eq!(set.names().collect::<Vec<_>>(), ["Page"]);

    let names = name_fields(&mut set).expect("names");
    assert_eq!(
        names.slots("Page").expect("slots"),
        [
            FieldSlot::Key("items".to_string()),
            FieldSlot::Key("when".to_string()),
            FieldSlot::Excluded
        ]
    );
}

#[test]
fn errors_report_where_they_happened() {
    let err = extract_declarations("type A struct {\n\tName string `json:\"name\n}")
        .expect_err("unterminated tag");
    assert!(matches!(err, Error::Syntax { .. }));
    assert_eq!(err.position().line, 2);

    let mut set = extract_declarations("type A struct {\n\tName string `json:\"name`\n}")
        .expect("parse");
    let err = name_fields(&mut set).expect_err("bad tag");
    assert!(matches!(err, Error::MalformedTag { .. }));
    assert_eq!(err.to_string(), format!("invalid json tag at 2:14: {}", message(&err)));
}

#[test]
fn positions_serialize_as_line_and_column() {
    let json = serde_json::to_string(&Position::new(4, 7)).expect("serialize");
    assert_eq!(json, r#"{"line":4,"column":7}"#);
}

fn message(err: &Error) -> &str {
    match err {
        Error::Syntax { message, .. }
        | Error::MalformedField { message, .. }
        | Error::MalformedTag { message, .. } => message,
    }
}
