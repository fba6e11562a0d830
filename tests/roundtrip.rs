use rstest::rstest;

use arena_json::{parse, to_string, Arena, Value};

#[rstest]
fn test_constructed_tree_round_trips() {
    let mut arena = Arena::new();

    let root = arena.new_object();
    let name = arena.new_string("Ada");
    arena.object_insert(root, "name", name);
    arena.object_insert(root, "age", Value::Int(37));

    let mut scores = Value::new_array();
    arena.array_push(&mut scores, Value::Float(99.5));
    arena.array_push(&mut scores, Value::Int(100));
    arena.array_push(&mut scores, Value::Bool(false));
    arena.array_push(&mut scores, Value::Null);
    arena.object_insert(root, "city", scores);

    let text = to_string(&arena, root).unwrap();

    let mut reparsed_arena = Arena::new();
    let reparsed = parse(&mut reparsed_arena, text.as_bytes()).unwrap();
    assert!(arena.deep_eq(root, &reparsed_arena, reparsed));
}

#[rstest]
fn test_serialization_is_idempotent() {
    let mut arena = Arena::new();

    let root = arena.new_object();
    let name = arena.new_string("Grace");
    arena.object_insert(root, "name", name);
    arena.object_insert(root, "age", Value::Int(60));
    let city = arena.new_string("New York");
    arena.object_insert(root, "city", city);

    let first = to_string(&arena, root).unwrap();

    let mut second_arena = Arena::new();
    let reparsed = parse(&mut second_arena, first.as_bytes()).unwrap();
    let second = to_string(&second_arena, reparsed).unwrap();

    assert_eq!(first, second);
}

#[rstest]
#[case(b"123")]
#[case(b"-4")]
#[case(b"2.5")]
#[case(b"true")]
#[case(b"false")]
#[case(b"null")]
#[case(br#""plain""#)]
#[case(b"[1,2,3]")]
#[case(br#"{"k":[{"nested":null}]}"#)]
fn test_parse_serialize_parse(#[case] input: &[u8]) {
    let mut arena = Arena::new();
    let value = parse(&mut arena, input).unwrap();
    let text = to_string(&arena, value).unwrap();

    let mut check = Arena::new();
    let reparsed = parse(&mut check, text.as_bytes()).unwrap();
    assert!(arena.deep_eq(value, &check, reparsed));
    assert_eq!(text, to_string(&check, reparsed).unwrap());
}

#[rstest]
fn test_escape_round_trip() {
    let mut arena = Arena::new();

    let value = parse(&mut arena, br#""Hello\nWorld""#).unwrap();
    let Value::String(s) = value else {
        panic!("expected a string value");
    };
    assert_eq!(arena.get_str(s), Some("Hello\nWorld"));

    assert_eq!(to_string(&arena, value).unwrap(), r#""Hello\nWorld""#);
}

#[rstest]
fn test_float_round_trip_precision() {
    let mut arena = Arena::new();

    for input in ["2.5", "123.456", "1e20", "0.0001", "-0.5"] {
        let value = parse(&mut arena, input.as_bytes()).unwrap();
        let text = to_string(&arena, value).unwrap();
        let reparsed = parse(&mut arena, text.as_bytes()).unwrap();
        assert_eq!(value, reparsed, "float {input} drifted through a round trip");
    }
}

#[rstest]
fn test_object_key_order_is_bucket_order_not_insertion_order() {
    let mut first = Arena::new();
    let a = parse(&mut first, br#"{"name":1,"age":2,"city":3}"#).unwrap();

    let mut second = Arena::new();
    let b = parse(&mut second, br#"{"city":3,"age":2,"name":1}"#).unwrap();

    // Same set of pairs, same rendered text, whatever order they arrived in.
    assert!(first.deep_eq(a, &second, b));
    assert_eq!(
        to_string(&first, a).unwrap(),
        to_string(&second, b).unwrap()
    );
}
