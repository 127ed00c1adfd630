// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::items_after_statements)] // Test helpers declared near use
#![allow(clippy::similar_names)] // src/dst pairs are clearer side by side

//! End-to-end mapping scenarios.
//!
//! Each test drives the public `Mapper` API with runtime descriptors the way
//! an application would: declare types once, build an engine, map values.

use remap::types::{
    self, DictionaryShape, EnumTypeBuilder, ObjectTypeBuilder, PrimitiveKind, SequenceShape,
};
use remap::{Error, Mapper, TypeRef, Value};

fn i32_ty() -> TypeRef {
    types::primitive(PrimitiveKind::I32)
}

fn user_dto() -> TypeRef {
    ObjectTypeBuilder::new("ScnUserDto")
        .field("Id", PrimitiveKind::I32)
        .string_field("Name")
        .build()
}

fn user() -> TypeRef {
    ObjectTypeBuilder::new("ScnUser")
        .field("Id", PrimitiveKind::I32)
        .string_field("Name")
        .build()
}

fn status() -> TypeRef {
    EnumTypeBuilder::new("ScnStatus")
        .variant("Inactive")
        .variant("Active")
        .build()
}

#[test]
fn test_same_named_members_are_copied() {
    let mapper = Mapper::new();
    let source = Value::object(&user_dto(), [("Id", Value::I32(1)), ("Name", "a".into())]);

    let mapped = mapper.map(&source, &user()).expect("map");

    assert_eq!(mapped.runtime_type().map(|t| t.name().to_string()), Some("ScnUser".into()));
    assert_eq!(mapped.get_field("Id"), Some(Value::I32(1)));
    assert_eq!(mapped.get_field("Name"), Some(Value::String("a".into())));
}

#[test]
fn test_list_into_read_only_collection_of_strings() {
    let mapper = Mapper::new();
    let source = Value::list(&i32_ty(), vec![1.into(), 2.into(), 3.into()]);
    let destination = types::sequence(SequenceShape::ReadOnlyCollection, &types::string());

    let mapped = mapper.map(&source, &destination).expect("map");

    let runtime = mapped.runtime_type().expect("typed");
    assert_eq!(runtime.name(), "List<String>");
    assert!(destination.is_assignable_from(&runtime));
    let items: Vec<_> = mapped
        .as_seq()
        .expect("sequence")
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect();
    assert_eq!(
        items,
        vec![Some("1".to_string()), Some("2".to_string()), Some("3".to_string())]
    );
}

#[test]
fn test_enum_from_name_ignores_case() {
    let mapper = Mapper::new();
    let status = status();
    let active = Value::enum_variant(&status, "Active").expect("variant");

    assert_eq!(mapper.map(&Value::from("Active"), &status).expect("exact"), active);
    assert_eq!(mapper.map(&Value::from("active"), &status).expect("lower"), active);
    assert!(matches!(
        mapper.map(&Value::from("Dormant"), &status),
        Err(Error::InvalidFormat { .. })
    ));
}

#[test]
fn test_out_of_range_integer_into_byte_enum() {
    let level = EnumTypeBuilder::new("ScnLevel")
        .underlying(PrimitiveKind::U8)
        .variant("Low")
        .variant("High")
        .build();
    let mapper = Mapper::new();

    let err = mapper.map(&Value::I32(300), &level).unwrap_err();
    assert!(matches!(err, Error::Overflow { .. }), "got {:?}", err);

    let high = mapper.map(&Value::I32(1), &level).expect("in range");
    assert_eq!(high.as_enum().and_then(|e| e.variant_name().map(str::to_string)), Some("High".into()));
}

#[test]
fn test_ignored_member_keeps_initial_value() {
    let dto = ObjectTypeBuilder::new("ScnAccountDto")
        .string_field("Login")
        .string_field("Password")
        .build();
    let view = ObjectTypeBuilder::new("ScnAccountView")
        .string_field("Login")
        .string_field("Password")
        .build();
    let mapper = Mapper::builder()
        .define_profile(&dto, &view, |p| p.ignore("Password"))
        .build()
        .expect("build");
    let source = Value::object(&dto, [("Login", "ada".into()), ("Password", "secret".into())]);

    let mapped = mapper.map(&source, &view).expect("map");

    assert_eq!(mapped.get_field("Login"), Some(Value::String("ada".into())));
    assert_eq!(mapped.get_field("Password"), Some(Value::Null));
}

#[test]
fn test_pair_components_convert_independently() {
    let mapper = Mapper::new();
    let source = Value::pair(Value::from("x"), Value::I32(1));
    let destination = types::pair(&types::string(), &types::string());

    let mapped = mapper.map(&source, &destination).expect("map");

    let pair = mapped.as_pair().expect("pair");
    assert_eq!(pair.ty, destination);
    assert_eq!(pair.key, Value::String("x".into()));
    assert_eq!(pair.value, Value::String("1".into()));
}

#[test]
fn test_abstract_destinations_normalize_to_concrete_types() {
    let mapper = Mapper::new();
    let numbers = Value::list(&i32_ty(), vec![4.into(), 5.into()]);

    for shape in [
        SequenceShape::Enumerable,
        SequenceShape::Collection,
        SequenceShape::ListInterface,
        SequenceShape::ReadOnlyList,
    ] {
        let destination = types::sequence(shape, &i32_ty());
        let mapped = mapper.map(&numbers, &destination).expect("map");
        assert_eq!(mapped.runtime_type().map(|t| t.name().to_string()), Some("List<Int32>".into()));
        assert_eq!(mapped.as_seq().map(<[Value]>::len), Some(2));
    }

    let scores = Value::dict(
        &types::string(),
        &i32_ty(),
        vec![("a".into(), 1.into()), ("b".into(), 2.into())],
    );
    for shape in [DictionaryShape::Interface, DictionaryShape::ReadOnly] {
        let destination = types::dictionary_shape(shape, &types::string(), &i32_ty());
        let mapped = mapper.map(&scores, &destination).expect("map");
        assert_eq!(
            mapped.runtime_type().map(|t| t.name().to_string()),
            Some("Dictionary<String, Int32>".into())
        );
        let dict = mapped.as_dict().expect("dictionary");
        assert_eq!(dict.get(&Value::from("b")), Some(&Value::I32(2)));
    }
}

#[test]
fn test_abstract_object_without_profile_has_no_route() {
    let shape = ObjectTypeBuilder::new("ScnShape").abstract_type().build();
    let square = ObjectTypeBuilder::new("ScnSquareDto")
        .field("Side", PrimitiveKind::I32)
        .build();
    let mapper = Mapper::new();

    let err = mapper
        .map(&Value::object(&square, [("Side", Value::I32(2))]), &shape)
        .unwrap_err();
    assert!(matches!(err, Error::NoRoute { .. }), "got {:?}", err);
}

#[test]
fn test_unrelated_types_are_a_mismatch() {
    let mapper = Mapper::new();
    let err = mapper.map(&Value::Bool(true), &user()).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }), "got {:?}", err);
}

#[test]
fn test_any_destination_returns_source() {
    let mapper = Mapper::new();
    let source = Value::object(&user_dto(), [("Id", Value::I32(9))]);
    let mapped = mapper.map(&source, &types::any()).expect("map");
    assert_eq!(mapped, source);
}

#[test]
fn test_nested_lists_of_objects() {
    let line = ObjectTypeBuilder::new("ScnLine")
        .string_field("Sku")
        .field("Qty", PrimitiveKind::I32)
        .build();
    let line_view = ObjectTypeBuilder::new("ScnLineView")
        .string_field("Sku")
        .field("Qty", PrimitiveKind::I64)
        .build();
    let order = ObjectTypeBuilder::new("ScnOrder")
        .member("Lines", types::list_of(&line))
        .build();
    let order_view = ObjectTypeBuilder::new("ScnOrderView")
        .member("Lines", types::array_of(&line_view))
        .build();

    let lines = Value::list(
        &line,
        vec![
            Value::object(&line, [("Sku", "A-1".into()), ("Qty", Value::I32(2))]),
            Value::object(&line, [("Sku", "B-2".into()), ("Qty", Value::I32(5))]),
        ],
    );
    let source = Value::object(&order, [("Lines", lines)]);

    let mapped = Mapper::new().map(&source, &order_view).expect("map");

    let lines = mapped.get_field("Lines").expect("member");
    let items = lines.as_seq().expect("array");
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].get_field("Sku"), Some(Value::String("B-2".into())));
    assert_eq!(items[1].get_field("Qty"), Some(Value::I64(5)));
}

#[test]
fn test_typed_mapping_of_vectors_and_pairs() {
    let mapper = Mapper::new();

    let texts: Vec<String> = mapper.map_into(&vec![7_u8, 8]).expect("map");
    assert_eq!(texts, vec!["7".to_string(), "8".to_string()]);

    let pair: (String, i64) = mapper.map_into(&(1_i32, 2_i32)).expect("map");
    assert_eq!(pair, ("1".to_string(), 2));

    let maybe: Option<i32> = mapper.map_to(&Value::Null).expect("map");
    assert_eq!(maybe, None);
}

fn tagged_types() -> (TypeRef, TypeRef) {
    let string = types::string();
    let codes = types::set_of(&string);
    let source = ObjectTypeBuilder::new("ScnTaggedDto")
        .member("Tags", types::list_of(&i32_ty()))
        .member("Codes", types::list_of(&i32_ty()))
        .build();
    let destination = ObjectTypeBuilder::new("ScnTagged")
        .collection_member("Tags", &string)
        .member_with(
            types::MemberDescriptor::new("Codes", codes.clone())
                .read_only()
                .with_initial(Value::empty_seq(&codes)),
        )
        .build();
    (source, destination)
}

fn items(value: &Value, member: &str) -> Vec<Value> {
    value
        .get_field(member)
        .and_then(|m| m.as_seq().map(<[Value]>::to_vec))
        .expect("collection member")
}

#[test]
fn test_read_only_collection_members_are_filled_by_adding() {
    let (src, dst) = tagged_types();
    let ints = |values: &[i32]| Value::list(&i32_ty(), values.iter().copied().map(Value::I32).collect());
    let source = Value::object(&src, [("Tags", ints(&[1, 2])), ("Codes", ints(&[7, 8, 7]))]);

    let mapped = Mapper::new().map(&source, &dst).expect("map");

    assert_eq!(items(&mapped, "Tags"), vec![Value::from("1"), Value::from("2")]);
    assert_eq!(items(&mapped, "Codes"), vec![Value::from("7"), Value::from("8")]);
}

#[test]
fn test_null_source_collection_skips_member_under_both_policies() {
    let (src, dst) = tagged_types();
    let source = Value::object(&src, [("Tags", Value::Null), ("Codes", Value::Null)]);

    for policy in [remap::NullPolicy::Strict, remap::NullPolicy::Permissive] {
        let mapper = Mapper::builder()
            .config(remap::MapperConfig::default().null_policy(policy))
            .build()
            .expect("build");
        let mapped = mapper.map(&source, &dst).expect("map");
        assert!(items(&mapped, "Tags").is_empty(), "{:?}", policy);
        assert!(items(&mapped, "Codes").is_empty(), "{:?}", policy);
    }
}
