// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::similar_names)] // src/dst pairs are clearer side by side

//! Mapping laws and configuration-dependent behavior.
//!
//! Covers:
//! - round trips between structurally compatible types
//! - independence of repeated mappings
//! - enum/integral range checks over random inputs
//! - strict vs permissive null handling
//! - deep vs shallow aliasing

use remap::types::{self, EnumTypeBuilder, MemberDescriptor, ObjectTypeBuilder, PrimitiveKind};
use remap::{DepthMode, Error, Mapper, MapperConfig, NullPolicy, TypeRef, Value};

fn person_dto() -> TypeRef {
    ObjectTypeBuilder::new("SemPersonDto")
        .field("Id", PrimitiveKind::I32)
        .string_field("Name")
        .field("Born", PrimitiveKind::DateTime)
        .build()
}

fn person() -> TypeRef {
    ObjectTypeBuilder::new("SemPerson")
        .field("Id", PrimitiveKind::I32)
        .string_field("Name")
        .field("Born", PrimitiveKind::DateTime)
        .build()
}

fn random_name(rng: &mut fastrand::Rng) -> String {
    (0..rng.usize(1..12)).map(|_| rng.alphanumeric()).collect()
}

fn mapper_with(config: MapperConfig) -> Mapper {
    Mapper::builder().config(config).build().expect("build")
}

#[test]
fn test_round_trip_restores_every_member() {
    let mut rng = fastrand::Rng::with_seed(0x5eed);
    let mapper = Mapper::new();
    let (dto, entity) = (person_dto(), person());

    for _ in 0..64 {
        let born = chrono::DateTime::from_timestamp(rng.i64(0..4_000_000_000), 0)
            .expect("timestamp")
            .naive_utc();
        let source = Value::object(
            &dto,
            [
                ("Id", Value::I32(rng.i32(..))),
                ("Name", Value::String(random_name(&mut rng))),
                ("Born", Value::DateTime(born)),
            ],
        );

        let there = mapper.map(&source, &entity).expect("forward");
        let back = mapper.map(&there, &dto).expect("backward");

        assert_eq!(back, source);
    }
}

#[test]
fn test_repeated_mappings_are_independent_objects() {
    let mapper = Mapper::new();
    let source = Value::object(&person_dto(), [("Id", Value::I32(3)), ("Name", "x".into())]);

    let first = mapper.map(&source, &person()).expect("first");
    let second = mapper.map(&source, &person()).expect("second");

    assert_eq!(first, second);
    let (a, b) = (first.as_object().expect("object"), second.as_object().expect("object"));
    assert!(!a.ptr_eq(b));

    a.set("Name", "changed".into());
    assert_eq!(second.get_field("Name"), Some(Value::String("x".into())));
}

#[test]
fn test_byte_enum_accepts_exactly_the_byte_range() {
    let flags = EnumTypeBuilder::new("SemFlags")
        .underlying(PrimitiveKind::U8)
        .variant("None")
        .variant_value("All", 255)
        .build();
    let i32_ty = types::primitive(PrimitiveKind::I32);
    let mapper = Mapper::new();
    let mut rng = fastrand::Rng::with_seed(42);

    let mut samples: Vec<i32> = (0..200).map(|_| rng.i32(-1000..1000)).collect();
    samples.extend([i32::MIN, -1, 0, 255, 256, i32::MAX]);

    for n in samples {
        let result = mapper.map(&Value::I32(n), &flags);
        if (0..=255).contains(&n) {
            let value = result.expect("in range");
            assert_eq!(mapper.map(&value, &i32_ty).expect("back"), Value::I32(n));
        } else {
            assert!(matches!(result, Err(Error::Overflow { .. })), "{} accepted", n);
        }
    }
}

#[test]
fn test_enum_to_enum_goes_by_name() {
    let source = EnumTypeBuilder::new("SemColor")
        .variant("Red")
        .variant("Green")
        .build();
    let target = EnumTypeBuilder::new("SemPaint")
        .variant_value("Green", 10)
        .variant_value("Red", 20)
        .build();
    let mapper = Mapper::new();

    let green = Value::enum_variant(&source, "Green").expect("variant");
    let mapped = mapper.map(&green, &target).expect("map");

    assert_eq!(mapped.as_enum().map(|e| e.raw), Some(10));
}

fn contact_types() -> (TypeRef, TypeRef, TypeRef, TypeRef) {
    let address = ObjectTypeBuilder::new("SemAddress").string_field("City").build();
    let contact = ObjectTypeBuilder::new("SemContact")
        .string_field("Note")
        .member("Address", address.clone())
        .build();
    let address_view = ObjectTypeBuilder::new("SemAddressView")
        .string_field("City")
        .build();
    let contact_view = ObjectTypeBuilder::new("SemContactView")
        .member_with(
            MemberDescriptor::new("Note", types::string()).with_initial(Value::from("n/a")),
        )
        .member("Address", address_view.clone())
        .member_with(
            MemberDescriptor::new("City", types::string()).with_initial(Value::from("unknown")),
        )
        .build();
    (address, contact, address_view, contact_view)
}

fn contact_mapper(policy: NullPolicy) -> Mapper {
    let (_, contact, _, contact_view) = contact_types();
    Mapper::builder()
        .config(MapperConfig::default().null_policy(policy))
        .define_profile(&contact, &contact_view, |p| p.from_path("City", "Address.City"))
        .build()
        .expect("build")
}

#[test]
fn test_strict_nulls_leave_initial_values() {
    let (_, contact, _, contact_view) = contact_types();
    let mapper = contact_mapper(NullPolicy::Strict);
    let source = Value::object(&contact, [("Note", Value::Null), ("Address", Value::Null)]);

    let mapped = mapper.map(&source, &contact_view).expect("map");

    assert_eq!(mapped.get_field("Note"), Some(Value::String("n/a".into())));
    assert_eq!(mapped.get_field("City"), Some(Value::String("unknown".into())));
    assert_eq!(mapped.get_field("Address"), Some(Value::Null));
}

#[test]
fn test_permissive_nulls_assign_defaults() {
    let (_, contact, _, contact_view) = contact_types();
    let mapper = contact_mapper(NullPolicy::Permissive);
    let source = Value::object(&contact, [("Note", Value::Null), ("Address", Value::Null)]);

    let mapped = mapper.map(&source, &contact_view).expect("map");

    assert_eq!(mapped.get_field("Note"), Some(Value::Null));
    assert_eq!(mapped.get_field("City"), Some(Value::Null));
}

#[test]
fn test_null_paths_never_fail_under_either_policy() {
    let (address, contact, _, contact_view) = contact_types();
    let with_city = Value::object(
        &contact,
        [
            ("Note", "hi".into()),
            ("Address", Value::object(&address, [("City", "Oslo".into())])),
        ],
    );
    let without_city = Value::object(
        &contact,
        [("Address", Value::object(&address, [("City", Value::Null)]))],
    );

    for policy in [NullPolicy::Strict, NullPolicy::Permissive] {
        let mapper = contact_mapper(policy);
        let mapped = mapper.map(&with_city, &contact_view).expect("map");
        assert_eq!(mapped.get_field("City"), Some(Value::String("Oslo".into())));
        assert_eq!(
            mapped.get_field("Address").and_then(|a| a.get_field("City")),
            Some(Value::String("Oslo".into()))
        );
        assert!(mapper.map(&without_city, &contact_view).is_ok());
    }
}

#[test]
fn test_deep_mode_copies_nested_objects() {
    let (address, contact, _, _) = contact_types();
    let home = Value::object(&address, [("City", "Rome".into())]);
    let source = Value::object(&contact, [("Address", home.clone())]);

    let mapped = mapper_with(MapperConfig::default().depth(DepthMode::Deep))
        .map(&source, &contact)
        .expect("map");

    assert_eq!(mapped, source);
    assert!(!mapped.as_object().expect("object").ptr_eq(source.as_object().expect("object")));
    let nested = mapped.get_field("Address").expect("member");
    assert!(!nested.as_object().expect("object").ptr_eq(home.as_object().expect("object")));
}

#[test]
fn test_shallow_mode_aliases_assignable_values() {
    let (address, contact, _, _) = contact_types();
    let source = Value::object(&contact, [("Address", Value::object(&address, [("City", "Rome".into())]))]);

    let mapped = mapper_with(MapperConfig::default().depth(DepthMode::Shallow))
        .map(&source, &contact)
        .expect("map");

    assert!(mapped.as_object().expect("object").ptr_eq(source.as_object().expect("object")));
}

#[test]
fn test_shallow_mode_still_converts_incompatible_members() {
    let (address, contact, _, contact_view) = contact_types();
    let home = Value::object(&address, [("City", "Rome".into())]);
    let source = Value::object(&contact, [("Address", home)]);

    let mapped = mapper_with(MapperConfig::default().depth(DepthMode::Shallow))
        .map(&source, &contact_view)
        .expect("map");

    let nested = mapped.get_field("Address").expect("member");
    assert_eq!(nested.runtime_type().map(|t| t.name().to_string()), Some("SemAddressView".into()));
}

#[test]
fn test_cloneable_types_are_deep_cloned() {
    let tag = ObjectTypeBuilder::new("SemTag")
        .string_field("Label")
        .cloneable()
        .build();
    let source = Value::object(&tag, [("Label", "blue".into())]);
    let mapper = Mapper::new();

    let mapped = mapper.map(&source, &tag).expect("map");

    assert_eq!(mapped, source);
    assert!(!mapped.as_object().expect("object").ptr_eq(source.as_object().expect("object")));
}

#[test]
fn test_concurrent_first_use_shares_one_plan() {
    let src = ObjectTypeBuilder::new("SemReading")
        .field("Sensor", PrimitiveKind::I32)
        .field("Celsius", PrimitiveKind::F32)
        .build();
    let dst = ObjectTypeBuilder::new("SemReadingView")
        .field("Sensor", PrimitiveKind::I64)
        .string_field("Celsius")
        .build();
    let mapper = Mapper::new();
    let start = std::sync::Barrier::new(8);

    std::thread::scope(|scope| {
        for sensor in 0..8 {
            let (src, dst, mapper, start) = (&src, &dst, &mapper, &start);
            scope.spawn(move || {
                let reading = Value::object(
                    src,
                    [("Sensor", Value::I32(sensor)), ("Celsius", Value::F32(21.5))],
                );
                start.wait();
                let mapped = mapper.map(&reading, dst).expect("map");
                assert_eq!(mapped.get_field("Sensor"), Some(Value::I64(i64::from(sensor))));
                assert_eq!(mapped.get_field("Celsius"), Some(Value::from("21.5")));
            });
        }
    });

    let stats = mapper.cache_stats();
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.hits + stats.misses, 8);
}

#[test]
fn test_descriptors_rebuilt_under_one_name_share_a_plan() {
    let mapper = Mapper::new();
    for id in 0..3 {
        let (dto, entity) = (person_dto(), person());
        let source = Value::object(&dto, [("Id", Value::I32(id)), ("Name", "n".into())]);
        let mapped = mapper.map(&source, &entity).expect("map");
        assert_eq!(mapped.get_field("Id"), Some(Value::I32(id)));
    }

    let stats = mapper.cache_stats();
    assert_eq!((stats.hits, stats.misses, stats.entries), (2, 1, 1));
}
