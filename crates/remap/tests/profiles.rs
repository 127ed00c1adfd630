// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::similar_names)] // src/dst pairs are clearer side by side
#![allow(clippy::items_after_statements)] // Resolver types declared in the test using them

//! Profile declarations: member overrides, inheritance, generic families,
//! instance templates and declaration-time validation.

use remap::types::{self, ObjectTypeBuilder, PrimitiveKind};
use remap::{
    Error, GenericConstraint, InstanceTemplate, Mapper, Result, SlotConstraint, TemplateArg,
    TypeRef, Value, ValueResolver,
};
use std::sync::Arc;

fn invoice_dto() -> TypeRef {
    ObjectTypeBuilder::new("PrfInvoiceDto")
        .string_field("Number")
        .field("Amount", PrimitiveKind::I32)
        .member("Customer", customer())
        .build()
}

fn customer() -> TypeRef {
    ObjectTypeBuilder::new("PrfCustomer")
        .string_field("Name")
        .field("Vip", PrimitiveKind::Bool)
        .build()
}

fn invoice_view() -> TypeRef {
    ObjectTypeBuilder::new("PrfInvoiceView")
        .string_field("Number")
        .string_field("Currency")
        .string_field("CustomerName")
        .string_field("Label")
        .string_field("Total")
        .string_field("Tier")
        .build()
}

fn sample_invoice() -> Value {
    let customer = Value::object(&customer(), [("Name", "Ada".into()), ("Vip", Value::Bool(true))]);
    Value::object(
        &invoice_dto(),
        [("Number", "INV-7".into()), ("Amount", Value::I32(120)), ("Customer", customer)],
    )
}

struct TierResolver;

impl ValueResolver for TierResolver {
    fn resolve(&self, source: &Value) -> Result<Value> {
        let vip = source
            .get_field("Customer")
            .and_then(|c| c.get_field("Vip"))
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        Ok(Value::from(if vip { "gold" } else { "standard" }))
    }
}

#[test]
fn test_member_overrides() {
    let (dto, view) = (invoice_dto(), invoice_view());
    let mapper = Mapper::builder()
        .define_profile(&dto, &view, |p| {
            p.constant("Currency", "EUR")
                .from_path("CustomerName", "Customer.Name")
                .from_fn("Label", |source| {
                    let number = source.get_field("Number").unwrap_or_default();
                    Ok(Value::String(format!("#{}", number.as_str().unwrap_or("?"))))
                })
                .convert_using("Total", "Amount", |amount| {
                    let cents = amount.as_integral().unwrap_or_default();
                    Ok(Value::String(format!("{}.00", cents)))
                })
                .from_resolver("Tier", Arc::new(TierResolver))
        })
        .build()
        .expect("build");

    let mapped = mapper.map(&sample_invoice(), &view).expect("map");

    let field = |name: &str| mapped.get_field(name).and_then(|v| v.as_str().map(str::to_string));
    assert_eq!(field("Number").as_deref(), Some("INV-7"));
    assert_eq!(field("Currency").as_deref(), Some("EUR"));
    assert_eq!(field("CustomerName").as_deref(), Some("Ada"));
    assert_eq!(field("Label").as_deref(), Some("#INV-7"));
    assert_eq!(field("Total").as_deref(), Some("120.00"));
    assert_eq!(field("Tier").as_deref(), Some("gold"));
}

#[test]
fn test_callback_results_are_converted_to_member_type() {
    let dto = ObjectTypeBuilder::new("PrfScoreDto").field("Raw", PrimitiveKind::I32).build();
    let view = ObjectTypeBuilder::new("PrfScoreView").field("Score", PrimitiveKind::I64).build();
    let mapper = Mapper::builder()
        .define_profile(&dto, &view, |p| p.from_fn("Score", |_| Ok(Value::from("17"))))
        .build()
        .expect("build");

    let mapped = mapper
        .map(&Value::object(&dto, [("Raw", Value::I32(1))]), &view)
        .expect("map");

    assert_eq!(mapped.get_field("Score"), Some(Value::I64(17)));
}

#[test]
fn test_callback_failure_aborts_mapping() {
    let (dto, view) = (invoice_dto(), invoice_view());
    let mapper = Mapper::builder()
        .define_profile(&dto, &view, |p| {
            p.from_fn("Label", |_| Err(Error::Resolver("label service down".into())))
        })
        .build()
        .expect("build");

    let err = mapper.map(&sample_invoice(), &view).unwrap_err();
    assert_eq!(err, Error::Resolver("label service down".into()));
}

#[test]
fn test_invalid_declarations_fail_build() {
    let (dto, view) = (invoice_dto(), invoice_view());

    let unknown = Mapper::builder()
        .define_profile(&dto, &view, |p| p.ignore("Nope"))
        .build();
    assert!(matches!(unknown, Err(Error::Argument(_))));

    let bad_path = Mapper::builder()
        .define_profile(&dto, &view, |p| p.from_path("CustomerName", "Customer.Email"))
        .build();
    assert!(matches!(bad_path, Err(Error::Argument(_))));

    let twice = Mapper::builder()
        .define_profile(&dto, &view, |p| p)
        .define_profile(&dto, &view, |p| p.ignore("Label"))
        .build();
    assert!(matches!(twice, Err(Error::Argument(_))));
}

fn animals() -> (TypeRef, TypeRef, TypeRef) {
    let animal = ObjectTypeBuilder::new("PrfAnimal").string_field("Name").build();
    let dog = ObjectTypeBuilder::new("PrfDog")
        .base(&animal)
        .string_field("Breed")
        .build();
    let dto = ObjectTypeBuilder::new("PrfAnimalDto")
        .string_field("Name")
        .string_field("Breed")
        .build();
    (animal, dog, dto)
}

#[test]
fn test_included_subtype_reuses_member_rules() {
    let (animal, dog, dto) = animals();
    let mapper = Mapper::builder()
        .define_profile(&dto, &animal, |p| p.constant("Name", "pet").include(&dog))
        .build()
        .expect("build");
    let source = Value::object(&dto, [("Name", "Rex".into()), ("Breed", "Corgi".into())]);

    let as_dog = mapper.map(&source, &dog).expect("dog");
    assert_eq!(as_dog.get_field("Name"), Some(Value::String("pet".into())));
    assert_eq!(as_dog.get_field("Breed"), Some(Value::String("Corgi".into())));

    let as_animal = mapper.map(&source, &animal).expect("animal");
    assert_eq!(as_animal.get_field("Name"), Some(Value::String("pet".into())));
}

#[test]
fn test_include_requires_a_subtype() {
    let (animal, _, dto) = animals();
    let unrelated = ObjectTypeBuilder::new("PrfRock").string_field("Name").build();
    let result = Mapper::builder()
        .define_profile(&dto, &animal, |p| p.include(&unrelated))
        .build();
    assert!(matches!(result, Err(Error::Argument(_))));
}

#[test]
fn test_profile_applies_to_derived_sources() {
    let base = ObjectTypeBuilder::new("PrfEventDto").string_field("Kind").build();
    let derived = ObjectTypeBuilder::new("PrfClickDto")
        .base(&base)
        .field("X", PrimitiveKind::I32)
        .build();
    let view = ObjectTypeBuilder::new("PrfEventView")
        .string_field("Kind")
        .field("X", PrimitiveKind::I32)
        .build();
    let mapper = Mapper::builder()
        .define_profile(&base, &view, |p| p.constant("Kind", "event"))
        .build()
        .expect("build");

    let click = Value::object(&derived, [("Kind", "click".into()), ("X", Value::I32(4))]);
    let mapped = mapper.map(&click, &view).expect("map");

    assert_eq!(mapped.get_field("Kind"), Some(Value::String("event".into())));
    assert_eq!(mapped.get_field("X"), Some(Value::I32(4)));
}

#[test]
fn test_template_builds_concrete_subtype_of_abstract_destination() {
    let shape = ObjectTypeBuilder::new("PrfShape").abstract_type().build();
    let square = ObjectTypeBuilder::new("PrfSquare")
        .base(&shape)
        .field("Side", PrimitiveKind::I64)
        .build();
    let dto = ObjectTypeBuilder::new("PrfSquareDto")
        .field("Side", PrimitiveKind::I32)
        .build();

    let missing_template = Mapper::builder().define_profile(&dto, &shape, |p| p).build();
    assert!(matches!(missing_template, Err(Error::Argument(_))));

    let template = InstanceTemplate::new(&square).init("Side", TemplateArg::path("Side"));
    let mapper = Mapper::builder()
        .define_profile(&dto, &shape, |p| p.new_instance(template))
        .build()
        .expect("build");

    let mapped = mapper
        .map(&Value::object(&dto, [("Side", Value::I32(3))]), &shape)
        .expect("map");
    assert_eq!(mapped.runtime_type(), Some(square));
    assert_eq!(mapped.get_field("Side"), Some(Value::I64(3)));
}

fn generic(name: &str, members: &[(&str, Option<PrimitiveKind>)]) -> TypeRef {
    let t = types::param("T", 0);
    let mut builder = ObjectTypeBuilder::new(name).generic_params(vec![t.clone()]);
    for (member, kind) in members {
        builder = match kind {
            Some(kind) => builder.field(*member, *kind),
            None => builder.member(*member, t.clone()),
        };
    }
    builder.build()
}

fn closed(definition: &TypeRef, arg: &TypeRef) -> TypeRef {
    types::close(definition, std::slice::from_ref(arg)).expect("close")
}

#[test]
fn test_generic_family_with_constraint() {
    let source = generic("PrfBox", &[("Value", None), ("Label", Some(PrimitiveKind::String))]);
    let target = generic(
        "PrfBoxView",
        &[("Value", None), ("Label", Some(PrimitiveKind::String))],
    );
    let mapper = Mapper::builder()
        .define_generic_profile(&source, &target, |p| {
            p.constant("Label", "family")
                .include_constraints(GenericConstraint::new(vec![SlotConstraint::ValueType]))
        })
        .build()
        .expect("build");
    let i32_ty = types::primitive(PrimitiveKind::I32);

    let ints = Value::object(&closed(&source, &i32_ty), [("Value", Value::I32(5)), ("Label", "src".into())]);
    let mapped = mapper.map(&ints, &closed(&target, &i32_ty)).expect("ints");
    assert_eq!(mapped.get_field("Value"), Some(Value::I32(5)));
    assert_eq!(mapped.get_field("Label"), Some(Value::String("family".into())));

    let texts = Value::object(
        &closed(&source, &types::string()),
        [("Value", "v".into()), ("Label", "src".into())],
    );
    let mapped = mapper
        .map(&texts, &closed(&target, &types::string()))
        .expect("texts");
    assert_eq!(mapped.get_field("Label"), Some(Value::String("src".into())));
}

fn pages() -> (TypeRef, TypeRef) {
    let t = types::param("T", 0);
    let dto = ObjectTypeBuilder::new("PrfPageDto")
        .generic_params(vec![t.clone()])
        .member("Items", types::list_of(&t))
        .field("Count", PrimitiveKind::I32)
        .build();
    let page = ObjectTypeBuilder::new("PrfPage")
        .generic_params(vec![t.clone()])
        .member("Items", types::list_of(&t))
        .field("Total", PrimitiveKind::I32)
        .constructor(vec![("Total", types::primitive(PrimitiveKind::I32))])
        .build();
    (dto, page)
}

#[test]
fn test_generic_template_is_retargeted_per_instantiation() {
    let (dto, page) = pages();
    let i32_ty = types::primitive(PrimitiveKind::I32);
    let template = InstanceTemplate::new(&page)
        .constructor(vec![i32_ty.clone()], vec![TemplateArg::path("Count")]);
    let mapper = Mapper::builder()
        .define_generic_profile(&dto, &page, |p| p.new_instance(template))
        .build()
        .expect("build");

    for element in [i32_ty.clone(), types::string()] {
        let sample = Value::default_for(&element);
        let source = Value::object(
            &closed(&dto, &element),
            [
                ("Items", Value::list(&element, vec![sample.clone(), sample])),
                ("Count", Value::I32(2)),
            ],
        );
        let destination = closed(&page, &element);

        let mapped = mapper.map(&source, &destination).expect("map");

        assert_eq!(mapped.runtime_type(), Some(destination));
        assert_eq!(mapped.get_field("Total"), Some(Value::I32(2)));
        assert_eq!(
            mapped.get_field("Items").and_then(|v| v.as_seq().map(<[Value]>::len)),
            Some(2)
        );
    }
}

#[test]
fn test_unconstructible_destination_without_template_is_a_mismatch() {
    let (dto, page) = pages();
    let i32_ty = types::primitive(PrimitiveKind::I32);
    let source = Value::object(&closed(&dto, &i32_ty), [("Count", Value::I32(1))]);

    let err = Mapper::new().map(&source, &closed(&page, &i32_ty)).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }), "got {:?}", err);
}

#[test]
fn test_template_that_cannot_be_retargeted_is_a_setup_error() {
    let (dto, page) = pages();
    let i32_ty = types::primitive(PrimitiveKind::I32);
    let template = InstanceTemplate::new(&page)
        .constructor(vec![types::string()], vec![TemplateArg::path("Count")]);
    let mapper = Mapper::builder()
        .define_generic_profile(&dto, &page, |p| p.new_instance(template))
        .build()
        .expect("generic templates are checked per instantiation");

    let source = Value::object(&closed(&dto, &i32_ty), [("Count", Value::I32(1))]);
    let err = mapper.map(&source, &closed(&page, &i32_ty)).unwrap_err();

    match err {
        Error::Setup { template, .. } => assert!(template.starts_with("new PrfPage")),
        other => panic!("expected setup error, got {:?}", other),
    }
}

fn stock_types() -> (TypeRef, TypeRef) {
    let level = remap::types::EnumTypeBuilder::new("PrfLevel")
        .variant("Low")
        .variant("High")
        .build();
    let dto = ObjectTypeBuilder::new("PrfStockDto").string_field("Sku").build();
    let view = ObjectTypeBuilder::new("PrfStockView")
        .string_field("Sku")
        .field("Count", PrimitiveKind::I64)
        .field("Ratio", PrimitiveKind::F64)
        .member("Level", level)
        .build();
    (dto, view)
}

#[test]
fn test_constants_take_the_member_type() {
    let (dto, view) = stock_types();
    let mapper = Mapper::builder()
        .define_profile(&dto, &view, |p| {
            p.constant("Count", Value::I32(5))
                .constant("Ratio", "0.25")
                .constant("Level", "High")
        })
        .build()
        .expect("build");

    let mapped = mapper
        .map(&Value::object(&dto, [("Sku", Value::from("A-1"))]), &view)
        .expect("map");

    assert_eq!(mapped.get_field("Count"), Some(Value::I64(5)));
    assert_eq!(mapped.get_field("Ratio"), Some(Value::F64(0.25)));
    let level = mapped.get_field("Level").expect("member");
    assert_eq!(level.as_enum().and_then(|e| e.variant_name()), Some("High"));
}

#[test]
fn test_unconvertible_constants_fail_build() {
    let (dto, view) = stock_types();

    let text = Mapper::builder()
        .define_profile(&dto, &view, |p| p.constant("Count", "not a number"))
        .build();
    assert!(matches!(&text, Err(Error::Argument(msg)) if msg.contains("Count")));

    let narrowed = Mapper::builder()
        .define_profile(&dto, &view, |p| p.constant("Level", Value::I64(1 << 40)))
        .build();
    assert!(matches!(narrowed, Err(Error::Argument(_))));

    let object = Mapper::builder()
        .define_profile(&dto, &view, |p| {
            p.constant("Sku", Value::object(&dto, [("Sku", Value::from("x"))]))
        })
        .build();
    assert!(matches!(object, Err(Error::Argument(_))));
}

fn login_types() -> (TypeRef, TypeRef) {
    let dto = ObjectTypeBuilder::new("PrfLoginDto")
        .string_field("Login")
        .string_field("Password")
        .field("Attempts", PrimitiveKind::I32)
        .build();
    let view = ObjectTypeBuilder::new("PrfLoginView")
        .read_only_member("Login", types::string())
        .read_only_member("Password", types::string())
        .read_only_member("Attempts", types::primitive(PrimitiveKind::I64))
        .constructor(vec![
            ("Login", types::string()),
            ("Password", types::string()),
            ("Attempts", types::primitive(PrimitiveKind::I64)),
        ])
        .build();
    (dto, view)
}

#[test]
fn test_ignore_applies_to_constructor_parameters() {
    let (dto, view) = login_types();
    let mapper = Mapper::builder()
        .define_profile(&dto, &view, |p| p.ignore("Password"))
        .build()
        .expect("build");
    let source = Value::object(
        &dto,
        [
            ("Login", Value::from("ada")),
            ("Password", Value::from("secret")),
            ("Attempts", Value::I32(2)),
        ],
    );

    let mapped = mapper.map(&source, &view).expect("map");

    assert_eq!(mapped.get_field("Login"), Some(Value::from("ada")));
    assert_eq!(mapped.get_field("Password"), Some(Value::Null));
    assert_eq!(mapped.get_field("Attempts"), Some(Value::I64(2)));
}

#[test]
fn test_constructor_parameters_take_member_rules() {
    let (dto, view) = login_types();
    let mapper = Mapper::builder()
        .define_profile(&dto, &view, |p| {
            p.constant("Attempts", Value::I32(0))
                .from_fn("Password", |_| Ok(Value::from("***")))
        })
        .build()
        .expect("build");
    let source = Value::object(
        &dto,
        [("Login", Value::from("bob")), ("Password", Value::from("hunter2")), ("Attempts", Value::I32(9))],
    );

    let mapped = mapper.map(&source, &view).expect("map");

    assert_eq!(mapped.get_field("Login"), Some(Value::from("bob")));
    assert_eq!(mapped.get_field("Password"), Some(Value::from("***")));
    assert_eq!(mapped.get_field("Attempts"), Some(Value::I64(0)));
}

#[test]
fn test_constructor_parameter_rule_satisfies_missing_source_member() {
    let badge = ObjectTypeBuilder::new("PrfBadgeDto")
        .member("Owner", customer())
        .build();
    let view = ObjectTypeBuilder::new("PrfBadgeView")
        .read_only_member("Holder", types::string())
        .constructor(vec![("Holder", types::string())])
        .build();
    let mapper = Mapper::builder()
        .define_profile(&badge, &view, |p| p.from_path("Holder", "Owner.Name"))
        .build()
        .expect("build");

    let named = Value::object(
        &badge,
        [("Owner", Value::object(&customer(), [("Name", Value::from("Lin"))]))],
    );
    let mapped = mapper.map(&named, &view).expect("map");
    assert_eq!(mapped.get_field("Holder"), Some(Value::from("Lin")));

    let orphan = Value::object(&badge, [("Owner", Value::Null)]);
    let mapped = mapper.map(&orphan, &view).expect("null owner");
    assert_eq!(mapped.get_field("Holder"), Some(Value::Null));
}
