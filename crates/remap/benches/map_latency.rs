// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Mapping Latency Benchmark
//!
//! Measures steady-state `Mapper::map` cost once the plan is cached:
//! - flat object to object (same-name members, one primitive widening)
//! - list of objects into an abstract collection interface
//! - string-keyed dictionary into an object
//!
//! Plan compilation is measured separately on a fresh mapper per iteration.

#![allow(clippy::uninlined_format_args)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use remap::types::{self, ObjectTypeBuilder, PrimitiveKind, SequenceShape};
use remap::{Mapper, TypeRef, Value};

fn order() -> TypeRef {
    ObjectTypeBuilder::new("BenchOrder")
        .field("Id", PrimitiveKind::I32)
        .string_field("Customer")
        .field("Total", PrimitiveKind::F64)
        .field("Paid", PrimitiveKind::Bool)
        .build()
}

fn order_view() -> TypeRef {
    ObjectTypeBuilder::new("BenchOrderView")
        .field("Id", PrimitiveKind::I64)
        .string_field("Customer")
        .string_field("Total")
        .field("Paid", PrimitiveKind::Bool)
        .build()
}

fn sample(ty: &TypeRef, id: i32) -> Value {
    Value::object(
        ty,
        [
            ("Id", Value::I32(id)),
            ("Customer", Value::String(format!("customer-{}", id))),
            ("Total", Value::F64(f64::from(id) * 1.5)),
            ("Paid", Value::Bool(id % 2 == 0)),
        ],
    )
}

fn bench_object(c: &mut Criterion) {
    let (src, dst) = (order(), order_view());
    let mapper = Mapper::new();
    let value = sample(&src, 42);
    mapper.map(&value, &dst).expect("warm up");

    c.bench_function("map_object_cached", |b| {
        b.iter(|| black_box(mapper.map(black_box(&value), &dst).expect("map")));
    });
}

fn bench_list(c: &mut Criterion) {
    let (src, dst) = (order(), order_view());
    let destination = types::sequence(SequenceShape::ReadOnlyList, &dst);
    let mapper = Mapper::new();
    let mut group = c.benchmark_group("map_list");

    for len in [10_i32, 100, 1_000] {
        let list = Value::list(&src, (0..len).map(|i| sample(&src, i)).collect());
        mapper.map(&list, &destination).expect("warm up");
        group.bench_with_input(BenchmarkId::from_parameter(len), &list, |b, list| {
            b.iter(|| black_box(mapper.map(list, &destination).expect("map")));
        });
    }
    group.finish();
}

fn bench_dictionary(c: &mut Criterion) {
    let dst = order_view();
    let mapper = Mapper::new();
    let dict = Value::dict(
        &types::string(),
        &types::any(),
        vec![
            ("id".into(), Value::I32(7)),
            ("customer".into(), "acme".into()),
            ("total".into(), "12.5".into()),
            ("paid".into(), Value::Bool(true)),
        ],
    );
    mapper.map(&dict, &dst).expect("warm up");

    c.bench_function("map_dictionary_to_object", |b| {
        b.iter(|| black_box(mapper.map(black_box(&dict), &dst).expect("map")));
    });
}

fn bench_plan_compilation(c: &mut Criterion) {
    let (src, dst) = (order(), order_view());
    c.bench_function("compile_object_plan", |b| {
        b.iter(|| {
            let mapper = Mapper::new();
            black_box(mapper.plan(&src, &dst).expect("plan"))
        });
    });
}

criterion_group!(
    benches,
    bench_object,
    bench_list,
    bench_dictionary,
    bench_plan_compilation
);
criterion_main!(benches);
