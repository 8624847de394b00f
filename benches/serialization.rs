use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::{Deserialize, Serialize};
use variant_codec::{
    bcon, bson, from_json_str, json, to_json_string, to_variant, JsonOptions, Variant, VariantMap,
};

#[derive(Serialize, Deserialize, Clone)]
struct User {
    id: u32,
    name: String,
    email: String,
    active: bool,
}

#[derive(Serialize, Deserialize, Clone)]
struct Product {
    sku: String,
    name: String,
    price: f64,
    quantity: u32,
}

fn products(size: u32) -> Vec<Product> {
    (0..size)
        .map(|i| Product {
            sku: format!("SKU{}", i),
            name: format!("Product {}", i),
            price: 9.99 + f64::from(i),
            quantity: i,
        })
        .collect()
}

fn catalog(size: u32) -> Variant {
    let mut map = VariantMap::new();
    map.insert("products".to_string(), to_variant(&products(size)).unwrap())
        .unwrap();
    Variant::Map(map)
}

fn benchmark_serialize_simple(c: &mut Criterion) {
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        active: true,
    };

    c.bench_function("serialize_simple_struct", |b| {
        b.iter(|| to_json_string(black_box(&user)))
    });
}

fn benchmark_deserialize_simple(c: &mut Criterion) {
    let text = r#"{"id": 123, "name": "Alice", "email": "alice@example.com", "active": true}"#;

    c.bench_function("deserialize_simple_struct", |b| {
        b.iter(|| from_json_str::<User>(black_box(text)))
    });
}

fn benchmark_encode_formats(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    for size in [10u32, 100, 500] {
        let tree = catalog(size);
        group.bench_with_input(BenchmarkId::new("json", size), &tree, |b, tree| {
            b.iter(|| json::to_string(black_box(tree), &JsonOptions::new()))
        });
        group.bench_with_input(BenchmarkId::new("bson", size), &tree, |b, tree| {
            b.iter(|| bson::to_vec(black_box(tree)))
        });
        group.bench_with_input(BenchmarkId::new("bcon", size), &tree, |b, tree| {
            b.iter(|| bcon::to_vec(black_box(tree)))
        });
    }
    group.finish();
}

fn benchmark_decode_formats(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for size in [10u32, 100, 500] {
        let tree = catalog(size);
        let json_text = json::to_string(&tree, &JsonOptions::new()).unwrap();
        let bson_bytes = bson::to_vec(&tree).unwrap();
        let bcon_bytes = bcon::to_vec(&tree).unwrap();

        group.bench_with_input(BenchmarkId::new("json", size), &json_text, |b, text| {
            b.iter(|| json::from_str(black_box(text)))
        });
        group.bench_with_input(BenchmarkId::new("bson", size), &bson_bytes, |b, bytes| {
            b.iter(|| bson::from_slice(black_box(bytes)))
        });
        group.bench_with_input(BenchmarkId::new("bcon", size), &bcon_bytes, |b, bytes| {
            b.iter(|| bcon::from_slice(black_box(bytes)))
        });
    }
    group.finish();
}

fn benchmark_variant_conversions(c: &mut Criterion) {
    let mut group = c.benchmark_group("conversions");

    let text = Variant::from(" 123456 ");
    let double = Variant::Double(1234.5);
    let left = Variant::from("42");
    let right = Variant::Long(42);

    group.bench_function("string_to_int", |b| b.iter(|| black_box(&text).int_value()));
    group.bench_function("double_to_long", |b| {
        b.iter(|| black_box(&double).long_value())
    });
    group.bench_function("cross_kind_eq", |b| {
        b.iter(|| black_box(&left) == black_box(&right))
    });

    group.finish();
}

fn benchmark_comparison_with_serde_json(c: &mut Criterion) {
    let items = products(100);

    let mut group = c.benchmark_group("vs_serde_json");
    group.bench_function("variant_codec", |b| {
        b.iter(|| to_json_string(black_box(&items)))
    });
    group.bench_function("serde_json", |b| {
        b.iter(|| serde_json::to_string(black_box(&items)))
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_serialize_simple,
    benchmark_deserialize_simple,
    benchmark_encode_formats,
    benchmark_decode_formats,
    benchmark_variant_conversions,
    benchmark_comparison_with_serde_json
);
criterion_main!(benches);
