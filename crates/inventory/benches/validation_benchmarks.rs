use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use serde_json::{Value, json};

use zaiko_inventory::{check_digit, classify, is_valid_inventory, normalize_name, Symbology};

fn valid_ean(seed: u64) -> String {
    let payload = format!("{:012}", seed % 1_000_000_000_000);
    let d = check_digit(Symbology::Ean13, &payload).unwrap_or(0);
    format!("{payload}{d}")
}

fn document(sets: usize, items_per_set: usize) -> Value {
    let sets: Vec<Value> = (0..sets)
        .map(|s| {
            let items: Vec<Value> = (0..items_per_set)
                .map(|i| {
                    json!({
                        "name": format!("Item {s}-{i}"),
                        "stock": i,
                        "barcode": valid_ean((s * items_per_set + i) as u64),
                        "internalCode": format!("ZAIKO-ITEM-{i}"),
                    })
                })
                .collect();
            json!({ "name": format!("Set {s}"), "items": items })
        })
        .collect();
    Value::Array(sets)
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    for code in ["4006381333931", "036000291452", "4006381333930", "not-a-barcode"] {
        group.bench_with_input(BenchmarkId::from_parameter(code), code, |b, code| {
            b.iter(|| classify(black_box(code)))
        });
    }
    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize_name", |b| {
        b.iter(|| normalize_name(black_box("  Crème Brûlée à la Łódź  ")))
    });
}

fn bench_inventory(c: &mut Criterion) {
    let mut group = c.benchmark_group("is_valid_inventory");
    for items in [10usize, 100, 1000] {
        let doc = document(10, items);
        group.throughput(Throughput::Elements((10 * items) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(items), &doc, |b, doc| {
            b.iter(|| is_valid_inventory(black_box(doc)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_classify, bench_normalize, bench_inventory);
criterion_main!(benches);
