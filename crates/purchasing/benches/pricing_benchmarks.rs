use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use meublerp_purchasing::{LineItem, SupplierPurchaseOrder, price_document};

fn order_with_lines(count: usize) -> SupplierPurchaseOrder {
    let mut order = SupplierPurchaseOrder::new("Bench Fournisseur").with_advance_payment(1_000.0);
    for i in 0..count {
        let discount = if i % 3 == 0 { 7.5 } else { 0.0 };
        order = order.with_article(
            LineItem::new(format!("Article {i}"), (i % 12 + 1) as f64, 49.9 + i as f64)
                .with_discount(discount),
        );
    }
    order
}

fn bench_price_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("price_document");

    for lines in [1usize, 10, 100, 1000].iter() {
        let order = order_with_lines(*lines);
        group.throughput(Throughput::Elements(*lines as u64));
        group.bench_with_input(BenchmarkId::new("lines", lines), &order, |b, order| {
            b.iter(|| price_document(black_box(order)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_price_document);
criterion_main!(benches);
