use chrono::{DateTime, Duration, NaiveDate, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use uuid::Uuid;
use wms_picking::{
    AllocationEngine, AllocationPolicy, InventoryLot, LotStatus, OrderLine, PickListService,
};

const PRODUCT_COUNT: u128 = 20;

fn base_received() -> DateTime<Utc> {
    "2026-01-01T00:00:00Z".parse().unwrap()
}

fn synthetic_lots(count: usize) -> Vec<InventoryLot> {
    (0..count)
        .map(|index| {
            let product = index as u128 % PRODUCT_COUNT + 1;
            InventoryLot {
                id: Uuid::from_u128(index as u128 + 1),
                product_id: Uuid::from_u128(product),
                product_sku: format!("SKU-{product:04}"),
                product_name: format!("Product {product}"),
                location_id: Uuid::from_u128(index as u128 + 0x5000),
                location_code: format!("{}-{:02}", ['A', 'B', 'C'][index % 3], index % 40),
                warehouse_id: Uuid::from_u128(index as u128 % 3 + 0x7000),
                warehouse_name: format!("WH-{}", index % 3 + 1),
                lot_number: Some(format!("LOT-{index}")),
                quantity_available: (index as i64 % 50) + 1,
                best_before_date: (index % 2 == 0).then(|| {
                    NaiveDate::from_ymd_opt(2026, 3, (index as u32 % 28) + 1).unwrap()
                }),
                received_at: base_received() + Duration::hours(index as i64),
                status: LotStatus::Available,
            }
        })
        .collect()
}

fn lot_allocation_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("lot_allocation");
    let engine = AllocationEngine::new(AllocationPolicy::Fefo);

    for size in [100usize, 1_000, 5_000] {
        let lots = synthetic_lots(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                engine.allocate(
                    black_box(Uuid::from_u128(1)),
                    black_box(size as i64),
                    &lots,
                )
            });
        });
    }

    group.finish();
}

fn pick_list_build_benchmark(c: &mut Criterion) {
    let lots = synthetic_lots(2_000);
    let lines: Vec<OrderLine> = (1..=PRODUCT_COUNT)
        .map(|product| OrderLine {
            product_id: Uuid::from_u128(product),
            product_sku: format!("SKU-{product:04}"),
            product_name: format!("Product {product}"),
            quantity_requested: 200,
        })
        .collect();
    let service = PickListService::new(AllocationPolicy::Fefo);

    c.bench_function("pick_list_build", |b| {
        b.iter(|| service.build_pick_list(black_box(&lines), black_box(&lots)));
    });
}

criterion_group!(benches, lot_allocation_benchmark, pick_list_build_benchmark);
criterion_main!(benches);
