//! End-to-end pick-list generation tests.
//!
//! Exercises the allocation engine and pick-list builder together the way a
//! transport layer would drive them, plus property-based checks for the
//! invariants the services promise:
//! - Conservation: allocated + shortfall == requested, per line
//! - Non-negativity: no zero-quantity pick is ever emitted
//! - Route grouping: warehouses form contiguous blocks, locations sorted
//! - Determinism: identical inputs produce identical output

use chrono::{DateTime, NaiveDate, Utc};
use proptest::prelude::*;
use std::collections::HashMap;
use uuid::Uuid;
use wms_picking::{
    AllocationPolicy, InventoryLot, LotStatus, OrderLine, PickListService, PickPlanner,
    PickStatus,
};

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn ts(s: &str) -> DateTime<Utc> {
    format!("{s}T00:00:00Z").parse().unwrap()
}

fn lot(
    id: u128,
    product_id: u128,
    sku: &str,
    quantity: i64,
    warehouse: &str,
    location: &str,
    best_before: Option<&str>,
    received: &str,
) -> InventoryLot {
    InventoryLot {
        id: Uuid::from_u128(id),
        product_id: Uuid::from_u128(product_id),
        product_sku: sku.to_string(),
        product_name: format!("Product {sku}"),
        location_id: Uuid::from_u128(id + 0x5000),
        location_code: location.to_string(),
        warehouse_id: Uuid::from_u128(0x7000 + warehouse.bytes().map(u128::from).sum::<u128>()),
        warehouse_name: warehouse.to_string(),
        lot_number: Some(format!("LOT-{id}")),
        quantity_available: quantity,
        best_before_date: best_before.map(date),
        received_at: ts(received),
        status: LotStatus::Available,
    }
}

fn order_line(product_id: u128, sku: &str, quantity: i64) -> OrderLine {
    OrderLine {
        product_id: Uuid::from_u128(product_id),
        product_sku: sku.to_string(),
        product_name: format!("Product {sku}"),
        quantity_requested: quantity,
    }
}

/// Two-line order: product X is fully covered by two FEFO-ordered lots in
/// warehouse A, product Y is short by 5 in warehouse B. The pick list must
/// come back route-ordered with warehouse A's picks first.
#[test]
fn generates_pick_list_for_order_with_partial_shortfall() {
    let lots = vec![
        lot(1, 1, "SKU-X", 20, "WH-A", "LOC-01", Some("2026-01-10"), "2025-12-01"),
        lot(2, 1, "SKU-X", 20, "WH-A", "LOC-02", Some("2026-02-10"), "2025-12-05"),
        lot(3, 2, "SKU-Y", 5, "WH-B", "LOC-01", None, "2025-12-10"),
    ];
    let service = PickListService::new(AllocationPolicy::Fefo);

    let result = service
        .build_pick_list(
            &[order_line(1, "SKU-X", 30), order_line(2, "SKU-Y", 10)],
            &lots,
        )
        .unwrap();

    assert_eq!(result.entries.len(), 3);

    // Product X drains the soonest-expiring lot before touching the next.
    assert_eq!(result.entries[0].lot_id, Uuid::from_u128(1));
    assert_eq!(result.entries[0].quantity_to_pick, 20);
    assert_eq!(result.entries[1].lot_id, Uuid::from_u128(2));
    assert_eq!(result.entries[1].quantity_to_pick, 10);

    // Warehouse A's picks are sequenced before warehouse B's.
    assert_eq!(result.entries[2].warehouse_name, "WH-B");
    assert_eq!(result.entries[2].quantity_to_pick, 5);
    let sequences: Vec<u32> = result.entries.iter().map(|e| e.sequence_number).collect();
    assert_eq!(sequences, vec![1, 2, 3]);

    assert_eq!(result.warnings.len(), 1);
    assert_eq!(
        result.warnings[0].to_string(),
        "SKU-Y: Short 5 units (only 5 available)"
    );
    assert_eq!(result.total_picked, 35);
    assert_eq!(result.shortfall, 5);
}

#[test]
fn pick_list_shapes_for_the_save_call() {
    let lots = vec![lot(1, 1, "SKU-X", 40, "WH-A", "LOC-01", None, "2025-12-01")];
    let service = PickListService::new(AllocationPolicy::Fifo);
    let order_id = Uuid::from_u128(0xFEED);

    let pick_list = service
        .build_pick_list(&[order_line(1, "SKU-X", 15)], &lots)
        .unwrap()
        .into_pick_list(order_id);

    assert_eq!(pick_list.order_id, order_id);
    assert_eq!(pick_list.status, PickStatus::Pending);
    assert_eq!(pick_list.entries[0].quantity_to_pick, 15);
}

#[test]
fn trait_object_drives_the_builder() {
    let lots = vec![lot(1, 1, "SKU-X", 40, "WH-A", "LOC-01", None, "2025-12-01")];
    let planner: &dyn PickPlanner = &PickListService::new(AllocationPolicy::Fifo);

    let outcome = planner.allocate(Uuid::from_u128(1), 10, &lots);
    assert_eq!(outcome.total_allocated(), 10);

    let result = planner.build(&[order_line(1, "SKU-X", 10)], &lots).unwrap();
    assert_eq!(result.entries.len(), 1);
}

#[test]
fn repeated_builds_are_identical() {
    let lots = vec![
        lot(1, 1, "SKU-X", 8, "WH-B", "B-04", Some("2026-03-01"), "2025-11-01"),
        lot(2, 1, "SKU-X", 12, "WH-A", "A-02", Some("2026-01-15"), "2025-11-20"),
        lot(3, 2, "SKU-Y", 30, "WH-A", "A-01", None, "2025-10-01"),
    ];
    let lines = [order_line(1, "SKU-X", 15), order_line(2, "SKU-Y", 10)];
    let service = PickListService::new(AllocationPolicy::Fefo);

    let first = service.build_pick_list(&lines, &lots).unwrap();
    let second = service.build_pick_list(&lines, &lots).unwrap();

    assert_eq!(first, second);
}

fn arb_lots() -> impl Strategy<Value = Vec<InventoryLot>> {
    let one = (
        1u128..=4,
        0i64..120,
        1u32..=28,
        proptest::option::of(1u32..=28u32),
        prop_oneof![Just("WH-A"), Just("WH-B"), Just("WH-C")],
        1u8..=6,
    );
    proptest::collection::vec(one, 0..20).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(index, (product, quantity, day, bb_day, warehouse, aisle))| {
                let mut built = lot(
                    index as u128 + 1,
                    product,
                    &format!("SKU-{product}"),
                    quantity,
                    warehouse,
                    &format!("A-{aisle:02}"),
                    None,
                    "2026-01-01",
                );
                built.received_at = ts(&format!("2026-01-{day:02}"));
                built.best_before_date =
                    bb_day.map(|d| NaiveDate::from_ymd_opt(2026, 3, d).unwrap());
                built
            })
            .collect()
    })
}

fn arb_lines() -> impl Strategy<Value = Vec<OrderLine>> {
    proptest::collection::btree_map(1u128..=4, 0i64..300, 0..=4).prop_map(|demand| {
        demand
            .into_iter()
            .map(|(product, quantity)| order_line(product, &format!("SKU-{product}"), quantity))
            .collect()
    })
}

proptest! {
    #[test]
    fn allocation_conserves_quantity_per_line(
        lots in arb_lots(),
        lines in arb_lines(),
    ) {
        for policy in [AllocationPolicy::Fefo, AllocationPolicy::Fifo, AllocationPolicy::Lifo] {
            let service = PickListService::new(policy);
            let result = service.build_pick_list(&lines, &lots).unwrap();

            let mut allocated: HashMap<Uuid, i64> = HashMap::new();
            for entry in &result.entries {
                prop_assert!(entry.quantity_to_pick > 0);
                *allocated.entry(entry.product_id).or_default() += entry.quantity_to_pick;
            }
            let shortfalls: HashMap<Uuid, i64> = result
                .warnings
                .iter()
                .map(|w| (w.product_id, w.shortfall))
                .collect();

            for line in &lines {
                let picked = allocated.get(&line.product_id).copied().unwrap_or(0);
                let short = shortfalls.get(&line.product_id).copied().unwrap_or(0);
                prop_assert_eq!(picked + short, line.quantity_requested.max(0));
            }
        }
    }

    #[test]
    fn picks_never_exceed_lot_availability(
        lots in arb_lots(),
        lines in arb_lines(),
    ) {
        let service = PickListService::new(AllocationPolicy::Fefo);
        let result = service.build_pick_list(&lines, &lots).unwrap();

        let mut per_lot: HashMap<Uuid, i64> = HashMap::new();
        for entry in &result.entries {
            *per_lot.entry(entry.lot_id).or_default() += entry.quantity_to_pick;
        }
        for lot in &lots {
            let taken = per_lot.get(&lot.id).copied().unwrap_or(0);
            prop_assert!(taken <= lot.quantity_available.max(0));
        }
    }

    #[test]
    fn route_groups_warehouses_into_contiguous_sorted_blocks(
        lots in arb_lots(),
        lines in arb_lines(),
    ) {
        let service = PickListService::new(AllocationPolicy::Fefo);
        let result = service.build_pick_list(&lines, &lots).unwrap();

        let keys: Vec<(String, String)> = result
            .entries
            .iter()
            .map(|e| (e.warehouse_name.clone(), e.location_code.clone()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        prop_assert_eq!(keys, sorted);

        let sequences: Vec<u32> = result.entries.iter().map(|e| e.sequence_number).collect();
        let expected: Vec<u32> = (1..=result.entries.len() as u32).collect();
        prop_assert_eq!(sequences, expected);
    }

    #[test]
    fn builds_are_deterministic(
        lots in arb_lots(),
        lines in arb_lines(),
    ) {
        for policy in [AllocationPolicy::Fefo, AllocationPolicy::Fifo, AllocationPolicy::Lifo] {
            let service = PickListService::new(policy);
            let first = service.build_pick_list(&lines, &lots).unwrap();
            let second = service.build_pick_list(&lines, &lots).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
