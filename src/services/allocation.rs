//! Lot ordering and greedy batch allocation.
//!
//! Given a requested quantity of one product, the engine decides which
//! inventory lots to draw from and how much from each, honoring the
//! configured FEFO/FIFO/LIFO policy.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::models::{AllocationRecord, InventoryLot};

/// Ordering policy applied when drawing stock from lots.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum AllocationPolicy {
    /// First-Expired-First-Out: soonest-expiring lots first; undated lots
    /// last, in receipt order.
    #[default]
    Fefo,
    /// First-In-First-Out: earliest-received lots first, expiry ignored.
    Fifo,
    /// Last-In-First-Out: most-recently-received lots first.
    Lifo,
}

impl AllocationPolicy {
    /// Total order over lots for this policy.
    ///
    /// Every comparison bottoms out at the lot id, so repeated runs over
    /// the same snapshot allocate identically regardless of input order.
    pub(crate) fn compare(&self, a: &InventoryLot, b: &InventoryLot) -> Ordering {
        match self {
            AllocationPolicy::Fefo => match (a.best_before_date, b.best_before_date) {
                (Some(date_a), Some(date_b)) => date_a
                    .cmp(&date_b)
                    .then_with(|| a.received_at.cmp(&b.received_at))
                    .then_with(|| a.id.cmp(&b.id)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => a
                    .received_at
                    .cmp(&b.received_at)
                    .then_with(|| a.id.cmp(&b.id)),
            },
            AllocationPolicy::Fifo => a
                .received_at
                .cmp(&b.received_at)
                .then_with(|| a.id.cmp(&b.id)),
            AllocationPolicy::Lifo => b
                .received_at
                .cmp(&a.received_at)
                .then_with(|| a.id.cmp(&b.id)),
        }
    }
}

/// Outcome of one allocation run for a single product.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AllocationOutcome {
    pub records: Vec<AllocationRecord>,
    /// Requested quantity that could not be covered. A normal outcome, not
    /// an error.
    pub shortfall: i64,
}

impl AllocationOutcome {
    pub fn total_allocated(&self) -> i64 {
        self.records.iter().map(|r| r.quantity_allocated).sum()
    }
}

/// Selects which inventory lots to draw from for a requested quantity.
///
/// The engine reads lot availabilities from the snapshot it is given and
/// never writes back; decrementing real inventory belongs to the external
/// persistence step.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllocationEngine {
    policy: AllocationPolicy,
}

impl AllocationEngine {
    pub fn new(policy: AllocationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> AllocationPolicy {
        self.policy
    }

    /// Allocates `quantity_needed` units of a product across eligible lots
    /// in policy order, taking `min(remaining, available)` from each.
    ///
    /// A non-positive `quantity_needed` is a no-op. Insufficient stock
    /// surfaces as `shortfall`.
    #[instrument(skip(self, lots), fields(policy = %self.policy))]
    pub fn allocate(
        &self,
        product_id: Uuid,
        quantity_needed: i64,
        lots: &[InventoryLot],
    ) -> AllocationOutcome {
        if quantity_needed <= 0 {
            return AllocationOutcome::default();
        }

        let mut eligible: Vec<&InventoryLot> = lots
            .iter()
            .filter(|lot| lot.product_id == product_id && lot.is_allocatable())
            .collect();
        eligible.sort_by(|a, b| self.policy.compare(a, b));

        let mut records = Vec::new();
        let mut remaining = quantity_needed;
        for lot in eligible {
            if remaining == 0 {
                break;
            }
            let take = remaining.min(lot.quantity_available);
            if take > 0 {
                records.push(record_from_lot(lot, take));
                remaining -= take;
            }
        }

        if remaining > 0 {
            debug!(
                %product_id,
                quantity_needed,
                shortfall = remaining,
                "allocation left a shortfall"
            );
        }

        AllocationOutcome {
            records,
            shortfall: remaining,
        }
    }
}

pub(crate) fn record_from_lot(lot: &InventoryLot, quantity_allocated: i64) -> AllocationRecord {
    AllocationRecord {
        lot_id: lot.id,
        product_id: lot.product_id,
        product_sku: lot.product_sku.clone(),
        product_name: lot.product_name.clone(),
        location_id: lot.location_id,
        location_code: lot.location_code.clone(),
        warehouse_id: lot.warehouse_id,
        warehouse_name: lot.warehouse_name.clone(),
        quantity_allocated,
        lot_number: lot.lot_number.clone(),
        best_before_date: lot.best_before_date,
    }
}
