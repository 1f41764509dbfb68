//! Pick-list generation.
//!
//! Drives the allocation engine across order lines, aggregates shortfalls
//! into warnings, and produces a route-ordered, sequenced pick list ready
//! for the external persistence call. Also covers single-product picks,
//! multi-order wave batching, and pre-execution validation.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::config::PickingConfig;
use crate::errors::ServiceError;
use crate::models::{
    AllocationRecord, GeneratedPickList, InventoryLot, LotStatus, OrderLine, OrderType,
    PickListEntry, PickListValidation, PickOutcome, PickRequest, PickWarning, ShortfallWarning,
    ValidationIssue, WaveOrderShare, WaveOutcome, WavePick, WavePickRequest,
};
use crate::services::allocation::{
    record_from_lot, AllocationEngine, AllocationOutcome, AllocationPolicy,
};

/// Narrow driving seam for transports: an HTTP handler, CLI, or batch job
/// drives the whole core through these two calls.
pub trait PickPlanner {
    /// Allocates a quantity of one product across eligible lots.
    fn allocate(
        &self,
        product_id: Uuid,
        quantity_needed: i64,
        lots: &[InventoryLot],
    ) -> AllocationOutcome;

    /// Builds a sequenced pick list for a whole order.
    fn build(
        &self,
        order_lines: &[OrderLine],
        lots: &[InventoryLot],
    ) -> Result<GeneratedPickList, ServiceError>;
}

/// Service for generating, batching, and validating pick lists.
#[derive(Clone, Copy, Debug)]
pub struct PickListService {
    engine: AllocationEngine,
    expiry_warning_window_days: i64,
}

impl Default for PickListService {
    fn default() -> Self {
        Self::from_config(&PickingConfig::default())
    }
}

impl PickListService {
    pub fn new(policy: AllocationPolicy) -> Self {
        Self {
            engine: AllocationEngine::new(policy),
            expiry_warning_window_days: PickingConfig::default().expiry_warning_window_days,
        }
    }

    pub fn from_config(config: &PickingConfig) -> Self {
        Self {
            engine: AllocationEngine::new(config.policy),
            expiry_warning_window_days: config.expiry_warning_window_days,
        }
    }

    pub fn policy(&self) -> AllocationPolicy {
        self.engine.policy()
    }

    /// Generates a pick list for every line of an order.
    ///
    /// Malformed input aborts the whole run with no partial pick list.
    /// Missing stock never fails the run; each shorted line contributes one
    /// warning and the pick list covers whatever could be allocated.
    #[instrument(skip(self, order_lines, lots), fields(lines = order_lines.len(), policy = %self.policy()))]
    pub fn build_pick_list(
        &self,
        order_lines: &[OrderLine],
        lots: &[InventoryLot],
    ) -> Result<GeneratedPickList, ServiceError> {
        validate_order_lines(order_lines)?;

        let mut records = Vec::new();
        let mut warnings = Vec::new();
        let mut total_picked = 0;
        let mut total_shortfall = 0;

        for line in order_lines {
            let outcome = self
                .engine
                .allocate(line.product_id, line.quantity_requested, lots);
            let allocated = line.quantity_requested - outcome.shortfall;
            total_picked += allocated;
            if outcome.shortfall > 0 {
                warnings.push(ShortfallWarning {
                    product_id: line.product_id,
                    product_sku: line.product_sku.clone(),
                    quantity_requested: line.quantity_requested,
                    quantity_allocated: allocated,
                    shortfall: outcome.shortfall,
                });
                total_shortfall += outcome.shortfall;
            }
            records.extend(outcome.records);
        }

        Ok(GeneratedPickList {
            entries: sequence_records(records),
            warnings,
            total_picked,
            shortfall: total_shortfall,
        })
    }

    /// Picks one product honoring order type and warehouse preference.
    ///
    /// `as_of` anchors the expiring-soon advisory so the run stays a pure
    /// function of its inputs.
    #[instrument(skip(self, lots), fields(policy = %self.policy()))]
    pub fn pick(
        &self,
        request: &PickRequest,
        lots: &[InventoryLot],
        as_of: NaiveDate,
    ) -> Result<PickOutcome, ServiceError> {
        if request.product_id.is_nil() {
            return Err(ServiceError::InvalidInput(
                "pick request has no product id".to_string(),
            ));
        }
        if request.quantity_needed < 0 {
            return Err(ServiceError::InvalidInput(format!(
                "pick request for product {} has negative quantity {}",
                request.product_id, request.quantity_needed
            )));
        }
        if request.quantity_needed == 0 {
            return Ok(PickOutcome {
                pick_list: Vec::new(),
                total_picked: 0,
                shortfall: 0,
                fully_allocated: true,
                warnings: Vec::new(),
            });
        }

        let mut warnings = Vec::new();

        let mut eligible: Vec<InventoryLot> = lots
            .iter()
            .filter(|lot| lot.product_id == request.product_id && lot.is_allocatable())
            .cloned()
            .collect();

        if eligible.is_empty() {
            return Ok(PickOutcome {
                pick_list: Vec::new(),
                total_picked: 0,
                shortfall: request.quantity_needed,
                fully_allocated: false,
                warnings: vec![PickWarning::NoStock {
                    product_id: request.product_id,
                }],
            });
        }

        if let Some(warehouse_id) = request.preferred_warehouse_id {
            let in_preferred: Vec<InventoryLot> = eligible
                .iter()
                .filter(|lot| lot.warehouse_id == warehouse_id)
                .cloned()
                .collect();
            if in_preferred.is_empty() {
                warn!(%warehouse_id, "preferred warehouse has no eligible stock, widening to all warehouses");
                warnings.push(PickWarning::PreferredWarehouseEmpty { warehouse_id });
            } else {
                eligible = in_preferred;
            }
        }

        let expiring = eligible
            .iter()
            .filter(|lot| {
                lot.best_before_date.is_some_and(|date| {
                    let days = date.signed_duration_since(as_of).num_days();
                    (0..=self.expiry_warning_window_days).contains(&days)
                })
            })
            .count();
        if expiring > 0 {
            warnings.push(PickWarning::ExpiringSoon {
                lot_count: expiring,
                window_days: self.expiry_warning_window_days,
            });
        }

        // Wholesale orders prefer one uninterrupted lot when any single lot
        // can cover the whole quantity.
        if request.order_type == OrderType::Wholesale {
            let mut in_policy_order: Vec<&InventoryLot> = eligible.iter().collect();
            in_policy_order.sort_by(|a, b| self.policy().compare(a, b));
            if let Some(lot) = in_policy_order
                .iter()
                .find(|lot| lot.quantity_available >= request.quantity_needed)
            {
                let record = record_from_lot(lot, request.quantity_needed);
                return Ok(PickOutcome {
                    pick_list: sequence_records(vec![record]),
                    total_picked: request.quantity_needed,
                    shortfall: 0,
                    fully_allocated: true,
                    warnings,
                });
            }
            warnings.push(PickWarning::WholesaleSplit);
        }

        let outcome = self
            .engine
            .allocate(request.product_id, request.quantity_needed, &eligible);
        let total_picked = request.quantity_needed - outcome.shortfall;
        if outcome.shortfall > 0 {
            warnings.push(PickWarning::Shortfall(ShortfallWarning {
                product_id: request.product_id,
                product_sku: eligible
                    .first()
                    .map(|lot| lot.product_sku.clone())
                    .unwrap_or_default(),
                quantity_requested: request.quantity_needed,
                quantity_allocated: total_picked,
                shortfall: outcome.shortfall,
            }));
        }

        Ok(PickOutcome {
            pick_list: sequence_records(outcome.records),
            total_picked,
            shortfall: outcome.shortfall,
            fully_allocated: outcome.shortfall == 0,
            warnings,
        })
    }

    /// Builds a batch pick across multiple orders, merging picks that hit
    /// the same lot and sharing stock in priority order.
    #[instrument(skip(self, requests, lots), fields(requests = requests.len(), policy = %self.policy()))]
    pub fn build_wave(
        &self,
        requests: &[WavePickRequest],
        lots: &[InventoryLot],
    ) -> Result<WaveOutcome, ServiceError> {
        for (index, request) in requests.iter().enumerate() {
            if request.order_id.is_nil() {
                return Err(ServiceError::InvalidInput(format!(
                    "wave request {} has no order id",
                    index + 1
                )));
            }
            if request.product_id.is_nil() {
                return Err(ServiceError::InvalidInput(format!(
                    "wave request {} has no product id",
                    index + 1
                )));
            }
            if request.quantity_needed < 0 {
                return Err(ServiceError::InvalidInput(format!(
                    "wave request {} has negative quantity {}",
                    index + 1, request.quantity_needed
                )));
            }
            request.validate()?;
        }

        // Group by product; BTreeMap keeps the product order deterministic.
        let mut by_product: BTreeMap<Uuid, Vec<&WavePickRequest>> = BTreeMap::new();
        for request in requests {
            by_product.entry(request.product_id).or_default().push(request);
        }

        let mut picks: Vec<WavePick> = Vec::new();
        let mut warnings: Vec<ShortfallWarning> = Vec::new();

        for (product_id, mut product_requests) in by_product {
            product_requests.sort_by_key(|request| request.priority);

            // Local availability snapshot, consumed as the wave walks it.
            let mut stock: Vec<InventoryLot> = lots
                .iter()
                .filter(|lot| lot.product_id == product_id && lot.is_allocatable())
                .cloned()
                .collect();
            stock.sort_by(|a, b| self.policy().compare(a, b));

            let product_sku = stock
                .first()
                .map(|lot| lot.product_sku.clone())
                .unwrap_or_else(|| "N/A".to_string());

            let mut lot_index = 0;
            for request in product_requests {
                let mut remaining = request.quantity_needed;
                while remaining > 0 && lot_index < stock.len() {
                    let lot = &mut stock[lot_index];
                    let take = remaining.min(lot.quantity_available);
                    let position = match picks.iter().position(|pick| pick.lot_id == lot.id) {
                        Some(position) => position,
                        None => {
                            picks.push(WavePick {
                                sequence_number: 0,
                                lot_id: lot.id,
                                product_id: lot.product_id,
                                product_sku: lot.product_sku.clone(),
                                location_code: lot.location_code.clone(),
                                warehouse_name: lot.warehouse_name.clone(),
                                quantity_to_pick: 0,
                                orders: Vec::new(),
                            });
                            picks.len() - 1
                        }
                    };
                    picks[position].quantity_to_pick += take;
                    picks[position].orders.push(WaveOrderShare {
                        order_id: request.order_id,
                        quantity: take,
                    });
                    remaining -= take;
                    lot.quantity_available -= take;
                    if lot.quantity_available == 0 {
                        lot_index += 1;
                    }
                }
                if remaining > 0 {
                    warnings.push(ShortfallWarning {
                        product_id,
                        product_sku: product_sku.clone(),
                        quantity_requested: request.quantity_needed,
                        quantity_allocated: request.quantity_needed - remaining,
                        shortfall: remaining,
                    });
                }
            }
        }

        picks.sort_by(|a, b| {
            a.warehouse_name
                .cmp(&b.warehouse_name)
                .then_with(|| a.location_code.cmp(&b.location_code))
        });
        for (index, pick) in picks.iter_mut().enumerate() {
            pick.sequence_number = index as u32 + 1;
        }

        Ok(WaveOutcome { picks, warnings })
    }

    /// Checks a generated pick list against a fresh inventory snapshot.
    ///
    /// Issues are advisory data for the caller; nothing aborts here.
    #[instrument(skip(self, entries, lots), fields(entries = entries.len()))]
    pub fn validate(
        &self,
        entries: &[PickListEntry],
        lots: &[InventoryLot],
        as_of: NaiveDate,
    ) -> PickListValidation {
        let mut issues = Vec::new();
        for entry in entries {
            let Some(lot) = lots.iter().find(|lot| lot.id == entry.lot_id) else {
                issues.push(ValidationIssue::LotNotFound {
                    lot_id: entry.lot_id,
                    product_sku: entry.product_sku.clone(),
                });
                continue;
            };
            if lot.quantity_available < entry.quantity_to_pick {
                issues.push(ValidationIssue::InsufficientQuantity {
                    location_code: entry.location_code.clone(),
                    needed: entry.quantity_to_pick,
                    available: lot.quantity_available,
                });
            }
            if lot.status != LotStatus::Available {
                issues.push(ValidationIssue::LotNotAvailable {
                    location_code: entry.location_code.clone(),
                    status: lot.status,
                });
            }
            if let Some(date) = lot.best_before_date {
                if date < as_of {
                    issues.push(ValidationIssue::LotExpired {
                        location_code: entry.location_code.clone(),
                        expired_on: date,
                    });
                }
            }
        }
        PickListValidation {
            valid: issues.is_empty(),
            issues,
        }
    }
}

impl PickPlanner for PickListService {
    fn allocate(
        &self,
        product_id: Uuid,
        quantity_needed: i64,
        lots: &[InventoryLot],
    ) -> AllocationOutcome {
        self.engine.allocate(product_id, quantity_needed, lots)
    }

    fn build(
        &self,
        order_lines: &[OrderLine],
        lots: &[InventoryLot],
    ) -> Result<GeneratedPickList, ServiceError> {
        self.build_pick_list(order_lines, lots)
    }
}

/// Rejects malformed order lines before any allocation happens, so a bad
/// line never yields a partial pick list.
fn validate_order_lines(order_lines: &[OrderLine]) -> Result<(), ServiceError> {
    for (index, line) in order_lines.iter().enumerate() {
        if line.product_id.is_nil() {
            return Err(ServiceError::InvalidInput(format!(
                "order line {} ({}) has no product id",
                index + 1,
                line.product_sku
            )));
        }
        if line.quantity_requested < 0 {
            return Err(ServiceError::InvalidInput(format!(
                "order line {} ({}) has negative quantity {}",
                index + 1,
                line.product_sku,
                line.quantity_requested
            )));
        }
    }
    Ok(())
}

/// Orders allocations into a walking route: one warehouse at a time, its
/// locations in lexical order, then assigns 1-based sequence numbers.
fn sequence_records(mut records: Vec<AllocationRecord>) -> Vec<PickListEntry> {
    records.sort_by(|a, b| {
        a.warehouse_name
            .cmp(&b.warehouse_name)
            .then_with(|| a.location_code.cmp(&b.location_code))
    });
    records
        .into_iter()
        .zip(1u32..)
        .map(|(record, sequence)| PickListEntry::from_record(record, sequence))
        .collect()
}
