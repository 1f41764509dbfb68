use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

use super::inventory::LotStatus;
use super::order::OrderType;

/// One (lot, quantity) pairing produced by the allocation engine for a
/// single order line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AllocationRecord {
    pub lot_id: Uuid,
    pub product_id: Uuid,
    pub product_sku: String,
    pub product_name: String,
    pub location_id: Uuid,
    pub location_code: String,
    pub warehouse_id: Uuid,
    pub warehouse_name: String,
    pub quantity_allocated: i64,
    pub lot_number: Option<String>,
    pub best_before_date: Option<NaiveDate>,
}

/// One finalized, sequenced instruction for a human picker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PickListEntry {
    /// 1-based position in the walking route, assigned after the global
    /// warehouse/location sort.
    pub sequence_number: u32,
    pub lot_id: Uuid,
    pub product_id: Uuid,
    pub product_sku: String,
    pub product_name: String,
    pub location_id: Uuid,
    pub location_code: String,
    pub warehouse_id: Uuid,
    pub warehouse_name: String,
    pub quantity_to_pick: i64,
    pub lot_number: Option<String>,
    pub best_before_date: Option<NaiveDate>,
}

impl PickListEntry {
    pub(crate) fn from_record(record: AllocationRecord, sequence_number: u32) -> Self {
        Self {
            sequence_number,
            lot_id: record.lot_id,
            product_id: record.product_id,
            product_sku: record.product_sku,
            product_name: record.product_name,
            location_id: record.location_id,
            location_code: record.location_code,
            warehouse_id: record.warehouse_id,
            warehouse_name: record.warehouse_name,
            quantity_to_pick: record.quantity_allocated,
            lot_number: record.lot_number,
            best_before_date: record.best_before_date,
        }
    }
}

/// Enum representing the possible statuses of a pick list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl fmt::Display for PickStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickStatus::Pending => write!(f, "Pending"),
            PickStatus::InProgress => write!(f, "In Progress"),
            PickStatus::Completed => write!(f, "Completed"),
            PickStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Persistence-shaped pick list for one order, as handed to the external
/// save operation. The save assigns permanent identity; until then the
/// whole structure exists only in memory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PickList {
    pub order_id: Uuid,
    pub status: PickStatus,
    pub entries: Vec<PickListEntry>,
}

/// A product for which requested quantity could not be fully allocated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortfallWarning {
    pub product_id: Uuid,
    pub product_sku: String,
    pub quantity_requested: i64,
    pub quantity_allocated: i64,
    pub shortfall: i64,
}

impl fmt::Display for ShortfallWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: Short {} units (only {} available)",
            self.product_sku, self.shortfall, self.quantity_allocated
        )
    }
}

/// Non-fatal advisories raised while generating a pick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PickWarning {
    Shortfall(ShortfallWarning),
    NoStock { product_id: Uuid },
    PreferredWarehouseEmpty { warehouse_id: Uuid },
    ExpiringSoon { lot_count: usize, window_days: i64 },
    WholesaleSplit,
}

impl fmt::Display for PickWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickWarning::Shortfall(shortfall) => shortfall.fmt(f),
            PickWarning::NoStock { product_id } => {
                write!(f, "No available inventory for product {product_id}")
            }
            PickWarning::PreferredWarehouseEmpty { warehouse_id } => write!(
                f,
                "Preferred warehouse {warehouse_id} has no available inventory. Using other warehouses."
            ),
            PickWarning::ExpiringSoon {
                lot_count,
                window_days,
            } => write!(
                f,
                "{lot_count} lot(s) expiring within {window_days} days will be picked first"
            ),
            PickWarning::WholesaleSplit => write!(
                f,
                "Wholesale order cannot be fulfilled from a single lot. Using multiple lots."
            ),
        }
    }
}

/// Single-product pick request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickRequest {
    pub product_id: Uuid,
    pub quantity_needed: i64,
    pub order_type: OrderType,
    /// Restrict picking to this warehouse when it has eligible stock.
    pub preferred_warehouse_id: Option<Uuid>,
}

/// Result of a single-product pick run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PickOutcome {
    pub pick_list: Vec<PickListEntry>,
    pub total_picked: i64,
    pub shortfall: i64,
    pub fully_allocated: bool,
    pub warnings: Vec<PickWarning>,
}

/// Result of driving the allocation engine across every line of an order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPickList {
    pub entries: Vec<PickListEntry>,
    pub warnings: Vec<ShortfallWarning>,
    pub total_picked: i64,
    pub shortfall: i64,
}

impl GeneratedPickList {
    pub fn fully_allocated(&self) -> bool {
        self.shortfall == 0
    }

    /// Shapes the run for the external persistence call.
    pub fn into_pick_list(self, order_id: Uuid) -> PickList {
        PickList {
            order_id,
            status: PickStatus::Pending,
            entries: self.entries,
        }
    }
}

/// One order's demand line inside a picking wave.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct WavePickRequest {
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity_needed: i64,
    pub order_type: OrderType,
    /// 1 = highest priority.
    #[validate(range(min = 1))]
    pub priority: i32,
}

/// One lot visit inside a wave, merged across the orders it serves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WavePick {
    pub sequence_number: u32,
    pub lot_id: Uuid,
    pub product_id: Uuid,
    pub product_sku: String,
    pub location_code: String,
    pub warehouse_name: String,
    pub quantity_to_pick: i64,
    pub orders: Vec<WaveOrderShare>,
}

/// Portion of a wave pick owed to one order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveOrderShare {
    pub order_id: Uuid,
    pub quantity: i64,
}

/// Result of building a wave across multiple orders.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveOutcome {
    pub picks: Vec<WavePick>,
    pub warnings: Vec<ShortfallWarning>,
}

/// One problem found when checking a pick list against a fresh inventory
/// snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    LotNotFound {
        lot_id: Uuid,
        product_sku: String,
    },
    InsufficientQuantity {
        location_code: String,
        needed: i64,
        available: i64,
    },
    LotNotAvailable {
        location_code: String,
        status: LotStatus,
    },
    LotExpired {
        location_code: String,
        expired_on: NaiveDate,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::LotNotFound {
                lot_id,
                product_sku,
            } => write!(f, "Inventory lot {lot_id} not found for {product_sku}"),
            ValidationIssue::InsufficientQuantity {
                location_code,
                needed,
                available,
            } => write!(
                f,
                "Insufficient quantity at {location_code}: Need {needed}, available {available}"
            ),
            ValidationIssue::LotNotAvailable {
                location_code,
                status,
            } => write!(f, "Inventory at {location_code} is {status}, not AVAILABLE"),
            ValidationIssue::LotExpired {
                location_code,
                expired_on,
            } => write!(f, "Lot at {location_code} expired on {expired_on}"),
        }
    }
}

/// Outcome of validating a pick list before execution. Issues are advisory
/// data for the caller, not errors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PickListValidation {
    pub valid: bool,
    pub issues: Vec<ValidationIssue>,
}
