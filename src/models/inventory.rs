use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One physical batch of a product at one warehouse location.
///
/// `quantity_available` is the portion of the lot that may still be
/// allocated. The allocation engine only reads it; decrementing real
/// inventory is the persistence layer's job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InventoryLot {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_sku: String,
    pub product_name: String,
    pub location_id: Uuid,
    pub location_code: String,
    pub warehouse_id: Uuid,
    pub warehouse_name: String,
    /// Supplier/batch identifier, when the supplier provides one.
    pub lot_number: Option<String>,
    pub quantity_available: i64,
    /// Expiry date; absent for non-perishable products.
    pub best_before_date: Option<NaiveDate>,
    /// Arrival timestamp, used for FIFO/LIFO ordering when no expiry exists.
    pub received_at: DateTime<Utc>,
    pub status: LotStatus,
}

impl InventoryLot {
    /// Whether the lot may contribute stock to an allocation run.
    pub fn is_allocatable(&self) -> bool {
        self.status == LotStatus::Available && self.quantity_available > 0
    }
}

/// Lifecycle status of an inventory lot. Only `Available` lots are
/// eligible for allocation.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LotStatus {
    Available,
    Quarantine,
    Expired,
    Consumed,
}
