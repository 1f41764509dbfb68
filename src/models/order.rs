use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One requested product/quantity pair within an order.
///
/// Lines are immutable once a pick-list generation run starts; the services
/// only read them. SKU and name ride along so shortfall warnings can name
/// the product even when no inventory matches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: Uuid,
    pub product_sku: String,
    pub product_name: String,
    pub quantity_requested: i64,
}

/// Enum representing the sales channel an order was placed through.
///
/// Wholesale orders prefer a single uninterrupted lot; retail orders split
/// freely across lots.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum OrderType {
    Wholesale,
    Retail,
}
