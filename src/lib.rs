//! FEFO/FIFO batch allocation and pick-list generation for warehouse
//! order fulfillment.
//!
//! The crate is a pure, synchronous core: callers hand it fully-materialized
//! order lines and inventory lot snapshots, and get back a route-ordered
//! pick list plus shortfall warnings, shaped for an external save call.
//! Fetching orders, decrementing real inventory, and persisting pick lists
//! are boundary concerns that live outside this crate, as do cancellation
//! and timeouts (wrap the call at the boundary if you need them).
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod errors;
pub mod models;
pub mod services;

pub use config::{load_picking_config, PickingConfig, PickingConfigError};
pub use errors::ServiceError;
pub use models::{
    AllocationRecord, GeneratedPickList, InventoryLot, LotStatus, OrderLine, OrderType,
    PickList, PickListEntry, PickListValidation, PickOutcome, PickRequest, PickStatus,
    PickWarning, ShortfallWarning, ValidationIssue, WaveOrderShare, WaveOutcome, WavePick,
    WavePickRequest,
};
pub use services::allocation::{AllocationEngine, AllocationOutcome, AllocationPolicy};
pub use services::picking::{PickListService, PickPlanner};
