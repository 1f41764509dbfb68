// Core models
pub mod inventory;
pub mod order;
pub mod pick;

pub use inventory::{InventoryLot, LotStatus};
pub use order::{OrderLine, OrderType};
pub use pick::{
    AllocationRecord, GeneratedPickList, PickList, PickListEntry, PickListValidation,
    PickOutcome, PickRequest, PickStatus, PickWarning, ShortfallWarning, ValidationIssue,
    WaveOrderShare, WaveOutcome, WavePick, WavePickRequest,
};
