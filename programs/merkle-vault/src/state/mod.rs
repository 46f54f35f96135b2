//! State account definitions for the Merkle Vault

pub mod redeem_index;
pub mod schedule;
pub mod tracker;
pub mod vault;

pub use redeem_index::RedeemIndex;
pub use schedule::{MarkerScope, Schedule, ScheduleParams, ScheduleType, TrackingMode};
pub use tracker::{RedemptionBitmap, RedemptionTracker, Tracker};
pub use vault::{Ownership, Vault};
