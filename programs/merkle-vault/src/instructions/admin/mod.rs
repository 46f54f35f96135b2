//! Admin Instructions for the Merkle Vault

pub mod create_schedule;
pub mod create_vault;
pub mod set_schedule_status;
pub mod set_vault;
pub mod transfer_ownership;
pub mod withdraw_sol;
pub mod withdraw_token;

pub use create_schedule::*;
pub use create_vault::*;
pub use set_schedule_status::*;
pub use set_vault::*;
pub use transfer_ownership::*;
pub use withdraw_sol::*;
pub use withdraw_token::*;
