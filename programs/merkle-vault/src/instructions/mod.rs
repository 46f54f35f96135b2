//! Instruction handlers for the Merkle Vault

pub mod admin;
pub mod init_redeem_index;
pub mod redeem_token;
pub mod redeem_token_multi;
pub mod redeem_token_nft;
pub mod redeem_token_nft_collection;

pub use admin::*;
pub use init_redeem_index::*;
pub use redeem_token::*;
pub use redeem_token_multi::*;
pub use redeem_token_nft::*;
pub use redeem_token_nft_collection::*;
