//! Allocation leaves and their canonical encodings
//!
//! An allocation is committed as the Borsh encoding of an
//! encoding-specific parameter struct. Field order is part of the format:
//! reordering fields changes every leaf hash and invalidates published
//! roots and proofs.

use anchor_lang::prelude::*;

use crate::constants::NATIVE_MINT;
use crate::error::VaultError;
use crate::merkle::hash::hash_leaf;

/// Leaf encoding rule. Chosen by the schedule, never by the claimant.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeafEncoding {
    /// `index, address, receiving_amount, sending_amount`
    Legacy,
    /// `index, timestamp, address, receiving_amount, sending_amount`
    Timestamped,
    /// `index, address, receiving_token_mint, receiving_amount, sending_amount`
    MultiLegacy,
    /// `index, timestamp, address, receiving_token_mint, receiving_amount, sending_amount`
    MultiTimestamped,
    /// `"specific", index, timestamp, nft_mint, collection_mint, amounts`
    NftSpecific,
    /// `"collection", index, timestamp, NATIVE_MINT, collection_mint, amounts`
    NftCollection,
}

impl LeafEncoding {
    /// Tag mixed into the leaf hash so encodings never collide.
    pub const fn tag(self) -> u8 {
        match self {
            LeafEncoding::Legacy => 0,
            LeafEncoding::Timestamped => 1,
            LeafEncoding::MultiLegacy => 2,
            LeafEncoding::MultiTimestamped => 3,
            LeafEncoding::NftSpecific => 4,
            LeafEncoding::NftCollection => 5,
        }
    }
}

/// Who an allocation pays.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Beneficiary {
    /// A wallet that must sign the claim.
    Wallet(Pubkey),
    /// Whoever holds this exact NFT, which must sit in `collection`.
    Nft { mint: Pubkey, collection: Pubkey },
    /// Whoever holds any verified NFT of `collection`.
    Collection { collection: Pubkey },
}

/// One allocation entry of a schedule.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Allocation {
    /// Position in the tree and the sole idempotency key
    pub index: u16,
    /// Unlock time embedded in the leaf (ignored by legacy encodings)
    pub timestamp: i64,
    pub beneficiary: Beneficiary,
    /// Receiving mint, present only for multi-token schedules
    pub receiving_token_mint: Option<Pubkey>,
    pub receiving_amount: u64,
    pub sending_amount: u64,
}

#[derive(AnchorSerialize)]
struct RedemptionParams {
    index: u16,
    address: Pubkey,
    receiving_amount: u64,
    sending_amount: u64,
}

#[derive(AnchorSerialize)]
struct RedemptionParamsV2 {
    index: u16,
    timestamp: i64,
    address: Pubkey,
    receiving_amount: u64,
    sending_amount: u64,
}

#[derive(AnchorSerialize)]
struct RedemptionMultiParams {
    index: u16,
    address: Pubkey,
    receiving_token_mint: Pubkey,
    receiving_amount: u64,
    sending_amount: u64,
}

#[derive(AnchorSerialize)]
struct RedemptionMultiParamsV2 {
    index: u16,
    timestamp: i64,
    address: Pubkey,
    receiving_token_mint: Pubkey,
    receiving_amount: u64,
    sending_amount: u64,
}

#[derive(AnchorSerialize)]
struct RedemptionNftParams {
    redeem_type: String,
    index: u16,
    timestamp: i64,
    nft_mint: Pubkey,
    collection_mint: Pubkey,
    receiving_amount: u64,
    sending_amount: u64,
}

impl Allocation {
    /// Allocation paying a wallet.
    pub fn wallet(
        index: u16,
        timestamp: i64,
        address: Pubkey,
        receiving_amount: u64,
        sending_amount: u64,
    ) -> Self {
        Self {
            index,
            timestamp,
            beneficiary: Beneficiary::Wallet(address),
            receiving_token_mint: None,
            receiving_amount,
            sending_amount,
        }
    }

    /// Allocation paying the holder of a specific NFT.
    pub fn nft(
        index: u16,
        timestamp: i64,
        mint: Pubkey,
        collection: Pubkey,
        receiving_amount: u64,
        sending_amount: u64,
    ) -> Self {
        Self {
            index,
            timestamp,
            beneficiary: Beneficiary::Nft { mint, collection },
            receiving_token_mint: None,
            receiving_amount,
            sending_amount,
        }
    }

    /// Allocation paying any holder of a collection NFT.
    pub fn collection(
        index: u16,
        timestamp: i64,
        collection: Pubkey,
        receiving_amount: u64,
        sending_amount: u64,
    ) -> Self {
        Self {
            index,
            timestamp,
            beneficiary: Beneficiary::Collection { collection },
            receiving_token_mint: None,
            receiving_amount,
            sending_amount,
        }
    }

    /// Bind the receiving mint (multi-token schedules).
    pub fn with_receiving_mint(mut self, mint: Pubkey) -> Self {
        self.receiving_token_mint = Some(mint);
        self
    }

    /// Canonical leaf bytes under `encoding`.
    ///
    /// # Errors
    /// * `LeafMismatch` if the allocation's fields do not fit the encoding
    pub fn encode(&self, encoding: LeafEncoding) -> Result<Vec<u8>> {
        let mut data = Vec::with_capacity(128);
        let written = match (encoding, self.beneficiary, self.receiving_token_mint) {
            (LeafEncoding::Legacy, Beneficiary::Wallet(address), None) => RedemptionParams {
                index: self.index,
                address,
                receiving_amount: self.receiving_amount,
                sending_amount: self.sending_amount,
            }
            .serialize(&mut data),
            (LeafEncoding::Timestamped, Beneficiary::Wallet(address), None) => RedemptionParamsV2 {
                index: self.index,
                timestamp: self.timestamp,
                address,
                receiving_amount: self.receiving_amount,
                sending_amount: self.sending_amount,
            }
            .serialize(&mut data),
            (LeafEncoding::MultiLegacy, Beneficiary::Wallet(address), Some(mint)) => {
                RedemptionMultiParams {
                    index: self.index,
                    address,
                    receiving_token_mint: mint,
                    receiving_amount: self.receiving_amount,
                    sending_amount: self.sending_amount,
                }
                .serialize(&mut data)
            }
            (LeafEncoding::MultiTimestamped, Beneficiary::Wallet(address), Some(mint)) => {
                RedemptionMultiParamsV2 {
                    index: self.index,
                    timestamp: self.timestamp,
                    address,
                    receiving_token_mint: mint,
                    receiving_amount: self.receiving_amount,
                    sending_amount: self.sending_amount,
                }
                .serialize(&mut data)
            }
            (LeafEncoding::NftSpecific, Beneficiary::Nft { mint, collection }, None) => {
                RedemptionNftParams {
                    redeem_type: String::from("specific"),
                    index: self.index,
                    timestamp: self.timestamp,
                    nft_mint: mint,
                    collection_mint: collection,
                    receiving_amount: self.receiving_amount,
                    sending_amount: self.sending_amount,
                }
                .serialize(&mut data)
            }
            (LeafEncoding::NftCollection, Beneficiary::Collection { collection }, None) => {
                RedemptionNftParams {
                    redeem_type: String::from("collection"),
                    index: self.index,
                    timestamp: self.timestamp,
                    nft_mint: NATIVE_MINT,
                    collection_mint: collection,
                    receiving_amount: self.receiving_amount,
                    sending_amount: self.sending_amount,
                }
                .serialize(&mut data)
            }
            _ => return err!(VaultError::LeafMismatch),
        };
        written.map_err(|_| error!(VaultError::LeafMismatch))?;
        Ok(data)
    }

    /// Domain-separated leaf hash under `encoding`.
    pub fn leaf_hash(&self, encoding: LeafEncoding) -> Result<[u8; 32]> {
        let data = self.encode(encoding)?;
        Ok(hash_leaf(encoding.tag(), &data))
    }
}
