//! In-memory program harness for unit and scenario tests
//!
//! `Ledger` keeps program accounts in an arena keyed by derived address and
//! drives the same state methods and claim processing as the instruction
//! handlers. Balances are tracked per `(owner, mint)`, lamports under
//! `NATIVE_MINT`. Every instruction runs against a snapshot and is rolled
//! back on error, as a failed transaction would be.

use std::collections::HashMap;
use std::fmt::Debug;

use anchor_lang::prelude::*;
use anchor_spl::metadata::mpl_token_metadata::types::Collection;
use anchor_spl::token::spl_token::state::{Account as SplAccount, AccountState};
use solana_program::program_pack::Pack;

use crate::constants::NATIVE_MINT;
use crate::error::VaultError;
use crate::merkle::{Allocation, ProofNode};
use crate::nft;
use crate::pda;
use crate::redemption::{process_claim, Leg, Payout};
use crate::state::{
    RedeemIndex, Schedule, ScheduleParams, ScheduleType, TrackingMode, Vault,
};

/// Anchor error code carried by `err`, if it is a program error.
pub fn error_code(err: &Error) -> Option<u32> {
    match err {
        Error::AnchorError(anchor_error) => Some(anchor_error.error_code_number),
        Error::ProgramError(_) => None,
    }
}

/// Assert `result` failed with `expected`.
#[track_caller]
pub fn assert_vault_err<T: Debug>(result: Result<T>, expected: VaultError) {
    match result {
        Ok(value) => panic!("expected {expected:?}, got Ok({value:?})"),
        Err(err) => assert_eq!(
            error_code(&err),
            Some(u32::from(expected)),
            "expected {expected:?}, got {err:?}"
        ),
    }
}

/// Packed SPL token account data.
pub fn packed_token_account(mint: &Pubkey, owner: &Pubkey, amount: u64) -> Vec<u8> {
    let account = SplAccount {
        mint: *mint,
        owner: *owner,
        amount,
        state: AccountState::Initialized,
        ..SplAccount::default()
    };
    let mut data = vec![0u8; SplAccount::LEN];
    SplAccount::pack(account, &mut data).unwrap();
    data
}

#[derive(Clone)]
enum Record {
    Vault(Vault),
    Schedule(Schedule),
    RedeemIndex(RedeemIndex),
}

#[derive(Clone)]
struct NftRecord {
    holder: Pubkey,
    amount: u64,
    collection: Option<Collection>,
}

#[derive(Clone, Default)]
struct State {
    index: HashMap<Pubkey, usize>,
    records: Vec<Record>,
    balances: HashMap<(Pubkey, Pubkey), u64>,
    nfts: HashMap<Pubkey, NftRecord>,
}

pub struct Ledger {
    pub program_id: Pubkey,
    /// Cluster clock
    pub now: i64,
    state: State,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            program_id: crate::ID,
            now: 1_700_000_000,
            state: State::default(),
        }
    }

    /// Run `f` as one transaction.
    fn atomic<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let snapshot = self.state.clone();
        let result = f(self);
        if result.is_err() {
            self.state = snapshot;
        }
        result
    }

    fn create(&mut self, address: Pubkey, record: Record) -> Result<()> {
        require!(
            !self.state.index.contains_key(&address),
            VaultError::AccountAlreadyExists
        );
        self.state.index.insert(address, self.state.records.len());
        self.state.records.push(record);
        Ok(())
    }

    fn record_mut(&mut self, address: &Pubkey) -> Result<&mut Record> {
        let slot = *self
            .state
            .index
            .get(address)
            .ok_or(VaultError::InvalidAccount)?;
        Ok(&mut self.state.records[slot])
    }

    pub fn vault(&self, address: &Pubkey) -> Option<&Vault> {
        match self.state.records.get(*self.state.index.get(address)?)? {
            Record::Vault(vault) => Some(vault),
            _ => None,
        }
    }

    pub fn schedule(&self, address: &Pubkey) -> Option<&Schedule> {
        match self.state.records.get(*self.state.index.get(address)?)? {
            Record::Schedule(schedule) => Some(schedule),
            _ => None,
        }
    }

    pub fn redeem_index(&self, address: &Pubkey) -> Option<&RedeemIndex> {
        match self.state.records.get(*self.state.index.get(address)?)? {
            Record::RedeemIndex(marker) => Some(marker),
            _ => None,
        }
    }

    fn vault_mut(&mut self, address: &Pubkey) -> Result<&mut Vault> {
        match self.record_mut(address)? {
            Record::Vault(vault) => Ok(vault),
            _ => err!(VaultError::InvalidAccount),
        }
    }

    fn schedule_mut(&mut self, address: &Pubkey) -> Result<&mut Schedule> {
        match self.record_mut(address)? {
            Record::Schedule(schedule) => Ok(schedule),
            _ => err!(VaultError::InvalidAccount),
        }
    }

    // ---------------------------------------------------------------
    // Balances and NFTs
    // ---------------------------------------------------------------

    pub fn balance(&self, owner: &Pubkey, mint: &Pubkey) -> u64 {
        self.state.balances.get(&(*owner, *mint)).copied().unwrap_or(0)
    }

    pub fn fund(&mut self, owner: &Pubkey, mint: &Pubkey, amount: u64) {
        *self.state.balances.entry((*owner, *mint)).or_insert(0) += amount;
    }

    fn move_asset(&mut self, from: &Pubkey, to: &Pubkey, mint: &Pubkey, amount: u64) -> Result<()> {
        let source = self.balance(from, mint);
        require!(source >= amount, VaultError::InsufficientVaultBalance);
        self.state.balances.insert((*from, *mint), source - amount);
        let destination = self
            .balance(to, mint)
            .checked_add(amount)
            .ok_or(VaultError::ArithmeticOverflow)?;
        self.state.balances.insert((*to, *mint), destination);
        Ok(())
    }

    /// Mint a fresh NFT to `holder`, optionally inside `collection`.
    pub fn mint_nft(&mut self, holder: &Pubkey, collection: Option<(Pubkey, bool)>) -> Pubkey {
        let mint = Pubkey::new_unique();
        self.state.nfts.insert(
            mint,
            NftRecord {
                holder: *holder,
                amount: 1,
                collection: collection.map(|(key, verified)| Collection { verified, key }),
            },
        );
        mint
    }

    pub fn transfer_nft(&mut self, mint: &Pubkey, to: &Pubkey) {
        if let Some(nft) = self.state.nfts.get_mut(mint) {
            nft.holder = *to;
        }
    }

    /// Custody signer of `vault`.
    pub fn vault_signer(&self, vault: &Pubkey) -> Pubkey {
        pda::find_vault_signer_address(&self.program_id, vault).0
    }

    // ---------------------------------------------------------------
    // Admin instructions
    // ---------------------------------------------------------------

    pub fn create_vault(&mut self, owner: &Pubkey, name: &str) -> Result<Pubkey> {
        let path = pda::vault_derivation_path(name);
        let program_id = self.program_id;
        self.atomic(|ledger| {
            let (address, bump) = pda::find_vault_address(&program_id, &path);
            let (_, signer_nonce) = pda::find_vault_signer_address(&program_id, &address);
            let mut vault = Vault {
                bump: 0,
                signer_nonce: 0,
                ownership: crate::state::Ownership::Owned { owner: *owner },
                admins: Vec::new(),
            };
            vault.initialize(*owner, bump, signer_nonce);
            ledger.create(address, Record::Vault(vault))?;
            Ok(address)
        })
    }

    pub fn set_vault(&mut self, caller: &Pubkey, vault: &Pubkey, admins: Vec<Pubkey>) -> Result<()> {
        self.atomic(|ledger| {
            let vault = ledger.vault_mut(vault)?;
            vault.require_owner(caller)?;
            vault.set_admins(admins)
        })
    }

    pub fn transfer_ownership(&mut self, caller: &Pubkey, vault: &Pubkey, new_owner: &Pubkey) -> Result<()> {
        self.atomic(|ledger| {
            let vault = ledger.vault_mut(vault)?;
            vault.require_owner(caller)?;
            vault.ownership.propose(*new_owner)
        })
    }

    pub fn accept_ownership(&mut self, caller: &Pubkey, vault: &Pubkey) -> Result<()> {
        self.atomic(|ledger| {
            ledger.vault_mut(vault)?.ownership.accept(caller)?;
            Ok(())
        })
    }

    pub fn cancel_ownership_transfer(&mut self, caller: &Pubkey, vault: &Pubkey) -> Result<()> {
        self.atomic(|ledger| {
            let vault = ledger.vault_mut(vault)?;
            vault.require_owner(caller)?;
            vault.ownership.cancel()?;
            Ok(())
        })
    }

    pub fn create_schedule(
        &mut self,
        caller: &Pubkey,
        vault: &Pubkey,
        params: ScheduleParams,
    ) -> Result<Pubkey> {
        let program_id = self.program_id;
        let now = self.now;
        self.atomic(|ledger| {
            ledger.vault_mut(vault)?.require_admin(caller)?;
            let (address, bump) = pda::find_schedule_address(&program_id, params.event_id);
            let mut schedule = blank_schedule();
            schedule.initialize(*vault, bump, now, params)?;
            ledger.create(address, Record::Schedule(schedule))?;
            Ok(address)
        })
    }

    pub fn set_schedule_status(
        &mut self,
        caller: &Pubkey,
        vault: &Pubkey,
        schedule: &Pubkey,
        is_active: bool,
    ) -> Result<()> {
        self.atomic(|ledger| {
            ledger.vault_mut(vault)?.require_admin(caller)?;
            let schedule = ledger.schedule_mut(schedule)?;
            require_keys_eq!(schedule.vault_id, *vault, VaultError::InvalidVault);
            schedule.is_active = is_active;
            Ok(())
        })
    }

    pub fn withdraw(
        &mut self,
        caller: &Pubkey,
        vault: &Pubkey,
        mint: &Pubkey,
        recipient: &Pubkey,
        amount: u64,
    ) -> Result<()> {
        let signer = self.vault_signer(vault);
        self.atomic(|ledger| {
            ledger.vault_mut(vault)?.require_admin(caller)?;
            require!(amount > 0, VaultError::InvalidAmount);
            ledger.move_asset(&signer, recipient, mint, amount)
        })
    }

    // ---------------------------------------------------------------
    // Claim instructions
    // ---------------------------------------------------------------

    pub fn init_redeem_index(
        &mut self,
        schedule: &Pubkey,
        index: u16,
        nft_mint: &Pubkey,
    ) -> Result<Pubkey> {
        let program_id = self.program_id;
        self.atomic(|ledger| {
            let schedule_state = ledger
                .schedule(schedule)
                .ok_or(VaultError::InvalidAccount)?;
            schedule_state.require_active()?;
            schedule_state.require_type(ScheduleType::NftCollectionDistribution)?;
            schedule_state.require_index(index)?;
            let marker_key = schedule_state.marker_key(nft_mint);
            let (address, bump) = pda::find_redeem_index_address(
                &program_id,
                schedule_state.event_id,
                index,
                &marker_key,
            );
            let marker = RedeemIndex::new(bump, *schedule, index, marker_key);
            ledger.create(address, Record::RedeemIndex(marker))?;
            Ok(address)
        })
    }

    pub fn redeem_token(
        &mut self,
        user: &Pubkey,
        schedule: &Pubkey,
        index: u16,
        timestamp: i64,
        proofs: &[ProofNode],
        receiving_amount: u64,
        sending_amount: u64,
    ) -> Result<Payout> {
        let allocation = Allocation::wallet(index, timestamp, *user, receiving_amount, sending_amount);
        self.redeem(user, schedule, ScheduleType::Distribution, &allocation, proofs, None)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn redeem_token_multi(
        &mut self,
        user: &Pubkey,
        schedule: &Pubkey,
        index: u16,
        timestamp: i64,
        proofs: &[ProofNode],
        receiving_token_mint: &Pubkey,
        receiving_amount: u64,
        sending_amount: u64,
    ) -> Result<Payout> {
        let allocation = Allocation::wallet(index, timestamp, *user, receiving_amount, sending_amount)
            .with_receiving_mint(*receiving_token_mint);
        self.redeem(user, schedule, ScheduleType::DistributionMulti, &allocation, proofs, None)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn redeem_token_nft(
        &mut self,
        user: &Pubkey,
        schedule: &Pubkey,
        index: u16,
        timestamp: i64,
        nft_mint: &Pubkey,
        nft_collection: &Pubkey,
        receiving_amount: u64,
        sending_amount: u64,
        proofs: &[ProofNode],
    ) -> Result<Payout> {
        let allocation = Allocation::nft(
            index,
            timestamp,
            *nft_mint,
            *nft_collection,
            receiving_amount,
            sending_amount,
        );
        self.redeem(
            user,
            schedule,
            ScheduleType::NftDistribution,
            &allocation,
            proofs,
            Some((*nft_mint, *nft_collection)),
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn redeem_token_nft_collection(
        &mut self,
        user: &Pubkey,
        schedule: &Pubkey,
        index: u16,
        timestamp: i64,
        nft_mint: &Pubkey,
        nft_collection: &Pubkey,
        receiving_amount: u64,
        sending_amount: u64,
        proofs: &[ProofNode],
    ) -> Result<Payout> {
        let allocation = Allocation::collection(
            index,
            timestamp,
            *nft_collection,
            receiving_amount,
            sending_amount,
        );
        self.redeem(
            user,
            schedule,
            ScheduleType::NftCollectionDistribution,
            &allocation,
            proofs,
            Some((*nft_mint, *nft_collection)),
        )
    }

    fn verify_nft(&self, user: &Pubkey, nft_mint: &Pubkey, collection: &Pubkey) -> Result<()> {
        let record = self
            .state
            .nfts
            .get(nft_mint)
            .ok_or(VaultError::InvalidTokenAccount)?;
        nft::verify_holding(user, nft_mint, &record.holder, nft_mint, record.amount)?;
        nft::verify_collection(record.collection.as_ref(), collection)
    }

    fn redeem(
        &mut self,
        user: &Pubkey,
        schedule_address: &Pubkey,
        expected_type: ScheduleType,
        allocation: &Allocation,
        proofs: &[ProofNode],
        nft_claim: Option<(Pubkey, Pubkey)>,
    ) -> Result<Payout> {
        let program_id = self.program_id;
        let now = self.now;
        self.atomic(|ledger| {
            if let Some((nft_mint, collection)) = nft_claim {
                ledger.verify_nft(user, &nft_mint, &collection)?;
            }

            let mut schedule = ledger
                .schedule(schedule_address)
                .cloned()
                .ok_or(VaultError::InvalidAccount)?;

            let mut marker = match schedule.schedule_type.tracking_mode() {
                TrackingMode::Bitmap => None,
                TrackingMode::MarkerAccount => {
                    let nft_mint = nft_claim.map(|(mint, _)| mint).unwrap_or(NATIVE_MINT);
                    let marker_key = schedule.marker_key(&nft_mint);
                    let (address, _) = pda::find_redeem_index_address(
                        &program_id,
                        schedule.event_id,
                        allocation.index,
                        &marker_key,
                    );
                    ledger
                        .redeem_index(&address)
                        .cloned()
                        .map(|marker| (address, marker))
                }
            };

            let payout = process_claim(
                &mut schedule,
                marker.as_mut().map(|(_, marker)| marker),
                expected_type,
                allocation,
                proofs,
                now,
            )?;

            let signer = ledger.vault_signer(&schedule.vault_id);
            if let Some(Leg { asset, amount }) = payout.sending {
                ledger.move_asset(user, &schedule.sending_token_account, &asset.mint(), amount)?;
            }
            ledger.move_asset(&signer, user, &payout.receiving.asset.mint(), payout.receiving.amount)?;

            *ledger.schedule_mut(schedule_address)? = schedule;
            if let Some((address, updated)) = marker {
                *ledger.record_mut(&address)? = Record::RedeemIndex(updated);
            }
            Ok(payout)
        })
    }
}

/// Zeroed schedule ready for `Schedule::initialize`.
pub fn blank_schedule() -> Schedule {
    Schedule {
        bump: 0,
        vault_id: Pubkey::default(),
        event_id: 0,
        created_at: 0,
        unlock_timestamp: 0,
        merkle_root: [0u8; 32],
        schedule_type: ScheduleType::Distribution,
        marker_scope: Default::default(),
        receiving_token_mint: Pubkey::default(),
        receiving_token_account: Pubkey::default(),
        sending_token_mint: Pubkey::default(),
        sending_token_account: Pubkey::default(),
        is_active: false,
        user_count: 0,
        redemptions: Default::default(),
    }
}
