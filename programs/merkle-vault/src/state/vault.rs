//! Vault account
//!
//! # Security Properties
//! - Ownership changes require a 2-step process (propose → accept)
//! - The owner is always an admin; the admin list is bounded and unique
//! - The custody signer is never stored, only its bump

use anchor_lang::prelude::*;

use crate::constants::MAX_ADMINS;
use crate::error::VaultError;

/// Ownership handshake state.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ownership {
    Owned { owner: Pubkey },
    PendingTransfer { owner: Pubkey, candidate: Pubkey },
}

impl Ownership {
    /// Serialized size of the largest variant.
    pub const LEN: usize = 1 + 32 + 32;

    pub fn owner(&self) -> Pubkey {
        match *self {
            Ownership::Owned { owner } | Ownership::PendingTransfer { owner, .. } => owner,
        }
    }

    pub fn candidate(&self) -> Option<Pubkey> {
        match *self {
            Ownership::Owned { .. } => None,
            Ownership::PendingTransfer { candidate, .. } => Some(candidate),
        }
    }

    /// Name `candidate` as the next owner. Replaces any earlier proposal.
    pub fn propose(&mut self, candidate: Pubkey) -> Result<()> {
        let owner = self.owner();
        require!(candidate != Pubkey::default(), VaultError::InvalidOwner);
        require!(candidate != owner, VaultError::InvalidOwner);
        *self = Ownership::PendingTransfer { owner, candidate };
        Ok(())
    }

    /// Complete the handshake. Returns the previous owner.
    pub fn accept(&mut self, acceptor: &Pubkey) -> Result<Pubkey> {
        match *self {
            Ownership::Owned { .. } => err!(VaultError::NoPendingTransfer),
            Ownership::PendingTransfer { owner, candidate } => {
                require_keys_eq!(*acceptor, candidate, VaultError::Unauthorized);
                *self = Ownership::Owned { owner: candidate };
                Ok(owner)
            }
        }
    }

    /// Drop the pending proposal. Returns the candidate that was dropped.
    pub fn cancel(&mut self) -> Result<Pubkey> {
        match *self {
            Ownership::Owned { .. } => err!(VaultError::NoPendingTransfer),
            Ownership::PendingTransfer { owner, candidate } => {
                *self = Ownership::Owned { owner };
                Ok(candidate)
            }
        }
    }
}

/// Custodial vault.
///
/// PDA Seeds: `[VAULT_SEED, sha256(vault_name)]`
#[account]
pub struct Vault {
    /// PDA bump seed
    pub bump: u8,

    /// Bump of the custody signer `[SIGNER_SEED, vault]`
    pub signer_nonce: u8,

    /// Current owner and any pending successor
    pub ownership: Ownership,

    /// Addresses allowed to manage schedules and custody
    pub admins: Vec<Pubkey>,
}

impl Vault {
    pub const LEN: usize = 8 // discriminator
        + 1                  // bump
        + 1                  // signer_nonce
        + Ownership::LEN     // ownership
        + 4 + 32 * MAX_ADMINS; // admins

    pub fn space() -> usize {
        Self::LEN
    }

    pub fn initialize(&mut self, owner: Pubkey, bump: u8, signer_nonce: u8) {
        self.bump = bump;
        self.signer_nonce = signer_nonce;
        self.ownership = Ownership::Owned { owner };
        self.admins = Vec::new();
    }

    #[inline]
    pub fn owner(&self) -> Pubkey {
        self.ownership.owner()
    }

    #[inline]
    pub fn require_owner(&self, user: &Pubkey) -> Result<()> {
        require_keys_eq!(*user, self.owner(), VaultError::Unauthorized);
        Ok(())
    }

    /// Owner or any listed admin.
    pub fn require_admin(&self, user: &Pubkey) -> Result<()> {
        if *user == self.owner() {
            return Ok(());
        }
        require!(self.admins.contains(user), VaultError::Unauthorized);
        Ok(())
    }

    /// Replace the admin set.
    pub fn set_admins(&mut self, admins: Vec<Pubkey>) -> Result<()> {
        require!(admins.len() <= MAX_ADMINS, VaultError::TooManyAdmins);
        for (i, admin) in admins.iter().enumerate() {
            require!(!admins[..i].contains(admin), VaultError::DuplicateAdmin);
        }
        self.admins = admins;
        Ok(())
    }
}
