//! Asset movement for payouts and custody withdrawals
//!
//! Lamport legs go through the system program, token legs through SPL
//! Token. Outbound legs are signed by the vault custody signer.

use anchor_lang::prelude::*;
use anchor_lang::system_program;
use anchor_spl::token::{self, TokenAccount, Transfer};

use crate::error::VaultError;
use crate::pda;
use crate::redemption::{Asset, Leg, Payout};

/// Decode an SPL token account, rejecting anything the token program
/// does not own.
pub fn load_token_account(info: &AccountInfo) -> Result<TokenAccount> {
    require_keys_eq!(*info.owner, token::ID, VaultError::InvalidTokenAccount);
    let data = info.try_borrow_data()?;
    TokenAccount::try_deserialize(&mut &data[..]).map_err(|_| error!(VaultError::InvalidTokenAccount))
}

/// Source account can pay `amount` of `mint` under `authority`.
pub fn check_source(
    account: &TokenAccount,
    mint: &Pubkey,
    authority: &Pubkey,
    amount: u64,
) -> Result<()> {
    require_keys_eq!(account.mint, *mint, VaultError::InvalidMint);
    require_keys_eq!(account.owner, *authority, VaultError::InvalidTokenAccount);
    require!(account.amount >= amount, VaultError::InsufficientVaultBalance);
    Ok(())
}

/// Vault custody signer: who it is and how it signs.
pub struct Custody<'a, 'info> {
    pub vault: Pubkey,
    pub signer_nonce: u8,
    pub signer: &'a AccountInfo<'info>,
}

impl<'a, 'info> Custody<'a, 'info> {
    /// Lamports from the custody signer to `recipient`.
    pub fn pay_native(
        &self,
        system_program: &AccountInfo<'info>,
        recipient: &AccountInfo<'info>,
        amount: u64,
    ) -> Result<()> {
        self.signer
            .lamports()
            .checked_sub(amount)
            .ok_or(error!(VaultError::InsufficientVaultBalance))?;
        recipient
            .lamports()
            .checked_add(amount)
            .ok_or(error!(VaultError::ArithmeticOverflow))?;
        let bump = [self.signer_nonce];
        let seeds = pda::vault_signer_seeds(&self.vault, &bump);
        let signer_seeds = &[&seeds[..]];

        let cpi_ctx = CpiContext::new_with_signer(
            system_program.clone(),
            system_program::Transfer {
                from: self.signer.clone(),
                to: recipient.clone(),
            },
            signer_seeds,
        );
        system_program::transfer(cpi_ctx, amount)
    }

    /// Tokens from a custody-owned account to `destination`.
    pub fn pay_token(
        &self,
        token_program: &AccountInfo<'info>,
        source: &AccountInfo<'info>,
        destination: &AccountInfo<'info>,
        mint: &Pubkey,
        amount: u64,
    ) -> Result<()> {
        let source_account = load_token_account(source)?;
        check_source(&source_account, mint, self.signer.key, amount)?;
        let destination_account = load_token_account(destination)?;
        require_keys_eq!(destination_account.mint, *mint, VaultError::InvalidMint);

        let bump = [self.signer_nonce];
        let seeds = pda::vault_signer_seeds(&self.vault, &bump);
        let signer_seeds = &[&seeds[..]];

        let cpi_ctx = CpiContext::new_with_signer(
            token_program.clone(),
            Transfer {
                from: source.clone(),
                to: destination.clone(),
                authority: self.signer.clone(),
            },
            signer_seeds,
        );
        token::transfer(cpi_ctx, amount)
    }
}

/// Accounts a redeem instruction supplies for its payout.
pub struct PayoutAccounts<'a, 'info> {
    pub custody: Custody<'a, 'info>,
    /// Custody token account for the receiving leg
    pub vault_token_account: &'a AccountInfo<'info>,
    /// Claimant; signs the sending leg
    pub user: &'a AccountInfo<'info>,
    /// Claimant token account for the receiving leg
    pub user_token_account: &'a AccountInfo<'info>,
    /// Remaining accounts: `[fee_destination, fee_source]`
    pub fee_accounts: &'a [AccountInfo<'info>],
    pub token_program: &'a AccountInfo<'info>,
    pub system_program: &'a AccountInfo<'info>,
}

impl<'a, 'info> PayoutAccounts<'a, 'info> {
    /// Move both legs. `fee_destination` is the schedule's sending account.
    pub fn execute(&self, payout: &Payout, fee_destination: &Pubkey) -> Result<()> {
        if let Some(sending) = payout.sending {
            self.collect(&sending, fee_destination)?;
        }
        self.pay(&payout.receiving)
    }

    fn pay(&self, leg: &Leg) -> Result<()> {
        if leg.amount == 0 {
            return Ok(());
        }
        match leg.asset {
            Asset::Native => {
                self.custody
                    .pay_native(self.system_program, self.user, leg.amount)
            }
            Asset::Token(mint) => self.custody.pay_token(
                self.token_program,
                self.vault_token_account,
                self.user_token_account,
                &mint,
                leg.amount,
            ),
        }
    }

    fn collect(&self, leg: &Leg, fee_destination: &Pubkey) -> Result<()> {
        let destination = self
            .fee_accounts
            .first()
            .ok_or(VaultError::MissingFeeAccount)?;
        require_keys_eq!(*destination.key, *fee_destination, VaultError::InvalidAccount);

        match leg.asset {
            Asset::Native => {
                let cpi_ctx = CpiContext::new(
                    self.system_program.clone(),
                    system_program::Transfer {
                        from: self.user.clone(),
                        to: destination.clone(),
                    },
                );
                system_program::transfer(cpi_ctx, leg.amount)
            }
            Asset::Token(mint) => {
                let source = self
                    .fee_accounts
                    .get(1)
                    .ok_or(VaultError::MissingFeeAccount)?;
                let source_account = load_token_account(source)?;
                require_keys_eq!(source_account.mint, mint, VaultError::InvalidMint);
                let destination_account = load_token_account(destination)?;
                require_keys_eq!(destination_account.mint, mint, VaultError::InvalidMint);

                let cpi_ctx = CpiContext::new(
                    self.token_program.clone(),
                    Transfer {
                        from: source.clone(),
                        to: destination.clone(),
                        authority: self.user.clone(),
                    },
                );
                token::transfer(cpi_ctx, leg.amount)
            }
        }
    }
}
