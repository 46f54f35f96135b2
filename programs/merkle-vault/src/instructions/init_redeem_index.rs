//! Init Redeem Index Instruction
//!
//! Creates the marker account for one collection claim slot. Anyone may
//! pay for it. A second call for the same slot fails, so the account's
//! existence is itself the init-time idempotency flag.

use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Allocate, Assign, CreateAccount, Transfer};

use crate::constants::{REDEEM_INDEX_SEED, SCHEDULE_SEED};
use crate::error::VaultError;
use crate::events::RedeemIndexInitialized;
use crate::pda;
use crate::state::{RedeemIndex, Schedule, ScheduleType, Vault};

#[derive(Accounts)]
pub struct InitRedeemIndex<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    pub vault: Account<'info, Vault>,

    #[account(
        seeds = [SCHEDULE_SEED, schedule.event_id.to_le_bytes().as_ref()],
        bump = schedule.bump,
        constraint = schedule.vault_id == vault.key() @ VaultError::InvalidVault,
    )]
    pub schedule: Account<'info, Schedule>,

    /// CHECK: created in the handler at the verified derived address
    #[account(mut)]
    pub redeem_index: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<InitRedeemIndex>, index: u16, nft_mint: Pubkey) -> Result<()> {
    let schedule = &ctx.accounts.schedule;
    schedule.require_active()?;
    schedule.require_type(ScheduleType::NftCollectionDistribution)?;
    schedule.require_index(index)?;

    let marker_key = schedule.marker_key(&nft_mint);
    let (expected, bump) =
        pda::find_redeem_index_address(ctx.program_id, schedule.event_id, index, &marker_key);

    let redeem_index = ctx.accounts.redeem_index.to_account_info();
    pda::verify_address(redeem_index.key, &expected)?;
    RedeemIndex::require_vacant(&redeem_index, ctx.program_id)?;

    let event_seed = pda::event_id_seed(schedule.event_id);
    let index_seed = index.to_le_bytes();
    let bump_seed = [bump];
    let seeds: &[&[u8]] = &[
        REDEEM_INDEX_SEED,
        &event_seed,
        &index_seed,
        marker_key.as_ref(),
        &bump_seed,
    ];
    create_program_account(
        &ctx.accounts.payer.to_account_info(),
        &redeem_index,
        &ctx.accounts.system_program.to_account_info(),
        ctx.program_id,
        RedeemIndex::LEN,
        seeds,
    )?;

    let marker = RedeemIndex::new(bump, schedule.key(), index, marker_key);
    marker.store(&redeem_index)?;

    emit!(initialized_event(
        &marker,
        expected,
        nft_mint,
        Clock::get()?.unix_timestamp
    ));

    msg!("Redeem index {} initialized", index);
    Ok(())
}

/// The opening NFT is reported alongside the marker key, which is
/// `NATIVE_MINT` for per-index schedules.
fn initialized_event(
    marker: &RedeemIndex,
    address: Pubkey,
    nft_mint: Pubkey,
    timestamp: i64,
) -> RedeemIndexInitialized {
    RedeemIndexInitialized {
        schedule: marker.schedule,
        redeem_index: address,
        index: marker.index,
        nft_mint,
        marker_key: marker.nft_mint,
        timestamp,
    }
}

/// How a vacant marker address reaches its rent-exempt balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Funding {
    /// Nothing at the address: create it with `lamports`.
    Create { lamports: u64 },
    /// Someone already sent lamports there: add the shortfall, then
    /// allocate and assign.
    TopUp { lamports: u64 },
}

fn funding(current: u64, required: u64) -> Funding {
    if current == 0 {
        Funding::Create { lamports: required }
    } else {
        Funding::TopUp {
            lamports: required.saturating_sub(current),
        }
    }
}

/// Create a rent-exempt PDA owned by `owner`, topping up an account that
/// already holds lamports instead of failing on it.
fn create_program_account<'info>(
    payer: &AccountInfo<'info>,
    target: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    owner: &Pubkey,
    space: usize,
    seeds: &[&[u8]],
) -> Result<()> {
    let required = Rent::get()?.minimum_balance(space);
    let signer_seeds = &[seeds];

    let top_up = match funding(target.lamports(), required) {
        Funding::Create { lamports } => {
            let cpi_ctx = CpiContext::new_with_signer(
                system_program.clone(),
                CreateAccount {
                    from: payer.clone(),
                    to: target.clone(),
                },
                signer_seeds,
            );
            return system_program::create_account(cpi_ctx, lamports, space as u64, owner);
        }
        Funding::TopUp { lamports } => lamports,
    };

    if top_up > 0 {
        let cpi_ctx = CpiContext::new(
            system_program.clone(),
            Transfer {
                from: payer.clone(),
                to: target.clone(),
            },
        );
        system_program::transfer(cpi_ctx, top_up)?;
    }

    let cpi_ctx = CpiContext::new_with_signer(
        system_program.clone(),
        Allocate {
            account_to_allocate: target.clone(),
        },
        signer_seeds,
    );
    system_program::allocate(cpi_ctx, space as u64)?;

    let cpi_ctx = CpiContext::new_with_signer(
        system_program.clone(),
        Assign {
            account_to_assign: target.clone(),
        },
        signer_seeds,
    );
    system_program::assign(cpi_ctx, owner)
}
