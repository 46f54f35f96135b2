//! Create Schedule Instruction
//!
//! Publishes a Merkle root for a vault. The root, type and assets are fixed
//! from here on; only `is_active` can change later.

use anchor_lang::prelude::*;

use crate::constants::SCHEDULE_SEED;
use crate::events::ScheduleCreated;
use crate::pda;
use crate::state::{MarkerScope, Schedule, ScheduleParams, ScheduleType, Vault};

#[derive(Accounts)]
#[instruction(user_count: u16, event_id: u64, timestamp: i64, merkle_root: [u8; 32], schedule_type: u8)]
pub struct CreateSchedule<'info> {
    /// Vault owner or admin; pays for the schedule
    #[account(mut)]
    pub admin: Signer<'info>,

    pub vault: Account<'info, Vault>,

    #[account(
        init,
        payer = admin,
        space = Schedule::space(Schedule::tracked_leaves(schedule_type, user_count)),
        seeds = [SCHEDULE_SEED, event_id.to_le_bytes().as_ref()],
        bump,
    )]
    pub schedule: Account<'info, Schedule>,

    pub system_program: Program<'info, System>,
}

#[allow(clippy::too_many_arguments)]
pub fn handler(
    ctx: Context<CreateSchedule>,
    user_count: u16,
    event_id: u64,
    timestamp: i64,
    merkle_root: [u8; 32],
    schedule_type: u8,
    receiving_token_mint: Pubkey,
    receiving_token_account: Pubkey,
    sending_token_mint: Pubkey,
    sending_token_account: Pubkey,
    marker_scope: MarkerScope,
) -> Result<()> {
    ctx.accounts.vault.require_admin(&ctx.accounts.admin.key())?;

    let params = ScheduleParams {
        event_id,
        user_count,
        unlock_timestamp: timestamp,
        merkle_root,
        schedule_type: ScheduleType::try_from(schedule_type)?,
        marker_scope,
        receiving_token_mint,
        receiving_token_account,
        sending_token_mint,
        sending_token_account,
    };

    let now = Clock::get()?.unix_timestamp;
    let vault_key = ctx.accounts.vault.key();
    let schedule_key = ctx.accounts.schedule.key();
    let (schedule_signer, _) = pda::find_schedule_signer_address(ctx.program_id, &schedule_key);

    let schedule = &mut ctx.accounts.schedule;
    schedule.initialize(vault_key, ctx.bumps.schedule, now, params)?;

    emit!(ScheduleCreated {
        vault: vault_key,
        schedule: schedule_key,
        schedule_signer,
        event_id,
        schedule_type,
        user_count,
        merkle_root,
        timestamp: now,
    });

    msg!("Schedule {} created with {} leaves", event_id, user_count);
    Ok(())
}
