//! Set Schedule Status Instruction

use anchor_lang::prelude::*;

use crate::constants::SCHEDULE_SEED;
use crate::error::VaultError;
use crate::events::ScheduleStatusChanged;
use crate::state::{Schedule, Vault};

#[derive(Accounts)]
pub struct SetScheduleStatus<'info> {
    pub admin: Signer<'info>,

    pub vault: Account<'info, Vault>,

    #[account(
        mut,
        seeds = [SCHEDULE_SEED, schedule.event_id.to_le_bytes().as_ref()],
        bump = schedule.bump,
        constraint = schedule.vault_id == vault.key() @ VaultError::InvalidVault,
    )]
    pub schedule: Account<'info, Schedule>,
}

pub fn handler(ctx: Context<SetScheduleStatus>, is_active: bool) -> Result<()> {
    let admin = ctx.accounts.admin.key();
    ctx.accounts.vault.require_admin(&admin)?;

    let schedule = &mut ctx.accounts.schedule;
    schedule.is_active = is_active;

    emit!(ScheduleStatusChanged {
        schedule: schedule.key(),
        admin,
        is_active,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!("Schedule {} active: {}", schedule.event_id, is_active);
    Ok(())
}
