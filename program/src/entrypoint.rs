use pinocchio::{
    account_info::AccountInfo, no_allocator, nostd_panic_handler, program_entrypoint,
    program_error::ProgramError, pubkey::Pubkey, ProgramResult,
};

use crate::instruction::{Claim, Initialize, UpdateRoot};

// This is the entrypoint for the program.
program_entrypoint!(process_instruction);
//Do not allocate memory.
no_allocator!();
// Use the no_std panic handler.
nostd_panic_handler!();

#[inline(always)]
fn process_instruction(
    _program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    match instruction_data.split_first() {
        Some((Initialize::DISC, instruction_data)) => {
            Initialize::try_from((accounts, instruction_data))?.process()
        }
        Some((UpdateRoot::DISC, instruction_data)) => {
            UpdateRoot::try_from((accounts, instruction_data))?.process()
        }
        Some((Claim::DISC, instruction_data)) => {
            Claim::try_from((accounts, instruction_data))?.process()
        }
        _ => Err(ProgramError::InvalidInstructionData),
    }
}
