use pinocchio::{
    account_info::AccountInfo,
    instruction::{Seed, Signer},
    program_error::ProgramError,
    ProgramResult,
};
use pinocchio_token::state::TokenAccount;

use crate::{error::ErrorCode, state::AirdropState};

pub struct ClaimAccounts<'a> {
    pub airdrop_state: &'a AccountInfo,
    pub vault: &'a AccountInfo,
    pub destination: &'a AccountInfo,
    pub claimant: &'a AccountInfo,
}

impl<'a> TryFrom<&'a [AccountInfo]> for ClaimAccounts<'a> {
    type Error = ProgramError;

    fn try_from(value: &'a [AccountInfo]) -> Result<Self, Self::Error> {
        let [airdrop_state, vault, destination, claimant, ..] = value else {
            return Err(ProgramError::NotEnoughAccountKeys);
        };

        if !claimant.is_signer() {
            return Err(ProgramError::MissingRequiredSignature);
        }

        if !airdrop_state.is_owned_by(&crate::ID) {
            return Err(ProgramError::UninitializedAccount);
        }

        let vault_token_account = TokenAccount::from_account_info(vault)?;
        if vault_token_account.owner().ne(airdrop_state.key()) {
            return Err(ProgramError::InvalidAccountData);
        }

        let destination_token_account = TokenAccount::from_account_info(destination)?;
        if destination_token_account.owner().ne(claimant.key()) {
            return Err(ProgramError::InvalidAccountData);
        }

        Ok(Self {
            airdrop_state,
            vault,
            destination,
            claimant,
        })
    }
}

#[repr(C)]
pub struct ClaimInstructionData {
    pub amount: u64,    // 0..8 (little-endian)
    pub index: u64,     // 8..16
    pub proof_len: u16, // 16..18
}

impl<'a> TryFrom<&'a [u8]> for ClaimInstructionData {
    type Error = ProgramError;

    fn try_from(value: &'a [u8]) -> Result<Self, Self::Error> {
        if value.len() < 18 {
            return Err(ProgramError::InvalidInstructionData);
        }
        let amount = u64::from_le_bytes(value[0..8].try_into().unwrap());
        let index = u64::from_le_bytes(value[8..16].try_into().unwrap());
        let proof_len = u16::from_le_bytes(value[16..18].try_into().unwrap());
        Ok(Self {
            amount,
            index,
            proof_len,
        })
    }
}

impl ClaimInstructionData {
    /// Split instruction data into the fixed header and the trailing proof
    /// bytes. The buffer must contain exactly `proof_len` bytes after the
    /// header; anything shorter or longer is rejected.
    pub fn parse(data: &[u8]) -> Result<(Self, &[u8]), ProgramError> {
        let header = Self::try_from(data)?;
        let total_len = 18 + header.proof_len as usize;
        if data.len() != total_len {
            return Err(ProgramError::InvalidInstructionData);
        }
        Ok((header, &data[18..total_len]))
    }
}

pub struct Claim<'a> {
    pub accounts: ClaimAccounts<'a>,
    pub instruction_data: ClaimInstructionData,
    pub proof_bytes: &'a [u8],
}

impl<'a> TryFrom<(&'a [AccountInfo], &'a [u8])> for Claim<'a> {
    type Error = ProgramError;

    fn try_from(value: (&'a [AccountInfo], &'a [u8])) -> Result<Self, Self::Error> {
        let accounts: ClaimAccounts = value.0.try_into()?;
        let (instruction_data, proof_bytes) = ClaimInstructionData::parse(value.1)?;
        Ok(Self {
            accounts,
            instruction_data,
            proof_bytes,
        })
    }
}

impl<'a> Claim<'a> {
    pub const DISC: &'a u8 = &2;

    pub fn process(&mut self) -> ProgramResult {
        let (state, bitmap) = unsafe {
            AirdropState::unpack(self.accounts.airdrop_state.borrow_mut_data_unchecked())?
        };

        // The passed vault must be the one recorded at initialization
        if state.vault.ne(self.accounts.vault.key()) {
            return Err(ProgramError::InvalidAccountData);
        }

        // Proof check against the stored root, double-claim check against
        // the bitmap, then bookkeeping. A failure inside aborts the whole
        // instruction; the runtime rolls back every account mutation, so
        // there is no observable partial claim.
        state.process_claim(
            bitmap,
            self.accounts.claimant.key(),
            self.instruction_data.amount,
            self.proof_bytes,
            self.instruction_data.index,
        )?;

        pinocchio_log::log!("claim verified, index {}", self.instruction_data.index);

        // Should not trip if initialization funded the vault to
        // total_amount; surfaced as its own error rather than a raw token
        // program failure.
        {
            let vault = TokenAccount::from_account_info(self.accounts.vault)?;
            if vault.amount() < self.instruction_data.amount {
                return Err(ErrorCode::InsufficientVaultBalance.into());
            }
        }

        let bump = [state.bump];
        let state_seeds = [
            Seed::from(AirdropState::SEED),
            Seed::from(state.mint.as_ref()),
            Seed::from(state.authority.as_ref()),
            Seed::from(&bump[..]),
        ];
        let state_signer = Signer::from(&state_seeds[..]);

        pinocchio_token::instructions::Transfer {
            from: self.accounts.vault,
            to: self.accounts.destination,
            authority: self.accounts.airdrop_state,
            amount: self.instruction_data.amount,
        }
        .invoke_signed(&[state_signer])?;

        Ok(())
    }
}
