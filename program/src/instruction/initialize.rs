use pinocchio::{
    account_info::AccountInfo,
    instruction::{Seed, Signer},
    program_error::ProgramError,
    sysvars::{rent::Rent, Sysvar},
    ProgramResult,
};
use pinocchio_system::instructions::CreateAccount;
use pinocchio_token::state::TokenAccount;

use crate::{error::ErrorCode, state::AirdropState};

pub struct InitializeAccounts<'a> {
    pub airdrop_state: &'a AccountInfo,
    pub mint: &'a AccountInfo,
    pub vault: &'a AccountInfo,
    pub authority: &'a AccountInfo,
}

impl<'a> TryFrom<&'a [AccountInfo]> for InitializeAccounts<'a> {
    type Error = ProgramError;

    fn try_from(value: &'a [AccountInfo]) -> Result<Self, Self::Error> {
        let [airdrop_state, mint, vault, authority, ..] = value else {
            return Err(ProgramError::NotEnoughAccountKeys);
        };

        // Authority must be a signer
        if !authority.is_signer() {
            return Err(ProgramError::MissingRequiredSignature);
        }

        // No re-initialization: the state account must still be system-owned
        // with no data
        if !airdrop_state.is_owned_by(&pinocchio_system::ID) || airdrop_state.data_len() != 0 {
            return Err(ProgramError::AccountAlreadyInitialized);
        }

        // Vault must hold the distributed mint and be controlled by the
        // state PDA
        // We expect the token account to be initialized on the client side
        let vault_token_account = TokenAccount::from_account_info(vault)?;
        if vault_token_account.mint().ne(mint.key()) {
            return Err(ProgramError::InvalidAccountData);
        }
        if vault_token_account.owner().ne(airdrop_state.key()) {
            return Err(ProgramError::InvalidAccountData);
        }

        Ok(Self {
            airdrop_state,
            mint,
            vault,
            authority,
        })
    }
}

#[repr(C)]
pub struct InitializeInstructionData {
    pub root: [u8; 32],     // 0..32
    pub total_amount: u64,  // 32..40 (little-endian)
    pub max_num_nodes: u64, // 40..48
    pub num_nodes: u64,     // 48..56
    pub bump: u8,           // 56
}

impl<'a> TryFrom<&'a [u8]> for InitializeInstructionData {
    type Error = ProgramError;

    fn try_from(value: &'a [u8]) -> Result<Self, Self::Error> {
        if value.len() != 57 {
            return Err(ProgramError::InvalidInstructionData);
        }
        let root: [u8; 32] = value[0..32].try_into().unwrap();
        let total_amount = u64::from_le_bytes(value[32..40].try_into().unwrap());
        let max_num_nodes = u64::from_le_bytes(value[40..48].try_into().unwrap());
        let num_nodes = u64::from_le_bytes(value[48..56].try_into().unwrap());
        let bump = value[56];
        Ok(Self {
            root,
            total_amount,
            max_num_nodes,
            num_nodes,
            bump,
        })
    }
}

pub struct Initialize<'a> {
    pub accounts: InitializeAccounts<'a>,
    pub data: InitializeInstructionData,
}

impl<'a> TryFrom<(&'a [AccountInfo], &'a [u8])> for Initialize<'a> {
    type Error = ProgramError;

    fn try_from(value: (&'a [AccountInfo], &'a [u8])) -> Result<Self, Self::Error> {
        let accounts = InitializeAccounts::try_from(value.0)?;
        let data = InitializeInstructionData::try_from(value.1)?;
        Ok(Self { accounts, data })
    }
}

impl<'a> Initialize<'a> {
    pub const DISC: &'a u8 = &0;

    pub fn process(&mut self) -> ProgramResult {
        pinocchio::msg!("Processing Initialize");

        if self.data.max_num_nodes == 0 || self.data.num_nodes == 0 {
            return Err(ProgramError::InvalidInstructionData);
        }
        if self.data.num_nodes > self.data.max_num_nodes {
            return Err(ErrorCode::ExceededNodeCapacity.into());
        }

        // Vault funding is a precondition: it must already hold the full
        // distributable amount
        {
            let vault = TokenAccount::from_account_info(self.accounts.vault)?;
            if vault.amount() < self.data.total_amount {
                return Err(ErrorCode::InsufficientVaultFunding.into());
            }
        }

        let space = AirdropState::account_len(self.data.max_num_nodes);
        let bump = [self.data.bump];
        let seeds = [
            Seed::from(AirdropState::SEED),
            Seed::from(self.accounts.mint.key().as_ref()),
            Seed::from(self.accounts.authority.key().as_ref()),
            Seed::from(&bump[..]),
        ];
        let state_signer = Signer::from(&seeds[..]);

        (CreateAccount {
            from: self.accounts.authority,
            to: self.accounts.airdrop_state,
            lamports: Rent::get()?.minimum_balance(space),
            space: space as u64,
            owner: &crate::ID,
        })
        .invoke_signed(&[state_signer])?;

        pinocchio_log::log!("airdrop state account created");

        let (state, _bitmap) = unsafe {
            AirdropState::unpack(self.accounts.airdrop_state.borrow_mut_data_unchecked())?
        };
        state.initialize(
            self.data.root,
            *self.accounts.authority.key(),
            *self.accounts.mint.key(),
            *self.accounts.vault.key(),
            self.data.total_amount,
            self.data.max_num_nodes,
            self.data.num_nodes,
            self.data.bump,
        );
        Ok(())
    }
}
