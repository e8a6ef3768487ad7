use pinocchio::{
    account_info::AccountInfo, program_error::ProgramError, ProgramResult,
};

use crate::state::AirdropState;

pub struct UpdateRootAccounts<'a> {
    pub airdrop_state: &'a AccountInfo,
    pub authority: &'a AccountInfo,
}

impl<'a> TryFrom<&'a [AccountInfo]> for UpdateRootAccounts<'a> {
    type Error = ProgramError;

    fn try_from(value: &'a [AccountInfo]) -> Result<Self, Self::Error> {
        let [airdrop_state, authority, ..] = value else {
            return Err(ProgramError::NotEnoughAccountKeys);
        };

        if !authority.is_signer() {
            return Err(ProgramError::MissingRequiredSignature);
        }

        if !airdrop_state.is_owned_by(&crate::ID) {
            return Err(ProgramError::UninitializedAccount);
        }

        Ok(Self {
            airdrop_state,
            authority,
        })
    }
}

#[repr(C)]
pub struct UpdateRootInstructionData {
    pub new_root: [u8; 32], // 0..32
    pub num_nodes: u64,     // 32..40 (little-endian)
}

impl<'a> TryFrom<&'a [u8]> for UpdateRootInstructionData {
    type Error = ProgramError;

    fn try_from(value: &'a [u8]) -> Result<Self, Self::Error> {
        if value.len() != 40 {
            return Err(ProgramError::InvalidInstructionData);
        }
        let new_root: [u8; 32] = value[0..32].try_into().unwrap();
        let num_nodes = u64::from_le_bytes(value[32..40].try_into().unwrap());
        Ok(Self {
            new_root,
            num_nodes,
        })
    }
}

pub struct UpdateRoot<'a> {
    pub accounts: UpdateRootAccounts<'a>,
    pub data: UpdateRootInstructionData,
}

impl<'a> TryFrom<(&'a [AccountInfo], &'a [u8])> for UpdateRoot<'a> {
    type Error = ProgramError;

    fn try_from(value: (&'a [AccountInfo], &'a [u8])) -> Result<Self, Self::Error> {
        let accounts = UpdateRootAccounts::try_from(value.0)?;
        let data = UpdateRootInstructionData::try_from(value.1)?;
        Ok(Self { accounts, data })
    }
}

impl<'a> UpdateRoot<'a> {
    pub const DISC: &'a u8 = &1;

    /// Replaces the root and the committed leaf count atomically. Repeated
    /// calls with unrelated trees are accepted; keeping already-claimed
    /// parties out of new trees is the authority's responsibility.
    pub fn process(&mut self) -> ProgramResult {
        let (state, _bitmap) = unsafe {
            AirdropState::unpack(self.accounts.airdrop_state.borrow_mut_data_unchecked())?
        };

        state
            .update_root(
                self.accounts.authority.key(),
                self.data.new_root,
                self.data.num_nodes,
            )
            .map_err(ProgramError::from)?;

        pinocchio_log::log!("airdrop root updated");
        Ok(())
    }
}
