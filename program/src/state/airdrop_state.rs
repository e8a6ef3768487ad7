use merkle_tree::{encode_leaf, verify_proof};
use pinocchio::{program_error::ProgramError, pubkey::Pubkey};

use crate::error::ErrorCode;

/// Persisted airdrop record, one per (mint, authority) pair.
///
/// The fixed header below is followed in the account data by a claim bitmap
/// of one bit per leaf index, sized at initialization from `max_num_nodes`.
/// Bits are set when an index is paid out and never cleared.
#[repr(C)]
pub struct AirdropState {
    /// Current 256-bit Merkle root. Mutable only through update-root by
    /// `authority`.
    pub root: [u8; 32],
    /// Sole identity allowed to commit new roots.
    pub authority: Pubkey,
    /// [Mint] of the token to be distributed.
    pub mint: Pubkey,
    /// Token account holding the undistributed balance.
    pub vault: Pubkey,
    /// Total entitlement committed at initialization.
    pub total_amount: [u8; 8],
    /// Running sum of paid-out claims.
    pub amount_claimed: [u8; 8],
    /// Bitmap capacity, fixed at initialization.
    pub max_num_nodes: [u8; 8],
    /// Leaf count of the currently committed tree. Written together with
    /// `root`; bounds every claim index. Never exceeds `max_num_nodes`.
    pub num_nodes: [u8; 8],
    /// Number of leaf indices claimed so far.
    pub num_nodes_claimed: [u8; 8],
    /// Bump seed.
    pub bump: u8,
}

impl AirdropState {
    pub const SEED: &[u8] = b"airdrop_state";
    pub const LEN: usize = core::mem::size_of::<AirdropState>();

    /// Account size for a given entitlement capacity: header plus one bit
    /// per leaf index.
    pub fn account_len(max_num_nodes: u64) -> usize {
        Self::LEN + (max_num_nodes as usize).div_ceil(8)
    }

    /// Split raw account data into the fixed header and the trailing claim
    /// bitmap.
    ///
    /// # Safety
    ///
    /// `data` must be the data of an account owned by this program.
    pub unsafe fn unpack(data: &mut [u8]) -> Result<(&mut Self, &mut [u8]), ProgramError> {
        if data.len() < Self::LEN {
            return Err(ProgramError::InvalidAccountData);
        }
        let (header, bitmap) = data.split_at_mut(Self::LEN);
        Ok((unsafe { &mut *(header.as_mut_ptr() as *mut Self) }, bitmap))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        &mut self,
        root: [u8; 32],
        authority: Pubkey,
        mint: Pubkey,
        vault: Pubkey,
        total_amount: u64,
        max_num_nodes: u64,
        num_nodes: u64,
        bump: u8,
    ) {
        self.root = root;
        self.authority = authority;
        self.mint = mint;
        self.vault = vault;
        self.total_amount = total_amount.to_le_bytes();
        self.amount_claimed = [0; 8];
        self.max_num_nodes = max_num_nodes.to_le_bytes();
        self.num_nodes = num_nodes.to_le_bytes();
        self.num_nodes_claimed = [0; 8];
        self.bump = bump;
        // The bitmap starts empty; freshly created account data is zeroed.
    }

    pub fn total_amount(&self) -> u64 {
        u64::from_le_bytes(self.total_amount)
    }

    pub fn amount_claimed(&self) -> u64 {
        u64::from_le_bytes(self.amount_claimed)
    }

    pub fn max_num_nodes(&self) -> u64 {
        u64::from_le_bytes(self.max_num_nodes)
    }

    pub fn num_nodes(&self) -> u64 {
        u64::from_le_bytes(self.num_nodes)
    }

    pub fn num_nodes_claimed(&self) -> u64 {
        u64::from_le_bytes(self.num_nodes_claimed)
    }

    /// Sole mutation path for the root and the committed leaf count. Any
    /// signer other than the recorded authority is rejected and the state is
    /// left untouched; so is a leaf count past the bitmap capacity. The
    /// claim bitmap is never affected.
    pub fn update_root(
        &mut self,
        signer: &Pubkey,
        new_root: [u8; 32],
        num_nodes: u64,
    ) -> Result<(), ErrorCode> {
        if self.authority.ne(signer) {
            return Err(ErrorCode::Unauthorized);
        }
        if num_nodes > self.max_num_nodes() {
            return Err(ErrorCode::ExceededNodeCapacity);
        }
        self.root = new_root;
        self.num_nodes = num_nodes.to_le_bytes();
        Ok(())
    }

    /// Membership test for the claim set.
    pub fn is_claimed(bitmap: &[u8], index: u64) -> bool {
        let byte = (index / 8) as usize;
        byte < bitmap.len() && bitmap[byte] & (1 << (index % 8)) != 0
    }

    fn set_claimed(bitmap: &mut [u8], index: u64) {
        bitmap[(index / 8) as usize] |= 1 << (index % 8);
    }

    /// Proof verification and claim bookkeeping: everything in a claim short
    /// of the token transfer itself. On any error nothing has been mutated.
    ///
    /// The leaf is always reconstructed in its canonical unclaimed form; the
    /// bitmap alone decides whether an index was already paid out.
    pub fn process_claim(
        &mut self,
        bitmap: &mut [u8],
        claimant: &Pubkey,
        amount: u64,
        proof: &[u8],
        index: u64,
    ) -> Result<(), ErrorCode> {
        let leaf = encode_leaf(claimant, amount, false);
        if !verify_proof(&leaf, proof, index, &self.root) {
            return Err(ErrorCode::InvalidProof);
        }

        // The committed tree's own leaf count bounds the index, not just the
        // bitmap capacity: duplicate-node padding makes the edge proof of an
        // odd level also verify one index past the tree.
        if index >= self.num_nodes() || index >= self.max_num_nodes() {
            return Err(ErrorCode::IndexOutOfRange);
        }
        if Self::is_claimed(bitmap, index) {
            return Err(ErrorCode::AlreadyClaimed);
        }

        let amount_claimed = self
            .amount_claimed()
            .checked_add(amount)
            .ok_or(ErrorCode::ArithmeticError)?;
        if amount_claimed > self.total_amount() {
            return Err(ErrorCode::ExceededTotalAmount);
        }
        let num_nodes_claimed = self
            .num_nodes_claimed()
            .checked_add(1)
            .ok_or(ErrorCode::ArithmeticError)?;

        Self::set_claimed(bitmap, index);
        self.amount_claimed = amount_claimed.to_le_bytes();
        self.num_nodes_claimed = num_nodes_claimed.to_le_bytes();
        Ok(())
    }
}
