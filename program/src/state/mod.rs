mod airdrop_state;

pub use airdrop_state::AirdropState;
