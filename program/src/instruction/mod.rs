mod claim;
mod initialize;
mod update_root;

pub use claim::*;
pub use initialize::*;
pub use update_root::*;
