mod compact;
mod eval;
mod lit;
mod net;
mod node;
mod remap;

pub use compact::Compaction;
pub use eval::lit_value;
pub use lit::{Lit, NodeId};
pub use net::Network;
pub use node::{NodeKind, DELAY_FRACTION};
pub use remap::Remap;
