//! A technology mapper from DAGs of two input ANDs and four input LUTs to six
//! input LUTs and 2:1 multiplexers, optimizing delay first and area second.
//!
//! Mapping runs in rounds. Every round enumerates (or reuses) up to
//! `cuts_per_node` cuts of at most 6 leaves per gate in topological order and
//! orders them by delay and area flow. A reverse pass then determines which
//! gates are actually used by the winning cuts, computes their exact fanouts
//! and departure times, optionally improves area with exact local area
//! refinement over maximal fanout free cones, and blends the exact fanouts
//! into the estimates used by the next round. The last round rewrites the
//! network in place.
//!
//! ```rust
//! use lutmap::{map, MapParams, Network, NodeKind, Remap};
//!
//! let mut net = Network::new();
//! let inputs: Vec<_> = (0..8).map(|_| net.add_pi()).collect();
//! let mut acc = inputs[0];
//! for inp in &inputs[1..] {
//!     acc = net.add_and(acc, *inp);
//! }
//! net.add_po(!acc);
//!
//! let mut remap = Remap::default();
//! let stats = map(&mut net, &MapParams::default(), Some(&mut remap)).unwrap();
//! assert_eq!(stats.n_lut6, 2);
//! assert_eq!(stats.last().unwrap().mapped_delay, 2.0);
//! // the inputs survive mapping
//! assert!(matches!(net.kind(remap.get(inputs[0].id()).unwrap().id()), NodeKind::Pi));
//! ```

#![allow(clippy::needless_range_loop)]
#![allow(clippy::comparison_chain)]

/// Cut enumeration, selection, and instantiation
pub mod mapper;
/// The gate level network that is mapped
pub mod network;
/// Miscellanious utilities
pub mod utils;

pub use awint::{self, awint_dag, awint_dag::triple_arena};
pub use mapper::{map, LutMapper, MapParams, MapStats, RoundStats};
pub use network::{Lit, Network, NodeId, NodeKind, Remap};
pub use utils::Error;
