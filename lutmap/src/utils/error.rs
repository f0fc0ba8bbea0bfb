use core::fmt;
use std::fmt::Debug;

use crate::network::NodeId;

// Keep things using `OtherStr` and `OtherString` if they are internal
// consistency failures. Add special variants for things users might match
// against.

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, thiserror::Error)]
pub enum Error {
    /// A node that should not exist in the input was encountered, such as a
    /// removed node in a traversal order
    #[error("invalid node {0:?}")]
    InvalidNode(NodeId),
    /// The input already contains mapped kinds (`Lut6` or `Mux`) which the
    /// mapper has no cut semantics for
    #[error("node {0:?} is of an already mapped kind and cannot be mapped again")]
    UnmappableNode(NodeId),
    /// An operand of the first node refers to a missing or removed node
    #[error("node {0:?} has an operand referring to {1:?} which does not exist")]
    DanglingOperand(NodeId, NodeId),
    /// For miscellanious errors
    #[error("{0}")]
    OtherStr(&'static str),
    /// For miscellanious errors
    #[error("{0}")]
    OtherString(String),
}

impl Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
