use awint::awint_dag::smallvec::SmallVec;

use crate::{
    network::{Lit, Network, NodeId, NodeKind},
    utils::{compact_support, PROJ},
    Error,
};

/// Multiplexer chains longer than this do not fit the dedicated resources
pub const MAX_MUX_CHAIN: u32 = 2;

/// Counts of multiplexer structural rule violations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MuxReport {
    /// Total number of `Mux` nodes
    pub total: usize,
    /// Muxes at the end of a chain of more than `MAX_MUX_CHAIN`
    pub chain_violations: usize,
    /// Muxes feeding the data input of another mux while having other
    /// consumers
    pub fanout_violations: usize,
    /// Muxes feeding the data input of another mux inverted
    pub inverter_violations: usize,
    /// Data operands of muxes that are neither a `Lut6` nor a `Mux`
    pub input_violations: usize,
}

impl MuxReport {
    pub fn is_clean(&self) -> bool {
        (self.chain_violations == 0)
            && (self.fanout_violations == 0)
            && (self.inverter_violations == 0)
            && (self.input_violations == 0)
    }
}

/// Makes the `Mux` nodes of a mapped network obey the structural rules that
/// [check_muxes] checks
pub trait MuxLegalizer {
    /// Returns the number of multiplexers that were changed into something
    /// else
    fn legalize(&mut self, net: &mut Network) -> Result<usize, Error>;
}

/// Legalizes by turning offending muxes back into `Lut6`s
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoteMuxes;

fn mux_data(kind: &NodeKind) -> Option<[Lit; 2]> {
    if let NodeKind::Mux([_, t, e]) = kind {
        Some([*t, *e])
    } else {
        None
    }
}

/// Replaces a `Mux` with the equivalent `Lut6`
pub fn demote_mux(net: &mut Network, id: NodeId) {
    let NodeKind::Mux(inp) = net.kind(id) else {
        return
    };
    let inp = *inp;
    let ftb = (PROJ[0] & PROJ[1]) | (!PROJ[0] & PROJ[2]);
    let (ftb, kept) = compact_support(ftb, 3);
    let inputs: SmallVec<[Lit; 6]> = kept.iter().map(|i| inp[*i]).collect();
    net.set_kind(id, NodeKind::Lut6(inputs, ftb));
}

impl MuxLegalizer for DemoteMuxes {
    fn legalize(&mut self, net: &mut Network) -> Result<usize, Error> {
        let mut demoted = 0;
        // data operand rules until nothing changes
        loop {
            let fanouts = net.fanout_counts();
            let mut changed = false;
            for id in net.ids() {
                let Some(data) = mux_data(net.kind(id)) else {
                    continue
                };
                for lit in data {
                    match net.kind(lit.id()) {
                        NodeKind::Mux(_) => {
                            if lit.sign() || (fanouts[lit.id().inx()] > 1) {
                                demote_mux(net, lit.id());
                                demoted += 1;
                                changed = true;
                            }
                        }
                        NodeKind::Lut6(..) => (),
                        _ => {
                            demote_mux(net, id);
                            demoted += 1;
                            changed = true;
                            break
                        }
                    }
                }
            }
            if !changed {
                break
            }
        }

        // chain depth
        let mut level = vec![0u32; net.len()];
        for id in net.up_order() {
            let Some(data) = mux_data(net.kind(id)) else {
                continue
            };
            let l = 1 + data
                .iter()
                .map(|lit| level[lit.id().inx()])
                .max()
                .unwrap_or(0);
            if l > MAX_MUX_CHAIN {
                demote_mux(net, id);
                demoted += 1;
            } else {
                level[id.inx()] = l;
            }
        }
        Ok(demoted)
    }
}

/// Checks the multiplexer rules: chains are at most `MAX_MUX_CHAIN` long,
/// muxes feeding mux data inputs have no other consumers and are not
/// inverted, and data inputs come from `Lut6`s or `Mux`es
pub fn check_muxes(net: &Network) -> MuxReport {
    let fanouts = net.fanout_counts();
    let mut report = MuxReport::default();
    let mut level = vec![0u32; net.len()];
    for id in net.up_order() {
        let Some(data) = mux_data(net.kind(id)) else {
            continue
        };
        report.total += 1;
        let mut l = 1;
        for lit in data {
            match net.kind(lit.id()) {
                NodeKind::Mux(_) => {
                    if lit.sign() {
                        report.inverter_violations += 1;
                    }
                    if fanouts[lit.id().inx()] > 1 {
                        report.fanout_violations += 1;
                    }
                    l = l.max(level[lit.id().inx()] + 1);
                }
                NodeKind::Lut6(..) => (),
                _ => report.input_violations += 1,
            }
        }
        if l > MAX_MUX_CHAIN {
            report.chain_violations += 1;
        }
        level[id.inx()] = l;
    }
    report
}
