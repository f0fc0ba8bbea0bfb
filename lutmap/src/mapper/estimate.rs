use std::{cmp::Ordering, mem};

use awint::awint_dag::triple_arena::ptr_struct;

use crate::{
    mapper::LutMapper,
    network::NodeId,
    Error,
};

ptr_struct!(PInst);

/// Work list key of active set discovery. Nodes on longer paths come first,
/// then earlier arriving nodes, then lower ids.
#[derive(Debug, Clone, Copy)]
pub struct InstKey {
    pub span: f32,
    pub arrival: f32,
    pub id: NodeId,
}

impl Ord for InstKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .span
            .total_cmp(&self.span)
            .then(self.arrival.total_cmp(&other.arrival))
            .then(self.id.cmp(&other.id))
    }
}

impl PartialOrd for InstKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for InstKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for InstKey {}

/// The fanout blending weight of the new exact fanouts after round `round`
pub fn blend_alpha(round: u32, map_for_delay: bool) -> f32 {
    let mut r = round + 1;
    if map_for_delay && (round != 0) {
        r -= 1;
    }
    let r = r as f32;
    1.0 - 1.0 / (r * r * r * r + 2.0)
}

impl<'a> LutMapper<'a> {
    fn enqueue(&mut self, id: NodeId) {
        if !self.active[id.inx()] {
            self.active[id.inx()] = true;
            let key = InstKey {
                span: self.arrival[id.inx()] + self.depart[id.inx()],
                arrival: self.arrival[id.inx()],
                id,
            };
            let _ = self.queue.insert(key, ());
        }
    }

    /// Marks the nodes reachable from sinks through winning cuts as active.
    /// Nodes are visited on a slack ordered work list so that re-selection of
    /// winners sees the `area_est` of more critical consumers zeroed first.
    fn discover_active(&mut self) -> Result<(), Error> {
        self.active.fill(false);
        self.queue.clear_and_shrink();
        for i in 0..self.order.len() {
            let id = self.order[i];
            if self.net.kind(id).is_sink() {
                self.enqueue(id);
            }
        }
        while let Some(p) = self.queue.first() {
            let Some((key, ())) = self.queue.remove(p) else {
                break
            };
            let id = key.id;
            let kind = self.net.kind(id);
            if kind.is_logic() {
                let mut cuts = mem::take(&mut self.cutmap[id.inx()]);
                self.reprioritize_cuts(id, &mut cuts);
                self.cutmap[id.inx()] = cuts;
                let cut = self.winner_of(id)?;
                for leaf in cut.leaves() {
                    self.area_est[leaf.inx()] = 0.0;
                    self.enqueue(*leaf);
                }
            } else if !kind.is_source() {
                let operands: Vec<NodeId> = kind.operands().iter().map(|lit| lit.id()).collect();
                for operand in operands {
                    self.enqueue(operand);
                }
            }
        }
        Ok(())
    }

    /// Propagates departure times from sinks to sources over the current
    /// mapping and counts the exact fanouts of active nodes
    fn compute_departures(&mut self) -> Result<(), Error> {
        self.fanouts.fill(0);
        self.depart.fill(0.0);
        for i in (0..self.order.len()).rev() {
            let id = self.order[i];
            self.propagate_departure(id, true)?;
        }
        Ok(())
    }

    /// Pushes the departure time of `id` to the nodes it depends on in the
    /// current mapping. Inactive logic gets an infinite departure.
    pub(crate) fn propagate_departure(&mut self, id: NodeId, count: bool) -> Result<(), Error> {
        let inx = id.inx();
        let kind = self.net.kind(id);
        if kind.is_logic() {
            if self.active[inx] {
                let cut = self.winner_of(id)?;
                let selector = if cut.is_mux() {
                    self.mux_selector(id)
                } else {
                    None
                };
                for leaf in cut.leaves() {
                    if count {
                        self.fanouts[leaf.inx()] += 1;
                    }
                    // only the selector of a multiplexer goes through a level
                    let delay = match selector {
                        Some(sel) if sel != *leaf => 0.0,
                        _ => 1.0,
                    };
                    let d = self.depart[inx] + delay;
                    if d > self.depart[leaf.inx()] {
                        self.depart[leaf.inx()] = d;
                    }
                }
            } else {
                self.depart[inx] = f32::INFINITY;
            }
        } else if !kind.is_source() && self.active[inx] {
            // dangling pass-throughs must not keep their operands referenced
            let delay = kind.edge_delay();
            let d = self.depart[inx] + delay;
            for lit in kind.operands() {
                let operand = lit.id().inx();
                if count {
                    self.fanouts[operand] += 1;
                }
                if d > self.depart[operand] {
                    self.depart[operand] = d;
                }
            }
        }
        Ok(())
    }

    /// Gives nodes left with infinite departure the smallest finite departure
    /// among their consumers so that their cuts can still be costed
    fn backfill_departures(&mut self) {
        let mut tmp = self.depart.clone();
        for i in (0..self.order.len()).rev() {
            let id = self.order[i];
            let kind = self.net.kind(id);
            if kind.is_source() || (tmp[id.inx()] == f32::INFINITY) {
                continue
            }
            for lit in kind.operands() {
                let v = lit.id();
                if !self.net.kind(v).is_logic() || (self.depart[v.inx()] != f32::INFINITY) {
                    continue
                }
                tmp[v.inx()] = tmp[v.inx()].min(tmp[id.inx()]);
            }
        }
        for (depart, tmp) in self.depart.iter_mut().zip(tmp) {
            if (*depart == f32::INFINITY) && (tmp != f32::INFINITY) {
                *depart = tmp;
            }
        }
    }

    /// Determines the active set, exact fanouts, departures, and the area and
    /// delay of the current mapping. Then either blends the fanout estimates
    /// for the next round or, if `instantiate`, rewrites the network.
    pub fn update_fanout_est(&mut self, instantiate: bool) -> Result<(), Error> {
        self.discover_active()?;
        self.compute_departures()?;
        if (self.round > 0) && self.params.use_ela {
            self.exact_local_area()?;
        }

        self.mapped_delay = 0.0;
        for i in 0..self.order.len() {
            let id = self.order[i];
            if self.net.kind(id).is_source() {
                self.mapped_delay = self.mapped_delay.max(self.depart[id.inx()]);
            }
        }
        self.backfill_departures();

        self.mapped_area = 0.0;
        for i in 0..self.order.len() {
            let id = self.order[i];
            if self.active[id.inx()] && self.net.kind(id).is_logic() {
                let cut = self.winner_of(id)?;
                self.mapped_area += self.params.cut_area(cut.size(), cut.mux_depth);
            }
        }

        if instantiate {
            return self.instantiate()
        }
        if !self.is_probe_round() {
            let alpha = blend_alpha(self.round, self.params.map_for_delay);
            let beta = 1.0 - alpha;
            for i in 0..self.order.len() {
                let id = self.order[i];
                if self.net.kind(id).is_logic() {
                    let inx = id.inx();
                    self.fanout_est[inx] =
                        alpha * (self.fanouts[inx].max(1) as f32) + beta * self.fanout_est[inx];
                }
            }
        }
        Ok(())
    }
}
