use std::{cmp::Ordering, mem};

use crate::{
    mapper::{Cut, LutMapper},
    network::NodeId,
};

/// The cost vector of a cut in the context of the node it would implement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutCost {
    /// Arrival time at the node if this cut were the winner
    pub delay: f32,
    /// Area flow
    pub area: f32,
    pub cut_size: usize,
    /// Average estimated fanout of the leaves, higher is better
    pub avg_fanout: f32,
}

/// Delay first order: delay, size, area ascending, then average fanout
/// descending
pub fn delay_order(lhs: &CutCost, rhs: &CutCost) -> Ordering {
    lhs.delay
        .total_cmp(&rhs.delay)
        .then(lhs.cut_size.cmp(&rhs.cut_size))
        .then(lhs.area.total_cmp(&rhs.area))
        .then(rhs.avg_fanout.total_cmp(&lhs.avg_fanout))
}

/// Area first order: area, size, delay ascending, then average fanout
/// descending
pub fn area_order(lhs: &CutCost, rhs: &CutCost) -> Ordering {
    lhs.area
        .total_cmp(&rhs.area)
        .then(lhs.cut_size.cmp(&rhs.cut_size))
        .then(lhs.delay.total_cmp(&rhs.delay))
        .then(rhs.avg_fanout.total_cmp(&lhs.avg_fanout))
}

/// Reused buffers for ordering cut lists
#[derive(Debug, Clone, Default)]
pub(crate) struct CostOrder {
    costs: Vec<(usize, CutCost)>,
    where_: Vec<usize>,
    list: Vec<usize>,
}

impl CostOrder {
    /// Moves `cuts` into the order of `self.costs` by walking the index
    /// cycles
    fn apply(&mut self, cuts: &mut [Cut]) {
        let len = cuts.len();
        self.where_.clear();
        self.where_.extend(0..len);
        self.list.clear();
        self.list.extend(0..len);
        for i in 0..len {
            let w = self.where_[self.costs[i].0];
            self.where_[self.list[i]] = w;
            self.list.swap(i, w);
            cuts.swap(i, w);
        }
    }
}

impl<'a> LutMapper<'a> {
    /// The cost of implementing `id` with `cut` under the current estimates
    pub fn cut_cost(&self, id: NodeId, cut: &Cut) -> CutCost {
        let mut delay = 0.0f32;
        let mut area = 0.0f32;
        let mut fanout_sum = 0.0f32;
        for leaf in cut.leaves() {
            delay = delay.max(self.arrival[leaf.inx()]);
            area += self.area_est[leaf.inx()];
            fanout_sum += self.fanout_est[leaf.inx()];
        }
        if cut.is_mux() {
            area += self.params.mux_cost * f32::from(cut.mux_depth);
            area *= self.fanout_est[id.inx()];
        } else {
            area += self.params.lut_cost[cut.size()];
            delay += 1.0;
        }
        let avg_fanout = if cut.is_empty() {
            0.0
        } else {
            fanout_sum / (cut.size() as f32)
        };
        CutCost {
            delay,
            area,
            cut_size: cut.size(),
            avg_fanout,
        }
    }

    /// Sets the depth of a multiplexer cut to one more than the deepest
    /// winner among its leaves
    pub(crate) fn refresh_mux_depth(&self, cut: &mut Cut) {
        if !cut.is_mux() {
            return
        }
        let mut depth = 0u8;
        for leaf in cut.leaves() {
            if let Some(first) = self.cutmap[leaf.inx()].first() {
                depth = depth.max(first.mux_depth);
            }
        }
        cut.mux_depth = depth.saturating_add(1);
    }

    /// Orders `cuts` of node `id` so that rank 0 is the winner and updates
    /// `arrival` and `area_est` of the node.
    ///
    /// Cuts are in delay first order, except after the delay round where cuts
    /// meeting the required time are moved to the front in area first order.
    /// The last `n_delay_cuts` slots are then restored to delay order.
    pub fn prioritize_cuts(&mut self, id: NodeId, cuts: &mut [Cut]) {
        debug_assert!(!cuts.is_empty());
        debug_assert!(self.fanout_est[id.inx()] > 0.0);
        if cuts.is_empty() {
            return
        }
        let mut order = mem::take(&mut self.tmp_order);
        order.costs.clear();
        for (i, cut) in cuts.iter().enumerate() {
            order.costs.push((i, self.cut_cost(id, cut)));
        }

        // all sorts are stable
        order.costs.sort_by(|lhs, rhs| delay_order(&lhs.1, &rhs.1));
        if !self.is_probe_round() && !self.is_delay_round() {
            let req = self.target_arrival - (self.depart[id.inx()] + 1.0);
            order.costs.sort_by_key(|(_, cost)| cost.delay > req);
            let len = order.costs.len();
            let j = order.costs.iter().take_while(|(_, cost)| cost.delay <= req).count();
            order.costs[..j].sort_by(|lhs, rhs| area_order(&lhs.1, &rhs.1));
            let n_delay = self.params.n_delay_cuts();
            let start = if len >= n_delay {
                j.min(len - n_delay)
            } else {
                j
            };
            order.costs[start..].sort_by(|lhs, rhs| delay_order(&lhs.1, &rhs.1));
        }
        order.apply(cuts);
        let mut best = order.costs[0].1;
        self.tmp_order = order;

        if self.params.use_fmux {
            let mut best_i = None;
            for i in 0..cuts.len() {
                self.refresh_mux_depth(&mut cuts[i]);
                if best_i.is_none() && (cuts[i].mux_depth <= 2) {
                    best_i = Some(i);
                }
            }
            // recycled lists can end up with only deep multiplexers, the
            // legalizer demotes whatever is left too deep
            if let Some(best_i) = best_i {
                cuts.swap(0, best_i);
            }
            // the depth, and with it the cost, of the winner may have changed
            best = self.cut_cost(id, &cuts[0]);
        }

        self.area_est[id.inx()] = best.area / self.fanout_est[id.inx()];
        self.arrival[id.inx()] = best.delay;
    }

    /// Among the cuts no deeper than the winner and no slower than it, moves
    /// the one with the least area to rank 0. Does nothing unless
    /// `MapParams::reprio` is set.
    pub fn reprioritize_cuts(&self, id: NodeId, cuts: &mut [Cut]) {
        if !self.params.reprio || cuts.is_empty() {
            return
        }
        let allowed_mux_depth = cuts[0].mux_depth;
        let best_delay = self.cut_cost(id, &cuts[0]).delay;
        let mut best_area = f32::INFINITY;
        let mut best_i = 0;
        for (i, cut) in cuts.iter().enumerate() {
            if cut.mux_depth > allowed_mux_depth {
                continue
            }
            let cost = self.cut_cost(id, cut);
            if (i != 0) && (cost.delay > best_delay) {
                break
            }
            if cost.area < best_area {
                best_area = cost.area;
                best_i = i;
            }
        }
        cuts.swap(0, best_i);
    }
}
