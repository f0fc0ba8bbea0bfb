/// The node cost limit of a single exact local area dereference
pub const ELA_GLOBAL_LIM: f32 = 500.0;

/// The fraction of `cuts_per_node` that is reserved at the end of a timing
/// constrained cut list for the fastest cuts
pub const DELAY_CUT_FRACTION: f32 = 0.3;

#[derive(Debug, Clone, PartialEq)]
pub struct MapParams {
    /// Number of mapping rounds, the last one instantiates
    pub n_rounds: u32,
    /// Maximum number of cuts stored per node between rounds
    pub cuts_per_node: usize,
    /// Area cost of a LUT indexed by its number of inputs
    pub lut_cost: [f32; 7],
    /// Area cost of each level of a multiplexer cut
    pub mux_cost: f32,
    /// Recognize 2:1 multiplexers in `Lut4` nodes and map them to `Mux`
    pub use_fmux: bool,
    /// Use exact local area refinement from the second round on
    pub use_ela: bool,
    /// Keep the cut lists between rounds instead of regenerating them
    pub recycle_cuts: bool,
    /// Re-select cheaper equal delay cuts while discovering the active set
    pub reprio: bool,
    /// The delay target is the first round's mapped delay times this
    pub delay_factor: f32,
    /// Adds an extra probe round that only optimizes for delay
    pub map_for_delay: bool,
    /// Suppresses per round logging
    pub quiet: bool,
}

impl Default for MapParams {
    fn default() -> Self {
        Self {
            n_rounds: 4,
            cuts_per_node: 10,
            lut_cost: [1.0; 7],
            mux_cost: 1.0,
            use_fmux: false,
            use_ela: true,
            recycle_cuts: true,
            reprio: false,
            delay_factor: 1.0,
            map_for_delay: false,
            quiet: false,
        }
    }
}

impl MapParams {
    /// The area cost of a winning cut
    pub fn cut_area(&self, size: usize, mux_depth: u8) -> f32 {
        if mux_depth > 0 {
            self.mux_cost * f32::from(mux_depth)
        } else {
            self.lut_cost[size]
        }
    }

    /// The number of slots at the end of a timing constrained cut list kept in
    /// delay order
    pub fn n_delay_cuts(&self) -> usize {
        ((self.cuts_per_node as f32) * DELAY_CUT_FRACTION) as usize + 1
    }
}
