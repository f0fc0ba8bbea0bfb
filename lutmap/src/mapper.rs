mod cut;
mod cut_gen;
mod ela;
mod estimate;
mod instantiate;
mod legalize;
mod lut_mapper;
mod params;
mod prioritize;

pub use cut::{Cut, MAX_CUT};
pub use cut_gen::insert_cut;
pub use ela::RefDeref;
pub use estimate::{blend_alpha, InstKey, PInst};
pub use instantiate::{compute_ftb, FtbMemo};
pub use legalize::{check_muxes, demote_mux, DemoteMuxes, MuxLegalizer, MuxReport, MAX_MUX_CHAIN};
pub use lut_mapper::{map, LutMapper, MapStats, RoundStats};
pub use params::{MapParams, DELAY_CUT_FRACTION, ELA_GLOBAL_LIM};
pub(crate) use prioritize::CostOrder;
pub use prioritize::{area_order, delay_order, CutCost};
