mod error;
mod ftb;
mod npn;

pub use error::Error;
pub use ftb::{compact_support, expand, in_support, swap, table_lookup, PROJ};
pub use npn::{is_mux_class, mux_form, MuxForm};
