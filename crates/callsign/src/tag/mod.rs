mod callsign;
mod interface;

pub use callsign::*;
pub use interface::*;
