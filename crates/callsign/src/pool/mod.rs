mod interface;
mod scan;
mod shuffled;
#[cfg(test)]
mod tests;

pub use interface::*;
pub use scan::*;
pub use shuffled::*;
