mod error;
mod mutex;
mod pool;
mod rand;
mod robot;
#[cfg(feature = "serde")]
mod serde;
mod tag;
mod thread_random;

pub use crate::error::*;
pub use crate::mutex::*;
pub use crate::pool::*;
pub use crate::rand::*;
pub use crate::robot::*;
pub use crate::tag::*;
pub use crate::thread_random::*;
