mod fine_duration;
mod timestamp;

pub use fine_duration::*;
pub(crate) use timestamp::Timestamp;
