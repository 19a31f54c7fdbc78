mod defaults;
mod entry;
mod exercise;
mod ids;
mod journal;
pub mod timestamp;

pub use defaults::*;
pub use entry::*;
pub use exercise::*;
pub use ids::*;
pub use journal::*;
pub use timestamp::Timestamp;
