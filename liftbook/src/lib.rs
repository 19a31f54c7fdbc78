mod api_url;
mod catalog;
mod client;
mod debounce;
pub mod domain;
mod entries;
mod error;
mod journals;
mod memory;
mod state;
mod store;
mod table;
pub mod timer;

pub use api_url::ApiUrl;

pub use catalog::*;
pub use client::*;
pub use debounce::*;
pub use entries::*;
pub use error::*;
pub use journals::*;
pub use memory::*;
pub use state::*;
pub use store::*;
pub use table::*;
