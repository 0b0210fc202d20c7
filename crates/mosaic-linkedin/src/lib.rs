pub mod client;
pub mod error;
pub mod session;
pub mod types;

mod extract;

pub use client::LinkedinClient;
pub use error::LinkedinError;
pub use session::Session;
pub use types::{IncludedItem, VoyagerResponse};
