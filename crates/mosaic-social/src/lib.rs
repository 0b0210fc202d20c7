pub mod account;
pub mod error;
pub mod facebook;
pub mod pool;
pub mod store;
pub mod types;
pub mod x;

mod normalize;

pub use account::{Account, AccountStatus, Credentials};
pub use error::SocialError;
pub use facebook::PageClient;
pub use pool::{AccountLease, AccountPool, AuthEndpoints, AuthReport, FailureKind, PoolStatus};
pub use store::{AccountStore, JsonFileStore, MemoryStore};
pub use x::XClient;
