pub mod dispatcher;
pub mod error;

pub use dispatcher::{
    is_supported, Dispatcher, FetchResult, Health, Operation, COMPATIBILITY,
};
pub use error::{DispatchError, ErrorKind};
