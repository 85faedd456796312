pub mod command;
pub mod dispatcher;
pub mod logger;

pub use command::*;
pub use dispatcher::{DispatchError, Dispatcher, Reply};
