pub mod config;
pub mod notification;
pub mod session;
pub mod task;

pub use config::*;
pub use notification::*;
pub use session::*;
pub use task::*;
