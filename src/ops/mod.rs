pub mod auth_ops;
pub mod session_gate;
pub mod task_store;
