pub mod page_runtime;
pub mod scheduler;
