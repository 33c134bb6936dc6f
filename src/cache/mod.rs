pub mod field_cache;
pub mod store;
