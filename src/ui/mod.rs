pub mod busy;
pub mod notice;
pub mod select;
pub mod services;
