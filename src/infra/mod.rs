pub mod channel;
pub mod factory;
pub mod repositories;
