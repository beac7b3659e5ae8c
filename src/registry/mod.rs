//! Pair creation and protocol-fee administration.

mod factory;

pub use factory::Registry;
