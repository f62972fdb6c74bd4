//! Business logic implementations.

pub mod order_impl;
pub mod service_impl;
