//! Base types and error handling.
//!
//! Provides foundational types shared by the resolvers:
//! - [`NetError`](neterror::NetError): resolution errors and their classification
//! - [`BootContext`](boot::BootContext): boot-start and connectivity signals

pub mod boot;
pub mod context;
pub mod neterror;
