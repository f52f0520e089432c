//! Infrastructure layer - Storage, security and observability implementations

pub mod auth;
pub mod logging;
pub mod observability;
pub mod product;
pub mod storage;
pub mod user;
