//! Route handlers.

pub mod account;
pub mod auth_user;
pub mod magic_link;
