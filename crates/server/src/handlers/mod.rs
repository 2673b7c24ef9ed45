//! Request handlers, one module per resource group.

pub mod auth;
pub mod catalog;
pub mod combo;
pub mod delivery;
pub mod order;
pub mod people;
pub mod place;
