//! Business logic over the relational store.
//!
//! Handlers stay thin: they resolve the caller, then delegate here. Functions
//! that may run inside a transaction are generic over [`sea_orm::ConnectionTrait`].

pub mod links;
pub mod nfc;
pub mod profiles;
pub mod qr;
pub mod users;
