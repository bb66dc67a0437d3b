//! # Repository Implementations
//!
//! One repository per aggregate:
//!
//! - [`product`] - inventory store (CRUD + atomic stock decrement)
//! - [`sale`] - append-only sale ledger
//! - [`employee`] - employee accounts
//! - [`settings`] - the settings singleton
//! - [`report`] - read-only reporting aggregation

pub mod employee;
pub mod product;
pub mod report;
pub mod sale;
pub mod settings;
