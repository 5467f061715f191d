//! Terminal front end: one module per screen.

pub mod account;
pub mod catalog;
pub mod dashboard;
pub mod expenses;
pub mod setup;
pub mod ui;
