//! Year-by-year total cost of ownership comparison of an electric and a combustion vehicle.
#![warn(missing_docs)]
pub mod commands;
pub mod finance;
pub mod input;
pub mod log;
pub mod parameters;
pub mod record;
pub mod scenario;
pub mod settings;
pub mod summary;
pub mod units;

#[cfg(test)]
mod fixture;
