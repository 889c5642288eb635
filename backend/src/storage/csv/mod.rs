//! # CSV Storage Module
//!
//! File-based expense storage. All expenses live in one CSV file in the data
//! directory, kept in list order (ascending date, then insertion sequence).
//!
//! ## File Format
//!
//! ```csv
//! id,name,date,value,sequence
//! 5f0c1d2e-8a34-4b7e-9d61-0c2f7a9b1e44,Rent,2024-01-01,900.0,1
//! 0b5e0a64-6a47-4a0b-9d55-3f2f8f5f1c11,Coffee,2024-01-05,3.5,0
//! ```
//!
//! `sequence` is persisted so that expenses sharing a date come back in the
//! order they were added.

pub mod connection;
pub mod expense_repository;

#[cfg(test)]
pub mod test_utils;

pub use connection::CsvConnection;
pub use expense_repository::ExpenseRepository;
