//! # IO Module
//!
//! Interface layer between presentation code and the domain. Converts the
//! `shared` DTOs into domain calls and domain results back into DTOs.

pub mod expense_apis;
pub mod mappers;

pub use expense_apis::ExpenseApi;
pub use mappers::ExpenseMapper;
