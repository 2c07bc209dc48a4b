pub mod config;
pub mod dashboard;
pub mod error;
pub mod event;
pub mod fetch;
pub mod filter;
pub mod histogram;
pub mod output;
pub mod parser;
pub mod stats;
pub mod temporal;
pub mod views;
