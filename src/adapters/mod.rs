//! Concrete adapter implementations of the port traits.

pub mod file_config_adapter;
pub mod stooq_adapter;
pub mod text_ledger_adapter;
