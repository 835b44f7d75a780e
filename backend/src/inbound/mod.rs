//! Inbound adapters that translate external requests into domain service
//! calls while keeping framework details at the edge.
//!
//! HTTP handlers live under [`http`]; [`csv_import`] feeds listing rows from
//! CSV files into the listing store.

pub mod csv_import;
pub mod http;
