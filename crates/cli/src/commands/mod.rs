//! CLI subcommands.

pub mod auth;
pub mod favorites;
pub mod search;
