//! Infrastructure layer: item stores, store configuration, dispatch.

pub mod command_dispatcher;
pub mod config;
pub mod item_store;
