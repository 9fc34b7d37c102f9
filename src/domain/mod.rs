//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `dialog` - The scripted intake conversation and its engine
//! - `messaging` - Inbound message model and trigger vocabulary

pub mod dialog;
pub mod foundation;
pub mod messaging;
