//! Business logic and port definitions for chatlog.
//!
//! This crate defines the "ports" (the document store, the relay's outbound
//! sink, local email storage, the clock) that the infrastructure layer
//! implements, plus the logic built on them: the conversation / legacy
//! session upsert and the transcript event relay. It depends only on
//! `chatlog-types` -- never on `chatlog-infra` or any network crate.

pub mod clock;
pub mod ids;
pub mod relay;
pub mod store;
pub mod upsert;
