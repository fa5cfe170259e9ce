//! An abstraction layer for chat-completion backends.
//!
//! This crate establishes the protocol the assistant uses to talk to a
//! remote completion endpoint, so that the conversation logic does not
//! depend on any particular vendor or transport.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod provider;
mod request;
mod response;

pub use error::*;
pub use provider::*;
pub use request::*;
pub use response::*;
