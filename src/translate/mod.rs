//! Word lookups against the external translation provider
//!
//! The provider itself lives outside this crate and is reached through the
//! [`Translator`] trait. [`LookupCoordinator`] keeps at most one lookup live
//! per input field and auto-saves successful translations to history.

pub mod lookup;
pub mod models;

pub use lookup::{LookupCoordinator, LookupError, LookupOutcome, RequestTicket, Translator};
pub use models::{TranslateError, TranslationFields};
