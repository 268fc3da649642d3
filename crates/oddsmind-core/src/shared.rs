//! Process-wide engine for callers that cannot thread one through.
//!
//! Everything here delegates to an ordinary [`RoutingEngine`]; prefer
//! constructing and passing an engine explicitly where possible.

use crate::config::Settings;
use crate::error::LlmError;
use crate::llm::{LocalProvider, RoutingEngine};
use std::sync::{Arc, OnceLock};

pub type SharedEngine = Arc<RoutingEngine<LocalProvider>>;

static ENGINE: OnceLock<Option<SharedEngine>> = OnceLock::new();

/// Build the shared engine from `settings`. Only the first successful call
/// has an effect; later calls return whatever was installed.
pub fn init(settings: &Settings) -> Result<Option<SharedEngine>, LlmError> {
    if let Some(existing) = ENGINE.get() {
        return Ok(existing.clone());
    }
    let engine = settings.build_engine()?;
    Ok(ENGINE.get_or_init(|| engine).clone())
}

/// The shared engine, if initialised and enabled.
pub fn engine() -> Option<SharedEngine> {
    ENGINE.get().cloned().flatten()
}
