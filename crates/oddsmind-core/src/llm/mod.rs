mod traits;
mod http;
mod ollama;
mod lmstudio;
pub mod provider;
pub mod registry;
pub mod engine;

pub use traits::*;
pub use ollama::OllamaClient;
pub use lmstudio::LmStudioClient;
pub use provider::{LocalProvider, ProviderEndpoint, ProviderKind};
pub use registry::{ModelRegistry, SelectionPolicy, SelectionRule, Task};
pub use engine::{EngineOptions, EngineStatus, RoutingEngine};
