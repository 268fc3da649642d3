pub mod error;
pub mod constants;
pub mod llm;
pub mod assist;
pub mod config;
pub mod shared;

// Re-export key types
pub use error::{LlmError, Result};
pub use llm::{
    EngineOptions, EngineStatus, LmStudioClient, LocalProvider, ModelRegistry, OllamaClient,
    ProviderClient, ProviderEndpoint, ProviderKind, RoutingEngine, SelectionPolicy, Task,
};
pub use assist::{PredictionRecord, PromptContext};
pub use config::Settings;
