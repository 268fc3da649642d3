/// Oddsmind — centralized constants.
/// Default endpoints, limits and per-helper generation knobs live here.

// ─── API Endpoints ────────────────────────────────────────────────────────────

pub mod endpoints {
    pub const OLLAMA_BASE_URL: &str = "http://localhost:11434";
    pub const LMSTUDIO_BASE_URL: &str = "http://localhost:1234";

    pub const OLLAMA_MODELS_PATH: &str = "/v1/models";
    pub const OLLAMA_EMBEDDINGS_PATH: &str = "/v1/embeddings";
    pub const OLLAMA_COMPLETIONS_PATH: &str = "/v1/completions";

    pub const LMSTUDIO_MODELS_PATH: &str = "/models";
    pub const LMSTUDIO_EMBED_PATH: &str = "/embed";
    pub const LMSTUDIO_GENERATE_PATH: &str = "/generate";
}

// ─── Default Settings ─────────────────────────────────────────────────────────

pub mod defaults {
    pub const TIMEOUT_SECS: u64 = 30;
    pub const BATCH_SIZE: usize = 16;
    pub const MODEL_TTL_SECS: u64 = 300;
}

// ─── Model Selection ──────────────────────────────────────────────────────────

pub mod selection {
    /// Name fragments that mark a model as an embedding model.
    pub const EMBED_KEYWORDS: &[&str] = &["embed", "embedding"];
    /// Name fragments that mark a model as instruction/chat tuned.
    pub const GENERATION_KEYWORDS: &[&str] = &["instruct", "chat", "gpt"];
}

// ─── Assistant Helpers ────────────────────────────────────────────────────────

pub mod assist {
    pub const PROP_BET_MAX_TOKENS: u32 = 200;
    pub const PROP_BET_TEMPERATURE: f32 = 0.3;

    pub const CONFIDENCE_MAX_TOKENS: u32 = 150;
    pub const CONFIDENCE_TEMPERATURE: f32 = 0.2;

    pub const CHAT_MAX_TOKENS: u32 = 250;
    pub const CHAT_TEMPERATURE: f32 = 0.4;

    pub const TOOLTIP_MAX_TOKENS: u32 = 60;
    pub const TOOLTIP_TEMPERATURE: f32 = 0.1;

    /// How many feature contributions make it into a confidence prompt.
    pub const TOP_FEATURES: usize = 5;
}

// ─── Environment ──────────────────────────────────────────────────────────────

pub mod env {
    pub const ENABLED: &str = "LOCAL_LLM_ENABLED";
    pub const PROVIDER: &str = "LOCAL_LLM_PROVIDER";
    pub const BASE_URL: &str = "LOCAL_LLM_BASE_URL";
    pub const TIMEOUT: &str = "LOCAL_LLM_TIMEOUT";
    pub const BATCH_SIZE: &str = "LOCAL_LLM_BATCH_SIZE";
    pub const MODEL_TTL: &str = "LOCAL_LLM_MODEL_TTL";
    pub const DEFAULT_MODEL: &str = "LOCAL_LLM_DEFAULT_MODEL";
}
