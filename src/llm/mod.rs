// LLM abstraction layer

pub mod gemini;
pub mod provider;

pub use gemini::GeminiAdapter;
pub use provider::DocumentAnalyzer;
