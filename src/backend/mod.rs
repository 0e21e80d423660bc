//! Client for the external inference backend
//!
//! The backend performs the actual AI work (chat completion, video and
//! document analysis, diagnosis extraction); this module only speaks its
//! HTTP contract.

pub mod client;
pub mod types;

pub use client::{BackendClient, HttpBackendClient};
pub use types::{
    AnalyzeHistoryResponse, ChatResponse, Diagnosis, HealthResponse, HistoryMessage,
    SessionRecord, VisionData, VoiceAnalysis,
};
