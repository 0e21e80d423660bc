use serde::{Deserialize, Serialize};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Reply of the backend's root health endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default)]
    pub success: Option<bool>,
}

/// One transcript entry as serialized for history analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
    pub is_video: bool,
    pub is_video_analysis: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeHistoryRequest {
    pub messages: Vec<HistoryMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeHistoryResponse {
    pub success: bool,
    #[serde(default)]
    pub diagnoses: Vec<Diagnosis>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A structured diagnosis extracted from the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    pub diagnosis: String,
    /// 0.0 to 1.0
    pub confidence: f32,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub ai_recommendations: Vec<String>,
    #[serde(default)]
    pub follow_up_needed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoAnalysisResponse {
    pub analysis: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentAnalysisResponse {
    pub response: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    pub history: Vec<SessionRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddHistoryRequest {
    pub diagnosis: Diagnosis,
}

// ============================================================================
// Stored session records (read-only to this client)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub date: String,
    pub duration: String,
    #[serde(default)]
    pub symptoms: Vec<String>,
    pub diagnosis: String,
    /// 0.0 to 1.0
    pub confidence: f32,
    #[serde(default)]
    pub ai_recommendations: Vec<String>,
    #[serde(default)]
    pub vision_data: Option<VisionData>,
    #[serde(default)]
    pub voice_analysis: Option<VoiceAnalysis>,
    #[serde(default)]
    pub follow_up_needed: bool,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionData {
    pub blink_rate: Option<f32>,
    pub eye_movement: Option<String>,
    pub facial_expression: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceAnalysis {
    pub tone: Option<String>,
    pub pace: Option<String>,
    pub clarity: Option<String>,
}
