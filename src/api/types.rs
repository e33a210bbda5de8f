use serde::{Deserialize, Serialize};

/// One capturable screen as reported by the agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenPayload {
    pub index: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreensResponse {
    pub screens: Vec<ScreenPayload>,
}

/// Body of `POST /api/session`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRequest {
    pub offer: String,
    pub screen: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub answer: String,
}
