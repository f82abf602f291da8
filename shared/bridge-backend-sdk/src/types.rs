//! Wire types for the backend API

use serde::{Deserialize, Serialize};

/// Body of `POST /trigger_target_call`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerCallRequest {
    pub agent: String,
    pub numbers: Vec<String>,
}

impl TriggerCallRequest {
    pub fn new(agent: &str, numbers: &[String]) -> Self {
        Self {
            agent: agent.to_string(),
            numbers: numbers.to_vec(),
        }
    }
}
