use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Body of a newsletter subscription request. Exists only for the duration
/// of one dispatch; constructed exclusively through [`SubscriptionRequest::new`]
/// so a blank email can never reach the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionRequest {
    pub email: String,
}

impl SubscriptionRequest {
    pub fn new(email: impl Into<String>) -> EngineResult<Self> {
        let email = email.into();
        if email.trim().is_empty() {
            return Err(EngineError::Validation("email is required".to_string()));
        }
        Ok(Self { email })
    }
}
