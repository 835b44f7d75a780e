//! Response payloads shared by several HTTP modules.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Plain acknowledgement body, for example `{"message":"Property removed"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Property removed")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
