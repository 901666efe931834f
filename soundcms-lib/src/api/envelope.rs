//! Response envelope of the module REST surface

use serde::Deserialize;

use crate::error::ApiError;

/// `{success, data, message}` wrapper every endpoint answers with.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the backend accepted the request.
    #[serde(default = "default_success")]
    pub success: bool,
    /// Payload, absent on failure and on some writes.
    pub data: Option<T>,
    /// Human-readable status message.
    #[serde(default)]
    pub message: Option<String>,
}

fn default_success() -> bool {
    true
}

impl<T> ApiResponse<T> {
    /// Converts the envelope into its payload.
    ///
    /// An unsuccessful envelope becomes [`ApiError::Rejected`]; a successful
    /// envelope without payload becomes a parse error.
    pub fn into_data(self) -> Result<T, ApiError> {
        if !self.success {
            return Err(ApiError::rejected(
                self.message.unwrap_or_else(|| "request failed".to_string()),
            ));
        }
        self.data
            .ok_or_else(|| ApiError::decode("response envelope has no data"))
    }

    /// Checks the success flag, discarding any payload.
    pub fn into_ack(self) -> Result<(), ApiError> {
        if self.success {
            Ok(())
        } else {
            Err(ApiError::rejected(
                self.message.unwrap_or_else(|| "request failed".to_string()),
            ))
        }
    }
}
