use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Maximum key length echoed back in error messages
const MAX_KEY_DISPLAY_LENGTH: usize = 64;

impl StoreError {
    pub fn invalid_key(key: &str) -> Self {
        if key.chars().count() <= MAX_KEY_DISPLAY_LENGTH {
            StoreError::InvalidKey(key.to_string())
        } else {
            let truncated: String = key.chars().take(MAX_KEY_DISPLAY_LENGTH).collect();
            StoreError::InvalidKey(format!("{}...", truncated))
        }
    }
}
