//! # Error Types
//!
//! Custom error types for the ZG01 decoder using `thiserror`.

use thiserror::Error;

/// Main error type for the ZG01 decoder
#[derive(Debug, Error)]
pub enum Zg01Error {
    /// Serial port errors
    #[error("Serial error: {0}")]
    Serial(String),

    /// No usable capture device found
    #[error("No capture device found (tried: {0})")]
    SerialPortNotFound(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the ZG01 decoder
pub type Result<T> = std::result::Result<T, Zg01Error>;
