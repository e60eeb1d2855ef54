//! Data exchanged with the translation provider

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured translation returned by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationFields {
    pub translation: String,
    pub part_of_speech: String,
    pub example: String,
    pub example_translation: String,
}

/// Provider failures. The display form is the stable error code.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslateError {
    #[error("INVALID_WORD_INPUT")]
    InvalidWordInput,

    #[error("INVALID_API_KEY")]
    InvalidApiKey,

    #[error("GEMINI_REQUEST_FAILED")]
    RequestFailed,

    #[error("GEMINI_EMPTY_RESPONSE")]
    EmptyResponse,

    #[error("GEMINI_INVALID_RESPONSE")]
    InvalidResponse,
}

impl TranslateError {
    pub fn code(&self) -> &'static str {
        match self {
            TranslateError::InvalidWordInput => "INVALID_WORD_INPUT",
            TranslateError::InvalidApiKey => "INVALID_API_KEY",
            TranslateError::RequestFailed => "GEMINI_REQUEST_FAILED",
            TranslateError::EmptyResponse => "GEMINI_EMPTY_RESPONSE",
            TranslateError::InvalidResponse => "GEMINI_INVALID_RESPONSE",
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            TranslateError::InvalidWordInput => {
                "Please enter a single English word (letters, one hyphen or apostrophe, up to 32 characters)."
            }
            TranslateError::InvalidApiKey => {
                "Invalid API key. Please check your Gemini API key in preferences."
            }
            TranslateError::RequestFailed => "Gemini request failed. Please try again.",
            TranslateError::EmptyResponse | TranslateError::InvalidResponse => {
                "Gemini returned an unexpected response. Please try again."
            }
        }
    }
}
