//! Data models for the translation history

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::{Schema, SchemaViolation};
use crate::translate::TranslationFields;

/// A translated word saved to history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRecord {
    /// Opaque unique identifier
    pub id: String,
    pub word: String,
    pub translation: String,
    pub part_of_speech: String,
    pub example: String,
    pub example_translation: String,
    /// Creation time in milliseconds since the epoch
    pub timestamp: i64,
}

impl TranslationRecord {
    pub fn new(word: impl Into<String>, fields: TranslationFields, now: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            word: word.into(),
            translation: fields.translation,
            part_of_speech: fields.part_of_speech,
            example: fields.example,
            example_translation: fields.example_translation,
            timestamp: now,
        }
    }
}

impl Schema for TranslationRecord {
    fn validate(&self) -> Result<(), SchemaViolation> {
        if self.id.is_empty() {
            return Err(SchemaViolation("translation id is empty".to_string()));
        }
        if self.word.is_empty() {
            return Err(SchemaViolation(format!("translation {} has an empty word", self.id)));
        }
        Ok(())
    }
}
