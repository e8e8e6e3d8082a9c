//! Test Fixtures
//!
//! Shared builders for resource records, mutation drafts, and model
//! signals used across the cache and picker test suites.

use crate::core::picker::MainModel;
use crate::core::remote::{Attachment, ResourceDraft, StylePresetDraft};
use crate::core::resources::ResourceRecord;

// =============================================================================
// Record Fixtures
// =============================================================================

/// Create a style preset record.
pub fn create_test_preset(id: &str, name: &str) -> ResourceRecord {
    ResourceRecord::new(id, name)
}

/// Create an embedding record tied to a base model family.
pub fn create_test_embedding(id: &str, name: &str, base_model: &str) -> ResourceRecord {
    ResourceRecord::new(id, name).with_base_model(base_model)
}

// =============================================================================
// Draft Fixtures
// =============================================================================

/// Create a full style preset draft, without an image.
pub fn create_preset_draft(name: &str, positive: &str, negative: &str) -> ResourceDraft {
    StylePresetDraft {
        name: name.to_string(),
        positive_prompt: positive.to_string(),
        negative_prompt: negative.to_string(),
        image: None,
    }
    .into()
}

/// Create a tiny PNG attachment for multipart tests.
pub fn create_png_attachment() -> Attachment {
    Attachment {
        field: "image".to_string(),
        file_name: "preview.png".to_string(),
        mime: "image/png".to_string(),
        bytes: vec![0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a],
    }
}

// =============================================================================
// Signal Fixtures
// =============================================================================

/// The selected-model signal for a given base family.
pub fn create_model_signal(base_model: &str) -> MainModel {
    MainModel {
        base_model: base_model.to_string(),
    }
}
