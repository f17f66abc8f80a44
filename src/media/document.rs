use super::policy::DocumentSlot;
use super::MediaError;

pub fn file_size_mb(data: &[u8]) -> f64 {
    data.len() as f64 / (1024.0 * 1024.0)
}

pub fn file_size_kb(data: &[u8]) -> f64 {
    data.len() as f64 / 1024.0
}

/// Hard size check for document uploads. Documents are rejected, never
/// compressed.
pub fn validate_document_size(data: &[u8], max_size_mb: f64) -> Result<(), MediaError> {
    let actual_mb = file_size_mb(data);
    if actual_mb > max_size_mb {
        return Err(MediaError::SizeExceeded {
            actual_mb,
            max_mb: max_size_mb,
        });
    }
    Ok(())
}

pub fn validate_document_slot(data: &[u8], slot: DocumentSlot) -> Result<(), MediaError> {
    validate_document_size(data, slot.max_size_mb())
}
