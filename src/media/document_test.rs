use super::document::{file_size_mb, validate_document_size, validate_document_slot};
use super::policy::DocumentSlot;
use super::MediaError;

#[test]
fn document_under_budget_is_accepted() {
    let data = vec![0u8; 1024 * 1024];
    assert!(validate_document_size(&data, 10.0).is_ok());
}

#[test]
fn document_at_exact_budget_is_accepted() {
    // The bound is strictly-greater-than.
    let data = vec![0u8; 10 * 1024 * 1024];
    assert!(validate_document_size(&data, 10.0).is_ok());
}

#[test]
fn document_over_budget_is_rejected() {
    let data = vec![0u8; 10 * 1024 * 1024 + 1];
    let err = validate_document_size(&data, 10.0).unwrap_err();
    let MediaError::SizeExceeded { actual_mb, max_mb } = err;
    assert!(actual_mb > 10.0);
    assert_eq!(max_mb, 10.0);
}

#[test]
fn error_message_names_both_sizes() {
    let data = vec![0u8; 3 * 1024 * 1024];
    let err = validate_document_size(&data, 2.0).unwrap_err();
    assert_eq!(
        err.to_string(),
        "file size (3.00 MB) exceeds maximum allowed size of 2 MB"
    );
}

#[test]
fn slot_budgets_split_at_ten_and_twenty_mb() {
    let twelve_mb = vec![0u8; 12 * 1024 * 1024];
    assert!(validate_document_slot(&twelve_mb, DocumentSlot::FacultyCv).is_err());
    assert!(validate_document_slot(&twelve_mb, DocumentSlot::CourseOutline).is_err());
    assert!(validate_document_slot(&twelve_mb, DocumentSlot::AcademicCalendar).is_err());
    assert!(validate_document_slot(&twelve_mb, DocumentSlot::CurriculumPdf).is_ok());
    assert!(validate_document_slot(&twelve_mb, DocumentSlot::AdmissionResult).is_ok());
    assert!(validate_document_slot(&twelve_mb, DocumentSlot::PostAttachment).is_ok());
}

#[test]
fn file_size_helpers_convert_bytes() {
    assert_eq!(file_size_mb(&vec![0u8; 2 * 1024 * 1024]), 2.0);
    assert_eq!(file_size_mb(&[]), 0.0);
}
