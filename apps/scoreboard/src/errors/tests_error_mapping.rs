// Unit tests for error mapping - pure domain logic without transport dependencies
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::{AppError, ErrorCode};

#[test]
fn maps_validation_kinds_to_codes() {
    let cases = [
        (
            ValidationKind::InvalidTeamIdentifier,
            ErrorCode::InvalidTeamIdentifier,
        ),
        (
            ValidationKind::MatchAlreadyCompleted,
            ErrorCode::MatchAlreadyCompleted,
        ),
        (
            ValidationKind::InvalidConfiguration,
            ErrorCode::InvalidConfiguration,
        ),
        (
            ValidationKind::InconsistentSnapshot,
            ErrorCode::InconsistentSnapshot,
        ),
        (ValidationKind::NothingToUndo, ErrorCode::NothingToUndo),
        (
            ValidationKind::Other("whatever".into()),
            ErrorCode::ValidationError,
        ),
    ];
    for (kind, expected) in cases {
        let app: AppError = DomainError::validation(kind, "bad").into();
        assert_eq!(app.code(), expected);
        assert!(matches!(app, AppError::Validation { .. }));
    }
}

#[test]
fn maps_conflicts() {
    let full = DomainError::conflict(ConflictKind::CapacityReached, "registry full");
    let app: AppError = full.into();
    assert_eq!(app.code().as_str(), "CAPACITY_REACHED");

    let other = DomainError::conflict(ConflictKind::Other("x".to_string()), "generic conflict");
    let app: AppError = other.into();
    assert_eq!(app.code().as_str(), "CONFLICT");
}

#[test]
fn maps_not_found() {
    let nf = DomainError::not_found(NotFoundKind::Match, "no match");
    let app: AppError = nf.into();
    assert_eq!(app.code().as_str(), "MATCH_NOT_FOUND");
    assert_eq!(app.detail(), "no match");
}

#[test]
fn report_humanizes_code() {
    let app = AppError::invalid(ErrorCode::MatchAlreadyCompleted, "match is over");
    let report = app.report();
    assert_eq!(report.code, "MATCH_ALREADY_COMPLETED");
    assert_eq!(report.title, "Match Already Completed");
    assert_eq!(report.detail, "match is over");
}
