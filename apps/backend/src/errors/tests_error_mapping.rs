// Unit tests for error mapping - pure domain logic without HTTP or database dependencies
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::{AppError, ErrorCode};

#[test]
fn maps_validation_to_400() {
    let app: AppError = DomainError::validation("meal_type must not be empty").into();
    assert_eq!(app.code(), ErrorCode::ValidationError);
    assert_eq!(app.status().as_u16(), 400);
}

#[test]
fn maps_unknown_food() {
    let app: AppError = DomainError::UnknownFood(42).into();
    assert_eq!(app.code().as_str(), "UNKNOWN_FOOD");
    assert_eq!(app.status().as_u16(), 400);
}

#[test]
fn maps_not_found_kinds() {
    let meal: AppError = DomainError::not_found(NotFoundKind::MealLog, "meal 1").into();
    assert_eq!(meal.code(), ErrorCode::MealLogNotFound);
    assert_eq!(meal.status().as_u16(), 404);

    let user: AppError = DomainError::not_found(NotFoundKind::User, "user 1").into();
    assert_eq!(user.code(), ErrorCode::UserNotFound);

    // Food and anything else fall back to the generic code
    let food: AppError = DomainError::not_found(NotFoundKind::Food, "food 1").into();
    assert_eq!(food.code(), ErrorCode::NotFound);
}

#[test]
fn forbidden_hides_owner_detail() {
    let app: AppError = DomainError::forbidden("meal log 3 belongs to user 9").into();
    assert_eq!(app.status().as_u16(), 403);
    assert_eq!(app.code(), ErrorCode::Forbidden);
}

#[test]
fn maps_infra_errors() {
    let down: AppError = DomainError::infra(InfraErrorKind::DbUnavailable, "pool closed").into();
    assert_eq!(down.code(), ErrorCode::DbUnavailable);
    assert_eq!(down.status().as_u16(), 503);

    let timeout: AppError = DomainError::infra(InfraErrorKind::Timeout, "slow query").into();
    assert_eq!(timeout.code(), ErrorCode::DbError);
    assert_eq!(timeout.status().as_u16(), 500);
}

#[test]
fn maps_conflicts_to_409() {
    let email: AppError = DomainError::conflict(ConflictKind::UniqueEmail, "Email already in use").into();
    assert_eq!(email.code(), ErrorCode::UniqueEmail);
    assert_eq!(email.status().as_u16(), 409);

    let other: AppError = DomainError::conflict(ConflictKind::Other("Unique".into()), "dup").into();
    assert_eq!(other.code(), ErrorCode::Conflict);
}
