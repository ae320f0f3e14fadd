use axum::http::StatusCode;
use axum::response::IntoResponse;
use tapcard::error::{AppError, FieldError};
use validator::Validate;

#[test]
fn test_status_codes() {
    let cases = [
        (AppError::NotFound("x".into()), StatusCode::NOT_FOUND, "NOT_FOUND"),
        (AppError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        (AppError::Forbidden("x".into()), StatusCode::FORBIDDEN, "FORBIDDEN"),
        (AppError::Conflict("x".into()), StatusCode::CONFLICT, "CONFLICT"),
        (AppError::Validation("x".into()), StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        (AppError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    ];
    for (err, status, code) in cases {
        assert_eq!(err.status_code(), status);
        assert_eq!(err.error_code(), code);
    }
}

#[test]
fn test_internal_details_are_hidden() {
    let err = AppError::Internal("connection string leaked".into());
    assert_eq!(err.message(), "Internal server error");

    let err = AppError::Database(sea_orm::DbErr::Custom("secret".into()));
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.message(), "Internal server error");
}

#[test]
fn test_non_unique_db_error_is_not_a_conflict() {
    let err = AppError::conflict_on_unique(sea_orm::DbErr::Custom("boom".into()), "taken");
    assert!(matches!(err, AppError::Database(_)));
}

#[tokio::test]
async fn test_error_body_shape() {
    let response = AppError::NotFound("Profile not found".into()).into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(json["message"], "Profile not found");
    assert_eq!(json["code"], "NOT_FOUND");
    assert!(json.get("fields").is_none());
}

#[tokio::test]
async fn test_field_errors_are_listed() {
    let err = AppError::validation_fields(vec![
        FieldError::new("slug", "already in use"),
        FieldError::with_code("theme_color", "bad color", "color"),
    ]);
    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(json["fields"][0]["field"], "slug");
    assert_eq!(json["fields"][1]["code"], "color");
}

#[derive(Validate)]
struct Sample {
    #[validate(length(min = 3, message = "too short"))]
    name: String,
    #[validate(range(min = 0))]
    count: i32,
}

#[test]
fn test_validator_errors_convert_sorted() {
    let sample = Sample {
        name: "a".into(),
        count: -1,
    };
    let err: AppError = sample.validate().unwrap_err().into();
    match err {
        AppError::ValidationErrors(fields) => {
            let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
            assert_eq!(names, vec!["count", "name"]);
            assert_eq!(fields[1].message, "too short");
        }
        other => panic!("expected ValidationErrors, got {:?}", other),
    }
}
