//! Integration tests for account creation through the user service

mod common;

use recipe_api_backend::auth::PasswordService;
use recipe_api_backend::error::ApiError;
use recipe_api_backend::repositories::UserRepository;
use recipe_api_backend::services::UserService;

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_user_with_email_successful() {
    let app = common::TestApp::new().await;
    let email = common::unique_email();

    let user = UserService::create_user(&app.pool, Some(&email), "TestPass123")
        .await
        .unwrap();

    assert_eq!(user.email, email);
    assert!(user.is_active);
    assert!(!user.is_staff);
    assert!(!user.is_superuser);

    let record = UserRepository::find_by_id(&app.pool, user.id)
        .await
        .unwrap()
        .unwrap();
    assert!(PasswordService::verify("TestPass123", &record.password_hash).unwrap());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_new_user_email_normalized() {
    let app = common::TestApp::new().await;
    let local = uuid::Uuid::new_v4().simple().to_string();

    let email = format!("{}@VATSAL.com", local);

    let user = UserService::create_user(&app.pool, Some(&email), "test123")
        .await
        .unwrap();

    assert_eq!(user.email, format!("{}@vatsal.com", local));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_new_user_invalid_email() {
    let app = common::TestApp::new().await;

    let result = UserService::create_user(&app.pool, None, "test123").await;

    assert!(matches!(result, Err(ApiError::FieldValidation { .. })));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_new_super_user() {
    let app = common::TestApp::new().await;

    let user = UserService::create_superuser(&app.pool, Some(&common::unique_email()), "test123")
        .await
        .unwrap();

    assert!(user.is_superuser);
    assert!(user.is_staff);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_duplicate_account_conflicts() {
    let app = common::TestApp::new().await;
    let email = common::unique_email();

    UserService::create_user(&app.pool, Some(&email), "test123")
        .await
        .unwrap();
    let result = UserService::create_superuser(&app.pool, Some(&email), "test123").await;

    assert!(matches!(result, Err(ApiError::Conflict(_))));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_concurrent_create_same_email_conflicts() {
    let app = common::TestApp::new().await;

    for _ in 0..5 {
        let email = common::unique_email();

        let (first, second) = tokio::join!(
            UserService::create_user(&app.pool, Some(&email), "test123"),
            UserService::create_user(&app.pool, Some(&email), "test123"),
        );

        let results = [first, second];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(ApiError::Conflict(_)))));
    }
}
