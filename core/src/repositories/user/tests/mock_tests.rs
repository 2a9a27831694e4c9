//! Unit tests for the mock user directory

use uuid::Uuid;

use crate::domain::entities::user::{NewUser, NotificationPreferences};
use crate::errors::{AuthError, DomainError};
use crate::repositories::user::{MockUserDirectory, UserDirectory};

#[tokio::test]
async fn test_register_and_verify() {
    let directory = MockUserDirectory::new();
    let user = directory
        .register(NewUser::new("Asha", "Asha@Example.com", "secret-pass"))
        .await
        .unwrap();

    assert_eq!(user.email, "asha@example.com");

    let verified = directory
        .verify_credentials("asha@example.com", "secret-pass")
        .await
        .unwrap();
    assert_eq!(verified, Some(user.clone()));

    assert!(directory
        .verify_credentials("asha@example.com", "wrong")
        .await
        .unwrap()
        .is_none());
    assert!(directory
        .verify_credentials("nobody@example.com", "secret-pass")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let directory = MockUserDirectory::new();
    directory.add_user("Ravi", "ravi@example.com", "pw").await;

    let result = directory
        .register(NewUser::new("Ravi 2", "RAVI@example.com", "pw2"))
        .await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::EmailTaken))
    ));
}

#[tokio::test]
async fn test_preferences() {
    let directory = MockUserDirectory::new();
    let user = directory.add_user("Mina", "mina@example.com", "pw").await;

    assert_eq!(
        directory.notification_preferences(user.id).await.unwrap(),
        Some(NotificationPreferences::default())
    );

    let prefs = NotificationPreferences {
        receive_match_reminders: false,
        receive_email_notifications: true,
    };
    directory.set_preferences(user.id, prefs).await;
    assert_eq!(
        directory.notification_preferences(user.id).await.unwrap(),
        Some(prefs)
    );

    assert!(directory
        .notification_preferences(Uuid::new_v4())
        .await
        .unwrap()
        .is_none());
}
