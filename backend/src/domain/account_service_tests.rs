//! Tests for the account service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{
    MockImageStore, MockPasswordHasher, MockSubscriptionRepository, MockUserRepository,
    UserPersistenceError,
};
use crate::domain::{Email, ErrorCode, Password, PasswordHash, PersonName, Username};
use rstest::rstest;
use zeroize::Zeroizing;

type Service =
    AccountService<MockUserRepository, MockSubscriptionRepository, MockPasswordHasher, MockImageStore>;

fn make_service(
    users: MockUserRepository,
    hasher: MockPasswordHasher,
    images: MockImageStore,
) -> Service {
    AccountService::new(
        Arc::new(users),
        Arc::new(MockSubscriptionRepository::new()),
        Arc::new(hasher),
        Arc::new(images),
    )
}

fn registration() -> Registration {
    Registration {
        email: Email::new("cook@example.com").expect("email"),
        username: Username::new("cook").expect("username"),
        first_name: PersonName::new("first_name", "Ada").expect("first name"),
        last_name: PersonName::new("last_name", "Byron").expect("last name"),
        password: Password::new("correct horse").expect("password"),
    }
}

fn stored_user(id: i64) -> User {
    User {
        id: UserId::new(id),
        email: "cook@example.com".to_owned(),
        username: "cook".to_owned(),
        first_name: "Ada".to_owned(),
        last_name: "Byron".to_owned(),
        avatar: None,
        is_superuser: false,
    }
}

fn upload() -> ImageUpload {
    ImageUpload::from_data_url("data:image/png;base64,aGVsbG8=").expect("image")
}

#[rstest]
#[tokio::test]
async fn register_hashes_password_before_storing() {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .times(1)
        .returning(|_| Ok(PasswordHash::new("$argon2id$hashed")));
    let mut users = MockUserRepository::new();
    users
        .expect_create()
        .withf(|user| user.password_hash.as_str() == "$argon2id$hashed")
        .times(1)
        .return_once(|_| Ok(stored_user(1)));

    let user = make_service(users, hasher, MockImageStore::new())
        .register(registration())
        .await
        .expect("registration succeeds");
    assert_eq!(user.id, UserId::new(1));
}

#[rstest]
#[tokio::test]
async fn taken_email_is_a_conflict() {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .returning(|_| Ok(PasswordHash::new("$argon2id$hashed")));
    let mut users = MockUserRepository::new();
    users
        .expect_create()
        .return_once(|_| Err(UserPersistenceError::duplicate("email")));

    let err = make_service(users, hasher, MockImageStore::new())
        .register(registration())
        .await
        .expect_err("duplicate email");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), "a user with this email already exists");
}

#[rstest]
#[tokio::test]
async fn wrong_current_password_is_invalid() {
    let mut users = MockUserRepository::new();
    users
        .expect_password_hash()
        .return_once(|_| Ok(Some(PasswordHash::new("$argon2id$old"))));
    users.expect_update_password().never();
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().return_const(false);

    let err = make_service(users, hasher, MockImageStore::new())
        .set_password(
            Principal::user(UserId::new(1)),
            PasswordChange {
                current_password: Zeroizing::new("guess".to_owned()),
                new_password: Password::new("brand new pass").expect("password"),
            },
        )
        .await
        .expect_err("wrong password");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        err.details()
            .and_then(|details| details.get("field"))
            .and_then(|field| field.as_str()),
        Some("current_password")
    );
}

#[rstest]
#[tokio::test]
async fn correct_current_password_updates_hash() {
    let mut users = MockUserRepository::new();
    users
        .expect_password_hash()
        .return_once(|_| Ok(Some(PasswordHash::new("$argon2id$old"))));
    users
        .expect_update_password()
        .withf(|id, hash| *id == UserId::new(1) && hash.as_str() == "$argon2id$new")
        .times(1)
        .return_once(|_, _| Ok(()));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().return_const(true);
    hasher
        .expect_hash()
        .returning(|_| Ok(PasswordHash::new("$argon2id$new")));

    make_service(users, hasher, MockImageStore::new())
        .set_password(
            Principal::user(UserId::new(1)),
            PasswordChange {
                current_password: Zeroizing::new("old password".to_owned()),
                new_password: Password::new("brand new pass").expect("password"),
            },
        )
        .await
        .expect("password changed");
}

#[rstest]
#[tokio::test]
async fn replacing_avatar_removes_previous_file() {
    let mut images = MockImageStore::new();
    images
        .expect_save()
        .withf(|kind, _| *kind == ImageKind::Avatar)
        .return_once(|_, _| Ok(StoredImage::new("users/avatars/new.png")));
    images
        .expect_remove()
        .withf(|image| image.as_str() == "users/avatars/old.png")
        .times(1)
        .return_once(|_| Ok(()));
    let mut users = MockUserRepository::new();
    users
        .expect_set_avatar()
        .return_once(|_, _| Ok(Some(StoredImage::new("users/avatars/old.png"))));

    let stored = make_service(users, MockPasswordHasher::new(), images)
        .set_avatar(Principal::user(UserId::new(1)), upload())
        .await
        .expect("avatar stored");
    assert_eq!(stored.as_str(), "users/avatars/new.png");
}

#[rstest]
#[tokio::test]
async fn removing_missing_avatar_is_a_no_op() {
    let mut images = MockImageStore::new();
    images.expect_remove().never();
    let mut users = MockUserRepository::new();
    users.expect_set_avatar().return_once(|_, _| Ok(None));

    make_service(users, MockPasswordHasher::new(), images)
        .remove_avatar(Principal::user(UserId::new(1)))
        .await
        .expect("no avatar to remove");
}
