use foodme_core::db::open_db_in_memory;
use foodme_core::security::password;
use foodme_core::{
    AccountService, PreferenceRepository, RepoError, SqlitePreferenceRepository,
    SqliteUserRepository, UserRepository, ValidationError,
};
use rusqlite::Connection;

const USERNAME: &str = "tester";
const FIRSTNAME: &str = "John";
const LASTNAME: &str = "Doe";
const EMAIL: &str = "johndoe@hotmail.ca";
const PASSWORD: &str = "HelloWorld123";

fn create_default_user(conn: &mut Connection) {
    let mut repo = SqliteUserRepository::try_new(conn).unwrap();
    repo.create_account(USERNAME, FIRSTNAME, LASTNAME, EMAIL, PASSWORD)
        .unwrap();
}

#[test]
fn create_and_get_roundtrip_starts_empty() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteUserRepository::try_new(&mut conn).unwrap();

    let created = repo
        .create_account(USERNAME, FIRSTNAME, LASTNAME, EMAIL, PASSWORD)
        .unwrap();
    assert_eq!(created.default_preference_id, None);
    assert!(created.liked.is_empty());
    assert!(created.disliked.is_empty());
    assert!(created.visited.is_empty());

    let loaded = repo.get_user(USERNAME).unwrap();
    assert_eq!(loaded, created);

    // The stored credential is an opaque hash, never the clear text.
    assert_ne!(loaded.password_hash, PASSWORD);
    password::check(PASSWORD, &loaded.password_hash).unwrap();
}

#[test]
fn duplicate_username_is_a_conflict() {
    let mut conn = open_db_in_memory().unwrap();
    create_default_user(&mut conn);

    let mut repo = SqliteUserRepository::try_new(&mut conn).unwrap();
    let err = repo
        .create_account(USERNAME, "Jane", "Roe", "jane@roe.org", "anotherpass")
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict { entity: "user", .. }));
}

#[test]
fn create_account_password_boundary() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteUserRepository::try_new(&mut conn).unwrap();

    let err = repo
        .create_account(USERNAME, FIRSTNAME, LASTNAME, EMAIL, "sixsix")
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::PasswordTooShort)
    ));

    // Seven characters is the first accepted length.
    repo.create_account(USERNAME, FIRSTNAME, LASTNAME, EMAIL, "sevense")
        .unwrap();
}

#[test]
fn create_account_rejects_bad_fields() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteUserRepository::try_new(&mut conn).unwrap();

    let err = repo
        .create_account(USERNAME, FIRSTNAME, LASTNAME, "nodots", PASSWORD)
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::InvalidEmail)
    ));

    let err = repo
        .create_account("abc", FIRSTNAME, LASTNAME, EMAIL, PASSWORD)
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::UsernameTooShort)
    ));

    let err = repo
        .create_account(USERNAME, "J0hn", LASTNAME, EMAIL, PASSWORD)
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::NonAlphabeticFirstName)
    ));

    let err = repo
        .create_account(USERNAME, FIRSTNAME, "D03", EMAIL, PASSWORD)
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::NonAlphabeticLastName)
    ));
}

#[test]
fn get_missing_user_is_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&mut conn).unwrap();

    let err = repo.get_user("nobody").unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "user", .. }));
}

#[test]
fn change_password_verifies_old_and_validates_new() {
    let mut conn = open_db_in_memory().unwrap();
    create_default_user(&mut conn);
    let mut repo = SqliteUserRepository::try_new(&mut conn).unwrap();

    let err = repo
        .change_password(USERNAME, "hahahaha", "Helloworld1234")
        .unwrap_err();
    assert!(matches!(err, RepoError::Authentication(_)));

    let err = repo
        .change_password(USERNAME, PASSWORD, "Hello")
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::PasswordTooShort)
    ));

    let updated = repo
        .change_password(USERNAME, PASSWORD, "Helloworld1234")
        .unwrap();
    password::check("Helloworld1234", &updated.password_hash).unwrap();
    assert!(password::check(PASSWORD, &updated.password_hash).is_err());
}

#[test]
fn reset_password_skips_old_password_check() {
    let mut conn = open_db_in_memory().unwrap();
    create_default_user(&mut conn);
    let mut repo = SqliteUserRepository::try_new(&mut conn).unwrap();

    let err = repo.reset_password(USERNAME, "short").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::PasswordTooShort)
    ));

    let updated = repo.reset_password(USERNAME, "Freshpass").unwrap();
    password::check("Freshpass", &updated.password_hash).unwrap();
}

#[test]
fn change_first_name_rejects_no_op_before_alphabetic_rule() {
    let mut conn = open_db_in_memory().unwrap();
    create_default_user(&mut conn);
    let mut repo = SqliteUserRepository::try_new(&mut conn).unwrap();

    // Same-as-current always wins, whatever the value looks like.
    let err = repo.change_first_name(USERNAME, FIRSTNAME).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::SameFirstName)
    ));

    let err = repo.change_first_name(USERNAME, "J0hn").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::NonAlphabeticFirstName)
    ));

    let updated = repo.change_first_name(USERNAME, "Jonathan").unwrap();
    assert_eq!(updated.first_name, "Jonathan");
    assert_eq!(repo.get_user(USERNAME).unwrap().first_name, "Jonathan");
}

#[test]
fn change_last_name_mirrors_first_name_rules() {
    let mut conn = open_db_in_memory().unwrap();
    create_default_user(&mut conn);
    let mut repo = SqliteUserRepository::try_new(&mut conn).unwrap();

    let err = repo.change_last_name(USERNAME, LASTNAME).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::SameLastName)
    ));

    let err = repo.change_last_name(USERNAME, "D03").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::NonAlphabeticLastName)
    ));

    let updated = repo.change_last_name(USERNAME, "Dont").unwrap();
    assert_eq!(updated.last_name, "Dont");
}

#[test]
fn change_email_requires_at_sign_and_dot() {
    let mut conn = open_db_in_memory().unwrap();
    create_default_user(&mut conn);
    let mut repo = SqliteUserRepository::try_new(&mut conn).unwrap();

    let err = repo.change_email(USERNAME, "jonathan.com").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::InvalidEmail)
    ));

    let updated = repo
        .change_email(USERNAME, "jonathan.dont@gmail.com")
        .unwrap();
    assert_eq!(updated.email, "jonathan.dont@gmail.com");
}

#[test]
fn delete_account_cascades_owned_preferences() {
    let mut conn = open_db_in_memory().unwrap();
    create_default_user(&mut conn);

    let pid = {
        let mut prefs = SqlitePreferenceRepository::try_new(&mut conn).unwrap();
        prefs
            .create_preference(USERNAME, "Montreal", "Italian", "$$$", "rating")
            .unwrap()
            .pid
    };

    {
        let mut repo = SqliteUserRepository::try_new(&mut conn).unwrap();
        let deleted = repo.delete_account(USERNAME).unwrap();
        assert_eq!(deleted.username, USERNAME);

        let err = repo.get_user(USERNAME).unwrap_err();
        assert!(matches!(err, RepoError::NotFound { entity: "user", .. }));
    }

    let prefs = SqlitePreferenceRepository::try_new(&mut conn).unwrap();
    let err = prefs.get_preference(pid).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            entity: "preference",
            ..
        }
    ));
}

#[test]
fn delete_missing_account_is_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteUserRepository::try_new(&mut conn).unwrap();

    let err = repo.delete_account("nobody").unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "user", .. }));
}

#[test]
fn listing_users_errors_when_empty_but_count_returns_zero() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteUserRepository::try_new(&mut conn).unwrap();

    let err = repo.list_all_users().unwrap_err();
    assert!(matches!(err, RepoError::EmptyListing("users")));
    assert_eq!(repo.count_users().unwrap(), 0);

    repo.create_account(USERNAME, FIRSTNAME, LASTNAME, EMAIL, PASSWORD)
        .unwrap();
    repo.create_account("second", "Jane", "Roe", "jane@roe.org", "longenough")
        .unwrap();

    let users = repo.list_all_users().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(repo.count_users().unwrap(), 2);
}

#[test]
fn user_snapshot_serializes_with_stable_field_names() {
    let mut conn = open_db_in_memory().unwrap();
    create_default_user(&mut conn);
    let repo = SqliteUserRepository::try_new(&mut conn).unwrap();

    let user = repo.get_user(USERNAME).unwrap();
    let value = serde_json::to_value(&user).unwrap();
    assert_eq!(value["username"], USERNAME);
    assert_eq!(value["first_name"], FIRSTNAME);
    assert!(value["default_preference_id"].is_null());
    assert!(value["liked"].as_array().unwrap().is_empty());
}

#[test]
fn service_wraps_repository_calls() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&mut conn).unwrap();
    let mut service = AccountService::new(repo);

    service
        .create_account("alice", "Alice", "Doe", "a@b.com", "longenough")
        .unwrap();
    assert_eq!(service.get_user("alice").unwrap().first_name, "Alice");
    assert_eq!(service.count_users().unwrap(), 1);
}
