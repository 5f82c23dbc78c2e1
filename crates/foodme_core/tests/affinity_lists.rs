use foodme_core::db::open_db_in_memory;
use foodme_core::{
    AffinityRepository, AffinityService, RepoError, SqliteAffinityRepository,
    SqliteRestaurantRepository, SqliteUserRepository, UserRepository, RestaurantRepository,
    ValidationError,
};
use rusqlite::Connection;

const USERNAME: &str = "tester";

fn create_user(conn: &mut Connection, username: &str) {
    let mut repo = SqliteUserRepository::try_new(conn).unwrap();
    repo.create_account(username, "John", "Doe", "johndoe@hotmail.ca", "HelloWorld123")
        .unwrap();
}

#[test]
fn add_liked_creates_the_catalog_entry() {
    let mut conn = open_db_in_memory().unwrap();
    create_user(&mut conn, USERNAME);

    {
        let mut repo = SqliteAffinityRepository::try_new(&mut conn).unwrap();
        let restaurant = repo.add_liked(USERNAME, "r-1", "Chez Piggy").unwrap();
        assert_eq!(restaurant.restaurant_id, "r-1");
        assert_eq!(restaurant.restaurant_name, "Chez Piggy");
        assert_eq!(repo.list_all_liked(USERNAME).unwrap(), vec!["r-1"]);
    }

    let catalog = SqliteRestaurantRepository::try_new(&mut conn).unwrap();
    assert_eq!(catalog.get_all().unwrap().len(), 1);
}

#[test]
fn liked_and_disliked_are_mutually_exclusive() {
    let mut conn = open_db_in_memory().unwrap();
    create_user(&mut conn, USERNAME);
    let mut repo = SqliteAffinityRepository::try_new(&mut conn).unwrap();

    repo.add_liked(USERNAME, "r-1", "Chez Piggy").unwrap();
    assert_eq!(repo.list_all_liked(USERNAME).unwrap(), vec!["r-1"]);
    assert!(repo.list_all_disliked(USERNAME).unwrap().is_empty());

    // Disliking moves the id across, it never lives on both lists.
    repo.add_disliked(USERNAME, "r-1", "Chez Piggy").unwrap();
    assert!(repo.list_all_liked(USERNAME).unwrap().is_empty());
    assert_eq!(repo.list_all_disliked(USERNAME).unwrap(), vec!["r-1"]);

    repo.add_liked(USERNAME, "r-1", "Chez Piggy").unwrap();
    assert_eq!(repo.list_all_liked(USERNAME).unwrap(), vec!["r-1"]);
    assert!(repo.list_all_disliked(USERNAME).unwrap().is_empty());
}

#[test]
fn adding_twice_is_idempotent() {
    let mut conn = open_db_in_memory().unwrap();
    create_user(&mut conn, USERNAME);
    let mut repo = SqliteAffinityRepository::try_new(&mut conn).unwrap();

    repo.add_liked(USERNAME, "r-1", "Chez Piggy").unwrap();
    repo.add_liked(USERNAME, "r-1", "Chez Piggy").unwrap();
    assert_eq!(repo.list_all_liked(USERNAME).unwrap(), vec!["r-1"]);
}

#[test]
fn visited_is_independent_of_the_other_sets() {
    let mut conn = open_db_in_memory().unwrap();
    create_user(&mut conn, USERNAME);

    {
        let mut repo = SqliteAffinityRepository::try_new(&mut conn).unwrap();
        repo.add_visited(USERNAME, "r-1", "Chez Piggy").unwrap();
        repo.add_liked(USERNAME, "r-1", "Chez Piggy").unwrap();
        repo.add_disliked(USERNAME, "r-1", "Chez Piggy").unwrap();
    }

    let users = SqliteUserRepository::try_new(&mut conn).unwrap();
    let user = users.get_user(USERNAME).unwrap();
    assert!(user.visited.contains("r-1"));
    assert!(user.disliked.contains("r-1"));
    assert!(user.liked.is_empty());
}

#[test]
fn existing_catalog_entry_keeps_its_stored_name() {
    let mut conn = open_db_in_memory().unwrap();
    create_user(&mut conn, USERNAME);

    {
        let mut catalog = SqliteRestaurantRepository::try_new(&mut conn).unwrap();
        catalog.create_restaurant("r-1", "Chez Piggy").unwrap();
    }

    let mut repo = SqliteAffinityRepository::try_new(&mut conn).unwrap();
    let restaurant = repo.add_liked(USERNAME, "r-1", "Some Other Name").unwrap();
    assert_eq!(restaurant.restaurant_name, "Chez Piggy");
}

#[test]
fn remove_requires_membership() {
    let mut conn = open_db_in_memory().unwrap();
    create_user(&mut conn, USERNAME);
    let mut repo = SqliteAffinityRepository::try_new(&mut conn).unwrap();

    let err = repo.remove_liked(USERNAME, "r-1").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::NotOnLikedList(_))
    ));

    // Membership in the other set does not count.
    repo.add_disliked(USERNAME, "r-1", "Chez Piggy").unwrap();
    let err = repo.remove_liked(USERNAME, "r-1").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::NotOnLikedList(_))
    ));

    let removed = repo.remove_disliked(USERNAME, "r-1").unwrap();
    assert_eq!(removed.restaurant_id, "r-1");
    assert!(repo.list_all_disliked(USERNAME).unwrap().is_empty());

    let err = repo.remove_disliked(USERNAME, "r-1").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::NotOnDislikedList(_))
    ));
}

#[test]
fn remove_leaves_the_catalog_entry_in_place() {
    let mut conn = open_db_in_memory().unwrap();
    create_user(&mut conn, USERNAME);

    {
        let mut repo = SqliteAffinityRepository::try_new(&mut conn).unwrap();
        repo.add_liked(USERNAME, "r-1", "Chez Piggy").unwrap();
        repo.remove_liked(USERNAME, "r-1").unwrap();
    }

    let catalog = SqliteRestaurantRepository::try_new(&mut conn).unwrap();
    assert_eq!(catalog.get_all().unwrap().len(), 1);
}

#[test]
fn listings_are_sorted_and_empty_is_normal() {
    let mut conn = open_db_in_memory().unwrap();
    create_user(&mut conn, USERNAME);
    let mut repo = SqliteAffinityRepository::try_new(&mut conn).unwrap();

    assert!(repo.list_all_liked(USERNAME).unwrap().is_empty());

    repo.add_liked(USERNAME, "r-2", "Second").unwrap();
    repo.add_liked(USERNAME, "r-1", "First").unwrap();
    assert_eq!(repo.list_all_liked(USERNAME).unwrap(), vec!["r-1", "r-2"]);
}

#[test]
fn operations_reject_unknown_users() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteAffinityRepository::try_new(&mut conn).unwrap();

    let err = repo.add_liked("ghost", "r-1", "Chez Piggy").unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "user", .. }));

    let err = repo.list_all_liked("ghost").unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "user", .. }));
}

#[test]
fn add_rejects_empty_restaurant_fields() {
    let mut conn = open_db_in_memory().unwrap();
    create_user(&mut conn, USERNAME);
    let mut repo = SqliteAffinityRepository::try_new(&mut conn).unwrap();

    let err = repo.add_liked(USERNAME, "", "Chez Piggy").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::EmptyRestaurantField)
    ));

    let err = repo.add_visited(USERNAME, "r-1", "").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::EmptyRestaurantField)
    ));
}

#[test]
fn lists_are_scoped_per_user() {
    let mut conn = open_db_in_memory().unwrap();
    create_user(&mut conn, "alice");
    create_user(&mut conn, "bob");
    let mut repo = SqliteAffinityRepository::try_new(&mut conn).unwrap();

    repo.add_liked("alice", "r-1", "Chez Piggy").unwrap();
    repo.add_disliked("bob", "r-1", "Chez Piggy").unwrap();

    assert_eq!(repo.list_all_liked("alice").unwrap(), vec!["r-1"]);
    assert!(repo.list_all_disliked("alice").unwrap().is_empty());
    assert_eq!(repo.list_all_disliked("bob").unwrap(), vec!["r-1"]);
    assert!(repo.list_all_liked("bob").unwrap().is_empty());
}

#[test]
fn service_wraps_repository_calls() {
    let mut conn = open_db_in_memory().unwrap();
    create_user(&mut conn, USERNAME);

    let repo = SqliteAffinityRepository::try_new(&mut conn).unwrap();
    let mut service = AffinityService::new(repo);
    service.add_liked(USERNAME, "r-1", "Chez Piggy").unwrap();
    assert_eq!(service.list_all_liked(USERNAME).unwrap(), vec!["r-1"]);
}
