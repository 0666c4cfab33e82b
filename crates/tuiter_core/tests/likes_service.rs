use rusqlite::Connection;
use tuiter_core::db::open_db_in_memory;
use tuiter_core::{
    EntityRepository, LikeService, RepoError, SqliteLikeStore, SqliteTuitRepository,
    SqliteUserRepository, Tuit, User,
};

type SqliteLikeService<'conn> = LikeService<
    SqliteLikeStore<'conn>,
    SqliteUserRepository<'conn>,
    SqliteTuitRepository<'conn>,
>;

fn like_service(conn: &Connection) -> SqliteLikeService<'_> {
    LikeService::new(
        SqliteLikeStore::try_new(conn).unwrap(),
        SqliteUserRepository::try_new(conn).unwrap(),
        SqliteTuitRepository::try_new(conn).unwrap(),
    )
}

fn seed_user(conn: &Connection, username: &str) -> User {
    SqliteUserRepository::try_new(conn)
        .unwrap()
        .create(&User::new(username, "pw"))
        .unwrap()
}

fn seed_tuit(conn: &Connection, author: &User, text: &str) -> Tuit {
    SqliteTuitRepository::try_new(conn)
        .unwrap()
        .create(&Tuit::new(author.id, text))
        .unwrap()
}

fn usernames(users: &[User]) -> Vec<&str> {
    users.iter().map(|user| user.username.as_str()).collect()
}

fn texts(tuits: &[Tuit]) -> Vec<&str> {
    tuits.iter().map(|tuit| tuit.tuit.as_str()).collect()
}

#[test]
fn scenario_like_list_and_unlike() {
    let conn = open_db_in_memory().unwrap();
    let u1 = seed_user(&conn, "u1");
    let u2 = seed_user(&conn, "u2");
    let p1 = seed_tuit(&conn, &u1, "p1");
    let p2 = seed_tuit(&conn, &u2, "p2");
    let service = like_service(&conn);

    let (u1_id, u2_id) = (u1.id.to_string(), u2.id.to_string());
    let (p1_id, p2_id) = (p1.id.to_string(), p2.id.to_string());

    service.user_likes_tuit(&u1_id, &p1_id).unwrap();
    service.user_likes_tuit(&u1_id, &p2_id).unwrap();
    service.user_likes_tuit(&u2_id, &p1_id).unwrap();

    let likers = service.find_all_users_that_liked_tuit(&p1_id).unwrap();
    assert_eq!(likers, vec![u1.clone(), u2.clone()]);

    let liked = service.find_all_tuits_liked_by_user(&u1_id).unwrap();
    assert_eq!(liked, vec![p1.clone(), p2.clone()]);

    assert_eq!(service.user_unlikes_tuit(&u1_id, &p1_id).unwrap(), 1);
    let likers = service.find_all_users_that_liked_tuit(&p1_id).unwrap();
    assert_eq!(usernames(&likers), ["u2"]);
    let liked = service.find_all_tuits_liked_by_user(&u1_id).unwrap();
    assert_eq!(texts(&liked), ["p2"]);
}

#[test]
fn repeated_likes_keep_a_single_record() {
    let conn = open_db_in_memory().unwrap();
    let user = seed_user(&conn, "alice");
    let tuit = seed_tuit(&conn, &user, "hello");
    let service = like_service(&conn);
    let (uid, tid) = (user.id.to_string(), tuit.id.to_string());

    let first = service.user_likes_tuit(&uid, &tid).unwrap();
    for _ in 0..4 {
        assert_eq!(service.user_likes_tuit(&uid, &tid).unwrap(), first);
    }

    let likers = service.find_all_users_that_liked_tuit(&tid).unwrap();
    assert_eq!(likers, vec![user]);

    assert_eq!(service.user_unlikes_tuit(&uid, &tid).unwrap(), 1);
    assert_eq!(service.user_unlikes_tuit(&uid, &tid).unwrap(), 0);
    assert!(service
        .find_all_users_that_liked_tuit(&tid)
        .unwrap()
        .is_empty());
}

#[test]
fn unlike_of_never_liked_pair_is_a_no_op() {
    let conn = open_db_in_memory().unwrap();
    let user = seed_user(&conn, "alice");
    let tuit = seed_tuit(&conn, &user, "hello");
    let service = like_service(&conn);

    let removed = service
        .user_unlikes_tuit(&user.id.to_string(), &tuit.id.to_string())
        .unwrap();
    assert_eq!(removed, 0);
}

#[test]
fn listing_views_are_inverse_of_each_other() {
    let conn = open_db_in_memory().unwrap();
    let users: Vec<User> = ["a", "b", "c"]
        .iter()
        .map(|name| seed_user(&conn, name))
        .collect();
    let tuits: Vec<Tuit> = ["x", "y", "z"]
        .iter()
        .map(|text| seed_tuit(&conn, &users[0], text))
        .collect();
    let service = like_service(&conn);

    let pairs = [(0, 0), (0, 2), (1, 1), (2, 0), (2, 1), (2, 2)];
    for (u, t) in pairs {
        service
            .user_likes_tuit(&users[u].id.to_string(), &tuits[t].id.to_string())
            .unwrap();
    }

    for user in &users {
        let liked = service
            .find_all_tuits_liked_by_user(&user.id.to_string())
            .unwrap();
        for tuit in &tuits {
            let likers = service
                .find_all_users_that_liked_tuit(&tuit.id.to_string())
                .unwrap();
            assert_eq!(
                liked.contains(tuit),
                likers.contains(user),
                "views disagree for {} / {}",
                user.username,
                tuit.tuit
            );
        }
    }
}

#[test]
fn deleted_entities_disappear_from_listings() {
    let conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice");
    let bob = seed_user(&conn, "bob");
    let tuit = seed_tuit(&conn, &alice, "hello");
    let service = like_service(&conn);
    let tid = tuit.id.to_string();

    service.user_likes_tuit(&alice.id.to_string(), &tid).unwrap();
    service.user_likes_tuit(&bob.id.to_string(), &tid).unwrap();

    SqliteUserRepository::try_new(&conn)
        .unwrap()
        .delete_by_id(bob.id)
        .unwrap();
    let likers = service.find_all_users_that_liked_tuit(&tid).unwrap();
    assert_eq!(usernames(&likers), ["alice"]);

    SqliteTuitRepository::try_new(&conn)
        .unwrap()
        .delete_by_id(tuit.id)
        .unwrap();
    assert!(service
        .find_all_tuits_liked_by_user(&alice.id.to_string())
        .unwrap()
        .is_empty());
}

#[test]
fn malformed_ids_fail_with_invalid_reference() {
    let conn = open_db_in_memory().unwrap();
    let user = seed_user(&conn, "alice");
    let service = like_service(&conn);

    let err = service
        .user_likes_tuit(&user.id.to_string(), "61f0c0ffee")
        .unwrap_err();
    match err {
        RepoError::InvalidReference(reference) => {
            assert_eq!(reference.kind, "tuit");
            assert_eq!(reference.value, "61f0c0ffee");
        }
        other => panic!("unexpected error: {other}"),
    }

    assert!(matches!(
        service.find_all_tuits_liked_by_user(""),
        Err(RepoError::InvalidReference(_))
    ));
    assert!(matches!(
        service.user_unlikes_tuit("nope", "nope"),
        Err(RepoError::InvalidReference(_))
    ));
}

#[test]
fn store_failures_surface_as_store_unavailable() {
    let conn = open_db_in_memory().unwrap();
    let user = seed_user(&conn, "alice");
    let tuit = seed_tuit(&conn, &user, "hello");
    let service = like_service(&conn);

    conn.execute_batch("DROP TABLE likes;").unwrap();

    let err = service
        .user_likes_tuit(&user.id.to_string(), &tuit.id.to_string())
        .unwrap_err();
    assert!(matches!(err, RepoError::StoreUnavailable(_)));
}
