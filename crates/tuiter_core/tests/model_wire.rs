use tuiter_core::{AccountType, Like, LikeId, TuitId, User, UserId, ValidationError};

#[test]
fn like_serializes_ids_as_plain_strings() {
    let like = Like {
        id: LikeId::parse("11111111-2222-4333-8444-555555555555").unwrap(),
        liked_by: UserId::parse("21111111-2222-4333-8444-555555555555").unwrap(),
        tuit: TuitId::parse("31111111-2222-4333-8444-555555555555").unwrap(),
    };

    let json = serde_json::to_value(like).unwrap();
    assert_eq!(json["id"], "11111111-2222-4333-8444-555555555555");
    assert_eq!(json["liked_by"], "21111111-2222-4333-8444-555555555555");
    assert_eq!(json["tuit"], "31111111-2222-4333-8444-555555555555");

    let decoded: Like = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, like);
}

#[test]
fn user_serializes_account_type_in_snake_case() {
    let mut user = User::new("alice", "pw");
    user.account_type = AccountType::Professional;

    let json = serde_json::to_value(&user).unwrap();
    assert_eq!(json["account_type"], "professional");
    assert_eq!(json["username"], "alice");
    assert!(json["email"].is_null());
}

#[test]
fn new_user_defaults() {
    let user = User::new("alice", "pw");
    assert!(!user.id.is_nil());
    assert_eq!(user.account_type, AccountType::Personal);
    assert!(user.joined > 0);
    assert_eq!(user.validate(), Ok(()));
}

#[test]
fn validate_rejects_nil_id() {
    let mut user = User::new("alice", "pw");
    user.id = UserId::from_uuid(uuid::Uuid::nil());
    assert_eq!(user.validate(), Err(ValidationError::NilId));
}
