//! CLI smoke entry point.
//!
//! # Responsibility
//! - Bring the core up from environment config and exercise one
//!   like/unlike round trip end to end.
//! - Keep output deterministic apart from generated ids.

use std::process::ExitCode;
use tuiter_core::{
    init_from_config, CoreConfig, EntityRepository, LikeService, SqliteLikeStore,
    SqliteTuitRepository, SqliteUserRepository, Tuit, User,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_run module=cli status=error error={err}");
            eprintln!("tuiter_cli: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = CoreConfig::from_env()?;
    init_from_config(&config)?;
    println!("tuiter_core version={}", tuiter_core::core_version());

    let conn = config.open_db()?;
    let users = SqliteUserRepository::try_new(&conn)?;
    let tuits = SqliteTuitRepository::try_new(&conn)?;

    let author = users.create(&User::new(unique_name("author"), "smoke"))?;
    let fan = users.create(&User::new(unique_name("fan"), "smoke"))?;
    let tuit = tuits.create(&Tuit::new(author.id, "smoke test tuit"))?;

    let likes = LikeService::new(
        SqliteLikeStore::try_new(&conn)?,
        SqliteUserRepository::try_new(&conn)?,
        SqliteTuitRepository::try_new(&conn)?,
    );
    let (fan_id, tuit_id) = (fan.id.to_string(), tuit.id.to_string());

    let like = likes.user_likes_tuit(&fan_id, &tuit_id)?;
    println!("liked id={} user={} tuit={}", like.id, like.liked_by, like.tuit);

    let likers = likes.find_all_users_that_liked_tuit(&tuit_id)?;
    println!("likers count={}", likers.len());

    let removed = likes.user_unlikes_tuit(&fan_id, &tuit_id)?;
    println!("unliked removed={removed}");

    // Leave a file-backed database as it was found.
    tuits.delete_by_id(tuit.id)?;
    users.delete_by_id(fan.id)?;
    users.delete_by_id(author.id)?;
    Ok(())
}

fn unique_name(prefix: &str) -> String {
    format!("{prefix}-{}", tuiter_core::UserId::new())
}
