mod common;

use reqwest::StatusCode;
use serde_json::{json, Value};

async fn guess(
    client: &reqwest::Client,
    base: &str,
    token: &str,
    story_id: &str,
    code: &str,
) -> anyhow::Result<reqwest::Response> {
    Ok(client
        .post(format!("{}/stories/{}/guess", base, story_id))
        .bearer_auth(token)
        .json(&json!({ "guess_code": code }))
        .send()
        .await?)
}

#[tokio::test]
async fn guess_validation_order() -> anyhow::Result<()> {
    let Some(app) = common::try_spawn_app().await? else { return Ok(()) };
    let client = reqwest::Client::new();
    let (_o, owner_token) = common::register_and_login(&client, &app.base, "gv_owner").await?;
    let (_g, guesser_token) = common::register_and_login(&client, &app.base, "gv_guesser").await?;

    let album = common::create_album(&client, &app.base, &owner_token, Some("FR"), Some("http://x/c.jpg")).await?;
    let story: Value = common::create_story(&client, &app.base, &owner_token, album["id"].as_str().unwrap())
        .await?
        .json()
        .await?;
    let story_id = story["id"].as_str().unwrap();

    // malformed code fails before anything else
    let resp = guess(&client, &app.base, &guesser_token, story_id, "FRA").await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let resp = guess(&client, &app.base, &guesser_token, story_id, "ZZ").await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // unknown story
    let resp = guess(&client, &app.base, &guesser_token, &uuid::Uuid::new_v4().to_string(), "FR").await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // owners may not play their own round
    let resp = guess(&client, &app.base, &owner_token, story_id, "FR").await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let guesses: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM story_guesses WHERE story_id = $1")
        .bind(uuid::Uuid::parse_str(story_id)?)
        .fetch_one(&app.pool)
        .await?;
    assert_eq!(guesses, 0);

    // expired stories reject guesses regardless of the guesser
    common::expire_story(&app.pool, story_id).await?;
    let resp = guess(&client, &app.base, &guesser_token, story_id, "FR").await?;
    assert_eq!(resp.status(), StatusCode::GONE);
    let body: Value = resp.json().await?;
    assert_eq!(body["code"], "story_expired");

    app.server.abort();
    Ok(())
}

#[tokio::test]
async fn repeat_guess_overwrites_single_row() -> anyhow::Result<()> {
    let Some(app) = common::try_spawn_app().await? else { return Ok(()) };
    let client = reqwest::Client::new();
    let (_o, owner_token) = common::register_and_login(&client, &app.base, "ig_owner").await?;
    let (guesser_id, guesser_token) = common::register_and_login(&client, &app.base, "ig_guesser").await?;

    let album = common::create_album(&client, &app.base, &owner_token, Some("FR"), Some("http://x/c.jpg")).await?;
    let story: Value = common::create_story(&client, &app.base, &owner_token, album["id"].as_str().unwrap())
        .await?
        .json()
        .await?;
    let story_id = story["id"].as_str().unwrap();

    // lowercase input is normalized on write
    let resp = guess(&client, &app.base, &guesser_token, story_id, "fr").await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let first: Value = resp.json().await?;
    assert_eq!(first["guess_code"], "FR");
    assert_eq!(first["user_id"].as_str().unwrap(), guesser_id.to_string());

    // changing one's mind replaces the guess instead of adding a row
    let resp = guess(&client, &app.base, &guesser_token, story_id, "jp").await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let second: Value = resp.json().await?;
    assert_eq!(second["guess_code"], "JP");

    let rows: Vec<(String,)> = sqlx::query_as("SELECT guess_code FROM story_guesses WHERE story_id = $1")
        .bind(uuid::Uuid::parse_str(story_id)?)
        .fetch_all(&app.pool)
        .await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0, "JP");

    app.server.abort();
    Ok(())
}

#[tokio::test]
async fn stats_and_answer_are_gated_by_ownership_and_expiry() -> anyhow::Result<()> {
    let Some(app) = common::try_spawn_app().await? else { return Ok(()) };
    let client = reqwest::Client::new();
    let (_o, owner_token) = common::register_and_login(&client, &app.base, "sg_owner").await?;
    let (_g1, g1_token) = common::register_and_login(&client, &app.base, "sg_guesser1").await?;
    let (_g2, g2_token) = common::register_and_login(&client, &app.base, "sg_guesser2").await?;

    let album = common::create_album(&client, &app.base, &owner_token, Some("FR"), Some("http://x/c.jpg")).await?;
    let story: Value = common::create_story(&client, &app.base, &owner_token, album["id"].as_str().unwrap())
        .await?
        .json()
        .await?;
    let story_id = story["id"].as_str().unwrap();

    let resp = guess(&client, &app.base, &g1_token, story_id, "FR").await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let fetch = |token: String| {
        let client = client.clone();
        let url = format!("{}/stories/{}", app.base, story_id);
        async move {
            let v: Value = client.get(url).bearer_auth(token).send().await?.json().await?;
            anyhow::Ok(v)
        }
    };

    // fresh viewer of an active round: no stats, no answer, may guess
    let v = fetch(g2_token.clone()).await?;
    assert!(v["stats"].is_null());
    assert!(v["story"]["country_code"].is_null());
    assert!(v["user_guess"].is_null());
    assert_eq!(v["can_guess"], true);
    assert_eq!(v["is_owner"], false);
    assert_eq!(v["is_expired"], false);
    assert_eq!(v["can_view"], true);

    // prior guesser: still no stats, but their own guess is echoed back
    let v = fetch(g1_token.clone()).await?;
    assert!(v["stats"].is_null());
    assert_eq!(v["user_guess"]["guess_code"], "FR");
    assert_eq!(v["can_guess"], false);

    // owner of an active round sees the aggregate
    let v = fetch(owner_token.clone()).await?;
    assert_eq!(v["is_owner"], true);
    assert_eq!(v["can_guess"], false);
    assert_eq!(v["stats"]["guess_count"], 1);
    assert_eq!(v["stats"]["correct_count"], 1);
    assert_eq!(v["stats"]["accuracy"], 1.0);
    assert_eq!(v["story"]["country_code"], "FR");

    // the bare stats endpoint applies the same gate
    let resp = client
        .get(format!("{}/stories/{}/stats", app.base, story_id))
        .bearer_auth(&g2_token)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let resp = client
        .get(format!("{}/stories/{}/stats", app.base, story_id))
        .bearer_auth(&owner_token)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    // after expiry everyone sees the reveal
    common::expire_story(&app.pool, story_id).await?;
    let v = fetch(g2_token.clone()).await?;
    assert_eq!(v["is_expired"], true);
    assert_eq!(v["can_guess"], false);
    assert_eq!(v["stats"]["guess_count"], 1);
    assert_eq!(v["story"]["country_code"], "FR");

    let resp = client
        .get(format!("{}/stories/{}/stats", app.base, story_id))
        .bearer_auth(&g2_token)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let stats: Value = resp.json().await?;
    assert_eq!(stats["guess_count"], 1);
    assert_eq!(stats["correct_count"], 1);

    app.server.abort();
    Ok(())
}

#[tokio::test]
async fn story_with_no_guesses_reads_zero_stats() -> anyhow::Result<()> {
    let Some(app) = common::try_spawn_app().await? else { return Ok(()) };
    let client = reqwest::Client::new();
    let (_o, owner_token) = common::register_and_login(&client, &app.base, "zero_owner").await?;

    let album = common::create_album(&client, &app.base, &owner_token, Some("NO"), Some("http://x/c.jpg")).await?;
    let story: Value = common::create_story(&client, &app.base, &owner_token, album["id"].as_str().unwrap())
        .await?
        .json()
        .await?;

    let v: Value = client
        .get(format!("{}/stories/{}", app.base, story["id"].as_str().unwrap()))
        .bearer_auth(&owner_token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(v["stats"]["guess_count"], 0);
    assert_eq!(v["stats"]["correct_count"], 0);
    assert_eq!(v["stats"]["accuracy"], 0.0);

    app.server.abort();
    Ok(())
}
