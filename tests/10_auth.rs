mod common;

use anyhow::Result;
use blog_api_rust::database::models::Role;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn protected_route_without_token_is_401() -> Result<()> {
    let server = common::ensure_server().await?;
    let res = reqwest::Client::new().get(server.url("/api/v1/user/me")).send().await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert_eq!(body["message"], "Please login to access this resource");
    Ok(())
}

#[tokio::test]
async fn garbage_token_is_401() -> Result<()> {
    let server = common::ensure_server().await?;
    let res = reqwest::Client::new()
        .get(server.url("/api/v1/admin/all"))
        .header("Authorization", "Bearer not.a.jwt")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], false);
    Ok(())
}

#[tokio::test]
async fn token_signed_with_another_secret_is_401() -> Result<()> {
    let server = common::ensure_server().await?;
    let claims = blog_api_rust::auth::Claims::new(uuid::Uuid::new_v4(), blog_api_rust::database::models::Role::Admin);
    let token = blog_api_rust::auth::generate_jwt_with_secret(&claims, "some-other-secret")?;

    let res = reqwest::Client::new()
        .get(server.url("/api/v1/blog/user/all"))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn non_bearer_scheme_is_401() -> Result<()> {
    let server = common::ensure_server().await?;
    let res = reqwest::Client::new()
        .post(server.url("/api/v1/blog/create"))
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .json(&json!({ "title": "t" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

// Database-backed: skipped unless DATABASE_URL is set.

#[tokio::test]
async fn blocked_user_is_403() -> Result<()> {
    let Some(pool) = common::database().await? else {
        return Ok(());
    };
    let server = common::ensure_server().await?;
    let tag = common::run_tag();

    let user = common::seed_user(&pool, "Blocked Reader", &format!("blocked-{}@example.com", tag), Role::User, true).await?;
    common::block_user(&pool, &user).await?;

    let res = reqwest::Client::new()
        .get(server.url("/api/v1/user/me"))
        .header("Authorization", common::bearer(&user)?)
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "FORBIDDEN");
    assert_eq!(body["message"], "Your account has been blocked");
    Ok(())
}

#[tokio::test]
async fn unverified_user_only_reaches_token_routes() -> Result<()> {
    let Some(pool) = common::database().await? else {
        return Ok(());
    };
    let server = common::ensure_server().await?;
    let tag = common::run_tag();
    let client = reqwest::Client::new();

    let creator = common::seed_user(&pool, "Fresh Creator", &format!("fresh-creator-{}@example.com", tag), Role::Creator, false).await?;
    let reader = common::seed_user(&pool, "Fresh Reader", &format!("fresh-reader-{}@example.com", tag), Role::User, false).await?;
    let creator_auth = common::bearer(&creator)?;
    let reader_auth = common::bearer(&reader)?;

    let res = client.get(server.url("/api/v1/user/me")).header("Authorization", &reader_auth).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(server.url("/api/v1/blog/create"))
        .header("Authorization", &creator_auth)
        .json(&json!({ "title": "t", "description": "d", "content": "<p>c</p>" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(res.json::<Value>().await?["message"], "Please verify your email to access this resource");

    let post_id = uuid::Uuid::new_v4();
    for path in [
        format!("/api/v1/blog/edit/{}", post_id),
        format!("/api/v1/like/do/{}", post_id),
        format!("/api/v1/like/undo/{}", post_id),
        format!("/api/v1/like/fetch/{}", post_id),
    ] {
        let auth = if path.starts_with("/api/v1/blog") { &creator_auth } else { &reader_auth };
        let res = if path.starts_with("/api/v1/blog") {
            client.delete(server.url(&path)).header("Authorization", auth).send().await?
        } else {
            client.get(server.url(&path)).header("Authorization", auth).send().await?
        };
        assert_eq!(res.status(), StatusCode::FORBIDDEN, "{}", path);
    }

    let res = client
        .get(server.url(&format!("/api/v1/like/fetch/all/{}", post_id)))
        .header("Authorization", &creator_auth)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}
