mod common;

use anyhow::Result;
use blog_api_rust::database::models::Role;
use reqwest::StatusCode;
use serde_json::Value;

// Database-backed: skipped unless DATABASE_URL is set.

#[tokio::test]
async fn admin_user_list_searches_filters_and_pages() -> Result<()> {
    let Some(pool) = common::database().await? else {
        return Ok(());
    };
    let server = common::ensure_server().await?;
    let tag = common::run_tag();

    let admin = common::seed_user(&pool, "List Admin", &format!("owner-{}@admins.test", common::run_tag()), Role::Admin, true).await?;
    for i in 0..15 {
        let email = if i % 5 == 0 {
            format!("{}-admin{}@example.com", tag, i)
        } else {
            format!("{}-member{}@example.com", tag, i)
        };
        common::seed_user(&pool, &format!("Member {:02}", i), &email, Role::User, true).await?;
    }

    let client = reqwest::Client::new();
    let auth = common::bearer(&admin)?;

    let body = client
        .get(server.url("/api/v1/admin/all"))
        .query(&[("keyword", format!("{}-admin", tag)), ("page", "1".to_string())])
        .header("Authorization", &auth)
        .send()
        .await?
        .json::<Value>()
        .await?;
    let data = &body["data"];
    assert_eq!(data["records"].as_array().map(Vec::len), Some(3), "{}", body);
    assert_eq!(data["filtered_count"], 3);
    assert!(data["count"].as_i64().unwrap_or(0) >= 16);
    assert_eq!(data["result_per_page"], 10);

    // Upper-case keyword still matches
    let second = client
        .get(server.url("/api/v1/admin/all"))
        .query(&[("keyword", tag.to_uppercase()), ("page", "2".to_string())])
        .header("Authorization", &auth)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(second["data"]["filtered_count"], 15);
    assert_eq!(second["data"]["records"].as_array().map(Vec::len), Some(5));

    let beyond = client
        .get(server.url("/api/v1/admin/all"))
        .query(&[("keyword", tag.clone()), ("page", "9".to_string())])
        .header("Authorization", &auth)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(beyond["data"]["records"], serde_json::json!([]));

    let creators = client
        .get(server.url("/api/v1/admin/all"))
        .query(&[("keyword", tag.clone()), ("role", "creator".to_string())])
        .header("Authorization", &auth)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(creators["data"]["filtered_count"], 0);

    Ok(())
}

#[tokio::test]
async fn invalid_filter_value_is_400() -> Result<()> {
    let Some(pool) = common::database().await? else {
        return Ok(());
    };
    let server = common::ensure_server().await?;
    let tag = common::run_tag();
    let admin = common::seed_user(&pool, "Cast Admin", &format!("cast-{}@admins.test", tag), Role::Admin, true).await?;

    let res = reqwest::Client::new()
        .get(server.url("/api/v1/admin/all"))
        .query(&[("is_blocked", "sometimes")])
        .header("Authorization", common::bearer(&admin)?)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn non_admin_is_refused_by_role() -> Result<()> {
    let Some(pool) = common::database().await? else {
        return Ok(());
    };
    let server = common::ensure_server().await?;
    let tag = common::run_tag();
    let user = common::seed_user(&pool, "Plain User", &format!("plain-{}@example.com", tag), Role::User, true).await?;

    let res = reqwest::Client::new()
        .get(server.url("/api/v1/admin/all"))
        .header("Authorization", common::bearer(&user)?)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Role: user is not allowed to access this resource");
    Ok(())
}
