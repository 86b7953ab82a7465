mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn request_without_school_slug_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // No X-School-Slug and a bare host: the context middleware rejects this
    // before any database work
    let res = client
        .get(format!("{}/api/staff", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "BAD_REQUEST");
    Ok(())
}

#[tokio::test]
async fn unknown_school_maps_to_not_found() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/staff", server.base_url))
        .header("X-School-Slug", "unknown-school")
        .send()
        .await?;

    // 404 with a working master database; 503 when it is unavailable
    assert!(
        res.status() == StatusCode::NOT_FOUND
            || res.status() == StatusCode::SERVICE_UNAVAILABLE,
        "unexpected status: {}",
        res.status()
    );
    Ok(())
}

#[tokio::test]
async fn root_routes_require_operator_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/root/schools", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(format!("{}/api/root/schools", server.base_url))
        .bearer_auth("not-the-token")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn suspended_school_is_refused_before_any_handler() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_available(server).await {
        eprintln!("skipping: master database unavailable");
        return Ok(());
    }
    let client = reqwest::Client::new();

    let slug = common::unique_slug("ctx");
    let res = client
        .post(format!("{}/api/root/schools", server.base_url))
        .bearer_auth(common::ROOT_TOKEN)
        .json(&json!({ "name": "Context Test School", "slug": &slug }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    // Active school: the context resolves; the JWT layer answers 401
    let res = client
        .get(format!("{}/api/staff", server.base_url))
        .header("X-School-Slug", &slug)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Suspend, then the same request dies on 403 before authentication
    let res = client
        .post(format!(
            "{}/api/root/schools/{}/suspend",
            server.base_url, slug
        ))
        .bearer_auth(common::ROOT_TOKEN)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/api/staff", server.base_url))
        .header("X-School-Slug", &slug)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Restore brings it back
    let res = client
        .post(format!(
            "{}/api/root/schools/{}/restore",
            server.base_url, slug
        ))
        .bearer_auth(common::ROOT_TOKEN)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/api/staff", server.base_url))
        .header("X-School-Slug", &slug)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn connection_eviction_is_transparent_to_the_next_request() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_available(server).await {
        eprintln!("skipping: master database unavailable");
        return Ok(());
    }
    let client = reqwest::Client::new();

    let slug = common::unique_slug("evict");
    let res = client
        .post(format!("{}/api/root/schools", server.base_url))
        .bearer_auth(common::ROOT_TOKEN)
        .json(&json!({ "name": "Eviction Test School", "slug": &slug }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    // First health opens the pool; onboarding already warmed it
    let res = client
        .get(format!(
            "{}/api/root/schools/{}/health",
            server.base_url, slug
        ))
        .bearer_auth(common::ROOT_TOKEN)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    // Second health sees the cached pool
    let res = client
        .get(format!(
            "{}/api/root/schools/{}/health",
            server.base_url, slug
        ))
        .bearer_auth(common::ROOT_TOKEN)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["cached"], true);

    let res = client
        .delete(format!(
            "{}/api/root/schools/{}/connection",
            server.base_url, slug
        ))
        .bearer_auth(common::ROOT_TOKEN)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["evicted"], true);

    // The next request reopens a fresh pool transparently
    let res = client
        .get(format!(
            "{}/api/root/schools/{}/health",
            server.base_url, slug
        ))
        .bearer_auth(common::ROOT_TOKEN)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["cached"], false);
    Ok(())
}
