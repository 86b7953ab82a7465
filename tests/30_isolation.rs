mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

struct SchoolFixture {
    slug: String,
    token: String,
}

async fn onboard_school(
    server: &common::TestServer,
    client: &reqwest::Client,
    prefix: &str,
) -> Result<SchoolFixture> {
    let slug = common::unique_slug(prefix);
    let admin_email = format!("admin@{}.example", slug);

    let res = client
        .post(format!("{}/api/root/schools", server.base_url))
        .bearer_auth(common::ROOT_TOKEN)
        .json(&json!({
            "name": format!("School {}", slug),
            "slug": &slug,
            "admin_email": &admin_email,
            "admin_password": "opensesame",
        }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "school onboarding failed: {}",
        res.status()
    );

    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&json!({
            "school": &slug,
            "email": &admin_email,
            "password": "opensesame",
        }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::OK,
        "admin login failed: {}",
        res.status()
    );
    let body = res.json::<serde_json::Value>().await?;
    let token = body["data"]["token"]
        .as_str()
        .expect("login returns a token")
        .to_string();

    Ok(SchoolFixture { slug, token })
}

#[tokio::test]
async fn staff_rows_never_leak_across_schools() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_available(server).await {
        eprintln!("skipping: master database unavailable");
        return Ok(());
    }
    let client = reqwest::Client::new();

    let school_a = onboard_school(server, &client, "iso-a").await?;
    let school_b = onboard_school(server, &client, "iso-b").await?;

    // Insert a staff member in A only
    let marker_email = format!("marker@{}.example", school_a.slug);
    let res = client
        .post(format!("{}/api/staff", server.base_url))
        .header("X-School-Slug", &school_a.slug)
        .bearer_auth(&school_a.token)
        .json(&json!({
            "name": "Marker Teacher",
            "email": &marker_email,
            "password": "pw-marker",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    // A sees it
    let res = client
        .get(format!("{}/api/staff", server.base_url))
        .header("X-School-Slug", &school_a.slug)
        .bearer_auth(&school_a.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    let emails_a: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|s| s["email"].as_str())
        .collect();
    assert!(emails_a.contains(&marker_email.as_str()));

    // B, with identical schema shapes, never observes A's row
    let res = client
        .get(format!("{}/api/staff", server.base_url))
        .header("X-School-Slug", &school_b.slug)
        .bearer_auth(&school_b.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    let emails_b: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|s| s["email"].as_str())
        .collect();
    assert!(!emails_b.contains(&marker_email.as_str()));

    Ok(())
}

#[tokio::test]
async fn token_for_one_school_is_refused_on_another() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_available(server).await {
        eprintln!("skipping: master database unavailable");
        return Ok(());
    }
    let client = reqwest::Client::new();

    let school_a = onboard_school(server, &client, "tok-a").await?;
    let school_b = onboard_school(server, &client, "tok-b").await?;

    let res = client
        .get(format!("{}/api/staff", server.base_url))
        .header("X-School-Slug", &school_b.slug)
        .bearer_auth(&school_a.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // The token still works where it was issued
    let res = client
        .get(format!("{}/api/staff", server.base_url))
        .header("X-School-Slug", &school_a.slug)
        .bearer_auth(&school_a.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn settings_default_on_first_read_and_persist_saves() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_available(server).await {
        eprintln!("skipping: master database unavailable");
        return Ok(());
    }
    let client = reqwest::Client::new();

    let school = onboard_school(server, &client, "set").await?;

    // First read materializes explicit defaults
    let res = client
        .get(format!("{}/api/settings/bulk-print", server.base_url))
        .header("X-School-Slug", &school.slug)
        .bearer_auth(&school.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["page_size"], "A4");
    assert_eq!(body["data"]["copies"], 1);

    // Invalid payloads are rejected at the boundary, nothing is written
    let res = client
        .put(format!("{}/api/settings/bulk-print", server.base_url))
        .header("X-School-Slug", &school.slug)
        .bearer_auth(&school.token)
        .json(&json!({
            "page_size": "Tabloid",
            "margin_mm": 10,
            "copies": 1,
            "include_header": true,
            "include_footer": false,
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // A valid save round-trips
    let res = client
        .put(format!("{}/api/settings/bulk-print", server.base_url))
        .header("X-School-Slug", &school.slug)
        .bearer_auth(&school.token)
        .json(&json!({
            "page_size": "A5",
            "margin_mm": 5,
            "copies": 3,
            "include_header": false,
            "include_footer": true,
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/api/settings/bulk-print", server.base_url))
        .header("X-School-Slug", &school.slug)
        .bearer_auth(&school.token)
        .send()
        .await?;
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["page_size"], "A5");
    assert_eq!(body["data"]["copies"], 3);
    Ok(())
}
