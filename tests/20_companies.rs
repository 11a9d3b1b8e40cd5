mod common;

use anyhow::Result;
use reqwest::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn create_then_get_round_trip() -> Result<()> {
    let Some(api) = common::api().await? else { return Ok(()) };

    let handle = common::unique_handle("c");
    let body = json!({
        "handle": handle,
        "name": "Round Trip",
        "description": "Desc",
        "numEmployees": 10,
        "logoUrl": "http://rt.img"
    });
    let (status, created) = api.admin(Method::POST, "/companies", Some(&body)).await?;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    assert_eq!(created["data"], body);

    let (status, fetched) = api.get(&format!("/companies/{}", handle)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"], body);
    // no jobs yet, so no jobs field at all
    assert!(fetched["data"].get("jobs").is_none());

    api.remove_company(&handle).await?;
    Ok(())
}

#[tokio::test]
async fn duplicate_handle_is_conflict() -> Result<()> {
    let Some(api) = common::api().await? else { return Ok(()) };

    let handle = api.create_company("dup", 1).await?;
    let body = json!({"handle": handle, "name": "Again"});
    let (status, payload) = api.admin(Method::POST, "/companies", Some(&body)).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(payload["message"], format!("Duplicate company: {}", handle));

    api.remove_company(&handle).await?;
    Ok(())
}

#[tokio::test]
async fn writes_require_admin() -> Result<()> {
    let Some(api) = common::api().await? else { return Ok(()) };

    let body = json!({"handle": common::unique_handle("anon"), "name": "Anon"});
    let (status, _) = api.send(Method::POST, "/companies", None, Some(&body)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = api
        .send(Method::POST, "/companies", Some(&api.user_token), Some(&body))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn filters_by_name_and_size() -> Result<()> {
    let Some(api) = common::api().await? else { return Ok(()) };

    let small = api.create_company("flt", 3).await?;
    let large = api.create_company("flt", 300).await?;

    let (status, body) = api.get(&format!("/companies?name={}", small)).await?;
    assert_eq!(status, StatusCode::OK);
    let handles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|c| c["handle"].as_str())
        .collect();
    assert_eq!(handles, vec![small.as_str()]);

    let (_, body) = api.get("/companies?minEmps=100&maxEmps=1000").await?;
    let data = body["data"].as_array().unwrap();
    assert!(data.iter().any(|c| c["handle"] == large.as_str()));
    assert!(data.iter().all(|c| c["handle"] != small.as_str()));

    // zero is a real lower bound
    let (status, _) = api.get("/companies?minEmps=0").await?;
    assert_eq!(status, StatusCode::OK);

    api.remove_company(&small).await?;
    api.remove_company(&large).await?;
    Ok(())
}

#[tokio::test]
async fn invalid_filters_are_bad_request() -> Result<()> {
    let Some(api) = common::api().await? else { return Ok(()) };

    let (status, body) = api.get("/companies?minEmps=50&maxEmps=10").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = api.get("/companies?color=red").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = api.get("/companies?name=").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn partial_update_and_delete() -> Result<()> {
    let Some(api) = common::api().await? else { return Ok(()) };

    let handle = api.create_company("upd", 5).await?;
    let path = format!("/companies/{}", handle);

    let (status, body) = api
        .admin(Method::PATCH, &path, Some(&json!({"name": "Renamed", "logoUrl": null})))
        .await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["name"], "Renamed");
    assert_eq!(body["data"]["logoUrl"], json!(null));
    assert_eq!(body["data"]["numEmployees"], 5);

    let (status, _) = api.admin(Method::PATCH, &path, Some(&json!({"handle": "other"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = api.admin(Method::DELETE, &path, None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = api.get(&path).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = api.admin(Method::PATCH, &path, Some(&json!({"name": "Ghost"}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
