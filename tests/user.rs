//! HTTP tests against a running service; configure it through `.env`
//! (see `.env.example`) and run with `cargo test -- --ignored`.

use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use serial_test::serial;
use uuid::Uuid;

use crate::setup::setup_test;

mod setup;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserDto<'a> {
    pub name: &'a str,
    pub age: i64,
    pub gender: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadUserResponse {
    pub id: Uuid,
    pub name: String,
    pub age: i32,
    pub gender: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    #[serde(rename = "createdAt")]
    pub created: String,
    pub name: String,
    pub age: i32,
    pub gender: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub title: String,
    pub message: String,
    pub error: Value,
}

const ANA: CreateUserDto<'static> = CreateUserDto {
    name: "Ana",
    age: 30,
    gender: "F",
};

#[tokio::test]
#[serial]
#[ignore = "requires a running service and database"]
async fn create_read_patch_delete_user() {
    let (client, url, _pool) = setup_test().await;

    let res = client
        .post(url.join("/v1/users").unwrap())
        .json(&ANA)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let location = res.headers()["location"].to_str().unwrap().to_string();
    let created: UserResponse = res.json().await.unwrap();
    assert_eq!(location, format!("/v1/users/{}", created.id));

    let user_url = url.join(&location).unwrap();

    let res = client.get(user_url.clone()).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let read: ReadUserResponse = res.json().await.unwrap();
    assert_eq!(
        read,
        ReadUserResponse {
            id: created.id,
            name: "Ana".into(),
            age: 30,
            gender: "F".into(),
        }
    );

    let res = client
        .patch(user_url.clone())
        .json(&json!({ "age": 31 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let read: ReadUserResponse = client
        .get(user_url.clone())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(read.age, 31);
    assert_eq!(read.name, "Ana");

    let res = client.delete(user_url.clone()).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client.get(user_url.clone()).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let err: ErrorResponse = res.json().await.unwrap();
    assert_eq!(err.message, "user not found");

    let res = client.delete(user_url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
#[ignore = "requires a running service and database"]
async fn reject_invalid_user_id() {
    let (client, url, _pool) = setup_test().await;

    let res = client
        .get(url.join("/v1/users/not-a-uuid").unwrap())
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: ErrorResponse = res.json().await.unwrap();
    assert_eq!(err.message, "invalid user id");
}

#[tokio::test]
#[serial]
#[ignore = "requires a running service and database"]
async fn reject_invalid_user_creation() {
    let (client, url, pool) = setup_test().await;

    let res = client
        .post(url.join("/v1/users").unwrap())
        .json(&json!({ "name": "x".repeat(51), "age": 121 }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: ErrorResponse = res.json().await.unwrap();
    let fields = err.error["Validation"]["fields"].as_array().unwrap();
    let paths: Vec<_> = fields.iter().map(|field| field["path"].clone()).collect();
    assert_eq!(paths, vec![json!("/name"), json!("/age"), json!("/gender")]);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM account.users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
#[serial]
#[ignore = "requires a running service and database"]
async fn patch_with_invalid_age_is_unprocessable() {
    let (client, url, _pool) = setup_test().await;

    let created: UserResponse = client
        .post(url.join("/v1/users").unwrap())
        .json(&ANA)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let user_url = url.join(&format!("/v1/users/{}", created.id)).unwrap();

    let res = client
        .patch(user_url.clone())
        .header("content-type", "application/json-patch+json")
        .body(r#"[{ "op": "replace", "path": "/age", "value": 0 }]"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let read: ReadUserResponse = client
        .get(user_url)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(read.age, 30);
}

#[tokio::test]
#[serial]
#[ignore = "requires a running service and database"]
async fn put_overwrites_present_fields() {
    let (client, url, _pool) = setup_test().await;

    let created: UserResponse = client
        .post(url.join("/v1/users").unwrap())
        .json(&ANA)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let res = client
        .put(url.join(&format!("/v1/users/{}", created.id)).unwrap())
        .json(&json!({ "gender": "X" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: UserResponse = res.json().await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Ana");
    assert_eq!(updated.age, 30);
    assert_eq!(updated.gender, "X");

    let res = client
        .put(url.join(&format!("/v1/users/{}", Uuid::new_v4())).unwrap())
        .json(&json!({ "gender": "X" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
#[ignore = "requires a running service and database"]
async fn list_users_by_page() {
    let (client, url, _pool) = setup_test().await;

    let mut ids = Vec::new();
    for age in 20..25 {
        let created: UserResponse = client
            .post(url.join("/v1/users").unwrap())
            .json(&CreateUserDto { age, ..ANA })
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        ids.push(created.id);
    }

    let page: Vec<ReadUserResponse> = client
        .get(url.join("/v1/users?skip=1&take=2").unwrap())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let page_ids: Vec<_> = page.iter().map(|user| user.id).collect();
    assert_eq!(page_ids, ids[1..3].to_vec());

    let all: Vec<ReadUserResponse> = client
        .get(url.join("/v1/users").unwrap())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), 5);
}
