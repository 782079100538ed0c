//! REST integration test macro for backends.
//!
//! The `rest_tests!` macro generates HTTP-level tests that validate a
//! `Backend` through full REST round-trips:
//! JSON → HTTP request → mapped handler → Store → Backend → JSON.
//!
//! # Generated Tests
//!
//! ## Save / Get / Delete
//! - `test_rest_save_insert`: 200 + persistence result with the new id
//! - `test_rest_save_upsert`: saving with an id updates in place
//! - `test_rest_save_invalid_payload`: 200 + in-body 400 error
//! - `test_rest_save_validation_blocks`: failing validator, nothing stored
//! - `test_rest_get_not_found`: 404 + structured body
//! - `test_rest_delete`: echoes the entity, then 404
//! - `test_rest_delete_validation_blocks`: root category survives
//!
//! ## List / Page
//! - `test_rest_list_empty`: `[]`, never `null`
//! - `test_rest_page_defaults`: page 1, limit 10, newest first
//! - `test_rest_page_window`: explicit page and limit
//! - `test_rest_page_huge_values`: out-of-range windows answer with no records
//!
//! ## Link / Unlink
//! - `test_rest_link_method`: `categories1_2` scenario
//! - `test_rest_link_url_and_unlink`: count +1 then -1
//! - `test_rest_link_preloads_on_get`: linked targets appear on Get

/// Generate a REST integration test suite for a backend.
///
/// `$factory` must produce a fresh, empty `impl Backend + 'static`.
#[macro_export]
macro_rules! rest_tests {
    ($factory:expr) => {
        mod rest_integration_tests {
            use super::*;
            use axum::http::{Method, StatusCode};
            use axum_test::TestServer;
            use mapcrud::prelude::*;
            use serde_json::{Value, json};

            async fn make_server() -> (TestServer, Store) {
                let store = Store::new($factory);
                let server = seeded_server(store.clone(), &CrudConfig::default()).await;
                (server, store)
            }

            fn link_method() -> Method {
                Method::from_bytes(b"LINK").unwrap()
            }

            // ==============================================================
            // Save
            // ==============================================================

            #[tokio::test]
            async fn test_rest_save_insert() {
                let (server, _store) = make_server().await;

                let response = server
                    .post(NOTE_PATH)
                    .json(&json!({"title": "first"}))
                    .await;

                response.assert_status_ok();
                let body: Value = response.json();
                assert_eq!(body["error"], Value::Null);
                assert_eq!(body["rows_affected"], 1);
                assert_eq!(body["value"]["id"], 1);
                assert_eq!(body["value"]["title"], "first");
                assert!(body["value"]["created_at"].is_string());
            }

            #[tokio::test]
            async fn test_rest_save_upsert() {
                let (server, store) = make_server().await;

                server.post(NOTE_PATH).json(&json!({"title": "draft"})).await;
                let response = server
                    .post(NOTE_PATH)
                    .json(&json!({"id": 1, "title": "final"}))
                    .await;

                let body: Value = response.json();
                assert_eq!(body["value"]["id"], 1);

                let notes = store.all::<Note>().await.unwrap();
                assert_count(&notes, 1);
                assert_eq!(notes[0].title, "final");
            }

            #[tokio::test]
            async fn test_rest_save_invalid_payload() {
                let (server, store) = make_server().await;

                let response = server.post(NOTE_PATH).text("{not json").await;

                response.assert_status_ok();
                let body: Value = response.json();
                assert_eq!(body["code"], 400);
                assert!(body["message"].as_str().unwrap().starts_with("Invalid Payload ("));
                assert!(store.all::<Note>().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_rest_save_validation_blocks() {
                let (server, store) = make_server().await;

                let response = server
                    .post(CATEGORY_PATH)
                    .json(&json!({"name": "orphan"}))
                    .await;

                response.assert_status_ok();
                let body: Value = response.json();
                assert_eq!(
                    body,
                    json!({"message": "CategoryID can't not be null", "code": 500})
                );
                assert_count(&store.all::<Category>().await.unwrap(), 1);
            }

            #[tokio::test]
            async fn test_rest_save_ignores_associations() {
                let (server, store) = make_server().await;

                server
                    .post(NOTE_PATH)
                    .json(&json!({"title": "n", "tags": [{"name": "nested"}]}))
                    .await;

                let note: Note = store.find(1).await.unwrap().unwrap();
                assert!(note.tags.is_empty());
                assert!(store.all::<Tag>().await.unwrap().is_empty());
            }

            // ==============================================================
            // Get / Delete
            // ==============================================================

            #[tokio::test]
            async fn test_rest_get_not_found() {
                let (server, _store) = make_server().await;

                for path in [format!("{}/99", NOTE_PATH), format!("{}/abc", NOTE_PATH)] {
                    let response = server.get(&path).await;
                    response.assert_status(StatusCode::NOT_FOUND);
                    assert_not_found_body(&response.json::<Value>());
                }
            }

            #[tokio::test]
            async fn test_rest_get() {
                let (server, store) = make_server().await;
                let child = create_category(&store, "child").await;

                let response = server.get(&format!("{}/{}", CATEGORY_PATH, child.id)).await;

                response.assert_status_ok();
                let body: Value = response.json();
                assert_eq!(body["name"], "child");
                assert_eq!(body["category_id"], ROOT_CATEGORY_ID);
                assert_eq!(body["categories"], json!([]));
            }

            #[tokio::test]
            async fn test_rest_delete() {
                let (server, store) = make_server().await;
                let child = create_category(&store, "child").await;
                let path = format!("{}/{}", CATEGORY_PATH, child.id);

                let response = server.delete(&path).await;
                response.assert_status_ok();
                assert_eq!(response.json::<Value>()["name"], "child");

                let again = server.delete(&path).await;
                again.assert_status(StatusCode::NOT_FOUND);
                assert_not_found_body(&again.json::<Value>());

                server.get(&path).await.assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_rest_delete_validation_blocks() {
                let (server, store) = make_server().await;

                let response = server
                    .delete(&format!("{}/{}", CATEGORY_PATH, ROOT_CATEGORY_ID))
                    .await;

                response.assert_status_ok();
                assert_eq!(
                    response.json::<Value>(),
                    json!({"message": "Root category can't be deleted", "code": 500})
                );
                assert!(store.find::<Category>(ROOT_CATEGORY_ID).await.unwrap().is_some());
            }

            // ==============================================================
            // List / Page
            // ==============================================================

            #[tokio::test]
            async fn test_rest_list_empty() {
                let (server, _store) = make_server().await;

                let response = server.get(NOTE_PATH).await;

                response.assert_status_ok();
                assert_eq!(response.text(), "[]");
            }

            #[tokio::test]
            async fn test_rest_list_ordered() {
                let (server, store) = make_server().await;
                create_category(&store, "a").await;
                create_category(&store, "b").await;

                let body: Value = server.get(CATEGORY_PATH).await.json();
                let names: Vec<_> = body
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|c| c["name"].as_str().unwrap().to_string())
                    .collect();
                assert_eq!(names, vec!["root", "a", "b"]);
            }

            #[tokio::test]
            async fn test_rest_page_defaults() {
                let (server, store) = make_server().await;
                create_tags(&store, 12).await;

                let response = server
                    .get(&format!("{}.page", TAG_PATH))
                    .add_query_param("page", "0")
                    .add_query_param("limit", "abc")
                    .await;

                response.assert_status_ok();
                let body: Value = response.json();
                assert_eq!(body["total_record"], 12);
                assert_eq!(body["total_page"], 2);
                assert_eq!(body["page"], 1);
                assert_eq!(body["limit"], 10);
                assert_eq!(body["offset"], 0);
                assert_eq!(body["prev_page"], 1);
                assert_eq!(body["next_page"], 2);
                assert_eq!(body["records"].as_array().unwrap().len(), 10);
                assert_eq!(body["records"][0]["id"], 12);
            }

            #[tokio::test]
            async fn test_rest_page_window() {
                let (server, store) = make_server().await;
                create_tags(&store, 12).await;

                let body: Value = server
                    .get(&format!("{}.page", TAG_PATH))
                    .add_query_param("page", "3")
                    .add_query_param("limit", "5")
                    .await
                    .json();

                assert_eq!(body["offset"], 10);
                assert_eq!(body["total_page"], 3);
                assert_eq!(body["prev_page"], 2);
                assert_eq!(body["next_page"], 3);
                let ids: Vec<_> = body["records"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|t| t["id"].as_u64().unwrap())
                    .collect();
                assert_eq!(ids, vec![2, 1]);
            }

            #[tokio::test]
            async fn test_rest_page_huge_values() {
                let (server, store) = make_server().await;
                create_tags(&store, 3).await;
                let max = usize::MAX.to_string();

                let response = server
                    .get(&format!("{}.page", TAG_PATH))
                    .add_query_param("page", "3")
                    .add_query_param("limit", &max)
                    .await;
                response.assert_status_ok();
                let body: Value = response.json();
                assert_eq!(body["offset"], usize::MAX as u64);
                assert_eq!(body["total_record"], 3);
                assert_eq!(body["total_page"], 1);
                assert_eq!(body["records"], json!([]));

                let response = server
                    .get(&format!("{}.page", TAG_PATH))
                    .add_query_param("page", &max)
                    .await;
                response.assert_status_ok();
                let body: Value = response.json();
                assert_eq!(body["page"], usize::MAX as u64);
                assert_eq!(body["next_page"], usize::MAX as u64);
                assert_eq!(body["records"], json!([]));
            }

            // ==============================================================
            // Link / Unlink
            // ==============================================================

            #[tokio::test]
            async fn test_rest_link_method() {
                let (server, store) = make_server().await;
                let child = create_category(&store, "child").await;
                assert_eq!(child.id, 2);

                let response = server
                    .method(link_method(), &format!("{}/1", CATEGORY_PATH))
                    .add_query_param("categories", "2")
                    .await;

                response.assert_status_ok();
                let body: Value = response.json();
                let outcome = &body["categories1_2"];
                assert_eq!(outcome["status"], "ok");
                assert_eq!(outcome["operation"], "link");
                assert_eq!(outcome["message"], "ID:1 -> 2 (ok)");
                assert_eq!(
                    outcome["count_after"].as_i64().unwrap(),
                    outcome["count_before"].as_i64().unwrap() + 1
                );
            }

            #[tokio::test]
            async fn test_rest_link_url_and_unlink() {
                let (server, store) = make_server().await;
                create_category(&store, "a").await;
                create_category(&store, "b").await;

                let linked: Value = server
                    .get(&format!("{}/1/link", CATEGORY_PATH))
                    .add_query_param("categories", "2")
                    .add_query_param("categories", "3")
                    .await
                    .json();
                assert_eq!(linked["categories1_2"]["count_after"], 1);
                assert_eq!(linked["categories1_3"]["count_after"], 2);

                let unlinked: Value = server
                    .get(&format!("{}/1/unlink", CATEGORY_PATH))
                    .add_query_param("categories", "2")
                    .await
                    .json();
                let outcome = &unlinked["categories1_2"];
                assert_eq!(outcome["message"], "ID:1 -/-> 2 (ok)");
                assert_eq!(outcome["operation"], "unlink");
                assert_eq!(outcome["count_before"], 2);
                assert_eq!(outcome["count_after"], 1);

                // The unlinked record itself is untouched
                assert!(store.find::<Category>(2).await.unwrap().is_some());
            }

            #[tokio::test]
            async fn test_rest_link_preloads_on_get() {
                let (server, store) = make_server().await;
                let tags = create_tags(&store, 2).await;
                server.post(NOTE_PATH).json(&json!({"title": "n"})).await;

                server
                    .get(&format!("{}/1/link", NOTE_PATH))
                    .add_query_param("tags", &tags[1].id.to_string())
                    .add_query_param("tags", &tags[0].id.to_string())
                    .await
                    .assert_status_ok();

                let note: Value = server.get(&format!("{}/1", NOTE_PATH)).await.json();
                let names: Vec<_> = note["tags"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|t| t["name"].as_str().unwrap().to_string())
                    .collect();
                assert_eq!(names, vec!["tag_1", "tag_0"]);
                assert_eq!(note["author"], Value::Null);
            }
        }
    };
}
