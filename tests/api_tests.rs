// tests/api_tests.rs

mod common;

use std::sync::Arc;

use common::{FailingStore, movie, movies, spawn_app, spawn_app_with_movies, spawn_with_store};
use mongodb::bson::{Bson, oid::ObjectId};
use movie_catalog::{models::comment::Comment, store::CatalogStore};
use serde_json::{Value, json};

const VALID_ID: &str = "573a1390f29313caabcd4135";

#[tokio::test]
async fn unknown_path_is_404() {
    // Arrange
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(&format!("{}/random_path_that_does_not_exist", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn list_movies_defaults_to_first_page_of_ten() {
    let app = spawn_app_with_movies(movies(23)).await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/api/movies", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["movies"].as_array().unwrap().len(), 10);
    assert_eq!(body["totalMovies"], 23);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["currentPage"], 1);

    // Reduced field set only
    let first = &body["movies"][0];
    assert_eq!(first["title"], "Movie 00");
    assert!(first["_id"].as_str().unwrap().len() == 24);
    assert!(first.get("plot").is_some());
    assert!(first.get("cast").is_none());
    assert!(first.get("imdb").is_none());
}

#[tokio::test]
async fn total_pages_is_ceiling_of_total_over_limit() {
    let app = spawn_app_with_movies(movies(23)).await;
    let client = reqwest::Client::new();

    for limit in [1u64, 2, 5, 7, 10, 23, 50] {
        for page in [1u64, 2, 3] {
            let body: Value = client
                .get(&format!("{}/api/movies", app.address))
                .query(&[("page", page), ("limit", limit)])
                .send()
                .await
                .unwrap()
                .json()
                .await
                .unwrap();

            assert_eq!(body["totalPages"].as_u64().unwrap(), 23u64.div_ceil(limit));
            let returned = body["movies"].as_array().unwrap().len() as u64;
            assert!(returned <= limit);
            let expected = 23u64.saturating_sub((page - 1) * limit).min(limit);
            assert_eq!(returned, expected, "page {} limit {}", page, limit);
        }
    }
}

#[tokio::test]
async fn page_beyond_range_is_empty_not_error() {
    let app = spawn_app_with_movies(movies(5)).await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/api/movies?page=9&limit=10", app.address))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert!(body["movies"].as_array().unwrap().is_empty());
    assert_eq!(body["currentPage"], 9);
}

#[tokio::test]
async fn non_numeric_paging_is_bad_request() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/api/movies?page=first", app.address))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn malformed_movie_id_is_rejected_before_any_database_call() {
    // Every store call fails, so a 400 proves the store was never reached.
    let address = spawn_with_store(Arc::new(FailingStore)).await;
    let client = reqwest::Client::new();

    for query in ["?id=abc", ""] {
        let response = client
            .get(&format!("{}/api/movies/details{}", address, query))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 400);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Invalid movie ID format");
    }
}

#[tokio::test]
async fn unknown_movie_is_404() {
    let app = spawn_app_with_movies(movies(3)).await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/api/movies/details?id={}", app.address, ObjectId::new().to_hex()))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Movie not found");
}

#[tokio::test]
async fn movie_details_include_comments_with_short_dates() {
    let heat = movie("Heat");
    let heat_id = heat.id;
    let app = spawn_app_with_movies(vec![heat, movie("Ronin")]).await;

    let mut comment = Comment::new(heat_id, "Kim".into(), "kim@example.com".into(), "Diner scene!".into());
    comment.date = Some(Bson::String("2021-07-04T10:00:00.000Z".into()));
    app.store.insert_comment(&comment).await.unwrap();
    let other = Comment::new(ObjectId::new(), "Lee".into(), "lee@example.com".into(), "elsewhere".into());
    app.store.insert_comment(&other).await.unwrap();

    let body: Value = reqwest::Client::new()
        .get(&format!("{}/api/movies/details?id={}", app.address, heat_id.to_hex()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["_id"], heat_id.to_hex());
    assert_eq!(body["title"], "Heat");
    assert_eq!(body["year"], 2000);
    let comments = body["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(
        comments[0],
        json!({ "_id": comment.id.to_hex(), "text": "Diner scene!", "date": "07/04/2021" })
    );
}

#[tokio::test]
async fn search_is_case_insensitive_substring_on_title() {
    let app = spawn_app_with_movies(vec![
        movie("The Matrix"),
        movie("MATRIX Revisited"),
        movie("the animatrix"),
        movie("Heat"),
    ])
    .await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/api/movies/search", app.address))
        .query(&[("query", "matrix")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: Vec<Value> = response.json().await.unwrap();
    let titles: Vec<&str> = body.iter().map(|m| m["title"].as_str().unwrap()).collect();
    assert_eq!(titles, ["The Matrix", "MATRIX Revisited", "the animatrix"]);
}

#[tokio::test]
async fn search_matches_surrounding_spaces_literally() {
    let app = spawn_app_with_movies(vec![movie("The Matrix"), movie("Matrix Reloaded")]).await;

    let body: Vec<Value> = reqwest::Client::new()
        .get(&format!("{}/api/movies/search", app.address))
        .query(&[("query", " matrix")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let titles: Vec<&str> = body.iter().map(|m| m["title"].as_str().unwrap()).collect();
    assert_eq!(titles, ["The Matrix"]);
}

#[tokio::test]
async fn search_results_are_capped_at_twenty() {
    let app = spawn_app_with_movies(movies(30)).await;

    let body: Vec<Value> = reqwest::Client::new()
        .get(&format!("{}/api/movies/search?query=movie", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body.len(), 20);
}

#[tokio::test]
async fn search_without_query_is_bad_request() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    for url in ["/api/movies/search", "/api/movies/search?query=", "/api/movies/search?query=%20%20"] {
        let response = client
            .get(&format!("{}{}", app.address, url))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400, "{}", url);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Search query required");
    }
}

#[tokio::test]
async fn add_movie_without_title_is_rejected_and_not_stored() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    for payload in [json!({}), json!({ "title": "" }), json!({ "plot": "no title" })] {
        let response = client
            .post(&format!("{}/api/movies/add", app.address))
            .json(&payload)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 400);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Title is required");
    }

    assert_eq!(app.store.count_movies().await.unwrap(), 0);
}

#[tokio::test]
async fn add_movie_coerces_numbers_and_assigns_id() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/api/movies/add", app.address))
        .json(&json!({
            "_id": "000000000000000000000000",
            "title": "Test",
            "year": "2020",
            "runtime": "90",
            "genres": ["Drama"],
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    let inserted_id = body["insertedId"].as_str().unwrap();
    assert_ne!(inserted_id, "000000000000000000000000");

    let stored = app
        .store
        .find_movie(ObjectId::parse_str(inserted_id).unwrap())
        .await
        .unwrap()
        .expect("movie stored");
    assert_eq!(stored.title, "Test");
    assert_eq!(stored.year, Some(2020));
    assert_eq!(stored.runtime, Some(90));
    assert_eq!(stored.genres.items(), ["Drama".to_string()]);
    assert_eq!(stored.imdb.rating, Some(0.0));
    assert!(stored.lastupdated.is_some());
}

#[tokio::test]
async fn add_movie_keeps_fields_it_does_not_model() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/api/movies/add", app.address))
        .json(&json!({
            "title": "X",
            "rated": "PG",
            "countries": ["USA"],
            "fullplot": "long",
            "directors": "Someone",
            "lastupdated": "yesterday",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    let inserted: Value = response.json().await.unwrap();
    let id = inserted["insertedId"].as_str().unwrap();

    let details: Value = client
        .get(&format!("{}/api/movies/details?id={}", app.address, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(details["_id"], id);
    assert_eq!(details["rated"], "PG");
    assert_eq!(details["countries"], json!(["USA"]));
    assert_eq!(details["fullplot"], "long");
    assert_eq!(details["directors"], "Someone");
    // Server-assigned values win
    assert_ne!(details["lastupdated"], "yesterday");
    assert!(details["lastupdated"].is_string());
    assert_eq!(details["comments"], json!([]));
}

#[tokio::test]
async fn add_comment_returns_generated_id_and_iso_timestamp() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/api/comments/add", app.address))
        .json(&json!({ "movieId": VALID_ID, "name": "A", "email": "a@b.com", "text": "hi" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    let comment = &body["comment"];
    assert_eq!(comment["_id"].as_str().unwrap().len(), 24);
    assert_eq!(comment["movie_id"], VALID_ID);
    assert_eq!(comment["name"], "A");
    assert_eq!(comment["email"], "a@b.com");
    assert_eq!(comment["text"], "hi");
    let date = comment["date"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(date).is_ok(), "{}", date);
}

#[tokio::test]
async fn add_comment_rejects_non_string_fields() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let payloads = [
        json!({ "movieId": VALID_ID, "name": 1, "email": "a@b.com", "text": "hi" }),
        json!({ "movieId": VALID_ID, "name": "A", "email": null, "text": "hi" }),
        json!({ "movieId": VALID_ID, "name": "A", "email": "a@b.com" }),
        json!({ "movieId": "abc", "name": "A", "email": "a@b.com", "text": "hi" }),
    ];

    for payload in payloads {
        let response = client
            .post(&format!("{}/api/comments/add", app.address))
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400, "{}", payload);
    }
}

#[tokio::test]
async fn added_comment_appears_in_movie_details() {
    let heat = movie("Heat");
    let heat_id = heat.id.to_hex();
    let app = spawn_app_with_movies(vec![heat]).await;
    let client = reqwest::Client::new();

    let created: Value = client
        .post(&format!("{}/api/comments/add", app.address))
        .json(&json!({ "movieId": heat_id, "name": "A", "email": "a@b.com", "text": "Great heist" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let details: Value = client
        .get(&format!("{}/api/movies/details?id={}", app.address, heat_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let comments = details["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["_id"], created["comment"]["_id"]);
    assert_eq!(comments[0]["text"], "Great heist");
}

#[tokio::test]
async fn comment_text_is_stored_exactly_as_sent() {
    let heat = movie("Heat");
    let heat_id = heat.id.to_hex();
    let app = spawn_app_with_movies(vec![heat]).await;
    let client = reqwest::Client::new();
    let text = "Tom & Jerry > Itchy <3";

    let created: Value = client
        .post(&format!("{}/api/comments/add", app.address))
        .json(&json!({ "movieId": heat_id, "name": "AT&T", "email": "a@b.com", "text": text }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created["comment"]["name"], "AT&T");
    assert_eq!(created["comment"]["text"], text);

    let details: Value = client
        .get(&format!("{}/api/movies/details?id={}", app.address, heat_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(details["comments"][0]["text"], text);

    // Updates keep the text verbatim too
    let comment_id = created["comment"]["_id"].as_str().unwrap();
    client
        .put(&format!("{}/api/comments/update", app.address))
        .json(&json!({ "commentId": comment_id, "text": "<i>R&D</i>" }))
        .send()
        .await
        .unwrap();
    let stored = app.store.comments_for_movie(ObjectId::parse_str(&heat_id).unwrap()).await.unwrap();
    assert_eq!(stored[0].text, "<i>R&D</i>");
    assert_eq!(stored[0].name, "AT&T");
}

#[tokio::test]
async fn update_comment_replaces_text() {
    let app = spawn_app().await;
    let movie_id = ObjectId::new();
    let comment = Comment::new(movie_id, "A".into(), "a@b.com".into(), "first take".into());
    app.store.insert_comment(&comment).await.unwrap();

    let response = reqwest::Client::new()
        .put(&format!("{}/api/comments/update", app.address))
        .json(&json!({ "commentId": comment.id.to_hex(), "text": "second take" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "success": true, "matched": true }));

    let stored = app.store.comments_for_movie(movie_id).await.unwrap();
    assert_eq!(stored[0].text, "second take");
    assert!(stored[0].date.is_some());
}

#[tokio::test]
async fn update_and_delete_of_missing_comment_still_succeed() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let missing = ObjectId::new().to_hex();

    let response = client
        .put(&format!("{}/api/comments/update", app.address))
        .json(&json!({ "commentId": missing, "text": "anything" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "success": true, "matched": false }));

    let response = client
        .delete(&format!("{}/api/comments/delete", app.address))
        .json(&json!({ "commentId": missing }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "success": true, "matched": false }));
}

#[tokio::test]
async fn delete_comment_removes_one_record() {
    let app = spawn_app().await;
    let movie_id = ObjectId::new();
    let keep = Comment::new(movie_id, "A".into(), "a@b.com".into(), "keep".into());
    let drop = Comment::new(movie_id, "B".into(), "b@b.com".into(), "drop".into());
    app.store.insert_comment(&keep).await.unwrap();
    app.store.insert_comment(&drop).await.unwrap();

    let response = reqwest::Client::new()
        .delete(&format!("{}/api/comments/delete", app.address))
        .json(&json!({ "commentId": drop.id.to_hex() }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["matched"], true);

    let remaining = app.store.comments_for_movie(movie_id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].text, "keep");
}

#[tokio::test]
async fn malformed_comment_id_is_bad_request() {
    let app = spawn_app().await;

    let response = reqwest::Client::new()
        .delete(&format!("{}/api/comments/delete", app.address))
        .json(&json!({ "commentId": "nope" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid comment ID format");
}

#[tokio::test]
async fn wrong_method_is_405_on_every_endpoint() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let cases = [
        (reqwest::Method::POST, "/api/movies"),
        (reqwest::Method::DELETE, "/api/movies/details"),
        (reqwest::Method::PUT, "/api/movies/search"),
        (reqwest::Method::GET, "/api/movies/add"),
        (reqwest::Method::GET, "/api/comments/add"),
        (reqwest::Method::POST, "/api/comments/update"),
        (reqwest::Method::PUT, "/api/comments/delete"),
        (reqwest::Method::POST, "/api/health"),
    ];

    for (method, path) in cases {
        let response = client
            .request(method.clone(), format!("{}{}", app.address, path))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 405, "{} {}", method, path);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Method not allowed");
    }
}

#[tokio::test]
async fn database_failures_use_the_safe_message() {
    let address = spawn_with_store(Arc::new(FailingStore)).await;
    let client = reqwest::Client::new();

    let requests = [
        client.get(format!("{}/api/movies", address)),
        client.get(format!("{}/api/movies/details?id={}", address, VALID_ID)),
        client.get(format!("{}/api/movies/search?query=heat", address)),
        client.post(format!("{}/api/movies/add", address)).json(&json!({ "title": "T" })),
        client
            .post(format!("{}/api/comments/add", address))
            .json(&json!({ "movieId": VALID_ID, "name": "A", "email": "a@b.com", "text": "hi" })),
        client
            .put(format!("{}/api/comments/update", address))
            .json(&json!({ "commentId": VALID_ID, "text": "x" })),
        client
            .delete(format!("{}/api/comments/delete", address))
            .json(&json!({ "commentId": VALID_ID })),
        client.get(format!("{}/api/health", address)),
    ];

    for request in requests {
        let response = request.send().await.unwrap();
        assert_eq!(response.status().as_u16(), 500);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Database operation failed");
    }
}

#[tokio::test]
async fn health_reports_ok() {
    let app = spawn_app().await;

    let response = reqwest::Client::new()
        .get(&format!("{}/api/health", app.address))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = spawn_app().await;

    let body: Value = reqwest::Client::new()
        .get(&format!("{}/api/openapi.json", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(body["paths"]["/api/movies/details"]["get"].is_object());
    assert!(body["paths"]["/api/comments/delete"]["delete"].is_object());
}

#[tokio::test]
async fn cors_headers_apply_to_every_endpoint() {
    let app = spawn_app_with_movies(movies(1)).await;
    let client = reqwest::Client::new();

    for path in ["/api/movies", "/api/movies/search?query=movie", "/api/health"] {
        let response = client
            .get(format!("{}{}", app.address, path))
            .header("Origin", "http://localhost:5173")
            .send()
            .await
            .unwrap();

        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("*"),
            "{}",
            path
        );
    }
}
