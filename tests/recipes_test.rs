// ABOUTME: HTTP integration tests for recipe CRUD and list filters
// ABOUTME: Covers JSON and multipart bodies, author checks, image replacement and pagination
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use std::collections::BTreeSet;

use axum::http::StatusCode;
use common::{
    create_ingredient, create_tag, create_test_context, create_test_context_with,
    create_test_user, recipe_body,
};
use helpers::axum_test::{AxumTestRequest, FormPart};
use serde_json::{json, Value};

/// Context with one author, two tags and two ingredients
async fn setup() -> (common::TestContext, String, Vec<i64>, Vec<i64>) {
    let context = create_test_context().await.unwrap();
    let (_, token) = create_test_user(&context, "chef").await.unwrap();
    let breakfast = create_tag(&context, "Breakfast", "breakfast").await.unwrap();
    let dinner = create_tag(&context, "Dinner", "dinner").await.unwrap();
    let flour = create_ingredient(&context, "flour", "g").await.unwrap();
    let milk = create_ingredient(&context, "milk", "ml").await.unwrap();
    (
        context,
        token,
        vec![breakfast.id, dinner.id],
        vec![flour.id, milk.id],
    )
}

async fn create_recipe(context: &common::TestContext, token: &str, body: &Value) -> Value {
    AxumTestRequest::post("/api/recipes/")
        .token(token)
        .json(body)
        .send(context.app())
        .await
        .assert_status(StatusCode::CREATED)
        .json()
}

fn field_errors(body: &Value) -> &Value {
    &body["error"]["details"]["fields"]
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_recipe_returns_full_representation() {
    let (context, token, tags, ingredients) = setup().await;
    let body = recipe_body("Pancakes", &tags, &[(ingredients[0], 200), (ingredients[1], 300)], 20);

    let recipe = create_recipe(&context, &token, &body).await;

    assert_eq!(recipe["name"], "Pancakes");
    assert_eq!(recipe["cooking_time"], 20);
    assert_eq!(recipe["author"]["username"], "chef");
    assert_eq!(recipe["author"]["is_subscribed"], false);
    assert_eq!(recipe["is_favorited"], false);
    assert_eq!(recipe["is_in_shopping_cart"], false);
    assert_eq!(recipe["tags"].as_array().unwrap().len(), 2);
    assert_eq!(recipe["ingredients"][0]["name"], "flour");
    assert_eq!(recipe["ingredients"][0]["amount"], 200);
    assert_eq!(recipe["ingredients"][1]["measurement_unit"], "ml");

    let image = recipe["image"].as_str().unwrap();
    assert!(image.starts_with("/media/recipes/images/"));
    assert!(image.ends_with(".png"));
    let stored = context
        .media_dir
        .path()
        .join(image.trim_start_matches("/media/"));
    assert!(stored.exists());
}

#[tokio::test]
async fn test_create_recipe_requires_authentication() {
    let (context, _, tags, ingredients) = setup().await;
    let body = recipe_body("Pancakes", &tags, &[(ingredients[0], 200)], 20);

    let response = AxumTestRequest::post("/api/recipes/")
        .json(&body)
        .send(context.app())
        .await;
    assert_eq!(response.status(), 401);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "AUTH_REQUIRED");
}

#[tokio::test]
async fn test_create_recipe_reports_every_bad_field() {
    let (context, token, tags, ingredients) = setup().await;
    let body = json!({
        "name": "",
        "text": "Mix",
        "cooking_time": 0,
        "tags": [tags[0], tags[0]],
        "ingredients": [
            {"id": ingredients[0], "amount": 1},
            {"id": ingredients[0], "amount": 2}
        ],
    });

    let response = AxumTestRequest::post("/api/recipes/")
        .token(&token)
        .json(&body)
        .send(context.app())
        .await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    let fields = field_errors(&body);
    assert!(fields["name"].is_array());
    assert!(fields["image"].is_array());
    assert_eq!(
        fields["cooking_time"][0],
        "Ensure this value is greater than or equal to 1."
    );
    assert_eq!(fields["tags"][0], "Tags must not repeat.");
    assert_eq!(fields["ingredients"][0], "Ingredients must not repeat.");
    assert_eq!(context.database().get_recipe(1).await.unwrap(), None);
}

#[tokio::test]
async fn test_create_recipe_rejects_unknown_references() {
    let (context, token, tags, ingredients) = setup().await;
    let body = recipe_body("Soup", &[tags[0], 999], &[(ingredients[0], 1), (777, 2)], 30);

    let response = AxumTestRequest::post("/api/recipes/")
        .token(&token)
        .json(&body)
        .send(context.app())
        .await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    let fields = field_errors(&body);
    assert_eq!(fields["tags"][0], "Invalid pk \"999\" - object does not exist.");
    assert_eq!(
        fields["ingredients"][0],
        "Ingredient with id 777 does not exist."
    );
}

#[tokio::test]
async fn test_create_recipe_rejects_malformed_json() {
    let (context, token, _, _) = setup().await;
    let response = AxumTestRequest::post("/api/recipes/")
        .token(&token)
        .raw("application/json", b"{\"name\": ")
        .send(context.app())
        .await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_anonymous_write_is_rejected_before_body_is_read() {
    let (context, token, tags, ingredients) = setup().await;
    let created = create_recipe(
        &context,
        &token,
        &recipe_body("Omelette", &tags, &[(ingredients[0], 2)], 10),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let requests = [
        AxumTestRequest::post("/api/recipes/").raw("application/json", b"{\"name\": "),
        AxumTestRequest::post("/api/recipes/").raw("text/plain", b"Omelette"),
        AxumTestRequest::patch(&format!("/api/recipes/{id}/"))
            .raw("application/json", b"{\"name\": "),
        AxumTestRequest::patch(&format!("/api/recipes/{id}/"))
            .multipart(&[FormPart::Text("cooking_time", "soon")]),
    ];
    for request in requests {
        let response = request.send(context.app()).await;
        assert_eq!(response.status(), 401);
        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "AUTH_REQUIRED");
    }

    let recipe = context.database().get_recipe(id).await.unwrap().unwrap();
    assert_eq!(recipe.name, "Omelette");
}

#[tokio::test]
async fn test_body_over_upload_limit_is_rejected() {
    let context = create_test_context_with(|config| config.media.max_upload_bytes = 1024)
        .await
        .unwrap();
    let (_, token) = create_test_user(&context, "chef").await.unwrap();
    let tag = create_tag(&context, "Breakfast", "breakfast").await.unwrap();
    let flour = create_ingredient(&context, "flour", "g").await.unwrap();

    let mut body = recipe_body("Bread", &[tag.id], &[(flour.id, 500)], 90);
    body["text"] = Value::String("knead ".repeat(400));
    let response = AxumTestRequest::post("/api/recipes/")
        .token(&token)
        .json(&body)
        .send(context.app())
        .await;
    assert_eq!(response.status(), 413);
    let error: Value = response.json();
    assert_eq!(error["error"]["code"], "PAYLOAD_TOO_LARGE");

    let image = vec![0_u8; 4096];
    let response = AxumTestRequest::post("/api/recipes/")
        .token(&token)
        .multipart(&[
            FormPart::Text("name", "Bread"),
            FormPart::File {
                name: "image",
                file_name: "bread.png",
                content_type: "image/png",
                bytes: &image,
            },
        ])
        .send(context.app())
        .await;
    assert_eq!(response.status(), 413);

    let within_limit = recipe_body("Toast", &[tag.id], &[(flour.id, 50)], 5);
    create_recipe(&context, &token, &within_limit).await;
    assert!(context.database().get_recipe(1).await.unwrap().is_some());
}

#[tokio::test]
async fn test_create_recipe_from_multipart_form() {
    let (context, token, tags, ingredients) = setup().await;
    let tag_list = format!("[{}, {}]", tags[0], tags[1]);
    let ingredient_list = json!([{"id": ingredients[1], "amount": 250}]).to_string();

    let response = AxumTestRequest::post("/api/recipes/")
        .token(&token)
        .multipart(&[
            FormPart::Text("name", "Porridge"),
            FormPart::Text("text", "Boil oats in milk"),
            FormPart::Text("cooking_time", "10"),
            FormPart::Text("tags", &tag_list),
            FormPart::Text("ingredients", &ingredient_list),
            FormPart::File {
                name: "image",
                file_name: "porridge.png",
                content_type: "image/png",
                bytes: common::PNG_BYTES,
            },
        ])
        .send(context.app())
        .await
        .assert_status(StatusCode::CREATED);

    let recipe: Value = response.json();
    assert_eq!(recipe["name"], "Porridge");
    assert_eq!(recipe["tags"].as_array().unwrap().len(), 2);
    assert_eq!(recipe["ingredients"][0]["amount"], 250);
}

#[tokio::test]
async fn test_multipart_rejects_non_numeric_cooking_time() {
    let (context, token, _, _) = setup().await;
    let response = AxumTestRequest::post("/api/recipes/")
        .token(&token)
        .multipart(&[
            FormPart::Text("name", "Porridge"),
            FormPart::Text("cooking_time", "soon"),
        ])
        .send(context.app())
        .await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(
        field_errors(&body)["cooking_time"][0],
        "A valid integer is required."
    );
}

// ============================================================================
// Read
// ============================================================================

#[tokio::test]
async fn test_get_recipe_anonymous_and_missing() {
    let (context, token, tags, ingredients) = setup().await;
    let posted_ingredients = [(ingredients[1], 120), (ingredients[0], 50)];
    let created = create_recipe(
        &context,
        &token,
        &recipe_body("Toast", &[tags[1], tags[0]], &posted_ingredients, 5),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let recipe: Value = AxumTestRequest::get(&format!("/api/recipes/{id}/"))
        .send(context.app())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(recipe["name"], "Toast");
    assert_eq!(recipe["is_favorited"], false);

    let tag_ids: BTreeSet<i64> = recipe["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|tag| tag["id"].as_i64().unwrap())
        .collect();
    assert_eq!(tag_ids, tags.iter().copied().collect());

    let amounts: BTreeSet<(i64, i64)> = recipe["ingredients"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| (item["id"].as_i64().unwrap(), item["amount"].as_i64().unwrap()))
        .collect();
    assert_eq!(amounts, posted_ingredients.into_iter().collect());

    for missing in ["/api/recipes/9999/", "/api/recipes/abc/", "/api/recipes/0/"] {
        let response = AxumTestRequest::get(missing).send(context.app()).await;
        assert_eq!(response.status(), 404, "{missing}");
    }
}

#[tokio::test]
async fn test_invalid_token_is_rejected_on_public_endpoint() {
    let (context, _, _, _) = setup().await;
    let response = AxumTestRequest::get("/api/recipes/")
        .token("not-a-token")
        .send(context.app())
        .await;
    assert_eq!(response.status(), 401);
}

// ============================================================================
// Update and delete
// ============================================================================

#[tokio::test]
async fn test_update_recipe_by_author_replaces_image_and_sets() {
    let (context, token, tags, ingredients) = setup().await;
    let created = create_recipe(
        &context,
        &token,
        &recipe_body("Stew", &tags, &[(ingredients[0], 100)], 60),
    )
    .await;
    let id = created["id"].as_i64().unwrap();
    let old_image = created["image"].as_str().unwrap().to_owned();

    let mut changes = recipe_body("Beef stew", &tags[1..], &[(ingredients[1], 400)], 90);
    changes.as_object_mut().unwrap().remove("text");

    let updated: Value = AxumTestRequest::patch(&format!("/api/recipes/{id}/"))
        .token(&token)
        .json(&changes)
        .send(context.app())
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(updated["name"], "Beef stew");
    assert_eq!(updated["text"], "How to make Stew");
    assert_eq!(updated["cooking_time"], 90);
    assert_eq!(updated["tags"].as_array().unwrap().len(), 1);
    assert_eq!(updated["ingredients"][0]["name"], "milk");
    assert_ne!(updated["image"], old_image);

    let old_path = context
        .media_dir
        .path()
        .join(old_image.trim_start_matches("/media/"));
    assert!(!old_path.exists());
}

#[tokio::test]
async fn test_update_requires_tags_and_ingredients() {
    let (context, token, tags, ingredients) = setup().await;
    let created = create_recipe(
        &context,
        &token,
        &recipe_body("Stew", &tags, &[(ingredients[0], 100)], 60),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let response = AxumTestRequest::patch(&format!("/api/recipes/{id}/"))
        .token(&token)
        .json(&json!({"name": "Renamed"}))
        .send(context.app())
        .await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(field_errors(&body)["tags"][0], "Tags must be provided.");
    assert_eq!(
        field_errors(&body)["ingredients"][0],
        "Ingredients must be provided."
    );
}

#[tokio::test]
async fn test_only_author_may_change_recipe() {
    let (context, token, tags, ingredients) = setup().await;
    let (_, stranger) = create_test_user(&context, "stranger").await.unwrap();
    let created = create_recipe(
        &context,
        &token,
        &recipe_body("Stew", &tags, &[(ingredients[0], 100)], 60),
    )
    .await;
    let uri = format!("/api/recipes/{}/", created["id"]);

    let response = AxumTestRequest::patch(&uri)
        .token(&stranger)
        .json(&recipe_body("Mine now", &tags, &[(ingredients[0], 1)], 1))
        .send(context.app())
        .await;
    assert_eq!(response.status(), 403);

    let response = AxumTestRequest::delete(&uri)
        .token(&stranger)
        .send(context.app())
        .await;
    assert_eq!(response.status(), 403);

    let response = AxumTestRequest::delete(&uri).send(context.app()).await;
    assert_eq!(response.status(), 401);

    let response = AxumTestRequest::delete("/api/recipes/4242/")
        .token(&stranger)
        .send(context.app())
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_delete_recipe_removes_record_and_image() {
    let (context, token, tags, ingredients) = setup().await;
    let created = create_recipe(
        &context,
        &token,
        &recipe_body("Stew", &tags, &[(ingredients[0], 100)], 60),
    )
    .await;
    let id = created["id"].as_i64().unwrap();
    let image = created["image"].as_str().unwrap().to_owned();

    AxumTestRequest::delete(&format!("/api/recipes/{id}/"))
        .token(&token)
        .send(context.app())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    assert_eq!(context.database().get_recipe(id).await.unwrap(), None);
    let path = context
        .media_dir
        .path()
        .join(image.trim_start_matches("/media/"));
    assert!(!path.exists());
}

// ============================================================================
// List and filters
// ============================================================================

#[tokio::test]
async fn test_list_filters_by_tags_and_author() {
    let (context, token, tags, ingredients) = setup().await;
    let (other, other_token) = create_test_user(&context, "baker").await.unwrap();

    create_recipe(
        &context,
        &token,
        &recipe_body("Omelette", &tags[..1], &[(ingredients[0], 1)], 5),
    )
    .await;
    create_recipe(
        &context,
        &token,
        &recipe_body("Roast", &tags[1..], &[(ingredients[0], 1)], 90),
    )
    .await;
    create_recipe(
        &context,
        &other_token,
        &recipe_body("Bread", &tags, &[(ingredients[1], 1)], 120),
    )
    .await;

    let page: Value = AxumTestRequest::get("/api/recipes/")
        .send(context.app())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(page["count"], 3);
    assert_eq!(page["results"][0]["name"], "Bread");

    let page: Value = AxumTestRequest::get("/api/recipes/?tags=breakfast")
        .send(context.app())
        .await
        .json();
    assert_eq!(page["count"], 2);

    let page: Value = AxumTestRequest::get("/api/recipes/?tags=breakfast&tags=dinner")
        .send(context.app())
        .await
        .json();
    assert_eq!(page["count"], 3);

    let page: Value = AxumTestRequest::get(&format!("/api/recipes/?author={}", other.id))
        .send(context.app())
        .await
        .json();
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["name"], "Bread");
}

#[tokio::test]
async fn test_list_pagination_links() {
    let (context, token, tags, ingredients) = setup().await;
    for name in ["One", "Two", "Three"] {
        create_recipe(
            &context,
            &token,
            &recipe_body(name, &tags[..1], &[(ingredients[0], 1)], 5),
        )
        .await;
    }

    let page: Value = AxumTestRequest::get("/api/recipes/?limit=2&tags=breakfast")
        .send(context.app())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(page["count"], 3);
    assert_eq!(page["results"].as_array().unwrap().len(), 2);
    assert_eq!(page["previous"], Value::Null);
    let next = page["next"].as_str().unwrap();
    assert!(next.contains("page=2"));
    assert!(next.contains("tags=breakfast"));

    let page: Value = AxumTestRequest::get("/api/recipes/?limit=2&page=2")
        .send(context.app())
        .await
        .json();
    assert_eq!(page["results"].as_array().unwrap().len(), 1);
    assert_eq!(page["next"], Value::Null);

    let response = AxumTestRequest::get("/api/recipes/?limit=2&page=9")
        .send(context.app())
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_membership_filters_ignored_for_anonymous() {
    let (context, token, tags, ingredients) = setup().await;
    let created = create_recipe(
        &context,
        &token,
        &recipe_body("Omelette", &tags[..1], &[(ingredients[0], 1)], 5),
    )
    .await;
    create_recipe(
        &context,
        &token,
        &recipe_body("Roast", &tags[1..], &[(ingredients[0], 1)], 90),
    )
    .await;

    AxumTestRequest::post(&format!("/api/recipes/{}/favorite/", created["id"]))
        .token(&token)
        .send(context.app())
        .await
        .assert_status(StatusCode::CREATED);

    let page: Value = AxumTestRequest::get("/api/recipes/?is_favorited=1")
        .token(&token)
        .send(context.app())
        .await
        .json();
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["is_favorited"], true);

    let page: Value = AxumTestRequest::get("/api/recipes/?is_favorited=1")
        .send(context.app())
        .await
        .json();
    assert_eq!(page["count"], 2);
}
