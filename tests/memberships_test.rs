// ABOUTME: HTTP integration tests for favorites, the shopping cart and the list download
// ABOUTME: Covers add/remove status codes, viewer flags and ingredient aggregation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::http::StatusCode;
use common::{create_ingredient, create_tag, create_test_context, create_test_user, recipe_body};
use helpers::axum_test::AxumTestRequest;
use serde_json::Value;

/// Author with two recipes sharing flour; returns (context, token, recipe ids)
async fn setup() -> (common::TestContext, String, Vec<i64>) {
    let context = create_test_context().await.unwrap();
    let (_, token) = create_test_user(&context, "chef").await.unwrap();
    let tag = create_tag(&context, "Lunch", "lunch").await.unwrap();
    let flour = create_ingredient(&context, "flour", "g").await.unwrap();
    let eggs = create_ingredient(&context, "eggs", "pcs").await.unwrap();

    let mut ids = Vec::new();
    for (name, ingredients) in [
        ("Pasta", vec![(flour.id, 300), (eggs.id, 3)]),
        ("Bread", vec![(flour.id, 500)]),
    ] {
        let recipe: Value = AxumTestRequest::post("/api/recipes/")
            .token(&token)
            .json(&recipe_body(name, &[tag.id], &ingredients, 30))
            .send(context.app())
            .await
            .assert_status(StatusCode::CREATED)
            .json();
        ids.push(recipe["id"].as_i64().unwrap());
    }
    (context, token, ids)
}

// ============================================================================
// Favorites
// ============================================================================

#[tokio::test]
async fn test_favorite_add_and_remove() {
    let (context, token, ids) = setup().await;
    let uri = format!("/api/recipes/{}/favorite/", ids[0]);

    let short: Value = AxumTestRequest::post(&uri)
        .token(&token)
        .send(context.app())
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    assert_eq!(short["id"], ids[0]);
    assert_eq!(short["name"], "Pasta");
    assert_eq!(short["cooking_time"], 30);
    assert!(short["image"].as_str().unwrap().starts_with("/media/"));
    assert!(short.get("text").is_none());

    let duplicate = AxumTestRequest::post(&uri)
        .token(&token)
        .send(context.app())
        .await;
    assert_eq!(duplicate.status(), 400);
    let body: Value = duplicate.json();
    assert_eq!(body["error"]["code"], "RESOURCE_ALREADY_EXISTS");

    let recipe: Value = AxumTestRequest::get(&format!("/api/recipes/{}/", ids[0]))
        .token(&token)
        .send(context.app())
        .await
        .json();
    assert_eq!(recipe["is_favorited"], true);
    assert_eq!(recipe["is_in_shopping_cart"], false);

    AxumTestRequest::delete(&uri)
        .token(&token)
        .send(context.app())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let again = AxumTestRequest::delete(&uri)
        .token(&token)
        .send(context.app())
        .await;
    assert_eq!(again.status(), 400);
}

#[tokio::test]
async fn test_favorite_unknown_recipe() {
    let (context, token, _) = setup().await;

    let response = AxumTestRequest::post("/api/recipes/999/favorite/")
        .token(&token)
        .send(context.app())
        .await;
    assert_eq!(response.status(), 400);

    let response = AxumTestRequest::delete("/api/recipes/999/favorite/")
        .token(&token)
        .send(context.app())
        .await;
    assert_eq!(response.status(), 404);

    let response = AxumTestRequest::post("/api/recipes/1/favorite/")
        .send(context.app())
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_favorites_are_per_user() {
    let (context, token, ids) = setup().await;
    let (_, other) = create_test_user(&context, "guest").await.unwrap();

    AxumTestRequest::post(&format!("/api/recipes/{}/favorite/", ids[1]))
        .token(&token)
        .send(context.app())
        .await
        .assert_status(StatusCode::CREATED);

    let recipe: Value = AxumTestRequest::get(&format!("/api/recipes/{}/", ids[1]))
        .token(&other)
        .send(context.app())
        .await
        .json();
    assert_eq!(recipe["is_favorited"], false);

    let page: Value = AxumTestRequest::get("/api/recipes/?is_favorited=1")
        .token(&other)
        .send(context.app())
        .await
        .json();
    assert_eq!(page["count"], 0);
}

// ============================================================================
// Shopping cart
// ============================================================================

#[tokio::test]
async fn test_download_aggregates_cart_ingredients() {
    let (context, token, ids) = setup().await;
    for id in &ids {
        AxumTestRequest::post(&format!("/api/recipes/{id}/shopping_cart/"))
            .token(&token)
            .send(context.app())
            .await
            .assert_status(StatusCode::CREATED);
    }

    let page: Value = AxumTestRequest::get("/api/recipes/?is_in_shopping_cart=1")
        .token(&token)
        .send(context.app())
        .await
        .json();
    assert_eq!(page["count"], 2);

    let response = AxumTestRequest::get("/api/recipes/download_shopping_cart/")
        .token(&token)
        .send(context.app())
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(
        response.header("content-type"),
        Some("text/plain; charset=utf-8")
    );
    assert_eq!(
        response.header("content-disposition"),
        Some("attachment; filename=\"chef_shopping_list.txt\"")
    );

    let document = response.text();
    assert!(document.contains("Eggs (pcs) \u{2014} 3"));
    assert!(document.contains("Flour (g) \u{2014} 800"));
    assert_eq!(document.matches("Flour").count(), 1);
}

#[tokio::test]
async fn test_download_with_empty_cart() {
    let (context, token, ids) = setup().await;

    let response = AxumTestRequest::get("/api/recipes/download_shopping_cart/")
        .token(&token)
        .send(context.app())
        .await;
    assert_eq!(response.status(), 400);

    let uri = format!("/api/recipes/{}/shopping_cart/", ids[0]);
    AxumTestRequest::post(&uri)
        .token(&token)
        .send(context.app())
        .await
        .assert_status(StatusCode::CREATED);
    AxumTestRequest::delete(&uri)
        .token(&token)
        .send(context.app())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let response = AxumTestRequest::get("/api/recipes/download_shopping_cart/")
        .token(&token)
        .send(context.app())
        .await;
    assert_eq!(response.status(), 400);

    let response = AxumTestRequest::get("/api/recipes/download_shopping_cart/")
        .send(context.app())
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_deleting_recipe_clears_memberships() {
    let (context, token, ids) = setup().await;
    AxumTestRequest::post(&format!("/api/recipes/{}/shopping_cart/", ids[0]))
        .token(&token)
        .send(context.app())
        .await
        .assert_status(StatusCode::CREATED);

    AxumTestRequest::delete(&format!("/api/recipes/{}/", ids[0]))
        .token(&token)
        .send(context.app())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let response = AxumTestRequest::get("/api/recipes/download_shopping_cart/")
        .token(&token)
        .send(context.app())
        .await;
    assert_eq!(response.status(), 400);
}
