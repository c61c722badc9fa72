// ABOUTME: Criterion benchmarks for shopping list aggregation and rendering
// ABOUTME: Measures in-memory summing plus the store query behind the cart download
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Criterion benchmarks for the shopping list download path.
//!
//! Carts are synthetic: many recipes sharing a small pool of ingredients,
//! which is the case where aggregation does real work.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    clippy::expect_used,
    missing_docs
)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use foodgram::database::Database;
use foodgram::models::{IngredientAmount, MembershipKind, NewIngredient, NewRecipe, NewTag, NewUser};
use foodgram::shopping_list::{self, CartLine};
use tokio::runtime::Runtime;

const UNITS: [&str; 4] = ["g", "ml", "pcs", "tbsp"];

fn cart_lines(recipes: usize, ingredients_per_recipe: usize) -> Vec<CartLine> {
    (0..recipes)
        .flat_map(|recipe| {
            (0..ingredients_per_recipe).map(move |slot| {
                let ingredient = (recipe * 7 + slot) % 40;
                CartLine {
                    name: format!("ingredient {ingredient}"),
                    measurement_unit: UNITS[ingredient % UNITS.len()].to_owned(),
                    amount: (slot as i64 + 1) * 25,
                }
            })
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("shopping_list_aggregate");
    for recipes in [5, 50, 500] {
        let lines = cart_lines(recipes, 8);
        group.throughput(Throughput::Elements(lines.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(recipes), &lines, |b, lines| {
            b.iter(|| shopping_list::aggregate(black_box(lines.clone())));
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let items = shopping_list::aggregate(cart_lines(50, 8));
    c.bench_function("shopping_list_render", |b| {
        b.iter(|| shopping_list::render(black_box("chef"), black_box(&items)));
    });
}

/// Database with one user whose cart holds `recipes` recipes
async fn seeded_cart(recipes: usize) -> (Database, i64) {
    let database = Database::new("sqlite::memory:").await.unwrap();
    let user = database
        .create_user(&NewUser {
            email: "bench@example.com".to_owned(),
            username: "bench".to_owned(),
            first_name: "Bench".to_owned(),
            last_name: "Mark".to_owned(),
            password_hash: "hash".to_owned(),
        })
        .await
        .unwrap();
    let tag = database
        .create_tag(&NewTag {
            name: "Bench".to_owned(),
            color: "#000000".to_owned(),
            slug: "bench".to_owned(),
        })
        .await
        .unwrap();

    let mut ingredient_ids = Vec::new();
    for index in 0..40 {
        let ingredient = database
            .create_ingredient(&NewIngredient {
                name: format!("ingredient {index}"),
                measurement_unit: UNITS[index % UNITS.len()].to_owned(),
            })
            .await
            .unwrap();
        ingredient_ids.push(ingredient.id);
    }

    for recipe in 0..recipes {
        let ingredients = (0..8)
            .map(|slot| IngredientAmount {
                ingredient_id: ingredient_ids[(recipe * 7 + slot) % ingredient_ids.len()],
                amount: 100,
            })
            .collect();
        let recipe_id = database
            .create_recipe(
                user.id,
                &NewRecipe {
                    name: format!("recipe {recipe}"),
                    image: "recipes/images/bench.png".to_owned(),
                    text: "Bench".to_owned(),
                    cooking_time: 10,
                    tags: vec![tag.id],
                    ingredients,
                },
            )
            .await
            .unwrap();
        database
            .add_membership(MembershipKind::ShoppingCart, user.id, recipe_id)
            .await
            .unwrap();
    }
    (database, user.id)
}

fn bench_cart_download(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let (database, user_id) = runtime.block_on(seeded_cart(50));

    c.bench_function("shopping_list_download_50_recipes", |b| {
        b.to_async(&runtime).iter(|| async {
            let lines = database.shopping_cart_lines(user_id).await.unwrap();
            let items = shopping_list::aggregate(lines);
            black_box(shopping_list::render("bench", &items))
        });
    });
}

criterion_group!(benches, bench_aggregate, bench_render, bench_cart_download);
criterion_main!(benches);
