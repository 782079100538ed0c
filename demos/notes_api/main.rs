//! Notes service
//!
//! This example demonstrates:
//! - Mapping several entity types with `CrudMapper`
//! - Save and delete validation on `Category`
//! - Field rules through `validator` on `Author`
//! - Linking notes to categories, tags and authors
//!
//! Run with an optional YAML config:
//!
//! ```text
//! cargo run --example notes_api -- demos/notes_api/config.yaml
//! ```

mod entities;

use entities::{Author, Category, Note, ROOT_CATEGORY_ID, Tag};
use mapcrud::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,mapcrud=debug,tower_http=debug")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => CrudConfig::from_yaml_file(path)?,
        None => CrudConfig::default(),
    };

    println!("🚀 Notes API");
    println!("============\n");

    let store = Store::new(InMemoryBackend::new());
    seed(&store).await?;

    let mapper = CrudMapper::new(store)
        .with_config(&config)
        .map::<Author>("/api/v1/author")
        .full()
        .with_save_validation()
        .map::<Category>("/api/v1/category")
        .full()
        .with_save_validation()
        .with_delete_validation()
        .map::<Tag>("/api/v1/tag")
        .base()
        .all()
        .map::<Note>("/api/v1/note")
        .full()
        .done();

    println!("📋 Routes:");
    for route in mapper.routes() {
        println!("   {:<7} {}", route.method, route.path);
    }
    println!();

    println!("💡 Try:");
    println!(
        "   curl -X POST http://{}/api/v1/category -d '{{\"name\":\"work\",\"category_id\":1}}'",
        config.server.addr
    );
    println!(
        "   curl -X LINK 'http://{}/api/v1/category/1?categories=2'\n",
        config.server.addr
    );

    mapper.serve(&config.server.addr).await
}

/// Create the root category every other category hangs off
async fn seed(store: &Store) -> Result<()> {
    let root = store
        .save(&Category {
            id: ROOT_CATEGORY_ID,
            name: "root".to_string(),
            ..Default::default()
        })
        .await?;

    let author = store
        .save(&Author {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            ..Default::default()
        })
        .await?;

    store
        .save(&Note {
            title: "Welcome".to_string(),
            body: "Link me to a category with LINK /api/v1/category/1?notes=1".to_string(),
            ..Default::default()
        })
        .await?;

    tracing::info!(root = root.id, author = author.id, "seeded notes store");
    Ok(())
}
