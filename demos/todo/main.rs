//! Entstore demo - Todo List
//!
//! This demo exercises the store end to end:
//! - Building a persistent store over a file-backed key-value capability
//! - Insert, update, remove and set-active operations
//! - Derived projections recomputing on every snapshot
//! - Hydration across a simulated restart
//!
//! Run with: cargo run -p todo_demo

use entstore_core::{EntityKey, EntityStore, Keyed, StoreResult};
use entstore_storage::FileKv;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const STORAGE_KEY: &str = "todos";

/// A todo item keyed by its slug.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Todo {
    slug: String,
    title: String,
    done: bool,
}

impl Todo {
    fn new(slug: &str, title: &str) -> Self {
        Self {
            slug: slug.to_string(),
            title: title.to_string(),
            done: false,
        }
    }
}

impl Keyed for Todo {
    fn key(&self) -> EntityKey {
        EntityKey::from(self.slug.as_str())
    }
}

fn open_store(kv: Arc<FileKv>) -> StoreResult<EntityStore<Todo>> {
    EntityStore::builder()
        .initial([
            Todo::new("groceries", "Buy groceries"),
            Todo::new("laundry", "Do the laundry"),
        ])
        .persist(STORAGE_KEY)
        .storage(kv)
        .build()
}

fn main() -> StoreResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    let data_dir = std::env::temp_dir().join("entstore_todo_demo");
    println!("persisting under {}", data_dir.display());

    // First run: mutate a fresh (or previously persisted) store.
    {
        let kv = Arc::new(FileKv::open(&data_dir)?);
        let store = open_store(kv)?;

        let open = store.get_where(|t: &Todo| !t.done);
        println!("open todos: {}", open.get().len());

        store.set(Todo::new("dishes", "Wash the dishes"));
        store.update(
            |t| Todo {
                done: true,
                ..t.clone()
            },
            "laundry",
        );
        store.set_active("dishes");

        for todo in store.all().get() {
            let marker = if todo.done { "x" } else { " " };
            println!("[{marker}] {} - {}", todo.slug, todo.title);
        }
        println!("active: {:?}", store.active().get().map(|t| t.slug));
        println!("still open: {}", open.get().len());
    }

    // Second run: the snapshot hydrates from disk, active pointer included.
    let kv = Arc::new(FileKv::open(&data_dir)?);
    let store = open_store(kv)?;
    println!(
        "after restart: {} todos, active = {:?}",
        store.snapshot().len(),
        store.active_id().get(),
    );

    Ok(())
}
