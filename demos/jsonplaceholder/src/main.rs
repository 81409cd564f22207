//! JSONPlaceholder Demo
//!
//! Exercises every punch verb against <https://jsonplaceholder.typicode.com>.
//! Set `RUST_LOG=punch=info` to see the request log.

// Example-specific lint allowances
#![allow(missing_docs)]
#![allow(clippy::print_stdout)]
#![allow(dead_code)]

use std::path::Path;

use punch::prelude::*;
use tokio::io::AsyncWriteExt;
use tracing_subscriber::EnvFilter;

const BASE_URL: &str = "https://jsonplaceholder.typicode.com";

// ============================================================================
// Data Types
// ============================================================================

/// A todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub user_id: u64,
    pub id: u64,
    pub title: String,
    pub completed: bool,
}

/// Payload to create or replace a todo.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
    pub user_id: u64,
    pub title: String,
    pub completed: bool,
}

/// Server answer to a creation.
#[derive(Debug, Clone, Deserialize)]
pub struct Created {
    pub id: u64,
}

// ============================================================================
// API calls
// ============================================================================

pub async fn get_todo(client: &Client, ctx: &Context, id: u64) -> Result<Todo> {
    client.get_and_decode(ctx, &format!("/todos/{id}"), &[]).await
}

pub async fn list_todos(client: &Client, ctx: &Context, user_id: u64) -> Result<Vec<Todo>> {
    let mut response = client
        .get(
            ctx,
            "/todos",
            &[
                with_headers([("Accept", "application/json")]),
                with_queries([("userId", user_id.to_string())]),
            ],
        )
        .await;

    let todos = response.decode_json().await;
    response.close()?;
    todos
}

pub async fn create_todo(client: &Client, ctx: &Context, todo: &NewTodo) -> Result<Created> {
    let payload = to_json(todo)?;
    client
        .post_and_decode(
            ctx,
            "/todos",
            payload,
            &[with_headers([("Content-Type", "application/json")])],
        )
        .await
}

pub async fn replace_todo(client: &Client, ctx: &Context, id: u64, todo: &NewTodo) -> Result<Todo> {
    let payload = to_json(todo)?;
    client
        .put_and_decode(
            ctx,
            &format!("/todos/{id}"),
            payload,
            &[with_headers([("Content-Type", "application/json")])],
        )
        .await
}

pub async fn complete_todo(client: &Client, ctx: &Context, id: u64) -> Result<Todo> {
    client
        .patch_and_decode(
            ctx,
            &format!("/todos/{id}"),
            r#"{"completed":true}"#,
            &[with_headers([("Content-Type", "application/json")])],
        )
        .await
}

pub async fn delete_todo(client: &Client, ctx: &Context, id: u64) -> Result<StatusCode> {
    let mut response = client.delete(ctx, &format!("/todos/{id}"), &[]).await;
    response.close()?;
    let status = response.status().unwrap_or_default();
    StatusCode::from_u16(status).map_err(|e| Error::invalid_request(e.to_string()))
}

/// Fetch a todo as raw text, leaving the JSON undecoded.
pub async fn todo_text(client: &Client, ctx: &Context, id: u64) -> Result<String> {
    let mut response = client
        .custom(ctx, "GET", &format!("/todos/{id}"), None, &[])
        .await;
    let text = response.decode_string().await;
    response.close()?;
    text
}

/// Fetch the headers of a resource with a HEAD request.
pub async fn head_todo(client: &Client, ctx: &Context, id: u64) -> Result<Option<String>> {
    let mut response = client
        .custom(ctx, "HEAD", &format!("/todos/{id}"), None, &[])
        .await;
    response.close()?;
    Ok(response
        .headers()
        .and_then(|headers| headers.get(header::CONTENT_TYPE))
        .and_then(|value| value.to_str().ok())
        .map(str::to_string))
}

/// Stream a resource to `destination`, returning the number of bytes written.
pub async fn download(client: &Client, ctx: &Context, path: &str, destination: &Path) -> Result<u64> {
    let mut file = tokio::fs::File::create(destination).await?;
    let mut response = client.get(ctx, path, &[]).await;

    let written = response
        .with_decode(async |body| {
            let mut written = 0_u64;
            while let Some(chunk) = body.chunk().await? {
                file.write_all(&chunk).await?;
                written += chunk.len() as u64;
            }
            file.flush().await?;
            Ok(written)
        })
        .await;

    response.close()?;
    written
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> punch::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = Client::with_timeout(BASE_URL, Duration::from_secs(10));
    let ctx = Context::background();
    println!("Client created for {}", client.base_url());

    let todo = get_todo(&client, &ctx, 1).await?;
    println!("\nGET /todos/1\n{todo:#?}");

    let todos = list_todos(&client, &ctx, 1).await?;
    println!("\nGET /todos?userId=1 -> {} todos", todos.len());

    let draft = NewTodo {
        user_id: 1,
        title: "write the demo".to_string(),
        completed: false,
    };
    let created = create_todo(&client, &ctx, &draft).await?;
    println!("\nPOST /todos -> id {}", created.id);

    let replaced = replace_todo(&client, &ctx, 1, &draft).await?;
    println!("\nPUT /todos/1 -> {}", replaced.title);

    let completed = complete_todo(&client, &ctx, 1).await?;
    println!("\nPATCH /todos/1 -> completed: {}", completed.completed);

    let status = delete_todo(&client, &ctx, 1).await?;
    println!("\nDELETE /todos/1 -> {status}");

    let text = todo_text(&client, &ctx, 1).await?;
    println!("\nGET /todos/1 as text\n{text}");

    let content_type = head_todo(&client, &ctx, 1).await?;
    println!("\nHEAD /todos/1 -> content-type: {content_type:?}");

    let destination = std::env::temp_dir().join("punch-todos.json");
    let written = download(&client, &ctx, "/todos", &destination).await?;
    println!("\nGET /todos -> {written} bytes written to {}", destination.display());

    Ok(())
}

// ============================================================================
// Tests using wiremock
// ============================================================================
