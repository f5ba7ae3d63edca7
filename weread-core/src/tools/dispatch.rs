//! Name-based tool invocation for external invocation layers

use super::WereadTools;
use crate::error::{Result, WereadError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Description of one tool for catalog listings
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

fn book_id_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "book_id": { "type": "string", "description": "Book ID" }
        },
        "required": ["book_id"]
    })
}

fn tool(name: &'static str, description: &'static str, input_schema: Value) -> ToolDefinition {
    ToolDefinition {
        name,
        description,
        input_schema,
    }
}

/// Every tool the facade answers to
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        tool(
            "authenticate",
            "Check whether a WeRead cookie (or the configured one) is valid",
            json!({
                "type": "object",
                "properties": {
                    "cookie": { "type": "string", "description": "WeRead cookie string" }
                }
            }),
        ),
        tool(
            "get_books",
            "List all books in the WeRead library",
            json!({ "type": "object", "properties": {} }),
        ),
        tool(
            "get_book_info",
            "Get detailed information for a book",
            book_id_schema(),
        ),
        tool(
            "get_book_bookmarks",
            "Get highlights of a book, oldest first",
            book_id_schema(),
        ),
        tool(
            "get_book_chapters",
            "Get the chapters of a book in reading order",
            book_id_schema(),
        ),
        tool(
            "get_book_read_info",
            "Get reading progress for a book",
            book_id_schema(),
        ),
        tool(
            "get_book_reviews",
            "Get reviews and notes written for a book",
            book_id_schema(),
        ),
        tool(
            "get_web_url",
            "Get the WeRead web reader URL for a book",
            book_id_schema(),
        ),
        tool(
            "search_books",
            "Search the library by title or author",
            json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Search text" }
                },
                "required": ["query"]
            }),
        ),
        tool(
            "format_book_highlights",
            "Format the highlights of a book as markdown grouped by chapter",
            json!({
                "type": "object",
                "properties": {
                    "book_id": { "type": "string", "description": "Book ID" },
                    "max_highlights": {
                        "type": "integer",
                        "minimum": 1,
                        "description": "Maximum number of highlights to include"
                    }
                },
                "required": ["book_id"]
            }),
        ),
    ]
}

#[derive(Debug, Deserialize)]
struct BookIdArgs {
    book_id: String,
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
}

#[derive(Debug, Default, Deserialize)]
struct AuthenticateArgs {
    #[serde(default)]
    cookie: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FormatHighlightsArgs {
    book_id: String,
    #[serde(default)]
    max_highlights: Option<i64>,
}

fn parse_args<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T> {
    let args = if args.is_null() { json!({}) } else { args };
    serde_json::from_value(args)
        .map_err(|e| WereadError::Validation(format!("invalid arguments for {tool}: {e}")))
}

fn to_value<T: Serialize>(tool: &str, value: T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| WereadError::Parse {
        context: tool.to_string(),
        message: format!("result not serializable: {e}"),
    })
}

impl WereadTools {
    /// Invoke a tool by name with a JSON object of arguments
    pub async fn call(&self, name: &str, args: Value) -> Result<Value> {
        tracing::debug!(tool = name, "tool call");
        match name {
            "authenticate" => {
                let args: AuthenticateArgs = parse_args(name, args)?;
                to_value(name, self.authenticate(args.cookie.as_deref()).await)
            }
            "get_books" => to_value(name, self.get_books().await?),
            "get_book_info" => {
                let args: BookIdArgs = parse_args(name, args)?;
                to_value(name, self.get_book_info(&args.book_id).await?)
            }
            "get_book_bookmarks" => {
                let args: BookIdArgs = parse_args(name, args)?;
                to_value(name, self.get_book_bookmarks(&args.book_id).await?)
            }
            "get_book_chapters" => {
                let args: BookIdArgs = parse_args(name, args)?;
                to_value(name, self.get_book_chapters(&args.book_id).await?)
            }
            "get_book_read_info" => {
                let args: BookIdArgs = parse_args(name, args)?;
                to_value(name, self.get_book_read_info(&args.book_id).await?)
            }
            "get_book_reviews" => {
                let args: BookIdArgs = parse_args(name, args)?;
                to_value(name, self.get_book_reviews(&args.book_id).await?)
            }
            "get_web_url" => {
                let args: BookIdArgs = parse_args(name, args)?;
                to_value(name, self.get_web_url(&args.book_id)?)
            }
            "search_books" => {
                let args: SearchArgs = parse_args(name, args)?;
                to_value(name, self.search_books(&args.query).await?)
            }
            "format_book_highlights" | "format_highlights" => {
                let args: FormatHighlightsArgs = parse_args(name, args)?;
                to_value(
                    name,
                    self.format_highlights(&args.book_id, args.max_highlights)
                        .await?,
                )
            }
            other => Err(WereadError::Validation(format!("unknown tool: {other}"))),
        }
    }
}
