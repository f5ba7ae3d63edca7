//! Shelf listing and lookup commands

use super::print_json;
use anyhow::Result;
use weread_core::{Book, WereadTools};

fn print_book_line(book: &Book) {
    println!("{:<16} {} ({})", book.id, book.title, book.author);
}

fn print_books(books: &[Book], json: bool) -> Result<()> {
    if json {
        return print_json(&books);
    }
    for book in books {
        print_book_line(book);
    }
    println!();
    println!("{} book(s)", books.len());
    Ok(())
}

/// List every book on the shelf
pub async fn books(tools: &WereadTools, json: bool) -> Result<()> {
    let books = tools.get_books().await?;
    print_books(&books, json)
}

/// Search the shelf
pub async fn search(tools: &WereadTools, query: &str, json: bool) -> Result<()> {
    let books = tools.search_books(query).await?;
    tracing::debug!(query, matches = books.len(), "search finished");
    print_books(&books, json)
}

/// Display information about one book
pub async fn book(tools: &WereadTools, book_id: &str, json: bool) -> Result<()> {
    let book = tools.get_book_info(book_id).await?;

    if json {
        return print_json(&book);
    }

    println!("Title:       {}", book.title);
    println!("Author:      {}", book.author);
    println!("ID:          {}", book.id);
    if let Some(category) = &book.category {
        println!("Category:    {}", category);
    }
    if let Some(publisher) = &book.metadata.publisher {
        println!("Publisher:   {}", publisher);
    }
    if let Some(isbn) = &book.metadata.isbn {
        println!("ISBN:        {}", isbn);
    }
    if let Some(rating) = book.metadata.rating {
        println!("Rating:      {:.1}", rating);
    }
    if !book.cover_url.is_empty() {
        println!("Cover:       {}", book.cover_url);
    }
    if let Some(intro) = &book.metadata.intro {
        println!();
        println!("{}", intro);
    }
    Ok(())
}
