//! Web reader URLs.
//!
//! The web reader does not take raw book ids; it expects an obfuscated id
//! derived from the md5 of the book id. Derivation is pure and needs no session.

use crate::error::{Result, WereadError};
use md5::{Digest, Md5};

/// Reader URL for a book under the given web base
pub fn reader_url(web_base: &str, book_id: &str) -> Result<String> {
    validate_book_id(book_id)?;
    Ok(format!(
        "{}/web/reader/{}?bookId={}",
        web_base.trim_end_matches('/'),
        encode_book_id(book_id),
        urlencoding::encode(book_id)
    ))
}

/// Reject ids that cannot name a book: empty, whitespace or control characters
pub fn validate_book_id(book_id: &str) -> Result<()> {
    if book_id.trim().is_empty() {
        return Err(WereadError::Validation("book_id must not be empty".to_string()));
    }
    if book_id.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(WereadError::Validation(format!(
            "book_id {book_id:?} contains whitespace or control characters"
        )));
    }
    Ok(())
}

fn md5_hex(input: &str) -> String {
    hex::encode(Md5::digest(input.as_bytes()))
}

/// Obfuscated reader id used in web reader paths
pub fn encode_book_id(book_id: &str) -> String {
    let digest = md5_hex(book_id);
    let (code, parts) = split_id(book_id);

    let mut encoded = String::with_capacity(32);
    encoded.push_str(&digest[..3]);
    encoded.push_str(code);
    encoded.push('2');
    encoded.push_str(&digest[digest.len() - 2..]);

    let segments: Vec<String> = parts
        .iter()
        .map(|part| format!("{:02x}{}", part.len(), part))
        .collect();
    encoded.push_str(&segments.join("g"));

    if encoded.len() < 20 {
        let missing = 20 - encoded.len();
        encoded.push_str(&digest[..missing]);
    }

    let check = md5_hex(&encoded);
    encoded.push_str(&check[..3]);
    encoded
}

/// Numeric ids are hex-encoded in 9-digit chunks (code "3"); anything else as
/// the hex of each character (code "4").
fn split_id(book_id: &str) -> (&'static str, Vec<String>) {
    if book_id.bytes().all(|b| b.is_ascii_digit()) {
        let parts = book_id
            .as_bytes()
            .chunks(9)
            .map(|chunk| {
                // Chunks are ASCII digits of at most 9 places, always fitting u64
                let digits = std::str::from_utf8(chunk).unwrap_or("0");
                format!("{:x}", digits.parse::<u64>().unwrap_or(0))
            })
            .collect();
        return ("3", parts);
    }

    let hex: String = book_id
        .chars()
        .map(|c| format!("{:x}", c as u32))
        .collect();
    ("4", vec![hex])
}
