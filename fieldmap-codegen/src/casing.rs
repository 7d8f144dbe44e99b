//! Identifier casing for generated Go code
//!
//! Field names must come out exactly as the Thrift/Go bindings spell them, so
//! known initialisms stay fully upper-case (`user_id` becomes `UserID`).

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use heck::ToSnakeCase;
use once_cell::sync::Lazy;

/// Initialisms kept upper-case in generated identifiers
pub const COMMON_INITIALISMS: &[&str] = &[
    "ACL", "API", "ASCII", "CPU", "CSS", "DNS", "EOF", "GUID", "HTML", "HTTP", "HTTPS", "ID", "IP", "JSON", "LHS", "OS",
    "QPS", "RAM", "RHS", "RPC", "SLA", "SMTP", "SQL", "SSH", "TCP", "TLS", "TTL", "UDP", "UI", "UID", "UUID", "URI",
    "URL", "UTF8", "VM", "XML", "XMPP", "XSRF", "XSS",
];

static INITIALISMS: Lazy<HashSet<&'static str>> = Lazy::new(|| COMMON_INITIALISMS.iter().copied().collect());

/// Results of `pascal_case`, which is hit for every field on every pass
static PASCAL_CASE_CACHE: Lazy<RwLock<HashMap<String, String>>> = Lazy::new(|| RwLock::new(HashMap::new()));

/// Whether `s` is one of [`COMMON_INITIALISMS`]
pub fn is_initialism(s: &str) -> bool {
    INITIALISMS.contains(s)
}

/// Convert a schema name to PascalCase
///
/// The name is split on `_`. Each chunk that is a known initialism becomes
/// upper-case; an all-caps chunk is Title-cased unless it is the only chunk;
/// any other chunk gets its first letter upper-cased.
pub fn pascal_case(src: &str) -> String {
    if let Ok(cache) = PASCAL_CASE_CACHE.read() {
        if let Some(cached) = cache.get(src) {
            return cached.clone();
        }
    }

    let words: Vec<&str> = src.split('_').collect();
    let allow_all_caps = words.len() == 1;
    let result: String = words
        .iter()
        .map(|chunk| pascal_chunk(chunk, allow_all_caps))
        .collect();

    if let Ok(mut cache) = PASCAL_CASE_CACHE.write() {
        cache.insert(src.to_string(), result.clone());
    }
    result
}

fn pascal_chunk(chunk: &str, allow_all_caps: bool) -> String {
    if chunk.is_empty() {
        return String::new();
    }
    let upper = chunk.to_uppercase();
    if is_initialism(&upper) {
        return upper;
    }
    if is_all_caps(chunk) && !allow_all_caps {
        return upper_first(&chunk.to_lowercase());
    }
    upper_first(chunk)
}

/// Letters only; digits and punctuation are ignored
fn is_all_caps(s: &str) -> bool {
    s.chars().all(|c| !c.is_alphabetic() || c.is_uppercase())
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Alphanumeric runs of `src`
fn alnum_chunks(src: &str) -> impl Iterator<Item = &str> {
    src.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|chunk| !chunk.is_empty())
}

/// Convert a header or other free-form name to camelCase
///
/// `x-request-id` becomes `xRequestID`.
pub fn camel_case(src: &str) -> String {
    alnum_chunks(src)
        .enumerate()
        .map(|(idx, chunk)| {
            if idx == 0 {
                lower_first(chunk)
            } else {
                with_go_initialism(&upper_first(chunk))
            }
        })
        .collect()
}

fn with_go_initialism(segment: &str) -> String {
    let upper = segment.to_uppercase();
    if is_initialism(&upper) {
        return upper;
    }
    match starts_with_initialism(&upper) {
        Some(initialism) => format!("{initialism}{}", &segment[initialism.len()..]),
        None => segment.to_string(),
    }
}

/// Longest initialism (up to five characters) that `s` starts with
fn starts_with_initialism(s: &str) -> Option<&str> {
    (1..=5)
        .filter(|&len| s.len() >= len && s.is_char_boundary(len))
        .map(|len| &s[..len])
        .filter(|prefix| is_initialism(prefix))
        .last()
}

/// Lower-case the alphanumeric runs of `src` and join them
pub fn package_name(src: &str) -> String {
    alnum_chunks(src).map(str::to_lowercase).collect()
}

/// Convert camelCase or PascalCase to snake_case
///
/// Runs of capitals split before their last letter, so `HTTPServer` becomes
/// `http_server`.
pub fn camel_to_snake(s: &str) -> String {
    s.to_snake_case()
}
