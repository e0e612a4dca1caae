pub mod alerts;
pub mod analyses;
pub mod environment;
pub mod health;
pub mod knowledge;
pub mod lab_analyses;
pub mod notifications;
pub mod plants;
pub mod training_images;
pub mod treatments;
pub mod users;

const DEFAULT_PAGE_SIZE: u64 = 50;
const MAX_PAGE_SIZE: u64 = 500;

/// Clamp a requested page size. Absent, zero and negative all fall
/// back to the default.
pub(crate) fn page_limit(limit: Option<i64>) -> u64 {
    match limit {
        Some(n) if n > 0 => (n as u64).min(MAX_PAGE_SIZE),
        _ => DEFAULT_PAGE_SIZE,
    }
}

pub(crate) fn page_offset(offset: Option<i64>) -> u64 {
    offset.map_or(0, |n| n.max(0) as u64)
}
