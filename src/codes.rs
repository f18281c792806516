use tracing::{info, warn};

/// Builds every candidate code: each prefix followed by a two digit suffix `00..=99`.
/// The order is prefix-major, so all codes of the first prefix come first.
pub fn generate_codes<S: AsRef<str>>(prefixes: &[S]) -> Vec<String> {
    let mut codes = Vec::with_capacity(prefixes.len() * 100);
    for prefix in prefixes {
        let prefix = prefix.as_ref();
        codes.extend((0..100).map(|suffix| format!("{prefix}{suffix:02}")));
    }
    codes
}

/// Narrows the generated codes down to the ones a scan should visit.
///
/// An unknown `start_from` code is not an error, the full list is kept.
/// A `max_codes` of `0` means no limit.
pub fn select_codes(
    mut codes: Vec<String>,
    start_from: Option<&str>,
    max_codes: Option<usize>,
) -> Vec<String> {
    if let Some(start) = start_from {
        match codes.iter().position(|code| code == start) {
            Some(idx) => {
                codes.drain(..idx);
                info!("Starting from code: {start}");
            }
            None => warn!("Start code {start} not found, starting from beginning"),
        }
    }

    if let Some(max) = max_codes.filter(|max| *max > 0) {
        codes.truncate(max);
    }
    codes
}
