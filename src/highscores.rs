//! Best score across sessions
//!
//! A single scalar persisted to LocalStorage. Whatever is stored is treated
//! as untrusted: only a leading non-negative integer within the range of
//! integers a JS number holds exactly survives, anything else reads as 0.

use crate::platform::KeyValueStore;

/// Largest integer a JS number represents exactly (2^53 - 1)
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Parse a stored high score
///
/// Leading whitespace and trailing garbage are tolerated (`" 42px"` -> 42);
/// missing digits, negative values and out-of-range values yield 0.
pub fn sanitize_high_score(stored: Option<&str>) -> u64 {
    let Some(raw) = stored else {
        return 0;
    };
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return 0;
    }

    match rest[..digits_len].parse::<u64>() {
        Ok(0) => 0,
        Ok(_) if negative => 0,
        Ok(value) if value <= MAX_SAFE_INTEGER => value,
        _ => 0,
    }
}

/// Persisted best score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "resume_breaker_high_score";

    pub fn new(best: u64) -> Self {
        Self { best }
    }

    /// Record a score; returns true when it beats the previous best
    pub fn record(&mut self, score: u64) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }

    /// Load from storage; unreadable storage starts fresh
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(value) => {
                let best = sanitize_high_score(value.as_deref());
                log::info!("Loaded high score {}", best);
                Self { best }
            }
            Err(e) => {
                log::warn!("High score unavailable ({}), starting at 0", e);
                Self::default()
            }
        }
    }

    /// Persist; failures keep the in-memory value only
    pub fn save(&self, store: &mut impl KeyValueStore) {
        match store.set(Self::STORAGE_KEY, &self.best.to_string()) {
            Ok(()) => log::debug!("High score saved ({})", self.best),
            Err(e) => log::warn!("High score not saved: {}", e),
        }
    }
}
