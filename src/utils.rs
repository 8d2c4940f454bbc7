//! Small shared helpers that don't belong to any one module.

use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch. The book itself never calls this —
/// callers stamp `NewOrder`/`snapshot` timestamps so matching stays a pure
/// function of its inputs and is trivial to test deterministically.
pub fn current_time_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the Unix epoch")
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_time_millis_is_monotonically_plausible() {
        let a = current_time_millis();
        let b = current_time_millis();
        assert!(b >= a);
    }
}
