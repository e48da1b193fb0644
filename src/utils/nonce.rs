use std::sync::Mutex;

/// Issues millisecond-timestamp nonces that strictly increase for the life of
/// the generator, even when two requests land in the same millisecond.
#[derive(Debug, Default)]
pub struct NonceGenerator {
    last: Mutex<i64>,
}

impl NonceGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next nonce as ASCII decimal digits.
    pub fn next(&self) -> String {
        self.next_after(chrono::Utc::now().timestamp_millis())
            .to_string()
    }

    fn next_after(&self, now_ms: i64) -> i64 {
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        let nonce = if now_ms > *last { now_ms } else { *last + 1 };
        *last = nonce;
        nonce
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_uses_clock_when_ahead() {
        let nonces = NonceGenerator::new();
        assert_eq!(nonces.next_after(1_700_000_000_000), 1_700_000_000_000);
        assert_eq!(nonces.next_after(1_700_000_000_050), 1_700_000_000_050);
    }

    #[test]
    fn test_same_millisecond_bumps() {
        let nonces = NonceGenerator::new();
        assert_eq!(nonces.next_after(1_000), 1_000);
        assert_eq!(nonces.next_after(1_000), 1_001);
        // clock stepped backwards
        assert_eq!(nonces.next_after(900), 1_002);
    }

    #[test]
    fn test_next_is_decimal_millis() {
        let nonce = NonceGenerator::new().next();
        assert!(nonce.chars().all(|c| c.is_ascii_digit()));
        // 13 digits until the year 2286
        assert_eq!(nonce.len(), 13);
    }

    #[test]
    fn test_strictly_increasing_across_threads() {
        let nonces = Arc::new(NonceGenerator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let nonces = Arc::clone(&nonces);
                std::thread::spawn(move || {
                    (0..250)
                        .map(|_| nonces.next().parse::<i64>().unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut all: Vec<i64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        let issued = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), issued);
    }
}
