//! Request tokens
//!
//! Each dispatched request gets a token from a monotonically increasing
//! counter. A result is applied only when its token is still the latest one
//! issued; anything older is stale and dropped.

/// Identifies one dispatched request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Issues tokens and remembers the latest one
#[derive(Debug, Default)]
pub struct TokenCounter {
    issued: u64,
    outstanding: bool,
}

impl TokenCounter {
    /// Issue a new token, superseding every earlier one
    pub fn issue(&mut self) -> RequestToken {
        self.issued += 1;
        self.outstanding = true;
        RequestToken(self.issued)
    }

    /// Accept a result for `token` if it is the latest outstanding request
    ///
    /// Returns false for stale tokens and for a token that already settled.
    pub fn settle(&mut self, token: RequestToken) -> bool {
        if self.outstanding && token.0 == self.issued {
            self.outstanding = false;
            true
        } else {
            false
        }
    }

    /// Whether the latest issued request has not settled yet
    pub fn is_outstanding(&self) -> bool {
        self.outstanding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_increase() {
        let mut counter = TokenCounter::default();
        let first = counter.issue();
        let second = counter.issue();
        assert!(second > first);
    }

    #[test]
    fn test_only_latest_settles() {
        let mut counter = TokenCounter::default();
        let first = counter.issue();
        let second = counter.issue();

        assert!(!counter.settle(first));
        assert!(counter.is_outstanding());
        assert!(counter.settle(second));
        assert!(!counter.is_outstanding());
    }

    #[test]
    fn test_settles_once() {
        let mut counter = TokenCounter::default();
        let token = counter.issue();
        assert!(counter.settle(token));
        assert!(!counter.settle(token));
    }
}
