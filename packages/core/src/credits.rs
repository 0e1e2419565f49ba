//! Remaining quota of the upstream job-search API.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credits {
    pub remaining_credits: i64,
}

impl Credits {
    /// Remaining credits from a billing balance, never negative.
    pub fn from_balance(granted: i64, used: i64) -> Self {
        Self {
            remaining_credits: granted.saturating_sub(used).max(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_is_clamped_at_zero() {
        assert_eq!(Credits::from_balance(100, 40).remaining_credits, 60);
        assert_eq!(Credits::from_balance(10, 40).remaining_credits, 0);
    }

    #[test]
    fn extreme_balances_do_not_overflow() {
        assert_eq!(Credits::from_balance(i64::MAX, -1).remaining_credits, i64::MAX);
        assert_eq!(Credits::from_balance(i64::MIN, 1).remaining_credits, 0);
    }
}
