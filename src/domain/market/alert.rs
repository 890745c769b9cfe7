use chrono::{DateTime, Utc};

/// A live volatility alert awaiting delivery.
///
/// Not persisted; the scanner keeps only an in-memory cooldown ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub ticker: String,
    pub zscore: f64,
    /// Signed close-over-close move of the most recent bar, in percent.
    pub percent_move: f64,
    pub current_price: f64,
    pub timestamp: DateTime<Utc>,
}

impl Alert {
    pub fn direction(&self) -> &'static str {
        if self.percent_move >= 0.0 { "UP" } else { "DOWN" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_follows_move_sign() {
        let mut alert = Alert {
            ticker: "NVDA".to_string(),
            zscore: 2.4,
            percent_move: 1.8,
            current_price: 131.2,
            timestamp: Utc::now(),
        };
        assert_eq!(alert.direction(), "UP");

        alert.percent_move = -2.1;
        assert_eq!(alert.direction(), "DOWN");
    }
}
