//! Outbound alert delivery via the Telegram bot API.

use crate::domain::market::Alert;
use crate::domain::ports::AlertTransport;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use std::env;
use tracing::warn;

pub struct TelegramNotifier {
    client: ClientWithMiddleware,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    /// Build from `TELEGRAM_BOT_TOKEN` / `TELEGRAM_CHAT_ID`.
    ///
    /// Missing credentials disable delivery (alerts are still logged by the
    /// scanner) rather than failing the scan.
    pub fn from_env(client: ClientWithMiddleware) -> Option<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN").ok().filter(|v| !v.is_empty());
        let chat_id = env::var("TELEGRAM_CHAT_ID").ok().filter(|v| !v.is_empty());

        match (token, chat_id) {
            (Some(token), Some(chat_id)) => Some(Self {
                client,
                token,
                chat_id,
            }),
            _ => {
                warn!("Telegram credentials not set. Alerts will not be delivered.");
                None
            }
        }
    }

    fn format_message(alert: &Alert) -> String {
        format!(
            "<b>Intraday volatility alert</b>\n\n\
             <b>Ticker:</b> {}\n\
             <b>Z-score:</b> {:.2}\n\
             <b>Price move:</b> {:+.2}%\n\
             <b>Direction:</b> {}\n\
             <b>Time:</b> {}\n\
             <b>Current price:</b> ${:.2}",
            alert.ticker,
            alert.zscore,
            alert.percent_move,
            alert.direction(),
            alert.timestamp.format("%Y-%m-%d %H:%M:%S"),
            alert.current_price
        )
    }
}

#[async_trait]
impl AlertTransport for TelegramNotifier {
    async fn deliver(&self, alert: &Alert) -> Result<()> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.token);
        let payload = serde_json::json!({
            "chat_id": self.chat_id,
            "text": Self::format_message(alert),
            "parse_mode": "HTML",
        });

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .context("Telegram request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("Telegram API returned HTTP {}", response.status());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_message_formatting() {
        let alert = Alert {
            ticker: "NVDA".to_string(),
            zscore: -2.4567,
            percent_move: -3.126,
            current_price: 118.5,
            timestamp: Utc.with_ymd_and_hms(2025, 7, 1, 15, 30, 0).unwrap(),
        };

        let message = TelegramNotifier::format_message(&alert);
        assert!(message.contains("NVDA"));
        assert!(message.contains("-2.46"));
        assert!(message.contains("-3.13%"));
        assert!(message.contains("DOWN"));
        assert!(message.contains("$118.50"));
        assert!(message.contains("2025-07-01 15:30:00"));
    }

    #[test]
    fn test_positive_move_is_signed() {
        let alert = Alert {
            ticker: "TSLA".to_string(),
            zscore: 3.01,
            percent_move: 4.2,
            current_price: 250.0,
            timestamp: Utc::now(),
        };

        let message = TelegramNotifier::format_message(&alert);
        assert!(message.contains("+4.20%"));
        assert!(message.contains("UP"));
    }
}
