//! Heuristic read of a single window record for the dashboard surface.
//!
//! A pure function of one `WindowStats`: categorical risk and consistency
//! labels plus the list of triggered signals. No hidden state.

use crate::domain::market::WindowStats;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConsistencyProfile {
    Inconsistent,
    ModeratelyConsistent,
    Consistent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SignalKind {
    SwingTrading,
    ExtremeMove,
    MeanReversion,
    LowVolatility,
    Momentum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SignalStrength {
    Moderate,
    Strong,
}

#[derive(Debug, Clone, Serialize)]
pub struct TradingSignal {
    pub kind: SignalKind,
    pub strength: SignalStrength,
    pub note: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InsightReport {
    pub risk: RiskLevel,
    pub consistency: ConsistencyProfile,
    pub signals: Vec<TradingSignal>,
}

/// Classify one window record.
pub fn analyze_window(stats: &WindowStats) -> InsightReport {
    let avg = stats.avg_intraday_range;
    let consistency = stats.consistency_score;
    let days = stats.days_in_window as f64;

    let risk = if avg > 5.0 {
        RiskLevel::VeryHigh
    } else if avg > 3.0 {
        RiskLevel::High
    } else if avg > 1.5 {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    };

    let profile = if consistency > 5.0 {
        ConsistencyProfile::Consistent
    } else if consistency > 2.0 {
        ConsistencyProfile::ModeratelyConsistent
    } else {
        ConsistencyProfile::Inconsistent
    };

    let mut signals = Vec::new();

    if days > 0.0 {
        let swing_share = f64::from(stats.swing_2pct_days) / days;
        if swing_share > 0.5 {
            signals.push(TradingSignal {
                kind: SignalKind::SwingTrading,
                strength: SignalStrength::Strong,
                note: format!(
                    "{}/{} days with >2% swings ({:.1}%)",
                    stats.swing_2pct_days,
                    stats.days_in_window,
                    swing_share * 100.0
                ),
            });
        }

        let extreme_share = f64::from(stats.extreme_move_days) / days;
        if extreme_share > 0.1 {
            signals.push(TradingSignal {
                kind: SignalKind::ExtremeMove,
                strength: SignalStrength::Moderate,
                note: format!(
                    "{} days beyond 2 sigma ({:.1}%)",
                    stats.extreme_move_days,
                    extreme_share * 100.0
                ),
            });
        }
    }

    if consistency > 4.0 && avg > 2.0 {
        signals.push(TradingSignal {
            kind: SignalKind::MeanReversion,
            strength: SignalStrength::Strong,
            note: format!(
                "consistency {:.2} with {:.2}% average range",
                consistency, avg
            ),
        });
    }

    if avg < 1.0 && consistency > 3.0 {
        signals.push(TradingSignal {
            kind: SignalKind::LowVolatility,
            strength: SignalStrength::Moderate,
            note: format!("{:.2}% average range, consistency {:.2}", avg, consistency),
        });
    }

    if days > 0.0 && avg > 4.0 && f64::from(stats.swing_3pct_days) / days > 0.3 {
        signals.push(TradingSignal {
            kind: SignalKind::Momentum,
            strength: SignalStrength::Strong,
            note: format!(
                "{:.2}% average range with {} days over 3%",
                avg, stats.swing_3pct_days
            ),
        });
    }

    InsightReport {
        risk,
        consistency: profile,
        signals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(avg: f64, consistency: f64, swing_2: u32, swing_3: u32, extreme: u32) -> WindowStats {
        WindowStats {
            avg_intraday_range: avg,
            std_intraday_range: 1.0,
            median_intraday_range: avg,
            min_intraday_range: 0.0,
            max_intraday_range: avg * 2.0,
            range_spread: avg * 2.0,
            realized_volatility: 20.0,
            consistency_score: consistency,
            swing_2pct_days: swing_2,
            swing_3pct_days: swing_3,
            extreme_move_days: extreme,
            ultra_extreme_move_days: 0,
            range_p25: avg,
            range_p50: avg,
            range_p75: avg,
            range_p90: avg,
            range_p95: avg,
            range_p99: avg,
            days_in_window: 20,
        }
    }

    #[test]
    fn test_risk_ladder() {
        assert_eq!(analyze_window(&stats(0.8, 1.0, 0, 0, 0)).risk, RiskLevel::Low);
        assert_eq!(
            analyze_window(&stats(2.0, 1.0, 0, 0, 0)).risk,
            RiskLevel::Moderate
        );
        assert_eq!(analyze_window(&stats(4.0, 1.0, 0, 0, 0)).risk, RiskLevel::High);
        assert_eq!(
            analyze_window(&stats(6.5, 1.0, 0, 0, 0)).risk,
            RiskLevel::VeryHigh
        );
    }

    #[test]
    fn test_consistency_profile() {
        assert_eq!(
            analyze_window(&stats(1.0, 6.0, 0, 0, 0)).consistency,
            ConsistencyProfile::Consistent
        );
        assert_eq!(
            analyze_window(&stats(1.0, 3.0, 0, 0, 0)).consistency,
            ConsistencyProfile::ModeratelyConsistent
        );
        assert_eq!(
            analyze_window(&stats(1.0, 0.5, 0, 0, 0)).consistency,
            ConsistencyProfile::Inconsistent
        );
    }

    #[test]
    fn test_swing_signal_requires_majority_of_days() {
        // 11 of 20 days over 2% triggers; 10 of 20 does not.
        let report = analyze_window(&stats(2.5, 1.0, 11, 0, 0));
        assert!(report.signals.iter().any(|s| s.kind == SignalKind::SwingTrading));

        let report = analyze_window(&stats(2.5, 1.0, 10, 0, 0));
        assert!(!report.signals.iter().any(|s| s.kind == SignalKind::SwingTrading));
    }

    #[test]
    fn test_mean_reversion_and_momentum_signals() {
        let report = analyze_window(&stats(2.5, 4.5, 0, 0, 0));
        assert!(report.signals.iter().any(|s| s.kind == SignalKind::MeanReversion));

        let report = analyze_window(&stats(4.5, 1.0, 0, 7, 0));
        assert!(report.signals.iter().any(|s| s.kind == SignalKind::Momentum));
    }

    #[test]
    fn test_quiet_ticker_has_no_signals() {
        let report = analyze_window(&stats(1.2, 1.5, 1, 0, 1));
        assert!(report.signals.is_empty());
    }
}
