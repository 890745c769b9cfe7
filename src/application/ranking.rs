//! Partitioning of per-ticker results and ranking-table construction.

use crate::domain::market::{AnalysisWindow, TickerStats, WindowStats};
use std::collections::HashSet;
use std::fmt;

/// Aggregation categories. A ticker outside the ETF set counts as a stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    All,
    Stocks,
    Etfs,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::All, Category::Stocks, Category::Etfs];

    pub fn label(&self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Stocks => "stocks",
            Category::Etfs => "etfs",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The five ranking criteria, each sorted descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RankingKind {
    HighestAvgRange,
    MostConsistent,
    Most2PctSwings,
    Most3PctSwings,
    MostExtremeMoves,
}

impl RankingKind {
    pub const ALL: [RankingKind; 5] = [
        RankingKind::HighestAvgRange,
        RankingKind::MostConsistent,
        RankingKind::Most2PctSwings,
        RankingKind::Most3PctSwings,
        RankingKind::MostExtremeMoves,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RankingKind::HighestAvgRange => "highest_avg_range",
            RankingKind::MostConsistent => "most_consistent",
            RankingKind::Most2PctSwings => "most_2pct_swings",
            RankingKind::Most3PctSwings => "most_3pct_swings",
            RankingKind::MostExtremeMoves => "most_extreme_moves",
        }
    }

    fn sort_key(&self, stats: &WindowStats) -> f64 {
        match self {
            RankingKind::HighestAvgRange => stats.avg_intraday_range,
            RankingKind::MostConsistent => stats.consistency_score,
            RankingKind::Most2PctSwings => f64::from(stats.swing_2pct_days),
            RankingKind::Most3PctSwings => f64::from(stats.swing_3pct_days),
            RankingKind::MostExtremeMoves => f64::from(stats.extreme_move_days),
        }
    }
}

impl fmt::Display for RankingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Per-ticker results partitioned by category.
#[derive(Debug, Default)]
pub struct Aggregated {
    pub all: Vec<TickerStats>,
    pub stocks: Vec<TickerStats>,
    pub etfs: Vec<TickerStats>,
}

impl Aggregated {
    pub fn category(&self, category: Category) -> &[TickerStats] {
        match category {
            Category::All => &self.all,
            Category::Stocks => &self.stocks,
            Category::Etfs => &self.etfs,
        }
    }
}

/// Partition results by ETF-set membership. Callers drop failed tickers
/// (those with no stats) before this point.
pub fn aggregate(stats: Vec<TickerStats>, etf_set: &HashSet<String>) -> Aggregated {
    let mut aggregated = Aggregated::default();

    for ticker_stats in stats {
        if etf_set.contains(&ticker_stats.ticker) {
            aggregated.etfs.push(ticker_stats.clone());
        } else {
            aggregated.stocks.push(ticker_stats.clone());
        }
        aggregated.all.push(ticker_stats);
    }

    aggregated
}

/// One ranked line: the ticker plus its full window record.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingRow {
    pub ticker: String,
    pub stats: WindowStats,
}

/// A fully ordered ranking for one (category, kind, window) triple.
/// Row order is rank order; regenerated from scratch every run.
#[derive(Debug, Clone)]
pub struct RankingTable {
    pub category: Category,
    pub kind: RankingKind,
    pub window: AnalysisWindow,
    pub rows: Vec<RankingRow>,
}

/// Build all ranking tables for one window.
///
/// Only tickers with a defined record for the window participate. Sorting is
/// stable, so ties preserve the input iteration order. Empty tables are
/// omitted.
pub fn rank(aggregated: &Aggregated, window: AnalysisWindow) -> Vec<RankingTable> {
    let mut tables = Vec::new();

    for category in Category::ALL {
        let members = aggregated.category(category);

        for kind in RankingKind::ALL {
            let mut rows: Vec<RankingRow> = members
                .iter()
                .filter_map(|ticker_stats| {
                    ticker_stats.window(window).map(|stats| RankingRow {
                        ticker: ticker_stats.ticker.clone(),
                        stats: stats.clone(),
                    })
                })
                .collect();

            // The engine sanitizes scores, but a non-finite consistency value
            // must never reach a sort, so it is filtered here as well.
            if kind == RankingKind::MostConsistent {
                rows.retain(|row| row.stats.consistency_score.is_finite());
            }

            rows.sort_by(|a, b| {
                kind.sort_key(&b.stats).total_cmp(&kind.sort_key(&a.stats))
            });

            if rows.is_empty() {
                continue;
            }

            tables.push(RankingTable {
                category,
                kind,
                window,
                rows,
            });
        }
    }

    tables
}
