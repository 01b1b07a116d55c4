use crate::config::parse_var;
use crate::domain::attributes::MarketSnapshot;
use crate::domain::preferences::UserPreferences;
use crate::domain::recommendation::{Recommendation, ScoredSymbol};
use crate::engine::guidance::guidance;
use crate::engine::scorer::Scorer;
use serde::{Deserialize, Serialize};

pub const DEFAULT_THRESHOLDS: [f64; 5] = [60.0, 50.0, 40.0, 30.0, 20.0];
pub const DEFAULT_MAX_RESULTS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendOptions {
    /// Score cut-offs tried in order; must be strictly descending.
    pub thresholds: Vec<f64>,
    pub max_results: usize,
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self {
            thresholds: DEFAULT_THRESHOLDS.to_vec(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl RecommendOptions {
    pub fn from_env() -> anyhow::Result<Self> {
        let mut out = Self::default();

        if let Ok(s) = std::env::var("RECOMMEND_THRESHOLDS") {
            if let Some(thresholds) = parse_thresholds(&s)? {
                out.thresholds = thresholds;
            }
        }

        out.max_results = parse_var("RECOMMEND_MAX_RESULTS", out.max_results);

        out.validate()?;
        Ok(out)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.max_results >= 1, "max_results must be >= 1");
        anyhow::ensure!(!self.thresholds.is_empty(), "thresholds must not be empty");
        anyhow::ensure!(
            self.thresholds.iter().all(|t| t.is_finite()),
            "thresholds must be finite (got {:?})",
            self.thresholds
        );
        anyhow::ensure!(
            self.thresholds.windows(2).all(|w| w[0] > w[1]),
            "thresholds must be strictly descending (got {:?})",
            self.thresholds
        );
        Ok(())
    }
}

/// Comma-separated cut-offs. A blank list yields `None` so the defaults stay.
fn parse_thresholds(s: &str) -> anyhow::Result<Option<Vec<f64>>> {
    let mut thresholds = Vec::new();
    for part in s.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let t = part
            .parse::<f64>()
            .map_err(|e| anyhow::anyhow!("RECOMMEND_THRESHOLDS: invalid threshold {part:?}: {e}"))?;
        thresholds.push(t);
    }
    Ok((!thresholds.is_empty()).then_some(thresholds))
}

/// Which step of the relaxation produced the candidate set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tier", content = "threshold", rename_all = "snake_case")]
pub enum SelectionTier {
    /// Every candidate scored at least this much.
    Threshold(f64),
    /// No threshold matched; best-ranked symbols regardless of score.
    TopRanked,
    /// Nothing was scorable.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub tier: SelectionTier,
    /// Number of symbols that were scored.
    pub ranked: usize,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, Default)]
pub struct Recommender {
    scorer: Scorer,
    options: RecommendOptions,
}

impl Recommender {
    pub fn new(scorer: Scorer, options: RecommendOptions) -> Self {
        Self { scorer, options }
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    pub fn recommend(&self, snapshot: &MarketSnapshot, prefs: &UserPreferences) -> Vec<Recommendation> {
        self.recommend_with_trace(snapshot, prefs).recommendations
    }

    pub fn recommend_with_trace(&self, snapshot: &MarketSnapshot, prefs: &UserPreferences) -> Selection {
        let ranked = self.scorer.score_all(snapshot, prefs);
        let (tier, selected) = select(&ranked, &self.options);

        tracing::debug!(
            snapshot_len = snapshot.len(),
            ranked_len = ranked.len(),
            selected_len = selected.len(),
            ?tier,
            "recommendation candidates selected"
        );

        let recommendations = selected
            .iter()
            .filter_map(|scored| {
                let attrs = snapshot.get(&scored.symbol)?;
                let g = guidance(attrs, prefs.risk_appetite, prefs.investment_horizon);
                Some(Recommendation::new(scored, &g))
            })
            .collect();

        Selection {
            tier,
            ranked: ranked.len(),
            recommendations,
        }
    }
}

/// Relax the score cut-off until something qualifies, then cap the count.
///
/// `ranked` must be sorted best first, so each threshold selects a prefix.
fn select<'a>(ranked: &'a [ScoredSymbol], opts: &RecommendOptions) -> (SelectionTier, &'a [ScoredSymbol]) {
    if ranked.is_empty() {
        return (SelectionTier::Empty, ranked);
    }

    for &threshold in &opts.thresholds {
        let qualifying = ranked.iter().take_while(|s| s.score >= threshold).count();
        if qualifying > 0 {
            let n = qualifying.min(opts.max_results);
            return (SelectionTier::Threshold(threshold), &ranked[..n]);
        }
    }

    let n = ranked.len().min(opts.max_results);
    (SelectionTier::TopRanked, &ranked[..n])
}
