use anyhow::Context;
use clap::Parser;
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use advisor_core::config::Settings;
use advisor_core::domain::attributes::MarketSnapshot;
use advisor_core::domain::contract::RecommendRequest;
use advisor_core::engine::{EngineOptions, Selection, SelectionTier};
use advisor_core::ingest::{
    FileSnapshotProvider, HttpJsonSnapshotProvider, LoadedSnapshot, SnapshotProvider,
};

mod universe;

#[derive(Debug, Parser)]
#[command(name = "advisor_cli", about = "Recommend stocks for a set of investment preferences")]
struct Args {
    /// Snapshot JSON file. Falls back to SNAPSHOT_PATH, then the HTTP data provider.
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Use the built-in demo universe instead of market data.
    #[arg(long, conflicts_with = "snapshot")]
    demo: bool,

    /// low, medium or high.
    #[arg(long)]
    risk: String,

    /// Investment horizon in years.
    #[arg(long)]
    horizon: i64,

    /// growth, dividends or both.
    #[arg(long)]
    goal: String,

    #[arg(long, default_value = "all")]
    sector: String,

    /// large-cap, mid-cap, small-cap or all.
    #[arg(long, default_value = "all")]
    market_cap: String,

    /// Prefer high-dividend stocks (yes/no).
    #[arg(long, default_value = "no")]
    dividend: String,

    #[arg(long)]
    amount: f64,

    /// Print the selection as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

impl Args {
    fn request(&self) -> RecommendRequest {
        RecommendRequest {
            risk_appetite: self.risk.clone(),
            investment_horizon: self.horizon,
            investment_goal: self.goal.clone(),
            sector_preference: self.sector.clone(),
            market_cap_preference: self.market_cap.clone(),
            dividend_preference: self.dividend.clone(),
            investment_amount: self.amount,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    let prefs = args
        .request()
        .validate_and_into_preferences()
        .context("invalid preferences")?;

    let engine = EngineOptions::from_env()?;

    let loaded = match load_snapshot(&args, &settings).await {
        Ok(loaded) => loaded,
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            return Err(err);
        }
    };
    tracing::info!(
        symbols = loaded.snapshot.len(),
        as_of_date = ?loaded.as_of_date,
        "snapshot loaded"
    );

    let selection = engine
        .recommender()
        .recommend_with_trace(&loaded.snapshot, &prefs);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&selection)?);
    } else {
        print!("{}", render_table(&selection, &loaded.snapshot));
    }

    Ok(())
}

async fn load_snapshot(args: &Args, settings: &Settings) -> anyhow::Result<LoadedSnapshot> {
    if args.demo {
        return Ok(LoadedSnapshot {
            as_of_date: None,
            snapshot: universe::demo_snapshot(),
        });
    }

    let provider: Box<dyn SnapshotProvider> = match (&args.snapshot, &settings.snapshot_path) {
        (Some(path), _) => Box::new(FileSnapshotProvider::new(path)),
        (None, Some(path)) => Box::new(FileSnapshotProvider::new(path)),
        (None, None) => Box::new(
            HttpJsonSnapshotProvider::from_settings(settings)
                .context("no --snapshot, SNAPSHOT_PATH or data provider configured (try --demo)")?,
        ),
    };

    tracing::debug!(provider = provider.provider_name(), "fetching snapshot");
    provider.fetch_snapshot().await
}

fn render_table(selection: &Selection, snapshot: &MarketSnapshot) -> String {
    let mut out = String::new();

    let header = match selection.tier {
        SelectionTier::Threshold(t) => format!("Stocks scoring at least {t:.0}"),
        SelectionTier::TopRanked => {
            "No stock met the minimum score; showing the best-ranked stocks".to_string()
        }
        SelectionTier::Empty => {
            let _ = writeln!(out, "No scorable stocks in the snapshot.");
            return out;
        }
    };
    let _ = writeln!(out, "{header} ({} scored)", selection.ranked);
    let _ = writeln!(
        out,
        "{:<16} {:>6} {:>10} {:>10} {:>10} {:>10}  strategy",
        "symbol", "score", "price", "buy", "sell", "stop"
    );

    for rec in &selection.recommendations {
        let price = snapshot
            .get(&rec.symbol)
            .map(|a| a.current_price)
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{:<16} {:>6.1} {:>10.2} {:>10.2} {:>10.2} {:>10.2}  {}",
            rec.symbol,
            rec.suitability_score,
            price,
            rec.buy_target,
            rec.sell_target,
            rec.stop_loss,
            rec.strategy
        );
    }
    out
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::engine::Recommender;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec![
            "advisor_cli",
            "--risk",
            "low",
            "--horizon",
            "7",
            "--goal",
            "dividends",
            "--amount",
            "50000",
        ];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn optional_preferences_default_to_all_and_no() {
        let a = args(&["--demo"]);
        let req = a.request();
        assert_eq!(req.sector_preference, "all");
        assert_eq!(req.market_cap_preference, "all");
        assert_eq!(req.dividend_preference, "no");
        assert!(a.demo);
    }

    #[test]
    fn demo_conflicts_with_snapshot_path() {
        let res = Args::try_parse_from([
            "advisor_cli",
            "--risk",
            "low",
            "--horizon",
            "7",
            "--goal",
            "growth",
            "--amount",
            "100",
            "--demo",
            "--snapshot",
            "s.json",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn table_lists_recommendations_with_strategy() {
        let a = args(&["--demo", "--sector", "technology", "--dividend", "yes"]);
        let prefs = a.request().validate_and_into_preferences().unwrap();
        let snapshot = universe::demo_snapshot();
        let selection = Recommender::default().recommend_with_trace(&snapshot, &prefs);

        let table = render_table(&selection, &snapshot);
        assert!(table.starts_with("Stocks scoring at least 60"));
        assert!(table.contains("TCS.NS"));
        assert!(table.contains("Income generator"));
    }

    #[test]
    fn empty_snapshot_renders_notice() {
        let a = args(&[]);
        let prefs = a.request().validate_and_into_preferences().unwrap();
        let snapshot = MarketSnapshot::new();
        let selection = Recommender::default().recommend_with_trace(&snapshot, &prefs);
        assert_eq!(
            render_table(&selection, &snapshot),
            "No scorable stocks in the snapshot.\n"
        );
    }
}
