// Lineup assistant entry point.
//
// Startup sequence:
// 1. Initialize tracing
// 2. Load config
// 3. Build upstream clients
// 4. Fetch the week's player pool
// 5. Aggregate the odds board for the usable pool
// 6. Request an optimized lineup and map it onto the roster
// 7. Print the board and roster report

use lineup_assistant::config;
use lineup_assistant::odds::aggregate::{BatchAggregator, OddsBoard};
use lineup_assistant::odds::observation::ALL_MARKETS;
use lineup_assistant::odds::provider::OddsApiClient;
use lineup_assistant::odds::sort_key::sort_key;
use lineup_assistant::optimizer::OptimizerClient;
use lineup_assistant::player::Player;
use lineup_assistant::pool::{usable_players, PlayerPoolClient};
use lineup_assistant::roster::state::RosterState;

use anyhow::Context;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("Lineup assistant starting up");

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: contest={}, week {}, ${} salary cap",
        config.contest.name, config.contest.week, config.contest.salary_cap
    );

    let pool_client = PlayerPoolClient::new(config.player_pool.base_url.clone());
    let odds_client = OddsApiClient::new(
        config.odds.base_url.clone(),
        config.credentials.odds_api_key.clone(),
    );
    let optimizer_client = OptimizerClient::new(config.optimizer.base_url.clone());

    let week = config.contest.week;
    let pool = pool_client
        .fetch_week(week)
        .await
        .context("failed to fetch player pool")?;
    let usable = usable_players(&pool);
    info!(
        "Player pool loaded: {} players ({} usable)",
        pool.len(),
        usable.len()
    );

    let aggregator = BatchAggregator::new(
        odds_client,
        config.book_preference(),
        config.odds_timeout(),
    );
    let player_ids: Vec<String> = usable.iter().map(|p| p.player_id.clone()).collect();
    let board = aggregator.aggregate(week, &player_ids, &ALL_MARKETS).await;
    info!("Odds board assembled: {} resolved lines", board.len());

    print_board_report(&usable, &board);

    // The optimizer is optional for a board-only session; degrade gracefully.
    match optimizer_client.optimize(week, config.contest.salary_cap).await {
        Ok(lineup) => {
            let mut roster = RosterState::new();
            let placed = roster.apply_lineup(&lineup);
            info!("Optimizer lineup applied: {} players placed", placed);
            print_roster_report(&roster, config.contest.salary_cap);
        }
        Err(e) => {
            warn!("Optimizer unavailable, skipping roster construction: {e}");
        }
    }

    info!("Lineup assistant finished");
    Ok(())
}

/// Print each market's top players by composite sort key; absent lines
/// render as an explicit marker, never as zero.
fn print_board_report(players: &[&Player], board: &OddsBoard) {
    for market in ALL_MARKETS {
        let mut rows: Vec<&&Player> = players.iter().collect();
        rows.sort_by(|a, b| {
            let ka = board
                .get(&a.player_id, market)
                .map(|l| l.sort_key())
                .unwrap_or_else(|| sort_key(None, None));
            let kb = board
                .get(&b.player_id, market)
                .map(|l| l.sort_key())
                .unwrap_or_else(|| sort_key(None, None));
            kb.partial_cmp(&ka).unwrap_or(std::cmp::Ordering::Equal)
        });

        println!("\n== {} ==", market.label());
        for player in rows.iter().take(10) {
            match board.get(&player.player_id, market) {
                Some(line) => println!(
                    "  {:<24} {:>7.1} {:>8} {:>12} (tier {})",
                    player.name,
                    line.point,
                    line.price.map_or_else(|| "--".to_string(), |p| format!("{p:+.0}")),
                    line.bookmaker,
                    line.source_rank.tier(),
                ),
                None => println!("  {:<24} {:>7} {:>8}", player.name, "--", "no data"),
            }
        }
    }
}

fn print_roster_report(roster: &RosterState, cap: u32) {
    println!("\n== Roster ==");
    for slot in roster.slots() {
        match &slot.player {
            Some(p) => println!(
                "  {:<5} {:<24} ${:<6} {:>5.1} pts",
                slot.id, p.name, p.salary, p.projected_points
            ),
            None => println!("  {:<5} (empty)", slot.id),
        }
    }

    let summary = roster.summary(cap);
    println!(
        "  total ${} / ${}  projected {:.1}  complete: {}  over cap: {}",
        summary.total_salary, cap, summary.total_projected_points,
        summary.is_complete, summary.is_over_cap
    );
}

/// Initialize tracing to stderr so stdout stays clean for the report.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("lineup_assistant=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
