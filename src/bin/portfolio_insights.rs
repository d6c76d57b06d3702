//! Portfolio Insights CLI
//!
//! Run with:
//! ```bash
//! portfolio-insights --api-url http://localhost:8080 health
//! ```

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use portfolio_insights::dashboard::{load_assets, recent_transactions};
use portfolio_insights::{
    send_message, AlertBoard, AssetOverview, AssetQuery, AssetStatus, AssetTypeCode,
    ChatHistoryStore, Config, DashboardView, InsightsReport, MessageRole, PortfolioClient,
    SettingsUpdate, SortDirection, SortField, TradeRequest,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "portfolio-insights")]
#[command(about = "Portfolio dashboard and health score from the command line")]
struct Cli {
    /// Base URL of the portfolio backend
    #[arg(long, global = true, env = "PORTFOLIO_API_URL")]
    api_url: Option<String>,

    /// Directory for the local chat cache
    #[arg(long, global = true, env = "PORTFOLIO_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Portfolio totals and daily change
    Summary,

    /// List assets
    Assets {
        /// Match symbol, name or sector
        #[arg(short, long)]
        search: Option<String>,

        /// Asset type (STOCK, BOND, CASH, CRYPTO)
        #[arg(short = 't', long = "type")]
        asset_type: Option<String>,

        /// Status (OWNED, WATCHLIST, RESEARCH, SOLD)
        #[arg(long)]
        status: Option<String>,

        /// Sort by symbol, value, gain or quantity
        #[arg(long, default_value = "value")]
        sort: String,

        /// Sort ascending
        #[arg(long)]
        asc: bool,
    },

    /// Value by asset type
    Allocation,

    /// Best positions by percentage return
    Top {
        #[arg(short, default_value = "5")]
        n: usize,
    },

    /// Return by asset type
    Performance,

    /// Portfolio health score and recommendations
    Health,

    /// Transaction history, newest first
    Transactions,

    /// Price alerts
    Alerts,

    /// Market data, ESG rating and news for one symbol
    Asset { symbol: String },

    /// Buy an asset
    Buy {
        symbol: String,
        quantity: f64,
        price: f64,
        /// Trade date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Sell an asset
    Sell {
        symbol: String,
        quantity: f64,
        price: f64,
        /// Trade date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Show or update user settings
    Settings {
        #[arg(long)]
        theme: Option<String>,
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        user_name: Option<String>,
    },

    /// Ask the portfolio assistant
    Chat {
        message: String,
        /// Continue an existing session
        #[arg(long)]
        session: Option<String>,
    },

    /// List cached chat sessions
    Sessions,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env().context("Invalid configuration")?;
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url);
    }
    if let Some(dir) = &cli.data_dir {
        config = config.with_data_dir(dir.clone());
    }

    let client = PortfolioClient::new(&config).context("Failed to build HTTP client")?;
    log::debug!("Using backend at {}", client.base_url());

    match cli.command {
        Commands::Summary => print_summary(&client),
        Commands::Assets {
            search,
            asset_type,
            status,
            sort,
            asc,
        } => {
            let query = build_query(search, asset_type, status, &sort, asc)?;
            print_assets(&client, &query);
        }
        Commands::Allocation => print_allocation(&client),
        Commands::Top { n } => print_top(&client, n),
        Commands::Performance => print_performance(&client),
        Commands::Health => print_health(&client),
        Commands::Transactions => print_transactions(&client),
        Commands::Alerts => print_alerts(&client),
        Commands::Asset { symbol } => print_asset(&client, &symbol),
        Commands::Buy {
            symbol,
            quantity,
            price,
            date,
        } => {
            let trade = TradeRequest::new(&symbol, quantity, price, trade_date(date)?);
            let reply = client
                .buy(&trade)
                .with_context(|| format!("Failed to buy {}", trade.symbol))?;
            println!("Bought {} {} at {:.2}", trade.quantity, trade.symbol, trade.price);
            println!("{}", serde_json::to_string_pretty(&reply)?);
        }
        Commands::Sell {
            symbol,
            quantity,
            price,
            date,
        } => {
            let trade = TradeRequest::new(&symbol, quantity, price, trade_date(date)?);
            let reply = client
                .sell(&trade)
                .with_context(|| format!("Failed to sell {}", trade.symbol))?;
            println!("Sold {} {} at {:.2}", trade.quantity, trade.symbol, trade.price);
            println!("{}", serde_json::to_string_pretty(&reply)?);
        }
        Commands::Settings {
            theme,
            currency,
            user_name,
        } => {
            let update = SettingsUpdate {
                theme,
                currency,
                user_name,
                ..Default::default()
            };
            let settings = if update.is_empty() {
                client.get_user_settings().context("Failed to load settings")?
            } else {
                client
                    .update_user_settings(&update)
                    .context("Failed to update settings")?
            };
            println!("User:     {}", settings.user_name);
            println!("Currency: {}", settings.currency);
            println!("Theme:    {}", settings.theme);
            println!("Wallet:   {:.2}", settings.wallet);
        }
        Commands::Chat { message, session } => {
            let store = ChatHistoryStore::at(config.chat_history_path());
            let session = send_message(&client, &store, session.as_deref(), &message)
                .context("Chat request failed")?;
            if let Some(reply) = session.last_reply() {
                println!("{}", reply.content);
            }
            println!();
            println!("(session {})", session.id);
        }
        Commands::Sessions => {
            let store = ChatHistoryStore::at(config.chat_history_path());
            let sessions = store.load();
            if sessions.is_empty() {
                println!("No cached chat sessions");
            }
            for s in sessions {
                let questions = s
                    .messages
                    .iter()
                    .filter(|m| m.role == MessageRole::User)
                    .count();
                println!(
                    "{:<28} {:<44} {:>3} questions  {}",
                    s.id,
                    s.title,
                    questions,
                    s.updated_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
    }

    Ok(())
}

fn build_query(
    search: Option<String>,
    asset_type: Option<String>,
    status: Option<String>,
    sort: &str,
    asc: bool,
) -> Result<AssetQuery> {
    let asset_type = asset_type
        .map(|t| t.parse::<AssetTypeCode>())
        .transpose()?;
    let status = status.map(|s| s.parse::<AssetStatus>()).transpose()?;
    let sort_field: SortField = sort.parse()?;

    Ok(AssetQuery {
        search,
        asset_type,
        status,
        sort_field,
        direction: if asc {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        },
    })
}

fn trade_date(date: Option<String>) -> Result<NaiveDate> {
    match date {
        Some(d) => NaiveDate::parse_from_str(&d, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", d)),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn print_summary(client: &PortfolioClient) {
    let s = DashboardView::load(client).summary;
    println!("Total value:    {:>14.2}", s.total_value);
    println!("Total invested: {:>14.2}", s.total_invested);
    println!(
        "Gain/loss:      {:>14.2} ({:+.2}%)",
        s.total_gain_loss, s.total_gain_loss_percent
    );
    println!(
        "Daily change:   {:>14.2} ({:+.2}%)",
        s.daily_change, s.daily_change_percent
    );
    println!("Positions:      {:>14}", s.position_count);
}

fn print_assets(client: &PortfolioClient, query: &AssetQuery) {
    let assets = load_assets(client);
    let rows = query.apply(&assets);
    println!(
        "{:<8} {:<24} {:<7} {:<10} {:>10} {:>12} {:>14} {:>9}",
        "SYMBOL", "NAME", "TYPE", "STATUS", "QTY", "PRICE", "VALUE", "GAIN %"
    );
    for a in rows {
        println!(
            "{:<8} {:<24} {:<7} {:<10} {:>10.4} {:>12.2} {:>14.2} {:>+8.2}%",
            a.display_symbol(),
            truncate(&a.name, 24),
            a.asset_type_code(),
            format!("{:?}", a.status).to_uppercase(),
            a.quantity,
            a.current_price(),
            a.total_value(),
            a.gain_loss_percent()
        );
    }
}

fn print_allocation(client: &PortfolioClient) {
    let view = DashboardView::load(client);
    println!("{:<7} {:>14} {:>8} {:>6}", "TYPE", "VALUE", "SHARE", "COUNT");
    for a in &view.allocation {
        println!(
            "{:<7} {:>14.2} {:>7.1}% {:>6}",
            a.asset_type, a.value, a.percentage, a.count
        );
    }
}

fn print_top(client: &PortfolioClient, n: usize) {
    let assets = load_assets(client);
    let positions = portfolio_insights::owned_positions(&assets);
    for (i, p) in portfolio_insights::top_performers(&positions, n).iter().enumerate() {
        println!(
            "{:>2}. {:<8} {:<7} {:>14.2} {:>+8.2}%",
            i + 1,
            p.symbol,
            p.asset_type,
            p.gain_loss,
            p.gain_loss_percent
        );
    }
}

fn print_performance(client: &PortfolioClient) {
    let view = DashboardView::load(client);
    println!(
        "{:<7} {:>14} {:>14} {:>14} {:>9}",
        "TYPE", "VALUE", "INVESTED", "GAIN/LOSS", "RETURN"
    );
    for p in &view.performance_by_type {
        println!(
            "{:<7} {:>14.2} {:>14.2} {:>14.2} {:>+8.2}%",
            p.asset_type, p.value, p.invested, p.gain_loss, p.gain_loss_percent
        );
    }
}

fn print_health(client: &PortfolioClient) {
    let report = InsightsReport::load(client);
    let m = &report.metrics;
    let d = &m.details;

    println!("Health score:    {:>3} ({})", m.health_score, m.grade());
    println!("  Diversification {:>3}", m.diversification_score);
    println!("  Risk            {:>3}", m.risk_score);
    println!("  Performance     {:>3}", m.performance_score);
    println!("  Volatility      {:>3}", m.volatility_score);
    println!();
    println!("Positions:       {}", d.position_count);
    println!("Top holding:     {:.1}%", d.top_holding_percent);
    println!("Return:          {:+.2}%", d.portfolio_return_percent);
    println!("Avg Sharpe:      {}", fmt_opt(d.avg_sharpe, 2, ""));
    println!("Avg volatility:  {}", fmt_opt(d.avg_volatility, 1, "%"));
    println!("Avg drawdown:    {}", fmt_opt(d.avg_max_drawdown, 1, "%"));
    println!("Avg VaR 95:      {}", fmt_opt(d.avg_var95, 2, "%"));
    for (code, value) in &d.asset_type_breakdown {
        println!("  {:<7} {:>14.2}", code, value);
    }
    if !report.missing_risk_data.is_empty() {
        println!("No risk data:    {}", report.missing_risk_data.join(", "));
    }
    println!();
    for tip in &report.recommendations {
        println!("- {}", tip);
    }
}

fn print_transactions(client: &PortfolioClient) {
    for t in recent_transactions(client) {
        println!(
            "{:<19} {:<8} {:<8} {:>10} {:>12} {:>14.2}",
            t.date()
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| t.transaction_date.clone()),
            t.transaction_type.as_str(),
            t.symbol(),
            t.quantity.map(|q| format!("{:.4}", q)).unwrap_or_default(),
            t.price.map(|p| format!("{:.2}", p)).unwrap_or_default(),
            t.total()
        );
    }
}

fn print_alerts(client: &PortfolioClient) {
    let board = AlertBoard::load(client);
    println!(
        "{} alerts, {} active, {} triggered",
        board.alerts.len(),
        board.active_count,
        board.triggered_count
    );
    for a in &board.alerts {
        println!(
            "{:<8} {:<15} {:>12.2} {:<9} {}",
            a.asset_symbol,
            a.alert_type.label(),
            a.threshold_value,
            if a.is_triggered { "TRIGGERED" } else if a.is_active { "active" } else { "off" },
            a.message
        );
    }
}

fn print_asset(client: &PortfolioClient, symbol: &str) {
    let overview = AssetOverview::load(client, symbol);
    println!("{}", overview.symbol);
    if let Some(m) = &overview.market_data {
        if let Some(name) = &m.name {
            println!("  {}", name);
        }
        println!("  Day change: {}", fmt_opt(m.day_change_percent, 2, "%"));
        println!("  P/E:        {}", fmt_opt(m.pe_ratio, 2, ""));
        println!("  Beta:       {}", fmt_opt(m.beta, 2, ""));
    }
    println!("  Last price: {}", fmt_opt(overview.last_price(), 2, ""));
    if let Some(esg) = &overview.esg_rating {
        println!(
            "  ESG:        {} {}",
            fmt_opt(esg.total_score, 1, ""),
            esg.total_grade.as_deref().unwrap_or("")
        );
    }
    if !overview.news.is_empty() {
        println!();
        for n in &overview.news {
            println!("  [{:?}] {}", n.sentiment, n.title);
        }
    }
}

fn fmt_opt(value: Option<f64>, decimals: usize, suffix: &str) -> String {
    match value {
        Some(v) => format!("{:.*}{}", decimals, v, suffix),
        None => "N/A".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max - 1).collect();
        format!("{}~", cut)
    }
}
