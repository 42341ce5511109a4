//! Warung CLI - the food-ordering app's screens in the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Create an account; the OTP is prompted for when --otp is omitted
//! warung register --name "Sari" --phone 081234567890 --password rahasia123
//!
//! # Sign in and look around
//! warung login --phone 081234567890 --password rahasia123
//! warung home
//! warung stores --open
//! warung menu --search soto
//!
//! # Order two iced teas and a soto, paying online
//! warung order --store 3 --item 12:2 --item "7:1:no celery" --payment qris
//!
//! # Follow up
//! warung orders --detail 42
//! warung orders --cancel 42
//! warung orders --pay 42
//! ```
//!
//! # Commands
//!
//! - `login`, `register`, `verify-otp`, `logout` - Authentication
//! - `home` - Profile, nearby stores and weather picks
//! - `stores`, `menu`, `payment-channels` - Browsing
//! - `order` - Cart and checkout, then the payment page
//! - `payment-status`, `orders` - Order follow-up
//! - `profile`, `vouchers` - Account

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use warung_client::ClientConfig;

mod commands;
mod render;

use commands::{CommandError, Context};

#[derive(Parser)]
#[command(name = "warung")]
#[command(author, version, about = "Order food from Warung stores")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with phone number and password
    Login {
        /// Phone number
        #[arg(short, long)]
        phone: String,

        /// Account password
        #[arg(long)]
        password: String,
    },
    /// Create an account and verify it with the OTP sent by SMS
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Phone number, local (08...) or international (628...)
        #[arg(short, long)]
        phone: String,

        /// Account password
        #[arg(long)]
        password: String,

        /// OTP code; prompted for when omitted
        #[arg(long)]
        otp: Option<String>,
    },
    /// Verify a pending registration
    VerifyOtp {
        /// OTP code
        #[arg(long)]
        otp: String,
    },
    /// Sign out
    Logout,
    /// Show the home feed
    Home,
    /// Browse stores
    Stores {
        /// Only stores that are open now
        #[arg(long, conflicts_with_all = ["search", "id", "nearby"])]
        open: bool,

        /// Search stores by name
        #[arg(short, long, conflicts_with_all = ["id", "nearby"])]
        search: Option<String>,

        /// Show one store
        #[arg(long, conflicts_with = "nearby")]
        id: Option<String>,

        /// Stores near the configured location
        #[arg(long)]
        nearby: bool,
    },
    /// Browse categories and menus
    Menu {
        /// Filter by category ID
        #[arg(short, long)]
        category: Option<String>,

        /// Search menus by name
        #[arg(short, long)]
        search: Option<String>,
    },
    /// List payment channels
    PaymentChannels,
    /// Build a cart and check out
    Order {
        /// Store ID
        #[arg(long)]
        store: String,

        /// Cart line as MENU[:QTY[:NOTES]]; repeat for more items
        #[arg(short, long = "item", required = true)]
        items: Vec<String>,

        /// Payment channel code (default: CASH)
        #[arg(short, long)]
        payment: Option<String>,

        /// Notes for the whole order
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Check a payment by its reference
    PaymentStatus {
        /// Payment reference
        reference: String,
    },
    /// Order history
    Orders {
        /// Show one order with its items
        #[arg(long, conflicts_with_all = ["cancel", "pay"])]
        detail: Option<String>,

        /// Cancel a pending order
        #[arg(long, conflicts_with = "pay")]
        cancel: Option<String>,

        /// Reopen the payment page of an unpaid order
        #[arg(long)]
        pay: Option<String>,
    },
    /// Show the signed-in user's profile
    Profile,
    /// List vouchers
    Vouchers {
        /// Redeem a voucher by ID
        #[arg(long = "use")]
        use_id: Option<String>,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            render::error(&e);
            std::process::exit(1);
        }
    };

    // Sentry goes first so the tracing layer has a client to report to
    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr; stdout is the screen
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warung_client=info,warung_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, config).await {
        if let Some(client_error) = e.client_error() {
            client_error.capture();
        }
        tracing::error!("Command failed: {e}");
        render::error(&e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: ClientConfig) -> Result<(), CommandError> {
    let ctx = Context::new(config);

    match cli.command {
        Commands::Login { phone, password } => {
            commands::auth::login(&ctx, &phone, password.into()).await?;
        }
        Commands::Register {
            name,
            phone,
            password,
            otp,
        } => commands::auth::register(&ctx, &name, &phone, password.into(), otp).await?,
        Commands::VerifyOtp { otp } => commands::auth::verify_otp(&ctx, &otp).await?,
        Commands::Logout => commands::auth::logout(&ctx).await?,
        Commands::Home => commands::home::show(&ctx).await?,
        Commands::Stores {
            open,
            search,
            id,
            nearby,
        } => {
            let view = if let Some(id) = id {
                commands::stores::StoresView::Detail(id)
            } else if let Some(query) = search {
                commands::stores::StoresView::Search(query)
            } else if nearby {
                commands::stores::StoresView::Nearby
            } else if open {
                commands::stores::StoresView::Open
            } else {
                commands::stores::StoresView::All
            };
            commands::stores::show(&ctx, view).await?;
        }
        Commands::Menu { category, search } => {
            commands::menu::show(&ctx, category, search.as_deref()).await?;
        }
        Commands::PaymentChannels => commands::payment::channels(&ctx).await?,
        Commands::Order {
            store,
            items,
            payment,
            notes,
        } => {
            commands::order::place(&ctx, &store, &items, payment.as_deref(), notes).await?;
        }
        Commands::PaymentStatus { reference } => {
            commands::payment::status(&ctx, &reference).await?;
        }
        Commands::Orders { detail, cancel, pay } => {
            if let Some(id) = detail {
                commands::orders::detail(&ctx, &id).await?;
            } else if let Some(id) = cancel {
                commands::orders::cancel(&ctx, &id).await?;
            } else if let Some(id) = pay {
                commands::orders::pay(&ctx, &id).await?;
            } else {
                commands::orders::list(&ctx).await?;
            }
        }
        Commands::Profile => commands::account::profile(&ctx).await?,
        Commands::Vouchers { use_id } => match use_id {
            Some(id) => commands::account::use_voucher(&ctx, &id).await?,
            None => commands::account::vouchers(&ctx).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_order_requires_items() {
        let parsed = Cli::try_parse_from(["warung", "order", "--store", "3"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_orders_actions_conflict() {
        assert!(Cli::try_parse_from(["warung", "orders", "--cancel", "42", "--pay", "42"]).is_err());
        assert!(Cli::try_parse_from(["warung", "orders", "--pay", "42"]).is_ok());
    }

    #[test]
    fn test_stores_flags_conflict() {
        let parsed = Cli::try_parse_from(["warung", "stores", "--open", "--nearby"]);
        assert!(parsed.is_err());
    }
}
