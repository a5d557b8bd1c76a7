//! VUSD Console CLI
//!
//! Command-line front end for the lending backend: the user borrow flow
//! (payment + collateral verification) and the admin console endpoints.

use clap::{Parser, Subcommand, ValueEnum};
use std::sync::Arc;

use vusd_console::admin::{AdminClient, CreateTokenRequest, WhitelistAction, WhitelistRequest};
use vusd_console::api::HttpBackend;
use vusd_console::config::Config;
use vusd_console::flow::{BorrowFlow, FlowOutcome};
use vusd_console::payment::{PaymentService, StatusRefreshProvider};
use vusd_console::verification::VerificationService;

#[derive(Parser)]
#[command(author, version, about = "Console for the VUSD lending backend", long_about = None)]
struct Cli {
    /// Backend base URL (overrides VUSD_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the borrow flow: payment then collateral verification
    Borrow {
        /// Amount to borrow, in whole currency units
        amount: String,

        /// Wallet address (defaults to the configured wallet)
        #[arg(long)]
        wallet: Option<String>,

        /// Payment method id for server-side confirmation
        #[arg(long, default_value = "")]
        payment_method: String,
    },

    /// Inspect or act on a payment intent
    Payment {
        #[command(subcommand)]
        command: PaymentCommand,
    },

    /// Start collateral verification for a settled payment
    Verify {
        /// Payment intent id the verification correlates to
        intent_id: String,

        /// Borrow amount, in whole currency units
        amount: f64,

        /// Wallet address (defaults to the configured wallet)
        #[arg(long)]
        wallet: Option<String>,
    },

    /// Fetch the collateral snapshot for an address
    Collateral {
        /// Wallet address (defaults to the configured wallet)
        address: Option<String>,
    },

    /// Admin console endpoints (responses rendered verbatim)
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
}

#[derive(Subcommand)]
enum PaymentCommand {
    /// Fetch the current intent snapshot
    Status { intent_id: String },

    /// Capture an authorized intent (at most once, no retry)
    Capture { intent_id: String },

    /// Cancel an intent (at most once, no retry)
    Cancel { intent_id: String },

    /// Poll the intent until it reaches a terminal status
    Watch { intent_id: String },

    /// Re-check an intent created earlier (e.g. after a redirect)
    Resume { intent_id: String },
}

#[derive(Subcommand)]
enum AdminCommand {
    /// Mint a new asset
    TokenCreate {
        #[arg(long)]
        total_units: u64,
        #[arg(long, default_value_t = 2)]
        decimals: u32,
        #[arg(long)]
        asset_name: String,
        #[arg(long)]
        unit_name: String,
        #[arg(long, default_value = "")]
        metadata_url: String,
    },

    /// Freeze a wallet
    Freeze { address: String },

    /// Unfreeze a wallet
    Unfreeze { address: String },

    /// Add or remove addresses from an event whitelist
    Whitelist {
        #[arg(long)]
        event_id: String,
        /// Comma-separated addresses
        #[arg(long, value_delimiter = ',')]
        addresses: Vec<String>,
        #[arg(long, value_enum)]
        action: ActionArg,
    },

    /// Fetch liquidity-pool status
    PoolStatus,

    /// Reissue a token to a user
    Regenerate { user_address: String },
}

#[derive(ValueEnum, Clone, Copy)]
enum ActionArg {
    Add,
    Remove,
}

impl From<ActionArg> for WhitelistAction {
    fn from(action: ActionArg) -> Self {
        match action {
            ActionArg::Add => WhitelistAction::Add,
            ActionArg::Remove => WhitelistAction::Remove,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(api_url) = cli.api_url {
        config.api_base_url = api_url;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Command::Borrow {
            amount,
            wallet,
            payment_method,
        } => {
            let backend = Arc::new(HttpBackend::new(&config));
            let flow = BorrowFlow::new(backend.clone(), &config);
            let provider = StatusRefreshProvider::new(backend);

            let outcome = flow
                .run(&amount, wallet.as_deref(), &payment_method, &provider)
                .await?;

            match outcome {
                FlowOutcome::Completed(report) => {
                    tracing::info!(intent_id = %report.intent_id, "Borrow complete");
                    print_json(&report.verification)?;
                    print_json(&report.collateral)?;
                }
                FlowOutcome::AwaitingUser {
                    intent_id,
                    status,
                    message,
                } => {
                    println!("{}", message);
                    println!(
                        "Intent {} is waiting in status '{}'; resume with `payment resume {}`",
                        intent_id,
                        status.as_str(),
                        intent_id
                    );
                }
            }
        }

        Command::Payment { command } => {
            let backend = Arc::new(HttpBackend::new(&config));
            let service = PaymentService::new(backend, &config);
            run_payment_command(command, &service).await?;
        }

        Command::Verify {
            intent_id,
            amount,
            wallet,
        } => {
            let backend = Arc::new(HttpBackend::new(&config));
            let service = VerificationService::new(backend, &config);
            let wallet = wallet.unwrap_or_else(|| config.default_wallet.clone());

            let report = service.run(&intent_id, &wallet, amount).await?;
            print_json(&report.verification)?;
            print_json(&report.collateral)?;
        }

        Command::Collateral { address } => {
            let backend = HttpBackend::new(&config);
            let address = address.unwrap_or_else(|| config.default_wallet.clone());
            let details =
                vusd_console::api::LendingBackend::collateral_details(&backend, &address).await?;
            print_json(&details)?;
        }

        Command::Admin { command } => {
            let client = AdminClient::new(&config);
            run_admin_command(command, &client).await?;
        }
    }

    Ok(())
}

async fn run_payment_command(
    command: PaymentCommand,
    service: &PaymentService,
) -> anyhow::Result<()> {
    match command {
        PaymentCommand::Status { intent_id } => {
            let status = service.status(&intent_id).await?;
            print_json(&status)?;
        }
        PaymentCommand::Capture { intent_id } => {
            let result = service.capture(&intent_id).await?;
            print_json(&result)?;
            let status = service.status(&intent_id).await?;
            print_json(&status)?;
        }
        PaymentCommand::Cancel { intent_id } => {
            let result = service.cancel(&intent_id).await?;
            print_json(&result)?;
        }
        PaymentCommand::Watch { intent_id } => {
            let poll = service.spawn_status_poll(intent_id);
            tokio::select! {
                result = poll.outcome() => {
                    print_json(&result?)?;
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Watch cancelled");
                }
            }
        }
        PaymentCommand::Resume { intent_id } => {
            let outcome = service.resume(&intent_id).await?;
            tracing::info!(?outcome, "Payment resumed");
            println!("Payment succeeded");
        }
    }
    Ok(())
}

async fn run_admin_command(command: AdminCommand, client: &AdminClient) -> anyhow::Result<()> {
    let result = match command {
        AdminCommand::TokenCreate {
            total_units,
            decimals,
            asset_name,
            unit_name,
            metadata_url,
        } => {
            client
                .create_token(&CreateTokenRequest {
                    total_units,
                    decimals,
                    asset_name,
                    unit_name,
                    metadata_url,
                })
                .await?
        }
        AdminCommand::Freeze { address } => client.freeze_wallet(&address).await?,
        AdminCommand::Unfreeze { address } => client.unfreeze_wallet(&address).await?,
        AdminCommand::Whitelist {
            event_id,
            addresses,
            action,
        } => {
            client
                .manage_whitelist(&WhitelistRequest {
                    event_id,
                    addresses,
                    action: action.into(),
                })
                .await?
        }
        AdminCommand::PoolStatus => client.pool_status().await?,
        AdminCommand::Regenerate { user_address } => {
            client.regenerate_token(&user_address).await?
        }
    };

    print_json(&result)?;
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
