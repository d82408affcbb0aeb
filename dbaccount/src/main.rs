//! MariaDB account tool.
//!
//! Loads an account from a URL or an account file and shows what a client
//! would do with it: the redacted account, the session statements run after
//! connecting, and (with the `mysql` feature) a live connection test. Also
//! exposes the driver option table and the numeric string conversions.
//!
//! # Security Guarantees
//! - Passwords are never printed or logged
//! - URLs are redacted before they reach any log line
//! - Passwords can be taken from the environment or a prompt instead of argv

use clap::{Args, Parser, Subcommand, ValueEnum};
use dbaccount_core::{
    Account, AccountConfig, ConnectOption, DbAccountError, Result,
    account::session::session_statements,
    conversion::{string_cast, try_string_cast},
    error::redact_database_url,
    logging::init_logging,
};
use std::path::PathBuf;
use tracing::{debug, error, info};
use zeroize::Zeroizing;

#[derive(Parser)]
#[command(name = "dbaccount")]
#[command(about = "MariaDB connection account tool")]
#[command(version)]
#[command(long_about = "
dbaccount - Inspect and test MariaDB connection accounts

An account is read from a mysql:// (or mariadb://) URL or from a JSON
account file. Passwords are never printed.

EXAMPLES:
  dbaccount inspect --database-url mysql://app@db.local/shop?sql_mode=ANSI
  dbaccount plan --config account.json
  dbaccount test --config account.json --password-prompt
  dbaccount cast u16 8080
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the account with the password removed
    Inspect(AccountArgs),
    /// Print the statements executed right after connecting
    Plan(AccountArgs),
    /// Connect with the account and run a probe query
    #[cfg(feature = "mysql")]
    Test(AccountArgs),
    /// List the known driver options
    Options(OptionsArgs),
    /// Convert text to a numeric type the way option values are parsed
    Cast(CastArgs),
}

#[derive(Args)]
pub struct AccountArgs {
    /// Account URL
    #[arg(
        long,
        env = "DATABASE_URL",
        help = "Account URL (the password is redacted in logs; --config takes precedence)"
    )]
    pub database_url: Option<String>,

    /// Account file
    #[arg(short, long, help = "JSON account file")]
    pub config: Option<PathBuf>,

    /// Password override
    #[arg(
        long,
        env = "DBACCOUNT_PASSWORD",
        hide_env_values = true,
        help = "Password override (prefer the environment variable)"
    )]
    pub password: Option<String>,

    /// Prompt for the password
    #[arg(long, conflicts_with = "password", help = "Read the password from the terminal")]
    pub password_prompt: bool,
}

#[derive(Args)]
pub struct OptionsArgs {
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CastArgs {
    /// Target type
    #[arg(value_enum)]
    pub target: CastTarget,

    /// Text to convert
    #[arg(allow_hyphen_values = true)]
    pub value: String,

    /// Fail instead of falling back to 0 or NaN
    #[arg(long)]
    pub strict: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CastTarget {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true, help = "Suppress all output except errors")]
    pub quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet)?;

    match &cli.command {
        Command::Inspect(args) => inspect(&load_account(args)?),
        Command::Plan(args) => plan(&load_account(args)?),
        #[cfg(feature = "mysql")]
        Command::Test(args) => test_connection(&load_account(args)?).await,
        Command::Options(args) => list_options(args.json),
        Command::Cast(args) => cast(args),
    }
}

/// Builds the account from a URL or file, then applies any password override.
fn load_account(args: &AccountArgs) -> Result<Account> {
    let account = if let Some(ref path) = args.config {
        info!("Loading account file {}", path.display());
        AccountConfig::load(path)?.into_account()
    } else if let Some(ref url) = args.database_url {
        info!("Parsing account URL {}", redact_database_url(url));
        Account::from_url(url)?
    } else {
        return Err(DbAccountError::configuration(
            "An account is required: pass --database-url or --config",
        ));
    };

    let password = if args.password_prompt {
        Some(Zeroizing::new(rpassword::prompt_password("Password: ").map_err(
            |e| DbAccountError::io("Failed to read password", e),
        )?))
    } else {
        args.password.clone().map(Zeroizing::new)
    };

    let Some(password) = password else {
        return Ok(account);
    };

    debug!("Applying password override");
    let mut config = AccountConfig::from(&account);
    config.password = Some(password);
    Ok(config.into_account())
}

fn inspect(account: &Account) -> Result<()> {
    println!("{}", account);
    println!("URL: {}", account.to_safe_url());
    println!(
        "Password: {}",
        if account.password().is_empty() {
            "(none)"
        } else {
            "****"
        }
    );
    println!("TLS: {}", if account.uses_ssl() { "yes" } else { "no" });
    println!("{}", AccountConfig::from(account).to_json()?);
    Ok(())
}

fn plan(account: &Account) -> Result<()> {
    for statement in session_statements(account)? {
        println!("{};", statement);
    }
    Ok(())
}

#[cfg(feature = "mysql")]
async fn test_connection(account: &Account) -> Result<()> {
    info!("Testing connection to {}", account.to_safe_url());

    dbaccount_core::account::connect::test_connection(account)
        .await
        .map_err(|e| {
            error!("Connection test failed: {}", e);
            e
        })?;

    info!("Connection test successful");
    println!("Connection to {} successful", account);
    Ok(())
}

fn list_options(json: bool) -> Result<()> {
    if json {
        let table: Vec<_> = ConnectOption::ALL
            .iter()
            .map(|option| {
                serde_json::json!({
                    "code": option.code(),
                    "name": option.name(),
                    "description": option.description(),
                })
            })
            .collect();
        let rendered = serde_json::to_string_pretty(&table)
            .map_err(|e| DbAccountError::serialization("Failed to render option table", e))?;
        println!("{}", rendered);
    } else {
        for option in ConnectOption::ALL {
            println!(
                "{:>3}  {:<40}  {}",
                option.code(),
                option.name(),
                option.description()
            );
        }
    }
    Ok(())
}

fn render<T: dbaccount_core::StringCast + ToString>(text: &str, strict: bool) -> Result<String> {
    if !strict {
        return Ok(string_cast::<T>(text).to_string());
    }
    try_string_cast::<T>(text)
        .map(|value| value.to_string())
        .ok_or_else(|| {
            error!("Conversion rejected {:?}", text);
            DbAccountError::configuration(format!(
                "'{}' is not a valid in-range value for the target type",
                text
            ))
        })
}

fn cast(args: &CastArgs) -> Result<()> {
    let text = args.value.as_str();
    let rendered = match args.target {
        CastTarget::I8 => render::<i8>(text, args.strict),
        CastTarget::I16 => render::<i16>(text, args.strict),
        CastTarget::I32 => render::<i32>(text, args.strict),
        CastTarget::I64 => render::<i64>(text, args.strict),
        CastTarget::U8 => render::<u8>(text, args.strict),
        CastTarget::U16 => render::<u16>(text, args.strict),
        CastTarget::U32 => render::<u32>(text, args.strict),
        CastTarget::U64 => render::<u64>(text, args.strict),
        CastTarget::F32 => render::<f32>(text, args.strict),
        CastTarget::F64 => render::<f64>(text, args.strict),
    }?;
    println!("{}", rendered);
    Ok(())
}
