//! Hands an account to the sqlx MySQL driver.
//!
//! # Security Features
//! - The password goes straight from the account into the driver options
//! - Errors and logs only carry the redacted account URL
//! - Connection failures are passed to the account's error handlers

use super::session::session_statements;
use super::{Account, ConnectOption, OptionArg};
use crate::Result;
use crate::error::DbAccountError;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlSslMode};
use sqlx::{ConnectOptions, Executor};
use std::time::Duration;

fn expect_bool(option: ConnectOption, arg: &OptionArg) -> Result<bool> {
    arg.as_bool().ok_or_else(|| {
        DbAccountError::configuration(format!(
            "{} expects a bool argument, got {}",
            option,
            arg.kind()
        ))
    })
}

fn expect_str(option: ConnectOption, arg: &OptionArg) -> Result<&str> {
    arg.as_str().ok_or_else(|| {
        DbAccountError::configuration(format!(
            "{} expects a string argument, got {}",
            option,
            arg.kind()
        ))
    })
}

/// Picks the TLS mode the driver should use for `account`.
///
/// Server certificate verification wins, then an explicit enforce flag or a
/// CA file, then any other TLS setting; an account without TLS settings
/// connects in plain text.
pub fn ssl_mode(account: &Account) -> Result<MySqlSslMode> {
    let flag = |option: ConnectOption| -> Result<bool> {
        account
            .connect_option(option)
            .map_or(Ok(false), |arg| expect_bool(option, arg))
    };

    let has_ca = !account.ssl_ca().is_empty()
        || account.connect_option(ConnectOption::SslCa).is_some();

    let mode = if flag(ConnectOption::SslVerifyServerCert)? {
        MySqlSslMode::VerifyIdentity
    } else if has_ca {
        MySqlSslMode::VerifyCa
    } else if flag(ConnectOption::SslEnforce)? || account.uses_ssl() {
        MySqlSslMode::Required
    } else {
        MySqlSslMode::Disabled
    };

    Ok(mode)
}

/// Connect timeout stored in `MYSQL_OPT_CONNECT_TIMEOUT`, if any.
///
/// `0` means no timeout, as in the client library.
pub fn connect_timeout(account: &Account) -> Result<Option<Duration>> {
    match account.connect_option(ConnectOption::ConnectTimeout) {
        None | Some(OptionArg::Int(0)) => Ok(None),
        Some(OptionArg::Int(seconds)) => u64::try_from(*seconds)
            .map(|seconds| Some(Duration::from_secs(seconds)))
            .map_err(|_| {
                DbAccountError::configuration(format!(
                    "{} must not be negative, got {}",
                    ConnectOption::ConnectTimeout,
                    seconds
                ))
            }),
        Some(other) => Err(DbAccountError::configuration(format!(
            "{} expects an int argument, got {}",
            ConnectOption::ConnectTimeout,
            other.kind()
        ))),
    }
}

impl Account {
    /// Translates the account into sqlx connect options.
    ///
    /// Driver options sqlx has no equivalent for (cipher list, CA directory,
    /// read/write timeouts, ...) are skipped with a warning. Options handled
    /// elsewhere (`MYSQL_OPT_CONNECT_TIMEOUT`, `MYSQL_INIT_COMMAND`) are
    /// skipped silently.
    ///
    /// # Errors
    /// Returns a configuration error when a driver option holds the wrong
    /// argument type.
    pub fn to_connect_options(&self) -> Result<MySqlConnectOptions> {
        let mut options = MySqlConnectOptions::new()
            .host(self.host_name())
            .port(self.port())
            .username(self.user_name())
            .ssl_mode(ssl_mode(self)?);

        if !self.password().is_empty() {
            options = options.password(self.password());
        }
        if !self.schema().is_empty() {
            options = options.database(self.schema());
        }
        if !self.unix_socket().is_empty() {
            options = options.socket(self.unix_socket());
        }
        if !self.ssl_ca().is_empty() {
            options = options.ssl_ca(self.ssl_ca());
        }
        if !self.ssl_certificate().is_empty() {
            options = options.ssl_client_cert(self.ssl_certificate());
        }
        if !self.ssl_key().is_empty() {
            options = options.ssl_client_key(self.ssl_key());
        }
        if !self.ssl_ca_path().is_empty() {
            tracing::warn!("CA directory is not supported by the driver, ignoring it");
        }
        if !self.ssl_cipher().is_empty() {
            tracing::warn!("Cipher list is not supported by the driver, ignoring it");
        }

        for (option, arg) in self.connect_options() {
            options = match option {
                ConnectOption::SetCharsetName => options.charset(expect_str(*option, arg)?),
                ConnectOption::EnableCleartextPlugin => {
                    options.enable_cleartext_plugin(expect_bool(*option, arg)?)
                }
                ConnectOption::SslCa => options.ssl_ca(expect_str(*option, arg)?),
                ConnectOption::SslCert => options.ssl_client_cert(expect_str(*option, arg)?),
                ConnectOption::SslKey => options.ssl_client_key(expect_str(*option, arg)?),
                ConnectOption::ConnectTimeout
                | ConnectOption::InitCommand
                | ConnectOption::SslVerifyServerCert
                | ConnectOption::SslEnforce => options,
                unsupported => {
                    tracing::warn!(
                        "Driver option {} is not supported by the driver, ignoring it",
                        unsupported
                    );
                    options
                }
            };
            tracing::debug!("Applied driver option {}", option);
        }

        if !self.store_result() {
            tracing::debug!("Unbuffered result mode requested; rows are streamed by the driver");
        }

        Ok(options)
    }
}

/// Opens one connection with the account's values and runs its session plan.
///
/// The account is read once; later changes to it do not affect the returned
/// connection. Any failure is passed to the account's error handlers before
/// it is returned.
///
/// # Errors
/// Returns a configuration error for invalid driver options or session
/// variables, and a connection error when connecting or a session statement
/// fails or the connect timeout elapses.
pub async fn connect(account: &Account) -> Result<MySqlConnection> {
    let result = open(account).await;
    if let Err(ref error) = result {
        account.report_error(error);
    }
    result
}

async fn open(account: &Account) -> Result<MySqlConnection> {
    let options = account.to_connect_options()?;
    let statements = session_statements(account)?;
    let target = account.to_safe_url();

    tracing::info!("Connecting to {}", target);

    let connecting = options.connect();
    let mut connection = match connect_timeout(account)? {
        Some(limit) => tokio::time::timeout(limit, connecting).await.map_err(|e| {
            DbAccountError::connection_failed(format!("Timed out connecting to {}", target), e)
        })?,
        None => connecting.await,
    }
    .map_err(|e| DbAccountError::connection_failed(format!("Failed to connect to {}", target), e))?;

    for statement in &statements {
        connection.execute(statement.as_str()).await.map_err(|e| {
            DbAccountError::connection_failed("Session setup statement failed", e)
        })?;
    }

    tracing::info!(
        "Connected to {} ({} session statement(s))",
        target,
        statements.len()
    );
    Ok(connection)
}

/// Connects with `account` and checks the server answers `SELECT 1`.
///
/// # Errors
/// Same as [`connect`], plus a connection error when the probe query fails.
pub async fn test_connection(account: &Account) -> Result<()> {
    let mut connection = connect(account).await?;

    let probe: i64 = sqlx::query_scalar("SELECT 1")
        .fetch_one(&mut connection)
        .await
        .map_err(|e| {
            let error = DbAccountError::connection_failed("Connectivity probe failed", e);
            account.report_error(&error);
            error
        })?;

    if probe != 1 {
        let error = DbAccountError::configuration("Connectivity probe returned an unexpected value");
        account.report_error(&error);
        return Err(error);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ssl_mode_defaults_to_disabled() {
        let account = Account::new("localhost", "root", "");
        assert!(matches!(ssl_mode(&account).unwrap(), MySqlSslMode::Disabled));
    }

    #[test]
    fn test_ssl_mode_from_tls_fields() {
        let mut account = Account::new("localhost", "root", "");
        account.set_ssl("/k.pem", "/c.pem", "", "", "");
        assert!(matches!(ssl_mode(&account).unwrap(), MySqlSslMode::Required));

        account.set_ssl("", "", "/ca.pem", "", "");
        assert!(matches!(ssl_mode(&account).unwrap(), MySqlSslMode::VerifyCa));

        account.set_connect_option(ConnectOption::SslVerifyServerCert, true);
        assert!(matches!(
            ssl_mode(&account).unwrap(),
            MySqlSslMode::VerifyIdentity
        ));
    }

    #[test]
    fn test_ssl_enforce_requires_tls() {
        let mut account = Account::new("localhost", "root", "");
        account.set_connect_option(ConnectOption::SslEnforce, true);
        assert!(matches!(ssl_mode(&account).unwrap(), MySqlSslMode::Required));

        account.set_connect_option(ConnectOption::SslEnforce, 1);
        assert!(ssl_mode(&account).is_err());
    }

    #[test]
    fn test_connect_timeout() {
        let mut account = Account::new("localhost", "root", "");
        assert_eq!(connect_timeout(&account).unwrap(), None);

        account.set_connect_option(ConnectOption::ConnectTimeout, 5);
        assert_eq!(
            connect_timeout(&account).unwrap(),
            Some(Duration::from_secs(5))
        );

        account.set_connect_option(ConnectOption::ConnectTimeout, 0);
        assert_eq!(connect_timeout(&account).unwrap(), None);

        account.set_connect_option(ConnectOption::ConnectTimeout, -1);
        assert!(connect_timeout(&account).is_err());

        account.set_connect_option(ConnectOption::ConnectTimeout, "5");
        assert!(connect_timeout(&account).is_err());
    }

    #[test]
    fn test_to_connect_options_maps_fields() {
        let mut account = Account::new("db.local", "app", "secret")
            .with_schema("shop")
            .with_port(3307);
        account.set_connect_option(ConnectOption::SetCharsetName, "latin1");
        account.set_connect_option(ConnectOption::Reconnect, true);

        let options = account.to_connect_options().unwrap();
        assert_eq!(options.get_host(), "db.local");
        assert_eq!(options.get_port(), 3307);
        assert_eq!(options.get_username(), "app");
        assert_eq!(options.get_database(), Some("shop"));
        assert_eq!(options.get_charset(), "latin1");
    }

    #[test]
    fn test_to_connect_options_rejects_wrong_argument_type() {
        let mut account = Account::new("localhost", "root", "");
        account.set_connect_option(ConnectOption::SetCharsetName, 8);
        assert!(account.to_connect_options().is_err());
    }

    #[test]
    fn test_snapshot_ignores_later_changes() {
        let mut account = Account::new("first.local", "root", "");
        let options = account.to_connect_options().unwrap();

        account = account.with_port(4000);
        account.set_schema("other");

        assert_eq!(options.get_host(), "first.local");
        assert_eq!(options.get_port(), 3306);
        assert_eq!(options.get_database(), None);
    }
}
