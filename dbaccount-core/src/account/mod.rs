//! Account and connection information used when connecting to MariaDB.
//!
//! # Module Structure
//! - `option`: typed driver options (`ConnectOption`, `OptionArg`)
//! - `url`: building an account from a `mysql://` URL and rendering it safely
//! - `session`: statements executed right after a connection is opened
//! - `connect`: translation into sqlx connect options (feature `mysql`)
//!
//! # Ownership
//! Accounts are shared through [`AccountRef`] (`Arc<Account>`). Holders that
//! need to change a shared account go through `Arc::make_mut`, which clones
//! it when other holders exist, so a connection opened from an account never
//! observes later changes.
//!
//! # Security
//! The password is kept in a `Zeroizing` container and is left out of the
//! `Debug` and `Display` output.

pub mod option;
pub mod session;
pub mod url;

#[cfg(feature = "mysql")]
pub mod connect;

#[cfg(test)]
mod tests;

use crate::error::DbAccountError;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use zeroize::Zeroizing;

pub use option::{ConnectOption, OptionArg};

/// Port used when none is given.
pub const DEFAULT_PORT: u16 = 3306;

/// Shared handle to an account.
pub type AccountRef = Arc<Account>;

/// Callback invoked with errors raised while using an account.
pub type ErrorHandler = Arc<dyn Fn(&DbAccountError) + Send + Sync>;

/// Named string options, ordered by key.
pub type OptionMap = BTreeMap<String, String>;

/// Typed driver options, one value per option identifier.
pub type ConnectOptionMap = BTreeMap<ConnectOption, OptionArg>;

/// Stored set of connection parameters and options for one database login.
///
/// Modifying an account after a connection was established from it has no
/// effect on that connection.
///
/// # Example
/// ```rust
/// use dbaccount_core::account::{Account, ConnectOption};
///
/// let mut account = Account::new("db.local", "app", "secret").with_schema("shop");
/// account.set_option("sql_mode", "ANSI");
/// account.set_connect_option(ConnectOption::ConnectTimeout, 5);
///
/// assert_eq!(account.port(), 3306);
/// assert_eq!(account.option("sql_mode"), "ANSI");
/// assert_eq!(account.option("unset"), "");
/// ```
#[derive(Clone)]
pub struct Account {
    host_name: String,
    user_name: String,
    password: Zeroizing<String>,
    schema: String,
    port: u16,
    unix_socket: String,
    ssl_key: String,
    ssl_certificate: String,
    ssl_ca: String,
    ssl_ca_path: String,
    ssl_cipher: String,
    auto_commit: bool,
    store_result: bool,
    options: OptionMap,
    connect_options: ConnectOptionMap,
    error_handlers: Vec<ErrorHandler>,
}

impl Account {
    /// Creates a shared account.
    ///
    /// Nothing is validated. When `unix_socket` is non-empty the client
    /// connects through it and ignores host and port.
    ///
    /// # Arguments
    /// * `host_name` - Host to connect to
    /// * `user_name` - User to log in with
    /// * `password` - Password of the user (may be empty)
    /// * `schema` - Database selected on connect (may be empty)
    /// * `port` - Port of the host, usually [`DEFAULT_PORT`]
    /// * `unix_socket` - Socket path (may be empty)
    pub fn create(
        host_name: impl Into<String>,
        user_name: impl Into<String>,
        password: impl Into<String>,
        schema: impl Into<String>,
        port: u16,
        unix_socket: impl Into<String>,
    ) -> AccountRef {
        Arc::new(
            Self::new(host_name, user_name, password)
                .with_schema(schema)
                .with_port(port)
                .with_unix_socket(unix_socket),
        )
    }

    /// Creates an owned account with the default port and no schema.
    pub fn new(
        host_name: impl Into<String>,
        user_name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host_name: host_name.into(),
            user_name: user_name.into(),
            password: Zeroizing::new(password.into()),
            schema: String::new(),
            port: DEFAULT_PORT,
            unix_socket: String::new(),
            ssl_key: String::new(),
            ssl_certificate: String::new(),
            ssl_ca: String::new(),
            ssl_ca_path: String::new(),
            ssl_cipher: String::new(),
            auto_commit: true,
            store_result: true,
            options: OptionMap::new(),
            connect_options: ConnectOptionMap::new(),
            error_handlers: Vec::new(),
        }
    }

    /// Builder method to set the schema.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    /// Builder method to set the port.
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Builder method to set the unix socket path.
    pub fn with_unix_socket(mut self, unix_socket: impl Into<String>) -> Self {
        self.unix_socket = unix_socket.into();
        self
    }

    /// Wraps the account for shared ownership.
    pub fn into_ref(self) -> AccountRef {
        Arc::new(self)
    }

    /// Name of the host to connect to.
    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    /// User to log in with.
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// Password of the user to log in with.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Unix socket path; host and port are ignored when it is set.
    pub fn unix_socket(&self) -> &str {
        &self.unix_socket
    }

    /// Port to connect to.
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Path to the client key file.
    pub fn ssl_key(&self) -> &str {
        &self.ssl_key
    }

    /// Path to the client certificate file.
    pub fn ssl_certificate(&self) -> &str {
        &self.ssl_certificate
    }

    /// Path to the certificate authority file.
    pub fn ssl_ca(&self) -> &str {
        &self.ssl_ca
    }

    /// Path to a directory of certificate authority files.
    pub fn ssl_ca_path(&self) -> &str {
        &self.ssl_ca_path
    }

    /// List of allowed TLS ciphers.
    pub fn ssl_cipher(&self) -> &str {
        &self.ssl_cipher
    }

    /// Name of the database opened on connect.
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Sets the name of the database opened on connect.
    pub fn set_schema(&mut self, schema: impl Into<String>) {
        self.schema = schema.into();
    }

    /// Replaces all five TLS settings. Files are expected in PEM format.
    ///
    /// # Arguments
    /// * `key` - Path to the key file
    /// * `certificate` - Path to the certificate file
    /// * `ca` - Path to the certificate authority file
    /// * `ca_path` - Path to a directory containing CA files
    /// * `cipher` - List of allowed ciphers
    pub fn set_ssl(
        &mut self,
        key: impl Into<String>,
        certificate: impl Into<String>,
        ca: impl Into<String>,
        ca_path: impl Into<String>,
        cipher: impl Into<String>,
    ) {
        self.ssl_key = key.into();
        self.ssl_certificate = certificate.into();
        self.ssl_ca = ca.into();
        self.ssl_ca_path = ca_path.into();
        self.ssl_cipher = cipher.into();
    }

    /// True when any TLS setting is present.
    pub fn uses_ssl(&self) -> bool {
        [
            &self.ssl_key,
            &self.ssl_certificate,
            &self.ssl_ca,
            &self.ssl_ca_path,
            &self.ssl_cipher,
        ]
        .iter()
        .any(|value| !value.is_empty())
    }

    /// Whether statements are committed automatically. On by default.
    pub const fn auto_commit(&self) -> bool {
        self.auto_commit
    }

    /// Sets the auto-commit mode.
    pub const fn set_auto_commit(&mut self, auto_commit: bool) {
        self.auto_commit = auto_commit;
    }

    /// Whether results are buffered on the client (store) rather than
    /// streamed row by row (use). On by default.
    ///
    /// Streaming keeps the connection busy until the whole result has been
    /// read.
    pub const fn store_result(&self) -> bool {
        self.store_result
    }

    /// Sets the buffered result mode.
    pub const fn set_store_result(&mut self, store_result: bool) {
        self.store_result = store_result;
    }

    /// Value of a named option, or an empty string when it is not set.
    pub fn option(&self, name: &str) -> String {
        self.options.get(name).cloned().unwrap_or_default()
    }

    /// All named options.
    pub const fn options(&self) -> &OptionMap {
        &self.options
    }

    /// Sets a named option, replacing any previous value.
    pub fn set_option(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.options.insert(name.into(), value.into());
    }

    /// Removes all named options.
    pub fn clear_options(&mut self) {
        self.options.clear();
    }

    /// All driver options.
    pub const fn connect_options(&self) -> &ConnectOptionMap {
        &self.connect_options
    }

    /// Value stored for one driver option.
    pub fn connect_option(&self, option: ConnectOption) -> Option<&OptionArg> {
        self.connect_options.get(&option)
    }

    /// Stores a driver option, replacing any previous value for that key.
    ///
    /// The value is not checked against what the option expects; the driver
    /// rejects mismatches at connect time.
    pub fn set_connect_option(&mut self, option: ConnectOption, arg: impl Into<OptionArg>) {
        self.connect_options.insert(option, arg.into());
    }

    /// Removes all driver options.
    pub fn clear_connect_options(&mut self) {
        self.connect_options.clear();
    }

    /// Registers a callback for errors raised while using this account.
    pub fn add_error_handler<F>(&mut self, handler: F)
    where
        F: Fn(&DbAccountError) + Send + Sync + 'static,
    {
        self.error_handlers.push(Arc::new(handler));
    }

    /// Whether any error handler is registered.
    pub fn has_error_handler(&self) -> bool {
        !self.error_handlers.is_empty()
    }

    /// Registered error handlers, in registration order.
    pub fn error_handlers(&self) -> &[ErrorHandler] {
        &self.error_handlers
    }

    /// Passes `error` to every registered handler and returns how many ran.
    pub fn report_error(&self, error: &DbAccountError) -> usize {
        for handler in &self.error_handlers {
            handler(error);
        }
        tracing::debug!(
            "Reported error to {} handler(s) for {}",
            self.error_handlers.len(),
            self
        );
        self.error_handlers.len()
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("host_name", &self.host_name)
            .field("user_name", &self.user_name)
            .field("schema", &self.schema)
            .field("port", &self.port)
            .field("unix_socket", &self.unix_socket)
            .field("ssl_key", &self.ssl_key)
            .field("ssl_certificate", &self.ssl_certificate)
            .field("ssl_ca", &self.ssl_ca)
            .field("ssl_ca_path", &self.ssl_ca_path)
            .field("ssl_cipher", &self.ssl_cipher)
            .field("auto_commit", &self.auto_commit)
            .field("store_result", &self.store_result)
            .field("options", &self.options)
            .field("connect_options", &self.connect_options)
            .field("error_handlers", &self.error_handlers.len())
            // password is intentionally omitted
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unix_socket.is_empty() {
            write!(f, "Account({}:{}", self.host_name, self.port)?;
        } else {
            write!(f, "Account(unix:{}", self.unix_socket)?;
        }
        if !self.schema.is_empty() {
            write!(f, "/{}", self.schema)?;
        }
        // Intentionally omit user and password
        f.write_str(")")
    }
}
