//! Account files.
//!
//! An account can be kept as JSON:
//!
//! ```json
//! {
//!   "host": "db.local",
//!   "user": "app",
//!   "schema": "shop",
//!   "ssl": { "ca": "/etc/mysql/ca.pem" },
//!   "auto_commit": false,
//!   "options": { "sql_mode": "ANSI" },
//!   "connect_options": { "MYSQL_OPT_CONNECT_TIMEOUT": 5 }
//! }
//! ```
//!
//! The password may be present when reading but is never written back out.

use crate::Result;
use crate::account::{Account, ConnectOption, DEFAULT_PORT, OptionArg};
use crate::error::DbAccountError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use zeroize::Zeroizing;

const fn default_port() -> u16 {
    DEFAULT_PORT
}

const fn default_true() -> bool {
    true
}

/// TLS file settings of an account file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SslConfig {
    /// Client key file
    #[serde(skip_serializing_if = "String::is_empty")]
    pub key: String,
    /// Client certificate file
    #[serde(skip_serializing_if = "String::is_empty")]
    pub certificate: String,
    /// Certificate authority file
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ca: String,
    /// Directory of certificate authority files
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ca_path: String,
    /// Allowed cipher list
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cipher: String,
}

/// Serializable form of an [`Account`].
#[derive(Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Host to connect to
    pub host: String,
    /// User to log in with
    #[serde(default)]
    pub user: String,
    /// Password; read from files, never written
    #[serde(default, skip_serializing)]
    pub password: Option<Zeroizing<String>>,
    /// Database selected on connect
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub schema: String,
    /// Port of the host
    #[serde(default = "default_port")]
    pub port: u16,
    /// Unix socket path
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub unix_socket: String,
    /// TLS files
    #[serde(default)]
    pub ssl: SslConfig,
    /// Auto-commit mode
    #[serde(default = "default_true")]
    pub auto_commit: bool,
    /// Buffered result mode
    #[serde(default = "default_true")]
    pub store_result: bool,
    /// Named session options
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,
    /// Driver options keyed by name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub connect_options: BTreeMap<ConnectOption, OptionArg>,
}

impl std::fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "****"))
            .field("schema", &self.schema)
            .field("port", &self.port)
            .field("unix_socket", &self.unix_socket)
            .field("ssl", &self.ssl)
            .field("auto_commit", &self.auto_commit)
            .field("store_result", &self.store_result)
            .field("options", &self.options)
            .field("connect_options", &self.connect_options)
            .finish()
    }
}

impl AccountConfig {
    /// Parses an account file from a JSON string.
    ///
    /// # Errors
    /// Returns a serialization error for malformed JSON or unknown driver
    /// option names.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| DbAccountError::serialization("Failed to parse account file", e))
    }

    /// Reads an account file.
    ///
    /// # Errors
    /// Returns an I/O error when the file cannot be read and a serialization
    /// error when it is not a valid account file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| DbAccountError::io(format!("Reading {}", path.display()), e))?;
        let config = Self::from_json(&contents)?;
        tracing::debug!("Loaded account file {}", path.display());
        Ok(config)
    }

    /// Renders the account file as pretty JSON, without the password.
    ///
    /// # Errors
    /// Returns a serialization error if rendering fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DbAccountError::serialization("Failed to render account file", e))
    }

    /// Builds the account described by this file.
    pub fn into_account(self) -> Account {
        let password = self
            .password
            .as_ref()
            .map(|password| password.as_str().to_string())
            .unwrap_or_default();

        let mut account = Account::new(self.host, self.user, password)
            .with_schema(self.schema)
            .with_port(self.port)
            .with_unix_socket(self.unix_socket);
        account.set_ssl(
            self.ssl.key,
            self.ssl.certificate,
            self.ssl.ca,
            self.ssl.ca_path,
            self.ssl.cipher,
        );
        account.set_auto_commit(self.auto_commit);
        account.set_store_result(self.store_result);
        for (name, value) in self.options {
            account.set_option(name, value);
        }
        for (option, arg) in self.connect_options {
            account.set_connect_option(option, arg);
        }
        account
    }
}

impl From<&Account> for AccountConfig {
    fn from(account: &Account) -> Self {
        Self {
            host: account.host_name().to_string(),
            user: account.user_name().to_string(),
            password: None,
            schema: account.schema().to_string(),
            port: account.port(),
            unix_socket: account.unix_socket().to_string(),
            ssl: SslConfig {
                key: account.ssl_key().to_string(),
                certificate: account.ssl_certificate().to_string(),
                ca: account.ssl_ca().to_string(),
                ca_path: account.ssl_ca_path().to_string(),
                cipher: account.ssl_cipher().to_string(),
            },
            auto_commit: account.auto_commit(),
            store_result: account.store_result(),
            options: account.options().clone(),
            connect_options: account.connect_options().clone(),
        }
    }
}
