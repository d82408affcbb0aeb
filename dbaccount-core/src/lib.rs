//! # dbaccount Core Library
//!
//! Stores everything needed to log in to a MariaDB server: host, port or
//! unix socket, user, password, schema, TLS files, transaction and result
//! modes, named session options and typed driver options. Also provides the
//! range-checked numeric conversions used when option values travel as text.
//!
//! # Module Layout
//! - [`account`]: the `Account` value, driver options, URLs, session plan
//! - [`config`]: JSON account files
//! - [`conversion`]: `checked_cast` and `string_cast`
//! - [`error`]: error type and URL redaction
//! - [`logging`]: tracing subscriber setup for binaries
//!
//! # Features
//! - `mysql`: connect through the sqlx MySQL driver
//!
//! # Security
//! - Passwords are zeroized on drop and left out of `Debug`/`Display`
//! - Rendered URLs and error messages never contain the password

pub mod account;
pub mod config;
pub mod conversion;
pub mod error;
pub mod logging;

pub use account::{Account, AccountRef, ConnectOption, DEFAULT_PORT, OptionArg};
pub use config::AccountConfig;
pub use conversion::{StringCast, checked_cast, string_cast, try_checked_cast, try_string_cast};
pub use error::{DbAccountError, Result};
