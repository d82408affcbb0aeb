//! Typed driver options.
//!
//! `ConnectOption` mirrors the option identifiers understood by the MariaDB
//! client library. `OptionArg` owns the value stored for one of them until
//! the account is turned into driver options at connect time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Value stored for a driver option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionArg {
    /// Boolean flag
    Bool(bool),
    /// Integer argument (timeouts, sizes, protocol numbers)
    Int(i32),
    /// String argument (paths, names, SQL text)
    String(String),
}

impl OptionArg {
    /// Returns the flag if this is a `Bool`.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the integer if this is an `Int`.
    pub const fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::String(_) => "string",
        }
    }
}

impl From<bool> for OptionArg {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for OptionArg {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<String> for OptionArg {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for OptionArg {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl fmt::Display for OptionArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{}", value),
            Self::Int(value) => write!(f, "{}", value),
            Self::String(value) => write!(f, "{}", value),
        }
    }
}

macro_rules! connect_options {
    ($($(#[doc = $doc:literal])+ $variant:ident = $code:literal => $name:literal,)*) => {
        /// Driver option identifiers of the MariaDB client library.
        ///
        /// Discriminants match the numeric values of `enum mysql_option`.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u32)]
        pub enum ConnectOption {
            $($(#[doc = $doc])+ $variant = $code,)*
        }

        impl ConnectOption {
            /// Every option, in code order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)*];

            /// Canonical client-library name, e.g. `MYSQL_OPT_CONNECT_TIMEOUT`.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }

            /// One-line description with the expected argument type.
            pub fn description(self) -> &'static str {
                match self {
                    $(Self::$variant => concat!($($doc),+).trim(),)*
                }
            }

            /// Numeric identifier used by the client library.
            pub const fn code(self) -> u32 {
                self as u32
            }

            /// Looks an option up by its numeric identifier.
            pub const fn from_code(code: u32) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

connect_options! {
    /// Connect timeout in seconds (int)
    ConnectTimeout = 0 => "MYSQL_OPT_CONNECT_TIMEOUT",
    /// Use the compressed protocol (bool)
    Compress = 1 => "MYSQL_OPT_COMPRESS",
    /// Use named pipes on Windows (bool)
    NamedPipe = 2 => "MYSQL_OPT_NAMED_PIPE",
    /// Statement executed right after connecting (string)
    InitCommand = 3 => "MYSQL_INIT_COMMAND",
    /// Option file to read (string)
    ReadDefaultFile = 4 => "MYSQL_READ_DEFAULT_FILE",
    /// Option file group to read (string)
    ReadDefaultGroup = 5 => "MYSQL_READ_DEFAULT_GROUP",
    /// Directory holding character set files (string)
    SetCharsetDir = 6 => "MYSQL_SET_CHARSET_DIR",
    /// Connection character set (string)
    SetCharsetName = 7 => "MYSQL_SET_CHARSET_NAME",
    /// Allow `LOAD DATA LOCAL INFILE` (bool)
    LocalInfile = 8 => "MYSQL_OPT_LOCAL_INFILE",
    /// Transport protocol (int)
    Protocol = 9 => "MYSQL_OPT_PROTOCOL",
    /// Shared memory base name on Windows (string)
    SharedMemoryBaseName = 10 => "MYSQL_SHARED_MEMORY_BASE_NAME",
    /// Read timeout in seconds (int)
    ReadTimeout = 11 => "MYSQL_OPT_READ_TIMEOUT",
    /// Write timeout in seconds (int)
    WriteTimeout = 12 => "MYSQL_OPT_WRITE_TIMEOUT",
    /// Fetch rows unbuffered (unused by the client library)
    UseResult = 13 => "MYSQL_OPT_USE_RESULT",
    /// Force a remote connection in embedded builds (no argument)
    UseRemoteConnection = 14 => "MYSQL_OPT_USE_REMOTE_CONNECTION",
    /// Force the embedded server in embedded builds (no argument)
    UseEmbeddedConnection = 15 => "MYSQL_OPT_USE_EMBEDDED_CONNECTION",
    /// Let embedded builds choose between remote and embedded (no argument)
    GuessConnection = 16 => "MYSQL_OPT_GUESS_CONNECTION",
    /// Client IP reported to an embedded server (string)
    SetClientIp = 17 => "MYSQL_SET_CLIENT_IP",
    /// Refuse the pre-4.1 password protocol (bool)
    SecureAuth = 18 => "MYSQL_SECURE_AUTH",
    /// Report truncation of fetched data (bool)
    ReportDataTruncation = 19 => "MYSQL_REPORT_DATA_TRUNCATION",
    /// Reconnect automatically after a lost connection (bool)
    Reconnect = 20 => "MYSQL_OPT_RECONNECT",
    /// Verify the server certificate against the host name (bool)
    SslVerifyServerCert = 21 => "MYSQL_OPT_SSL_VERIFY_SERVER_CERT",
    /// Directory for client plugins (string)
    PluginDir = 22 => "MYSQL_PLUGIN_DIR",
    /// Default authentication plugin (string)
    DefaultAuth = 23 => "MYSQL_DEFAULT_AUTH",
    /// Local address to bind before connecting (string)
    Bind = 24 => "MYSQL_OPT_BIND",
    /// Client private key file (string)
    SslKey = 25 => "MYSQL_OPT_SSL_KEY",
    /// Client certificate file (string)
    SslCert = 26 => "MYSQL_OPT_SSL_CERT",
    /// Certificate authority file (string)
    SslCa = 27 => "MYSQL_OPT_SSL_CA",
    /// Directory of certificate authority files (string)
    SslCaPath = 28 => "MYSQL_OPT_SSL_CAPATH",
    /// Allowed TLS cipher list (string)
    SslCipher = 29 => "MYSQL_OPT_SSL_CIPHER",
    /// Certificate revocation list file (string)
    SslCrl = 30 => "MYSQL_OPT_SSL_CRL",
    /// Directory of certificate revocation list files (string)
    SslCrlPath = 31 => "MYSQL_OPT_SSL_CRLPATH",
    /// Clear the connection attributes sent to the server (no argument)
    ConnectAttrReset = 32 => "MYSQL_OPT_CONNECT_ATTR_RESET",
    /// Add a connection attribute (key and value)
    ConnectAttrAdd = 33 => "MYSQL_OPT_CONNECT_ATTR_ADD",
    /// Remove a connection attribute (string)
    ConnectAttrDelete = 34 => "MYSQL_OPT_CONNECT_ATTR_DELETE",
    /// Server RSA public key file (string)
    ServerPublicKey = 35 => "MYSQL_SERVER_PUBLIC_KEY",
    /// Allow the cleartext authentication plugin (bool)
    EnableCleartextPlugin = 36 => "MYSQL_ENABLE_CLEARTEXT_PLUGIN",
    /// Accept a login with an expired password in sandbox mode (bool)
    CanHandleExpiredPasswords = 37 => "MYSQL_OPT_CAN_HANDLE_EXPIRED_PASSWORDS",
    /// Refuse to connect without TLS (bool)
    SslEnforce = 38 => "MYSQL_OPT_SSL_ENFORCE",
    /// Largest packet the client accepts (int)
    MaxAllowedPacket = 39 => "MYSQL_OPT_MAX_ALLOWED_PACKET",
    /// Network buffer length (int)
    NetBufferLength = 40 => "MYSQL_OPT_NET_BUFFER_LENGTH",
    /// Allowed TLS versions, e.g. `TLSv1.2,TLSv1.3` (string)
    TlsVersion = 41 => "MYSQL_OPT_TLS_VERSION",
}

impl fmt::Display for ConnectOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConnectOption {
    type Err = crate::error::DbAccountError;

    /// Accepts the canonical name case-insensitively, with or without the
    /// `MYSQL_` prefix and with `-` in place of `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_").to_ascii_uppercase();
        let prefixed = if wanted.starts_with("MYSQL_") {
            wanted
        } else {
            format!("MYSQL_{}", wanted)
        };

        Self::ALL
            .iter()
            .copied()
            .find(|option| {
                option.name() == prefixed
                    || option.name().replacen("MYSQL_OPT_", "MYSQL_", 1) == prefixed
            })
            .ok_or_else(|| {
                crate::error::DbAccountError::configuration(format!(
                    "Unknown driver option: {}",
                    s
                ))
            })
    }
}

impl Serialize for ConnectOption {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ConnectOption {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
