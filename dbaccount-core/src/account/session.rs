//! Statements executed right after a connection is opened.
//!
//! The plan is, in order:
//! 1. `SET autocommit = 0|1`
//! 2. the `MYSQL_INIT_COMMAND` driver option, verbatim
//! 3. one `SET SESSION name = value` per named option, in key order
//!
//! Numeric option values (text that parses completely as an integer or a
//! finite float) are sent bare so integer variables such as `wait_timeout`
//! keep their type; everything else is sent as a quoted string literal.

use super::{Account, ConnectOption, OptionArg};
use crate::Result;
use crate::conversion::try_string_cast;
use crate::error::DbAccountError;

/// Maximum length of a MariaDB system variable name.
const MAX_VARIABLE_NAME: usize = 64;

/// Checks that `name` can be interpolated as a session variable name.
fn validate_variable_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > MAX_VARIABLE_NAME {
        return Err(DbAccountError::configuration(format!(
            "Invalid session variable name length: must be 1-{} characters, got {}",
            MAX_VARIABLE_NAME,
            name.len()
        )));
    }

    if !name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
        return Err(DbAccountError::configuration(format!(
            "Session variable name '{}' contains invalid characters",
            name
        )));
    }

    Ok(())
}

/// True when `value` parses completely as an integer or a finite float.
fn is_numeric(value: &str) -> bool {
    try_string_cast::<i64>(value).is_some()
        || try_string_cast::<f64>(value).is_some_and(f64::is_finite)
}

/// Quotes `value` as a single-quoted SQL string literal.
pub fn quote_literal(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len());
    quoted.push('\'');
    for c in value.chars() {
        match c {
            '\'' => quoted.push_str("''"),
            '\\' => quoted.push_str("\\\\"),
            _ => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

/// Renders the `SET SESSION` statement for one named option.
///
/// # Errors
/// Returns a configuration error when `name` is not a plain identifier.
pub fn set_session_statement(name: &str, value: &str) -> Result<String> {
    validate_variable_name(name)?;

    let rendered = if is_numeric(value) {
        value.to_string()
    } else {
        quote_literal(value)
    };

    Ok(format!("SET SESSION {} = {}", name, rendered))
}

/// Builds the statements to run right after connecting with `account`.
///
/// # Errors
/// Returns a configuration error for invalid option names or a non-string
/// `MYSQL_INIT_COMMAND`.
pub fn session_statements(account: &Account) -> Result<Vec<String>> {
    let mut statements = Vec::with_capacity(account.options().len().saturating_add(2));

    statements.push(format!(
        "SET autocommit = {}",
        u8::from(account.auto_commit())
    ));

    match account.connect_option(ConnectOption::InitCommand) {
        Some(OptionArg::String(command)) if !command.trim().is_empty() => {
            statements.push(command.clone());
        }
        Some(OptionArg::String(_)) | None => {}
        Some(other) => {
            return Err(DbAccountError::configuration(format!(
                "{} expects a string argument, got {}",
                ConnectOption::InitCommand,
                other.kind()
            )));
        }
    }

    for (name, value) in account.options() {
        statements.push(set_session_statement(name, value)?);
    }

    tracing::debug!(
        "Built {} session statement(s) for {}",
        statements.len(),
        account
    );
    Ok(statements)
}
