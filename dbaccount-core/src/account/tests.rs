use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn test_create_defaults() {
    let account = Account::create("localhost", "root", "", "", DEFAULT_PORT, "");

    assert_eq!(account.host_name(), "localhost");
    assert_eq!(account.user_name(), "root");
    assert_eq!(account.password(), "");
    assert_eq!(account.schema(), "");
    assert_eq!(account.port(), 3306);
    assert_eq!(account.unix_socket(), "");
    assert!(account.auto_commit());
    assert!(account.store_result());
    assert!(!account.uses_ssl());
    assert!(account.options().is_empty());
    assert!(account.connect_options().is_empty());
    assert!(!account.has_error_handler());
}

#[test]
fn test_create_keeps_values_unvalidated() {
    let account = Account::create("", "", "pw", "shop", 0, "/tmp/mysql.sock");

    assert_eq!(account.host_name(), "");
    assert_eq!(account.port(), 0);
    assert_eq!(account.schema(), "shop");
    assert_eq!(account.unix_socket(), "/tmp/mysql.sock");
}

#[test]
fn test_set_schema() {
    let mut account = Account::new("localhost", "root", "");
    account.set_schema("inventory");
    assert_eq!(account.schema(), "inventory");
}

#[test]
fn test_set_ssl_replaces_all_fields() {
    let mut account = Account::new("localhost", "root", "");
    account.set_ssl("/k.pem", "/c.pem", "/ca.pem", "/cas", "AES256-SHA");

    assert_eq!(account.ssl_key(), "/k.pem");
    assert_eq!(account.ssl_certificate(), "/c.pem");
    assert_eq!(account.ssl_ca(), "/ca.pem");
    assert_eq!(account.ssl_ca_path(), "/cas");
    assert_eq!(account.ssl_cipher(), "AES256-SHA");
    assert!(account.uses_ssl());

    account.set_ssl("", "", "", "", "");
    assert_eq!(account.ssl_key(), "");
    assert!(!account.uses_ssl());

    account.set_ssl("", "", "", "", "AES256-SHA");
    assert!(account.uses_ssl());
}

#[test]
fn test_flags() {
    let mut account = Account::new("localhost", "root", "");

    account.set_auto_commit(false);
    account.set_store_result(false);
    assert!(!account.auto_commit());
    assert!(!account.store_result());

    account.set_auto_commit(true);
    assert!(account.auto_commit());
}

#[test]
fn test_named_options() {
    let mut account = Account::new("localhost", "root", "");
    assert_eq!(account.option("wait_timeout"), "");

    account.set_option("wait_timeout", "600");
    account.set_option("wait_timeout", "900");
    account.set_option("sql_mode", "ANSI");

    assert_eq!(account.option("wait_timeout"), "900");
    assert_eq!(account.options().len(), 2);
    assert_eq!(
        account.options().keys().collect::<Vec<_>>(),
        vec!["sql_mode", "wait_timeout"]
    );

    account.clear_options();
    assert!(account.options().is_empty());
    assert_eq!(account.option("sql_mode"), "");
}

#[test]
fn test_connect_options_last_value_wins() {
    let mut account = Account::new("localhost", "root", "");

    account.set_connect_option(ConnectOption::ConnectTimeout, 5);
    account.set_connect_option(ConnectOption::ConnectTimeout, "10");
    account.set_connect_option(ConnectOption::Reconnect, true);

    assert_eq!(account.connect_options().len(), 2);
    assert_eq!(
        account.connect_option(ConnectOption::ConnectTimeout),
        Some(&OptionArg::String("10".into()))
    );
    assert_eq!(account.connect_option(ConnectOption::Compress), None);

    account.clear_connect_options();
    assert!(account.connect_options().is_empty());
}

#[test]
fn test_error_handlers() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut account = Account::new("localhost", "root", "");

    let error = DbAccountError::configuration("boom");
    assert_eq!(account.report_error(&error), 0);

    for _ in 0..2 {
        let calls = Arc::clone(&calls);
        account.add_error_handler(move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
        });
    }

    assert!(account.has_error_handler());
    assert_eq!(account.error_handlers().len(), 2);
    assert_eq!(account.report_error(&error), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_error_handlers_see_the_error() {
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let mut account = Account::new("localhost", "root", "");
    {
        let seen = Arc::clone(&seen);
        account.add_error_handler(move |error| {
            seen.lock().unwrap().push(error.to_string());
        });
    }

    account.report_error(&DbAccountError::configuration("bad option"));
    assert_eq!(
        seen.lock().unwrap().clone(),
        vec!["Configuration error: bad option".to_string()]
    );
}

#[test]
fn test_shared_account_copy_on_write() {
    let original = Account::create("localhost", "root", "pw", "shop", DEFAULT_PORT, "");
    let held_by_connection = Arc::clone(&original);

    let mut edited = original;
    Arc::make_mut(&mut edited).set_schema("other");
    Arc::make_mut(&mut edited).set_option("sql_mode", "ANSI");

    assert_eq!(held_by_connection.schema(), "shop");
    assert_eq!(held_by_connection.option("sql_mode"), "");
    assert_eq!(edited.schema(), "other");
}

#[test]
fn test_unique_holder_mutates_in_place() {
    let mut account = Account::new("localhost", "root", "").into_ref();
    let before = Arc::as_ptr(&account);

    Arc::make_mut(&mut account).set_auto_commit(false);

    assert_eq!(Arc::as_ptr(&account), before);
    assert!(!account.auto_commit());
}

#[test]
fn test_clone_shares_error_handlers() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut account = Account::new("localhost", "root", "");
    {
        let calls = Arc::clone(&calls);
        account.add_error_handler(move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
        });
    }

    let copy = account.clone();
    copy.report_error(&DbAccountError::configuration("x"));
    account.report_error(&DbAccountError::configuration("y"));

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_debug_and_display_hide_password() {
    let account = Account::new("db.local", "app", "hunter2").with_schema("shop");

    let debug = format!("{:?}", account);
    assert!(debug.contains("db.local"));
    assert!(!debug.contains("hunter2"));

    assert_eq!(account.to_string(), "Account(db.local:3306/shop)");

    let socket = Account::new("", "app", "hunter2").with_unix_socket("/run/mysqld.sock");
    assert_eq!(socket.to_string(), "Account(unix:/run/mysqld.sock)");
}
