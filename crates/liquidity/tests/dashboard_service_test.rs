//! End-to-end behavior of the dashboard service over a scripted transport.

mod common;

use std::time::Duration;

use rust_decimal_macros::dec;
use serde_json::json;

use common::{
    notifications_body, provider_info_body, service, transactions_body, FakeAuth,
    ScriptedTransport, ADDRESS,
};
use stablepay_liquidity::api::HttpMethod::{Get, Post, Put};
use stablepay_liquidity::cache::QueryKey;
use stablepay_liquidity::constants::endpoints;
use stablepay_liquidity::errors::{Error, ValidationError};
use stablepay_liquidity::provider::DepositCheckOutcome;
use stablepay_liquidity::settings::{SettingsToggle, UserSettings};
use stablepay_liquidity::transactions::TransactionFilter;
use stablepay_liquidity::withdrawals::WithdrawalForm;
use stablepay_liquidity::DashboardServiceTrait;

// =============================================================================
// Sessions
// =============================================================================

#[tokio::test]
async fn signed_out_queries_send_nothing() {
    let transport = ScriptedTransport::new();
    transport.respond(Get, endpoints::PROVIDER_INFO, 200, provider_info_body(100.0, true, 0));
    let dashboard = service(transport.clone(), FakeAuth::signed_out());

    assert_eq!(dashboard.provider_info().await, Err(Error::NotAuthenticated));
    assert_eq!(dashboard.transactions().await, Err(Error::NotAuthenticated));
    assert_eq!(dashboard.earnings().await, Err(Error::NotAuthenticated));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn missing_token_sends_nothing() {
    let transport = ScriptedTransport::new();
    let dashboard = service(transport.clone(), FakeAuth::without_token());

    assert_eq!(dashboard.provider_info().await, Err(Error::MissingToken));
    assert_eq!(dashboard.notifications().await, Err(Error::MissingToken));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn pool_stats_are_public() {
    let transport = ScriptedTransport::new();
    transport.respond(
        Get,
        endpoints::POOL_STATS,
        200,
        json!({ "ok": true, "data": { "total_liquidity": 1000000, "total_providers": 4, "pool_utilization": 65 } }),
    );
    let dashboard = service(transport.clone(), FakeAuth::signed_out());

    let stats = dashboard.pool_stats().await.unwrap();
    assert_eq!(stats.total_providers, 4);
    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].bearer_token, None);
}

#[tokio::test]
async fn every_protected_call_carries_a_token() {
    let transport = ScriptedTransport::new();
    transport.respond(Get, endpoints::PROVIDER_INFO, 200, provider_info_body(100.0, true, 0));
    transport.respond(Get, endpoints::TRANSACTIONS, 200, transactions_body());
    let dashboard = service(transport.clone(), FakeAuth::signed_in());

    dashboard.provider_info().await.unwrap();
    dashboard.transactions().await.unwrap();
    for request in transport.requests() {
        assert_eq!(request.bearer_token.as_deref(), Some("test-token"));
    }
}

#[tokio::test]
async fn unauthorized_invokes_sign_in_hook() {
    let transport = ScriptedTransport::new();
    transport.respond(Get, endpoints::PROVIDER_INFO, 401, json!({ "message": "jwt expired" }));
    let auth = FakeAuth::signed_in();
    let dashboard = service(transport.clone(), auth.clone());

    assert_eq!(dashboard.provider_info().await, Err(Error::Unauthorized));
    assert_eq!(auth.redirects(), 1);
    assert_eq!(transport.count(Get, endpoints::PROVIDER_INFO), 1);
}

// =============================================================================
// Caching and retries
// =============================================================================

#[tokio::test]
async fn fresh_queries_are_served_from_cache() {
    let transport = ScriptedTransport::new();
    transport.respond(Get, endpoints::TRANSACTIONS, 200, transactions_body());
    let dashboard = service(transport.clone(), FakeAuth::signed_in());

    assert_eq!(dashboard.transactions().await.unwrap().len(), 3);
    assert_eq!(
        dashboard
            .filtered_transactions(TransactionFilter::Deposit)
            .await
            .unwrap()
            .len(),
        1
    );
    assert_eq!(transport.count(Get, endpoints::TRANSACTIONS), 1);
}

#[tokio::test]
async fn concurrent_reads_share_one_request() {
    let transport = ScriptedTransport::new();
    transport.respond(Get, endpoints::PROVIDER_INFO, 200, provider_info_body(250.0, true, 0));
    let dashboard = service(transport.clone(), FakeAuth::signed_in());

    let (a, b, c) = tokio::join!(
        dashboard.provider_info(),
        dashboard.provider_info(),
        dashboard.provider_info()
    );
    assert_eq!(a.unwrap().current_balance, dec!(250));
    assert_eq!(b.unwrap().current_balance, dec!(250));
    assert_eq!(c.unwrap().current_balance, dec!(250));
    assert_eq!(transport.count(Get, endpoints::PROVIDER_INFO), 1);
}

#[tokio::test]
async fn transient_failures_are_retried() {
    let transport = ScriptedTransport::new();
    transport.respond(Get, endpoints::PROVIDER_INFO, 503, json!({ "message": "busy" }));
    transport.respond(Get, endpoints::PROVIDER_INFO, 200, provider_info_body(75.0, true, 0));
    let dashboard = service(transport.clone(), FakeAuth::signed_in());

    let info = dashboard.provider_info().await.unwrap();
    assert_eq!(info.current_balance, dec!(75));
    assert_eq!(transport.count(Get, endpoints::PROVIDER_INFO), 2);
}

#[tokio::test]
async fn provider_info_error_surfaces_after_retries() {
    let transport = ScriptedTransport::new();
    transport.respond(Get, endpoints::PROVIDER_INFO, 500, json!({ "message": "database down" }));
    let dashboard = service(transport.clone(), FakeAuth::signed_in());

    assert_eq!(
        dashboard.provider_info().await,
        Err(Error::Api {
            status: 500,
            message: "database down".to_string()
        })
    );
    assert_eq!(transport.count(Get, endpoints::PROVIDER_INFO), 3);
    assert!(!dashboard.cache().contains(QueryKey::ProviderInfo));
}

#[tokio::test]
async fn deposit_instructions_retry_once() {
    let transport = ScriptedTransport::new();
    transport.fail(
        Get,
        endpoints::DEPOSIT_INSTRUCTIONS,
        Error::Network("connection reset".to_string()),
    );
    let dashboard = service(transport.clone(), FakeAuth::signed_in());

    assert!(dashboard.deposit_instructions().await.is_err());
    assert_eq!(transport.count(Get, endpoints::DEPOSIT_INSTRUCTIONS), 2);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let transport = ScriptedTransport::new();
    transport.respond(Get, endpoints::PROVIDER_INFO, 404, json!({ "message": "Not a provider" }));
    let dashboard = service(transport.clone(), FakeAuth::signed_in());

    assert!(dashboard.provider_info().await.is_err());
    assert_eq!(transport.count(Get, endpoints::PROVIDER_INFO), 1);
}

// =============================================================================
// Read fallbacks
// =============================================================================

#[tokio::test]
async fn failed_transactions_read_yields_empty_list() {
    let transport = ScriptedTransport::new();
    transport.respond(Get, endpoints::TRANSACTIONS, 500, json!({ "message": "boom" }));
    let dashboard = service(transport.clone(), FakeAuth::signed_in());

    assert_eq!(dashboard.transactions().await, Ok(Vec::new()));
    assert_eq!(transport.count(Get, endpoints::TRANSACTIONS), 3);

    // The fallback is cached like a fetched value.
    assert_eq!(dashboard.transactions().await, Ok(Vec::new()));
    assert_eq!(transport.count(Get, endpoints::TRANSACTIONS), 3);
}

#[tokio::test]
async fn failed_reads_use_hardcoded_defaults() {
    let transport = ScriptedTransport::new();
    transport.respond(Get, endpoints::EARNINGS, 400, json!({ "message": "bad" }));
    transport.respond(Get, endpoints::SETTINGS, 400, json!({ "message": "bad" }));
    transport.respond_raw(Get, endpoints::NOTIFICATIONS, 502, "Bad Gateway");
    let dashboard = service(transport.clone(), FakeAuth::signed_in());

    let earnings = dashboard.earnings().await.unwrap();
    assert!(earnings.is_empty());
    assert_eq!(earnings.current_apy(), dec!(0));

    let settings = dashboard.user_settings().await.unwrap();
    assert_eq!(settings, UserSettings::default());
    assert!(settings.email_notifications);
    assert!(!settings.push_notifications);
    assert_eq!(settings.preferred_currency, "USD");

    assert_eq!(dashboard.unread_notification_count().await, Ok(0));
}

#[tokio::test]
async fn non_array_list_payload_is_empty() {
    let transport = ScriptedTransport::new();
    transport.respond(Get, endpoints::TRANSACTIONS, 200, json!({ "success": true, "data": {} }));
    let dashboard = service(transport.clone(), FakeAuth::signed_in());

    assert_eq!(dashboard.transactions().await, Ok(Vec::new()));
}

// =============================================================================
// Withdrawals
// =============================================================================

#[tokio::test]
async fn invalid_withdrawals_never_reach_the_network() {
    let transport = ScriptedTransport::new();
    transport.respond(Get, endpoints::PROVIDER_INFO, 200, provider_info_body(1000.0, true, 0));
    let dashboard = service(transport.clone(), FakeAuth::signed_in());

    let cases = [
        (WithdrawalForm::new("", ADDRESS), "missing amount"),
        (WithdrawalForm::new("abc", ADDRESS), "unparsable amount"),
        (WithdrawalForm::new("0", ADDRESS), "zero amount"),
        (WithdrawalForm::new("1000.01", ADDRESS), "over balance"),
        (WithdrawalForm::new("10", "0x1234"), "short address"),
        (WithdrawalForm::new("10", "not-an-address"), "no prefix"),
    ];
    for (form, label) in cases {
        let result = dashboard.withdraw(&form).await;
        assert!(
            matches!(result, Err(Error::Validation(_))),
            "{}: {:?}",
            label,
            result
        );
    }
    assert_eq!(transport.count(Post, endpoints::WITHDRAW), 0);
}

#[tokio::test]
async fn locked_provider_cannot_withdraw() {
    let transport = ScriptedTransport::new();
    transport.respond(Get, endpoints::PROVIDER_INFO, 200, provider_info_body(1000.0, false, 4));
    let dashboard = service(transport.clone(), FakeAuth::signed_in());

    let result = dashboard.withdraw(&WithdrawalForm::new("10", ADDRESS)).await;
    assert_eq!(
        result,
        Err(Error::Validation(ValidationError::WithdrawalLocked { days_remaining: 4 }))
    );
    assert_eq!(transport.count(Post, endpoints::WITHDRAW), 0);
}

#[tokio::test]
async fn successful_withdrawal_refreshes_balances() {
    let transport = ScriptedTransport::new();
    transport.respond(Get, endpoints::PROVIDER_INFO, 200, provider_info_body(1000.0, true, 0));
    transport.respond(Get, endpoints::PROVIDER_INFO, 200, provider_info_body(750.0, true, 0));
    transport.respond(Get, endpoints::TRANSACTIONS, 200, transactions_body());
    transport.respond(Get, endpoints::EARNINGS, 200, json!({ "success": true, "data": {} }));
    transport.respond(Get, endpoints::POOL_STATS, 200, json!({ "total_providers": 2 }));
    transport.respond(
        Post,
        endpoints::WITHDRAW,
        200,
        json!({ "success": true, "message": "Withdrawal initiated", "data": { "id": "w-9", "status": "pending" } }),
    );
    let dashboard = service(transport.clone(), FakeAuth::signed_in());

    dashboard.transactions().await.unwrap();
    dashboard.earnings().await.unwrap();
    dashboard.pool_stats().await.unwrap();
    assert!(dashboard.cache().contains(QueryKey::Earnings));

    let receipt = dashboard
        .withdraw(&WithdrawalForm::new("250", ADDRESS))
        .await
        .unwrap();
    assert_eq!(receipt.id.as_deref(), Some("w-9"));
    assert_eq!(receipt.message.as_deref(), Some("Withdrawal initiated"));

    let body = transport
        .requests()
        .into_iter()
        .find(|r| r.method == Post)
        .and_then(|r| r.body)
        .unwrap();
    assert_eq!(body["destination_address"], ADDRESS);
    assert_eq!(body["confirm"], true);

    assert!(!dashboard.cache().contains(QueryKey::ProviderInfo));
    assert!(!dashboard.cache().contains(QueryKey::Transactions));
    assert!(!dashboard.cache().contains(QueryKey::Earnings));
    assert!(dashboard.cache().contains(QueryKey::PoolStats));

    let refreshed = dashboard.provider_info().await.unwrap();
    assert_eq!(refreshed.current_balance, dec!(750));
}

#[tokio::test]
async fn failed_withdrawal_surfaces_server_message() {
    let transport = ScriptedTransport::new();
    transport.respond(Get, endpoints::PROVIDER_INFO, 200, provider_info_body(1000.0, true, 0));
    transport.respond(
        Post,
        endpoints::WITHDRAW,
        400,
        json!({ "success": false, "error": { "message": "Daily withdrawal limit reached" } }),
    );
    let dashboard = service(transport.clone(), FakeAuth::signed_in());

    let err = dashboard
        .withdraw(&WithdrawalForm::new("100", ADDRESS))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        Error::Api {
            status: 400,
            message: "Daily withdrawal limit reached".to_string()
        }
    );
    assert!(dashboard.cache().contains(QueryKey::ProviderInfo));
}

// =============================================================================
// Deposits
// =============================================================================

#[tokio::test]
async fn confirmed_deposit_invalidates_balance_queries() {
    let transport = ScriptedTransport::new();
    transport.respond(Get, endpoints::PROVIDER_INFO, 200, provider_info_body(0.0, false, 7));
    transport.respond(Get, endpoints::TRANSACTIONS, 200, transactions_body());
    transport.respond(Get, endpoints::EARNINGS, 200, json!({ "success": true, "data": {} }));
    transport.respond(Get, endpoints::DEPOSIT_INSTRUCTIONS, 200, json!({ "depositAddress": ADDRESS, "chain": "base", "token": "USDC" }));
    transport.respond(
        Post,
        endpoints::CONFIRM_DEPOSIT,
        200,
        json!({ "success": true, "data": { "depositsDetected": 1, "totalAmountCredited": 500 } }),
    );
    let dashboard = service(transport.clone(), FakeAuth::signed_in());

    dashboard.provider_info().await.unwrap();
    dashboard.transactions().await.unwrap();
    dashboard.earnings().await.unwrap();
    dashboard.deposit_instructions().await.unwrap();
    assert!(dashboard.cache().contains(QueryKey::Transactions));

    let outcome = dashboard.confirm_deposit().await.unwrap();
    assert_eq!(
        outcome,
        DepositCheckOutcome::Credited {
            deposits: 1,
            amount: dec!(500)
        }
    );
    assert_eq!(outcome.message(), "Deposit of $500.00 credited successfully!");

    let body = transport
        .requests()
        .into_iter()
        .find(|r| r.method == Post)
        .and_then(|r| r.body)
        .unwrap();
    assert_eq!(body, json!({ "chain": "base", "token": "USDC" }));

    assert!(!dashboard.cache().contains(QueryKey::ProviderInfo));
    assert!(!dashboard.cache().contains(QueryKey::Transactions));
    assert!(!dashboard.cache().contains(QueryKey::Earnings));
    assert!(dashboard.cache().contains(QueryKey::DepositInstructions));

    dashboard.provider_info().await.unwrap();
    assert_eq!(transport.count(Get, endpoints::PROVIDER_INFO), 2);
}

#[tokio::test]
async fn deposit_check_with_nothing_new() {
    let transport = ScriptedTransport::new();
    transport.respond(
        Post,
        endpoints::CONFIRM_DEPOSIT,
        200,
        json!({ "ok": true, "data": { "depositsDetected": 0, "totalAmountCredited": 0 } }),
    );
    let dashboard = service(transport, FakeAuth::signed_in());

    let outcome = dashboard.confirm_deposit().await.unwrap();
    assert_eq!(outcome, DepositCheckOutcome::NothingNew);
    assert!(outcome.message().starts_with("No new deposits detected."));
}

// =============================================================================
// Notifications
// =============================================================================

#[tokio::test]
async fn marking_read_lowers_unread_count() {
    let transport = ScriptedTransport::new();
    transport.respond(Get, endpoints::NOTIFICATIONS, 200, notifications_body());
    transport.respond_raw(Put, &endpoints::notification_read("n1"), 200, "");
    let dashboard = service(transport.clone(), FakeAuth::signed_in());

    assert_eq!(dashboard.unread_notification_count().await, Ok(2));
    dashboard.mark_notification_read("n1").await.unwrap();
    assert_eq!(dashboard.unread_notification_count().await, Ok(1));

    let notifications = dashboard.notifications().await.unwrap();
    assert!(notifications.iter().find(|n| n.id == "n1").unwrap().read);
    assert_eq!(transport.count(Put, "/protected/liquidity/notifications/n1/read"), 1);
    assert_eq!(transport.count(Get, endpoints::NOTIFICATIONS), 1);
}

#[tokio::test]
async fn failed_mark_read_restores_previous_state() {
    let transport = ScriptedTransport::new();
    transport.respond(Get, endpoints::NOTIFICATIONS, 200, notifications_body());
    transport.respond(
        Put,
        &endpoints::notification_read("n2"),
        400,
        json!({ "message": "Notification not found" }),
    );
    let dashboard = service(transport.clone(), FakeAuth::signed_in());

    assert_eq!(dashboard.unread_notification_count().await, Ok(2));
    let err = dashboard.mark_notification_read("n2").await.unwrap_err();
    assert_eq!(
        err,
        Error::Api {
            status: 400,
            message: "Notification not found".to_string()
        }
    );
    assert_eq!(dashboard.unread_notification_count().await, Ok(2));
}

#[tokio::test]
async fn failed_mark_read_keeps_concurrent_success() {
    let transport = ScriptedTransport::new();
    transport.respond(Get, endpoints::NOTIFICATIONS, 200, notifications_body());
    let slow = endpoints::notification_read("n2");
    transport.respond(Put, &slow, 500, json!({ "message": "Storage unavailable" }));
    transport.delay(Put, &slow, Duration::from_millis(50));
    transport.respond_raw(Put, &endpoints::notification_read("n1"), 200, "");
    let dashboard = service(transport.clone(), FakeAuth::signed_in());

    assert_eq!(dashboard.unread_notification_count().await, Ok(2));
    let (failed, succeeded) = tokio::join!(
        dashboard.mark_notification_read("n2"),
        async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            dashboard.mark_notification_read("n1").await
        }
    );
    assert!(failed.is_err());
    assert!(succeeded.is_ok());

    let notifications = dashboard.notifications().await.unwrap();
    assert!(notifications.iter().find(|n| n.id == "n1").unwrap().read);
    assert!(!notifications.iter().find(|n| n.id == "n2").unwrap().read);
    assert_eq!(dashboard.unread_notification_count().await, Ok(1));
    assert_eq!(transport.count(Get, endpoints::NOTIFICATIONS), 1);
}

// =============================================================================
// Settings
// =============================================================================

#[tokio::test]
async fn saved_settings_are_refetched_on_next_read() {
    let transport = ScriptedTransport::new();
    transport.respond(Get, endpoints::SETTINGS, 200, json!({ "success": true, "data": UserSettings::default() }));
    let normalized = UserSettings {
        push_notifications: true,
        preferred_currency: "EUR".to_string(),
        ..UserSettings::default()
    };
    transport.respond(Get, endpoints::SETTINGS, 200, json!({ "success": true, "data": normalized }));
    transport.respond(Put, endpoints::SETTINGS, 200, json!({ "success": true, "message": "Saved" }));
    let dashboard = service(transport.clone(), FakeAuth::signed_in());

    let current = dashboard.user_settings().await.unwrap();
    let next = current.toggled(SettingsToggle::PushNotifications);
    let saved = dashboard.update_settings(next.clone()).await.unwrap();
    assert_eq!(saved, next);

    let put = transport
        .requests()
        .into_iter()
        .find(|r| r.method == Put)
        .unwrap();
    assert_eq!(put.body.unwrap()["push_notifications"], true);

    // The submitted copy is shown until the server's version arrives.
    assert_eq!(
        dashboard.cache().get::<UserSettings>(QueryKey::UserSettings).await,
        Some(next)
    );
    assert!(dashboard.cache().is_stale(QueryKey::UserSettings));

    let refetched = dashboard.user_settings().await.unwrap();
    assert!(refetched.push_notifications);
    assert_eq!(refetched.preferred_currency, "EUR");
    assert_eq!(transport.count(Get, endpoints::SETTINGS), 2);

    dashboard.user_settings().await.unwrap();
    assert_eq!(transport.count(Get, endpoints::SETTINGS), 2);
}

#[tokio::test]
async fn server_echo_wins_over_submitted_settings() {
    let transport = ScriptedTransport::new();
    transport.respond(
        Put,
        endpoints::SETTINGS,
        200,
        json!({ "success": true, "data": { "preferred_currency": "EUR" } }),
    );
    let dashboard = service(transport, FakeAuth::signed_in());

    let saved = dashboard
        .update_settings(UserSettings::default().with_currency("gbp"))
        .await
        .unwrap();
    assert_eq!(saved.preferred_currency, "EUR");
    assert_eq!(
        dashboard
            .cache()
            .get::<UserSettings>(QueryKey::UserSettings)
            .await
            .map(|s| s.preferred_currency),
        Some("EUR".to_string())
    );
}

#[tokio::test]
async fn failed_save_leaves_cache_untouched() {
    let transport = ScriptedTransport::new();
    transport.respond(Get, endpoints::SETTINGS, 200, json!({ "success": true, "data": UserSettings::default() }));
    transport.respond(Put, endpoints::SETTINGS, 500, json!({ "message": "try later" }));
    let dashboard = service(transport, FakeAuth::signed_in());

    dashboard.user_settings().await.unwrap();
    let attempt = UserSettings::default().toggled(SettingsToggle::TwoFactor);
    assert!(dashboard.update_settings(attempt).await.is_err());
    assert_eq!(dashboard.user_settings().await, Ok(UserSettings::default()));
}

// =============================================================================
// Export
// =============================================================================

#[tokio::test]
async fn csv_export_has_header_and_one_row_per_transaction() {
    let transport = ScriptedTransport::new();
    transport.respond(Get, endpoints::TRANSACTIONS, 200, transactions_body());
    let dashboard = service(transport, FakeAuth::signed_in());

    let csv = dashboard
        .export_transactions_csv(TransactionFilter::All)
        .await
        .unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "Date,Type,Amount,Status,Transaction Hash,Description");
    assert!(lines[1].contains("Deposit,500,Completed,0xaaa,USDC deposit"));
    assert!(lines[2].contains("Earning,1.25,Completed,N/A,Daily yield"));
    assert!(lines[3].ends_with("\"Withdrawal, to cold wallet\""));

    let withdrawals = dashboard
        .export_transactions_csv(TransactionFilter::Withdrawal)
        .await
        .unwrap();
    assert_eq!(withdrawals.lines().count(), 2);
}

#[tokio::test]
async fn clearing_the_cache_forces_refetch() {
    let transport = ScriptedTransport::new();
    transport.respond(Get, endpoints::TRANSACTIONS, 200, transactions_body());
    let dashboard = service(transport.clone(), FakeAuth::signed_in());

    dashboard.transactions().await.unwrap();
    dashboard.clear_cache();
    dashboard.transactions().await.unwrap();
    assert_eq!(transport.count(Get, endpoints::TRANSACTIONS), 2);
}
