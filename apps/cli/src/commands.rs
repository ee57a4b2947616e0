use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::Utc;
use stablepay_liquidity::constants::RECENT_EARNINGS_ROWS;
use stablepay_liquidity::settings::SettingsToggle;
use stablepay_liquidity::transactions::{export_file_name, TransactionFilter};
use stablepay_liquidity::utils::format::{
    format_currency, format_date, format_large_number, format_percentage, truncate_address,
    DateStyle,
};
use stablepay_liquidity::withdrawals::WithdrawalForm;
use stablepay_liquidity::DashboardServiceTrait;

use crate::Command;

pub async fn execute(dashboard: &dyn DashboardServiceTrait, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Overview => overview(dashboard).await,
        Command::PoolStats => pool_stats(dashboard).await,
        Command::DepositInstructions => deposit_instructions(dashboard).await,
        Command::CheckDeposits => {
            let outcome = dashboard.confirm_deposit().await?;
            println!("{}", outcome.message());
            Ok(())
        }
        Command::Withdraw { amount, to, yes } => withdraw(dashboard, &amount, &to, yes).await,
        Command::Transactions { kind, export } => transactions(dashboard, kind, export).await,
        Command::Earnings => earnings(dashboard).await,
        Command::Notifications => notifications(dashboard).await,
        Command::MarkRead { id } => {
            dashboard.mark_notification_read(&id).await?;
            println!("Notification {} marked as read.", id);
            Ok(())
        }
        Command::Settings { toggle, currency } => settings(dashboard, toggle, currency).await,
    }
}

async fn overview(dashboard: &dyn DashboardServiceTrait) -> anyhow::Result<()> {
    let info = dashboard.provider_info().await?;
    println!("Current balance:  {}", format_currency(info.current_balance));
    println!("Total deposited:  {}", format_currency(info.total_deposited));
    println!("Total earnings:   {}", format_currency(info.total_earnings));
    println!("Total withdrawn:  {}", format_currency(info.total_withdrawn));
    if let Some(apy) = info.apy {
        println!("APY:              {}", format_percentage(apy));
    }
    match info.lock_message() {
        Some(message) => println!("{}", message),
        None => println!("Withdrawals are available."),
    }

    // Pool stats are optional here.
    match dashboard.pool_stats().await {
        Ok(stats) => println!(
            "Pool: ${} across {} providers, {} utilized",
            format_large_number(stats.total_liquidity),
            stats.total_providers,
            format_percentage(stats.pool_utilization)
        ),
        Err(e) => log::warn!("[Cli] Pool stats unavailable: {}", e),
    }

    let unread = dashboard.unread_notification_count().await?;
    if unread > 0 {
        println!("{} unread notification(s)", unread);
    }
    Ok(())
}

async fn pool_stats(dashboard: &dyn DashboardServiceTrait) -> anyhow::Result<()> {
    let stats = dashboard.pool_stats().await?;
    println!("Total liquidity:     ${}", format_large_number(stats.total_liquidity));
    println!("Available:           {}", format_currency(stats.available_liquidity()));
    println!("Deployed:            {}", format_currency(stats.deployed_liquidity()));
    println!("Providers:           {}", stats.total_providers);
    println!("Average balance:     {}", format_currency(stats.average_provider_balance()));
    println!("Average APY:         {}", format_percentage(stats.average_apy));
    println!("24h volume:          ${}", format_large_number(stats.total_volume_24h));
    println!("Earnings paid out:   {}", format_currency(stats.total_earnings_distributed));
    println!(
        "Utilization:         {} ({})",
        format_percentage(stats.pool_utilization),
        stats.utilization_level().description()
    );
    if let Some(days) = stats.lock_period_days {
        println!("Lock period:         {} days", days);
    }
    Ok(())
}

async fn deposit_instructions(dashboard: &dyn DashboardServiceTrait) -> anyhow::Result<()> {
    let instructions = dashboard.deposit_instructions().await?;
    println!("Send {} on {} to:", instructions.token, instructions.chain);
    println!("  {}", instructions.deposit_address);
    println!("  {}", dashboard.address_explorer_url(&instructions.deposit_address));
    println!(
        "Minimum deposit: {}  Lock period: {} days",
        format_currency(instructions.minimum_deposit),
        instructions.lock_period_days
    );
    for (step, line) in instructions.instructions.iter().enumerate() {
        println!("{}. {}", step + 1, line);
    }
    if let Some(note) = &instructions.note {
        println!("Note: {}", note);
    }
    println!("Run `stablepay check-deposits` once the transfer is confirmed.");
    Ok(())
}

async fn withdraw(
    dashboard: &dyn DashboardServiceTrait,
    amount: &str,
    to: &str,
    yes: bool,
) -> anyhow::Result<()> {
    let mut form = WithdrawalForm::new(amount, to);
    if amount.eq_ignore_ascii_case("max") {
        let info = dashboard.provider_info().await?;
        form = form.with_max_amount(info.current_balance);
    }

    if !yes && !confirm(&format!(
        "Withdraw {} USDC to {}?",
        form.amount,
        truncate_address(to)
    ))? {
        println!("Withdrawal cancelled.");
        return Ok(());
    }

    let receipt = dashboard.withdraw(&form).await?;
    println!(
        "{}",
        receipt
            .message
            .as_deref()
            .unwrap_or("Withdrawal submitted.")
    );
    if let Some(hash) = receipt.tx_hash.as_deref() {
        println!("{}", dashboard.transaction_explorer_url(hash));
    }
    Ok(())
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

async fn transactions(
    dashboard: &dyn DashboardServiceTrait,
    filter: TransactionFilter,
    export: Option<PathBuf>,
) -> anyhow::Result<()> {
    if let Some(target) = export {
        let csv = dashboard.export_transactions_csv(filter).await?;
        let path = export_path(&target);
        std::fs::write(&path, csv)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Transactions exported to {}", path.display());
        println!("Exported to {}", path.display());
        return Ok(());
    }

    let rows = dashboard.filtered_transactions(filter).await?;
    if rows.is_empty() {
        println!("No transactions yet.");
        return Ok(());
    }
    for tx in rows {
        let hash = tx
            .tx_hash
            .as_deref()
            .map(truncate_address)
            .unwrap_or_default();
        println!(
            "{:<20} {:<10} {:>14} {:<9} {:<15} {}",
            format_date(tx.timestamp, DateStyle::Relative),
            tx.kind.label(),
            format_currency(tx.amount),
            tx.status.label(),
            hash,
            tx.description
        );
    }
    Ok(())
}

/// A directory gets a timestamped file name inside it.
fn export_path(target: &Path) -> PathBuf {
    if target.is_dir() {
        target.join(export_file_name(Utc::now()))
    } else {
        target.to_path_buf()
    }
}

async fn earnings(dashboard: &dyn DashboardServiceTrait) -> anyhow::Result<()> {
    let earnings = dashboard.earnings().await?;
    println!("Total earnings:    {}", format_currency(earnings.total_earnings));
    println!("Average daily:     {}", format_currency(earnings.average_daily));
    println!("Projected annual:  {}", format_currency(earnings.projected_annual));
    println!("Current APY:       {}", format_percentage(earnings.current_apy()));

    if earnings.is_empty() {
        println!("No earnings recorded yet.");
        return Ok(());
    }
    println!();
    for day in earnings.recent(RECENT_EARNINGS_ROWS) {
        println!(
            "{}  {:>12}  {}",
            day.date.format("%b %-d, %Y"),
            format_currency(day.amount),
            format_percentage(day.apy)
        );
    }
    Ok(())
}

async fn notifications(dashboard: &dyn DashboardServiceTrait) -> anyhow::Result<()> {
    let mut items = dashboard.notifications().await?;
    if items.is_empty() {
        println!("No notifications.");
        return Ok(());
    }
    items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    for n in items {
        println!(
            "{} [{}] {} - {} ({})",
            if n.read { " " } else { "*" },
            n.id,
            n.title,
            n.message,
            format_date(n.timestamp, DateStyle::Relative)
        );
    }
    Ok(())
}

async fn settings(
    dashboard: &dyn DashboardServiceTrait,
    toggle: Option<String>,
    currency: Option<String>,
) -> anyhow::Result<()> {
    let mut settings = dashboard.user_settings().await?;
    let changed = toggle.is_some() || currency.is_some();

    if let Some(name) = toggle {
        let Some(flag) = SettingsToggle::from_name(&name) else {
            bail!("Unknown setting '{}'", name);
        };
        settings = settings.toggled(flag);
    }
    if let Some(code) = currency {
        settings = settings.with_currency(&code);
    }
    if changed {
        settings = dashboard.update_settings(settings).await?;
        println!("Settings saved.");
    }

    let on_off = |flag: bool| if flag { "on" } else { "off" };
    println!("Email notifications:  {}", on_off(settings.email_notifications));
    println!("Push notifications:   {}", on_off(settings.push_notifications));
    println!("Transaction alerts:   {}", on_off(settings.transaction_alerts));
    println!("Weekly summary:       {}", on_off(settings.weekly_summary));
    println!("Two-factor auth:      {}", on_off(settings.two_factor_enabled));
    println!("Preferred currency:   {}", settings.preferred_currency);
    Ok(())
}
