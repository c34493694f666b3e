mod config;
use config::ConsoleConfig;
use metrodesk_core::signal::Signal;
use metrodesk_core::Metrodesk;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging / tracing
    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "info,metrodesk_core=info,admin_console=info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(
        target = "admin_console",
        "Starting back-office console: login → polling sources → reports"
    );

    // Load configuration (defaults + env + optional TOML overlay)
    let cfg = ConsoleConfig::load();

    let mut desk = Metrodesk::new(cfg.desk.clone())?;

    // Sign in before the pollers start so the first fetches are authorized
    if desk.session.is_authenticated().await {
        info!(target = "admin_console", "Resuming stored session");
    } else {
        match &cfg.login {
            Some(login) => match desk.auth().login(&login.email, &login.password).await {
                Ok(user) => {
                    info!(target = "admin_console", operator = %user.display_name, "Signed in")
                }
                Err(e) => {
                    error!(target = "admin_console", error = %e, "Login failed; continuing signed out")
                }
            },
            None => warn!(
                target = "admin_console",
                "No stored session and no METRODESK_EMAIL/METRODESK_PASSWORD; requests will be anonymous"
            ),
        }
    }

    desk.start().await?;

    // Surface session-level signals in the log as they happen
    let (expired_sub, mut expired_rx) = desk.bus.subscribe(Signal::SessionExpired);
    let (warning_sub, mut warning_rx) = desk.bus.subscribe(Signal::IdleWarning);
    let signal_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                Some(_) = expired_rx.recv() => {
                    warn!(target = "admin_console", "Session expired; sign in again to continue");
                }
                Some(_) = warning_rx.recv() => {
                    warn!(target = "admin_console", "Idle warning raised");
                }
                else => break,
            }
        }
    });

    // Periodic status line from the polling sources
    let announcements = Arc::clone(&desk.announcements);
    let feedback = Arc::clone(&desk.feedback);
    let stats = Arc::clone(&desk.stats);
    let every = std::time::Duration::from_secs(cfg.status_every_secs);
    let status_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let bell = announcements.snapshot().await;
            let inbox = feedback.snapshot().await;
            let board = stats.snapshot().await;
            info!(
                target = "admin_console",
                unread_announcements = bell.unread,
                unread_feedback = inbox.unread,
                revenue_today = board.stats.revenue_today,
                passengers_today = board.stats.passengers_today,
                "Status"
            );
        }
    });

    // One statistics pull to show the reporting surface
    let today = chrono::Utc::now().date_naive();
    let from = today - chrono::Duration::days(cfg.report_days);
    match desk.reports().statistics(from, today).await {
        Ok(stats) => info!(
            target = "admin_console",
            days = cfg.report_days,
            total_revenue = stats.kpi.total_revenue,
            total_tickets = stats.kpi.total_tickets,
            total_passengers = stats.kpi.total_passengers,
            "Report window loaded"
        ),
        Err(e) => warn!(target = "admin_console", error = %e, "Report window failed"),
    }

    // Ctrl+C handler to shutdown gracefully
    let shutdown = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    tokio::select! {
        _ = shutdown => {
            info!(target = "admin_console", "Shutting down...");
        }
    }

    status_task.abort();
    signal_task.abort();
    desk.bus.unsubscribe(&expired_sub);
    desk.bus.unsubscribe(&warning_sub);
    desk.shutdown().await.ok();
    Ok(())
}
