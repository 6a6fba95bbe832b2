// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use isyourday_client::cancelable;
use jiff::civil::{Date, DateTime};
use serde::Serialize;

/// The output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

/// Runs a command, cancelling it when Ctrl-C is pressed.
///
/// The watcher covers the whole command, so an interrupt between two API
/// calls stops it as well as one during a call.
pub async fn interruptible<T>(
    fut: impl Future<Output = Result<T, Box<dyn Error>>>,
) -> Result<T, Box<dyn Error>> {
    run_until(fut, async { tokio::signal::ctrl_c().await.is_ok() }).await
}

async fn run_until<T>(
    fut: impl Future<Output = Result<T, Box<dyn Error>>>,
    interrupt: impl Future<Output = bool> + Send + 'static,
) -> Result<T, Box<dyn Error>> {
    let (fut, handle) = cancelable(async { Ok(fut.await) });
    let watcher = tokio::spawn(async move {
        if interrupt.await {
            tracing::info!("interrupted, cancelling command");
            handle.cancel();
        }
    });

    let result = fut.await;
    watcher.abort();
    result?
}

/// Asks a yes/no question on the terminal.
pub fn confirm(prompt: &str) -> Result<bool, Box<dyn Error>> {
    Ok(cliclack::confirm(prompt).initial_value(false).interact()?)
}

/// Prints `value` as pretty JSON.
pub fn print_json(value: &impl Serialize) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Parses `YYYY-MM-DD HH:MM[:SS]`, `YYYY-MM-DDTHH:MM[:SS]` or `YYYY-MM-DD`.
pub fn parse_datetime(dt: &str) -> Result<DateTime, Box<dyn Error>> {
    let dt = dt.trim();
    if let Ok(dt) = dt.parse::<DateTime>() {
        Ok(dt)
    } else if let Ok(date) = dt.parse::<Date>() {
        Ok(date.at(0, 0, 0, 0))
    } else {
        Err(format!(
            "Invalid date format: {dt}. Expected format: YYYY-MM-DD or YYYY-MM-DD HH:MM"
        )
        .into())
    }
}

pub fn format_datetime(dt: Option<DateTime>) -> String {
    match dt {
        Some(dt) => dt.strftime("%Y-%m-%d %H:%M").to_string(),
        None => String::new(),
    }
}

/// Renders a byte count with a binary unit.
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: i64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut size = bytes as f64;
    let mut unit = "B";
    for u in UNITS {
        if size < 1024.0 {
            break;
        }
        size /= 1024.0;
        unit = u;
    }
    format!("{size:.1} {unit}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_interruptible_passes_result_through() {
        let value = interruptible(async { Ok::<_, Box<dyn Error>>(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);

        let err = interruptible(async { Err::<(), Box<dyn Error>>("boom".into()) })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[tokio::test]
    async fn test_interrupt_between_calls_stops_command() {
        let (tx, rx) = futures::channel::oneshot::channel::<()>();
        let err = run_until(
            async move {
                let first = async { Ok::<_, Box<dyn Error>>(1) }.await?;
                tx.send(()).ok();
                futures::future::pending::<()>().await;
                Ok(first)
            },
            async move { rx.await.is_ok() },
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<isyourday_client::ApiError>(),
            Some(isyourday_client::ApiError::Cancelled)
        ));
    }

    #[test]
    fn test_parse_datetime() {
        let expected = jiff::civil::date(2025, 1, 1).at(12, 30, 0, 0);
        assert_eq!(parse_datetime("2025-01-01 12:30").unwrap(), expected);
        assert_eq!(parse_datetime("2025-01-01T12:30:00").unwrap(), expected);
        assert_eq!(
            parse_datetime("2025-01-01").unwrap(),
            jiff::civil::date(2025, 1, 1).at(0, 0, 0, 0)
        );
        assert!(parse_datetime("tomorrow").is_err());
    }

    #[test]
    fn test_format_datetime() {
        let dt = jiff::civil::date(2025, 3, 9).at(8, 5, 0, 0);
        assert_eq!(format_datetime(Some(dt)), "2025-03-09 08:05");
        assert_eq!(format_datetime(None), "");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(5 * 1024 * 1024 + 512 * 1024), "5.5 MiB");
    }
}
