//! Interactive line loop over food-safety checks.

use anyhow::Result;
use std::future::Future;
use std::io::{BufRead, Write};
use tokio::sync::mpsc;

use super::format::format_verdict;
use super::requester::SafetyCheck;

const PROMPT: &str = "Enter food item: ";
const FAREWELL: &str = "Goodbye!";

/// Forward stdin lines from a dedicated thread.
///
/// The thread is abandoned when the process exits.
pub fn stdin_lines() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Read food items line by line and print each verdict.
///
/// Stops on `quit`/`exit`, end of input, or when `interrupt` resolves.
/// Failed checks are printed and the loop carries on.
pub async fn run_loop<C, W, F>(
    checker: &C,
    mut lines: mpsc::Receiver<String>,
    out: &mut W,
    interrupt: F,
) -> Result<()>
where
    C: SafetyCheck + ?Sized,
    W: Write,
    F: Future<Output = ()>,
{
    tokio::pin!(interrupt);

    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let line = tokio::select! {
            _ = &mut interrupt => {
                writeln!(out, "\n\n{}", FAREWELL)?;
                return Ok(());
            }
            line = lines.recv() => line,
        };

        let Some(line) = line else {
            writeln!(out, "\n{}", FAREWELL)?;
            return Ok(());
        };

        let food_item = line.trim();
        if food_item.is_empty() {
            continue;
        }
        if food_item.eq_ignore_ascii_case("quit") || food_item.eq_ignore_ascii_case("exit") {
            writeln!(out, "{}", FAREWELL)?;
            return Ok(());
        }

        match checker.check_food_safety(food_item).await {
            Ok(verdict) => writeln!(out, "{}", format_verdict(&verdict))?,
            Err(e) => writeln!(out, "❌ Error: {}", e)?,
        }
        writeln!(out)?;
    }
}
