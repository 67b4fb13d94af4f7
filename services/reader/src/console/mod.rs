//! services/reader/src/console/mod.rs
//!
//! The terminal presentation shell: reads commands line by line, drives the
//! state machine, and redraws the page whenever the view changes.

pub mod driver;
pub mod protocol;
pub mod render;

pub use driver::{CommandOutcome, ShellDriver};
pub use protocol::{Command, CommandError};
pub use render::render_page;

use crate::error::AppError;
use maidat_core::Resolution;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

/// The main control loop for one terminal session.
///
/// Returns when the user quits or the input ends.
pub async fn run_console<R, W>(
    mut driver: ShellDriver,
    input: R,
    mut output: W,
) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    draw(&mut output, &driver)?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("Input closed.");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(command) => match driver.handle(command) {
                        CommandOutcome::Quit => {
                            info!("Quit requested.");
                            break;
                        }
                        CommandOutcome::Fetching(_) => draw(&mut output, &driver)?,
                        CommandOutcome::Ignored => {}
                        CommandOutcome::Rejected(e) => {
                            writeln!(output, "{e}")?;
                            output.flush()?;
                        }
                    },
                    Err(e) => {
                        warn!("Failed to parse command: {}", e);
                        writeln!(output, "{e}")?;
                        output.flush()?;
                    }
                }
            }
            resolution = driver.next_resolution() => {
                if resolution == Some(Resolution::Applied) {
                    draw(&mut output, &driver)?;
                }
            }
        }
    }

    Ok(())
}

fn draw<W: Write>(output: &mut W, driver: &ShellDriver) -> Result<(), AppError> {
    write!(output, "{}", render_page(driver.state()))?;
    output.flush()?;
    Ok(())
}
