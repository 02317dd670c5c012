//! Line-oriented front end over a conversion session.

use crate::commands::{HELP_TEXT, TerminalCommand, parse_command, render_options, render_view};
use crate::error::FxconvError;

use common::ErrorLocation;
use converter_core::session::ConverterHandle;

use std::panic::Location;
use std::time::Duration;

use log::{debug, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

const PROMPT: &str = "> ";

/// Read commands from `input` until EOF or `quit`, printing the view to
/// `output` after each one.
///
/// Session commands wait up to `settle_timeout` for in-flight fetches so the
/// printed view reflects their result.
///
/// # Errors
///
/// Returns [`FxconvError::Fxconv`] on I/O failure and a session error if the
/// session actor has stopped.
pub async fn run_terminal<R, W>(
    handle: &ConverterHandle,
    input: R,
    output: &mut W,
    settle_timeout: Duration,
) -> Result<(), FxconvError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    settle(handle, settle_timeout).await;
    write_out(output, &render_view(&handle.view())).await?;

    loop {
        write_out(output, PROMPT).await?;

        let Some(line) = lines.next_line().await.map_err(io_error)? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(FxconvError::Input { message, .. }) => {
                write_out(output, &format!("{message}\n")).await?;
                continue;
            }
            Err(e) => return Err(e),
        };
        debug!("Terminal command: {command:?}");

        match command {
            TerminalCommand::Session(cmd) => {
                // Returns once the command is applied, so settling sees its fetches
                handle.update(cmd).await?;
                settle(handle, settle_timeout).await;
                write_out(output, &render_view(&handle.view())).await?;
            }
            TerminalCommand::Show => write_out(output, &render_view(&handle.view())).await?,
            TerminalCommand::List => write_out(output, &render_options(&handle.view())).await?,
            TerminalCommand::Help => write_out(output, &format!("{HELP_TEXT}\n")).await?,
            TerminalCommand::Quit => break,
        }
    }

    Ok(())
}

async fn settle(handle: &ConverterHandle, settle_timeout: Duration) {
    let mut state_rx = handle.subscribe();
    if timeout(settle_timeout, state_rx.wait_for(|state| !state.loading))
        .await
        .is_err()
    {
        warn!("Session still loading after {settle_timeout:?}");
    }
}

async fn write_out<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<(), FxconvError> {
    output.write_all(text.as_bytes()).await.map_err(io_error)?;
    output.flush().await.map_err(io_error)
}

#[track_caller]
fn io_error(e: std::io::Error) -> FxconvError {
    FxconvError::Fxconv {
        message: format!("Terminal I/O failed: {e}"),
        location: ErrorLocation::from(Location::caller()),
    }
}
