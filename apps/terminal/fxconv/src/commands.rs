//! Prompt commands and view rendering for the terminal front end.

use crate::error::FxconvError;

use common::{CurrencyCode, ErrorLocation};
use converter_core::session::{ConversionView, SessionCommand};

use std::fmt::Write;
use std::panic::Location;

pub const HELP_TEXT: &str = "\
Commands:
  from <amount>         type an amount in the source currency
  to <amount>           type an amount in the target currency
  from-currency <code>  select the source currency
  to-currency <code>    select the target currency
  swap                  exchange source and target
  show                  print the current conversion
  list                  list available currencies
  help                  show this text
  quit                  exit";

#[derive(Debug, Clone, PartialEq)]
pub enum TerminalCommand {
    Session(SessionCommand),
    Show,
    List,
    Help,
    Quit,
}

/// Parse one prompt line.
///
/// Amount arguments are passed through as raw text; the session decides how
/// to read them.
///
/// # Errors
///
/// Returns [`FxconvError::Input`] for an empty line, an unknown command, or
/// an invalid currency code.
#[track_caller]
pub fn parse_command(line: &str) -> Result<TerminalCommand, FxconvError> {
    let trimmed = line.trim();
    let (name, argument) = match trimmed.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (trimmed, ""),
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "from" => TerminalCommand::Session(SessionCommand::SetFromAmount(argument.to_string())),
        "to" => TerminalCommand::Session(SessionCommand::SetToAmount(argument.to_string())),
        "from-currency" => {
            TerminalCommand::Session(SessionCommand::SetFromCurrency(parse_code(argument)?))
        }
        "to-currency" => {
            TerminalCommand::Session(SessionCommand::SetToCurrency(parse_code(argument)?))
        }
        "swap" => TerminalCommand::Session(SessionCommand::Swap),
        "show" => TerminalCommand::Show,
        "list" => TerminalCommand::List,
        "help" | "?" => TerminalCommand::Help,
        "quit" | "exit" => TerminalCommand::Quit,
        "" => {
            return Err(FxconvError::Input {
                message: "empty command".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        other => {
            return Err(FxconvError::Input {
                message: format!("unknown command '{other}' (try 'help')"),
                location: ErrorLocation::from(Location::caller()),
            });
        }
    };

    Ok(command)
}

#[track_caller]
fn parse_code(argument: &str) -> Result<CurrencyCode, FxconvError> {
    CurrencyCode::parse(argument).map_err(|e| FxconvError::Input {
        message: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    })
}

fn label(code: &Option<CurrencyCode>) -> String {
    code.as_ref()
        .map(CurrencyCode::display_label)
        .unwrap_or_else(|| "---".to_string())
}

/// Two amount rows with the rate summary between them.
pub fn render_view(view: &ConversionView) -> String {
    let mut out = String::new();

    if let Some(error) = &view.error {
        let _ = writeln!(out, "Error: {error}");
    }
    let _ = writeln!(out, "  {} {}", view.from_amount, label(&view.from_currency));
    let _ = writeln!(out, "    {}", view.summary);
    let _ = writeln!(out, "  {} {}", view.to_amount, label(&view.to_currency));

    out
}

/// Upper-cased currency options, several per line.
pub fn render_options(view: &ConversionView) -> String {
    if view.currency_options.is_empty() {
        return "No currencies loaded\n".to_string();
    }

    let labels: Vec<String> = view
        .currency_options
        .iter()
        .map(CurrencyCode::display_label)
        .collect();

    let mut out = String::new();
    for row in labels.chunks(10) {
        let _ = writeln!(out, "{}", row.join(" "));
    }
    out
}
