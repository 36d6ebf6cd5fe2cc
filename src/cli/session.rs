//! Interactive conversion session.
//!
//! The session is the composition root: it owns the amount, the selected
//! currencies and the [`RateProvider`]. The base currency always follows the
//! `from` currency, so changing or swapping it triggers a fetch while changing
//! the amount or the `to` currency only recomputes the quote.

use super::{convert, ui};
use crate::core::currency::normalize_code;
use crate::core::{CurrencyCode, FetchState, Quote, RateProvider, RateSource};
use anyhow::{Result, anyhow, bail};
use std::io::Write;
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

const HELP: &str = "\
Commands:
  amount <n> | <n>   set the amount to convert
  from <code>        convert from this currency (fetches its rates)
  to <code>          convert to this currency
  swap               swap the from and to currencies
  refresh            fetch the latest rates again
  rates              list all rates for the current base
  help               show this help
  quit               leave the session";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Amount(f64),
    From(CurrencyCode),
    To(CurrencyCode),
    Swap,
    Refresh,
    Rates,
    Help,
    Quit,
}

impl SessionCommand {
    fn triggers_fetch(&self) -> bool {
        matches!(
            self,
            SessionCommand::From(_) | SessionCommand::Swap | SessionCommand::Refresh
        )
    }
}

fn parse_amount(value: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| anyhow!("Invalid amount: {value}"))
}

fn parse_code(code: &str) -> Result<CurrencyCode> {
    let code = normalize_code(code);
    if code.is_empty() {
        bail!("Currency code must not be empty");
    }
    Ok(code)
}

impl FromStr for SessionCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default().to_lowercase();
        let arg = parts.next();
        if parts.next().is_some() {
            bail!("Too many arguments: {}", line.trim());
        }

        match (command.as_str(), arg) {
            ("amount" | "a", Some(value)) => parse_amount(value).map(SessionCommand::Amount),
            ("from" | "f", Some(code)) => parse_code(code).map(SessionCommand::From),
            ("to" | "t", Some(code)) => parse_code(code).map(SessionCommand::To),
            ("swap" | "s", None) => Ok(SessionCommand::Swap),
            ("refresh" | "r", None) => Ok(SessionCommand::Refresh),
            ("rates", None) => Ok(SessionCommand::Rates),
            ("help" | "?", None) => Ok(SessionCommand::Help),
            ("quit" | "exit" | "q", None) => Ok(SessionCommand::Quit),
            (value, None) if value.parse::<f64>().is_ok() => {
                parse_amount(value).map(SessionCommand::Amount)
            }
            _ => bail!(
                "Unknown command: {}. Type `help` for a list of commands",
                line.trim()
            ),
        }
    }
}

pub struct Session<S: RateSource> {
    provider: RateProvider<S>,
    updates: watch::Receiver<FetchState>,
    amount: f64,
    from: CurrencyCode,
    to: CurrencyCode,
}

impl<S: RateSource> Session<S> {
    pub fn new(source: S, from: &str, to: &str) -> Self {
        let provider = RateProvider::new(source);
        let updates = provider.subscribe();
        Self {
            provider,
            updates,
            amount: 1.0,
            from: normalize_code(from),
            to: normalize_code(to),
        }
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn from_code(&self) -> &str {
        &self.from
    }

    pub fn to_code(&self) -> &str {
        &self.to
    }

    pub fn state(&self) -> FetchState {
        self.provider.state()
    }

    /// Loads rates for the initial `from` currency.
    pub async fn start(&self) -> Result<FetchState> {
        Ok(self.provider.select_base(&self.from).await?)
    }

    /// Current quote, if rates are loaded.
    pub fn quote(&self) -> Option<Quote> {
        self.provider
            .snapshot()
            .map(|snapshot| convert::quote(self.amount, &self.from, &self.to, &snapshot))
    }

    /// Applies a command and returns the text to show for it.
    pub async fn apply(&mut self, command: SessionCommand) -> Result<String> {
        match command {
            SessionCommand::Amount(amount) => self.amount = amount,
            SessionCommand::From(code) => {
                self.from = code;
                self.provider.select_base(&self.from).await?;
            }
            SessionCommand::To(code) => self.to = code,
            SessionCommand::Swap => {
                std::mem::swap(&mut self.from, &mut self.to);
                self.provider.select_base(&self.from).await?;
            }
            SessionCommand::Refresh => {
                self.provider.refresh().await;
            }
            SessionCommand::Rates => {
                return Ok(self.provider.snapshot().map_or_else(
                    || ui::style_text("No exchange rates loaded", ui::StyleType::Subtle),
                    |snapshot| snapshot.display_as_table(),
                ));
            }
            SessionCommand::Help => return Ok(HELP.to_string()),
            SessionCommand::Quit => return Ok(String::new()),
        }
        Ok(self.render())
    }

    /// Renders the latest state published by the provider.
    pub fn render(&mut self) -> String {
        let state = self.updates.borrow_and_update().clone();
        match state {
            FetchState::Idle => ui::style_text("No exchange rates loaded", ui::StyleType::Subtle),
            FetchState::Loading => {
                ui::style_text("Loading exchange rates...", ui::StyleType::Subtle)
            }
            FetchState::Failed(error) => format!(
                "{}\n{}",
                ui::style_text(&format!("{}: {error}", error.kind()), ui::StyleType::Error),
                ui::style_text("Type `refresh` to try again", ui::StyleType::Subtle)
            ),
            FetchState::Ready(snapshot) => {
                convert::quote(self.amount, &self.from, &self.to, &snapshot).display(&snapshot)
            }
        }
    }
}

pub async fn run<S: RateSource>(source: S, from: &str, to: &str) -> Result<()> {
    let mut session = Session::new(source, from, to);

    let spinner = ui::new_spinner(format!("Fetching {} exchange rates", session.from_code()));
    session.start().await?;
    spinner.finish_and_clear();

    println!("{}", ui::style_text("Currency Converter", ui::StyleType::Title));
    println!("{}\n", ui::style_text("Type `help` for commands", ui::StyleType::Subtle));
    println!("{}", session.render());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\n> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<SessionCommand>() {
            Ok(SessionCommand::Quit) => break,
            Ok(command) => command,
            Err(e) => {
                println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
                continue;
            }
        };

        let spinner = command
            .triggers_fetch()
            .then(|| ui::new_spinner("Fetching exchange rates".to_string()));
        let result = session.apply(command).await;
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        match result {
            Ok(output) => println!("{output}"),
            Err(e) => println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error)),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FetchError, FetchErrorKind, RateSnapshot, RateTable};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replies in order and records the requested bases.
    struct ScriptedSource {
        replies: Mutex<VecDeque<Result<RateSnapshot, FetchError>>>,
        requested: Mutex<Vec<String>>,
    }

    impl ScriptedSource {
        fn new(replies: Vec<Result<RateSnapshot, FetchError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RateSource for ScriptedSource {
        async fn fetch_rates(&self, base: &str) -> Result<RateSnapshot, FetchError> {
            self.requested.lock().unwrap().push(base.to_string());
            self.replies.lock().unwrap().pop_front().expect("unexpected fetch")
        }
    }

    fn usd_snapshot() -> RateSnapshot {
        let table: RateTable = [("EUR", 0.9), ("JPY", 150.0)].into_iter().collect();
        RateSnapshot::new("USD", table, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
    }

    fn eur_snapshot() -> RateSnapshot {
        let table: RateTable = [("USD", 1.0 / 0.9), ("JPY", 150.0 / 0.9)]
            .into_iter()
            .collect();
        RateSnapshot::new("EUR", table, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
    }

    fn requested(session: &Session<ScriptedSource>) -> Vec<String> {
        session.provider.source().requested.lock().unwrap().clone()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("amount 12.5".parse::<SessionCommand>().unwrap(), SessionCommand::Amount(12.5));
        assert_eq!("250".parse::<SessionCommand>().unwrap(), SessionCommand::Amount(250.0));
        assert_eq!(
            "from gbp".parse::<SessionCommand>().unwrap(),
            SessionCommand::From("GBP".to_string())
        );
        assert_eq!(
            "TO jpy".parse::<SessionCommand>().unwrap(),
            SessionCommand::To("JPY".to_string())
        );
        assert_eq!("swap".parse::<SessionCommand>().unwrap(), SessionCommand::Swap);
        assert_eq!("r".parse::<SessionCommand>().unwrap(), SessionCommand::Refresh);
        assert_eq!("quit".parse::<SessionCommand>().unwrap(), SessionCommand::Quit);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("amount abc".parse::<SessionCommand>().is_err());
        assert!("amount inf".parse::<SessionCommand>().is_err());
        assert!("from".parse::<SessionCommand>().is_err());
        assert!("from usd eur".parse::<SessionCommand>().is_err());
        assert!(
            "dance"
                .parse::<SessionCommand>()
                .unwrap_err()
                .to_string()
                .contains("Unknown command: dance")
        );
    }

    #[tokio::test]
    async fn test_start_and_convert() {
        let mut session = Session::new(ScriptedSource::new(vec![Ok(usd_snapshot())]), "usd", "eur");
        session.start().await.unwrap();

        let output = session.apply(SessionCommand::Amount(100.0)).await.unwrap();

        assert!(output.contains("€90.00 EUR"));
        assert_eq!(session.quote().unwrap().result, 100.0 * 0.9);
        assert_eq!(requested(&session), vec!["USD"]);
    }

    #[tokio::test]
    async fn test_changing_target_does_not_refetch() {
        let mut session = Session::new(ScriptedSource::new(vec![Ok(usd_snapshot())]), "USD", "EUR");
        session.start().await.unwrap();

        session.apply(SessionCommand::To("JPY".to_string())).await.unwrap();

        assert_eq!(session.quote().unwrap().result, 150.0);
        assert_eq!(requested(&session), vec!["USD"]);
    }

    #[tokio::test]
    async fn test_swap_fetches_new_base() {
        let mut session = Session::new(
            ScriptedSource::new(vec![Ok(usd_snapshot()), Ok(eur_snapshot())]),
            "USD",
            "EUR",
        );
        session.start().await.unwrap();

        session.apply(SessionCommand::Swap).await.unwrap();

        assert_eq!(session.from_code(), "EUR");
        assert_eq!(session.to_code(), "USD");
        assert_eq!(requested(&session), vec!["USD", "EUR"]);
        let quote = session.quote().unwrap();
        assert!((quote.result - 1.0 / 0.9).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_failure_keeps_session_usable_and_refresh_recovers() {
        let mut session = Session::new(
            ScriptedSource::new(vec![Err(FetchError::Remote { status: 500 }), Ok(usd_snapshot())]),
            "USD",
            "EUR",
        );

        let state = session.start().await.unwrap();
        assert_eq!(state.error().unwrap().kind(), FetchErrorKind::Remote);
        let output = session.render();
        assert!(output.contains("RemoteError"));
        assert!(output.contains("500"));
        assert!(session.quote().is_none());

        // Still interactive while failed
        session.apply(SessionCommand::Amount(10.0)).await.unwrap();
        assert_eq!(session.amount(), 10.0);

        let output = session.apply(SessionCommand::Refresh).await.unwrap();
        assert!(output.contains("€9.00 EUR"));
        assert!(session.state().snapshot().is_some());
    }

    #[tokio::test]
    async fn test_rates_and_help_output() {
        let mut session = Session::new(ScriptedSource::new(vec![Ok(usd_snapshot())]), "USD", "EUR");
        assert!(
            session
                .apply(SessionCommand::Rates)
                .await
                .unwrap()
                .contains("No exchange rates loaded")
        );

        session.start().await.unwrap();
        assert!(session.apply(SessionCommand::Rates).await.unwrap().contains("JPY"));
        assert!(session.apply(SessionCommand::Help).await.unwrap().contains("refresh"));
    }
}
