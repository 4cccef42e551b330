//! Chat command surface
//!
//! Parses user messages (`/analyze <address>`, `/alert <address> <price>`,
//! ...) and menu button callbacks, runs them against the core and renders
//! the reply text. Every failure becomes a reply; nothing here errors out.

use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode};
use dexbot_core::{AlertId, AlertStatus, Error, PriceAlert, TokenHandle, TokenReport, UserId};
use serde::Serialize;

use crate::AppState;

/// Inline keyboard button
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    pub label: &'static str,
    pub callback_data: &'static str,
}

/// Bot reply: text plus an optional inline keyboard (rows of buttons)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub text: String,
    pub keyboard: Vec<Vec<Button>>,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Analyze(String),
    SetAlert { token: String, target: String },
    ListAlerts,
    Cancel(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Usage(&'static str),
    Unknown(String),
}

mod usage {
    pub const ANALYZE: &str = "Usage: /analyze <token address>";
    pub const ALERT: &str = "Usage: /alert <token address> <target price>";
    pub const CANCEL: &str = "Usage: /cancel <alert id>";
}

const WELCOME: &str = "Welcome to DEX Analysis Bot!\n\n\
    I can help you analyze tokens and track prices on decentralized exchanges.\n\
    Select an option to get started:";

const HELP: &str = "ℹ️ Commands\n\n\
    /analyze <token address> - liquidity, volume, holders and security score\n\
    /alert <token address> <price> - notify me when the price reaches a target\n\
    /alerts - list my alerts\n\
    /cancel <alert id> - cancel a pending alert\n\
    /help - show this message\n\n\
    The security score is a heuristic, not a guarantee of safety.";

fn menu() -> Vec<Vec<Button>> {
    vec![
        vec![Button {
            label: "📊 Token Analysis",
            callback_data: "analyze",
        }],
        vec![Button {
            label: "💹 Price Alerts",
            callback_data: "alerts",
        }],
        vec![Button {
            label: "ℹ️ Help",
            callback_data: "help",
        }],
    ]
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut parts = input.split_whitespace();
        let Some(head) = parts.next() else {
            return Err(ParseError::Unknown(String::new()));
        };
        let args: Vec<&str> = parts.collect();

        // "/analyze@SomeBot" -> "analyze"; bare words are menu callbacks
        let name = head.trim_start_matches('/');
        let name = name.split('@').next().unwrap_or(name).to_lowercase();

        match (name.as_str(), args.as_slice()) {
            ("start", _) => Ok(Command::Start),
            ("help", _) => Ok(Command::Help),
            ("alerts", _) => Ok(Command::ListAlerts),
            ("analyze", [token]) => Ok(Command::Analyze(token.to_string())),
            ("analyze", _) => Err(ParseError::Usage(usage::ANALYZE)),
            ("alert", [token, target]) => Ok(Command::SetAlert {
                token: token.to_string(),
                target: target.to_string(),
            }),
            ("alert", _) => Err(ParseError::Usage(usage::ALERT)),
            ("cancel", [id]) => Ok(Command::Cancel(id.to_string())),
            ("cancel", _) => Err(ParseError::Usage(usage::CANCEL)),
            _ => Err(ParseError::Unknown(head.to_string())),
        }
    }
}

/// Two decimal places, half-even like the chat clients expect
pub fn format_amount(value: &BigDecimal) -> String {
    value.with_scale_round(2, RoundingMode::HalfEven).to_string()
}

pub fn render_report(report: &TokenReport) -> String {
    let mut text = format!(
        "📊 Token Analysis\n\n\
         Liquidity: {} ETH\n\
         24h Volume: {}\n\
         Holders: {}\n\
         Security Score: {}/100 ({})\n",
        format_amount(&report.liquidity_eth),
        format_amount(&report.volume_24h),
        report.holder_count,
        report.security_score,
        report.rating(),
    );

    for item in &report.breakdown {
        let mark = if item.score > 0 { "✅" } else { "❌" };
        text.push_str(&format!("\n{} {}", mark, item.reason));
    }

    text
}

fn render_alert(alert: &PriceAlert) -> String {
    let status = match alert.status {
        AlertStatus::Pending => "⏳ pending",
        AlertStatus::Triggered => "🔔 triggered",
        AlertStatus::Cancelled => "🚫 cancelled",
    };

    format!(
        "#{} {} ≥ {} ({})",
        alert.id, alert.token_address, alert.target_price, status
    )
}

/// User-facing message for a core error
pub fn render_error(err: &Error) -> String {
    match err {
        Error::InvalidAddress(_) => "❌ Invalid token address provided".to_string(),
        Error::InvalidPrice(_) => "❌ Target price must be a positive number".to_string(),
        Error::DataUnavailable(_) => "❌ Error analyzing token. Please try again.".to_string(),
        Error::NotFound(id) => format!("❌ No pending alert #{id}"),
        Error::Forbidden(id) => format!("❌ Alert #{id} belongs to another user"),
        Error::Storage(_) => "❌ Error saving your request. Please try again.".to_string(),
    }
}

async fn analyze(state: &AppState, token: &str) -> Result<String, Error> {
    let token = TokenHandle::parse(token)?;
    let report = state.scorer.score(&token).await?;
    Ok(render_report(&report))
}

async fn set_alert(
    state: &AppState,
    user_id: UserId,
    token: &str,
    target: &str,
) -> Result<String, Error> {
    let target_price = BigDecimal::from_str(target)
        .map_err(|_| Error::InvalidPrice(target.to_string()))?;

    let alert_id = state
        .registry
        .set_alert(user_id, token, target_price)
        .await?;

    Ok(format!(
        "✅ Alert #{alert_id} set! You'll be notified when the token reaches {target}"
    ))
}

async fn list_alerts(state: &AppState, user_id: UserId) -> Result<String, Error> {
    let alerts = state.registry.alerts_for_user(user_id).await?;
    if alerts.is_empty() {
        return Ok(format!("💹 You have no alerts.\n\n{}", usage::ALERT));
    }

    let lines: Vec<String> = alerts.iter().map(render_alert).collect();
    Ok(format!("💹 Your alerts\n\n{}", lines.join("\n")))
}

async fn cancel(state: &AppState, user_id: UserId, id: &str) -> Result<String, Error> {
    let Ok(alert_id) = id.parse::<AlertId>() else {
        return Ok(format!("❌ `{id}` is not an alert id\n{}", usage::CANCEL));
    };

    state.registry.cancel_alert(alert_id, user_id).await?;
    Ok(format!("🚫 Alert #{alert_id} cancelled"))
}

/// Handle one incoming chat message
pub async fn handle_message(state: &AppState, user_id: UserId, text: &str) -> Reply {
    let command = match text.parse::<Command>() {
        Ok(command) => command,
        Err(ParseError::Usage(hint)) => return Reply::text(hint),
        Err(ParseError::Unknown(_)) => {
            return Reply {
                text: "I didn't understand that. Select an option:".to_string(),
                keyboard: menu(),
            }
        }
    };

    let result = match command {
        Command::Start => {
            return Reply {
                text: WELCOME.to_string(),
                keyboard: menu(),
            }
        }
        Command::Help => return Reply::text(HELP),
        Command::Analyze(token) => analyze(state, &token).await,
        Command::SetAlert { token, target } => set_alert(state, user_id, &token, &target).await,
        Command::ListAlerts => list_alerts(state, user_id).await,
        Command::Cancel(id) => cancel(state, user_id, &id).await,
    };

    match result {
        Ok(text) => Reply::text(text),
        Err(err) => {
            tracing::error!(user_id, error = %err, "Chat command failed");
            Reply::text(render_error(&err))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use alloy::primitives::U256;
    use dexbot_core::{
        chain::fake::StaticChainProvider, AlertRegistry, ScoringConfig, SecurityScorer, SignalSet,
    };

    use super::*;

    const TOKEN: &str = "0xc765bddb93b0d1c1a88282ba0fa6b2d00e3e0c83";

    fn state(provider: StaticChainProvider) -> AppState {
        AppState {
            scorer: SecurityScorer::new(Arc::new(provider), ScoringConfig::default()),
            registry: AlertRegistry::in_memory(),
        }
    }

    fn healthy_pool() -> StaticChainProvider {
        StaticChainProvider {
            reserves: (
                U256::from(2_000_000_000_000_000_000u128),
                U256::from(5_000u64),
            ),
            volume_24h: BigDecimal::from_str("1000").unwrap(),
            holder_count: 150,
            signals: SignalSet {
                contract_verified: true,
                liquidity_locked: true,
                ownership_renounced: false,
                no_suspicious_functions: true,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("/start".parse::<Command>(), Ok(Command::Start));
        assert_eq!("help".parse::<Command>(), Ok(Command::Help));
        assert_eq!(
            "/analyze@DexBot 0xabc".parse::<Command>(),
            Ok(Command::Analyze("0xabc".into()))
        );
        assert_eq!(
            "/alert 0xabc 1.25".parse::<Command>(),
            Ok(Command::SetAlert {
                token: "0xabc".into(),
                target: "1.25".into()
            })
        );
        assert_eq!("/cancel #3".parse::<Command>(), Ok(Command::Cancel("#3".into())));
        assert_eq!("alerts".parse::<Command>(), Ok(Command::ListAlerts));
    }

    #[test]
    fn test_parse_usage_errors() {
        assert_eq!("/analyze".parse::<Command>(), Err(ParseError::Usage(usage::ANALYZE)));
        assert_eq!("analyze".parse::<Command>(), Err(ParseError::Usage(usage::ANALYZE)));
        assert_eq!("/alert 0xabc".parse::<Command>(), Err(ParseError::Usage(usage::ALERT)));
        assert_eq!("/cancel".parse::<Command>(), Err(ParseError::Usage(usage::CANCEL)));
        assert!(matches!("/moon".parse::<Command>(), Err(ParseError::Unknown(_))));
        assert!(matches!("".parse::<Command>(), Err(ParseError::Unknown(_))));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(&BigDecimal::from(2)), "2.00");
        assert_eq!(format_amount(&BigDecimal::from_str("1.005").unwrap()), "1.00");
        assert_eq!(format_amount(&BigDecimal::from_str("1.015").unwrap()), "1.02");
    }

    #[tokio::test]
    async fn test_start_shows_menu() {
        let reply = handle_message(&state(healthy_pool()), 1, "/start").await;
        assert!(reply.text.starts_with("Welcome to DEX Analysis Bot!"));
        assert_eq!(reply.keyboard.len(), 3);
        assert_eq!(reply.keyboard[0][0].callback_data, "analyze");
    }

    #[tokio::test]
    async fn test_analyze_renders_report() {
        let reply = handle_message(&state(healthy_pool()), 1, &format!("/analyze {TOKEN}")).await;

        assert!(reply.text.contains("Liquidity: 2.00 ETH"), "{}", reply.text);
        assert!(reply.text.contains("24h Volume: 1000.00"));
        assert!(reply.text.contains("Holders: 150"));
        assert!(reply.text.contains("Security Score: 75/100"));
        assert!(reply.text.contains("❌ Ownership not renounced"));
    }

    #[tokio::test]
    async fn test_analyze_invalid_address() {
        let reply = handle_message(&state(healthy_pool()), 1, "/analyze 0xnope").await;
        assert_eq!(reply.text, "❌ Invalid token address provided");
    }

    #[tokio::test]
    async fn test_analyze_unavailable_data() {
        let provider = StaticChainProvider {
            unavailable: true,
            ..Default::default()
        };
        let reply = handle_message(&state(provider), 1, &format!("/analyze {TOKEN}")).await;
        assert_eq!(reply.text, "❌ Error analyzing token. Please try again.");
    }

    #[tokio::test]
    async fn test_alert_lifecycle_through_chat() {
        let state = state(healthy_pool());

        let reply = handle_message(&state, 1, &format!("/alert {TOKEN} 1.5")).await;
        assert!(reply.text.starts_with("✅ Alert #1 set!"), "{}", reply.text);

        let reply = handle_message(&state, 1, "/alerts").await;
        assert!(reply.text.contains("#1"));
        assert!(reply.text.contains("pending"));

        let reply = handle_message(&state, 2, "/cancel 1").await;
        assert_eq!(reply.text, "❌ Alert #1 belongs to another user");

        let reply = handle_message(&state, 1, "/cancel #1").await;
        assert_eq!(reply.text, "🚫 Alert #1 cancelled");

        let reply = handle_message(&state, 1, "/cancel 1").await;
        assert_eq!(reply.text, "❌ No pending alert #1");
    }

    #[tokio::test]
    async fn test_alert_rejects_bad_price() {
        let state = state(healthy_pool());

        for text in [format!("/alert {TOKEN} 0"), format!("/alert {TOKEN} lots")] {
            let reply = handle_message(&state, 1, &text).await;
            assert_eq!(reply.text, "❌ Target price must be a positive number");
        }
        assert!(state.registry.alerts_for_user(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unparsable_price_keeps_input() {
        let state = state(healthy_pool());
        let err = set_alert(&state, 1, TOKEN, "lots").await.unwrap_err();
        assert!(matches!(err, Error::InvalidPrice(ref raw) if raw == "lots"));
    }

    #[tokio::test]
    async fn test_empty_alert_list() {
        let reply = handle_message(&state(healthy_pool()), 9, "/alerts").await;
        assert!(reply.text.starts_with("💹 You have no alerts."));
    }
}
