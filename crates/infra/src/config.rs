use calendar_notifier_domain::{TickLength, WeeklyPolicy};
use chrono::Duration;
use chrono_tz::{Tz, UTC};
use thiserror::Error;
use tracing::warn;

const SHEET_URL: &str = "SHEET_URL";
const SLACK_TOKEN: &str = "SLACK_TOKEN";
const GOOGLE_ACCESS_TOKEN: &str = "GOOGLE_ACCESS_TOKEN";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} env var to be present.")]
    Missing(&'static str),
    #[error("The given {key}: `{value}` is not valid")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Id of the spreadsheet holding the calendar config and the
    /// notification schedule
    pub spreadsheet_id: String,
    /// Bot token used to post messages
    pub slack_token: String,
    /// Bearer token for the Google Calendar and Google Sheets APIs
    pub google_access_token: String,
    /// Port for the health check server to run on
    pub port: usize,
    /// Timezone used for day boundaries, `HH:MM` triggers and message times
    pub display_timezone: Tz,
    pub tick_length: TickLength,
    /// How far ahead of now the schedule builder fetches events
    pub lookahead: Duration,
    pub weekly_policy: WeeklyPolicy,
    /// An in progress tick marker older than this is considered abandoned
    pub tick_lease_timeout: Duration,
    /// How often the schedule is rebuilt when running as a service
    pub rebuild_interval: Duration,
}

impl Config {
    /// Reads the configuration from the process environment
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| match lookup(key) {
            Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
            _ => Err(ConfigError::Missing(key)),
        };

        let sheet_url = required(SHEET_URL)?;
        let spreadsheet_id =
            parse_spreadsheet_id(&sheet_url).ok_or_else(|| ConfigError::Invalid {
                key: SHEET_URL,
                value: sheet_url.clone(),
            })?;
        let mut config = Self::with_secrets(
            spreadsheet_id,
            required(SLACK_TOKEN)?,
            required(GOOGLE_ACCESS_TOKEN)?,
        );

        config.port = optional(&lookup, "PORT", config.port, |v| v.parse().ok());
        config.display_timezone = optional(&lookup, "DISPLAY_TIMEZONE", config.display_timezone, |v| {
            v.parse::<Tz>().ok()
        });
        config.tick_length = optional(&lookup, "TICK_MINUTES", config.tick_length, |v| {
            v.parse().ok().and_then(|m| TickLength::from_minutes(m).ok())
        });
        config.weekly_policy = optional(&lookup, "WEEKLY_WRAPAROUND", config.weekly_policy, |v| {
            match v.to_lowercase().as_str() {
                "true" | "1" | "yes" => Some(WeeklyPolicy::Wraparound),
                "false" | "0" | "no" => Some(WeeklyPolicy::SameWeek),
                _ => None,
            }
        });
        config.tick_lease_timeout = optional(
            &lookup,
            "TICK_LEASE_TIMEOUT_MINUTES",
            config.tick_length.as_duration() * 2,
            parse_positive_minutes,
        );
        config.rebuild_interval = optional(
            &lookup,
            "REBUILD_INTERVAL_MINUTES",
            config.rebuild_interval,
            parse_positive_minutes,
        );

        Ok(config)
    }

    /// A config with the given secrets and defaults for everything else
    pub fn with_secrets(
        spreadsheet_id: String,
        slack_token: String,
        google_access_token: String,
    ) -> Self {
        let tick_length = TickLength::default();
        Self {
            spreadsheet_id,
            slack_token,
            google_access_token,
            port: 5000,
            display_timezone: UTC,
            tick_length,
            lookahead: Duration::days(7),
            weekly_policy: WeeklyPolicy::default(),
            tick_lease_timeout: tick_length.as_duration() * 2,
            rebuild_interval: Duration::minutes(60),
        }
    }
}

fn optional<T, F, P>(lookup: &F, key: &str, default: T, parse: P) -> T
where
    T: std::fmt::Debug,
    F: Fn(&str) -> Option<String>,
    P: Fn(&str) -> Option<T>,
{
    let value = match lookup(key) {
        Some(value) if !value.trim().is_empty() => value,
        _ => return default,
    };
    match parse(value.trim()) {
        Some(parsed) => parsed,
        None => {
            warn!(
                "The given {}: {} is not valid, falling back to the default: {:?}.",
                key, value, default
            );
            default
        }
    }
}

fn parse_positive_minutes(value: &str) -> Option<Duration> {
    match value.parse::<i64>() {
        Ok(minutes) if minutes > 0 => Some(Duration::minutes(minutes)),
        _ => None,
    }
}

/// Accepts a full spreadsheet url, e.g.
/// `https://docs.google.com/spreadsheets/d/<id>/edit#gid=0`, or a bare id
pub fn parse_spreadsheet_id(locator: &str) -> Option<String> {
    let locator = locator.trim();
    match url::Url::parse(locator) {
        Ok(url) => {
            let segments = url.path_segments()?.collect::<Vec<_>>();
            segments
                .windows(2)
                .find(|pair| pair[0] == "d" && !pair[1].is_empty())
                .map(|pair| pair[1].to_string())
        }
        Err(_) if !locator.is_empty() && !locator.contains('/') => Some(locator.to_string()),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| vars.get(key).cloned()
    }

    const SECRETS: [(&str, &str); 3] = [
        (SHEET_URL, "https://docs.google.com/spreadsheets/d/sheet-id_123/edit#gid=0"),
        (SLACK_TOKEN, "xoxb-token"),
        (GOOGLE_ACCESS_TOKEN, "ya29.token"),
    ];

    #[test]
    fn missing_secrets_are_fatal() {
        for missing in [SHEET_URL, SLACK_TOKEN, GOOGLE_ACCESS_TOKEN] {
            let vars = SECRETS
                .iter()
                .filter(|(k, _)| *k != missing)
                .copied()
                .collect::<Vec<_>>();
            assert_eq!(
                Config::from_lookup(lookup(&vars)).err(),
                Some(ConfigError::Missing(missing))
            );
        }

        let mut vars = SECRETS.to_vec();
        vars[1] = (SLACK_TOKEN, "  ");
        assert_eq!(
            Config::from_lookup(lookup(&vars)).err(),
            Some(ConfigError::Missing(SLACK_TOKEN))
        );
    }

    #[test]
    fn it_uses_defaults_for_optional_values() {
        let config = Config::from_lookup(lookup(&SECRETS)).unwrap();
        assert_eq!(config.spreadsheet_id, "sheet-id_123");
        assert_eq!(config.slack_token, "xoxb-token");
        assert_eq!(config.google_access_token, "ya29.token");
        assert_eq!(config.port, 5000);
        assert_eq!(config.display_timezone, UTC);
        assert_eq!(config.tick_length, TickLength::default());
        assert_eq!(config.lookahead, Duration::days(7));
        assert_eq!(config.weekly_policy, WeeklyPolicy::SameWeek);
        assert_eq!(config.tick_lease_timeout, Duration::minutes(10));
        assert_eq!(config.rebuild_interval, Duration::minutes(60));
    }

    #[test]
    fn it_reads_optional_values() {
        let mut vars = SECRETS.to_vec();
        vars.extend([
            ("PORT", "8080"),
            ("DISPLAY_TIMEZONE", "Asia/Tokyo"),
            ("TICK_MINUTES", "15"),
            ("WEEKLY_WRAPAROUND", "true"),
            ("REBUILD_INTERVAL_MINUTES", "30"),
        ]);
        let config = Config::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.display_timezone, chrono_tz::Asia::Tokyo);
        assert_eq!(config.tick_length.minutes(), 15);
        assert_eq!(config.weekly_policy, WeeklyPolicy::Wraparound);
        assert_eq!(config.tick_lease_timeout, Duration::minutes(30));
        assert_eq!(config.rebuild_interval, Duration::minutes(30));
    }

    #[test]
    fn invalid_optional_values_fall_back_to_defaults() {
        let mut vars = SECRETS.to_vec();
        vars.extend([
            ("PORT", "http"),
            ("DISPLAY_TIMEZONE", "Mars/Olympus"),
            ("TICK_MINUTES", "7"),
            ("WEEKLY_WRAPAROUND", "sometimes"),
            ("TICK_LEASE_TIMEOUT_MINUTES", "-1"),
        ]);
        let config = Config::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.display_timezone, UTC);
        assert_eq!(config.tick_length.minutes(), 5);
        assert_eq!(config.weekly_policy, WeeklyPolicy::SameWeek);
        assert_eq!(config.tick_lease_timeout, Duration::minutes(10));
    }

    #[test]
    fn it_parses_spreadsheet_locators() {
        assert_eq!(
            parse_spreadsheet_id("https://docs.google.com/spreadsheets/d/abc-DEF_1/edit#gid=0"),
            Some("abc-DEF_1".into())
        );
        assert_eq!(parse_spreadsheet_id("abc-DEF_1"), Some("abc-DEF_1".into()));
        assert_eq!(parse_spreadsheet_id("https://docs.google.com/spreadsheets/"), None);
        assert_eq!(parse_spreadsheet_id("docs.google.com/x"), None);
        assert_eq!(parse_spreadsheet_id(""), None);
    }
}
