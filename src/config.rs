use std::env;

use chrono::Weekday;
use dotenvy::dotenv;

/// Step between successive candidate start times, in minutes.
pub const DEFAULT_GRANULARITY_MINUTES: u32 = 60;

/// Engine settings, loaded once at startup.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub database_url: String,
    /// Fixed weekly day off, categorically non-bookable.
    pub weekly_off_day: Weekday,
    pub slot_granularity_minutes: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            database_url: "sqlite:bot.db?mode=rwc".to_string(),
            weekly_off_day: Weekday::Mon,
            slot_granularity_minutes: DEFAULT_GRANULARITY_MINUTES,
        }
    }
}

impl EngineConfig {
    /// Reads `DATABASE_URL`, `WEEKLY_OFF_DAY` and `SLOT_GRANULARITY_MINUTES`
    /// from the environment, keeping the defaults for anything unset or
    /// unparseable.
    pub fn from_env() -> Self {
        dotenv().ok();
        let defaults = EngineConfig::default();
        EngineConfig {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            weekly_off_day: env::var("WEEKLY_OFF_DAY")
                .ok()
                .and_then(|v| v.parse::<Weekday>().ok())
                .unwrap_or(defaults.weekly_off_day),
            slot_granularity_minutes: env::var("SLOT_GRANULARITY_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&m| m > 0)
                .unwrap_or(defaults.slot_granularity_minutes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_policy() {
        let config = EngineConfig::default();
        assert_eq!(config.weekly_off_day, Weekday::Mon);
        assert_eq!(config.slot_granularity_minutes, 60);
    }

    #[test]
    fn weekday_names_parse() {
        assert_eq!("tuesday".parse::<Weekday>().unwrap(), Weekday::Tue);
        assert_eq!("sun".parse::<Weekday>().unwrap(), Weekday::Sun);
    }
}
