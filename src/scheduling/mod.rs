//! Availability engine: regime resolution, slot generation, occupancy and reports

pub mod occupancy;
pub mod regime;
pub mod reports;
pub mod scope;
pub mod slots;

use chrono_tz::Tz;

use crate::config::SchedulingConfig;

pub use regime::{EffectiveWindow, ExceptionPolicy};
pub use scope::{Period, Scope, SlotFilter, SlotQuery};

/// Engine-wide settings derived from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleSettings {
    /// Timezone of regime wall-clock times
    pub timezone: Tz,
    pub exceptions: ExceptionPolicy,
    /// Longest range query, in calendar days
    pub max_range_days: u32,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            exceptions: ExceptionPolicy::WeekdayOnly,
            max_range_days: 366,
        }
    }
}

impl ScheduleSettings {
    pub fn from_config(config: &SchedulingConfig) -> Result<Self, config::ConfigError> {
        Ok(Self {
            timezone: config.tz()?,
            exceptions: if config.apply_regime_exceptions {
                ExceptionPolicy::HonourExceptions
            } else {
                ExceptionPolicy::WeekdayOnly
            },
            max_range_days: config.max_range_days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_from_config() {
        let config = SchedulingConfig {
            timezone: "Europe/Moscow".to_string(),
            apply_regime_exceptions: true,
            max_range_days: 31,
        };
        let settings = ScheduleSettings::from_config(&config).unwrap();
        assert_eq!(settings.timezone, chrono_tz::Europe::Moscow);
        assert_eq!(settings.exceptions, ExceptionPolicy::HonourExceptions);
        assert_eq!(settings.max_range_days, 31);

        let config = SchedulingConfig {
            timezone: "Mars/Olympus".to_string(),
            ..SchedulingConfig::default()
        };
        assert!(ScheduleSettings::from_config(&config).is_err());
    }
}
