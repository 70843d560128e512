use crate::reg::{AlsIntegrationTime, LedCurrent, PsDuty, PsIntegrationTime};
use crate::ALS_DEFAULT_POLL_DELAY_MS;

/// Tuning values for one sensor instance.
///
/// All register-field values are typed, so a `Config` is valid by
/// construction. Boards that carry the tuning as raw integers go through
/// [`RawConfig`], which is where the table indices are validated.
#[derive(Debug, Clone, Copy, defmt::Format)]
pub struct Config {
  pub ps_duty: PsDuty,
  pub ps_integration_time: PsIntegrationTime,
  pub ps_led_current: LedCurrent,
  /// Proximity counts above this report "close".
  pub ps_close_threshold: u16,
  /// Proximity counts below this report "away".
  pub ps_away_threshold: u16,
  /// Ambient-light range selector; also the ALS integration time.
  pub als_range: AlsIntegrationTime,
  /// Per-board scale factor for the calibrated light level, in percent.
  pub als_fitness: u16,
  /// Requested ambient-light poll interval in milliseconds.
  pub poll_delay_ms: u16,
}

impl Config {
  pub const fn new() -> Self {
    Self {
      ps_duty: PsDuty::OneOf40,
      ps_integration_time: PsIntegrationTime::T1,
      ps_led_current: LedCurrent::Ma100,
      ps_close_threshold: 100,
      ps_away_threshold: 50,
      als_range: AlsIntegrationTime::Ms80,
      als_fitness: 100,
      poll_delay_ms: ALS_DEFAULT_POLL_DELAY_MS,
    }
  }

  pub const fn with_ps_duty(mut self, duty: PsDuty) -> Self {
    self.ps_duty = duty;
    self
  }

  pub const fn with_ps_integration_time(mut self, it: PsIntegrationTime) -> Self {
    self.ps_integration_time = it;
    self
  }

  pub const fn with_ps_led_current(mut self, current: LedCurrent) -> Self {
    self.ps_led_current = current;
    self
  }

  pub const fn with_ps_thresholds(mut self, close: u16, away: u16) -> Self {
    self.ps_close_threshold = close;
    self.ps_away_threshold = away;
    self
  }

  pub const fn with_als_range(mut self, range: AlsIntegrationTime) -> Self {
    self.als_range = range;
    self
  }

  pub const fn with_als_fitness(mut self, percent: u16) -> Self {
    self.als_fitness = percent;
    self
  }
}

impl Default for Config {
  fn default() -> Self {
    Self::new()
  }
}

/// Tuning values as raw platform integers, the way board data carries them.
#[derive(Debug, Clone, Copy, defmt::Format)]
pub struct RawConfig {
  pub ps_duty: u8,
  pub ps_integration_time: u8,
  pub ps_led_current: u8,
  pub ps_close_threshold: u16,
  pub ps_away_threshold: u16,
  pub als_range: u8,
  pub als_fitness: u16,
}

/// A raw platform value fell outside its lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum ConfigError {
  DutyIndex(u8),
  IntegrationTimeIndex(u8),
  LedCurrentIndex(u8),
  RangeIndex(u8),
}

impl TryFrom<RawConfig> for Config {
  type Error = ConfigError;

  fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
    let ps_duty = PsDuty::from_index(raw.ps_duty as usize).ok_or(ConfigError::DutyIndex(raw.ps_duty))?;
    let ps_integration_time = PsIntegrationTime::from_index(raw.ps_integration_time as usize)
      .ok_or(ConfigError::IntegrationTimeIndex(raw.ps_integration_time))?;
    let ps_led_current =
      LedCurrent::from_index(raw.ps_led_current as usize).ok_or(ConfigError::LedCurrentIndex(raw.ps_led_current))?;
    let als_range = AlsIntegrationTime::from_index(raw.als_range as usize).ok_or(ConfigError::RangeIndex(raw.als_range))?;

    Ok(
      Config::new()
        .with_ps_duty(ps_duty)
        .with_ps_integration_time(ps_integration_time)
        .with_ps_led_current(ps_led_current)
        .with_ps_thresholds(raw.ps_close_threshold, raw.ps_away_threshold)
        .with_als_range(als_range)
        .with_als_fitness(raw.als_fitness),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn raw() -> RawConfig {
    RawConfig {
      ps_duty: 2,
      ps_integration_time: 7,
      ps_led_current: 3,
      ps_close_threshold: 120,
      ps_away_threshold: 80,
      als_range: 1,
      als_fitness: 95,
    }
  }

  #[test]
  fn raw_values_resolve_through_the_tables() {
    let config = Config::try_from(raw()).unwrap();
    assert_eq!(config.ps_duty, PsDuty::OneOf160);
    assert_eq!(config.ps_integration_time, PsIntegrationTime::T8);
    assert_eq!(config.ps_led_current, LedCurrent::Ma120);
    assert_eq!(config.als_range, AlsIntegrationTime::Ms160);
    assert_eq!(config.ps_close_threshold, 120);
    assert_eq!(config.ps_away_threshold, 80);
    assert_eq!(config.als_fitness, 95);
  }

  #[test]
  fn out_of_table_indices_are_rejected() {
    let bad = RawConfig { ps_duty: 4, ..raw() };
    assert_eq!(Config::try_from(bad).unwrap_err(), ConfigError::DutyIndex(4));

    let bad = RawConfig { ps_integration_time: 8, ..raw() };
    assert_eq!(Config::try_from(bad).unwrap_err(), ConfigError::IntegrationTimeIndex(8));

    let bad = RawConfig { ps_led_current: 9, ..raw() };
    assert_eq!(Config::try_from(bad).unwrap_err(), ConfigError::LedCurrentIndex(9));

    let bad = RawConfig { als_range: 4, ..raw() };
    assert_eq!(Config::try_from(bad).unwrap_err(), ConfigError::RangeIndex(4));
  }
}
