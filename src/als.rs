use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::digital::Wait;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::event::ALS_LEVEL_MAX;
use crate::reg::AlsIntegrationTime;
use crate::{AlsPoll, Cm36686, Error, Reg, Regulator};

/// Interval the polling chain actually ticks at.
pub const ALS_DEFAULT_POLL_DELAY_MS: u16 = 500;
pub const ALS_MIN_POLL_DELAY_MS: u16 = 1;
pub const ALS_MAX_POLL_DELAY_MS: u16 = 1000;

/// Wait after programming ALS_CONF before the first reading is meaningful.
const ALS_SETTLE_MS: u32 = 320;

/// Scale raw ADC counts into the calibrated light level.
pub(crate) fn calibrated_level(raw: u16, range: AlsIntegrationTime, fitness: u16) -> u16 {
  let level = u64::from(raw) * (1u64 << range.scale_shift()) * u64::from(fitness) / 100;
  if level > u64::from(ALS_LEVEL_MAX) {
    ALS_LEVEL_MAX
  } else {
    level as u16
  }
}

impl<I, E, INT, VDD, VIO, P> Cm36686<I, INT, VDD, VIO>
where
  I: I2c<SevenBitAddress, Error = E>,
  INT: Wait,
  VDD: Regulator<Error = P>,
  VIO: Regulator<Error = P>,
{
  /// Toggle the ambient-light channel from the control surface.
  ///
  /// Idempotent: asking for the current state is a no-op. Enabling only arms
  /// the channel; the device is programmed lazily by the first poll tick.
  /// Disabling shuts the function down first and keeps the channel marked
  /// enabled when that write fails.
  pub async fn set_als_enabled(&mut self, enabled: bool) -> Result<(), Error<E, P>> {
    if enabled == self.als_enabled {
      return Ok(());
    }
    if !enabled {
      self.als_function_off().await?;
    }
    self.als_enabled = enabled;
    Ok(())
  }

  /// One tick of the ambient-light polling chain.
  ///
  /// Every tick starts with the fixed default interval wait; the
  /// user-configured poll delay is stored for readback but does not steer
  /// the cadence. A `Sample` means the chain continues; `Stopped` and
  /// `Unpowered` end it, as does any bus error.
  pub async fn als_poll<D: DelayNs>(&mut self, delay: &mut D) -> Result<AlsPoll, Error<E, P>> {
    delay.delay_ms(u32::from(ALS_DEFAULT_POLL_DELAY_MS)).await;

    if !self.als_enabled {
      return Ok(AlsPoll::Stopped);
    }
    if !self.power.is_on() {
      return Ok(AlsPoll::Unpowered);
    }
    if !self.als_configured {
      self.als_function_on(delay).await?;
    }

    let raw = self.read_word(Reg::AlsData).await?;
    Ok(AlsPoll::Sample(calibrated_level(raw, self.config.als_range, self.config.als_fitness)))
  }

  /// Program the ambient-light function: integration time per the range
  /// selector, interrupts off, power on, then the settle wait.
  pub(crate) async fn als_function_on<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<E, P>> {
    self.als_conf.set_integration_time(self.config.als_range);
    self.als_conf.set_interrupt_enable(false);
    self.als_conf.set_shutdown(false);
    self.write_word(Reg::AlsConf, self.als_conf.into_bits()).await?;

    delay.delay_ms(ALS_SETTLE_MS).await;
    self.als_configured = true;
    Ok(())
  }

  /// Shut the ambient-light function down. The configured flag only clears
  /// once the device took the write.
  pub(crate) async fn als_function_off(&mut self) -> Result<(), Error<E, P>> {
    self.als_conf.set_shutdown(true);
    self.write_word(Reg::AlsConf, self.als_conf.into_bits()).await?;

    self.als_configured = false;
    Ok(())
  }

  /// Stage the requested poll interval, 1..=1000 ms.
  pub fn set_als_poll_delay(&mut self, delay_ms: u16) -> Result<(), Error<E, P>> {
    if !(ALS_MIN_POLL_DELAY_MS..=ALS_MAX_POLL_DELAY_MS).contains(&delay_ms) {
      return Err(Error::InvalidParam);
    }
    self.poll_delay_ms = delay_ms;
    Ok(())
  }

  pub fn als_poll_delay(&self) -> u16 {
    self.poll_delay_ms
  }
}
