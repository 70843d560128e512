#![no_std]

//! Async, `no_std` driver for the Capella CM36686 combined ambient-light and
//! proximity optical sensor.
//!
//! The CM36686 pairs a proximity channel (IRED emitter + photodiode with an
//! interrupt engine) with an ambient-light ADC behind a word-wide I²C
//! register file. This crate exposes a strongly typed API on top of the raw
//! register map, with:
//!
//! - Typed shadow images of the packed configuration registers, so field
//!   updates never clobber neighbouring bits
//! - The crosstalk self-calibration routine that nulls the stray-light
//!   offset out of the proximity channel at enable time
//! - Interrupt-driven near/far determinations with the saturation
//!   protection-mode rules folded in
//! - A polled ambient-light channel producing calibrated levels
//! - Ordered supply-rail sequencing with rollback on partial failure
//! - `embedded-hal` / `embedded-hal-async` 1.0 traits so the driver works
//!   across MCU families
//!
//! ```no_run
//! use embedded_hal_async::delay::DelayNs;
//! use embedded_hal_async::digital::Wait;
//! use embedded_hal_async::i2c::{I2c, SevenBitAddress};
//! use cm36686::{Cm36686, Config, PowerRails, Regulator};
//!
//! async fn example<I2C, INT, VDD, VIO, E, P>(
//!   i2c: I2C,
//!   int: INT,
//!   vdd: VDD,
//!   vio: VIO,
//!   delay: &mut impl DelayNs,
//! ) -> Result<(), cm36686::Error<E, P>>
//! where
//!   I2C: I2c<SevenBitAddress, Error = E>,
//!   INT: Wait,
//!   VDD: Regulator<Error = P>,
//!   VIO: Regulator<Error = P>,
//! {
//!   let config = Config::new().with_ps_thresholds(120, 80);
//!   let mut sensor = Cm36686::new(i2c, int, PowerRails::new(vdd, vio), config);
//!   sensor.attach(delay).await?;
//!
//!   let report = sensor.set_ps_enabled(true, delay).await?;
//!   // push report.samples() onto the distance axis, then sync
//!   loop {
//!     if let Some(event) = sensor.ps_next_event().await? {
//!       let _ = (event.report().samples(), event.holds_wake());
//!     }
//!   }
//! }
//! ```
//!
//! The ambient-light channel runs as its own polling chain; drive
//! [`Cm36686::als_poll`] from a task and stop when it says so:
//!
//! ```no_run
//! # async fn poll_loop<I2C, INT, VDD, VIO, E, P>(
//! #   mut sensor: cm36686::Cm36686<I2C, INT, VDD, VIO>,
//! #   delay: &mut impl embedded_hal_async::delay::DelayNs,
//! # ) -> Result<(), cm36686::Error<E, P>>
//! # where
//! #   I2C: embedded_hal_async::i2c::I2c<Error = E>,
//! #   INT: embedded_hal_async::digital::Wait,
//! #   VDD: cm36686::Regulator<Error = P>,
//! #   VIO: cm36686::Regulator<Error = P>,
//! # {
//! sensor.set_als_enabled(true).await?;
//! loop {
//!   match sensor.als_poll(delay).await? {
//!     cm36686::AlsPoll::Sample(level) => { /* report the level */ }
//!     _ => break,
//!   }
//! }
//! # Ok(())
//! # }
//! ```

mod als;
mod calib;
mod config;
mod control;
mod event;
mod power;
mod ps;
mod reg;
mod rw;
#[cfg(test)]
mod testing;

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::digital::Wait;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

pub use als::{ALS_DEFAULT_POLL_DELAY_MS, ALS_MAX_POLL_DELAY_MS, ALS_MIN_POLL_DELAY_MS};
pub use calib::{Crosstalk, PS_CROSSTALK_MAX};
pub use config::*;
pub use control::REGISTER_DUMP_LEN;
pub use event::*;
pub use power::*;
use reg::PRODUCT_ID;
pub use reg::{
  AlsConf, AlsIntegrationTime, AlsPersistence, IntFlag, LedCurrent, PsConf12, PsConf3, PsDuty, PsIntegrationTime,
  PsInterruptMode, Reg,
};

/// Errors that can occur while interacting with the sensor.
#[derive(Debug, defmt::Format)]
pub enum Error<E, P> {
  /// I²C bus transaction failed with the underlying driver error.
  I2c(E),
  /// A supply rail operation failed with the underlying platform error.
  Power(P),
  /// The device reported an unexpected product identifier during bring-up.
  InvalidChipId(u8),
  /// A parameter was outside its documented range.
  InvalidParam,
  /// The operation needs the channel programmed on the device first.
  NotConfigured,
}

/// Driver state for one CM36686 instance.
///
/// The driver owns the I²C peripheral, the interrupt line, and the supply
/// rails, and keeps the authoritative shadow copies of the configuration
/// registers. Every register transaction goes through `&mut self`, which
/// serializes the proximity service path, the ambient-light poll path, and
/// control-surface queries against each other.
pub struct Cm36686<I, INT, VDD, VIO> {
  i2c: I,
  int: INT,
  power: PowerRails<VDD, VIO>,
  config: Config,

  als_conf: AlsConf,
  als_enabled: bool,
  als_configured: bool,
  poll_delay_ms: u16,

  ps_conf12: PsConf12,
  ps_conf3: PsConf3,
  ps_configured: bool,
  ps_close_thd: u16,
  ps_away_thd: u16,

  crosstalk: Crosstalk,
  last_ps_canc: u16,
}

impl<I, E, INT, VDD, VIO, P> Cm36686<I, INT, VDD, VIO>
where
  I: I2c<SevenBitAddress, Error = E>,
  INT: Wait,
  VDD: Regulator<Error = P>,
  VIO: Regulator<Error = P>,
{
  /// Create a new driver instance with the provided peripherals and
  /// configuration. Nothing is transmitted until [`Cm36686::attach`].
  pub fn new(i2c: I, int: INT, power: PowerRails<VDD, VIO>, config: Config) -> Self {
    Self {
      i2c,
      int,
      power,
      als_conf: AlsConf::new(),
      als_enabled: false,
      als_configured: false,
      poll_delay_ms: config.poll_delay_ms,
      ps_conf12: PsConf12::new(),
      ps_conf3: PsConf3::new(),
      ps_configured: false,
      ps_close_thd: config.ps_close_threshold,
      ps_away_thd: config.ps_away_threshold,
      crosstalk: Crosstalk::default(),
      last_ps_canc: 0,
      config,
    }
  }

  /// Power the device and verify its identity.
  ///
  /// Brings the supply rails up in order, checks the product identifier,
  /// and resets the shadow registers to the power-on state. A failed
  /// identity check unwinds what was acquired, in reverse order, before the
  /// error surfaces.
  pub async fn attach<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<E, P>> {
    self.power.switch_on(delay).await.map_err(Error::Power)?;

    if let Err(e) = self.verify_device().await {
      _ = self.power.switch_off().await;
      return Err(e);
    }

    self.als_conf = AlsConf::new();
    self.ps_conf12 = PsConf12::new();
    self.ps_conf3 = PsConf3::new();
    self.crosstalk = Crosstalk::default();
    self.last_ps_canc = 0;
    Ok(())
  }

  /// Drop the supply rails.
  pub async fn detach(&mut self) -> Result<(), Error<E, P>> {
    self.power.switch_off().await.map_err(Error::Power)
  }

  /// Quiesce for system suspend.
  ///
  /// The ambient-light function is forced off so a stale configuration does
  /// not survive the power transition; its polling chain is expected to stop
  /// on its own. The proximity interrupt stays armed as the wake source.
  pub async fn suspend(&mut self) -> Result<(), Error<E, P>> {
    if self.als_enabled {
      self.als_function_off().await?;
    }
    Ok(())
  }

  /// Whether the ambient-light polling chain must be restarted after a
  /// system resume. The first tick reprograms the device.
  pub fn resume(&self) -> bool {
    self.als_enabled
  }

  pub fn is_powered(&self) -> bool {
    self.power.is_on()
  }

  pub fn is_als_enabled(&self) -> bool {
    self.als_enabled
  }

  /// Whether the ambient-light registers are currently programmed.
  pub fn is_als_configured(&self) -> bool {
    self.als_configured
  }

  /// Whether the proximity registers are currently programmed.
  pub fn is_ps_configured(&self) -> bool {
    self.ps_configured
  }

  /// Counters from the most recent crosstalk calibration run.
  pub fn crosstalk(&self) -> Crosstalk {
    self.crosstalk
  }

  /// The cancellation value of the last calibration run that converged.
  pub fn last_cancellation(&self) -> u16 {
    self.last_ps_canc
  }

  /// Consume the driver and give the peripherals back.
  pub fn release(self) -> (I, INT, PowerRails<VDD, VIO>) {
    (self.i2c, self.int, self.power)
  }

  async fn verify_device(&mut self) -> Result<(), Error<E, P>> {
    let id = self.read_word(Reg::DeviceId).await? & 0x00FF;
    if id != u16::from(PRODUCT_ID) {
      return Err(Error::InvalidChipId(id as u8));
    }
    Ok(())
  }
}
