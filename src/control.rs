use embedded_hal_async::digital::Wait;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::reg::{AlsConf, PsConf12};
use crate::{Cm36686, Error, Reg, Regulator};

/// Number of command codes covered by the debug dump.
pub const REGISTER_DUMP_LEN: usize = 12;

impl<I, E, INT, VDD, VIO, P> Cm36686<I, INT, VDD, VIO>
where
  I: I2c<SevenBitAddress, Error = E>,
  INT: Wait,
  VDD: Regulator<Error = P>,
  VIO: Regulator<Error = P>,
{
  /// Read the raw proximity counts, for synchronous attribute queries.
  pub async fn ps_raw_reading(&mut self) -> Result<u16, Error<E, P>> {
    self.read_word(Reg::PsData).await
  }

  /// Dump the configuration and data registers for debugging.
  pub async fn register_dump(&mut self) -> Result<[u16; REGISTER_DUMP_LEN], Error<E, P>> {
    let mut out = [0u16; REGISTER_DUMP_LEN];
    for (addr, slot) in out.iter_mut().enumerate() {
      *slot = self.read_word_at(addr as u8).await?;
    }
    Ok(out)
  }

  /// Debug write of the full PS_CONF1/2 image, bypassing all validation.
  /// The shadow copy follows the device so later field updates start from
  /// what was written here.
  pub async fn write_ps_conf_raw(&mut self, value: u16) -> Result<(), Error<E, P>> {
    self.ps_conf12 = PsConf12::from_bits(value);
    self.write_word(Reg::PsConf12, value).await
  }

  /// Debug write of the full ALS_CONF image, bypassing all validation.
  pub async fn write_als_conf_raw(&mut self, value: u16) -> Result<(), Error<E, P>> {
    self.als_conf = AlsConf::from_bits(value);
    self.write_word(Reg::AlsConf, value).await
  }

  pub fn close_threshold(&self) -> u16 {
    self.ps_close_thd
  }

  pub fn away_threshold(&self) -> u16 {
    self.ps_away_thd
  }

  /// Stage and program the close (upper) proximity threshold.
  ///
  /// 0 and 65535 are rejected outright. A valid value is always retained;
  /// while the channel is not configured the call still reports
  /// [`Error::NotConfigured`] and the value waits for the next enable.
  pub async fn set_close_threshold(&mut self, value: u16) -> Result<(), Error<E, P>> {
    if value == 0 || value == u16::MAX {
      return Err(Error::InvalidParam);
    }
    self.ps_close_thd = value;
    if !self.ps_configured {
      return Err(Error::NotConfigured);
    }
    self.write_word(Reg::PsThdh, value).await
  }

  /// Stage and program the away (lower) proximity threshold. Same contract
  /// as [`Self::set_close_threshold`].
  pub async fn set_away_threshold(&mut self, value: u16) -> Result<(), Error<E, P>> {
    if value == 0 || value == u16::MAX {
      return Err(Error::InvalidParam);
    }
    self.ps_away_thd = value;
    if !self.ps_configured {
      return Err(Error::NotConfigured);
    }
    self.write_word(Reg::PsThdl, value).await
  }
}

#[cfg(test)]
mod tests {
  use futures::executor::block_on;

  use super::*;
  use crate::testing::{attached, MockBus, MockDelay};
  use crate::Config;

  const PS_THDL: u8 = Reg::PsThdl as u8;
  const PS_THDH: u8 = Reg::PsThdh as u8;
  const PS_DATA: u8 = Reg::PsData as u8;

  #[test]
  fn threshold_round_trips_while_configured() {
    let mut bus = MockBus::default();
    bus.script_reads(PS_DATA, &[30]);
    let mut sensor = attached(bus, Config::new());
    let mut delay = MockDelay::default();
    block_on(sensor.set_ps_enabled(true, &mut delay)).unwrap();

    block_on(sensor.set_close_threshold(300)).unwrap();
    block_on(sensor.set_away_threshold(200)).unwrap();

    assert_eq!(sensor.close_threshold(), 300);
    assert_eq!(sensor.away_threshold(), 200);
    let writes = sensor.i2c.writes();
    assert!(writes.contains(&(PS_THDH, 300)));
    assert!(writes.contains(&(PS_THDL, 200)));
  }

  #[test]
  fn threshold_set_while_unconfigured_is_reported_but_retained() {
    let mut bus = MockBus::default();
    bus.script_reads(PS_DATA, &[30]);
    let mut sensor = attached(bus, Config::new());

    let err = block_on(sensor.set_close_threshold(300)).unwrap_err();
    assert!(matches!(err, Error::NotConfigured));
    assert_eq!(sensor.close_threshold(), 300);
    assert!(sensor.i2c.writes().is_empty());

    // The retained value is what the next enable programs.
    let mut delay = MockDelay::default();
    block_on(sensor.set_ps_enabled(true, &mut delay)).unwrap();
    assert_eq!(*sensor.i2c.writes().last().unwrap(), (Reg::PsConf12 as u8, 0x0320));
    assert!(sensor.i2c.writes().contains(&(PS_THDH, 300)));
  }

  #[test]
  fn degenerate_thresholds_are_rejected_and_not_stored() {
    let mut sensor = attached(MockBus::default(), Config::new());

    let err = block_on(sensor.set_close_threshold(0)).unwrap_err();
    assert!(matches!(err, Error::InvalidParam));
    let err = block_on(sensor.set_away_threshold(u16::MAX)).unwrap_err();
    assert!(matches!(err, Error::InvalidParam));

    assert_eq!(sensor.close_threshold(), 100);
    assert_eq!(sensor.away_threshold(), 50);
  }

  #[test]
  fn register_dump_covers_the_command_codes_below_the_id() {
    let mut bus = MockBus::default();
    bus.set_reg(Reg::PsConf12 as u8, 0x0321);
    bus.set_reg(Reg::WhiteData as u8, 0xBEEF);
    let mut sensor = attached(bus, Config::new());

    let dump = block_on(sensor.register_dump()).unwrap();
    assert_eq!(dump.len(), REGISTER_DUMP_LEN);
    assert_eq!(dump[Reg::PsConf12 as usize], 0x0321);
    assert_eq!(dump[Reg::WhiteData as usize], 0xBEEF);
  }

  #[test]
  fn raw_conf_writes_update_the_shadow_images() {
    let mut sensor = attached(MockBus::default(), Config::new());

    block_on(sensor.write_ps_conf_raw(0x0B21)).unwrap();
    block_on(sensor.write_als_conf_raw(0x00C1)).unwrap();

    assert_eq!(sensor.ps_conf12.into_bits(), 0x0B21);
    assert_eq!(sensor.als_conf.into_bits(), 0x00C1);
    assert_eq!(
      sensor.i2c.writes(),
      [(Reg::PsConf12 as u8, 0x0B21), (Reg::AlsConf as u8, 0x00C1)]
    );
  }

  #[test]
  fn raw_proximity_reading_passes_through() {
    let mut bus = MockBus::default();
    bus.set_reg(PS_DATA, 0x0123);
    let mut sensor = attached(bus, Config::new());

    assert_eq!(block_on(sensor.ps_raw_reading()).unwrap(), 0x0123);
  }
}
