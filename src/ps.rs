use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::digital::Wait;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::reg::{IntFlag, PsInterruptMode, PsPersistence};
use crate::{Cm36686, DistanceReport, Error, PsEvent, Reg, Regulator};

impl<I, E, INT, VDD, VIO, P> Cm36686<I, INT, VDD, VIO>
where
  I: I2c<SevenBitAddress, Error = E>,
  INT: Wait,
  VDD: Regulator<Error = P>,
  VIO: Regulator<Error = P>,
{
  /// Toggle the proximity channel from the control surface.
  ///
  /// Unlike the ambient-light channel this is never idempotent: every call
  /// re-runs the full configuration and calibration sequence. On success the
  /// forced far report is handed back; consumers emit it so they start from
  /// a known distance state after any toggle.
  pub async fn set_ps_enabled<D: DelayNs>(&mut self, enabled: bool, delay: &mut D) -> Result<DistanceReport, Error<E, P>> {
    if enabled {
      self.ps_function_on(delay).await?;
    } else {
      self.ps_function_off().await?;
    }
    Ok(DistanceReport::far())
  }

  /// Program and power the proximity channel.
  ///
  /// The threshold window opens fully first so the calibration samples run
  /// interrupt-free; the real window is programmed after calibration, right
  /// before the power-on bit. A calibration that does not converge is not an
  /// error here; the channel runs with the staged cancellation value.
  pub(crate) async fn ps_function_on<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<E, P>> {
    self.write_word(Reg::PsThdl, 0).await?;
    self.write_word(Reg::PsThdh, u16::MAX).await?;

    self.ps_conf3.set_led_current(self.config.ps_led_current);
    self.write_word(Reg::PsConf3, self.ps_conf3.into_bits()).await?;

    self.ps_conf12.set_duty(self.config.ps_duty);
    self.ps_conf12.set_integration_time(self.config.ps_integration_time);
    self.ps_conf12.set_extended_output(false);
    self.ps_conf12.set_persistence(PsPersistence::P3);
    self.ps_conf12.set_interrupt_mode(PsInterruptMode::Both);

    _ = self.calibrate_crosstalk(delay).await;

    self.write_word(Reg::PsThdl, self.ps_away_thd).await?;
    self.write_word(Reg::PsThdh, self.ps_close_thd).await?;

    self.ps_conf12.set_shutdown(false);
    self.write_word(Reg::PsConf12, self.ps_conf12.into_bits()).await?;

    self.ps_configured = true;
    Ok(())
  }

  /// Disarm the interrupt sources and shut the proximity block down. The
  /// configured flag only clears once the device took the write.
  pub(crate) async fn ps_function_off(&mut self) -> Result<(), Error<E, P>> {
    self.ps_conf12.set_interrupt_mode(PsInterruptMode::Off);
    self.ps_conf12.set_shutdown(true);
    self.write_word(Reg::PsConf12, self.ps_conf12.into_bits()).await?;

    self.ps_configured = false;
    Ok(())
  }

  /// Await the next edge on the proximity interrupt line and service it.
  ///
  /// Edges that arrive while the channel is not configured are dropped
  /// (`None`) without touching the bus. The flag read happens here, outside
  /// any interrupt context, because it may block on bus arbitration.
  pub async fn ps_next_event(&mut self) -> Result<Option<PsEvent>, Error<E, P>> {
    self.int.wait_for_falling_edge().await.map_err(|_| unreachable!())?;

    if !self.ps_configured {
      return Ok(None);
    }
    Ok(Some(self.service_ps_interrupt().await))
  }

  /// Read and classify the interrupt flag register.
  ///
  /// Every ambiguous outcome (saturation, contradictory flags, no flags,
  /// or a failed read) resolves to a far determination with a wake-hold
  /// request, so a consumer never sleeps through a questionable reading.
  pub async fn service_ps_interrupt(&mut self) -> PsEvent {
    let Ok(raw) = self.read_word(Reg::IntFlag).await else {
      return PsEvent::ReadFailed;
    };
    let flags = IntFlag::from_bits(raw);

    if flags.ps_saturated() {
      PsEvent::Saturated
    } else if flags.ps_close() && flags.ps_away() {
      PsEvent::Inconsistent
    } else if flags.ps_close() {
      PsEvent::Near
    } else if flags.ps_away() {
      PsEvent::Away
    } else {
      PsEvent::Spurious
    }
  }
}
