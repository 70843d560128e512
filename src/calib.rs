use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::digital::Wait;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::{Cm36686, Error, Reg, Regulator};

/// Raw proximity counts above this are noise, not crosstalk; samples beyond
/// it are discarded instead of calibrated out.
pub const PS_CROSSTALK_MAX: u16 = 75;

/// Wait between calibration samples; one proximity integration period.
const SAMPLE_INTERVAL_MS: u32 = 18;

const SAMPLE_ROUNDS: usize = 4;

/// Coarse-to-fine counters accumulated while bracketing the stray-light
/// offset of the proximity channel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct Crosstalk {
  hundreds: u16,
  fifties: u16,
  tens: u16,
}

impl Crosstalk {
  /// The cancellation value the counters describe.
  pub const fn cancellation(&self) -> u16 {
    self.hundreds * 100 + self.fifties * 50 + self.tens * 10
  }

  pub const fn hundreds(&self) -> u16 {
    self.hundreds
  }

  pub const fn fifties(&self) -> u16 {
    self.fifties
  }

  pub const fn tens(&self) -> u16 {
    self.tens
  }
}

impl<I, E, INT, VDD, VIO, P> Cm36686<I, INT, VDD, VIO>
where
  I: I2c<SevenBitAddress, Error = E>,
  INT: Wait,
  VDD: Regulator<Error = P>,
  VIO: Regulator<Error = P>,
{
  /// Self-calibrate the proximity crosstalk cancellation.
  ///
  /// Samples the raw proximity counts with the emitter running and brackets
  /// the stray-light offset coarse to fine: each in-range sample lands in
  /// the first nonzero tier of ÷100, ÷50, ÷10, and the partial cumulative
  /// value is staged on the device as it accumulates. Only the tens tier
  /// counts as convergence; it latches the result as the fallback for
  /// future runs and finishes early. When no sample reaches the tens tier
  /// within four rounds, the previous fallback value (zero if none ever
  /// converged) is written instead and the run still reports success.
  ///
  /// Cancellation-register write failures are tolerated mid-run; the
  /// proximity channel proceeds with whatever value is currently staged.
  /// Only a failure to power the proximity block on or off aborts.
  pub async fn calibrate_crosstalk<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<E, P>> {
    // A previously staged offset would skew the samples below.
    _ = self.write_word(Reg::PsCanc, 0).await;
    self.crosstalk = Crosstalk::default();

    self.ps_conf12.set_shutdown(false);
    self.write_word(Reg::PsConf12, self.ps_conf12.into_bits()).await?;

    for _ in 0..SAMPLE_ROUNDS {
      delay.delay_ms(SAMPLE_INTERVAL_MS).await;
      // A failed read counts as an out-of-range sample and skips the round.
      let Ok(sample) = self.read_word(Reg::PsData).await else {
        continue;
      };
      if sample > PS_CROSSTALK_MAX {
        continue;
      }

      if sample / 100 > 0 {
        self.crosstalk.hundreds = sample / 100;
        _ = self.write_word(Reg::PsCanc, self.crosstalk.hundreds * 100).await;
      } else if sample / 50 > 0 {
        self.crosstalk.fifties = sample / 50;
        _ = self
          .write_word(Reg::PsCanc, self.crosstalk.hundreds * 100 + self.crosstalk.fifties * 50)
          .await;
      } else if sample / 10 > 0 {
        self.crosstalk.tens = sample / 10;
        self.last_ps_canc = self.crosstalk.cancellation();
        _ = self.write_word(Reg::PsCanc, self.last_ps_canc).await;

        self.ps_conf12.set_shutdown(true);
        self.write_word(Reg::PsConf12, self.ps_conf12.into_bits()).await?;
        return Ok(());
      }
    }

    // Out of rounds. Fall back to the last value that ever converged; the
    // partial tiers staged above are overwritten on the device but kept in
    // the counters.
    _ = self.write_word(Reg::PsCanc, self.last_ps_canc).await;

    self.ps_conf12.set_shutdown(true);
    self.write_word(Reg::PsConf12, self.ps_conf12.into_bits()).await?;
    Ok(())
  }
}
