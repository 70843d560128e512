use embedded_hal_async::delay::DelayNs;

/// Nominal VDD supply window, in microvolts, for platform adapters that
/// program their regulators before handing them over.
pub const VDD_RANGE_UV: (u32, u32) = (2_750_000, 2_950_000);
/// Nominal I2C-side VIO supply window, in microvolts.
pub const VIO_RANGE_UV: (u32, u32) = (1_750_000, 1_950_000);

/// Settle time after both rails come up, before the device accepts traffic.
pub const POWER_SETTLE_MS: u32 = 80;

/// Control over one supply rail feeding the sensor.
///
/// Rail acquisition and voltage programming stay with the platform; the
/// driver only sequences enables and disables through this capability.
#[allow(async_fn_in_trait)]
pub trait Regulator {
  type Error;

  async fn enable(&mut self) -> Result<(), Self::Error>;
  async fn disable(&mut self) -> Result<(), Self::Error>;
}

/// The sensor's VDD + VIO supply pair with ordered bring-up and tear-down.
pub struct PowerRails<VDD, VIO> {
  vdd: VDD,
  vio: VIO,
  on: bool,
}

impl<VDD, VIO> PowerRails<VDD, VIO> {
  pub const fn new(vdd: VDD, vio: VIO) -> Self {
    Self { vdd, vio, on: false }
  }

  pub const fn is_on(&self) -> bool {
    self.on
  }

  /// Give the rails back to the platform.
  pub fn release(self) -> (VDD, VIO) {
    (self.vdd, self.vio)
  }
}

impl<VDD, VIO, P> PowerRails<VDD, VIO>
where
  VDD: Regulator<Error = P>,
  VIO: Regulator<Error = P>,
{
  /// Bring both rails up: VDD first, then VIO. If VIO fails, VDD is rolled
  /// back before the error surfaces. Waits out the device settle time once
  /// both rails are up. No-op when already on.
  pub async fn switch_on<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), P> {
    if self.on {
      return Ok(());
    }

    self.vdd.enable().await?;
    if let Err(e) = self.vio.enable().await {
      _ = self.vdd.disable().await;
      return Err(e);
    }

    self.on = true;
    delay.delay_ms(POWER_SETTLE_MS).await;
    Ok(())
  }

  /// Drop both rails, VDD first. A rail that refuses to turn off leaves the
  /// pair marked on so a later attempt retries the full sequence.
  pub async fn switch_off(&mut self) -> Result<(), P> {
    if !self.on {
      return Ok(());
    }

    self.vdd.disable().await?;
    self.vio.disable().await?;
    self.on = false;
    Ok(())
  }
}
