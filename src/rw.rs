use embedded_hal_async::digital::Wait;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::reg::I2C_ADDR;
use crate::{Cm36686, Error, Reg, Regulator};

impl<I, E, INT, VDD, VIO, P> Cm36686<I, INT, VDD, VIO>
where
  I: I2c<SevenBitAddress, Error = E>,
  INT: Wait,
  VDD: Regulator<Error = P>,
  VIO: Regulator<Error = P>,
{
  /// Read one 16-bit register. The device speaks a word protocol: a command
  /// code byte followed by a little-endian data word.
  pub(crate) async fn read_word(&mut self, reg: Reg) -> Result<u16, Error<E, P>> {
    self.read_word_at(reg.into()).await
  }

  /// Read a 16-bit register by raw command code, for the debug dump path.
  pub(crate) async fn read_word_at(&mut self, addr: u8) -> Result<u16, Error<E, P>> {
    let mut buf = [0u8; 2];
    self.i2c.write_read(I2C_ADDR, &[addr], &mut buf).await.map_err(Error::I2c)?;
    Ok(u16::from_le_bytes(buf))
  }

  pub(crate) async fn write_word(&mut self, reg: Reg, value: u16) -> Result<(), Error<E, P>> {
    let [lo, hi] = value.to_le_bytes();
    self.i2c.write(I2C_ADDR, &[reg.into(), lo, hi]).await.map_err(Error::I2c)
  }
}
