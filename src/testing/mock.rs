extern crate std;

use std::vec::Vec;

use core::convert::Infallible;

use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::digital::Wait;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::Regulator;

const REG_SPAN: usize = 16;

/// Word-protocol register file standing in for the device on the bus.
///
/// Reads come from per-register scripts first (one value per read, in
/// order), then fall back to the backing store. Writes land in the backing
/// store and a chronological log.
#[derive(Debug, Default)]
pub(crate) struct MockBus {
  regs: [u16; REG_SPAN],
  scripts: [Vec<u16>; REG_SPAN],
  cursors: [usize; REG_SPAN],
  read_counts: [u32; REG_SPAN],
  failing_reads: [bool; REG_SPAN],
  failing_writes: [bool; REG_SPAN],
  writes: Vec<(u8, u16)>,
  pointer: u8,
}

impl MockBus {
  fn slot(reg: u8) -> usize {
    (reg as usize) % REG_SPAN
  }

  pub(crate) fn set_reg(&mut self, reg: u8, value: u16) {
    self.regs[Self::slot(reg)] = value;
  }

  pub(crate) fn script_reads(&mut self, reg: u8, values: &[u16]) {
    self.scripts[Self::slot(reg)].extend_from_slice(values);
  }

  pub(crate) fn fail_reads(&mut self, reg: u8) {
    self.failing_reads[Self::slot(reg)] = true;
  }

  pub(crate) fn fail_writes(&mut self, reg: u8) {
    self.failing_writes[Self::slot(reg)] = true;
  }

  pub(crate) fn writes(&self) -> &[(u8, u16)] {
    &self.writes
  }

  pub(crate) fn reads_of(&self, reg: u8) -> u32 {
    self.read_counts[Self::slot(reg)]
  }
}

impl ErrorType for MockBus {
  type Error = ErrorKind;
}

impl I2c<SevenBitAddress> for MockBus {
  async fn transaction(&mut self, _address: u8, operations: &mut [Operation<'_>]) -> Result<(), ErrorKind> {
    for op in operations.iter_mut() {
      match op {
        Operation::Write(data) => match **data {
          [reg] => self.pointer = reg,
          [reg, lo, hi] => {
            let slot = Self::slot(reg);
            if self.failing_writes[slot] {
              return Err(ErrorKind::Other);
            }
            let value = u16::from_le_bytes([lo, hi]);
            self.regs[slot] = value;
            self.writes.push((reg, value));
          }
          _ => return Err(ErrorKind::Other),
        },
        Operation::Read(buffer) => {
          let slot = Self::slot(self.pointer);
          self.read_counts[slot] += 1;
          if self.failing_reads[slot] {
            return Err(ErrorKind::Other);
          }
          let value = if self.cursors[slot] < self.scripts[slot].len() {
            let scripted = self.scripts[slot][self.cursors[slot]];
            self.cursors[slot] += 1;
            scripted
          } else {
            self.regs[slot]
          };
          buffer.copy_from_slice(&value.to_le_bytes());
        }
      }
    }
    Ok(())
  }
}

/// Delay that records one entry per requested wait, in milliseconds.
#[derive(Debug, Default)]
pub(crate) struct MockDelay {
  pub(crate) delays_ms: Vec<u32>,
}

impl DelayNs for MockDelay {
  async fn delay_ns(&mut self, ns: u32) {
    self.delays_ms.push(ns / 1_000_000);
  }

  async fn delay_us(&mut self, us: u32) {
    self.delays_ms.push(us / 1_000);
  }

  async fn delay_ms(&mut self, ms: u32) {
    self.delays_ms.push(ms);
  }
}

/// Interrupt line that always has an edge pending.
#[derive(Debug, Default)]
pub(crate) struct MockIntPin;

impl embedded_hal::digital::ErrorType for MockIntPin {
  type Error = Infallible;
}

impl Wait for MockIntPin {
  async fn wait_for_high(&mut self) -> Result<(), Infallible> {
    Ok(())
  }

  async fn wait_for_low(&mut self) -> Result<(), Infallible> {
    Ok(())
  }

  async fn wait_for_rising_edge(&mut self) -> Result<(), Infallible> {
    Ok(())
  }

  async fn wait_for_falling_edge(&mut self) -> Result<(), Infallible> {
    Ok(())
  }

  async fn wait_for_any_edge(&mut self) -> Result<(), Infallible> {
    Ok(())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RailFault;

#[derive(Debug, Default)]
pub(crate) struct MockRegulator {
  pub(crate) enabled: bool,
  pub(crate) enables: u32,
  pub(crate) disables: u32,
  pub(crate) fail_enable: bool,
  pub(crate) fail_disable: bool,
}

impl Regulator for MockRegulator {
  type Error = RailFault;

  async fn enable(&mut self) -> Result<(), RailFault> {
    self.enables += 1;
    if self.fail_enable {
      return Err(RailFault);
    }
    self.enabled = true;
    Ok(())
  }

  async fn disable(&mut self) -> Result<(), RailFault> {
    self.disables += 1;
    if self.fail_disable {
      return Err(RailFault);
    }
    self.enabled = false;
    Ok(())
  }
}
