/******************************************************************************
 * Refer to CM36686 datasheet for more information, available here:           *
 * - https://www.vishay.com/optical-sensors/                                  *
 * ========================================================================== *
 *                      CM36686 - Registers & Command Codes                   *
*******************************************************************************/

use bitfield_struct::bitfield;

pub(crate) const I2C_ADDR: u8 = 0x60;

/// Low byte of the ID register for a genuine CM36686.
pub(crate) const PRODUCT_ID: u8 = 0x86;

#[allow(dead_code)]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reg {
  // Ambient light channel (0x00..0x02)
  AlsConf = 0x00,
  AlsThdh = 0x01,
  AlsThdl = 0x02,

  // Proximity channel (0x03..0x07)
  PsConf12 = 0x03,
  PsConf3 = 0x04,
  PsCanc = 0x05,
  PsThdl = 0x06,
  PsThdh = 0x07,

  // Read-out and status (0x08..0x0C)
  PsData = 0x08,
  AlsData = 0x09,
  WhiteData = 0x0A,
  IntFlag = 0x0B,
  DeviceId = 0x0C,
}

impl From<Reg> for u8 {
  #[inline]
  fn from(r: Reg) -> Self {
    r as u8
  }
}

/// IRED on/off duty ratio of the proximity emitter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, defmt::Format)]
#[repr(u8)]
pub enum PsDuty {
  OneOf40 = 0b00,
  OneOf80 = 0b01,
  OneOf160 = 0b10,
  OneOf320 = 0b11,
}

impl PsDuty {
  pub(crate) const TABLE: [Self; 4] = [Self::OneOf40, Self::OneOf80, Self::OneOf160, Self::OneOf320];

  /// Look up a duty ratio by its platform index.
  pub const fn from_index(index: usize) -> Option<Self> {
    if index < Self::TABLE.len() { Some(Self::TABLE[index]) } else { None }
  }

  pub(crate) const fn into_bits(self) -> u8 {
    self as _
  }

  pub(crate) const fn from_bits(bits: u8) -> Self {
    match bits & 0b11 {
      0b00 => Self::OneOf40,
      0b01 => Self::OneOf80,
      0b10 => Self::OneOf160,
      _ => Self::OneOf320,
    }
  }
}

/// Proximity integration time, in multiples of the base period T.
#[derive(Clone, Copy, Debug, PartialEq, Eq, defmt::Format)]
#[repr(u8)]
pub enum PsIntegrationTime {
  T1 = 0b000,
  T1_5 = 0b001,
  T2 = 0b010,
  T2_5 = 0b011,
  T3 = 0b100,
  T3_5 = 0b101,
  T4 = 0b110,
  T8 = 0b111,
}

impl PsIntegrationTime {
  pub(crate) const TABLE: [Self; 8] = [
    Self::T1,
    Self::T1_5,
    Self::T2,
    Self::T2_5,
    Self::T3,
    Self::T3_5,
    Self::T4,
    Self::T8,
  ];

  /// Look up an integration time by its platform index.
  pub const fn from_index(index: usize) -> Option<Self> {
    if index < Self::TABLE.len() { Some(Self::TABLE[index]) } else { None }
  }

  pub(crate) const fn into_bits(self) -> u8 {
    self as _
  }

  pub(crate) const fn from_bits(bits: u8) -> Self {
    match bits & 0b111 {
      0b000 => Self::T1,
      0b001 => Self::T1_5,
      0b010 => Self::T2,
      0b011 => Self::T2_5,
      0b100 => Self::T3,
      0b101 => Self::T3_5,
      0b110 => Self::T4,
      _ => Self::T8,
    }
  }
}

/// Consecutive readings required before a proximity interrupt fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, defmt::Format)]
#[repr(u8)]
pub enum PsPersistence {
  P1 = 0b00,
  P2 = 0b01,
  P3 = 0b10,
  P4 = 0b11,
}

impl PsPersistence {
  pub(crate) const fn into_bits(self) -> u8 {
    self as _
  }

  pub(crate) const fn from_bits(bits: u8) -> Self {
    match bits & 0b11 {
      0b00 => Self::P1,
      0b01 => Self::P2,
      0b10 => Self::P3,
      _ => Self::P4,
    }
  }
}

/// Which proximity transitions raise the interrupt line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, defmt::Format)]
#[repr(u8)]
pub enum PsInterruptMode {
  Off = 0b00,
  Close = 0b01,
  Away = 0b10,
  Both = 0b11,
}

impl PsInterruptMode {
  pub(crate) const fn into_bits(self) -> u8 {
    self as _
  }

  pub(crate) const fn from_bits(bits: u8) -> Self {
    match bits & 0b11 {
      0b00 => Self::Off,
      0b01 => Self::Close,
      0b10 => Self::Away,
      _ => Self::Both,
    }
  }
}

/// Drive current of the proximity IRED.
#[derive(Clone, Copy, Debug, PartialEq, Eq, defmt::Format)]
#[repr(u8)]
pub enum LedCurrent {
  Ma50 = 0b000,
  Ma75 = 0b001,
  Ma100 = 0b010,
  Ma120 = 0b011,
  Ma140 = 0b100,
  Ma160 = 0b101,
  Ma180 = 0b110,
  Ma200 = 0b111,
}

impl LedCurrent {
  pub(crate) const TABLE: [Self; 8] = [
    Self::Ma50,
    Self::Ma75,
    Self::Ma100,
    Self::Ma120,
    Self::Ma140,
    Self::Ma160,
    Self::Ma180,
    Self::Ma200,
  ];

  /// Look up a drive current by its platform index.
  pub const fn from_index(index: usize) -> Option<Self> {
    if index < Self::TABLE.len() { Some(Self::TABLE[index]) } else { None }
  }

  pub(crate) const fn into_bits(self) -> u8 {
    self as _
  }

  pub(crate) const fn from_bits(bits: u8) -> Self {
    match bits & 0b111 {
      0b000 => Self::Ma50,
      0b001 => Self::Ma75,
      0b010 => Self::Ma100,
      0b011 => Self::Ma120,
      0b100 => Self::Ma140,
      0b101 => Self::Ma160,
      0b110 => Self::Ma180,
      _ => Self::Ma200,
    }
  }
}

/// Ambient-light integration time. Doubles as the range selector: longer
/// integration trades range for resolution, so the calibrated-level scale
/// factor is `2^(3 - index)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, defmt::Format)]
#[repr(u8)]
pub enum AlsIntegrationTime {
  Ms80 = 0b00,
  Ms160 = 0b01,
  Ms320 = 0b10,
  Ms640 = 0b11,
}

impl AlsIntegrationTime {
  pub(crate) const TABLE: [Self; 4] = [Self::Ms80, Self::Ms160, Self::Ms320, Self::Ms640];

  /// Look up an integration time by its platform range index.
  pub const fn from_index(index: usize) -> Option<Self> {
    if index < Self::TABLE.len() { Some(Self::TABLE[index]) } else { None }
  }

  /// Left shift applied to raw counts for this range.
  pub const fn scale_shift(self) -> u8 {
    3 - (self as u8)
  }

  pub(crate) const fn into_bits(self) -> u8 {
    self as _
  }

  pub(crate) const fn from_bits(bits: u8) -> Self {
    match bits & 0b11 {
      0b00 => Self::Ms80,
      0b01 => Self::Ms160,
      0b10 => Self::Ms320,
      _ => Self::Ms640,
    }
  }
}

/// Consecutive readings required before an ambient-light interrupt fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, defmt::Format)]
#[repr(u8)]
pub enum AlsPersistence {
  P1 = 0b00,
  P2 = 0b01,
  P4 = 0b10,
  P8 = 0b11,
}

impl AlsPersistence {
  pub(crate) const fn into_bits(self) -> u8 {
    self as _
  }

  pub(crate) const fn from_bits(bits: u8) -> Self {
    match bits & 0b11 {
      0b00 => Self::P1,
      0b01 => Self::P2,
      0b10 => Self::P4,
      _ => Self::P8,
    }
  }
}

/// Shadow image of the ALS_CONF register. The driver keeps the authoritative
/// copy; field writes never touch bits outside the field.
#[bitfield(u16)]
#[derive(PartialEq, Eq, defmt::Format)]
pub struct AlsConf {
  pub shutdown: bool,
  pub interrupt_enable: bool,
  #[bits(2)]
  pub persistence: AlsPersistence,
  #[bits(2)]
  __: u8,
  #[bits(2)]
  pub integration_time: AlsIntegrationTime,
  #[bits(8)]
  ___: u8,
}

/// Shadow image of the combined PS_CONF1/PS_CONF2 register pair.
#[bitfield(u16)]
#[derive(PartialEq, Eq, defmt::Format)]
pub struct PsConf12 {
  pub shutdown: bool,
  #[bits(3)]
  pub integration_time: PsIntegrationTime,
  #[bits(2)]
  pub persistence: PsPersistence,
  #[bits(2)]
  pub duty: PsDuty,
  #[bits(2)]
  pub interrupt_mode: PsInterruptMode,
  __: bool,
  /// 16-bit proximity output when set, 12-bit otherwise.
  pub extended_output: bool,
  #[bits(4)]
  ___: u8,
}

/// Shadow image of the PS_CONF3/PS_MS register pair.
#[bitfield(u16)]
#[derive(PartialEq, Eq, defmt::Format)]
pub struct PsConf3 {
  #[bits(2)]
  __: u8,
  pub active_force_trigger: bool,
  pub active_force_mode: bool,
  pub smart_persistence: bool,
  #[bits(3)]
  ___: u8,
  #[bits(3)]
  pub led_current: LedCurrent,
  #[bits(3)]
  ____: u8,
  pub ms_logic: bool,
  _____: bool,
}

/// Decoded INT_FLAG register. All meaningful flags live in the high byte.
#[bitfield(u16)]
#[derive(PartialEq, Eq, defmt::Format)]
pub struct IntFlag {
  #[bits(8)]
  __: u8,
  pub ps_away: bool,
  pub ps_close: bool,
  #[bits(2)]
  ___: u8,
  pub als_high: bool,
  pub als_low: bool,
  /// Saturation drove the proximity block into protection mode.
  pub ps_saturated: bool,
  ____: bool,
}
