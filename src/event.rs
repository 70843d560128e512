/// Upper bound of the proximity distance axis.
pub const PS_DISTANCE_MAX: u16 = 1023;

/// Upper bound of the calibrated ambient-light level.
pub const ALS_LEVEL_MAX: u16 = 5240;

/// One determination on the proximity event stream.
///
/// The wire contract is two samples on the distance axis followed by one
/// synchronization marker per determination; consumers key off the pair,
/// so both values must be emitted in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct DistanceReport {
  near: bool,
}

impl DistanceReport {
  pub const fn near() -> Self {
    Self { near: true }
  }

  pub const fn far() -> Self {
    Self { near: false }
  }

  pub const fn is_near(self) -> bool {
    self.near
  }

  /// The two distance-axis samples to push before the sync marker.
  pub const fn samples(self) -> [u16; 2] {
    if self.near { [1000, PS_DISTANCE_MAX] } else { [1, 0] }
  }
}

/// Outcome of servicing one proximity interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum PsEvent {
  /// Far-to-near transition.
  Near,
  /// Near-to-far transition.
  Away,
  /// Saturation pushed the chip into protection mode.
  Saturated,
  /// Close and away flagged together; the reading cannot be trusted.
  Inconsistent,
  /// The line fired but no proximity flag was set.
  Spurious,
  /// The flag register could not be read.
  ReadFailed,
}

impl PsEvent {
  /// The distance determination to emit for this event. Everything except a
  /// clean close transition resolves to far.
  pub const fn report(self) -> DistanceReport {
    match self {
      Self::Near => DistanceReport::near(),
      _ => DistanceReport::far(),
    }
  }

  /// Whether the consumer should hold the system awake while it reacts.
  pub const fn holds_wake(self) -> bool {
    !matches!(self, Self::Near)
  }

  /// Whether this event signals the saturation protection condition.
  pub const fn is_protection(self) -> bool {
    matches!(self, Self::Saturated)
  }
}

/// Outcome of one ambient-light poll tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum AlsPoll {
  /// The channel was disabled; the polling chain ends here.
  Stopped,
  /// Supply rails are off; nothing to sample, chain ends here.
  Unpowered,
  /// Calibrated light level, `0..=`[`ALS_LEVEL_MAX`].
  Sample(u16),
}
