mod mock;

pub(crate) use mock::{MockBus, MockDelay, MockIntPin, MockRegulator};

use futures::executor::block_on;

use crate::{Cm36686, Config, PowerRails, Reg};

pub(crate) type TestSensor = Cm36686<MockBus, MockIntPin, MockRegulator, MockRegulator>;

/// A sensor as right after construction, rails still off.
pub(crate) fn sensor_with(bus: MockBus, config: Config) -> TestSensor {
  Cm36686::new(
    bus,
    MockIntPin::default(),
    PowerRails::new(MockRegulator::default(), MockRegulator::default()),
    config,
  )
}

/// A powered, identity-checked sensor with an empty write log.
pub(crate) fn attached(mut bus: MockBus, config: Config) -> TestSensor {
  bus.set_reg(Reg::DeviceId as u8, 0x0186);
  let mut sensor = sensor_with(bus, config);
  let mut delay = MockDelay::default();
  block_on(sensor.attach(&mut delay)).unwrap();
  sensor
}
