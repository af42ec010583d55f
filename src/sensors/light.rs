//! TSL2561 luminosity sensor on the I2C bus.
//!
//! Two register writes power the device up and select the nominal 402ms
//! integration time, then two 2-byte little-endian channel reads give the
//! full-spectrum and infrared counts. Visible light is derived.

use rppal::i2c::I2c;
use thiserror::Error;

const DEVICE_ADDR: u16 = 0x39;

/// All register accesses go through the command bit.
const COMMAND_BIT: u8 = 0x80;
const REG_CONTROL: u8 = 0x00;
const REG_TIMING: u8 = 0x01;
/// Channel 0 (full spectrum) and channel 1 (infrared) data, LSB first.
const REG_DATA0: u8 = 0x0C;
const REG_DATA1: u8 = 0x0E;

const POWER_ON: u8 = 0x03;
const INTEGRATION_402MS: u8 = 0x02;

#[derive(Debug, Error)]
pub enum LightError {
    #[error("i2c: {0}")]
    Bus(#[from] rppal::i2c::Error),
}

/// Three light metrics from one pass over the device. All three are missing
/// when the bus itself failed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LightReading {
    pub full_spectrum: Option<u16>,
    pub infrared: Option<u16>,
    /// Full spectrum minus infrared; negative when infrared dominates.
    pub visible: Option<i32>,
}

impl LightReading {
    pub fn is_empty(&self) -> bool {
        self.full_spectrum.is_none() && self.infrared.is_none() && self.visible.is_none()
    }
}

pub trait LightSensor {
    fn read(&mut self) -> LightReading;
}

/// Bus operations the TSL2561 needs. `rppal::i2c::I2c` satisfies this on real
/// hardware; tests script the register protocol instead.
pub trait LightBus {
    fn write_register(&mut self, register: u8, value: u8) -> Result<(), LightError>;
    fn read_register_pair(&mut self, register: u8) -> Result<[u8; 2], LightError>;
}

impl LightBus for I2c {
    fn write_register(&mut self, register: u8, value: u8) -> Result<(), LightError> {
        self.smbus_write_byte(register, value)?;
        Ok(())
    }

    fn read_register_pair(&mut self, register: u8) -> Result<[u8; 2], LightError> {
        let mut buffer = [0u8; 2];
        self.write_read(&[register], &mut buffer)?;
        Ok(buffer)
    }
}

/// TSL2561 on a fixed bus index. The bus is opened fresh on every read.
pub struct Tsl2561 {
    bus: u8,
}

impl Tsl2561 {
    pub fn new(bus: u8) -> Self {
        Self { bus }
    }

    fn read_hw(&self) -> Result<LightReading, LightError> {
        let mut bus = I2c::with_bus(self.bus)?;
        bus.set_slave_address(DEVICE_ADDR)?;
        read_channels(&mut bus)
    }
}

impl LightSensor for Tsl2561 {
    fn read(&mut self) -> LightReading {
        match self.read_hw() {
            Ok(reading) => reading,
            Err(err) => {
                tracing::debug!("light read failed: {err}");
                LightReading::default()
            }
        }
    }
}

/// Power up, set integration time, and pull both channels.
fn read_channels(bus: &mut impl LightBus) -> Result<LightReading, LightError> {
    bus.write_register(REG_CONTROL | COMMAND_BIT, POWER_ON)?;
    bus.write_register(REG_TIMING | COMMAND_BIT, INTEGRATION_402MS)?;

    let full_spectrum = decode_channel(bus.read_register_pair(REG_DATA0 | COMMAND_BIT)?);
    let infrared = decode_channel(bus.read_register_pair(REG_DATA1 | COMMAND_BIT)?);

    Ok(LightReading {
        full_spectrum: Some(full_spectrum),
        infrared: Some(infrared),
        visible: Some(i32::from(full_spectrum) - i32::from(infrared)),
    })
}

fn decode_channel(raw: [u8; 2]) -> u16 {
    u16::from(raw[1]) * 256 + u16::from(raw[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Asserts the register protocol as it runs: writes are recorded, reads
    /// are served from a script keyed by expected register.
    #[derive(Default)]
    struct ScriptedBus {
        writes: Vec<(u8, u8)>,
        reads: VecDeque<(u8, [u8; 2])>,
    }

    impl LightBus for ScriptedBus {
        fn write_register(&mut self, register: u8, value: u8) -> Result<(), LightError> {
            self.writes.push((register, value));
            Ok(())
        }

        fn read_register_pair(&mut self, register: u8) -> Result<[u8; 2], LightError> {
            let (expected, data) = self.reads.pop_front().expect("unexpected register read");
            assert_eq!(register, expected);
            Ok(data)
        }
    }

    #[test]
    fn follows_the_power_on_and_timing_sequence() {
        let mut bus = ScriptedBus {
            reads: VecDeque::from([(0x8C, [0, 0]), (0x8E, [0, 0])]),
            ..Default::default()
        };

        read_channels(&mut bus).unwrap();

        assert_eq!(bus.writes, vec![(0x80, 0x03), (0x81, 0x02)]);
        assert!(bus.reads.is_empty());
    }

    #[test]
    fn decodes_both_channels_and_derives_visible() {
        let mut bus = ScriptedBus {
            reads: VecDeque::from([(0x8C, [0x10, 0x00]), (0x8E, [0x05, 0x00])]),
            ..Default::default()
        };

        let reading = read_channels(&mut bus).unwrap();

        assert_eq!(reading.full_spectrum, Some(16));
        assert_eq!(reading.infrared, Some(5));
        assert_eq!(reading.visible, Some(11));
    }

    #[test]
    fn visible_goes_negative_when_infrared_dominates() {
        let mut bus = ScriptedBus {
            reads: VecDeque::from([(0x8C, [0x05, 0x00]), (0x8E, [0x10, 0x00])]),
            ..Default::default()
        };

        let reading = read_channels(&mut bus).unwrap();

        assert_eq!(reading.visible, Some(-11));
    }

    #[test]
    fn channel_bytes_are_little_endian() {
        assert_eq!(decode_channel([0x34, 0x12]), 0x1234);
        assert_eq!(decode_channel([0xFF, 0xFF]), u16::MAX);
    }

    #[test]
    fn empty_reading_is_empty() {
        assert!(LightReading::default().is_empty());
        assert!(!LightReading {
            full_spectrum: Some(1),
            ..Default::default()
        }
        .is_empty());
    }
}
