//! DHT22 temperature/humidity probe on a GPIO pin.
//!
//! The DHT22 speaks a timing-based single-wire protocol: the host holds the
//! line low to request a reading, the sensor answers with a handshake and
//! 40 data bits whose high-pulse width encodes 0 or 1. Reads miss routinely,
//! so `read` retries internally before reporting an empty reading.

use std::thread;
use std::time::{Duration, Instant};

use rppal::gpio::{Gpio, IoPin, Level, Mode};
use thiserror::Error;

/// Attempts per `read` call before giving up, two seconds apart.
const READ_ATTEMPTS: u32 = 15;
const ATTEMPT_DELAY: Duration = Duration::from_millis(2000);

/// Longest we wait on any single protocol edge before declaring the sensor
/// absent or wedged.
const EDGE_TIMEOUT: Duration = Duration::from_millis(2);

/// High pulses longer than this are ones, shorter are zeros (the datasheet
/// says 26-28us for a zero, 70us for a one).
const ONE_THRESHOLD: Duration = Duration::from_micros(48);

#[derive(Debug, Error)]
pub enum ClimateError {
    #[error("gpio: {0}")]
    Gpio(#[from] rppal::gpio::Error),
    #[error("sensor did not answer within the protocol timing window")]
    Timeout,
    #[error("frame checksum mismatch")]
    Checksum,
}

/// Humidity/temperature pair. Either side may be missing after a failed read;
/// both missing means the sensor never answered at all.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClimateReading {
    pub humidity: Option<f64>,
    pub temperature: Option<f64>,
}

impl ClimateReading {
    pub fn is_empty(&self) -> bool {
        self.humidity.is_none() && self.temperature.is_none()
    }
}

/// Blocking climate read with the driver's own retry built in.
pub trait ClimateSensor {
    fn read(&mut self) -> ClimateReading;
}

/// DHT22 wired to a single BCM pin. The pin is opened fresh on every read.
pub struct Dht22 {
    pin: u8,
}

impl Dht22 {
    pub fn new(pin: u8) -> Self {
        Self { pin }
    }

    fn read_once(&self) -> Result<(f64, f64), ClimateError> {
        let gpio = Gpio::new()?;
        let mut pin = gpio.get(self.pin)?.into_io(Mode::Output);
        let frame = read_frame(&mut pin)?;
        decode_frame(frame)
    }
}

impl ClimateSensor for Dht22 {
    fn read(&mut self) -> ClimateReading {
        for attempt in 0..READ_ATTEMPTS {
            if attempt > 0 {
                thread::sleep(ATTEMPT_DELAY);
            }
            match self.read_once() {
                Ok((humidity, temperature)) => {
                    return ClimateReading {
                        humidity: Some(humidity),
                        temperature: Some(temperature),
                    }
                }
                Err(err) => {
                    tracing::debug!(attempt, "climate read attempt failed: {err}");
                }
            }
        }
        ClimateReading::default()
    }
}

/// Run the wire protocol and collect the 40-bit frame.
fn read_frame(pin: &mut IoPin) -> Result<[u8; 5], ClimateError> {
    // Host start pulse: hold the line low, then hand it to the sensor.
    pin.set_mode(Mode::Output);
    pin.set_low();
    thread::sleep(Duration::from_millis(2));
    pin.set_high();
    pin.set_mode(Mode::Input);

    // Sensor handshake: ~80us low, ~80us high, then the first bit's preamble.
    wait_for(pin, Level::Low)?;
    wait_for(pin, Level::High)?;
    wait_for(pin, Level::Low)?;

    let mut frame = [0u8; 5];
    for bit in 0..40 {
        // 50us low preamble, then a high pulse whose width is the bit value
        wait_for(pin, Level::High)?;
        if pulse_width(pin, Level::High)? > ONE_THRESHOLD {
            frame[bit / 8] |= 1 << (7 - bit % 8);
        }
    }
    Ok(frame)
}

fn wait_for(pin: &IoPin, level: Level) -> Result<(), ClimateError> {
    let start = Instant::now();
    while pin.read() != level {
        if start.elapsed() > EDGE_TIMEOUT {
            return Err(ClimateError::Timeout);
        }
    }
    Ok(())
}

fn pulse_width(pin: &IoPin, level: Level) -> Result<Duration, ClimateError> {
    let start = Instant::now();
    while pin.read() == level {
        if start.elapsed() > EDGE_TIMEOUT {
            return Err(ClimateError::Timeout);
        }
    }
    Ok(start.elapsed())
}

/// Decode a frame into `(humidity, temperature)`, both in tenths on the wire.
fn decode_frame(frame: [u8; 5]) -> Result<(f64, f64), ClimateError> {
    let sum = frame[0]
        .wrapping_add(frame[1])
        .wrapping_add(frame[2])
        .wrapping_add(frame[3]);
    if sum != frame[4] {
        return Err(ClimateError::Checksum);
    }

    let humidity = u16::from_be_bytes([frame[0], frame[1]]) as f64 / 10.0;
    let magnitude = u16::from_be_bytes([frame[2] & 0x7F, frame[3]]) as f64 / 10.0;
    let temperature = if frame[2] & 0x80 != 0 {
        -magnitude
    } else {
        magnitude
    };
    Ok((humidity, temperature))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_valid_frame() {
        // 65.2% RH, 35.1C
        let (humidity, temperature) = decode_frame([0x02, 0x8C, 0x01, 0x5F, 0xEE]).unwrap();
        assert_eq!(humidity, 65.2);
        assert_eq!(temperature, 35.1);
    }

    #[test]
    fn high_bit_of_temperature_means_below_zero() {
        // 65.2% RH, -10.1C
        let (_, temperature) = decode_frame([0x02, 0x8C, 0x80, 0x65, 0x73]).unwrap();
        assert_eq!(temperature, -10.1);
    }

    #[test]
    fn rejects_a_corrupted_frame() {
        let result = decode_frame([0x02, 0x8C, 0x01, 0x5F, 0x00]);
        assert!(matches!(result, Err(ClimateError::Checksum)));
    }

    #[test]
    fn empty_reading_is_empty() {
        assert!(ClimateReading::default().is_empty());
        assert!(!ClimateReading {
            humidity: Some(40.0),
            temperature: None,
        }
        .is_empty());
    }
}
