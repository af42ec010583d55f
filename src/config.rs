//! Fixed deployment constants.
//!
//! The watcher takes no CLI flags and reads no environment variables;
//! everything it needs to know about the installation is compiled in.

use std::time::Duration;

/// BCM pin the DHT22 data line is wired to.
pub const DHT22_PIN: u8 = 4;

/// I2C bus index for the TSL2561 light sensor (`/dev/i2c-1` on a Pi).
pub const I2C_BUS: u8 = 1;

/// Service-account key file, relative to the working directory.
pub const CREDENTIALS_PATH: &str = "auth/plantwatch-service-account.json";

/// Spreadsheet to append to. The first worksheet is always the target.
pub const SPREADSHEET_NAME: &str = "plantwatch";

/// How long to wait between samples.
pub const SAMPLE_PERIOD: Duration = Duration::from_secs(1800);

/// Back-off before retrying an empty sensor read or a failed append.
pub const RETRY_DELAY: Duration = Duration::from_secs(30);

/// Daily log files land here, one per calendar day.
pub const LOG_DIR: &str = "logs";
pub const LOG_PREFIX: &str = "plantwatch.log";
