//! The sampling loop: log in if needed, read both sensors, append the row,
//! sleep, repeat forever.

use chrono::Local;

use crate::config;
use crate::sample::Sample;
use crate::sensors::climate::{ClimateReading, ClimateSensor};
use crate::sensors::light::{LightReading, LightSensor};
use crate::shared::Sleeper;
use crate::sheets::{SheetClient, SheetError};

/// Worksheet handle lifecycle. `Unauthenticated` forces a login attempt at
/// the top of the next iteration; `Authenticated` is reused until an append
/// fails.
enum SheetState<H> {
    Unauthenticated,
    Authenticated(H),
}

pub struct Watcher<C, L, S: SheetClient, P> {
    climate: C,
    light: L,
    sheets: S,
    sleeper: P,
    state: SheetState<S::Handle>,
}

impl<C, L, S, P> Watcher<C, L, S, P>
where
    C: ClimateSensor,
    L: LightSensor,
    S: SheetClient,
    P: Sleeper,
{
    pub fn new(climate: C, light: L, sheets: S, sleeper: P) -> Self {
        Self {
            climate,
            light,
            sheets,
            sleeper,
            state: SheetState::Unauthenticated,
        }
    }

    pub fn run(&mut self) -> ! {
        loop {
            self.tick();
        }
    }

    /// One full iteration. Nothing in here is fatal: login failures leave the
    /// state unauthenticated, empty sensor readings flow through as null
    /// cells, and a failed append drops the sample and forces a re-login.
    fn tick(&mut self) {
        if matches!(self.state, SheetState::Unauthenticated) {
            tracing::info!(
                spreadsheet = config::SPREADSHEET_NAME,
                "logging in and opening the worksheet"
            );
            match self.sheets.login() {
                Ok(handle) => self.state = SheetState::Authenticated(handle),
                Err(err) => tracing::error!("sheet login failed: {err}"),
            }
        }

        tracing::info!("reading humidity and temperature");
        let climate = self.climate_with_retry();

        tracing::info!("reading light levels");
        let light = self.light_with_retry();

        let sample = Sample {
            taken_at: Local::now(),
            temperature: climate.temperature,
            humidity: climate.humidity,
            full_spectrum: light.full_spectrum,
            infrared: light.infrared,
            visible: light.visible,
        };

        match self.append(&sample) {
            Ok(()) => {
                tracing::debug!(?sample, "row appended");
                self.sleeper.sleep(config::SAMPLE_PERIOD);
            }
            Err(err) => {
                // Stale credentials are the usual culprit. Drop the handle so
                // the next iteration logs in again, and skip the full-period
                // wait. The unsent sample is gone.
                tracing::warn!("could not append row, retrying shortly: {err}");
                self.state = SheetState::Unauthenticated;
                self.sleeper.sleep(config::RETRY_DELAY);
            }
        }
    }

    /// Read once; on an empty reading wait 30s and read exactly once more.
    fn climate_with_retry(&mut self) -> ClimateReading {
        let first = self.climate.read();
        if !first.is_empty() {
            return first;
        }
        tracing::warn!("climate sensor returned nothing, waiting before one more try");
        self.sleeper.sleep(config::RETRY_DELAY);
        self.climate.read()
    }

    /// Same one-shot retry as the climate path. An empty light reading only
    /// happens when the bus itself failed.
    fn light_with_retry(&mut self) -> LightReading {
        let first = self.light.read();
        if !first.is_empty() {
            return first;
        }
        tracing::warn!("light sensor returned nothing, waiting before one more try");
        self.sleeper.sleep(config::RETRY_DELAY);
        self.light.read()
    }

    fn append(&self, sample: &Sample) -> Result<(), SheetError> {
        match &self.state {
            SheetState::Authenticated(handle) => self.sheets.append(handle, sample),
            SheetState::Unauthenticated => Err(SheetError::NotLoggedIn),
        }
    }
}
