//! Lux conversion
//!
//! Converts raw 16-bit sample counts into calibrated lux and threshold lux
//! values back into raw counts. The scaling factor depends on the active gain
//! and integration time, see table 1 of the application note "Designing the
//! VEML6030 Into an Application".

use crate::register::{self, Gain, IntegrationTime};
use crate::{Result, VEML6030Error};

/// Highest lux value accepted for an interrupt threshold.
pub const MAX_THRESHOLD_LUX: f32 = 120_000.0;

/// Readings above this value are corrected with the compensation polynomial.
pub const COMPENSATION_THRESHOLD_LUX: u32 = 1000;

/// Resolution entries are stored in units of 1e-4 lux per count.
const RESOLUTION_SCALE: u32 = 10_000;

/// Lux per count, rows by integration time (800 ms down to 25 ms), columns
/// by gain (2, 1, 1/4, 1/8).
const RESOLUTION_TABLE: [[u32; 4]; 6] = [
    [36, 72, 288, 576],
    [72, 144, 576, 1152],
    [144, 288, 1152, 2304],
    [288, 576, 2304, 4608],
    [576, 1152, 4608, 9216],
    [1152, 2304, 9216, 18432],
];

/// The gain and integration time a raw count was sampled with.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct GainIntegrationPair {
    pub gain: Gain,
    pub integration_time: IntegrationTime,
}

impl GainIntegrationPair {
    pub fn new(gain: Gain, integration_time: IntegrationTime) -> Self {
        Self {
            gain,
            integration_time,
        }
    }

    /// Decodes the pair from a value of the setting register.
    ///
    /// Reserved gain or integration time bits cannot be converted and are
    /// reported as [`VEML6030Error::UnsupportedConfiguration`].
    pub fn from_setting(setting: u16) -> Result<Self> {
        let gain = register::decode::<Gain>(setting)
            .map_err(|_| VEML6030Error::UnsupportedConfiguration)?;
        let integration_time = register::decode::<IntegrationTime>(setting)
            .map_err(|_| VEML6030Error::UnsupportedConfiguration)?;

        Ok(Self::new(gain, integration_time))
    }

    /// Lux per count for this pair.
    pub fn resolution(&self) -> f32 {
        self.resolution_scaled() as f32 / RESOLUTION_SCALE as f32
    }

    fn resolution_scaled(&self) -> u32 {
        let row = match self.integration_time {
            IntegrationTime::Ms800 => 0,
            IntegrationTime::Ms400 => 1,
            IntegrationTime::Ms200 => 2,
            IntegrationTime::Ms100 => 3,
            IntegrationTime::Ms50 => 4,
            IntegrationTime::Ms25 => 5,
        };
        let column = match self.gain {
            Gain::X2 => 0,
            Gain::X1 => 1,
            Gain::X1_4 => 2,
            Gain::X1_8 => 3,
        };

        RESOLUTION_TABLE[row][column]
    }
}

impl TryFrom<(f32, u16)> for GainIntegrationPair {
    type Error = VEML6030Error;

    /// Builds the pair from a gain ratio and an integration time in milliseconds.
    fn try_from((gain, integration_ms): (f32, u16)) -> Result<Self> {
        let gain = Gain::try_from(gain).map_err(|_| VEML6030Error::UnsupportedConfiguration)?;
        let integration_time = IntegrationTime::try_from(integration_ms)
            .map_err(|_| VEML6030Error::UnsupportedConfiguration)?;

        Ok(Self::new(gain, integration_time))
    }
}

/// Converts a raw ambient or white light count into lux.
///
/// Values above [`COMPENSATION_THRESHOLD_LUX`] are run through the
/// non-linearity correction.
pub fn raw_to_lux(raw: u16, pair: GainIntegrationPair) -> u32 {
    let lux = scale(raw, pair);

    if lux > COMPENSATION_THRESHOLD_LUX {
        compensate(lux)
    } else {
        lux
    }
}

/// Converts a raw threshold register value into lux.
///
/// The sensor compares thresholds against uncompensated counts, so no
/// compensation is applied here.
pub fn threshold_to_lux(raw: u16, pair: GainIntegrationPair) -> u32 {
    scale(raw, pair)
}

/// Converts a threshold in lux into the raw count programmed into the
/// threshold registers.
///
/// `lux` has to lie within `[0, MAX_THRESHOLD_LUX]` and the resulting count
/// has to fit the 16-bit register, otherwise [`VEML6030Error::OutOfRange`]
/// is returned.
pub fn lux_to_raw(lux: f32, pair: GainIntegrationPair) -> Result<u16> {
    check_threshold(lux)?;

    let counts =
        f64::from(lux) * f64::from(RESOLUTION_SCALE) / f64::from(pair.resolution_scaled());
    if counts > f64::from(u16::MAX) {
        log::warn!(
            "{} lx is not reachable with {:?}, maximum is {} lx",
            lux,
            pair,
            threshold_to_lux(u16::MAX, pair)
        );
        return Err(VEML6030Error::OutOfRange);
    }

    Ok(counts as u16)
}

/// Checks that a lux value is usable as interrupt threshold.
pub fn check_threshold(lux: f32) -> Result<()> {
    // NaN fails the range check as well
    if (0.0..=MAX_THRESHOLD_LUX).contains(&lux) {
        Ok(())
    } else {
        Err(VEML6030Error::OutOfRange)
    }
}

/// Corrects the non-linearity of readings above 1000 lx.
///
/// The polynomial is the same for all sensors and all gain and integration
/// time settings.
pub fn compensate(lux: u32) -> u32 {
    let x = f64::from(lux);
    let compensated = (((6.0135e-13 * x - 9.3924e-9) * x + 8.1488e-5) * x + 1.0023) * x;

    compensated as u32
}

fn scale(raw: u16, pair: GainIntegrationPair) -> u32 {
    // 65535 * 18432 still fits into u32
    u32::from(raw) * pair.resolution_scaled() / RESOLUTION_SCALE
}
