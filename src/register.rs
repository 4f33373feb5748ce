//! Register codec
//!
//! Register addresses, bit-field definitions and the typed settings that are
//! packed into the 16-bit registers of the VEML6030. Everything in here is a
//! pure function over register words, the bus access lives in the driver.

use crate::{Result, VEML6030Error};

/// All 16-bit registers of the VEML6030 sensor.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Register {
    /// ALS configuration register (gain, integration time, persistence, interrupt, shutdown)
    Setting = 0x00,

    /// High threshold window setting
    HighThreshold = 0x01,

    /// Low threshold window setting
    LowThreshold = 0x02,

    /// Power saving mode register
    PowerSave = 0x03,

    /// ALS high resolution output data
    AmbientData = 0x04,

    /// White channel output data
    WhiteData = 0x05,

    /// Interrupt status register (read only)
    InterruptStatus = 0x06,
}

impl Register {
    /// Command code of the register on the bus.
    pub fn addr(self) -> u8 {
        self as u8
    }
}

/// A sub-range of bits inside one register.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Field {
    /// Register holding the field.
    pub register: Register,
    /// Unshifted mask covering the width of the field.
    pub mask: u16,
    /// Bit position of the least significant bit of the field.
    pub shift: u8,
}

impl Field {
    const fn new(register: Register, mask: u16, shift: u8) -> Self {
        Self {
            register,
            mask,
            shift,
        }
    }

    /// Mask of the field in register position.
    pub fn shifted_mask(&self) -> u16 {
        self.mask << self.shift
    }

    /// Extracts the raw field bits from a register value.
    pub fn extract(&self, register_value: u16) -> u16 {
        (register_value >> self.shift) & self.mask
    }
}

/// `ALS_GAIN`, setting register bits [12:11].
pub const GAIN: Field = Field::new(Register::Setting, 0b11, 11);
/// `ALS_IT`, setting register bits [9:6].
pub const INTEGRATION_TIME: Field = Field::new(Register::Setting, 0b1111, 6);
/// `ALS_PERS`, setting register bits [5:4].
pub const PERSISTENCE: Field = Field::new(Register::Setting, 0b11, 4);
/// `ALS_INT_EN`, setting register bit 1.
pub const INTERRUPT_ENABLE: Field = Field::new(Register::Setting, 0b1, 1);
/// `ALS_SD`, setting register bit 0.
pub const SHUTDOWN: Field = Field::new(Register::Setting, 0b1, 0);
/// `PSM_EN`, power saving register bit 0.
pub const POWER_SAVE_ENABLE: Field = Field::new(Register::PowerSave, 0b1, 0);
/// `PSM`, power saving register bits [2:1].
pub const POWER_SAVE_MODE: Field = Field::new(Register::PowerSave, 0b11, 1);
/// `int_th_low` and `int_th_high`, interrupt status register bits [15:14].
pub const INTERRUPT_STATUS: Field = Field::new(Register::InterruptStatus, 0b11, 14);

/// A logical setting that maps one to one onto the bit pattern of a [`Field`].
pub trait FieldValue: Copy + Sized {
    /// The field this setting is stored in.
    const FIELD: Field;

    /// Raw (unshifted) bit pattern of this setting.
    fn bits(self) -> u16;

    /// Reverse lookup, `None` for reserved or undefined patterns.
    fn from_bits(bits: u16) -> Option<Self>;
}

/// Returns the unshifted field bits for a setting.
pub fn encode<T: FieldValue>(value: T) -> u16 {
    value.bits()
}

/// Replaces the bits covered by `field` in `current` with `bits`.
///
/// Bits outside of the field are passed through unchanged, which gives the
/// read-modify-write semantics needed for registers shared by several settings.
pub fn apply_field(current: u16, field: Field, bits: u16) -> u16 {
    (current & !field.shifted_mask()) | ((bits & field.mask) << field.shift)
}

/// Decodes the setting stored in `register_value`.
pub fn decode<T: FieldValue>(register_value: u16) -> Result<T> {
    let bits = T::FIELD.extract(register_value);
    T::from_bits(bits).ok_or(VEML6030Error::UnknownFieldValue)
}

/// The gain of the VEML6030 sensor.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Gain {
    X1_8,
    X1_4,
    X1,
    X2,
}

impl From<Gain> for f32 {
    fn from(gain: Gain) -> Self {
        match gain {
            Gain::X1_8 => 0.125,
            Gain::X1_4 => 0.25,
            Gain::X1 => 1.0,
            Gain::X2 => 2.0,
        }
    }
}

// IEEE 754 bit patterns of the documented gain ratios
const RATIO_1_8_BITS: u32 = 0x3E00_0000;
const RATIO_1_4_BITS: u32 = 0x3E80_0000;
const RATIO_1_BITS: u32 = 0x3F80_0000;
const RATIO_2_BITS: u32 = 0x4000_0000;

impl TryFrom<f32> for Gain {
    type Error = VEML6030Error;

    /// Only the exact ratios 1/8, 1/4, 1 and 2 are accepted.
    fn try_from(ratio: f32) -> Result<Self> {
        match ratio.to_bits() {
            RATIO_1_8_BITS => Ok(Gain::X1_8),
            RATIO_1_4_BITS => Ok(Gain::X1_4),
            RATIO_1_BITS => Ok(Gain::X1),
            RATIO_2_BITS => Ok(Gain::X2),
            _ => Err(VEML6030Error::InvalidSetting),
        }
    }
}

impl FieldValue for Gain {
    const FIELD: Field = GAIN;

    fn bits(self) -> u16 {
        match self {
            Gain::X1 => 0,
            Gain::X2 => 1,
            Gain::X1_8 => 2,
            Gain::X1_4 => 3,
        }
    }

    fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            0 => Some(Gain::X1),
            1 => Some(Gain::X2),
            2 => Some(Gain::X1_8),
            3 => Some(Gain::X1_4),
            _ => None,
        }
    }
}

/// The integration time of the VEML6030 sensor.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum IntegrationTime {
    Ms25,
    Ms50,
    Ms100,
    Ms200,
    Ms400,
    Ms800,
}

impl IntegrationTime {
    pub fn as_ms(self) -> u16 {
        match self {
            IntegrationTime::Ms25 => 25,
            IntegrationTime::Ms50 => 50,
            IntegrationTime::Ms100 => 100,
            IntegrationTime::Ms200 => 200,
            IntegrationTime::Ms400 => 400,
            IntegrationTime::Ms800 => 800,
        }
    }
}

impl TryFrom<u16> for IntegrationTime {
    type Error = VEML6030Error;

    fn try_from(ms: u16) -> Result<Self> {
        match ms {
            25 => Ok(IntegrationTime::Ms25),
            50 => Ok(IntegrationTime::Ms50),
            100 => Ok(IntegrationTime::Ms100),
            200 => Ok(IntegrationTime::Ms200),
            400 => Ok(IntegrationTime::Ms400),
            800 => Ok(IntegrationTime::Ms800),
            _ => Err(VEML6030Error::InvalidSetting),
        }
    }
}

impl FieldValue for IntegrationTime {
    const FIELD: Field = INTEGRATION_TIME;

    fn bits(self) -> u16 {
        match self {
            IntegrationTime::Ms100 => 0b0000,
            IntegrationTime::Ms200 => 0b0001,
            IntegrationTime::Ms400 => 0b0010,
            IntegrationTime::Ms800 => 0b0011,
            IntegrationTime::Ms50 => 0b1000,
            IntegrationTime::Ms25 => 0b1100,
        }
    }

    fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            0b0000 => Some(IntegrationTime::Ms100),
            0b0001 => Some(IntegrationTime::Ms200),
            0b0010 => Some(IntegrationTime::Ms400),
            0b0011 => Some(IntegrationTime::Ms800),
            0b1000 => Some(IntegrationTime::Ms50),
            0b1100 => Some(IntegrationTime::Ms25),
            _ => None,
        }
    }
}

/// Number of consecutive samples that have to cross a threshold before the
/// interrupt is raised.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Persistence {
    One,
    Two,
    Four,
    Eight,
}

impl Persistence {
    pub fn count(self) -> u8 {
        match self {
            Persistence::One => 1,
            Persistence::Two => 2,
            Persistence::Four => 4,
            Persistence::Eight => 8,
        }
    }
}

impl TryFrom<u8> for Persistence {
    type Error = VEML6030Error;

    fn try_from(count: u8) -> Result<Self> {
        match count {
            1 => Ok(Persistence::One),
            2 => Ok(Persistence::Two),
            4 => Ok(Persistence::Four),
            8 => Ok(Persistence::Eight),
            _ => Err(VEML6030Error::InvalidSetting),
        }
    }
}

impl FieldValue for Persistence {
    const FIELD: Field = PERSISTENCE;

    fn bits(self) -> u16 {
        match self {
            Persistence::One => 0,
            Persistence::Two => 1,
            Persistence::Four => 2,
            Persistence::Eight => 3,
        }
    }

    fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            0 => Some(Persistence::One),
            1 => Some(Persistence::Two),
            2 => Some(Persistence::Four),
            3 => Some(Persistence::Eight),
            _ => None,
        }
    }
}

/// Whether the threshold interrupt is enabled.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InterruptEnable {
    Disabled,
    Enabled,
}

impl FieldValue for InterruptEnable {
    const FIELD: Field = INTERRUPT_ENABLE;

    fn bits(self) -> u16 {
        self as u16
    }

    fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            0 => Some(InterruptEnable::Disabled),
            1 => Some(InterruptEnable::Enabled),
            _ => None,
        }
    }
}

/// The power state of the sensor (`ALS_SD` bit).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PowerState {
    PowerOn,
    Shutdown,
}

impl FieldValue for PowerState {
    const FIELD: Field = SHUTDOWN;

    fn bits(self) -> u16 {
        self as u16
    }

    fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            0 => Some(PowerState::PowerOn),
            1 => Some(PowerState::Shutdown),
            _ => None,
        }
    }
}

/// Whether power saving mode is enabled.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PowerSaveEnable {
    Disabled,
    Enabled,
}

impl FieldValue for PowerSaveEnable {
    const FIELD: Field = POWER_SAVE_ENABLE;

    fn bits(self) -> u16 {
        self as u16
    }

    fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            0 => Some(PowerSaveEnable::Disabled),
            1 => Some(PowerSaveEnable::Enabled),
            _ => None,
        }
    }
}

/// Power saving mode. Higher modes lower the sampling rate and the current draw.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PowerSaveMode {
    Mode1,
    Mode2,
    Mode3,
    Mode4,
}

impl PowerSaveMode {
    pub fn number(self) -> u8 {
        match self {
            PowerSaveMode::Mode1 => 1,
            PowerSaveMode::Mode2 => 2,
            PowerSaveMode::Mode3 => 3,
            PowerSaveMode::Mode4 => 4,
        }
    }
}

impl TryFrom<u8> for PowerSaveMode {
    type Error = VEML6030Error;

    fn try_from(mode: u8) -> Result<Self> {
        match mode {
            1 => Ok(PowerSaveMode::Mode1),
            2 => Ok(PowerSaveMode::Mode2),
            3 => Ok(PowerSaveMode::Mode3),
            4 => Ok(PowerSaveMode::Mode4),
            _ => Err(VEML6030Error::InvalidSetting),
        }
    }
}

impl FieldValue for PowerSaveMode {
    const FIELD: Field = POWER_SAVE_MODE;

    fn bits(self) -> u16 {
        u16::from(self.number()) - 1
    }

    fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            0 => Some(PowerSaveMode::Mode1),
            1 => Some(PowerSaveMode::Mode2),
            2 => Some(PowerSaveMode::Mode3),
            3 => Some(PowerSaveMode::Mode4),
            _ => None,
        }
    }
}

/// Which threshold, if any, triggered the interrupt.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InterruptStatus {
    None,
    HighThreshold,
    LowThreshold,
}

impl FieldValue for InterruptStatus {
    const FIELD: Field = INTERRUPT_STATUS;

    // The status register is read only, this is never written to the sensor.
    fn bits(self) -> u16 {
        match self {
            InterruptStatus::None => 0,
            InterruptStatus::HighThreshold => 1,
            InterruptStatus::LowThreshold => 2,
        }
    }

    fn from_bits(bits: u16) -> Option<Self> {
        // Both flags set at once is not a documented state
        match bits {
            0 => Some(InterruptStatus::None),
            1 => Some(InterruptStatus::HighThreshold),
            2 => Some(InterruptStatus::LowThreshold),
            _ => None,
        }
    }
}
