//! This crate provides a platform agnostic no_std driver for the VEML6030 ambient light sensor.
//! The driver is compatible with the [`embedded-hal`](https://crates.io/crates/embedded-hal) traits.
//!
//! The datasheet of the sensor can be found [here](https://www.vishay.com/docs/84366/veml6030.pdf).
//!
//! ## Supported features
//! * Configurable gain, integration time and persistence protect number
//! * Shutdown and power saving modes
//! * Interrupt thresholds in lux and reading the interrupt status
//! * Converting the ambient and white channel raw values into lux, including
//!   the compensation of the non-linearity above 1000 lx
//!
//! ## Unsupported features
//! * Async
//!
//! ## Usage
//!
//! ### Creating a driver instance
//!
//! ```rust,ignore
//! use veml6030::{VEML6030, VEML6030_ADDR};
//!
//! fn main() {
//!     let mut delay = MockNoop::new();
//!     let mut i2c = MockI2c::new();
//!     // Powers the sensor on, it starts up in shutdown
//!     let mut sensor = VEML6030::new(VEML6030_ADDR, &mut delay, &mut i2c).unwrap();
//! }
//! ```
//!
//! ### Reading the ambient light intensity
//!
//! ```rust,ignore
//! use veml6030::{Gain, IntegrationTime, VEML6030, VEML6030_ADDR};
//!
//! fn main() {
//!     let mut delay = MockNoop::new();
//!     let mut i2c = MockI2c::new();
//!     let mut sensor = VEML6030::new(VEML6030_ADDR, &mut delay, &mut i2c).unwrap();
//!
//!     sensor.set_gain(Gain::X1_8, &mut i2c).unwrap();
//!     sensor.set_integration_time(IntegrationTime::Ms100, &mut i2c).unwrap();
//!
//!     let lux = sensor.read_light(&mut i2c).unwrap();
//!
//!     println!("Ambient light intensity: {} lux", lux);
//! }
//! ```
//!
//! ### Interrupt thresholds
//!
//! Thresholds are converted with the gain and integration time active at the
//! time of the call, so configure those first.
//!
//! ```rust,ignore
//! use veml6030::{InterruptStatus, VEML6030, VEML6030_ADDR};
//!
//! fn main() {
//!     let mut delay = MockNoop::new();
//!     let mut i2c = MockI2c::new();
//!     let mut sensor = VEML6030::new(VEML6030_ADDR, &mut delay, &mut i2c).unwrap();
//!
//!     sensor.set_low_threshold(10.0, &mut i2c).unwrap();
//!     sensor.set_high_threshold(800.0, &mut i2c).unwrap();
//!     sensor.enable_interrupt(&mut i2c).unwrap();
//!
//!     match sensor.read_interrupt_status(&mut i2c).unwrap() {
//!         InterruptStatus::HighThreshold => println!("Too bright"),
//!         InterruptStatus::LowThreshold => println!("Too dark"),
//!         InterruptStatus::None => {}
//!     }
//! }
//! ```

#![cfg_attr(not(test), no_std)]

pub mod lux;
pub mod register;

pub use lux::GainIntegrationPair;
pub use register::{
    Gain, IntegrationTime, InterruptEnable, InterruptStatus, Persistence, PowerSaveEnable,
    PowerSaveMode, PowerState, Register,
};

use register::FieldValue;

/// Default I2C address for the VEML6030 sensor (ADDR pin high).
pub const VEML6030_ADDR: u8 = 0x48;

/// Alternate I2C address for the VEML6030 sensor (ADDR pin low).
pub const VEML6030_ALT_ADDR: u8 = 0x10;

/// Time the oscillator and signal processor need after power on.
const POWER_ON_DELAY_MS: u32 = 4;

/// Represents an I2C-connected VEML6030 sensor.
///
/// All register operations take `&mut self`, so accesses to one sensor are
/// always serialized.
#[derive(Clone, Debug)]
pub struct VEML6030<I2C, D> {
    /// Marker to satisfy the compiler.
    _delay: core::marker::PhantomData<D>,

    /// I2C Interface for communcating with the sensor.
    _i2c: core::marker::PhantomData<I2C>,

    /// I2C address of the sensor.
    address: u8,

    /// Last known value of the setting register.
    setting: Option<u16>,
}

impl<I2C, D> VEML6030<I2C, D>
where
    D: embedded_hal::blocking::delay::DelayMs<u32>,
    I2C: embedded_hal::blocking::i2c::Write + embedded_hal::blocking::i2c::WriteRead,
{
    /// Creates a connection with a VEML6030 sensor via I2C.
    ///
    /// The sensor is shut down after power up, so this method powers it on
    /// and waits for it to start up. All other settings are left untouched.
    pub fn new(address: u8, delay: &mut D, i2c: &mut I2C) -> Result<Self> {
        let mut sensor = Self::with_address(address);
        sensor.power_on(delay, i2c)?;

        Ok(sensor)
    }

    fn with_address(address: u8) -> Self {
        Self {
            _delay: core::marker::PhantomData,
            _i2c: core::marker::PhantomData,
            address,
            setting: None,
        }
    }

    /// The I2C address this driver talks to.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Set the gain of the sensor.
    pub fn set_gain(&mut self, gain: Gain, i2c: &mut I2C) -> Result<()> {
        self.update_field(gain, i2c)
    }

    /// Read the gain of the sensor.
    pub fn read_gain(&mut self, i2c: &mut I2C) -> Result<Gain> {
        self.read_field(i2c)
    }

    /// Set the integration time of the sensor.
    pub fn set_integration_time(&mut self, time: IntegrationTime, i2c: &mut I2C) -> Result<()> {
        self.update_field(time, i2c)
    }

    /// Read the integration time of the sensor.
    pub fn read_integration_time(&mut self, i2c: &mut I2C) -> Result<IntegrationTime> {
        self.read_field(i2c)
    }

    /// Set the number of samples that have to cross a threshold to raise the interrupt.
    pub fn set_persistence(&mut self, persistence: Persistence, i2c: &mut I2C) -> Result<()> {
        self.update_field(persistence, i2c)
    }

    /// Read the persistence protect number.
    pub fn read_persistence(&mut self, i2c: &mut I2C) -> Result<Persistence> {
        self.read_field(i2c)
    }

    /// Enable the threshold interrupt.
    pub fn enable_interrupt(&mut self, i2c: &mut I2C) -> Result<()> {
        self.update_field(InterruptEnable::Enabled, i2c)
    }

    /// Disable the threshold interrupt.
    pub fn disable_interrupt(&mut self, i2c: &mut I2C) -> Result<()> {
        self.update_field(InterruptEnable::Disabled, i2c)
    }

    /// Check whether the threshold interrupt is enabled.
    pub fn read_interrupt_setting(&mut self, i2c: &mut I2C) -> Result<InterruptEnable> {
        self.read_field(i2c)
    }

    /// Shut the sensor down.
    ///
    /// The last reading stays available in the data registers while shut down.
    pub fn shut_down(&mut self, i2c: &mut I2C) -> Result<()> {
        self.update_field(PowerState::Shutdown, i2c)
    }

    /// Power the sensor on and block until it has settled.
    pub fn power_on(&mut self, delay: &mut D, i2c: &mut I2C) -> Result<()> {
        self.update_field(PowerState::PowerOn, i2c)?;
        delay.delay_ms(POWER_ON_DELAY_MS);

        Ok(())
    }

    /// Read whether the sensor is powered on or shut down.
    pub fn read_power_state(&mut self, i2c: &mut I2C) -> Result<PowerState> {
        self.read_field(i2c)
    }

    /// Enable power saving mode with the currently configured mode.
    pub fn enable_power_save(&mut self, i2c: &mut I2C) -> Result<()> {
        self.update_field(PowerSaveEnable::Enabled, i2c)
    }

    /// Disable power saving mode.
    pub fn disable_power_save(&mut self, i2c: &mut I2C) -> Result<()> {
        self.update_field(PowerSaveEnable::Disabled, i2c)
    }

    /// Check whether power saving mode is enabled.
    pub fn read_power_save_enabled(&mut self, i2c: &mut I2C) -> Result<PowerSaveEnable> {
        self.read_field(i2c)
    }

    /// Set the power saving mode. Higher modes sample less often.
    pub fn set_power_save_mode(&mut self, mode: PowerSaveMode, i2c: &mut I2C) -> Result<()> {
        self.update_field(mode, i2c)
    }

    /// Read the power saving mode.
    pub fn read_power_save_mode(&mut self, i2c: &mut I2C) -> Result<PowerSaveMode> {
        self.read_field(i2c)
    }

    /// Read which threshold triggered the interrupt.
    pub fn read_interrupt_status(&mut self, i2c: &mut I2C) -> Result<InterruptStatus> {
        self.read_field(i2c)
    }

    /// Set the upper interrupt threshold in lux.
    pub fn set_high_threshold(&mut self, lux: f32, i2c: &mut I2C) -> Result<()> {
        self.write_threshold(Register::HighThreshold, lux, i2c)
    }

    /// Set the lower interrupt threshold in lux.
    pub fn set_low_threshold(&mut self, lux: f32, i2c: &mut I2C) -> Result<()> {
        self.write_threshold(Register::LowThreshold, lux, i2c)
    }

    /// Read the upper interrupt threshold in lux.
    pub fn read_high_threshold(&mut self, i2c: &mut I2C) -> Result<u32> {
        self.read_threshold(Register::HighThreshold, i2c)
    }

    /// Read the lower interrupt threshold in lux.
    pub fn read_low_threshold(&mut self, i2c: &mut I2C) -> Result<u32> {
        self.read_threshold(Register::LowThreshold, i2c)
    }

    /// Read the ambient light intensity in lux.
    pub fn read_light(&mut self, i2c: &mut I2C) -> Result<u32> {
        let pair = self.gain_integration_pair(i2c)?;
        let raw = self.read_raw_light(i2c)?;

        Ok(lux::raw_to_lux(raw, pair))
    }

    /// Read the white channel light intensity in lux.
    pub fn read_white_light(&mut self, i2c: &mut I2C) -> Result<u32> {
        let pair = self.gain_integration_pair(i2c)?;
        let raw = self.read_raw_white_light(i2c)?;

        Ok(lux::raw_to_lux(raw, pair))
    }

    /// Read the raw count of the ambient light channel.
    pub fn read_raw_light(&mut self, i2c: &mut I2C) -> Result<u16> {
        self.read_register(Register::AmbientData, i2c)
    }

    /// Read the raw count of the white channel.
    pub fn read_raw_white_light(&mut self, i2c: &mut I2C) -> Result<u16> {
        self.read_register(Register::WhiteData, i2c)
    }

    /// The gain and integration time used for lux conversions.
    ///
    /// Taken from the last setting register value written or read by this
    /// driver, read back from the sensor if there is none yet.
    pub fn gain_integration_pair(&mut self, i2c: &mut I2C) -> Result<GainIntegrationPair> {
        let setting = match self.setting {
            Some(setting) => setting,
            None => self.read_register(Register::Setting, i2c)?,
        };

        GainIntegrationPair::from_setting(setting)
    }

    /// Writes a new value to a specific register
    pub fn write_register(&mut self, register: Register, data: u16, i2c: &mut I2C) -> Result<()> {
        let [low, high] = data.to_le_bytes();
        let write_data = [register.addr(), low, high];

        i2c.write(self.address, &write_data)
            .map_err(|_| VEML6030Error::WriteI2CError)?;

        log::debug!("Wrote {:#06x} to {:?}", data, register);

        if register == Register::Setting {
            self.setting = Some(data);
        }

        Ok(())
    }

    /// Reads the value of a specific register
    pub fn read_register(&mut self, register: Register, i2c: &mut I2C) -> Result<u16> {
        let value = self.fetch_register(register, i2c)?;

        if register == Register::Setting {
            self.setting = Some(value);
        }

        Ok(value)
    }

    /// Single 16-bit read without touching the cached setting.
    fn fetch_register(&self, register: Register, i2c: &mut I2C) -> Result<u16> {
        let mut read_data = [0; 2];

        i2c.write_read(self.address, &[register.addr()], &mut read_data)
            .map_err(|_| VEML6030Error::ReadI2CError)?;

        log::trace!("Read {:?} from {:?}", read_data, register);

        Ok(u16::from_le_bytes(read_data))
    }

    /// Read-modify-write of a single field, leaving all other bits untouched.
    fn update_field<T: FieldValue>(&mut self, value: T, i2c: &mut I2C) -> Result<()> {
        let field = T::FIELD;
        let current = self.fetch_register(field.register, i2c)?;
        let updated = register::apply_field(current, field, register::encode(value));

        self.write_register(field.register, updated, i2c)
    }

    fn read_field<T: FieldValue>(&mut self, i2c: &mut I2C) -> Result<T> {
        let value = self.read_register(T::FIELD.register, i2c)?;
        register::decode(value)
    }

    fn write_threshold(&mut self, register: Register, lux: f32, i2c: &mut I2C) -> Result<()> {
        lux::check_threshold(lux)?;

        let pair = self.gain_integration_pair(i2c)?;
        let raw = lux::lux_to_raw(lux, pair)?;

        self.write_register(register, raw, i2c)
    }

    fn read_threshold(&mut self, register: Register, i2c: &mut I2C) -> Result<u32> {
        let raw = self.read_register(register, i2c)?;
        let pair = self.gain_integration_pair(i2c)?;

        Ok(lux::threshold_to_lux(raw, pair))
    }
}

/// Shorthand for all functions returning an error in this module.
pub type Result<T> = core::result::Result<T, VEML6030Error>;

/// Represents any error that may happen while configuring or reading the sensor.
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq)]
pub enum VEML6030Error {
    /// An error occurred while reading from the sensor.
    ReadI2CError,
    /// An error occurred while writing to the sensor.
    WriteI2CError,
    /// The requested value is not one of the documented settings.
    InvalidSetting,
    /// The sensor returned a reserved bit pattern.
    UnknownFieldValue,
    /// The active gain and integration time have no lux resolution.
    UnsupportedConfiguration,
    /// The threshold lies outside of the range the sensor can be programmed with.
    OutOfRange,
}

impl VEML6030Error {
    /// Whether the error was reported by the I2C bus.
    pub fn is_bus_error(&self) -> bool {
        matches!(
            self,
            VEML6030Error::ReadI2CError | VEML6030Error::WriteI2CError
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::i2c::Mock as I2cMock;
    use embedded_hal_mock::MockError;
    use embedded_hal_mock::{delay::MockNoop as DelayMock, i2c::Transaction as I2cTransaction};
    use std::cell::RefCell;
    use std::rc::Rc;

    const ADDR: u8 = VEML6030_ADDR;

    /// Bus writes and delays in the order the driver issued them.
    #[derive(Debug, PartialEq)]
    enum Event {
        Write(Vec<u8>),
        Delay(u32),
    }

    type EventLog = Rc<RefCell<Vec<Event>>>;

    /// Forwards to the I2C mock and logs every successful write.
    struct RecordingI2c {
        mock: I2cMock,
        events: EventLog,
    }

    impl embedded_hal::blocking::i2c::Write for RecordingI2c {
        type Error = MockError;

        fn write(&mut self, address: u8, bytes: &[u8]) -> core::result::Result<(), MockError> {
            embedded_hal::blocking::i2c::Write::write(&mut self.mock, address, bytes)?;
            self.events.borrow_mut().push(Event::Write(bytes.to_vec()));
            Ok(())
        }
    }

    impl embedded_hal::blocking::i2c::WriteRead for RecordingI2c {
        type Error = MockError;

        fn write_read(
            &mut self,
            address: u8,
            bytes: &[u8],
            buffer: &mut [u8],
        ) -> core::result::Result<(), MockError> {
            embedded_hal::blocking::i2c::WriteRead::write_read(
                &mut self.mock,
                address,
                bytes,
                buffer,
            )
        }
    }

    /// Logs the requested milliseconds instead of sleeping.
    struct RecordingDelay {
        events: EventLog,
    }

    impl embedded_hal::blocking::delay::DelayMs<u32> for RecordingDelay {
        fn delay_ms(&mut self, ms: u32) {
            self.events.borrow_mut().push(Event::Delay(ms));
        }
    }

    fn recording(expectations: &[I2cTransaction]) -> (RecordingI2c, RecordingDelay, EventLog) {
        let events = EventLog::default();
        let i2c = RecordingI2c {
            mock: I2cMock::new(expectations),
            events: events.clone(),
        };
        let delay = RecordingDelay {
            events: events.clone(),
        };

        (i2c, delay, events)
    }

    fn read(register: u8, value: u16) -> I2cTransaction {
        I2cTransaction::write_read(ADDR, vec![register], value.to_le_bytes().to_vec())
    }

    fn write(register: u8, value: u16) -> I2cTransaction {
        let [low, high] = value.to_le_bytes();
        I2cTransaction::write(ADDR, vec![register, low, high])
    }

    /// Power on sequence of a sensor fresh out of reset.
    fn power_on() -> Vec<I2cTransaction> {
        vec![read(0x00, 0x0001), write(0x00, 0x0000)]
    }

    fn setup(expectations: &[I2cTransaction]) -> (VEML6030<I2cMock, DelayMock>, I2cMock) {
        let mut all = power_on();
        all.extend_from_slice(expectations);

        let mut i2c_mock = I2cMock::new(&all);
        let mut delay_mock = DelayMock::new();

        let sensor = VEML6030::new(ADDR, &mut delay_mock, &mut i2c_mock).unwrap();
        (sensor, i2c_mock)
    }

    #[test]
    fn test_new() {
        let expectations = [
            I2cTransaction::write_read(VEML6030_ALT_ADDR, [0x00].to_vec(), [0xC3, 0x10].to_vec()),
            I2cTransaction::write(VEML6030_ALT_ADDR, [0x00, 0xC2, 0x10].to_vec()),
        ];

        let mut i2c_mock = I2cMock::new(&expectations);
        let mut delay_mock = DelayMock::new();

        let sensor = VEML6030::new(VEML6030_ALT_ADDR, &mut delay_mock, &mut i2c_mock).unwrap();
        assert_eq!(sensor.address(), VEML6030_ALT_ADDR);
        assert_eq!(sensor.setting, Some(0x10C2));

        i2c_mock.done();
    }

    #[test]
    fn test_new_write_error() {
        let expectations = [
            read(0x00, 0x0001),
            write(0x00, 0x0000).with_error(MockError::Io(std::io::ErrorKind::Other)),
        ];

        let mut i2c_mock = I2cMock::new(&expectations);
        let mut delay_mock = DelayMock::new();

        let result = VEML6030::new(ADDR, &mut delay_mock, &mut i2c_mock);
        assert!(matches!(result, Err(VEML6030Error::WriteI2CError)));

        i2c_mock.done();
    }

    #[test]
    fn test_set_gain_keeps_other_fields() {
        // 800 ms and interrupt enabled are kept, gain goes to 1/8
        let (mut sensor, mut i2c_mock) = setup(&[read(0x00, 0x00C2), write(0x00, 0x10C2)]);

        sensor.set_gain(Gain::X1_8, &mut i2c_mock).unwrap();
        assert_eq!(sensor.setting, Some(0x10C2));

        i2c_mock.done();
    }

    #[test]
    fn test_read_gain() {
        let (mut sensor, mut i2c_mock) = setup(&[read(0x00, 0x1800)]);

        let result = sensor.read_gain(&mut i2c_mock).unwrap();
        assert_eq!(result, Gain::X1_4);
        assert_eq!(sensor.setting, Some(0x1800));

        i2c_mock.done();
    }

    #[test]
    fn test_integration_time() {
        let (mut sensor, mut i2c_mock) = setup(&[
            read(0x00, 0x0800),
            write(0x00, 0x0B00),
            read(0x00, 0x0B00),
            read(0x00, 0x0100),
        ]);

        sensor
            .set_integration_time(IntegrationTime::Ms25, &mut i2c_mock)
            .unwrap();
        assert_eq!(
            sensor.read_integration_time(&mut i2c_mock),
            Ok(IntegrationTime::Ms25)
        );

        // Reserved pattern
        assert_eq!(
            sensor.read_integration_time(&mut i2c_mock),
            Err(VEML6030Error::UnknownFieldValue)
        );

        i2c_mock.done();
    }

    #[test]
    fn test_persistence_and_interrupt_enable() {
        let (mut sensor, mut i2c_mock) = setup(&[
            read(0x00, 0x0000),
            write(0x00, 0x0030),
            read(0x00, 0x0030),
            write(0x00, 0x0032),
            read(0x00, 0x0032),
            read(0x00, 0x0032),
            read(0x00, 0x0032),
            write(0x00, 0x0030),
        ]);

        sensor
            .set_persistence(Persistence::Eight, &mut i2c_mock)
            .unwrap();
        sensor.enable_interrupt(&mut i2c_mock).unwrap();
        assert_eq!(
            sensor.read_persistence(&mut i2c_mock),
            Ok(Persistence::Eight)
        );
        assert_eq!(
            sensor.read_interrupt_setting(&mut i2c_mock),
            Ok(InterruptEnable::Enabled)
        );
        sensor.disable_interrupt(&mut i2c_mock).unwrap();

        i2c_mock.done();
    }

    #[test]
    fn test_shut_down_and_power_on() {
        let (mut sensor, mut i2c_mock) = setup(&[
            read(0x00, 0x1000),
            write(0x00, 0x1001),
            read(0x00, 0x1001),
            read(0x00, 0x1001),
            write(0x00, 0x1000),
        ]);
        let mut delay_mock = DelayMock::new();

        sensor.shut_down(&mut i2c_mock).unwrap();
        assert_eq!(
            sensor.read_power_state(&mut i2c_mock),
            Ok(PowerState::Shutdown)
        );
        sensor.power_on(&mut delay_mock, &mut i2c_mock).unwrap();
        assert_eq!(sensor.setting, Some(0x1000));

        i2c_mock.done();
    }

    #[test]
    fn test_power_save() {
        let (mut sensor, mut i2c_mock) = setup(&[
            read(0x03, 0x0006),
            write(0x03, 0x0007),
            read(0x03, 0x0007),
            write(0x03, 0x0003),
            read(0x03, 0x0003),
            read(0x03, 0x0003),
            read(0x03, 0x0003),
            write(0x03, 0x0002),
        ]);

        sensor.enable_power_save(&mut i2c_mock).unwrap();
        sensor
            .set_power_save_mode(PowerSaveMode::Mode2, &mut i2c_mock)
            .unwrap();
        assert_eq!(
            sensor.read_power_save_mode(&mut i2c_mock),
            Ok(PowerSaveMode::Mode2)
        );
        assert_eq!(
            sensor.read_power_save_enabled(&mut i2c_mock),
            Ok(PowerSaveEnable::Enabled)
        );
        sensor.disable_power_save(&mut i2c_mock).unwrap();

        // Only the setting register is cached
        assert_eq!(sensor.setting, Some(0x0000));

        i2c_mock.done();
    }

    #[test]
    fn test_read_interrupt_status() {
        let (mut sensor, mut i2c_mock) = setup(&[
            read(0x06, 0x0000),
            read(0x06, 0x4000),
            read(0x06, 0x8000),
            read(0x06, 0xC000),
        ]);

        assert_eq!(
            sensor.read_interrupt_status(&mut i2c_mock),
            Ok(InterruptStatus::None)
        );
        assert_eq!(
            sensor.read_interrupt_status(&mut i2c_mock),
            Ok(InterruptStatus::HighThreshold)
        );
        assert_eq!(
            sensor.read_interrupt_status(&mut i2c_mock),
            Ok(InterruptStatus::LowThreshold)
        );
        assert_eq!(
            sensor.read_interrupt_status(&mut i2c_mock),
            Err(VEML6030Error::UnknownFieldValue)
        );

        i2c_mock.done();
    }

    #[test]
    fn test_read_light() {
        // Power on leaves gain 1 and 100 ms cached, 1000 * 0.0576 = 57.6
        let (mut sensor, mut i2c_mock) = setup(&[read(0x04, 1000), read(0x05, 2000)]);

        assert_eq!(sensor.read_light(&mut i2c_mock), Ok(57));
        assert_eq!(sensor.read_white_light(&mut i2c_mock), Ok(115));

        i2c_mock.done();
    }

    #[test]
    fn test_read_light_compensated() {
        let (mut sensor, mut i2c_mock) = setup(&[
            read(0x00, 0x0000),
            write(0x00, 0x0800),
            read(0x00, 0x0800),
            write(0x00, 0x0B00),
            read(0x04, 60000),
            read(0x04, 60000),
        ]);

        sensor.set_gain(Gain::X2, &mut i2c_mock).unwrap();
        sensor
            .set_integration_time(IntegrationTime::Ms25, &mut i2c_mock)
            .unwrap();

        assert_eq!(sensor.read_raw_light(&mut i2c_mock), Ok(60000));
        // 60000 * 0.1152 = 6912 before compensation
        assert_eq!(sensor.read_light(&mut i2c_mock), Ok(9092));

        i2c_mock.done();
    }

    #[test]
    fn test_read_light_without_cached_setting() {
        let expectations = [read(0x00, 0x18C0), read(0x04, 100), read(0x04, 100)];

        let mut i2c_mock = I2cMock::new(&expectations);
        let mut sensor = VEML6030::<I2cMock, DelayMock>::with_address(ADDR);

        // gain 1/4, 800 ms: 100 * 0.0288 = 2.88
        assert_eq!(sensor.read_light(&mut i2c_mock), Ok(2));
        // read back once, cached afterwards
        assert_eq!(sensor.read_light(&mut i2c_mock), Ok(2));

        i2c_mock.done();
    }

    #[test]
    fn test_read_light_reserved_setting() {
        let expectations = [read(0x00, 0x0100)];

        let mut i2c_mock = I2cMock::new(&expectations);
        let mut sensor = VEML6030::<I2cMock, DelayMock>::with_address(ADDR);

        assert_eq!(
            sensor.read_light(&mut i2c_mock),
            Err(VEML6030Error::UnsupportedConfiguration)
        );

        i2c_mock.done();
    }

    #[test]
    fn test_failed_write_keeps_cache() {
        let (mut sensor, mut i2c_mock) = setup(&[
            read(0x00, 0x0000),
            write(0x00, 0x0800).with_error(MockError::Io(std::io::ErrorKind::Other)),
            read(0x04, 1000),
        ]);

        let result = sensor.set_gain(Gain::X2, &mut i2c_mock);
        assert_eq!(result, Err(VEML6030Error::WriteI2CError));
        assert_eq!(sensor.setting, Some(0x0000));

        // Still converted with gain 1
        assert_eq!(sensor.read_light(&mut i2c_mock), Ok(57));

        i2c_mock.done();
    }

    #[test]
    fn test_thresholds() {
        let (mut sensor, mut i2c_mock) = setup(&[
            write(0x01, 17361),
            write(0x02, 173),
            read(0x01, 17361),
            read(0x02, 173),
        ]);

        sensor.set_high_threshold(1000.0, &mut i2c_mock).unwrap();
        sensor.set_low_threshold(10.0, &mut i2c_mock).unwrap();

        // Truncation loses less than one count
        assert_eq!(sensor.read_high_threshold(&mut i2c_mock), Ok(999));
        assert_eq!(sensor.read_low_threshold(&mut i2c_mock), Ok(9));

        i2c_mock.done();
    }

    #[test]
    fn test_threshold_out_of_range() {
        // No bus traffic at all after power on
        let (mut sensor, mut i2c_mock) = setup(&[]);

        assert_eq!(
            sensor.set_high_threshold(120_001.0, &mut i2c_mock),
            Err(VEML6030Error::OutOfRange)
        );
        assert_eq!(
            sensor.set_low_threshold(-1.0, &mut i2c_mock),
            Err(VEML6030Error::OutOfRange)
        );

        i2c_mock.done();
    }

    #[test]
    fn test_threshold_unreachable() {
        let (mut sensor, mut i2c_mock) = setup(&[
            read(0x00, 0x0000),
            write(0x00, 0x0800),
            read(0x00, 0x0800),
            write(0x00, 0x08C0),
        ]);

        sensor.set_gain(Gain::X2, &mut i2c_mock).unwrap();
        sensor
            .set_integration_time(IntegrationTime::Ms800, &mut i2c_mock)
            .unwrap();

        // 1000 lx needs 277777 counts at 0.0036 lx per count
        assert_eq!(
            sensor.set_high_threshold(1000.0, &mut i2c_mock),
            Err(VEML6030Error::OutOfRange)
        );

        i2c_mock.done();
    }

    #[test]
    fn test_write_error() {
        let (mut sensor, mut i2c_mock) = setup(&[
            write(0x01, 0x0000),
            write(0x01, 0x0000).with_error(MockError::Io(std::io::ErrorKind::Other)),
        ]);

        let result = sensor.write_register(Register::HighThreshold, 0x0000, &mut i2c_mock);
        assert_eq!(result, Ok(()));

        let result = sensor.write_register(Register::HighThreshold, 0x0000, &mut i2c_mock);
        assert_eq!(result, Err(VEML6030Error::WriteI2CError));
        assert!(result.unwrap_err().is_bus_error());

        i2c_mock.done();
    }

    #[test]
    fn test_read_error() {
        let (mut sensor, mut i2c_mock) = setup(&[
            read(0x04, 0x1234),
            read(0x04, 0x0000).with_error(MockError::Io(std::io::ErrorKind::Other)),
        ]);

        let result = sensor.read_register(Register::AmbientData, &mut i2c_mock);
        assert_eq!(result, Ok(0x1234));

        let result = sensor.read_register(Register::AmbientData, &mut i2c_mock);
        assert_eq!(result, Err(VEML6030Error::ReadI2CError));
        assert!(!VEML6030Error::OutOfRange.is_bus_error());

        i2c_mock.done();
    }

    #[test]
    fn test_invalid_setting_issues_no_io() {
        let (_sensor, mut i2c_mock) = setup(&[]);

        assert_eq!(Gain::try_from(0.5f32), Err(VEML6030Error::InvalidSetting));
        assert_eq!(
            IntegrationTime::try_from(300u16),
            Err(VEML6030Error::InvalidSetting)
        );

        i2c_mock.done();
    }

    #[test]
    fn test_new_waits_after_power_on_write() {
        let (mut i2c, mut delay, events) = recording(&power_on());

        VEML6030::new(ADDR, &mut delay, &mut i2c).unwrap();
        assert_eq!(
            *events.borrow(),
            vec![
                Event::Write(vec![0x00, 0x00, 0x00]),
                Event::Delay(POWER_ON_DELAY_MS)
            ]
        );
        assert_eq!(POWER_ON_DELAY_MS, 4);

        i2c.mock.done();
    }

    #[test]
    fn test_power_on_waits_after_write() {
        let mut expectations = power_on();
        expectations.extend_from_slice(&[
            read(0x00, 0x0800),
            write(0x00, 0x0801),
            read(0x00, 0x0801),
            write(0x00, 0x0800),
        ]);
        let (mut i2c, mut delay, events) = recording(&expectations);

        let mut sensor = VEML6030::new(ADDR, &mut delay, &mut i2c).unwrap();
        sensor.shut_down(&mut i2c).unwrap();
        events.borrow_mut().clear();

        sensor.power_on(&mut delay, &mut i2c).unwrap();
        assert_eq!(
            *events.borrow(),
            vec![
                Event::Write(vec![0x00, 0x00, 0x08]),
                Event::Delay(POWER_ON_DELAY_MS)
            ]
        );

        i2c.mock.done();
    }

    #[test]
    fn test_shut_down_does_not_wait() {
        let mut expectations = power_on();
        expectations.extend_from_slice(&[read(0x00, 0x0000), write(0x00, 0x0001)]);
        let (mut i2c, mut delay, events) = recording(&expectations);

        let mut sensor = VEML6030::new(ADDR, &mut delay, &mut i2c).unwrap();
        events.borrow_mut().clear();

        sensor.shut_down(&mut i2c).unwrap();
        assert_eq!(*events.borrow(), vec![Event::Write(vec![0x00, 0x01, 0x00])]);

        i2c.mock.done();
    }

    #[test]
    fn test_power_on_write_error_skips_delay() {
        let expectations = [
            read(0x00, 0x0001),
            write(0x00, 0x0000).with_error(MockError::Io(std::io::ErrorKind::Other)),
        ];
        let (mut i2c, mut delay, events) = recording(&expectations);

        let result = VEML6030::new(ADDR, &mut delay, &mut i2c);
        assert!(matches!(result, Err(VEML6030Error::WriteI2CError)));
        assert!(events.borrow().is_empty());

        i2c.mock.done();
    }
}
