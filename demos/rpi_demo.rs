// This example demonstrates how to use the VEML6030 sensor with a Raspberry Pi.
// Build it with `--features rpi-demo` on the Pi itself.

use embedded_hal::blocking::delay::DelayMs;
use linux_embedded_hal as hal;
use veml6030::{Gain, IntegrationTime, InterruptStatus, VEML6030, VEML6030_ADDR};

fn main() {
    let mut i2c = hal::I2cdev::new("/dev/i2c-1").unwrap();
    let mut delay = hal::Delay;

    // Create a new VEML6030 instance, this powers the sensor on
    let mut veml6030 = VEML6030::new(VEML6030_ADDR, &mut delay, &mut i2c).unwrap();

    // Low gain keeps the sensor out of saturation in daylight
    if let Err(e) = veml6030.set_gain(Gain::X1_8, &mut i2c) {
        log::error!("Error setting gain: {:?}", e);
    }
    if let Err(e) = veml6030.set_integration_time(IntegrationTime::Ms100, &mut i2c) {
        log::error!("Error setting integration time: {:?}", e);
    }

    match veml6030.gain_integration_pair(&mut i2c) {
        Ok(pair) => log::info!("Resolution: {} lux per count", pair.resolution()),
        Err(e) => log::error!("Error reading configuration: {:?}", e),
    }

    // Raise the interrupt outside of 50 - 2000 lux
    veml6030.set_low_threshold(50.0, &mut i2c).unwrap();
    veml6030.set_high_threshold(2000.0, &mut i2c).unwrap();
    veml6030.enable_interrupt(&mut i2c).unwrap();

    for _ in 0..300 {
        match veml6030.read_light(&mut i2c) {
            Ok(reading) => log::info!("Lux Value: {}", reading),
            Err(e) => log::error!("Error reading sensor: {:?}", e),
        }

        match veml6030.read_interrupt_status(&mut i2c) {
            Ok(InterruptStatus::None) => {}
            Ok(status) => log::info!("Threshold crossed: {:?}", status),
            Err(e) => log::error!("Error reading interrupt status: {:?}", e),
        }

        delay.delay_ms(1000u32);
    }

    // The sensor keeps the last reading while shut down
    match veml6030.shut_down(&mut i2c) {
        Ok(_) => log::info!("Sensor shut down"),
        Err(e) => log::error!("Error shutting down: {:?}", e),
    }

    // Just some loop so we never return
    loop {
        delay.delay_ms(1000u32);
    }
}
