//! One-shot hardware peripheral initialisation.
//!
//! Enumerates the PWM controllers the platform offers, selects the one
//! named in the configuration, configures it at the servo carrier
//! frequency, and opens the two servo channels and the laser lines.
//! Called once from the sentry task before the sequencer starts.
//!
//! On ESP-IDF a "PWM controller" is one of the four low-speed LEDC timers;
//! both servo channels share it, so both axes live in one frequency domain.

use log::info;

use crate::error::{Error, Result};

/// Identifier of one PWM controller (LEDC timer index on ESP32).
pub type PwmControllerId = u8;

/// Upper bound on controllers any supported platform enumerates.
pub const MAX_PWM_CONTROLLERS: usize = 4;

/// Controllers available on this platform, in enumeration order.
pub fn enumerate_pwm_controllers() -> heapless::Vec<PwmControllerId, MAX_PWM_CONTROLLERS> {
    // LEDC_TIMER_0 ..= LEDC_TIMER_3; the host simulation mirrors the chip.
    (0..MAX_PWM_CONTROLLERS as PwmControllerId).collect()
}

/// Look the configured controller up by identifier.  Absent ⇒ configuration
/// fault; never an unchecked index.
pub fn select_pwm_controller(
    available: &[PwmControllerId],
    wanted: PwmControllerId,
) -> Result<PwmControllerId> {
    if available.contains(&wanted) {
        info!("hw_init: PWM controller {} selected ({} available)", wanted, available.len());
        Ok(wanted)
    } else {
        Err(Error::Config("pwm controller not available"))
    }
}

// ── ESP-IDF opener ────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use esp::{EspTurret, open_turret};

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};
    use esp_idf_hal::ledc::config::TimerConfig;
    use esp_idf_hal::ledc::{LedcDriver, LedcTimerDriver, LowSpeed, Resolution};
    use esp_idf_hal::peripherals::Peripherals;
    use esp_idf_hal::units::FromValueType;
    use log::info;

    use crate::app::ports::TurretHardware;
    use crate::config::SentryConfig;
    use crate::control::angle::Axis;
    use crate::drivers::laser_bank::LaserBank;
    use crate::drivers::servo::ServoChannel;
    use crate::error::{Error, Result};
    use crate::pins;

    pub type EspLaserLine = PinDriver<'static, AnyOutputPin, Output>;
    pub type EspTurret =
        TurretHardware<ServoChannel<LedcDriver<'static>>, LaserBank<EspLaserLine, { pins::LASER_COUNT }>>;

    /// Take the peripherals and open everything the sequencer drives.
    pub fn open_turret(config: &SentryConfig) -> Result<EspTurret> {
        let p = Peripherals::take().map_err(|_| Error::Init("peripherals already taken"))?;

        let controller =
            super::select_pwm_controller(&super::enumerate_pwm_controllers(), config.pwm_controller)?;

        let timer_cfg = TimerConfig::default()
            .frequency(config.pwm_frequency_hz.Hz().into())
            .resolution(Resolution::Bits14);
        let timer = match controller {
            0 => LedcTimerDriver::new(p.ledc.timer0, &timer_cfg),
            1 => LedcTimerDriver::new(p.ledc.timer1, &timer_cfg),
            2 => LedcTimerDriver::new(p.ledc.timer2, &timer_cfg),
            _ => LedcTimerDriver::new(p.ledc.timer3, &timer_cfg),
        }
        .map_err(|_| Error::Config("pwm controller rejected carrier frequency"))?;
        // The timer must outlive both channels; the sentry never tears down.
        let timer: &'static LedcTimerDriver<'static, LowSpeed> = Box::leak(Box::new(timer));

        // SAFETY: pin numbers come from a validated config with no
        // duplicates, and nothing else in the firmware opens GPIOs.
        let pan_pin = unsafe { AnyOutputPin::new(config.pan_gpio) };
        let tilt_pin = unsafe { AnyOutputPin::new(config.tilt_gpio) };

        let pan = LedcDriver::new(p.ledc.channel0, timer, pan_pin)
            .map_err(|_| Error::Init("pan PWM channel"))?;
        let tilt = LedcDriver::new(p.ledc.channel1, timer, tilt_pin)
            .map_err(|_| Error::Init("tilt PWM channel"))?;

        let mut lines: heapless::Vec<EspLaserLine, { pins::LASER_COUNT }> = heapless::Vec::new();
        for &gpio in &config.laser_gpios {
            // SAFETY: see above.
            let pin = unsafe { AnyOutputPin::new(gpio) };
            let driver = PinDriver::output(pin).map_err(|_| Error::Init("laser line"))?;
            lines
                .push(driver)
                .map_err(|_| Error::Init("laser line"))?;
        }
        let lines = lines
            .into_array()
            .map_err(|_| Error::Init("laser line count"))?;

        info!(
            "hw_init: LEDC timer {} @ {} Hz (pan=CH0, tilt=CH1), {} laser lines",
            controller,
            config.pwm_frequency_hz,
            pins::LASER_COUNT
        );

        Ok(TurretHardware {
            pan: ServoChannel::new(Axis::Pan, pan),
            tilt: ServoChannel::new(Axis::Tilt, tilt),
            lasers: LaserBank::new(lines)?,
        })
    }
}
