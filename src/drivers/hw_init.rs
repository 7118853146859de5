//! One-shot hardware peripheral initialization.
//!
//! Configures GPIO directions and the button interrupt using raw ESP-IDF
//! sys calls. Called once from `main()` before the loop starts.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use crate::drivers::button::ButtonEdgeDetector;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    IsrInstallFailed(i32),
    SpiffsMountFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
            Self::SpiffsMountFailed(rc) => write!(f, "SPIFFS mount failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the loop; single-threaded.
    unsafe {
        init_gpio_inputs()?;
        init_gpio_outputs()?;
        init_sensor_buses()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

#[cfg(target_os = "espidf")]
unsafe fn configure(pin: i32, mode: gpio_mode_t, pull_up: bool, intr: gpio_int_type_t) -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode,
        pull_up_en: if pull_up {
            gpio_pullup_t_GPIO_PULLUP_ENABLE
        } else {
            gpio_pullup_t_GPIO_PULLUP_DISABLE
        },
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: intr,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
    Ok(())
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    unsafe {
        configure(
            pins::BUTTON_GPIO,
            gpio_mode_t_GPIO_MODE_INPUT,
            true,
            gpio_int_type_t_GPIO_INTR_NEGEDGE,
        )?;
    }
    info!("hw_init: button input configured (GPIO{}, falling edge)", pins::BUTTON_GPIO);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured pin.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    true
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    unsafe {
        configure(
            pins::INDICATOR_GPIO,
            gpio_mode_t_GPIO_MODE_OUTPUT,
            false,
            gpio_int_type_t_GPIO_INTR_DISABLE,
        )?;
        gpio_set_level(pins::INDICATOR_GPIO, 0);
    }
    info!("hw_init: indicator output configured (GPIO{})", pins::INDICATOR_GPIO);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin.
    unsafe { gpio_set_level(pin, if high { 1 } else { 0 }); }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── Sensor buses (open-drain, idle high) ──────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_sensor_buses() -> Result<(), HwInitError> {
    for pin in [pins::ONE_WIRE_GPIO, pins::DHT_GPIO] {
        unsafe {
            configure(
                pin,
                gpio_mode_t_GPIO_MODE_INPUT_OUTPUT_OD,
                true,
                gpio_int_type_t_GPIO_INTR_DISABLE,
            )?;
            gpio_set_level(pin, 1);
        }
    }
    info!(
        "hw_init: sensor buses open-drain (1-Wire GPIO{}, DHT GPIO{})",
        pins::ONE_WIRE_GPIO,
        pins::DHT_GPIO
    );
    Ok(())
}

// ── SPIFFS ────────────────────────────────────────────────────

/// Register the SPIFFS partition at `mount_point`, formatting it if the
/// first mount fails.
#[cfg(target_os = "espidf")]
pub fn mount_spiffs(mount_point: &str) -> Result<(), HwInitError> {
    let mut base = [0u8; 17];
    let b = mount_point.as_bytes();
    let len = b.len().min(16);
    base[..len].copy_from_slice(&b[..len]);

    let conf = esp_vfs_spiffs_conf_t {
        base_path: base.as_ptr() as *const _,
        partition_label: core::ptr::null(),
        max_files: 4,
        format_if_mount_failed: true,
    };
    // SAFETY: `conf` and `base` outlive the call; the VFS copies the path.
    let ret = unsafe { esp_vfs_spiffs_register(&conf) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::SpiffsMountFailed(ret));
    }

    let mut total: usize = 0;
    let mut used: usize = 0;
    // SAFETY: default partition registered above.
    if unsafe { esp_spiffs_info(core::ptr::null(), &mut total, &mut used) } == ESP_OK as i32 {
        info!("hw_init: SPIFFS mounted at {} ({}/{} bytes used)", mount_point, used, total);
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn mount_spiffs(mount_point: &str) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): SPIFFS mount at {} skipped", mount_point);
    Ok(())
}

// ── GPIO ISR Service ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe extern "C" fn button_gpio_isr(arg: *mut core::ffi::c_void) {
    // SAFETY: `arg` is the `&'static ButtonEdgeDetector` registered in
    // init_isr_service(); the detector only uses atomics.
    let detector = unsafe { &*(arg as *const ButtonEdgeDetector) };
    // SAFETY: esp_timer_get_time is an RTC counter read; safe in ISR context.
    let now_ms = (unsafe { esp_timer_get_time() } / 1_000) as u32;
    detector.on_falling_edge(now_ms);
}

/// Install the per-pin GPIO ISR service and attach the button handler.
/// Call after init_peripherals() and before the loop.
#[cfg(target_os = "espidf")]
pub fn init_isr_service(button: &'static ButtonEdgeDetector) -> Result<(), HwInitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed. The handler argument points at a
    // `'static` detector.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        // Button: falling edge (active-low with pull-up already configured)
        gpio_set_intr_type(pins::BUTTON_GPIO, gpio_int_type_t_GPIO_INTR_NEGEDGE);
        let ret = gpio_isr_handler_add(
            pins::BUTTON_GPIO,
            Some(button_gpio_isr),
            button as *const ButtonEdgeDetector as *mut core::ffi::c_void,
        );
        if ret != ESP_OK {
            return Err(HwInitError::IsrInstallFailed(ret));
        }
        gpio_intr_enable(pins::BUTTON_GPIO);

        info!(
            "hw_init: ISR service installed (button, debounce {} ms)",
            button.window_ms()
        );
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service(button: &'static ButtonEdgeDetector) -> Result<(), HwInitError> {
    log::info!(
        "hw_init(sim): ISR service skipped (debounce {} ms)",
        button.window_ms()
    );
    Ok(())
}
