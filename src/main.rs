#![no_std]
#![no_main]

mod peripherals;
mod system;

// Panic handler and debugging
use defmt::unwrap;

use defmt_rtt as _;
use panic_probe as _;

// Device
use core::cell::RefCell;

use debouncr::{debounce_2, Edge};
use embassy_embedded_hal::shared_bus::blocking::spi::SpiDevice;
use embassy_executor::Spawner;
use embassy_nrf::{
    bind_interrupts,
    gpio::{Input, Level, Output, OutputDrive, Pull},
    peripherals::{P0_13, P0_15, SPI2},
    spim::{self, Spim},
};
use embassy_sync::{
    blocking_mutex::{
        raw::{NoopRawMutex, ThreadModeRawMutex},
        Mutex,
    },
    signal::Signal,
};
use embassy_time::{Duration, Timer};
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    SPIM2_SPIS2_SPI2 => spim::InterruptHandler<SPI2>;
});

// Crate
use peripherals::{backlight::Backlight, display::Display, flash::FlashResources};
use system::{
    config::SystemConfig,
    time::{TimeManager, TimeReference},
};

// Watchface
use daisy_face::{DaisyFace, APP_INFO};

// Others
use chrono::{NaiveDateTime, Timelike};

// Include current UTC epoch at compile time
include!(concat!(env!("OUT_DIR"), "/utc.rs"));
const TIMEZONE: i32 = 1 * 3_600;

// Communication channels
static INCREASE_BRIGHTNESS: Signal<ThreadModeRawMutex, bool> = Signal::new();
static TIME: Signal<ThreadModeRawMutex, NaiveDateTime> = Signal::new();

// Long-lived singletons
static SPI_BUS: StaticCell<Mutex<NoopRawMutex, RefCell<Spim<'static, SPI2>>>> = StaticCell::new();
static FACE: StaticCell<DaisyFace> = StaticCell::new();

/// Publish the wall-clock time once per minute, aligned to the minute
/// boundary. The first pass fires immediately so the face is correct
/// right after boot.
#[embassy_executor::task(pool_size = 1)]
async fn minute_tick(clock: TimeManager) {
    loop {
        let now = clock.get_time();
        TIME.signal(now);

        // 1..=60 seconds until the next minute boundary
        let rest = 60 - now.second() as u64;
        Timer::after(Duration::from_secs(rest)).await;
    }
}

/// Run one watchface pass for every published time and push the frame.
#[embassy_executor::task(pool_size = 1)]
async fn update_lcd(
    mut display: Display<'static, SPI2>,
    mut flash: FlashResources<'static, SPI2>,
    face: &'static mut DaisyFace,
) {
    loop {
        let time = TIME.wait().await;
        defmt::info!("Tick: {}:{:02}", time.hour(), time.minute());

        let swapped = unwrap!(face.update(&mut flash, time));
        if swapped {
            defmt::info!("Hour image swapped to {}", face.current_slot());
        }

        display.draw_frame(face.frame()).unwrap();
    }
}

/// Update backlight brightness
#[embassy_executor::task(pool_size = 1)]
async fn update_brightness(mut backlight: Backlight<'static>) {
    loop {
        if INCREASE_BRIGHTNESS.wait().await {
            if backlight.get_brightness() < 7 {
                backlight.brighter().unwrap();
            } else {
                backlight.off();
            }
        }
    }
}

/// Polls the button state every 10ms
#[embassy_executor::task(pool_size = 1)]
async fn poll_button(mut enable: Output<'static, P0_15>, pin: Input<'static, P0_13>) {
    let mut debounce = debounce_2(false);
    loop {
        // Enable button
        enable.set_high();
        // The button needs a short time to give stable outputs
        Timer::after(Duration::from_nanos(1)).await;

        // Poll button
        let edge = debounce.update(pin.is_high());
        if edge == Some(Edge::Rising) {
            INCREASE_BRIGHTNESS.signal(true);
        }

        // Button consumes around 34µA when P0.15 is left high.
        // To reduce current consumption, set it low most of the time.
        enable.set_low();

        // Re-schedule the timer interrupt in 10ms
        Timer::after(Duration::from_millis(10)).await;
    }
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_nrf::init(SystemConfig::new());
    defmt::info!(
        "Starting {} v{}.{} by {} ({})",
        APP_INFO.name,
        APP_INFO.version.0,
        APP_INFO.version.1,
        APP_INFO.author,
        APP_INFO.category,
    );
    defmt::info!("App UUID: {=[u8]:x}", &APP_INFO.uuid[..]);

    // Initialize Backlight
    let mut backlight = Backlight::init(
        Output::new(p.P0_14, Level::High, OutputDrive::Standard),
        Output::new(p.P0_22, Level::High, OutputDrive::Standard),
        Output::new(p.P0_23, Level::High, OutputDrive::Standard),
        0,
    );

    // Initialize Button
    let button = Input::new(p.P0_13, Pull::None);
    let btn_enable = Output::new(p.P0_15, Level::Low, OutputDrive::Standard);

    // Initialize SPI
    let mut spim_config = spim::Config::default();
    // Use SPI at 8MHz (the fastest clock available on the nRF52832),
    // otherwise refreshing will be super slow.
    spim_config.frequency = spim::Frequency::M8;
    // SPI must be used in mode 3. Mode 0 (the default) won't work.
    spim_config.mode = spim::MODE_3;

    let spim = Spim::new(p.SPI2, Irqs, p.P0_02, p.P0_04, p.P0_03, spim_config);

    // The LCD and the NOR flash share the SPI bus, each behind its own
    // chip select.
    let spi_bus = SPI_BUS.init(Mutex::new(RefCell::new(spim)));

    // Initialize resource flash
    let mut flash = FlashResources::init(SpiDevice::new(
        spi_bus,
        Output::new(p.P0_05, Level::High, OutputDrive::Standard),
    ));
    defmt::info!("Resource flash ID: {=u8:x}", flash.read_id());

    // Initialize LCD
    let display = Display::init(
        SpiDevice::new(
            spi_bus,
            Output::new(p.P0_25, Level::High, OutputDrive::Standard),
        ),
        Output::new(p.P0_18, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_26, Level::Low, OutputDrive::Standard),
    );
    backlight.set(2).unwrap();

    // Initialize watchface: shows the hour-12 image until the first tick
    let face = FACE.init(unwrap!(DaisyFace::new(&mut flash)));

    // Initialize time keeping from the build-time epoch
    let mut clock = TimeManager::init();
    let boot_time = unwrap!(NaiveDateTime::from_timestamp_opt(
        UTC_TIME + TIMEZONE as i64,
        0
    ));
    clock.set_time(TimeReference::from_datetime(boot_time));

    defmt::info!("Initialization finished");

    // Schedule tasks
    unwrap!(_spawner.spawn(poll_button(btn_enable, button)));
    unwrap!(_spawner.spawn(update_brightness(backlight)));
    unwrap!(_spawner.spawn(update_lcd(display, flash, face)));
    unwrap!(_spawner.spawn(minute_tick(clock)));
}
