//! Pico 2 W firmware entry point
//!
//! Core layout:
//!
//! - Core 1 polls the pulse input, drives the display and RTC, and runs the
//!   pulse coordinator.
//! - Core 0 owns flash and the radio: it consumes checkpoint requests from
//!   the mailbox and runs the delivery manager.
//!
//! # Usage
//!
//! ```bash
//! PULSE_TALLY_SSID=MyNet PULSE_TALLY_PASSWORD=secret \
//!     cargo build --release --features pico2_w \
//!     --target thumbv8m.main-none-eabihf --bin pulse-tally-pico2w
//! ```

#![no_std]
#![no_main]

use embassy_executor::{Executor, Spawner};
use embassy_rp::bind_interrupts;
use embassy_rp::flash::Flash;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::multicore::{spawn_core1, Stack as CoreStack};
use embassy_rp::peripherals::{DMA_CH0, I2C0, I2C1, PIO0};
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embassy_time::{Duration, Instant, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use cyw43_pio::{PioSpi, DEFAULT_CLOCK_DIVIDER};
use pulse_tally::config;
use pulse_tally::core::mailbox::MAILBOX;
use pulse_tally::counter::PulseCoordinator;
use pulse_tally::devices::{Ds3231, Hd44780, SharedDisplay};
use pulse_tally::network::DeliveryManager;
use pulse_tally::platform::rp2350::{
    lockout_point, Cyw43Radio, Rp2350Flash, Rp2350Gpio, Rp2350I2c, Rp2350Lockout, Rp2350Timer,
};
use pulse_tally::platform::traits::{GpioInterface, GpioMode};
use pulse_tally::storage::{CounterLog, CounterRecord};
use pulse_tally::{log_error, log_info, log_warn};

#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: embassy_rp::block::ImageDef = embassy_rp::block::ImageDef::secure_exe();

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});

type DisplayDevice = Hd44780<Rp2350I2c<'static, I2C0>, Rp2350Timer>;
type Lcd = SharedDisplay<DisplayDevice>;

static DISPLAY: StaticCell<Lcd> = StaticCell::new();
static CORE1_STACK: StaticCell<CoreStack<8192>> = StaticCell::new();
static EXECUTOR1: StaticCell<Executor> = StaticCell::new();
static CYW43_STATE: StaticCell<cyw43::State> = StaticCell::new();
static NET_RESOURCES: StaticCell<embassy_net::StackResources<8>> = StaticCell::new();

/// CYW43439 driver event loop
#[embassy_executor::task]
async fn wifi_task(
    runner: cyw43::Runner<'static, Output<'static>, PioSpi<'static, PIO0, 0, DMA_CH0>>,
) -> ! {
    runner.run().await
}

/// embassy-net stack event loop
#[embassy_executor::task]
async fn net_task(mut runner: embassy_net::Runner<'static, cyw43::NetDriver<'static>>) -> ! {
    runner.run().await
}

/// Sensor core: pulse polling, clock, display
#[embassy_executor::task]
async fn sensor_task(
    display: &'static Lcd,
    mut rtc: Ds3231<Rp2350I2c<'static, I2C1>>,
    pulse: Rp2350Gpio<'static>,
    restored: Option<CounterRecord>,
) {
    let mut clock = match rtc.now() {
        Ok(c) => c,
        Err(e) => {
            log_warn!("RTC unreadable at boot: {}", e);
            Default::default()
        }
    };

    let mut coordinator = PulseCoordinator::new(display, &MAILBOX, &clock);
    coordinator.boot(restored.as_ref(), &clock);

    let mut last_clock_ms = Instant::now().as_millis();
    loop {
        // Park here whenever the other core needs the flash quiesced
        lockout_point();

        let now_ms = Instant::now().as_millis();
        if now_ms - last_clock_ms >= config::CLOCK_REFRESH_MS {
            last_clock_ms = now_ms;
            match rtc.now() {
                Ok(c) => clock = c,
                Err(e) => log_warn!("RTC read failed: {}", e),
            }
        }

        coordinator.poll(pulse.read(), now_ms, &clock);
        Timer::after(Duration::from_millis(1)).await;
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    log_info!("pulse-tally starting");

    // Flash comes up first so the checkpoint can be read before the sensor
    // core starts counting
    let mut flash = Rp2350Flash::new(Flash::new_blocking(p.FLASH));
    let mut lockout = Rp2350Lockout;
    let restored = match CounterLog::find_latest(&mut flash) {
        Ok(rec) => rec,
        Err(e) => {
            log_error!("Checkpoint scan failed: {}", e);
            None
        }
    };

    // Display on I2C0 (GP4 = SDA, GP5 = SCL)
    let display_bus = Rp2350I2c::new(I2c::new_blocking(
        p.I2C0,
        p.PIN_5,
        p.PIN_4,
        i2c::Config::default(),
    ));
    let mut lcd = Hd44780::new(display_bus, Rp2350Timer::new());
    if let Err(e) = lcd.init().and_then(|_| lcd.draw_frame()) {
        log_warn!("Display init failed: {}", e);
    }
    let display: &'static Lcd = DISPLAY.init(SharedDisplay::new(lcd));

    // RTC on I2C1 (GP6 = SDA, GP7 = SCL)
    let rtc = Ds3231::new(Rp2350I2c::new(I2c::new_blocking(
        p.I2C1,
        p.PIN_7,
        p.PIN_6,
        i2c::Config::default(),
    )));

    // Pulse input on GP16, idle high
    let pulse = Rp2350Gpio::new(Input::new(p.PIN_16, Pull::Up), GpioMode::InputPullUp);

    spawn_core1(
        p.CORE1,
        CORE1_STACK.init(CoreStack::new()),
        move || {
            let executor1 = EXECUTOR1.init(Executor::new());
            executor1.run(|spawner| {
                spawner.must_spawn(sensor_task(display, rtc, pulse, restored));
            });
        },
    );

    // WiFi chip over PIO SPI (PIN_23 power, PIN_25 CS, PIN_24 DIO, PIN_29 CLK)
    let fw = include_bytes!("../cyw43-firmware/43439A0.bin");
    let clm = include_bytes!("../cyw43-firmware/43439A0_clm.bin");
    let pwr = Output::new(p.PIN_23, Level::Low);
    let cs = Output::new(p.PIN_25, Level::High);
    let mut pio = Pio::new(p.PIO0, Irqs);
    let spi = PioSpi::new(
        &mut pio.common,
        pio.sm0,
        DEFAULT_CLOCK_DIVIDER,
        pio.irq0,
        cs,
        p.PIN_24,
        p.PIN_29,
        p.DMA_CH0,
    );
    let state = CYW43_STATE.init(cyw43::State::new());
    let (net_device, control, runner) = cyw43::new(state, pwr, spi, fw).await;
    spawner.must_spawn(wifi_task(runner));

    let net_config = embassy_net::Config::dhcpv4(Default::default());
    let seed = 0x0123_4567_89ab_cdef; // TODO: seed from the ROSC instead
    let (stack, net_runner) = embassy_net::new(
        net_device,
        net_config,
        NET_RESOURCES.init(embassy_net::StackResources::new()),
        seed,
    );
    spawner.must_spawn(net_task(net_runner));

    let radio = Cyw43Radio::new(control, stack, clm);
    let mut manager = DeliveryManager::new(radio, &MAILBOX, display);

    // Storage core loop: persist checkpoints, drive the radio
    loop {
        if let Some(req) = MAILBOX.take_save_request() {
            match CounterLog::save(
                &mut flash,
                &mut lockout,
                req.value,
                req.day,
                req.month,
                req.year,
                req.hour,
            ) {
                Ok(rec) => log_info!("Checkpoint seq {} written", rec.seq),
                Err(e) => log_error!("Checkpoint write failed: {}", e),
            }
        }

        manager.poll(Instant::now().as_millis()).await;
        Timer::after(Duration::from_millis(100)).await;
    }
}
