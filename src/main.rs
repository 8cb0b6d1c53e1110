pub mod feedback;
pub mod hid;
pub mod input;
pub mod layout;
pub mod persistence;

use crate::feedback::haptic::SolenoidDriver;
use crate::feedback::led::{run_led_task, LedPattern, Ws2812Strip};
use crate::hid::{TransportHandle, TransportProfile};
use crate::input::engine::{DeviceStatus, EngineEvent, EngineHandle, EngineSettings};
use crate::input::nudge::{Accelerometer, DisconnectedAccelerometer, Mpu6050};
use crate::input::sampler::{GpioControlLine, ShiftRegisterSampler};
use crate::persistence::{next_mode, SettingsStore};
use color_eyre::eyre::{eyre, Result};
use rppal::gpio::Gpio;
use rppal::i2c::I2c;
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Settle time before the post-mode-switch restart, so the persisted write
/// and the transport teardown are definitely done. The process is about to
/// exit, so blocking here is fine.
const RESTART_SETTLE_MS: u64 = 2000;

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;
    info!("=== Pincontroller starting ===");

    let store = SettingsStore::open_default()?;
    let settings = store.load();
    let layout = settings.layout();
    info!("Booting into layout: {}", layout);

    // Transport first: its device identity depends on the boot layout.
    let transport = TransportHandle::spawn(TransportProfile::for_layout(layout))
        .map_err(|e| eyre!("Failed to spawn transport: {}", e))?;

    let gpio = Gpio::new().map_err(|e| eyre!("GPIO init failed: {}", e))?;
    let sampler = ShiftRegisterSampler::new(&gpio)
        .map_err(|e| eyre!("Failed to set up button sampler: {}", e))?;
    let control = GpioControlLine::new(&gpio)
        .map_err(|e| eyre!("Failed to set up mode button: {}", e))?;
    let haptics = SolenoidDriver::new(&gpio)
        .map_err(|e| eyre!("Failed to set up solenoids: {}", e))?;

    // A missing accelerometer is a degraded session, not a startup failure.
    let sensor: Box<dyn Accelerometer> = match I2c::new() {
        Ok(i2c) => match Mpu6050::new(i2c) {
            Ok(mpu) => Box::new(mpu),
            Err(e) => {
                warn!("MPU6050 setup failed ({}), nudge detection disabled", e);
                Box::new(DisconnectedAccelerometer)
            }
        },
        Err(e) => {
            warn!("I2C unavailable ({}), nudge detection disabled", e);
            Box::new(DisconnectedAccelerometer)
        }
    };

    let (status_sender, status_receiver) = watch::channel(DeviceStatus {
        layout,
        connected: false,
    });
    let (event_sender, mut event_receiver) = mpsc::channel(16);

    let _engine = EngineHandle::spawn(
        layout,
        Box::new(sampler),
        sensor,
        Box::new(transport.emitter()),
        Box::new(haptics),
        Box::new(control),
        EngineSettings::default(),
        status_sender,
        event_sender,
    )
    .map_err(|e| eyre!("Failed to spawn input engine: {}", e))?;

    spawn_led_task(settings.led_pattern, status_receiver);

    info!("Pincontroller up, polling inputs");

    // Supervisor: the engine runs on its own; the only out-of-band event is
    // the operator asking for the next game mode.
    while let Some(event) = event_receiver.recv().await {
        match event {
            EngineEvent::ModeSwitchRequested => {
                cycle_mode(&store, &transport).await?;
            }
        }
    }

    error!("Engine event channel closed unexpectedly");
    Err(eyre!("Input engine stopped"))
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}

fn spawn_led_task(pattern_setting: u8, status_receiver: watch::Receiver<DeviceStatus>) {
    let pattern = LedPattern::from_setting(pattern_setting);
    match Ws2812Strip::new(pattern) {
        Ok(strip) => {
            tokio::spawn(run_led_task(Box::new(strip), status_receiver));
        }
        // Cosmetic only; the device is fully usable without the strip.
        Err(e) => warn!("LED strip unavailable ({}), continuing without it", e),
    }
}

/// Persist-then-restart mode cycling. The engine has already flushed every
/// pressed action before reporting the event, so tearing the transport down
/// here cannot strand a held key.
async fn cycle_mode(store: &SettingsStore, transport: &TransportHandle) -> Result<()> {
    let mut settings = store.load();
    let from = settings.mode;
    settings.mode = next_mode(settings.mode);
    info!("Cycling game mode {} -> {}", from, settings.mode);

    store.store(&settings)?;
    transport.shutdown().await;

    // Deliberate multi-second settle immediately before the restart.
    tokio::time::sleep(tokio::time::Duration::from_millis(RESTART_SETTLE_MS)).await;
    info!("Restarting into mode {}", settings.mode);
    std::process::exit(0);
}
