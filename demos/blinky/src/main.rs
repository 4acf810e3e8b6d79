//! Blinky Example - interval timers on the host port
//!
//! Blinks a pretend LED from a polled loop, runs a countdown, then lets a
//! pulse generator drive an interrupt-dispatched timer.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::thread;
use std::time::Duration;

use lapse_core::{ActiveTimer, CallbackOrder, Edge, IntervalTimer, TimerConfig};
use lapse_posix::{HostClock, PortError, Pulser, SoftInterrupts};
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;

const LED_PERIOD_MS: u32 = 250;
const BLINKS: u32 = 8;
const BUTTON_PIN: u8 = 2;

static LED: AtomicBool = AtomicBool::new(false);
static PRESSES: AtomicU32 = AtomicU32::new(0);

static BUTTON: ActiveTimer<'static, HostClock> = ActiveTimer::new();

fn toggle_led() {
    let on = !LED.fetch_xor(true, Ordering::SeqCst);
    info!("LED {}", if on { "on" } else { "off" });
}

fn on_press() {
    PRESSES.fetch_add(1, Ordering::SeqCst);
}

fn on_press_duration(ms: u32) {
    info!("button: {} ms since previous press", ms);
}

fn button_isr() {
    BUTTON.dispatch();
}

fn poll_slice() {
    thread::sleep(Duration::from_millis(1));
}

fn blink(clock: HostClock) {
    let config = TimerConfig::builder()
        .interval(LED_PERIOD_MS)
        .repeat_limit(BLINKS)
        .build();
    let mut led = IntervalTimer::with_config(clock, config);
    led.set_callback_fn(toggle_led);

    while led.is_running() {
        if led.is_overdue() {
            info!("LED loop is falling behind");
        }
        led.check();
        poll_slice();
    }

    info!(
        "blinked {} times, average period {} ms, last {} ms",
        led.event_count(),
        led.average_event_duration(BLINKS as usize),
        led.last_event_duration()
    );
}

fn countdown(clock: HostClock) {
    let mut timer = IntervalTimer::with_state(clock, 0, false, 0);
    let mut last_reported = u32::MAX;

    loop {
        let left = timer.countdown_with(1_000, || info!("countdown done"));
        if left == 0 {
            break;
        }
        let tenths = left / 100;
        if tenths != last_reported {
            info!("countdown: {} ms left", left);
            last_reported = tenths;
        }
        poll_slice();
    }
}

fn button(clock: HostClock) -> Result<(), PortError> {
    let mut timer = IntervalTimer::new(clock);
    timer.set_callback_fn(on_press);
    timer.set_duration_callback_fn(on_press_duration);
    timer.set_callback_order(CallbackOrder::DurationFirst);
    BUTTON.install(timer);

    let mut lines = SoftInterrupts::new();
    BUTTON.attach(&mut lines, BUTTON_PIN, Edge::Rising, button_isr)?;

    for _ in 0..3 {
        thread::sleep(Duration::from_millis(120));
        lines.pulse(BUTTON_PIN)?;
    }

    let pulser = Pulser::start(Duration::from_millis(200), button_isr)?;
    thread::sleep(Duration::from_millis(1_050));
    BUTTON.pause_all();
    let pulses = pulser.stop();

    if let Some((count, average, uptime)) = BUTTON.with(|t| {
        (
            t.event_count(),
            t.average_event_duration(10),
            t.print_run_time(),
        )
    }) {
        info!(
            "{} presses ({} from the pulser), average gap {} ms, uptime {}",
            count, pulses, average, uptime
        );
    }
    info!("press callback ran {} times", PRESSES.load(Ordering::SeqCst));
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    SimpleLogger::new().with_level(LevelFilter::Info).init()?;

    let clock = HostClock::new();
    blink(clock);
    countdown(clock);
    button(clock)?;

    let elapsed = IntervalTimer::new(clock);
    info!("demo finished after {}", elapsed.print_time(elapsed.uptime_secs()));
    Ok(())
}
