use std::io;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use clap::Parser;
use cursor_wm::constants::{BTN_LEFT, BTN_RIGHT};
use cursor_wm::cursor::{AxisEvent, AxisOrientation, ButtonEvent, ButtonState, InputDevice};
use cursor_wm::desktop::Desktop;
use cursor_wm::node::ViewId;
use cursor_wm::part::Part;
use cursor_wm::{Config, Rect, Seat};

#[derive(Parser, Debug)]
#[command(
    name = "cursor-bench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Replays synthetic pointer gestures through the seat and reports throughput"
)]
struct BenchCli {
    /// How long to run the benchmark.
    #[arg(
        short = 'd',
        long = "duration",
        value_name = "SECONDS",
        default_value_t = 5.0
    )]
    duration_seconds: f64,

    /// Number of mapped windows the hit-test has to walk through.
    #[arg(short = 'w', long = "windows", value_name = "COUNT", default_value_t = 16)]
    windows: u32,

    /// Resize through the preview outline instead of live geometry.
    #[arg(long = "no-live-resize")]
    no_live_resize: bool,
}

struct BenchConfig {
    duration: Duration,
    windows: u32,
    live_resize: bool,
}

impl TryFrom<&BenchCli> for BenchConfig {
    type Error = String;

    fn try_from(cli: &BenchCli) -> Result<Self, Self::Error> {
        if !(0.1..=600.0).contains(&cli.duration_seconds) {
            return Err("duration must be between 0.1 and 600 seconds".to_string());
        }
        if !(1..=512).contains(&cli.windows) {
            return Err("windows must be between 1 and 512".to_string());
        }
        Ok(Self {
            duration: Duration::from_secs_f64(cli.duration_seconds),
            windows: cli.windows,
            live_resize: !cli.no_live_resize,
        })
    }
}

fn main() -> io::Result<()> {
    let args = BenchCli::parse();
    let config = BenchConfig::try_from(&args)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;

    let stats = run_benchmark(&config);
    println!("{}", stats.final_report(&config));
    Ok(())
}

/// Seat plus host with a synthetic clock.
struct Replay {
    desktop: Desktop,
    seat: Seat,
    views: Vec<ViewId>,
    clock: u32,
    events: u64,
}

impl Replay {
    fn new(config: &BenchConfig, rng: &mut Rng) -> Self {
        let mut desktop = Desktop::default();
        desktop.add_output(Rect::new(0, 0, 1920, 1080));
        desktop.add_output(Rect::new(1920, 0, 1920, 1080));
        let views = (0..config.windows)
            .map(|i| {
                let x = rng.range(0, 3200);
                let y = rng.range(40, 700);
                desktop.add_view(&format!("bench {i}"), Rect::new(x, y, 480, 320))
            })
            .collect();
        let seat_config = Config {
            resize_draw_contents: config.live_resize,
            ..Config::default()
        };
        Self {
            desktop,
            seat: Seat::new(seat_config),
            views,
            clock: 1,
            events: 0,
        }
    }

    fn tick(&mut self) -> u32 {
        // 8 ms apart keeps the resize throttle admitting most updates.
        self.clock = self.clock.wrapping_add(8);
        self.clock
    }

    fn motion_to(&mut self, x: f64, y: f64) {
        let time = self.tick();
        self.seat
            .handle_motion_absolute(&mut self.desktop, InputDevice::Pointer, time, x, y);
        self.seat.handle_frame(&mut self.desktop);
        self.events += 1;
    }

    fn button(&mut self, button: u32, state: ButtonState) {
        let event = ButtonEvent {
            time_msec: self.tick(),
            button,
            state,
        };
        self.seat.handle_button(&mut self.desktop, &event);
        self.seat.handle_frame(&mut self.desktop);
        self.events += 1;
    }

    fn scroll(&mut self, clicks: f64) {
        let event = AxisEvent::wheel(self.tick(), AxisOrientation::Vertical, clicks);
        self.seat.handle_axis(&mut self.desktop, &event);
        self.seat.handle_frame(&mut self.desktop);
        self.events += 1;
    }

    fn drag(&mut self, from: (f64, f64), to: (f64, f64), steps: u32) {
        self.motion_to(from.0, from.1);
        self.button(BTN_LEFT, ButtonState::Pressed);
        for step in 1..=steps {
            let t = step as f64 / steps as f64;
            self.motion_to(from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t);
        }
        self.button(BTN_LEFT, ButtonState::Released);
    }

    fn run_gesture(&mut self, rng: &mut Rng) {
        let view = self.views[rng.range(0, self.views.len() as i32) as usize];
        let Some(title) = self.desktop.title_box(view) else {
            return;
        };
        let grip = (title.x as f64 + 10.0, title.y as f64 + 5.0);
        match rng.range(0, 5) {
            0 => {
                let to = (rng.range(0, 3840) as f64, rng.range(0, 1080) as f64);
                self.drag(grip, to, 24);
            }
            1 => {
                if let Some(corner) = self.desktop.border_box(view, Part::CornerBottomRight) {
                    let from = (corner.x as f64 + 1.0, corner.y as f64 + 1.0);
                    let to = (from.0 + rng.range(-200, 200) as f64, from.1 + 120.0);
                    self.drag(from, to, 16);
                }
            }
            2 => {
                self.motion_to(grip.0, grip.1);
                self.scroll(-1.0);
                self.scroll(1.0);
            }
            3 => {
                self.motion_to(grip.0, grip.1);
                for _ in 0..2 {
                    self.button(BTN_LEFT, ButtonState::Pressed);
                    self.button(BTN_LEFT, ButtonState::Released);
                }
            }
            _ => {
                // Open and dismiss the root menu over empty desktop.
                self.motion_to(1.0, 1079.0);
                self.button(BTN_RIGHT, ButtonState::Pressed);
                self.button(BTN_RIGHT, ButtonState::Released);
                self.seat.close_menu(&mut self.desktop);
            }
        }
        let now = self.clock;
        self.seat.dispatch_timers(&mut self.desktop, now.wrapping_add(1000));
        self.desktop.take_client_events();
    }
}

fn run_benchmark(config: &BenchConfig) -> BenchStats {
    let mut rng = Rng::seeded_from_clock();
    let mut replay = Replay::new(config, &mut rng);
    let mut stats = BenchStats::new();

    while stats.elapsed() < config.duration {
        let start = Instant::now();
        let before = replay.events;
        replay.run_gesture(&mut rng);
        stats.record_gesture(replay.events - before, start.elapsed());
    }
    stats.mark_completed();
    stats
}

struct BenchStats {
    start: Instant,
    completed_at: Option<Instant>,
    gestures: u64,
    events: u64,
    slowest_gesture: Duration,
}

impl BenchStats {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            completed_at: None,
            gestures: 0,
            events: 0,
            slowest_gesture: Duration::ZERO,
        }
    }

    fn elapsed(&self) -> Duration {
        match self.completed_at {
            Some(done) => done.duration_since(self.start),
            None => self.start.elapsed(),
        }
    }

    fn mark_completed(&mut self) {
        self.completed_at = Some(Instant::now());
    }

    fn record_gesture(&mut self, events: u64, took: Duration) {
        self.gestures = self.gestures.saturating_add(1);
        self.events = self.events.saturating_add(events);
        if took > self.slowest_gesture {
            self.slowest_gesture = took;
        }
    }

    fn final_report(&self, config: &BenchConfig) -> String {
        let elapsed = self.elapsed().as_secs_f64();
        let events_per_second = if elapsed > 0.0 {
            self.events as f64 / elapsed
        } else {
            0.0
        };
        let avg_us = if self.events > 0 {
            elapsed * 1_000_000.0 / self.events as f64
        } else {
            0.0
        };

        indoc::formatdoc!(
            r#"
            Cursor bench completed.
            Duration: {elapsed:.2}s (target {target:.2}s)
            Windows: {windows} | Live resize: {live}
            Gestures: {gestures} | Events: {events} (~{eps:.0}/s)
            Avg event: {avg:.2} us | Slowest gesture: {worst:.3} ms
            "#,
            elapsed = elapsed,
            target = config.duration.as_secs_f64(),
            windows = config.windows,
            live = config.live_resize,
            gestures = self.gestures,
            events = self.events,
            eps = events_per_second,
            avg = avg_us,
            worst = self.slowest_gesture.as_secs_f64() * 1_000.0,
        )
    }
}

/// Xorshift generator; quality does not matter, repeatability per seed does.
struct Rng {
    state: u64,
}

impl Rng {
    fn seeded_from_clock() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
            ^ 0xA5A5_A5A5_1234_5678;
        Self { state: seed | 1 }
    }

    fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform-ish value in `lo..hi`.
    fn range(&mut self, lo: i32, hi: i32) -> i32 {
        let span = (hi - lo).max(1) as u64;
        lo + (self.next() % span) as i32
    }
}
