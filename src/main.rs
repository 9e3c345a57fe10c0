use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;

use cursor_wm::Config;
use cursor_wm::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use cursor_wm::drivers::{InputDriver, OutputDriver};
use cursor_wm::event_loop::{ControlFlow, EventLoop};
use cursor_wm::playground::Playground;
use cursor_wm::tracing_sub;

#[derive(Parser, Debug)]
#[command(
    name = "cursor-wm",
    version = env!("CARGO_PKG_VERSION"),
    about = "Drag, resize and snap decorated windows with the mouse in a terminal"
)]
struct Cli {
    /// Cells from an output edge within which a dropped window snaps.
    #[arg(long = "snap-range", value_name = "CELLS", default_value_t = 1)]
    snap_range: i32,

    /// Cells from an output corner within which an edge snap becomes a
    /// corner snap.
    #[arg(long = "corner-range", value_name = "CELLS", default_value_t = 6)]
    corner_range: i32,

    /// Show a resize outline and apply it on release.
    #[arg(long = "no-live-resize")]
    no_live_resize: bool,

    /// Write debug logs to this file. Nothing is logged otherwise.
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            snap_edge_range: self.snap_range,
            snap_edge_corner_range: self.corner_range,
            resize_draw_contents: !self.no_live_resize,
            ..Config::default()
        }
    }
}

fn main() -> cursor_wm::Result<()> {
    let cli = Cli::parse();
    tracing_sub::init_default(cli.log_file.as_deref(), false)?;

    let mut output = ConsoleOutputDriver::new()?;
    let (width, height) = output.size()?;
    let mut playground = Playground::new(cli.config(), width, height)?;
    playground.spawn_window();
    playground.spawn_window();

    output.enter()?;
    let mut input = ConsoleInputDriver::new();
    input.set_mouse_capture(true)?;

    let start = Instant::now();
    let now = move || start.elapsed().as_millis() as u32;
    let mut event_loop = EventLoop::new(input, Duration::from_millis(16));
    let result = event_loop.run(|_, event| {
        match event {
            Some(event) => {
                if playground.handle_event(&event, now()) == ControlFlow::Quit {
                    return Ok(ControlFlow::Quit);
                }
            }
            None => {
                playground.tick(now());
                output.draw(|mut frame| playground.render(&mut frame))?;
            }
        }
        Ok::<_, io::Error>(ControlFlow::Continue)
    });

    event_loop.driver().set_mouse_capture(false)?;
    output.exit()?;
    result?;
    Ok(())
}
