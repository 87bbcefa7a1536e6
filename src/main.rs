use anyhow::Result;
use clap::Parser;
use winit::event_loop::EventLoop;

use flickerfield::cli::CliArgs;

mod runtime;

use runtime::App;

fn main() -> Result<()> {
    flickerfield::tracing::init();

    let config = CliArgs::parse().into_config();

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
