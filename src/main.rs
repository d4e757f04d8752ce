use clap::Parser;

use field_snap::app::{self, App};
use field_snap::components::DebugLogHandle;
use field_snap::components::debug_log::{install_panic_hook, set_global_debug_log};
use field_snap::config::{Cli, SnapConfig};
use field_snap::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use field_snap::error::AppError;
use field_snap::tracing_sub;

const DEBUG_LOG_LINES: usize = 2000;

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = SnapConfig::try_from(&cli)?;

    let log = DebugLogHandle::new(DEBUG_LOG_LINES);
    set_global_debug_log(log.clone());
    tracing_sub::init_default();
    install_panic_hook();
    tracing::info!(?config, "starting");

    let mut app = App::new(&config, log);
    let mut output = ConsoleOutputDriver::new()?;
    app::run(&mut app, ConsoleInputDriver::new(), &mut output, config.tick)?;
    Ok(())
}
