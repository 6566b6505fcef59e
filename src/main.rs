//=========================================================================
// Aetheric Shell — Demo Binary
//
// Opens the shell window with the bundled keyboard/mouse input and the
// null renderer. Escape or closing the window quits.
//
// Configuration is read from `shell.toml` in the working directory when
// present. Log level follows `RUST_LOG` (default `info`).
//
//=========================================================================

use std::process::ExitCode;

use env_logger::Env;
use log::{error, info};

use aetheric_shell::platform::winit_backend::WinitPlatform;
use aetheric_shell::{KeyboardMouseInput, NullGraphics, ShellBuilder, ShellConfig};

const CONFIG_PATH: &str = "shell.toml";

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = match ShellConfig::load_or_default(CONFIG_PATH) {
        Ok(config) => config,
        Err(err) => {
            error!("Invalid {}: {}", CONFIG_PATH, err);
            return ExitCode::FAILURE;
        }
    };

    let platform = match WinitPlatform::new() {
        Ok(platform) => platform,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let mut shell = ShellBuilder::new()
        .with_config(config)
        .build(platform, KeyboardMouseInput::new(), NullGraphics::new());

    let result = shell.initialize().and_then(|()| shell.run());
    shell.shutdown();

    match result {
        Ok(reason) => {
            info!("Exited: {:?}", reason);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
