use orca_midi_in::cli::Cli;
use orca_midi_in::{Bridge, Result, StopHandle};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = match Cli::try_parse_normalized(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = if cli.list_devices {
        list_devices()
    } else {
        run(&cli)
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn list_devices() -> Result<()> {
    for device in orca_midi_in::enumerate_ports()? {
        println!("{}", device);
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    // Config errors surface here, before any port is opened.
    let config = cli.to_config()?;
    let mut bridge = Bridge::builder(config).build()?;
    watch_interrupt(bridge.stop_handle());
    bridge.run()
}

/// Stop the bridge on Ctrl-C.
fn watch_interrupt(stop: StopHandle) {
    let spawned = std::thread::Builder::new()
        .name("ctrl-c".into())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    tracing::warn!("Ctrl-C handling unavailable: {}", e);
                    return;
                }
            };
            runtime.block_on(async {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        tracing::info!("Interrupted, stopping");
                        stop.stop();
                    }
                    Err(e) => tracing::warn!("Ctrl-C handling unavailable: {}", e),
                }
            });
        });
    if let Err(e) = spawned {
        tracing::warn!("Ctrl-C handling unavailable: {}", e);
    }
}
