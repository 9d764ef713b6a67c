use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use nvbridge::{Bridge, BridgeConfig};
use nvbridge_backend::UnixSocketChannel;
use nvbridge_cli::host::EditModeChoice;

/// nvbridge - Interactive REPL for the storage resource-API bridge
#[derive(Parser, Debug)]
#[command(name = "nvbridge")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Unix socket of the storage-emulation daemon
    #[arg(long, env = "NVBRIDGE_SOCKET", default_value = "/var/tmp/spdk.sock")]
    socket: String,

    /// Emulation manager device passed to controller create calls
    #[arg(long, default_value = "mlx5_0")]
    emulation_manager: String,

    /// Give up on a backend response after this many milliseconds
    #[arg(long)]
    read_timeout_ms: Option<u64>,

    /// Force vi editing mode
    #[arg(long, conflicts_with = "emacs")]
    vi: bool,

    /// Force emacs editing mode
    #[arg(long)]
    emacs: bool,

    /// Log filter directives, e.g. `nvbridge=debug` (overrides RUST_LOG)
    #[arg(long)]
    log_filter: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = match &args.log_filter {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log filter '{}'", directives))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut channel = UnixSocketChannel::new(&args.socket);
    if let Some(ms) = args.read_timeout_ms {
        channel = channel.with_read_timeout(Duration::from_millis(ms));
    }

    let config = BridgeConfig::default().with_emulation_manager(args.emulation_manager);
    let bridge = Bridge::new(channel, config);

    let edit_mode = if args.vi {
        Some(EditModeChoice::Vi)
    } else if args.emacs {
        Some(EditModeChoice::Emacs)
    } else {
        None
    };

    tracing::debug!(socket = %args.socket, "starting REPL");
    nvbridge_cli::run(bridge, &args.socket, edit_mode).context("REPL failed")?;
    Ok(())
}
