use camino::Utf8PathBuf;
use cartlink_cli::commands::{self, RunOptions};
use cartlink_cli::{bindings, CliDispatchMode};
use cartlink_core::ButtonInput;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Boot the engine, load a cartridge and replay input against it
    Run {
        rom: Utf8PathBuf,
        #[arg(long, value_delimiter = ',', help = "Keys pressed after the game loads")]
        keys: Vec<String>,
        #[arg(long, value_delimiter = ',', help = "On-screen controls clicked after the game loads")]
        clicks: Vec<String>,
        #[arg(long, value_delimiter = ',', help = "Keys pressed while the engine is still loading")]
        early_keys: Vec<String>,
        #[arg(long, default_value_t = cartlink_config::DEFAULT_ENGINE_LOAD_DELAY_MS)]
        load_delay_ms: u64,
        #[arg(long, help = "Make the engine module fail to load with this message")]
        fail_load: Option<String>,
        #[arg(long, value_enum)]
        mode: Option<CliDispatchMode>,
        #[arg(long, env = "CARTLINK_CONFIG")]
        config: Option<Utf8PathBuf>,
    },
    /// Print a cartridge header
    Inspect { rom: Utf8PathBuf },
    /// Manage keyboard bindings
    Bindings {
        #[arg(long, global = true, env = "CARTLINK_CONFIG")]
        config: Option<Utf8PathBuf>,
        #[command(subcommand)]
        command: BindingCommands,
    },
}

#[derive(Subcommand)]
enum BindingCommands {
    List,
    Set { key: String, button: ButtonInput },
    Unset { key: String },
    Reset,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Run {
            rom,
            keys,
            clicks,
            early_keys,
            load_delay_ms,
            fail_load,
            mode,
            config,
        } => {
            let opts = RunOptions {
                keys,
                clicks,
                early_keys,
                load_delay_ms,
                fail_load,
                mode,
                config,
                ..RunOptions::new(rom)
            };
            commands::cmd_run(opts).await?;
        }
        Commands::Inspect { rom } => commands::cmd_inspect(rom).await?,
        Commands::Bindings { config, command } => match command {
            BindingCommands::List => bindings::handle_list(config)?,
            BindingCommands::Set { key, button } => bindings::handle_set(config, key, button)?,
            BindingCommands::Unset { key } => bindings::handle_unset(config, key)?,
            BindingCommands::Reset => bindings::handle_reset(config)?,
        },
    }

    Ok(())
}
