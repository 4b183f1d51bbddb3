use clap::Parser;
use fieldseal::cli::{Cli, Commands};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("FIELDSEAL_LOG", "warn"))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Keygen { ref name, force } => {
            fieldseal::cli::commands::keygen::execute(&cli, name, force)
        }
        Commands::Keys => fieldseal::cli::commands::keys::execute(&cli),
        Commands::Encrypt { ref key, ref value } => {
            fieldseal::cli::commands::encrypt::execute(&cli, key.as_deref(), value.as_deref())
        }
        Commands::Decrypt {
            ref key,
            ref envelope,
        } => fieldseal::cli::commands::decrypt::execute(&cli, key.as_deref(), envelope.as_deref()),
        Commands::Inspect { ref envelope } => {
            fieldseal::cli::commands::inspect::execute(envelope.as_deref())
        }
        Commands::Handle { action, ref event } => {
            fieldseal::cli::commands::handle::execute(&cli, action, event.as_deref())
        }
        Commands::Demo => fieldseal::cli::commands::demo::execute(),
        Commands::Bench { iterations } => fieldseal::cli::commands::bench::execute(iterations),
        Commands::Completions { shell } => fieldseal::cli::commands::completions::execute(shell),
        Commands::Version => fieldseal::cli::commands::version::execute(),
    };

    if let Err(e) = result {
        fieldseal::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
