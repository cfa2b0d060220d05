use clap::{Parser, Subcommand};

mod commands {
    pub mod descriptor;
    pub mod edit;
    pub mod rights;
    pub mod watermark;
}
mod config;
mod pathutil;

#[derive(Parser)]
#[command(name = "cloak", version, about = "cloak SDK sample command-line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a file into an editable in-memory stream, apply edit
    /// operations, and write the result next to the input
    Edit {
        /// File to edit
        #[arg(long)]
        file: String,
        /// Operation to apply, in order. Formats: seek:<pos>,
        /// insert:<hex>, delete:<n>, replace:<n>:<hex>, read:<n>
        #[arg(long = "op", required = true)]
        ops: Vec<String>,
        /// Print the resulting bytes as hex instead of writing a file
        #[arg(long)]
        dry_run: bool,
    },

    /// Build a protection descriptor and print it
    Descriptor {
        /// Protection template id (template-based protection)
        #[arg(long)]
        template_id: Option<String>,
        /// Users-to-rights grant, e.g.
        /// "alice@contoso.com,bob@contoso.com:VIEW,EDIT" (repeatable)
        #[arg(long = "grant")]
        grants: Vec<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Content owner email; falls back to the config file
        #[arg(long)]
        owner: Option<String>,
        /// Days until the content expires
        #[arg(long)]
        expires_days: Option<i64>,
        /// Disallow offline consumption
        #[arg(long)]
        no_offline_access: bool,
        /// Contact URI for users requesting access
        #[arg(long)]
        referrer: Option<String>,
        /// Print the descriptor as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the usage rights the SDK knows, and the default sets for
    /// specialized license types
    Rights,

    /// Render a dynamic watermark format string for a consumer
    Watermark {
        /// Format string, e.g. "${Consumer.PrincipalName} CONFIDENTIAL"
        #[arg(long)]
        format: String,
        /// Consumer principal name substituted into the format
        #[arg(long)]
        principal: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cfg = config::load().unwrap_or_default();
    let cli = Cli::parse();

    match cli.command {
        Commands::Edit { file, ops, dry_run } => commands::edit::run(&file, &ops, dry_run),
        Commands::Descriptor {
            template_id,
            grants,
            name,
            description,
            owner,
            expires_days,
            no_offline_access,
            referrer,
            json,
        } => commands::descriptor::run(commands::descriptor::Options {
            template_id,
            grants,
            name,
            description,
            owner: owner.or(cfg.owner),
            expires_days,
            no_offline_access,
            referrer: referrer.or(cfg.referrer),
            json,
        }),
        Commands::Rights => {
            commands::rights::run();
            Ok(())
        }
        Commands::Watermark { format, principal } => {
            commands::watermark::run(&format, &principal);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn edit_requires_at_least_one_op() {
        assert!(Cli::try_parse_from(["cloak", "edit", "--file", "a.bin"]).is_err());
        assert!(Cli::try_parse_from([
            "cloak", "edit", "--file", "a.bin", "--op", "delete:2"
        ])
        .is_ok());
    }
}
