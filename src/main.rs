use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use revtrail::cli::{
    handle_export_command, handle_revision_command, handle_types_command, handle_user_command,
};
use revtrail::config::{AuditPaths, AuditedType, Settings};
use revtrail::storage::Storage;

#[derive(Parser)]
#[command(
    name = "revtrail",
    author = "Kaylee Beyene",
    version,
    about = "Browse and compare the revision history of audited entities",
    long_about = "revtrail reads a versioned entity store and answers history \
                  questions: which revisions exist for a type or an entity, what \
                  an entity looked like at a revision, who made the change, and \
                  which fields changed since the previous revision."
)]
struct Cli {
    /// Log debug output to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the audited entity types
    Types,

    /// Revision history commands
    #[command(subcommand, alias = "rev")]
    Revision(revtrail::cli::RevisionCommands),

    /// User directory commands
    #[command(subcommand)]
    User(revtrail::cli::UserCommands),

    /// Export the revision history of an entity type
    Export(revtrail::cli::ExportArgs),

    /// Initialize the data directory
    Init {
        /// Entity type to audit (repeatable)
        #[arg(short = 't', long = "type")]
        types: Vec<String>,
    },

    /// Show current configuration and paths
    Config,
}

fn init_logging(verbose: bool, settings: &Settings) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_filter))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = AuditPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    init_logging(cli.verbose, &settings);
    debug!(base_dir = %paths.base_dir().display(), "Resolved paths");

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Types) => {
            handle_types_command(&storage, &settings)?;
        }
        Some(Commands::Revision(cmd)) => {
            handle_revision_command(&storage, &settings, cmd)?;
        }
        Some(Commands::User(cmd)) => {
            handle_user_command(&storage, cmd)?;
        }
        Some(Commands::Export(args)) => {
            handle_export_command(&storage, &settings, args)?;
        }
        Some(Commands::Init { types }) => {
            println!("Initializing revtrail at: {}", paths.base_dir().display());

            for name in types {
                if settings.add_audited_type(AuditedType::new(name.trim())) {
                    println!("  Auditing {}", name.trim());
                } else {
                    println!("  Already audited: {}", name.trim());
                }
            }
            settings.validate()?;
            settings.save(&paths)?;
            storage.users.save()?;

            println!("Initialization complete!");
            println!();
            println!("Run 'revtrail types' to see the audited entity types.");
        }
        Some(Commands::Config) => {
            println!("revtrail Configuration");
            println!("======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Revision log:     {}", paths.revisions_file().display());
            println!("User directory:   {}", paths.users_file().display());
            println!("Export directory: {}", paths.export_dir().display());
            println!();
            println!("Settings:");
            println!("  Default page size: {}", settings.default_page_size);
            println!("  Log filter:        {}", settings.log_filter);
            println!("  Audited types:     {}", settings.audited_types.len());
            println!("  Revisions logged:  {}", storage.revisions.len()?);
        }
        None => {
            println!("revtrail - revision history for audited entities");
            println!();
            println!("Run 'revtrail --help' for usage information.");
        }
    }

    Ok(())
}
