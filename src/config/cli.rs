use crate::config::toml_config::TomlConfig;
use crate::config::Settings;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "roster-draw")]
#[command(about = "Draws a fair small group from a class roster and records who was picked")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Roster CSV file (overrides [roster].path)
    #[arg(long, global = true)]
    pub roster: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Draw a group, record the selections and write the invitation
    Draw(DrawArgs),
    /// Set every selection count back to zero
    Reset,
    /// Print the roster and the current eligibility window
    Show,
    /// Ask the organizer for date, time and location
    Request {
        /// Organizer address (overrides [outbox].organizer)
        #[arg(long)]
        to: Option<String>,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct DrawArgs {
    #[arg(short = 'n', long)]
    pub group_size: Option<usize>,

    /// Spread picks across sections
    #[arg(long, overrides_with = "no_sections")]
    pub use_sections: bool,

    #[arg(long)]
    pub no_sections: bool,

    /// Seed for a reproducible draw
    #[arg(long)]
    pub seed: Option<u64>,

    /// Show the group without recording or sending anything
    #[arg(long)]
    pub dry_run: bool,

    /// File holding the organizer's reply (Date/Time/Location lines)
    #[arg(long)]
    pub reply: Option<String>,

    #[arg(long)]
    pub outbox: Option<String>,
}

impl CliConfig {
    /// 讀取 TOML (若有指定) 並套用命令列覆蓋設定
    pub fn load_settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                let config = TomlConfig::from_file(path)?;
                config.validate()?;
                Settings::from(config)
            }
            None => Settings::default(),
        };

        self.apply_to(&mut settings);
        settings.validate()?;
        Ok(settings)
    }

    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(roster) = &self.roster {
            settings.roster_path = roster.clone();
        }

        match &self.command {
            Command::Draw(args) => {
                if let Some(size) = args.group_size {
                    settings.group_size = size;
                }
                if args.use_sections {
                    settings.use_sections = true;
                } else if args.no_sections {
                    settings.use_sections = false;
                }
                if args.seed.is_some() {
                    settings.seed = args.seed;
                }
                if let Some(outbox) = &args.outbox {
                    settings.outbox_path = outbox.clone();
                }
            }
            Command::Request { to: Some(to) } => {
                settings.organizer = Some(to.clone());
            }
            Command::Request { to: None } | Command::Reset | Command::Show => {}
        }
    }
}
