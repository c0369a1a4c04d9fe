//! CLI argument parsing using clap v4

use clap::{Parser, Subcommand};

use crate::community::LocationType;
use crate::persona::PoliticalLeaning;

/// Persona Community - synthetic identity and community generator
///
/// Maintains a catalog of expert personas, generates communities of
/// demographically varied identities from them, and reports diversity and
/// cohesion statistics.
#[derive(Parser, Debug)]
#[command(name = "persona-community")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, env = "PERSONA_CONFIG", global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Display version and build information
    Version,

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Persona catalog
    Persona {
        #[command(subcommand)]
        subcommand: PersonaSubcommand,
    },

    /// Community generation, membership and statistics
    Community {
        #[command(subcommand)]
        subcommand: CommunitySubcommand,
    },

    /// Generated identities
    Identity {
        #[command(subcommand)]
        subcommand: IdentitySubcommand,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the effective configuration
    Show,

    /// Initialize a new configuration file
    Init {
        /// Path where to create the config file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Validate the configuration
    Validate,
}

#[derive(Subcommand, Debug, Clone)]
pub enum PersonaSubcommand {
    /// List stored personas
    List,

    /// Store the bundled starter personas that are not yet present
    Seed {
        /// Seed only the bundled persona with this slug
        #[arg(long)]
        only: Option<String>,
    },

    /// Add a persona
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        topic: String,

        /// System prompt
        #[arg(long)]
        prompt: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Comma-separated tags
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum CommunitySubcommand {
    /// Generate and store a new community
    Generate {
        #[arg(long)]
        name: String,

        /// Number of members (defaults to generation.default_size)
        #[arg(long)]
        size: Option<usize>,

        #[arg(long, default_value = "")]
        description: String,

        /// Free-form community type label
        #[arg(long = "type", default_value = "synthetic")]
        community_type: String,

        /// TOML file holding a generation profile
        #[arg(long)]
        profile: Option<String>,

        /// Location granularity: city, region, country or global
        #[arg(long)]
        location_type: Option<LocationType>,

        /// Comma-separated candidate places for the location type
        #[arg(long, value_delimiter = ',')]
        locations: Vec<String>,
    },

    /// List stored communities
    List,

    /// Show a community record
    Show { id: String },

    /// Compute statistics for a community
    Stats {
        id: String,

        /// Print a human-readable summary instead of JSON
        #[arg(long)]
        summary: bool,
    },

    /// Add an identity to a community
    AddMember { community: String, identity: String },

    /// Remove an identity from a community
    RemoveMember { community: String, identity: String },

    /// Change community metadata or member limits
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        min_members: Option<usize>,

        #[arg(long)]
        max_members: Option<usize>,

        #[arg(long)]
        active: Option<bool>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum IdentitySubcommand {
    /// List stored identities
    List {
        /// Only identities with this political leaning
        #[arg(long)]
        leaning: Option<PoliticalLeaning>,
    },

    /// Show an identity record
    Show { id: String },
}
