//! Persona Community CLI entry point.

use clap::Parser;
use serde::Serialize;
use tracing::{debug, info};

use persona_community::cli::{
    Cli, Commands, CommunitySubcommand, ConfigSubcommand, IdentitySubcommand, PersonaSubcommand,
};
use persona_community::community::{CommunityService, CommunityUpdate};
use persona_community::config::{self, AppConfig};
use persona_community::error::Result;
use persona_community::persona::{Persona, PersonaRegistry};
use persona_community::storage::{FileStore, Storage};
use persona_community::{logging, version};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::debug!(error = %e.format_for_log(), "Command failed");
        eprint!("{}", e.format_for_terminal());
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Version => {
            print!("{}", version::build_info());
            return Ok(());
        }
        Commands::Config {
            subcommand: ConfigSubcommand::Init { path, force },
        } => {
            let written = config::init_config(path.as_deref(), *force)?;
            println!("Configuration file created: {}", written.display());
            return Ok(());
        }
        _ => {}
    }

    let config = AppConfig::load(cli.config.as_deref())?;

    // Guards flush the file writer on drop
    let _log_guards = logging::init_logging(&config.logging, cli.verbose, cli.quiet)?;

    let build = version::build_info();
    debug!(version = %build.full_version(), profile = build.profile, "Starting persona-community");

    match cli.command {
        Commands::Config { subcommand } => handle_config_command(subcommand, &config),
        Commands::Persona { subcommand } => {
            let store = open_store(&config)?;
            handle_persona_command(subcommand, &store)
        }
        Commands::Community { subcommand } => {
            let service = CommunityService::new(open_store(&config)?);
            handle_community_command(subcommand, &service, &config)
        }
        Commands::Identity { subcommand } => {
            let store = open_store(&config)?;
            handle_identity_command(subcommand, &store)
        }
        Commands::Version => Ok(()),
    }
}

fn open_store(config: &AppConfig) -> Result<FileStore> {
    let store = FileStore::open(config.store_path())?;
    debug!(path = %store.path().display(), "Store opened");
    Ok(store)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn handle_config_command(subcommand: ConfigSubcommand, config: &AppConfig) -> Result<()> {
    match subcommand {
        ConfigSubcommand::Show => {
            println!("{}", toml::to_string_pretty(config)?);
        }
        ConfigSubcommand::Validate => {
            println!("Configuration is valid.");
            println!("Store: {}", config.store_path().display());
        }
        // Handled before the configuration is loaded
        ConfigSubcommand::Init { .. } => {}
    }
    Ok(())
}

fn handle_persona_command(subcommand: PersonaSubcommand, store: &FileStore) -> Result<()> {
    match subcommand {
        PersonaSubcommand::List => {
            let personas = store.list_personas()?;
            if personas.is_empty() {
                println!("No personas stored. Run `persona-community persona seed` to add the starter set.");
            }
            for persona in personas {
                println!("{}  {:<24} {}", persona.id, persona.name, persona.topic);
            }
        }
        PersonaSubcommand::Seed { only } => {
            let registry = PersonaRegistry::new();
            let added: Vec<Persona> = match only {
                Some(slug) => registry.seed_one(store, &slug)?.into_iter().collect(),
                None => registry.seed(store)?,
            };
            println!("Added {} persona(s).", added.len());
            for persona in added {
                println!("{}  {}", persona.id, persona.name);
            }
        }
        PersonaSubcommand::Add {
            name,
            topic,
            prompt,
            description,
            tags,
        } => {
            let mut persona = Persona::new(name, topic, prompt).with_description(description);
            persona.tags = tags;
            store.create_persona(&mut persona)?;
            info!(persona_id = %persona.id, name = %persona.name, "Persona added");
            print_json(&persona)?;
        }
    }
    Ok(())
}

fn handle_community_command(
    subcommand: CommunitySubcommand,
    service: &CommunityService<FileStore>,
    config: &AppConfig,
) -> Result<()> {
    match subcommand {
        CommunitySubcommand::Generate {
            name,
            size,
            description,
            community_type,
            profile,
            location_type,
            locations,
        } => {
            let mut generation = match profile {
                Some(path) => config::load_generation_config(&path)?,
                None => config.generation.defaults.clone(),
            };
            if let Some(location_type) = location_type {
                generation.location_constraint.location_type = location_type;
            }
            if !locations.is_empty() {
                generation.location_constraint.locations = locations;
            }
            let size = size.unwrap_or(config.generation.default_size);
            let community = service.generate_community(&generation, &name, &description, &community_type, size)?;
            print_json(&community)?;
        }
        CommunitySubcommand::List => {
            for community in service.list_communities()? {
                println!(
                    "{}  {:<24} size={} diversity={:.3} cohesion={:.3}",
                    community.id, community.name, community.size, community.diversity, community.cohesion
                );
            }
        }
        CommunitySubcommand::Show { id } => print_json(&service.get_community(&id)?)?,
        CommunitySubcommand::Stats { id, summary } => {
            let stats = service.community_stats(&id)?;
            if summary {
                print!("{}", stats);
            } else {
                print_json(&stats)?;
            }
        }
        CommunitySubcommand::AddMember { community, identity } => {
            print_json(&service.add_member(&community, &identity)?)?
        }
        CommunitySubcommand::RemoveMember { community, identity } => {
            print_json(&service.remove_member(&community, &identity)?)?
        }
        CommunitySubcommand::Update {
            id,
            name,
            description,
            min_members,
            max_members,
            active,
        } => {
            let update = CommunityUpdate {
                name,
                description,
                min_members,
                max_members,
                is_active: active,
                ..Default::default()
            };
            print_json(&service.update_community(&id, update)?)?;
        }
    }
    Ok(())
}

fn handle_identity_command(subcommand: IdentitySubcommand, store: &FileStore) -> Result<()> {
    match subcommand {
        IdentitySubcommand::List { leaning } => {
            let identities = store
                .list_identities()?
                .into_iter()
                .filter(|identity| leaning.is_none() || identity.political_leaning() == leaning);
            for identity in identities {
                println!("{}  {:<20} persona={}", identity.id, identity.name, identity.persona_id);
            }
        }
        IdentitySubcommand::Show { id } => print_json(&store.get_identity(&id)?)?,
    }
    Ok(())
}
