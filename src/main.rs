//! LifeSupport CLI - drives the engine against a world file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lifesupport::cli::args::{EventArgs, EventKind, InitArgs, PlayerCommandArgs};
use lifesupport::cli::world::WorldCollaborators;
use lifesupport::cli::{Cli, Command, World};
use lifesupport::lua::LuaHooks;
use lifesupport::storage::{DataStore, PluginData};
use lifesupport::support::{Payment, SaveOutcome, SkipReason, WoundOutcome};
use lifesupport::{logging, Caller, Config, LifeSupport, PlayerId};

const CONFIG_FILE_NAME: &str = "config.json";
const WORLD_FILE_NAME: &str = "world.json";
const HOOKS_DIR_NAME: &str = "hooks";
const LOGS_DIR_NAME: &str = "logs";

/// Resolved filesystem layout.
struct Paths {
    data_dir: PathBuf,
    config: PathBuf,
    world: PathBuf,
}

impl Paths {
    fn resolve(cli: &Cli) -> Self {
        let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);
        let config = cli
            .config
            .clone()
            .unwrap_or_else(|| data_dir.join(CONFIG_FILE_NAME));
        let world = cli
            .world
            .clone()
            .unwrap_or_else(|| data_dir.join(WORLD_FILE_NAME));
        Self {
            data_dir,
            config,
            world,
        }
    }

    fn hooks(&self) -> PathBuf {
        self.data_dir.join(HOOKS_DIR_NAME)
    }
}

fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "lifesupport")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("data"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = Paths::resolve(&cli);

    let (config, config_error) = Config::load_or_default(&paths.config);
    let _guard = logging::init(&config, &paths.data_dir.join(LOGS_DIR_NAME))?;
    if let Some(err) = config_error {
        tracing::error!(error = %err, "error reading config file, default configuration used");
    }

    match cli.command {
        Command::Init(args) => run_init(&paths, args),
        Command::Status => run_status(&paths, &config),
        Command::Toggle(args) => run_toggle(&paths, config, args),
        Command::Zones(args) => run_zones(&paths, config, args),
        Command::Event(args) => run_event(&paths, config, args),
    }
}

fn run_init(paths: &Paths, args: InitArgs) -> Result<()> {
    let store = DataStore::in_dir(&paths.data_dir)?;
    if store.path().exists() {
        if args.if_needed {
            println!("Already initialized at {}", paths.data_dir.display());
            return Ok(());
        }
        println!("Keeping existing data file {}", store.path().display());
    } else {
        store.save(&PluginData::default())?;
    }

    std::fs::create_dir_all(paths.hooks())
        .with_context(|| format!("Failed to create {}", paths.hooks().display()))?;

    println!("Initialized lifesupport in {}", paths.data_dir.display());
    println!("  config: {}", paths.config.display());
    println!("  data:   {}", store.path().display());
    println!("  hooks:  {}", paths.hooks().display());
    Ok(())
}

fn run_status(paths: &Paths, config: &Config) -> Result<()> {
    let data = DataStore::in_dir(&paths.data_dir)?.load()?;
    let hooks = LuaHooks::load_dir(paths.hooks())?;

    println!("Life support status:");
    println!("  economics:           {}", on_off(config.use_economics));
    println!("  zone manager:        {}", on_off(config.use_zone_manager));
    println!("  raidable bases:      {}", on_off(config.use_raidable_bases));
    println!("  dangerous treasures: {}", on_off(config.use_dangerous_treasures));
    println!("  tiers:");
    for tier in &config.tiers {
        println!("    {} = {} coins", tier.permission, tier.cost);
    }
    println!("  activated players:   {}", data.activated_ids.len());
    println!("  excluded zones:      {}", data.excluded_zones.join(", "));
    println!("  hook scripts:        {}", hooks.len());
    Ok(())
}

fn run_toggle(paths: &Paths, config: Config, args: PlayerCommandArgs) -> Result<()> {
    let world = World::load(&paths.world)?;
    let handles = world.collaborators();
    let mut support = build_support(paths, &world, config, &handles)?;

    let caller = caller_for(&world, &args.player);
    support.toggle(&caller, args.args.as_slice())?;
    print_notices(&handles);
    Ok(())
}

fn run_zones(paths: &Paths, config: Config, args: PlayerCommandArgs) -> Result<()> {
    let world = World::load(&paths.world)?;
    let handles = world.collaborators();
    let mut support = build_support(paths, &world, config, &handles)?;

    let caller = caller_for(&world, &args.player);
    support.zones(&caller, args.args.as_slice())?;
    print_notices(&handles);
    Ok(())
}

fn run_event(paths: &Paths, config: Config, args: EventArgs) -> Result<()> {
    let mut world = World::load(&paths.world)?;
    let handles = world.collaborators();
    let support = build_support(paths, &world, config, &handles)?;

    let id = PlayerId::new(args.player);
    let mut state = world.player(&id).map(|p| p.state.clone());

    let summary = match args.kind {
        EventKind::Death => describe_save(&support.on_player_death(state.as_mut())?),
        EventKind::Wound => describe_wound(&support.on_player_wound(state.as_mut())?),
        EventKind::Drop => {
            if support.can_drop_active_item(state.as_ref())? {
                "drop: allowed".to_string()
            } else {
                "drop: prevented".to_string()
            }
        }
    };

    print_notices(&handles);
    println!("{}", summary);

    if let Some(state) = &state {
        world.record(state, &handles.ledger);
        world.save(&paths.world)?;
    }
    Ok(())
}

fn build_support(
    paths: &Paths,
    world: &World,
    config: Config,
    handles: &WorldCollaborators,
) -> Result<LifeSupport> {
    let hooks = LuaHooks::load_dir(paths.hooks())?;
    let mut builder = world
        .builder(config, handles)
        .store(DataStore::in_dir(&paths.data_dir)?);
    if !hooks.is_empty() {
        builder = builder.veto(hooks);
    }
    Ok(builder.build()?)
}

fn caller_for(world: &World, player: &str) -> Caller {
    let id = PlayerId::new(player);
    let name = world
        .player(&id)
        .map(|p| p.state.name.clone())
        .unwrap_or_else(|| player.to_string());
    Caller::new(id, name)
}

fn print_notices(handles: &WorldCollaborators) {
    for (_, notice) in handles.notifier.take() {
        println!("{}", notice);
    }
}

fn describe_save(outcome: &SaveOutcome) -> String {
    match outcome {
        SaveOutcome::Saved(payment) => format!("death: prevented ({})", describe_payment(payment)),
        SaveOutcome::Skipped(reason) => format!("death: proceeds ({})", describe_skip(reason)),
    }
}

fn describe_wound(outcome: &WoundOutcome) -> String {
    match outcome {
        WoundOutcome::Proceed => "wound: proceeds".to_string(),
        WoundOutcome::Suppress => "wound: suppressed".to_string(),
        WoundOutcome::Saved(payment) => {
            format!("wound: suppressed, life saved ({})", describe_payment(payment))
        }
    }
}

fn describe_payment(payment: &Payment) -> String {
    match payment {
        Payment::EconomicsDisabled => "economics disabled".to_string(),
        Payment::Free => "free".to_string(),
        Payment::Withdrawn(cost) => format!("charged {} coins", cost),
    }
}

fn describe_skip(reason: &SkipReason) -> String {
    match reason {
        SkipReason::NoPlayer => "no such player".to_string(),
        SkipReason::Npc => "npc".to_string(),
        SkipReason::Sleeping => "sleeping".to_string(),
        SkipReason::Blocked => "blocked".to_string(),
        SkipReason::Vetoed(reason) => format!("canceled by hook {}", reason),
        SkipReason::Excluded(zone) => format!("excluded: {}", zone),
        SkipReason::NotActive => "not active".to_string(),
        SkipReason::NoTier => "no tier permission".to_string(),
        SkipReason::EconomicsUnavailable => "economics unavailable".to_string(),
        SkipReason::CantAfford { balance, cost } => {
            format!("can't afford: balance {} < cost {}", balance, cost)
        }
        SkipReason::WithdrawDeclined { cost } => format!("withdrawal of {} declined", cost),
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}
