use anyhow::{ensure, Context};
use clap::Parser;
use glam::Vec2;
use sim_core::{FixedStep, PlayerId, Tick};
use sim_host::MatchHost;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use turret_td::{TdAction, TdConfig, TdEvent, TdGame, TurretId, TurretKind};

#[derive(Parser, Debug)]
#[command(name = "headless-runner")]
#[command(about = "Runs a Turret Defense session with a scripted builder and no renderer")]
struct Args {
    /// Maximum ticks to simulate
    #[arg(long, default_value_t = 60 * 60 * 10)]
    ticks: u64,

    /// Seed for wave composition
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Map index, overriding the config's start map
    #[arg(long)]
    map: Option<usize>,

    /// JSON file with config overrides; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pace ticks against the wall clock
    #[arg(short, long)]
    realtime: bool,

    /// Print the final observation as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let tick_hz = config.tick_hz;

    let mut host = MatchHost::<TdGame>::new(config, args.seed, tick_hz);
    let player = host.join_player();
    let mut builder = Builder::new(host.game());
    tracing::info!(sites = builder.sites.len(), seed = args.seed, "session ready");

    let events = if args.realtime {
        run_realtime(&mut host, &mut builder, player, args.ticks)
    } else {
        run_fast(&mut host, &mut builder, player, args.ticks)
    };

    if args.json {
        let obs = host.observe(player);
        println!("{}", serde_json::to_string_pretty(&obs).context("serializing observation")?);
    } else {
        print_summary(&host);
        print_event_summary(&events);
    }
    Ok(())
}

fn load_config(args: &Args) -> anyhow::Result<TdConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text =
                std::fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<TdConfig>(&text).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => TdConfig::default(),
    };
    if let Some(map) = args.map {
        ensure!(
            map < config.maps.len(),
            "map {map} does not exist ({} maps configured)",
            config.maps.len()
        );
        config.start_map = map;
    }
    Ok(config)
}

/// Scripted player: fills build sites near the path, then upgrades.
struct Builder {
    sites: Vec<(f32, f32)>,
    next_site: usize,
    placed: Vec<TurretId>,
    next_upgrade: usize,
    last_tick: Option<Tick>,
}

const ROTATION: [TurretKind; 4] = [
    TurretKind::Basic,
    TurretKind::Rapid,
    TurretKind::Splash,
    TurretKind::Sniper,
];

impl Builder {
    /// Tile centers within two tiles of the path, nearest to the entrance first.
    fn new(game: &TdGame) -> Self {
        let state = game.state();
        let tile = state.config.tile_size;
        let cols = (state.config.world_width / tile) as i32;
        let rows = (state.config.world_height / tile) as i32;
        let start = state.path.start();

        let mut sites: Vec<(f32, f32)> = (0..cols)
            .flat_map(|cx| (0..rows).map(move |cy| (cx, cy)))
            .map(|(cx, cy)| ((cx as f32 + 0.5) * tile, (cy as f32 + 0.5) * tile))
            .filter(|&(x, y)| {
                !game.is_on_path(x, y) && state.path.distance_to(Vec2::new(x, y)) <= 2.0 * tile
            })
            .collect();
        sites.sort_by(|a, b| {
            Vec2::new(a.0, a.1)
                .distance(start)
                .total_cmp(&Vec2::new(b.0, b.1).distance(start))
        });

        Self {
            sites,
            next_site: 0,
            placed: Vec::new(),
            next_upgrade: 0,
            last_tick: None,
        }
    }

    /// Queues at most one build or upgrade per simulated tick.
    fn act(&mut self, host: &mut MatchHost<TdGame>, player: PlayerId) {
        let tick = host.current_tick();
        if self.last_tick == Some(tick) {
            return;
        }
        self.last_tick = Some(tick);

        let game = host.game();
        let money = game.state().economy.money();
        let kind = ROTATION[self.placed.len() % ROTATION.len()];

        while self.next_site < self.sites.len() {
            let (x, y) = self.sites[self.next_site];
            if !game.can_place(kind, x, y) {
                if money < game.state().config.spec(kind).cost {
                    return;
                }
                self.next_site += 1;
                continue;
            }
            host.command(player, TdAction::SelectTurretType { kind });
            host.command(player, TdAction::PlaceTurret { x, y });
            self.next_site += 1;
            return;
        }

        self.placed.retain(|id| game.state().world.turrets.contains_key(*id));
        let Some(&id) = self.placed.get(self.next_upgrade % self.placed.len().max(1)) else {
            return;
        };
        let Some(turret) = game.state().world.turrets.get(id) else {
            return;
        };
        match game.state().config.upgrade_cost(turret.kind, turret.level()) {
            Some(cost) if cost <= money => {
                host.command(player, TdAction::SelectPlacedTurret { turret_id: id });
                host.command(player, TdAction::UpgradeSelectedTurret);
                self.next_upgrade += 1;
            }
            Some(_) => {}
            None => self.next_upgrade += 1,
        }
    }

    fn observe(&mut self, events: &[TdEvent]) {
        for event in events {
            if let TdEvent::TurretPlaced { id, .. } = event {
                self.placed.push(*id);
            }
        }
    }
}

fn run_fast(host: &mut MatchHost<TdGame>, builder: &mut Builder, player: PlayerId, max_ticks: u64) -> Vec<TdEvent> {
    let mut all_events = Vec::new();
    while host.current_tick() < max_ticks {
        builder.act(host, player);
        let Some(events) = host.step_one_tick() else {
            break;
        };
        builder.observe(&events);
        all_events.extend(events);
    }
    all_events
}

fn run_realtime(
    host: &mut MatchHost<TdGame>,
    builder: &mut Builder,
    player: PlayerId,
    max_ticks: u64,
) -> Vec<TdEvent> {
    let mut fixed = FixedStep::new(host.tick_hz()).with_max_steps(8);
    let mut all_events = Vec::new();
    let mut last_frame = Instant::now();
    let mut last_status = Instant::now();

    println!("=== Running in Real-Time Mode ({}Hz) ===", host.tick_hz());
    println!("Press Ctrl+C to stop\n");

    while host.current_tick() < max_ticks && host.is_terminal().is_none() {
        builder.act(host, player);

        let now = Instant::now();
        let events = host.advance_frame(&mut fixed, now - last_frame);
        last_frame = now;

        for event in &events {
            print_event(host.current_tick(), event);
        }
        builder.observe(&events);
        all_events.extend(events);

        if last_status.elapsed() >= Duration::from_secs(1) {
            print_status(host);
            last_status = Instant::now();
        }
        std::thread::sleep(fixed.step());
    }
    all_events
}

fn print_event(tick: Tick, event: &TdEvent) {
    match event {
        TdEvent::TurretPlaced { kind, x, y, .. } => {
            println!("[{:>6}] {} turret placed at ({:.0}, {:.0})", tick, kind.name(), x, y)
        }
        TdEvent::TurretUpgraded { level, .. } => println!("[{:>6}] Turret upgraded to level {}", tick, level),
        TdEvent::TurretDestroyed { kind, .. } => println!("[{:>6}] {} turret DESTROYED", tick, kind.name()),
        TdEvent::EnemyKilled { kind, money, .. } => {
            println!("[{:>6}] {} killed (+{})", tick, kind.name(), money)
        }
        TdEvent::EnemyLeaked { kind, lives_left, .. } => {
            println!("[{:>6}] {} leaked! {} lives left", tick, kind.name(), lives_left)
        }
        TdEvent::WaveStarted { wave, size } => {
            println!("[{:>6}] === Wave {} started ({} enemies) ===", tick, wave, size)
        }
        TdEvent::WaveCleared { wave, .. } => println!("[{:>6}] === Wave {} cleared ===", tick, wave),
        TdEvent::GameOver { score, wave } => {
            println!("[{:>6}] GAME OVER on wave {} with score {}", tick, wave, score)
        }
        TdEvent::Victory { score, .. } => println!("[{:>6}] VICTORY with score {}", tick, score),
        _ => {}
    }
}

fn print_status(host: &MatchHost<TdGame>) {
    let state = host.game().state();
    let time_secs = host.current_tick() as f64 / host.tick_hz() as f64;
    println!(
        "  [{:>5.1}s] Wave {}, Enemies: {}, Turrets: {}, Money: {}, Score: {}, Lives: {}",
        time_secs,
        state.director.current_wave(),
        state.world.enemies.len(),
        state.world.turrets.len(),
        state.economy.money(),
        state.economy.score(),
        state.economy.lives(),
    );
}

fn print_summary(host: &MatchHost<TdGame>) {
    let state = host.game().state();
    println!("=== Turret Defense Simulation Complete ===");
    println!("Map: {}", state.map_name());
    println!("Outcome: {:?}", host.is_terminal());
    println!("Final tick: {}", host.current_tick());
    println!("Wave reached: {}", state.director.current_wave());
    println!("Money: {}", state.economy.money());
    println!("Score: {}", state.economy.score());
    println!("Lives: {}", state.economy.lives());
    println!("Turrets remaining: {}", state.world.turrets.len());
    println!("Enemies remaining: {}", state.world.enemies.len());
}

fn print_event_summary(events: &[TdEvent]) {
    let mut placed = 0;
    let mut upgraded = 0;
    let mut destroyed = 0;
    let mut shots = 0;
    let mut killed = 0;
    let mut leaked = 0;
    let mut waves_started = 0;
    let mut waves_cleared = 0;
    let mut rejected = 0;

    for event in events {
        match event {
            TdEvent::TurretPlaced { .. } => placed += 1,
            TdEvent::TurretUpgraded { .. } => upgraded += 1,
            TdEvent::TurretDestroyed { .. } => destroyed += 1,
            TdEvent::ShotFired { .. } => shots += 1,
            TdEvent::EnemyKilled { .. } => killed += 1,
            TdEvent::EnemyLeaked { .. } => leaked += 1,
            TdEvent::WaveStarted { .. } => waves_started += 1,
            TdEvent::WaveCleared { .. } => waves_cleared += 1,
            TdEvent::PlacementRejected { .. }
            | TdEvent::UpgradeRejected { .. }
            | TdEvent::SelectionRejected { .. }
            | TdEvent::SpecialWeaponRejected { .. }
            | TdEvent::MapSelectRejected { .. } => rejected += 1,
            _ => {}
        }
    }

    println!("\n=== Event Summary ===");
    println!("Turrets placed: {}", placed);
    println!("Turrets upgraded: {}", upgraded);
    println!("Turrets destroyed: {}", destroyed);
    println!("Shots fired: {}", shots);
    println!("Enemies killed: {}", killed);
    println!("Enemies leaked: {}", leaked);
    println!("Waves started: {}", waves_started);
    println!("Waves cleared: {}", waves_cleared);
    println!("Rejected commands: {}", rejected);
}
