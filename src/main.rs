use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use smart_traffic::simulation::{
    build_demo_world, build_grid_world, spawn_random_trips, CongestionFeed, IntersectionId,
    OccupancyFeed, RandomCongestionFeed, SignalTiming, SimConfig, SimWorld,
    DEFAULT_GREEN_TICKS, DEFAULT_MAX_CONGESTION_LEVEL, DEFAULT_RED_TICKS, DEFAULT_REPORT_TOP,
    DEFAULT_REROUTE_THRESHOLD, DEFAULT_YELLOW_TICKS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scenario {
    /// Three intersections A, B, C with one vehicle from A to C
    Demo,
    /// Square grid with random road weights and random trips
    Grid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Feed {
    /// Random congestion counts at every intersection
    Random,
    /// Number of vehicles at each intersection
    Occupancy,
}

#[derive(Parser)]
#[command(name = "smart_traffic")]
#[command(about = "Headless smart city traffic simulation")]
struct Cli {
    /// Number of simulation ticks to run
    #[arg(long, default_value = "30")]
    ticks: u64,

    /// Road network to simulate
    #[arg(long, value_enum, default_value = "demo")]
    scenario: Scenario,

    /// Width and height of the grid scenario
    #[arg(long, default_value = "4")]
    grid_size: usize,

    /// Number of random trips in the grid scenario
    #[arg(long, default_value = "8")]
    vehicles: usize,

    /// Seed for road weights, trips and random congestion
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Source of congestion observations
    #[arg(long, value_enum, default_value = "random")]
    feed: Feed,

    /// Extra routing cost per congestion level, 0 ignores congestion
    #[arg(long, default_value = "0")]
    congestion_penalty: u64,

    /// Congestion level that triggers re-routing, 0 disables it
    #[arg(long, default_value_t = DEFAULT_REROUTE_THRESHOLD)]
    reroute_threshold: u64,

    /// Highest stored congestion level
    #[arg(long, default_value_t = DEFAULT_MAX_CONGESTION_LEVEL)]
    max_congestion: u64,

    /// Number of most congested intersections to report
    #[arg(long, default_value_t = DEFAULT_REPORT_TOP)]
    top: usize,

    /// Let vehicles drive through red lights
    #[arg(long)]
    ignore_signals: bool,

    /// Ticks a light stays red
    #[arg(long, default_value_t = DEFAULT_RED_TICKS)]
    red_ticks: u32,

    /// Ticks a light stays green
    #[arg(long, default_value_t = DEFAULT_GREEN_TICKS)]
    green_ticks: u32,

    /// Ticks a light stays yellow
    #[arg(long, default_value_t = DEFAULT_YELLOW_TICKS)]
    yellow_ticks: u32,

    /// Log a full summary every this many ticks, 0 only at the end
    #[arg(long, default_value = "10")]
    report_every: u64,
}

impl Cli {
    fn sim_config(&self) -> SimConfig {
        SimConfig {
            signal_timing: SignalTiming::new(self.red_ticks, self.green_ticks, self.yellow_ticks),
            congestion_penalty: self.congestion_penalty,
            max_congestion_level: self.max_congestion,
            reroute_threshold: self.reroute_threshold,
            respect_signals: !self.ignore_signals,
            report_top: self.top,
        }
    }
}

fn build_world(cli: &Cli) -> Result<SimWorld> {
    let config = cli.sim_config();
    match cli.scenario {
        Scenario::Demo => {
            let mut world = build_demo_world(config)?;
            world
                .spawn_vehicle(&IntersectionId::from("A"), &IntersectionId::from("C"))
                .context("Failed to spawn demo vehicle")?;
            Ok(world)
        }
        Scenario::Grid => {
            let mut world = build_grid_world(cli.grid_size, cli.seed, config)?;
            spawn_random_trips(&mut world, cli.vehicles, cli.seed)?;
            Ok(world)
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    info!("Running traffic simulation in headless mode...");
    info!("Scenario: {:?}, Ticks: {}", cli.scenario, cli.ticks);

    let mut world = build_world(&cli)?;
    let mut feed: Box<dyn CongestionFeed> = match cli.feed {
        Feed::Random => Box::new(RandomCongestionFeed::new_with_seed(
            cli.max_congestion,
            cli.seed,
        )),
        Feed::Occupancy => Box::new(OccupancyFeed),
    };

    for vehicle in world.vehicles() {
        let route: Vec<&str> = vehicle.route().iter().map(IntersectionId::as_str).collect();
        info!("Optimal route for {}: [{}]", vehicle.id, route.join(", "));
    }

    info!("Initial state:");
    world.log_summary();

    for _ in 0..cli.ticks {
        let observations = feed.observe(world.current_tick() + 1, &world);
        let report = world.tick(&observations);

        let signals: Vec<String> = world
            .lights()
            .map(|(id, light)| format!("{}={}", id, light.state()))
            .collect();
        info!("Tick {} - Signals: {}", report.tick, signals.join(" "));

        for id in &report.rerouted {
            if let Some(vehicle) = world.vehicle(*id) {
                let route: Vec<&str> = vehicle.route().iter().map(IntersectionId::as_str).collect();
                info!("Tick {} - Vehicle {} re-routed: [{}]", report.tick, id, route.join(", "));
            }
        }
        for id in &report.arrived {
            info!("Tick {} - Vehicle {} arrived", report.tick, id);
        }

        if cli.report_every > 0 && report.tick % cli.report_every == 0 {
            world.log_summary();
        }
    }

    let stats = world.stats();
    info!("=== SIMULATION COMPLETE ===");
    info!("Ticks run: {}", world.current_tick());
    info!("Total vehicles spawned: {}", stats.vehicles_spawned);
    info!("Total vehicles arrived: {}", stats.vehicles_arrived);
    info!("Active vehicles: {}", world.vehicle_count());
    info!("Total reroutes: {}", stats.reroutes);
    info!("Routing failures: {}", stats.routing_failures);
    info!("Signal transitions: {}", stats.signal_transitions);
    info!(
        "Total intersections: {}",
        world.road_network().intersection_count()
    );
    info!("Total roads: {}", world.road_network().road_count());
    info!(
        "Success rate: {:.1}%",
        if stats.vehicles_spawned > 0 {
            (stats.vehicles_arrived as f32 / stats.vehicles_spawned as f32) * 100.0
        } else {
            0.0
        }
    );

    Ok(())
}
