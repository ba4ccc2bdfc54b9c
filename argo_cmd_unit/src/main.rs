//! # Argo Command Unit
//!
//! Command-dispatch and control-event unit for one board of the argo
//! robot controller. Loads the board role from TOML, registers the
//! role's command handlers, performs optional RT setup, and enters the
//! control event loop.
//!
//! Without a bus driver attached this binary runs against log-only
//! simulation drivers: actuation calls are traced instead of moving
//! hardware, which is the bring-up mode on a bench.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use tracing::{Level, debug, error, info};
use tracing_subscriber::EnvFilter;

use argo_cmd_unit::actuation::{
    ChassisDriver, ChassisState, GimbalDriver, GimbalState, ShootCommand, ShooterDriver,
};
use argo_cmd_unit::bus::RefereeTx;
use argo_cmd_unit::config::load_config;
use argo_cmd_unit::events::ControlEvents;
use argo_cmd_unit::input::ControlInput;
use argo_cmd_unit::mailbox::CommandMailbox;
use argo_cmd_unit::registry::CommandRegistry;
use argo_cmd_unit::role::{RoleWiring, register_role_handlers};
use argo_cmd_unit::rt::rt_setup;
use argo_cmd_unit::telemetry::TelemetryStore;

/// Argo Command Unit — command dispatch and control events
#[derive(Parser, Debug)]
#[command(name = "argo_cmd_unit")]
#[command(version)]
#[command(about = "Command dispatch and control-event loop for one argo board")]
struct Args {
    /// Path to the command unit configuration TOML.
    #[arg(default_value = "config/cmd.toml")]
    config: PathBuf,

    /// CPU core to pin the event loop to (rt builds only).
    #[arg(long, default_value_t = 1)]
    cpu_core: usize,

    /// SCHED_FIFO priority (rt builds only).
    #[arg(long, default_value_t = 80)]
    rt_priority: i32,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    setup_tracing(&args);

    info!("argo command unit v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        error!("FATAL: {e}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&args.config)?;
    info!(
        role = ?config.role,
        input = ?config.role.input_source(),
        "loaded config from {}",
        args.config.display()
    );

    rt_setup(args.cpu_core, args.rt_priority)?;

    let mailbox = Arc::new(CommandMailbox::new());
    let telemetry = Arc::new(TelemetryStore::new());
    let chassis: Arc<dyn ChassisDriver> = Arc::new(SimChassis);
    let gimbal: Arc<dyn GimbalDriver> = Arc::new(SimGimbal);
    let shooter: Arc<dyn ShooterDriver> = Arc::new(SimShooter);
    let input: Arc<dyn ControlInput> = Arc::new(SimInput);
    let referee: Arc<dyn RefereeTx> = Arc::new(SimReferee);

    let mut registry = CommandRegistry::new();
    register_role_handlers(
        &mut registry,
        config.role,
        &RoleWiring {
            mailbox: Arc::clone(&mailbox),
            telemetry: Arc::clone(&telemetry),
            chassis: Arc::clone(&chassis),
            gimbal: Arc::clone(&gimbal),
            referee,
        },
    );
    // The bus driver hands received frames to `registry.dispatch`; until
    // one is attached the loop paces on its fail-safe timeout.
    drop(registry);

    let events = ControlEvents::new(
        mailbox,
        telemetry,
        chassis,
        gimbal,
        shooter,
        input,
        config.silence_timeout(),
        config.disabled_poll(),
    );
    events.run();

    Ok(())
}

fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

// ─── Simulation Drivers ─────────────────────────────────────────────

struct SimChassis;

impl ChassisDriver for SimChassis {
    fn set_speed(&self, vx: f32, vy: f32, vw: f32) {
        debug!(vx, vy, vw, "chassis speed");
    }
    fn set_acceleration(&self, ax: f32, ay: f32, wz: f32) {
        debug!(ax, ay, wz, "chassis acceleration");
    }
    fn set_offset(&self, x: f32, y: f32) {
        debug!(x, y, "chassis rotation offset");
    }
    fn set_relative_angle(&self, yaw_deg: f32) {
        debug!(yaw_deg, "chassis relative angle");
    }
    fn info(&self) -> ChassisState {
        ChassisState::default()
    }
}

struct SimGimbal;

impl GimbalDriver for SimGimbal {
    fn set_pitch_angle(&self, deg: f32) {
        debug!(deg, "gimbal pitch");
    }
    fn set_yaw_angle(&self, deg: f32) {
        debug!(deg, "gimbal yaw");
    }
    fn auto_adjust_start(&self) {
        debug!("gimbal auto adjust start");
    }
    fn is_initialized(&self) -> bool {
        true
    }
    fn info(&self) -> GimbalState {
        GimbalState::default()
    }
}

struct SimShooter;

impl ShooterDriver for SimShooter {
    fn set_cmd(&self, cmd: ShootCommand, add_count: u8) {
        debug!(?cmd, add_count, "shoot command");
    }
    fn set_turn_speed(&self, freq: u16) {
        debug!(freq, "shoot turn speed");
    }
    fn set_friction_speed(&self, left: u16, right: u16) {
        debug!(left, right, "friction speed");
    }
}

/// Bench input: never disabled, never engaged.
struct SimInput;

impl ControlInput for SimInput {
    fn disable_engaged(&self) -> bool {
        false
    }
    fn secondary_up(&self) -> bool {
        false
    }
    fn trigger_pressed(&self) -> bool {
        false
    }
}

struct SimReferee;

impl RefereeTx for SimReferee {
    fn transmit(&self, cmd_id: u16, data: &[u8]) {
        debug!(cmd_id, len = data.len(), "referee passthrough");
    }
}
