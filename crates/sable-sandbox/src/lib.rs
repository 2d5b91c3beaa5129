//! # Sable Sandbox
//!
//! Headless sample application for the Sable physics core.
//!
//! ## What it does
//! - Builds the third-person sample scene, or loads one from JSON
//! - Starts the physics system and runs a ~60 Hz main loop
//! - Drives a capsule player: grounded check, jumping and turning
//! - Optionally flushes debug wireframes to a line-counting renderer
//! - Logs body positions and the physics step time once per second

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::Parser;
use glam::{Mat4, Vec3};
use sable_core::{Entity, FrameClock, Scene, TransformComponent};
use sable_physics::{
    BodyHandle, CameraMatrices, ColliderDescriptor, DebugVertex, LineRenderer, PhysicsConfig,
    PhysicsSystem, RigidbodyComponent, RigidbodyDescriptor,
};
use serde::{Deserialize, Serialize};

/// Upward impulse applied when the player jumps
const JUMP_IMPULSE: Vec3 = Vec3::new(0.0, 100.0, 0.0);

/// Sable physics sandbox
#[derive(Parser)]
#[command(name = "sable-sandbox")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// How long to run the simulation, in seconds
    #[arg(short, long, default_value = "5")]
    pub seconds: f32,

    /// Scene description (JSON); the built-in sample scene is used otherwise
    #[arg(long)]
    pub scene: Option<PathBuf>,

    /// Flush collider wireframes every frame
    #[arg(long)]
    pub debug_draw: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// One entity of a scene description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDescription {
    pub name: String,
    #[serde(default)]
    pub transform: TransformComponent,
    #[serde(default)]
    pub collider: Option<ColliderDescriptor>,
    #[serde(default)]
    pub rigidbody: Option<RigidbodyDescriptor>,
    /// Per-axis rotation response applied after the body is created
    #[serde(default)]
    pub angular_factor: Option<Vec3>,
    /// Marks the entity the player controller drives
    #[serde(default)]
    pub player: bool,
}

impl EntityDescription {
    fn new(name: &str, transform: TransformComponent) -> Self {
        Self {
            name: name.to_string(),
            transform,
            collider: None,
            rigidbody: None,
            angular_factor: None,
            player: false,
        }
    }
}

/// A scene to simulate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    pub name: String,
    #[serde(default)]
    pub physics: PhysicsConfig,
    pub entities: Vec<EntityDescription>,
}

impl SceneDescription {
    /// Third-person sample: floor, capsule player, falling cube and an offset sphere
    pub fn sample() -> Self {
        let floor = EntityDescription {
            rigidbody: Some(RigidbodyDescriptor::fixed()),
            ..EntityDescription::new(
                "Floor",
                TransformComponent::from_position(Vec3::new(0.0, -1.0, 0.0))
                    .with_scale(Vec3::new(50.0, 2.0, 50.0)),
            )
        };

        let player = EntityDescription {
            collider: Some(ColliderDescriptor::capsule(0.5, 1.0)),
            rigidbody: Some(RigidbodyDescriptor::dynamic(10.0)),
            angular_factor: Some(Vec3::new(0.0, 1.0, 0.0)),
            player: true,
            ..EntityDescription::new(
                "Player",
                TransformComponent::from_position(Vec3::new(0.0, 1.0, 4.0)),
            )
        };

        let cube = EntityDescription {
            rigidbody: Some(RigidbodyDescriptor::default()),
            ..EntityDescription::new(
                "Cube",
                TransformComponent::from_position(Vec3::new(0.0, 10.0, 0.0))
                    .with_rotation(Vec3::new(20.0, 0.0, 10.0)),
            )
        };

        let sphere = EntityDescription {
            collider: Some(ColliderDescriptor::sphere(0.5).with_offset(Vec3::new(0.0, 0.5, 0.0))),
            rigidbody: Some(RigidbodyDescriptor::dynamic(2.0)),
            ..EntityDescription::new(
                "Sphere",
                TransformComponent::from_position(Vec3::new(2.0, 6.0, -1.0)),
            )
        };

        Self {
            name: "Sandbox".to_string(),
            physics: PhysicsConfig::default(),
            entities: vec![floor, player, cube, sphere],
        }
    }

    /// Load a description from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse scene file {}", path.display()))
    }
}

/// Spawn the described entities and give each its body
///
/// Returns the scene and the player entity, if one is marked.
pub fn populate(
    description: &SceneDescription,
    physics: &PhysicsSystem,
) -> (Scene, Option<Entity>) {
    let mut scene = Scene::new(description.name.clone());
    let mut player = None;

    for desc in &description.entities {
        let entity = scene.create_entity(desc.name.clone());
        if let Some(transform) = scene.transform_mut(entity) {
            *transform = desc.transform;
        }
        if let Some(collider) = desc.collider {
            scene.add_component(entity, collider);
        }

        if let Some(rigidbody) = desc.rigidbody {
            physics.add_rigidbody(&mut scene, entity, rigidbody);
            let rb = scene.get_mut::<RigidbodyComponent>(entity);
            if let (Some(factor), Some(rb)) = (desc.angular_factor, rb) {
                rb.set_angular_factor(factor);
            }
        }

        if desc.player {
            player = Some(entity);
        }
    }

    log::info!(
        "Scene '{}' populated with {} entities",
        description.name,
        scene.entity_count()
    );
    (scene, player)
}

/// Jumping and turning for a capsule player
#[derive(Debug)]
pub struct PlayerController {
    entity: Entity,
    body: Option<BodyHandle>,
    /// Distance from the body origin to the bottom of the collider
    foot_offset: f32,
    yaw: f32,
    turn_speed: f32,
    jump_cooldown: f32,
    jumps: u32,
}

impl PlayerController {
    pub fn new(scene: &Scene, entity: Entity) -> Self {
        let foot_offset = match scene.get::<ColliderDescriptor>(entity) {
            Some(ColliderDescriptor::Capsule { radius, height, .. }) => radius + height * 0.5,
            Some(ColliderDescriptor::Sphere { radius, .. }) => radius,
            Some(ColliderDescriptor::Box { size, .. }) => size.y * 0.5,
            None => 0.5,
        };
        let scale_y = scene.transform(entity).map_or(1.0, |t| t.scale.y);
        let body = scene
            .world()
            .get::<&RigidbodyComponent>(entity)
            .ok()
            .and_then(|rb| rb.body());

        Self {
            entity,
            body,
            foot_offset: foot_offset * scale_y,
            yaw: 0.0,
            turn_speed: 45.0,
            jump_cooldown: 0.0,
            jumps: 0,
        }
    }

    pub fn jumps(&self) -> u32 {
        self.jumps
    }

    /// Whether a short ray below the player hits something other than itself
    pub fn is_grounded(&self, scene: &Scene, physics: &PhysicsSystem) -> bool {
        let Some(transform) = scene.transform(self.entity) else {
            return false;
        };
        let start = transform.position;
        let end = start - Vec3::new(0.0, self.foot_offset + 0.1, 0.0);
        physics.raycast(start, end, self.body).is_some()
    }

    pub fn update(&mut self, scene: &mut Scene, physics: &PhysicsSystem, dt: f32) {
        self.jump_cooldown = (self.jump_cooldown - dt).max(0.0);
        let grounded = self.is_grounded(scene, physics);

        self.yaw = sable_core::math::normalize_angle(self.yaw + self.turn_speed * dt);
        let Some(rb) = scene.get_mut::<RigidbodyComponent>(self.entity) else {
            return;
        };
        rb.set_rotation(Vec3::new(0.0, self.yaw, 0.0));

        if grounded && self.jump_cooldown <= 0.0 {
            if let Some(position) = rb.position() {
                rb.add_impulse(JUMP_IMPULSE, position);
                self.jumps += 1;
                self.jump_cooldown = 1.0;
                log::debug!("Player jumped from {}", position);
            }
        }
    }
}

/// Renderer stand-in that only counts what it is asked to draw
#[derive(Debug, Default)]
pub struct LineCounter {
    pub draw_calls: usize,
    pub lines: usize,
}

impl LineRenderer for LineCounter {
    fn draw_lines(&mut self, vertices: &[DebugVertex], _view_projection: Mat4) {
        self.draw_calls += 1;
        self.lines += vertices.len() / 2;
    }
}

/// Totals reported at the end of a run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub frames: u64,
    pub jumps: u32,
    pub debug_lines: usize,
    pub bodies: usize,
}

/// Wall-clock run length; negative values run zero frames
fn run_duration(seconds: f32) -> Result<Duration> {
    if seconds.is_nan() {
        bail!("Run length must be a number of seconds, got {seconds}");
    }
    Duration::try_from_secs_f32(seconds.max(0.0))
        .with_context(|| format!("Run length of {seconds}s is out of range"))
}

/// Simulate `description` for `seconds` of wall-clock time
pub fn run(description: &SceneDescription, seconds: f32, debug_draw: bool) -> Result<RunSummary> {
    let duration = run_duration(seconds)?;
    let config = description.physics.clone().with_debug_draw(debug_draw);
    let mut physics = PhysicsSystem::new(config).context("Invalid physics configuration")?;
    physics.initialize().context("Failed to start the physics system")?;

    let (mut scene, player) = populate(description, &physics);
    let mut controller = player.map(|entity| PlayerController::new(&scene, entity));

    let camera = CameraMatrices::look_at(Vec3::new(0.0, 8.0, 16.0), Vec3::ZERO, 45.0, 16.0 / 9.0);
    let mut renderer = LineCounter::default();

    let frame_time = Duration::from_secs_f32(1.0 / 60.0);
    let mut clock = FrameClock::new(Duration::from_millis(100));
    let started = Instant::now();
    let mut last_report = started;

    while started.elapsed() < duration {
        let dt = clock.tick().as_secs_f32();

        physics.update(&mut scene);
        if let Some(controller) = controller.as_mut() {
            controller.update(&mut scene, &physics, dt);
        }
        if debug_draw {
            physics.render_debug(&camera, &mut renderer);
        }

        if last_report.elapsed() >= Duration::from_secs(1) {
            last_report = Instant::now();
            report(description, &scene, &physics);
        }

        thread::sleep(frame_time);
    }

    let summary = RunSummary {
        frames: clock.frame_count(),
        jumps: controller.as_ref().map_or(0, PlayerController::jumps),
        debug_lines: renderer.lines,
        bodies: physics.world().lock().body_count(),
    };
    physics.shutdown();

    log::info!(
        "Simulated {:.1}s in {} frames ({} jumps, {} debug lines)",
        started.elapsed().as_secs_f32(),
        summary.frames,
        summary.jumps,
        summary.debug_lines
    );
    Ok(summary)
}

fn report(description: &SceneDescription, scene: &Scene, physics: &PhysicsSystem) {
    log::info!("Physics step: {:.3} ms", physics.last_physics_execution_time());
    let dynamic = description
        .entities
        .iter()
        .filter(|d| d.rigidbody.is_some_and(|rb| rb.is_dynamic()));
    for desc in dynamic {
        if let Some(transform) = scene.find_by_name(&desc.name).and_then(|e| scene.transform(e)) {
            log::info!(
                "  {:<10} position {:>6.2} {:>6.2} {:>6.2}  rotation {:>7.1} {:>7.1} {:>7.1}",
                desc.name,
                transform.position.x,
                transform.position.y,
                transform.position.z,
                transform.rotation.x,
                transform.rotation.y,
                transform.rotation.z
            );
        }
    }
}

/// Execute the CLI command
pub fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let description = match &cli.scene {
        Some(path) => SceneDescription::load(path)?,
        None => SceneDescription::sample(),
    };

    log::info!("Running scene '{}' for {}s", description.name, cli.seconds);
    run(&description, cli.seconds, cli.debug_draw)?;
    Ok(())
}
