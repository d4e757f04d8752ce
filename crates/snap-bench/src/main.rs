use std::io;
use std::time::{Duration, Instant};

use clap::Parser;
use field_snap::components::render_scene;
use field_snap::geometry::Axis;
use field_snap::palette::Palette;
use field_snap::scene::{Scene, SceneOptions};
use field_snap::ui::UiFrame;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

#[derive(Parser, Debug)]
#[command(
    name = "snap-bench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Headless drag benchmark for checking snap matching cost"
)]
struct BenchCli {
    /// Number of areas on the field.
    #[arg(short = 'n', long = "areas", value_name = "N", default_value_t = 300)]
    areas: usize,

    /// Number of drag gestures to perform.
    #[arg(short = 'g', long = "gestures", value_name = "N", default_value_t = 200)]
    gestures: usize,

    /// Pointer moves per gesture.
    #[arg(short = 's', long = "steps", value_name = "N", default_value_t = 100)]
    steps: usize,

    /// Field size in cells, as WIDTHxHEIGHT.
    #[arg(long = "field", value_name = "WxH", default_value = "200x60")]
    field: String,

    /// Also render the scene into an offscreen buffer after every step.
    #[arg(long = "render")]
    render: bool,

    /// Seed for the scene and the pointer walk.
    #[arg(long = "seed", value_name = "SEED", default_value_t = 1)]
    seed: u64,
}

struct BenchConfig {
    areas: usize,
    gestures: usize,
    steps: usize,
    field: Rect,
    render: bool,
    seed: u64,
}

fn parse_field(value: &str) -> Option<Rect> {
    let (w, h) = value.split_once('x')?;
    let width = w.trim().parse().ok()?;
    let height = h.trim().parse().ok()?;
    Some(Rect::new(0, 0, width, height))
}

impl TryFrom<&BenchCli> for BenchConfig {
    type Error = String;

    fn try_from(cli: &BenchCli) -> Result<Self, Self::Error> {
        if !(1..=field_snap::constants::MAX_AREAS).contains(&cli.areas) {
            return Err(format!(
                "areas must be between 1 and {}",
                field_snap::constants::MAX_AREAS
            ));
        }
        if cli.gestures == 0 || cli.steps == 0 {
            return Err("gestures and steps must be positive".to_string());
        }
        let field = parse_field(&cli.field)
            .filter(|r| r.width >= 20 && r.height >= 10)
            .ok_or_else(|| "field must look like 200x60 and be at least 20x10".to_string())?;
        Ok(Self {
            areas: cli.areas,
            gestures: cli.gestures,
            steps: cli.steps,
            field,
            render: cli.render,
            seed: cli.seed,
        })
    }
}

fn main() -> io::Result<()> {
    let args = BenchCli::parse();
    let config = BenchConfig::try_from(&args)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;
    let stats = run_benchmark(&config);
    println!("{}", stats.final_report(&config));
    Ok(())
}

fn run_benchmark(config: &BenchConfig) -> BenchStats {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let options = SceneOptions {
        throttle: Duration::ZERO,
        ..SceneOptions::default()
    };
    let mut scene = Scene::new(config.field, options);
    scene.populate(config.areas, Palette::Random, &mut rng);

    let mut buffer = Buffer::empty(config.field);
    let mut stats = BenchStats::new(
        scene.registry().len(Axis::Vertical) + scene.registry().len(Axis::Horizontal),
    );

    for _ in 0..config.gestures {
        let index = rng.random_range(0..scene.areas().len());
        let cells = scene.areas()[index].rect().to_cells(config.field);
        let mut column = cells.x + cells.width / 2;
        let mut row = cells.y + cells.height / 2;
        if scene.pointer_down(column, row).is_none() {
            stats.missed_presses += 1;
            continue;
        }
        for _ in 0..config.steps {
            column = walk(&mut rng, column, config.field.width);
            row = walk(&mut rng, row, config.field.height);
            let started = Instant::now();
            let outcome = scene.pointer_drag(column, row, started);
            let step_time = started.elapsed();
            if let Some(step) = outcome {
                stats.record_step(step_time, step.vertical.is_some() || step.horizontal.is_some());
            }
            if config.render {
                let started = Instant::now();
                buffer.reset();
                render_scene(
                    &mut UiFrame::from_parts(config.field, &mut buffer),
                    &scene,
                    config.field,
                );
                stats.render_time += started.elapsed();
            }
        }
        if scene.pointer_up().is_some() {
            stats.saves += 1;
        }
    }
    stats.mark_completed();
    stats
}

fn walk(rng: &mut StdRng, value: u16, span: u16) -> u16 {
    let delta: i32 = rng.random_range(-3..=3);
    (i32::from(value) + delta).clamp(0, i32::from(span.saturating_sub(1))) as u16
}

struct BenchStats {
    started: Instant,
    finished: Option<Instant>,
    edges: usize,
    steps: u64,
    snapped_steps: u64,
    step_time: Duration,
    slowest_step: Duration,
    render_time: Duration,
    missed_presses: u64,
    saves: u64,
}

impl BenchStats {
    fn new(edges: usize) -> Self {
        Self {
            started: Instant::now(),
            finished: None,
            edges,
            steps: 0,
            snapped_steps: 0,
            step_time: Duration::ZERO,
            slowest_step: Duration::ZERO,
            render_time: Duration::ZERO,
            missed_presses: 0,
            saves: 0,
        }
    }

    fn record_step(&mut self, elapsed: Duration, snapped: bool) {
        self.steps += 1;
        if snapped {
            self.snapped_steps += 1;
        }
        self.step_time += elapsed;
        self.slowest_step = self.slowest_step.max(elapsed);
    }

    fn mark_completed(&mut self) {
        self.finished = Some(Instant::now());
    }

    fn elapsed(&self) -> Duration {
        self.finished
            .unwrap_or_else(Instant::now)
            .duration_since(self.started)
    }

    fn average_step_us(&self) -> f64 {
        if self.steps == 0 {
            0.0
        } else {
            self.step_time.as_secs_f64() * 1_000_000.0 / self.steps as f64
        }
    }

    /// Every side query walks the whole axis list, so the per-edge cost is
    /// the step time spread over the edges scanned.
    fn ns_per_edge_scan(&self) -> f64 {
        if self.edges == 0 {
            return 0.0;
        }
        self.average_step_us() * 1000.0 / self.edges as f64
    }

    fn final_report(&self, config: &BenchConfig) -> String {
        let step_secs = self.step_time.as_secs_f64();
        let steps_per_sec = if step_secs > 0.0 {
            self.steps as f64 / step_secs
        } else {
            0.0
        };
        let snapped_pct = if self.steps == 0 {
            0.0
        } else {
            self.snapped_steps as f64 * 100.0 / self.steps as f64
        };
        let render = if config.render {
            format!("{:.2}s", self.render_time.as_secs_f64())
        } else {
            "off".to_string()
        };
        indoc::formatdoc!(
            r#"
            Snap bench completed in {elapsed:.2}s.
            Field: {width}x{height} cells | Areas: {areas} | Edges: {edges}
            Steps: {steps} (~{steps_per_sec:.0}/s) | Snapped: {snapped_pct:.1}%
            Avg step: {avg:.2} us | Worst: {worst:.2} us | ~{per_edge:.1} ns per edge
            Gestures: {gestures} | Saved: {saves} | Missed presses: {missed}
            Render: {render}
            "#,
            elapsed = self.elapsed().as_secs_f64(),
            width = config.field.width,
            height = config.field.height,
            areas = config.areas,
            edges = self.edges,
            steps = self.steps,
            steps_per_sec = steps_per_sec,
            snapped_pct = snapped_pct,
            avg = self.average_step_us(),
            worst = self.slowest_step.as_secs_f64() * 1_000_000.0,
            per_edge = self.ns_per_edge_scan(),
            gestures = config.gestures,
            saves = self.saves,
            missed = self.missed_presses,
            render = render,
        )
    }
}
