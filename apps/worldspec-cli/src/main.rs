use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use worldspec_common::{Constraints, Point, Primitive, Segment};
use worldspec_kernel::{Color, NullVisualizer, TracingVisualizer, Visualizer, World};
use worldspec_persist::{WorldFile, WorldStore};

#[derive(Parser)]
#[command(name = "worldspec-cli", about = "CLI tool for layered world documents")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Summarize the layers and features of a world file
    Inspect {
        /// World document (.yaml or .json)
        path: PathBuf,
    },
    /// Check that a world file loads cleanly
    Validate { path: PathBuf },
    /// List the features containing a point, or test a single feature
    Contains {
        path: PathBuf,
        #[arg(allow_hyphen_values = true)]
        x: f64,
        #[arg(allow_hyphen_values = true)]
        y: f64,
        /// Only test the feature with this id
        #[arg(short, long)]
        feature: Option<String>,
    },
    /// List boundary crossings of the segment (ax, ay) -> (bx, by)
    Intersect {
        path: PathBuf,
        #[arg(allow_hyphen_values = true)]
        ax: f64,
        #[arg(allow_hyphen_values = true)]
        ay: f64,
        #[arg(allow_hyphen_values = true)]
        bx: f64,
        #[arg(allow_hyphen_values = true)]
        by: f64,
    },
    /// Rewrite a world file in the format of the output extension
    Convert { input: PathBuf, output: PathBuf },
    /// Write a sample world with a restricted zone, a landmark and a polygon
    Demo {
        /// Destination file
        #[arg(short, long, default_value = "world_config.yaml")]
        out: PathBuf,
        /// Robot count recorded in the document
        #[arg(short, long, default_value = "5")]
        robots: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("worldspec-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("document formats: yaml, json");
        }
        Commands::Inspect { path } => {
            let file = load(&path, NullVisualizer)?;
            println!("{}", file.world.summary());
            println!("robots: {}", file.robot_count());
        }
        Commands::Validate { path } => {
            let file = load(&path, TracingVisualizer)?;
            println!(
                "OK: {} layers, {} features",
                file.world.layer_count(),
                file.world.feature_count()
            );
        }
        Commands::Contains {
            path,
            x,
            y,
            feature,
        } => {
            let mut file = load(&path, TracingVisualizer)?;
            let point = Point::new(x, y);
            match feature {
                Some(id) => {
                    if file.world.feature(&id).is_none() {
                        tracing::warn!(feature_id = %id, "no feature with this id");
                    }
                    let inside = file.world.is_point_in_feature(point, &id);
                    let color = if inside {
                        Color::GREEN
                    } else {
                        Color::RED
                    };
                    file.world.visualizer_mut().highlight_point(point, color);
                    println!("({x}, {y}) inside '{id}': {inside}");
                }
                None => {
                    let ids = file.world.features_containing_point(point);
                    println!("({x}, {y}) contained by {} features", ids.len());
                    for id in ids {
                        println!("  {id}");
                    }
                }
            }
        }
        Commands::Intersect {
            path,
            ax,
            ay,
            bx,
            by,
        } => {
            let mut file = load(&path, TracingVisualizer)?;
            let segment = Segment::new((ax, ay), (bx, by));
            file.world
                .visualizer_mut()
                .draw_line_segment(segment.a, segment.b);
            let hits = file.world.intersections_with_world(segment);
            println!("{} intersections", hits.len());
            for hit in hits {
                println!("  {} ({:.6}, {:.6})", hit.kind, hit.point.x, hit.point.y);
            }
        }
        Commands::Convert { input, output } => {
            let file = load(&input, NullVisualizer)?;
            WorldStore::new(&output)
                .save(&file.world, file.number_of_robots)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("{} -> {}", input.display(), output.display());
        }
        Commands::Demo { out, robots } => {
            let world = demo_world()?;
            WorldStore::new(&out)
                .save(&world, Some(robots))
                .with_context(|| format!("writing {}", out.display()))?;
            println!("{}", world.summary());
            println!("written to {}", out.display());
        }
    }

    Ok(())
}

fn load<V: Visualizer>(path: &Path, visualizer: V) -> anyhow::Result<WorldFile<V>> {
    WorldStore::new(path)
        .load(visualizer)
        .with_context(|| format!("loading {}", path.display()))
}

fn demo_world() -> anyhow::Result<World> {
    let mut world = World::new();
    world.add_layers_in_order(["Base", "Landmarks", "RestrictedZones"]);

    let restricted: Constraints = [
        ("min_linear_velocity", 1.0),
        ("max_linear_velocity", 10.0),
        ("min_altitude", 0.0),
        ("max_altitude", 100.0),
        ("min_angular_velocity", 0.5),
        ("max_angular_velocity", 2.0),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_owned(), v))
    .collect();
    world.add_feature(
        "RestrictedZones",
        "restricted_zone_1",
        vec![Primitive::circle((0.5, 0.5), 0.1)],
        restricted,
    )?;

    let landmark: Constraints = [("min_altitude", 0.0), ("max_altitude", 50.0)]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect();
    world.add_feature(
        "Landmarks",
        "landmark_1",
        vec![Primitive::rectangle((-0.5, -0.5), 0.2, 0.1)],
        landmark,
    )?;

    let polygon: Constraints = [
        ("max_linear_velocity", 5.0),
        ("min_altitude", 5.0),
        ("max_altitude", 30.0),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_owned(), v))
    .collect();
    world.add_feature(
        "Landmarks",
        "polygon_1",
        vec![Primitive::polygon([(0.0, 0.0), (0.3, 0.0), (0.3, 0.3), (0.0, 0.3)])],
        polygon,
    )?;

    Ok(world)
}
