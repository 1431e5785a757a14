//! Endfoot CLI - seed placement and wavefront growth on synthetic surfaces.
//!
//! Usage: endfoot <COMMAND> [OPTIONS]
//!
//! Run `endfoot --help` for available commands.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use nalgebra::{Point3, Vector3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use endfoot::algo::{
    find_adjacent_pair, reconstruct_batch, reconstruct_with_progress, FastMarching, MeshGraph,
    Progress, Reconstruction, ReconstructOptions,
};
use endfoot::mesh::{shapes, SurfaceMesh, TriangleMesh};

#[derive(Parser)]
#[command(name = "endfoot")]
#[command(author, version, about = "Endfeet reconstruction CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct on a flat triangulated grid
    Grid {
        /// Number of cells along each side
        #[arg(short = 'n', long, default_value = "40")]
        size: usize,

        /// Distance between neighboring grid vertices
        #[arg(long, default_value = "1.0")]
        spacing: f64,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Reconstruct on an open cylinder (vessel segment)
    Tube {
        /// Number of vertex circles along the axis
        #[arg(long, default_value = "40")]
        rings: usize,

        /// Number of vertices per circle
        #[arg(long, default_value = "32")]
        segments: usize,

        /// Cylinder radius
        #[arg(long, default_value = "1.0")]
        radius: f64,

        /// Cylinder length
        #[arg(long, default_value = "10.0")]
        length: f64,

        #[command(flatten)]
        run: RunArgs,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Number of seeds to scatter over the surface
    #[arg(short, long, default_value = "20")]
    seeds: usize,

    /// Maximum distance a front may reach from its seed
    #[arg(short, long, default_value = "3.0")]
    cutoff: f64,

    /// Rings searched when relocating a colliding seed
    #[arg(long, default_value = "5")]
    max_rings: usize,

    /// Random offset applied to every seed, in units of the mean edge length
    #[arg(long, default_value = "0.5")]
    jitter: f64,

    /// Random number generator seed
    #[arg(long, default_value = "42")]
    rng_seed: u64,

    /// Number of independent seed sets (runs in parallel when > 1)
    #[arg(long, default_value = "1")]
    batch: usize,

    /// Use single-threaded execution (for benchmarking)
    #[arg(long)]
    sequential: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Grid { size, spacing, run } => {
            let mesh = shapes::grid(size, spacing)?;
            println!("Surface: {}x{} grid, spacing {}", size, size, spacing);
            cmd_reconstruct(&mesh, &run)?;
        }

        Commands::Tube {
            rings,
            segments,
            radius,
            length,
            run,
        } => {
            let mesh = shapes::tube(rings, segments, radius, length)?;
            println!(
                "Surface: tube, {} rings x {} segments, radius {}, length {}",
                rings, segments, radius, length
            );
            cmd_reconstruct(&mesh, &run)?;
        }
    }

    Ok(())
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0)); // Track highest percent seen (monotonic)

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let raw_percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        // Only ever move forward
        let previous = max_percent.fetch_max(raw_percent, Ordering::Relaxed);
        if raw_percent <= previous && raw_percent != 100 {
            return;
        }

        let bar_width = 30;
        let filled = (raw_percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        eprint!("\r[{}{}] {:3}% {:<24}", bar, space, raw_percent, message);
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

/// Scatter seeds near random vertices, offset by up to `jitter` in each axis.
fn scatter_seeds(
    mesh: &TriangleMesh,
    count: usize,
    jitter: f64,
    rng: &mut ChaCha8Rng,
) -> Vec<Point3<f64>> {
    let positions = mesh.positions();
    (0..count)
        .map(|_| {
            let base = positions[rng.gen_range(0..positions.len())];
            let offset = Vector3::new(
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-1.0..=1.0),
            );
            base + offset * jitter
        })
        .collect()
}

fn cmd_reconstruct(mesh: &TriangleMesh, args: &RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    println!("Vertices: {}", mesh.num_vertices());
    println!("Faces: {}", mesh.num_faces());

    let edge = mesh.average_edge_length();
    println!("Average edge length: {:.4}", edge);

    let options = ReconstructOptions::new(args.cutoff)
        .with_max_rings(args.max_rings)
        .with_parallel(!args.sequential);

    let mut rng = ChaCha8Rng::seed_from_u64(args.rng_seed);
    let seed_sets: Vec<Vec<Point3<f64>>> = (0..args.batch.max(1))
        .map(|_| scatter_seeds(mesh, args.seeds, args.jitter * edge, &mut rng))
        .collect();

    let solver = FastMarching::default();
    let graph = MeshGraph::from_mesh(mesh)?;
    let start = Instant::now();

    if seed_sets.len() == 1 {
        let progress = create_progress();
        let result = reconstruct_with_progress(mesh, &seed_sets[0], &options, &solver, &progress)?;
        let elapsed = start.elapsed();
        print_summary(&graph, &result);
        println!("Time: {:.3}s", elapsed.as_secs_f64());
        return Ok(());
    }

    let results = reconstruct_batch(mesh, &seed_sets, &options, &solver)?;
    let elapsed = start.elapsed();

    let mut failed = 0;
    for (i, result) in results.iter().enumerate() {
        println!();
        println!("Seed set {}:", i);
        match result {
            Ok(result) => print_summary(&graph, result),
            Err(e) => {
                failed += 1;
                println!("  Failed: {}", e);
            }
        }
    }
    println!();
    println!(
        "{} of {} seed sets succeeded in {:.3}s",
        results.len() - failed,
        results.len(),
        elapsed.as_secs_f64()
    );

    Ok(())
}

fn print_summary(graph: &MeshGraph, result: &Reconstruction) {
    let wavefront = &result.wavefront;
    let sizes = result.group_sizes();

    println!("  Seeds: {}", result.num_seeds());
    println!(
        "  Relocated: {} seed(s) from {} collision(s)",
        result.relocation.num_moved(),
        result.relocation.groups_resolved
    );
    for m in &result.relocation.moves {
        println!(
            "    seed {}: vertex {} -> {} (ring {})",
            m.seed, m.from, m.to, m.ring
        );
    }
    if let Some((a, b)) = find_adjacent_pair(graph, &result.seed_vertices) {
        println!("  Note: seeds {} and {} sit on adjacent vertices", a, b);
    }

    let visited = wavefront.visited_count();
    println!(
        "  Visited: {} of {} vertices ({:.1}%)",
        visited,
        wavefront.len(),
        100.0 * visited as f64 / wavefront.len().max(1) as f64
    );
    if let Some(t) = wavefront.max_travel_time() {
        println!("  Max travel time: {:.4}", t);
    }
    if let (Some(min), Some(max)) = (sizes.iter().min(), sizes.iter().max()) {
        let mean = sizes.iter().sum::<usize>() as f64 / sizes.len() as f64;
        println!("  Group size: min {}, max {}, mean {:.1}", min, max, mean);
    }
}
