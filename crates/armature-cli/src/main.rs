//! Armature CLI - drive blend trees and IK solvers from TOML files

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{blend, ik, two_bone};

#[derive(Parser)]
#[command(name = "armature")]
#[command(about = "Skeletal blend trees and inverse kinematics from the command line", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a blend tree file and print the joint pose each tick
    Blend {
        /// Path to a blend tree file (.blend.toml)
        file: String,

        /// Blend parameter: one value for a 1D root, x,y for a 2D root
        #[arg(long, value_parser = parse_param)]
        param: Option<Vec<f32>>,

        /// Seconds advanced per tick
        #[arg(long, default_value = "0.1")]
        dt: f64,

        /// Number of ticks to run
        #[arg(long, default_value = "10")]
        ticks: usize,

        /// Play once instead of looping
        #[arg(long)]
        once: bool,
    },

    /// Run an iterative IK solver from a rig file
    Ik {
        /// Path to a rig file (.rig.toml)
        rig: String,

        /// Override the solver named in the rig (ccd or fabrik)
        #[arg(long)]
        solver: Option<String>,

        /// Target position (comma-separated x,y,z)
        #[arg(long, value_parser = parse_vec3)]
        target: Option<[f32; 3]>,

        /// Maximum number of solver updates
        #[arg(long, default_value = "20")]
        ticks: usize,
    },

    /// Solve the analytical two-bone arm from a rig file
    TwoBone {
        /// Path to a rig file (.rig.toml)
        rig: String,

        /// Target position relative to the arm root (comma-separated x,y)
        #[arg(long, value_parser = parse_vec2)]
        target: [f32; 2],
    },
}

fn parse_components(s: &str) -> Result<Vec<f32>, String> {
    s.split(',')
        .enumerate()
        .map(|(i, part)| {
            part.trim()
                .parse::<f32>()
                .map_err(|e| format!("invalid component {}: {}", i, e))
        })
        .collect()
}

fn parse_param(s: &str) -> Result<Vec<f32>, String> {
    let values = parse_components(s)?;
    if values.is_empty() || values.len() > 2 {
        return Err(format!("expected 1 or 2 comma-separated values, got {}", values.len()));
    }
    Ok(values)
}

fn parse_vec2(s: &str) -> Result<[f32; 2], String> {
    let values = parse_components(s)?;
    if values.len() != 2 {
        return Err(format!("expected 2 comma-separated values, got {}", values.len()));
    }
    Ok([values[0], values[1]])
}

fn parse_vec3(s: &str) -> Result<[f32; 3], String> {
    let values = parse_components(s)?;
    if values.len() != 3 {
        return Err(format!("expected 3 comma-separated values, got {}", values.len()));
    }
    Ok([values[0], values[1], values[2]])
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Blend {
            file,
            param,
            dt,
            ticks,
            once,
        } => blend::run(blend::BlendArgs {
            file,
            param,
            dt,
            ticks,
            looping: !once,
        }),
        Commands::Ik {
            rig,
            solver,
            target,
            ticks,
        } => ik::run(&rig, solver.as_deref(), target, ticks),
        Commands::TwoBone { rig, target } => two_bone::run(&rig, target),
    }
}
