use std::path::PathBuf;

use attack_graph::render::{CircularLayout, ForceDirectedLayout, LayoutStrategy};
use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(name = "attack-graph")]
#[command(about = "Build a directed attack graph from a vulnerability inventory and a router connectivity map.")]
pub struct CommandLine {
    /// Host inventory, one `<id> : <vuln>, <vuln>` per line
    pub topology: PathBuf,
    /// Router blocks with `>router`, `+node` and `-node` lines
    pub connections: PathBuf,

    /// How to print the graph
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also draw the graph to this file (.svg or .png)
    #[arg(long, value_name = "PATH")]
    pub render: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LayoutKind::Circular)]
    pub layout: LayoutKind,

    /// Node placed at the center of the circular layout
    #[arg(long, value_name = "ID")]
    pub center: Option<String>,

    /// Circle radius (circular) or half-width of the drawing area (force)
    #[arg(long, default_value_t = 8.0, value_parser = parse_radius)]
    pub radius: f32,

    /// Force-directed layout iterations
    #[arg(long, default_value_t = 200)]
    pub iterations: usize,

    /// Force-directed layout seed
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Base log level, overridden by -v and by RUST_LOG
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LayoutKind {
    Circular,
    Force,
}

fn parse_radius(value: &str) -> Result<f32, String> {
    let radius: f32 = value
        .parse()
        .map_err(|e| format!("'{value}' is not a number: {e}"))?;
    if radius.is_finite() && radius > 0.0 {
        Ok(radius)
    } else {
        Err(format!("radius must be a positive finite number, got {value}"))
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn log_level(&self) -> &str {
        match self.verbose {
            0 => &self.log_level,
            1 => "debug",
            _ => "trace",
        }
    }

    pub fn layout_strategy(&self) -> Box<dyn LayoutStrategy> {
        match self.layout {
            LayoutKind::Circular => Box::new(CircularLayout {
                center: self.center.clone(),
                radius: self.radius,
            }),
            LayoutKind::Force => Box::new(ForceDirectedLayout {
                iterations: self.iterations,
                seed: self.seed,
                extent: self.radius,
            }),
        }
    }
}
