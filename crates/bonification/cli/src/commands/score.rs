//! Score command

use crate::error::CliResult;
use bonification_runtime::scoring::{quality_component_score, time_component_score};
use clap::{Args, ValueEnum};

/// Which scoring curve to apply
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MetricKind {
    /// Lower is better (fabrication, pickup, assembly)
    Time,
    /// Higher is better
    Quality,
}

#[derive(Args)]
pub struct ScoreArgs {
    /// Scoring curve
    #[arg(long, value_enum)]
    pub kind: MetricKind,

    /// Measured value
    #[arg(long)]
    pub actual: u64,

    /// Target value
    #[arg(long)]
    pub target: u64,
}

pub fn component_score(args: &ScoreArgs) -> u32 {
    match args.kind {
        MetricKind::Time => time_component_score(args.actual, args.target),
        MetricKind::Quality => quality_component_score(args.actual, args.target),
    }
}

pub fn execute(args: ScoreArgs) -> CliResult<()> {
    println!("{}", component_score(&args));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_score() {
        let args = ScoreArgs {
            kind: MetricKind::Time,
            actual: 90,
            target: 100,
        };
        assert_eq!(component_score(&args), 82);

        let args = ScoreArgs {
            kind: MetricKind::Quality,
            actual: 100,
            target: 80,
        };
        assert_eq!(component_score(&args), 85);
    }
}
