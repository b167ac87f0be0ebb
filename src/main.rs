use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use mining_fleet::{SimConfig, Simulation, logging};
use tracing::{error, warn};

#[derive(Parser)]
#[command(name = "mining_fleet")]
#[command(about = "Simulate mining trucks contending for unloading stations")]
#[command(version)]
struct Cli {
    /// Number of trucks (prompted for when omitted)
    #[arg(long)]
    trucks: Option<u32>,

    /// Number of unloading stations (prompted for when omitted)
    #[arg(long)]
    stations: Option<u32>,

    /// Simulated hours to run
    #[arg(long, default_value_t = 72)]
    hours: u64,

    /// Divides every simulated duration to speed the run up
    #[arg(long, default_value_t = 100)]
    speed_factor: u32,

    /// One-way travel time in simulated minutes
    #[arg(long, default_value_t = 30)]
    travel_minutes: u64,

    /// Unload time in simulated minutes
    #[arg(long, default_value_t = 5)]
    unload_minutes: u64,

    /// Shortest loading time in simulated hours
    #[arg(long, default_value_t = 1)]
    loading_min_hours: u64,

    /// Longest loading time in simulated hours
    #[arg(long, default_value_t = 5)]
    loading_max_hours: u64,

    /// Seed for loading times, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
}

/// Prompt until a positive integer is entered. `None` on end of input.
fn prompt_count(input: &mut impl BufRead, output: &mut impl Write, label: &str) -> Option<u32> {
    loop {
        if let Err(err) = write!(output, "Enter number of {label} : ").and_then(|()| output.flush())
        {
            warn!(%err, "failed to write prompt");
        }
        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => return None,
            Ok(_) => {}
        }
        match line.trim().parse::<u32>() {
            Ok(count) if count > 0 => return Some(count),
            _ => {
                if let Err(err) = writeln!(output, "Invalid number of {label}. Please enter 1 or more.") {
                    warn!(%err, "failed to write prompt");
                }
            }
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init();

    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout();
    let trucks = match cli.trucks {
        Some(count) => count,
        None => match prompt_count(&mut stdin, &mut stdout, "Trucks") {
            Some(count) => count,
            None => {
                eprintln!("no truck count given");
                return ExitCode::from(2);
            }
        },
    };
    let stations = match cli.stations {
        Some(count) => count,
        None => match prompt_count(&mut stdin, &mut stdout, "UnloadingStations") {
            Some(count) => count,
            None => {
                eprintln!("no station count given");
                return ExitCode::from(2);
            }
        },
    };
    drop(stdin);

    let config = SimConfig {
        trucks,
        stations,
        travel_minutes: cli.travel_minutes,
        unload_minutes: cli.unload_minutes,
        loading_min_hours: cli.loading_min_hours,
        loading_max_hours: cli.loading_max_hours,
        simulation_hours: cli.hours,
        speed_factor: cli.speed_factor,
        seed: cli.seed,
    };

    let report = match Simulation::new(config).and_then(|sim| sim.run()) {
        Ok(report) => report,
        Err(err) => {
            error!(%err, "simulation failed");
            eprintln!("simulation error: {err}");
            return ExitCode::FAILURE;
        }
    };
    println!("{report}");
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts writes, fails every flush.
    struct BrokenFlush(Vec<u8>);

    impl Write for BrokenFlush {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"))
        }
    }

    #[test]
    fn prompt_survives_flush_failure() {
        let mut input = io::Cursor::new("abc\n4\n");
        let mut output = BrokenFlush(Vec::new());
        assert_eq!(prompt_count(&mut input, &mut output, "Trucks"), Some(4));
        let written = String::from_utf8(output.0).expect("utf8 prompt");
        assert_eq!(written.matches("Enter number of Trucks").count(), 2);
        assert!(written.contains("Invalid number of Trucks"));
    }

    #[test]
    fn prompt_gives_up_at_end_of_input() {
        let mut input = io::Cursor::new("0\n");
        let mut output = Vec::new();
        assert_eq!(prompt_count(&mut input, &mut output, "UnloadingStations"), None);
    }
}
