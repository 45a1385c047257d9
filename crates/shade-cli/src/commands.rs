use colored::Colorize;
use shade_archive::ArchiveReader;
use shade_merge::{MergeConfig, MergeSession};

use crate::cli::{Cli, Command, InspectArgs, MergeArgs};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Merge(args) => cmd_merge(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn cmd_merge(args: MergeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => MergeConfig::load(path)?,
        None => MergeConfig::default(),
    };
    if args.wallclock_timestamps {
        config.deterministic_timestamps = false;
    }

    let session = MergeSession::from_config(&config);
    let report = session.run(&args.inputs, &args.output)?;

    println!(
        "{} Wrote {}",
        "✓".green().bold(),
        args.output.display().to_string().bold()
    );
    println!(
        "  {} archives, {} entries copied, {} duplicates skipped",
        report.archives_read,
        report.entries_copied,
        report.duplicates_skipped
    );
    for (name, count) in &report.entries_absorbed {
        println!("  {} absorbed {} entries", name.cyan(), count);
    }
    if report.transformed_entries > 0 {
        println!(
            "  {} merged entries written",
            report.transformed_entries.to_string().yellow()
        );
    }
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let reader = ArchiveReader::open(&args.archive)?;
    let entries = reader.list_entries()?;

    println!("{}", args.archive.display().to_string().bold());
    for entry in &entries {
        let marker = if entry.is_file() { " " } else { "d" };
        println!("{marker} {:>10}  {:>12}  {}", entry.size, entry.mtime, entry.path.cyan());
    }
    println!("{} entries", entries.len().to_string().bold());
    Ok(())
}
