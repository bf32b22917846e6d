use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::{Cell, CellAlignment, Table};
use mpp_cfb::CompoundFile;
use mpp_reader::{ReaderOptions, SUPPORTED_FORMATS};
use tracing::{info, warn};

use mpp_cli::inspect::{exit_code, read_files, to_json};

use crate::cli::{InspectArgs, StreamsArgs};
use crate::summary::{
    apply_table_style, print_diagnostics, print_summary, print_tasks, print_views,
};

/// Read every file and print what was asked for. Returns the exit status.
pub fn run_inspect(args: &InspectArgs) -> Result<i32> {
    let mut options = ReaderOptions::new();
    if args.no_views {
        options = options.without_presentation_data();
    }

    let start = Instant::now();
    let reads = read_files(&args.files, &options);
    info!(
        files = reads.len(),
        failed = reads.iter().filter(|r| r.result.is_err()).count(),
        duration_ms = start.elapsed().as_millis(),
        "inspect complete"
    );

    if args.json {
        println!("{}", to_json(&reads)?);
        return Ok(exit_code(&reads, args.strict));
    }

    for (position, read) in reads.iter().enumerate() {
        if position > 0 {
            println!();
        }
        match &read.result {
            Ok(project) => {
                print_summary(&read.path, project);
                if args.tasks {
                    print_tasks(project);
                }
                if args.views {
                    print_views(project);
                }
                if args.diagnostics || args.strict {
                    print_diagnostics(project);
                }
            }
            Err(error) => {
                warn!(path = %read.path.display(), "read failed");
                eprintln!("error: {error:#}");
            }
        }
    }
    Ok(exit_code(&reads, args.strict))
}

pub fn run_streams(args: &StreamsArgs) -> Result<()> {
    let file = CompoundFile::open(&args.file)
        .with_context(|| format!("open {}", args.file.display()))?;
    println!(
        "{}: version {}, {} byte sectors",
        args.file.display(),
        file.major_version(),
        file.sector_size()
    );
    let mut table = Table::new();
    table.set_header(vec!["Stream", "Bytes", "Sectors", "Storage"]);
    apply_table_style(&mut table);
    for stream in file.streams() {
        table.add_row(vec![
            Cell::new(stream.path().escape_debug()),
            Cell::new(stream.len()),
            Cell::new(stream.sectors().len()),
            Cell::new(if stream.in_mini_stream() { "mini" } else { "regular" }),
        ]);
    }
    for index in [1, 2] {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    println!("{table}");
    Ok(())
}

pub fn run_formats() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Generation", "Format strings"]);
    apply_table_style(&mut table);
    for entry in SUPPORTED_FORMATS {
        table.add_row(vec![
            entry.generation.to_string(),
            entry.formats.join(", "),
        ]);
    }
    println!("{table}");
    Ok(())
}
