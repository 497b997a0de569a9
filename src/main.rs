//! Shift timeline CLI.
//!
//! Loads a snapshot and runs the timeline core against it: cascade moves,
//! legal drop slots, row labels and a text rendering of the board.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use shift_timeline::clock::{Clock, FixedClock, SystemClock};
use shift_timeline::config::Settings;
use shift_timeline::coords::snap_to_slot;
use shift_timeline::io::{export_moves_csv, import_tasks_csv, load_snapshot};
use shift_timeline::model::{Snapshot, TimelineConfig, TimelineViewport};
use shift_timeline::periods::{format_row_label, row_labels, LabelState};
use shift_timeline::render::{build_frame, render_text, DefaultPresenter};
use shift_timeline::{resolve_cascade, valid_drop_zones, MoveOutcome};

#[derive(Parser)]
#[command(name = "shift-timeline")]
#[command(about = "Inspect and reschedule a shift timeline snapshot")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Snapshot file (JSON)
    #[arg(long, short, global = true, default_value = "demos/sample_snapshot.json")]
    snapshot: PathBuf,

    /// Settings file; defaults to the user config directory
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Pin "now" instead of reading the system clock (e.g. 2024-03-04T12:00)
    #[arg(long, global = true)]
    now: Option<String>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Move a task to a new start time and print the cascade outcome.
    Move {
        /// Task id
        task: String,
        /// New start: HH:MM on the board day, or a full timestamp
        time: String,
        /// Print the row after applying an accepted move
        #[arg(long)]
        apply: bool,
        /// Write the accepted moves to a CSV file
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// List the slots a task could legally be dropped on.
    Zones {
        /// Task id
        task: String,
    },

    /// Print each row's label at a reference time.
    Labels {
        /// Reference time; defaults to now
        #[arg(long)]
        at: Option<String>,
        /// Use the collapsed label form
        #[arg(long)]
        collapsed: bool,
    },

    /// Render the board as text.
    Show {
        /// Reference time for labels; defaults to the middle of the view
        #[arg(long)]
        at: Option<String>,
        /// View start; defaults to the part of the window around now
        #[arg(long)]
        from: Option<String>,
        /// View end
        #[arg(long)]
        to: Option<String>,
        /// Bar width in characters
        #[arg(long, default_value = "72")]
        width: usize,
        #[arg(long)]
        collapsed: bool,
    },

    /// Summarise tasks imported from a CSV file.
    Import {
        /// CSV file with row, start and end columns
        csv: PathBuf,
    },
}

/// Accepts a full timestamp or `HH:MM` on `day`.
fn parse_time(s: &str, day: NaiveDate) -> Result<NaiveDateTime> {
    for fmt in &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(t);
        }
    }
    let time = NaiveTime::parse_from_str(s, "%H:%M")
        .with_context(|| format!("cannot parse time '{}'", s))?;
    Ok(day.and_time(time))
}

/// The day `HH:MM` arguments refer to: the first task's day, else today.
fn board_day(snapshot: &Snapshot, clock: &dyn Clock) -> NaiveDate {
    snapshot
        .events
        .iter()
        .map(|t| t.start_time)
        .min()
        .unwrap_or_else(|| clock.now())
        .date()
}

fn describe_label(state: &LabelState, collapsed: bool) -> String {
    match state {
        LabelState::Steady { label } => format_row_label(label, collapsed),
        LabelState::Transitioning {
            outgoing_label,
            incoming_label,
            progress,
        } => format!(
            "{} -> {} ({:.0}% through handover)",
            format_row_label(outgoing_label, collapsed),
            format_row_label(incoming_label, collapsed),
            progress * 100.0
        ),
    }
}

/// Collapse consecutive slot starts into `start-end` ranges.
fn slot_ranges(slots: &[NaiveDateTime], slot_minutes: i64) -> Vec<String> {
    let step = chrono::Duration::minutes(slot_minutes);
    let mut ranges: Vec<(NaiveDateTime, NaiveDateTime)> = Vec::new();
    for &slot in slots {
        match ranges.last_mut() {
            Some((_, last)) if *last + step == slot => *last = slot,
            _ => ranges.push((slot, slot)),
        }
    }
    ranges
        .into_iter()
        .map(|(from, to)| {
            if from == to {
                from.format("%m-%d %H:%M").to_string()
            } else {
                format!("{}-{}", from.format("%m-%d %H:%M"), to.format("%H:%M"))
            }
        })
        .collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = match &cli.settings {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };

    let mut snapshot = load_snapshot(&cli.snapshot)?;
    info!(name = %snapshot.name, tasks = snapshot.events.len(), "loaded snapshot");

    let clock: Box<dyn Clock> = match &cli.now {
        Some(now) => {
            let day = SystemClock.now().date();
            Box::new(FixedClock(parse_time(now, day)?))
        }
        None => Box::new(SystemClock),
    };
    let day = board_day(&snapshot, clock.as_ref());
    let window = snapshot.config.resolve(clock.now().date());

    match cli.command {
        Commands::Move {
            task,
            time,
            apply,
            export,
        } => {
            let moved = snapshot.draggable_task(&task)?.clone();

            let requested = parse_time(&time, day)?;
            let new_start = snap_to_slot(requested, window.start_date, window.slot_duration);
            if new_start != requested {
                info!(%requested, %new_start, "snapped drop time to slot");
            }

            let row_tasks = snapshot.row_tasks(&moved.row_id);
            let outcome = resolve_cascade(&moved.id, new_start, &row_tasks);
            println!("{}", serde_json::to_string_pretty(&outcome)?);

            match &outcome {
                MoveOutcome::Accepted { moves } => {
                    if let Some(path) = export {
                        let written = export_moves_csv(moves, &path)?;
                        info!(path = %path.display(), written, "exported moves");
                    }
                    if apply {
                        snapshot.apply_moves(moves);
                        for t in snapshot.row_tasks(&moved.row_id) {
                            println!(
                                "{:<10} {}-{}",
                                t.id,
                                t.start_time.format("%H:%M"),
                                t.end_time.format("%H:%M")
                            );
                        }
                        let overlaps = snapshot.overlapping_pairs();
                        if !overlaps.is_empty() {
                            warn!(?overlaps, "row has overlapping tasks after the move");
                        }
                    }
                }
                MoveOutcome::RejectedOverlap => println!("drop point is occupied; nothing moved"),
                MoveOutcome::RejectedBlocked => {
                    println!("cannot move: a blocked task is in the way")
                }
            }
        }

        Commands::Zones { task } => {
            let moved = snapshot.draggable_task(&task)?;
            let row_tasks = snapshot.row_tasks(&moved.row_id);
            let zones = valid_drop_zones(&moved.id, &row_tasks, &window);
            println!("{} legal slots for {}", zones.len(), moved.id);
            for range in slot_ranges(&zones, window.slot_duration) {
                println!("  {}", range);
            }
        }

        Commands::Labels { at, collapsed } => {
            let reference = match at {
                Some(at) => parse_time(&at, day)?,
                None => clock.now(),
            };
            let labels = row_labels(&snapshot.rows, reference, &snapshot.periods);
            println!("labels at {}", reference.format("%Y-%m-%d %H:%M"));
            for (row_id, state) in &labels.labels {
                println!("  {:<8} {}", row_id, describe_label(state, collapsed));
            }
        }

        Commands::Show {
            at,
            from,
            to,
            width,
            collapsed,
        } => {
            let mut viewport = TimelineViewport::new(
                window.clone(),
                settings.slot_width,
                settings.container_width,
            );
            if window.auto_scroll_to_now {
                viewport.scroll_to_time(clock.now());
            }
            let visible = viewport.visible_range();
            let view_config = TimelineConfig {
                start_date: Some(match from {
                    Some(f) => parse_time(&f, day)?,
                    None => visible.start,
                }),
                end_date: Some(match to {
                    Some(t) => parse_time(&t, day)?,
                    None => visible.end,
                }),
                ..snapshot.config.clone()
            };
            view_config.validate()?;
            let view = view_config.resolve(day);

            let reference = match at {
                Some(at) => parse_time(&at, day)?,
                None => viewport.visible_midpoint(),
            };
            let collapsed = collapsed || viewport.is_collapsed(settings.collapse_threshold);

            let frame = build_frame(&snapshot, &view, reference, clock.as_ref());
            println!(
                "{}  {} .. {}",
                snapshot.name,
                view.start_date.format("%Y-%m-%d %H:%M"),
                view.end_date.format("%Y-%m-%d %H:%M")
            );
            print!("{}", render_text(&frame, &DefaultPresenter, collapsed, width));
        }

        Commands::Import { csv } => {
            let (tasks, skipped) = import_tasks_csv(&csv)?;
            let mut imported = Snapshot::new(csv.display().to_string());
            imported.events = tasks;
            println!("imported {} tasks ({} rows skipped)", imported.events.len(), skipped);
            for (a, b) in imported.overlapping_pairs() {
                println!("  overlap: {} and {}", a, b);
            }
        }
    }

    Ok(())
}
