#![forbid(unsafe_code)]

use std::borrow::Cow;

use tracing::{debug, info};

use crate::config::PackConfig;
use crate::pak::codec::{Codec, Compressed, Compressor};
use crate::pak::error::{PakError, PakResult};
use crate::pak::exceptions::ExceptionSet;
use crate::pak::format::is_packed;
use crate::pak::io::{ensure_dir, read_all, write_all};
use crate::pak::route::RoutingPlan;
use crate::pak::stale::is_destination_newer;
use crate::pak::tasks::{walk_tasks, FileTask};

/// What happened to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Written as signature + compressed payload.
    Packed,
    /// Written as the decoded body of a packed file.
    Unpacked,
    /// Written unchanged: encoding would not shrink it, or (unpack) it was
    /// never packed.
    Copied,
    /// Written unchanged because it already carried the signature.
    AlreadyPacked,
    /// Skipped: name matched the exceptions list.
    Excluded,
    /// Skipped: destination is newer than the source.
    Stale,
}

impl Outcome {
    pub fn wrote(self) -> bool {
        !matches!(self, Outcome::Excluded | Outcome::Stale)
    }
}

/// Per-run tally. `written` counts every file that reached its destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackReport {
    pub written: usize,
    pub packed: usize,
    pub unpacked: usize,
    pub copied: usize,
    pub already_packed: usize,
    pub excluded: usize,
    pub stale: usize,
    pub skipped_dirs: usize,
}

impl PackReport {
    fn record(&mut self, outcome: Outcome) {
        if outcome.wrote() {
            self.written += 1;
        }
        match outcome {
            Outcome::Packed => self.packed += 1,
            Outcome::Unpacked => self.unpacked += 1,
            Outcome::Copied => self.copied += 1,
            Outcome::AlreadyPacked => self.already_packed += 1,
            Outcome::Excluded => self.excluded += 1,
            Outcome::Stale => self.stale += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Pack,
    Unpack,
}

/// Compress every file the plan covers, one at a time in enumeration order.
/// The first fatal error ends the run.
pub fn pack(
    plan: &RoutingPlan,
    exceptions: &ExceptionSet,
    config: &PackConfig,
    codec: &dyn Codec,
) -> PakResult<PackReport> {
    run(plan, exceptions, config, codec, Direction::Pack)
}

/// Expand every packed file the plan covers; unpacked files are copied.
pub fn unpack(
    plan: &RoutingPlan,
    exceptions: &ExceptionSet,
    config: &PackConfig,
    codec: &dyn Codec,
) -> PakResult<PackReport> {
    run(plan, exceptions, config, codec, Direction::Unpack)
}

fn run(
    plan: &RoutingPlan,
    exceptions: &ExceptionSet,
    config: &PackConfig,
    codec: &dyn Codec,
    direction: Direction,
) -> PakResult<PackReport> {
    let compressor = Compressor::new(codec);
    let mut report = PackReport::default();
    debug!(
        kind = ?plan.source_kind,
        dir = %plan.source_base_dir.display(),
        pattern = %plan.source_file_pattern,
        ?direction,
        "starting"
    );

    let stats = walk_tasks(plan, config.recursive, &mut |task: FileTask| {
        let outcome = process(&task, plan, exceptions, config, &compressor, direction)?;
        debug!(
            src = %task.source.display(),
            dst = %task.destination.display(),
            ?outcome,
            "done"
        );
        report.record(outcome);
        Ok(())
    })?;
    report.skipped_dirs = stats.skipped_dirs;

    info!(
        matched = stats.files,
        written = report.written,
        packed = report.packed,
        unpacked = report.unpacked,
        copied = report.copied + report.already_packed,
        excluded = report.excluded,
        stale = report.stale,
        "finished"
    );
    Ok(report)
}

fn process(
    task: &FileTask,
    plan: &RoutingPlan,
    exceptions: &ExceptionSet,
    config: &PackConfig,
    compressor: &Compressor<'_>,
    direction: Direction,
) -> PakResult<Outcome> {
    if exceptions.excludes(&task.source) {
        return Ok(Outcome::Excluded);
    }
    if config.test_dates && is_destination_newer(&task.source, &task.destination)? {
        info!(file = %task.source.display(), "output is newer, skipped");
        return Ok(Outcome::Stale);
    }

    let raw = read_all(&task.source)?;

    let (body, outcome): (Cow<'_, [u8]>, Outcome) = match direction {
        Direction::Pack if is_packed(&raw) => (Cow::Borrowed(&raw), Outcome::AlreadyPacked),
        Direction::Pack => match compressor.compress(&raw).map_err(|e| at(task, e))? {
            Compressed::Packed(envelope) => (Cow::Owned(envelope), Outcome::Packed),
            Compressed::NotSmaller => {
                info!(file = %task.source.display(), "does not compress, copied");
                (Cow::Borrowed(&raw), Outcome::Copied)
            }
        },
        Direction::Unpack if is_packed(&raw) => {
            let expanded = compressor.expand(&raw).map_err(|e| at(task, e))?;
            (Cow::Owned(expanded), Outcome::Unpacked)
        }
        Direction::Unpack => (Cow::Borrowed(&raw), Outcome::Copied),
    };

    if plan.destination_is_directory() {
        if let Some(parent) = task.destination.parent() {
            ensure_dir(parent)?;
        }
    }
    write_all(&task.destination, &body)?;
    Ok(outcome)
}

fn at(task: &FileTask, err: PakError) -> PakError {
    match err {
        PakError::Io(source) => PakError::io_at(&task.source, source),
        PakError::Invalid(msg) => {
            PakError::Invalid(format!("{}: {msg}", task.source.display()))
        }
        other => other,
    }
}
