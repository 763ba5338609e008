//! pipeline.rs
//! Stable public API: images → envelope, envelope → images.
//!
//! Control flow (build): transcoder → Record → serialize → pack → encrypt.
//! Extraction reverses it exactly. Everything here is synchronous and
//! single-threaded; filesystem access is limited to the helpers at the bottom
//! and to the transcoder.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::archive::{open_container, pack, split_extension, sanitize_component, unpack_members, ArchiveEntry, ArchiveMember, NamingPolicy};
use crate::config::PackConfig;
use crate::crypto::{decrypt, encrypt};
use crate::record::Record;
use crate::telemetry::{PackCounters, PackReport, SkippedInput, Stage, StageTimer};
use crate::transcoder::{dotted_extension, ImageTranscoder};
use crate::types::SealError;

/// One image to pack with its provenance labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    pub path: PathBuf,
    pub origin: String,
    pub tag: String,
}

impl ImageInput {
    pub fn new(path: impl Into<PathBuf>, origin: impl Into<String>, tag: impl Into<String>) -> Self {
        Self { path: path.into(), origin: origin.into(), tag: tag.into() }
    }
}

/// Result of `seal_images`: the on-disk artifact plus what went into it.
#[derive(Debug, Clone)]
pub struct SealOutcome {
    pub envelope: Vec<u8>,
    pub report: PackReport,
}

/// One image written by `extract_to_dir`.
#[derive(Debug, Clone)]
pub struct ExtractedImage {
    pub path: PathBuf,
    pub member: ArchiveMember,
}

/// Result of `extract_to_dir`: the files written, in archive order.
#[derive(Debug, Clone)]
pub struct ExtractOutcome {
    pub files: Vec<ExtractedImage>,
    pub report: PackReport,
}

/// Pack already-built entries and encrypt the container.
pub fn seal_entries(
    entries: &[ArchiveEntry],
    key: &[u8],
    naming: NamingPolicy,
) -> Result<Vec<u8>, SealError> {
    let container = pack(entries, naming)?;
    Ok(encrypt(&container, key)?)
}

/// Load every input through `transcoder`, pack, and encrypt.
///
/// Unreadable images are skipped with a warning and listed in the report.
/// Fails with `NoInputs` if inputs were given but none could be read.
pub fn seal_images<T: ImageTranscoder + ?Sized>(
    inputs: &[ImageInput],
    key: &[u8],
    transcoder: &T,
    config: &PackConfig,
) -> Result<SealOutcome, SealError> {
    let mut timer = StageTimer::new();
    let mut counters = PackCounters::default();
    let mut skipped = Vec::new();
    let mut entries = Vec::with_capacity(inputs.len());

    for input in inputs {
        let loaded = timer.time(Stage::Load, || transcoder.load(&input.path));
        let pixels = match loaded {
            Ok(pixels) => pixels,
            Err(err @ SealError::UnreadableImage { .. }) => {
                warn!(path = %input.path.display(), error = %err, "skipping unreadable image");
                counters.add_skipped();
                skipped.push(SkippedInput {
                    path: input.path.display().to_string(),
                    reason: err.to_string(),
                });
                continue;
            }
            Err(other) => return Err(other),
        };

        counters.add_packed(pixels.byte_len());

        let record = Record::new(
            pixels,
            input.origin.clone(),
            config.timestamp(),
            input.tag.clone(),
            dotted_extension(&input.path),
        );
        debug!(path = %input.path.display(), record = %record.summary(), "loaded image");

        let file_name = input
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| input.path.display().to_string());
        entries.push(ArchiveEntry::new(file_name, record));
    }

    if !inputs.is_empty() && entries.is_empty() {
        return Err(SealError::NoInputs { skipped: skipped.len() });
    }

    let container = timer.time(Stage::Pack, || pack(&entries, config.naming))?;
    let members: Vec<String> = open_container(&container)?
        .iter()
        .map(|m| m.name.to_owned())
        .collect();
    let envelope = timer.time(Stage::Encrypt, || encrypt(&container, key))?;

    counters.set_sizes(container.len(), envelope.len());

    info!(
        packed = counters.records_packed,
        skipped = counters.records_skipped,
        naming = %config.naming,
        envelope_bytes = envelope.len(),
        "sealed archive"
    );

    let report = PackReport::from_parts(counters, members, skipped, &timer);
    Ok(SealOutcome { envelope, report })
}

/// Decrypt an envelope and decode every member. All-or-nothing.
pub fn open_envelope(envelope: &[u8], key: &[u8]) -> Result<Vec<ArchiveMember>, SealError> {
    let container = decrypt(envelope, key)?;
    let members = unpack_members(&container)?;
    info!(members = members.len(), "opened archive");
    Ok(members)
}

/// File name an extracted member is written under:
/// member stem plus the record's original extension.
pub fn output_file_name(member: &ArchiveMember) -> String {
    let (stem, _) = split_extension(&member.name);
    sanitize_component(&format!("{}{}", stem, member.record.source_extension))
}

/// Decrypt, decode, and write each member into `out_dir` via `transcoder`.
///
/// Nothing is written unless the whole archive decodes. If a save fails, the
/// images this call already wrote are removed before the error is returned.
pub fn extract_to_dir<T: ImageTranscoder + ?Sized>(
    envelope: &[u8],
    key: &[u8],
    out_dir: &Path,
    transcoder: &T,
) -> Result<ExtractOutcome, SealError> {
    let mut timer = StageTimer::new();
    let mut counters = PackCounters::default();

    let container = timer.time(Stage::Decrypt, || decrypt(envelope, key))?;
    let members = timer.time(Stage::Unpack, || unpack_members(&container))?;
    counters.set_sizes(container.len(), envelope.len());

    // Resolve every output path before touching the filesystem.
    let mut seen = HashSet::new();
    let mut targets = Vec::with_capacity(members.len());
    for member in &members {
        let file_name = output_file_name(member);
        if file_name.is_empty() || file_name == "." || file_name == ".." {
            return Err(SealError::Validation(format!(
                "member {:?} has no usable output file name",
                member.name
            )));
        }
        if !seen.insert(file_name.clone()) {
            return Err(SealError::Validation(format!(
                "members map to the same output file {:?}",
                file_name
            )));
        }
        targets.push(out_dir.join(file_name));
    }

    fs::create_dir_all(out_dir)?;

    let mut written: Vec<&Path> = Vec::with_capacity(targets.len());
    for (member, path) in members.iter().zip(&targets) {
        counters.add_unpacked(member.record.pixels.byte_len());
        if let Err(err) = timer.time(Stage::Save, || transcoder.save(&member.record.pixels, path)) {
            remove_written(&written);
            return Err(err);
        }
        written.push(path);
        counters.add_written();
        info!(
            file = %path.display(),
            origin = %member.record.origin,
            captured_at = %member.record.captured_at,
            tag = %member.record.tag,
            shape = %member.record.pixels.shape(),
            "extracted image"
        );
    }

    let names = members.iter().map(|m| m.name.clone()).collect();
    let report = PackReport::from_parts(counters, names, Vec::new(), &timer);
    let files = targets
        .into_iter()
        .zip(members)
        .map(|(path, member)| ExtractedImage { path, member })
        .collect();

    Ok(ExtractOutcome { files, report })
}

fn remove_written(paths: &[&Path]) {
    for path in paths {
        match fs::remove_file(path) {
            Ok(()) => debug!(file = %path.display(), "removed partially extracted image"),
            Err(e) => warn!(file = %path.display(), error = %e, "could not remove partially extracted image"),
        }
    }
}

/// Read an envelope from disk.
pub fn read_envelope(path: &Path) -> Result<Vec<u8>, SealError> {
    Ok(fs::read(path)?)
}

/// Write an envelope to disk, replacing any existing file.
pub fn write_envelope(path: &Path, envelope: &[u8]) -> Result<(), SealError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, envelope)?;
    Ok(())
}
