//! Subcommand handlers. Each returns `anyhow::Result` with file context.

use std::path::Path;

use anyhow::{Context, Result};
use imgseal_core::archive::{ArchiveMember, NamingPolicy};
use imgseal_core::config::PackConfig;
use imgseal_core::pipeline::{extract_to_dir, open_envelope, read_envelope, seal_images, write_envelope};
use imgseal_core::telemetry::PackReport;
use tracing::info;
use zeroize::Zeroizing;

use crate::args::image_inputs;
use crate::key::parse_key;
use crate::transcode::ImageCrateTranscoder;

pub fn pack(output: &Path, key: String, images: &[String], naming: NamingPolicy, report: bool) -> Result<()> {
    let key = parse_key(&Zeroizing::new(key))?;
    let inputs = image_inputs(images);
    let config = PackConfig::new(Some(naming), None);

    let outcome = seal_images(&inputs, key.as_bytes(), &ImageCrateTranscoder, &config)
        .context("failed to seal images")?;
    write_envelope(output, &outcome.envelope)
        .with_context(|| format!("failed to write archive {}", output.display()))?;

    info!(
        archive = %output.display(),
        members = outcome.report.members.len(),
        skipped = outcome.report.skipped.len(),
        "wrote archive"
    );
    println!(
        "sealed {} image(s) into {} ({} skipped)",
        outcome.report.members.len(),
        output.display(),
        outcome.report.skipped.len()
    );

    if report {
        print_report(&outcome.report)?;
    }
    Ok(())
}

pub fn unpack(input: &Path, key: String, output_dir: &Path, report: bool) -> Result<()> {
    let key = parse_key(&Zeroizing::new(key))?;
    let envelope = read_envelope(input).with_context(|| format!("failed to read archive {}", input.display()))?;

    let extracted = extract_to_dir(&envelope, key.as_bytes(), output_dir, &ImageCrateTranscoder)
        .with_context(|| format!("failed to open archive {}", input.display()))?;

    for file in &extracted.files {
        println!("{}", describe(&file.path.display().to_string(), &file.member));
    }
    println!(
        "extracted {} image(s) into {}",
        extracted.report.counters.images_written,
        output_dir.display()
    );

    if report {
        print_report(&extracted.report)?;
    }
    Ok(())
}

pub fn list(input: &Path, key: String) -> Result<()> {
    let key = parse_key(&Zeroizing::new(key))?;
    let envelope = read_envelope(input).with_context(|| format!("failed to read archive {}", input.display()))?;

    let members = open_envelope(&envelope, key.as_bytes())
        .with_context(|| format!("failed to open archive {}", input.display()))?;

    for member in &members {
        println!("{}", describe(&member.name, member));
    }
    Ok(())
}

/// One tab-separated metadata line, led by `label` (member name or output file).
fn describe(label: &str, member: &ArchiveMember) -> String {
    let r = &member.record;
    format!(
        "{}\torigin={}\tcaptured_at={}\ttag={}\text={}\tshape={}\tdtype={}",
        label,
        r.origin,
        r.captured_at,
        r.tag,
        r.source_extension,
        r.pixels.shape(),
        r.pixels.dtype(),
    )
}

fn print_report(report: &PackReport) -> Result<()> {
    println!("{}", report.to_json().context("failed to render report")?);
    Ok(())
}
