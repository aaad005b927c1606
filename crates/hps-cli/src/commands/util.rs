use anyhow::{Context, Result};
use hps_core::{Dimension, SystemDesign};
use rayon::ThreadPoolBuilder;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tabwriter::TabWriter;

pub fn configure_threads(threads: &str) {
    let count = if threads.eq_ignore_ascii_case("auto") {
        num_cpus::get()
    } else {
        threads.parse().unwrap_or_else(|_| num_cpus::get())
    };
    let _ = ThreadPoolBuilder::new().num_threads(count).build_global();
}

/// Print `rows` as aligned columns under `header`.
pub fn print_table(header: &str, rows: &[String]) -> Result<()> {
    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "{header}")?;
    for row in rows {
        writeln!(writer, "{row}")?;
    }
    writer.flush()?;
    Ok(())
}

pub fn design_rows(design: &SystemDesign) -> Vec<String> {
    let sizes = [
        design.pv.value(),
        design.battery.value(),
        design.biogas.value(),
        design.converter.value(),
    ];
    Dimension::ALL
        .iter()
        .zip(sizes)
        .map(|(dim, size)| format!("{}\t{:.0}\t{}", dim.label(), size, dim.unit()))
        .collect()
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serializing output")?;
    println!("{json}");
    Ok(())
}

pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serializing output")?;
    let mut file =
        File::create(path).with_context(|| format!("creating output file {}", path.display()))?;
    file.write_all(json.as_bytes()).context("writing output")?;
    Ok(())
}
