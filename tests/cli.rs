use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::f64::consts::PI;
use std::path::Path;
use tempfile::TempDir;

const SAMPLE_RATE: u32 = 16_000;

/// Two seconds of low hum with two loud bursts at 0.4 s and 1.2 s.
fn write_recording(path: &Path) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for index in 0..(2 * SAMPLE_RATE) {
        let t = index as f64 / SAMPLE_RATE as f64;
        let burst = (0.4..0.7).contains(&t) || (1.2..1.45).contains(&t);
        let value = if burst {
            0.7 * (2.0 * PI * 600.0 * t).sin()
        } else {
            0.002 * (2.0 * PI * 60.0 * t).sin()
        };
        writer.write_sample((value * 32767.0) as i16)?;
    }
    writer.finalize()?;
    Ok(())
}

fn analyzer() -> Result<Command> {
    Ok(Command::cargo_bin("cough-analyzer")?)
}

#[test]
fn requires_an_input_flag() -> Result<()> {
    analyzer()?
        .assert()
        .failure()
        .stderr(predicate::str::contains("--input-file").or(predicate::str::contains("--input-dir")));
    Ok(())
}

#[test]
fn rejects_both_input_flags() -> Result<()> {
    let dir = TempDir::new()?;
    analyzer()?
        .arg("--input-file")
        .arg(dir.path().join("a.wav"))
        .arg("--input-dir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
    Ok(())
}

#[test]
fn reports_missing_input_file() -> Result<()> {
    let dir = TempDir::new()?;
    analyzer()?
        .arg("--input-file")
        .arg(dir.path().join("missing.wav"))
        .arg("--output-dir")
        .arg(dir.path().join("out"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:").and(predicate::str::contains("not found")));
    Ok(())
}

#[test]
fn rejects_out_of_range_energy_ratio() -> Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("cough.wav");
    write_recording(&input)?;
    analyzer()?
        .arg("--input-file")
        .arg(&input)
        .arg("--energy-ratio")
        .arg("1.5")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
    Ok(())
}

#[test]
fn writes_features_and_segments() -> Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("cough.wav");
    let output = dir.path().join("results");
    write_recording(&input)?;

    analyzer()?
        .arg("--input-file")
        .arg(&input)
        .arg("--output-dir")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Segments: 2"));

    let csv_text = std::fs::read_to_string(output.join("features.csv"))?;
    let mut lines = csv_text.lines();
    let header = lines.next().unwrap_or_default();
    assert!(header.starts_with("segment_id,source_file,length,rms_energy,zcr,amplitude_mean,F0,HNR,Jitter,Shimmer"));
    assert!(header.contains("relative_energy_band_5"));

    let ids: Vec<&str> = lines.map(|line| line.split(',').next().unwrap_or_default()).collect();
    assert_eq!(ids, vec!["cough_01", "cough_02"]);
    assert!(output.join("segments").join("cough_01.wav").exists());
    assert!(output.join("segments").join("cough_02.wav").exists());
    Ok(())
}

#[test]
fn scans_directories_without_writing_segments() -> Result<()> {
    let dir = TempDir::new()?;
    let inputs = dir.path().join("inputs");
    std::fs::create_dir_all(inputs.join("nested"))?;
    write_recording(&inputs.join("b.wav"))?;
    write_recording(&inputs.join("nested").join("a.wav"))?;
    let output = dir.path().join("out");

    analyzer()?
        .arg("--input-dir")
        .arg(&inputs)
        .arg("--output-dir")
        .arg(&output)
        .arg("--no-segments")
        .assert()
        .success()
        .stdout(predicate::str::contains("Files: 2"));

    let csv_text = std::fs::read_to_string(output.join("features.csv"))?;
    assert_eq!(csv_text.lines().count(), 1 + 4);
    assert!(!output.join("segments").exists());
    Ok(())
}
