use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;
use zip::write::SimpleFileOptions;

fn write_zip(path: &Path, files: &[(&str, &[u8])]) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = zip::ZipWriter::new(fs::File::create(path)?);
    for (name, data) in files {
        writer.start_file(*name, SimpleFileOptions::default())?;
        writer.write_all(data)?;
    }
    writer.finish()?;
    Ok(())
}

fn game_dir() -> Result<tempfile::TempDir, Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_zip(
        &dir.path().join("pakchunk0.zip"),
        &[
            ("Game/Content/A/x.uasset", b"base"),
            ("Game/Content/UI/a.uasset", b"ui-a"),
        ],
    )?;
    write_zip(
        &dir.path().join("pakchunk1_P.zip"),
        &[("Game/Content/A/x.uasset", b"patch")],
    )?;
    Ok(dir)
}

fn strata() -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("strata")?;
    cmd.env_remove("STRATA_AES_KEY").env_remove("RUST_LOG");
    Ok(cmd)
}

#[test]
fn missing_game_dir_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    strata()?
        .args(["-e", "GAME_UE5_3", "-k", "0x00", "-p", "x.uasset", "-g"])
        .arg(dir.path().join("missing"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Game directory does not exist"));
    Ok(())
}

#[test]
fn malformed_key_fails() -> Result<(), Box<dyn std::error::Error>> {
    let game = game_dir()?;
    strata()?
        .args(["-e", "GAME_UE5_3", "-k", "0xnothex", "-p", "x.uasset", "-g"])
        .arg(game.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("AES key is not valid hex"));
    Ok(())
}

#[test]
fn content_path_required_without_dump() -> Result<(), Box<dyn std::error::Error>> {
    let game = game_dir()?;
    strata()?
        .args(["-e", "GAME_UE5_3", "-k", "00", "-g"])
        .arg(game.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Content path is required"));
    Ok(())
}

#[test]
fn extracts_duplicates_and_folders() -> Result<(), Box<dyn std::error::Error>> {
    let game = game_dir()?;
    let out = tempdir()?;

    strata()?
        .args([
            "-e", "GAME_UE5_3", "-k", "0x00", "-v", "-p", "x.uasset", "-p", "game/content/ui",
            "-g",
        ])
        .arg(game.path())
        .arg("-o")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully mounted 3 files"));

    assert_eq!(fs::read(out.path().join("pakchunk0/x.uasset"))?, b"base");
    assert_eq!(fs::read(out.path().join("pakchunk1_P/x.uasset"))?, b"patch");
    assert_eq!(fs::read(out.path().join("a.uasset"))?, b"ui-a");
    Ok(())
}

#[test]
fn key_from_environment() -> Result<(), Box<dyn std::error::Error>> {
    let game = game_dir()?;
    let out = tempdir()?;

    strata()?
        .env("STRATA_AES_KEY", "0xFF")
        .args(["-e", "GAME_UE5_3", "-p", "Game/Content/UI/a.uasset", "-g"])
        .arg(game.path())
        .arg("-o")
        .arg(out.path())
        .assert()
        .success();

    assert!(out.path().join("a.uasset").exists());
    Ok(())
}

#[test]
fn dump_only_writes_paths_json() -> Result<(), Box<dyn std::error::Error>> {
    let game = game_dir()?;
    let out = tempdir()?;

    strata()?
        .args(["-e", "GAME_UE5_3", "-k", "00", "-d", "-g"])
        .arg(game.path())
        .arg("-o")
        .arg(out.path())
        .assert()
        .success();

    let value: serde_json::Value =
        serde_json::from_slice(&fs::read(out.path().join("paths.json"))?)?;
    assert_eq!(
        value["pakchunk1_P"],
        serde_json::json!(["game\\content\\a\\x.uasset"])
    );
    assert_eq!(
        value["duplicates"][0]["archives"],
        serde_json::json!(["pakchunk0", "pakchunk1_P"])
    );
    Ok(())
}

#[test]
fn not_found_is_not_a_process_failure() -> Result<(), Box<dyn std::error::Error>> {
    let game = game_dir()?;
    let out = tempdir()?;

    strata()?
        .args(["-e", "GAME_UE5_3", "-k", "00", "-v", "-p", "Game/Content/Nope", "-g"])
        .arg(game.path())
        .arg("-o")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("could not find any file"));
    Ok(())
}

#[test]
fn not_found_is_quiet_without_verbose() -> Result<(), Box<dyn std::error::Error>> {
    let game = game_dir()?;
    let out = tempdir()?;

    strata()?
        .args(["-e", "GAME_UE5_3", "-k", "00", "-p", "Game/Content/Nope", "-g"])
        .arg(game.path())
        .arg("-o")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("could not find any file").not());
    Ok(())
}

#[test]
fn missing_query_does_not_block_the_others() -> Result<(), Box<dyn std::error::Error>> {
    let game = game_dir()?;
    let out = tempdir()?;

    strata()?
        .args(["-e", "GAME_UE5_3", "-k", "00", "-p", "Game/Content/Nope"])
        .args(["-p", "Game/Content/UI/a.uasset", "-g"])
        .arg(game.path())
        .arg("-o")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("no files were extracted").not());

    assert_eq!(fs::read(out.path().join("a.uasset"))?, b"ui-a");
    Ok(())
}

#[test]
fn run_without_extractions_still_exits_zero() -> Result<(), Box<dyn std::error::Error>> {
    let game = game_dir()?;
    let out = tempdir()?;

    strata()?
        .args(["-e", "GAME_UE5_3", "-k", "00", "-p", "Game/Content/Nope", "-g"])
        .arg(game.path())
        .arg("-o")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("no files were extracted"));
    Ok(())
}
