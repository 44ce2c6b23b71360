use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

/// Fixed commit date so that commit ids are reproducible between runs
pub const COMMIT_DATE: &str = "2023-01-01 12:00:00 +0000";

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// A repository whose `main` holds one commit with `1.txt`, `a/2.txt` and `a/b/3.txt`
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_minigit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("b").join("3.txt"),
        "three".to_string(),
    ));

    run_minigit_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();

    minigit_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}

pub fn run_minigit_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("minigit").expect("Failed to find minigit binary");
    cmd.envs(vec![("NO_PAGER", "1")]);
    cmd.env_remove("RUST_LOG");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn minigit_commit(dir: &Path, message: &str) -> Command {
    let mut cmd = run_minigit_command(dir, &["commit", "-m", message]);
    cmd.env("MINIGIT_COMMIT_DATE", COMMIT_DATE);
    cmd
}

/// Write `content` to `path`, stage it and commit it with `message`
pub fn commit_file(dir: &Path, path: &str, content: &str, message: &str) {
    write_file(FileSpec::new(dir.join(path), content.to_string()));

    run_minigit_command(dir, &["add", path]).assert().success();
    minigit_commit(dir, message).assert().success();
}

/// Current HEAD commit id, read straight from the repository files
pub fn get_head_commit_sha(dir: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let head_path = dir.join(".minigit").join("HEAD");
    let head_content = std::fs::read_to_string(head_path)?;

    // HEAD holds either a commit id or a ref like "ref: refs/heads/main"
    if let Some(ref_path) = head_content.strip_prefix("ref: ") {
        let ref_file = dir.join(".minigit").join(ref_path.trim());
        let commit_sha = std::fs::read_to_string(ref_file)?;
        Ok(commit_sha.trim().to_string())
    } else {
        Ok(head_content.trim().to_string())
    }
}

pub fn get_branch_commit_sha(dir: &Path, branch: &str) -> Result<String, Box<dyn std::error::Error>> {
    let ref_file = dir.join(".minigit").join("refs").join("heads").join(branch);

    Ok(std::fs::read_to_string(ref_file)?.trim().to_string())
}
