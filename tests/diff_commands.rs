mod common;

use assert_fs::TempDir;
use common::command::{commit_file, get_head_commit_sha, repository_dir, run_minigit_command};
use rstest::rstest;

#[rstest]
fn diff_prints_one_block_per_changed_path(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir.path();
    run_minigit_command(dir, &["init"]).assert().success();
    commit_file(dir, "f.txt", "a\nb\nc\n", "c1");
    commit_file(dir, "gone.txt", "bye\n", "c2");
    let before = get_head_commit_sha(dir)?;

    std::fs::remove_file(dir.join("gone.txt"))?;
    commit_file(dir, "f.txt", "a\nB\nc\n", "c3");
    commit_file(dir, "new.txt", "hi\n", "c4");
    let after = get_head_commit_sha(dir)?;

    let output = run_minigit_command(dir, &["diff", &before, &after])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let output = String::from_utf8(output)?;

    let blocks = output
        .lines()
        .filter(|line| line.starts_with("diff --minigit "))
        .collect::<Vec<_>>();
    // gone.txt was removed from disk but never unstaged, so it is still tracked
    pretty_assertions::assert_eq!(
        blocks,
        vec![
            "diff --minigit a/f.txt b/f.txt",
            "diff --minigit a/new.txt b/new.txt",
        ]
    );
    assert!(output.contains("--- a/f.txt\n+++ b/f.txt\n a\n-b\n+B\n c\n"));
    assert!(output.contains("new file\n"));
    assert!(output.contains("--- /dev/null\n+++ b/new.txt\n+hi\n"));

    Ok(())
}

#[rstest]
fn diff_of_identical_commits_prints_nothing(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir.path();
    run_minigit_command(dir, &["init"]).assert().success();
    commit_file(dir, "f.txt", "a\n", "c1");

    run_minigit_command(dir, &["diff", "HEAD", "main"])
        .assert()
        .success()
        .stdout("");

    Ok(())
}

#[rstest]
fn diff_with_an_unknown_ref_fails(repository_dir: TempDir) {
    let dir = repository_dir.path();
    run_minigit_command(dir, &["init"]).assert().success();
    commit_file(dir, "f.txt", "a\n", "c1");

    run_minigit_command(dir, &["diff", "main", "nowhere"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("unknown revision 'nowhere'"));
}

#[rstest]
fn dropping_the_final_newline_shows_in_the_diff(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir.path();
    run_minigit_command(dir, &["init"]).assert().success();
    commit_file(dir, "f.txt", "a\nb\n", "c1");
    let before = get_head_commit_sha(dir)?;
    commit_file(dir, "f.txt", "a\nb", "c2");

    run_minigit_command(dir, &["diff", &before, "HEAD"])
        .assert()
        .success()
        .stdout(predicates::str::contains(
            "-b\n+b\n\\ No newline at end of file\n",
        ));

    Ok(())
}
