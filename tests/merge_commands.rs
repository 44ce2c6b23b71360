mod common;

use assert_fs::TempDir;
use common::command::{
    commit_file, get_branch_commit_sha, get_head_commit_sha, minigit_commit, repository_dir,
    run_minigit_command,
};
use common::file::{FileSpec, read_file, write_file};
use predicates::prelude::predicate;
use rstest::{fixture, rstest};

/// `main` and `feature` fork from a commit holding `f.txt = "hello\n"`
#[fixture]
fn forked_repository_dir(repository_dir: TempDir) -> TempDir {
    let dir = repository_dir.path();
    run_minigit_command(dir, &["init"]).assert().success();
    commit_file(dir, "f.txt", "hello\n", "c1");
    run_minigit_command(dir, &["branch", "feature"])
        .assert()
        .success();

    repository_dir
}

#[rstest]
fn clean_merge_creates_a_merge_commit(
    forked_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = forked_repository_dir.path();
    commit_file(dir, "f.txt", "hello world\n", "ours");
    run_minigit_command(dir, &["checkout", "feature"])
        .assert()
        .success();
    commit_file(dir, "g.txt", "new\n", "add g");
    run_minigit_command(dir, &["checkout", "main"])
        .assert()
        .success();
    let ours = get_head_commit_sha(dir)?;
    let theirs = get_branch_commit_sha(dir, "feature")?;

    run_minigit_command(dir, &["merge", "feature"])
        .assert()
        .success()
        .stdout(predicate::str::contains("] Merge feature into main"));

    assert_ne!(get_head_commit_sha(dir)?, ours);
    assert_eq!(read_file(&dir.join("f.txt")), "hello world\n");
    assert_eq!(read_file(&dir.join("g.txt")), "new\n");

    run_minigit_command(dir, &["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Merge: {} {}",
            &ours[..7],
            &theirs[..7]
        )));

    run_minigit_command(dir, &["merge", "feature"])
        .assert()
        .success()
        .stdout("Already up to date.\n");

    Ok(())
}

#[rstest]
fn conflicting_merge_is_resolved_with_continue(
    forked_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = forked_repository_dir.path();
    commit_file(dir, "f.txt", "hello world\n", "ours");
    run_minigit_command(dir, &["checkout", "feature"])
        .assert()
        .success();
    commit_file(dir, "f.txt", "hello there\n", "theirs");
    run_minigit_command(dir, &["checkout", "main"])
        .assert()
        .success();
    let ours = get_head_commit_sha(dir)?;

    run_minigit_command(dir, &["merge", "feature"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "CONFLICT (content): Merge conflict in f.txt",
        ));

    assert_eq!(
        read_file(&dir.join("f.txt")),
        "<<<<<<< main\nhello world\n=======\nhello there\n>>>>>>> feature\n"
    );
    assert_eq!(get_head_commit_sha(dir)?, ours);

    run_minigit_command(dir, &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("conflict:  f.txt"));
    run_minigit_command(dir, &["merge", "--continue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unresolved conflicts in: f.txt"));
    run_minigit_command(dir, &["merge", "feature"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("a merge is in progress"));

    write_file(FileSpec::new(dir.join("f.txt"), "hello everyone\n".to_string()));
    run_minigit_command(dir, &["add", "f.txt"])
        .assert()
        .success();
    run_minigit_command(dir, &["merge", "--continue"])
        .assert()
        .success()
        .stdout(predicate::str::contains("] Merge feature into main"));

    assert_ne!(get_head_commit_sha(dir)?, ours);
    assert!(!dir.join(".minigit").join("MERGE_STATE").exists());

    Ok(())
}

#[rstest]
fn conflicting_merge_can_be_aborted(
    forked_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = forked_repository_dir.path();
    commit_file(dir, "f.txt", "hello world\n", "ours");
    run_minigit_command(dir, &["checkout", "feature"])
        .assert()
        .success();
    commit_file(dir, "f.txt", "hello there\n", "theirs");
    run_minigit_command(dir, &["checkout", "main"])
        .assert()
        .success();
    let ours = get_head_commit_sha(dir)?;

    run_minigit_command(dir, &["merge", "feature"])
        .assert()
        .success();
    run_minigit_command(dir, &["checkout", "feature"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("a merge is in progress"));

    run_minigit_command(dir, &["merge", "--abort"])
        .assert()
        .success()
        .stdout(predicate::str::contains("aborted"));

    assert_eq!(read_file(&dir.join("f.txt")), "hello world\n");
    assert_eq!(get_head_commit_sha(dir)?, ours);
    run_minigit_command(dir, &["merge", "--abort"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("there is no merge in progress"));

    Ok(())
}

#[rstest]
fn commit_during_a_merge_completes_it(
    forked_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = forked_repository_dir.path();
    commit_file(dir, "f.txt", "hello world\n", "ours");
    run_minigit_command(dir, &["checkout", "feature"])
        .assert()
        .success();
    commit_file(dir, "f.txt", "hello there\n", "theirs");
    run_minigit_command(dir, &["checkout", "main"])
        .assert()
        .success();
    run_minigit_command(dir, &["merge", "feature"])
        .assert()
        .success();

    write_file(FileSpec::new(dir.join("f.txt"), "resolved\n".to_string()));
    run_minigit_command(dir, &["add", "f.txt"])
        .assert()
        .success();
    minigit_commit(dir, "resolve f.txt")
        .assert()
        .success()
        .stdout(predicate::str::contains("] resolve f.txt"));

    run_minigit_command(dir, &["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Merge: "));

    Ok(())
}

#[rstest]
fn merging_an_unknown_ref_fails(forked_repository_dir: TempDir) {
    run_minigit_command(forked_repository_dir.path(), &["merge", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown revision 'nowhere'"));
}
