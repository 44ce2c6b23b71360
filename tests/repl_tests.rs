mod common;

use assert_fs::TempDir;
use common::command::{COMMIT_DATE, repository_dir, run_minigit_command};
use common::file::{FileSpec, write_file};
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn repl_runs_a_whole_session(repository_dir: TempDir) {
    let dir = repository_dir.path();
    write_file(FileSpec::new(dir.join("f.txt"), "hello\n".to_string()));

    run_minigit_command(dir, &["repl"])
        .env("MINIGIT_COMMIT_DATE", COMMIT_DATE)
        .write_stdin(
            "init\n\
             add f.txt\n\
             commit -m \"first commit\"\n\
             branch feature\n\
             branch\n\
             exit\n\
             log\n",
        )
        .assert()
        .success()
        .stdout(predicate::str::starts_with("minigit> Initialized empty minigit repository"))
        .stdout(predicate::str::contains("(root-commit)"))
        .stdout(predicate::str::contains("] first commit\n"))
        .stdout(predicate::str::contains("  feature\n* main\n"))
        // nothing runs after exit
        .stdout(predicate::str::contains("Date:").not());
}

#[rstest]
fn repl_reports_errors_and_carries_on(repository_dir: TempDir) {
    let dir = repository_dir.path();

    run_minigit_command(dir, &["repl"])
        .write_stdin(
            "log\n\
             init\n\
             checkout nowhere\n\
             commit \"unterminated\n\
             frobnicate\n\
             \n\
             branch\n\
             quit\n",
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("error: not a minigit repository"))
        .stdout(predicate::str::contains("error: unknown revision 'nowhere'"))
        .stdout(predicate::str::contains("error: unterminated \" quote"))
        .stdout(predicate::str::contains("unrecognized subcommand 'frobnicate'"))
        .stdout(predicate::str::contains("* main\n"));
}

#[rstest]
fn repl_ends_at_end_of_input(repository_dir: TempDir) {
    run_minigit_command(repository_dir.path(), &["repl"])
        .write_stdin("init\n")
        .assert()
        .success()
        .stdout(predicate::str::ends_with("minigit> \n"));
}
