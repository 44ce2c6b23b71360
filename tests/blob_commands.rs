mod common;

use assert_fs::TempDir;
use common::command::{repository_dir, run_minigit_command};
use common::file::write_generated_files;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn stored_blobs_print_back_by_id_and_prefix(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir.path();
    run_minigit_command(dir, &["init"]).assert().success();

    for file in write_generated_files(dir, 3) {
        let file_name = file
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .expect("generated file name");

        let output = run_minigit_command(dir, &["hash-object", "-w", file_name])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let oid = String::from_utf8(output)?.trim().to_string();

        run_minigit_command(dir, &["cat-file", &oid])
            .assert()
            .success()
            .stdout(file.content.clone());
        run_minigit_command(dir, &["cat-file", &oid[..10]])
            .assert()
            .success()
            .stdout(file.content);
    }

    Ok(())
}

#[rstest]
fn unknown_blobs_fail(repository_dir: TempDir) {
    let dir = repository_dir.path();
    run_minigit_command(dir, &["init"]).assert().success();

    run_minigit_command(dir, &["cat-file", &"0".repeat(40)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("blob"))
        .stderr(predicate::str::contains("not found"));
}
