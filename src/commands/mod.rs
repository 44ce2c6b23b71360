//! Command implementations
//!
//! Commands are `impl Repository` blocks organized into two categories:
//!
//! - `plumbing`: Low-level commands for direct object access (cat-file, hash-object)
//! - `porcelain`: User-facing commands for version control workflows (add, commit, merge, etc.)
//!
//! Every command returns a structured result to its caller and prints a human-readable
//! confirmation to the repository writer. [`Command`] is the clap definition shared by the
//! command line and the interactive loop in `repl`.

use crate::areas::repository::Repository;
use crate::errors::{RepositoryError, Result};
use clap::Subcommand;

pub mod plumbing;
pub mod porcelain;
pub mod repl;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command creates the .minigit directory with an empty 'main' branch."
    )]
    Init,
    #[command(
        name = "add",
        about = "Stage files for the next commit",
        long_about = "This command stores the content of the given files and records them in the \
        staging area. Directories are expanded to every file beneath them."
    )]
    Add {
        #[arg(required = true, help = "Files or directories, relative to the repository root")]
        paths: Vec<String>,
    },
    #[command(
        name = "commit",
        about = "Record the staged files as a new commit",
        long_about = "This command lays the staged files over the current commit, records the \
        result and advances the current branch. During a merge it completes the merge."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: Option<String>,
        #[arg(
            required_unless_present = "message",
            conflicts_with = "message",
            help = "The commit message, as plain words"
        )]
        words: Vec<String>,
        #[arg(long, help = "Allow committing on top of a detached HEAD")]
        allow_detached: bool,
    },
    #[command(
        name = "log",
        about = "Show the first-parent history of HEAD"
    )]
    Log,
    #[command(
        name = "branch",
        about = "Create a branch at HEAD, or list branches",
        long_about = "With a name, this command binds a new branch to the current commit. \
        Without one, it lists every branch and marks the current one with '*'."
    )]
    Branch {
        #[arg(index = 1, help = "The branch to create")]
        name: Option<String>,
    },
    #[command(
        name = "checkout",
        about = "Switch to a branch or commit",
        long_about = "This command rewrites the tracked files to match the target commit. \
        Checking out a branch attaches HEAD to it; anything else detaches HEAD."
    )]
    Checkout {
        #[arg(index = 1, help = "A branch, HEAD, a commit id or an id prefix")]
        target: String,
    },
    #[command(
        name = "merge",
        about = "Merge a branch or commit into the current branch",
        long_about = "This command merges the target into the current branch. Conflicting files \
        receive conflict markers; stage the resolved files and run 'merge --continue', or give \
        up with 'merge --abort'."
    )]
    Merge {
        #[arg(
            index = 1,
            required_unless_present_any = ["continue_merge", "abort"],
            help = "The branch or commit to merge"
        )]
        target: Option<String>,
        #[arg(long = "continue", conflicts_with_all = ["target", "abort"], help = "Complete a conflicted merge")]
        continue_merge: bool,
        #[arg(long, conflicts_with = "target", help = "Abandon a conflicted merge")]
        abort: bool,
    },
    #[command(
        name = "diff",
        about = "Show line changes between two commits"
    )]
    Diff {
        #[arg(index = 1)]
        old: String,
        #[arg(index = 2)]
        new: String,
    },
    #[command(
        name = "status",
        about = "Show HEAD, staged files and pending conflicts"
    )]
    Status,
    #[command(
        name = "cat-file",
        about = "Print the content of a blob",
        long_about = "This command prints the content of a stored blob, given its id or an \
        unambiguous id prefix."
    )]
    CatFile {
        #[arg(index = 1, help = "The blob id")]
        oid: String,
    },
    #[command(
        name = "hash-object",
        about = "Compute the blob id of a file and optionally store it"
    )]
    HashObject {
        #[arg(short, long, help = "Write the blob to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: String,
    },
}

impl Command {
    /// Commands whose output can be long enough to be worth paging
    pub fn is_pageable(&self) -> bool {
        matches!(self, Command::Log | Command::Diff { .. })
    }
}

impl Repository {
    /// Run a parsed command against this repository
    ///
    /// Every command except `init` requires an initialized repository.
    pub fn execute(&self, command: &Command) -> Result<()> {
        if !matches!(command, Command::Init) && !self.is_initialized() {
            return Err(RepositoryError::NotARepository(self.path().to_path_buf()));
        }

        tracing::debug!(?command, "executing command");

        match command {
            Command::Init => self.init(),
            Command::Add { paths } => self.add(paths).map(|_| ()),
            Command::Commit {
                message,
                words,
                allow_detached,
            } => {
                let message = message.clone().unwrap_or_else(|| words.join(" "));
                self.commit(&message, *allow_detached).map(|_| ())
            }
            Command::Log => self.log().map(|_| ()),
            Command::Branch { name: Some(name) } => self.create_branch(name).map(|_| ()),
            Command::Branch { name: None } => self.list_branches().map(|_| ()),
            Command::Checkout { target } => self.checkout(target).map(|_| ()),
            Command::Merge {
                continue_merge: true,
                ..
            } => self.complete_merge(None).map(|_| ()),
            Command::Merge { abort: true, .. } => self.abort_merge(),
            Command::Merge { target, .. } => {
                let target = target
                    .as_deref()
                    .ok_or_else(|| RepositoryError::UnknownRef(String::new()))?;
                self.merge(target).map(|_| ())
            }
            Command::Diff { old, new } => self.diff(old, new).map(|_| ()),
            Command::Status => self.status(),
            Command::CatFile { oid } => self.cat_file(oid).map(|_| ()),
            Command::HashObject { write, file } => self.hash_object(file, *write).map(|_| ()),
        }
    }
}
