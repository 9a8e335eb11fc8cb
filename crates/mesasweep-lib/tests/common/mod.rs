//! Common test utilities for sweep integration tests.
//!
//! Provides an in-process stand-in for the external simulator that records
//! every invocation and writes the expected model file unless told to fail.
//! Like a real child process started in `invocation.work_dir`, it resolves
//! every path it is given against that directory.

use std::cell::RefCell;
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use mesasweep_lib::{Invocation, Result, RunStats, Simulator, StageKind};

/// Simulator double that "produces" models by writing a small text file.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeSimulator {
    calls: RefCell<Vec<Invocation>>,
    unseen_dirs: RefCell<Vec<PathBuf>>,
    failing: HashSet<StageKind>,
}

#[allow(dead_code)]
impl FakeSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every invocation of `stage` finish without writing its model.
    pub fn failing(mut self, stage: StageKind) -> Self {
        self.failing.insert(stage);
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self, stage: StageKind) -> usize {
        self.calls.borrow().iter().filter(|c| c.stage == stage).count()
    }

    /// Run directories named in an inlist that did not exist from the
    /// simulator's working directory.
    pub fn unseen_dirs(&self) -> Vec<PathBuf> {
        self.unseen_dirs.borrow().clone()
    }
}

/// Value of a quoted string entry (`key = 'value'`) in rendered inlist text.
fn namelist_string<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    text.lines().find_map(|line| {
        line.trim()
            .strip_prefix(key)?
            .trim_start()
            .strip_prefix("= '")?
            .strip_suffix('\'')
    })
}

impl Simulator for FakeSimulator {
    fn run(&self, invocation: &Invocation) -> Result<RunStats> {
        self.calls.borrow_mut().push(invocation.clone());
        let cwd = &invocation.work_dir;

        let inlist = fs::read_to_string(cwd.join(&invocation.inlist))?;
        for key in ["log_directory", "photo_directory"] {
            if let Some(dir) = namelist_string(&inlist, key) {
                let resolved = cwd.join(dir);
                if !resolved.is_dir() {
                    self.unseen_dirs.borrow_mut().push(resolved);
                }
            }
        }

        let exit_code = if self.failing.contains(&invocation.stage) {
            1
        } else {
            fs::write(
                cwd.join(&invocation.expected_output),
                format!("model from {} via {}\n", invocation.stage, invocation.inlist.display()),
            )?;
            0
        };
        Ok(RunStats {
            elapsed: Duration::from_millis(1),
            exit_code: Some(exit_code),
        })
    }
}

/// Relative path reaching the absolute `target` from the current directory.
#[allow(dead_code)]
pub fn relative_to_cwd(target: &Path) -> PathBuf {
    let cwd = env::current_dir().expect("current dir");
    let mut relative = PathBuf::new();
    for _ in cwd.components().skip(1) {
        relative.push("..");
    }
    relative.push(target.strip_prefix("/").expect("absolute target"));
    relative
}
