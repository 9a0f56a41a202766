//! Recording fakes for the fetch/unpack/launch seams

use crate::error::{Stage0Error, Stage0Result};
use crate::fetch::Fetcher;
use crate::process::{Invocation, Launcher};
use crate::unpack::Unpacker;
use std::cell::RefCell;
use std::env::consts::EXE_SUFFIX;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Something a fake was asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Fetch { url: String, dest: PathBuf },
    Unpack { archive: PathBuf, filter: Option<String> },
    Launch(Invocation),
}

/// Event log shared between fakes, so ordering across them can be asserted
#[derive(Debug, Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<Event>>>);

impl EventLog {
    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn fetches(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Fetch { url, .. } => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn unpack_filters(&self) -> Vec<Option<String>> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Unpack { filter, .. } => Some(filter),
                _ => None,
            })
            .collect()
    }

    pub fn launches(&self) -> Vec<Invocation> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Launch(inv) => Some(inv),
                _ => None,
            })
            .collect()
    }
}

/// Writes a placeholder archive instead of downloading
pub struct FakeFetcher {
    pub log: EventLog,
    pub fail: bool,
}

impl FakeFetcher {
    pub fn new(log: &EventLog) -> Self {
        Self {
            log: log.clone(),
            fail: false,
        }
    }
}

impl Fetcher for FakeFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Stage0Result<()> {
        self.log.push(Event::Fetch {
            url: url.to_string(),
            dest: dest.to_path_buf(),
        });
        if self.fail {
            return Err(Stage0Error::transfer(url, "connection refused"));
        }
        fs::write(dest, url).map_err(|e| Stage0Error::io("writing fake archive", e))
    }
}

/// Creates the executable a real archive would provide for the filter
pub struct FakeUnpacker {
    pub log: EventLog,
    pub fail: bool,
}

impl FakeUnpacker {
    pub fn new(log: &EventLog) -> Self {
        Self {
            log: log.clone(),
            fail: false,
        }
    }
}

impl Unpacker for FakeUnpacker {
    fn unpack(&self, archive: &Path, dst: &Path, filter: Option<&str>) -> Stage0Result<()> {
        self.log.push(Event::Unpack {
            archive: archive.to_path_buf(),
            filter: filter.map(str::to_string),
        });
        if self.fail {
            return Err(Stage0Error::extraction(archive, "unexpected end of file"));
        }

        let fail = |e| Stage0Error::io("writing fake install", e);
        if let Some(tool @ ("rustc" | "cargo")) = filter {
            fs::create_dir_all(dst.join("bin")).map_err(fail)?;
            fs::write(dst.join("bin").join(format!("{}{}", tool, EXE_SUFFIX)), tool)
                .map_err(fail)?;
        }
        Ok(())
    }
}

/// Records invocations and answers with a fixed exit code
pub struct FakeLauncher {
    pub log: EventLog,
    pub code: i32,
}

impl FakeLauncher {
    pub fn new(log: &EventLog, code: i32) -> Self {
        Self {
            log: log.clone(),
            code,
        }
    }
}

impl Launcher for FakeLauncher {
    fn status(&self, invocation: &Invocation) -> Stage0Result<i32> {
        self.log.push(Event::Launch(invocation.clone()));
        Ok(self.code)
    }
}
