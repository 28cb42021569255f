//! In-memory filesystem and log capture shared by unit tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

use crate::error::{Error, Result};
use crate::local_files::{Entry, FileSystem, TextEncoding};

/// Mutating calls made against a `MemoryFs`, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsCall {
    EnsureDir(PathBuf),
    Write(PathBuf, TextEncoding),
    DeleteDir(PathBuf),
}

#[derive(Default)]
struct State {
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, (String, Option<TextEncoding>)>,
    calls: Vec<FsCall>,
}

pub struct MemoryFs {
    cwd: PathBuf,
    fail_writes: bool,
    state: RefCell<State>,
}

impl MemoryFs {
    pub fn new(cwd: &str) -> Self {
        let fs = Self {
            cwd: PathBuf::from(cwd),
            fail_writes: false,
            state: RefCell::new(State::default()),
        };
        fs.insert_dir(Path::new(cwd));
        fs
    }

    pub fn with_dir(self, path: &str) -> Self {
        self.insert_dir(Path::new(path));
        self
    }

    pub fn with_file(self, path: &str, content: &str) -> Self {
        let path = PathBuf::from(path);
        if let Some(parent) = path.parent() {
            self.insert_dir(parent);
        }
        self.state
            .borrow_mut()
            .files
            .insert(path, (content.to_string(), None));
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    fn insert_dir(&self, path: &Path) {
        let mut state = self.state.borrow_mut();
        for ancestor in path.ancestors() {
            if !ancestor.as_os_str().is_empty() {
                state.dirs.insert(ancestor.to_path_buf());
            }
        }
    }

    pub fn calls(&self) -> Vec<FsCall> {
        self.state.borrow().calls.clone()
    }

    pub fn created_dirs(&self) -> Vec<PathBuf> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                FsCall::EnsureDir(path) => Some(path),
                _ => None,
            })
            .collect()
    }

    pub fn written_files(&self) -> Vec<PathBuf> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                FsCall::Write(path, _) => Some(path),
                _ => None,
            })
            .collect()
    }

    pub fn has_file(&self, path: &str) -> bool {
        self.state.borrow().files.contains_key(Path::new(path))
    }

    pub fn file_content(&self, path: &str) -> Option<String> {
        self.state
            .borrow()
            .files
            .get(Path::new(path))
            .map(|(content, _)| content.clone())
    }

    pub fn file_encoding(&self, path: &str) -> Option<TextEncoding> {
        self.state
            .borrow()
            .files
            .get(Path::new(path))
            .and_then(|(_, encoding)| *encoding)
    }
}

impl FileSystem for MemoryFs {
    fn current_dir(&self) -> Result<PathBuf> {
        Ok(self.cwd.clone())
    }

    fn dir_exists(&self, path: &Path) -> bool {
        self.state.borrow().dirs.contains(path)
    }

    fn read(&self, path: &Path) -> Result<String> {
        self.state
            .borrow()
            .files
            .get(path)
            .map(|(content, _)| content.clone())
            .ok_or_else(|| {
                Error::internal_io(
                    format!("File not found: {}", path.display()),
                    Some("read file".to_string()),
                )
            })
    }

    fn write(&self, path: &Path, content: &str, encoding: TextEncoding) -> Result<()> {
        if self.fail_writes {
            return Err(Error::internal_io(
                "disk full",
                Some("write file".to_string()),
            ));
        }

        let mut state = self.state.borrow_mut();
        state
            .calls
            .push(FsCall::Write(path.to_path_buf(), encoding));
        state
            .files
            .insert(path.to_path_buf(), (content.to_string(), Some(encoding)));
        Ok(())
    }

    fn list(&self, dir: &Path) -> Result<Vec<Entry>> {
        let state = self.state.borrow();
        let dirs = state
            .dirs
            .iter()
            .filter(|p| p.parent() == Some(dir))
            .map(|p| Entry {
                path: p.clone(),
                is_dir: true,
            });
        let files = state
            .files
            .keys()
            .filter(|p| p.parent() == Some(dir))
            .map(|p| Entry {
                path: p.clone(),
                is_dir: false,
            });
        let mut entries: Vec<Entry> = dirs.chain(files).collect();
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    fn list_dirs_recursive(&self, root: &Path) -> Result<Vec<PathBuf>> {
        Ok(self
            .state
            .borrow()
            .dirs
            .iter()
            .filter(|p| p.starts_with(root))
            .cloned()
            .collect())
    }

    fn list_files_recursive(&self, root: &Path) -> Result<Vec<PathBuf>> {
        Ok(self
            .state
            .borrow()
            .files
            .keys()
            .filter(|p| p.starts_with(root))
            .cloned()
            .collect())
    }

    fn ensure_dir(&self, dir: &Path) -> Result<()> {
        self.state
            .borrow_mut()
            .calls
            .push(FsCall::EnsureDir(dir.to_path_buf()));
        self.insert_dir(dir);
        Ok(())
    }

    fn delete_dir(&self, dir: &Path) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(FsCall::DeleteDir(dir.to_path_buf()));
        state.dirs.retain(|p| !p.starts_with(dir));
        state.files.retain(|p, _| !p.starts_with(dir));
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct CapturedLogs {
    pub events: Vec<CapturedEvent>,
}

impl CapturedLogs {
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.events
            .iter()
            .filter(|e| e.level == level)
            .map(|e| e.message.clone())
            .collect()
    }
}

struct CaptureLayer {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{:?}", value);
        }
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        if let Ok(mut events) = self.events.lock() {
            events.push(CapturedEvent {
                level: *event.metadata().level(),
                message: visitor.0,
            });
        }
    }
}

/// Run `f` with a thread-local subscriber that records every event.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, CapturedLogs) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(CaptureLayer {
        events: Arc::clone(&events),
    });

    let result = tracing::subscriber::with_default(subscriber, f);
    let events = events.lock().map(|e| e.clone()).unwrap_or_default();

    (result, CapturedLogs { events })
}
