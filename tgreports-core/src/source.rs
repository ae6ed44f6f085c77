//! Call-site capture and error tracebacks.
//!
//! Locations are captured at the boundary, either implicitly through
//! `#[track_caller]` or explicitly with [`call_site!`](crate::call_site).

use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;
use std::fmt::{self, Write};
use std::panic::Location;

/// Where a report (or the error it carries) originated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub file: String,
    pub line: u32,
    /// Dotted path such as `api.users.create`; empty when unknown.
    pub path: String,
}

impl CallSite {
    /// Builds a call site, deriving the dotted path from the file name.
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        let file = file.into();
        let path = dotted_file_path(&file);
        Self { file, line, path }
    }

    /// Replaces the dotted path with one derived from a `module_path!()`.
    pub fn with_module(mut self, module_path: &str) -> Self {
        self.path = dotted_module_path(module_path);
        self
    }

    /// Appends the calling function to the dotted path. Request handlers
    /// named `handle` are identified by their module alone.
    pub fn with_function(mut self, function: &str) -> Self {
        if function.is_empty() || function == "handle" {
            return self;
        }
        if !self.path.is_empty() {
            self.path.push('.');
        }
        self.path.push_str(function);
        self
    }

    /// The location of the caller of the current `#[track_caller]` chain.
    #[track_caller]
    pub fn caller() -> Self {
        Location::caller().into()
    }
}

impl From<&Location<'_>> for CallSite {
    fn from(location: &Location<'_>) -> Self {
        CallSite::new(location.file(), location.line())
    }
}

/// `file:line`, then the dotted path on its own line when known.
impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = self.file.strip_prefix("./").unwrap_or(&self.file);
        write!(f, "{}:{}", file, self.line)?;
        if !self.path.is_empty() {
            write!(f, "\n{}", self.path)?;
        }
        Ok(())
    }
}

/// Captures the current file, line and module path as a [`CallSite`].
/// Pass the enclosing function's name to append it to the path.
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::CallSite::new(file!(), line!()).with_module(module_path!())
    };
    ($function:ident) => {
        $crate::call_site!().with_function(stringify!($function))
    };
}

fn dotted_file_path(file: &str) -> String {
    let file = file.replace('\\', "/");
    let relative = match file.rfind("src/") {
        Some(idx) => &file[idx + "src/".len()..],
        None => file.rsplit('/').next().unwrap_or_default(),
    };
    let relative = relative.strip_suffix(".rs").unwrap_or(relative);
    let mut parts: Vec<&str> = relative.split('/').filter(|p| !p.is_empty()).collect();
    while matches!(parts.last(), Some(&("mod" | "lib" | "main"))) {
        parts.pop();
    }
    parts.join(".")
}

fn dotted_module_path(module_path: &str) -> String {
    let mut segments = module_path.split("::");
    let krate = segments.next().unwrap_or_default();
    let rest: Vec<&str> = segments.collect();
    if rest.is_empty() {
        krate.to_string()
    } else {
        rest.join(".")
    }
}

/// An error attached to a report: its message chain, where it was captured,
/// and a backtrace when `RUST_BACKTRACE` enabled one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    chain: Vec<String>,
    origin: Option<CallSite>,
    backtrace: Option<String>,
}

impl Fault {
    /// Captures `err` and its `source()` chain at the caller's location.
    #[track_caller]
    pub fn capture<E: Error + ?Sized>(err: &E) -> Self {
        let mut chain = vec![err.to_string()];
        let mut source = err.source();
        while let Some(cause) = source {
            chain.push(cause.to_string());
            source = cause.source();
        }
        Self {
            chain,
            origin: Some(CallSite::caller()),
            backtrace: captured_backtrace(),
        }
    }

    /// A fault with only a message, for errors that are not `std::error::Error`.
    #[track_caller]
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            chain: vec![message.into()],
            origin: Some(CallSite::caller()),
            backtrace: captured_backtrace(),
        }
    }

    pub fn at(mut self, origin: CallSite) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Forgets the capture site, for faults that did not originate in this
    /// process (e.g. relayed from a command line).
    pub fn without_origin(mut self) -> Self {
        self.origin = None;
        self
    }

    pub fn origin(&self) -> Option<&CallSite> {
        self.origin.as_ref()
    }

    pub fn chain(&self) -> &[String] {
        &self.chain
    }

    /// The full traceback text rendered into the report.
    pub fn traceback(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, "Error: {}", self.chain[0]);
        if self.chain.len() > 1 {
            out.push_str("\n\nCaused by:");
            for (i, cause) in self.chain[1..].iter().enumerate() {
                let _ = write!(out, "\n    {i}: {cause}");
            }
        }
        if let Some(backtrace) = &self.backtrace {
            let _ = write!(out, "\n\nStack backtrace:\n{}", backtrace.trim_end());
        }
        out
    }
}

fn captured_backtrace() -> Option<String> {
    let backtrace = Backtrace::capture();
    match backtrace.status() {
        BacktraceStatus::Captured => Some(backtrace.to_string()),
        _ => None,
    }
}
