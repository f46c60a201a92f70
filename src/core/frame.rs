//! Caller frame resolution
//!
//! Every record carries the function, file and line of the application code
//! that issued the log call. File and line come from
//! [`std::panic::Location::caller`]: each facade method between the caller
//! and [`resolve_caller_frame`] is `#[track_caller]`, so the location reported
//! is always the first frame outside the logger.
//!
//! The logging macros capture the function name at compile time with
//! [`function_name!`](crate::function_name). Calls made through the plain
//! methods look it up instead: the stack is walked with `backtrace` and the
//! symbol whose debug info points at the call site names the caller. Lookups
//! are cached per call site. Without debug info the name is `"unknown"`.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::panic::Location;
use std::path::Path;
use std::sync::OnceLock;

/// Function name used when the caller could not be identified
pub const UNKNOWN_FUNCTION: &str = "unknown";

const MARKER_SUFFIX: &str = "::__frame_marker";
const CLOSURE_SUFFIX: &str = "::{{closure}}";

/// Symbols of the logger's own call path; never reported as the caller
const INTERNAL_SYMBOLS: &[&str] = &[
    concat!(module_path!(), "::resolve_caller_frame"),
    concat!(module_path!(), "::cached_function"),
    concat!(module_path!(), "::lookup_function"),
    concat!(env!("CARGO_CRATE_NAME"), "::core::logger::Logger::"),
    concat!(env!("CARGO_CRATE_NAME"), "::core::logger::LoggerBuilder::"),
    concat!(env!("CARGO_CRATE_NAME"), "::global::"),
];

type CallSite = (&'static str, u32, u32);

static FUNCTION_CACHE: OnceLock<Mutex<HashMap<CallSite, Option<String>>>> = OnceLock::new();

/// Call site of a log statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerFrame {
    pub function: Cow<'static, str>,
    pub file: Cow<'static, str>,
    pub line: u32,
}

impl CallerFrame {
    pub fn new(function: &'static str, file: &'static str, line: u32) -> Self {
        Self {
            function: Cow::Borrowed(function),
            file: Cow::Borrowed(file),
            line,
        }
    }

    /// Sentinel frame: function `"unknown"`, empty file, line 0
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_FUNCTION, "", 0)
    }
}

impl Default for CallerFrame {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for CallerFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}:{})", self.function, self.file, self.line)
    }
}

/// Resolve the frame of the code that called into the logger.
///
/// `function` is the name captured at the call site, if any; otherwise it is
/// looked up from the stack. Must only be reached through `#[track_caller]`
/// functions; any untracked function in between becomes the reported
/// location.
#[track_caller]
pub fn resolve_caller_frame(function: Option<&'static str>) -> CallerFrame {
    let location = Location::caller();
    let function = match function {
        Some(name) => Cow::Borrowed(name),
        None => cached_function(location)
            .map(Cow::Owned)
            .unwrap_or(Cow::Borrowed(UNKNOWN_FUNCTION)),
    };

    CallerFrame {
        function,
        file: Cow::Borrowed(location.file()),
        line: location.line(),
    }
}

fn cached_function(location: &'static Location<'static>) -> Option<String> {
    let key = (location.file(), location.line(), location.column());
    let cache = FUNCTION_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    if let Some(known) = cache.lock().get(&key) {
        return known.clone();
    }

    let resolved = lookup_function(location);
    cache.lock().insert(key, resolved.clone());
    resolved
}

/// Name of the function containing `location`, from the current stack.
///
/// Prefers the frame whose file and line both match; falls back to the
/// innermost non-logger frame in the same file.
fn lookup_function(location: &Location<'_>) -> Option<String> {
    let file = Path::new(location.file());
    let mut exact: Option<String> = None;
    let mut same_file: Option<String> = None;

    backtrace::trace(|frame| {
        backtrace::resolve_frame(frame, |symbol| {
            if exact.is_some() {
                return;
            }
            let (Some(name), Some(path)) = (symbol.name(), symbol.filename()) else {
                return;
            };
            if !path.ends_with(file) {
                return;
            }
            let name = format!("{:#}", name);
            let path_name = name.trim_start_matches('<');
            if INTERNAL_SYMBOLS.iter().any(|internal| path_name.starts_with(internal)) {
                return;
            }
            if symbol.lineno() == Some(location.line()) {
                exact = Some(name);
            } else if same_file.is_none() {
                same_file = Some(name);
            }
        });
        exact.is_none()
    });

    let name = exact.or(same_file)?;
    let trimmed = strip_closures(&name);
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn strip_closures(mut name: &str) -> &str {
    while let Some(stripped) = name.strip_suffix(CLOSURE_SUFFIX) {
        name = stripped;
    }
    name
}

/// Strip the marker item and closure segments from a `type_name` path.
#[doc(hidden)]
pub fn trim_function_name(raw: &'static str) -> &'static str {
    let name = strip_closures(raw.strip_suffix(MARKER_SUFFIX).unwrap_or(raw));
    if name.is_empty() {
        UNKNOWN_FUNCTION
    } else {
        name
    }
}

/// Expands to the path of the enclosing function, e.g. `my_app::handlers::login`.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __frame_marker() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::core::frame::trim_function_name(__type_name_of(__frame_marker))
    }};
}
