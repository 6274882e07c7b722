//! Render progress reporting.
//!
//! Every stage of a map render reports what it is doing through a
//! [`ProgressReporter`]. Reporters are injected into the pipeline, so the
//! same render can log to a console, emit JSON lines for tooling, or stay
//! silent in tests.
//!
//! # Example
//!
//! ```ignore
//! use worldmap::progress::{ConsoleProgress, ProgressEvent, ProgressReporter};
//! use worldmap::raster::LayerKind;
//!
//! let reporter = ConsoleProgress::new().with_verbose(true);
//! reporter.report(ProgressEvent::LayerStarted { layer: LayerKind::Blocks });
//! reporter.report(ProgressEvent::ColumnsDone { layer: LayerKind::Blocks, done: 100, total: 4200 });
//! ```

use serde::Serialize;
use std::io::Write;
use std::sync::Mutex;

use crate::raster::{LayerKind, LayerSelection};
use crate::region::Region;

/// Events that can be reported during a render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// Render requested; reported before the world is touched
    RenderStarted {
        /// Which layers will be drawn
        layers: LayerSelection,
        /// Whether paint overrides block and wall colors
        paint: bool,
    },
    /// World file is being parsed
    WorldLoading {
        path: String,
    },
    /// World parsed
    WorldLoaded {
        width: u32,
        height: u32,
    },
    /// Render bounds computed
    RegionResolved {
        region: Region,
    },
    /// A layer rasterizer started
    LayerStarted {
        layer: LayerKind,
    },
    /// Periodic column progress inside a tile layer scan
    ColumnsDone {
        layer: LayerKind,
        done: u32,
        total: u32,
    },
    /// A layer rasterizer finished
    LayerCompleted {
        layer: LayerKind,
        duration_ms: u64,
    },
    /// Layers are being merged
    Compositing {
        layers: usize,
    },
    /// Final image written to disk
    ImageWritten {
        path: String,
    },
    /// Deep Zoom pyramid written
    PyramidWritten {
        path: String,
        levels: u32,
        tiles: usize,
    },
    /// Something looked off but rendering continues
    Warning {
        message: String,
    },
    /// A fatal error ended the run
    Error {
        message: String,
    },
    /// Whole run finished
    Done {
        duration_ms: u64,
    },
}

/// Trait for progress reporters.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress event.
    fn report(&self, event: ProgressEvent);

    /// Check if this reporter wants verbose output.
    fn is_verbose(&self) -> bool {
        false
    }
}

impl<R: ProgressReporter + ?Sized> ProgressReporter for std::sync::Arc<R> {
    fn report(&self, event: ProgressEvent) {
        (**self).report(event)
    }

    fn is_verbose(&self) -> bool {
        (**self).is_verbose()
    }
}

impl<R: ProgressReporter + ?Sized> ProgressReporter for Box<R> {
    fn report(&self, event: ProgressEvent) {
        (**self).report(event)
    }

    fn is_verbose(&self) -> bool {
        (**self).is_verbose()
    }
}

/// A progress reporter that discards all events.
#[derive(Debug, Default)]
pub struct NullProgress;

impl NullProgress {
    /// Create a new null progress reporter.
    pub fn new() -> Self {
        Self
    }
}

impl ProgressReporter for NullProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// A progress reporter that keeps every event, for tests and callers
/// that want to inspect a run afterwards.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events reported so far.
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl ProgressReporter for RecordingProgress {
    fn report(&self, event: ProgressEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    fn is_verbose(&self) -> bool {
        true
    }
}

/// Console progress reporter with optional colors.
pub struct ConsoleProgress {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
    /// Output writer (for testing)
    output: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for ConsoleProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleProgress")
            .field("use_colors", &self.use_colors)
            .field("verbose", &self.verbose)
            .finish()
    }
}

impl ConsoleProgress {
    /// Create a console reporter on stderr, colored when stderr is a terminal.
    pub fn new() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stderr),
            verbose: false,
            output: Mutex::new(Box::new(std::io::stderr())),
        }
    }

    /// Create a console progress reporter that writes to a custom output.
    pub fn with_output<W: Write + Send + 'static>(output: W) -> Self {
        Self { use_colors: false, verbose: false, output: Mutex::new(Box::new(output)) }
    }

    /// Set whether to use colors.
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Set verbose mode.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        if self.use_colors {
            format!("{}{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    fn green(&self, text: &str) -> String {
        self.color(text, "\x1b[32m")
    }

    fn yellow(&self, text: &str) -> String {
        self.color(text, "\x1b[33m")
    }

    fn red(&self, text: &str) -> String {
        self.color(text, "\x1b[31m")
    }

    fn cyan(&self, text: &str) -> String {
        self.color(text, "\x1b[36m")
    }

    fn writeln(&self, line: &str) {
        if let Ok(mut output) = self.output.lock() {
            let _ = writeln!(output, "{}", line);
        }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for ConsoleProgress {
    fn report(&self, event: ProgressEvent) {
        let tag = self.cyan("[render]");
        match event {
            ProgressEvent::RenderStarted { layers, paint } => {
                for kind in LayerKind::DRAW_ORDER {
                    self.writeln(&format!(
                        "{} Draw {} layer: {}",
                        tag,
                        kind.name(),
                        layers.contains(kind)
                    ));
                }
                self.writeln(&format!("{} Draw paints: {}", tag, paint));
            }
            ProgressEvent::WorldLoading { path } => {
                self.writeln(&format!("{} Parsing world from {}...", tag, path));
            }
            ProgressEvent::WorldLoaded { width, height } => {
                if self.verbose {
                    self.writeln(&format!("{} World is {}x{} tiles", tag, width, height));
                }
            }
            ProgressEvent::RegionResolved { region } => {
                self.writeln(&format!("{} Rendering world coordinates {}", tag, region));
            }
            ProgressEvent::LayerStarted { layer } => {
                self.writeln(&format!("{} Drawing {}...", tag, layer.name()));
            }
            ProgressEvent::ColumnsDone { layer, done, total } => {
                if self.verbose {
                    self.writeln(&format!(
                        "{} {}: {} / {} columns done",
                        tag,
                        layer.name(),
                        done,
                        total
                    ));
                }
            }
            ProgressEvent::LayerCompleted { layer, duration_ms } => {
                self.writeln(&format!(
                    "{} {} {} ({})",
                    tag,
                    self.green("ok"),
                    layer.name(),
                    format_duration(duration_ms)
                ));
            }
            ProgressEvent::Compositing { layers } => {
                self.writeln(&format!(
                    "{} Merging {} layer{}...",
                    tag,
                    layers,
                    if layers == 1 { "" } else { "s" }
                ));
            }
            ProgressEvent::ImageWritten { path } => {
                self.writeln(&format!("{} Saved image to {}", tag, path));
            }
            ProgressEvent::PyramidWritten { path, levels, tiles } => {
                self.writeln(&format!(
                    "{} Wrote Deep Zoom pyramid {} ({} levels, {} tiles)",
                    tag, path, levels, tiles
                ));
            }
            ProgressEvent::Warning { message } => {
                self.writeln(&format!("{} {}", self.yellow("[warn]"), message));
            }
            ProgressEvent::Error { message } => {
                self.writeln(&format!("{} {}", self.red("[error]"), message));
            }
            ProgressEvent::Done { duration_ms } => {
                self.writeln(&format!("{} Done in {}", self.green("[done]"), format_duration(duration_ms)));
            }
        }
    }

    fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// JSON progress reporter for machine-readable output.
pub struct JsonProgress {
    /// Output writer
    output: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for JsonProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonProgress").finish()
    }
}

impl JsonProgress {
    /// Create a new JSON progress reporter writing to stderr.
    pub fn new() -> Self {
        Self { output: Mutex::new(Box::new(std::io::stderr())) }
    }

    /// Create a JSON progress reporter that writes to a custom output.
    pub fn with_output<W: Write + Send + 'static>(output: W) -> Self {
        Self { output: Mutex::new(Box::new(output)) }
    }
}

impl Default for JsonProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for JsonProgress {
    fn report(&self, event: ProgressEvent) {
        let Ok(json) = serde_json::to_string(&event) else {
            return;
        };
        if let Ok(mut output) = self.output.lock() {
            let _ = writeln!(output, "{}", json);
        }
    }

    fn is_verbose(&self) -> bool {
        true
    }
}

/// Format a duration in milliseconds to a human-readable string.
pub(crate) fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        let minutes = ms / 60_000;
        let seconds = (ms % 60_000) / 1000;
        format!("{}m {}s", minutes, seconds)
    }
}
