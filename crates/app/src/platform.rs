//! Terminal capability detection
//!
//! Frames are drawn as a single status line. Color output follows the
//! `NO_COLOR` convention and only uses 24-bit escapes when `COLORTERM`
//! advertises them.

use std::env;

/// How much color the terminal can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSupport {
    /// 24-bit escapes
    TrueColor,
    /// Plain text, colors shown as hex codes
    Plain,
}

impl ColorSupport {
    /// Detect from the process environment
    pub fn detect() -> Self {
        Self::detect_with(|key| env::var(key).ok())
    }

    /// Detect using an arbitrary variable lookup
    pub fn detect_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if lookup("NO_COLOR").is_some_and(|v| !v.is_empty()) {
            return ColorSupport::Plain;
        }

        match lookup("COLORTERM").as_deref() {
            Some("truecolor") | Some("24bit") => ColorSupport::TrueColor,
            _ => ColorSupport::Plain,
        }
    }

    pub fn is_truecolor(&self) -> bool {
        matches!(self, ColorSupport::TrueColor)
    }
}

impl std::fmt::Display for ColorSupport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorSupport::TrueColor => write!(f, "truecolor"),
            ColorSupport::Plain => write!(f, "plain"),
        }
    }
}

/// Log terminal information at startup
pub fn log_platform_info(support: ColorSupport) {
    tracing::debug!(color = %support, "Terminal color support detected");

    if let Ok(term) = env::var("TERM") {
        tracing::debug!(term = %term, "Terminal type");
    }
}
