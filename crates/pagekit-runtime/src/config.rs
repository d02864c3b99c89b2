#![forbid(unsafe_code)]

//! Site configuration.
//!
//! [`SiteConfig`] collects every tunable the page behaviours use: breakpoints,
//! throttle intervals, notification timings, simulated submission delays and
//! validation defaults. `Default` reproduces the stock site.
//!
//! With the `config-file` feature (on by default) the config can be read from
//! TOML; missing keys fall back to the defaults.
//!
//! ```toml
//! nav_breakpoint = 992.0
//! notify_visible_ms = 8000
//! confirmation_href = "/paldies.html"
//! ```

use std::fmt;
use std::time::Duration;

#[cfg(feature = "config-file")]
use std::path::Path;

/// Errors from loading or validating a [`SiteConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    Io(std::io::Error),
    /// The TOML text did not parse into a config.
    Parse(String),
    /// A value is out of its allowed range.
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "config read failed: {err}"),
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
            Self::Invalid(what) => write!(f, "invalid config: {what}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Tunables for the page behaviours.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-file", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "config-file", serde(default, deny_unknown_fields))]
pub struct SiteConfig {
    /// Viewport width at which an open mobile nav closes itself.
    pub nav_breakpoint: f64,
    pub resize_throttle_ms: u64,
    pub scroll_throttle_ms: u64,
    /// Extra offset added to the header height by scroll-spy.
    pub scroll_spy_margin: f64,
    /// Header height used when `.l-header` is missing or unmeasured.
    pub default_header_height: f64,
    /// Scroll offset past which the scroll-to-top button shows.
    pub scroll_top_threshold: f64,
    pub notify_visible_ms: u64,
    pub notify_fade_ms: u64,
    pub submit_latency_ms: u64,
    pub redirect_delay_ms: u64,
    /// Destination after a successful submission.
    pub confirmation_href: String,
    pub year_min: i64,
    pub year_max: i64,
    /// Select text that counts as "nothing chosen" for the insurance type.
    pub insurance_placeholder: String,
    /// Maximum timer tasks run by a single advance.
    pub timer_step_limit: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            nav_breakpoint: 1024.0,
            resize_throttle_ms: 200,
            scroll_throttle_ms: 100,
            scroll_spy_margin: 50.0,
            default_header_height: 80.0,
            scroll_top_threshold: 300.0,
            notify_visible_ms: 5000,
            notify_fade_ms: 150,
            submit_latency_ms: 1000,
            redirect_delay_ms: 1500,
            confirmation_href: "thank_you.html".to_string(),
            year_min: 1980,
            year_max: 2025,
            insurance_placeholder: "Select insurance type".to_string(),
            timer_step_limit: 10_000,
        }
    }
}

impl SiteConfig {
    #[must_use]
    pub const fn resize_throttle(&self) -> Duration {
        Duration::from_millis(self.resize_throttle_ms)
    }

    #[must_use]
    pub const fn scroll_throttle(&self) -> Duration {
        Duration::from_millis(self.scroll_throttle_ms)
    }

    #[must_use]
    pub const fn notify_visible(&self) -> Duration {
        Duration::from_millis(self.notify_visible_ms)
    }

    #[must_use]
    pub const fn notify_fade(&self) -> Duration {
        Duration::from_millis(self.notify_fade_ms)
    }

    #[must_use]
    pub const fn submit_latency(&self) -> Duration {
        Duration::from_millis(self.submit_latency_ms)
    }

    #[must_use]
    pub const fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.year_min > self.year_max {
            return Err(ConfigError::Invalid("year_min exceeds year_max"));
        }
        if self.timer_step_limit == 0 {
            return Err(ConfigError::Invalid("timer_step_limit must be at least 1"));
        }
        if !(self.nav_breakpoint.is_finite() && self.nav_breakpoint >= 0.0) {
            return Err(ConfigError::Invalid("nav_breakpoint must be a non-negative number"));
        }
        if !(self.default_header_height.is_finite() && self.default_header_height >= 0.0) {
            return Err(ConfigError::Invalid(
                "default_header_height must be a non-negative number",
            ));
        }
        if self.confirmation_href.trim().is_empty() {
            return Err(ConfigError::Invalid("confirmation_href is empty"));
        }
        Ok(())
    }

    /// Parse and validate TOML text.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed TOML or unknown keys,
    /// [`ConfigError::Invalid`] for out-of-range values.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] when the file cannot be read, otherwise as
    /// [`SiteConfig::from_toml_str`].
    #[cfg(feature = "config-file")]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "site config loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_site() {
        let config = SiteConfig::default();
        assert_eq!(config.notify_visible(), Duration::from_millis(5000));
        assert_eq!(config.notify_fade(), Duration::from_millis(150));
        assert_eq!(config.confirmation_href, "thank_you.html");
        assert_eq!((config.year_min, config.year_max), (1980, 2025));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_inverted_year_bounds() {
        let config = SiteConfig {
            year_min: 2030,
            ..SiteConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn toml_overrides_merge_with_defaults() {
        let config = SiteConfig::from_toml_str(
            "nav_breakpoint = 992.0\nconfirmation_href = \"/paldies.html\"\n",
        )
        .unwrap();
        assert_eq!(config.nav_breakpoint, 992.0);
        assert_eq!(config.confirmation_href, "/paldies.html");
        assert_eq!(config.scroll_throttle_ms, 100);
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn toml_unknown_key_is_a_parse_error() {
        let err = SiteConfig::from_toml_str("nav_brakepoint = 1.0").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "{err}");
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn load_reads_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timer_step_limit = 64").unwrap();
        let config = SiteConfig::load(file.path()).unwrap();
        assert_eq!(config.timer_step_limit, 64);

        let missing = SiteConfig::load(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}
