//! Analytics configuration management.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `BSA_*` environment variables. Every source is validated before use.
//!
//! ```toml
//! theta_scale = 0.0027397260273972603
//! vega_scale = 0.01
//! rho_scale = 0.01
//! finite_difference_step = 1e-4
//! log_level = "debug"
//!
//! [implied_vol]
//! initial_guess = 0.3
//! max_iterations = 50
//! ```

use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use crate::types::DAYS_PER_YEAR;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric setting outside its admissible range.
    #[error("Invalid value for {name}: {value}")]
    InvalidValue {
        /// Setting name
        name: &'static str,
        /// Rejected value
        value: f64,
    },

    /// Unknown log level text.
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Unreadable or unparsable configuration file.
    #[error("Configuration file error: {0}")]
    FileError(String),

    /// Unparsable environment variable.
    #[error("Environment variable error: {0}")]
    EnvError(String),
}

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Everything, including per-cell solver failures.
    Trace,
    /// Axis selection and construction details.
    Debug,
    /// Portfolio changes.
    #[default]
    Info,
    /// Range warnings.
    Warn,
    /// Errors only.
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// Multipliers applied to the raw theta, vega and rho.
///
/// The defaults report theta per calendar day and vega/rho per percentage point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rescaling {
    /// Theta multiplier.
    pub theta: f64,
    /// Vega multiplier.
    pub vega: f64,
    /// Rho multiplier.
    pub rho: f64,
}

impl Default for Rescaling {
    fn default() -> Self {
        Self {
            theta: 1.0 / DAYS_PER_YEAR,
            vega: 0.01,
            rho: 0.01,
        }
    }
}

impl Rescaling {
    /// No rescaling: raw derivatives.
    pub fn unit() -> Self {
        Self {
            theta: 1.0,
            vega: 1.0,
            rho: 1.0,
        }
    }
}

/// Implied volatility solver settings.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ImpliedVolConfig {
    /// Newton seed and least-squares starting point.
    pub initial_guess: f64,
    /// Absolute price tolerance.
    pub tolerance: f64,
    /// Iteration cap for both methods.
    pub max_iterations: usize,
    /// Vega below this is treated as degenerate.
    pub min_vega: f64,
    /// Lower edge of the least-squares volatility box.
    pub lower_bound: f64,
    /// Upper edge of the least-squares volatility box.
    pub upper_bound: f64,
}

impl Default for ImpliedVolConfig {
    fn default() -> Self {
        Self {
            initial_guess: 0.25,
            tolerance: 1e-10,
            max_iterations: 100,
            min_vega: 1e-12,
            lower_bound: 1e-6,
            upper_bound: 5.0,
        }
    }
}

/// Analytics configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Theta multiplier (default 1/365).
    pub theta_scale: f64,
    /// Vega multiplier (default 0.01).
    pub vega_scale: f64,
    /// Rho multiplier (default 0.01).
    pub rho_scale: f64,
    /// Bump size for finite-difference Greeks.
    pub finite_difference_step: f64,
    /// Log level
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Implied volatility solver settings.
    pub implied_vol: ImpliedVolConfig,
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        let scales = Rescaling::default();
        Self {
            theta_scale: scales.theta,
            vega_scale: scales.vega,
            rho_scale: scales.rho,
            finite_difference_step: 1e-4,
            log_level: LogLevel::Info,
            implied_vol: ImpliedVolConfig::default(),
        }
    }
}

const ENV_THETA_SCALE: &str = "BSA_THETA_SCALE";
const ENV_VEGA_SCALE: &str = "BSA_VEGA_SCALE";
const ENV_RHO_SCALE: &str = "BSA_RHO_SCALE";
const ENV_FD_STEP: &str = "BSA_FD_STEP";
const ENV_LOG_LEVEL: &str = "BSA_LOG_LEVEL";
const ENV_IV_INITIAL_GUESS: &str = "BSA_IV_INITIAL_GUESS";
const ENV_IV_TOLERANCE: &str = "BSA_IV_TOLERANCE";
const ENV_IV_MAX_ITERATIONS: &str = "BSA_IV_MAX_ITERATIONS";

fn parse_env<T: FromStr>(name: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::EnvError(format!("{}={} is not a valid value", name, raw)))
}

impl AnalyticsConfig {
    /// Create a new AnalyticsConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// The Greek multipliers as a [`Rescaling`].
    pub fn rescaling(&self) -> Rescaling {
        Rescaling {
            theta: self.theta_scale,
            vega: self.vega_scale,
            rho: self.rho_scale,
        }
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AnalyticsConfig = toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from `BSA_*` environment variables over the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Overrides fields from a variable lookup; unset variables leave fields untouched.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_THETA_SCALE) {
            self.theta_scale = parse_env(ENV_THETA_SCALE, &v)?;
        }
        if let Some(v) = lookup(ENV_VEGA_SCALE) {
            self.vega_scale = parse_env(ENV_VEGA_SCALE, &v)?;
        }
        if let Some(v) = lookup(ENV_RHO_SCALE) {
            self.rho_scale = parse_env(ENV_RHO_SCALE, &v)?;
        }
        if let Some(v) = lookup(ENV_FD_STEP) {
            self.finite_difference_step = parse_env(ENV_FD_STEP, &v)?;
        }
        if let Some(v) = lookup(ENV_LOG_LEVEL) {
            self.log_level = LogLevel::from_str(&v)?;
        }
        if let Some(v) = lookup(ENV_IV_INITIAL_GUESS) {
            self.implied_vol.initial_guess = parse_env(ENV_IV_INITIAL_GUESS, &v)?;
        }
        if let Some(v) = lookup(ENV_IV_TOLERANCE) {
            self.implied_vol.tolerance = parse_env(ENV_IV_TOLERANCE, &v)?;
        }
        if let Some(v) = lookup(ENV_IV_MAX_ITERATIONS) {
            self.implied_vol.max_iterations = parse_env(ENV_IV_MAX_ITERATIONS, &v)?;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("theta_scale", self.theta_scale),
            ("vega_scale", self.vega_scale),
            ("rho_scale", self.rho_scale),
            ("finite_difference_step", self.finite_difference_step),
            ("implied_vol.tolerance", self.implied_vol.tolerance),
            ("implied_vol.min_vega", self.implied_vol.min_vega),
            ("implied_vol.lower_bound", self.implied_vol.lower_bound),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidValue { name, value });
            }
        }

        let iv = &self.implied_vol;
        if !(iv.upper_bound.is_finite() && iv.upper_bound > iv.lower_bound) {
            return Err(ConfigError::InvalidValue {
                name: "implied_vol.upper_bound",
                value: iv.upper_bound,
            });
        }
        if !(iv.initial_guess >= iv.lower_bound && iv.initial_guess <= iv.upper_bound) {
            return Err(ConfigError::InvalidValue {
                name: "implied_vol.initial_guess",
                value: iv.initial_guess,
            });
        }
        if iv.max_iterations == 0 {
            return Err(ConfigError::InvalidValue {
                name: "implied_vol.max_iterations",
                value: 0.0,
            });
        }
        Ok(())
    }
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. Environment variables
/// 2. Config file
/// 3. Default values
pub fn build_config(path: Option<&Path>) -> Result<AnalyticsConfig, ConfigError> {
    let mut config = match path {
        Some(p) => AnalyticsConfig::from_file(p)?,
        None => AnalyticsConfig::default(),
    };
    config.apply_env(|name| std::env::var(name).ok())?;
    config.validate()?;
    Ok(config)
}
