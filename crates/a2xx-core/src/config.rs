//! Configuration system for the a2xx assembler

use crate::error::{AsmError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub limits: Limits,
    pub debug: DebugConfig,
}

/// Registry capacities used while a shader is being built.
///
/// None of these are hardware constants except `instrs_per_exec`, which is
/// bounded by the 12-bit sequence field (two bits per instruction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub attributes: usize,
    pub consts: usize,
    pub samplers: usize,
    pub uniforms: usize,
    pub varyings: usize,
    pub cfs: usize,
    pub instrs_per_exec: usize,
    pub regs_per_instr: usize,
}

/// Debug settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    pub log_level: LogLevel,
    /// Log every emitted word triple at trace level
    pub trace_encoding: bool,
}

/// Logging level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`
    pub fn as_filter(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            attributes: 16,
            consts: 32,
            samplers: 16,
            uniforms: 32,
            varyings: 16,
            cfs: 64,
            instrs_per_exec: 6,
            regs_per_instr: 5,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            trace_encoding: false,
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// A missing file yields the defaults. Nothing is written; call
    /// [`Config::save`] to create the file.
    pub fn load() -> Result<Self> {
        Self::load_or_default(&Self::config_path())
    }

    /// Load configuration from `path`, or the defaults if it doesn't exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| AsmError::Config(e.to_string()))
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to an explicit file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| AsmError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("a2xx-asm")
            .join("config.toml")
    }
}
