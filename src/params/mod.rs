// file: src/params/mod.rs
// version: 1.0.0
// guid: 2c440b83-4514-4d87-99d4-5cb7c5222040

//! Parameter model for a single toolchain invocation
//!
//! An [`InvokeParameters`] value is built once per command from the bound
//! CLI flags and is read-only afterwards. Everything here is plain data; the
//! argument builder decides how each field is rendered.

pub mod verbosity;

pub use verbosity::Verbosity;

use crate::variant::CommandVariant;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration used when none is given
pub const DEFAULT_CONFIGURATION: &str = "Local";

/// Tri-state flag: off, on with the tool's default, or on with an explicit value
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "value")]
pub enum Switch {
    #[default]
    Off,
    OnDefault,
    OnWithValue(String),
}

impl Switch {
    pub fn is_on(&self) -> bool {
        !matches!(self, Switch::Off)
    }

    /// Explicit value, if one was supplied
    pub fn value(&self) -> Option<&str> {
        match self {
            Switch::OnWithValue(value) => Some(value),
            _ => None,
        }
    }
}

/// `None` is off, `Some(None)` is the bare flag, `Some(Some(v))` carries a value.
/// An empty value counts as the bare flag.
impl From<Option<Option<String>>> for Switch {
    fn from(flag: Option<Option<String>>) -> Self {
        match flag {
            None => Switch::Off,
            Some(None) => Switch::OnDefault,
            Some(Some(value)) if value.is_empty() => Switch::OnDefault,
            Some(Some(value)) => Switch::OnWithValue(value),
        }
    }
}

impl From<bool> for Switch {
    fn from(on: bool) -> Self {
        if on {
            Switch::OnDefault
        } else {
            Switch::Off
        }
    }
}

/// A `name=value` project property override
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Split on the first `=`. Never fails: an entry without `=` gets an
    /// empty value and an empty name is kept as-is.
    pub fn parse(entry: &str) -> Self {
        match entry.split_once('=') {
            Some((name, value)) => Self::new(name, value),
            None => Self::new(entry, ""),
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

impl From<&str> for Property {
    fn from(entry: &str) -> Self {
        Self::parse(entry)
    }
}

/// Package feeds the caller asked to push to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PushTargets {
    pub local: bool,
    pub github: bool,
    pub azure: bool,
    pub nuget: bool,
}

impl PushTargets {
    pub fn any(&self) -> bool {
        self.local || self.github || self.azure || self.nuget
    }

    /// Names of the selected feeds, in a fixed order
    pub fn names(&self) -> Vec<&'static str> {
        [
            (self.local, "local"),
            (self.github, "github"),
            (self.azure, "azure"),
            (self.nuget, "nuget"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect()
    }
}

/// Inputs of one command invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeParameters {
    /// Project, props, targets, usings, tasks or items file. `None` falls
    /// back to the project glob.
    pub project_path: Option<String>,
    pub configuration: String,
    pub verbosity: Verbosity,
    pub targets: Vec<String>,
    pub version: Option<String>,
    pub assembly_version: Option<String>,
    pub properties: Vec<Property>,
    pub no_restore: bool,
    pub no_logo: bool,
    pub interactive: bool,
    pub binary_logger: Switch,
    pub print_targets: Switch,
    pub tags: Vec<String>,
    pub push: PushTargets,
}

impl InvokeParameters {
    /// Parameters with the defaults of `variant`
    pub fn for_variant(variant: CommandVariant) -> Self {
        Self {
            project_path: None,
            configuration: DEFAULT_CONFIGURATION.to_string(),
            verbosity: Verbosity::default(),
            targets: variant
                .spec()
                .default_targets
                .iter()
                .map(|t| t.to_string())
                .collect(),
            version: None,
            assembly_version: None,
            properties: Vec::new(),
            no_restore: false,
            no_logo: false,
            interactive: false,
            binary_logger: Switch::Off,
            print_targets: Switch::Off,
            tags: Vec::new(),
            push: PushTargets::default(),
        }
    }

    pub fn with_project(mut self, path: impl Into<String>) -> Self {
        self.project_path = Some(path.into());
        self
    }

    pub fn with_targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.targets = targets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_properties<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.properties = entries
            .into_iter()
            .map(|e| Property::parse(e.as_ref()))
            .collect();
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }
}

impl Default for InvokeParameters {
    fn default() -> Self {
        Self::for_variant(CommandVariant::Build)
    }
}
