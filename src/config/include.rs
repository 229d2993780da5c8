//! Include list entries
//!
//! The YAML `include` list mixes plain strings and single-key mappings:
//!
//! ```yaml
//! include:
//!   - core
//!   - contrib.templating|inc=*.j2
//!   - contrib.openstack:
//!       - utils
//!       - templates|inc=*
//! ```
//!
//! [`IncludeEntry`] is that raw shape; [`IncludeSpec`] is the normalized form the
//! sync engine consumes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One raw entry of the `include` list as written in the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IncludeEntry {
    /// `name` or `name|opt,opt`
    Module(String),
    /// `prefix: [member, member|opt]`
    Package(BTreeMap<String, Vec<String>>),
}

/// A dotted module name together with its own filter options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSpec {
    pub name: String,
    pub options: Vec<String>,
}

impl ModuleSpec {
    /// Parse `name` or `name|opt1,opt2`
    pub fn parse(spec: &str) -> Self {
        match spec.split_once('|') {
            Some((name, options)) => Self {
                name: name.trim().to_string(),
                options: parse_options(options),
            },
            None => Self {
                name: spec.trim().to_string(),
                options: Vec::new(),
            },
        }
    }

    /// Options for this module: its own first, then the global ones
    pub fn effective_options(&self, global: &[String]) -> Vec<String> {
        self.options.iter().chain(global).cloned().collect()
    }
}

impl fmt::Display for ModuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.options.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}|{}", self.name, self.options.join(","))
        }
    }
}

/// Normalized include-spec
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "IncludeEntry")]
pub enum IncludeSpec {
    Module(ModuleSpec),
    Package {
        prefix: String,
        members: Vec<ModuleSpec>,
    },
}

impl IncludeSpec {
    /// Normalize a raw entry. A mapping with several keys yields one spec per key.
    pub fn from_entry(entry: IncludeEntry) -> Vec<Self> {
        match entry {
            IncludeEntry::Module(spec) => vec![Self::Module(ModuleSpec::parse(&spec))],
            IncludeEntry::Package(map) => map
                .into_iter()
                .map(|(prefix, members)| Self::Package {
                    prefix,
                    members: members.iter().map(|m| ModuleSpec::parse(m)).collect(),
                })
                .collect(),
        }
    }

    /// Fully-qualified modules this spec expands to
    pub fn modules(&self) -> Vec<ModuleSpec> {
        match self {
            Self::Module(spec) => vec![spec.clone()],
            Self::Package { prefix, members } => members
                .iter()
                .map(|member| ModuleSpec {
                    name: format!("{prefix}.{}", member.name),
                    options: member.options.clone(),
                })
                .collect(),
        }
    }
}

impl From<IncludeSpec> for IncludeEntry {
    fn from(spec: IncludeSpec) -> Self {
        match spec {
            IncludeSpec::Module(module) => IncludeEntry::Module(module.to_string()),
            IncludeSpec::Package { prefix, members } => {
                let members = members.iter().map(ModuleSpec::to_string).collect();
                IncludeEntry::Package(BTreeMap::from([(prefix, members)]))
            }
        }
    }
}

/// Split a comma-separated option string, dropping empty items
pub fn parse_options(options: &str) -> Vec<String> {
    options
        .split(',')
        .map(str::trim)
        .filter(|opt| !opt.is_empty())
        .map(str::to_string)
        .collect()
}
