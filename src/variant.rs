// file: src/variant.rs
// version: 1.0.0
// guid: af9b5cf5-c35b-42b9-ba01-c1c5f5e721bb

//! Command variant registry
//!
//! Maps each supported toolchain command to its defaults. Every command
//! accepts the same fixed set of project file kinds.

use crate::error::{InvokeError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Top-level toolchain commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandVariant {
    Build,
    Test,
    Pack,
    Publish,
    Clean,
    Restore,
    Run,
    Help,
}

/// Kinds of file the toolchain accepts in the project position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    /// `.csproj`, `.fsproj`, `.proj`, ...
    Project,
    Props,
    Targets,
    Usings,
    Tasks,
    Items,
}

/// Per-variant defaults
#[derive(Debug)]
pub struct VariantSpec {
    pub variant: CommandVariant,
    pub description: &'static str,
    pub default_targets: &'static [&'static str],
}

static REGISTRY: [VariantSpec; 8] = [
    VariantSpec {
        variant: CommandVariant::Build,
        description: "Builds a project and its dependencies.",
        default_targets: &["Build"],
    },
    VariantSpec {
        variant: CommandVariant::Test,
        description: "Runs unit tests in a project.",
        default_targets: &["VSTest"],
    },
    VariantSpec {
        variant: CommandVariant::Pack,
        description: "Creates a NuGet package.",
        default_targets: &["Pack"],
    },
    VariantSpec {
        variant: CommandVariant::Publish,
        description: "Publishes a project for deployment.",
        default_targets: &["Publish"],
    },
    VariantSpec {
        variant: CommandVariant::Clean,
        description: "Cleans the output of a project.",
        default_targets: &["Clean"],
    },
    VariantSpec {
        variant: CommandVariant::Restore,
        description: "Restores the dependencies and tools of a project.",
        default_targets: &["Restore"],
    },
    VariantSpec {
        variant: CommandVariant::Run,
        description: "Runs an application without any explicit compile or launch commands.",
        default_targets: &[],
    },
    VariantSpec {
        variant: CommandVariant::Help,
        description: "Displays help for a command.",
        default_targets: &[],
    },
];

impl CommandVariant {
    pub const ALL: [CommandVariant; 8] = [
        CommandVariant::Build,
        CommandVariant::Test,
        CommandVariant::Pack,
        CommandVariant::Publish,
        CommandVariant::Clean,
        CommandVariant::Restore,
        CommandVariant::Run,
        CommandVariant::Help,
    ];

    /// Literal first token of the argument vector
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandVariant::Build => "build",
            CommandVariant::Test => "test",
            CommandVariant::Pack => "pack",
            CommandVariant::Publish => "publish",
            CommandVariant::Clean => "clean",
            CommandVariant::Restore => "restore",
            CommandVariant::Run => "run",
            CommandVariant::Help => "help",
        }
    }

    /// Registry entry for this variant
    pub fn spec(&self) -> &'static VariantSpec {
        // Table order matches ALL
        let index = CommandVariant::ALL
            .iter()
            .position(|v| v == self)
            .unwrap_or_default();
        &REGISTRY[index]
    }

    /// Check that `path` names a project, props, targets, usings, tasks or
    /// items file
    pub fn validate_project_path(&self, path: &str) -> Result<ProjectKind> {
        ProjectKind::of(path).ok_or_else(|| {
            InvokeError::validation(format!(
                "'{}' cannot be used with '{}': expected one of {}",
                path,
                self,
                ProjectKind::ALL
                    .iter()
                    .map(|k| k.pattern())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })
    }

    /// Static usage text printed by `help`
    pub fn usage(&self) -> String {
        let spec = self.spec();
        let targets = if spec.default_targets.is_empty() {
            "none".to_string()
        } else {
            spec.default_targets.join(", ")
        };

        format!(
            "{description}\n\
             Usage: dotnet-invoke {name} [PROJECT] [options]\n\
             Options:\n\
             \x20 -h, --help                  Prints the help text\n\
             \x20 -c, --configuration <NAME>  The configuration to build with. Defaults to \"Local\".\n\
             \x20 -v, --verbosity <LEVEL>     q[uiet], m[inimal], n[ormal], d[etailed] or diag[nostic]. Defaults to \"minimal\".\n\
             \x20 -t, --target <TARGET>       Targets to run, repeatable. Defaults to \"{targets}\".\n\
             \x20     --version <VERSION>     The version of the built package.\n\
             \x20     --av, --asmv <VERSION>  The version of the built assembly file.\n\
             \x20 -p, --property <N=V>        Set or override a project-level property, repeatable.\n\
             \x20     --ts[=FILE]             Print the available targets, to the console or to FILE.\n\
             \x20     --bl[=FILE]             Serialize all build events to a binary log.\n\
             \x20     --no-restore            Do not restore the project before running.\n\
             \x20     --no-logo               Passed to the toolchain as -norestore.\n\
             \x20     --interactive           Allow the toolchain to prompt for input.\n\
             \x20     --tag <TAG>             Tag attached to information output, repeatable.\n\
             \x20     --json                  Print the execution result as JSON.\n\
             Accepted project files: {kinds}\n",
            description = spec.description,
            name = self.as_str(),
            targets = targets,
            kinds = ProjectKind::ALL
                .iter()
                .map(|k| k.pattern())
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

impl fmt::Display for CommandVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CommandVariant {
    type Err = InvokeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        CommandVariant::ALL
            .into_iter()
            .find(|v| v.as_str() == wanted)
            .ok_or_else(|| InvokeError::invalid_argument(format!("Unknown command: {}", s)))
    }
}

fn project_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\.(?:(?P<proj>[a-z0-9_*]*proj)|(?P<ext>props|targets|usings|tasks|items))$")
            .expect("project file pattern is valid")
    })
}

impl ProjectKind {
    pub const ALL: [ProjectKind; 6] = [
        ProjectKind::Project,
        ProjectKind::Props,
        ProjectKind::Targets,
        ProjectKind::Usings,
        ProjectKind::Tasks,
        ProjectKind::Items,
    ];

    /// Classify a path by its suffix
    pub fn of(path: &str) -> Option<Self> {
        let caps = project_pattern().captures(path.trim())?;
        if caps.name("proj").is_some() {
            return Some(ProjectKind::Project);
        }

        match caps.name("ext")?.as_str().to_ascii_lowercase().as_str() {
            "props" => Some(ProjectKind::Props),
            "targets" => Some(ProjectKind::Targets),
            "usings" => Some(ProjectKind::Usings),
            "tasks" => Some(ProjectKind::Tasks),
            "items" => Some(ProjectKind::Items),
            _ => None,
        }
    }

    /// Glob-like suffix shown to users
    pub fn pattern(&self) -> &'static str {
        match self {
            ProjectKind::Project => "*.*proj",
            ProjectKind::Props => "*.props",
            ProjectKind::Targets => "*.targets",
            ProjectKind::Usings => "*.usings",
            ProjectKind::Tasks => "*.tasks",
            ProjectKind::Items => "*.items",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_order_matches_variants() {
        for variant in CommandVariant::ALL {
            assert_eq!(variant.spec().variant, variant);
        }
    }

    #[test]
    fn test_parse_round_trips_tokens() {
        for variant in CommandVariant::ALL {
            assert_eq!(variant.as_str().parse::<CommandVariant>().unwrap(), variant);
        }
        assert!("deploy".parse::<CommandVariant>().is_err());
    }

    #[test]
    fn test_default_targets() {
        assert_eq!(CommandVariant::Build.spec().default_targets, &["Build"]);
        assert_eq!(CommandVariant::Pack.spec().default_targets, &["Pack"]);
        assert!(CommandVariant::Run.spec().default_targets.is_empty());
    }

    #[test]
    fn test_project_kind_classification() {
        assert_eq!(ProjectKind::of("src/App.csproj"), Some(ProjectKind::Project));
        assert_eq!(ProjectKind::of("Lib.fsproj"), Some(ProjectKind::Project));
        assert_eq!(ProjectKind::of("dirs.proj"), Some(ProjectKind::Project));
        assert_eq!(ProjectKind::of("./*.*proj"), Some(ProjectKind::Project));
        assert_eq!(ProjectKind::of("Directory.Build.props"), Some(ProjectKind::Props));
        assert_eq!(ProjectKind::of("Common.TARGETS"), Some(ProjectKind::Targets));
        assert_eq!(ProjectKind::of("Global.usings"), Some(ProjectKind::Usings));
        assert_eq!(ProjectKind::of("build.tasks"), Some(ProjectKind::Tasks));
        assert_eq!(ProjectKind::of("files.items"), Some(ProjectKind::Items));
        assert_eq!(ProjectKind::of("README.md"), None);
        assert_eq!(ProjectKind::of("project"), None);
    }

    #[test]
    fn test_every_variant_accepts_the_same_kinds() {
        // Arrange
        let accepted = [
            ("App.csproj", ProjectKind::Project),
            ("Directory.Build.props", ProjectKind::Props),
            ("Tests.targets", ProjectKind::Targets),
            ("Global.usings", ProjectKind::Usings),
            ("Custom.tasks", ProjectKind::Tasks),
            ("files.items", ProjectKind::Items),
        ];

        // Act & Assert
        for variant in CommandVariant::ALL {
            for (path, kind) in accepted {
                assert_eq!(variant.validate_project_path(path).unwrap(), kind);
            }
            assert!(variant.validate_project_path("notes.txt").is_err());
        }
    }

    #[test]
    fn test_usage_mentions_variant_and_defaults() {
        let usage = CommandVariant::Build.usage();
        assert!(usage.starts_with("Builds a project"));
        assert!(usage.contains("dotnet-invoke build"));
        assert!(usage.contains("Defaults to \"Build\""));
    }
}
