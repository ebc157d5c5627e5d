// file: src/cli/args.rs
// version: 1.0.0
// guid: 0eb0bdbb-a336-47aa-aa5c-4c017a72f0c1

//! Command line argument definitions

use crate::error::Result;
use crate::params::{InvokeParameters, Property, PushTargets, Switch, Verbosity, DEFAULT_CONFIGURATION};
use crate::project;
use crate::variant::CommandVariant;
use clap::{Args, Parser, Subcommand};
use std::path::Path;

#[derive(Parser)]
#[command(name = "dotnet-invoke")]
#[command(about = "Uniform build, clean, pack, test, publish, restore and run front end over the dotnet toolchain")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging for dotnet-invoke itself
    #[arg(long, global = true)]
    pub debug: bool,

    /// Only log errors from dotnet-invoke itself
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Builds a project and its dependencies
    #[command(visible_aliases = ["ib", "b"])]
    Build(InvokeArgs),

    /// Runs unit tests in a project
    Test(InvokeArgs),

    /// Creates a NuGet package
    #[command(visible_alias = "pk")]
    Pack(InvokeArgs),

    /// Publishes a project for deployment
    Publish(InvokeArgs),

    /// Cleans the output of a project
    #[command(visible_alias = "cln")]
    Clean(InvokeArgs),

    /// Restores the dependencies and tools of a project
    Restore(InvokeArgs),

    /// Runs an application without any explicit compile or launch commands
    Run(InvokeArgs),

    /// Prints usage text for a command without invoking the toolchain
    #[command(visible_alias = "?")]
    Help {
        #[arg(value_parser = parse_variant)]
        command: Option<CommandVariant>,
    },
}

impl Commands {
    /// Variant and arguments of a toolchain command; `None` for `help`
    pub fn invocation(self) -> Option<(CommandVariant, InvokeArgs)> {
        match self {
            Commands::Build(args) => Some((CommandVariant::Build, args)),
            Commands::Test(args) => Some((CommandVariant::Test, args)),
            Commands::Pack(args) => Some((CommandVariant::Pack, args)),
            Commands::Publish(args) => Some((CommandVariant::Publish, args)),
            Commands::Clean(args) => Some((CommandVariant::Clean, args)),
            Commands::Restore(args) => Some((CommandVariant::Restore, args)),
            Commands::Run(args) => Some((CommandVariant::Run, args)),
            Commands::Help { .. } => None,
        }
    }
}

/// Flags shared by every toolchain command
#[derive(Args, Debug, Clone, Default)]
pub struct InvokeArgs {
    /// Project, props, targets, usings, tasks or items file. Defaults to the
    /// first such file in the working directory.
    #[arg(value_name = "PROJECT")]
    pub project: Option<String>,

    #[arg(
        long = "project",
        visible_alias = "proj",
        aliases = ["path", "projpath"],
        value_name = "PROJECT",
        conflicts_with = "project",
        hide_short_help = true
    )]
    pub project_flag: Option<String>,

    /// The configuration to build with
    #[arg(short, long, default_value = DEFAULT_CONFIGURATION)]
    pub configuration: String,

    /// q[uiet], m[inimal], n[ormal], d[etailed] or diag[nostic]
    #[arg(short, long, default_value = "minimal", value_parser = parse_verbosity)]
    pub verbosity: Verbosity,

    /// Target to run, repeatable. Defaults to the command's own target list.
    #[arg(short = 't', long = "target", value_name = "TARGET")]
    pub targets: Vec<String>,

    /// The version of the built package
    #[arg(long = "version", visible_alias = "package-version", value_name = "VERSION")]
    pub version: Option<String>,

    /// The version of the built assembly file
    #[arg(long = "assembly-version", visible_aliases = ["av", "asmv"], value_name = "VERSION")]
    pub assembly_version: Option<String>,

    /// Set or override a project-level property (name=value), repeatable
    #[arg(short = 'p', long = "property", visible_aliases = ["prop", "properties"], value_name = "NAME=VALUE")]
    pub properties: Vec<String>,

    /// Print the available targets instead of building, optionally to FILE
    #[arg(
        long = "print-targets",
        visible_aliases = ["targets", "ts", "show-targets"],
        num_args = 0..=1,
        require_equals = true,
        value_name = "FILE"
    )]
    pub print_targets: Option<Option<String>>,

    /// Serialize all build events to a binary log, optionally at FILE
    #[arg(
        long = "binary-logger",
        visible_aliases = ["bl", "binlog"],
        num_args = 0..=1,
        require_equals = true,
        value_name = "FILE"
    )]
    pub binary_logger: Option<Option<String>>,

    /// Do not restore the project before running
    #[arg(long)]
    pub no_restore: bool,

    /// Suppress the logo (forwarded to the toolchain as -norestore)
    #[arg(long, visible_alias = "nl")]
    pub no_logo: bool,

    /// Allow the toolchain to stop and wait for user input
    #[arg(long, visible_alias = "inter")]
    pub interactive: bool,

    /// Tag attached to information output, repeatable
    #[arg(long = "tag", visible_alias = "tags", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Push the package to the local feed
    #[arg(long, visible_aliases = ["pl", "plocal"])]
    pub push_local: bool,

    /// Push the package to the GitHub feed
    #[arg(long, visible_alias = "pgh")]
    pub push_github: bool,

    /// Push the package to the Azure Artifacts feed
    #[arg(long, visible_alias = "paz")]
    pub push_azure: bool,

    /// Push the package to nuget.org
    #[arg(long, visible_alias = "pn")]
    pub push_nuget: bool,

    /// Print the execution result as JSON instead of live output
    #[arg(long)]
    pub json: bool,
}

impl InvokeArgs {
    /// Bind these flags to a validated parameter set. `dir` is where project
    /// discovery looks when no project was given.
    pub fn to_parameters(&self, variant: CommandVariant, dir: &Path) -> Result<InvokeParameters> {
        let explicit = self.project.as_deref().or(self.project_flag.as_deref());
        let project_path = project::resolve(explicit, dir, variant)?;

        let defaults = InvokeParameters::for_variant(variant);
        let targets = if self.targets.is_empty() {
            defaults.targets
        } else {
            self.targets.clone()
        };

        Ok(InvokeParameters {
            project_path,
            configuration: self.configuration.clone(),
            verbosity: self.verbosity,
            targets,
            version: self.version.clone(),
            assembly_version: self.assembly_version.clone(),
            properties: self.properties.iter().map(|p| Property::parse(p)).collect(),
            no_restore: self.no_restore,
            no_logo: self.no_logo,
            interactive: self.interactive,
            binary_logger: Switch::from(self.binary_logger.clone()),
            print_targets: Switch::from(self.print_targets.clone()),
            tags: self.tags.clone(),
            push: PushTargets {
                local: self.push_local,
                github: self.push_github,
                azure: self.push_azure,
                nuget: self.push_nuget,
            },
        })
    }
}

fn parse_verbosity(s: &str) -> std::result::Result<Verbosity, String> {
    s.parse().map_err(|e: crate::InvokeError| e.to_string())
}

fn parse_variant(s: &str) -> std::result::Result<CommandVariant, String> {
    s.parse().map_err(|e: crate::InvokeError| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("dotnet-invoke").chain(args.iter().copied())).unwrap()
    }

    fn invoke_args(args: &[&str]) -> (CommandVariant, InvokeArgs) {
        parse(args).command.invocation().unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        // Act
        let (variant, args) = invoke_args(&["build"]);

        // Assert
        assert_eq!(variant, CommandVariant::Build);
        assert_eq!(args.configuration, "Local");
        assert_eq!(args.verbosity, Verbosity::Minimal);
        assert!(args.targets.is_empty());
        assert_eq!(args.binary_logger, None);
    }

    #[test]
    fn test_aliases_bind_to_fields() {
        // Act
        let (_, args) = invoke_args(&[
            "pack",
            "--proj",
            "App.csproj",
            "--asmv",
            "1.0.0",
            "--prop",
            "A=1",
            "--properties",
            "B",
            "--tags",
            "CI",
            "--inter",
            "--nl",
            "-v",
            "diag",
        ]);

        // Assert
        assert_eq!(args.project_flag.as_deref(), Some("App.csproj"));
        assert_eq!(args.assembly_version.as_deref(), Some("1.0.0"));
        assert_eq!(args.properties, vec!["A=1", "B"]);
        assert_eq!(args.tags, vec!["CI"]);
        assert!(args.interactive);
        assert!(args.no_logo);
        assert_eq!(args.verbosity, Verbosity::Diagnostic);
    }

    #[test]
    fn test_tri_state_flags() {
        let (_, bare) = invoke_args(&["build", "--bl", "--ts"]);
        assert_eq!(bare.binary_logger, Some(None));
        assert_eq!(bare.print_targets, Some(None));

        let (_, valued) = invoke_args(&["build", "--binlog=out.binlog", "--targets=t.txt"]);
        assert_eq!(valued.binary_logger, Some(Some("out.binlog".to_string())));
        assert_eq!(valued.print_targets, Some(Some("t.txt".to_string())));
    }

    #[test]
    fn test_bare_switch_does_not_swallow_project() {
        let (_, args) = invoke_args(&["build", "--bl", "App.csproj"]);
        assert_eq!(args.binary_logger, Some(None));
        assert_eq!(args.project.as_deref(), Some("App.csproj"));
    }

    #[test]
    fn test_invalid_verbosity_is_rejected() {
        let result = Cli::try_parse_from(["dotnet-invoke", "build", "-v", "loud"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_help_takes_optional_command() {
        match parse(&["help", "pack"]).command {
            Commands::Help { command } => assert_eq!(command, Some(CommandVariant::Pack)),
            _ => panic!("expected help"),
        }
        assert!(parse(&["help"]).command.invocation().is_none());
    }

    #[test]
    fn test_to_parameters_applies_variant_defaults() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let (variant, args) = invoke_args(&["clean", "App.csproj", "-p", "Foo"]);

        // Act
        let params = args.to_parameters(variant, dir.path()).unwrap();

        // Assert
        assert_eq!(params.project_path.as_deref(), Some("App.csproj"));
        assert_eq!(params.targets, vec!["Clean"]);
        assert_eq!(params.properties, vec![Property::new("Foo", "")]);
        assert_eq!(params.binary_logger, Switch::Off);
    }

    #[test]
    fn test_to_parameters_rejects_bad_project() {
        let dir = TempDir::new().unwrap();
        let (variant, args) = invoke_args(&["build", "notes.txt"]);
        assert!(args.to_parameters(variant, dir.path()).is_err());
    }

    #[test]
    fn test_to_parameters_discovers_project() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("Lib.csproj"), "").unwrap();
        let (variant, args) = invoke_args(&["build", "-t", "Rebuild", "--pn"]);

        let params = args.to_parameters(variant, dir.path()).unwrap();

        assert!(params.project_path.unwrap().ends_with("Lib.csproj"));
        assert_eq!(params.targets, vec!["Rebuild"]);
        assert!(params.push.nuget);
    }
}
