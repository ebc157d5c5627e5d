// file: src/arguments.rs
// version: 1.0.0
// guid: 3f166c25-fbec-4aae-b7f1-841bc192c3db

//! Argument vector construction
//!
//! The toolchain is sensitive to token order, so [`build`] emits tokens in a
//! fixed sequence:
//!
//! 1. command token
//! 2. project path (or [`DEFAULT_PROJECT_GLOB`])
//! 3. `-targets [FILE]`
//! 4. `-t <target>` per target
//! 5. `-p:Version=..`, then `-p:AssemblyVersion=..`
//! 6. `-p <name=value>` per property
//! 7. `-no-restore`
//! 8. `-norestore` for the no-logo flag
//! 9. `-bl [FILE]`
//! 10. `-v <verbosity>`, always last

use crate::params::InvokeParameters;
use crate::variant::CommandVariant;

/// Project argument used when no path was resolved
pub const DEFAULT_PROJECT_GLOB: &str = "./*.*proj";

/// Ordered tokens passed to the toolchain
pub type ArgumentVector = Vec<String>;

/// Build the argument vector for `variant`. Pure: no environment or global
/// state is consulted.
pub fn build(params: &InvokeParameters, variant: CommandVariant) -> ArgumentVector {
    let mut args = vec![
        variant.as_str().to_string(),
        params
            .project_path
            .clone()
            .unwrap_or_else(|| DEFAULT_PROJECT_GLOB.to_string()),
    ];

    if params.print_targets.is_on() {
        args.push("-targets".to_string());
        if let Some(path) = params.print_targets.value() {
            args.push(path.to_string());
        }
    }

    for target in &params.targets {
        args.push("-t".to_string());
        args.push(target.clone());
    }

    if let Some(version) = &params.version {
        args.push(format!("-p:Version={}", version));
    }

    if let Some(assembly_version) = &params.assembly_version {
        args.push(format!("-p:AssemblyVersion={}", assembly_version));
    }

    for property in &params.properties {
        args.push("-p".to_string());
        args.push(property.to_string());
    }

    if params.no_restore {
        args.push("-no-restore".to_string());
    }

    // no-logo is forwarded as -norestore
    if params.no_logo {
        args.push("-norestore".to_string());
    }

    if params.binary_logger.is_on() {
        args.push("-bl".to_string());
        if let Some(path) = params.binary_logger.value() {
            args.push(path.to_string());
        }
    }

    args.push("-v".to_string());
    args.push(params.verbosity.as_str().to_string());

    args
}

/// Render an argument vector for log output
pub fn display(program: &str, args: &[String]) -> String {
    let mut rendered = String::from(program);
    for arg in args {
        rendered.push(' ');
        if arg.is_empty() || arg.contains(char::is_whitespace) {
            rendered.push('"');
            rendered.push_str(arg);
            rendered.push('"');
        } else {
            rendered.push_str(arg);
        }
    }
    rendered
}
