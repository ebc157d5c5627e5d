// file: tests/integration_test.rs
// version: 1.0.0
// guid: c93b51e2-7a04-4f6d-8e1c-5d20a9f7b364

//! Integration tests for dotnet-invoke

use dotnet_invoke::{
    arguments,
    config::Config,
    executor::Executor,
    params::{Switch, Verbosity},
    reporter::{ExecutionResult, ReportSink, FAILURE_EXIT_CODE},
    stream::{Channel, Event, StreamMultiplexer},
    CommandVariant, Invocation, InvokeParameters,
};

#[derive(Default)]
struct Collect {
    events: Vec<Event>,
    result: Option<ExecutionResult>,
}

impl ReportSink for Collect {
    fn on_event(&mut self, event: &Event) {
        self.events.push(event.clone());
    }

    fn on_result(&mut self, result: &ExecutionResult) {
        self.result = Some(result.clone());
    }
}

fn executor_for(program: &str) -> Executor {
    let mut config = Config::default();
    config.general.executable = program.to_string();
    Executor::new(config)
}

#[test]
fn test_full_argument_vector_order() {
    // Arrange
    let mut params = InvokeParameters::for_variant(CommandVariant::Pack)
        .with_project("src/App.csproj")
        .with_targets(["Build", "Pack"])
        .with_properties(["Foo=Bar"])
        .with_verbosity(Verbosity::Detailed);
    params.version = Some("1.2.3".to_string());
    params.assembly_version = Some("1.2.0".to_string());
    params.no_restore = true;
    params.binary_logger = Switch::OnDefault;
    params.print_targets = Switch::OnWithValue("targets.txt".to_string());

    // Act
    let args = arguments::build(&params, CommandVariant::Pack);

    // Assert
    assert_eq!(
        args,
        vec![
            "pack",
            "src/App.csproj",
            "-targets",
            "targets.txt",
            "-t",
            "Build",
            "-t",
            "Pack",
            "-p:Version=1.2.3",
            "-p:AssemblyVersion=1.2.0",
            "-p",
            "Foo=Bar",
            "-no-restore",
            "-bl",
            "-v",
            "detailed",
        ]
    );
}

#[test]
fn test_every_variant_leads_with_its_token() {
    for variant in CommandVariant::ALL {
        let params = InvokeParameters::for_variant(variant);
        let args = arguments::build(&params, variant);
        assert_eq!(args[0], variant.as_str());
        assert_eq!(&args[args.len() - 2..], ["-v", "minimal"]);
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_multiplexer_orders_mixed_output() {
    // Arrange
    let executor = executor_for("sh");
    let (mux, _feed) = StreamMultiplexer::with_feed();
    let script = "echo one; echo two; echo three; echo 'WARNING: careful'".to_string();

    // Act
    let code = executor
        .invoke("sh", &["-c".to_string(), script], false, &mux)
        .await
        .unwrap();
    let events = mux.take_events();

    // Assert
    assert_eq!(code, 0);
    assert_eq!(events.len(), 4);
    let channels: Vec<Channel> = events.iter().map(|e| e.channel).collect();
    assert_eq!(
        channels,
        vec![
            Channel::Information,
            Channel::Information,
            Channel::Information,
            Channel::Warning
        ]
    );
    assert_eq!(events[3].message, "careful");
    assert!(events.windows(2).all(|w| w[0].sequence < w[1].sequence));
}

#[cfg(unix)]
#[tokio::test]
async fn test_stderr_lines_are_errors() {
    let executor = executor_for("sh");
    let mux = StreamMultiplexer::new();

    let code = executor
        .invoke("sh", &["-c".to_string(), "echo broken >&2; exit 4".to_string()], false, &mux)
        .await
        .unwrap();

    let events = mux.take_events();
    assert_eq!(code, 4);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].channel, Channel::Error);
    assert_eq!(events[0].message, "broken");
}

#[tokio::test]
async fn test_missing_executable_reports_invocation_failure() {
    // Arrange
    let executor = executor_for("no-such-dotnet-toolchain-b71c");
    let mut invocation = Invocation::new(
        CommandVariant::Build,
        InvokeParameters::for_variant(CommandVariant::Build),
    );
    let mut sink = Collect::default();

    // Act
    let result = invocation.run(&executor, &mut sink).await.unwrap();

    // Assert
    assert_eq!(result.exit_code, FAILURE_EXIT_CODE);
    assert!(result.events.is_empty());
    assert!(result.invocation_failure.is_some());
    assert!(sink.events.is_empty());
    assert_eq!(sink.result, Some(result));
}

#[cfg(unix)]
#[tokio::test]
async fn test_live_feed_matches_result_order() {
    // Arrange: `echo` stands in for the toolchain and prints its argument vector
    let executor = executor_for("echo");
    let mut invocation = Invocation::new(
        CommandVariant::Clean,
        InvokeParameters::for_variant(CommandVariant::Clean).with_project("Lib.fsproj"),
    );
    let mut sink = Collect::default();

    // Act
    let result = invocation.run(&executor, &mut sink).await.unwrap();

    // Assert
    assert!(result.succeeded());
    assert_eq!(sink.events, result.events);
    assert_eq!(result.events[0].message, "clean Lib.fsproj -t Clean -v minimal");
}

#[cfg(unix)]
#[tokio::test]
async fn test_invocation_returns_when_toolchain_exits() {
    use std::os::unix::fs::PermissionsExt;

    // Arrange: the toolchain exits at once and leaves a child holding stdout
    let dir = tempfile::TempDir::new().unwrap();
    let script = dir.path().join("fake-dotnet");
    std::fs::write(&script, "#!/bin/sh\necho built\nsleep 5 &\nexit 0\n").unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    let mut config = Config::default();
    config.general.executable = script.display().to_string();
    config.execution.output_drain_ms = 200;
    let executor = Executor::new(config);
    let mut invocation = Invocation::new(
        CommandVariant::Build,
        InvokeParameters::for_variant(CommandVariant::Build),
    );
    let mut sink = Collect::default();
    let started = std::time::Instant::now();

    // Act
    let result = invocation.run(&executor, &mut sink).await.unwrap();

    // Assert
    assert!(started.elapsed() < std::time::Duration::from_secs(3));
    assert!(result.succeeded());
    assert_eq!(result.events.len(), 1);
    assert_eq!(result.events[0].message, "built");
    assert_eq!(sink.events, result.events);
}
