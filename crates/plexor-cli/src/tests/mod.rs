//! In-process tests for the CLI runtime.

mod support;

use std::process::ExitCode;

use plexor_config::Config;

use support::{OneShotServer, run_cli};

#[test]
fn online_prints_one_identifier_per_line() {
    let server = OneShotServer::spawn("ns_a,ns_b").expect("spawn server");
    let config = Config {
        namespace: Some(String::from("ns_")),
        ..server.config()
    };

    let run = run_cli(config, &["online"]);

    assert_eq!(run.exit_code, ExitCode::SUCCESS, "stderr: {}", run.stderr);
    assert_eq!(run.stdout, "a\nb\n");
    let request = server.request().expect("request");
    assert!(request.ends_with("\r\n\r\nonline"), "request: {request:?}");
}

#[test]
fn watch_prints_events_as_json_lines() {
    let server = OneShotServer::spawn("msg  5:foo\nbad-line\nadd  6:bar").expect("spawn server");

    let run = run_cli(server.config(), &["watch", "--from", "4", "f", "b"]);

    assert_eq!(run.exit_code, ExitCode::SUCCESS, "stderr: {}", run.stderr);
    assert_eq!(
        run.stdout,
        concat!(
            "{\"event\":\"msg\",\"position\":\"5\",\"id\":\"foo\"}\n",
            "{\"event\":\"add\",\"position\":\"6\",\"id\":\"bar\"}\n",
        )
    );
    let request = server.request().expect("request");
    assert!(request.ends_with("\r\n\r\nwatch 4 f b"), "request: {request:?}");
}

#[test]
fn publish_sends_entries_and_prints_response() {
    let server = OneShotServer::spawn("queued").expect("spawn server");
    let config = Config {
        identifier: String::from("sender"),
        ..server.config()
    };

    let run = run_cli(
        config,
        &["publish", "--data", "{\"n\":1}", "--select", "vip", "foo", "3:bar"],
    );

    assert_eq!(run.exit_code, ExitCode::SUCCESS, "stderr: {}", run.stderr);
    assert_eq!(run.stdout, "queued\n");
    let request = server.request().expect("request");
    assert!(
        request.contains("\r\nX-Realplexor: sender=foo,3:bar,*vip\r\n\r\n{\"n\":1}"),
        "request: {request:?}"
    );
}

#[test]
fn publish_with_empty_payload_succeeds_silently() {
    let run = run_cli(Config::default(), &["publish", "--data", "{}", "foo"]);
    assert_eq!(run.exit_code, ExitCode::SUCCESS, "stderr: {}", run.stderr);
    assert!(run.stdout.is_empty());
}

#[test]
fn invalid_identifier_is_reported() {
    let run = run_cli(Config::default(), &["publish", "--data", "1", "bad-id"]);
    assert_eq!(run.exit_code, ExitCode::FAILURE);
    assert!(
        run.stderr.contains("identifier 'bad-id' must be alphanumeric"),
        "stderr: {}",
        run.stderr
    );
}

#[test]
fn malformed_cursor_is_a_usage_error() {
    let run = run_cli(Config::default(), &["publish", "--data", "1", "x:foo"]);
    assert_eq!(run.exit_code, ExitCode::FAILURE);
    assert!(
        run.stderr.contains("must be a non-negative integer"),
        "stderr: {}",
        run.stderr
    );
}

#[test]
fn half_credentials_are_reported() {
    let config = Config {
        password: Some(String::from("secret")),
        ..Config::default()
    };
    let run = run_cli(config, &["online"]);
    assert_eq!(run.exit_code, ExitCode::FAILURE);
    assert!(
        run.stderr.contains("password is configured without a login"),
        "stderr: {}",
        run.stderr
    );
}

#[test]
fn missing_command_is_a_usage_error() {
    let run = run_cli(Config::default(), &[]);
    assert_eq!(run.exit_code, ExitCode::FAILURE);
    assert!(run.stderr.contains("Usage"), "stderr: {}", run.stderr);
}

#[test]
fn help_goes_to_stdout() {
    let run = run_cli(Config::default(), &["--help"]);
    assert_eq!(run.exit_code, ExitCode::SUCCESS);
    assert!(run.stdout.contains("publish"), "stdout: {}", run.stdout);
    assert!(run.stderr.is_empty());
}
