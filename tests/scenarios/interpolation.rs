//! Test: Template interpolation in echo steps

use crate::helpers::*;
use clictl::core::EvalError;

#[tokio::test]
async fn test_echo_plain_text() {
    Scenario::new()
        .run("pipeline:\n  - echo: hello\n")
        .await
        .assert_success()
        .assert_stdout("hello\n");
}

#[tokio::test]
async fn test_echo_environment_variable() {
    let yaml = r#"{
        "pipeline": [{
            "echo": "{env.foo}"
        }]
    }"#;

    Scenario::new()
        .args(&["true"])
        .env("foo", "bar")
        .run(yaml)
        .await
        .assert_success()
        .assert_stdout("bar\n");
}

#[tokio::test]
async fn test_echo_positional_arguments() {
    let yaml = r#"
pipeline:
  - echo: "{1} {0}"
"#;

    Scenario::new()
        .args(&["true", "bar"])
        .run(yaml)
        .await
        .assert_success()
        .assert_stdout("bar true\n");
}

#[tokio::test]
async fn test_echo_first_argument() {
    Scenario::new()
        .args(&["bar"])
        .run("pipeline: [echo: \"{0}\"]")
        .await
        .assert_success()
        .assert_stdout("bar\n");
}

#[tokio::test]
async fn test_args_and_config_namespaces() {
    let yaml = r#"
- echo: "{args[1]} of {args}"
- echo: "forced={config.force}"
"#;

    Scenario::new()
        .args(&["deploy", "prod"])
        .force()
        .run(yaml)
        .await
        .assert_success()
        .assert_stdout("prod of deploy prod\nforced=True\n");
}

#[tokio::test]
async fn test_escaped_braces() {
    Scenario::new()
        .run("echo: \"{{not a field}}\"")
        .await
        .assert_success()
        .assert_stdout("{not a field}\n");
}

#[tokio::test]
async fn test_unknown_variable_aborts_the_run() {
    let yaml = r#"
- echo: before
- echo: "{env.DOES_NOT_EXIST}"
- echo: after
"#;

    let result = Scenario::new().run(yaml).await;
    assert!(matches!(result.result, Err(EvalError::UnknownVariable(ref name)) if name == "env.DOES_NOT_EXIST"));
    result.assert_stdout("before\n");
}

#[tokio::test]
async fn test_missing_positional_argument() {
    let result = Scenario::new().args(&["only"]).run("echo: \"{1}\"").await;
    assert!(matches!(result.result, Err(EvalError::UnknownVariable(_))));
}
