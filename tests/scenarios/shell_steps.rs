//! Test: shell steps and evaluation order

use crate::helpers::*;

#[tokio::test]
async fn test_echo_of_shell_output() {
    let shell = RecordingShell::new().respond("git branch --show-current", "main\n");
    let yaml = r#"
pipeline:
  - echo: {shell: git branch --show-current}
"#;
    let result = Scenario::new().shell(shell).run(yaml).await;
    result.assert_success().assert_stdout("main\n");
    assert_eq!(result.commands, vec!["git branch --show-current"]);
}

#[tokio::test]
async fn test_assign_from_shell() {
    let shell = RecordingShell::new().respond("whoami", "deploy\n\n");
    let yaml = r#"
before:
  - assign: {user: {shell: whoami}}
pipeline:
  - require: {equal: ["{usr.user}", deploy]}
  - echo: "hello {usr.user}"
"#;
    let result = Scenario::new().shell(shell).run(yaml).await;
    result.assert_success().assert_stdout("hello deploy\n");
    assert_eq!(result.variable("user").as_deref(), Some("deploy"));
}

#[tokio::test]
async fn test_shell_command_is_not_interpolated() {
    let yaml = r#"- shell: "echo {0} ${HOME}""#;
    let result = Scenario::new().args(&["x"]).run(yaml).await;
    result.assert_success();
    assert_eq!(result.commands, vec!["echo {0} ${HOME}"]);
}

#[tokio::test]
async fn test_and_evaluates_every_operand() {
    let yaml = r#"
require:
  and:
    - false
    - equal: [{shell: first}, ""]
    - equal: [{shell: second}, ""]
"#;
    let result = Scenario::new().run(yaml).await;
    result.assert_gated();
    assert_eq!(result.commands, vec!["first", "second"]);
}

#[tokio::test]
async fn test_or_evaluates_every_operand() {
    let yaml = r#"
require:
  or:
    - true
    - match: {"x": {shell: probe}}
"#;
    let result = Scenario::new().run(yaml).await;
    result.assert_success();
    assert_eq!(result.commands, vec!["probe"]);
}

#[tokio::test]
async fn test_equal_evaluates_left_to_right() {
    let shell = RecordingShell::new()
        .respond("left", "same")
        .respond("right", "same\n");
    let yaml = r#"require: {eq: [{shell: left}, {shell: right}]}"#;
    let result = Scenario::new().shell(shell).run(yaml).await;
    result.assert_success();
    assert_eq!(result.commands, vec!["left", "right"]);
}

#[tokio::test]
async fn test_untaken_branch_never_runs_its_commands() {
    let yaml = r#"
if:
  condition: false
  then:
    - shell: rm -rf build
  else:
    - shell: make
"#;
    let result = Scenario::new().run(yaml).await;
    result.assert_success();
    assert_eq!(result.commands, vec!["make"]);
}
