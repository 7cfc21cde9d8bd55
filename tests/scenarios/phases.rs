//! Test: before / pipeline / after ordering

use crate::helpers::*;
use clictl::core::EvalError;

#[tokio::test]
async fn test_phases_run_in_order_regardless_of_key_order() {
    let yaml = r#"
after:
  - echo: three
pipeline:
  - echo: two
before:
  - echo: one
"#;
    Scenario::new()
        .run(yaml)
        .await
        .assert_success()
        .assert_stdout("one\ntwo\nthree\n");
}

#[tokio::test]
async fn test_section_can_hold_a_single_step() {
    let yaml = r#"
before: {assign: {greeting: hello}}
pipeline: {echo: "{usr.greeting} {0}"}
"#;
    Scenario::new()
        .args(&["world"])
        .run(yaml)
        .await
        .assert_success()
        .assert_stdout("hello world\n");
}

#[tokio::test]
async fn test_failure_stops_later_phases() {
    let yaml = r#"
before:
  - echo: setup
pipeline:
  - require: false
  - echo: never
after:
  - echo: never either
"#;
    Scenario::new()
        .run(yaml)
        .await
        .assert_gated()
        .assert_stdout("setup\n");
}

#[tokio::test]
async fn test_evaluation_error_stops_the_run() {
    let yaml = r#"
before:
  - echo: "{usr.unset}"
after:
  - echo: never
"#;
    let result = Scenario::new().run(yaml).await;
    assert!(matches!(result.result, Err(EvalError::UnknownVariable(_))));
    result.assert_stdout("");
}

#[tokio::test]
async fn test_implicit_pipeline_list() {
    Scenario::new()
        .run("- echo: a\n- echo: b\n")
        .await
        .assert_success()
        .assert_stdout("a\nb\n");
}

#[tokio::test]
async fn test_implicit_pipeline_single_step() {
    Scenario::new()
        .args(&["x"])
        .run(r#"{"echo": "{0}"}"#)
        .await
        .assert_success()
        .assert_stdout("x\n");
}

#[tokio::test]
async fn test_empty_sections_do_nothing() {
    Scenario::new()
        .run("before: []\npipeline:\nafter: []\n")
        .await
        .assert_success()
        .assert_stdout("");
}

#[tokio::test]
async fn test_variables_cross_phase_boundaries() {
    let yaml = r#"
before:
  - assign: {target: "{0}"}
after:
  - echo: "deployed {usr.target}"
"#;
    let result = Scenario::new().args(&["staging"]).run(yaml).await;
    result.assert_success().assert_stdout("deployed staging\n");
    assert_eq!(result.variable("target").as_deref(), Some("staging"));
}
