//! Test: if/then/else branching

use crate::helpers::*;

#[tokio::test]
async fn test_if_true_runs_then() {
    let yaml = r#"
pipeline:
  - if:
      condition: true
      then:
        - echo: yes
      else:
        - echo: no
"#;
    Scenario::new()
        .run(yaml)
        .await
        .assert_success()
        .assert_stdout("yes\n");
}

#[tokio::test]
async fn test_if_false_runs_else() {
    let yaml = r#"
pipeline:
  - if:
      condition: {eq: ["{0}", release]}
      then:
        - echo: shipping
      else:
        - echo: "skipping {0}"
"#;
    Scenario::new()
        .args(&["debug"])
        .run(yaml)
        .await
        .assert_success()
        .assert_stdout("skipping debug\n");
}

#[tokio::test]
async fn test_if_false_without_else_prints_nothing() {
    let yaml = r#"{
        "pipeline": [{
            "if": {
                "condition": false,
                "then": [{"echo": "{env.foo}"}]
            }
        }]
    }"#;
    Scenario::new()
        .env("foo", "bar")
        .run(yaml)
        .await
        .assert_success()
        .assert_stdout("");
}

#[tokio::test]
async fn test_if_as_a_value() {
    let yaml = r#"
- echo:
    if:
      condition: {match: {"^v[0-9]": "{0}"}}
      then: "release {0}"
      else: "snapshot {0}"
"#;
    Scenario::new()
        .args(&["v1.2"])
        .run(yaml)
        .await
        .assert_success()
        .assert_stdout("release v1.2\n");
    Scenario::new()
        .args(&["main"])
        .run(yaml)
        .await
        .assert_success()
        .assert_stdout("snapshot main\n");
}

#[tokio::test]
async fn test_branch_steps_run_in_order() {
    let yaml = r#"
if:
  condition: true
  then:
    - echo: one
    - assign: {stage: two}
    - echo: "{usr.stage}"
"#;
    let result = Scenario::new().run(yaml).await;
    result.assert_success().assert_stdout("one\ntwo\n");
    assert_eq!(result.variable("stage").as_deref(), Some("two"));
}

#[tokio::test]
async fn test_require_inside_branch_gates_the_run() {
    let yaml = r#"
pipeline:
  - if:
      condition: {neq: ["{config.force}", "True"]}
      then:
        - require: {eq: ["{0}", "confirmed"]}
  - echo: done
"#;
    Scenario::new()
        .args(&["nope"])
        .run(yaml)
        .await
        .assert_gated()
        .assert_stdout("");
    Scenario::new()
        .args(&["nope"])
        .force()
        .run(yaml)
        .await
        .assert_success()
        .assert_stdout("done\n");
}
