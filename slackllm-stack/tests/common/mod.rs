// Not every helper is used in every test file, so we allow dead code
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use serde_json::Value;
use slackllm_stack::{StackConfig, StackParameters, TemplateRevision};
use tempfile::TempDir;

/// Minimal function source tree for asset planning
pub fn source_fixture() -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    fs::write(
        dir.path().join("slackllm.py"),
        "def lambda_handler(event, context):\n    return {\"statusCode\": 200}\n",
    )
    .expect("write handler");
    fs::write(dir.path().join("requirements.txt"), "slack-bolt==1.18.0\n")
        .expect("write requirements");
    dir
}

/// Revision preset pointed at the fixture source tree
pub fn config_for(revision: TemplateRevision, code_dir: &Path) -> StackConfig {
    let mut config = StackConfig::for_revision(revision);
    config.code_dir = code_dir.to_path_buf();
    config
}

/// Synthesizes and parses the template body back into JSON
pub fn synthesize_template(config: &StackConfig, parameters: &StackParameters) -> Value {
    let stack = config
        .synthesize(parameters)
        .expect("synthesis should succeed");
    let body = stack.template_json().expect("template serializes");
    serde_json::from_str(&body).expect("template body is valid JSON")
}

/// Properties block of the compute function resource
pub fn function_properties(template: &Value) -> &Value {
    &template["Resources"]["Slackllm"]["Properties"]
}

/// Policy statements granted to the function's role, regardless of
/// identity model
pub fn grant_statements(template: &Value) -> Vec<Value> {
    let resources = &template["Resources"];
    let document = if resources.get("SlackllmRole").is_some() {
        &resources["SlackllmRole"]["Properties"]["Policies"][0]["PolicyDocument"]
    } else {
        &resources["SlackllmServiceRoleDefaultPolicy"]["Properties"]["PolicyDocument"]
    };
    document["Statement"]
        .as_array()
        .expect("policy document has statements")
        .clone()
}

/// The statement tagged with `sid`
pub fn statement_with_sid<'a>(statements: &'a [Value], sid: &str) -> &'a Value {
    statements
        .iter()
        .find(|statement| statement["Sid"] == sid)
        .unwrap_or_else(|| panic!("no statement with sid {sid}"))
}
