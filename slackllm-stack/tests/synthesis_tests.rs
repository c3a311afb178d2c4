mod common;

use common::{
    config_for, function_properties, grant_statements, source_fixture, statement_with_sid,
    synthesize_template,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use slackllm_stack::parameters::ParameterError;
use slackllm_stack::stack::{SynthesisError, MODEL_CATALOG};
use slackllm_stack::{StackParameters, TemplateRevision};

#[test]
fn test_default_parameters_synthesize_the_published_template() {
    let code = source_fixture();
    let config = config_for(TemplateRevision::Revised, code.path());
    let template = synthesize_template(&config, &StackParameters::default());

    let function = function_properties(&template);
    assert_eq!(function["FunctionName"], json!("Slackllm"));
    assert_eq!(function["Runtime"], json!("python3.12"));
    assert_eq!(function["Handler"], json!("slackllm.lambda_handler"));
    assert_eq!(function["Architectures"], json!(["arm64"]));
    assert_eq!(function["MemorySize"], json!(512));
    assert_eq!(function["Timeout"], json!(300));
    assert_eq!(function["ReservedConcurrentExecutions"], json!(10));

    let variables = &function["Environment"]["Variables"];
    assert_eq!(
        variables["SLACK_BOT_TOKEN"],
        json!("{{resolve:secretsmanager:slackllm:SecretString:SLACK_BOT_TOKEN}}")
    );
    assert_eq!(
        variables["SLACK_SIGNING_SECRET"],
        json!("{{resolve:secretsmanager:slackllm:SecretString:SLACK_SIGNING_SECRET}}")
    );
    assert_eq!(variables["BEDROCK_MODEL_ID"], json!(MODEL_CATALOG[0]));
    assert_eq!(variables["DYNAMODB_TABLE_NAME"], json!({ "Ref": "SlackllmTable" }));
}

#[test]
fn test_environment_carries_exactly_the_contract_keys() {
    let code = source_fixture();
    let config = config_for(TemplateRevision::Revised, code.path());
    let template = synthesize_template(&config, &StackParameters::default());

    let keys: Vec<&str> = function_properties(&template)["Environment"]["Variables"]
        .as_object()
        .expect("environment variables object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(
        keys,
        vec![
            "BEDROCK_MODEL_ID",
            "DYNAMODB_TABLE_NAME",
            "SLACK_BOT_TOKEN",
            "SLACK_SIGNING_SECRET",
        ]
    );
}

#[test]
fn test_secrets_name_flows_into_every_credential_reference() {
    let code = source_fixture();
    let config = config_for(TemplateRevision::Revised, code.path());
    let parameters = StackParameters {
        secrets_name: "prod/slackllm".to_string(),
        memory_size: 1024,
    };
    let template = synthesize_template(&config, &parameters);

    let variables = &function_properties(&template)["Environment"]["Variables"];
    assert_eq!(
        variables["SLACK_BOT_TOKEN"],
        json!("{{resolve:secretsmanager:prod/slackllm:SecretString:SLACK_BOT_TOKEN}}")
    );
    assert_eq!(
        variables["SLACK_SIGNING_SECRET"],
        json!("{{resolve:secretsmanager:prod/slackllm:SecretString:SLACK_SIGNING_SECRET}}")
    );
}

#[test]
fn test_memory_size_is_carried_verbatim() {
    let code = source_fixture();

    let config = config_for(TemplateRevision::Revised, code.path());
    for memory_size in [128, 512, 2048] {
        let parameters = StackParameters {
            memory_size,
            ..StackParameters::default()
        };
        let template = synthesize_template(&config, &parameters);
        assert_eq!(function_properties(&template)["MemorySize"], json!(memory_size));
    }

    let initial = config_for(TemplateRevision::Initial, code.path());
    let parameters = StackParameters {
        memory_size: 10240,
        ..StackParameters::default()
    };
    let template = synthesize_template(&initial, &parameters);
    assert_eq!(function_properties(&template)["MemorySize"], json!(10240));
}

#[test]
fn test_memory_out_of_bounds_is_rejected_before_synthesis() {
    // The code directory does not exist, so reaching asset planning
    // would fail with a different error: bounds are checked first.
    let config = config_for(
        TemplateRevision::Revised,
        std::path::Path::new("/nonexistent/slackllm-src"),
    );

    for memory_size in [64, 127, 2049, 4096] {
        let parameters = StackParameters {
            memory_size,
            ..StackParameters::default()
        };
        let err = config.synthesize(&parameters).unwrap_err();
        assert!(matches!(
            err,
            SynthesisError::Parameter(ParameterError::MemorySizeOutOfRange { .. })
        ));
    }

    let initial = config_for(
        TemplateRevision::Initial,
        std::path::Path::new("/nonexistent/slackllm-src"),
    );
    for memory_size in [127, 10241] {
        let parameters = StackParameters {
            memory_size,
            ..StackParameters::default()
        };
        let err = initial.synthesize(&parameters).unwrap_err();
        assert!(matches!(
            err,
            SynthesisError::Parameter(ParameterError::MemorySizeOutOfRange { .. })
        ));
    }
}

#[test]
fn test_revised_ceiling_rejects_what_the_initial_revision_accepted() {
    let code = source_fixture();
    let parameters = StackParameters {
        memory_size: 3000,
        ..StackParameters::default()
    };

    let initial = config_for(TemplateRevision::Initial, code.path());
    assert!(initial.synthesize(&parameters).is_ok());

    let revised = config_for(TemplateRevision::Revised, code.path());
    let err = revised.synthesize(&parameters).unwrap_err();
    assert!(matches!(
        err,
        SynthesisError::Parameter(ParameterError::MemorySizeOutOfRange {
            value: 3000,
            min: 128,
            max: 2048,
        })
    ));
}

#[test]
fn test_partition_key_is_always_user_id() {
    let code = source_fixture();
    let parameters = StackParameters {
        secrets_name: "external-bundle".to_string(),
        memory_size: 999,
    };

    for revision in [TemplateRevision::Initial, TemplateRevision::Revised] {
        let config = config_for(revision, code.path());
        let template = synthesize_template(&config, &parameters);
        let table = &template["Resources"]["SlackllmTable"]["Properties"];
        assert_eq!(
            table["AttributeDefinitions"],
            json!([{ "AttributeName": "user_id", "AttributeType": "S" }])
        );
        assert_eq!(
            table["KeySchema"],
            json!([{ "AttributeName": "user_id", "KeyType": "HASH" }])
        );
    }
}

#[test]
fn test_grants_cover_model_self_invoke_and_table_access() {
    let code = source_fixture();

    for revision in [TemplateRevision::Initial, TemplateRevision::Revised] {
        let config = config_for(revision, code.path());
        let template = synthesize_template(&config, &StackParameters::default());
        let statements = grant_statements(&template);

        let model = statement_with_sid(&statements, "AllowBedrockInvoke");
        assert_eq!(model["Action"], json!(["bedrock:InvokeModel"]));

        let self_invoke = statement_with_sid(&statements, "AllowLambdaSelfInvoke");
        assert_eq!(self_invoke["Action"], json!(["lambda:InvokeFunction"]));

        let table = statement_with_sid(&statements, "AllowTableReadWrite");
        let actions = table["Action"].as_array().expect("table actions");
        for action in ["dynamodb:GetItem", "dynamodb:PutItem", "dynamodb:UpdateItem", "dynamodb:Query"] {
            assert!(actions.contains(&json!(action)), "missing {action}");
        }
        assert_eq!(
            table["Resource"],
            json!([{ "Fn::GetAtt": ["SlackllmTable", "Arn"] }])
        );
    }
}

#[test]
fn test_model_grant_is_scoped_to_the_catalog() {
    let code = source_fixture();
    let config = config_for(TemplateRevision::Revised, code.path());
    let template = synthesize_template(&config, &StackParameters::default());

    let statements = grant_statements(&template);
    let model = statement_with_sid(&statements, "AllowBedrockInvoke");
    assert_eq!(model["Resource"], json!(MODEL_CATALOG));
    assert!(!model["Resource"]
        .as_array()
        .expect("model resources")
        .contains(&json!("*")));
}

#[test]
fn test_synthesis_is_idempotent() {
    let code = source_fixture();
    let config = config_for(TemplateRevision::Revised, code.path());
    let parameters = StackParameters::default();

    let first = config.synthesize(&parameters).expect("first synthesis");
    let second = config.synthesize(&parameters).expect("second synthesis");

    assert_eq!(
        first.template_json().expect("first template"),
        second.template_json().expect("second template")
    );
    assert_eq!(
        first.assets_json().expect("first manifest"),
        second.assets_json().expect("second manifest")
    );
}

#[test]
fn test_output_surfaces_the_function_url() {
    let code = source_fixture();

    for revision in [TemplateRevision::Initial, TemplateRevision::Revised] {
        let config = config_for(revision, code.path());
        let template = synthesize_template(&config, &StackParameters::default());
        assert_eq!(
            template["Outputs"]["SlackllmUrl"]["Value"],
            json!({ "Fn::GetAtt": ["SlackllmFunctionUrl", "FunctionUrl"] })
        );
    }
}
