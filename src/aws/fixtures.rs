//! Canned AWS CLI responses shared by tests.

pub(crate) const IDENTITY_JSON: &str = r#"{
    "UserId": "AROAEXAMPLE:jane",
    "Account": "123456789012",
    "Arn": "arn:aws:sts::123456789012:assumed-role/AWSReservedSSO_Admin/jane"
}"#;

pub(crate) const ASSUME_ROLE_JSON: &str = r#"{
    "Credentials": {
        "AccessKeyId": "ASIAEXAMPLE",
        "SecretAccessKey": "secret/key+value",
        "SessionToken": "token==",
        "Expiration": "2025-06-01T13:00:00+00:00"
    },
    "AssumedRoleUser": {
        "AssumedRoleId": "AROAEXAMPLE:dev-session",
        "Arn": "arn:aws:sts::123456789012:assumed-role/Deployer/dev-session"
    }
}"#;

pub(crate) const SECOND_ASSUME_ROLE_JSON: &str = r#"{
    "Credentials": {
        "AccessKeyId": "ASIASECOND",
        "SecretAccessKey": "second-secret",
        "SessionToken": "second-token",
        "Expiration": "2025-06-01T14:30:00Z"
    }
}"#;
