use super::*;

fn parse(args: &[&str]) -> Cli {
    let mut argv = vec!["sheetdesk-cli"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

// =============================================================================
// ARGUMENTS
// =============================================================================

#[test]
fn global_flags_are_parsed() {
    let cli = parse(&["--base-url", "http://host:8080/", "--token", "abc", "ping"]);
    assert_eq!(cli.base_url, "http://host:8080/");
    assert_eq!(cli.token.as_deref(), Some("abc"));
    assert!(matches!(cli.command, Command::Ping));
}

#[test]
fn login_requires_email_and_password() {
    let argv = ["sheetdesk-cli", "login", "--email", "a@b.c"];
    assert!(Cli::try_parse_from(argv).is_err());
}

// =============================================================================
// PLAN
// =============================================================================

#[test]
fn user_commands_map_to_user_endpoints() {
    let get = plan(&parse(&["user", "get", "7"]).command).unwrap();
    assert_eq!(get, ApiCall::new(reqwest::Method::GET, "/api/users/7", None));

    let list = plan(&parse(&["user", "list"]).command).unwrap();
    assert_eq!(list.path, "/api/users");
}

#[test]
fn file_reads_map_to_listing_and_records() {
    assert_eq!(plan(&parse(&["file", "list"]).command).unwrap().path, "/api/excel/files");
    assert_eq!(plan(&parse(&["file", "records"]).command).unwrap().path, "/api/excel/excel");
}

#[test]
fn file_mutations_carry_method_and_body() {
    let create = plan(&parse(&["file", "create", "--name", " q3.xlsx "]).command).unwrap();
    assert_eq!(create.method, reqwest::Method::POST);
    assert_eq!(create.path, "/api/excel/create");
    assert_eq!(create.body, Some(json!({ "filename": "q3.xlsx", "name": "q3.xlsx" })));

    let update = plan(&parse(&["file", "update", "4", "--name", "q4.xlsx"]).command).unwrap();
    assert_eq!(update.method, reqwest::Method::PATCH);
    assert_eq!(update.path, "/api/excel/update/4");

    let delete = plan(&parse(&["file", "delete", "4"]).command).unwrap();
    assert_eq!(delete, ApiCall::new(reqwest::Method::DELETE, "/api/excel/delete/4", None));
}

#[test]
fn ping_and_login_have_no_plan() {
    assert!(plan(&parse(&["ping"]).command).is_none());
    assert!(plan(&parse(&["login", "--email", "a", "--password", "b"]).command).is_none());
}

// =============================================================================
// LOGIN RESPONSE
// =============================================================================

#[test]
fn session_token_accepts_each_spelling() {
    assert_eq!(session_token(&json!({ "token": "t1" })).unwrap(), "t1");
    assert_eq!(session_token(&json!({ "access_token": "t2" })).unwrap(), "t2");
    assert_eq!(session_token(&json!({ "accessToken": "t3" })).unwrap(), "t3");
    assert!(matches!(session_token(&json!({ "user": {} })), Err(CliError::MissingField("token"))));
}
