use crate::config::CONFIG_FILE_NAME;
use crate::*;
use pretty_assertions::assert_eq;

#[test]
fn test_defaults() {
    let config = AssistConfig::default();

    assert_eq!(config.format.declaration, DeclarationKeyword::Const);
    assert!(config.format.end_with_semicolon);
    assert_eq!(config.format.placeholder_name, "val");
    assert_eq!(config.resolver.placeholder_type, "any");
    assert_eq!(config.resolver.max_alias_depth, 64);
    assert_eq!(config.resolver.generic_arguments, GenericArgumentPolicy::FirstWins);
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let config = AssistConfig::from_toml_str(
        r#"
[format]
declaration = "let"
end_with_semicolon = false

[resolver]
generic_arguments = "reject-conflicts"
"#,
    )
    .unwrap();

    assert_eq!(config.format.declaration, DeclarationKeyword::Let);
    assert!(!config.format.end_with_semicolon);
    assert_eq!(config.format.placeholder_name, "val");
    assert_eq!(
        config.resolver.generic_arguments,
        GenericArgumentPolicy::RejectConflicts
    );
    assert_eq!(config.resolver.max_alias_depth, 64);
}

#[test]
fn test_unknown_keys_are_rejected() {
    let error = AssistConfig::from_toml_str("[format]\nquote_style = \"single\"\n").unwrap_err();

    assert!(matches!(error, ConfigError::Invalid(_)));
}

#[test]
fn test_zero_alias_depth_is_rejected() {
    let error = AssistConfig::from_toml_str("[resolver]\nmax_alias_depth = 0\n").unwrap_err();
    assert!(matches!(error, ConfigError::Invalid(_)));

    let config = AssistConfig::from_toml_str("[resolver]\nmax_alias_depth = 1\n").unwrap();
    assert_eq!(config.resolver.max_alias_depth, 1);
}

#[test]
fn test_declaration_keyword_from_str() {
    assert_eq!("var".parse::<DeclarationKeyword>(), Ok(DeclarationKeyword::Var));
    assert!("static".parse::<DeclarationKeyword>().is_err());
    assert_eq!(DeclarationKeyword::Let.to_string(), "let");
}

#[test]
fn test_discover_without_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();

    assert_eq!(AssistConfig::discover(dir.path()).unwrap(), AssistConfig::default());
}

#[test]
fn test_discover_reads_config_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "[resolver]\nplaceholder_type = \"unknown\"\nmax_alias_depth = 8\n",
    )
    .unwrap();

    let config = AssistConfig::discover(dir.path()).unwrap();

    assert_eq!(config.resolver.placeholder_type, "unknown");
    assert_eq!(config.resolver.max_alias_depth, 8);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    match AssistConfig::load(&path).unwrap_err() {
        ConfigError::Io { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("Expected io error, got {:?}", other),
    }
}
