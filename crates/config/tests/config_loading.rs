//! Integration tests for config file loading and variable layering

#![allow(clippy::unwrap_used, clippy::panic)]

use dotweave_config::{Config, ConflictPolicy};
use dotweave_core::platform::CURRENT_PLATFORM;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_full_config_file() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
[general]
srcDir = "dotfiles"
dstDir = "/home/tester"
templateSuffix = ".j2"
conflict = "overwrite"

[templates]
"zshrc.j2" = ""
"gitconfig.j2" = "~/.config/git/config"
"hosts.j2" = "/etc/hosts"

[variables]
email = "me@example.com"

[ui]
contextLines = 5
color = false
"#,
    )
    .unwrap();

    let config = Config::load(&config_path).unwrap();

    assert_eq!(config.source_dir().unwrap(), temp.path().join("dotfiles"));
    assert_eq!(config.dest_dir().unwrap(), std::path::Path::new("/home/tester"));
    assert_eq!(config.general.template_suffix, ".j2");
    assert_eq!(config.general.conflict, ConflictPolicy::AutoOverwrite);
    assert_eq!(config.ui.context_lines, 5);
    assert!(!config.ui.color);

    // Table order is kept
    let names: Vec<_> = config.templates.keys().map(String::as_str).collect();
    assert_eq!(names, ["zshrc.j2", "gitconfig.j2", "hosts.j2"]);
}

#[test]
fn test_variable_files_layer_under_config_variables() {
    let temp = TempDir::new().unwrap();
    let vars = temp.path().join(".dotweave/variables");
    let platform_vars = vars.join(CURRENT_PLATFORM.os);
    fs::create_dir_all(&platform_vars).unwrap();

    fs::write(
        vars.join("git.toml"),
        "email = \"common@example.com\"\nsigning = false\n",
    )
    .unwrap();
    fs::write(platform_vars.join("git.toml"), "signing = true\n").unwrap();
    fs::write(vars.join("shell.toml"), "name = \"zsh\"\n").unwrap();

    let mut config = Config::from_toml_str(
        "[variables]\ngit = { email = \"config@example.com\" }\n",
        temp.path(),
    )
    .unwrap();
    config.merge_source_variables(temp.path()).unwrap();

    assert_eq!(
        config.variables.get("git"),
        Some(&json!({"email": "config@example.com", "signing": true}))
    );
    assert_eq!(config.variables.get("shell"), Some(&json!({"name": "zsh"})));
}

#[test]
fn test_invalid_variable_file_is_an_error() {
    let temp = TempDir::new().unwrap();
    let vars = temp.path().join(".dotweave/variables");
    fs::create_dir_all(&vars).unwrap();
    fs::write(vars.join("broken.toml"), "this is = = not toml").unwrap();

    let mut config = Config::default();
    assert!(config.merge_source_variables(temp.path()).is_err());
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let temp = TempDir::new().unwrap();
    assert!(Config::discover(Some(temp.path().join("absent.toml").as_path())).is_err());
}
