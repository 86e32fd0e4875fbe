// tests/config_loading.rs
use diet_sentiment_annotator::config::{AnnotatorConfig, ENV_CONFIG_PATH};
use diet_sentiment_annotator::AnnotateError;
use std::{env, fs};

#[serial_test::serial]
#[test]
fn load_uses_env_then_default_path_then_builtins() {
    // Isolate CWD so the repo's own config/ is not read
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    env::remove_var(ENV_CONFIG_PATH);

    // 1) nothing on disk -> built-in values
    let c = AnnotatorConfig::load().unwrap();
    assert_eq!(c.negation.window, 3);

    // 2) ./config/annotator.toml
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(cfg_dir.join("annotator.toml"), "[negation]\nwindow = 4\n").unwrap();
    assert_eq!(AnnotatorConfig::load().unwrap().negation.window, 4);

    // 3) env var wins
    let p_env = tmp.path().join("other.toml");
    fs::write(&p_env, "[sampling]\nseed = 99\n").unwrap();
    env::set_var(ENV_CONFIG_PATH, p_env.display().to_string());
    let c = AnnotatorConfig::load().unwrap();
    assert_eq!(c.sampling.seed, 99);
    assert_eq!(c.negation.window, 3);

    // 4) env var pointing nowhere is an error, not a silent fallback
    env::set_var(ENV_CONFIG_PATH, tmp.path().join("missing.toml").display().to_string());
    assert!(matches!(AnnotatorConfig::load(), Err(AnnotateError::Config(_))));

    env::remove_var(ENV_CONFIG_PATH);
    env::set_current_dir(&old).unwrap();
}

#[test]
fn shipped_config_parses() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/annotator.toml");
    let c = AnnotatorConfig::load_from(std::path::Path::new(path)).unwrap();
    assert_eq!(c.sampling.per_cell, 25);
    assert_eq!(c.sampling.seed, 42);
    assert!(!c.sentiment.positive.is_empty());
}

#[test]
fn bad_regex_is_reported_with_its_category() {
    let cfg = AnnotatorConfig::from_toml_str("[diets.patterns]\nketo = ['(keto']\n").unwrap();
    let err = diet_sentiment_annotator::Annotator::new(&cfg).unwrap_err();
    match err {
        AnnotateError::Pattern { diet, pattern, .. } => {
            assert_eq!(diet, "keto");
            assert_eq!(pattern, "(keto");
        }
        other => panic!("unexpected: {other}"),
    }
}
