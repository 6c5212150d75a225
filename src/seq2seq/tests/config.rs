/*
 * @Author       : 老董
 * @Description  : seq2seq 配置测试
 */

use crate::assert_err;
use crate::config::ConfigError;
use crate::seq2seq::Seq2SeqConfig;

#[test]
fn test_default_config_is_valid() {
    assert!(Seq2SeqConfig::default().validate().is_ok());
    assert!(Seq2SeqConfig::tiny().validate().is_ok());
}

#[test]
fn test_partial_json_uses_defaults() -> Result<(), ConfigError> {
    let config = Seq2SeqConfig::from_json_str(r#"{"rnn_size": 32, "keep_probability": 0.75}"#)?;
    assert_eq!(config.rnn_size, 32);
    assert_eq!(config.keep_probability, 0.75);
    assert_eq!(config.num_layers, Seq2SeqConfig::default().num_layers);

    let json = config.to_json_string()?;
    assert_eq!(Seq2SeqConfig::from_json_str(&json)?, config);
    Ok(())
}

#[test]
fn test_invalid_config() {
    assert_err!(
        Seq2SeqConfig::from_json_str(r#"{"keep_probability": 1.5}"#),
        ConfigError::Invalid(_)
    );
    assert_err!(
        Seq2SeqConfig::from_json_str(r#"{"num_layers": 0}"#),
        ConfigError::Invalid(_)
    );
    assert_err!(
        Seq2SeqConfig::from_json_str(r#"{"rnn_size": "big"}"#),
        ConfigError::Json(_)
    );
    assert_err!(
        Seq2SeqConfig::from_json_file("/nonexistent/seq2seq.json"),
        ConfigError::Io(_)
    );
}
