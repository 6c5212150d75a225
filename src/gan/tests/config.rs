use crate::assert_err;
use crate::config::ConfigError;
use crate::gan::GanConfig;

#[test]
fn test_gan_config_defaults() {
    let config = GanConfig::default();
    assert_eq!(config.input_size, 784);
    assert_eq!(config.z_size, 100);
    assert_eq!(config.g_hidden_size, 128);
    assert_eq!(config.d_hidden_size, 128);
    assert_eq!(config.alpha, 0.01);
    assert_eq!(config.smooth, 0.1);
    assert_eq!(config.learning_rate, 0.002);
    assert_eq!(config.beta1, 0.5);
    assert!(config.validate().is_ok());
}

#[test]
fn test_gan_config_json() -> Result<(), ConfigError> {
    let config = GanConfig::from_json_str(r#"{"z_size": 16, "smooth": 0.0}"#)?;
    assert_eq!(config.z_size, 16);
    assert_eq!(config.smooth, 0.0);
    assert_eq!(GanConfig::from_json_str(&config.to_json_string()?)?, config);

    assert_err!(
        GanConfig::from_json_str(r#"{"smooth": 1.0}"#),
        ConfigError::Invalid(_)
    );
    assert_err!(
        GanConfig::from_json_str(r#"{"alpha": -0.2}"#),
        ConfigError::Invalid(_)
    );
    assert_err!(
        GanConfig::from_json_str(r#"{"learning_rate": 0}"#),
        ConfigError::Invalid(_)
    );
    Ok(())
}
