//! Runtime configuration read from the environment.

use crate::error::ConfigError;

/// Public dataset the sample is drawn from.
pub const DEFAULT_SAMPLE_SOURCE: &str =
  "https://raw.githubusercontent.com/tnhanh/data-midterm-17A/refs/heads/main/email.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  /// Relational store (`MAILSTAGE_DATABASE`).
  pub database_url: String,
  /// Staging document store (`MAILSTAGE_STAGING_DATABASE`).
  pub staging_url: String,
  /// CSV URL or path (`MAILSTAGE_SAMPLE_SOURCE`).
  pub sample_source: String,
  pub sample_size: usize,
  pub workers: usize,
  pub max_connections: u32,
}

impl Default for Config {
  fn default() -> Self {
    Config {
      database_url: "sqlite://mailstage.db".to_string(),
      staging_url: "sqlite://mailstage-staging.db".to_string(),
      sample_source: DEFAULT_SAMPLE_SOURCE.to_string(),
      sample_size: 200,
      workers: 1,
      max_connections: 5,
    }
  }
}

impl Config {
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Build from any key lookup; unset keys fall back to defaults.
  pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let d = Config::default();
    Ok(Config {
      database_url: lookup("MAILSTAGE_DATABASE").unwrap_or(d.database_url),
      staging_url: lookup("MAILSTAGE_STAGING_DATABASE").unwrap_or(d.staging_url),
      sample_source: lookup("MAILSTAGE_SAMPLE_SOURCE").unwrap_or(d.sample_source),
      sample_size: parse_num(&lookup, "MAILSTAGE_SAMPLE_SIZE", d.sample_size)?,
      workers: parse_num(&lookup, "MAILSTAGE_WORKERS", d.workers)?.max(1),
      max_connections: parse_num(&lookup, "MAILSTAGE_MAX_CONNECTIONS", d.max_connections)?.max(1),
    })
  }
}

fn parse_num<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
  F: Fn(&str) -> Option<String>,
  T: std::str::FromStr,
{
  match lookup(var) {
    None => Ok(default),
    Some(value) => value
      .trim()
      .parse()
      .map_err(|_| ConfigError::Invalid { var, value }),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
      .iter()
      .map(|(k, v)| (k.to_string(), v.to_string()))
      .collect();
    move |k| map.get(k).cloned()
  }

  #[test]
  fn unset_uses_defaults() {
    let cfg = Config::from_lookup(lookup_in(&[])).unwrap();
    assert_eq!(cfg, Config::default());
  }

  #[test]
  fn overrides_apply() {
    let cfg = Config::from_lookup(lookup_in(&[
      ("MAILSTAGE_DATABASE", "sqlite::memory:"),
      ("MAILSTAGE_SAMPLE_SIZE", " 10 "),
      ("MAILSTAGE_WORKERS", "0"),
    ]))
    .unwrap();
    assert_eq!(cfg.database_url, "sqlite::memory:");
    assert_eq!(cfg.sample_size, 10);
    assert_eq!(cfg.workers, 1);
  }

  #[test]
  fn bad_number_is_an_error() {
    let err = Config::from_lookup(lookup_in(&[("MAILSTAGE_WORKERS", "many")])).unwrap_err();
    match err {
      ConfigError::Invalid { var, value } => {
        assert_eq!(var, "MAILSTAGE_WORKERS");
        assert_eq!(value, "many");
      }
    }
  }
}
