//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
[data]
dir = prices
ledger = transactions.txt

[strategy]
fast_window = 20
volume_multiplier = 1.25

[simulation]
initial_cash = 10000.0
activation_date = 2025-04-02
"#;

    #[test]
    fn from_string_reads_sections() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_string("data", "dir"), Some("prices".to_string()));
        assert_eq!(
            adapter.get_string("simulation", "activation_date"),
            Some("2025-04-02".to_string())
        );
    }

    #[test]
    fn get_string_missing_key_is_none() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_string("data", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "dir"), None);
    }

    #[test]
    fn get_int_value_and_default() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_int("strategy", "fast_window", 0), 20);
        assert_eq!(adapter.get_int("strategy", "slow_window", 90), 90);
    }

    #[test]
    fn get_int_non_numeric_falls_back() {
        let adapter =
            FileConfigAdapter::from_string("[strategy]\nfast_window = many\n").unwrap();
        assert_eq!(adapter.get_int("strategy", "fast_window", 20), 20);
    }

    #[test]
    fn get_double_value_and_default() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_double("strategy", "volume_multiplier", 0.0), 1.25);
        assert_eq!(adapter.get_double("simulation", "commission_rate", 0.0002), 0.0002);
    }

    #[test]
    fn from_file_reads_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", SAMPLE).unwrap();
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_double("simulation", "initial_cash", 0.0),
            10_000.0
        );
    }

    #[test]
    fn from_file_missing_file_is_an_error() {
        assert!(FileConfigAdapter::from_file("/nonexistent/crosstrader.ini").is_err());
    }
}
