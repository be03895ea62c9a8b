use crate::config::policy::SchedulePolicy;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

pub mod policy;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    pub policy_file: String,
    #[serde(default = "default_source")]
    pub default_source: String,
}

fn default_source() -> String {
    "cli".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            policy_file: Self::policy_file().to_string_lossy().to_string(),
            default_source: default_source(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = std::env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("marcaje")
        } else {
            let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            home.join(".marcaje")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("marcaje.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("marcaje.sqlite")
    }

    /// Return the full path of the attendance policy file
    pub fn policy_file() -> PathBuf {
        Self::config_dir().join("policy.yml")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> Self {
        let path = Self::config_file();

        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
                Err(_) => Config::default(),
            }
        } else {
            Config::default()
        }
    }

    /// Load and validate the attendance policy. A missing or malformed
    /// policy file is a configuration error: the clock attempt must be
    /// refused and the user directed to an administrator.
    pub fn load_policy(&self) -> AppResult<SchedulePolicy> {
        let path = PathBuf::from(&self.policy_file);

        if !path.exists() {
            // Fall back to built-in defaults when no policy file was
            // created yet; `init` writes one for editing.
            let policy = SchedulePolicy::default();
            policy.validate()?;
            return Ok(policy);
        }

        let content = fs::read_to_string(&path)?;
        let policy: SchedulePolicy = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("policy file {}: {}", path.display(), e)))?;
        policy.validate()?;
        Ok(policy)
    }

    /// Initialize configuration, policy file and database.
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<()> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_name {
            if crate::utils::path::is_absolute(&name) {
                PathBuf::from(&name)
            } else {
                dir.join(&name)
            }
        } else {
            dir.join("marcaje.sqlite")
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            policy_file: Self::policy_file().to_string_lossy().to_string(),
            default_source: default_source(),
        };

        // Write config + default policy files
        if !is_test {
            let yaml = serde_yaml::to_string(&config).map_err(|_| AppError::ConfigSave)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());

            if !Self::policy_file().exists() {
                let policy_yaml = serde_yaml::to_string(&SchedulePolicy::default())
                    .map_err(|_| AppError::ConfigSave)?;
                let mut pf = fs::File::create(Self::policy_file())?;
                pf.write_all(policy_yaml.as_bytes())?;
                println!("✅ Policy file: {:?}", Self::policy_file());
            }
        }

        // Create empty DB file if not exists
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(())
    }
}
