//! Project and user configuration.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use jiff::tz::TimeZone;
use serde::Deserialize;

const CONFIG_DIR: &str = ".tasklane";
const CONFIG_FILE: &str = "config.toml";
const STORE_FILE: &str = "tasks.json";
const USER_CONFIG_DIR: &str = "tasklane";

/// Configuration loaded from `.tasklane/config.toml`.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Email of the user whose tasks are listed and written.
    #[serde(default)]
    owner_email: Option<String>,
    /// IANA time zone used for "due today" (defaults to the system zone).
    #[serde(default)]
    time_zone: Option<String>,
    #[serde(default)]
    store: StoreConfig,
    #[serde(skip)]
    base_dir: PathBuf,
}

/// `[store]` block.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    #[serde(default)]
    path: Option<PathBuf>,
}

impl AppConfig {
    /// Load the project configuration under `dir`, falling back to the user
    /// configuration directory, then to defaults.
    ///
    /// # Errors
    /// Returns an error when a configuration file exists but cannot be read,
    /// parsed or validated.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_user_config(dir.as_ref(), user_config_path().as_deref())
    }

    fn load_with_user_config(dir: &Path, user_config: Option<&Path>) -> Result<Self> {
        let project = dir.join(CONFIG_DIR).join(CONFIG_FILE);
        if project.exists() {
            return Self::from_file(&project, dir);
        }
        if let Some(user) = user_config
            && user.exists()
        {
            return Self::from_file(user, dir);
        }
        Ok(Self::with_base_dir(dir))
    }

    fn with_base_dir(dir: &Path) -> Self {
        Self {
            base_dir: dir.to_path_buf(),
            ..Self::default()
        }
    }

    fn from_file(path: &Path, base_dir: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        let mut config: Self =
            toml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))?;
        base_dir.clone_into(&mut config.base_dir);
        config
            .validate()
            .with_context(|| format!("invalid configuration in {}", path.display()))?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some(email) = &self.owner_email {
            validate_owner_email(email)?;
        }
        self.resolve_time_zone()?;
        Ok(())
    }

    /// Configured owner email, if any.
    #[must_use]
    pub fn owner_email(&self) -> Option<&str> {
        self.owner_email.as_deref()
    }

    /// Override the owner email (e.g. from a command-line flag).
    ///
    /// # Errors
    /// Returns an error when the email is blank or lacks an `@`.
    pub fn set_owner_email(&mut self, email: impl Into<String>) -> Result<()> {
        let email = email.into();
        validate_owner_email(&email)?;
        self.owner_email = Some(email);
        Ok(())
    }

    /// Override the store file path.
    pub fn set_store_path(&mut self, path: impl Into<PathBuf>) {
        self.store.path = Some(path.into());
    }

    /// Store file path; relative paths resolve against the project directory.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        match &self.store.path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => self.base_dir.join(path),
            None => self.base_dir.join(CONFIG_DIR).join(STORE_FILE),
        }
    }

    /// Time zone for day boundaries.
    ///
    /// # Errors
    /// Returns an error when the configured name is not a known IANA zone.
    pub fn resolve_time_zone(&self) -> Result<TimeZone> {
        match self.time_zone.as_deref() {
            None => Ok(TimeZone::system()),
            Some(name) => {
                TimeZone::get(name).with_context(|| format!("unknown time zone '{name}'"))
            }
        }
    }
}

fn validate_owner_email(email: &str) -> Result<()> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        bail!("owner email must not be empty");
    }
    if !trimmed.contains('@') {
        bail!("owner email '{trimmed}' must contain '@'");
    }
    Ok(())
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(USER_CONFIG_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_config(dir: &Path, body: &str) -> Result<()> {
        let cfg_dir = dir.join(CONFIG_DIR);
        fs::create_dir_all(&cfg_dir)?;
        let mut file = fs::File::create(cfg_dir.join(CONFIG_FILE))?;
        writeln!(file, "{body}")?;
        Ok(())
    }

    fn project_only(dir: &Path) -> Result<AppConfig> {
        AppConfig::load_with_user_config(dir, None)
    }

    fn write_user_config(dir: &Path, body: &str) -> Result<PathBuf> {
        let path = dir.join(USER_CONFIG_DIR).join(CONFIG_FILE);
        fs::create_dir_all(dir.join(USER_CONFIG_DIR))?;
        fs::write(&path, body)?;
        Ok(path)
    }

    #[test]
    fn user_config_applies_without_project_file() -> Result<()> {
        let project = tempdir()?;
        let home = tempdir()?;
        let user = write_user_config(
            home.path(),
            "owner_email = \"carol@example.com\"\n[store]\npath = \"shared.json\"",
        )?;

        let cfg = AppConfig::load_with_user_config(project.path(), Some(&user))?;
        assert_eq!(cfg.owner_email(), Some("carol@example.com"));
        assert_eq!(cfg.store_path(), project.path().join("shared.json"));
        Ok(())
    }

    #[test]
    fn project_config_shadows_user_config() -> Result<()> {
        let project = tempdir()?;
        let home = tempdir()?;
        let user = write_user_config(home.path(), "owner_email = \"carol@example.com\"")?;
        write_config(project.path(), "owner_email = \"dave@example.com\"")?;

        let cfg = AppConfig::load_with_user_config(project.path(), Some(&user))?;
        assert_eq!(cfg.owner_email(), Some("dave@example.com"));
        Ok(())
    }

    #[test]
    fn invalid_user_config_is_reported() -> Result<()> {
        let project = tempdir()?;
        let home = tempdir()?;
        let user = write_user_config(home.path(), "time_zone = \"Nowhere/Atlantis\"")?;

        let Err(err) = AppConfig::load_with_user_config(project.path(), Some(&user)) else {
            panic!("invalid user config should error");
        };
        assert!(format!("{err:#}").contains(&user.display().to_string()));
        Ok(())
    }

    #[test]
    fn missing_user_config_falls_back_to_defaults() -> Result<()> {
        let project = tempdir()?;
        let home = tempdir()?;
        let absent = home.path().join(USER_CONFIG_DIR).join(CONFIG_FILE);

        let cfg = AppConfig::load_with_user_config(project.path(), Some(&absent))?;
        assert!(cfg.owner_email().is_none());
        assert_eq!(
            cfg.store_path(),
            project.path().join(".tasklane").join("tasks.json")
        );
        Ok(())
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let dir = tempdir()?;
        let cfg = project_only(dir.path())?;
        assert!(cfg.owner_email().is_none());
        assert_eq!(
            cfg.store_path(),
            dir.path().join(".tasklane").join("tasks.json")
        );
        Ok(())
    }

    #[test]
    fn load_full_config() -> Result<()> {
        let dir = tempdir()?;
        write_config(
            dir.path(),
            "owner_email = \"alice@example.com\"\ntime_zone = \"Asia/Tokyo\"\n[store]\npath = \"data/tasks.json\"",
        )?;

        let cfg = project_only(dir.path())?;
        assert_eq!(cfg.owner_email(), Some("alice@example.com"));
        assert_eq!(cfg.store_path(), dir.path().join("data").join("tasks.json"));
        assert_eq!(cfg.resolve_time_zone()?.iana_name(), Some("Asia/Tokyo"));
        Ok(())
    }

    #[test]
    fn unknown_time_zone_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        write_config(dir.path(), "time_zone = \"Mars/Olympus\"")?;

        let Err(err) = project_only(dir.path()) else {
            panic!("unknown zone should error");
        };
        assert!(format!("{err:#}").contains("unknown time zone 'Mars/Olympus'"));
        Ok(())
    }

    #[test]
    fn owner_email_must_look_like_an_email() -> Result<()> {
        let dir = tempdir()?;
        write_config(dir.path(), "owner_email = \"alice\"")?;

        let Err(err) = project_only(dir.path()) else {
            panic!("invalid email should error");
        };
        assert!(format!("{err:#}").contains("must contain '@'"));

        let mut cfg = AppConfig::default();
        assert!(cfg.set_owner_email("  ").is_err());
        cfg.set_owner_email("bob@example.com")?;
        assert_eq!(cfg.owner_email(), Some("bob@example.com"));
        Ok(())
    }

    #[test]
    fn unknown_keys_are_rejected() -> Result<()> {
        let dir = tempdir()?;
        write_config(dir.path(), "ownerEmail = \"alice@example.com\"")?;
        assert!(project_only(dir.path()).is_err());
        Ok(())
    }

    #[test]
    fn absolute_store_override_wins() -> Result<()> {
        let dir = tempdir()?;
        let mut cfg = project_only(dir.path())?;
        let absolute = dir.path().join("elsewhere.json");
        cfg.set_store_path(&absolute);
        assert_eq!(cfg.store_path(), absolute);
        Ok(())
    }
}
