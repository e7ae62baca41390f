use anyhow::Result;
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

const KEYRING_SERVICE: &str = "mailscribe";
const ENV_PASSWORD: &str = "MAILSCRIBE_PASSWORD";
const ENV_API_KEY: &str = "MAILSCRIBE_API_KEY";

/// A secret the tool needs at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Secret {
    /// Password (or app password) for the SMTP relay
    MailPassword,
    /// API key for the completion backend
    ApiKey,
}

impl Secret {
    fn env_var(self) -> &'static str {
        match self {
            Self::MailPassword => ENV_PASSWORD,
            Self::ApiKey => ENV_API_KEY,
        }
    }

    fn key_prefix(self) -> &'static str {
        match self {
            Self::MailPassword => "smtp",
            Self::ApiKey => "ai",
        }
    }

    fn file_prefix(self) -> &'static str {
        match self {
            Self::MailPassword => ".password_",
            Self::ApiKey => ".api_key_",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::MailPassword => "Mail password",
            Self::ApiKey => "API key",
        }
    }
}

/// Debug information about credential storage backends
#[derive(Debug, Clone)]
pub struct CredentialDebugInfo {
    pub keyring_available: bool,
    pub password_env_set: bool,
    pub api_key_env_set: bool,
    pub password_file: PathBuf,
    pub password_file_exists: bool,
    pub api_key_file: PathBuf,
    pub api_key_file_exists: bool,
}

impl std::fmt::Display for CredentialDebugInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let set = |b: bool| if b { "set" } else { "not set" };

        writeln!(f, "Credential Storage Status:")?;
        writeln!(
            f,
            "  Keyring: {}",
            if self.keyring_available {
                "available"
            } else {
                "unavailable"
            }
        )?;
        writeln!(
            f,
            "  Environment var ({}): {}",
            ENV_PASSWORD,
            set(self.password_env_set)
        )?;
        writeln!(
            f,
            "  Environment var ({}): {}",
            ENV_API_KEY,
            set(self.api_key_env_set)
        )?;
        writeln!(
            f,
            "  Password file: {} (exists: {})",
            self.password_file.display(),
            self.password_file_exists
        )?;
        writeln!(
            f,
            "  API key file: {} (exists: {})",
            self.api_key_file.display(),
            self.api_key_file_exists
        )?;
        Ok(())
    }
}

/// Looks up secrets for one sender address: env var, then keyring, then file.
pub struct CredentialStore {
    email: String,
    dir: PathBuf,
}

impl CredentialStore {
    pub fn new(email: &str) -> Self {
        let dir = crate::config::Config::config_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_dir(email, dir)
    }

    fn with_dir(email: &str, dir: PathBuf) -> Self {
        Self {
            email: email.to_string(),
            dir,
        }
    }

    fn file_path(&self, secret: Secret) -> PathBuf {
        let safe_email = self.email.replace(['@', '.', '/', '\\', ':'], "_");
        self.dir
            .join(format!("{}{}", secret.file_prefix(), safe_email))
    }

    fn keyring_key(&self, secret: Secret) -> String {
        format!("{}:{}", secret.key_prefix(), self.email)
    }

    /// Get diagnostic info about credential storage backend
    pub fn debug_info(&self) -> CredentialDebugInfo {
        let test_key = format!("test:{}", self.email);
        let keyring_available =
            if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &test_key) {
                entry.set_password("__test__").is_ok()
                    && entry.get_password().is_ok()
                    && entry.delete_credential().is_ok()
            } else {
                false
            };

        let password_file = self.file_path(Secret::MailPassword);
        let api_key_file = self.file_path(Secret::ApiKey);

        CredentialDebugInfo {
            keyring_available,
            password_env_set: Self::env_get(Secret::MailPassword).is_some(),
            api_key_env_set: Self::env_get(Secret::ApiKey).is_some(),
            password_file_exists: password_file.exists(),
            password_file,
            api_key_file_exists: api_key_file.exists(),
            api_key_file,
        }
    }

    fn env_get(secret: Secret) -> Option<String> {
        env::var(secret.env_var()).ok().filter(|s| !s.is_empty())
    }

    fn keyring_get(&self, secret: Secret) -> Option<String> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, &self.keyring_key(secret)).ok()?;
        entry.get_password().ok()
    }

    fn keyring_set(&self, secret: Secret, value: &str) -> bool {
        if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &self.keyring_key(secret)) {
            entry.set_password(value).is_ok()
        } else {
            false
        }
    }

    fn file_get(&self, secret: Secret) -> Option<String> {
        fs::read_to_string(self.file_path(secret))
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Write secret to file fallback (with restricted permissions)
    fn file_set(&self, secret: Secret, value: &str) -> Result<()> {
        let path = self.file_path(secret);
        fs::create_dir_all(&self.dir)?;

        // Create file with restricted permissions atomically to avoid TOCTOU
        #[cfg(unix)]
        {
            let mut file = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&path)?;
            file.write_all(value.as_bytes())?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&path, value)?;
        }

        Ok(())
    }

    pub fn get(&self, secret: Secret) -> Result<String> {
        // 1. Environment variable
        if let Some(value) = Self::env_get(secret) {
            return Ok(value);
        }

        // 2. Keyring
        if let Some(value) = self.keyring_get(secret) {
            return Ok(value);
        }

        // 3. File fallback
        if let Some(value) = self.file_get(secret) {
            return Ok(value);
        }

        anyhow::bail!(
            "{} not found for {}. Set {} or run 'mailscribe setup'.",
            secret.label(),
            self.email,
            secret.env_var()
        )
    }

    pub fn set(&self, secret: Secret, value: &str) -> Result<()> {
        if self.keyring_set(secret, value) && self.keyring_get(secret).is_some() {
            return Ok(());
        }

        eprintln!("Note: Keyring unavailable, using file-based storage.");
        self.file_set(secret, value)
    }

    pub fn has(&self, secret: Secret) -> bool {
        Self::env_get(secret).is_some()
            || self.keyring_get(secret).is_some()
            || self.file_get(secret).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to prevent parallel test interference with env vars
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn temp_store(tag: &str) -> CredentialStore {
        let email = format!("{}_{}@example.com", tag, std::process::id());
        let dir = env::temp_dir().join(format!("mailscribe-test-{}-{}", tag, std::process::id()));
        CredentialStore::with_dir(&email, dir)
    }

    #[test]
    fn test_env_takes_priority() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let store = temp_store("priority");
        store.file_set(Secret::MailPassword, "file_password").unwrap();

        unsafe { env::set_var(ENV_PASSWORD, "env_password") };
        assert_eq!(store.get(Secret::MailPassword).unwrap(), "env_password");
        unsafe { env::remove_var(ENV_PASSWORD) };

        let _ = fs::remove_dir_all(&store.dir);
    }

    #[test]
    fn test_secrets_use_separate_files() {
        let store = temp_store("separate");
        assert_ne!(
            store.file_path(Secret::MailPassword),
            store.file_path(Secret::ApiKey)
        );

        store.file_set(Secret::MailPassword, "hunter2").unwrap();
        store.file_set(Secret::ApiKey, "sk-test").unwrap();
        assert_eq!(
            store.file_get(Secret::MailPassword),
            Some("hunter2".to_string())
        );
        assert_eq!(store.file_get(Secret::ApiKey), Some("sk-test".to_string()));

        let _ = fs::remove_dir_all(&store.dir);
    }

    #[test]
    fn test_special_chars_in_email_sanitized() {
        let store = CredentialStore::with_dir("user.name+tag@sub.domain.com", PathBuf::from("."));
        let path = store.file_path(Secret::ApiKey);
        let filename = path.file_name().unwrap().to_string_lossy();

        assert!(!filename.contains('@'), "filename contains @: {}", filename);
        assert!(!filename.contains(':'), "filename contains :: {}", filename);
        assert_eq!(filename, ".api_key_user_name+tag_sub_domain_com");
    }

    #[test]
    fn test_missing_secret_names_env_var() {
        let _guard = ENV_MUTEX.lock().unwrap();
        unsafe { env::remove_var(ENV_API_KEY) };
        let store = temp_store("missing");

        // A keyring backend may be present on the host, so only assert when nothing is found
        if let Err(e) = store.get(Secret::ApiKey) {
            assert!(e.to_string().contains(ENV_API_KEY));
        }
    }

    #[test]
    fn test_debug_info_display() {
        let store = temp_store("debug");
        let display = format!("{}", store.debug_info());
        assert!(display.contains("Credential Storage Status:"));
        assert!(display.contains(ENV_PASSWORD));
        assert!(display.contains(ENV_API_KEY));
    }
}
