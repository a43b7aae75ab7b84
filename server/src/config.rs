use anyhow::{Result, anyhow, bail};
use products_hr::{
    Locale,
    pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE},
};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub page_size: u64,
    pub locale: Locale,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            locale: Locale::default(),
            cors_allowed_origins: vec!["http://localhost:5173".into()],
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = env_non_empty("PAGE_SIZE") {
            config.page_size = parse_page_size(&raw)?;
        }

        if let Some(raw) = env_non_empty("APP_LOCALE") {
            config.locale =
                Locale::parse(&raw).ok_or_else(|| anyhow!("unsupported APP_LOCALE {raw:?}"))?;
        }

        if let Ok(raw) = std::env::var("CORS_ALLOWED_ORIGINS") {
            config.cors_allowed_origins = raw
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        Some(trimmed.to_string())
                    }
                })
                .collect();
        }

        Ok(config)
    }
}

fn parse_page_size(raw: &str) -> Result<u64> {
    let size = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| anyhow!("PAGE_SIZE must be a positive integer, got {raw:?}"))?;
    if !(1..=MAX_PAGE_SIZE).contains(&size) {
        bail!("PAGE_SIZE must be between 1 and {MAX_PAGE_SIZE}, got {size}");
    }
    Ok(size)
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}
