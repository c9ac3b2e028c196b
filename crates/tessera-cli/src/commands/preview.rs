use std::sync::Arc;

use tessera_theme::config::{ENV_BASE_URL, ENV_DEFAULT_MODE, ENV_FETCH_TIMEOUT, ENV_SCOPE};
use tessera_theme::{
    BrandFetcher, CookieModePreference, InMemoryStyleRoot, LoadStatus, ManagerDependencies,
    ThemeConfig, ThemeManager,
};
use tracing::info;

use super::load_schema;
use crate::cli::PreviewArgs;
use crate::error::{CliError, CliResult};
use crate::output::{OutputFormat, ThemeReport, render_theme};

pub(crate) async fn handle_preview(args: &PreviewArgs, format: OutputFormat) -> CliResult<String> {
    let config = ThemeConfig::from_lookup(|key| match key {
        ENV_BASE_URL => args.base_url.clone(),
        ENV_SCOPE => args.scope.clone(),
        ENV_FETCH_TIMEOUT => args.timeout.clone(),
        ENV_DEFAULT_MODE => args.mode.clone(),
        _ => None,
    })?;
    let fetcher: Arc<dyn BrandFetcher> = match (&args.dir, &config.base_url) {
        (Some(dir), _) => Arc::new(config.directory_fetcher(dir)),
        (None, Some(_)) => Arc::new(config.http_fetcher()?),
        (None, None) => {
            return Err(CliError::validation(
                "a payload source is required (pass --dir or --base-url, or set TESSERA_THEME_BASE_URL)",
            ));
        }
    };

    let root = InMemoryStyleRoot::new();
    let mut deps = ManagerDependencies::new(
        Arc::new(load_schema(args.schema.as_deref())?),
        fetcher,
        Box::new(root.clone()),
    )
    .with_config(&config);
    if let Some(cookie) = &args.cookie {
        deps = deps.with_preference(CookieModePreference::new(cookie.as_str()));
    }
    let manager = ThemeManager::new(deps);
    manager.init_base_theme();

    let (brand, status, warnings) = match &args.brand {
        Some(brand) => {
            let load = manager.load_brand(brand).await?;
            let status = match load.status {
                LoadStatus::Applied => "applied",
                LoadStatus::Superseded => "superseded",
            };
            (Some(load.brand_id.to_string()), status, load.warnings)
        }
        None => (None, "base", Vec::new()),
    };
    info!(
        brand = brand.as_deref().unwrap_or("base"),
        mode = %manager.mode(),
        properties = root.properties().len(),
        "preview rendered"
    );

    render_theme(
        &ThemeReport {
            brand,
            status: Some(status),
            mode: manager.mode(),
            properties: root.properties(),
            warnings,
        },
        format,
    )
}
