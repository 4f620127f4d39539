use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, ensure};

use crate::render::{LABEL_CONTAINER_WIDTH, LABEL_FONT_SIZE, LABEL_MAX_WIDTH, LabelLayout};

pub const LABEL_FONT_SIZE_ENV: &str = "PLAN_GRAPH_LABEL_FONT_SIZE";
pub const LABEL_MAX_WIDTH_ENV: &str = "PLAN_GRAPH_LABEL_MAX_WIDTH";
pub const LABEL_CONTAINER_WIDTH_ENV: &str = "PLAN_GRAPH_LABEL_CONTAINER_WIDTH";
pub const LOG_DIR_ENV: &str = "PLAN_GRAPH_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphSettings {
    pub layout: LabelLayout,
    pub log_dir: Option<PathBuf>,
}

impl GraphSettings {
    pub fn from_env() -> Result<Self> {
        // A missing .env is normal; only the process environment applies then.
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let font_size = parse_f64_var(&lookup, LABEL_FONT_SIZE_ENV, LABEL_FONT_SIZE)?;
        ensure!(
            font_size > 0.0,
            "{LABEL_FONT_SIZE_ENV} must be greater than 0"
        );

        let max_width = parse_f64_var(&lookup, LABEL_MAX_WIDTH_ENV, LABEL_MAX_WIDTH)?;
        ensure!(
            max_width > 0.0,
            "{LABEL_MAX_WIDTH_ENV} must be greater than 0"
        );

        let container_width =
            parse_f64_var(&lookup, LABEL_CONTAINER_WIDTH_ENV, LABEL_CONTAINER_WIDTH)?;
        ensure!(
            container_width >= max_width,
            "{LABEL_CONTAINER_WIDTH_ENV} must be at least {LABEL_MAX_WIDTH_ENV} ({max_width})"
        );

        let log_dir = read_optional_var(&lookup, LOG_DIR_ENV).map(PathBuf::from);

        Ok(Self {
            layout: LabelLayout {
                font_size,
                max_width,
                container_width,
            },
            log_dir,
        })
    }
}

fn read_optional_var<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_f64_var<F>(lookup: &F, name: &str, default: f64) -> Result<f64>
where
    F: Fn(&str) -> Option<String>,
{
    match read_optional_var(lookup, name) {
        Some(raw) => {
            let value = raw
                .parse::<f64>()
                .with_context(|| format!("failed to parse {name} as a number"))?;
            ensure!(value.is_finite(), "{name} must be a finite number");
            Ok(value)
        }
        None => Ok(default),
    }
}
