use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use tracing::{info, warn};

pub struct Config {
    pub base_url: String,
    pub page_size: u32,
    pub cart_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        Self {
            base_url: try_load("FOOD_BASE_URL", catalog::remote::DEFAULT_BASE_URL),
            page_size: try_load("FOOD_PAGE_SIZE", "20"),
            cart_path: env::var("FOOD_CART_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_cart_path()),
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    env::var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

fn default_cart_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("food-explorer");
    path.push("cart.json");
    path
}
