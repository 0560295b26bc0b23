//! Command-line front end.
//!
//! ```text
//! imaging captcha [OUT.bmp]
//! imaging thumbnail IN OUT
//! ```

use std::path::Path;

use anyhow::{Context, bail};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: imaging captcha [OUT.bmp] | imaging thumbnail IN OUT";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = imaging_kit::init_config();

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["captcha"] => captcha(&config, None),
        ["captcha", out] => captcha(&config, Some(Path::new(out))),
        ["thumbnail", input, output] => {
            let service = imaging_kit::thumbnail_service(&config);
            let report = service
                .convert_file(Path::new(input), Path::new(output))
                .with_context(|| format!("thumbnail {input} -> {output}"))?;
            println!("{}x{} {}", report.width, report.height, report.format);
            Ok(())
        }
        _ => bail!(USAGE),
    }
}

fn captcha(config: &imaging_kit::config::AppConfig, out: Option<&Path>) -> anyhow::Result<()> {
    let service =
        imaging_kit::captcha_service(config).context("no font for challenge rendering")?;
    let challenge = service.generate(&mut rand::thread_rng())?;
    tracing::info!(code = challenge.code(), "Challenge code");

    match out {
        Some(path) => {
            std::fs::write(path, challenge.to_bmp()?)
                .with_context(|| format!("write {}", path.display()))?;
            tracing::info!(path = %path.display(), "Challenge written");
        }
        None => {
            println!("{}", challenge.code());
            println!("{}", challenge.base64_bmp()?);
        }
    }
    Ok(())
}
