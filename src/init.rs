use crate::cli::InitArgs;
use promptpack::config::{self, LOCAL_CONFIG_FILE, TEMPLATE};
use std::fs;
use std::path::PathBuf;

pub fn run(args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let path = if args.global {
        config::global_config_path().ok_or("Could not determine home directory")?
    } else {
        PathBuf::from(LOCAL_CONFIG_FILE)
    };

    if path.exists() && !args.force {
        return Err(format!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        )
        .into());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(&path, TEMPLATE)?;

    let location = if args.global { "global" } else { "local" };
    println!("Created {} config at {}", location, path.display());

    Ok(())
}
