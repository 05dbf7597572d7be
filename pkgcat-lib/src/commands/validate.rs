use super::Host;
use super::config::Config;
use crate::Result;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file (default is `pkgcat.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,
}

pub fn validate_config<H: Host>(host: &mut H, args: &ValidateArgs) -> Result<()> {
    let config_path = args.config.as_ref();

    match Config::load(Utf8Path::new("."), config_path) {
        Ok(_) => {
            let _ = writeln!(host.output(), "Configuration file is valid");
            if let Some(path) = config_path {
                let _ = writeln!(host.output(), "Config file: {path}");
            } else {
                let _ = writeln!(host.output(), "Using default configuration (no config file given)");
            }
            Ok(())
        }
        Err(e) => {
            let _ = writeln!(host.error(), "❌ Configuration validation failed: {e:#}");
            host.exit(1);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::host::TestHost;

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn valid_file_passes() {
        let tmp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(tmp.path().join("pkgcat.toml")).unwrap();
        std::fs::write(&path, "page_size = 12").unwrap();

        let mut host = TestHost::new();
        validate_config(&mut host, &ValidateArgs { config: Some(path) }).unwrap();

        assert!(host.output_str().contains("Configuration file is valid"));
        assert_eq!(host.exit_code, None);
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn invalid_file_fails_with_exit_code() {
        let tmp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(tmp.path().join("pkgcat.toml")).unwrap();
        std::fs::write(&path, "page_size = 0").unwrap();

        let mut host = TestHost::new();
        let _ = validate_config(&mut host, &ValidateArgs { config: Some(path) }).unwrap_err();

        assert!(host.error_str().contains("page_size must be greater than zero"));
        assert_eq!(host.exit_code, Some(1));
    }
}
