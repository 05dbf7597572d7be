use super::Host;
use super::common::{Common, CommonArgs};
use crate::Result;
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct ClearCacheArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

pub fn clear_cache<H: Host>(host: &mut H, args: &ClearCacheArgs) -> Result<()> {
    let common = Common::new(host, &args.common)?;
    common.metrics_cache().clear()?;

    let _ = writeln!(common.host.output(), "Cleared cached package metrics");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CacheBackend, FileBackend, Metrics};
    use crate::commands::common::{ColorMode, LogLevel};
    use crate::commands::host::TestHost;
    use camino::Utf8PathBuf;
    use core::time::Duration;

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn removes_cached_metrics() {
        let tmp = tempfile::tempdir().unwrap();
        let cache_dir = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
        let backend = FileBackend::new(cache_dir.join("metrics"));
        backend.set("github.com/acme/widget", Metrics { stars: 1, downloads: 2 }, Duration::from_secs(3600)).unwrap();

        let args = ClearCacheArgs {
            common: CommonArgs {
                github_token: None,
                codeberg_token: None,
                config: None,
                catalog: None,
                color: ColorMode::Never,
                cache_dir: Some(cache_dir),
                log_level: LogLevel::None,
            },
        };
        let mut host = TestHost::new();
        clear_cache(&mut host, &args).unwrap();

        assert_eq!(backend.get("github.com/acme/widget"), None);
        assert!(host.output_str().contains("Cleared"));
    }
}
