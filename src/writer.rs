use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::error::WriteError;

pub fn write_config(config: &Config, path: &Path) -> Result<(), WriteError> {
    let yaml = serde_yaml::to_string(config)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| WriteError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, yaml).map_err(|source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::assemble;
    use crate::proxy::{deduplicate, parse_links};
    use crate::settings::Settings;

    #[test]
    fn writes_yaml_into_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("files").join("clash.yaml");
        let outcome = parse_links(
            "vless://id@example.com:443?security=reality&pbk=ABC&sid=01#%F0%9F%9A%80%20Fast\n",
        );
        let config = assemble(&Settings::default(), deduplicate(outcome.proxies));

        write_config(&config, &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("mixed-port: 7890"));
        assert!(written.contains("type: vless"));
        assert!(written.contains("🚀 Fast"));
        assert!(written.contains("public-key: ABC"));
        assert!(!written.contains("null"));

        let reread: Config = serde_yaml::from_str(&written).unwrap();
        assert_eq!(reread, config);
    }

    #[test]
    fn section_order_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clash.yaml");
        write_config(&assemble(&Settings::default(), Vec::new()), &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let pos = |key: &str| written.find(&format!("\n{}:", key)).unwrap();
        assert!(pos("dns") < pos("proxies"));
        assert!(pos("proxies") < pos("proxy-groups"));
        assert!(pos("proxy-groups") < pos("rules"));
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let err = write_config(
            &assemble(&Settings::default(), Vec::new()),
            &blocker.join("clash.yaml"),
        )
        .unwrap_err();
        assert!(matches!(err, WriteError::Io { .. }));
    }
}
