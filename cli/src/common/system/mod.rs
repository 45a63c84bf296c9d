//! # procwrap System Utilities Module (`common::system`)
//!
//! File: cli/src/common/system/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Host inspection used when a program turns out not to be installed:
//! detecting the OS distribution from `/etc/os-release` and rendering a
//! human-readable remediation message (command, OS error, homepage and the
//! package-manager command to install the program).
//!
//! The process core only calls `diagnostic_hint` while building a
//! `ProcessError::NotInstalled`; nothing else depends on this module.
//!
//! ## Example message
//!
//! ```text
//! cmd=["xvfb-run", "--help"]
//! OSError=No such file or directory (os error 2)
//! Program install error!
//! home page: https://www.x.org
//! You can install it in terminal:
//! sudo apt-get install xvfb
//! ```
//!
use crate::common::process::ProcessHandle;
use std::fs;
use std::path::Path;
use tracing::debug;

const OS_RELEASE_PATH: &str = "/etc/os-release";

/// Package managers the remediation message knows how to suggest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Apt,
    Dnf,
    Pacman,
}

impl PackageManager {
    /// Terminal command installing `package`.
    pub fn install_command(&self, package: &str) -> String {
        match self {
            PackageManager::Apt => format!("sudo apt-get install {}", package),
            PackageManager::Dnf => format!("sudo dnf install {}", package),
            PackageManager::Pacman => format!("sudo pacman -S {}", package),
        }
    }
}

/// The host's OS distribution as described by `os-release`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Distribution {
    /// `ID`, lowercased (e.g. `ubuntu`).
    pub id: String,
    /// `ID_LIKE` entries, lowercased (e.g. `["debian"]`).
    pub id_like: Vec<String>,
}

impl Distribution {
    /// Parses the contents of an `os-release` file.
    pub fn parse_os_release(content: &str) -> Option<Self> {
        let mut id = None;
        let mut id_like = Vec::new();
        for line in content.lines() {
            let Some((key, value)) = line.trim().split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"').trim_matches('\'').to_lowercase();
            match key {
                "ID" => id = Some(value),
                "ID_LIKE" => id_like = value.split_whitespace().map(str::to_string).collect(),
                _ => {}
            }
        }
        id.map(|id| Self { id, id_like })
    }

    /// Best guess at the distribution's package manager.
    pub fn package_manager(&self) -> Option<PackageManager> {
        let family = std::iter::once(self.id.as_str()).chain(self.id_like.iter().map(String::as_str));
        for name in family {
            match name {
                "ubuntu" | "debian" | "linuxmint" | "pop" => return Some(PackageManager::Apt),
                "fedora" | "rhel" | "centos" | "rocky" | "almalinux" => {
                    return Some(PackageManager::Dnf)
                }
                "arch" | "manjaro" | "endeavouros" => return Some(PackageManager::Pacman),
                _ => {}
            }
        }
        None
    }
}

/// Detects the host distribution; `None` off Linux or without `os-release`.
pub fn detect_distribution() -> Option<Distribution> {
    detect_distribution_from(Path::new(OS_RELEASE_PATH))
}

fn detect_distribution_from(path: &Path) -> Option<Distribution> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            debug!("Cannot read {}: {}", path.display(), e);
            return None;
        }
    };
    let distro = Distribution::parse_os_release(&content);
    debug!("Detected distribution: {:?}", distro);
    distro
}

/// Renders the "not installed" remediation message for `handle`.
pub fn diagnostic_hint(handle: &ProcessHandle) -> String {
    render_install_help(
        handle.command().args(),
        handle.os_error(),
        handle.homepage(),
        handle.install_hint(),
        detect_distribution().as_ref(),
    )
}

/// Builds the remediation message from its parts.
pub fn render_install_help(
    args: &[String],
    os_error: Option<&str>,
    homepage: Option<&str>,
    package: Option<&str>,
    distro: Option<&Distribution>,
) -> String {
    let mut msg = format!(
        "cmd={:?}\nOSError={}\nProgram install error!",
        args,
        os_error.unwrap_or("None")
    );
    if let Some(url) = homepage {
        msg.push_str("\nhome page: ");
        msg.push_str(url);
    }
    if let (Some(package), Some(manager)) = (package, distro.and_then(Distribution::package_manager)) {
        msg.push_str("\nYou can install it in terminal:\n");
        msg.push_str(&manager.install_command(package));
    }
    msg
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const UBUNTU: &str = r#"NAME="Ubuntu"
VERSION="22.04.3 LTS (Jammy Jellyfish)"
ID=ubuntu
ID_LIKE=debian
PRETTY_NAME="Ubuntu 22.04.3 LTS"
"#;

    #[test]
    fn test_parse_os_release() {
        let distro = Distribution::parse_os_release(UBUNTU).unwrap();
        assert_eq!(distro.id, "ubuntu");
        assert_eq!(distro.id_like, vec!["debian"]);
        assert_eq!(distro.package_manager(), Some(PackageManager::Apt));

        let rocky = Distribution::parse_os_release("ID=\"rocky\"\nID_LIKE=\"rhel centos fedora\"\n")
            .unwrap();
        assert_eq!(rocky.id_like, vec!["rhel", "centos", "fedora"]);
        assert_eq!(rocky.package_manager(), Some(PackageManager::Dnf));

        assert!(Distribution::parse_os_release("NAME=nothing\n").is_none());
    }

    #[test]
    fn test_unknown_distribution_has_no_manager() {
        let distro = Distribution::parse_os_release("ID=nixos\n").unwrap();
        assert_eq!(distro.package_manager(), None);
    }

    #[test]
    fn test_detect_distribution_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("os-release");
        fs::write(&path, UBUNTU).unwrap();
        assert_eq!(detect_distribution_from(&path).unwrap().id, "ubuntu");
        assert!(detect_distribution_from(&dir.path().join("missing")).is_none());
    }

    #[test]
    fn test_render_install_help_full() {
        let distro = Distribution::parse_os_release(UBUNTU).unwrap();
        let msg = render_install_help(
            &["xvfb-run".to_string()],
            Some("No such file or directory (os error 2)"),
            Some("https://www.x.org"),
            Some("xvfb"),
            Some(&distro),
        );
        assert_eq!(
            msg,
            "cmd=[\"xvfb-run\"]\n\
             OSError=No such file or directory (os error 2)\n\
             Program install error!\n\
             home page: https://www.x.org\n\
             You can install it in terminal:\n\
             sudo apt-get install xvfb"
        );
    }

    #[test]
    fn test_render_install_help_without_hints() {
        let msg = render_install_help(&["tool".to_string()], None, None, Some("tool"), None);
        assert_eq!(msg, "cmd=[\"tool\"]\nOSError=None\nProgram install error!");
    }
}
