use serde::Deserialize;
use std::collections::HashMap;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use std::process::Command;
use which::{which, which_in};

/// Describes how to reach a vendor tool installation: extra environment
/// variables (typically `PATH` and license settings) and whether the tool has
/// to be run through wine.
///
/// The default value carries no environment overrides; tools are then looked
/// up on the ambient `$PATH`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Toolchain {
    #[serde(default)]
    pub use_wine: bool,
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl Toolchain {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let s = read_to_string(path)?;
        Ok(toml::from_str(&s)?)
    }

    /// Finds `cmd` in the toolchain's `PATH` override, or on the ambient
    /// `$PATH` when there is none.  Wine-wrapped tools are not checked —
    /// wine resolves the binary inside its own prefix.
    pub fn locate(&self, cmd: &str) -> Option<PathBuf> {
        if self.use_wine {
            return Some(PathBuf::from(cmd));
        }
        if let Some(path) = self.env.get("PATH") {
            which_in(cmd, Some(path), "/").ok()
        } else {
            which(cmd).ok()
        }
    }

    /// Builds a `Command` for `cmd` with the toolchain environment applied.
    pub fn command(&self, cmd: &str) -> Command {
        let mut res: Command;
        if self.use_wine {
            res = Command::new("wine");
            res.arg(cmd);
        } else if let Some(rcmd) = self.locate(cmd) {
            res = Command::new(rcmd);
        } else {
            res = Command::new(cmd);
        }
        for (k, v) in self.env.iter() {
            res.env(k, v);
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_toolchain_file() {
        let tc: Toolchain = toml::from_str(
            r#"
            use_wine = true

            [env]
            PATH = "/opt/vendor/bin"
            LM_LICENSE_FILE = "1234@localhost"
            "#,
        )
        .unwrap();
        assert!(tc.use_wine);
        assert_eq!(tc.env["PATH"], "/opt/vendor/bin");
        assert_eq!(tc.env.len(), 2);
    }

    #[test]
    fn parse_empty_file() {
        let tc: Toolchain = toml::from_str("").unwrap();
        assert!(!tc.use_wine);
        assert!(tc.env.is_empty());
    }

    #[test]
    fn locate_missing_tool() {
        let tc = Toolchain::default();
        assert!(tc.locate("definitely-not-a-real-tool-9000").is_none());
    }

    #[test]
    fn wine_command_wraps_tool() {
        let tc = Toolchain {
            use_wine: true,
            env: HashMap::new(),
        };
        let cmd = tc.command("partgen.exe");
        assert_eq!(cmd.get_program(), "wine");
    }
}
