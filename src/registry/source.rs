//! Registry source selection.
//!
//! A registry is either one of the well-known mirrors, addressed by alias,
//! or a custom base URL.

use std::fmt;
use std::str::FromStr;

/// The public npm registry.
pub const NPM_URL: &str = "https://registry.npmjs.org";
/// The npmmirror (formerly taobao/aliyun) mirror.
pub const NPMMIRROR_URL: &str = "https://registry.npmmirror.com";
/// The 17zuoye private registry.
pub const ZUOYE_URL: &str = "http://npm.17zuoye.net";

/// Where package metadata is resolved from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RegistrySource {
    /// registry.npmjs.org
    Npm,
    /// registry.npmmirror.com
    #[default]
    NpmMirror,
    /// npm.17zuoye.net
    Zuoye,
    /// Any other registry, by base URL without trailing slash.
    Custom(String),
}

impl RegistrySource {
    /// Known aliases and the URLs they stand for.
    pub const KNOWN: &'static [(&'static str, &'static str)] = &[
        ("npm", NPM_URL),
        ("npmmirror", NPMMIRROR_URL),
        ("aliyun", NPMMIRROR_URL),
        ("17zuoye", ZUOYE_URL),
    ];

    /// Base URL of the registry, without trailing slash.
    pub fn base_url(&self) -> &str {
        match self {
            Self::Npm => NPM_URL,
            Self::NpmMirror => NPMMIRROR_URL,
            Self::Zuoye => ZUOYE_URL,
            Self::Custom(url) => url,
        }
    }
}

impl FromStr for RegistrySource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        match value.to_lowercase().as_str() {
            "npm" => return Ok(Self::Npm),
            "npmmirror" | "aliyun" => return Ok(Self::NpmMirror),
            "17zuoye" => return Ok(Self::Zuoye),
            _ => {}
        }

        if value.starts_with("http://") || value.starts_with("https://") {
            let url = value.trim_end_matches('/');
            return Ok(match url {
                NPM_URL => Self::Npm,
                NPMMIRROR_URL => Self::NpmMirror,
                ZUOYE_URL => Self::Zuoye,
                _ => Self::Custom(url.to_string()),
            });
        }

        let aliases: Vec<&str> = Self::KNOWN.iter().map(|(alias, _)| *alias).collect();
        Err(format!(
            "unknown registry '{}': use one of {} or an http(s) URL",
            s,
            aliases.join(", ")
        ))
    }
}

impl fmt::Display for RegistrySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base_url())
    }
}
