use anyhow::{anyhow, bail, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A release version as it appears in packaging metadata: one or more
/// dot-separated numeric segments, optionally tagged as a pre-release.
///
/// Pinned lower bounds are not semver. Two-segment releases like `0.6` are
/// routine, and trailing zeros are insignificant (`1.4` and `1.4.0` name the
/// same release), so comparison pads the shorter release with zeros.
#[derive(Debug, Clone)]
pub struct Version {
    release: Vec<u64>,
    pre: Option<PreRelease>,
}

/// Pre-release tag, ordered before the release it qualifies.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PreRelease {
    kind: PreReleaseKind,
    number: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PreReleaseKind {
    Dev,
    Alpha,
    Beta,
    ReleaseCandidate,
}

impl Version {
    /// Parse a version string like `1.4.16`, `0.6`, or `2.0.0dev`.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            bail!("version string is empty");
        }

        let split_at = trimmed
            .find(|c: char| c.is_ascii_alphabetic())
            .unwrap_or(trimmed.len());
        let (release_part, pre_part) = trimmed.split_at(split_at);

        let release_part = release_part.trim_end_matches(['.', '-']);
        if release_part.is_empty() {
            bail!("version '{input}' has no release segments");
        }

        let mut release = Vec::new();
        for segment in release_part.split('.') {
            let value: u64 = segment
                .parse()
                .map_err(|_| anyhow!("version '{input}' has non-numeric segment '{segment}'"))?;
            release.push(value);
        }

        let pre = if pre_part.is_empty() {
            None
        } else {
            Some(PreRelease::parse(pre_part).map_err(|e| anyhow!("version '{input}': {e}"))?)
        };

        Ok(Version { release, pre })
    }

    pub fn release(&self) -> &[u64] {
        &self.release
    }

    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some()
    }
}

impl PreRelease {
    fn parse(input: &str) -> Result<Self> {
        let lowered = input.to_ascii_lowercase();
        let (kind, rest) = if let Some(rest) = lowered.strip_prefix("dev") {
            (PreReleaseKind::Dev, rest)
        } else if let Some(rest) = lowered.strip_prefix("alpha") {
            (PreReleaseKind::Alpha, rest)
        } else if let Some(rest) = lowered.strip_prefix("beta") {
            (PreReleaseKind::Beta, rest)
        } else if let Some(rest) = lowered.strip_prefix("rc") {
            (PreReleaseKind::ReleaseCandidate, rest)
        } else if let Some(rest) = lowered.strip_prefix('a') {
            (PreReleaseKind::Alpha, rest)
        } else if let Some(rest) = lowered.strip_prefix('b') {
            (PreReleaseKind::Beta, rest)
        } else {
            bail!("unrecognized pre-release tag '{input}'");
        };

        let number = if rest.is_empty() {
            0
        } else {
            rest.parse()
                .map_err(|_| anyhow!("pre-release tag '{input}' has non-numeric suffix"))?
        };

        Ok(PreRelease { kind, number })
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let segments = self.release.len().max(other.release.len());
        for i in 0..segments {
            let left = self.release.get(i).copied().unwrap_or(0);
            let right = other.release.get(i).copied().unwrap_or(0);
            match left.cmp(&right) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        // A bare release is newer than any of its own pre-releases.
        match (&self.pre, &other.pre) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(left), Some(right)) => left.cmp(right),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let release = self
            .release
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{release}")?;
        if let Some(pre) = &self.pre {
            write!(f, "{pre}")?;
        }
        Ok(())
    }
}

impl fmt::Display for PreRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.kind {
            PreReleaseKind::Dev => "dev",
            PreReleaseKind::Alpha => "a",
            PreReleaseKind::Beta => "b",
            PreReleaseKind::ReleaseCandidate => "rc",
        };
        write!(f, "{tag}")?;
        if self.number > 0 {
            write!(f, "{}", self.number)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

/// A version constraint as written in packaging metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Specifier {
    /// Exact pin (`==1.4.16`), the only operator legal in constraint files.
    Exact(Version),
    /// Open lower bound (`>=1.4.16`).
    Minimum(Version),
    /// Lower bound with an exclusive ceiling (`>=1.4.16, <2.0.0dev`).
    Range { lower: Version, upper: Version },
}

impl Specifier {
    /// Parse a specifier string.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            bail!("specifier is empty");
        }

        if let Some(version_str) = trimmed.strip_prefix("==") {
            return Ok(Specifier::Exact(Version::parse(version_str)?));
        }

        if let Some(rest) = trimmed.strip_prefix(">=") {
            return match rest.split_once(',') {
                None => Ok(Specifier::Minimum(Version::parse(rest)?)),
                Some((lower_str, upper_clause)) => {
                    let upper_str = upper_clause
                        .trim()
                        .strip_prefix('<')
                        .ok_or_else(|| anyhow!("unsupported upper clause in '{input}'"))?;
                    let lower = Version::parse(lower_str)?;
                    let upper = Version::parse(upper_str)?;
                    if upper <= lower {
                        bail!("specifier '{input}' has an empty range");
                    }
                    Ok(Specifier::Range { lower, upper })
                }
            };
        }

        // A bare version reads as an exact pin.
        Ok(Specifier::Exact(Version::parse(trimmed)?))
    }

    /// Check whether a version satisfies this specifier.
    pub fn matches(&self, version: &Version) -> bool {
        match self {
            Specifier::Exact(v) => version == v,
            Specifier::Minimum(v) => version >= v,
            Specifier::Range { lower, upper } => version >= lower && version < upper,
        }
    }

    /// The minimum version this specifier admits. For an exact pin that is
    /// the pinned version itself.
    pub fn lower_bound(&self) -> &Version {
        match self {
            Specifier::Exact(v) => v,
            Specifier::Minimum(v) => v,
            Specifier::Range { lower, .. } => lower,
        }
    }
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Specifier::Exact(v) => write!(f, "=={v}"),
            Specifier::Minimum(v) => write!(f, ">={v}"),
            Specifier::Range { lower, upper } => write!(f, ">={lower}, <{upper}"),
        }
    }
}
