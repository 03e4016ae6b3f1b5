//! Build settings profiles
//!
//! A profile is a named, immutable set of compiler-wide options. Exactly one
//! profile is active at a time; switching invalidates every compiled output.

/// Highest accepted optimization level
pub const MAX_OPTIMIZATION_LEVEL: u32 = 3;

/// Name used when the configuration defines no profile
pub const DEFAULT_PROFILE_NAME: &str = "default";

/// Compiler-wide options for one build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSettings {
    pub optimization_level: u32,
    pub debug: bool,
}

/// The fixed set of profiles loaded at startup plus the active selection
#[derive(Debug, Clone)]
pub struct SettingProfiles {
    profiles: Vec<(String, BuildSettings)>,
    active: usize,
}

impl SettingProfiles {
    /// Build from profiles in declaration order; the first one is active.
    ///
    /// An empty list yields a single `"default"` profile.
    pub fn new(profiles: Vec<(String, BuildSettings)>) -> Self {
        let profiles = if profiles.is_empty() {
            tracing::warn!("No setting profiles defined, setting to default.");
            vec![(DEFAULT_PROFILE_NAME.to_string(), BuildSettings::default())]
        } else {
            profiles
        };
        Self {
            profiles,
            active: 0,
        }
    }

    pub fn active(&self) -> &BuildSettings {
        &self.profiles[self.active].1
    }

    pub fn active_name(&self) -> &str {
        &self.profiles[self.active].0
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|(name, _)| name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&BuildSettings> {
        self.profiles
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, settings)| settings)
    }

    /// Select the active profile; `false` if no profile has that name
    pub fn set_active(&mut self, name: &str) -> bool {
        match self.profiles.iter().position(|(n, _)| n == name) {
            Some(index) => {
                self.active = index;
                true
            }
            None => false,
        }
    }
}

impl Default for SettingProfiles {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
