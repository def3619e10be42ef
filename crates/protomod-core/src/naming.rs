//! Namespace → module-name policies.
//!
//! A policy is any stateless mapping from a dotted namespace to a module
//! name. Plain functions and closures with the right signature are policies
//! too, so callers can inject their own without defining a type.

/// Separator between namespace segments.
pub const NAMESPACE_SEPARATOR: char = '.';

/// Separator between module-name segments.
pub const MODULE_SEPARATOR: char = '-';

/// Maps a namespace string to a module name.
pub trait NamingPolicy {
    fn module_name(&self, namespace: &str) -> String;
}

impl<F> NamingPolicy for F
where
    F: Fn(&str) -> String,
{
    fn module_name(&self, namespace: &str) -> String {
        self(namespace)
    }
}

/// Strips the first matching conventional prefix, then hyphenates.
///
/// `com.acme.billing` → `acme-billing`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardNaming {
    prefixes: Vec<String>,
}

impl Default for StandardNaming {
    fn default() -> Self {
        Self::with_prefixes(["com.", "org.", "net."])
    }
}

impl StandardNaming {
    /// Build a policy with an explicit, ordered prefix list.
    #[must_use]
    pub fn with_prefixes<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}

impl NamingPolicy for StandardNaming {
    fn module_name(&self, namespace: &str) -> String {
        let stripped = self
            .prefixes
            .iter()
            .find_map(|prefix| namespace.strip_prefix(prefix.as_str()))
            .filter(|rest| !rest.is_empty())
            .unwrap_or(namespace);
        hyphenate(stripped)
    }
}

/// Hyphenates every segment without stripping anything.
///
/// `com.acme.billing` → `com-acme-billing`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FullPreservingNaming;

impl NamingPolicy for FullPreservingNaming {
    fn module_name(&self, namespace: &str) -> String {
        hyphenate(namespace)
    }
}

fn hyphenate(namespace: &str) -> String {
    namespace.replace(NAMESPACE_SEPARATOR, &MODULE_SEPARATOR.to_string())
}
