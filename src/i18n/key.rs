use std::fmt;

/// A namespaced message identifier, e.g. `myplugin:command.locale.usage`.
///
/// The namespace names the owning plugin. Keys are expected to be lowercase;
/// [`LanguageRegistry::lookup_or_create_key`](crate::i18n::LanguageRegistry::lookup_or_create_key)
/// is the normal way to obtain one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageKey {
    namespace: String,
    key: String,
}

impl MessageKey {
    pub fn new(namespace: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.key)
    }
}
