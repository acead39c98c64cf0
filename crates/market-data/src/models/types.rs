use std::borrow::Cow;

/// Provider identifier as used by the factory (e.g. "yahoo", "openfigi").
/// Built-in providers borrow a static code, registered ones own theirs.
pub type ProviderCode = Cow<'static, str>;
