use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// A closed, string-keyed vocabulary such as an entity's status enumeration
/// or the set of columns on its board.
///
/// Implementors list every variant in [`StageKey::all`]; parsing and display
/// are derived from that list so the wire string and the variant can never
/// drift apart.
pub trait StageKey:
    Copy + Eq + Hash + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Every variant, in display order.
    fn all() -> &'static [Self];

    /// The wire name, e.g. `"NEEDS_ATTENTION"`.
    fn as_str(&self) -> &'static str;

    fn parse(value: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|key| key.as_str().eq_ignore_ascii_case(value))
    }
}
