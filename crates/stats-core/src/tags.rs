//! # Tag Handling
//!
//! Tags are attached to a stat by folding them into its name:
//!
//! ```text
//! requests.__method=GET.__status=200
//! ```
//!
//! Keys are emitted in sorted order so that the same tag set always produces
//! the same serialized name. Tag values are passed through [`replace_chars`]
//! first, because the characters it replaces would break downstream parsing.

use std::borrow::Cow;

use crate::TagSet;

/// Separator placed in front of every serialized tag.
pub const TAG_PREFIX: &str = ".__";

/// Separator between a tag key and its value.
pub const TAG_SEPARATOR: char = '=';

/// Tag key marking a stat as per-instance.
pub const PER_INSTANCE_KEY: &str = "_f";

/// Tag value paired with [`PER_INSTANCE_KEY`].
pub const PER_INSTANCE_VALUE: &str = "i";

/// Replacement for every illegal tag value character.
pub const REPLACEMENT_CHAR: char = '_';

/// Characters that may not appear in a tag value.
const ILLEGAL_VALUE_CHARS: [char; 6] = ['.', ':', '|', '[', ']', '='];

fn is_illegal(c: char) -> bool {
    ILLEGAL_VALUE_CHARS.contains(&c)
}

/// Replace every illegal character in a tag value with `_`.
///
/// Returns the input unchanged (borrowed) when it is already clean.
pub fn replace_chars(value: &str) -> Cow<'_, str> {
    if !value.contains(is_illegal) {
        return Cow::Borrowed(value);
    }
    Cow::Owned(
        value
            .chars()
            .map(|c| if is_illegal(c) { REPLACEMENT_CHAR } else { c })
            .collect(),
    )
}

/// Serialize a stat name and its tags into a single flat name.
pub fn serialize_tags(name: &str, tags: &TagSet) -> String {
    if tags.is_empty() {
        return name.to_string();
    }

    let extra: usize = tags
        .iter()
        .map(|(k, v)| TAG_PREFIX.len() + k.len() + 1 + v.len())
        .sum();
    let mut out = String::with_capacity(name.len() + extra);
    out.push_str(name);

    // BTreeMap iterates in key order
    for (key, value) in tags {
        out.push_str(TAG_PREFIX);
        out.push_str(key);
        out.push(TAG_SEPARATOR);
        out.push_str(&replace_chars(value));
    }
    out
}

/// Merge two tag sets. Entries in `overrides` win on key collisions.
pub fn merge_tags(base: &TagSet, overrides: &TagSet) -> TagSet {
    let mut merged = base.clone();
    merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

/// Tags for a per-instance stat.
///
/// An explicit `_f` tag is left alone; otherwise `_f=i` is added.
pub fn per_instance_tags(tags: &TagSet) -> TagSet {
    if tags.contains_key(PER_INSTANCE_KEY) {
        return tags.clone();
    }
    let mut merged = tags.clone();
    merged.insert(PER_INSTANCE_KEY.to_string(), PER_INSTANCE_VALUE.to_string());
    merged
}

/// Build a [`TagSet`] from string pairs.
///
/// Convenient in tests and call sites with a fixed set of tags.
pub fn tag_set<'a, I>(pairs: I) -> TagSet
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
