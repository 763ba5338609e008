//! archive/naming.rs
//! Deterministic member naming and collision handling.
//!
//! A member name is `"{origin}_{basename}"`. Path separators and NUL never
//! survive into a name, so a member name is always a single path component.
//! Spaces become `_` as well, so names stay shell-friendly.

use std::collections::HashSet;

use crate::archive::types::{ArchiveError, NamingPolicy};
use crate::constants::MAX_MEMBER_NAME_LEN;

/// Replace spaces and characters that would let a name escape its directory.
pub fn sanitize_component(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '/' | '\\' | '\0' | ' ' => '_',
            c => c,
        })
        .collect()
}

/// Final path component of `file_name`, treating both `/` and `\` as separators.
fn basename(file_name: &str) -> &str {
    file_name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(file_name)
}

/// Member name for an image read from `file_name` with the given origin.
pub fn member_name(origin: &str, file_name: &str) -> String {
    format!("{}_{}", sanitize_component(origin), sanitize_component(basename(file_name)))
}

/// Split `name` into stem and extension (with dot). A leading dot is part of the stem.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(i) if i > 0 => (&name[..i], &name[i..]),
        _ => (name, ""),
    }
}

/// Tracks names already handed out during one `pack`.
#[derive(Debug, Default)]
pub struct NameRegistry {
    policy: NamingPolicy,
    used: HashSet<String>,
}

impl NameRegistry {
    pub fn new(policy: NamingPolicy) -> Self {
        Self { policy, used: HashSet::new() }
    }

    /// Claim `candidate`, applying the collision policy.
    pub fn assign(&mut self, candidate: String) -> Result<String, ArchiveError> {
        let name = if self.used.contains(&candidate) {
            match self.policy {
                NamingPolicy::Reject => {
                    return Err(ArchiveError::DuplicateMember { name: candidate });
                }
                NamingPolicy::Disambiguate => self.next_free(&candidate),
            }
        } else {
            candidate
        };

        if name.len() > MAX_MEMBER_NAME_LEN {
            return Err(ArchiveError::MemberNameTooLong { len: name.len() });
        }

        self.used.insert(name.clone());
        Ok(name)
    }

    fn next_free(&self, candidate: &str) -> String {
        let (stem, ext) = split_extension(candidate);
        (2u64..)
            .map(|n| format!("{}-{}{}", stem, n, ext))
            .find(|name| !self.used.contains(name))
            .unwrap_or_else(|| candidate.to_owned())
    }
}
