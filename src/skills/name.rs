//! Skill name normalization and validation

use std::path::{Component, Path};

use super::StoreError;

/// Normalize a user-supplied name for a new skill.
///
/// Surrounding whitespace is trimmed, the name is lowercased and every space
/// becomes `-`. A name that is empty after trimming is rejected with
/// [`StoreError::NameRequired`].
pub fn normalize_name(raw: &str) -> Result<String, StoreError> {
    let trimmed = raw.trim_matches(is_name_space);
    if trimmed.is_empty() {
        return Err(StoreError::NameRequired);
    }

    let name = trimmed.to_lowercase().replace(' ', "-");
    validate_name(&name)?;
    Ok(name)
}

/// Unicode whitespace plus the ASCII separators U+001C..=U+001F
fn is_name_space(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Check that `name` addresses exactly one directory directly under the root.
pub fn validate_name(name: &str) -> Result<(), StoreError> {
    let mut components = Path::new(name).components();
    let single_component = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );

    if single_component && !name.contains(['/', '\\', '\0']) {
        Ok(())
    } else {
        Err(StoreError::InvalidName(name.to_string()))
    }
}
