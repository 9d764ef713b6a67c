//! Short-ID grammar and generation.

use uuid::Uuid;

use crate::NameError;

/// Longest ID or name segment accepted, in characters.
pub const MAX_ID_LENGTH: usize = 63;

/// Validate an ID supplied by a caller.
///
/// User-settable IDs follow the DNS-label-like grammar `[a-z][a-z0-9-]*`,
/// must not end with `-`, and must not parse as a UUID (those are reserved
/// for [`generate_id`]).
pub fn validate_user_settable_id(id: &str) -> Result<(), NameError> {
    let length = id.chars().count();
    if length == 0 || length > MAX_ID_LENGTH {
        return Err(NameError::IdLength { max: MAX_ID_LENGTH });
    }

    if !id.chars().next().is_some_and(char::is_alphabetic) {
        return Err(NameError::IdStart);
    }
    if id.ends_with('-') {
        return Err(NameError::IdEnd);
    }

    for (position, character) in id.char_indices() {
        match character {
            'a'..='z' | '0'..='9' | '-' => {}
            _ => {
                return Err(NameError::IdCharacter {
                    character,
                    position,
                })
            }
        }
    }

    if Uuid::parse_str(id).is_ok() {
        return Err(NameError::IdIsUuid);
    }

    Ok(())
}

/// Validate one segment of a full resource name.
///
/// Segments are DNS-like labels: ASCII letters, digits and `-`, neither
/// starting nor ending with `-`. Collection segments such as
/// `nvmeSubsystems` pass this check as well as ID segments.
pub fn validate_segment(segment: &str, position: usize) -> Result<(), NameError> {
    let invalid = || NameError::InvalidSegment {
        segment: segment.to_string(),
        position,
    };

    if segment.is_empty() || segment.len() > MAX_ID_LENGTH {
        return Err(invalid());
    }
    if segment.starts_with('-') || segment.ends_with('-') {
        return Err(invalid());
    }
    if !segment
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-')
    {
        return Err(invalid());
    }

    Ok(())
}

/// Generate a system-assigned ID.
///
/// Generated IDs are UUID v4 strings. They are trusted by construction and
/// skip [`validate_user_settable_id`].
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_simple_ids() {
        for id in ["subsys0", "a", "nvme-ctrl-1", "x9"] {
            assert!(validate_user_settable_id(id).is_ok(), "{id}");
        }
    }

    #[test]
    fn capital_letters_report_first_offender() {
        let err = validate_user_settable_id("CapitalLettersNotAllowed").unwrap_err();
        assert_eq!(
            err,
            NameError::IdCharacter {
                character: 'C',
                position: 0
            }
        );

        let err = validate_user_settable_id("lowerThenUpper").unwrap_err();
        assert_eq!(
            err,
            NameError::IdCharacter {
                character: 'T',
                position: 5
            }
        );
    }

    #[test]
    fn rejects_bad_start_and_end() {
        assert_eq!(
            validate_user_settable_id("1abc").unwrap_err(),
            NameError::IdStart
        );
        assert_eq!(
            validate_user_settable_id("-abc").unwrap_err(),
            NameError::IdStart
        );
        assert_eq!(
            validate_user_settable_id("abc-").unwrap_err(),
            NameError::IdEnd
        );
    }

    #[test]
    fn rejects_length_bounds() {
        assert!(matches!(
            validate_user_settable_id(""),
            Err(NameError::IdLength { .. })
        ));
        let long = "a".repeat(MAX_ID_LENGTH + 1);
        assert!(matches!(
            validate_user_settable_id(&long),
            Err(NameError::IdLength { .. })
        ));
        assert!(validate_user_settable_id(&"a".repeat(MAX_ID_LENGTH)).is_ok());
    }

    #[test]
    fn rejects_uuid_shaped_ids() {
        assert_eq!(
            validate_user_settable_id("abcdef01-2345-4678-9abc-def012345678").unwrap_err(),
            NameError::IdIsUuid
        );
    }

    #[test]
    fn generated_ids_are_unique_uuids() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }

    #[test]
    fn segment_grammar() {
        assert!(validate_segment("nvmeSubsystems", 0).is_ok());
        assert!(validate_segment("subsys-0", 1).is_ok());
        assert!(validate_segment("-ABC-DEF", 0).is_err());
        assert!(validate_segment("abc-", 0).is_err());
        assert!(validate_segment("a_b", 0).is_err());
        assert!(validate_segment("", 2).is_err());
    }
}
