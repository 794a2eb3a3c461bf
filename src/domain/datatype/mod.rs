use crate::{
    base::resource_id,
    error::resource::{ValidationErrorKind, ValidationFieldError},
};

// ### JsonPointer

/// Reference to a value inside a JSON document, as described in
/// [RFC 6901](https://www.rfc-editor.org/rfc/rfc6901).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JsonPointer {
    segments: Vec<Box<str>>,
}

resource_id!(JsonPointer, "base::JsonPointer");

impl JsonPointer {
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Single segment of a pointer that references a direct member of the root object.
    pub fn as_member(&self) -> Option<&str> {
        match self.segments.as_slice() {
            [member] => Some(&**member),
            _ => None,
        }
    }

    pub fn push(mut self, segment: &str) -> Self {
        self.segments.push(segment.into());
        self
    }
}

impl std::str::FromStr for JsonPointer {
    type Err = ValidationFieldError;

    fn from_str(pointer: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            ValidationFieldError::from_resource::<JsonPointer>(
                pointer.into(),
                "/path".into(),
                vec![ValidationErrorKind::Invalid],
            )
        };

        if pointer.is_empty() {
            return Ok(Self::root());
        }

        let rest = pointer.strip_prefix('/').ok_or_else(invalid)?;

        let mut segments = Vec::new();
        for raw in rest.split('/') {
            segments.push(unescape(raw).ok_or_else(invalid)?.into_boxed_str());
        }

        Ok(Self { segments })
    }
}

/// Decodes `~1` into `/` and `~0` into `~`, rejecting any other escape.
fn unescape(segment: &str) -> Option<String> {
    let mut out = String::with_capacity(segment.len());
    let mut chars = segment.chars();
    while let Some(ch) = chars.next() {
        if ch != '~' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            _ => return None,
        }
    }
    Some(out)
}

impl std::fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for segment in self.segments.iter() {
            write!(f, "/{}", segment.replace('~', "~0").replace('/', "~1"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::JsonPointer;

    #[test]
    fn parse_member_pointer() {
        let pointer: JsonPointer = "/name".parse().unwrap();
        assert_eq!(pointer.as_member(), Some("name"));
        assert_eq!(pointer.to_string(), "/name");
    }

    #[test]
    fn parse_escaped_segments() {
        let pointer: JsonPointer = "/a~1b/m~0n".parse().unwrap();
        assert_eq!(pointer, JsonPointer::root().push("a/b").push("m~n"));
        assert_eq!(pointer.as_member(), None);
        assert_eq!(pointer.to_string(), "/a~1b/m~0n");
    }

    #[test]
    fn empty_pointer_is_root() {
        let pointer: JsonPointer = "".parse().unwrap();
        assert_eq!(pointer, JsonPointer::root());
        assert_eq!(pointer.to_string(), "");
    }

    #[test]
    fn reject_malformed_pointers() {
        assert!("name".parse::<JsonPointer>().is_err());
        assert!("/bad~2escape".parse::<JsonPointer>().is_err());
        assert!("/trailing~".parse::<JsonPointer>().is_err());
    }
}
