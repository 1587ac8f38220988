//! Mapping between symbolic names and wire-safe names
//!
//! Field names, enum symbols, and type names in a schema are restricted to
//! wire-safe identifiers, while the values handed to the dispatcher may use a
//! different naming convention for the same things. A [`NameCodec`] converts
//! between the two; the dispatcher never rewrites a name itself.

use std::borrow::Cow;

use crate::schema::Field;

/// Converts symbolic names to and from their wire-safe forms
pub trait NameCodec: Send + Sync {
    /// Converts a symbolic name into its wire form
    fn mangle<'a>(&self, name: &'a str) -> Cow<'a, str>;

    /// Converts a wire name back into its symbolic form
    fn unmangle<'a>(&self, wire: &'a str) -> Cow<'a, str>;

    /// Returns the key under which a record value holds `field`
    fn field_key<'a>(&self, field: &'a Field) -> Cow<'a, str> {
        self.unmangle(field.name())
    }
}

/// Codec under which symbolic and wire names coincide
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Identity;

impl NameCodec for Identity {
    #[inline]
    fn mangle<'a>(&self, name: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(name)
    }

    #[inline]
    fn unmangle<'a>(&self, wire: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(wire)
    }
}

/// Codec for kebab-case symbolic names: `-` in a symbolic name is `_` on the wire
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DashUnderscore;

fn swap(s: &str, from: char, to: char) -> Cow<'_, str> {
    if s.contains(from) {
        Cow::Owned(s.replace(from, &to.to_string()))
    } else {
        Cow::Borrowed(s)
    }
}

impl NameCodec for DashUnderscore {
    fn mangle<'a>(&self, name: &'a str) -> Cow<'a, str> {
        swap(name, '-', '_')
    }

    fn unmangle<'a>(&self, wire: &'a str) -> Cow<'a, str> {
        swap(wire, '_', '-')
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::schema::Schema;

    #[test]
    fn dash_underscore() {
        let codec = DashUnderscore;
        assert_eq!(codec.mangle("first-name"), "first_name");
        assert_eq!(codec.unmangle("first_name"), "first-name");
        assert!(matches!(codec.mangle("plain"), Cow::Borrowed(_)));
        let field = Field::new("zip_code", Schema::string());
        assert_eq!(codec.field_key(&field), "zip-code");
        assert_eq!(Identity.field_key(&field), "zip_code");
    }
}
