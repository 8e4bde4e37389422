use std::fmt;
use std::sync::Arc;

/// Key under which a schema is bound, typically a fully-qualified type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeIdentity(Arc<str>);

impl TypeIdentity {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// Identity declared by a [`SchemaBound`] type.
    pub fn of<T: SchemaBound + ?Sized>() -> Self {
        Self::new(T::TYPE_ID)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeIdentity {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeIdentity {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<&TypeIdentity> for TypeIdentity {
    fn from(identity: &TypeIdentity) -> Self {
        identity.clone()
    }
}

/// Application type with a fixed schema binding key.
///
/// ```
/// use schemabind_manager::{SchemaBound, TypeIdentity};
///
/// struct User;
///
/// impl SchemaBound for User {
///     const TYPE_ID: &'static str = "com.example.User";
/// }
///
/// assert_eq!(TypeIdentity::of::<User>().as_str(), "com.example.User");
/// ```
pub trait SchemaBound {
    const TYPE_ID: &'static str;
}
