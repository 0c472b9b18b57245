use serde::{Serialize, Serializer};

/// Findings that serialize as the plain `"None"` string when there are none.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Found<T>(pub Vec<T>);

impl<T> Found<T> {
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }
}

impl<T> From<Vec<T>> for Found<T> {
    fn from(items: Vec<T>) -> Self {
        Self(items)
    }
}

impl<T: Serialize> Serialize for Found<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.is_empty() { serializer.serialize_str("None") } else { self.0.serialize(serializer) }
    }
}
