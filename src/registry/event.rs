//! Notification event type

use std::sync::Arc;

/// A change observed on one tenant
///
/// Cheap to clone: the value is reference counted and shared by every
/// subscriber that receives it.
#[derive(Debug, PartialEq)]
pub enum StateEvent<V> {
    /// The tenant now holds this value
    Present(Arc<V>),
    /// The tenant's value no longer exists (expired, removed, or never set)
    Absent,
}

impl<V> StateEvent<V> {
    /// Get the carried value, if any
    pub fn value(&self) -> Option<&V> {
        match self {
            StateEvent::Present(value) => Some(value),
            StateEvent::Absent => None,
        }
    }

    /// Check if this is an absence signal
    pub fn is_absent(&self) -> bool {
        matches!(self, StateEvent::Absent)
    }
}

impl<V> Clone for StateEvent<V> {
    fn clone(&self) -> Self {
        match self {
            StateEvent::Present(value) => StateEvent::Present(Arc::clone(value)),
            StateEvent::Absent => StateEvent::Absent,
        }
    }
}

impl<V> From<Option<Arc<V>>> for StateEvent<V> {
    fn from(value: Option<Arc<V>>) -> Self {
        match value {
            Some(value) => StateEvent::Present(value),
            None => StateEvent::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_option() {
        let present = StateEvent::from(Some(Arc::new(3)));
        assert_eq!(present.value(), Some(&3));
        assert!(!present.is_absent());

        let absent = StateEvent::<u32>::from(None);
        assert_eq!(absent.value(), None);
        assert!(absent.is_absent());
    }

    #[test]
    fn test_clone_shares_value() {
        let value = Arc::new(String::from("state"));
        let event = StateEvent::Present(Arc::clone(&value));
        let copy = event.clone();

        assert_eq!(copy, event);
        assert_eq!(Arc::strong_count(&value), 3);
    }
}
