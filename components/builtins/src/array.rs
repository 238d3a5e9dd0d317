//! Array namespace operations
//!
//! The operations are generic over the element type so the interpreter can
//! apply them to its own heap-resident element vectors.

/// Array namespace methods
pub struct ArrayPrototype;

impl ArrayPrototype {
    /// Array.push(arr, element); returns the new length
    pub fn push<T>(elements: &mut Vec<T>, element: T) -> usize {
        elements.push(element);
        elements.len()
    }

    /// Array.pop(arr); `None` when empty
    pub fn pop<T>(elements: &mut Vec<T>) -> Option<T> {
        elements.pop()
    }

    /// Array.map(arr, fn); `f` receives each element and its index and may fail
    pub fn map<T, U, E, F>(elements: &[T], mut f: F) -> Result<Vec<U>, E>
    where
        F: FnMut(&T, usize) -> Result<U, E>,
    {
        elements
            .iter()
            .enumerate()
            .map(|(idx, element)| f(element, idx))
            .collect()
    }
}
