use std::fmt;
use std::sync::Arc;

/// Persistent singly linked stack.
///
/// Pushing and popping produce new stacks that share their tails with the
/// original, so consecutive parser configurations cost O(1) extra memory per step
/// while every earlier configuration stays intact.
pub struct Stack<T> {
    head: Option<Arc<Node<T>>>,
    len: usize,
}

struct Node<T> {
    value: T,
    next: Option<Arc<Node<T>>>,
}

impl<T> Stack<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self { head: None, len: 0 }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.head.as_deref().map(|node| &node.value)
    }

    #[must_use]
    pub fn push(&self, value: T) -> Self {
        Self {
            head: Some(Arc::new(Node {
                value,
                next: self.head.clone(),
            })),
            len: self.len + 1,
        }
    }

    /// The top value and the stack below it.
    #[must_use]
    pub fn pop(&self) -> Option<(&T, Self)> {
        self.head.as_deref().map(|node| {
            (
                &node.value,
                Self {
                    head: node.next.clone(),
                    len: self.len - 1,
                },
            )
        })
    }

    /// Iterate from the top of the stack down.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.head.as_deref(),
        }
    }
}

impl<T: Clone> Stack<T> {
    /// Push `values` so that the first one ends on top.
    #[must_use]
    pub fn push_all(&self, values: &[T]) -> Self {
        values
            .iter()
            .rev()
            .fold(self.clone(), |stack, value| stack.push(value.clone()))
    }

    /// Drop the top `values.len()` entries if they are exactly `values`, first value
    /// on top. Returns `None` when they differ.
    #[must_use]
    pub fn strip_prefix(&self, values: &[T]) -> Option<Self>
    where
        T: PartialEq,
    {
        let mut rest = self.clone();
        for expected in values {
            let (top, below) = rest.pop()?;
            if top != expected {
                return None;
            }
            rest = below;
        }
        Some(rest)
    }

    /// Values from the bottom of the stack up.
    #[must_use]
    pub fn to_vec_bottom_up(&self) -> Vec<T> {
        let mut values: Vec<T> = self.iter().cloned().collect();
        values.reverse();
        values
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Manual impl: cloning only bumps the head's reference count.
impl<T> Clone for Stack<T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
            len: self.len,
        }
    }
}

impl<T> Drop for Stack<T> {
    fn drop(&mut self) {
        // Unlink iteratively; the default recursive drop overflows on long stacks.
        let mut next = self.head.take();
        while let Some(node) = next {
            match Arc::try_unwrap(node) {
                Ok(mut node) => next = node.next.take(),
                Err(_) => break,
            }
        }
    }
}

impl<T: PartialEq> PartialEq for Stack<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for Stack<T> {}

impl<T: fmt::Debug> fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for Stack<T> {
    /// The last value yielded ends on top.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |stack, value| stack.push(value))
    }
}

pub struct Iter<'a, T> {
    next: Option<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            &node.value
        })
    }
}

impl<'a, T> IntoIterator for &'a Stack<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
