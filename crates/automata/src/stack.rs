use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::sync::Arc;

/// An immutable stack of characters, used by the configurations of pushdown
/// automata.
///
/// Pushing and popping return a new stack that shares its tail with the
/// original, which remains valid and unchanged.
#[derive(Clone, Default)]
pub struct Stack {
    head: Option<Arc<Node>>,
    len: usize,
}

struct Node {
    symbol: char,
    next: Option<Arc<Node>>,
}

impl Stack {
    /// Creates a stack with the given contents, where the first character is the top.
    pub fn new(contents: impl IntoIterator<Item = char>) -> Stack {
        let contents: Vec<char> = contents.into_iter().collect();
        contents
            .into_iter()
            .rev()
            .fold(Stack::default(), |stack, symbol| stack.push(symbol))
    }

    /// Returns a new stack with the given symbol on top.
    pub fn push(&self, symbol: char) -> Stack {
        Stack {
            head: Some(Arc::new(Node {
                symbol,
                next: self.head.clone(),
            })),
            len: self.len + 1,
        }
    }

    /// Returns a new stack without the top symbol. Popping the empty stack
    /// yields the empty stack.
    pub fn pop(&self) -> Stack {
        match &self.head {
            Some(node) => Stack {
                head: node.next.clone(),
                len: self.len - 1,
            },
            None => Stack::default(),
        }
    }

    /// Returns the top symbol of the stack, if any.
    pub fn top(&self) -> Option<char> {
        self.head.as_ref().map(|node| node.symbol)
    }

    /// Returns the number of symbols on the stack.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true iff the stack contains no symbols.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Iterates over the symbols from the top to the bottom.
    pub fn iter(&self) -> StackIter<'_> {
        StackIter {
            current: self.head.as_deref(),
        }
    }
}

/// Iterator over the symbols of a [Stack], from top to bottom.
pub struct StackIter<'a> {
    current: Option<&'a Node>,
}

impl Iterator for StackIter<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        let node = self.current?;
        self.current = node.next.as_deref();
        Some(node.symbol)
    }
}

impl Drop for Stack {
    fn drop(&mut self) {
        // Unlink the nodes that are no longer shared one by one, the default
        // recursive drop overflows the call stack for long stacks.
        let mut head = self.head.take();
        while let Some(node) = head {
            match Arc::try_unwrap(node) {
                Ok(mut node) => head = node.next.take(),
                Err(_) => break,
            }
        }
    }
}

impl PartialEq for Stack {
    fn eq(&self, other: &Self) -> bool {
        if self.len != other.len {
            return false;
        }

        match (&self.head, &other.head) {
            (Some(left), Some(right)) if Arc::ptr_eq(left, right) => true,
            _ => self.iter().eq(other.iter()),
        }
    }
}

impl Eq for Stack {}

impl PartialOrd for Stack {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Stack {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl Hash for Stack {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len.hash(state);
        for symbol in self.iter() {
            symbol.hash(state);
        }
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut symbols = self.iter();
        if let Some(top) = symbols.next() {
            write!(f, "({top})")?;
        }

        for symbol in symbols {
            write!(f, "{symbol}")?;
        }

        Ok(())
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stack {self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_stack_operations() {
        let stack = Stack::new("abcde".chars());

        assert_eq!(stack.top(), Some('a'));
        assert_eq!(stack.pop().pop().top(), Some('c'));
        assert_eq!(stack.push('x').top(), Some('x'));
        assert_eq!(stack.len(), 5);
        assert_eq!(format!("{stack}"), "(a)bcde");
    }

    #[test]
    fn test_stack_is_persistent() {
        let stack = Stack::new("ab".chars());
        let pushed = stack.push('x');
        let popped = stack.pop();

        // The original is unchanged by deriving new stacks from it.
        assert_eq!(stack.iter().collect::<String>(), "ab");
        assert_eq!(pushed.iter().collect::<String>(), "xab");
        assert_eq!(popped.iter().collect::<String>(), "b");

        assert_eq!(pushed.pop(), stack);
        assert_eq!(popped.push('a'), stack);
    }

    #[test]
    fn test_pop_empty_stack() {
        let stack = Stack::default();

        assert!(stack.is_empty());
        assert_eq!(stack.top(), None);
        assert!(stack.pop().is_empty());
    }

    #[test]
    fn test_drop_long_stack() {
        let mut stack = Stack::default();
        for _ in 0..1_000_000 {
            stack = stack.push('a');
        }

        assert_eq!(stack.len(), 1_000_000);
        drop(stack);
    }
}
