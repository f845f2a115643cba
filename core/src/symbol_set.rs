//! Sets of input symbols, used both as the first sets of parsers and as the
//! "expected" part of failures.

use std::{borrow::Cow, fmt, mem, sync::Arc};


/// What input symbols must be: cloneable (cursors hand them out by value),
/// comparable for equality (to match literal symbols), debuggable (to describe
/// failures), and shareable between threads (so grammars are).
pub trait Symbol: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {}

impl<T> Symbol for T
    where T: Clone + PartialEq + fmt::Debug + Send + Sync + 'static,
{}


/// The signature of the functions that [`Predicate`]s wrap.
pub type PredicateFn<T> = dyn Fn(&T) -> bool + Send + Sync;

/// A named test of symbols.  The name is how the set of symbols that pass the
/// test is described in failures, e.g. `digit` or `letter`.
pub struct Predicate<T> {
    name: Cow<'static, str>,
    test: Arc<PredicateFn<T>>,
}

impl<T> Predicate<T> {
    /// Make a new one.
    pub fn new<N, F>(name: N, test: F) -> Self
        where N: Into<Cow<'static, str>>,
              F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self { name: name.into(), test: Arc::new(test) }
    }

    /// The name describing this predicate.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Does the given symbol pass this predicate?
    #[inline]
    pub fn test(&self, symbol: &T) -> bool {
        (self.test)(symbol)
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Self { name: self.name.clone(), test: Arc::clone(&self.test) }
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate").field(&self.name).finish()
    }
}

/// Predicates cannot be compared by their functions, so this compares their
/// names.  Two separately constructed predicates with the same name are
/// considered the same set, which is what makes first sets of separately
/// constructed but otherwise identical grammars compare equal.
impl<T> PartialEq for Predicate<T> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}


/// A possibly-infinite set of symbols, described abstractly.
///
/// Sets are built up with [`union`](Self::union), which simplifies as it goes:
/// `Empty` is its identity and `All` absorbs everything, so a `Union` never
/// contains either of those.
pub enum SymbolSet<T> {
    /// No symbols.
    Empty,
    /// Every symbol.
    All,
    /// Exactly one symbol.
    Value(T),
    /// The symbols that pass a predicate.
    Predicate(Predicate<T>),
    /// The symbols in either operand.
    Union(Arc<SymbolSet<T>>, Arc<SymbolSet<T>>),
}

impl<T> SymbolSet<T> {
    /// The set of the symbols that pass the given test, described by `name`.
    pub fn predicate<N, F>(name: N, test: F) -> Self
        where N: Into<Cow<'static, str>>,
              F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Predicate::new(name, test))
    }

    /// Is this the empty set?  (Because of how unions simplify, only `Empty`
    /// can be.)
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Is this the set of all symbols?
    #[inline]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// The set of symbols in either `self` or `other`.
    pub fn union(self, other: Self) -> Self {
        match (self, other) {
            (Self::Empty, other) => other,
            (this, Self::Empty) => this,
            (Self::All, _) | (_, Self::All) => Self::All,
            (this, other) => Self::Union(Arc::new(this), Arc::new(other)),
        }
    }

    /// The leaves of this set, i.e. the non-`Union` sets whose union it is, in
    /// left-to-right order.
    pub fn leaves(&self) -> Vec<&Self> {
        // Iterative, to avoid stack overflows for long chains of alternatives.
        let mut leaves = Vec::new();
        let mut stack = vec![self];
        while let Some(set) = stack.pop() {
            match set {
                Self::Union(left, right) => {
                    stack.push(right);
                    stack.push(left);
                }
                leaf => leaves.push(leaf),
            }
        }
        leaves
    }
}

impl<T> SymbolSet<T>
    where T: PartialEq,
{
    /// Is the given symbol a member?
    pub fn matches(&self, symbol: &T) -> bool {
        let mut stack = vec![self];
        while let Some(set) = stack.pop() {
            let found = match set {
                Self::Empty => false,
                Self::All => true,
                Self::Value(v) => v == symbol,
                Self::Predicate(p) => p.test(symbol),
                Self::Union(left, right) => {
                    stack.push(right);
                    stack.push(left);
                    false
                }
            };
            if found {
                return true;
            }
        }
        false
    }
}

impl<T> Clone for SymbolSet<T>
    where T: Clone,
{
    fn clone(&self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::All => Self::All,
            Self::Value(v) => Self::Value(v.clone()),
            Self::Predicate(p) => Self::Predicate(p.clone()),
            Self::Union(l, r) => Self::Union(Arc::clone(l), Arc::clone(r)),
        }
    }
}

/// Unions can be very long chains, e.g. the first set of a long `choice`, so
/// they are unlinked and dropped in a loop instead of recursively.
///
/// A node that is still shared elsewhere is left for its last owner, whose
/// drop of it comes back here.
impl<T> Drop for SymbolSet<T> {
    fn drop(&mut self) {
        let mut unlinked = Vec::new();
        unlink(self, &mut unlinked);
        while let Some(set) = unlinked.pop() {
            if let Ok(mut set) = Arc::try_unwrap(set) {
                unlink(&mut set, &mut unlinked);
            }
        }
    }
}

/// Move the operands of a union into `into`, leaving it a union of empties.
fn unlink<T>(set: &mut SymbolSet<T>, into: &mut Vec<Arc<SymbolSet<T>>>) {
    if let SymbolSet::Union(left, right) = set {
        let empty = Arc::new(SymbolSet::Empty);
        into.push(mem::replace(left, Arc::clone(&empty)));
        into.push(mem::replace(right, empty));
    }
}

/// Structural equality, where predicates compare by name.  Sets that contain
/// the same symbols but were built differently are not equal.
impl<T> PartialEq for SymbolSet<T>
    where T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        let (ls, rs) = (self.leaves(), other.leaves());
        ls.len() == rs.len()
            && ls.iter().zip(rs).all(|(l, r)| match (l, r) {
                (Self::Empty, Self::Empty) | (Self::All, Self::All) => true,
                (Self::Value(a), Self::Value(b)) => a == b,
                (Self::Predicate(a), Self::Predicate(b)) => a == b,
                _ => false,
            })
    }
}

impl<T> fmt::Debug for SymbolSet<T>
    where T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::All => f.write_str("All"),
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Predicate(p) => fmt::Debug::fmt(p, f),
            Self::Union(l, r) => f.debug_tuple("Union").field(l).field(r).finish(),
        }
    }
}

/// Describes the set for humans, e.g. `'a', digit or letter`.  Duplicate
/// descriptions are only shown once.
impl<T> fmt::Display for SymbolSet<T>
    where T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut descs: Vec<String> = Vec::new();
        for leaf in self.leaves() {
            let desc = match leaf {
                Self::Empty => continue,
                Self::All => "any symbol".to_owned(),
                Self::Value(v) => format!("{:?}", v),
                Self::Predicate(p) => p.name().to_owned(),
                Self::Union(..) => unreachable!("leaves are never unions"),
            };
            if !descs.contains(&desc) {
                descs.push(desc);
            }
        }
        match descs.split_last() {
            None => f.write_str("nothing"),
            Some((last, [])) => f.write_str(last),
            Some((last, init)) => write!(f, "{} or {}", init.join(", "), last),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn digit() -> SymbolSet<char> {
        SymbolSet::predicate("digit", |c: &char| c.is_ascii_digit())
    }

    #[test]
    fn membership() {
        let s = SymbolSet::Value('a').union(digit());
        assert!(s.matches(&'a'));
        assert!(s.matches(&'7'));
        assert!(!s.matches(&'b'));
        assert!(!SymbolSet::<char>::Empty.matches(&'a'));
        assert!(SymbolSet::<char>::All.matches(&'a'));
    }

    #[test]
    fn union_simplifies() {
        let v = || SymbolSet::Value(1_u8);
        assert_eq!(SymbolSet::Empty.union(v()), v());
        assert_eq!(v().union(SymbolSet::Empty), v());
        assert!(v().union(SymbolSet::All).is_all());
        assert!(SymbolSet::All.union(v()).is_all());
        assert!(SymbolSet::<u8>::Empty.union(SymbolSet::Empty).is_empty());
        assert!(matches!(v().union(SymbolSet::Value(2)), SymbolSet::Union(..)));
    }

    #[test]
    fn equality() {
        assert_eq!(digit(), digit());
        assert_ne!(digit(), SymbolSet::predicate("letter", |c: &char| c.is_alphabetic()));
        assert_eq!(SymbolSet::Value('x').union(digit()),
                   SymbolSet::Value('x').union(digit()));
        assert_ne!(SymbolSet::Value('x').union(digit()),
                   digit().union(SymbolSet::Value('x')));
        assert_ne!(SymbolSet::Value('x'), SymbolSet::All);
    }

    #[test]
    fn display() {
        assert_eq!(SymbolSet::<char>::Empty.to_string(), "nothing");
        assert_eq!(SymbolSet::<char>::All.to_string(), "any symbol");
        assert_eq!(SymbolSet::Value('a').to_string(), "'a'");
        assert_eq!(SymbolSet::Value('a').union(digit()).to_string(), "'a' or digit");
        assert_eq!(SymbolSet::Value('a')
                       .union(SymbolSet::Value('b'))
                       .union(digit())
                       .union(SymbolSet::Value('a'))
                       .to_string(),
                   "'a', 'b' or digit");
    }

    #[test]
    fn deep_unions() {
        let mut s = SymbolSet::Value(0_u32);
        for i in 1 .. 1_000 {
            s = s.union(SymbolSet::Value(i));
        }
        assert!(s.matches(&0));
        assert!(s.matches(&999));
        assert!(!s.matches(&1_000));
        assert_eq!(s.leaves().len(), 1_000);
    }

    #[test]
    fn dropping_deep_unions() {
        let mut s = SymbolSet::Value(0_u32);
        for i in 1 .. 1_000_000 {
            s = s.union(SymbolSet::Value(i));
        }
        let shared = s.clone();
        drop(s);
        assert!(shared.matches(&999_999));
        drop(shared);

        // Both operands deep.
        let chain = |n: u32| (1 .. n).fold(SymbolSet::Value(0_u32),
                                           |s, i| s.union(SymbolSet::Value(i)));
        drop(chain(300_000).union(chain(300_000)));
    }
}
