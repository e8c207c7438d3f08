use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Next free innovation ids. Node and connection ids are counted independently, and only
/// ever grow over the course of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InnoHead {
    pub connection: usize,
    pub node: usize,
}

/// Hands out innovation ids for a single reproduction cycle. Identical structural mutations
/// within the cycle collapse onto the same id; a fresh [InnoGen] forgets them, but keeps
/// counting from the [InnoHead] it was given.
#[derive(Debug)]
pub struct InnoGen {
    head: InnoHead,
    paths: FxHashMap<(usize, usize), usize>,
    bisections: FxHashMap<(usize, usize), usize>,
}

impl InnoGen {
    pub fn new(head: InnoHead) -> Self {
        Self {
            head,
            paths: FxHashMap::default(),
            bisections: FxHashMap::default(),
        }
    }

    #[inline]
    pub fn head(&self) -> InnoHead {
        self.head
    }

    /// Connection id of a (from, to) path
    pub fn path(&mut self, v: (usize, usize)) -> usize {
        match self.paths.get(&v) {
            Some(n) => *n,
            None => {
                let n = self.head.connection;
                self.head.connection += 1;
                self.paths.insert(v, n);
                n
            }
        }
    }

    /// Node id of the node bisecting a (from, to) connection
    pub fn bisect(&mut self, v: (usize, usize)) -> usize {
        match self.bisections.get(&v) {
            Some(n) => *n,
            None => {
                let n = self.head.node;
                self.head.node += 1;
                self.bisections.insert(v, n);
                n
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_inno_gen() {
        let mut inno = InnoGen::new(InnoHead::default());
        assert_eq!(inno.head().connection, 0);
        assert_eq!(inno.path((0, 1)), 0);
        assert_eq!(inno.path((1, 2)), 1);
        assert_eq!(inno.path((0, 1)), 0);
        assert_eq!(inno.head().connection, 2);

        let mut inno2 = InnoGen::new(inno.head());
        assert_eq!(inno2.path((1, 0)), 2);
        assert_eq!(inno2.path((0, 1)), 3);
    }

    #[test]
    fn test_counters_are_independent() {
        let mut inno = InnoGen::new(InnoHead {
            connection: 10,
            node: 4,
        });
        assert_eq!(inno.bisect((0, 3)), 4);
        assert_eq!(inno.path((0, 3)), 10);
        assert_eq!(inno.bisect((0, 3)), 4);
        assert_eq!(inno.bisect((1, 3)), 5);
        assert_eq!(
            inno.head(),
            InnoHead {
                connection: 11,
                node: 6
            }
        );
    }
}
