/// Equivalence forest over provisional component labels.
///
/// Labels are handed out in increasing order by [`UnionFind::push`] while a
/// mask is scanned, and merged with [`UnionFind::union`] whenever two labels
/// turn out to touch. Merging keeps the larger set as the root.
#[derive(Debug, Default, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl UnionFind {
    /// Creates an empty forest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a new singleton label and returns it.
    pub fn push(&mut self) -> usize {
        let label = self.parent.len();
        self.parent.push(label);
        self.size.push(1);
        label
    }

    /// Returns the root label of the set containing `label`.
    ///
    /// Every visited label is re-pointed to its grandparent on the way up.
    pub fn find(&mut self, mut label: usize) -> usize {
        while self.parent[label] != label {
            let grandparent = self.parent[self.parent[label]];
            self.parent[label] = grandparent;
            label = grandparent;
        }
        label
    }

    /// Merges the sets of `a` and `b` and returns the root of the merged set.
    pub fn union(&mut self, a: usize, b: usize) -> usize {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return ra;
        }

        let (root, child) = if self.size[ra] >= self.size[rb] {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[child] = root;
        self.size[root] += self.size[child];
        root
    }

    /// Number of labels handed out so far.
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Returns `true` before the first label is pushed.
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }
}
