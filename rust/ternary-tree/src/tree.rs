use std::{cmp::Ordering, collections::BTreeMap};

use ternary_cache::TypedCache;

use crate::{
    Branch, Node, NodeId, NodeRecord, ROOT_NODE_KEY, Slot, TernaryTreeError, TreeOptions,
    ValueType,
};

/// The location of a [`Slot`]: either the root of the tree, or one of the
/// child positions of a loaded node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Edge {
    Root,
    Child(usize, Branch),
}

/// A ternary search tree mapping string keys to values, optionally persisted
/// node-by-node to a [`TypedCache`].
///
/// Nodes are owned by an arena inside the tree. Child positions hold either
/// an arena index or, for trees loaded from the cache, the [`NodeId`] of a
/// node that has not been fetched yet; such nodes are loaded on first access
/// and stay resident for the lifetime of the tree.
#[derive(Clone, Debug)]
pub struct Tree<Value, Cache>
where
    Value: ValueType,
    Cache: TypedCache + Clone,
{
    pub(crate) cache: Cache,
    pub(crate) arena: Vec<Node<Value>>,
    pub(crate) root: Slot,

    pub(crate) key_count: usize,
    pub(crate) node_count: u64,
    pub(crate) options: TreeOptions,
}

impl<Value, Cache> Tree<Value, Cache>
where
    Value: ValueType,
    Cache: TypedCache + Clone,
{
    /// Creates a new, empty [`Tree`] over the provided cache.
    pub fn new(cache: Cache, options: TreeOptions) -> Self {
        Self {
            cache,
            arena: Vec::new(),
            root: Slot::Absent,
            key_count: 0,
            node_count: 0,
            options,
        }
    }

    /// The [`TypedCache`] used by this tree.
    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// The [`TreeOptions`] this tree was created with.
    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    /// Whether nodes are persisted to the cache when the tree is built.
    pub fn is_caching(&self) -> bool {
        self.options.caching
    }

    /// Whether mutations are rejected.
    pub fn is_read_only(&self) -> bool {
        self.options.read_only
    }

    /// Whether the tree has no root.
    pub fn is_empty(&self) -> bool {
        !self.root.is_present()
    }

    /// The number of successful inserts into this tree, counting a key again
    /// each time its value is replaced. Not restored when a tree is loaded
    /// from the cache.
    pub fn key_count(&self) -> usize {
        self.key_count
    }

    /// The number of nodes created by this tree. Not restored when a tree is
    /// loaded from the cache.
    pub fn node_count(&self) -> u64 {
        self.node_count
    }

    /// The contents of the root position.
    pub fn root(&self) -> Slot {
        self.root
    }

    /// Builds the tree from a collection of key/value pairs.
    ///
    /// Keys are sorted and the median of every sub-range is inserted before
    /// either half, so the height of the tree tracks the logarithm of the key
    /// count no matter what order the keys arrive in. Empty keys are skipped.
    /// When a key occurs more than once, the last value wins.
    ///
    /// With caching enabled, any tree already published under
    /// [`ROOT_NODE_KEY`] is evicted first, and every node is saved once the
    /// tree is complete.
    ///
    /// Returns `false` (and does nothing) on a read-only tree.
    pub async fn build<Entries, Key>(&mut self, key_values: Entries) -> Result<bool, TernaryTreeError>
    where
        Entries: IntoIterator<Item = (Key, Value)>,
        Key: Into<String>,
    {
        if self.options.read_only {
            tracing::warn!("Refusing to build a read-only tree");
            return Ok(false);
        }

        if self.options.caching && self.cache.contains(ROOT_NODE_KEY).await? {
            tracing::debug!("Evicting the previously published tree");
            Self::delete_cached_tree(self.cache.clone()).await?;
        }

        let mut entries = BTreeMap::new();
        for (key, value) in key_values {
            let key: String = key.into();
            if key.is_empty() {
                tracing::warn!("Skipping an empty key while building");
                continue;
            }
            entries.insert(key, value);
        }
        let mut entries: Vec<(String, Option<Value>)> = entries
            .into_iter()
            .map(|(key, value)| (key, Some(value)))
            .collect();

        tracing::debug!(keys = entries.len(), "Building tree");

        let mut ranges = vec![(0usize, entries.len())];
        while let Some((start, length)) = ranges.pop() {
            if length < 1 {
                continue;
            }

            let middle = length >> 1;
            let (key, value) = &mut entries[start + middle];
            if let Some(value) = value.take() {
                self.try_insert(key, value).await?;
            }

            // The lower half is popped (and therefore inserted) first
            ranges.push((start + middle + 1, length - middle - 1));
            ranges.push((start, middle));
        }

        if self.options.caching {
            self.save_to_cache().await?;
        }

        Ok(true)
    }

    /// Inserts a `key`/`value` pair, replacing the value of an existing key.
    ///
    /// Returns `false` when the key is empty or the tree is read-only; these
    /// rejections are logged rather than raised. See [`Tree::try_insert`] for
    /// the strict variant.
    pub async fn insert(&mut self, key: &str, value: Value) -> Result<bool, TernaryTreeError> {
        match self.try_insert(key, value).await {
            Ok(()) => Ok(true),
            Err(error) if error.is_rejection() => {
                tracing::warn!(key, %error, "Insert rejected");
                Ok(false)
            }
            Err(error) => Err(error),
        }
    }

    /// Inserts a `key`/`value` pair, surfacing rejections as
    /// [`TernaryTreeError::InvalidInput`] or [`TernaryTreeError::ReadOnly`].
    pub async fn try_insert(&mut self, key: &str, value: Value) -> Result<(), TernaryTreeError> {
        if self.options.read_only {
            return Err(TernaryTreeError::ReadOnly);
        }
        if key.is_empty() {
            return Err(TernaryTreeError::InvalidInput(
                "Keys must contain at least one character".into(),
            ));
        }

        let mut characters = key.chars().peekable();
        let mut value = Some(value);
        let mut edge = Edge::Root;

        while let Some(&character) = characters.peek() {
            let index = match self.resolve(edge).await? {
                Some(index) => index,
                None => self.lay_down(edge, character),
            };

            let node = &mut self.arena[index];
            match character.cmp(&node.character()) {
                Ordering::Less => edge = Edge::Child(index, Branch::Lower),
                Ordering::Greater => edge = Edge::Child(index, Branch::Higher),
                Ordering::Equal => {
                    characters.next();
                    if characters.peek().is_none() {
                        *node.value_mut() = value.take();
                    }
                    edge = Edge::Child(index, Branch::Continuation);
                }
            }
        }

        self.key_count += 1;

        Ok(())
    }

    /// Looks up the value stored for exactly `key`.
    ///
    /// A node missing from the cache is reported as
    /// [`TernaryTreeError::TreeCorrupt`].
    pub async fn get(&mut self, key: &str) -> Result<Option<Value>, TernaryTreeError> {
        let anchor = self
            .descend(key)
            .await
            .map_err(TernaryTreeError::into_corrupt)?;

        Ok(anchor.and_then(|index| self.arena[index].value().cloned()))
    }

    /// Walks down the tree matching every character of `prefix`, returning the
    /// arena index of the node that matches the last one.
    pub(crate) async fn descend(&mut self, prefix: &str) -> Result<Option<usize>, TernaryTreeError> {
        let mut characters = prefix.chars().peekable();
        let mut edge = Edge::Root;

        while let Some(&character) = characters.peek() {
            let Some(index) = self.resolve(edge).await? else {
                return Ok(None);
            };

            match character.cmp(&self.arena[index].character()) {
                Ordering::Less => edge = Edge::Child(index, Branch::Lower),
                Ordering::Greater => edge = Edge::Child(index, Branch::Higher),
                Ordering::Equal => {
                    characters.next();
                    if characters.peek().is_none() {
                        return Ok(Some(index));
                    }
                    edge = Edge::Child(index, Branch::Continuation);
                }
            }
        }

        Ok(None)
    }

    /// Returns the arena index of the node in the slot at `edge`, fetching it
    /// from the cache if it has not been loaded yet.
    ///
    /// A node that should be in the cache but is not is reported as
    /// [`TernaryTreeError::KeyNotFound`]; it is never mistaken for an absent
    /// child.
    pub(crate) async fn resolve(&mut self, edge: Edge) -> Result<Option<usize>, TernaryTreeError> {
        match self.slot(edge) {
            Slot::Absent => Ok(None),
            Slot::Loaded(index) => Ok(Some(index)),
            Slot::Unloaded(id) => {
                let key = id.key();
                let Some(record) = self.cache.read::<NodeRecord<Value>>(&key).await? else {
                    return Err(TernaryTreeError::KeyNotFound(key));
                };
                if record.id != id {
                    return Err(TernaryTreeError::UnexpectedTreeShape(format!(
                        "Expected node {id} under {key}, found node {}",
                        record.id
                    )));
                }

                let index = self.adopt(Node::from_record(record));
                *self.slot_mut(edge) = Slot::Loaded(index);

                tracing::trace!(%id, index, "Loaded node");

                Ok(Some(index))
            }
        }
    }

    /// Creates a node for `character` in the empty slot at `edge`.
    fn lay_down(&mut self, edge: Edge, character: char) -> usize {
        let id = NodeId::new(self.node_count);
        self.node_count += 1;

        let index = self.adopt(Node::new(id, character));
        *self.slot_mut(edge) = Slot::Loaded(index);
        index
    }

    pub(crate) fn adopt(&mut self, node: Node<Value>) -> usize {
        self.arena.push(node);
        self.arena.len() - 1
    }

    fn slot(&self, edge: Edge) -> Slot {
        match edge {
            Edge::Root => self.root,
            Edge::Child(index, branch) => self.arena[index].slot(branch),
        }
    }

    fn slot_mut(&mut self, edge: Edge) -> &mut Slot {
        match edge {
            Edge::Root => &mut self.root,
            Edge::Child(index, branch) => self.arena[index].slot_mut(branch),
        }
    }
}
