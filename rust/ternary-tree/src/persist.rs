use std::collections::HashSet;

use serde::de::IgnoredAny;
use ternary_cache::{TernaryCacheError, TypedCache};

use crate::{
    Node, NodeId, NodeRecord, ROOT_NODE_KEY, Slot, TernaryTreeError, TraversalOrder, Tree,
    TreeOptions, ValueType, traverse::Missing,
};

impl<Value, Cache> Tree<Value, Cache>
where
    Value: ValueType,
    Cache: TypedCache + Clone,
{
    /// Writes every node of the tree to the cache under its node key, in
    /// post-order. Children are stored as ids, so each node occupies exactly
    /// one cache entry.
    ///
    /// Returns `false` (and writes nothing) on a read-only tree.
    pub async fn save_to_cache(&mut self) -> Result<bool, TernaryTreeError> {
        if self.options.read_only {
            tracing::warn!("Refusing to save a read-only tree");
            return Ok(false);
        }

        let order = self
            .visit_order(TraversalOrder::PostOrder, Missing::Fail)
            .await?;

        tracing::debug!(nodes = order.len(), "Saving tree to cache");

        for index in order {
            let node = &self.arena[index];
            let record = node.to_record(&self.arena);
            self.cache.write(node.id().key(), &record).await?;
        }

        Ok(true)
    }

    /// Replaces the contents of this tree with the node stored under `key`,
    /// which becomes the root. Its descendants are fetched lazily as they are
    /// reached.
    ///
    /// Returns `false` and leaves the tree untouched when nothing is stored
    /// under `key`. A loaded tree is read-only, since the ids of any nodes it
    /// created could collide with ids of nodes that are still in the cache.
    pub async fn load_from_cache(&mut self, key: &str) -> Result<bool, TernaryTreeError> {
        let Some(record) = self.cache.read::<NodeRecord<Value>>(key).await? else {
            tracing::debug!(key, "No tree stored in cache");
            return Ok(false);
        };

        tracing::debug!(key, id = %record.id, "Loaded tree root from cache");

        self.arena.clear();
        self.key_count = 0;
        self.node_count = 0;
        self.options.read_only = true;

        let index = self.adopt(Node::from_record(record));
        self.root = Slot::Loaded(index);

        Ok(true)
    }

    /// Removes every node of the tree from the cache, in post-order. Nodes
    /// that are already missing from the cache (along with anything below
    /// them) are skipped.
    ///
    /// The in-memory tree is left as it was.
    pub async fn delete_from_cache(&mut self) -> Result<(), TernaryTreeError> {
        let order = self
            .visit_order(TraversalOrder::PostOrder, Missing::Skip)
            .await?;

        tracing::debug!(nodes = order.len(), "Deleting tree from cache");

        for index in order {
            let key = self.arena[index].id().key();
            self.cache.remove(&key).await?;
        }

        Ok(())
    }

    /// Removes the single cache entry of the node with the given `id`. Its
    /// children are not affected.
    pub async fn delete_node(&mut self, id: NodeId) -> Result<(), TernaryTreeError> {
        self.cache.remove(&id.key()).await?;
        Ok(())
    }

    /// Loads the tree published under [`ROOT_NODE_KEY`], if there is one.
    /// The returned tree is read-only.
    pub async fn get_cached_tree(cache: Cache) -> Result<Option<Self>, TernaryTreeError> {
        let mut tree = Self::new(cache, TreeOptions::default().caching(true).read_only(true));

        if tree.load_from_cache(ROOT_NODE_KEY).await? {
            Ok(Some(tree))
        } else {
            Ok(None)
        }
    }

    /// Removes every node of the tree published under [`ROOT_NODE_KEY`] from
    /// the cache, in post-order. Returns `false` when there was no such tree.
    ///
    /// Values are never decoded, so a generation stored with a different value
    /// type is removed all the same. Entries that cannot be decoded as nodes
    /// are removed without following their links, and nodes already missing
    /// from the cache are skipped.
    pub async fn delete_cached_tree(mut cache: Cache) -> Result<bool, TernaryTreeError> {
        if !cache.contains(ROOT_NODE_KEY).await? {
            return Ok(false);
        }

        let mut visited = HashSet::new();
        let mut order = Vec::new();
        let mut stack = vec![Step::Enter(NodeId::ROOT)];

        while let Some(step) = stack.pop() {
            let id = match step {
                Step::Exit(id) => {
                    order.push(id);
                    continue;
                }
                Step::Enter(id) => id,
            };
            if !visited.insert(id) {
                tracing::warn!(%id, "Node is linked more than once");
                continue;
            }

            let key = id.key();
            match cache.read::<NodeRecord<IgnoredAny>>(&key).await {
                Ok(Some(record)) => {
                    stack.push(Step::Exit(id));
                    for link in [record.higher, record.continuation, record.lower]
                        .into_iter()
                        .flatten()
                    {
                        stack.push(Step::Enter(link));
                    }
                }
                Ok(None) => {
                    tracing::warn!(%key, "Skipping a node that is missing from the cache");
                }
                Err(TernaryCacheError::DecodeFailed(reason)) => {
                    tracing::warn!(%key, %reason, "Removing an entry that is not a node");
                    order.push(id);
                }
                Err(error) => return Err(error.into()),
            }
        }

        tracing::debug!(nodes = order.len(), "Deleting published tree from cache");

        for id in order {
            cache.remove(&id.key()).await?;
        }

        Ok(true)
    }
}

enum Step {
    Enter(NodeId),
    Exit(NodeId),
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use ternary_cache::{TypedCache, make_memory_cache};

    use crate::{NodeId, NodeRecord, ROOT_NODE_KEY, Tree, TreeOptions};

    #[tokio::test]
    async fn it_stores_children_as_ids() -> Result<()> {
        let (cache, _) = make_memory_cache();
        let mut tree = Tree::<u32, _>::new(cache.clone(), TreeOptions::default());

        tree.insert("ab", 1).await?;
        tree.insert("c", 2).await?;
        assert!(tree.save_to_cache().await?);

        let root = cache.read::<NodeRecord<u32>>(ROOT_NODE_KEY).await?;

        assert_eq!(
            root,
            Some(NodeRecord {
                id: NodeId::new(0),
                character: 'a',
                value: None,
                lower: None,
                continuation: Some(NodeId::new(1)),
                higher: Some(NodeId::new(2)),
            })
        );

        Ok(())
    }

    #[tokio::test]
    async fn it_leaves_the_tree_empty_when_nothing_is_cached() -> Result<()> {
        let (cache, _) = make_memory_cache();
        let mut tree = Tree::<u32, _>::new(cache.clone(), TreeOptions::default());

        assert!(!tree.load_from_cache(ROOT_NODE_KEY).await?);
        assert!(tree.is_empty());
        assert!(!tree.is_read_only());

        assert!(Tree::<u32, _>::get_cached_tree(cache.clone()).await?.is_none());
        assert!(!Tree::<u32, _>::delete_cached_tree(cache).await?);

        Ok(())
    }

    #[tokio::test]
    async fn it_deletes_every_node_it_reaches() -> Result<()> {
        let (cache, adapter) = make_memory_cache();
        let mut tree = Tree::<u32, _>::new(cache, TreeOptions::default().caching(true));

        tree.build([("ab", 1), ("c", 2)]).await?;
        assert_eq!(adapter.len().await, 3);

        tree.delete_from_cache().await?;

        assert!(adapter.is_empty().await);
        assert_eq!(tree.get("ab").await?, Some(1));

        Ok(())
    }

    #[tokio::test]
    async fn it_deletes_a_single_node() -> Result<()> {
        let (cache, adapter) = make_memory_cache();
        let mut tree = Tree::<u32, _>::new(cache, TreeOptions::default().caching(true));

        tree.build([("ab", 1)]).await?;
        assert_eq!(adapter.len().await, 2);

        tree.delete_node(NodeId::new(1)).await?;

        assert_eq!(adapter.keys().await, vec![ROOT_NODE_KEY.to_string()]);

        Ok(())
    }
}
