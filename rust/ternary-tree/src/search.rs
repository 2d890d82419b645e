use std::collections::BTreeMap;

use ternary_cache::TypedCache;

use crate::{Branch, TernaryTreeError, Tree, ValueType, tree::Edge};

impl<Value, Cache> Tree<Value, Cache>
where
    Value: ValueType,
    Cache: TypedCache + Clone,
{
    /// Finds every key that starts with `prefix`, along with its value.
    ///
    /// Returns `None` when no key has the prefix. An empty prefix matches
    /// every key in a non-empty tree. Nodes are fetched from the cache as the
    /// search reaches them; a node that has gone missing from the cache is
    /// reported as [`TernaryTreeError::TreeCorrupt`], since any partial result
    /// would silently omit keys.
    ///
    /// ```rust
    /// # tokio_test::block_on(async {
    /// use ternary_cache::{Cache, CborEncoder, MemoryCacheAdapter};
    /// use ternary_tree::{Tree, TreeOptions};
    ///
    /// let cache = Cache::new(CborEncoder, MemoryCacheAdapter::default());
    /// let mut tree = Tree::new(cache, TreeOptions::default());
    ///
    /// tree.build([("cat", 1), ("car", 2), ("cart", 3), ("dog", 4)])
    ///     .await
    ///     .unwrap();
    ///
    /// let found = tree.prefix_search("car").await.unwrap().unwrap();
    /// assert_eq!(found.keys().collect::<Vec<_>>(), vec!["car", "cart"]);
    ///
    /// assert_eq!(tree.prefix_search("x").await.unwrap(), None);
    /// # });
    /// ```
    pub async fn prefix_search(
        &mut self,
        prefix: &str,
    ) -> Result<Option<BTreeMap<String, Value>>, TernaryTreeError> {
        if self.is_empty() {
            return Ok(None);
        }
        if prefix.is_empty() {
            return self.entries().await.map(Some);
        }

        let Some(anchor) = self
            .descend(prefix)
            .await
            .map_err(TernaryTreeError::into_corrupt)?
        else {
            tracing::trace!(prefix, "No key has the prefix");
            return Ok(None);
        };

        let mut found = BTreeMap::new();
        if let Some(value) = self.arena[anchor].value() {
            found.insert(prefix.to_owned(), value.clone());
        }

        // The anchor's siblings do not share the prefix, so only its
        // continuation is collected
        self.collect(
            vec![(Edge::Child(anchor, Branch::Continuation), prefix.to_owned())],
            &mut found,
        )
        .await
        .map_err(TernaryTreeError::into_corrupt)?;

        Ok(Some(found))
    }

    /// Every key in the tree, along with its value.
    pub async fn entries(&mut self) -> Result<BTreeMap<String, Value>, TernaryTreeError> {
        let mut found = BTreeMap::new();
        self.collect(vec![(Edge::Root, String::new())], &mut found)
            .await
            .map_err(TernaryTreeError::into_corrupt)?;
        Ok(found)
    }

    /// Reconstructs keys below the given starting points. Each entry of the
    /// stack pairs a slot with the key of the path leading up to (but not
    /// including) the node in that slot.
    async fn collect(
        &mut self,
        mut stack: Vec<(Edge, String)>,
        found: &mut BTreeMap<String, Value>,
    ) -> Result<(), TernaryTreeError> {
        while let Some((edge, base)) = stack.pop() {
            let Some(index) = self.resolve(edge).await? else {
                continue;
            };

            let node = &self.arena[index];
            let mut key = base.clone();
            key.push(node.character());

            if let Some(value) = node.value() {
                found.insert(key.clone(), value.clone());
            }

            if node.has_higher() {
                stack.push((Edge::Child(index, Branch::Higher), base.clone()));
            }
            if node.has_continuation() {
                stack.push((Edge::Child(index, Branch::Continuation), key));
            }
            if node.has_lower() {
                stack.push((Edge::Child(index, Branch::Lower), base));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use anyhow::Result;
    use ternary_cache::make_memory_cache;

    use crate::{Tree, TreeOptions};

    #[tokio::test]
    async fn it_excludes_siblings_of_the_anchor() -> Result<()> {
        let (cache, _) = make_memory_cache();
        let mut tree = Tree::<u32, _>::new(cache, TreeOptions::default());

        // "b" is the root; "a" and "c" hang off it as siblings
        tree.build([("a", 1), ("b", 2), ("c", 3), ("bz", 4)]).await?;

        let found = tree.prefix_search("b").await?;

        assert_eq!(
            found,
            Some(BTreeMap::from([("b".to_string(), 2), ("bz".to_string(), 4)]))
        );

        Ok(())
    }

    #[tokio::test]
    async fn it_returns_every_entry_for_an_empty_prefix() -> Result<()> {
        let (cache, _) = make_memory_cache();
        let mut tree = Tree::<u32, _>::new(cache, TreeOptions::default());

        assert_eq!(tree.prefix_search("").await?, None);
        assert!(tree.entries().await?.is_empty());

        tree.insert("to", 1).await?;
        tree.insert("tea", 2).await?;
        tree.insert("ten", 3).await?;
        tree.insert("in", 4).await?;

        let everything = tree.prefix_search("").await?;

        assert_eq!(everything.as_ref(), Some(&tree.entries().await?));
        assert_eq!(
            everything.map(|found| found.into_keys().collect::<Vec<_>>()),
            Some(vec![
                "in".to_string(),
                "tea".to_string(),
                "ten".to_string(),
                "to".to_string()
            ])
        );

        Ok(())
    }

    #[tokio::test]
    async fn it_misses_when_the_prefix_runs_past_a_leaf() -> Result<()> {
        let (cache, _) = make_memory_cache();
        let mut tree = Tree::<u32, _>::new(cache, TreeOptions::default());

        tree.insert("cat", 1).await?;

        assert_eq!(tree.prefix_search("cats").await?, None);
        assert_eq!(tree.prefix_search("cb").await?, None);
        assert_eq!(
            tree.prefix_search("cat").await?,
            Some(BTreeMap::from([("cat".to_string(), 1)]))
        );

        Ok(())
    }
}
