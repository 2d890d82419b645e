use ternary_cache::TypedCache;

use crate::{Branch, Node, TernaryTreeError, Tree, ValueType, tree::Edge};

/// The order in which [`Tree::traverse`] visits nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum TraversalOrder {
    /// Every node is visited after its lower, continuation and higher
    /// subtrees, in that order.
    #[default]
    PostOrder,
}

/// What a walk does when a linked node cannot be found in the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Missing {
    Fail,
    Skip,
}

enum Step {
    Enter(Edge),
    Exit(usize),
}

impl<Value, Cache> Tree<Value, Cache>
where
    Value: ValueType,
    Cache: TypedCache + Clone,
{
    /// Visits every node of the tree in the given order, fetching unloaded
    /// nodes from the cache as the walk reaches them.
    ///
    /// A node missing from the cache fails the walk with
    /// [`TernaryTreeError::KeyNotFound`].
    pub async fn traverse<Visit>(
        &mut self,
        order: TraversalOrder,
        mut visit: Visit,
    ) -> Result<(), TernaryTreeError>
    where
        Visit: FnMut(&Node<Value>),
    {
        for index in self.visit_order(order, Missing::Fail).await? {
            visit(&self.arena[index]);
        }
        Ok(())
    }

    /// The arena indices of every reachable node, in `order`.
    pub(crate) async fn visit_order(
        &mut self,
        order: TraversalOrder,
        missing: Missing,
    ) -> Result<Vec<usize>, TernaryTreeError> {
        match order {
            TraversalOrder::PostOrder => self.post_order(missing).await,
        }
    }

    async fn post_order(&mut self, missing: Missing) -> Result<Vec<usize>, TernaryTreeError> {
        let mut visited = Vec::new();
        let mut stack = vec![Step::Enter(Edge::Root)];

        while let Some(step) = stack.pop() {
            let edge = match step {
                Step::Exit(index) => {
                    visited.push(index);
                    continue;
                }
                Step::Enter(edge) => edge,
            };

            let index = match self.resolve(edge).await {
                Ok(Some(index)) => index,
                Ok(None) => continue,
                Err(TernaryTreeError::KeyNotFound(key)) if missing == Missing::Skip => {
                    tracing::warn!(%key, "Skipping a node that is missing from the cache");
                    continue;
                }
                Err(error) => return Err(error),
            };

            stack.push(Step::Exit(index));
            for branch in Branch::ALL.into_iter().rev() {
                if self.arena[index].slot(branch).is_present() {
                    stack.push(Step::Enter(Edge::Child(index, branch)));
                }
            }
        }

        Ok(visited)
    }

    /// The number of nodes on the longest path from the root, following edges
    /// of any kind. Unloaded nodes are fetched from the cache.
    pub async fn height(&mut self) -> Result<usize, TernaryTreeError> {
        let mut height = 0;
        let mut stack = vec![(Edge::Root, 1)];

        while let Some((edge, depth)) = stack.pop() {
            let Some(index) = self.resolve(edge).await? else {
                continue;
            };

            height = height.max(depth);
            for branch in Branch::ALL {
                if self.arena[index].slot(branch).is_present() {
                    stack.push((Edge::Child(index, branch), depth + 1));
                }
            }
        }

        Ok(height)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use ternary_cache::make_memory_cache;

    use crate::{TraversalOrder, Tree, TreeOptions};

    #[tokio::test]
    async fn it_visits_children_before_their_parent() -> Result<()> {
        let (cache, _) = make_memory_cache();
        let mut tree = Tree::<u32, _>::new(cache, TreeOptions::default());

        tree.insert("m", 1).await?;
        tree.insert("c", 2).await?;
        tree.insert("x", 3).await?;
        tree.insert("mo", 4).await?;

        let mut visited = String::new();
        tree.traverse(TraversalOrder::PostOrder, |node| {
            visited.push(node.character())
        })
        .await?;

        assert_eq!(visited, "coxm");

        Ok(())
    }

    #[tokio::test]
    async fn it_measures_the_longest_path() -> Result<()> {
        let (cache, _) = make_memory_cache();
        let mut tree = Tree::<u32, _>::new(cache, TreeOptions::default());

        assert_eq!(tree.height().await?, 0);

        tree.insert("b", 1).await?;
        assert_eq!(tree.height().await?, 1);

        tree.insert("a", 2).await?;
        tree.insert("bcd", 3).await?;
        assert_eq!(tree.height().await?, 3);

        Ok(())
    }
}
