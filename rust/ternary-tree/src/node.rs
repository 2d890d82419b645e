use serde::{Deserialize, Serialize};

use crate::NodeId;

/// One of the three child positions of a [`Node`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Branch {
    /// Keys whose character at this position sorts before the node's.
    Lower,
    /// Keys whose character at this position equals the node's; matching
    /// continues at the next position.
    Continuation,
    /// Keys whose character at this position sorts after the node's.
    Higher,
}

impl Branch {
    /// Every branch, in traversal order.
    pub const ALL: [Branch; 3] = [Branch::Lower, Branch::Continuation, Branch::Higher];
}

/// The contents of a child position.
///
/// A loaded child is addressed by its index in the owning tree's arena; an
/// unloaded child is known only by its [`NodeId`] until it is fetched from
/// the cache.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Slot {
    /// No child.
    #[default]
    Absent,
    /// A child that has not been fetched from the cache yet.
    Unloaded(NodeId),
    /// A child that is resident in the arena.
    Loaded(usize),
}

impl Slot {
    /// Whether there is a child in this position, loaded or not.
    pub fn is_present(&self) -> bool {
        !matches!(self, Slot::Absent)
    }
}

/// A single character of one or more keys, with the value of the key that
/// ends here (if any) and links to its three children.
#[derive(Clone, Debug)]
pub struct Node<Value> {
    id: NodeId,
    character: char,
    value: Option<Value>,

    lower: Slot,
    continuation: Slot,
    higher: Slot,
}

impl<Value> Node<Value> {
    /// Create a childless [`Node`] without a value.
    pub fn new(id: NodeId, character: char) -> Self {
        Self {
            id,
            character,
            value: None,
            lower: Slot::Absent,
            continuation: Slot::Absent,
            higher: Slot::Absent,
        }
    }

    /// The [`NodeId`] of this node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The character this node compares against.
    pub fn character(&self) -> char {
        self.character
    }

    /// The value of the key that terminates at this node, if any.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub(crate) fn value_mut(&mut self) -> &mut Option<Value> {
        &mut self.value
    }

    /// Whether a lower child is present, without loading it.
    pub fn has_lower(&self) -> bool {
        self.lower.is_present()
    }

    /// Whether a continuation child is present, without loading it.
    pub fn has_continuation(&self) -> bool {
        self.continuation.is_present()
    }

    /// Whether a higher child is present, without loading it.
    pub fn has_higher(&self) -> bool {
        self.higher.is_present()
    }

    /// The contents of the given child position.
    pub fn slot(&self, branch: Branch) -> Slot {
        match branch {
            Branch::Lower => self.lower,
            Branch::Continuation => self.continuation,
            Branch::Higher => self.higher,
        }
    }

    pub(crate) fn slot_mut(&mut self, branch: Branch) -> &mut Slot {
        match branch {
            Branch::Lower => &mut self.lower,
            Branch::Continuation => &mut self.continuation,
            Branch::Higher => &mut self.higher,
        }
    }

    /// Rehydrate a node from its cached form. Every child starts out
    /// [`Slot::Unloaded`].
    pub(crate) fn from_record(record: NodeRecord<Value>) -> Self {
        let unloaded = |link: Option<NodeId>| link.map(Slot::Unloaded).unwrap_or_default();

        Self {
            id: record.id,
            character: record.character,
            value: record.value,
            lower: unloaded(record.lower),
            continuation: unloaded(record.continuation),
            higher: unloaded(record.higher),
        }
    }

    /// The cached form of this node. Children are written as bare ids, so the
    /// arena is needed to look up the ids of loaded children.
    pub(crate) fn to_record<'a>(&'a self, arena: &[Node<Value>]) -> NodeRecord<&'a Value> {
        let link = |slot: Slot| match slot {
            Slot::Absent => None,
            Slot::Unloaded(id) => Some(id),
            Slot::Loaded(index) => Some(arena[index].id),
        };

        NodeRecord {
            id: self.id,
            character: self.character,
            value: self.value.as_ref(),
            lower: link(self.lower),
            continuation: link(self.continuation),
            higher: link(self.higher),
        }
    }
}

/// The serializable construct representing a [`Node`]: one cache entry per
/// node, with children stored as identifier links rather than nested nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "Value: Serialize",
    deserialize = "Value: Deserialize<'de>"
))]
pub struct NodeRecord<Value> {
    /// The id of the node.
    pub id: NodeId,
    /// The node's character.
    pub character: char,
    /// The value of the key that terminates at the node.
    #[serde(with = "terminal")]
    pub value: Option<Value>,
    /// The id of the lower child.
    pub lower: Option<NodeId>,
    /// The id of the continuation child.
    pub continuation: Option<NodeId>,
    /// The id of the higher child.
    pub higher: Option<NodeId>,
}

/// A terminal value is written as a one-element sequence, so that a value
/// which itself encodes as null (`()`, `None`) still marks the end of a key.
mod terminal {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<Value, S>(value: &Option<Value>, serializer: S) -> Result<S::Ok, S::Error>
    where
        Value: Serialize,
        S: Serializer,
    {
        value.as_ref().map(|value| (value,)).serialize(serializer)
    }

    pub fn deserialize<'de, Value, D>(deserializer: D) -> Result<Option<Value>, D::Error>
    where
        Value: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Ok(Option::<(Value,)>::deserialize(deserializer)?.map(|(value,)| value))
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use ternary_cache::{CborEncoder, Encoder};

    use super::{Branch, Node, NodeRecord, Slot};
    use crate::NodeId;

    #[tokio::test]
    async fn it_keeps_null_like_values_distinct_from_no_value() -> Result<()> {
        let terminal = Node::<()>::from_record(NodeRecord {
            id: NodeId::new(0),
            character: 'a',
            value: Some(()),
            lower: None,
            continuation: None,
            higher: None,
        });
        let passing = Node::<()>::new(NodeId::new(1), 'b');

        for node in [terminal, passing] {
            let bytes = CborEncoder.encode(&node.to_record(&[])).await?;
            let record: NodeRecord<()> = CborEncoder.decode(&bytes).await?;
            assert_eq!(record.value, node.value().copied());
        }

        let nested = NodeRecord {
            id: NodeId::new(2),
            character: 'c',
            value: Some(None::<u32>),
            lower: None,
            continuation: None,
            higher: None,
        };
        let bytes = CborEncoder.encode(&nested).await?;
        let record: NodeRecord<Option<u32>> = CborEncoder.decode(&bytes).await?;
        assert_eq!(record, nested);

        Ok(())
    }

    #[test]
    fn it_records_children_as_ids() {
        let mut arena = vec![
            Node::<u32>::new(NodeId::new(0), 'm'),
            Node::new(NodeId::new(5), 'c'),
        ];
        *arena[0].slot_mut(Branch::Lower) = Slot::Loaded(1);
        *arena[0].slot_mut(Branch::Higher) = Slot::Unloaded(NodeId::new(9));
        *arena[0].value_mut() = Some(3);

        let record = arena[0].to_record(&arena);

        assert_eq!(
            record,
            NodeRecord {
                id: NodeId::new(0),
                character: 'm',
                value: Some(&3),
                lower: Some(NodeId::new(5)),
                continuation: None,
                higher: Some(NodeId::new(9)),
            }
        );
        // Recording leaves the live node untouched
        assert_eq!(arena[0].slot(Branch::Lower), Slot::Loaded(1));
    }

    #[test]
    fn it_rehydrates_children_as_unloaded() {
        let node = Node::from_record(NodeRecord {
            id: NodeId::new(2),
            character: 'q',
            value: None::<u32>,
            lower: None,
            continuation: Some(NodeId::new(3)),
            higher: None,
        });

        assert_eq!(node.id(), NodeId::new(2));
        assert!(!node.has_lower());
        assert!(node.has_continuation());
        assert!(!node.has_higher());
        assert_eq!(
            node.slot(Branch::Continuation),
            Slot::Unloaded(NodeId::new(3))
        );
    }
}
