use std::collections::BTreeMap;

use anyhow::Result;
use ternary_cache::make_memory_cache;
use ternary_tree::{TernaryTreeError, Tree, TreeOptions};

fn animals() -> Vec<(&'static str, u32)> {
    vec![("cat", 1), ("car", 2), ("cart", 3), ("dog", 4)]
}

fn keys(found: Option<BTreeMap<String, u32>>) -> Option<Vec<String>> {
    found.map(|found| found.into_keys().collect())
}

#[tokio::test]
async fn it_finds_every_key_sharing_a_prefix() -> Result<()> {
    let (cache, _) = make_memory_cache();
    let mut tree = Tree::new(cache, TreeOptions::default());

    assert!(tree.build(animals()).await?);

    assert_eq!(
        tree.prefix_search("car").await?,
        Some(BTreeMap::from([
            ("car".to_string(), 2),
            ("cart".to_string(), 3)
        ]))
    );
    assert_eq!(
        keys(tree.prefix_search("ca").await?),
        Some(vec!["car".into(), "cart".into(), "cat".into()])
    );
    assert_eq!(
        tree.prefix_search("d").await?,
        Some(BTreeMap::from([("dog".to_string(), 4)]))
    );
    assert_eq!(tree.prefix_search("x").await?, None);

    Ok(())
}

#[tokio::test]
async fn it_reports_a_clean_miss() -> Result<()> {
    let (cache, _) = make_memory_cache();
    let mut tree = Tree::new(cache, TreeOptions::default());

    tree.build(animals()).await?;

    assert_eq!(tree.prefix_search("zzz").await?, None);
    assert_eq!(tree.get("zzz").await?, None);

    Ok(())
}

#[tokio::test]
async fn it_finds_each_built_key_by_itself() -> Result<()> {
    let (cache, _) = make_memory_cache();
    let mut tree = Tree::new(cache, TreeOptions::default());

    tree.build(animals()).await?;

    for (key, value) in animals() {
        let found = tree.prefix_search(key).await?.unwrap_or_default();
        assert_eq!(found.get(key), Some(&value), "{key} is found by itself");
        assert_eq!(tree.get(key).await?, Some(value));
    }
    assert_eq!(tree.key_count(), 4);

    Ok(())
}

#[tokio::test]
async fn it_builds_the_same_height_regardless_of_input_order() -> Result<()> {
    let alphabet: Vec<(String, u32)> = ('a'..='z')
        .zip(0..)
        .map(|(character, index)| (character.to_string(), index))
        .collect();

    let (cache, _) = make_memory_cache();
    let mut sorted = Tree::new(cache, TreeOptions::default());
    sorted.build(alphabet.clone()).await?;

    let (cache, _) = make_memory_cache();
    let mut reversed = Tree::new(cache, TreeOptions::default());
    reversed.build(alphabet.iter().cloned().rev()).await?;

    assert_eq!(sorted.height().await?, 5);
    assert_eq!(reversed.height().await?, 5);
    assert_eq!(sorted.entries().await?, reversed.entries().await?);

    let (cache, _) = make_memory_cache();
    let mut sequential = Tree::new(cache, TreeOptions::default());
    for (key, value) in alphabet {
        sequential.insert(&key, value).await?;
    }

    assert_eq!(sequential.height().await?, 26);

    Ok(())
}

#[tokio::test]
async fn it_keeps_the_last_value_of_a_repeated_key() -> Result<()> {
    let (cache, _) = make_memory_cache();
    let mut tree = Tree::new(cache, TreeOptions::default());

    tree.build([("ox", 1), ("ox", 2)]).await?;

    assert_eq!(tree.get("ox").await?, Some(2));
    assert_eq!(tree.key_count(), 1);

    Ok(())
}

#[tokio::test]
async fn it_accepts_inserts_after_building() -> Result<()> {
    let (cache, _) = make_memory_cache();
    let mut tree = Tree::new(cache, TreeOptions::default());

    tree.build(animals()).await?;
    assert!(tree.insert("cab", 5).await?);

    assert_eq!(
        keys(tree.prefix_search("ca").await?),
        Some(vec!["cab".into(), "car".into(), "cart".into(), "cat".into()])
    );

    Ok(())
}

#[tokio::test]
async fn it_rejects_empty_keys_and_read_only_mutation() -> Result<()> {
    let (cache, _) = make_memory_cache();
    let mut tree = Tree::<u32, _>::new(cache.clone(), TreeOptions::default());

    assert!(!tree.insert("", 1).await?);
    assert!(tree.is_empty());

    let mut frozen = Tree::<u32, _>::new(cache, TreeOptions::default().read_only(true));

    assert!(!frozen.insert("cat", 1).await?);
    assert!(matches!(
        frozen.try_insert("cat", 1).await,
        Err(TernaryTreeError::ReadOnly)
    ));
    assert!(!frozen.build(animals()).await?);
    assert!(!frozen.save_to_cache().await?);
    assert!(frozen.is_empty());

    Ok(())
}
