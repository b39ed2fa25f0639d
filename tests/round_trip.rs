//! Engine-level tests: round trips, deduplication, pinning and concurrency

use blockpin::{
    Block, BlockStore, Codec, Config, ContentId, Error, MemoryBlockStore, Node, ObjectNode,
};
use proptest::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn node_with(chunk_size: usize, max_links: usize) -> Node {
    Node::new(Config {
        chunk_size,
        max_links,
        ..Config::default()
    })
    .unwrap()
}

/// Deterministic pseudo-random bytes (xorshift)
fn payload(len: usize, seed: u64) -> Vec<u8> {
    let mut state = seed | 1;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state as u8
        })
        .collect()
}

#[test]
fn test_hello_world_is_stable() {
    let first = Node::new(Config::default()).unwrap();
    let second = Node::new(Config::default()).unwrap();

    let x = first.ingest(b"hello world").unwrap();
    assert_eq!(second.ingest(b"hello world").unwrap(), x);

    let chunks: Vec<_> = first
        .fetch(&x)
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(chunks.concat(), b"hello world");
}

#[test]
fn test_empty_payload() {
    let node = node_with(8, 2);
    let cid = node.ingest(b"").unwrap();

    assert_eq!(cid, ContentId::compute(Codec::Raw, b""));
    let chunks: Vec<_> = node.fetch(&cid).unwrap().collect::<Result<_, _>>().unwrap();
    assert_eq!(chunks.len(), 1);
    assert!(chunks[0].is_empty());
}

#[test]
fn test_ten_megabytes() {
    let node = Node::new(Config::default()).unwrap();
    let data = payload(10 * 1024 * 1024, 42);

    let cid = node.ingest(&data).unwrap();
    let stat = node.stat(&cid).unwrap();
    assert_eq!(stat.size, data.len() as u64);
    // 40 leaves of 256 KiB under one node
    assert_eq!(stat.blocks, 41);

    let mut offset = 0;
    for chunk in node.fetch(&cid).unwrap() {
        let chunk = chunk.unwrap();
        assert_eq!(&chunk[..], &data[offset..offset + chunk.len()]);
        offset += chunk.len();
    }
    assert_eq!(offset, data.len());
}

#[test]
fn test_deep_graph_round_trip() {
    let node = node_with(7, 2);
    let data = payload(3000, 7);

    let cid = node.ingest(&data).unwrap();
    assert_eq!(cid.codec(), Codec::DagNode);
    assert_eq!(node.fetch_bytes(&cid).unwrap(), data);
}

#[test]
fn test_dedup_on_repeat_ingest() {
    let node = node_with(64, 4);
    let data = payload(1000, 3);

    let first = node.ingest(&data).unwrap();
    let stats = node.store_stats();
    let second = node.ingest(&data).unwrap();

    assert_eq!(first, second);
    assert_eq!(node.store_stats(), stats);
    // Each ingest is one reference
    assert_eq!(node.pins(), vec![(first, 2)]);
}

#[test]
fn test_shared_chunks_stored_once() {
    let node = node_with(4, 8);
    node.ingest(b"aaaabbbb").unwrap();
    let before = node.store_stats().blocks;

    // Reuses both leaves, adds one leaf and one node
    node.ingest(b"aaaabbbbcccc").unwrap();
    assert_eq!(node.store_stats().blocks, before + 2);
}

#[test]
fn test_unpin_semantics() {
    let node = node_with(4, 4);

    let never = ContentId::compute(Codec::Raw, b"nonexistent-id");
    assert!(matches!(node.unpin(&never), Err(Error::NotFound(_))));
    assert!("nonexistent-id".parse::<ContentId>().is_err());

    let cid = node.ingest(b"pin me").unwrap();
    let blocks = node.store_stats().blocks;
    assert_eq!(node.unpin(&cid).unwrap(), 0);
    assert!(!node.is_pinned(&cid));

    // No collection on unpin
    assert_eq!(node.store_stats().blocks, blocks);
    assert!(node.store().has(&cid));
    assert!(node.unpin(&cid).unwrap_err().is_not_found());
}

#[test]
fn test_cid_string_round_trip_through_fetch() {
    let node = node_with(16, 4);
    let data = payload(100, 11);
    let cid = node.ingest(&data).unwrap();

    let parsed: ContentId = cid.to_string().parse().unwrap();
    assert_eq!(node.fetch_bytes(&parsed).unwrap(), data);
}

#[test]
fn test_broken_graph_is_reported() {
    let store = MemoryBlockStore::new();
    let node = Node::with_store(
        Config {
            chunk_size: 4,
            max_links: 4,
            ..Config::default()
        },
        store,
    )
    .unwrap();

    let cid = node.ingest(b"0000111122223333").unwrap();
    let root = ObjectNode::from_block(&node.store().get(&cid).unwrap()).unwrap();
    node.store().delete(&root.links[2].cid).unwrap();

    let result = node.fetch_bytes(&cid);
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[test]
fn test_concurrent_ingest() {
    let node = Arc::new(node_with(32, 4));
    let payloads: Vec<Vec<u8>> = (0..8).map(|i| payload(4096 + i * 100, i as u64 + 1)).collect();

    let handles: Vec<_> = payloads
        .iter()
        .cloned()
        .map(|data| {
            let node = Arc::clone(&node);
            std::thread::spawn(move || {
                let cid = node.ingest(&data).unwrap();
                (cid, data)
            })
        })
        .collect();

    for handle in handles {
        let (cid, data) = handle.join().unwrap();
        assert_eq!(node.fetch_bytes(&cid).unwrap(), data);
    }
    assert_eq!(node.pins().len(), payloads.len());
}

#[test]
fn test_concurrent_ingest_of_same_payload() {
    let data = payload(8192, 99);
    let expected_blocks = {
        let single = node_with(32, 4);
        single.ingest(&data).unwrap();
        single.store_stats()
    };

    let node = node_with(32, 4);
    let cids: Vec<ContentId> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| node.ingest(&data).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(cids.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(node.store_stats(), expected_blocks);
    assert_eq!(node.pins(), vec![(cids[0], 8)]);
    assert_eq!(node.fetch_bytes(&cids[0]).unwrap(), data);
}

#[test]
fn test_reads_overlap_unrelated_writes() {
    let node = node_with(64, 4);
    let pinned = payload(20_000, 5);
    let cid = node.ingest(&pinned).unwrap();
    let writing = AtomicBool::new(true);

    std::thread::scope(|s| {
        let reader = s.spawn(|| {
            let mut reads = 0;
            while writing.load(Ordering::Acquire) || reads == 0 {
                assert_eq!(node.fetch_bytes(&cid).unwrap(), pinned);
                reads += 1;
            }
            reads
        });

        let writers: Vec<_> = (0..4u64)
            .map(|i| {
                let node = &node;
                s.spawn(move || {
                    for round in 0..10 {
                        let data = payload(4096, 1001 + 2 * (i * 100 + round));
                        let written = node.ingest(&data).unwrap();
                        assert_eq!(node.fetch_bytes(&written).unwrap(), data);
                    }
                })
            })
            .collect();

        for writer in writers {
            writer.join().unwrap();
        }
        writing.store(false, Ordering::Release);
        assert!(reader.join().unwrap() > 0);
    });

    assert_eq!(node.pins().len(), 1 + 4 * 10);
}

#[test]
fn test_unpin_unknown_string_is_not_found() {
    let node = node_with(4, 4);
    assert!(matches!(
        node.unpin_str("nonexistent-id"),
        Err(Error::NotFound(_))
    ));
    assert!(node.fetch_str("nonexistent-id").is_err());

    let cid = node.ingest(b"hello world").unwrap();
    assert_eq!(node.unpin_str(&cid.to_string()).unwrap(), 0);
}

#[test]
fn test_compressed_node_round_trip() {
    let node = Node::new(Config {
        chunk_size: 1024,
        compression_level: Some(3),
        ..Config::default()
    })
    .unwrap();
    let data = vec![b'z'; 50_000];

    let cid = node.ingest(&data).unwrap();
    assert_eq!(node.fetch_bytes(&cid).unwrap(), data);

    let stats = node.store_stats();
    assert!(stats.stored_bytes < stats.logical_bytes);
}

#[test]
fn test_store_rejects_forged_block() {
    let store = MemoryBlockStore::new();
    let forged = Block::with_cid(ContentId::compute(Codec::Raw, b"a"), &b"b"[..]);
    assert!(matches!(store.put(&forged), Err(Error::Corrupt(_))));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_round_trip(
        data in proptest::collection::vec(any::<u8>(), 0..2048),
        chunk_size in 1usize..64,
        max_links in 2usize..6,
    ) {
        let node = node_with(chunk_size, max_links);
        let cid = node.ingest(&data).unwrap();
        prop_assert_eq!(node.fetch_bytes(&cid).unwrap(), data.clone());
        prop_assert_eq!(node.hash_only(&data).unwrap(), cid);
    }
}
