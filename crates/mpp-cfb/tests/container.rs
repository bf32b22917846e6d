//! Container reader tests against writer-produced files.

use mpp_cfb::{ChainFault, CompoundFile, CompoundFileWriter, ContainerError};
use proptest::prelude::*;

fn sample_container() -> Vec<u8> {
    let mut writer = CompoundFileWriter::new();
    writer
        .add_stream("\u{1}CompObj", b"compobj".to_vec())
        .expect("add compobj");
    writer
        .add_stream("   19/TBkndTask/FixedData", vec![0xAB; 6000])
        .expect("add fixed data");
    writer
        .add_stream("   19/TBkndTask/FixedMeta", vec![1, 2, 3, 4])
        .expect("add fixed meta");
    writer.add_stream("   19/Empty", Vec::new()).expect("add empty");
    writer.finish().expect("finish container")
}

fn fat_entry_offset(sector: u32) -> usize {
    512 + sector as usize * 4
}

#[test]
fn test_streams_are_reassembled_by_path() {
    let file = CompoundFile::parse(&sample_container()).expect("parse container");

    assert_eq!(file.len(), 4);
    assert_eq!(file.stream("\u{1}CompObj"), Some(&b"compobj"[..]));
    assert_eq!(
        file.stream("   19/TBkndTask/FixedMeta"),
        Some(&[1u8, 2, 3, 4][..])
    );

    let large = file.get("   19/TBkndTask/FixedData").expect("fixed data");
    assert_eq!(large.len(), 6000);
    assert!(large.data().iter().all(|&b| b == 0xAB));
    assert!(!large.in_mini_stream());
    assert_eq!(large.sectors().len(), 12);

    let small = file.get("   19/TBkndTask/FixedMeta").expect("fixed meta");
    assert!(small.in_mini_stream());

    assert!(file.get("   19/Empty").expect("empty stream").is_empty());
    assert!(file.has_storage("   19"));
    assert!(file.has_storage("   19/TBkndTask"));
    assert!(!file.has_storage("   19/TBkndTask/FixedData"));
    assert!(file.stream("   19/Missing").is_none());
    assert_eq!(file.major_version(), 3);
    assert_eq!(file.sector_size(), 512);
}

#[test]
fn test_stream_enumeration_is_ordered() {
    let file = CompoundFile::parse(&sample_container()).expect("parse container");
    let paths: Vec<&str> = file.streams().map(|s| s.path()).collect();
    let mut sorted = paths.clone();
    sorted.sort_unstable();
    assert_eq!(paths, sorted);
    assert_eq!(file.storages().count(), 2);
}

#[test]
fn test_bad_signature_is_rejected() {
    let mut bytes = sample_container();
    bytes[3] ^= 0xFF;
    assert!(matches!(
        CompoundFile::parse(&bytes),
        Err(ContainerError::BadSignature)
    ));
}

#[test]
fn test_short_buffer_is_truncated() {
    let bytes = sample_container();
    assert!(matches!(
        CompoundFile::parse(&bytes[..100]),
        Err(ContainerError::Truncated { .. })
    ));
}

#[test]
fn test_self_referencing_fat_entry_is_a_cycle() {
    let mut bytes = sample_container();
    let file = CompoundFile::parse(&bytes).expect("parse container");
    let first = file.get("   19/TBkndTask/FixedData").expect("stream").sectors()[0];

    let at = fat_entry_offset(first);
    bytes[at..at + 4].copy_from_slice(&first.to_le_bytes());

    let err = CompoundFile::parse(&bytes).unwrap_err();
    assert!(matches!(
        err,
        ContainerError::CorruptSectorChain {
            fault: ChainFault::Cycle { .. },
            ..
        }
    ));
}

#[test]
fn test_chain_past_end_of_file_is_rejected() {
    let mut bytes = sample_container();
    let file = CompoundFile::parse(&bytes).expect("parse container");
    let first = file.get("   19/TBkndTask/FixedData").expect("stream").sectors()[0];

    let at = fat_entry_offset(first);
    bytes[at..at + 4].copy_from_slice(&100u32.to_le_bytes());

    let err = CompoundFile::parse(&bytes).unwrap_err();
    assert!(matches!(
        err,
        ContainerError::CorruptSectorChain {
            fault: ChainFault::OutOfRange { sector: 100 },
            ..
        }
    ));
}

#[test]
fn test_open_missing_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("missing.mpp");
    assert!(matches!(
        CompoundFile::open(&path),
        Err(ContainerError::FileNotFound { .. })
    ));
}

#[test]
fn test_open_reads_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("sample.mpp");
    std::fs::write(&path, sample_container()).expect("write container");
    let file = CompoundFile::open(&path).expect("open container");
    assert!(file.has_stream("\u{1}CompObj"));
}

proptest! {
    #[test]
    fn prop_stream_content_survives_sector_layout(
        streams in proptest::collection::btree_map(
            "[A-Za-z]{1,8}(/[A-Za-z]{1,8})?",
            proptest::collection::vec(any::<u8>(), 0..9000),
            1..6,
        )
    ) {
        let mut writer = CompoundFileWriter::new();
        let mut accepted = Vec::new();
        for (path, data) in &streams {
            if writer.add_stream(path.clone(), data.clone()).is_ok() {
                accepted.push(path.clone());
            }
        }
        let bytes = writer.finish().expect("finish container");
        let file = CompoundFile::parse(&bytes).expect("parse container");
        for path in accepted {
            let expected = &streams[&path];
            prop_assert_eq!(file.stream(&path), Some(expected.as_slice()));
        }
    }
}
