// End-to-end: images → envelope → images through the public pipeline API.

mod common;

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::common::{rgb_pixels, MemoryTranscoder, FIXED_STAMP, KEY_128, KEY_256};
    use imgseal_core::archive::{pack, ArchiveEntry, NamingPolicy};
    use imgseal_core::config::PackConfig;
    use imgseal_core::crypto::encrypt;
    use imgseal_core::pipeline::{
        extract_to_dir, open_envelope, output_file_name, read_envelope, seal_entries, seal_images,
        write_envelope, ImageInput,
    };
    use imgseal_core::record::{serialize, Record};
    use imgseal_core::types::SealError;

    fn fixed_config() -> PackConfig {
        PackConfig::new(None, Some(FIXED_STAMP.to_string()))
    }

    fn fox_and_map() -> (MemoryTranscoder, Vec<ImageInput>) {
        let transcoder = MemoryTranscoder::new()
            .with_image("in/fox.png", rgb_pixels(4, 5, 1))
            .with_image("in/map.jpg", rgb_pixels(3, 2, 9));
        let inputs = vec![
            ImageInput::new("in/fox.png", "USA", "wildlife"),
            ImageInput::new("in/map.jpg", "Chile", "survey"),
        ];
        (transcoder, inputs)
    }

// # ✅ 1. Seal and reopen

    #[test]
    fn sealed_images_reopen_with_metadata() {
        let (transcoder, inputs) = fox_and_map();
        let outcome = seal_images(&inputs, &KEY_256, &transcoder, &fixed_config()).unwrap();

        assert_eq!(outcome.report.members, ["USA_fox.png", "Chile_map.jpg"]);
        assert_eq!(outcome.report.counters.records_packed, 2);
        assert_eq!(outcome.report.counters.bytes_envelope, outcome.envelope.len() as u64);

        let members = open_envelope(&outcome.envelope, &KEY_256).unwrap();
        assert_eq!(members.len(), 2);

        let fox = &members[0].record;
        assert_eq!(members[0].name, "USA_fox.png");
        assert_eq!(fox.origin, "USA");
        assert_eq!(fox.tag, "wildlife");
        assert_eq!(fox.captured_at, FIXED_STAMP);
        assert_eq!(fox.source_extension, ".png");
        assert_eq!(fox.pixels, rgb_pixels(4, 5, 1));

        let map = &members[1].record;
        assert_eq!(members[1].name, "Chile_map.jpg");
        assert_eq!(map.origin, "Chile");
        assert_eq!(map.tag, "survey");
        assert_eq!(map.source_extension, ".jpg");
    }

    #[test]
    fn default_timestamp_is_rfc3339_utc() {
        let (transcoder, inputs) = fox_and_map();
        let outcome = seal_images(&inputs, &KEY_128, &transcoder, &PackConfig::default()).unwrap();
        let members = open_envelope(&outcome.envelope, &KEY_128).unwrap();
        let stamp = &members[0].record.captured_at;
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok(), "bad stamp {}", stamp);
        assert!(stamp.ends_with('Z'));
    }

    #[test]
    fn seal_entries_matches_manual_layers() {
        let record = Record::new(rgb_pixels(1, 1, 0), "USA", FIXED_STAMP, "w", ".png");
        let entries = vec![ArchiveEntry::new("fox.png", record)];
        let envelope = seal_entries(&entries, &KEY_128, NamingPolicy::Reject).unwrap();
        let container = imgseal_core::crypto::decrypt(&envelope, &KEY_128).unwrap();
        assert_eq!(container, pack(&entries, NamingPolicy::Reject).unwrap());
    }

// # ❌ 2. Wrong key and damaged envelopes

    #[test]
    fn wrong_key_fails_without_records() {
        let (transcoder, inputs) = fox_and_map();
        let outcome = seal_images(&inputs, &KEY_256, &transcoder, &fixed_config()).unwrap();

        let mut wrong = KEY_256;
        wrong[31] ^= 0x80;
        // Unauthenticated CBC: a wrong key unpads cleanly about 1 time in 256.
        // The garbage container is then rejected structurally.
        match open_envelope(&outcome.envelope, &wrong) {
            Err(SealError::InvalidKeyOrCorruptData) | Err(SealError::CorruptArchive(_)) => {}
            other => panic!("wrong key produced {:?}", other),
        }
    }

    #[test]
    fn truncated_envelope_fails() {
        let (transcoder, inputs) = fox_and_map();
        let outcome = seal_images(&inputs, &KEY_128, &transcoder, &fixed_config()).unwrap();
        assert!(matches!(
            open_envelope(&outcome.envelope[..10], &KEY_128),
            Err(SealError::InvalidKeyOrCorruptData)
        ));
    }

    #[test]
    fn decrypted_non_archive_is_corrupt() {
        let envelope = encrypt(b"definitely not an archive", &KEY_128).unwrap();
        assert!(matches!(open_envelope(&envelope, &KEY_128), Err(SealError::CorruptArchive(_))));
    }

    #[test]
    fn malformed_member_is_reported_by_name() {
        let record = Record::new(rgb_pixels(1, 2, 0), "USA", FIXED_STAMP, "w", ".png");
        let mut container = pack(&[ArchiveEntry::new("fox.png", record.clone())], NamingPolicy::Reject).unwrap();
        // Last pixel byte dropped from the blob and the container.
        let blob_len = serialize(&record).len();
        let len_at = container.len() - blob_len - 8;
        container[len_at..len_at + 8].copy_from_slice(&((blob_len - 1) as u64).to_le_bytes());
        container.pop();

        let envelope = encrypt(&container, &KEY_128).unwrap();
        match open_envelope(&envelope, &KEY_128) {
            Err(SealError::MalformedRecord { member: Some(name), .. }) => assert_eq!(name, "USA_fox.png"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn bad_key_length_is_reported_on_seal() {
        let (transcoder, inputs) = fox_and_map();
        assert!(matches!(
            seal_images(&inputs, &[0u8; 10], &transcoder, &fixed_config()),
            Err(SealError::InvalidKeyLen { actual: 10 })
        ));
    }

// # ⚠️ 3. Skipped and colliding inputs

    #[test]
    fn unreadable_inputs_are_skipped_and_reported() {
        let (transcoder, mut inputs) = fox_and_map();
        inputs.insert(1, ImageInput::new("in/missing.png", "Peru", "lost"));

        let outcome = seal_images(&inputs, &KEY_128, &transcoder, &fixed_config()).unwrap();
        assert_eq!(outcome.report.counters.records_packed, 2);
        assert_eq!(outcome.report.counters.records_skipped, 1);
        assert_eq!(outcome.report.skipped.len(), 1);
        assert!(outcome.report.skipped[0].path.ends_with("missing.png"));
        assert_eq!(outcome.report.members, ["USA_fox.png", "Chile_map.jpg"]);
    }

    #[test]
    fn all_inputs_unreadable_is_no_inputs() {
        let transcoder = MemoryTranscoder::new();
        let inputs = vec![ImageInput::new("a.png", "X", "t"), ImageInput::new("b.png", "X", "t")];
        assert!(matches!(
            seal_images(&inputs, &KEY_128, &transcoder, &fixed_config()),
            Err(SealError::NoInputs { skipped: 2 })
        ));
    }

    #[test]
    fn no_inputs_at_all_seals_an_empty_archive() {
        let outcome = seal_images(&[], &KEY_128, &MemoryTranscoder::new(), &fixed_config()).unwrap();
        assert!(open_envelope(&outcome.envelope, &KEY_128).unwrap().is_empty());
    }

    #[test]
    fn colliding_names_follow_policy() {
        let transcoder = MemoryTranscoder::new()
            .with_image("a/fox.png", rgb_pixels(1, 1, 1))
            .with_image("b/fox.png", rgb_pixels(1, 1, 2));
        let inputs = vec![
            ImageInput::new("a/fox.png", "USA", "one"),
            ImageInput::new("b/fox.png", "USA", "two"),
        ];

        assert!(matches!(
            seal_images(&inputs, &KEY_128, &transcoder, &fixed_config()),
            Err(SealError::DuplicateMember { .. })
        ));

        let config = PackConfig::new(Some(NamingPolicy::Disambiguate), Some(FIXED_STAMP.into()));
        let outcome = seal_images(&inputs, &KEY_128, &transcoder, &config).unwrap();
        assert_eq!(outcome.report.members, ["USA_fox.png", "USA_fox-2.png"]);
    }

// # ✅ 4. Extraction

    #[test]
    fn extract_writes_each_member_with_original_extension() {
        let (transcoder, inputs) = fox_and_map();
        let outcome = seal_images(&inputs, &KEY_256, &transcoder, &fixed_config()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("restored");
        let sink = MemoryTranscoder::new();
        let extracted = extract_to_dir(&outcome.envelope, &KEY_256, &out, &sink).unwrap();

        assert!(out.is_dir());
        assert_eq!(extracted.report.counters.records_unpacked, 2);
        assert_eq!(extracted.report.counters.images_written, 2);
        assert_eq!(extracted.files.len(), 2);
        assert_eq!(extracted.files[0].path, out.join("USA_fox.png"));
        assert_eq!(extracted.files[0].member.record.tag, "wildlife");
        assert_eq!(extracted.files[1].member.record.origin, "Chile");
        assert!(out.join("USA_fox.png").is_file());

        let saved = sink.saved();
        let paths: Vec<PathBuf> = saved.iter().map(|(p, _)| p.clone()).collect();
        assert_eq!(paths, [out.join("USA_fox.png"), out.join("Chile_map.jpg")]);
        assert_eq!(saved[0].1, rgb_pixels(4, 5, 1));
        assert_eq!(saved[1].1, rgb_pixels(3, 2, 9));
    }

    #[test]
    fn extract_with_wrong_key_writes_nothing() {
        let (transcoder, inputs) = fox_and_map();
        let outcome = seal_images(&inputs, &KEY_128, &transcoder, &fixed_config()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("never");
        let sink = MemoryTranscoder::new();
        let mut wrong = KEY_128;
        wrong[0] ^= 1;

        assert!(extract_to_dir(&outcome.envelope, &wrong, &out, &sink).is_err());
        assert!(sink.saved().is_empty());
        assert!(!out.exists());
    }

    #[test]
    fn save_failure_is_unwritable_image() {
        let (transcoder, inputs) = fox_and_map();
        let outcome = seal_images(&inputs, &KEY_128, &transcoder, &fixed_config()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let sink = MemoryTranscoder::new().failing_saves();
        assert!(matches!(
            extract_to_dir(&outcome.envelope, &KEY_128, dir.path(), &sink),
            Err(SealError::UnwritableImage { .. })
        ));
    }

    #[test]
    fn failed_save_removes_images_already_written() {
        let (transcoder, inputs) = fox_and_map();
        let outcome = seal_images(&inputs, &KEY_128, &transcoder, &fixed_config()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let sink = MemoryTranscoder::new().failing_on("Chile_map.jpg");
        assert!(matches!(
            extract_to_dir(&outcome.envelope, &KEY_128, dir.path(), &sink),
            Err(SealError::UnwritableImage { .. })
        ));

        // The fox was saved first, then cleaned up.
        assert_eq!(sink.saved().len(), 1);
        assert!(!dir.path().join("USA_fox.png").exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn output_collisions_are_rejected_before_writing() {
        // Same stem, different stored extensions, same source extension.
        let a = Record::new(rgb_pixels(1, 1, 1), "USA", FIXED_STAMP, "a", ".png");
        let b = Record::new(rgb_pixels(1, 1, 2), "USA", FIXED_STAMP, "b", ".png");
        let entries = vec![ArchiveEntry::new("fox.png", a), ArchiveEntry::new("fox.jpg", b)];
        let envelope = seal_entries(&entries, &KEY_128, NamingPolicy::Reject).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let sink = MemoryTranscoder::new();
        assert!(matches!(
            extract_to_dir(&envelope, &KEY_128, dir.path(), &sink),
            Err(SealError::Validation(_))
        ));
        assert!(sink.saved().is_empty());
    }

    #[test]
    fn output_file_name_uses_record_extension() {
        let record = Record::new(rgb_pixels(1, 1, 0), "USA", FIXED_STAMP, "w", ".tiff");
        let entries = vec![ArchiveEntry::new("fox.png", record)];
        let envelope = seal_entries(&entries, &KEY_128, NamingPolicy::Reject).unwrap();
        let members = open_envelope(&envelope, &KEY_128).unwrap();
        assert_eq!(output_file_name(&members[0]), "USA_fox.tiff");
    }

// # ✅ 5. Envelope files

    #[test]
    fn envelope_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("photos.enc");
        write_envelope(&path, b"\x01\x02\x03").unwrap();
        assert_eq!(read_envelope(&path).unwrap(), b"\x01\x02\x03");
    }

    #[test]
    fn missing_envelope_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(read_envelope(&dir.path().join("nope.enc")), Err(SealError::Io(_))));
    }
}
