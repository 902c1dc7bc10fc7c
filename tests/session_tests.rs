//! Integration tests for the vault session lifecycle.

use lockbox::errors::{LockboxError, Result};
use lockbox::vault::{
    EncryptedContainer, KeyValueStore, MemoryStore, SecretRecord, SessionState, VaultSession,
    DEFAULT_STORAGE_KEY,
};

const PASSWORD: &[u8] = b"correct-horse-1";

/// Memory store whose writes can be made to fail on demand.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_writes: bool,
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            return Err(LockboxError::Storage("disk full".into()));
        }
        self.inner.set(key, value)
    }
}

fn new_session() -> VaultSession<MemoryStore> {
    let mut session = VaultSession::new(MemoryStore::new());
    session.create_vault(PASSWORD).expect("create vault");
    session
}

fn stored_text<S: KeyValueStore>(session: &VaultSession<S>) -> String {
    session
        .store()
        .get(DEFAULT_STORAGE_KEY)
        .unwrap()
        .expect("container present")
}

fn stored_container<S: KeyValueStore>(session: &VaultSession<S>) -> EncryptedContainer {
    EncryptedContainer::decode(&stored_text(session)).expect("decode container")
}

fn mail() -> SecretRecord {
    SecretRecord::new("Mail", "a@b.com", "x", None)
}

// ---------------------------------------------------------------------------
// End-to-end scenario
// ---------------------------------------------------------------------------

#[test]
fn create_add_lock_unlock_scenario() {
    let mut session = VaultSession::new(MemoryStore::new());
    assert_eq!(session.state().unwrap(), SessionState::Uninitialized);

    session.create_vault(PASSWORD).unwrap();
    assert!(session.has_vault().unwrap());
    assert!(session.list_secrets().unwrap().is_empty());

    let record = mail();
    session.add_secret(record.clone()).unwrap();
    assert_eq!(session.list_secrets().unwrap().len(), 1);

    session.lock();
    assert_eq!(session.state().unwrap(), SessionState::Locked);
    assert!(matches!(
        session.list_secrets(),
        Err(LockboxError::VaultLocked)
    ));

    session.unlock(PASSWORD).unwrap();
    assert_eq!(session.list_secrets().unwrap(), &[record]);

    assert!(matches!(
        session.unlock(b"wrong-pass"),
        Err(LockboxError::DecryptionFailed)
    ));
}

// ---------------------------------------------------------------------------
// Unlock failures
// ---------------------------------------------------------------------------

#[test]
fn wrong_password_leaves_session_locked_without_data() {
    let mut session = new_session();
    session.add_secret(mail()).unwrap();

    // Still unlocked from creation; a failed unlock must drop everything.
    let result = session.unlock(b"not-the-password");
    assert!(matches!(result, Err(LockboxError::DecryptionFailed)));
    assert_eq!(session.state().unwrap(), SessionState::Locked);
    assert!(matches!(
        session.list_secrets(),
        Err(LockboxError::VaultLocked)
    ));
}

#[test]
fn unlock_without_vault_is_not_found() {
    let mut session = VaultSession::new(MemoryStore::new());
    assert!(matches!(
        session.unlock(PASSWORD),
        Err(LockboxError::VaultNotFound)
    ));
    assert!(!session.is_unlocked());
}

#[test]
fn unsupported_version_is_rejected_even_with_right_password() {
    let mut session = new_session();
    session.lock();

    let mut value: serde_json::Value = serde_json::from_str(&stored_text(&session)).unwrap();
    value["version"] = serde_json::json!(2);
    session
        .store_mut()
        .set(DEFAULT_STORAGE_KEY, &value.to_string())
        .unwrap();

    match session.unlock(PASSWORD) {
        Err(LockboxError::VersionMismatch { found, expected }) => {
            assert_eq!(found, "2");
            assert_eq!(expected, 1);
        }
        other => panic!("expected VersionMismatch, got {other:?}"),
    }
    assert!(!session.is_unlocked());
}

#[test]
fn non_integer_versions_are_version_mismatches() {
    let mut session = new_session();
    session.lock();
    let original: serde_json::Value = serde_json::from_str(&stored_text(&session)).unwrap();

    let shapes = [
        serde_json::json!(-1),
        serde_json::json!("1"),
        serde_json::json!(1.5),
        serde_json::Value::Null,
        serde_json::json!(4_294_967_297u64),
    ];
    for shape in shapes {
        let mut value = original.clone();
        value["version"] = shape.clone();
        session
            .store_mut()
            .set(DEFAULT_STORAGE_KEY, &value.to_string())
            .unwrap();

        match session.unlock(PASSWORD) {
            Err(LockboxError::VersionMismatch { found, .. }) => assert_eq!(found, shape.to_string()),
            other => panic!("version {shape}: expected VersionMismatch, got {other:?}"),
        }
        assert!(!session.is_unlocked());
    }

    let mut value = original.clone();
    value.as_object_mut().unwrap().remove("version");
    session
        .store_mut()
        .set(DEFAULT_STORAGE_KEY, &value.to_string())
        .unwrap();
    assert!(matches!(
        session.unlock(PASSWORD),
        Err(LockboxError::VersionMismatch { .. })
    ));
}

/// Envelope produced outside this crate with PBKDF2-SHA256 (100 000
/// iterations) and AES-256-GCM, the layout WebCrypto writes.
const FOREIGN_ENVELOPE: &str = r#"{"cipherText":"t7Hv3v3sCyS2+FO/6+WHjPwaKaGgSXDknxgwxQjGt8zJlT6B9VNSbIyIX4zkFJ5Zbd4ksj/3D9qEheOPsd3bh2CFaML8WC+JWKYvYNXPHXTgVBHMHbORfWqNL0NwNQx2l8E5zg0EFGvAcq5+clUX1MJRPxAJd2lKumngJVFQVhkM","iv":"EBESExQVFhcYGRob","salt":"AAECAwQFBgcICQoLDA0ODw==","version":1,"createdAt":1700000000000,"updatedAt":1700000000500}"#;

#[test]
fn unlocks_an_envelope_written_by_another_client() {
    let mut store = MemoryStore::new();
    store.set(DEFAULT_STORAGE_KEY, FOREIGN_ENVELOPE).unwrap();
    let mut session = VaultSession::new(store);

    session.unlock(PASSWORD).unwrap();

    let records = session.list_secrets().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "rec-1");
    assert_eq!(records[0].name, "Mail");
    assert_eq!(records[0].username, "a@b.com");
    assert_eq!(records[0].password, "hunter2");
    assert_eq!(records[0].notes.as_deref(), Some("work"));
    assert_eq!(records[0].created_at, 1_700_000_000_000);

    let info = session.container_info().unwrap().unwrap();
    assert_eq!(info.created_at, 1_700_000_000_000);
    assert_eq!(info.updated_at, 1_700_000_000_500);
}

#[test]
fn foreign_envelope_rejects_a_wrong_password() {
    let mut store = MemoryStore::new();
    store.set(DEFAULT_STORAGE_KEY, FOREIGN_ENVELOPE).unwrap();
    let mut session = VaultSession::new(store);

    assert!(matches!(
        session.unlock(b"correct-horse-2"),
        Err(LockboxError::DecryptionFailed)
    ));
}

#[test]
fn tampered_ciphertext_fails_like_a_wrong_password() {
    let mut session = new_session();
    session.add_secret(mail()).unwrap();
    session.lock();

    let mut container = stored_container(&session);
    container.cipher_text[0] ^= 0x01;
    session
        .store_mut()
        .set(DEFAULT_STORAGE_KEY, &container.encode().unwrap())
        .unwrap();

    assert!(matches!(
        session.unlock(PASSWORD),
        Err(LockboxError::DecryptionFailed)
    ));
}

#[test]
fn tampered_nonce_fails_like_a_wrong_password() {
    let mut session = new_session();
    session.lock();

    let mut container = stored_container(&session);
    container.iv[11] ^= 0x80;
    session
        .store_mut()
        .set(DEFAULT_STORAGE_KEY, &container.encode().unwrap())
        .unwrap();

    assert!(matches!(
        session.unlock(PASSWORD),
        Err(LockboxError::DecryptionFailed)
    ));
}

// ---------------------------------------------------------------------------
// Locked-state enforcement
// ---------------------------------------------------------------------------

#[test]
fn mutations_while_locked_fail_and_leave_storage_untouched() {
    let mut session = new_session();
    let record = mail();
    session.add_secret(record.clone()).unwrap();
    session.lock();

    let before = stored_text(&session);

    assert!(matches!(
        session.add_secret(mail()),
        Err(LockboxError::VaultLocked)
    ));
    assert!(matches!(
        session.update_secret(record.clone()),
        Err(LockboxError::VaultLocked)
    ));
    assert!(matches!(
        session.delete_secret(&record.id),
        Err(LockboxError::VaultLocked)
    ));

    assert_eq!(stored_text(&session), before);
}

#[test]
fn lock_is_idempotent() {
    let mut session = new_session();
    session.lock();
    let state_once = session.state().unwrap();
    session.lock();
    assert_eq!(session.state().unwrap(), state_once);
    assert!(matches!(
        session.list_secrets(),
        Err(LockboxError::VaultLocked)
    ));

    // Locking a session that was never unlocked is fine too.
    let mut fresh = VaultSession::new(MemoryStore::new());
    fresh.lock();
    assert_eq!(fresh.state().unwrap(), SessionState::Uninitialized);
}

#[test]
fn embedder_hooks_lock_and_are_harmless_when_locked() {
    let mut session = new_session();
    session.add_secret(mail()).unwrap();
    let before = stored_text(&session);

    session.on_hidden();
    assert_eq!(session.state().unwrap(), SessionState::Locked);
    assert!(matches!(
        session.list_secrets(),
        Err(LockboxError::VaultLocked)
    ));

    session.on_hidden();
    session.on_idle_timeout();
    assert_eq!(session.state().unwrap(), SessionState::Locked);
    assert_eq!(stored_text(&session), before);

    session.unlock(PASSWORD).unwrap();
    session.on_idle_timeout();
    assert!(!session.is_unlocked());
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

#[test]
fn update_replaces_by_id_and_keeps_created_at() {
    let mut session = new_session();
    let original = mail();
    session.add_secret(original.clone()).unwrap();

    let mut changed = original.clone();
    changed.password = "new-password".into();
    changed.notes = Some("rotated".into());
    changed.created_at = 1;
    session.update_secret(changed).unwrap();

    let stored = session.find_secret(&original.id).unwrap().unwrap();
    assert_eq!(stored.password, "new-password");
    assert_eq!(stored.notes.as_deref(), Some("rotated"));
    assert_eq!(stored.created_at, original.created_at);

    // And the change survives a lock/unlock cycle.
    session.lock();
    session.unlock(PASSWORD).unwrap();
    let stored = session.find_secret(&original.id).unwrap().unwrap();
    assert_eq!(stored.password, "new-password");
}

#[test]
fn update_and_delete_of_unknown_id_still_save() {
    let mut session = new_session();
    session.add_secret(mail()).unwrap();
    let before = session.list_secrets().unwrap().to_vec();
    let iv_before = stored_container(&session).iv;

    let mut ghost = mail();
    ghost.id = "no-such-id".into();
    session.update_secret(ghost).unwrap();
    assert_eq!(session.list_secrets().unwrap(), before.as_slice());
    let iv_after_update = stored_container(&session).iv;
    assert_ne!(iv_after_update, iv_before);

    session.delete_secret("no-such-id").unwrap();
    assert_eq!(session.list_secrets().unwrap(), before.as_slice());
    assert_ne!(stored_container(&session).iv, iv_after_update);
}

#[test]
fn delete_removes_only_the_matching_record() {
    let mut session = new_session();
    let a = SecretRecord::new("A", "a", "1", None);
    let b = SecretRecord::new("B", "b", "2", None);
    session.add_secret(a.clone()).unwrap();
    session.add_secret(b.clone()).unwrap();

    session.delete_secret(&a.id).unwrap();
    assert_eq!(session.list_secrets().unwrap(), &[b]);
}

#[test]
fn records_keep_insertion_order() {
    let mut session = new_session();
    for name in ["Zebra", "Alpha", "Middle"] {
        session
            .add_secret(SecretRecord::new(name, "user", "pw", None))
            .unwrap();
    }
    session.lock();
    session.unlock(PASSWORD).unwrap();

    let names: Vec<_> = session
        .list_secrets()
        .unwrap()
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(names, ["Zebra", "Alpha", "Middle"]);
}

#[test]
fn duplicate_id_is_rejected() {
    let mut session = new_session();
    let record = mail();
    session.add_secret(record.clone()).unwrap();

    assert!(matches!(
        session.add_secret(record),
        Err(LockboxError::SecretAlreadyExists(_))
    ));
    assert_eq!(session.list_secrets().unwrap().len(), 1);
}

#[test]
fn invalid_record_is_rejected_without_writing() {
    let mut session = new_session();
    let before = stored_text(&session);

    let mut record = mail();
    record.password = String::new();
    assert!(matches!(
        session.add_secret(record),
        Err(LockboxError::Validation(_))
    ));
    assert_eq!(stored_text(&session), before);
    assert!(session.list_secrets().unwrap().is_empty());
}

#[test]
fn search_matches_name_or_username() {
    let mut session = new_session();
    session
        .add_secret(SecretRecord::new("GitHub", "octo@example.com", "1", None))
        .unwrap();
    session
        .add_secret(SecretRecord::new("Bank", "me@bank.test", "2", None))
        .unwrap();

    assert_eq!(session.search_secrets("git").unwrap().len(), 1);
    assert_eq!(session.search_secrets("EXAMPLE").unwrap().len(), 1);
    assert_eq!(session.search_secrets("").unwrap().len(), 2);
    assert!(session.search_secrets("nothing").unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Saves
// ---------------------------------------------------------------------------

#[test]
fn consecutive_saves_use_fresh_nonces() {
    let mut session = new_session();
    let mut seen = vec![stored_container(&session).iv];

    for i in 0..5 {
        session
            .add_secret(SecretRecord::new(&format!("S{i}"), "u", "p", None))
            .unwrap();
        let iv = stored_container(&session).iv;
        assert!(!seen.contains(&iv), "nonce reused on save {i}");
        seen.push(iv);
    }
}

#[test]
fn created_at_is_preserved_and_updated_at_advances() {
    let mut session = new_session();
    let first = stored_container(&session);
    let mut last_updated = first.updated_at;

    for i in 0..3 {
        std::thread::sleep(std::time::Duration::from_millis(5));
        session
            .add_secret(SecretRecord::new(&format!("S{i}"), "u", "p", None))
            .unwrap();

        let container = stored_container(&session);
        assert_eq!(container.created_at, first.created_at);
        assert!(container.updated_at >= last_updated);
        last_updated = container.updated_at;
    }
    assert!(last_updated > first.created_at);
}

#[test]
fn salt_is_fixed_across_saves() {
    let mut session = new_session();
    let salt = stored_container(&session).salt;
    session.add_secret(mail()).unwrap();
    assert_eq!(stored_container(&session).salt, salt);
}

#[test]
fn failed_write_leaves_memory_untouched() {
    let mut session = VaultSession::new(FlakyStore::default());
    session.create_vault(PASSWORD).unwrap();
    let record = mail();
    session.add_secret(record.clone()).unwrap();

    session.store_mut().fail_writes = true;

    assert!(matches!(
        session.add_secret(mail()),
        Err(LockboxError::Storage(_))
    ));
    assert!(matches!(
        session.delete_secret(&record.id),
        Err(LockboxError::Storage(_))
    ));
    assert_eq!(session.list_secrets().unwrap(), &[record]);
    assert!(session.is_unlocked());
}

#[test]
fn failed_create_leaves_session_uninitialized() {
    let store = FlakyStore {
        fail_writes: true,
        ..FlakyStore::default()
    };
    let mut session = VaultSession::new(store);

    assert!(matches!(
        session.create_vault(PASSWORD),
        Err(LockboxError::Storage(_))
    ));
    assert!(!session.is_unlocked());
    assert_eq!(session.state().unwrap(), SessionState::Uninitialized);
}

#[test]
fn create_refuses_to_overwrite() {
    let mut session = new_session();
    let before = stored_text(&session);

    assert!(matches!(
        session.create_vault(b"another-password"),
        Err(LockboxError::VaultAlreadyExists)
    ));
    assert_eq!(stored_text(&session), before);
}

#[test]
fn unreadable_created_at_falls_back_to_now() {
    let mut session = new_session();

    // Rewrite the stored envelope with a non-integer createdAt.
    let mut value: serde_json::Value = serde_json::from_str(&stored_text(&session)).unwrap();
    value["createdAt"] = serde_json::json!("yesterday");
    session
        .store_mut()
        .set(DEFAULT_STORAGE_KEY, &value.to_string())
        .unwrap();

    let before_save = chrono::Utc::now().timestamp_millis();
    session.add_secret(mail()).unwrap();

    let container = stored_container(&session);
    assert!(container.created_at >= before_save);
}

#[test]
fn container_info_is_readable_while_locked() {
    let mut session = new_session();
    session.lock();

    let info = session.container_info().unwrap().expect("vault exists");
    assert_eq!(info.version, 1);
    assert!(info.updated_at >= info.created_at);

    let empty = VaultSession::new(MemoryStore::new());
    assert!(empty.container_info().unwrap().is_none());
}
